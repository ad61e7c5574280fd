// src/lib.rs

#![doc = "Compiles IEC 61850 SCL (Substation Configuration Language) files into a static C data model."]
#![doc = ""]
#![doc = "The pipeline runs in fixed stages over one in-memory document:"]
#![doc = "- `load_scl_from_str` / `load_scl_from_file`: XML parsing, type template registry,"]
#![doc = "  semantic resolution of the IED instance tree, default value interpretation and"]
#![doc = "  communication address resolution."]
#![doc = "- `StaticModelGenerator`: emits the resolved model of one IED access point as a"]
#![doc = "  `.h` / `.c` file pair."]

// --- Crate Modules ---

mod addressing;
mod error;
mod generator;
mod lookup;
mod model;
mod parser;
mod registry;
mod resolver;
mod types;
mod values;

// --- Public API Re-exports ---

pub use addressing::{encode_client_address, parse_phy_com_address};
pub use error::SclError;
pub use generator::{GeneratedModel, GeneratorConfig, StaticModelGenerator};
pub use lookup::ModelNode;
pub use model::common::Val;
pub use model::communication::{Address, P};
pub use model::templates::{
    DaDefinition, DaType, DoDefinition, DoType, EnumType, EnumVal, LNodeType,
};
pub use parser::{load_scl_from_file, load_scl_from_str};
pub use registry::{TypeRegistry, TypeTemplate};
pub use types::*;
pub use values::{DataModelValue, Interpreted, enum_ordinal, interpret};
