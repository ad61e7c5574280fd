// crates/iec61850-scl/src/model/mod.rs

//! Internal `serde` data structures that map directly to the SCL XML schema.
//!
//! These structs are annotated with `serde` attributes to facilitate parsing
//! via `quick-xml` and are not intended for direct public use. Numeric
//! attributes that need validation with a helpful error are kept as strings
//! and parsed by the resolver.

#![allow(clippy::pedantic)] // XML schema naming conventions differ from Rust

use serde::Deserialize;

pub mod common;
pub mod communication;
pub mod ied;
pub mod templates;

// Re-export key components for internal use
pub use communication::Communication;
pub use ied::Ied;
pub use templates::DataTypeTemplates;

/// The root `<SCL>` element.
#[derive(Debug, Deserialize, Default)]
#[serde(rename = "SCL")]
pub struct Scl {
    #[serde(rename = "Header", default)]
    pub header: Option<Header>,

    #[serde(rename = "Communication", default)]
    pub communication: Option<Communication>,

    #[serde(rename = "IED", default)]
    pub ieds: Vec<Ied>,

    #[serde(rename = "DataTypeTemplates", default)]
    pub data_type_templates: Option<DataTypeTemplates>,
}

/// Represents `<Header id=".." ..>`.
#[derive(Debug, Deserialize, Default)]
pub struct Header {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "@version", default)]
    pub version: Option<String>,
    #[serde(rename = "@revision", default)]
    pub revision: Option<String>,
    #[serde(rename = "@toolID", default)]
    pub tool_id: Option<String>,
    #[serde(rename = "@nameStructure", default)]
    pub name_structure: Option<String>,
}
