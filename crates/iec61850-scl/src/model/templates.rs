// crates/iec61850-scl/src/model/templates.rs

//! Contains model structs for the `<DataTypeTemplates>` section.

use super::common::Val;
use serde::Deserialize;

/// Represents `<DataTypeTemplates>`.
///
/// The four template families are kept in separate lists; their ids share
/// one namespace once flattened into the `TypeRegistry`.
#[derive(Debug, Deserialize, Default)]
pub struct DataTypeTemplates {
    #[serde(rename = "LNodeType", default)]
    pub lnode_type: Vec<LNodeType>,

    #[serde(rename = "DOType", default)]
    pub do_type: Vec<DoType>,

    #[serde(rename = "DAType", default)]
    pub da_type: Vec<DaType>,

    #[serde(rename = "EnumType", default)]
    pub enum_type: Vec<EnumType>,
}

/// Represents `<LNodeType id=".." lnClass="..">`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LNodeType {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
    #[serde(rename = "@lnClass", default)]
    pub ln_class: String,

    #[serde(rename = "DO", default)]
    pub data_objects: Vec<DoDefinition>,
}

/// Represents `<DOType id=".." cdc="..">`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DoType {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
    #[serde(rename = "@cdc", default)]
    pub cdc: String,

    #[serde(rename = "SDO", default)]
    pub sub_data_objects: Vec<DoDefinition>,

    #[serde(rename = "DA", default)]
    pub data_attributes: Vec<DaDefinition>,
}

/// Represents `<DAType id="..">`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DaType {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "BDA", default)]
    pub sub_attributes: Vec<DaDefinition>,
}

/// Represents `<EnumType id="..">`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct EnumType {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "EnumVal", default)]
    pub values: Vec<EnumVal>,
}

/// Represents `<EnumVal ord="1">on</EnumVal>`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct EnumVal {
    #[serde(rename = "@ord")]
    pub ord: i32,
    #[serde(rename = "$text", default)]
    pub symbol: String,
}

/// Represents `<DO>` (inside LNodeType) or `<SDO>` (inside DOType).
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DoDefinition {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@type")]
    pub type_id: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
    #[serde(rename = "@transient", default)]
    pub transient: bool,
    #[serde(rename = "@count", default)]
    pub count: Option<String>,
}

/// Represents `<DA>` (inside DOType) or `<BDA>` (inside DAType).
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DaDefinition {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
    /// Functional constraint; only present on DA, never on BDA.
    #[serde(rename = "@fc", default)]
    pub fc: Option<String>,
    #[serde(rename = "@bType")]
    pub b_type: String,
    /// Reference to a DAType or EnumType for `Struct` / `Enum` base types.
    #[serde(rename = "@type", default)]
    pub type_id: Option<String>,
    #[serde(rename = "@count", default)]
    pub count: Option<String>,
    #[serde(rename = "@dchg", default)]
    pub dchg: bool,
    #[serde(rename = "@qchg", default)]
    pub qchg: bool,
    #[serde(rename = "@dupd", default)]
    pub dupd: bool,

    #[serde(rename = "Val", default)]
    pub values: Vec<Val>,
}
