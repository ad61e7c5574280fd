// crates/iec61850-scl/src/model/common.rs

//! Small helper structs shared by several parts of the SCL schema.

use serde::Deserialize;

// --- Helper Functions for serde(default) ---

/// Helper function for `#[serde(default)]` on bool fields that should default to `true`.
pub(super) fn bool_true() -> bool {
    true
}

// --- Shared elements ---

/// Represents `<Val sGroup="1">literal</Val>`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Val {
    #[serde(rename = "@sGroup", default)]
    pub s_group: Option<String>,

    #[serde(rename = "$text", default)]
    pub value: String,
}

/// Represents `<TrgOps dchg="true" qchg="false" dupd="false" period="true" gi="true"/>`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct TrgOps {
    #[serde(rename = "@dchg", default)]
    pub dchg: bool,
    #[serde(rename = "@qchg", default)]
    pub qchg: bool,
    #[serde(rename = "@dupd", default)]
    pub dupd: bool,
    #[serde(rename = "@period", default)]
    pub period: bool,
    #[serde(rename = "@gi", default = "bool_true")]
    pub gi: bool,
}

/// Picks the literal of the first `<Val>` element, if any.
pub fn first_value(values: &[Val]) -> Option<&str> {
    values.first().map(|v| v.value.as_str())
}
