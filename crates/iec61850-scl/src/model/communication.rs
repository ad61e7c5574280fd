// crates/iec61850-scl/src/model/communication.rs

//! Contains model structs for the `<Communication>` section.

use serde::Deserialize;

/// Represents `<Communication>`.
#[derive(Debug, Deserialize, Default)]
pub struct Communication {
    #[serde(rename = "SubNetwork", default)]
    pub sub_networks: Vec<SubNetwork>,
}

/// Represents `<SubNetwork name=".." type="8-MMS">`.
#[derive(Debug, Deserialize, Default)]
pub struct SubNetwork {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@type", default)]
    pub network_type: Option<String>,

    #[serde(rename = "ConnectedAP", default)]
    pub connected_aps: Vec<ConnectedAp>,
}

/// Represents `<ConnectedAP iedName=".." apName="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct ConnectedAp {
    #[serde(rename = "@iedName")]
    pub ied_name: String,
    #[serde(rename = "@apName")]
    pub ap_name: String,

    #[serde(rename = "Address", default)]
    pub address: Option<Address>,

    #[serde(rename = "GSE", default)]
    pub gse: Vec<ControlBlockAddress>,

    #[serde(rename = "SMV", default)]
    pub smv: Vec<ControlBlockAddress>,
}

/// Represents `<GSE ldInst=".." cbName="..">` and `<SMV ..>`.
#[derive(Debug, Deserialize, Default)]
pub struct ControlBlockAddress {
    #[serde(rename = "@ldInst")]
    pub ld_inst: String,
    #[serde(rename = "@cbName")]
    pub cb_name: String,

    #[serde(rename = "Address", default)]
    pub address: Option<Address>,

    /// Only used by GSE.
    #[serde(rename = "MinTime", default)]
    pub min_time: Option<Duration>,

    /// Only used by GSE.
    #[serde(rename = "MaxTime", default)]
    pub max_time: Option<Duration>,
}

/// Represents `<Address>`, a list of typed `P` parameters.
#[derive(Debug, Deserialize, Default)]
pub struct Address {
    #[serde(rename = "P", default)]
    pub parameters: Vec<P>,
}

impl Address {
    /// Returns the text of the first parameter with the given `type`.
    pub fn parameter(&self, p_type: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.p_type == p_type)
            .map(|p| p.value.trim())
    }
}

/// Represents `<P type="MAC-Address">01-0C-CD-01-00-01</P>`.
#[derive(Debug, Deserialize, Default)]
pub struct P {
    #[serde(rename = "@type")]
    pub p_type: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// Represents `<MinTime unit="s" multiplier="m">10</MinTime>`. The value is
/// always read as milliseconds.
#[derive(Debug, Deserialize, Default)]
pub struct Duration {
    #[serde(rename = "$text", default)]
    pub value: String,
}
