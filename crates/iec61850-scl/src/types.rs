// crates/iec61850-scl/src/types.rs

//! Public, ergonomic data structures for representing a resolved SCL document.
//!
//! Instances own their children. Templates are never owned by instances; a
//! resolved node only keeps the id of the template it was built from.

use crate::error::SclError;
use crate::registry::TypeRegistry;
use crate::values::DataModelValue;
use std::fmt;

// --- Root Document ---

/// A fully parsed and resolved SCL document.
#[derive(Debug, Default)]
pub struct SclDocument {
    /// File name the document was loaded from, if any.
    pub source_name: Option<String>,

    /// Metadata from the `<Header>` element.
    pub header: Option<Header>,

    /// All IEDs, in document order.
    pub ieds: Vec<Ied>,

    /// The resolved `<Communication>` section.
    pub communication: Communication,

    /// All type templates, keyed by id.
    pub registry: TypeRegistry,

    /// Ids of templates that no instance referenced, in declaration order.
    pub unused_templates: Vec<String>,

    /// Non-fatal findings collected while resolving.
    pub diagnostics: Vec<Diagnostic>,
}

impl SclDocument {
    /// Returns the IED with the given name, or the first IED when `name` is `None`.
    pub fn ied(&self, name: Option<&str>) -> Result<&Ied, SclError> {
        match name {
            Some(name) => self.ieds.iter().find(|ied| ied.name == name),
            None => self.ieds.first(),
        }
        .ok_or_else(|| SclError::IedNotFound {
            name: name.map(str::to_string),
        })
    }
}

/// Represents the `<Header>` element.
#[derive(Debug, Default, Clone)]
pub struct Header {
    pub id: String,
    pub version: Option<String>,
    pub revision: Option<String>,
    pub tool_id: Option<String>,
    pub name_structure: Option<String>,
}

/// A warning recorded while resolving or generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Path of the element the finding is about (e.g. `LD0/GGIO1.Ind1.q`).
    pub element: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.element, self.message)
    }
}

// --- Instance tree ---

/// Represents an `<IED>`.
#[derive(Debug, Default)]
pub struct Ied {
    pub name: String,
    pub ied_type: Option<String>,
    pub manufacturer: Option<String>,
    pub config_version: Option<String>,
    pub desc: Option<String>,
    /// `Services/ReportSettings@owner`; adds the owner bit to every RCB.
    pub report_owner: bool,
    pub access_points: Vec<AccessPoint>,
}

impl Ied {
    /// Returns the named access point, or the first one when `name` is `None`.
    pub fn access_point(&self, name: Option<&str>) -> Result<&AccessPoint, SclError> {
        match name {
            Some(name) => self.access_points.iter().find(|ap| ap.name == name),
            None => self.access_points.first(),
        }
        .ok_or_else(|| SclError::AccessPointNotFound {
            ied: self.name.clone(),
            name: name.map(str::to_string),
        })
    }
}

/// Represents an `<AccessPoint>` and the logical devices of its `<Server>`.
#[derive(Debug, Default)]
pub struct AccessPoint {
    pub name: String,
    pub desc: Option<String>,
    pub logical_devices: Vec<LogicalDevice>,
}

/// Represents an `<LDevice>`.
#[derive(Debug, Default)]
pub struct LogicalDevice {
    pub inst: String,
    pub ld_name: Option<String>,
    pub desc: Option<String>,
    /// `LN0` first, followed by the `LN` elements in document order.
    pub logical_nodes: Vec<LogicalNode>,
}

/// Represents an `<LN0>` or `<LN>` with its data objects and control blocks.
#[derive(Debug, Default)]
pub struct LogicalNode {
    pub prefix: String,
    pub ln_class: String,
    pub inst: String,
    pub ln_type: String,
    pub desc: Option<String>,
    pub data_objects: Vec<DataObject>,
    pub data_sets: Vec<DataSet>,
    pub report_controls: Vec<ReportControlBlock>,
    pub gse_controls: Vec<GseControlBlock>,
    pub sv_controls: Vec<SvControlBlock>,
    pub log_controls: Vec<LogControlBlock>,
    pub logs: Vec<LogDefinition>,
    /// Only ever present on `LLN0`.
    pub setting_control: Option<SettingGroupControlBlock>,
}

impl LogicalNode {
    /// The logical node name: prefix, class and instance concatenated.
    pub fn name(&self) -> String {
        format!("{}{}{}", self.prefix, self.ln_class, self.inst)
    }

    pub fn is_lln0(&self) -> bool {
        self.ln_class == "LLN0"
    }
}

/// An instantiated data object.
#[derive(Debug, Default, Clone)]
pub struct DataObject {
    pub name: String,
    /// Id of the DOType this object was built from.
    pub type_id: String,
    /// Array element count; 0 for scalars.
    pub count: u32,
    pub transient: bool,
    pub sub_data_objects: Vec<DataObject>,
    pub data_attributes: Vec<DataAttribute>,
}

/// An instantiated data attribute.
#[derive(Debug, Clone)]
pub struct DataAttribute {
    pub name: String,
    pub fc: FunctionalConstraint,
    pub attribute_type: AttributeType,
    /// DAType id for constructed attributes, EnumType id for enumerations.
    pub type_id: Option<String>,
    /// Array element count; 0 for scalars.
    pub count: u32,
    pub trigger_options: TriggerOptions,
    /// Short address (`sAddr`) from the matching `DAI`.
    pub short_address: Option<String>,
    pub value: Option<DataModelValue>,
    pub sub_data_attributes: Vec<DataAttribute>,
}

// --- Data sets and control blocks ---

/// Represents a `<DataSet>`.
#[derive(Debug, Default, Clone)]
pub struct DataSet {
    pub name: String,
    pub desc: Option<String>,
    pub members: Vec<FcdaReference>,
}

/// Represents an `<FCDA>` member of a data set.
#[derive(Debug, Clone)]
pub struct FcdaReference {
    pub ld_inst: String,
    pub prefix: String,
    pub ln_class: String,
    pub ln_inst: String,
    pub do_name: String,
    pub da_name: Option<String>,
    pub fc: FunctionalConstraint,
}

/// Represents a `<ReportControl>`.
#[derive(Debug, Default, Clone)]
pub struct ReportControlBlock {
    pub name: String,
    pub desc: Option<String>,
    pub data_set: Option<String>,
    pub report_id: Option<String>,
    pub conf_rev: u32,
    pub buffered: bool,
    pub buf_time: u32,
    pub intg_pd: u32,
    pub indexed: bool,
    /// `RptEnabled@max`; always 1 when not indexed.
    pub max_instances: u32,
    pub trigger_options: TriggerOptions,
    pub options: ReportOptions,
    pub clients: Vec<ClientLnReference>,
}

/// Represents a `<ClientLN>` inside `<RptEnabled>`.
#[derive(Debug, Default, Clone)]
pub struct ClientLnReference {
    pub ied_name: String,
    pub ap_ref: Option<String>,
    pub ld_inst: String,
    pub prefix: String,
    pub ln_class: String,
    pub ln_inst: String,
}

/// Represents a `<GSEControl>` of type GOOSE.
#[derive(Debug, Default, Clone)]
pub struct GseControlBlock {
    pub name: String,
    pub desc: Option<String>,
    pub data_set: Option<String>,
    pub app_id: Option<String>,
    pub conf_rev: u32,
    pub fixed_offs: bool,
}

/// Represents a `<SampledValueControl>`.
#[derive(Debug, Default, Clone)]
pub struct SvControlBlock {
    pub name: String,
    pub desc: Option<String>,
    pub data_set: Option<String>,
    pub smv_id: Option<String>,
    pub conf_rev: u32,
    pub multicast: bool,
    pub smp_rate: u32,
    pub nof_asdu: u32,
    pub smp_mod: SampleMode,
    pub options: SvOptions,
}

/// Represents a `<LogControl>`.
#[derive(Debug, Default, Clone)]
pub struct LogControlBlock {
    pub name: String,
    pub desc: Option<String>,
    pub data_set: Option<String>,
    pub ld_inst: Option<String>,
    pub prefix: String,
    pub ln_class: Option<String>,
    pub ln_inst: String,
    pub log_name: Option<String>,
    pub intg_pd: u32,
    pub log_ena: bool,
    pub reason_code: bool,
    pub trigger_options: TriggerOptions,
}

/// Represents a `<Log>`.
#[derive(Debug, Default, Clone)]
pub struct LogDefinition {
    pub name: String,
    pub desc: Option<String>,
}

/// Represents the `<SettingControl>` of `LLN0`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SettingGroupControlBlock {
    pub num_of_sgs: u32,
    pub act_sg: u32,
}

// --- Option sets ---

/// Trigger conditions of a data attribute or control block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TriggerOptions {
    pub dchg: bool,
    pub qchg: bool,
    pub dupd: bool,
    pub period: bool,
    pub gi: bool,
}

impl TriggerOptions {
    /// The `TrgOps` default for report and log control blocks.
    pub fn general_interrogation() -> Self {
        Self {
            gi: true,
            ..Default::default()
        }
    }

    /// Bit mask used by control blocks (dchg 1, qchg 2, dupd 4, period 8, gi 16).
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.dchg {
            bits |= 1;
        }
        if self.qchg {
            bits |= 2;
        }
        if self.dupd {
            bits |= 4;
        }
        if self.period {
            bits |= 8;
        }
        if self.gi {
            bits |= 16;
        }
        bits
    }
}

/// Optional report fields (`OptFields`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub seq_num: bool,
    pub time_stamp: bool,
    pub reason_code: bool,
    pub data_set: bool,
    pub data_ref: bool,
    pub buf_ovfl: bool,
    pub entry_id: bool,
    pub config_ref: bool,
}

impl ReportOptions {
    /// Bit mask in the order seqNum, timeStamp, reasonCode, dataSet, dataRef,
    /// bufOvfl, entryID, configRef (1 .. 128).
    pub fn bits(&self) -> u8 {
        [
            self.seq_num,
            self.time_stamp,
            self.reason_code,
            self.data_set,
            self.data_ref,
            self.buf_ovfl,
            self.entry_id,
            self.config_ref,
        ]
        .iter()
        .enumerate()
        .filter(|(_, set)| **set)
        .fold(0, |acc, (bit, _)| acc | (1u8 << bit))
    }
}

/// Optional sampled value fields (`SmvOpts`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SvOptions {
    pub refresh_time: bool,
    pub sample_synchronized: bool,
    pub sample_rate: bool,
    pub data_set: bool,
    pub security: bool,
}

impl SvOptions {
    /// Bit mask: refreshTime 1, sampleSynchronized 2, sampleRate 4, dataSet 8, security 16.
    pub fn bits(&self) -> u8 {
        [
            self.refresh_time,
            self.sample_synchronized,
            self.sample_rate,
            self.data_set,
            self.security,
        ]
        .iter()
        .enumerate()
        .filter(|(_, set)| **set)
        .fold(0, |acc, (bit, _)| acc | (1u8 << bit))
    }
}

/// Sampling mode of a sampled value control block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    #[default]
    SamplesPerPeriod,
    SamplesPerSecond,
    SecondsPerSample,
}

impl SampleMode {
    /// Parses the `smpMod` attribute; absent means samples per period.
    pub fn from_scl(value: Option<&str>) -> Option<Self> {
        match value {
            None | Some("SmpPerPeriod") => Some(Self::SamplesPerPeriod),
            Some("SmpPerSec") => Some(Self::SamplesPerSecond),
            Some("SecPerSmp") => Some(Self::SecondsPerSample),
            Some(_) => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::SamplesPerPeriod => 0,
            Self::SamplesPerSecond => 1,
            Self::SecondsPerSample => 2,
        }
    }
}

// --- Communication ---

/// The resolved `<Communication>` section.
#[derive(Debug, Default, Clone)]
pub struct Communication {
    pub sub_networks: Vec<SubNetwork>,
}

/// Represents a `<SubNetwork>`.
#[derive(Debug, Default, Clone)]
pub struct SubNetwork {
    pub name: String,
    pub network_type: Option<String>,
    pub connected_aps: Vec<ConnectedAp>,
}

/// Represents a `<ConnectedAP>` with its parsed addresses.
#[derive(Debug, Default, Clone)]
pub struct ConnectedAp {
    pub ied_name: String,
    pub ap_name: String,
    /// Text of the `P type="IP"` parameter of the access point address.
    pub ip_address: Option<String>,
    pub gse: Vec<GseEndpoint>,
    pub smv: Vec<SvEndpoint>,
}

/// Represents a `<GSE>` entry of a connected access point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GseEndpoint {
    pub ld_inst: String,
    pub cb_name: String,
    pub address: Option<PhyComAddress>,
    /// Milliseconds; -1 when not configured.
    pub min_time: i32,
    /// Milliseconds; -1 when not configured.
    pub max_time: i32,
}

/// Represents an `<SMV>` entry of a connected access point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvEndpoint {
    pub ld_inst: String,
    pub cb_name: String,
    pub address: Option<PhyComAddress>,
}

/// Layer 2 publishing parameters of a GOOSE or sampled value stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhyComAddress {
    pub vlan_priority: u8,
    pub vlan_id: u16,
    pub app_id: u16,
    pub mac: [u8; 6],
}

impl Default for PhyComAddress {
    fn default() -> Self {
        Self {
            vlan_priority: 4,
            vlan_id: 0,
            app_id: 0,
            mac: [0x01, 0x0c, 0xcd, 0x01, 0x00, 0x00],
        }
    }
}

// --- Enumerations ---

/// Functional constraint of a data attribute.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionalConstraint {
    ST,
    MX,
    SP,
    SV,
    CF,
    DC,
    SG,
    SE,
    SR,
    OR,
    BL,
    EX,
    CO,
    US,
    MS,
    RP,
    BR,
    LG,
    GO,
}

impl FunctionalConstraint {
    pub fn from_scl(fc: &str) -> Option<Self> {
        Some(match fc {
            "ST" => Self::ST,
            "MX" => Self::MX,
            "SP" => Self::SP,
            "SV" => Self::SV,
            "CF" => Self::CF,
            "DC" => Self::DC,
            "SG" => Self::SG,
            "SE" => Self::SE,
            "SR" => Self::SR,
            "OR" => Self::OR,
            "BL" => Self::BL,
            "EX" => Self::EX,
            "CO" => Self::CO,
            "US" => Self::US,
            "MS" => Self::MS,
            "RP" => Self::RP,
            "BR" => Self::BR,
            "LG" => Self::LG,
            "GO" => Self::GO,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ST => "ST",
            Self::MX => "MX",
            Self::SP => "SP",
            Self::SV => "SV",
            Self::CF => "CF",
            Self::DC => "DC",
            Self::SG => "SG",
            Self::SE => "SE",
            Self::SR => "SR",
            Self::OR => "OR",
            Self::BL => "BL",
            Self::EX => "EX",
            Self::CO => "CO",
            Self::US => "US",
            Self::MS => "MS",
            Self::RP => "RP",
            Self::BR => "BR",
            Self::LG => "LG",
            Self::GO => "GO",
        }
    }
}

impl fmt::Display for FunctionalConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basic attribute type of a data attribute, derived from its `bType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Int8U,
    Int16U,
    Int24U,
    Int32U,
    Float32,
    Float64,
    Enumerated,
    CodedEnum,
    OctetString64,
    OctetString8,
    VisibleString32,
    VisibleString64,
    VisibleString65,
    VisibleString129,
    VisibleString255,
    UnicodeString255,
    Timestamp,
    Quality,
    Check,
    GenericBitString,
    Constructed,
    EntryTime,
    PhyComAddr,
    Currency,
    OptFlds,
    TrgOps,
}

impl AttributeType {
    /// Maps an SCL `bType` to the attribute type.
    pub fn from_scl(b_type: &str) -> Result<Self, SclError> {
        Ok(match b_type {
            "BOOLEAN" => Self::Boolean,
            "INT8" => Self::Int8,
            "INT16" => Self::Int16,
            "INT32" => Self::Int32,
            "INT64" => Self::Int64,
            "INT128" => Self::Int128,
            "INT8U" => Self::Int8U,
            "INT16U" => Self::Int16U,
            "INT24U" => Self::Int24U,
            "INT32U" => Self::Int32U,
            "FLOAT32" => Self::Float32,
            "FLOAT64" => Self::Float64,
            "Enum" => Self::Enumerated,
            "Dbpos" | "Tcmd" => Self::CodedEnum,
            "Check" => Self::Check,
            "Octet64" => Self::OctetString64,
            "Quality" => Self::Quality,
            "Timestamp" => Self::Timestamp,
            "Currency" => Self::Currency,
            "VisString32" => Self::VisibleString32,
            "VisString64" => Self::VisibleString64,
            "VisString65" => Self::VisibleString65,
            "VisString129" | "ObjRef" => Self::VisibleString129,
            "VisString255" => Self::VisibleString255,
            "Unicode255" => Self::UnicodeString255,
            "OptFlds" => Self::OptFlds,
            "TrgOps" => Self::TrgOps,
            "EntryID" => Self::OctetString8,
            "EntryTime" => Self::EntryTime,
            "PhyComAddr" => Self::PhyComAddr,
            "Struct" => Self::Constructed,
            other => {
                return Err(SclError::UnsupportedAttributeType {
                    b_type: other.to_string(),
                });
            }
        })
    }

    /// The `IEC61850_<NAME>` suffix used by the static model.
    pub fn c_name(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Int128 => "INT128",
            Self::Int8U => "INT8U",
            Self::Int16U => "INT16U",
            Self::Int24U => "INT24U",
            Self::Int32U => "INT32U",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Enumerated => "ENUMERATED",
            Self::CodedEnum => "CODEDENUM",
            Self::OctetString64 => "OCTET_STRING_64",
            Self::OctetString8 => "OCTET_STRING_8",
            Self::VisibleString32 => "VISIBLE_STRING_32",
            Self::VisibleString64 => "VISIBLE_STRING_64",
            Self::VisibleString65 => "VISIBLE_STRING_65",
            Self::VisibleString129 => "VISIBLE_STRING_129",
            Self::VisibleString255 => "VISIBLE_STRING_255",
            Self::UnicodeString255 => "UNICODE_STRING_255",
            Self::Timestamp => "TIMESTAMP",
            Self::Quality => "QUALITY",
            Self::Check => "CHECK",
            Self::GenericBitString => "GENERIC_BITSTRING",
            Self::Constructed => "CONSTRUCTED",
            Self::EntryTime => "ENTRY_TIME",
            Self::PhyComAddr => "PHYCOMADDR",
            Self::Currency => "CURRENCY",
            Self::OptFlds => "OPTFLDS",
            Self::TrgOps => "TRGOPS",
        }
    }

    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 | Self::Int128
        )
    }

    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8U | Self::Int16U | Self::Int24U | Self::Int32U
        )
    }

    pub fn is_visible_string(&self) -> bool {
        matches!(
            self,
            Self::VisibleString32
                | Self::VisibleString64
                | Self::VisibleString65
                | Self::VisibleString129
                | Self::VisibleString255
        )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btype_mapping_aliases() {
        assert_eq!(
            AttributeType::from_scl("ObjRef").unwrap(),
            AttributeType::VisibleString129
        );
        assert_eq!(
            AttributeType::from_scl("EntryID").unwrap(),
            AttributeType::OctetString8
        );
        assert_eq!(
            AttributeType::from_scl("Dbpos").unwrap(),
            AttributeType::CodedEnum
        );
        assert_eq!(
            AttributeType::from_scl("Tcmd").unwrap(),
            AttributeType::CodedEnum
        );
        assert_eq!(
            AttributeType::from_scl("Unicode255").unwrap().c_name(),
            "UNICODE_STRING_255"
        );
    }

    #[test]
    fn test_unknown_btype_is_rejected() {
        let err = AttributeType::from_scl("VisString999").unwrap_err();
        assert!(matches!(
            err,
            SclError::UnsupportedAttributeType { b_type } if b_type == "VisString999"
        ));
    }

    #[test]
    fn test_trigger_option_bits() {
        let trg = TriggerOptions {
            dchg: true,
            period: true,
            gi: true,
            ..Default::default()
        };
        assert_eq!(trg.bits(), 1 + 8 + 16);
        assert_eq!(TriggerOptions::general_interrogation().bits(), 16);
    }

    #[test]
    fn test_report_option_bits() {
        let opts = ReportOptions {
            seq_num: true,
            data_set: true,
            config_ref: true,
            ..Default::default()
        };
        assert_eq!(opts.bits(), 1 + 8 + 128);
    }

    #[test]
    fn test_sv_option_bits() {
        let opts = SvOptions {
            refresh_time: true,
            security: true,
            ..Default::default()
        };
        assert_eq!(opts.bits(), 1 + 16);
    }

    #[test]
    fn test_sample_mode() {
        assert_eq!(SampleMode::from_scl(None), Some(SampleMode::SamplesPerPeriod));
        assert_eq!(SampleMode::from_scl(Some("SmpPerSec")).map(|m| m.code()), Some(1));
        assert_eq!(SampleMode::from_scl(Some("SecPerSmp")).map(|m| m.code()), Some(2));
        assert_eq!(SampleMode::from_scl(Some("perMinute")), None);
    }

    #[test]
    fn test_functional_constraint_round_trip() {
        for fc in ["ST", "MX", "SP", "SG", "SE", "CO", "GO"] {
            assert_eq!(FunctionalConstraint::from_scl(fc).unwrap().as_str(), fc);
        }
        assert!(FunctionalConstraint::from_scl("XX").is_none());
    }

    #[test]
    fn test_default_phy_com_address() {
        let addr = PhyComAddress::default();
        assert_eq!(addr.vlan_priority, 4);
        assert_eq!(addr.mac, [0x01, 0x0c, 0xcd, 0x01, 0x00, 0x00]);
    }
}
