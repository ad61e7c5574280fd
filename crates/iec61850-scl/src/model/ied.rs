// crates/iec61850-scl/src/model/ied.rs

//! Contains model structs for the `<IED>` section: access points, logical
//! devices, logical nodes and the control blocks declared inside them.

use super::common::{TrgOps, Val, bool_true};
use serde::Deserialize;

/// Represents `<IED name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct Ied {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@type", default)]
    pub ied_type: Option<String>,
    #[serde(rename = "@manufacturer", default)]
    pub manufacturer: Option<String>,
    #[serde(rename = "@configVersion", default)]
    pub config_version: Option<String>,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "Services", default)]
    pub services: Option<Services>,

    #[serde(rename = "AccessPoint", default)]
    pub access_points: Vec<AccessPoint>,
}

/// Represents `<Services>`. Only the report settings affect the generated model.
#[derive(Debug, Deserialize, Default)]
pub struct Services {
    #[serde(rename = "ReportSettings", default)]
    pub report_settings: Option<ReportSettings>,
}

/// Represents `<ReportSettings owner="true" ..>`.
#[derive(Debug, Deserialize, Default)]
pub struct ReportSettings {
    #[serde(rename = "@owner", default)]
    pub owner: bool,
}

/// Represents `<AccessPoint name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct AccessPoint {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "Server", default)]
    pub server: Option<Server>,
}

/// Represents `<Server>`.
#[derive(Debug, Deserialize, Default)]
pub struct Server {
    #[serde(rename = "LDevice", default)]
    pub logical_devices: Vec<LDevice>,
}

/// Represents `<LDevice inst="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct LDevice {
    #[serde(rename = "@inst")]
    pub inst: String,
    #[serde(rename = "@ldName", default)]
    pub ld_name: Option<String>,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "LN0", default)]
    pub ln0: Option<LogicalNode>,

    #[serde(rename = "LN", default)]
    pub logical_nodes: Vec<LogicalNode>,
}

/// Represents both `<LN0>` and `<LN>`.
///
/// `GSEControl`, `SampledValueControl` and `SettingControl` are only valid
/// on `LN0`; the resolver rejects a `SettingControl` anywhere else.
#[derive(Debug, Deserialize, Default)]
pub struct LogicalNode {
    #[serde(rename = "@lnClass")]
    pub ln_class: String,
    #[serde(rename = "@lnType")]
    pub ln_type: String,
    #[serde(rename = "@inst", default)]
    pub inst: String,
    #[serde(rename = "@prefix", default)]
    pub prefix: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "DataSet", default)]
    pub data_sets: Vec<DataSet>,

    #[serde(rename = "ReportControl", default)]
    pub report_controls: Vec<ReportControl>,

    #[serde(rename = "LogControl", default)]
    pub log_controls: Vec<LogControl>,

    #[serde(rename = "DOI", default)]
    pub dois: Vec<Doi>,

    #[serde(rename = "Log", default)]
    pub logs: Vec<Log>,

    #[serde(rename = "GSEControl", default)]
    pub gse_controls: Vec<GseControl>,

    #[serde(rename = "SampledValueControl", default)]
    pub sv_controls: Vec<SampledValueControl>,

    #[serde(rename = "SettingControl", default)]
    pub setting_controls: Vec<SettingControl>,
}

// --- Data sets ---

/// Represents `<DataSet name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct DataSet {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,

    #[serde(rename = "FCDA", default)]
    pub fcdas: Vec<Fcda>,
}

/// Represents `<FCDA ldInst=".." lnClass=".." doName=".." fc=".."/>`.
#[derive(Debug, Deserialize, Default)]
pub struct Fcda {
    #[serde(rename = "@ldInst", default)]
    pub ld_inst: String,
    #[serde(rename = "@prefix", default)]
    pub prefix: String,
    #[serde(rename = "@lnClass", default)]
    pub ln_class: String,
    #[serde(rename = "@lnInst", default)]
    pub ln_inst: String,
    #[serde(rename = "@doName", default)]
    pub do_name: String,
    #[serde(rename = "@daName", default)]
    pub da_name: Option<String>,
    #[serde(rename = "@fc")]
    pub fc: String,
}

// --- Control blocks ---

/// Represents `<ReportControl name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct ReportControl {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,
    #[serde(rename = "@rptID", default)]
    pub rpt_id: Option<String>,
    #[serde(rename = "@confRev", default)]
    pub conf_rev: Option<String>,
    #[serde(rename = "@buffered", default)]
    pub buffered: bool,
    #[serde(rename = "@bufTime", default)]
    pub buf_time: Option<String>,
    #[serde(rename = "@intgPd", default)]
    pub intg_pd: Option<String>,
    #[serde(rename = "@indexed", default = "bool_true")]
    pub indexed: bool,

    #[serde(rename = "TrgOps", default)]
    pub trg_ops: Option<TrgOps>,

    #[serde(rename = "OptFields", default)]
    pub opt_fields: Option<OptFields>,

    #[serde(rename = "RptEnabled", default)]
    pub rpt_enabled: Option<RptEnabled>,
}

/// Represents `<OptFields seqNum="true" ..>`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct OptFields {
    #[serde(rename = "@seqNum", default)]
    pub seq_num: bool,
    #[serde(rename = "@timeStamp", default)]
    pub time_stamp: bool,
    #[serde(rename = "@reasonCode", default)]
    pub reason_code: bool,
    #[serde(rename = "@dataSet", default)]
    pub data_set: bool,
    #[serde(rename = "@dataRef", default)]
    pub data_ref: bool,
    #[serde(rename = "@bufOvfl", default)]
    pub buf_ovfl: bool,
    #[serde(rename = "@entryID", default)]
    pub entry_id: bool,
    #[serde(rename = "@configRef", default)]
    pub config_ref: bool,
}

/// Represents `<RptEnabled max="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct RptEnabled {
    #[serde(rename = "@max", default)]
    pub max: Option<String>,

    #[serde(rename = "ClientLN", default)]
    pub client_lns: Vec<ClientLn>,
}

/// Represents `<ClientLN iedName=".." apRef=".." ..>`.
#[derive(Debug, Deserialize, Default)]
pub struct ClientLn {
    #[serde(rename = "@iedName")]
    pub ied_name: String,
    #[serde(rename = "@apRef", default)]
    pub ap_ref: Option<String>,
    #[serde(rename = "@ldInst", default)]
    pub ld_inst: String,
    #[serde(rename = "@prefix", default)]
    pub prefix: String,
    #[serde(rename = "@lnClass", default)]
    pub ln_class: String,
    #[serde(rename = "@lnInst", default)]
    pub ln_inst: String,
}

/// Represents `<GSEControl name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct GseControl {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,
    #[serde(rename = "@confRev", default)]
    pub conf_rev: Option<String>,
    #[serde(rename = "@type", default)]
    pub gse_type: Option<String>,
    #[serde(rename = "@appID", default)]
    pub app_id: Option<String>,
    #[serde(rename = "@fixedOffs", default)]
    pub fixed_offs: bool,
}

/// Represents `<SampledValueControl name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct SampledValueControl {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,
    #[serde(rename = "@confRev", default)]
    pub conf_rev: Option<String>,
    #[serde(rename = "@smvID", default)]
    pub smv_id: Option<String>,
    #[serde(rename = "@multicast", default = "bool_true")]
    pub multicast: bool,
    #[serde(rename = "@smpRate", default)]
    pub smp_rate: Option<String>,
    #[serde(rename = "@nofASDU", default)]
    pub nof_asdu: Option<String>,
    #[serde(rename = "@smpMod", default)]
    pub smp_mod: Option<String>,

    #[serde(rename = "SmvOpts", default)]
    pub smv_opts: Option<SmvOpts>,
}

/// Represents `<SmvOpts refreshTime="true" ..>`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SmvOpts {
    #[serde(rename = "@refreshTime", default)]
    pub refresh_time: bool,
    #[serde(rename = "@sampleSynchronized", default)]
    pub sample_synchronized: bool,
    #[serde(rename = "@sampleRate", default)]
    pub sample_rate: bool,
    #[serde(rename = "@dataSet", default)]
    pub data_set: bool,
    #[serde(rename = "@security", default)]
    pub security: bool,
}

/// Represents `<LogControl name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct LogControl {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
    #[serde(rename = "@datSet", default)]
    pub dat_set: Option<String>,
    #[serde(rename = "@intgPd", default)]
    pub intg_pd: Option<String>,
    #[serde(rename = "@ldInst", default)]
    pub ld_inst: Option<String>,
    #[serde(rename = "@prefix", default)]
    pub prefix: String,
    #[serde(rename = "@lnClass", default)]
    pub ln_class: Option<String>,
    #[serde(rename = "@lnInst", default)]
    pub ln_inst: String,
    #[serde(rename = "@logName", default)]
    pub log_name: Option<String>,
    #[serde(rename = "@logEna", default = "bool_true")]
    pub log_ena: bool,
    #[serde(rename = "@reasonCode", default = "bool_true")]
    pub reason_code: bool,

    #[serde(rename = "TrgOps", default)]
    pub trg_ops: Option<TrgOps>,
}

/// Represents `<Log name=".."/>`.
#[derive(Debug, Deserialize, Default)]
pub struct Log {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
}

/// Represents `<SettingControl numOfSGs=".." actSG=".."/>`.
#[derive(Debug, Deserialize, Default)]
pub struct SettingControl {
    #[serde(rename = "@numOfSGs")]
    pub num_of_sgs: String,
    #[serde(rename = "@actSG", default)]
    pub act_sg: Option<String>,
}

// --- Instance overrides ---

/// Represents `<DOI name="..">` and the nested `<SDI name="..">`.
#[derive(Debug, Deserialize, Default)]
pub struct Doi {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "SDI", default)]
    pub sdis: Vec<Doi>,

    #[serde(rename = "DAI", default)]
    pub dais: Vec<Dai>,
}

/// Represents `<DAI name=".." sAddr=".."><Val>..</Val></DAI>`.
#[derive(Debug, Deserialize, Default)]
pub struct Dai {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@sAddr", default)]
    pub s_addr: Option<String>,

    #[serde(rename = "Val", default)]
    pub values: Vec<Val>,
}
