// crates/iec61850-scl/src/resolver/control_blocks.rs

//! Resolves data sets and the control blocks declared in a logical node.

use super::{ResolutionContext, parse_u32_attribute};
use crate::error::SclError;
use crate::model::common::TrgOps;
use crate::model::ied as raw;
use crate::types::{
    ClientLnReference, DataSet, FcdaReference, FunctionalConstraint, GseControlBlock,
    LogControlBlock, LogDefinition, ReportControlBlock, ReportOptions, SampleMode,
    SettingGroupControlBlock, SvControlBlock, SvOptions, TriggerOptions,
};

const DEFAULT_LOG_NAME: &str = "GeneralLog";

pub(super) fn resolve_data_set(ds: &raw::DataSet, ln_path: &str) -> Result<DataSet, SclError> {
    let element = format!("{}.{}", ln_path, ds.name);
    let members = ds
        .fcdas
        .iter()
        .map(|fcda| {
            Ok(FcdaReference {
                ld_inst: fcda.ld_inst.clone(),
                prefix: fcda.prefix.clone(),
                ln_class: fcda.ln_class.clone(),
                ln_inst: fcda.ln_inst.clone(),
                do_name: fcda.do_name.clone(),
                da_name: fcda.da_name.clone().filter(|n| !n.is_empty()),
                fc: FunctionalConstraint::from_scl(&fcda.fc).ok_or_else(|| {
                    SclError::InvalidAttributeFormat {
                        element: element.clone(),
                        attribute: "fc",
                        value: fcda.fc.clone(),
                    }
                })?,
            })
        })
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(DataSet {
        name: ds.name.clone(),
        desc: ds.desc.clone(),
        members,
    })
}

/// Converts the raw `TrgOps`, defaulting to general interrogation only.
fn trigger_options(trg_ops: Option<&TrgOps>) -> TriggerOptions {
    match trg_ops {
        Some(t) => TriggerOptions {
            dchg: t.dchg,
            qchg: t.qchg,
            dupd: t.dupd,
            period: t.period,
            gi: t.gi,
        },
        None => TriggerOptions::general_interrogation(),
    }
}

pub(super) fn resolve_report_control(
    rc: &raw::ReportControl,
    ln_path: &str,
) -> Result<ReportControlBlock, SclError> {
    let element = format!("{}.{}", ln_path, rc.name);

    let max_instances = parse_u32_attribute(
        rc.rpt_enabled.as_ref().and_then(|r| r.max.as_deref()),
        1,
        &element,
        "max",
    )?;
    if !rc.indexed && max_instances != 1 {
        return Err(SclError::ValidationError(format!(
            "{}: RptEnabled max must be 1 for a non-indexed report control block (found {})",
            element, max_instances
        )));
    }

    let options = match &rc.opt_fields {
        Some(o) => ReportOptions {
            seq_num: o.seq_num,
            time_stamp: o.time_stamp,
            reason_code: o.reason_code,
            data_set: o.data_set,
            data_ref: o.data_ref,
            buf_ovfl: o.buf_ovfl,
            entry_id: o.entry_id,
            config_ref: o.config_ref,
        },
        None => ReportOptions {
            buf_ovfl: true,
            ..Default::default()
        },
    };

    let clients = rc
        .rpt_enabled
        .iter()
        .flat_map(|r| r.client_lns.iter())
        .map(|c| ClientLnReference {
            ied_name: c.ied_name.clone(),
            ap_ref: c.ap_ref.clone(),
            ld_inst: c.ld_inst.clone(),
            prefix: c.prefix.clone(),
            ln_class: c.ln_class.clone(),
            ln_inst: c.ln_inst.clone(),
        })
        .collect();

    Ok(ReportControlBlock {
        name: rc.name.clone(),
        desc: rc.desc.clone(),
        data_set: rc.dat_set.clone(),
        report_id: rc.rpt_id.clone(),
        conf_rev: parse_u32_attribute(rc.conf_rev.as_deref(), 0, &element, "confRev")?,
        buffered: rc.buffered,
        buf_time: parse_u32_attribute(rc.buf_time.as_deref(), 0, &element, "bufTime")?,
        intg_pd: parse_u32_attribute(rc.intg_pd.as_deref(), 0, &element, "intgPd")?,
        indexed: rc.indexed,
        max_instances,
        trigger_options: trigger_options(rc.trg_ops.as_ref()),
        options,
        clients,
    })
}

pub(super) fn resolve_gse_control(
    gc: &raw::GseControl,
    ln_path: &str,
) -> Result<GseControlBlock, SclError> {
    let element = format!("{}.{}", ln_path, gc.name);
    match gc.gse_type.as_deref() {
        None | Some("") | Some("GOOSE") => {}
        Some(other) => {
            return Err(SclError::InvalidAttributeFormat {
                element,
                attribute: "type",
                value: other.to_string(),
            });
        }
    }

    Ok(GseControlBlock {
        name: gc.name.clone(),
        desc: gc.desc.clone(),
        data_set: gc.dat_set.clone(),
        app_id: gc.app_id.clone(),
        conf_rev: parse_u32_attribute(gc.conf_rev.as_deref(), 0, &element, "confRev")?,
        fixed_offs: gc.fixed_offs,
    })
}

pub(super) fn resolve_sv_control(
    sv: &raw::SampledValueControl,
    ln_path: &str,
) -> Result<SvControlBlock, SclError> {
    let element = format!("{}.{}", ln_path, sv.name);
    let smp_mod = SampleMode::from_scl(sv.smp_mod.as_deref()).ok_or_else(|| {
        SclError::InvalidAttributeFormat {
            element: element.clone(),
            attribute: "smpMod",
            value: sv.smp_mod.clone().unwrap_or_default(),
        }
    })?;

    let options = sv
        .smv_opts
        .as_ref()
        .map(|o| SvOptions {
            refresh_time: o.refresh_time,
            sample_synchronized: o.sample_synchronized,
            sample_rate: o.sample_rate,
            data_set: o.data_set,
            security: o.security,
        })
        .unwrap_or_default();

    Ok(SvControlBlock {
        name: sv.name.clone(),
        desc: sv.desc.clone(),
        data_set: sv.dat_set.clone(),
        smv_id: sv.smv_id.clone(),
        conf_rev: parse_u32_attribute(sv.conf_rev.as_deref(), 0, &element, "confRev")?,
        multicast: sv.multicast,
        smp_rate: parse_u32_attribute(sv.smp_rate.as_deref(), 0, &element, "smpRate")?,
        nof_asdu: parse_u32_attribute(sv.nof_asdu.as_deref(), 0, &element, "nofASDU")?,
        smp_mod,
        options,
    })
}

pub(super) fn resolve_log_control(
    lc: &raw::LogControl,
    ln_path: &str,
) -> Result<LogControlBlock, SclError> {
    let element = format!("{}.{}", ln_path, lc.name);
    Ok(LogControlBlock {
        name: lc.name.clone(),
        desc: lc.desc.clone(),
        data_set: lc.dat_set.clone(),
        ld_inst: lc.ld_inst.clone().filter(|s| !s.is_empty()),
        prefix: lc.prefix.clone(),
        ln_class: lc.ln_class.clone().filter(|s| !s.is_empty()),
        ln_inst: lc.ln_inst.clone(),
        log_name: lc.log_name.clone(),
        intg_pd: parse_u32_attribute(lc.intg_pd.as_deref(), 0, &element, "intgPd")?,
        log_ena: lc.log_ena,
        reason_code: lc.reason_code,
        trigger_options: trigger_options(lc.trg_ops.as_ref()),
    })
}

pub(super) fn resolve_log(log: &raw::Log) -> LogDefinition {
    LogDefinition {
        name: log
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_NAME.to_string()),
        desc: log.desc.clone(),
    }
}

/// Resolves the setting group control of a logical node. Only `LLN0` may
/// carry one; only the first declaration is used.
pub(super) fn resolve_setting_control(
    ctx: &mut ResolutionContext<'_>,
    controls: &[raw::SettingControl],
    is_lln0: bool,
    ln_path: &str,
) -> Result<Option<SettingGroupControlBlock>, SclError> {
    let Some(first) = controls.first() else {
        return Ok(None);
    };
    if !is_lln0 {
        return Err(SclError::ValidationError(format!(
            "{}: SettingControl is only allowed in LLN0",
            ln_path
        )));
    }
    if controls.len() > 1 {
        ctx.warn(
            ln_path,
            format!(
                "{} SettingControl elements declared, only the first is used",
                controls.len()
            ),
        );
    }

    let element = format!("{}.SettingControl", ln_path);
    let num_of_sgs = parse_u32_attribute(Some(&first.num_of_sgs), 0, &element, "numOfSGs")?;
    if num_of_sgs == 0 {
        return Err(SclError::InvalidAttributeFormat {
            element,
            attribute: "numOfSGs",
            value: first.num_of_sgs.clone(),
        });
    }
    Ok(Some(SettingGroupControlBlock {
        num_of_sgs,
        act_sg: parse_u32_attribute(first.act_sg.as_deref(), 1, &element, "actSG")?,
    }))
}
