// crates/iec61850-scl/src/generator/control_blocks.rs

//! Emits data sets and control block definitions.

use super::initializer::c_escape;
use super::naming::{ControlBlockTable, NamedDataSet};
use crate::error::SclError;
use crate::types::{FcdaReference, PhyComAddress};
use std::fmt::Write;

/// Link to element `i + 1` of a family, or `NULL` for the last one.
fn next_ref<T>(items: &[T], i: usize, symbol: impl Fn(&T) -> &str) -> String {
    items
        .get(i + 1)
        .map(|next| format!("&{}", symbol(next)))
        .unwrap_or_else(|| "NULL".to_string())
}

fn quoted_or_null(value: Option<&str>) -> String {
    value
        .map(|v| format!("\"{}\"", c_escape(v)))
        .unwrap_or_else(|| "NULL".to_string())
}

/// MMS variable name of a data set member, split into the variable name,
/// the array index (-1 if none) and the component below the array element.
pub(super) fn fcda_variable(fcda: &FcdaReference) -> (String, i32, Option<String>) {
    let mut name = format!(
        "{}{}{}${}${}",
        fcda.prefix,
        fcda.ln_class,
        fcda.ln_inst,
        fcda.fc,
        fcda.do_name.replace('.', "$")
    );
    if let Some(da_name) = &fcda.da_name {
        name.push('$');
        name.push_str(&da_name.replace('.', "$"));
    }

    let Some(start) = name.find('(') else {
        return (name, -1, None);
    };
    let Some(end) = name[start..].find(')').map(|e| start + e) else {
        return (name, -1, None);
    };
    let index = name[start + 1..end].trim().parse::<i32>().unwrap_or(-1);
    let component = name[end + 1..].trim_start_matches('$');
    let component = (!component.is_empty()).then(|| component.to_string());
    name.truncate(start);
    (name, index, component)
}

pub(super) fn write_data_sets(out: &mut String, table: &ControlBlockTable<'_>) -> Result<(), SclError> {
    let data_sets = &table.data_sets;
    for ds in data_sets {
        writeln!(out, "extern DataSet {};", ds.symbol)?;
    }
    out.push('\n');

    for (i, ds) in data_sets.iter().enumerate() {
        write_data_set(out, ds, &next_ref(data_sets, i, |d| d.symbol.as_str()))?;
    }
    Ok(())
}

fn write_data_set(out: &mut String, ds: &NamedDataSet<'_>, next: &str) -> Result<(), SclError> {
    let members = &ds.data_set.members;
    let entry_symbol = |i: usize| format!("{}_fcda{}", ds.symbol, i);

    out.push('\n');
    for i in 0..members.len() {
        writeln!(out, "extern DataSetEntry {};", entry_symbol(i))?;
    }
    out.push('\n');

    for (i, fcda) in members.iter().enumerate() {
        let (variable, index, component) = fcda_variable(fcda);
        let next_entry = if i + 1 < members.len() {
            format!("&{}", entry_symbol(i + 1))
        } else {
            "NULL".to_string()
        };
        writeln!(out, "DataSetEntry {} = {{", entry_symbol(i))?;
        writeln!(out, "  \"{}\",", c_escape(&fcda.ld_inst))?;
        writeln!(out, "  false,")?;
        writeln!(out, "  \"{}\", ", c_escape(&variable))?;
        writeln!(out, "  {},", index)?;
        writeln!(out, "  {},", quoted_or_null(component.as_deref()))?;
        writeln!(out, "  NULL,")?;
        writeln!(out, "  {}", next_entry)?;
        writeln!(out, "}};\n")?;
    }

    let first_entry = if members.is_empty() {
        "NULL".to_string()
    } else {
        format!("&{}", entry_symbol(0))
    };
    writeln!(out, "DataSet {} = {{", ds.symbol)?;
    writeln!(out, "  \"{}\",", c_escape(&ds.ld_inst))?;
    writeln!(
        out,
        "  \"{}${}\",",
        c_escape(&ds.ln_name),
        c_escape(&ds.data_set.name)
    )?;
    writeln!(out, "  {},", members.len())?;
    writeln!(out, "  {},", first_entry)?;
    writeln!(out, "  {}", next)?;
    writeln!(out, "}};")?;
    Ok(())
}

/// Writes every control block family in the order reports, sampled values,
/// GOOSE, setting groups, log controls, logs.
pub(super) fn write_control_blocks(
    out: &mut String,
    table: &ControlBlockTable<'_>,
    report_owner: bool,
) -> Result<(), SclError> {
    write_reports(out, table, report_owner)?;
    write_sampled_values(out, table)?;
    write_gse(out, table)?;
    write_setting_groups(out, table)?;
    write_log_controls(out, table)?;
    write_logs(out, table)?;
    Ok(())
}

fn write_reports(out: &mut String, table: &ControlBlockTable<'_>, report_owner: bool) -> Result<(), SclError> {
    let reports = &table.reports;
    for r in reports {
        writeln!(out, "extern ReportControlBlock {};", r.symbol)?;
    }
    out.push('\n');

    for (i, r) in reports.iter().enumerate() {
        let rcb = r.rcb;
        let mut trg_ops = rcb.trigger_options.bits() as u32;
        if report_owner {
            trg_ops += 64;
        }
        let client: Vec<String> = r.client_address.iter().map(|b| format!("0x{:02X}", b)).collect();
        writeln!(
            out,
            "ReportControlBlock {} = {{&{}, \"{}\", {}, {}, {}, {}, {}, {}, {}, {}, {{{}}}, {}}};",
            r.symbol,
            r.ln_symbol,
            c_escape(&r.name),
            quoted_or_null(rcb.report_id.as_deref()),
            rcb.buffered,
            quoted_or_null(rcb.data_set.as_deref()),
            rcb.conf_rev,
            trg_ops,
            rcb.options.bits(),
            rcb.buf_time,
            rcb.intg_pd,
            client.join(", "),
            next_ref(reports, i, |r| r.symbol.as_str())
        )?;
    }
    out.push('\n');
    Ok(())
}

fn write_phy_com_address(out: &mut String, symbol: &str, address: &PhyComAddress) -> Result<(), SclError> {
    let mac: Vec<String> = address.mac.iter().map(|b| format!("{:#x}", b)).collect();
    writeln!(out, "\nstatic PhyComAddress {} = {{", symbol)?;
    writeln!(out, "  {},", address.vlan_priority)?;
    writeln!(out, "  {},", address.vlan_id)?;
    writeln!(out, "  {},", address.app_id)?;
    writeln!(out, "  {{{}}}", mac.join(", "))?;
    writeln!(out, "}};\n")?;
    Ok(())
}

fn write_sampled_values(out: &mut String, table: &ControlBlockTable<'_>) -> Result<(), SclError> {
    let smv = &table.smv;
    for s in smv {
        writeln!(out, "extern SVControlBlock {};", s.symbol)?;
    }
    out.push('\n');

    for (i, s) in smv.iter().enumerate() {
        let svcb = s.svcb;
        let address = match &s.address {
            Some(address) => {
                let symbol = format!("{}_address", s.symbol);
                write_phy_com_address(out, &symbol, address)?;
                format!("&{}", symbol)
            }
            None => "NULL".to_string(),
        };
        writeln!(
            out,
            "SVControlBlock {} = {{&{}, \"{}\", {}, {}, {}, {}, {}, {}, {}, {}, {}, {}}};",
            s.symbol,
            s.ln_symbol,
            c_escape(&svcb.name),
            quoted_or_null(svcb.smv_id.as_deref()),
            quoted_or_null(svcb.data_set.as_deref()),
            svcb.options.bits(),
            svcb.smp_mod.code(),
            svcb.smp_rate,
            svcb.conf_rev,
            address,
            !svcb.multicast,
            svcb.nof_asdu,
            next_ref(smv, i, |s| s.symbol.as_str())
        )?;
    }
    out.push('\n');
    Ok(())
}

fn write_gse(out: &mut String, table: &ControlBlockTable<'_>) -> Result<(), SclError> {
    let gse = &table.gse;
    for g in gse {
        writeln!(out, "extern GSEControlBlock {};", g.symbol)?;
    }
    out.push('\n');

    for (i, g) in gse.iter().enumerate() {
        let gcb = g.gcb;
        let address = match g.endpoint.and_then(|e| e.address.as_ref()) {
            Some(address) => {
                let symbol = format!("{}_address", g.symbol);
                write_phy_com_address(out, &symbol, address)?;
                format!("&{}", symbol)
            }
            None => "NULL".to_string(),
        };
        let (min_time, max_time) = g
            .endpoint
            .map(|e| (e.min_time, e.max_time))
            .unwrap_or((-1, -1));
        writeln!(
            out,
            "GSEControlBlock {} = {{&{}, \"{}\", {}, {}, {}, {}, {}, {}, {}, {}}};",
            g.symbol,
            g.ln_symbol,
            c_escape(&gcb.name),
            quoted_or_null(gcb.app_id.as_deref()),
            quoted_or_null(gcb.data_set.as_deref()),
            gcb.conf_rev,
            gcb.fixed_offs,
            address,
            min_time,
            max_time,
            next_ref(gse, i, |g| g.symbol.as_str())
        )?;
    }
    out.push('\n');
    Ok(())
}

fn write_setting_groups(out: &mut String, table: &ControlBlockTable<'_>) -> Result<(), SclError> {
    let groups = &table.setting_groups;
    for sg in groups {
        writeln!(out, "extern SettingGroupControlBlock {};", sg.symbol)?;
    }

    for (i, sg) in groups.iter().enumerate() {
        writeln!(
            out,
            "\nSettingGroupControlBlock {} = {{&{}, {}, {}, 0, false, 0, 0, {}}};",
            sg.symbol,
            sg.ln_symbol,
            sg.sgcb.act_sg,
            sg.sgcb.num_of_sgs,
            next_ref(groups, i, |s| s.symbol.as_str())
        )?;
    }
    out.push('\n');
    Ok(())
}

fn write_log_controls(out: &mut String, table: &ControlBlockTable<'_>) -> Result<(), SclError> {
    let lcbs = &table.log_controls;
    for l in lcbs {
        writeln!(out, "extern LogControlBlock {};", l.symbol)?;
    }
    out.push('\n');

    for (i, l) in lcbs.iter().enumerate() {
        let lcb = l.lcb;
        // General interrogation does not apply to logs.
        let trg_ops = lcb.trigger_options.bits() & !16;
        writeln!(
            out,
            "LogControlBlock {} = {{&{}, \"{}\", {}, {}, {}, {}, {}, {}, {}}};",
            l.symbol,
            l.ln_symbol,
            c_escape(&lcb.name),
            quoted_or_null(lcb.data_set.as_deref()),
            quoted_or_null(l.log_ref.as_deref()),
            trg_ops,
            lcb.intg_pd,
            lcb.log_ena,
            lcb.reason_code,
            next_ref(lcbs, i, |l| l.symbol.as_str())
        )?;
    }
    out.push('\n');
    Ok(())
}

fn write_logs(out: &mut String, table: &ControlBlockTable<'_>) -> Result<(), SclError> {
    let logs = &table.logs;
    for l in logs {
        writeln!(out, "extern Log {};", l.symbol)?;
    }
    out.push('\n');

    for (i, l) in logs.iter().enumerate() {
        writeln!(
            out,
            "Log {} = {{&{}, \"{}\", {}}};",
            l.symbol,
            l.ln_symbol,
            c_escape(&l.log.name),
            next_ref(logs, i, |l| l.symbol.as_str())
        )?;
    }
    out.push('\n');
    Ok(())
}
