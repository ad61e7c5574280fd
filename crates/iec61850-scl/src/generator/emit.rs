// crates/iec61850-scl/src/generator/emit.rs

//! Text emission of the header and source files.
//!
//! Both files are assembled in memory with `std::fmt::Write`; nothing
//! touches the filesystem here.

use super::control_blocks::{write_control_blocks, write_data_sets};
use super::initializer::c_escape;
use super::naming::{ControlBlockTable, NamedNode, NodeId, NodeTable};
use crate::error::SclError;
use crate::lookup::ModelNode;
use crate::types::{DataAttribute, Diagnostic};
use log::warn;
use std::collections::HashSet;
use std::fmt::Write;

/// `static_model` becomes `STATIC_MODEL_H_`.
pub(super) fn header_guard(output_name: &str) -> String {
    let base = output_name.rsplit('/').next().unwrap_or(output_name);
    format!("{}_H_", base.to_uppercase().replace(['.', '-'], "_"))
}

fn write_banner(out: &mut String, file_name: &str, source_name: &str) -> Result<(), SclError> {
    writeln!(out, "/*")?;
    writeln!(out, " * {}", file_name)?;
    writeln!(out, " *")?;
    writeln!(out, " * automatically generated from {}", source_name)?;
    writeln!(out, " */")?;
    Ok(())
}

fn node_ref(table: &NodeTable<'_>, id: Option<NodeId>) -> String {
    match id {
        Some(id) => format!("(ModelNode*) &{}", table.symbol(id)),
        None => "NULL".to_string(),
    }
}

// --- Header ---

pub(super) struct HeaderContext<'a> {
    pub file_name: &'a str,
    pub source_name: &'a str,
    pub guard: &'a str,
    pub prefix: &'a str,
}

pub(super) fn write_header(
    ctx: &HeaderContext<'_>,
    table: &NodeTable<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String, SclError> {
    let mut out = String::new();
    write_banner(&mut out, ctx.file_name, ctx.source_name)?;
    out.push('\n');
    writeln!(out, "#ifndef {}", ctx.guard)?;
    writeln!(out, "#define {}\n", ctx.guard)?;
    writeln!(out, "#include <stdlib.h>")?;
    writeln!(out, "#include \"iec61850_model.h\"\n")?;

    writeln!(out, "extern IedModel {};", ctx.prefix)?;
    let mut declared = HashSet::new();
    for named in &table.nodes {
        if !declared.insert(named.symbol.as_str()) {
            let message = format!("symbol {} is declared twice", named.symbol);
            warn!("{}", message);
            diagnostics.push(Diagnostic::new(named.symbol.clone(), message));
            continue;
        }
        let kind = match named.node {
            ModelNode::LogicalDevice(_) => "LogicalDevice",
            ModelNode::LogicalNode(_) => "LogicalNode  ",
            ModelNode::DataObject(_) => "DataObject   ",
            ModelNode::DataAttribute(_) => "DataAttribute",
        };
        writeln!(out, "extern {} {};", kind, named.symbol)?;
    }

    out.push_str("\n\n\n");
    let upper_prefix = ctx.prefix.to_uppercase();
    for named in &table.nodes {
        let rest = named.symbol.strip_prefix(ctx.prefix).unwrap_or(&named.symbol);
        writeln!(out, "#define {}{} (&{})", upper_prefix, rest, named.symbol)?;
    }

    writeln!(out, "\n#endif /* {} */\n", ctx.guard)?;
    Ok(out)
}

// --- Source ---

pub(super) struct SourceContext<'a> {
    pub file_name: &'a str,
    pub header_file_name: &'a str,
    pub source_name: &'a str,
    pub prefix: &'a str,
    pub ied_name: &'a str,
    pub report_owner: bool,
}

pub(super) fn write_source(
    ctx: &SourceContext<'_>,
    nodes: &NodeTable<'_>,
    control_blocks: &ControlBlockTable<'_>,
    initializers: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String, SclError> {
    let mut out = String::new();
    write_banner(&mut out, ctx.file_name, ctx.source_name)?;
    writeln!(out, "#include \"{}\"\n", c_escape(ctx.header_file_name))?;
    writeln!(out, "static void initializeValues();")?;

    write_data_sets(&mut out, control_blocks)?;

    for named in &nodes.nodes {
        match named.node {
            ModelNode::LogicalDevice(ld) => {
                writeln!(out, "\nLogicalDevice {} = {{", named.symbol)?;
                writeln!(out, "    LogicalDeviceModelType,")?;
                writeln!(out, "    \"{}\",", c_escape(&ld.inst))?;
                writeln!(out, "    (ModelNode*) &{},", ctx.prefix)?;
                writeln!(out, "    {},", node_ref(nodes, named.next))?;
                writeln!(out, "    {}", node_ref(nodes, named.first_child))?;
                writeln!(out, "}};\n")?;
            }
            ModelNode::LogicalNode(ln) => {
                writeln!(out, "LogicalNode {} = {{", named.symbol)?;
                writeln!(out, "    LogicalNodeModelType,")?;
                writeln!(out, "    \"{}\",", c_escape(&ln.name()))?;
                writeln!(out, "    {},", node_ref(nodes, named.parent))?;
                writeln!(out, "    {},", node_ref(nodes, named.next))?;
                writeln!(out, "    {},", node_ref(nodes, named.first_child))?;
                writeln!(out, "}};\n")?;
            }
            ModelNode::DataObject(dobj) => {
                writeln!(out, "DataObject {} = {{", named.symbol)?;
                writeln!(out, "    DataObjectModelType,")?;
                writeln!(out, "    \"{}\",", c_escape(&dobj.name))?;
                writeln!(out, "    {},", node_ref(nodes, named.parent))?;
                writeln!(out, "    {},", node_ref(nodes, named.next))?;
                writeln!(out, "    {},", node_ref(nodes, named.first_child))?;
                writeln!(out, "    {}", dobj.count)?;
                writeln!(out, "}};\n")?;
            }
            ModelNode::DataAttribute(da) => {
                write_data_attribute(&mut out, nodes, named, da, diagnostics)?;
            }
        }
    }

    write_control_blocks(&mut out, control_blocks, ctx.report_owner)?;

    let first_ld = nodes.logical_devices.first().map(|&id| nodes.symbol(id));
    let first = |symbol: Option<&str>| match symbol {
        Some(s) => format!("&{}", s),
        None => "NULL".to_string(),
    };
    writeln!(out, "\nIedModel {} = {{", ctx.prefix)?;
    writeln!(out, "    \"{}\",", c_escape(ctx.ied_name))?;
    writeln!(out, "    {},", first(first_ld))?;
    writeln!(out, "    {},", first(control_blocks.data_sets.first().map(|d| d.symbol.as_str())))?;
    writeln!(out, "    {},", first(control_blocks.reports.first().map(|r| r.symbol.as_str())))?;
    writeln!(out, "    {},", first(control_blocks.gse.first().map(|g| g.symbol.as_str())))?;
    writeln!(out, "    {},", first(control_blocks.smv.first().map(|s| s.symbol.as_str())))?;
    writeln!(
        out,
        "    {},",
        first(control_blocks.setting_groups.first().map(|s| s.symbol.as_str()))
    )?;
    writeln!(
        out,
        "    {},",
        first(control_blocks.log_controls.first().map(|l| l.symbol.as_str()))
    )?;
    writeln!(out, "    {},", first(control_blocks.logs.first().map(|l| l.symbol.as_str())))?;
    writeln!(out, "    initializeValues}};")?;

    writeln!(out, "\nstatic void")?;
    writeln!(out, "initializeValues()")?;
    writeln!(out, "{{")?;
    out.push_str(initializers);
    writeln!(out, "}}")?;
    Ok(out)
}

fn write_data_attribute(
    out: &mut String,
    nodes: &NodeTable<'_>,
    named: &NamedNode<'_>,
    da: &DataAttribute,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), SclError> {
    writeln!(out, "DataAttribute {} = {{", named.symbol)?;
    writeln!(out, "    DataAttributeModelType,")?;
    writeln!(out, "    \"{}\",", c_escape(&da.name))?;
    writeln!(out, "    {},", node_ref(nodes, named.parent))?;
    writeln!(out, "    {},", node_ref(nodes, named.next))?;
    writeln!(out, "    {},", node_ref(nodes, named.first_child))?;
    writeln!(out, "    {},", da.count)?;
    writeln!(out, "    IEC61850_FC_{},", da.fc)?;
    writeln!(out, "    IEC61850_{},", da.attribute_type.c_name())?;

    out.push_str("    0");
    if da.trigger_options.dchg {
        out.push_str(" + TRG_OPT_DATA_CHANGED");
    }
    if da.trigger_options.dupd {
        out.push_str(" + TRG_OPT_DATA_UPDATE");
    }
    if da.trigger_options.qchg {
        out.push_str(" + TRG_OPT_QUALITY_CHANGED");
    }
    if named.transient {
        out.push_str(" + TRG_OPT_TRANSIENT");
    }
    out.push_str(",\n");

    writeln!(out, "    NULL,")?;
    writeln!(out, "    {}", short_address(named, da, diagnostics))?;
    writeln!(out, "}};\n")?;
    Ok(())
}

/// Numeric `sAddr` of an attribute. Anything that is not an unsigned
/// integer is emitted as 0.
fn short_address(named: &NamedNode<'_>, da: &DataAttribute, diagnostics: &mut Vec<Diagnostic>) -> u32 {
    let Some(s_addr) = da.short_address.as_deref().map(str::trim) else {
        return 0;
    };
    if s_addr.is_empty() {
        return 0;
    }
    match s_addr.parse::<u32>() {
        Ok(addr) => addr,
        Err(_) => {
            let message = format!("short address \"{}\" is not numeric", s_addr);
            warn!("{}: {}", named.symbol, message);
            diagnostics.push(Diagnostic::new(named.symbol.clone(), message));
            0
        }
    }
}
