// crates/iec61850-scl/src/generator/initializer.rs

//! Builds the body of the generated `initializeValues()` function.

use super::naming::NodeTable;
use crate::error::SclError;
use crate::lookup::ModelNode;
use crate::types::{AttributeType, Diagnostic, DataAttribute};
use crate::values::DataModelValue;
use log::warn;
use std::fmt::Write;

/// Returns one assignment block per data attribute carrying a value, in
/// pre-order.
pub(super) fn write_initializers(
    table: &NodeTable<'_>,
    initialize_once: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String, SclError> {
    let mut out = String::new();
    for named in &table.nodes {
        let ModelNode::DataAttribute(da) = named.node else {
            continue;
        };
        let Some(value) = &da.value else {
            continue;
        };
        let Some(statements) = value_statements(&named.symbol, da, value)? else {
            let message = format!(
                "value {:?} cannot initialize an attribute of type {}",
                value, da.attribute_type
            );
            warn!("{}: {}", named.symbol, message);
            diagnostics.push(Diagnostic::new(named.symbol.clone(), message));
            continue;
        };

        out.push('\n');
        if initialize_once {
            writeln!(out, "if ({}.mmsValue == NULL) {{", named.symbol)?;
        }
        out.push_str(&statements);
        if initialize_once {
            out.push_str("}\n");
        }
    }
    Ok(out)
}

/// C statements assigning `value` to `<symbol>.mmsValue`, or `None` when
/// the value does not fit the attribute type.
fn value_statements(
    symbol: &str,
    da: &DataAttribute,
    value: &DataModelValue,
) -> Result<Option<String>, SclError> {
    let mut out = String::new();
    let t = da.attribute_type;
    match value {
        DataModelValue::Ordinal(ord) if t == AttributeType::Enumerated => {
            writeln!(out, "{}.mmsValue = MmsValue_newIntegerFromInt32({});", symbol, ord)?;
        }
        DataModelValue::Ordinal(ord) if t == AttributeType::CodedEnum => {
            writeln!(out, "{}.mmsValue = MmsValue_newBitString(2);", symbol)?;
            writeln!(
                out,
                "MmsValue_setBitStringFromIntegerBigEndian({}.mmsValue, {});",
                symbol, ord
            )?;
        }
        DataModelValue::Integer(v) if matches!(t, AttributeType::Int64 | AttributeType::Int128) => {
            writeln!(out, "{}.mmsValue = MmsValue_newIntegerFromInt64({});", symbol, v)?;
        }
        DataModelValue::Integer(v) if t.is_signed_integer() => {
            writeln!(out, "{}.mmsValue = MmsValue_newIntegerFromInt32({});", symbol, v)?;
        }
        DataModelValue::Unsigned(v) if t.is_unsigned_integer() => {
            writeln!(out, "{}.mmsValue = MmsValue_newUnsignedFromUint32({});", symbol, v)?;
        }
        DataModelValue::Boolean(b) if t == AttributeType::Boolean => {
            writeln!(out, "{}.mmsValue = MmsValue_newBoolean({});", symbol, b)?;
        }
        DataModelValue::Float32(v) if t == AttributeType::Float32 => {
            writeln!(out, "{}.mmsValue = MmsValue_newFloat({:?});", symbol, v)?;
        }
        DataModelValue::Float64(v) if t == AttributeType::Float64 => {
            writeln!(out, "{}.mmsValue = MmsValue_newDouble({:?});", symbol, v)?;
        }
        DataModelValue::Text(s) if t == AttributeType::UnicodeString255 => {
            writeln!(out, "{}.mmsValue = MmsValue_newMmsString(\"{}\");", symbol, c_escape(s))?;
        }
        DataModelValue::Text(s) if t.is_visible_string() || t == AttributeType::Currency => {
            writeln!(
                out,
                "{}.mmsValue = MmsValue_newVisibleString(\"{}\");",
                symbol,
                c_escape(s)
            )?;
        }
        DataModelValue::Bytes(bytes) if t == AttributeType::OctetString64 => {
            writeln!(out, "{}.mmsValue = MmsValue_newOctetString(0, 64);", symbol)?;
            if !bytes.is_empty() {
                let octets: Vec<String> = bytes.iter().map(|b| format!("0x{:02X}", b)).collect();
                writeln!(out, "uint8_t {}__val[] = {{{}}};", symbol, octets.join(", "))?;
                writeln!(
                    out,
                    "MmsValue_setOctetString({0}.mmsValue, {0}__val, {1});",
                    symbol,
                    bytes.len()
                )?;
            }
        }
        DataModelValue::EpochMillis(ms) if t == AttributeType::Timestamp => {
            writeln!(out, "{}.mmsValue = MmsValue_newUtcTimeByMsTime({});", symbol, ms)?;
        }
        DataModelValue::EpochMillis(ms) if t == AttributeType::EntryTime => {
            writeln!(out, "{}.mmsValue = MmsValue_newBinaryTime(false);", symbol)?;
            writeln!(out, "MmsValue_setBinaryTime({}.mmsValue, {});", symbol, ms)?;
        }
        _ => return Ok(None),
    }
    Ok(Some(out))
}

/// Escapes a string for use inside a C string literal.
pub(super) fn c_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
