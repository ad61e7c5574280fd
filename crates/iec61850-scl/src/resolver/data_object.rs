// crates/iec61850-scl/src/resolver/data_object.rs

//! Instantiates data objects and data attributes from their templates.

use super::{ResolutionContext, parse_u32_attribute};
use crate::error::SclError;
use crate::model::common::first_value;
use crate::model::templates::{DaDefinition, DoDefinition};
use crate::types::{AttributeType, DataAttribute, DataObject, FunctionalConstraint, TriggerOptions};
use crate::values::DataModelValue;

/// Builds a data object (and its whole subtree) from a `DO`/`SDO` definition.
///
/// `path` names the parent element, e.g. `LD0/GGIO1`.
pub(super) fn instantiate_data_object(
    ctx: &mut ResolutionContext<'_>,
    def: &DoDefinition,
    path: &str,
) -> Result<DataObject, SclError> {
    let path = format!("{}.{}", path, def.name);
    let registry = ctx.registry;

    ctx.enter(&def.type_id)?;
    let do_type = registry.data_object_type(&def.type_id, &path)?;

    let sub_data_objects = do_type
        .sub_data_objects
        .iter()
        .map(|sdo| instantiate_data_object(ctx, sdo, &path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut data_attributes = Vec::new();
    for da in &do_type.data_attributes {
        add_data_attribute(ctx, &mut data_attributes, da, None, None, &path)?;
    }
    ctx.leave();

    Ok(DataObject {
        name: def.name.clone(),
        type_id: def.type_id.clone(),
        count: parse_u32_attribute(def.count.as_deref(), 0, &path, "count")?,
        transient: def.transient,
        sub_data_objects,
        data_attributes,
    })
}

/// Instantiates a `DA`/`BDA` definition and adds it to `siblings`.
///
/// `inherited_fc` and `inherited_trg` are set for `BDA`s, which take the
/// functional constraint and trigger options of the enclosing attribute.
/// A top-level attribute with `fc="SE"` is added twice: first as an `SG`
/// copy, then as itself.
fn add_data_attribute(
    ctx: &mut ResolutionContext<'_>,
    siblings: &mut Vec<DataAttribute>,
    def: &DaDefinition,
    inherited_fc: Option<FunctionalConstraint>,
    inherited_trg: Option<TriggerOptions>,
    path: &str,
) -> Result<(), SclError> {
    let fc = match (inherited_fc, def.fc.as_deref().filter(|fc| !fc.is_empty())) {
        (Some(fc), _) => fc,
        (None, Some(declared)) => {
            FunctionalConstraint::from_scl(declared).ok_or_else(|| {
                SclError::InvalidAttributeFormat {
                    element: format!("{}.{}", path, def.name),
                    attribute: "fc",
                    value: declared.to_string(),
                }
            })?
        }
        (None, None) => {
            return Err(SclError::MissingAttribute {
                element: format!("{}.{}", path, def.name),
                attribute: "fc",
            });
        }
    };

    if inherited_fc.is_none() && fc == FunctionalConstraint::SE {
        let setting_group = build_data_attribute(ctx, def, FunctionalConstraint::SG, inherited_trg, path)?;
        siblings.push(setting_group);
    }

    let attribute = build_data_attribute(ctx, def, fc, inherited_trg, path)?;
    insert_sibling(ctx, siblings, attribute, path);
    Ok(())
}

/// Adds `attribute` to its siblings. A name clash with a non-`SG` sibling is
/// reported; an `SE` attribute replaces a clashing `SP` one, anything else
/// is appended.
fn insert_sibling(
    ctx: &mut ResolutionContext<'_>,
    siblings: &mut Vec<DataAttribute>,
    attribute: DataAttribute,
    path: &str,
) {
    let clash = siblings
        .iter()
        .position(|s| s.fc != FunctionalConstraint::SG && s.name == attribute.name);
    if let Some(index) = clash {
        let existing_fc = siblings[index].fc;
        ctx.warn(
            &format!("{}.{}", path, attribute.name),
            format!(
                "data attribute declared twice (fc {} and fc {})",
                existing_fc, attribute.fc
            ),
        );
        if existing_fc == FunctionalConstraint::SP && attribute.fc == FunctionalConstraint::SE {
            siblings[index] = attribute;
            return;
        }
    }
    siblings.push(attribute);
}

fn build_data_attribute(
    ctx: &mut ResolutionContext<'_>,
    def: &DaDefinition,
    fc: FunctionalConstraint,
    inherited_trg: Option<TriggerOptions>,
    path: &str,
) -> Result<DataAttribute, SclError> {
    let path = format!("{}.{}", path, def.name);
    let registry = ctx.registry;
    let attribute_type = AttributeType::from_scl(&def.b_type)?;
    let trigger_options = inherited_trg.unwrap_or(TriggerOptions {
        dchg: def.dchg,
        qchg: def.qchg,
        dupd: def.dupd,
        ..Default::default()
    });

    let mut sub_data_attributes = Vec::new();
    let mut value = None;

    match attribute_type {
        AttributeType::Constructed => {
            let type_id = required_type(def, &path)?;
            ctx.enter(type_id)?;
            let da_type = registry.data_attribute_type(type_id, &path)?;
            for bda in &da_type.sub_attributes {
                add_data_attribute(
                    ctx,
                    &mut sub_data_attributes,
                    bda,
                    Some(fc),
                    Some(trigger_options),
                    &path,
                )?;
            }
            ctx.leave();
        }
        AttributeType::Enumerated => {
            let type_id = required_type(def, &path)?;
            registry.enum_type(type_id, &path)?;
            ctx.mark_used(type_id);
            value = first_value(&def.values).map(|symbol| DataModelValue::Deferred {
                symbol: symbol.to_string(),
                enum_type: type_id.to_string(),
            });
        }
        _ => {
            if let Some(text) = first_value(&def.values) {
                value = ctx.interpret(attribute_type, None, text, &path)?;
            }
        }
    }

    Ok(DataAttribute {
        name: def.name.clone(),
        fc,
        attribute_type,
        type_id: def.type_id.clone(),
        count: parse_u32_attribute(def.count.as_deref(), 0, &path, "count")?,
        trigger_options,
        short_address: None,
        value,
        sub_data_attributes,
    })
}

fn required_type<'d>(def: &'d DaDefinition, path: &str) -> Result<&'d str, SclError> {
    def.type_id
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SclError::MissingAttribute {
            element: path.to_string(),
            attribute: "type",
        })
}
