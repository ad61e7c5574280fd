// crates/iec61850-scl/src/resolver/instances.rs

//! Applies instance overrides (`DOI`/`SDI`/`DAI`) to an instantiated
//! logical node and binds enumeration defaults taken from templates.

use super::ResolutionContext;
use crate::error::SclError;
use crate::model::common::first_value;
use crate::model::ied::{Dai, Doi};
use crate::types::{AttributeType, DataAttribute, DataObject};
use crate::values::{self, DataModelValue};

/// Applies every `DOI` of a logical node. `ln_path` is e.g. `LD0/GGIO1`.
pub(super) fn apply_instance_overrides(
    ctx: &mut ResolutionContext<'_>,
    data_objects: &mut [DataObject],
    dois: &[Doi],
    ln_path: &str,
) -> Result<(), SclError> {
    for doi in dois {
        let object = data_objects
            .iter_mut()
            .find(|d| d.name == doi.name)
            .ok_or_else(|| SclError::UnknownDataObject {
                node: ln_path.to_string(),
                name: doi.name.clone(),
            })?;
        apply_to_object(ctx, object, doi, &format!("{}.{}", ln_path, doi.name))?;
    }
    Ok(())
}

/// `SDI` children of a data object name a constructed data attribute or,
/// when no attribute has that name, a sub data object.
fn apply_to_object(
    ctx: &mut ResolutionContext<'_>,
    object: &mut DataObject,
    node: &Doi,
    path: &str,
) -> Result<(), SclError> {
    for sdi in &node.sdis {
        let sdi_path = format!("{}.{}", path, sdi.name);
        if !object.data_attributes.iter().any(|a| a.name == sdi.name) {
            if let Some(sub) = object.sub_data_objects.iter_mut().find(|s| s.name == sdi.name) {
                apply_to_object(ctx, sub, sdi, &sdi_path)?;
                continue;
            }
        }
        let attribute = find_attribute(&mut object.data_attributes, &sdi.name, path)?;
        apply_to_attribute(ctx, attribute, sdi, &sdi_path)?;
    }
    for dai in &node.dais {
        let attribute = find_attribute(&mut object.data_attributes, &dai.name, path)?;
        apply_dai(ctx, attribute, dai, &format!("{}.{}", path, dai.name))?;
    }
    Ok(())
}

fn apply_to_attribute(
    ctx: &mut ResolutionContext<'_>,
    attribute: &mut DataAttribute,
    node: &Doi,
    path: &str,
) -> Result<(), SclError> {
    for sdi in &node.sdis {
        let child = find_attribute(&mut attribute.sub_data_attributes, &sdi.name, path)?;
        apply_to_attribute(ctx, child, sdi, &format!("{}.{}", path, sdi.name))?;
    }
    for dai in &node.dais {
        let child = find_attribute(&mut attribute.sub_data_attributes, &dai.name, path)?;
        apply_dai(ctx, child, dai, &format!("{}.{}", path, dai.name))?;
    }
    Ok(())
}

/// First attribute with the given name.
fn find_attribute<'d>(
    attributes: &'d mut [DataAttribute],
    name: &str,
    path: &str,
) -> Result<&'d mut DataAttribute, SclError> {
    attributes
        .iter_mut()
        .find(|a| a.name == name)
        .ok_or_else(|| SclError::UnknownDataAttribute {
            node: path.to_string(),
            name: name.to_string(),
        })
}

/// Sets the short address and, when a literal is given, the initial value.
/// A skipped literal keeps the template default.
fn apply_dai(
    ctx: &mut ResolutionContext<'_>,
    attribute: &mut DataAttribute,
    dai: &Dai,
    path: &str,
) -> Result<(), SclError> {
    if let Some(s_addr) = &dai.s_addr {
        attribute.short_address = Some(s_addr.clone());
    }

    let Some(text) = first_value(&dai.values) else {
        return Ok(());
    };

    let registry = ctx.registry;
    let enum_type = match (&attribute.attribute_type, &attribute.type_id) {
        (AttributeType::Enumerated, Some(type_id)) => Some(registry.enum_type(type_id, path)?),
        _ => None,
    };
    if let Some(value) = ctx.interpret(attribute.attribute_type, enum_type, text, path)? {
        attribute.value = Some(value);
    }
    Ok(())
}

/// Replaces every deferred enumeration symbol below `data_objects` by its
/// ordinal. An unknown symbol is an error.
pub(super) fn bind_deferred_values(
    ctx: &ResolutionContext<'_>,
    data_objects: &mut [DataObject],
    path: &str,
) -> Result<(), SclError> {
    for object in data_objects {
        let object_path = format!("{}.{}", path, object.name);
        bind_deferred_values(ctx, &mut object.sub_data_objects, &object_path)?;
        bind_attributes(ctx, &mut object.data_attributes, &object_path)?;
    }
    Ok(())
}

fn bind_attributes(
    ctx: &ResolutionContext<'_>,
    attributes: &mut [DataAttribute],
    path: &str,
) -> Result<(), SclError> {
    for attribute in attributes {
        let attribute_path = format!("{}.{}", path, attribute.name);
        if let Some(DataModelValue::Deferred { symbol, enum_type }) = &attribute.value {
            let enum_type = ctx.registry.enum_type(enum_type, &attribute_path)?;
            let ord = values::enum_ordinal(enum_type, symbol)?;
            attribute.value = Some(DataModelValue::Ordinal(ord));
        }
        bind_attributes(ctx, &mut attribute.sub_data_attributes, &attribute_path)?;
    }
    Ok(())
}
