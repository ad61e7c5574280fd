// crates/iec61850-scl/src/registry.rs

//! Flattens the four template families of `<DataTypeTemplates>` into one
//! id space.
//!
//! Lookup is by id only. When the same id is declared more than once, the
//! first declaration wins and later ones are reported as diagnostics.

use crate::error::SclError;
use crate::model::templates::{DaType, DataTypeTemplates, DoType, EnumType, LNodeType};
use crate::types::Diagnostic;
use log::warn;
use std::collections::BTreeMap;

/// A single template of any family.
#[derive(Debug, Clone)]
pub enum TypeTemplate {
    LogicalNode(LNodeType),
    DataObject(DoType),
    DataAttribute(DaType),
    Enumeration(EnumType),
}

impl TypeTemplate {
    pub fn id(&self) -> &str {
        match self {
            TypeTemplate::LogicalNode(t) => &t.id,
            TypeTemplate::DataObject(t) => &t.id,
            TypeTemplate::DataAttribute(t) => &t.id,
            TypeTemplate::Enumeration(t) => &t.id,
        }
    }

    pub fn desc(&self) -> Option<&str> {
        match self {
            TypeTemplate::LogicalNode(t) => t.desc.as_deref(),
            TypeTemplate::DataObject(t) => t.desc.as_deref(),
            TypeTemplate::DataAttribute(t) => t.desc.as_deref(),
            TypeTemplate::Enumeration(t) => t.desc.as_deref(),
        }
    }

    /// Family name as used in SCL (`LNodeType`, `DOType`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            TypeTemplate::LogicalNode(_) => "LNodeType",
            TypeTemplate::DataObject(_) => "DOType",
            TypeTemplate::DataAttribute(_) => "DAType",
            TypeTemplate::Enumeration(_) => "EnumType",
        }
    }
}

/// All templates of a document, in declaration order, indexed by id.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    templates: Vec<TypeTemplate>,
    index: BTreeMap<String, usize>,
}

impl TypeRegistry {
    /// Builds the registry from the raw `<DataTypeTemplates>` element.
    ///
    /// Families are flattened in the order DAType, DOType, EnumType, LNodeType.
    pub fn from_templates(templates: DataTypeTemplates, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut registry = TypeRegistry::default();
        let all = templates
            .da_type
            .into_iter()
            .map(TypeTemplate::DataAttribute)
            .chain(templates.do_type.into_iter().map(TypeTemplate::DataObject))
            .chain(templates.enum_type.into_iter().map(TypeTemplate::Enumeration))
            .chain(templates.lnode_type.into_iter().map(TypeTemplate::LogicalNode));

        for template in all {
            if let Some(previous) = registry.get(template.id()) {
                let message = format!(
                    "duplicate type id (already declared as {}), later declaration ignored",
                    previous.kind()
                );
                warn!("{}: {}", template.id(), message);
                diagnostics.push(Diagnostic::new(template.id(), message));
                continue;
            }
            registry
                .index
                .insert(template.id().to_string(), registry.templates.len());
            registry.templates.push(template);
        }
        registry
    }

    pub fn get(&self, id: &str) -> Option<&TypeTemplate> {
        self.index.get(id).map(|&i| &self.templates[i])
    }

    /// Number of distinct template ids.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All templates in flattening order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeTemplate> {
        self.templates.iter()
    }

    /// Looks up an `LNodeType`. `node` names the referencing element for the error.
    pub fn logical_node_type(&self, id: &str, node: &str) -> Result<&LNodeType, SclError> {
        match self.lookup(id, node)? {
            TypeTemplate::LogicalNode(t) => Ok(t),
            other => Err(wrong_kind(id, "LNodeType", other)),
        }
    }

    /// Looks up a `DOType`.
    pub fn data_object_type(&self, id: &str, node: &str) -> Result<&DoType, SclError> {
        match self.lookup(id, node)? {
            TypeTemplate::DataObject(t) => Ok(t),
            other => Err(wrong_kind(id, "DOType", other)),
        }
    }

    /// Looks up a `DAType`.
    pub fn data_attribute_type(&self, id: &str, node: &str) -> Result<&DaType, SclError> {
        match self.lookup(id, node)? {
            TypeTemplate::DataAttribute(t) => Ok(t),
            other => Err(wrong_kind(id, "DAType", other)),
        }
    }

    /// Looks up an `EnumType`.
    pub fn enum_type(&self, id: &str, node: &str) -> Result<&EnumType, SclError> {
        match self.lookup(id, node)? {
            TypeTemplate::Enumeration(t) => Ok(t),
            other => Err(wrong_kind(id, "EnumType", other)),
        }
    }

    fn lookup(&self, id: &str, node: &str) -> Result<&TypeTemplate, SclError> {
        self.get(id).ok_or_else(|| SclError::MissingTypeDeclaration {
            type_id: id.to_string(),
            node: node.to_string(),
        })
    }
}

fn wrong_kind(id: &str, expected: &'static str, found: &TypeTemplate) -> SclError {
    SclError::WrongTemplateKind {
        type_id: id.to_string(),
        expected,
        found: found.kind(),
    }
}

impl EnumType {
    /// Ordinal of a symbol, matched exactly.
    pub fn ordinal_of(&self, symbol: &str) -> Option<i32> {
        self.values.iter().find(|v| v.symbol == symbol).map(|v| v.ord)
    }

    pub fn contains_ordinal(&self, ord: i32) -> bool {
        self.values.iter().any(|v| v.ord == ord)
    }
}
