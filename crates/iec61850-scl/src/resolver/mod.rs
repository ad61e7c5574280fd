// crates/iec61850-scl/src/resolver/mod.rs

//! Handles the business logic of resolving a deserialized SCL model into
//! the public instance tree.
//!
//! This module contains the main `resolve_document` orchestrator, the shared
//! `ResolutionContext` and sub-modules for the individual parts of an IED.

use crate::addressing;
use crate::error::SclError;
use crate::model;
use crate::registry::TypeRegistry;
use crate::types::{self, AttributeType, Diagnostic, SclDocument};
use crate::values::{self, DataModelValue, Interpreted};
use log::{info, warn};
use std::collections::BTreeSet;

// --- Sub-modules ---

mod control_blocks;
mod data_object;
mod header;
mod ied;
mod instances;

/// State shared by every resolution step of one document.
pub(crate) struct ResolutionContext<'a> {
    pub registry: &'a TypeRegistry,
    /// Template ids referenced by at least one instance.
    used: BTreeSet<String>,
    /// Template ids currently being expanded, outermost first.
    chain: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            used: BTreeSet::new(),
            chain: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Starts expanding `type_id`, failing if it is already being expanded.
    pub fn enter(&mut self, type_id: &str) -> Result<(), SclError> {
        if self.chain.iter().any(|t| t == type_id) {
            let mut chain = self.chain.clone();
            chain.push(type_id.to_string());
            return Err(SclError::CyclicType { chain });
        }
        self.chain.push(type_id.to_string());
        self.mark_used(type_id);
        Ok(())
    }

    pub fn leave(&mut self) {
        self.chain.pop();
    }

    pub fn mark_used(&mut self, type_id: &str) {
        if !self.used.contains(type_id) {
            self.used.insert(type_id.to_string());
        }
    }

    /// Logs a warning and records it as a diagnostic.
    pub fn warn(&mut self, element: &str, message: String) {
        warn!("{}: {}", element, message);
        self.diagnostics.push(Diagnostic::new(element, message));
    }

    /// Interprets a literal, turning a skipped literal into a diagnostic.
    pub fn interpret(
        &mut self,
        attribute_type: AttributeType,
        enum_type: Option<&model::templates::EnumType>,
        text: &str,
        element: &str,
    ) -> Result<Option<DataModelValue>, SclError> {
        match values::interpret(attribute_type, enum_type, text)? {
            Interpreted::Value(value) => Ok(Some(value)),
            Interpreted::Skipped(reason) => {
                self.warn(element, reason);
                Ok(None)
            }
        }
    }
}

/// Resolves the final `SclDocument` from the raw deserialized model.
pub(crate) fn resolve_document(
    scl: model::Scl,
    source_name: Option<String>,
) -> Result<SclDocument, SclError> {
    let mut diagnostics = Vec::new();

    // --- Pass 1: Flatten the templates ---
    let templates = scl
        .data_type_templates
        .ok_or(SclError::MissingElement {
            element: "DataTypeTemplates",
        })?;
    let registry = TypeRegistry::from_templates(templates, &mut diagnostics);

    // --- Pass 2: Instantiate every IED ---
    let mut ctx = ResolutionContext::new(&registry);
    let ieds = scl
        .ieds
        .iter()
        .map(|raw| ied::resolve_ied(&mut ctx, raw))
        .collect::<Result<Vec<types::Ied>, _>>()?;

    let ResolutionContext {
        used,
        diagnostics: resolve_diagnostics,
        ..
    } = ctx;
    diagnostics.extend(resolve_diagnostics);

    let unused_templates: Vec<String> = registry
        .iter()
        .map(|t| t.id().to_string())
        .filter(|id| !used.contains(id))
        .collect();
    for id in &unused_templates {
        info!("Type template {} is not used by any instance", id);
    }

    // --- Pass 3: Communication ---
    let communication = addressing::resolve_communication(scl.communication)?;

    Ok(SclDocument {
        source_name,
        header: scl.header.as_ref().map(header::resolve_header),
        ieds,
        communication,
        registry,
        unused_templates,
        diagnostics,
    })
}

/// Parses an optional unsigned attribute, using `default` when absent.
pub(crate) fn parse_u32_attribute(
    value: Option<&str>,
    default: u32,
    element: &str,
    attribute: &'static str,
) -> Result<u32, SclError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text
            .parse::<u32>()
            .map_err(|_| SclError::InvalidAttributeFormat {
                element: element.to_string(),
                attribute,
                value: text.to_string(),
            }),
    }
}
