// crates/iec61850-scl/src/parser.rs

use crate::error::SclError;
use crate::model;
use crate::resolver;
use crate::types::SclDocument;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Parses an SCL (ICD/CID/SCD) string slice into a resolved `SclDocument`.
///
/// # Arguments
/// * `xml_content` - A string slice containing the full SCL XML file.
///
/// # Errors
/// Returns an `SclError` if the XML is malformed, mandatory elements are
/// missing, or resolution fails (unknown type ids, cyclic templates,
/// invalid literals, ...).
pub fn load_scl_from_str(xml_content: &str) -> Result<SclDocument, SclError> {
    load_internal(xml_content, None)
}

/// Reads and parses an SCL file. The file name is kept as the document's
/// `source_name`.
pub fn load_scl_from_file(path: impl AsRef<Path>) -> Result<SclDocument, SclError> {
    let path = path.as_ref();
    info!("Loading SCL file {}", path.display());
    let xml_content = fs::read_to_string(path)?;
    let source_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    load_internal(&xml_content, source_name)
}

fn load_internal(xml_content: &str, source_name: Option<String>) -> Result<SclDocument, SclError> {
    // 1. Deserialize the raw XML string into our internal model.
    let scl: model::Scl = quick_xml::de::from_str(xml_content)?;

    // 2. Structural validation.
    validate_structure(&scl)?;
    debug!(
        "SCL document with {} IED(s) deserialized",
        scl.ieds.len()
    );

    // 3. Resolve templates, instances and communication.
    resolver::resolve_document(scl, source_name)
}

/// Checks the mandatory top-level content of an SCL document.
fn validate_structure(scl: &model::Scl) -> Result<(), SclError> {
    if scl.ieds.is_empty() {
        return Err(SclError::MissingElement { element: "IED" });
    }
    if scl.data_type_templates.is_none() {
        return Err(SclError::MissingElement {
            element: "DataTypeTemplates",
        });
    }
    for ied in &scl.ieds {
        if ied.name.is_empty() {
            return Err(SclError::MissingAttribute {
                element: "IED".to_string(),
                attribute: "name",
            });
        }
        if ied.access_points.is_empty() {
            return Err(SclError::MissingChildElement {
                parent: format!("IED {}", ied.name),
                element: "AccessPoint",
            });
        }
        for ap in &ied.access_points {
            let Some(server) = &ap.server else {
                return Err(SclError::MissingChildElement {
                    parent: format!("AccessPoint {}/{}", ied.name, ap.name),
                    element: "Server",
                });
            };
            if let Some(ld) = server.logical_devices.iter().find(|ld| ld.ln0.is_none()) {
                return Err(SclError::MissingChildElement {
                    parent: format!("LDevice {}/{}", ied.name, ld.inst),
                    element: "LN0",
                });
            }
        }
    }
    Ok(())
}
