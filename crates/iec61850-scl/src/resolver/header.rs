// crates/iec61850-scl/src/resolver/header.rs

use crate::model;
use crate::types;

/// Maps a `model::Header` into a `types::Header`.
pub(super) fn resolve_header(model: &model::Header) -> types::Header {
    types::Header {
        id: model.id.clone(),
        version: model.version.clone(),
        revision: model.revision.clone(),
        tool_id: model.tool_id.clone(),
        name_structure: model.name_structure.clone(),
    }
}
