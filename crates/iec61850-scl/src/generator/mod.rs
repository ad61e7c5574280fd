// crates/iec61850-scl/src/generator/mod.rs

//! Static model generator.
//!
//! Turns one IED / access point of a resolved [`SclDocument`] into a C
//! header and source file describing the model as static data. Generation
//! runs in two passes: a naming pass that gives every node and control
//! block a symbol, and an emission pass that prints them.

mod control_blocks;
mod emit;
mod initializer;
mod naming;

use crate::error::SclError;
use crate::types::{Diagnostic, SclDocument};
use emit::{HeaderContext, SourceContext};
use log::{debug, info};
use naming::{ControlBlockTable, NodeTable};
use std::fs;
use std::path::{Path, PathBuf};

/// Selection and output parameters of a generator run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// IED to compile. `None` selects the first IED of the document.
    pub ied_name: Option<String>,
    /// Access point to compile. `None` selects the first one of the IED.
    pub access_point: Option<String>,
    pub output_dir: PathBuf,
    /// Base name of the generated files, without extension.
    pub output_name: String,
    /// Prefix of every generated symbol.
    pub model_prefix: String,
    /// Wrap each value assignment in a `mmsValue == NULL` guard.
    pub initialize_once: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ied_name: None,
            access_point: None,
            output_dir: PathBuf::from("."),
            output_name: "static_model".to_string(),
            model_prefix: "iedModel".to_string(),
            initialize_once: false,
        }
    }
}

impl GeneratorConfig {
    pub fn with_ied_name(mut self, name: impl Into<String>) -> Self {
        self.ied_name = Some(name.into());
        self
    }

    pub fn with_access_point(mut self, name: impl Into<String>) -> Self {
        self.access_point = Some(name.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    pub fn with_model_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.model_prefix = prefix.into();
        self
    }

    pub fn with_initialize_once(mut self, initialize_once: bool) -> Self {
        self.initialize_once = initialize_once;
        self
    }
}

/// The generated file pair, held in memory.
#[derive(Debug, Clone)]
pub struct GeneratedModel {
    pub header_file_name: String,
    pub header: String,
    pub source_file_name: String,
    pub source: String,
    /// Non-fatal problems found while generating.
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedModel {
    /// Writes `<name>.h` and `<name>.c` into `dir`.
    ///
    /// Both files are first written to hidden staging files next to their
    /// targets and renamed once both writes succeeded, so a failed write
    /// leaves any previous pair untouched.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<(), SclError> {
        let dir = dir.as_ref();
        let files = [
            (&self.header_file_name, &self.header),
            (&self.source_file_name, &self.source),
        ];
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
        for (name, contents) in files {
            let staging = dir.join(format!(".{}.tmp", name));
            if let Err(e) = fs::write(&staging, contents) {
                for (path, _) in &staged {
                    fs::remove_file(path).ok();
                }
                return Err(e.into());
            }
            staged.push((staging, dir.join(name)));
        }
        for (staging, target) in &staged {
            fs::rename(staging, target)?;
        }
        info!(
            "Wrote {} and {} to {}",
            self.header_file_name,
            self.source_file_name,
            dir.display()
        );
        Ok(())
    }
}

pub struct StaticModelGenerator<'a> {
    document: &'a SclDocument,
    config: GeneratorConfig,
}

impl<'a> StaticModelGenerator<'a> {
    pub fn new(document: &'a SclDocument, config: GeneratorConfig) -> Self {
        Self { document, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Builds both files in memory.
    pub fn generate(&self) -> Result<GeneratedModel, SclError> {
        let config = &self.config;
        let ied = self.document.ied(config.ied_name.as_deref())?;
        let ap = ied.access_point(config.access_point.as_deref())?;
        if ap.logical_devices.is_empty() {
            return Err(SclError::ValidationError(format!(
                "access point {} of IED {} has no logical device",
                ap.name, ied.name
            )));
        }
        debug!("Generating static model for {}/{}", ied.name, ap.name);

        let prefix = config.model_prefix.as_str();
        let base_name = config
            .output_name
            .rsplit('/')
            .next()
            .unwrap_or(&config.output_name);
        let header_file_name = format!("{}.h", base_name);
        let source_file_name = format!("{}.c", base_name);
        let source_name = self.document.source_name.as_deref().unwrap_or("SCL document");

        let nodes = NodeTable::build(ap, prefix);
        let control_blocks = ControlBlockTable::build(ied, ap, &self.document.communication, prefix);
        let mut diagnostics = Vec::new();

        let guard = emit::header_guard(&config.output_name);
        let header = emit::write_header(
            &HeaderContext {
                file_name: &header_file_name,
                source_name,
                guard: &guard,
                prefix,
            },
            &nodes,
            &mut diagnostics,
        )?;

        let initializers =
            initializer::write_initializers(&nodes, config.initialize_once, &mut diagnostics)?;
        let source = emit::write_source(
            &SourceContext {
                file_name: &source_file_name,
                header_file_name: &header_file_name,
                source_name,
                prefix,
                ied_name: &ied.name,
                report_owner: ied.report_owner,
            },
            &nodes,
            &control_blocks,
            &initializers,
            &mut diagnostics,
        )?;

        info!(
            "Generated {} model nodes, {} data sets and {} report control blocks",
            nodes.nodes.len(),
            control_blocks.data_sets.len(),
            control_blocks.reports.len()
        );

        Ok(GeneratedModel {
            header_file_name,
            header,
            source_file_name,
            source,
            diagnostics,
        })
    }

    /// Generates and writes both files to the configured output directory.
    /// Nothing is written if generation fails.
    pub fn write(&self) -> Result<GeneratedModel, SclError> {
        let model = self.generate()?;
        model.write_to_dir(&self.config.output_dir)?;
        Ok(model)
    }
}
