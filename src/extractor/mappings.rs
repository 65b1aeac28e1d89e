use crate::cli::ActionKind;
use crate::config::Config;
use crate::error::Result;
use crate::extractor::descriptors::{
    read_workspace_descriptors, DescriptorReader, WorkspaceDescriptors,
};
use crate::extractor::file_operations::{image_output_path, to_portable_path, write_json_file};
use crate::extractor::ActionSummary;
use crate::scanner::PluginScanner;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Component, Path};

/// One widget as seen by a mule-preview client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    pub widget_type: String,
    pub plugin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct MappingGenerator {
    scanner: PluginScanner,
    reader: DescriptorReader,
    file_name: String,
    preserve_structure: bool,
}

impl MappingGenerator {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            scanner: PluginScanner::new(&config.scan),
            reader: DescriptorReader::new()?,
            file_name: config.output.mappings_file.clone(),
            preserve_structure: config.output.preserve_structure,
        })
    }

    pub fn generate(&self, source_dir: &Path, output_dir: &Path) -> Result<ActionSummary> {
        let mut summary = ActionSummary::new(ActionKind::GenerateMappings);

        let scan = self.scanner.scan_directory(source_dir)?;
        summary.plugins_scanned = scan.packages.len();
        summary.skipped_archives = scan.skipped_archives.len();
        summary.errors.extend(scan.errors.iter().cloned());

        let descriptors = read_workspace_descriptors(&self.scanner, &self.reader, &scan)?;
        summary.errors.extend(descriptors.errors.iter().cloned());

        let mappings = self.build_mappings(&descriptors);
        log::info!("generated {} mappings", mappings.len());

        let output_path = output_dir.join(&self.file_name);
        let bytes = write_json_file(&output_path, &mappings)?;
        summary.record_output(output_path, bytes);

        Ok(summary)
    }

    /// Keyed by `<prefix>:<localId>`. The first package in scan order wins a
    /// duplicated key.
    pub fn build_mappings(
        &self,
        descriptors: &WorkspaceDescriptors,
    ) -> BTreeMap<String, MappingEntry> {
        let mut mappings = BTreeMap::new();

        for (package, descriptor) in &descriptors.entries {
            for widget in &descriptor.widgets {
                let key = format!("{}:{}", descriptor.prefix, widget.local_id);

                match mappings.entry(key) {
                    Entry::Occupied(existing) => {
                        log::debug!(
                            "duplicate mapping {} in {}, keeping the first definition",
                            existing.key(),
                            package.display_path()
                        );
                    }
                    Entry::Vacant(slot) => {
                        let image = widget
                            .image
                            .as_deref()
                            .or(widget.icon.as_deref())
                            .and_then(|raw| self.image_path(&package.id, raw));

                        slot.insert(MappingEntry {
                            widget_type: widget.widget_type.clone(),
                            plugin: package.id.clone(),
                            image,
                            description: widget.description.clone(),
                        });
                    }
                }
            }
        }

        mappings
    }

    fn image_path(&self, plugin_id: &str, raw: &str) -> Option<String> {
        let relative = Path::new(raw.trim_start_matches(['/', '\\']));

        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            log::warn!("ignoring image path outside of plugin {}: {}", plugin_id, raw);
            return None;
        }

        image_output_path(plugin_id, relative, self.preserve_structure)
            .ok()
            .map(|path| to_portable_path(&path))
    }
}
