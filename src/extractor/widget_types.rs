use crate::cli::ActionKind;
use crate::config::Config;
use crate::error::Result;
use crate::extractor::descriptors::{
    read_workspace_descriptors, DescriptorReader, WorkspaceDescriptors,
};
use crate::extractor::file_operations::write_json_file;
use crate::extractor::ActionSummary;
use crate::scanner::PluginScanner;
use std::collections::BTreeSet;
use std::path::Path;

pub struct WidgetTypeExtractor {
    scanner: PluginScanner,
    reader: DescriptorReader,
    file_name: String,
}

impl WidgetTypeExtractor {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            scanner: PluginScanner::new(&config.scan),
            reader: DescriptorReader::new()?,
            file_name: config.output.widget_types_file.clone(),
        })
    }

    pub fn extract(&self, source_dir: &Path, output_dir: &Path) -> Result<ActionSummary> {
        let mut summary = ActionSummary::new(ActionKind::ExtractWidgetTypes);

        let scan = self.scanner.scan_directory(source_dir)?;
        summary.plugins_scanned = scan.packages.len();
        summary.skipped_archives = scan.skipped_archives.len();
        summary.errors.extend(scan.errors.iter().cloned());

        let descriptors = read_workspace_descriptors(&self.scanner, &self.reader, &scan)?;
        summary.errors.extend(descriptors.errors.iter().cloned());

        let types = widget_types(&descriptors);
        if types.is_empty() {
            log::warn!(
                "no widget definitions found in {} descriptor files",
                descriptors.files_read
            );
        }

        let output_path = output_dir.join(&self.file_name);
        let list: Vec<&String> = types.iter().collect();
        let bytes = write_json_file(&output_path, &list)?;
        summary.record_output(output_path, bytes);

        Ok(summary)
    }
}

/// Distinct widget types, sorted.
pub fn widget_types(descriptors: &WorkspaceDescriptors) -> BTreeSet<String> {
    descriptors
        .entries
        .iter()
        .flat_map(|(_, descriptor)| descriptor.widgets.iter())
        .map(|widget| widget.widget_type.clone())
        .collect()
}
