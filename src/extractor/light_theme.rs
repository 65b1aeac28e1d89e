use crate::cli::ActionKind;
use crate::config::Config;
use crate::error::{ExtractorError, Result};
use crate::extractor::file_operations::{CopyJob, FileOperations};
use crate::extractor::images::copy_jobs;
use crate::extractor::ActionSummary;
use crate::scanner::{PluginPackage, PluginScan, PluginScanner};
use crate::ui::ProgressManager;
use regex::Regex;
use std::path::Path;

/// Lays the images of the light theme plugin over the output directory.
///
/// Theme images keep their path relative to the theme plugin root, so a theme
/// organised as `<plugin-id>/icons/...` replaces the files written by image
/// extraction into the same output directory.
pub struct LightThemeApplier {
    scanner: PluginScanner,
    file_ops: FileOperations,
    pattern: Regex,
}

impl LightThemeApplier {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            scanner: PluginScanner::new(&config.scan),
            file_ops: FileOperations::new().with_overwrite(true),
            pattern: Regex::new(&config.theme.light_theme_pattern)?,
        })
    }

    pub fn theme_packages<'a>(&self, scan: &'a PluginScan) -> Vec<&'a PluginPackage> {
        scan.packages
            .iter()
            .filter(|package| self.pattern.is_match(&package.id))
            .collect()
    }

    pub fn apply(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        progress: &ProgressManager,
    ) -> Result<ActionSummary> {
        let mut summary = ActionSummary::new(ActionKind::ApplyLightTheme);

        let scan = self.scanner.scan_directory(source_dir)?;
        summary.plugins_scanned = scan.packages.len();
        summary.skipped_archives = scan.skipped_archives.len();
        summary.errors.extend(scan.errors.iter().cloned());

        let themes = self.theme_packages(&scan);
        if themes.is_empty() {
            return Err(ExtractorError::LightThemeNotFound {
                path: source_dir.display().to_string(),
                pattern: self.pattern.as_str().to_string(),
            });
        }

        let mut jobs = Vec::new();
        for theme in themes {
            log::info!("applying light theme from {}", theme.display_path());
            let listing = self.scanner.list_images(theme)?;
            summary.errors.extend(listing.errors);

            jobs.extend(listing.files.into_iter().map(|asset| CopyJob {
                destination: asset.relative_path.clone(),
                asset,
            }));
        }

        copy_jobs(&self.file_ops, &jobs, output_dir, progress, &mut summary);

        Ok(summary)
    }
}
