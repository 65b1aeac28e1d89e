use crate::cli::ActionKind;
use crate::config::Config;
use crate::error::Result;
use crate::extractor::file_operations::{
    image_output_path, CopyJob, ExtractionProgress, FileOperations,
};
use crate::extractor::ActionSummary;
use crate::scanner::{PluginScan, PluginScanner};
use crate::ui::progress::{finish_progress_with_summary, update_file_progress};
use crate::ui::ProgressManager;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Copies the image assets of every plugin package into the output directory.
pub struct ImageExtractor {
    scanner: PluginScanner,
    file_ops: FileOperations,
    preserve_structure: bool,
}

impl ImageExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            scanner: PluginScanner::new(&config.scan),
            file_ops: FileOperations::new().with_overwrite(config.output.overwrite),
            preserve_structure: config.output.preserve_structure,
        }
    }

    pub fn extract(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        progress: &ProgressManager,
    ) -> Result<ActionSummary> {
        let mut summary = ActionSummary::new(ActionKind::ExtractImages);

        let scan = self.scanner.scan_directory(source_dir)?;
        summary.plugins_scanned = scan.packages.len();
        summary.skipped_archives = scan.skipped_archives.len();
        summary.errors.extend(scan.errors.iter().cloned());

        let jobs = self.plan(&scan, &mut summary)?;
        log::info!("copying {} images from {} plugins", jobs.len(), scan.packages.len());

        copy_jobs(&self.file_ops, &jobs, output_dir, progress, &mut summary);

        Ok(summary)
    }

    /// One copy job per image, laid out by [`image_output_path`]. When two
    /// images land on the same destination the first one in scan order is
    /// kept and the other is reported.
    pub fn plan(&self, scan: &PluginScan, summary: &mut ActionSummary) -> Result<Vec<CopyJob>> {
        let mut jobs = Vec::new();
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for package in &scan.packages {
            let listing = self.scanner.list_images(package)?;
            summary.errors.extend(listing.errors);

            for asset in listing.files {
                let destination =
                    image_output_path(&package.id, &asset.relative_path, self.preserve_structure)?;

                if let Some(first) = claimed.get(&destination) {
                    let message = format!(
                        "Skipped {}: {} already written from {}",
                        asset.source_path.display(),
                        destination.display(),
                        first.display()
                    );
                    log::warn!("{}", message);
                    summary.errors.push(message);
                    continue;
                }

                claimed.insert(destination.clone(), asset.source_path.clone());
                jobs.push(CopyJob { asset, destination });
            }
        }

        Ok(jobs)
    }
}

/// Run `jobs` behind a file progress bar and fold the result into `summary`.
pub(crate) fn copy_jobs(
    file_ops: &FileOperations,
    jobs: &[CopyJob],
    output_dir: &Path,
    progress: &ProgressManager,
    summary: &mut ActionSummary,
) {
    let file_progress = progress.create_file_progress(jobs.len() as u64);
    let progress_callback = {
        let pb = file_progress.clone();
        move |progress: &ExtractionProgress| {
            update_file_progress(&pb, progress);
        }
    };

    let copied = file_ops.copy_all(jobs, output_dir, Some(&progress_callback));

    finish_progress_with_summary(
        &file_progress,
        &format!("Copied {} files", copied.files_processed),
        copied.elapsed(),
    );

    summary.files_written += copied.files_processed;
    summary.bytes_written += copied.bytes_processed;
    summary.replaced_files += copied.replaced_files;
    summary.errors.extend(copied.errors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_workspace() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let plugins = temp_dir.path().join("plugins");

        for (plugin, images) in [
            ("org.mule.tooling.http_7.3.0", &["icons/large/http.png", "icons/small/http.gif"][..]),
            ("org.mule.tooling.db_7.3.0", &["icons/large/db.png"][..]),
        ] {
            let root = plugins.join(plugin);
            fs::create_dir_all(&root).unwrap();
            fs::write(root.join("plugin.xml"), "<plugin/>").unwrap();
            for image in images {
                let path = root.join(image);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, image.as_bytes()).unwrap();
            }
        }
        fs::write(plugins.join("org.mule.tooling.ws_7.3.0.jar"), "PK").unwrap();

        temp_dir
    }

    #[test]
    fn test_extract_preserves_plugin_layout() {
        let workspace = create_workspace();
        let output = TempDir::new().unwrap();

        let extractor = ImageExtractor::new(&Config::default());
        let summary = extractor
            .extract(workspace.path(), output.path(), &ProgressManager::new(false))
            .unwrap();

        assert_eq!(summary.action, ActionKind::ExtractImages);
        assert_eq!(summary.plugins_scanned, 2);
        assert_eq!(summary.files_written, 3);
        assert_eq!(summary.skipped_archives, 1);
        assert!(summary.is_clean());
        assert!(output.path().join("org.mule.tooling.http/icons/large/http.png").exists());
        assert!(output.path().join("org.mule.tooling.http/icons/small/http.gif").exists());
        assert!(output.path().join("org.mule.tooling.db/icons/large/db.png").exists());
    }

    #[test]
    fn test_extract_flattened() {
        let workspace = create_workspace();
        let output = TempDir::new().unwrap();

        let mut config = Config::default();
        config.output.preserve_structure = false;

        let summary = ImageExtractor::new(&config)
            .extract(workspace.path(), output.path(), &ProgressManager::new(false))
            .unwrap();

        assert_eq!(summary.files_written, 3);
        assert!(output.path().join("http.png").exists());
        assert!(output.path().join("db.png").exists());
    }

    #[test]
    fn test_flattened_name_collision_keeps_first_image() {
        let workspace = create_workspace();
        let http = workspace.path().join("plugins/org.mule.tooling.http_7.3.0/icons/small");
        fs::write(http.join("http.png"), "small").unwrap();
        let output = TempDir::new().unwrap();

        let mut config = Config::default();
        config.output.preserve_structure = false;

        let summary = ImageExtractor::new(&config)
            .extract(workspace.path(), output.path(), &ProgressManager::new(false))
            .unwrap();

        assert_eq!(summary.files_written, 3);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("http.png"));
        assert_eq!(
            fs::read_to_string(output.path().join("http.png")).unwrap(),
            "icons/large/http.png"
        );
    }

    #[test]
    fn test_existing_files_reported_without_overwrite() {
        let workspace = create_workspace();
        let output = TempDir::new().unwrap();
        let existing = output.path().join("org.mule.tooling.db/icons/large");
        fs::create_dir_all(&existing).unwrap();
        fs::write(existing.join("db.png"), "keep").unwrap();

        let mut config = Config::default();
        config.output.overwrite = false;

        let summary = ImageExtractor::new(&config)
            .extract(workspace.path(), output.path(), &ProgressManager::new(false))
            .unwrap();

        assert_eq!(summary.files_written, 2);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(fs::read_to_string(existing.join("db.png")).unwrap(), "keep");
    }
}
