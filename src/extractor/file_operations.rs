use crate::error::{ExtractorError, Result};
use crate::scanner::AssetFile;
use serde::Serialize;
use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub bytes_processed: u64,
    pub replaced_files: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl ExtractionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            bytes_processed: 0,
            replaced_files: 0,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn update_file(&mut self, filename: String, outcome: CopyOutcome) {
        self.files_processed += 1;
        self.bytes_processed += outcome.bytes;
        if outcome.replaced {
            self.replaced_files += 1;
        }
        self.current_file = Some(filename);
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    pub bytes: u64,
    pub replaced: bool,
}

/// One asset and where it lands, relative to the output root.
#[derive(Debug, Clone)]
pub struct CopyJob {
    pub asset: AssetFile,
    pub destination: PathBuf,
}

pub struct FileOperations {
    overwrite: bool,
    buffer_size: usize,
}

impl FileOperations {
    pub fn new() -> Self {
        Self {
            overwrite: true,
            buffer_size: 64 * 1024,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Copy every job below `output_root`. A failing job is recorded and the
    /// remaining jobs still run.
    pub fn copy_all(
        &self,
        jobs: &[CopyJob],
        output_root: &Path,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> ExtractionProgress {
        let mut progress = ExtractionProgress::new(jobs.len());

        for job in jobs {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            match self.copy_asset(&job.asset, output_root, &job.destination) {
                Ok(outcome) => {
                    if outcome.bytes != job.asset.size {
                        log::warn!(
                            "{} changed while copying: expected {} bytes, copied {}",
                            job.asset.source_path.display(),
                            job.asset.size,
                            outcome.bytes
                        );
                    }
                    progress.update_file(job.asset.filename.clone(), outcome)
                }
                Err(e) => {
                    let error_msg =
                        format!("Failed to copy {}: {}", job.asset.source_path.display(), e);
                    log::warn!("{}", error_msg);
                    progress.add_error(error_msg);
                }
            }
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        progress
    }

    /// Copy `asset` to `dest_root/relative_path`, stamping the copy with the
    /// modification time recorded when the asset was listed.
    pub fn copy_asset(
        &self,
        asset: &AssetFile,
        dest_root: &Path,
        relative_path: &Path,
    ) -> Result<CopyOutcome> {
        validate_relative_path(relative_path)?;
        let dest_path = dest_root.join(relative_path);

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let outcome = self.secure_copy(&asset.source_path, &dest_path)?;

        let mtime = filetime::FileTime::from_system_time(asset.modified);
        if let Err(e) = filetime::set_file_mtime(&dest_path, mtime) {
            log::debug!("could not set modification time of {}: {}", dest_path.display(), e);
        }

        Ok(outcome)
    }

    fn secure_copy(&self, source: &Path, dest: &Path) -> Result<CopyOutcome> {
        if !source.is_file() {
            return Err(ExtractorError::InvalidPath {
                path: format!("Source is not a file: {}", source.display()),
            });
        }

        validate_file_name(dest)?;

        let replaced = dest.exists();
        if replaced && !self.overwrite {
            return Err(ExtractorError::DestinationExists {
                path: dest.display().to_string(),
            });
        }

        let bytes = self.copy_file_with_buffer(source, dest)?;
        Ok(CopyOutcome { bytes, replaced })
    }

    fn copy_file_with_buffer(&self, source: &Path, dest: &Path) -> Result<u64> {
        let source_file = fs::File::open(source)?;
        let dest_file = fs::File::create(dest)?;

        let mut reader = BufReader::with_capacity(self.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.buffer_size, dest_file);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; 8192];

        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }

            writer.write_all(&buffer[..bytes_read])?;
            total_bytes += bytes_read as u64;
        }

        writer.flush()?;

        Ok(total_bytes)
    }
}

impl Default for FileOperations {
    fn default() -> Self {
        Self::new()
    }
}

/// Where an image of `plugin_id` lands in the output directory. Both image
/// extraction and mapping generation use this so that mappings point at the
/// extracted files.
pub fn image_output_path(
    plugin_id: &str,
    relative_path: &Path,
    preserve_structure: bool,
) -> Result<PathBuf> {
    if preserve_structure {
        Ok(Path::new(plugin_id).join(relative_path))
    } else {
        relative_path
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| ExtractorError::InvalidPath {
                path: relative_path.display().to_string(),
            })
    }
}

/// Forward-slash form of a relative path, for files consumed by other tools.
pub fn to_portable_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<u64> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, &content)?;
    Ok(content.len() as u64)
}

fn validate_relative_path(path: &Path) -> Result<()> {
    if path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return Err(ExtractorError::InvalidPath {
            path: format!("Directory traversal not allowed: {}", path.display()),
        });
    }

    let path_str = path.to_string_lossy();
    if path_str.len() > 4096 {
        return Err(ExtractorError::InvalidPath {
            path: format!("Path too long: {} characters", path_str.len()),
        });
    }

    Ok(())
}

fn validate_file_name(path: &Path) -> Result<()> {
    if let Some(filename) = path.file_name().and_then(|s| s.to_str()) {
        let invalid_chars = ['<', '>', ':', '"', '|', '?', '*'];
        if filename
            .chars()
            .any(|c| invalid_chars.contains(&c) || c.is_control())
        {
            return Err(ExtractorError::InvalidPath {
                path: format!("Filename contains invalid characters: {}", filename),
            });
        }
    }

    Ok(())
}
