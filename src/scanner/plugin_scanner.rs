use crate::config::ScanConfig;
use crate::error::{ExtractorError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// An unpacked plugin directory inside the Anypoint Studio installation.
#[derive(Debug, Clone)]
pub struct PluginPackage {
    pub root: PathBuf,
    pub relative_path: PathBuf,
    pub name: String,
    pub id: String,
}

impl PluginPackage {
    pub fn new(root: PathBuf, relative_path: PathBuf) -> Self {
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        let id = plugin_id(&name).to_string();

        Self {
            root,
            relative_path,
            name,
            id,
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

/// Strip a trailing bundle version, e.g. `org.mule.tooling.core_7.3.0.2019` becomes
/// `org.mule.tooling.core`.
pub fn plugin_id(name: &str) -> &str {
    name.char_indices()
        .find(|&(i, c)| c == '_' && name[i + 1..].starts_with(|next: char| next.is_ascii_digit()))
        .map(|(i, _)| &name[..i])
        .unwrap_or(name)
}

/// A file inside a plugin package.
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl AssetFile {
    pub fn new(
        source_path: PathBuf,
        relative_path: PathBuf,
        size: u64,
        modified: SystemTime,
    ) -> Self {
        let filename = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            source_path,
            relative_path,
            filename,
            size,
            modified,
        }
    }
}

#[derive(Debug, Default)]
pub struct PluginScan {
    pub packages: Vec<PluginPackage>,
    pub skipped_archives: Vec<PathBuf>,
    pub errors: Vec<String>,
}

#[derive(Debug, Default)]
pub struct AssetListing {
    pub files: Vec<AssetFile>,
    pub errors: Vec<String>,
}

pub struct PluginScanner {
    filter: FileFilter,
    max_depth: usize,
    markers: Vec<String>,
}

impl PluginScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
            max_depth: config.max_depth,
            markers: config.plugin_markers.clone(),
        }
    }

    /// Find every plugin package below `root`. Packages are not searched for
    /// nested packages.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<PluginScan> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(ExtractorError::SourceNotFound {
                path: root_path.display().to_string(),
            });
        }

        let mut scan = PluginScan::default();

        let mut walker = WalkDir::new(root_path)
            .max_depth(self.max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        scan.errors.push(format!("Permission denied: {}", err));
                    } else {
                        scan.errors.push(format!("Scan error: {}", err));
                    }
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_dir() && self.is_plugin_dir(path) {
                let relative_path = relative_path(path, root_path)?;
                log::debug!("found plugin package {}", relative_path.display());
                scan.packages.push(PluginPackage::new(path.to_path_buf(), relative_path));
                walker.skip_current_dir();
            } else if entry.file_type().is_file() && self.filter.is_archive(path) {
                log::debug!("skipping archived plugin {}", path.display());
                scan.skipped_archives.push(path.to_path_buf());
            }
        }

        for error in &scan.errors {
            log::warn!("{}", error);
        }

        finish_scan(scan, root_path)
    }

    pub fn list_images(&self, package: &PluginPackage) -> Result<AssetListing> {
        self.list_assets(package, |filter, path| filter.is_image_file(path))
    }

    pub fn list_descriptors(&self, package: &PluginPackage) -> Result<AssetListing> {
        self.list_assets(package, |filter, path| filter.is_descriptor_file(path))
    }

    fn list_assets<F>(&self, package: &PluginPackage, keep: F) -> Result<AssetListing>
    where
        F: Fn(&FileFilter, &Path) -> bool,
    {
        let mut listing = AssetListing::default();

        let walker = WalkDir::new(&package.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    listing.errors.push(format!("Scan error: {}", err));
                    continue;
                }
            };

            if !entry.file_type().is_file() || !keep(&self.filter, entry.path()) {
                continue;
            }

            match self.process_file(&entry, &package.root) {
                Ok(asset) => listing.files.push(asset),
                Err(err) => listing.errors.push(format!(
                    "Error processing {}: {}",
                    entry.path().display(),
                    err
                )),
            }
        }

        listing.files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(listing)
    }

    fn process_file(&self, entry: &DirEntry, root: &Path) -> Result<AssetFile> {
        let metadata = entry.metadata().map_err(|e| ExtractorError::Io(e.into()))?;
        let relative_path = relative_path(entry.path(), root)?;
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Ok(AssetFile::new(
            entry.path().to_path_buf(),
            relative_path,
            metadata.len(),
            modified,
        ))
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        self.filter.should_traverse_directory(entry.path())
    }

    fn is_plugin_dir(&self, path: &Path) -> bool {
        self.markers.iter().any(|marker| path.join(marker).is_file())
    }
}

/// An empty scan is only a failure when something could not be read; a
/// readable workspace without plugins yields an empty result.
fn finish_scan(mut scan: PluginScan, root: &Path) -> Result<PluginScan> {
    if scan.packages.is_empty() && !scan.errors.is_empty() {
        return Err(ExtractorError::NoPluginsFound {
            path: root.display().to_string(),
        });
    }

    if scan.packages.is_empty() {
        log::warn!("no plugin packages found under {}", root.display());
    }

    scan.packages.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(scan)
}

fn relative_path(path: &Path, root: &Path) -> Result<PathBuf> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ExtractorError::InvalidPath {
            path: format!(
                "Cannot calculate relative path for {} from root {}",
                path.display(),
                root.display()
            ),
        })?;

    if relative
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(ExtractorError::InvalidPath {
            path: format!(
                "Path contains parent directory references: {}",
                relative.display()
            ),
        });
    }

    Ok(relative.to_path_buf())
}
