use crate::config::ScanConfig;
use regex::Regex;
use std::path::Path;

pub struct FileFilter {
    image_extensions: Vec<String>,
    descriptor_extensions: Vec<String>,
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &ScanConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            image_extensions: lowercase_all(&config.image_extensions),
            descriptor_extensions: lowercase_all(&config.descriptor_extensions),
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_patterns,
        }
    }

    pub fn is_image_file(&self, path: &Path) -> bool {
        has_extension(path, &self.image_extensions)
    }

    pub fn is_descriptor_file(&self, path: &Path) -> bool {
        has_extension(path, &self.descriptor_extensions)
    }

    pub fn is_archive(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"))
    }

    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        let Some(dir_name) = path.file_name().and_then(|s| s.to_str()) else {
            return true;
        };

        if self
            .exclude_dirs
            .iter()
            .any(|exclude| exclude.eq_ignore_ascii_case(dir_name))
        {
            return false;
        }

        if self.matches_any_pattern(&path.to_string_lossy()) {
            return false;
        }

        // Hidden directories never hold plugins
        if dir_name.starts_with('.') && dir_name != "." && dir_name != ".." {
            return false;
        }

        true
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> ScanConfig {
        ScanConfig {
            exclude_dirs: vec!["p2".to_string(), "jre".to_string()],
            exclude_patterns: vec![r"\.source_".to_string()],
            ..ScanConfig::default()
        }
    }

    #[test]
    fn test_image_file_detection() {
        let filter = FileFilter::new(&create_test_config());

        assert!(filter.is_image_file(Path::new("icons/large/http.png")));
        assert!(filter.is_image_file(Path::new("icons/small/http.GIF")));
        assert!(filter.is_image_file(Path::new("logo.Svg")));

        assert!(!filter.is_image_file(Path::new("plugin.xml")));
        assert!(!filter.is_image_file(Path::new("README")));
        assert!(!filter.is_image_file(Path::new("png")));
    }

    #[test]
    fn test_descriptor_and_archive_detection() {
        let filter = FileFilter::default();

        assert!(filter.is_descriptor_file(Path::new("editors/http.xml")));
        assert!(filter.is_descriptor_file(Path::new("EDITORS.XML")));
        assert!(!filter.is_descriptor_file(Path::new("http.png")));

        assert!(filter.is_archive(Path::new("plugins/org.mule.tooling.core_7.3.0.jar")));
        assert!(filter.is_archive(Path::new("BUNDLE.JAR")));
        assert!(!filter.is_archive(Path::new("plugins/org.mule.tooling.core_7.3.0")));
    }

    #[test]
    fn test_directory_traversal_rules() {
        let filter = FileFilter::new(&create_test_config());

        assert!(filter.should_traverse_directory(Path::new("plugins")));
        assert!(filter.should_traverse_directory(Path::new("org.mule.tooling.core_7.3.0")));

        assert!(!filter.should_traverse_directory(Path::new("p2")));
        assert!(!filter.should_traverse_directory(Path::new("JRE")));
        assert!(!filter.should_traverse_directory(Path::new(".metadata")));
        let source_bundle = Path::new("plugins/org.mule.tooling.core.source_7.3.0");
        assert!(!filter.should_traverse_directory(source_bundle));
    }

    #[test]
    fn test_invalid_patterns_are_ignored() {
        let config = ScanConfig {
            exclude_patterns: vec!["(".to_string()],
            ..ScanConfig::default()
        };
        let filter = FileFilter::new(&config);
        assert!(!filter.matches_any_pattern("anything"));
    }
}
