pub mod file_filter;
pub mod plugin_scanner;

pub use file_filter::FileFilter;
pub use plugin_scanner::{AssetFile, AssetListing, PluginPackage, PluginScan, PluginScanner};
