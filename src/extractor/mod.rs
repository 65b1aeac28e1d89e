pub mod descriptors;
pub mod file_operations;
pub mod images;
pub mod light_theme;
pub mod mappings;
pub mod summary;
pub mod widget_types;

pub use descriptors::{DescriptorReader, NamespaceDescriptor, WidgetDefinition};
pub use file_operations::{CopyJob, ExtractionProgress, FileOperations};
pub use images::ImageExtractor;
pub use light_theme::LightThemeApplier;
pub use mappings::{MappingEntry, MappingGenerator};
pub use summary::ActionSummary;
pub use widget_types::WidgetTypeExtractor;
