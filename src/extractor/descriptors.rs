//! Widget definitions from Studio editor descriptors.
//!
//! Descriptors are matched at the level of start tags and their attributes;
//! the documents are never parsed as XML. A descriptor is a document whose
//! first element is `namespace` with a `prefix` attribute, and every later
//! element carrying a `localId` attribute defines one widget.

use crate::error::Result;
use crate::scanner::{PluginPackage, PluginScan, PluginScanner};
use regex::Regex;
use std::collections::HashMap;
use std::fs;

const COMMENT_PATTERN: &str = r"(?s)<!--.*?-->";
// Quoted attribute values may contain '>'.
const START_TAG_PATTERN: &str = r#"<([A-Za-z_][\w.:-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#;
const ATTRIBUTE_PATTERN: &str = r#"([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDefinition {
    pub widget_type: String,
    pub local_id: String,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDescriptor {
    pub prefix: String,
    pub widgets: Vec<WidgetDefinition>,
}

pub struct DescriptorReader {
    comment: Regex,
    start_tag: Regex,
    attribute: Regex,
}

impl DescriptorReader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            comment: Regex::new(COMMENT_PATTERN)?,
            start_tag: Regex::new(START_TAG_PATTERN)?,
            attribute: Regex::new(ATTRIBUTE_PATTERN)?,
        })
    }

    /// Returns `None` when `content` is not a namespace descriptor.
    pub fn parse(&self, content: &str) -> Option<NamespaceDescriptor> {
        let content = self.comment.replace_all(content, "");
        let mut tags = self.start_tag.captures_iter(&content);

        let root = tags.next()?;
        if local_name(&root[1]) != "namespace" {
            return None;
        }
        let prefix = self
            .attributes(&root[2])
            .remove("prefix")
            .filter(|p| !p.is_empty())?;

        let widgets = tags
            .filter_map(|tag| {
                let mut attributes = self.attributes(&tag[2]);
                let local_id = attributes.remove("localId").filter(|id| !id.is_empty())?;

                Some(WidgetDefinition {
                    widget_type: local_name(&tag[1]).to_string(),
                    local_id,
                    image: attributes.remove("image").filter(|v| !v.is_empty()),
                    icon: attributes.remove("icon").filter(|v| !v.is_empty()),
                    description: attributes.remove("description").filter(|v| !v.is_empty()),
                })
            })
            .collect();

        Some(NamespaceDescriptor { prefix, widgets })
    }

    fn attributes(&self, text: &str) -> HashMap<String, String> {
        self.attribute
            .captures_iter(text)
            .map(|caps| {
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or("");
                (caps[1].to_string(), decode_entities(value))
            })
            .collect()
    }
}

/// Every namespace descriptor found in the scanned packages, in scan order.
pub struct WorkspaceDescriptors {
    pub entries: Vec<(PluginPackage, NamespaceDescriptor)>,
    pub files_read: usize,
    pub errors: Vec<String>,
}

pub fn read_workspace_descriptors(
    scanner: &PluginScanner,
    reader: &DescriptorReader,
    scan: &PluginScan,
) -> Result<WorkspaceDescriptors> {
    let mut result = WorkspaceDescriptors {
        entries: Vec::new(),
        files_read: 0,
        errors: Vec::new(),
    };

    for package in &scan.packages {
        let listing = scanner.list_descriptors(package)?;
        result.errors.extend(listing.errors);

        for file in listing.files {
            let content = match fs::read_to_string(&file.source_path) {
                Ok(content) => content,
                Err(e) => {
                    result
                        .errors
                        .push(format!("Failed to read {}: {}", file.source_path.display(), e));
                    continue;
                }
            };
            result.files_read += 1;

            if let Some(descriptor) = reader.parse(&content) {
                log::debug!(
                    "{}: namespace '{}' with {} widgets",
                    file.source_path.display(),
                    descriptor.prefix,
                    descriptor.widgets.len()
                );
                result.entries.push((package.clone(), descriptor));
            }
        }
    }

    Ok(result)
}

fn local_name(tag: &str) -> &str {
    tag.rsplit(':').next().unwrap_or(tag)
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
