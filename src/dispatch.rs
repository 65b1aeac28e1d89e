//! Environment preparation and action routing.
//!
//! Once an argument vector has been validated into an action with its two
//! directories, [`ensure_output_ready`] makes sure the output tree exists and
//! [`dispatch`] hands control to the single collaborator for that action.

use crate::cli::ActionKind;
use crate::error::{ExtractorError, Result};
use std::fs;
use std::path::Path;

/// The four extraction entry points an action can be routed to.
///
/// Implementations own their failure handling: nothing is returned to the
/// router.
pub trait ExtractionActions {
    fn apply_light_theme(&self, source_dir: &Path, output_dir: &Path);
    fn extract_images(&self, source_dir: &Path, output_dir: &Path);
    fn extract_widget_types(&self, source_dir: &Path, output_dir: &Path);
    fn generate_mappings(&self, source_dir: &Path, output_dir: &Path);
}

/// Create `output_dir` and any missing ancestors. Existing directories are
/// left untouched.
pub fn ensure_output_ready(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|source| ExtractorError::OutputDirectory {
        path: output_dir.display().to_string(),
        source,
    })?;

    log::debug!("output directory ready: {}", output_dir.display());
    Ok(())
}

/// Invoke the collaborator for `action` exactly once.
pub fn dispatch<A>(action: ActionKind, actions: &A, source_dir: &Path, output_dir: &Path)
where
    A: ExtractionActions + ?Sized,
{
    log::info!(
        "dispatching {} (source: {}, output: {})",
        action,
        source_dir.display(),
        output_dir.display()
    );

    match action {
        ActionKind::ApplyLightTheme => actions.apply_light_theme(source_dir, output_dir),
        ActionKind::ExtractImages => actions.extract_images(source_dir, output_dir),
        ActionKind::ExtractWidgetTypes => actions.extract_widget_types(source_dir, output_dir),
        ActionKind::GenerateMappings => actions.generate_mappings(source_dir, output_dir),
    }
}
