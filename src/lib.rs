pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{ActionKind, Cli, ParsedIntent, Validator, EXIT_FAILURE, EXIT_SUCCESS};
pub use config::{Config, OutputConfig, ScanConfig, ThemeConfig};
pub use dispatch::{dispatch, ensure_output_ready, ExtractionActions};
pub use error::{ExtractorError, Result, UserFriendlyError};

// Collaborator re-exports
pub use extractor::{
    ActionSummary, ImageExtractor, LightThemeApplier, MappingGenerator, WidgetTypeExtractor,
};
pub use scanner::{FileFilter, PluginPackage, PluginScanner};
pub use ui::{OutputFormatter, ProgressManager};

use std::ffi::OsString;
use std::path::Path;

/// Runs the extraction collaborators and reports their outcome to the user.
pub struct MulePreviewExtractor {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl MulePreviewExtractor {
    pub fn new(
        config: Config,
        output_formatter: OutputFormatter,
        progress_manager: ProgressManager,
    ) -> Self {
        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn handle_error(&self, error: &ExtractorError) {
        log::debug!("{:?}", error);
        self.output_formatter.print_user_friendly_error(error);
    }

    fn report(&self, action: ActionKind, result: Result<ActionSummary>) {
        match result {
            Ok(summary) => self.output_formatter.print_action_summary(&summary),
            Err(e) => {
                log::warn!("{} failed: {}", action, e);
                self.handle_error(&e);
            }
        }
    }
}

impl ExtractionActions for MulePreviewExtractor {
    fn apply_light_theme(&self, source_dir: &Path, output_dir: &Path) {
        self.output_formatter.start_operation("Applying light theme");
        let result = LightThemeApplier::new(&self.config)
            .and_then(|applier| applier.apply(source_dir, output_dir, &self.progress_manager));
        self.report(ActionKind::ApplyLightTheme, result);
    }

    fn extract_images(&self, source_dir: &Path, output_dir: &Path) {
        self.output_formatter.start_operation("Extracting images");
        let extractor = ImageExtractor::new(&self.config);
        let result = extractor.extract(source_dir, output_dir, &self.progress_manager);
        self.report(ActionKind::ExtractImages, result);
    }

    fn extract_widget_types(&self, source_dir: &Path, output_dir: &Path) {
        self.output_formatter.start_operation("Extracting widget types");
        let result = WidgetTypeExtractor::new(&self.config)
            .and_then(|extractor| extractor.extract(source_dir, output_dir));
        self.report(ActionKind::ExtractWidgetTypes, result);
    }

    fn generate_mappings(&self, source_dir: &Path, output_dir: &Path) {
        self.output_formatter.start_operation("Generating mappings");
        let result = MappingGenerator::new(&self.config)
            .and_then(|generator| generator.generate(source_dir, output_dir));
        self.report(ActionKind::GenerateMappings, result);
    }
}

/// Validate `args` (without the program name), prepare the output directory
/// and dispatch. Returns the process exit code.
pub fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let validator = Validator::new();

    let intent = validator.validate(args);
    let (action, source_dir, output_dir) = match intent {
        ParsedIntent::HelpRequested { ref text } => {
            println!("{}", text);
            return intent.exit_code();
        }
        ParsedIntent::ValidationFailed { ref text } => {
            eprintln!("{}", text);
            return intent.exit_code();
        }
        ParsedIntent::ActionRequested {
            action,
            source_dir,
            output_dir,
        } => (action, source_dir, output_dir),
    };

    let output_formatter = OutputFormatter::for_terminal();

    let config = match Config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            output_formatter.print_user_friendly_error(&e);
            return EXIT_FAILURE;
        }
    };

    if let Err(e) = ensure_output_ready(&output_dir) {
        output_formatter.print_user_friendly_error(&e);
        return EXIT_FAILURE;
    }

    let extractor =
        MulePreviewExtractor::new(config, output_formatter, ProgressManager::for_terminal());
    dispatch(action, &extractor, &source_dir, &output_dir);

    EXIT_SUCCESS
}
