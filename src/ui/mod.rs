pub mod output;
pub mod progress;

pub use output::OutputFormatter;
pub use progress::ProgressManager;
