//! Utility modules for sg-toolbox

pub mod dryrun;
pub mod errors;
pub mod logger;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod usage;

// Re-export commonly used items
pub use errors::{Result, SgError};
pub use logger::{log_error, log_info, log_warn};
pub use output::OutputFormat;
pub use progress::{spinner_config, with_spinner, Spinner};
pub use prompt::{ask_for_confirmation, ask_for_confirmation_from, confirm_unless};
pub use usage::FlagUsage;
