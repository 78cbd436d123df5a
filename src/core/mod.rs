pub mod app_manager;
pub mod errors;
pub mod system_clock;

pub use app_manager::{AppManager, LoadOutcome};
pub use errors::{AppError, CliError};
pub use system_clock::SystemClock;
