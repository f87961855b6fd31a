pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{build_source, CsvSource, SheetsSource};
pub use config::AppConfig;
pub use core::{evaluator::ResultEvaluator, lookup::LookupService};
pub use utils::error::{PortalError, Result};
