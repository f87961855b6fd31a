// Adapters layer: concrete implementations for external systems (sheet sources, http surface).

pub mod csv_source;
pub mod http;
pub mod sheets;

use crate::config::{SourceConfig, SourceKind};
use crate::core::RecordSource;
use crate::utils::error::Result;

pub use csv_source::CsvSource;
pub use sheets::SheetsSource;

pub fn build_source(config: &SourceConfig) -> Result<Box<dyn RecordSource>> {
    let source: Box<dyn RecordSource> = match config.r#type {
        SourceKind::GoogleSheets => Box::new(SheetsSource::new(config)?),
        SourceKind::Csv => Box::new(CsvSource::from_config(config)?),
    };
    tracing::info!("📄 Data source: {}", source.describe());
    Ok(source)
}
