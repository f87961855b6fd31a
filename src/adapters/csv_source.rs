use crate::config::SourceConfig;
use crate::core::{RecordSource, Table};
use crate::utils::error::Result;
use crate::utils::validation;
use async_trait::async_trait;
use std::path::PathBuf;

/// Result sheet exported as a local CSV file (first row is the header).
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let path = validation::validate_required_field("source.path", &config.path)?;
        Ok(Self::new(path))
    }

    pub fn parse(data: &[u8]) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table::from_rows(rows))
    }
}

#[async_trait]
impl RecordSource for CsvSource {
    async fn fetch_table(&self) -> Result<Table> {
        let data = tokio::fs::read(&self.path).await?;
        tracing::debug!("Read {} bytes from {}", data.len(), self.path.display());
        Self::parse(&data)
    }

    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }
}
