use crate::config::SourceConfig;
use crate::core::{RecordSource, Table};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const FULL_RANGE: &str = "A:ZZ";

/// Body of a Sheets API v4 `spreadsheets.values.get` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Reads the result sheet through the Google Sheets values API.
pub struct SheetsSource {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    sheet_name: Option<String>,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl SheetsSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let spreadsheet_id =
            validation::validate_required_field("source.spreadsheet_id", &config.spreadsheet_id)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.trim().to_string(),
            sheet_name: config.sheet_name().map(str::to_string),
            api_key: config.api_key().map(str::to_string),
            access_token: config.access_token().map(str::to_string),
        })
    }

    /// 指定工作表時使用 `'名稱'!A:ZZ`，否則讀取第一個工作表
    pub fn range(&self) -> String {
        match &self.sheet_name {
            Some(name) => format!("'{}'!{}", name.replace('\'', "''"), FULL_RANGE),
            None => FULL_RANGE.to_string(),
        }
    }

    pub fn values_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.api_base).map_err(|e| PortalError::ConfigError {
            message: format!("Invalid Sheets API base '{}': {}", self.api_base, e),
        })?;

        url.path_segments_mut()
            .map_err(|_| PortalError::ConfigError {
                message: format!("Sheets API base '{}' cannot carry a path", self.api_base),
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values"])
            .push(&self.range());

        url.query_pairs_mut().append_pair("majorDimension", "ROWS");
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }

        Ok(url)
    }
}

#[async_trait]
impl RecordSource for SheetsSource {
    async fn fetch_table(&self) -> Result<Table> {
        let url = self.values_url()?;
        tracing::debug!("Requesting sheet range {} of {}", self.range(), self.spreadsheet_id);

        let mut request = self.client.get(url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Sheets API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortalError::upstream(format!(
                "Sheets API returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response.text().await?;
        let value_range: ValueRange = serde_json::from_str(&body)?;

        let rows = value_range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();

        Ok(Table::from_rows(rows))
    }

    fn describe(&self) -> String {
        format!("google sheet {} ({})", self.spreadsheet_id, self.range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;

    fn config(sheet_name: Option<&str>) -> SourceConfig {
        SourceConfig {
            r#type: SourceKind::GoogleSheets,
            spreadsheet_id: Some("sheet123".to_string()),
            sheet_name: sheet_name.map(str::to_string),
            api_key: Some("key-abc".to_string()),
            access_token: None,
            api_base: Some("https://sheets.googleapis.com/".to_string()),
            timeout_seconds: Some(5),
            path: None,
        }
    }

    #[test]
    fn test_range_defaults_to_first_sheet() {
        let source = SheetsSource::new(&config(None)).unwrap();
        assert_eq!(source.range(), "A:ZZ");
    }

    #[test]
    fn test_range_quotes_sheet_name() {
        let source = SheetsSource::new(&config(Some("Class 10's Results"))).unwrap();
        assert_eq!(source.range(), "'Class 10''s Results'!A:ZZ");
    }

    #[test]
    fn test_values_url() {
        let source = SheetsSource::new(&config(Some("Results"))).unwrap();
        let url = source.values_url().unwrap();

        assert_eq!(
            url.path(),
            "/v4/spreadsheets/sheet123/values/'Results'!A:ZZ"
        );
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("majorDimension".to_string(), "ROWS".to_string())));
        assert!(query.contains(&("key".to_string(), "key-abc".to_string())));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(serde_json::json!("S1")), "S1");
        assert_eq!(cell_to_string(serde_json::json!(1042)), "1042");
        assert_eq!(cell_to_string(serde_json::Value::Null), "");
    }

    #[test]
    fn test_missing_spreadsheet_id() {
        let mut cfg = config(None);
        cfg.spreadsheet_id = None;
        assert!(matches!(
            SheetsSource::new(&cfg),
            Err(PortalError::MissingConfigError { .. })
        ));
    }
}
