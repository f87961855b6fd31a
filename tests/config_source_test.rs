use anyhow::Result;
use result_portal::core::aggregate::TotalMarksPolicy;
use result_portal::core::{RecordSource, ScoringProvider};
use result_portal::utils::validation::Validate;
use result_portal::{build_source, AppConfig, LookupService, PortalError};
use tempfile::TempDir;

/// 從 TOML 檔案建立 CSV 來源並完成一次查詢
#[tokio::test]
async fn test_csv_source_from_config_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("results.csv");
    tokio::fs::write(
        &csv_path,
        "Roll_Number,School_Code,Name,Hindi_Obtained,Hindi_Max_Marks\n101,S1,Asha,80,100\n",
    )
    .await?;

    let config_content = format!(
        r#"
[server]
bind_address = "127.0.0.1:3000"

[source]
type = "csv"
path = "{}"

[scoring]
total_marks_policy = "per_subject"
marks_per_subject = 100

[logging]
level = "debug"
json = true
"#,
        csv_path.to_str().unwrap().replace('\\', "/")
    );

    let config_path = temp_dir.path().join("portal.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let config = AppConfig::from_file(&config_path)?;
    config.validate()?;
    assert!(config.logging.json());
    assert_eq!(
        config.scoring.total_marks_policy(),
        TotalMarksPolicy::PerSubject {
            marks_per_subject: 100
        }
    );

    let source = build_source(&config.source)?;
    assert!(source.describe().contains("results.csv"));

    let service = LookupService::new(source, &config.scoring);
    let summary = service.lookup("101", "S1").await?;
    assert_eq!(summary.total_obtained, 80);
    assert_eq!(summary.percentage, 80.0);
    assert_eq!(summary.grade.as_str(), "A");

    let report = service.inspect().await?;
    assert_eq!(report.rows, 1);
    assert_eq!(report.subjects, vec!["Hindi"]);
    assert_eq!(report.max_marks_columns, 1);

    Ok(())
}

#[tokio::test]
async fn test_reject_policy_surfaces_configuration_defect() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("results.csv");
    tokio::fs::write(
        &csv_path,
        "Roll_Number,School_Code,Remarks,Hindi_Obtained\n101,S1,good,80\n",
    )
    .await?;

    let config = AppConfig::from_toml_str(&format!(
        "[source]\ntype = \"csv\"\npath = \"{}\"\n\n[scoring]\nunknown_columns = \"reject\"\n",
        csv_path.to_str().unwrap().replace('\\', "/")
    ))?;

    let service = LookupService::new(build_source(&config.source)?, &config.scoring);
    let err = service.lookup("101", "S1").await.unwrap_err();
    assert!(matches!(err, PortalError::ConfigurationDefect { .. }));

    Ok(())
}

#[test]
fn test_missing_config_file() {
    let err = AppConfig::from_file("/no/such/portal.toml").unwrap_err();
    assert!(matches!(err, PortalError::IoError(_)));
}
