use crate::core::evaluator::ResultEvaluator;
use crate::core::identity::{authorize, find_student};
use crate::core::schema::{SubjectSchema, UnknownColumns};
use crate::core::{RecordSource, ResultSummary, ScoringProvider};
use crate::utils::error::{PortalError, Result};
use std::time::Instant;

/// Overview of a fetched sheet, used by the dry run.
#[derive(Debug, Clone)]
pub struct TableReport {
    pub rows: usize,
    pub subjects: Vec<String>,
    pub component_columns: usize,
    pub max_marks_columns: usize,
    pub skipped_columns: Vec<String>,
}

pub struct LookupService<S: RecordSource> {
    source: S,
    evaluator: ResultEvaluator,
    unknown_columns: UnknownColumns,
}

impl<S: RecordSource> LookupService<S> {
    pub fn new<C: ScoringProvider>(source: S, scoring: &C) -> Self {
        Self {
            source,
            evaluator: ResultEvaluator::new(scoring.total_marks_policy()),
            unknown_columns: scoring.unknown_columns(),
        }
    }

    pub async fn lookup(&self, roll_number: &str, school_code: &str) -> Result<ResultSummary> {
        if roll_number.trim().is_empty() || school_code.trim().is_empty() {
            return Err(PortalError::InvalidInput {
                message: "roll number and school code are both required".to_string(),
            });
        }

        let start = Instant::now();
        let table = self.source.fetch_table().await?;
        tracing::debug!(
            "Fetched {} rows from {} in {:?}",
            table.rows.len(),
            self.source.describe(),
            start.elapsed()
        );

        let schema = SubjectSchema::from_headers(&table.headers, self.unknown_columns)?;
        let student = find_student(&table.rows, roll_number)?;
        authorize(student, school_code)?;

        Ok(self.evaluator.evaluate(student, &schema))
    }

    /// 讀取一次資料表並回報欄位配置，不做任何查詢
    pub async fn inspect(&self) -> Result<TableReport> {
        let table = self.source.fetch_table().await?;
        let schema = SubjectSchema::from_headers(&table.headers, self.unknown_columns)?;

        Ok(TableReport {
            rows: table.rows.len(),
            subjects: schema
                .subjects()
                .iter()
                .map(|s| s.subject.clone())
                .collect(),
            component_columns: schema.component_columns().len(),
            max_marks_columns: schema.subjects().iter().map(|s| s.max_marks.len()).sum(),
            skipped_columns: schema.skipped_columns().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::TotalMarksPolicy;
    use crate::core::{Grade, Outcome, Table};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockSource {
        rows: Vec<Vec<String>>,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl MockSource {
        fn new(rows: &[&[&str]]) -> Self {
            Self {
                rows: rows
                    .iter()
                    .map(|r| r.iter().map(|c| c.to_string()).collect())
                    .collect(),
                calls: Arc::new(AtomicUsize::new(0)),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(&[])
            }
        }
    }

    #[async_trait]
    impl RecordSource for MockSource {
        async fn fetch_table(&self) -> Result<Table> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PortalError::upstream("connection refused"));
            }
            Ok(Table::from_rows(self.rows.clone()))
        }

        fn describe(&self) -> String {
            "mock".to_string()
        }
    }

    struct MockScoring {
        policy: TotalMarksPolicy,
        unknown: UnknownColumns,
    }

    impl ScoringProvider for MockScoring {
        fn total_marks_policy(&self) -> TotalMarksPolicy {
            self.policy
        }

        fn unknown_columns(&self) -> UnknownColumns {
            self.unknown
        }
    }

    fn scoring() -> MockScoring {
        MockScoring {
            policy: TotalMarksPolicy::default(),
            unknown: UnknownColumns::Skip,
        }
    }

    fn sample_source() -> MockSource {
        MockSource::new(&[
            &["Roll_Number", "School_Code", "Name", "Hindi_Obtained", "Hindi_Max_Marks"],
            &["101", "S1", "Asha", "80", "100"],
            &["102", " S2 ", "Ravi", "25", "100"],
        ])
    }

    #[test]
    fn test_lookup_success() {
        let service = LookupService::new(sample_source(), &scoring());
        let summary = tokio_test::block_on(service.lookup("101", "S1")).unwrap();

        assert_eq!(summary.name, "Asha");
        assert_eq!(summary.total_obtained, 80);
        assert_eq!(summary.percentage, 80.0);
        assert_eq!(summary.grade, Grade::A);
        assert_eq!(summary.result, Outcome::Pass);
    }

    #[tokio::test]
    async fn test_lookup_error_taxonomy() {
        let service = LookupService::new(sample_source(), &scoring());

        assert!(matches!(
            service.lookup("101", "S2").await,
            Err(PortalError::Forbidden { .. })
        ));
        assert!(matches!(
            service.lookup("999", "S1").await,
            Err(PortalError::NotFound { .. })
        ));
        assert!(matches!(
            service.lookup("999", "anything").await,
            Err(PortalError::NotFound { .. })
        ));
        assert!(service.lookup("102", "S2").await.is_ok());
    }

    #[tokio::test]
    async fn test_blank_input_does_not_hit_source() {
        let source = sample_source();
        let calls = source.calls.clone();
        let service = LookupService::new(source, &scoring());

        assert!(matches!(
            service.lookup("101", "  ").await,
            Err(PortalError::InvalidInput { .. })
        ));
        assert!(matches!(
            service.lookup("", "S1").await,
            Err(PortalError::InvalidInput { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let service = LookupService::new(MockSource::failing(), &scoring());
        let err = service.lookup("101", "S1").await.unwrap_err();
        assert!(matches!(err, PortalError::UpstreamError { .. }));
    }

    #[tokio::test]
    async fn test_missing_school_code_column_is_defect() {
        let source = MockSource::new(&[&["Roll_Number", "Hindi_Obtained"], &["101", "80"]]);
        let service = LookupService::new(source, &scoring());

        let err = service.lookup("101", "S1").await.unwrap_err();
        assert!(matches!(err, PortalError::ConfigurationDefect { .. }));
    }

    #[tokio::test]
    async fn test_inspect_reports_schema() {
        let source = MockSource::new(&[
            &[
                "Roll_Number",
                "School_Code",
                "Remarks",
                "Hindi_Obtained",
                "Hindi_Max_Marks",
                "Maths_Obtained",
            ],
            &["101", "S1", "good", "80", "100", "70"],
        ]);
        let service = LookupService::new(source, &scoring());

        let report = service.inspect().await.unwrap();
        assert_eq!(report.rows, 1);
        assert_eq!(report.subjects, vec!["Hindi", "Maths"]);
        assert_eq!(report.component_columns, 3);
        assert_eq!(report.max_marks_columns, 1);
        assert_eq!(report.skipped_columns, vec!["Remarks"]);
    }
}
