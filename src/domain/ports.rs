use crate::core::aggregate::TotalMarksPolicy;
use crate::core::schema::UnknownColumns;
use crate::domain::model::Table;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read-only tabular source of student records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_table(&self) -> Result<Table>;

    /// 用於日誌的來源描述
    fn describe(&self) -> String;
}

#[async_trait]
impl RecordSource for Box<dyn RecordSource> {
    async fn fetch_table(&self) -> Result<Table> {
        (**self).fetch_table().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

pub trait ScoringProvider: Send + Sync {
    fn total_marks_policy(&self) -> TotalMarksPolicy;
    fn unknown_columns(&self) -> UnknownColumns;
}
