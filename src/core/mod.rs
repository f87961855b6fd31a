pub mod aggregate;
pub mod evaluator;
pub mod identity;
pub mod lookup;
pub mod schema;
pub mod scoring;
pub mod subjects;

pub use crate::domain::model::{Grade, Outcome, Record, ResultSummary, SubjectComponent, Table};
pub use crate::domain::ports::{RecordSource, ScoringProvider};
pub use crate::utils::error::Result;
