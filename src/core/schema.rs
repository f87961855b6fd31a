use crate::utils::error::{PortalError, Result};
use serde::{Deserialize, Serialize};

pub const ROLL_NUMBER: &str = "Roll_Number";
pub const SCHOOL_CODE: &str = "School_Code";
pub const NAME: &str = "Name";
pub const CLASS: &str = "Class";
pub const SCHOOL_NAME: &str = "School_Name";
pub const EXAM_NAME: &str = "Exam_Name";
pub const DOB: &str = "DOB";
pub const FATHER_NAME: &str = "Father_Name";
pub const MOTHER_NAME: &str = "Mother_Name";
pub const SIGNATURE: &str = "Signature";

pub const OBTAINED_MARKER: &str = "_Obtained";
pub const MAX_MARKS_MARKER: &str = "_Max_Marks";

const REQUIRED_COLUMNS: [&str; 2] = [ROLL_NUMBER, SCHOOL_CODE];
const PROFILE_COLUMNS: [&str; 8] = [
    NAME,
    CLASS,
    SCHOOL_NAME,
    EXAM_NAME,
    DOB,
    FATHER_NAME,
    MOTHER_NAME,
    SIGNATURE,
];

/// What to do with a header that is neither identity, profile nor subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownColumns {
    #[default]
    Skip,
    Reject,
}

pub fn is_subject_column(name: &str) -> bool {
    name.contains(OBTAINED_MARKER) || name.contains(MAX_MARKS_MARKER)
}

/// 欄位名稱第一個底線之前的部分
pub fn base_subject(name: &str) -> &str {
    name.split('_').next().unwrap_or("")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectColumns {
    pub subject: String,
    pub obtained: Vec<String>,
    pub max_marks: Vec<String>,
}

/// Subject layout declared from a sheet's header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSchema {
    subjects: Vec<SubjectColumns>,
    components: Vec<String>,
    skipped: Vec<String>,
}

impl SubjectSchema {
    pub fn from_headers(headers: &[String], unknown: UnknownColumns) -> Result<Self> {
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(PortalError::defect(format!(
                    "expected column '{}' is absent from the sheet header",
                    required
                )));
            }
        }

        let mut subjects: Vec<SubjectColumns> = Vec::new();
        let mut components = Vec::new();
        let mut skipped = Vec::new();

        for header in headers.iter().filter(|h| !h.is_empty()) {
            let name = header.as_str();
            if REQUIRED_COLUMNS.contains(&name) || PROFILE_COLUMNS.contains(&name) {
                continue;
            }

            let base = base_subject(name);
            if !is_subject_column(name) || base.is_empty() {
                match unknown {
                    UnknownColumns::Skip => {
                        tracing::debug!("Skipping unmatched column '{}'", name);
                        skipped.push(header.clone());
                        continue;
                    }
                    UnknownColumns::Reject => {
                        return Err(PortalError::defect(format!(
                            "column '{}' does not match any declared subject",
                            name
                        )));
                    }
                }
            }

            let index = match subjects.iter().position(|s| s.subject == base) {
                Some(index) => index,
                None => {
                    subjects.push(SubjectColumns {
                        subject: base.to_string(),
                        obtained: Vec::new(),
                        max_marks: Vec::new(),
                    });
                    subjects.len() - 1
                }
            };

            if name.contains(OBTAINED_MARKER) {
                subjects[index].obtained.push(header.clone());
            } else {
                subjects[index].max_marks.push(header.clone());
            }
            components.push(header.clone());
        }

        Ok(Self {
            subjects,
            components,
            skipped,
        })
    }

    pub fn subjects(&self) -> &[SubjectColumns] {
        &self.subjects
    }

    /// Subject columns in header order.
    pub fn component_columns(&self) -> &[String] {
        &self.components
    }

    pub fn skipped_columns(&self) -> &[String] {
        &self.skipped
    }
}
