use crate::core::schema::{base_subject, OBTAINED_MARKER};
use crate::core::SubjectComponent;

/// How the denominator of the percentage is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalMarksPolicy {
    /// `marks_per_subject` for every distinct base subject.
    PerSubject { marks_per_subject: u32 },
    /// Same total for everyone regardless of subject count.
    Fixed { total_marks: u32 },
}

impl Default for TotalMarksPolicy {
    fn default() -> Self {
        TotalMarksPolicy::PerSubject {
            marks_per_subject: 100,
        }
    }
}

impl TotalMarksPolicy {
    pub fn total_marks(&self, subject_count: usize) -> u32 {
        match *self {
            TotalMarksPolicy::PerSubject { marks_per_subject } => {
                marks_per_subject.saturating_mul(subject_count as u32)
            }
            TotalMarksPolicy::Fixed { total_marks } => total_marks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectTotal {
    pub subject: String,
    pub obtained: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub per_subject: Vec<SubjectTotal>,
    pub total_obtained: u32,
    pub total_marks: u32,
}

pub fn aggregate(components: &[SubjectComponent], policy: TotalMarksPolicy) -> Totals {
    let mut bases: Vec<&str> = Vec::new();
    for component in components {
        let base = base_subject(&component.name);
        if !base.is_empty() && !bases.contains(&base) {
            bases.push(base);
        }
    }

    let per_subject: Vec<SubjectTotal> = bases
        .iter()
        .map(|base| {
            let prefix = format!("{}_", base);
            let obtained = components
                .iter()
                .filter(|c| c.name.starts_with(&prefix) && c.name.contains(OBTAINED_MARKER))
                .fold(0u32, |acc, c| acc.saturating_add(c.obtained));
            SubjectTotal {
                subject: base.to_string(),
                obtained,
            }
        })
        .collect();

    let total_obtained = per_subject
        .iter()
        .fold(0u32, |acc, s| acc.saturating_add(s.obtained));

    Totals {
        total_marks: policy.total_marks(per_subject.len()),
        per_subject,
        total_obtained,
    }
}
