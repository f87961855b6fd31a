use crate::core::aggregate::{aggregate, TotalMarksPolicy};
use crate::core::schema::{
    SubjectSchema, CLASS, DOB, EXAM_NAME, FATHER_NAME, MOTHER_NAME, NAME, ROLL_NUMBER,
    SCHOOL_NAME, SIGNATURE,
};
use crate::core::scoring::{letter_grade, outcome, percentage};
use crate::core::subjects::extract_components;
use crate::core::{Record, ResultSummary};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultEvaluator {
    policy: TotalMarksPolicy,
}

impl ResultEvaluator {
    pub fn new(policy: TotalMarksPolicy) -> Self {
        Self { policy }
    }

    /// Computes the summary for an already authorized record.
    pub fn evaluate(&self, record: &Record, schema: &SubjectSchema) -> ResultSummary {
        let subjects = extract_components(record, schema);
        let totals = aggregate(&subjects, self.policy);
        let percentage = percentage(totals.total_obtained, totals.total_marks);

        if percentage > 100.0 {
            tracing::warn!(
                "Roll number '{}' scores {}% ({} / {}), check the marks columns",
                record.field(ROLL_NUMBER),
                percentage,
                totals.total_obtained,
                totals.total_marks
            );
        }

        tracing::debug!(
            "Evaluated roll number '{}': {} subjects, {} / {}",
            record.field(ROLL_NUMBER),
            totals.per_subject.len(),
            totals.total_obtained,
            totals.total_marks
        );

        ResultSummary {
            roll_number: record.field(ROLL_NUMBER).to_string(),
            name: record.field(NAME).to_string(),
            class: record.field(CLASS).to_string(),
            school: record.field(SCHOOL_NAME).to_string(),
            exam_name: record.field(EXAM_NAME).to_string(),
            dob: record.field(DOB).to_string(),
            father_name: record.field(FATHER_NAME).to_string(),
            mother_name: record.field(MOTHER_NAME).to_string(),
            signature: record.field(SIGNATURE).to_string(),
            subjects,
            total_obtained: totals.total_obtained,
            total_marks: totals.total_marks,
            percentage,
            grade: letter_grade(percentage),
            result: outcome(percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::UnknownColumns;
    use crate::core::{Grade, Outcome};

    fn schema_for(record: &Record) -> SubjectSchema {
        let mut headers: Vec<String> = record.data.keys().cloned().collect();
        headers.sort();
        SubjectSchema::from_headers(&headers, UnknownColumns::Skip).unwrap()
    }

    fn hindi_record() -> Record {
        [
            ("Roll_Number", "101"),
            ("School_Code", "S1"),
            ("Name", "Asha Verma"),
            ("Class", "10-A"),
            ("School_Name", "Govt. Model School"),
            ("Exam_Name", "Annual 2024"),
            ("Hindi_Obtained", "80"),
            ("Hindi_Max_Marks", "100"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_single_subject_per_subject_policy() {
        let record = hindi_record();
        let summary = ResultEvaluator::default().evaluate(&record, &schema_for(&record));

        assert_eq!(summary.total_obtained, 80);
        assert_eq!(summary.total_marks, 100);
        assert_eq!(summary.percentage, 80.0);
        assert_eq!(summary.grade, Grade::A);
        assert_eq!(summary.result, Outcome::Pass);
        assert_eq!(summary.name, "Asha Verma");
        assert_eq!(summary.school, "Govt. Model School");
        assert_eq!(summary.dob, "");
        assert_eq!(summary.subjects.len(), 2);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let record = hindi_record();
        let schema = schema_for(&record);
        let evaluator = ResultEvaluator::new(TotalMarksPolicy::Fixed { total_marks: 100 });

        assert_eq!(
            evaluator.evaluate(&record, &schema),
            evaluator.evaluate(&record, &schema)
        );
    }

    #[test]
    fn test_failing_student_across_subjects() {
        let record: Record = [
            ("Roll_Number", "102"),
            ("School_Code", "S1"),
            ("Hindi_Obtained", "20"),
            ("Maths_Obtained", "25"),
            ("Science_Obtained", "30"),
        ]
        .into_iter()
        .collect();

        let summary = ResultEvaluator::default().evaluate(&record, &schema_for(&record));
        assert_eq!(summary.total_obtained, 75);
        assert_eq!(summary.total_marks, 300);
        assert_eq!(summary.percentage, 25.0);
        assert_eq!(summary.grade, Grade::F);
        assert_eq!(summary.result, Outcome::Fail);
    }

    #[test]
    fn test_record_without_subjects() {
        let record: Record = [("Roll_Number", "103"), ("School_Code", "S1")]
            .into_iter()
            .collect();

        let summary = ResultEvaluator::default().evaluate(&record, &schema_for(&record));
        assert_eq!(summary.total_marks, 0);
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(summary.grade, Grade::F);
        assert_eq!(summary.result, Outcome::Fail);
    }
}
