use crate::core::{Grade, Outcome};

/// Minimum percentage for a PASS.
pub const PASS_PERCENTAGE: f64 = 33.0;

/// | percentage >= | grade |
/// |---------------|-------|
/// | 90            | A+    |
/// | 80            | A     |
/// | 70            | B+    |
/// | 60            | B     |
/// | 50            | C     |
/// | 33            | D     |
/// | otherwise     | F     |
const GRADE_THRESHOLDS: [(f64, Grade); 6] = [
    (90.0, Grade::APlus),
    (80.0, Grade::A),
    (70.0, Grade::BPlus),
    (60.0, Grade::B),
    (50.0, Grade::C),
    (33.0, Grade::D),
];

/// Percentage rounded to two decimals; 0 when there is nothing to divide by.
pub fn percentage(total_obtained: u32, total_marks: u32) -> f64 {
    if total_marks == 0 {
        return 0.0;
    }

    let raw = total_obtained as f64 / total_marks as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

pub fn letter_grade(percentage: f64) -> Grade {
    GRADE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| percentage >= *threshold)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}

pub fn outcome(percentage: f64) -> Outcome {
    if percentage >= PASS_PERCENTAGE {
        Outcome::Pass
    } else {
        Outcome::Fail
    }
}
