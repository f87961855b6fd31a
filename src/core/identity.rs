use crate::core::schema::{ROLL_NUMBER, SCHOOL_CODE};
use crate::core::Record;
use crate::utils::error::{PortalError, Result};

/// Exact match on `Roll_Number`; the first matching row wins.
pub fn find_student<'a>(records: &'a [Record], roll_number: &str) -> Result<&'a Record> {
    records
        .iter()
        .find(|record| record.field(ROLL_NUMBER) == roll_number)
        .ok_or_else(|| PortalError::NotFound {
            roll_number: roll_number.to_string(),
        })
}

/// 比對學校代碼（兩邊皆去除前後空白）
///
/// A record with an empty stored school code never authorizes anyone.
pub fn authorize(record: &Record, school_code: &str) -> Result<()> {
    let stored = record.field(SCHOOL_CODE).trim();
    let provided = school_code.trim();

    if stored.is_empty() {
        tracing::warn!(
            "Configuration defect: roll number '{}' has no School_Code, rejecting lookup",
            record.field(ROLL_NUMBER)
        );
        return Err(PortalError::Forbidden {
            roll_number: record.field(ROLL_NUMBER).to_string(),
        });
    }

    if stored != provided {
        return Err(PortalError::Forbidden {
            roll_number: record.field(ROLL_NUMBER).to_string(),
        });
    }

    Ok(())
}
