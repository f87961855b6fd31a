use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 一列原始資料：欄位名稱 -> 儲存格字串
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, String>,
}

impl Record {
    pub fn new(data: HashMap<String, String>) -> Self {
        Self { data }
    }

    /// 讀取欄位，缺少的欄位視為空字串
    pub fn field(&self, name: &str) -> &str {
        self.data.get(name).map(String::as_str).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Header row plus the data rows of one sheet.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    /// Builds a table from raw rows where the first row is the header.
    ///
    /// Header cells are trimmed, short rows are padded with empty cells and
    /// rows with no content at all are dropped.
    pub fn from_rows(mut raw: Vec<Vec<String>>) -> Self {
        if raw.is_empty() {
            return Self::default();
        }

        let headers: Vec<String> = raw
            .remove(0)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        let rows = raw
            .into_iter()
            .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|cells| {
                headers
                    .iter()
                    .enumerate()
                    .filter(|(_, h)| !h.is_empty())
                    .map(|(i, h)| (h.clone(), cells.get(i).cloned().unwrap_or_default()))
                    .collect::<Record>()
            })
            .collect();

        Self { headers, rows }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectComponent {
    pub name: String,
    pub obtained: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => f.write_str("PASS"),
            Outcome::Fail => f.write_str("FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub roll_number: String,
    pub name: String,
    pub class: String,
    pub school: String,
    pub exam_name: String,
    pub dob: String,
    pub father_name: String,
    pub mother_name: String,
    pub signature: String,
    pub subjects: Vec<SubjectComponent>,
    pub total_obtained: u32,
    pub total_marks: u32,
    pub percentage: f64,
    pub grade: Grade,
    pub result: Outcome,
}
