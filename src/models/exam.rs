//! Company, mock exam and exam result structures.

use serde::{Deserialize, Serialize};

/// A company that publishes mock exams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,
}

/// Payload for creating a company.
#[derive(Debug, Clone, Serialize)]
pub struct NewCompany {
    #[serde(rename = "nome")]
    pub name: String,
}

/// A mock exam as listed by `/api/simulados`.
///
/// The server composes `display_name` from company, number or specific
/// name, and category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockExam {
    pub id: i64,

    #[serde(rename = "nome_display")]
    pub display_name: String,

    /// Exam date, already formatted `dd/mm/yyyy` by the server
    #[serde(rename = "data")]
    pub date: String,
}

impl MockExam {
    /// Label used in selectors and listings.
    pub fn label(&self) -> String {
        format!("{} - {}", self.display_name, self.date)
    }
}

/// Payload for creating a mock exam.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewMockExam {
    #[serde(rename = "empresa_id")]
    pub company_id: i64,

    #[serde(rename = "numero")]
    pub number: Option<i64>,

    #[serde(rename = "nome_especifico")]
    pub specific_name: Option<String>,

    #[serde(rename = "categoria")]
    pub category: String,

    /// `YYYY-MM-DD`
    #[serde(rename = "data_realizacao")]
    pub date: String,
}

/// A recently entered exam score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentResult {
    pub id: i64,

    #[serde(rename = "aluno_nome")]
    pub student_name: String,

    #[serde(rename = "simulado_nome")]
    pub exam_name: String,

    #[serde(rename = "nota")]
    pub score: f64,
}

/// Payload for entering an exam score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewResult {
    #[serde(rename = "aluno_id")]
    pub student_id: i64,

    #[serde(rename = "simulado_id")]
    pub exam_id: i64,

    #[serde(rename = "nota")]
    pub score: f64,
}
