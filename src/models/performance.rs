//! Date-range performance summary structures.

use serde::{Deserialize, Serialize};

use crate::models::ranking::lenient_number;

/// Totals for one student over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceSummary {
    #[serde(rename = "aluno_nome")]
    pub student_name: String,

    #[serde(rename = "data_inicio")]
    pub start: String,

    #[serde(rename = "data_fim")]
    pub end: String,

    #[serde(rename = "total_questoes", deserialize_with = "lenient_number")]
    pub total_questions: f64,

    #[serde(rename = "total_acertos", deserialize_with = "lenient_number")]
    pub total_correct: f64,

    #[serde(rename = "percentual_total", deserialize_with = "lenient_number")]
    pub total_percentage: f64,

    #[serde(rename = "dados_diarios", default)]
    pub daily: Vec<DailyPoint>,
}

/// One calendar day inside the queried range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPoint {
    /// `YYYY-MM-DD`
    #[serde(rename = "data")]
    pub date: String,

    #[serde(rename = "questoes", deserialize_with = "lenient_number")]
    pub questions: f64,

    #[serde(rename = "acertos", default, deserialize_with = "lenient_number")]
    pub correct: f64,

    #[serde(rename = "percentual", deserialize_with = "lenient_number")]
    pub percentage: f64,
}
