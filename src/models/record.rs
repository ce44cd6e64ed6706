//! Question-practice registration structures.

use serde::{Deserialize, Serialize};

/// A recently registered practice batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentRecord {
    pub id: i64,

    #[serde(rename = "aluno_nome")]
    pub student_name: String,

    #[serde(rename = "questoes")]
    pub questions: i64,

    #[serde(rename = "acertos")]
    pub correct: i64,
}

/// Payload for registering a practice batch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewRecord {
    #[serde(rename = "aluno_id")]
    pub student_id: i64,

    #[serde(rename = "quantidade")]
    pub questions: i64,

    #[serde(rename = "acertos")]
    pub correct: i64,
}
