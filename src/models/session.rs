//! Payload for persisting a finished exam session.

use std::collections::BTreeMap;

use serde::Serialize;

/// Body of `POST /api/salvar-tempos-simulado`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionTimes {
    #[serde(rename = "aluno_id")]
    pub student_id: i64,

    #[serde(rename = "simulado_id")]
    pub exam_id: i64,

    /// Seconds, summed over the whole session
    #[serde(rename = "tempo_total_gasto")]
    pub total_seconds: u64,

    /// Seconds per subject
    #[serde(rename = "tempos_por_materia")]
    pub seconds_by_subject: BTreeMap<String, u64>,
}
