//! Leaderboard structures.
//!
//! Aggregated metrics come from SQL `SUM`/division results that the server
//! serializes either as JSON numbers or as decimal strings, so every metric
//! field goes through [`lenient_number`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::subject_times::SubjectTimes;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Deserialize a number that may arrive quoted.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Like [`lenient_number`] for optional fields; `null` stays `None`.
pub fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() || s == "None" => Ok(None),
        Some(NumberOrText::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Entry of a question-count leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountEntry {
    #[serde(rename = "nome")]
    pub name: String,

    #[serde(deserialize_with = "lenient_number")]
    pub total: f64,
}

/// Entry of an accuracy leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PercentEntry {
    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "percentual", deserialize_with = "lenient_number")]
    pub percentage: f64,
}

/// Both leaderboards for a period, as served by `/api/rankings` and
/// `/api/rankings/geral`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Rankings {
    #[serde(rename = "quantidade", default)]
    pub by_count: Vec<CountEntry>,

    #[serde(rename = "percentual", default)]
    pub by_percentage: Vec<PercentEntry>,
}

/// One team's totals in the prior-week battle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamTotals {
    #[serde(rename = "questoes", deserialize_with = "lenient_number")]
    pub questions: f64,

    #[serde(rename = "precisao", deserialize_with = "lenient_number")]
    pub precision: f64,
}

/// The Alpha versus Omega comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Battle {
    #[serde(rename = "Alpha")]
    pub alpha: TeamTotals,

    #[serde(rename = "Omega")]
    pub omega: TeamTotals,

    #[serde(rename = "vencedor")]
    pub winner: String,
}

/// Date range covered by a report, formatted `dd/mm/yyyy`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    #[serde(rename = "inicio")]
    pub start: String,

    #[serde(rename = "fim")]
    pub end: String,
}

/// Prior-week report from `/api/rankings/semana-passada`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WeeklyReport {
    #[serde(flatten)]
    pub rankings: Rankings,

    #[serde(rename = "batalha", default)]
    pub battle: Option<Battle>,

    #[serde(rename = "periodo", default)]
    pub period: Option<Period>,
}

/// A member's contribution inside a team scoreboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberCount {
    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "qtd", deserialize_with = "lenient_number")]
    pub questions: f64,
}

/// Current-week totals of one team, from `/api/batalha/placar`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamScore {
    #[serde(rename = "questoes", deserialize_with = "lenient_number")]
    pub questions: f64,

    #[serde(rename = "acertos", deserialize_with = "lenient_number")]
    pub correct: f64,

    #[serde(rename = "precisao", deserialize_with = "lenient_number")]
    pub precision: f64,

    #[serde(rename = "ranking", default)]
    pub members: Vec<MemberCount>,
}

/// Scoreboard keyed by team name.
pub type TeamScoreboard = BTreeMap<String, TeamScore>;

/// Row of a single exam's leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExamRankingEntry {
    #[serde(rename = "aluno_nome")]
    pub student_name: String,

    #[serde(rename = "nota", deserialize_with = "lenient_number")]
    pub score: f64,

    /// Total minutes spent, when the session timer was used
    #[serde(
        rename = "tempo_total_gasto",
        default,
        deserialize_with = "lenient_optional_number"
    )]
    pub total_minutes: Option<f64>,

    #[serde(rename = "tempos_por_materia", default)]
    pub subject_times: SubjectTimes,
}
