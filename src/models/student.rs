//! Student data structures.

use serde::{Deserialize, Deserializer, Serialize};

/// A student as listed by `/api/alunos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,
}

/// A student with the team they compete for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMember {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    /// Students created before teams existed come back with `null`
    #[serde(
        rename = "time",
        default = "default_team",
        deserialize_with = "team_or_default"
    )]
    pub team: String,
}

fn default_team() -> String {
    "Sem Time".to_string()
}

fn team_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_team))
}

/// Payload for creating a student.
#[derive(Debug, Clone, Serialize)]
pub struct NewStudent {
    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "time")]
    pub team: String,
}

/// Payload for editing a student. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentUpdate {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "time", skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// Payload for moving a student to another team.
#[derive(Debug, Clone, Serialize)]
pub struct TeamAssignment {
    #[serde(rename = "aluno_id")]
    pub student_id: i64,

    #[serde(rename = "time")]
    pub team: String,
}
