//! Team battle scoreboard and student administration.

use std::sync::Arc;

use crate::api::{ApiClient, Transport};
use crate::error::AppError;
use crate::models::{NewStudent, StudentUpdate, TeamAssignment, TeamMember, TeamScore};
use crate::page::Page;
use crate::utils::{format_number, format_percent};
use crate::views::{alert_failure, optional_text};

/// Teams a student can belong to.
pub const TEAMS: [&str; 3] = ["Alpha", "Omega", "Sem Time"];

/// Shown as the leader when both teams answered the same number of questions.
pub const TIE: &str = "EMPATE";

const COMMUNICATION_ERROR: &str = "Erro de comunicação com o servidor.";

/// Current-week panel of one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamPanel {
    pub name: String,
    pub questions: String,
    pub correct: String,
    pub precision: String,
    /// `{rank}. {name} - {n} questões`, best first
    pub members: Vec<String>,
}

impl TeamPanel {
    fn new(name: &str, score: &TeamScore) -> Self {
        Self {
            name: name.to_string(),
            questions: format_number(score.questions),
            correct: format_number(score.correct),
            precision: format_percent(score.precision),
            members: score
                .members
                .iter()
                .enumerate()
                .map(|(i, m)| format!("{}. {} - {} questões", i + 1, m.name, format_number(m.questions)))
                .collect(),
        }
    }
}

/// Controller of the team pages.
pub struct TeamsController<T> {
    api: ApiClient<T>,
    page: Arc<dyn Page>,
    panels: Vec<TeamPanel>,
    leader: Option<String>,
    roster: Vec<TeamMember>,
}

impl<T: Transport> TeamsController<T> {
    pub fn new(api: ApiClient<T>, page: Arc<dyn Page>) -> Self {
        Self {
            api,
            page,
            panels: Vec::new(),
            leader: None,
            roster: Vec::new(),
        }
    }

    /// Fetch the current-week battle.
    pub async fn scoreboard(&mut self) {
        let board = match self.api.team_scoreboard().await {
            Ok(board) => board,
            Err(e) => {
                log::error!("Failed to load team scoreboard: {e}");
                self.panels.clear();
                self.leader = None;
                return;
            }
        };

        self.panels = board
            .iter()
            .map(|(name, score)| TeamPanel::new(name, score))
            .collect();

        let mut ordered: Vec<_> = board.iter().collect();
        ordered.sort_by(|a, b| b.1.questions.total_cmp(&a.1.questions));
        self.leader = match ordered.as_slice() {
            [] => None,
            [(name, _)] => Some(name.to_string()),
            [(first, a), (_, b), ..] if a.questions > b.questions => Some(first.to_string()),
            _ => Some(TIE.to_string()),
        };
    }

    pub fn panels(&self) -> &[TeamPanel] {
        &self.panels
    }

    pub fn leader(&self) -> Option<&str> {
        self.leader.as_deref()
    }

    pub async fn load_roster(&mut self) {
        match self.api.students_with_team().await {
            Ok(roster) => self.roster = roster,
            Err(e) => log::error!("Failed to load team roster: {e}"),
        }
    }

    pub fn roster(&self) -> &[TeamMember] {
        &self.roster
    }

    /// Move a student to another team.
    pub async fn assign(&mut self, student_id: i64, team: &str) {
        if !TEAMS.contains(&team) {
            self.page.alert(&format!("Time inválido: {team}"));
            return;
        }
        let assignment = TeamAssignment {
            student_id,
            team: team.to_string(),
        };
        match self.api.assign_team(&assignment).await {
            Ok(()) => {
                log::info!("Student {student_id} moved to {team}");
                self.load_roster().await;
            }
            Err(e) => alert_failure(
                self.page.as_ref(),
                "Failed to assign team",
                &e,
                COMMUNICATION_ERROR,
            ),
        }
    }

    pub async fn create_student(&mut self, name: &str, team: Option<&str>) {
        let Some(name) = optional_text(name) else {
            self.page.alert("Informe o nome do aluno.");
            return;
        };
        let student = NewStudent {
            name,
            team: team.unwrap_or(TEAMS[2]).to_string(),
        };
        match self.api.create_student(&student).await {
            Ok(()) => {
                log::info!("Student {} created", student.name);
                self.load_roster().await;
                self.page.alert("Aluno criado!");
            }
            Err(e) => alert_failure(
                self.page.as_ref(),
                "Failed to create student",
                &e,
                COMMUNICATION_ERROR,
            ),
        }
    }

    /// Rename and/or move a student. Blank values are left untouched.
    pub async fn update_student(&mut self, id: i64, name: Option<&str>, team: Option<&str>) {
        let update = StudentUpdate {
            name: name.and_then(optional_text),
            team: team.and_then(optional_text),
        };
        if update.name.is_none() && update.team.is_none() {
            self.page.alert("Nada para atualizar.");
            return;
        }
        match self.api.update_student(id, &update).await {
            Ok(()) => {
                self.load_roster().await;
                self.page.alert("Dados atualizados!");
            }
            Err(e) => alert_failure(
                self.page.as_ref(),
                "Failed to update student",
                &e,
                COMMUNICATION_ERROR,
            ),
        }
    }

    /// Delete a student and their history after confirmation.
    pub async fn delete_student(&mut self, id: i64) {
        if !self
            .page
            .confirm("Tem certeza que deseja apagar este aluno e todo o seu histórico?")
        {
            return;
        }
        match self.api.delete_student(id).await {
            Ok(()) => {
                log::info!("Student {id} deleted");
                self.load_roster().await;
            }
            Err(AppError::Rejected { message, .. }) => {
                self.page.alert(&format!("Falha ao apagar o aluno. {message}"));
            }
            Err(e) => {
                log::error!("Failed to delete student {id}: {e}");
                self.page.alert(COMMUNICATION_ERROR);
            }
        }
    }

    pub fn render_scoreboard(&self) -> String {
        let mut out = String::from("== Batalha de Times ==\n");
        for panel in &self.panels {
            out.push_str(&format!(
                "{}: {} questões, {} acertos, precisão {}\n",
                panel.name, panel.questions, panel.correct, panel.precision
            ));
            for member in &panel.members {
                out.push_str(&format!("    {member}\n"));
            }
        }
        if let Some(leader) = &self.leader {
            out.push_str(&format!("Liderando: {leader}\n"));
        }
        out
    }

    pub fn render_roster(&self) -> String {
        let mut out = String::new();
        for team in TEAMS {
            out.push_str(&format!("== {team} ==\n"));
            for member in self.roster.iter().filter(|m| m.team == team) {
                out.push_str(&format!("  [{}] {}\n", member.id, member.name));
            }
        }
        for member in self.roster.iter().filter(|m| !TEAMS.contains(&m.team.as_str())) {
            out.push_str(&format!("  [{}] {} ({})\n", member.id, member.name, member.team));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::api::mock::MockTransport;
    use crate::page::recording::RecordingPage;
    use serde_json::json;

    const ROSTER: &str = "/api/alunos-com-time";

    fn controller(mock: &MockTransport) -> (Arc<RecordingPage>, TeamsController<MockTransport>) {
        let page = Arc::new(RecordingPage::new("Times"));
        let controller = TeamsController::new(ApiClient::new(mock.clone()), page.clone());
        (page, controller)
    }

    fn team(questions: &str, members: serde_json::Value) -> serde_json::Value {
        json!({"questoes": questions, "acertos": 10, "precisao": 66.6666, "ranking": members})
    }

    #[tokio::test]
    async fn scoreboard_panels_and_leader() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Get,
            "/api/batalha/placar",
            200,
            json!({
                "Alpha": team("120", json!([{"nome": "Liu", "qtd": "80"}, {"nome": "Yan", "qtd": 40}])),
                "Omega": team("95", json!([]))
            }),
        );
        let (_, mut controller) = controller(&mock);

        controller.scoreboard().await;

        assert_eq!(controller.leader(), Some("Alpha"));
        let alpha = &controller.panels()[0];
        assert_eq!(alpha.questions, "120");
        assert_eq!(alpha.precision, "66.67%");
        assert_eq!(alpha.members, vec!["1. Liu - 80 questões", "2. Yan - 40 questões"]);
    }

    #[tokio::test]
    async fn equal_totals_are_a_tie() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Get,
            "/api/batalha/placar",
            200,
            json!({"Alpha": team("50", json!([])), "Omega": team("50", json!([]))}),
        );
        let (_, mut controller) = controller(&mock);

        controller.scoreboard().await;

        assert_eq!(controller.leader(), Some(TIE));
    }

    #[tokio::test]
    async fn assign_posts_then_refreshes_roster() {
        let mock = MockTransport::new();
        mock.reply(Method::Post, "/api/alunos/atualizar-time", 200, json!({"status": "sucesso"}));
        mock.reply(
            Method::Get,
            ROSTER,
            200,
            json!([{"id": 1, "nome": "Liu", "time": "Omega"}, {"id": 2, "nome": "Yan", "time": null}]),
        );
        let (_, mut controller) = controller(&mock);

        controller.assign(1, "Omega").await;

        let calls = mock.calls();
        assert_eq!(calls[0].body, Some(json!({"aluno_id": 1, "time": "Omega"})));
        assert_eq!(mock.count(Method::Get, ROSTER), 1);
        assert_eq!(controller.roster()[0].team, "Omega");
    }

    #[tokio::test]
    async fn unknown_team_is_refused_locally() {
        let mock = MockTransport::new();
        let (page, mut controller) = controller(&mock);

        controller.assign(1, "Delta").await;

        assert!(mock.calls().is_empty());
        assert_eq!(page.alerts(), vec!["Time inválido: Delta"]);
    }

    #[tokio::test]
    async fn duplicate_student_shows_server_error() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Post,
            "/api/alunos",
            409,
            json!({"erro": "Já existe um aluno com esse nome"}),
        );
        let (page, mut controller) = controller(&mock);

        controller.create_student(" Liu ", None).await;

        assert_eq!(
            mock.calls()[0].body,
            Some(json!({"nome": "Liu", "time": "Sem Time"}))
        );
        assert_eq!(page.alerts(), vec!["Erro: Já existe um aluno com esse nome"]);
        assert_eq!(mock.count(Method::Get, ROSTER), 0);
    }

    #[tokio::test]
    async fn update_sends_only_given_fields() {
        let mock = MockTransport::new();
        mock.reply(Method::Put, "/api/alunos/3", 200, json!({"status": "sucesso"}));
        mock.reply(Method::Get, ROSTER, 200, json!([]));
        let (page, mut controller) = controller(&mock);

        controller.update_student(3, Some("  "), Some("Alpha")).await;

        assert_eq!(mock.calls()[0].body, Some(json!({"time": "Alpha"})));
        assert_eq!(page.alerts(), vec!["Dados atualizados!"]);
    }

    #[tokio::test]
    async fn delete_student_requires_confirmation() {
        let mock = MockTransport::new();
        mock.reply(Method::Delete, "/api/alunos/3", 200, json!({"status": "sucesso"}));
        mock.reply(Method::Get, ROSTER, 200, json!([]));
        let (page, mut controller) = controller(&mock);

        page.answer(false);
        controller.delete_student(3).await;
        assert!(mock.calls().is_empty());

        controller.delete_student(3).await;
        assert_eq!(mock.count(Method::Delete, "/api/alunos/3"), 1);
        assert_eq!(mock.count(Method::Get, ROSTER), 1);
    }
}
