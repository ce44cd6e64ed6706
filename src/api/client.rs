// src/api/client.rs

//! Typed wrappers around the server endpoints.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{AppError, Result};
use crate::models::{
    Company, ExamRankingEntry, MockExam, NewCompany, NewMockExam, NewRecord, NewResult,
    NewStudent, PerformanceSummary, Rankings, RecentRecord, RecentResult, SessionTimes, Student,
    StudentUpdate, TeamAssignment, TeamMember, TeamScoreboard, WeeklyReport,
};

/// Client for the simulados REST API.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // --- Students ---

    pub async fn students(&self) -> Result<Vec<Student>> {
        self.get_json("/api/alunos").await
    }

    pub async fn students_with_team(&self) -> Result<Vec<TeamMember>> {
        self.get_json("/api/alunos-com-time").await
    }

    pub async fn create_student(&self, student: &NewStudent) -> Result<()> {
        self.send_json(Method::Post, "/api/alunos", student).await
    }

    pub async fn update_student(&self, id: i64, update: &StudentUpdate) -> Result<()> {
        self.send_json(Method::Put, &format!("/api/alunos/{id}"), update)
            .await
    }

    pub async fn delete_student(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/alunos/{id}")).await
    }

    pub async fn assign_team(&self, assignment: &TeamAssignment) -> Result<()> {
        self.send_json(Method::Post, "/api/alunos/atualizar-time", assignment)
            .await
    }

    // --- Companies and exams ---

    pub async fn companies(&self) -> Result<Vec<Company>> {
        self.get_json("/api/empresas").await
    }

    pub async fn create_company(&self, company: &NewCompany) -> Result<()> {
        self.send_json(Method::Post, "/api/empresas", company).await
    }

    pub async fn exams(&self) -> Result<Vec<MockExam>> {
        self.get_json("/api/simulados").await
    }

    pub async fn create_exam(&self, exam: &NewMockExam) -> Result<()> {
        self.send_json(Method::Post, "/api/simulados", exam).await
    }

    pub async fn exam_ranking(&self, exam_id: i64) -> Result<Vec<ExamRankingEntry>> {
        self.get_json(&format!("/api/simulados/{exam_id}/ranking"))
            .await
    }

    // --- Results ---

    pub async fn recent_results(&self) -> Result<Vec<RecentResult>> {
        self.get_json("/api/resultados/recentes").await
    }

    pub async fn create_result(&self, result: &NewResult) -> Result<()> {
        self.send_json(Method::Post, "/api/resultados", result).await
    }

    pub async fn delete_result(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/resultados/{id}")).await
    }

    pub async fn save_session_times(&self, times: &SessionTimes) -> Result<()> {
        self.send_json(Method::Post, "/api/salvar-tempos-simulado", times)
            .await
    }

    // --- Practice records ---

    pub async fn recent_records(&self) -> Result<Vec<RecentRecord>> {
        self.get_json("/api/registros/recentes").await
    }

    pub async fn create_record(&self, record: &NewRecord) -> Result<()> {
        self.send_json(Method::Post, "/api/registros", record).await
    }

    pub async fn delete_record(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/registros/{id}")).await
    }

    // --- Analytics ---

    pub async fn performance(
        &self,
        student_id: i64,
        start: &str,
        end: &str,
    ) -> Result<PerformanceSummary> {
        let request = ApiRequest::get("/api/consulta/desempenho")
            .with_query("aluno_id", student_id.to_string())
            .with_query("inicio", start)
            .with_query("fim", end);
        self.fetch(request).await
    }

    pub async fn weekly_rankings(&self) -> Result<Rankings> {
        self.get_json("/api/rankings").await
    }

    pub async fn overall_rankings(&self) -> Result<Rankings> {
        self.get_json("/api/rankings/geral").await
    }

    pub async fn last_week_report(&self) -> Result<WeeklyReport> {
        self.get_json("/api/rankings/semana-passada").await
    }

    pub async fn team_scoreboard(&self) -> Result<TeamScoreboard> {
        self.get_json("/api/batalha/placar").await
    }

    // --- Plumbing ---

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.fetch(ApiRequest::get(path)).await
    }

    async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let response = self.execute(request).await?;
        let body = response.body.unwrap_or(Value::Null);
        Ok(serde_json::from_value(body)?)
    }

    async fn send_json<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        let request = ApiRequest::new(method, path).with_body(serde_json::to_value(body)?);
        self.execute(request).await.map(|_| ())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.execute(ApiRequest::delete(path)).await.map(|_| ())
    }

    /// Send a request and turn non-success statuses into [`AppError::Rejected`].
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let message = response
            .message()
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        log::warn!("{method} {path} rejected ({}): {message}", response.status);
        Err(AppError::rejected(response.status, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn decodes_student_list() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Get,
            "/api/alunos",
            200,
            json!([{"id": 1, "nome": "Andressa"}, {"id": 2, "nome": "Davy"}]),
        );
        let api = ApiClient::new(mock);

        let students = api.students().await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[1].name, "Davy");
    }

    #[tokio::test]
    async fn rejection_carries_server_message() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Post,
            "/api/empresas",
            409,
            json!({"status": "erro", "mensagem": "Essa empresa já existe."}),
        );
        let api = ApiClient::new(mock);

        let err = api
            .create_company(&NewCompany { name: "Quad".into() })
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Essa empresa já existe."));
    }

    #[tokio::test]
    async fn performance_sends_query_parameters() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Get,
            "/api/consulta/desempenho",
            200,
            json!({"aluno_nome": "Liu", "data_inicio": "2025-01-01", "data_fim": "2025-01-07",
                   "total_questoes": 0, "total_acertos": 0, "percentual_total": 0,
                   "dados_diarios": []}),
        );
        let api = ApiClient::new(mock);

        api.performance(9, "2025-01-01", "2025-01-07").await.unwrap();
        let calls = api.transport().calls();
        assert_eq!(
            calls[0].query,
            vec![
                ("aluno_id".to_string(), "9".to_string()),
                ("inicio".to_string(), "2025-01-01".to_string()),
                ("fim".to_string(), "2025-01-07".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn transport_failure_is_not_a_rejection() {
        let mock = MockTransport::new();
        mock.fail(Method::Get, "/api/rankings");
        let api = ApiClient::new(mock);

        let err = api.weekly_rankings().await.unwrap_err();
        assert!(err.is_transport());
    }
}
