//! Question-practice registration page.

use std::sync::Arc;

use crate::api::{ApiClient, Transport};
use crate::error::{AppError, Result};
use crate::models::{NewRecord, RecentRecord};
use crate::page::Page;
use crate::views::management::ListItem;
use crate::views::{SelectOption, required_id, student_options};

#[derive(Debug, Clone, Default)]
pub struct RecordForm {
    pub student_id: String,
    pub questions: String,
    pub correct: String,
}

impl RecordForm {
    pub fn parse(&self) -> Result<NewRecord> {
        let student_id = required_id(&self.student_id, "Selecione um aluno.")?;
        let questions = parse_count(&self.questions, "Informe a quantidade de questões.")?;
        let correct = parse_count(&self.correct, "Informe o número de acertos.")?;
        if correct > questions {
            return Err(AppError::validation(
                "O número de acertos não pode ser maior que a quantidade de questões.",
            ));
        }
        Ok(NewRecord {
            student_id,
            questions,
            correct,
        })
    }
}

fn parse_count(raw: &str, message: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(AppError::validation(message)),
    }
}

pub struct RegistrationController<T> {
    api: ApiClient<T>,
    page: Arc<dyn Page>,
    pub form: RecordForm,
    students: Vec<SelectOption>,
    records: Vec<ListItem>,
}

impl<T: Transport> RegistrationController<T> {
    pub fn new(api: ApiClient<T>, page: Arc<dyn Page>) -> Self {
        Self {
            api,
            page,
            form: RecordForm::default(),
            students: vec![SelectOption::prompt("Selecione um aluno")],
            records: Vec::new(),
        }
    }

    pub async fn load(&mut self) {
        let (students, records) =
            futures::join!(self.api.students(), self.api.recent_records());
        match students {
            Ok(students) => self.students = student_options(&students, "Selecione um aluno"),
            Err(e) => {
                log::error!("Failed to load students: {e}");
                self.students = vec![SelectOption::prompt("Erro ao carregar")];
            }
        }
        self.apply_records(records);
    }

    pub async fn submit(&mut self) {
        let record = match self.form.parse() {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Record rejected: {e}");
                if let AppError::Validation(message) = &e {
                    self.page.alert(message);
                }
                return;
            }
        };

        match self.api.create_record(&record).await {
            Ok(()) => {
                self.form = RecordForm::default();
                self.reload().await;
                log::info!(
                    "Registered {} questions for student {}",
                    record.questions,
                    record.student_id
                );
                self.page.alert("Registro adicionado com sucesso!");
            }
            Err(AppError::Rejected { message, .. }) => {
                self.page
                    .alert(&format!("Falha ao salvar o registro. {message}"));
            }
            Err(e) => {
                log::error!("Failed to save record: {e}");
                self.page.alert("Erro de comunicação ao salvar registro.");
            }
        }
    }

    pub async fn delete(&mut self, id: i64) {
        if !self.page.confirm("Tem certeza que deseja apagar este registro?") {
            return;
        }
        match self.api.delete_record(id).await {
            Ok(()) => self.reload().await,
            Err(e) if e.is_transport() => {
                log::error!("Failed to delete record {id}: {e}");
                self.page.alert("Erro de comunicação ao apagar registro.");
            }
            Err(_) => self.page.alert("Falha ao apagar o registro."),
        }
    }

    async fn reload(&mut self) {
        let records = self.api.recent_records().await;
        self.apply_records(records);
    }

    fn apply_records(&mut self, records: Result<Vec<RecentRecord>>) {
        self.records = match records {
            Ok(records) if records.is_empty() => vec![ListItem {
                id: None,
                text: "Nenhum registro recente.".to_string(),
            }],
            Ok(records) => records
                .into_iter()
                .map(|r| ListItem {
                    id: Some(r.id),
                    text: format!(
                        "{}: {} acertos de {} questões",
                        r.student_name, r.correct, r.questions
                    ),
                })
                .collect(),
            Err(e) => {
                log::error!("Failed to load recent records: {e}");
                vec![ListItem {
                    id: None,
                    text: "Erro ao carregar lançamentos.".to_string(),
                }]
            }
        };
    }

    pub fn students(&self) -> &[SelectOption] {
        &self.students
    }

    pub fn records(&self) -> &[ListItem] {
        &self.records
    }

    pub fn render(&self) -> String {
        let mut out = String::from("== Últimos lançamentos ==\n");
        for item in &self.records {
            match item.id {
                Some(id) => out.push_str(&format!("  [{id}] {}\n", item.text)),
                None => out.push_str(&format!("  {}\n", item.text)),
            }
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

    const RECENT: &str = "/api/registros/recentes";

    fn controller(mock: &MockTransport) -> (Arc<RecordingPage>, RegistrationController<MockTransport>) {
        let page = Arc::new(RecordingPage::new("Registrar"));
        let controller = RegistrationController::new(ApiClient::new(mock.clone()), page.clone());
        (page, controller)
    }

    #[tokio::test]
    async fn more_correct_than_questions_is_refused_locally() {
        let mock = MockTransport::new();
        let (page, mut controller) = controller(&mock);
        controller.form = RecordForm {
            student_id: "2".into(),
            questions: "10".into(),
            correct: "11".into(),
        };

        controller.submit().await;

        assert!(mock.calls().is_empty());
        assert_eq!(
            page.alerts(),
            vec!["O número de acertos não pode ser maior que a quantidade de questões."]
        );
    }

    #[tokio::test]
    async fn missing_student_is_refused_locally() {
        let mock = MockTransport::new();
        let (page, mut controller) = controller(&mock);
        controller.form.questions = "10".into();
        controller.form.correct = "5".into();

        controller.submit().await;

        assert!(mock.calls().is_empty());
        assert_eq!(page.alerts(), vec!["Selecione um aluno."]);
    }

    #[tokio::test]
    async fn successful_submit_resets_and_refreshes() {
        let mock = MockTransport::new();
        mock.reply(Method::Post, "/api/registros", 201, json!({"status": "sucesso"}));
        mock.reply(
            Method::Get,
            RECENT,
            200,
            json!([{"id": 1, "aluno_nome": "Yan", "questoes": 30, "acertos": 21}]),
        );
        let (page, mut controller) = controller(&mock);
        controller.form = RecordForm {
            student_id: "2".into(),
            questions: "30".into(),
            correct: "21".into(),
        };

        controller.submit().await;

        assert_eq!(controller.records()[0].text, "Yan: 21 acertos de 30 questões");
        assert!(controller.form.student_id.is_empty());
        assert_eq!(page.alerts(), vec!["Registro adicionado com sucesso!"]);
        let body = mock.calls()[0].body.clone().unwrap();
        assert_eq!(body, json!({"aluno_id": 2, "quantidade": 30, "acertos": 21}));
    }

    #[tokio::test]
    async fn delete_success_refetches_once() {
        let mock = MockTransport::new();
        mock.reply(Method::Delete, "/api/registros/5", 200, json!({"status": "sucesso"}));
        mock.reply(Method::Get, RECENT, 200, json!([]));
        let (page, mut controller) = controller(&mock);

        controller.delete(5).await;

        assert_eq!(mock.count(Method::Delete, "/api/registros/5"), 1);
        assert_eq!(mock.count(Method::Get, RECENT), 1);
        assert!(page.alerts().is_empty());
        assert_eq!(controller.records()[0].text, "Nenhum registro recente.");
    }

    #[tokio::test]
    async fn delete_failure_does_not_refetch() {
        let mock = MockTransport::new();
        mock.reply(Method::Delete, "/api/registros/5", 500, json!({"status": "erro"}));
        let (page, mut controller) = controller(&mock);

        controller.delete(5).await;

        assert_eq!(mock.count(Method::Delete, "/api/registros/5"), 1);
        assert_eq!(mock.count(Method::Get, RECENT), 0);
        assert_eq!(page.alerts(), vec!["Falha ao apagar o registro."]);
    }
}
