//! Mock-exam management page: companies, exams and exam scores.

use std::sync::Arc;

use crate::api::{ApiClient, Transport};
use crate::error::{AppError, Result};
use crate::models::{Company, MockExam, NewCompany, NewMockExam, NewResult, RecentResult};
use crate::page::Page;
use crate::views::{SelectOption, alert_failure, optional_text, required_id, student_options};

const COMMUNICATION_ERROR: &str = "Erro de comunicação com o servidor.";

#[derive(Debug, Clone, Default)]
pub struct CompanyForm {
    pub name: String,
}

impl CompanyForm {
    pub fn parse(&self) -> Result<NewCompany> {
        let name = optional_text(&self.name)
            .ok_or_else(|| AppError::validation("Informe o nome da empresa."))?;
        Ok(NewCompany { name })
    }
}

/// Exam creation form. Number and specific name are optional.
#[derive(Debug, Clone, Default)]
pub struct ExamForm {
    pub company_id: String,
    pub number: String,
    pub specific_name: String,
    pub category: String,
    pub date: String,
}

impl ExamForm {
    pub fn parse(&self) -> Result<NewMockExam> {
        let company_id = required_id(&self.company_id, "Selecione a empresa.")?;
        let number = match optional_text(&self.number) {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| AppError::validation("O número do simulado deve ser inteiro."))?,
            ),
            None => None,
        };
        let category = optional_text(&self.category)
            .ok_or_else(|| AppError::validation("Selecione a categoria."))?;
        let date = optional_text(&self.date)
            .ok_or_else(|| AppError::validation("Informe a data do simulado."))?;
        Ok(NewMockExam {
            company_id,
            number,
            specific_name: optional_text(&self.specific_name),
            category,
            date,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultForm {
    pub student_id: String,
    pub exam_id: String,
    pub score: String,
}

impl ResultForm {
    pub fn parse(&self) -> Result<NewResult> {
        let student_id = required_id(&self.student_id, "Selecione o aluno.")?;
        let exam_id = required_id(&self.exam_id, "Selecione o simulado.")?;
        let score = self
            .score
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| AppError::validation("Informe uma nota válida."))?;
        Ok(NewResult {
            student_id,
            exam_id,
            score,
        })
    }
}

/// A deletable list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: Option<i64>,
    pub text: String,
}

impl ListItem {
    fn message(text: &str) -> Self {
        Self {
            id: None,
            text: text.to_string(),
        }
    }
}

/// Controller of the management page.
pub struct ManagementController<T> {
    api: ApiClient<T>,
    page: Arc<dyn Page>,
    pub company_form: CompanyForm,
    pub exam_form: ExamForm,
    pub result_form: ResultForm,
    students: Vec<SelectOption>,
    company_options: Vec<SelectOption>,
    exam_options: Vec<SelectOption>,
    companies: Vec<String>,
    exams: Vec<String>,
    results: Vec<ListItem>,
}

impl<T: Transport> ManagementController<T> {
    pub fn new(api: ApiClient<T>, page: Arc<dyn Page>) -> Self {
        Self {
            api,
            page,
            company_form: CompanyForm::default(),
            exam_form: ExamForm::default(),
            result_form: ResultForm::default(),
            students: vec![SelectOption::prompt("Selecione o aluno")],
            company_options: vec![SelectOption::prompt("Selecione a empresa")],
            exam_options: vec![SelectOption::prompt("Selecione o simulado")],
            companies: Vec::new(),
            exams: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Load every list the page shows.
    pub async fn load(&mut self) {
        let (students, companies, exams, results) = futures::join!(
            self.api.students(),
            self.api.companies(),
            self.api.exams(),
            self.api.recent_results()
        );

        match students {
            Ok(students) => self.students = student_options(&students, "Selecione o aluno"),
            Err(e) => {
                log::error!("Failed to load students: {e}");
                self.students = vec![SelectOption::prompt("Erro ao carregar")];
            }
        }
        self.apply_companies(companies);
        self.apply_exams(exams);
        self.apply_results(results);
    }

    pub async fn submit_company(&mut self) {
        let outcome = match self.company_form.parse() {
            Ok(company) => self.api.create_company(&company).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => {
                self.company_form = CompanyForm::default();
                let companies = self.api.companies().await;
                self.apply_companies(companies);
                log::info!("Company saved");
                self.page.alert("Empresa salva com sucesso!");
            }
            Err(e) => alert_failure(
                self.page.as_ref(),
                "Failed to save company",
                &e,
                COMMUNICATION_ERROR,
            ),
        }
    }

    pub async fn submit_exam(&mut self) {
        let outcome = match self.exam_form.parse() {
            Ok(exam) => self.api.create_exam(&exam).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => {
                self.exam_form = ExamForm::default();
                let exams = self.api.exams().await;
                self.apply_exams(exams);
                log::info!("Mock exam saved");
                self.page.alert("Simulado salvo com sucesso!");
            }
            Err(e) => alert_failure(
                self.page.as_ref(),
                "Failed to save mock exam",
                &e,
                COMMUNICATION_ERROR,
            ),
        }
    }

    pub async fn submit_result(&mut self) {
        let outcome = match self.result_form.parse() {
            Ok(result) => self.api.create_result(&result).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => {
                self.result_form = ResultForm::default();
                self.reload_results().await;
                log::info!("Score entered");
                self.page.alert("Nota lançada com sucesso!");
            }
            Err(e) => alert_failure(
                self.page.as_ref(),
                "Failed to enter score",
                &e,
                COMMUNICATION_ERROR,
            ),
        }
    }

    /// Delete a score after confirmation. The list is re-fetched only when
    /// the server accepted the deletion.
    pub async fn delete_result(&mut self, id: i64) {
        if !self
            .page
            .confirm("Tem certeza que deseja apagar esta nota? A ação não pode ser desfeita.")
        {
            return;
        }
        match self.api.delete_result(id).await {
            Ok(()) => {
                log::info!("Deleted result {id}");
                self.reload_results().await;
            }
            Err(e) => {
                if e.is_transport() {
                    log::error!("Failed to delete result {id}: {e}");
                }
                self.page.alert("Falha ao apagar a nota.");
            }
        }
    }

    async fn reload_results(&mut self) {
        let results = self.api.recent_results().await;
        self.apply_results(results);
    }

    fn apply_companies(&mut self, companies: Result<Vec<Company>>) {
        let companies = match companies {
            Ok(companies) => companies,
            Err(e) => {
                log::error!("Failed to load companies: {e}");
                return;
            }
        };
        self.company_options = std::iter::once(SelectOption::prompt("Selecione a empresa"))
            .chain(
                companies
                    .iter()
                    .map(|c| SelectOption::new(c.id.to_string(), c.name.as_str())),
            )
            .collect();
        self.companies = if companies.is_empty() {
            vec!["Nenhuma empresa cadastrada.".to_string()]
        } else {
            companies.into_iter().map(|c| c.name).collect()
        };
    }

    fn apply_exams(&mut self, exams: Result<Vec<MockExam>>) {
        let exams = match exams {
            Ok(exams) => exams,
            Err(e) => {
                log::error!("Failed to load mock exams: {e}");
                return;
            }
        };
        self.exam_options = std::iter::once(SelectOption::prompt("Selecione o simulado"))
            .chain(
                exams
                    .iter()
                    .map(|e| SelectOption::new(e.id.to_string(), e.display_name.as_str())),
            )
            .collect();
        self.exams = if exams.is_empty() {
            vec!["Nenhum simulado cadastrado.".to_string()]
        } else {
            exams.iter().map(MockExam::label).collect()
        };
    }

    fn apply_results(&mut self, results: Result<Vec<RecentResult>>) {
        let results = match results {
            Ok(results) => results,
            Err(e) => {
                log::error!("Failed to load recent scores: {e}");
                return;
            }
        };
        self.results = if results.is_empty() {
            vec![ListItem::message("Nenhuma nota lançada recentemente.")]
        } else {
            results
                .into_iter()
                .map(|r| ListItem {
                    id: Some(r.id),
                    text: format!(
                        "{} - Nota {:.2} em \"{}\"",
                        r.student_name, r.score, r.exam_name
                    ),
                })
                .collect()
        };
    }

    pub fn students(&self) -> &[SelectOption] {
        &self.students
    }

    pub fn company_options(&self) -> &[SelectOption] {
        &self.company_options
    }

    pub fn exam_options(&self) -> &[SelectOption] {
        &self.exam_options
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn exams(&self) -> &[String] {
        &self.exams
    }

    pub fn results(&self) -> &[ListItem] {
        &self.results
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("== Empresas ==\n");
        for company in &self.companies {
            out.push_str(&format!("  {company}\n"));
        }
        out.push_str("== Simulados ==\n");
        for exam in &self.exams {
            out.push_str(&format!("  {exam}\n"));
        }
        out.push_str("== Últimas notas ==\n");
        for item in &self.results {
            match item.id {
                Some(id) => {
                    out.push_str(&format!("  [{id}] {}\n", item.text));
                }
                None => {
                    out.push_str(&format!("  {}\n", item.text));
                }
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

    const RECENT: &str = "/api/resultados/recentes";

    fn controller(mock: &MockTransport) -> (Arc<RecordingPage>, ManagementController<MockTransport>) {
        let page = Arc::new(RecordingPage::new("Gerenciamento"));
        let controller = ManagementController::new(ApiClient::new(mock.clone()), page.clone());
        (page, controller)
    }

    fn recent() -> serde_json::Value {
        json!([{"id": 7, "aluno_nome": "Liu", "simulado_nome": "Quad 3 - Básico", "nota": 82.5}])
    }

    #[tokio::test]
    async fn load_fills_every_list() {
        let mock = MockTransport::new();
        mock.reply(Method::Get, "/api/alunos", 200, json!([{"id": 1, "nome": "Liu"}]));
        mock.reply(Method::Get, "/api/empresas", 200, json!([]));
        mock.reply(
            Method::Get,
            "/api/simulados",
            200,
            json!([{"id": 2, "nome_display": "Quad 3", "data": "01/12/2025"}]),
        );
        mock.reply(Method::Get, RECENT, 200, recent());
        let (_, mut controller) = controller(&mock);

        controller.load().await;

        assert_eq!(controller.students().len(), 2);
        assert_eq!(controller.companies(), ["Nenhuma empresa cadastrada."]);
        assert_eq!(controller.exams(), ["Quad 3 - 01/12/2025"]);
        assert_eq!(controller.exam_options()[1].label, "Quad 3");
        assert_eq!(
            controller.results()[0].text,
            "Liu - Nota 82.50 em \"Quad 3 - Básico\""
        );
    }

    #[tokio::test]
    async fn delete_success_refetches_once() {
        let mock = MockTransport::new();
        mock.reply(Method::Delete, "/api/resultados/7", 200, json!({"status": "sucesso"}));
        mock.reply(Method::Get, RECENT, 200, json!([]));
        let (page, mut controller) = controller(&mock);

        controller.delete_result(7).await;

        assert_eq!(mock.count(Method::Delete, "/api/resultados/7"), 1);
        assert_eq!(mock.count(Method::Get, RECENT), 1);
        assert!(page.alerts().is_empty());
        assert_eq!(controller.results()[0].text, "Nenhuma nota lançada recentemente.");
    }

    #[tokio::test]
    async fn delete_failure_does_not_refetch() {
        let mock = MockTransport::new();
        mock.reply(Method::Delete, "/api/resultados/7", 404, json!({"mensagem": "Resultado não encontrado."}));
        let (page, mut controller) = controller(&mock);

        controller.delete_result(7).await;

        assert_eq!(mock.count(Method::Delete, "/api/resultados/7"), 1);
        assert_eq!(mock.count(Method::Get, RECENT), 0);
        assert_eq!(page.alerts(), vec!["Falha ao apagar a nota."]);
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let mock = MockTransport::new();
        let (page, mut controller) = controller(&mock);
        page.answer(false);

        controller.delete_result(7).await;

        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn exam_form_sends_nulls_for_blank_optionals() {
        let mock = MockTransport::new();
        mock.reply(Method::Post, "/api/simulados", 201, json!({"status": "sucesso"}));
        mock.reply(Method::Get, "/api/simulados", 200, json!([]));
        let (page, mut controller) = controller(&mock);
        controller.exam_form = ExamForm {
            company_id: "3".into(),
            number: " ".into(),
            specific_name: "  ".into(),
            category: "Básico".into(),
            date: "2025-12-01".into(),
        };

        controller.submit_exam().await;

        let calls = mock.calls();
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["numero"], serde_json::Value::Null);
        assert_eq!(body["nome_especifico"], serde_json::Value::Null);
        assert_eq!(body["empresa_id"], 3);
        assert_eq!(page.alerts(), vec!["Simulado salvo com sucesso!"]);
        assert!(controller.exam_form.category.is_empty());
    }

    #[tokio::test]
    async fn rejected_company_keeps_form_and_shows_message() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Post,
            "/api/empresas",
            409,
            json!({"status": "erro", "mensagem": "Essa empresa já existe."}),
        );
        let (page, mut controller) = controller(&mock);
        controller.company_form.name = "Quad".into();

        controller.submit_company().await;

        assert_eq!(page.alerts(), vec!["Erro: Essa empresa já existe."]);
        assert_eq!(controller.company_form.name, "Quad");
        assert_eq!(mock.count(Method::Get, "/api/empresas"), 0);
    }

    #[tokio::test]
    async fn result_transport_failure_uses_generic_message() {
        let mock = MockTransport::new();
        mock.fail(Method::Post, "/api/resultados");
        let (page, mut controller) = controller(&mock);
        controller.result_form = ResultForm {
            student_id: "1".into(),
            exam_id: "2".into(),
            score: "7,5".into(),
        };

        controller.submit_result().await;

        assert_eq!(mock.calls()[0].body.as_ref().unwrap()["nota"], 7.5);
        assert_eq!(page.alerts(), vec!["Erro de comunicação com o servidor."]);
    }

    #[tokio::test]
    async fn blank_company_name_is_not_sent() {
        let mock = MockTransport::new();
        let (page, mut controller) = controller(&mock);
        controller.company_form.name = "   ".into();

        controller.submit_company().await;

        assert!(mock.calls().is_empty());
        assert_eq!(page.alerts(), vec!["Informe o nome da empresa."]);
    }
}
