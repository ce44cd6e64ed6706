//! Date-range performance query page.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::{ApiClient, Transport};
use crate::error::{AppError, Result};
use crate::models::{DailyPoint, PerformanceSummary, Student};
use crate::page::Page;
use crate::utils::{format_date_br, format_number, format_percent, iso_to_br, parse_iso_date};
use crate::views::charts::{ChartBackend, ChartKind, ChartSlot, ChartSpec};
use crate::views::{SelectOption, student_options};

pub const COUNT_CANVAS: &str = "graficoQuantidade";
pub const PERCENT_CANVAS: &str = "graficoPercentual";

/// Raw form input.
#[derive(Debug, Clone, Default)]
pub struct PerformanceForm {
    pub student_id: String,
    pub start: String,
    pub end: String,
}

/// A validated query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceQuery {
    pub student_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PerformanceForm {
    pub fn validate(&self) -> Result<PerformanceQuery> {
        let student = self.student_id.trim();
        if student.is_empty() || self.start.trim().is_empty() || self.end.trim().is_empty() {
            return Err(AppError::validation("Preencha tudo."));
        }
        let student_id = student
            .parse()
            .map_err(|_| AppError::validation("Aluno inválido."))?;
        let (Some(start), Some(end)) = (parse_iso_date(&self.start), parse_iso_date(&self.end))
        else {
            return Err(AppError::validation("Use datas no formato AAAA-MM-DD."));
        };
        if end < start {
            return Err(AppError::validation("Data fim < início."));
        }
        Ok(PerformanceQuery {
            student_id,
            start,
            end,
        })
    }
}

/// What the result panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformanceView {
    pub title: String,
    pub lines: Vec<String>,
    pub charts_visible: bool,
}

/// Controller of the performance query page.
pub struct PerformanceController<T> {
    api: ApiClient<T>,
    page: Arc<dyn Page>,
    backend: Box<dyn ChartBackend>,
    count_chart: ChartSlot,
    percent_chart: ChartSlot,
    students: Vec<SelectOption>,
    view: PerformanceView,
}

impl<T: Transport> PerformanceController<T> {
    pub fn new(api: ApiClient<T>, page: Arc<dyn Page>, backend: Box<dyn ChartBackend>) -> Self {
        Self {
            api,
            page,
            backend,
            count_chart: ChartSlot::new(COUNT_CANVAS),
            percent_chart: ChartSlot::new(PERCENT_CANVAS),
            students: student_options(&[], "Selecione o aluno"),
            view: PerformanceView::default(),
        }
    }

    /// Fill the student selector.
    pub async fn load(&mut self) {
        let students: Vec<Student> = match self.api.students().await {
            Ok(students) => students,
            Err(e) => {
                log::error!("Failed to load students: {e}");
                return;
            }
        };
        self.students = student_options(&students, "Selecione o aluno");
    }

    pub fn students(&self) -> &[SelectOption] {
        &self.students
    }

    pub fn view(&self) -> &PerformanceView {
        &self.view
    }

    /// Handle a form submission.
    pub async fn submit(&mut self, form: &PerformanceForm) {
        let query = match form.validate() {
            Ok(query) => query,
            Err(e) => {
                log::warn!("Performance query rejected: {e}");
                self.page.alert(validation_text(&e));
                return;
            }
        };

        self.view = PerformanceView {
            title: "Resultado da Consulta".to_string(),
            lines: vec!["Consultando...".to_string()],
            charts_visible: false,
        };
        self.release_charts();

        let start = query.start.format("%Y-%m-%d").to_string();
        let end = query.end.format("%Y-%m-%d").to_string();
        match self.api.performance(query.student_id, &start, &end).await {
            Ok(summary) => self.show(&query, &summary),
            Err(AppError::Rejected { message, .. }) => {
                self.view.lines = vec![format!("Erro: {message}")];
            }
            Err(e) => {
                log::error!("Performance query failed: {e}");
                self.view.lines = vec!["Erro de comunicação.".to_string()];
            }
        }
    }

    fn show(&mut self, query: &PerformanceQuery, summary: &PerformanceSummary) {
        self.view.title = format!("Resultado para {}", summary.student_name);
        self.view.lines = vec![
            format!(
                "Período: {} até {}",
                format_date_br(query.start),
                format_date_br(query.end)
            ),
            format!(
                "Total de Questões Feitas: {}",
                format_number(summary.total_questions)
            ),
            format!("Total de Acertos: {}", format_number(summary.total_correct)),
            format!(
                "Percentual de Acerto (Total): {}",
                format_percent(summary.total_percentage)
            ),
        ];

        if summary.daily.is_empty() {
            self.view
                .lines
                .push("Nenhum dado encontrado neste período para gerar os gráficos.".to_string());
            return;
        }
        if let Err(e) = self.draw_charts(&summary.daily) {
            log::error!("Failed to draw charts: {e}");
            self.release_charts();
        }
    }

    fn draw_charts(&mut self, daily: &[DailyPoint]) -> Result<()> {
        let labels: Vec<String> = daily.iter().map(|d| iso_to_br(&d.date)).collect();

        let counts = ChartSpec {
            kind: ChartKind::Bar,
            label: "Questões Feitas".to_string(),
            axis_title: "Nº de Questões".to_string(),
            labels: labels.clone(),
            values: daily.iter().map(|d| d.questions).collect(),
            bounds: None,
        };
        let percentages = ChartSpec {
            kind: ChartKind::Line,
            label: "% Acerto".to_string(),
            axis_title: "% Acerto".to_string(),
            labels,
            values: daily.iter().map(|d| d.percentage).collect(),
            bounds: Some((0.0, 100.0)),
        };

        self.count_chart.acquire(self.backend.as_mut(), &counts)?;
        self.percent_chart
            .acquire(self.backend.as_mut(), &percentages)?;
        self.view.charts_visible = true;
        Ok(())
    }

    fn release_charts(&mut self) {
        self.count_chart.release(self.backend.as_mut());
        self.percent_chart.release(self.backend.as_mut());
        self.view.charts_visible = false;
    }

    /// Plain-text rendering of the result panel.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.view.title));
        for line in &self.view.lines {
            out.push_str(&format!("  {line}\n"));
        }
        out
    }
}

/// Alert text for a validation error.
pub(crate) fn validation_text(error: &AppError) -> &str {
    match error {
        AppError::Validation(message) => message,
        _ => "Dados inválidos.",
    }
}
