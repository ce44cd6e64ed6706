//! Leaderboard of a single mock exam.

use std::sync::Arc;

use crate::api::{ApiClient, Transport};
use crate::models::{ExamRankingEntry, MockExam};
use crate::page::Page;
use crate::utils::format_number;
use crate::views::SelectOption;

/// One leaderboard row with its optional time breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamRow {
    pub header: String,
    /// Empty when the student saved no session times
    pub details: Vec<String>,
    pub expanded: bool,
}

impl ExamRow {
    fn from_entry(rank: usize, entry: &ExamRankingEntry) -> Self {
        let mut details = Vec::new();
        if let Some(total) = entry.total_minutes.filter(|t| *t != 0.0) {
            details.push(format!("Tempo Total: {} min", format_number(total)));
        }
        details.extend(
            entry
                .subject_times
                .iter()
                .filter(|(_, minutes)| *minutes != 0.0)
                .map(|(subject, minutes)| format!("{subject}: {} min", format_number(minutes))),
        );
        Self {
            header: format!("{rank}. {} - Nota: {:.2}", entry.student_name, entry.score),
            details,
            expanded: false,
        }
    }

    pub fn is_expandable(&self) -> bool {
        !self.details.is_empty()
    }
}

/// Body of the leaderboard panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamBoard {
    /// Nothing requested yet
    Idle,
    Rows(Vec<ExamRow>),
    /// Single-line message (empty board or failure)
    Message(String),
}

/// Controller of the per-exam ranking page.
pub struct ExamRankingController<T> {
    api: ApiClient<T>,
    page: Arc<dyn Page>,
    exams: Vec<MockExam>,
    options: Vec<SelectOption>,
    title: String,
    board: ExamBoard,
}

impl<T: Transport> ExamRankingController<T> {
    pub fn new(api: ApiClient<T>, page: Arc<dyn Page>) -> Self {
        Self {
            api,
            page,
            exams: Vec::new(),
            options: vec![SelectOption::prompt("Selecione o simulado")],
            title: String::new(),
            board: ExamBoard::Idle,
        }
    }

    /// Fill the exam selector.
    pub async fn load(&mut self) {
        let exams = match self.api.exams().await {
            Ok(exams) => exams,
            Err(e) => {
                log::error!("Failed to load mock exams: {e}");
                return;
            }
        };
        let mut options = vec![SelectOption::prompt("Selecione o simulado")];
        if exams.is_empty() {
            options.push(SelectOption::prompt("Nenhum simulado cadastrado"));
        }
        options.extend(
            exams
                .iter()
                .map(|exam| SelectOption::new(exam.id.to_string(), exam.label())),
        );
        self.options = options;
        self.exams = exams;
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn board(&self) -> &ExamBoard {
        &self.board
    }

    /// Show the leaderboard of the selected exam.
    pub async fn show(&mut self, exam_id: Option<i64>) {
        let Some(exam_id) = exam_id else {
            self.page.alert("Por favor, selecione um simulado.");
            return;
        };

        let name = self
            .exams
            .iter()
            .find(|exam| exam.id == exam_id)
            .map(|exam| exam.display_name.clone())
            .unwrap_or_else(|| format!("Simulado {exam_id}"));
        self.title = format!("Ranking: {name}");
        self.board = ExamBoard::Message("Carregando ranking...".to_string());

        self.board = match self.api.exam_ranking(exam_id).await {
            Ok(entries) if entries.is_empty() => ExamBoard::Message(
                "Nenhuma nota lançada para este simulado ainda.".to_string(),
            ),
            Ok(entries) => ExamBoard::Rows(
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| ExamRow::from_entry(index + 1, entry))
                    .collect(),
            ),
            Err(e) => {
                log::error!("Failed to load ranking of exam {exam_id}: {e}");
                ExamBoard::Message("Ocorreu um erro ao carregar o ranking.".to_string())
            }
        };
    }

    /// Expand or collapse a row's details. Rows without details ignore it.
    pub fn toggle(&mut self, row: usize) {
        if let ExamBoard::Rows(rows) = &mut self.board {
            if let Some(row) = rows.get_mut(row).filter(|r| r.is_expandable()) {
                row.expanded = !row.expanded;
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.title.is_empty() {
            out.push_str(&format!("== {} ==\n", self.title));
        }
        match &self.board {
            ExamBoard::Idle => {}
            ExamBoard::Message(message) => {
                out.push_str(&format!("  {message}\n"));
            }
            ExamBoard::Rows(rows) => {
                for row in rows {
                    let marker = match (row.is_expandable(), row.expanded) {
                        (false, _) => "",
                        (true, false) => " ▼",
                        (true, true) => " ▲",
                    };
                    out.push_str(&format!("  {}{marker}\n", row.header));
                    if row.expanded {
                        for line in &row.details {
                            out.push_str(&format!("      {line}\n"));
                        }
                    }
                }
            }
        }
        out
    }
}
