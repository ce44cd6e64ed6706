//! Timed mock-exam session page.

use std::sync::Arc;

use crate::api::{ApiClient, Transport};
use crate::error::{AppError, Result};
use crate::models::{SessionConfig, SessionTimes};
use crate::page::Page;
use crate::session::{Clock, Phase, SessionTimer, SubjectChange};
use crate::utils::format_time;
use crate::views::{SelectOption, student_options};

/// Label and background color of the pause button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseButton {
    pub label: &'static str,
    pub color: &'static str,
}

impl PauseButton {
    pub const PAUSE: Self = Self {
        label: "Pausar ⏸",
        color: "#ffc107",
    };
    pub const RESUME: Self = Self {
        label: "Retomar ▶️",
        color: "var(--primary-green)",
    };

    fn for_state(paused: bool) -> Self {
        if paused { Self::RESUME } else { Self::PAUSE }
    }
}

/// Everything the session page displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub global_display: String,
    pub subject_display: String,
    pub active_subject: Option<String>,
    pub pause_button: PauseButton,
    /// Subject buttons, pause and finalize
    pub controls_visible: bool,
    /// Formatted total shown once the session is finalized
    pub final_time: Option<String>,
}

/// Controller of the session page.
pub struct SessionController<T, C: Clock> {
    api: ApiClient<T>,
    page: Arc<dyn Page>,
    timer: SessionTimer<C>,
    exam_id: i64,
    subjects: Vec<String>,
    ranking_page: String,
    students: Vec<SelectOption>,
}

impl<T: Transport, C: Clock> SessionController<T, C> {
    pub fn new(
        api: ApiClient<T>,
        page: Arc<dyn Page>,
        clock: C,
        exam_id: i64,
        config: &SessionConfig,
    ) -> Self {
        Self {
            api,
            page,
            timer: SessionTimer::new(clock),
            exam_id,
            subjects: config.subjects.clone(),
            ranking_page: config.ranking_page.clone(),
            students: vec![SelectOption::prompt("Selecione o aluno")],
        }
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn timer(&self) -> &SessionTimer<C> {
        &self.timer
    }

    pub fn students(&self) -> &[SelectOption] {
        &self.students
    }

    /// Advance the displays to the current time.
    pub fn tick(&mut self) -> SessionView {
        self.timer.tick();
        self.view()
    }

    /// Click on a subject button.
    pub fn select_subject(&mut self, subject: &str) -> Option<SubjectChange> {
        if self.timer.is_paused() && self.timer.phase() != Phase::Finished {
            self.page
                .alert("Retome o simulado antes de trocar de matéria.");
            return None;
        }
        match self.timer.select_subject(subject) {
            Ok(change) => {
                log::debug!("Subject change: {change:?}");
                Some(change)
            }
            Err(e) => {
                log::warn!("Subject change refused: {e}");
                None
            }
        }
    }

    /// Click on the pause button; returns the button's new look.
    pub fn toggle_pause(&mut self) -> PauseButton {
        match self.timer.toggle_pause() {
            Ok(paused) => PauseButton::for_state(paused),
            Err(e) => {
                log::warn!("Pause refused: {e}");
                PauseButton::for_state(self.timer.is_paused())
            }
        }
    }

    /// Click on finalize. Returns false when the user backed out.
    pub async fn finalize(&mut self) -> bool {
        if self.timer.phase() == Phase::Finished {
            return true;
        }
        if !self.page.confirm("Tem certeza que deseja finalizar o simulado?") {
            return false;
        }
        match self.timer.finalize() {
            Ok(total) => log::info!("Session finalized after {}", format_time(total)),
            Err(e) => {
                log::warn!("Finalize refused: {e}");
                return false;
            }
        }

        match self.api.students().await {
            Ok(students) => self.students = student_options(&students, "Selecione o aluno"),
            Err(e) => log::error!("Failed to load students: {e}"),
        }
        true
    }

    /// Persist the finalized session for `student_id`.
    pub async fn save(&mut self, student_id: Option<i64>) -> Result<()> {
        if self.timer.phase() != Phase::Finished {
            log::warn!("Save requested for exam {} before finalizing", self.exam_id);
            self.page.alert("Finalize o simulado antes de salvar.");
            return Err(AppError::session("finalize the session before saving"));
        }
        let Some(student_id) = student_id else {
            self.page.alert("Por favor, selecione seu nome para salvar.");
            return Err(AppError::validation("no student selected"));
        };

        let times = SessionTimes {
            student_id,
            exam_id: self.exam_id,
            total_seconds: self.timer.total_seconds(),
            seconds_by_subject: self.timer.by_subject().clone(),
        };
        match self.api.save_session_times(&times).await {
            Ok(()) => {
                log::info!(
                    "Saved {}s for student {student_id} on exam {}",
                    times.total_seconds,
                    self.exam_id
                );
                self.page
                    .alert("Tempos salvos com sucesso! Você será redirecionado.");
                self.page.navigate(&self.ranking_page);
                Ok(())
            }
            Err(e) => {
                match &e {
                    AppError::Rejected { message, .. } => {
                        self.page.alert(&format!("Erro ao salvar: {message}"));
                    }
                    other => {
                        log::error!("Failed to save session times: {other}");
                        self.page.alert("Erro de comunicação com o servidor.");
                    }
                }
                Err(e)
            }
        }
    }

    pub fn view(&self) -> SessionView {
        let finished = self.timer.phase() == Phase::Finished;
        SessionView {
            global_display: format_time(self.timer.total_seconds()),
            subject_display: format_time(self.timer.subject_seconds()),
            active_subject: self.timer.current_subject().map(str::to_string),
            pause_button: PauseButton::for_state(self.timer.is_paused()),
            controls_visible: !finished,
            final_time: finished.then(|| format_time(self.timer.total_seconds())),
        }
    }

    /// One-screen text rendering.
    pub fn render(&self) -> String {
        let view = self.view();
        let mut out = String::new();
        if let Some(total) = &view.final_time {
            out.push_str(&format!("Simulado finalizado. Tempo total: {total}\n"));
            for (subject, seconds) in self.timer.by_subject() {
                out.push_str(&format!("  {subject}: {}\n", format_time(*seconds)));
            }
            return out;
        }

        out.push_str(&format!("Tempo geral:   {}\n", view.global_display));
        out.push_str(&format!("Tempo matéria: {}\n", view.subject_display));
        for (index, subject) in self.subjects.iter().enumerate() {
            let marker = if view.active_subject.as_deref() == Some(subject.as_str()) {
                "*"
            } else {
                " "
            };
            out.push_str(&format!(" {marker}{}. {subject}\n", index + 1));
        }
        out.push_str(&format!("[{}]\n", view.pause_button.label));
        out
    }
}
