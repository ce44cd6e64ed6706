// src/views/mod.rs

//! Page controllers.
//!
//! Each controller owns the state of one page, loads what the page needs
//! on start and exposes one method per form or button. Rendering produces
//! plain view models that the terminal front end prints.

pub mod charts;
pub mod exam_ranking;
pub mod management;
pub mod performance;
pub mod podium;
pub mod ranking;
pub mod registration;
pub mod session;
pub mod teams;

use crate::error::AppError;
use crate::models::Student;
use crate::page::Page;

/// One entry of a selector. An empty `value` is the prompt entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Selector entry without a value.
    pub fn prompt(label: impl Into<String>) -> Self {
        Self::new("", label)
    }
}

/// Prompt entry followed by one entry per student.
pub fn student_options(students: &[Student], prompt: &str) -> Vec<SelectOption> {
    std::iter::once(SelectOption::prompt(prompt))
        .chain(
            students
                .iter()
                .map(|s| SelectOption::new(s.id.to_string(), s.name.as_str())),
        )
        .collect()
}

/// Alert for a failed form submission.
///
/// Server rejections show the server's message; everything else is logged
/// and replaced by `fallback`.
pub(crate) fn alert_failure(page: &dyn Page, context: &str, error: &AppError, fallback: &str) {
    match error {
        AppError::Rejected { message, .. } => page.alert(&format!("Erro: {message}")),
        AppError::Validation(message) => page.alert(message),
        other => {
            log::error!("{context}: {other}");
            page.alert(fallback);
        }
    }
}

/// Parse a required numeric form field.
pub(crate) fn required_id(raw: &str, message: &str) -> Result<i64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::validation(message));
    }
    raw.parse()
        .map_err(|_| AppError::validation(format!("Valor inválido: {raw}")))
}

/// Trimmed text, `None` when blank.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_options_start_with_prompt() {
        let students = vec![Student {
            id: 4,
            name: "Fernanda".into(),
        }];
        let options = student_options(&students, "Selecione o aluno");
        assert_eq!(options[0], SelectOption::prompt("Selecione o aluno"));
        assert_eq!(options[1], SelectOption::new("4", "Fernanda"));
    }

    #[test]
    fn required_id_rejects_blank_and_garbage() {
        assert_eq!(required_id(" 12 ", "x").unwrap(), 12);
        assert!(matches!(required_id("", "Selecione."), Err(AppError::Validation(m)) if m == "Selecione."));
        assert!(required_id("doze", "x").is_err());
    }

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(optional_text("   "), None);
        assert_eq!(optional_text(" Quad "), Some("Quad".to_string()));
    }
}
