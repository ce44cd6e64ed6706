// src/page.rs

//! Interaction surface shared by the page controllers.
//!
//! Controllers never print or prompt directly. Blocking dialogs,
//! navigation, the document title and printing all go through [`Page`].

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::Result;

/// What a page controller can ask of its host.
pub trait Page: Send + Sync {
    /// Show a blocking message.
    fn alert(&self, message: &str);

    /// Ask a yes/no question.
    fn confirm(&self, message: &str) -> bool;

    /// Leave the current page.
    fn navigate(&self, path: &str);

    fn title(&self) -> String;

    fn set_title(&self, title: &str);

    /// Print `content` using the current title as the document name.
    fn print(&self, content: &str) -> Result<()>;
}

/// Buffered line reader over one input stream.
///
/// Everything that reads the terminal shares a single instance so no line
/// is swallowed by another reader's buffer.
pub struct LineInput {
    reader: Mutex<Box<dyn BufRead + Send>>,
}

impl LineInput {
    pub fn new(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            reader: Mutex::new(Box::new(reader)),
        }
    }

    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()))
    }

    /// Next line without its terminator, `None` at end of input.
    pub fn next_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let mut reader = self.reader.lock().unwrap_or_else(|e| e.into_inner());
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Page hosted in a terminal.
///
/// Printing writes `{title}.txt` under the export directory.
pub struct TerminalPage {
    title: Mutex<String>,
    export_dir: PathBuf,
    input: Arc<LineInput>,
    assume_yes: bool,
}

impl TerminalPage {
    pub fn new(
        title: impl Into<String>,
        export_dir: impl Into<PathBuf>,
        input: Arc<LineInput>,
    ) -> Self {
        Self {
            title: Mutex::new(title.into()),
            export_dir: export_dir.into(),
            input,
            assume_yes: false,
        }
    }

    /// Answer every confirmation with "yes" instead of prompting.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    fn lock_title(&self) -> std::sync::MutexGuard<'_, String> {
        self.title.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Page for TerminalPage {
    fn alert(&self, message: &str) {
        println!("» {message}");
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{message} [s/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        match self.input.next_line() {
            Ok(Some(answer)) => {
                matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes")
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("Could not read confirmation: {e}");
                false
            }
        }
    }

    fn navigate(&self, path: &str) {
        println!("→ {path}");
    }

    fn title(&self) -> String {
        self.lock_title().clone()
    }

    fn set_title(&self, title: &str) {
        *self.lock_title() = title.to_string();
    }

    fn print(&self, content: &str) -> Result<()> {
        fs::create_dir_all(&self.export_dir)?;
        let path = self.export_dir.join(format!("{}.txt", self.title()));
        fs::write(&path, content)?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn no_input() -> Arc<LineInput> {
        Arc::new(LineInput::new(Cursor::new(Vec::new())))
    }

    #[test]
    fn terminal_print_uses_title_as_file_name() {
        let tmp = TempDir::new().unwrap();
        let page = TerminalPage::new("Ranking_01-12-2025_a_07-12-2025", tmp.path(), no_input());

        page.print("conteúdo").unwrap();

        let written =
            fs::read_to_string(tmp.path().join("Ranking_01-12-2025_a_07-12-2025.txt")).unwrap();
        assert_eq!(written, "conteúdo");
    }

    #[test]
    fn assume_yes_skips_prompt() {
        let page = TerminalPage::new("t", "reports", no_input()).assume_yes(true);
        assert!(page.confirm("Apagar?"));
    }

    #[test]
    fn confirm_reads_from_shared_input_in_order() {
        let input = Arc::new(LineInput::new(Cursor::new(b"1\nf\ns\r\ns 3\nq\n".to_vec())));
        let page = TerminalPage::new("Simulado", "reports", Arc::clone(&input));

        assert_eq!(input.next_line().unwrap().as_deref(), Some("1"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("f"));
        assert!(page.confirm("Tem certeza que deseja finalizar o simulado?"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("s 3"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("q"));
        assert_eq!(input.next_line().unwrap(), None);
        assert!(!page.confirm("Apagar?"));
    }
}
