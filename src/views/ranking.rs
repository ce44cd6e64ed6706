//! Overall, weekly and prior-week leaderboard pages.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::api::{ApiClient, Transport};
use crate::error::Result;
use crate::models::{Battle, Rankings, TeamTotals, WeeklyReport};
use crate::page::Page;
use crate::utils::{format_number, format_percent};
use crate::views::podium::{BoardStyle, Leaderboard};

const LOAD_ERROR: &str = "Erro ao carregar ranking.";

/// File name used for the prior-week export when the period is unknown.
pub const DEFAULT_EXPORT_NAME: &str = "Ranking_Semana_Passada";

/// How long the export title stays before the previous one is restored.
pub const TITLE_RESTORE_DELAY: Duration = Duration::from_secs(1);

/// Which leaderboard endpoint a [`RankingController`] shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingScope {
    /// All-time totals
    Overall,
    /// Current week dashboard
    Weekly,
}

impl RankingScope {
    fn count_style(self) -> BoardStyle {
        match self {
            Self::Overall => {
                BoardStyle::count("Questões", "questões", "Nenhum registro encontrado ainda.")
            }
            Self::Weekly => BoardStyle::count(
                "questões",
                "questões",
                "Nenhum registro encontrado para esta semana ainda.",
            ),
        }
    }

    fn percentage_style(self) -> BoardStyle {
        match self {
            Self::Overall => BoardStyle::percentage(
                "Nenhum registro encontrado ainda (ou mínimo não atingido).",
            ),
            Self::Weekly => BoardStyle::percentage(
                "Nenhum registro encontrado para esta semana ainda (ou mínimo não atingido).",
            ),
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::Overall => "Ranking Geral",
            Self::Weekly => "Ranking da Semana",
        }
    }
}

/// Controller of the overall and weekly leaderboard pages.
pub struct RankingController<T> {
    api: ApiClient<T>,
    scope: RankingScope,
    by_count: Leaderboard,
    by_percentage: Leaderboard,
}

impl<T: Transport> RankingController<T> {
    pub fn new(api: ApiClient<T>, scope: RankingScope) -> Self {
        Self {
            api,
            scope,
            by_count: Leaderboard::placeholder(&scope.count_style()),
            by_percentage: Leaderboard::placeholder(&scope.percentage_style()),
        }
    }

    pub async fn load(&mut self) {
        let rankings = match self.scope {
            RankingScope::Overall => self.api.overall_rankings().await,
            RankingScope::Weekly => self.api.weekly_rankings().await,
        };
        match rankings {
            Ok(rankings) => self.apply(&rankings),
            Err(e) => {
                log::error!("Failed to load {:?} rankings: {e}", self.scope);
                self.by_count = Leaderboard::failed(&self.scope.count_style(), LOAD_ERROR);
                self.by_percentage =
                    Leaderboard::failed(&self.scope.percentage_style(), LOAD_ERROR);
            }
        }
    }

    fn apply(&mut self, rankings: &Rankings) {
        self.by_count = Leaderboard::build(&rankings.by_count, &self.scope.count_style());
        self.by_percentage =
            Leaderboard::build(&rankings.by_percentage, &self.scope.percentage_style());
    }

    pub fn by_count(&self) -> &Leaderboard {
        &self.by_count
    }

    pub fn by_percentage(&self) -> &Leaderboard {
        &self.by_percentage
    }

    pub fn render(&self) -> String {
        let heading = self.scope.heading();
        format!(
            "{}\n{}",
            self.by_count.render(&format!("{heading} - Quantidade")),
            self.by_percentage.render(&format!("{heading} - Percentual"))
        )
    }
}

/// Team battle block of the prior-week page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleView {
    pub alpha_questions: String,
    pub alpha_precision: String,
    pub omega_questions: String,
    pub omega_precision: String,
    pub winner: String,
}

impl BattleView {
    fn from_battle(battle: &Battle) -> Self {
        let questions = |team: &TeamTotals| format_number(team.questions);
        let precision = |team: &TeamTotals| format_percent(team.precision);
        Self {
            alpha_questions: questions(&battle.alpha),
            alpha_precision: precision(&battle.alpha),
            omega_questions: questions(&battle.omega),
            omega_precision: precision(&battle.omega),
            winner: battle.winner.clone(),
        }
    }
}

const LAST_WEEK_COUNT: BoardStyle = BoardStyle::count(
    "Questões",
    "Questões",
    "Nenhum registro encontrado na semana passada.",
);
const LAST_WEEK_PERCENT: BoardStyle =
    BoardStyle::percentage("Nenhum registro encontrado na semana passada.");

/// Controller of the prior-week report page.
pub struct LastWeekController<T> {
    api: ApiClient<T>,
    page: Arc<dyn Page>,
    /// Title the page had when the report opened
    original_title: String,
    period_text: Option<String>,
    export_name: String,
    battle: Option<BattleView>,
    by_count: Leaderboard,
    by_percentage: Leaderboard,
}

impl<T: Transport> LastWeekController<T> {
    pub fn new(api: ApiClient<T>, page: Arc<dyn Page>) -> Self {
        let original_title = page.title();
        Self {
            api,
            page,
            original_title,
            period_text: None,
            export_name: DEFAULT_EXPORT_NAME.to_string(),
            battle: None,
            by_count: Leaderboard::placeholder(&LAST_WEEK_COUNT),
            by_percentage: Leaderboard::placeholder(&LAST_WEEK_PERCENT),
        }
    }

    pub async fn load(&mut self) {
        match self.api.last_week_report().await {
            Ok(report) => self.apply(&report),
            Err(e) => log::error!("Failed to load prior-week ranking: {e}"),
        }
    }

    fn apply(&mut self, report: &WeeklyReport) {
        if let Some(period) = &report.period {
            self.period_text = Some(format!("Período: {} até {}", period.start, period.end));
            self.export_name = format!(
                "Ranking_{}_a_{}",
                period.start.replace('/', "-"),
                period.end.replace('/', "-")
            );
        }
        self.battle = report.battle.as_ref().map(BattleView::from_battle);
        self.by_count = Leaderboard::build(&report.rankings.by_count, &LAST_WEEK_COUNT);
        self.by_percentage =
            Leaderboard::build(&report.rankings.by_percentage, &LAST_WEEK_PERCENT);
    }

    pub fn period_text(&self) -> Option<&str> {
        self.period_text.as_deref()
    }

    pub fn export_name(&self) -> &str {
        &self.export_name
    }

    pub fn battle(&self) -> Option<&BattleView> {
        self.battle.as_ref()
    }

    pub fn by_count(&self) -> &Leaderboard {
        &self.by_count
    }

    pub fn by_percentage(&self) -> &Leaderboard {
        &self.by_percentage
    }

    /// Print the report under the export name.
    ///
    /// The original page title comes back after [`TITLE_RESTORE_DELAY`] on
    /// a detached task, even when exports overlap. The handle is returned
    /// so a short-lived caller can wait for it.
    pub fn export(&self) -> Result<JoinHandle<()>> {
        self.page.set_title(&self.export_name);
        if let Err(e) = self.page.print(&self.render()) {
            self.page.set_title(&self.original_title);
            return Err(e);
        }
        log::info!("Exported prior-week ranking as {}", self.export_name);

        let page = Arc::clone(&self.page);
        let original = self.original_title.clone();
        Ok(tokio::spawn(async move {
            tokio::time::sleep(TITLE_RESTORE_DELAY).await;
            page.set_title(&original);
        }))
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Ranking da Semana Passada\n");
        if let Some(period) = &self.period_text {
            out.push_str(&format!("{period}\n"));
        }
        if let Some(battle) = &self.battle {
            out.push_str("\n== Batalha de Times ==\n");
            out.push_str(&format!(
                "Alpha: {} questões ({})\n",
                battle.alpha_questions, battle.alpha_precision
            ));
            out.push_str(&format!(
                "Omega: {} questões ({})\n",
                battle.omega_questions, battle.omega_precision
            ));
            out.push_str(&format!("Vencedor: {}\n", battle.winner));
        }
        out.push('\n');
        out.push_str(&self.by_count.render("Quantidade"));
        out.push('\n');
        out.push_str(&self.by_percentage.render("Percentual"));
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

    #[tokio::test]
    async fn overall_fills_both_boards() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Get,
            "/api/rankings/geral",
            200,
            json!({
                "quantidade": [{"nome": "Liu", "total": "320"}, {"nome": "Yan", "total": 150}],
                "percentual": [{"nome": "Yan", "percentual": "66.6666"}]
            }),
        );
        let mut controller = RankingController::new(ApiClient::new(mock), RankingScope::Overall);

        controller.load().await;

        assert_eq!(controller.by_count().podium[0].score, "320 Questões");
        assert_eq!(controller.by_count().podium[2].score, "--- Questões");
        assert_eq!(controller.by_percentage().podium[0].score, "66.67%");
        assert!(controller.by_count().rest.is_empty());
    }

    #[tokio::test]
    async fn weekly_failure_marks_both_lists() {
        let mock = MockTransport::new();
        mock.reply(Method::Get, "/api/rankings", 500, json!({"erro": "falhou"}));
        let mut controller = RankingController::new(ApiClient::new(mock), RankingScope::Weekly);

        controller.load().await;

        assert_eq!(controller.by_count().rest, vec![LOAD_ERROR]);
        assert_eq!(controller.by_percentage().rest, vec![LOAD_ERROR]);
        assert_eq!(controller.by_count().podium[0].name, "---");
    }

    #[tokio::test]
    async fn weekly_empty_lists_show_messages() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Get,
            "/api/rankings",
            200,
            json!({"quantidade": [], "percentual": []}),
        );
        let mut controller = RankingController::new(ApiClient::new(mock), RankingScope::Weekly);

        controller.load().await;

        assert_eq!(
            controller.by_percentage().rest,
            vec!["Nenhum registro encontrado para esta semana ainda (ou mínimo não atingido)."]
        );
    }

    fn last_week_body() -> serde_json::Value {
        json!({
            "quantidade": [{"nome": "Liu", "total": 90}],
            "percentual": [{"nome": "Liu", "percentual": 71.4285}],
            "batalha": {
                "Alpha": {"questoes": 90, "precisao": 71.43},
                "Omega": {"questoes": 40, "precisao": 50.0},
                "vencedor": "Alpha"
            },
            "periodo": {"inicio": "01/12/2025", "fim": "07/12/2025"}
        })
    }

    #[tokio::test]
    async fn last_week_period_and_battle() {
        let mock = MockTransport::new();
        mock.reply(Method::Get, "/api/rankings/semana-passada", 200, last_week_body());
        let page = Arc::new(RecordingPage::new("Semana Passada"));
        let mut controller = LastWeekController::new(ApiClient::new(mock), page);

        controller.load().await;

        assert_eq!(controller.period_text(), Some("Período: 01/12/2025 até 07/12/2025"));
        assert_eq!(controller.export_name(), "Ranking_01-12-2025_a_07-12-2025");
        let battle = controller.battle().unwrap();
        assert_eq!(battle.alpha_questions, "90");
        assert_eq!(battle.omega_precision, "50.00%");
        assert_eq!(battle.winner, "Alpha");
        assert_eq!(controller.by_percentage().podium[0].score, "71.43%");
    }

    #[tokio::test]
    async fn missing_period_keeps_default_export_name() {
        let mock = MockTransport::new();
        mock.reply(
            Method::Get,
            "/api/rankings/semana-passada",
            200,
            json!({"quantidade": [], "percentual": []}),
        );
        let page = Arc::new(RecordingPage::new("Semana Passada"));
        let mut controller = LastWeekController::new(ApiClient::new(mock), page);

        controller.load().await;

        assert_eq!(controller.export_name(), DEFAULT_EXPORT_NAME);
        assert!(controller.battle().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn export_prints_under_period_name_then_restores_title() {
        let mock = MockTransport::new();
        mock.reply(Method::Get, "/api/rankings/semana-passada", 200, last_week_body());
        let page = Arc::new(RecordingPage::new("Semana Passada"));
        let mut controller = LastWeekController::new(ApiClient::new(mock), page.clone());
        controller.load().await;

        let restore = controller.export().unwrap();

        assert_eq!(page.title(), "Ranking_01-12-2025_a_07-12-2025");
        {
            let printed = page.printed.lock().unwrap();
            assert_eq!(printed.len(), 1);
            assert_eq!(printed[0].0, "Ranking_01-12-2025_a_07-12-2025");
            assert!(printed[0].1.contains("Vencedor: Alpha"));
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(page.title(), "Ranking_01-12-2025_a_07-12-2025");

        restore.await.unwrap();
        assert_eq!(page.title(), "Semana Passada");
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_exports_restore_original_title() {
        let mock = MockTransport::new();
        mock.reply(Method::Get, "/api/rankings/semana-passada", 200, last_week_body());
        let page = Arc::new(RecordingPage::new("Semana Passada"));
        let mut controller = LastWeekController::new(ApiClient::new(mock), page.clone());
        controller.load().await;

        let first = controller.export().unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        let second = controller.export().unwrap();

        first.await.unwrap();
        second.await.unwrap();
        assert_eq!(page.title(), "Semana Passada");
        assert_eq!(page.printed.lock().unwrap().len(), 2);
    }
}
