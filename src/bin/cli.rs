//! Simulados CLI
//!
//! Terminal front end for every page of the simulados study tracker.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use simulados::{
    api::{ApiClient, HttpTransport},
    error::{AppError, Result},
    models::Config,
    page::{LineInput, Page, TerminalPage},
    session::SystemClock,
    utils::format_time,
    views::{
        charts::TextChartBackend,
        exam_ranking::{ExamBoard, ExamRankingController},
        management::{ExamForm, ManagementController, ResultForm},
        performance::{PerformanceController, PerformanceForm},
        ranking::{LastWeekController, RankingController, RankingScope},
        registration::{RecordForm, RegistrationController},
        session::SessionController,
        teams::TeamsController,
    },
};

/// simulados - study tracker client
#[derive(Parser, Debug)]
#[command(
    name = "simulados",
    version,
    about = "Terminal client for the simulados study tracker"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "simulados.toml")]
    config: PathBuf,

    /// Server root, overrides `client.base_url`
    #[arg(long)]
    base_url: Option<String>,

    /// Answer every confirmation with yes
    #[arg(short, long)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List students
    Students,

    /// Query one student's performance over a date range
    Performance {
        #[arg(long)]
        student: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// YYYY-MM-DD
        #[arg(long)]
        end: String,
    },

    /// Manage companies
    Companies {
        #[command(subcommand)]
        action: CompanyAction,
    },

    /// Manage mock exams
    Exams {
        #[command(subcommand)]
        action: ExamAction,
    },

    /// Manage exam scores
    Results {
        #[command(subcommand)]
        action: ResultAction,
    },

    /// Register practice questions
    Records {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Run a timed exam session
    Session {
        /// Exam the times are saved against, overrides `session.exam_id`
        #[arg(long)]
        exam_id: Option<i64>,
    },

    /// Show leaderboards
    Ranking {
        #[command(subcommand)]
        board: RankingBoard,
    },

    /// Team battle and student administration
    Teams {
        #[command(subcommand)]
        action: TeamAction,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(Subcommand, Debug)]
enum CompanyAction {
    List,
    Add { name: String },
}

#[derive(Subcommand, Debug)]
enum ExamAction {
    List,
    Add(ExamArgs),
}

#[derive(Args, Debug)]
struct ExamArgs {
    #[arg(long)]
    company: String,
    #[arg(long, default_value = "")]
    number: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long)]
    category: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
}

#[derive(Subcommand, Debug)]
enum ResultAction {
    List,
    Add {
        #[arg(long)]
        student: String,
        #[arg(long)]
        exam: String,
        #[arg(long)]
        score: String,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum RecordAction {
    List,
    Add {
        #[arg(long)]
        student: String,
        #[arg(long)]
        questions: String,
        #[arg(long)]
        correct: String,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum RankingBoard {
    /// All-time leaderboards
    Overall,
    /// Current week leaderboards
    Weekly,
    /// Prior week report with the team battle
    LastWeek {
        /// Write the report to the export directory
        #[arg(long)]
        export: bool,
    },
    /// Leaderboard of one mock exam; lists exams when no id is given
    Exam {
        id: Option<i64>,
        /// Show the time breakdown of every row
        #[arg(long)]
        expand: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TeamAction {
    Scoreboard,
    Roster,
    Assign {
        student: i64,
        team: String,
    },
    AddStudent {
        name: String,
        #[arg(long)]
        team: Option<String>,
    },
    UpdateStudent {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        team: Option<String>,
    },
    DeleteStudent {
        id: i64,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Shared pieces every command needs.
struct Context {
    config: Config,
    api: ApiClient<HttpTransport>,
    input: Arc<LineInput>,
    assume_yes: bool,
}

impl Context {
    fn page(&self, title: &str) -> Arc<TerminalPage> {
        Arc::new(
            TerminalPage::new(
                title,
                &self.config.export.output_dir,
                Arc::clone(&self.input),
            )
            .assume_yes(self.assume_yes),
        )
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {e}");
        return Err(e);
    }
    log::debug!("Using server {}", config.client.base_url);

    let api = ApiClient::new(HttpTransport::new(&config.client)?);
    let ctx = Context {
        config,
        api,
        input: Arc::new(LineInput::stdin()),
        assume_yes: cli.yes,
    };

    match cli.command {
        Command::Validate => log::info!("✓ Config OK"),
        Command::Students => {
            for student in ctx.api.students().await? {
                println!("[{}] {}", student.id, student.name);
            }
        }
        Command::Performance {
            student,
            start,
            end,
        } => {
            let mut controller = PerformanceController::new(
                ctx.api.clone(),
                ctx.page("Consulta de Desempenho"),
                Box::new(TextChartBackend::echoing()),
            );
            let form = PerformanceForm {
                student_id: student,
                start,
                end,
            };
            controller.submit(&form).await;
            print!("{}", controller.render());
        }
        Command::Companies { action } => run_companies(&ctx, action).await,
        Command::Exams { action } => run_exams(&ctx, action).await,
        Command::Results { action } => run_results(&ctx, action).await,
        Command::Records { action } => run_records(&ctx, action).await,
        Command::Session { exam_id } => run_session(&ctx, exam_id).await?,
        Command::Ranking { board } => run_ranking(&ctx, board).await?,
        Command::Teams { action } => run_teams(&ctx, action).await,
    }

    Ok(())
}

fn management(ctx: &Context) -> ManagementController<HttpTransport> {
    ManagementController::new(ctx.api.clone(), ctx.page("Gerenciar Simulados"))
}

async fn run_companies(ctx: &Context, action: CompanyAction) {
    let mut controller = management(ctx);
    match action {
        CompanyAction::List => {
            controller.load().await;
            for company in controller.companies() {
                println!("{company}");
            }
        }
        CompanyAction::Add { name } => {
            controller.company_form.name = name;
            controller.submit_company().await;
        }
    }
}

async fn run_exams(ctx: &Context, action: ExamAction) {
    let mut controller = management(ctx);
    match action {
        ExamAction::List => {
            controller.load().await;
            for (option, exam) in controller.exam_options().iter().skip(1).zip(controller.exams()) {
                println!("[{}] {exam}", option.value);
            }
        }
        ExamAction::Add(args) => {
            controller.exam_form = ExamForm {
                company_id: args.company,
                number: args.number,
                specific_name: args.name,
                category: args.category,
                date: args.date,
            };
            controller.submit_exam().await;
        }
    }
}

async fn run_results(ctx: &Context, action: ResultAction) {
    let mut controller = management(ctx);
    match action {
        ResultAction::List => {
            controller.load().await;
            print!("{}", controller.render());
        }
        ResultAction::Add {
            student,
            exam,
            score,
        } => {
            controller.result_form = ResultForm {
                student_id: student,
                exam_id: exam,
                score,
            };
            controller.submit_result().await;
        }
        ResultAction::Delete { id } => {
            controller.delete_result(id).await;
            print!("{}", controller.render());
        }
    }
}

async fn run_records(ctx: &Context, action: RecordAction) {
    let mut controller =
        RegistrationController::new(ctx.api.clone(), ctx.page("Registrar Questões"));
    match action {
        RecordAction::List => controller.load().await,
        RecordAction::Add {
            student,
            questions,
            correct,
        } => {
            controller.form = RecordForm {
                student_id: student,
                questions,
                correct,
            };
            controller.submit().await;
        }
        RecordAction::Delete { id } => controller.delete(id).await,
    }
    print!("{}", controller.render());
}

async fn run_ranking(ctx: &Context, board: RankingBoard) -> Result<()> {
    match board {
        RankingBoard::Overall => show_rankings(ctx, RankingScope::Overall).await,
        RankingBoard::Weekly => show_rankings(ctx, RankingScope::Weekly).await,
        RankingBoard::LastWeek { export } => {
            let mut controller =
                LastWeekController::new(ctx.api.clone(), ctx.page("Ranking Semana Passada"));
            controller.load().await;
            print!("{}", controller.render());
            if export {
                let restore = controller.export()?;
                if let Err(e) = restore.await {
                    log::warn!("Title restore task failed: {e}");
                }
            }
        }
        RankingBoard::Exam { id, expand } => {
            let mut controller =
                ExamRankingController::new(ctx.api.clone(), ctx.page("Ranking de Simulados"));
            controller.load().await;
            if id.is_none() {
                for option in controller.options() {
                    println!("[{}] {}", option.value, option.label);
                }
                return Ok(());
            }
            controller.show(id).await;
            if expand {
                let rows = match controller.board() {
                    ExamBoard::Rows(rows) => rows.len(),
                    _ => 0,
                };
                (0..rows).for_each(|row| controller.toggle(row));
            }
            print!("{}", controller.render());
        }
    }
    Ok(())
}

async fn show_rankings(ctx: &Context, scope: RankingScope) {
    let mut controller = RankingController::new(ctx.api.clone(), scope);
    controller.load().await;
    print!("{}", controller.render());
}

async fn run_teams(ctx: &Context, action: TeamAction) {
    let mut controller = TeamsController::new(ctx.api.clone(), ctx.page("Times"));
    match action {
        TeamAction::Scoreboard => {
            controller.scoreboard().await;
            print!("{}", controller.render_scoreboard());
            return;
        }
        TeamAction::Roster => controller.load_roster().await,
        TeamAction::Assign { student, team } => controller.assign(student, &team).await,
        TeamAction::AddStudent { name, team } => {
            controller.create_student(&name, team.as_deref()).await
        }
        TeamAction::UpdateStudent { id, name, team } => {
            controller
                .update_student(id, name.as_deref(), team.as_deref())
                .await
        }
        TeamAction::DeleteStudent { id } => controller.delete_student(id).await,
    }
    print!("{}", controller.render_roster());
}

const SESSION_HELP: &str = "Comandos: <número ou nome da matéria> | p (pausar/retomar) | \
     f (finalizar) | s <id do aluno> (salvar) | q (sair) | Enter (atualizar)";

/// Interactive session loop reading commands from stdin.
async fn run_session(ctx: &Context, exam_id: Option<i64>) -> Result<()> {
    let exam_id = exam_id.or(ctx.config.session.exam_id).ok_or_else(|| {
        AppError::config("No exam selected: pass --exam-id or set session.exam_id")
    })?;

    let page = ctx.page("Simulado");
    let mut controller = SessionController::new(
        ctx.api.clone(),
        page.clone(),
        SystemClock,
        exam_id,
        &ctx.config.session,
    );

    println!("{SESSION_HELP}");
    print!("{}", controller.render());

    // Shared with page confirmations.
    while let Some(line) = tokio::task::block_in_place(|| ctx.input.next_line())? {
        let input = line.trim();
        controller.tick();
        match input {
            "" => {}
            "q" => break,
            "p" => {
                let button = controller.toggle_pause();
                log::debug!("Pause button now shows {}", button.label);
            }
            "f" => {
                if controller.finalize().await {
                    for option in controller.students().iter().skip(1) {
                        println!("[{}] {}", option.value, option.label);
                    }
                }
            }
            _ if input.starts_with("s ") || input == "s" => {
                let student = input
                    .strip_prefix('s')
                    .map(str::trim)
                    .and_then(|raw| raw.parse().ok());
                if controller.save(student).await.is_ok() {
                    break;
                }
            }
            _ => {
                let subject = match input.parse::<usize>() {
                    Ok(n) if (1..=controller.subjects().len()).contains(&n) => {
                        controller.subjects()[n - 1].clone()
                    }
                    _ => input.to_string(),
                };
                if controller.subjects().contains(&subject) {
                    controller.select_subject(&subject);
                } else {
                    page.alert(&format!("Matéria desconhecida: {subject}"));
                }
            }
        }
        print!("{}", controller.render());
    }

    log::info!(
        "Session ended at {}",
        format_time(controller.timer().total_seconds())
    );
    Ok(())
}
