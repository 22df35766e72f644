use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use viability_api::{UserProfile, DEFAULT_API_URL};
use viability_scoring::{ModelSettings, SimulatedModel, Verdict, ViabilityModel};
use viability_session::{RecordManager, ResultResolver, UsageCounter};
use viability_store::{resolve_state_dir, LocalStore, Namespace};
use viability_types::{validate, Analysis, Category, CompanyData, MAX_ATTEMPTS};

mod flags;
mod form;
mod helpers_cache;
mod output;
mod remote;
mod render;

use flags::{CategoryFlag, HelperTableFlag};

pub(crate) fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "viability")]
#[command(about = "Business location viability analysis", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// State directory (overrides VIABILITY_STATE_DIR)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Analysis backend base URL (overrides VIABILITY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the viability of a business at a location
    Analyze(AnalyzeArgs),

    /// Reopen the autosaved draft in the interactive form
    Resume(ResumeArgs),

    /// Show the verdict for a stored analysis
    Result(ResultArgs),

    /// List stored analysis records
    List(ListArgs),

    /// Delete a stored analysis record
    Delete(DeleteArgs),

    /// Show session state
    Status(StatusArgs),

    /// Reset the usage counter and discard the draft
    Reset(ResetArgs),

    /// Sign in to the analysis backend
    Login(LoginArgs),

    /// Create an account on the analysis backend
    Register(RegisterArgs),

    /// Discard the stored credentials
    Logout,

    /// Show the signed-in account
    Whoami(WhoamiArgs),

    /// Fetch a backend helper table
    Helpers(HelpersArgs),

    /// List the remote analysis history
    History(HistoryArgs),

    /// Show one remote history entry
    #[command(name = "history-show")]
    HistoryShow(HistoryShowArgs),

    /// Delete one remote history entry
    #[command(name = "history-delete")]
    HistoryDelete(HistoryDeleteArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Fill the form interactively instead of from flags
    #[arg(short, long)]
    interactive: bool,

    /// Postal code, e.g. 50030-230
    #[arg(long)]
    cep: Option<String>,

    /// Street name
    #[arg(long)]
    street: Option<String>,

    /// Street number
    #[arg(long)]
    number: Option<String>,

    /// Address complement
    #[arg(long)]
    complement: Option<String>,

    /// Neighborhood
    #[arg(long)]
    neighborhood: Option<String>,

    /// City
    #[arg(long)]
    city: Option<String>,

    /// Two-letter state code, e.g. PE
    #[arg(long)]
    uf: Option<String>,

    /// CNAE activity code, e.g. 4781-4/00
    #[arg(long)]
    cnae: Option<String>,

    /// Declared opening capital in BRL
    #[arg(long)]
    capital: Option<f64>,

    /// Register as MEI
    #[arg(long)]
    mei: bool,

    /// Legal nature, e.g. LTDA
    #[arg(long)]
    legal_nature: Option<String>,

    /// Qualification of the responsible party
    #[arg(long)]
    responsible: Option<String>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ResumeArgs {
    /// Record id of an incomplete analysis; falls back to the current
    /// session, then to the autosaved draft
    id: Option<String>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ResultArgs {
    /// Record id; falls back to the autosaved draft when omitted
    id: Option<String>,

    /// Force the rendered category (overrides VIABILITY_DEBUG_CATEGORY)
    #[arg(long, value_enum)]
    debug_category: Option<CategoryFlag>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DeleteArgs {
    /// Record id to delete
    id: String,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StatusArgs {
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ResetArgs {
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password (prompted when omitted)
    #[arg(long)]
    password: Option<String>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RegisterArgs {
    /// Account holder name
    #[arg(long)]
    name: String,

    /// Account email
    #[arg(long)]
    email: String,

    /// Company name
    #[arg(long)]
    company: String,

    /// Contact phone
    #[arg(long)]
    phone: String,

    /// Account password (prompted when omitted)
    #[arg(long)]
    password: Option<String>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct WhoamiArgs {
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct HelpersArgs {
    /// Table to fetch
    #[arg(value_enum)]
    table: HelperTableFlag,

    /// Bypass the local cache
    #[arg(long)]
    refresh: bool,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct HistoryArgs {
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct HistoryShowArgs {
    /// Remote history entry id
    id: u64,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct HistoryDeleteArgs {
    /// Remote history entry id
    id: u64,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Quiet mode is implied by --json so stdout stays parseable.
    let json_output = match &cli.command {
        Commands::Analyze(args) => args.json,
        Commands::Resume(args) => args.json,
        Commands::Result(args) => args.json,
        Commands::List(args) => args.json,
        Commands::Delete(args) => args.json,
        Commands::Status(args) => args.json,
        Commands::Reset(args) => args.json,
        Commands::Login(args) => args.json,
        Commands::Register(args) => args.json,
        Commands::Whoami(args) => args.json,
        Commands::Helpers(args) => args.json,
        Commands::History(args) => args.json,
        Commands::HistoryShow(args) => args.json,
        _ => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let quiet = cli.quiet;
    let app = App::open(&cli);

    match cli.command {
        Commands::Analyze(args) => run_analyze(args, quiet, &app).await?,
        Commands::Resume(args) => run_resume(args, quiet, &app).await?,
        Commands::Result(args) => run_result(args, quiet, &app).await?,
        Commands::List(args) => run_list(&args, &app)?,
        Commands::Delete(args) => run_delete(&args, &app)?,
        Commands::Status(args) => run_status(&args, &app)?,
        Commands::Reset(args) => run_reset(&args, &app)?,
        Commands::Login(args) => remote::run_login(args, &app).await?,
        Commands::Register(args) => remote::run_register(args, &app).await?,
        Commands::Logout => remote::run_logout(&app)?,
        Commands::Whoami(args) => remote::run_whoami(&args, &app)?,
        Commands::Helpers(args) => remote::run_helpers(args, &app).await?,
        Commands::History(args) => remote::run_history(&args, &app).await?,
        Commands::HistoryShow(args) => remote::run_history_show(&args, &app).await?,
        Commands::HistoryDelete(args) => remote::run_history_delete(&args, &app).await?,
    }
    Ok(())
}

/// Shared handles every command works against.
pub(crate) struct App {
    pub(crate) store: LocalStore,
    pub(crate) manager: Arc<RecordManager>,
    pub(crate) counter: UsageCounter,
    pub(crate) api_url: String,
}

impl App {
    fn open(cli: &Cli) -> Self {
        let dir = resolve_state_dir(cli.state_dir.clone());
        let store = LocalStore::open(dir);
        let manager = Arc::new(RecordManager::new(store.clone()));
        let counter = UsageCounter::new(store.clone());
        let api_url = cli
            .api_url
            .clone()
            .or_else(|| env::var("VIABILITY_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            store,
            manager,
            counter,
            api_url,
        }
    }
}

fn engine_settings() -> ModelSettings {
    let mut settings = ModelSettings::default();
    if let Ok(value) = env::var("VIABILITY_ENGINE_LATENCY_MS") {
        match value.parse::<u64>() {
            Ok(ms) => settings.latency = Duration::from_millis(ms),
            Err(err) => log::warn!("Ignoring VIABILITY_ENGINE_LATENCY_MS={value}: {err}"),
        }
    }
    if let Ok(value) = env::var("VIABILITY_SCORING_SEED") {
        match value.parse::<u64>() {
            Ok(seed) => settings.seed = Some(seed),
            Err(err) => log::warn!("Ignoring VIABILITY_SCORING_SEED={value}: {err}"),
        }
    }
    settings
}

fn debug_category(flag: Option<CategoryFlag>) -> Option<Category> {
    if let Some(flag) = flag {
        return Some(flag.as_domain());
    }
    let value = env::var("VIABILITY_DEBUG_CATEGORY").ok()?;
    match Category::parse(&value) {
        Some(category) => Some(category),
        None => {
            log::warn!("Ignoring VIABILITY_DEBUG_CATEGORY={value}: unknown category");
            None
        }
    }
}

fn company_from_flags(args: &AnalyzeArgs) -> CompanyData {
    CompanyData {
        cep: args.cep.clone().unwrap_or_default(),
        logradouro: args.street.clone().unwrap_or_default(),
        numero: args.number.clone().unwrap_or_default(),
        complemento: args.complement.clone().unwrap_or_default(),
        bairro: args.neighborhood.clone().unwrap_or_default(),
        cidade: args.city.clone().unwrap_or_default(),
        uf: args.uf.clone().unwrap_or_default(),
        cnae: args.cnae.clone().unwrap_or_default(),
        capital_inicial: args.capital.unwrap_or(0.0),
        mei: args.mei,
        natureza_juridica: args.legal_nature.clone().unwrap_or_default(),
        qualificacao_responsavel: args.responsible.clone().unwrap_or_default(),
    }
}

/// Open a session record for `company` and point the current-analysis
/// pointer at it. The record stays incomplete until submission finishes.
fn open_session(company: &CompanyData, app: &App) -> Analysis {
    let record = Analysis::draft(company);
    app.manager.store(record.clone());
    app.manager.set_current(&record.id);
    record
}

async fn run_analyze(args: AnalyzeArgs, quiet: bool, app: &App) -> Result<()> {
    let mut company = company_from_flags(&args);
    let mut session = None;
    if args.interactive {
        session = Some(open_session(&company, app));
        company = form::fill_company(company, app).await?;
    }
    submit_analysis(company, session, args.json, quiet, app).await
}

async fn run_resume(args: ResumeArgs, quiet: bool, app: &App) -> Result<()> {
    let session = match &args.id {
        Some(id) => {
            let Some(record) = app.manager.get(id) else {
                bail!("no stored analysis with id {id}");
            };
            if record.complete {
                bail!("analysis {id} is already completed; run `viability result {id}` to view it");
            }
            app.manager.set_current(id);
            record
        }
        None => {
            let current = app
                .manager
                .current_id()
                .and_then(|id| app.manager.get(&id))
                .filter(|record| !record.complete);
            match current {
                Some(record) => record,
                None => {
                    let Some(draft) = app.store.get::<CompanyData>(Namespace::Draft) else {
                        bail!("nothing to resume; run `viability analyze --interactive` first");
                    };
                    open_session(&draft, app)
                }
            }
        }
    };

    let prefill = app
        .manager
        .payload(&session.id)
        .or_else(|| app.store.get(Namespace::Draft))
        .unwrap_or_default();
    let company = form::fill_company(prefill, app).await?;
    submit_analysis(company, Some(session), args.json, quiet, app).await
}

async fn submit_analysis(
    company: CompanyData,
    session: Option<Analysis>,
    json: bool,
    quiet: bool,
    app: &App,
) -> Result<()> {
    let issues = validate::submit_issues(&company);
    if !issues.is_empty() {
        if json {
            print_stdout(&serde_json::to_string_pretty(&output::ValidationOutput::new(
                &issues,
            ))?)?;
        } else {
            for issue in &issues {
                eprintln!("  {}: {}", issue.field, issue.message);
            }
            eprintln!("Fix the fields above and run the analysis again.");
        }
        std::process::exit(1);
    }

    if app.counter.limit_reached() {
        let usage = app.counter.snapshot();
        log::warn!(
            "Analysis limit reached: {} of {} attempts used this session",
            usage.used,
            usage.max
        );
        let verdict = Verdict::new(Category::ExcessiveUse, company, usage);
        return emit_verdict(None, &verdict, json);
    }

    app.store.set(Namespace::Draft, &company);

    let mut record = match session {
        Some(mut record) => {
            record.refresh_from(&company);
            record
        }
        None => Analysis::draft(&company),
    };
    let id = record.id.clone();
    app.manager.store(record.clone());
    app.manager.set_current(&id);
    app.manager.save_payload(&id, &company);

    let attempts = app.counter.increment();
    log::info!("Running analysis {id}: attempt {attempts} of {MAX_ATTEMPTS}");

    record.begin_processing();
    app.manager.store(record.clone());

    let spinner = (!json && !quiet).then(render::scoring_spinner);
    let model = SimulatedModel::new(engine_settings());
    let verdict = model.analyze(&company, app.counter.snapshot()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    record.finish(verdict.score);
    app.manager.store(record);
    app.manager.clear_current();

    emit_verdict(Some(&id), &verdict, json)
}

fn emit_verdict(id: Option<&str>, verdict: &Verdict, json: bool) -> Result<()> {
    if json {
        let out = output::AnalyzeOutput::new(id, verdict);
        print_stdout(&serde_json::to_string_pretty(&out)?)
    } else {
        print_stdout(&render::verdict_card(id, verdict))
    }
}

async fn run_result(args: ResultArgs, quiet: bool, app: &App) -> Result<()> {
    let model = SimulatedModel::new(engine_settings());
    let resolver = ResultResolver {
        store: &app.store,
        manager: app.manager.as_ref(),
        counter: &app.counter,
        model: &model,
    };

    let spinner = (!args.json && !quiet).then(render::scoring_spinner);
    let resolution = resolver
        .resolve(args.id.as_deref(), debug_category(args.debug_category))
        .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&resolution)?)
    } else {
        print_stdout(&render::resolution_card(&resolution))
    }
}

fn run_list(args: &ListArgs, app: &App) -> Result<()> {
    let mut records = app.manager.all();
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&records)?)
    } else if records.is_empty() {
        print_stdout("No stored analyses.")
    } else {
        // The table reads top-down; JSON keeps the stored order.
        records.sort_by(|a, b| b.updated_at_ms.cmp(&a.updated_at_ms));
        print_stdout(&render::records_table(
            &records,
            app.manager.current_id().as_deref(),
        ))
    }
}

fn run_delete(args: &DeleteArgs, app: &App) -> Result<()> {
    let deleted = app.manager.delete(&args.id);
    if args.json {
        let out = output::DeleteOutput {
            id: &args.id,
            deleted,
        };
        print_stdout(&serde_json::to_string_pretty(&out)?)
    } else if deleted {
        print_stdout(&format!("Deleted {}", args.id))
    } else {
        eprintln!("No stored analysis with id {}", args.id);
        std::process::exit(1);
    }
}

fn run_status(args: &StatusArgs, app: &App) -> Result<()> {
    let usage = app.counter.snapshot();
    let token: Option<String> = app.store.get(Namespace::Token);
    let profile: Option<UserProfile> = app.store.get(Namespace::Profile);
    let status = output::StatusOutput {
        state_dir: app.store.dir().display().to_string(),
        records: app.manager.all().len(),
        current_id: app.manager.current_id(),
        draft_present: app.store.get::<CompanyData>(Namespace::Draft).is_some(),
        attempts_used: usage.used,
        attempts_max: usage.max,
        limit_reached: usage.limit_reached(),
        signed_in: token.is_some(),
    };
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&status)?)
    } else {
        print_stdout(&render::status_lines(&status, profile.as_ref()))
    }
}

fn run_reset(args: &ResetArgs, app: &App) -> Result<()> {
    app.counter.reset();
    app.store.remove(Namespace::Draft);
    app.manager.clear_current();
    log::info!("Session reset: usage counter cleared, draft discarded");
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&output::ResetOutput {
            reset: true,
        })?)
    } else {
        print_stdout(&format!(
            "Session reset: 0 of {MAX_ATTEMPTS} attempts used, draft discarded."
        ))
    }
}
