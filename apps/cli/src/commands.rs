//! CLI command definitions, routing, and tracing setup.

use std::future::Future;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use qros_core::LaunchFileType;
use qros_llm::{CancellationToken, ChatCompletionsClient};
use qros_retrieval::{DirectoryCollection, KeywordRetriever};
use qros_shared::{
    AppConfig, RetrievalConfig, RetrievedSource, init_config, load_config, load_config_from, resolve_api_key,
    write_default_config,
};

use crate::render;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// QROS — your ROS2 co-pilot.
#[derive(Parser)]
#[command(
    name = "qros",
    version,
    about = "Grounded ROS2 answers plus build-log, launch-file and TF-tree analysis.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print results as JSON instead of formatted cards.
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of ~/.qros/qros.toml.
    #[arg(long, global = true, env = "QROS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory of grounding documents (overrides [docs].dir).
    #[arg(long, global = true, env = "QROS_DOCS_DIR")]
    pub docs_dir: Option<PathBuf>,

    /// Maximum number of grounding sources (overrides [docs].max_results).
    #[arg(long, global = true)]
    pub max_results: Option<usize>,

    /// Model identifier (overrides [llm].model).
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Launch file syntax as accepted on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LaunchKind {
    Xml,
    Yaml,
    Py,
}

impl From<LaunchKind> for LaunchFileType {
    fn from(kind: LaunchKind) -> Self {
        match kind {
            LaunchKind::Xml => Self::Xml,
            LaunchKind::Yaml => Self::Yaml,
            LaunchKind::Py => Self::Py,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Ask a ROS2 question, grounded in the documentation folder.
    Ask {
        /// The question (quote it, or pass it as several words).
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Show which documents would ground a question, without calling the LLM.
    Sources {
        /// The question.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Find errors in a colcon build log.
    #[command(name = "build-log")]
    BuildLog {
        /// Log file; reads stdin when omitted or `-`.
        file: Option<PathBuf>,
    },

    /// Debug a launch file (XML, YAML, or Python).
    Launch {
        /// Launch file; reads stdin when omitted or `-`.
        file: Option<PathBuf>,

        /// Launch file type (inferred from the extension when omitted).
        #[arg(short = 't', long = "type")]
        file_type: Option<LaunchKind>,
    },

    /// Look for problems in a TF tree dump (e.g. `ros2 run tf2_tools view_frames` output).
    #[command(name = "tf-tree")]
    TfTree {
        /// TF tree file; reads stdin when omitted or `-`.
        file: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Default filter directive for a `-v` count.
fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "qros=info",
        1 => "qros=debug",
        _ => "qros=trace",
    }
}

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(cli.verbose)));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    // `config init` must work before any config file exists.
    if let Command::Config {
        action: ConfigAction::Init,
    } = &cli.command
    {
        return cmd_config_init(cli.config.as_deref());
    }

    let config = resolve_config(&cli)?;
    let json = cli.json;

    match cli.command {
        Command::Ask { question } => cmd_ask(&config, &question.join(" "), json).await,
        Command::Sources { question } => cmd_sources(&config, &question.join(" "), json),
        Command::BuildLog { file } => cmd_build_log(&config, file.as_deref(), json).await,
        Command::Launch { file, file_type } => {
            cmd_launch(&config, file.as_deref(), file_type, json).await
        }
        Command::TfTree { file } => cmd_tf_tree(&config, file.as_deref(), json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(cli.config.as_deref()),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Load the config file and apply CLI overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(dir) = &cli.docs_dir {
        config.docs.dir = dir.to_string_lossy().into_owned();
    }
    if let Some(max) = cli.max_results {
        config.docs.max_results = max;
    }
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }

    Ok(config)
}

fn build_retriever(config: &AppConfig) -> (KeywordRetriever<DirectoryCollection>, usize) {
    let retrieval = RetrievalConfig::from(config);
    let collection =
        DirectoryCollection::new(retrieval.docs_dir).with_extensions(retrieval.extensions);
    (KeywordRetriever::new(collection), retrieval.max_results)
}

fn build_client(config: &AppConfig) -> Result<ChatCompletionsClient> {
    let api_key = resolve_api_key(config)?;
    Ok(ChatCompletionsClient::from_config(&config.llm, api_key)?)
}

/// A token cancelled on Ctrl-C.
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling request");
            trigger.cancel();
        }
    });
    token
}

/// Read a file, or stdin for `None` / `-`.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .wrap_err("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Print `value` as JSON or as rendered cards.
fn emit<T: Serialize>(json: bool, value: &T, render: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render(value));
    }
    Ok(())
}

/// Await `fut` behind a spinner on stderr.
async fn with_spinner<T>(message: &str, fut: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let out = fut.await;
    spinner.finish_and_clear();
    out
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_ask(config: &AppConfig, question: &str, json: bool) -> Result<()> {
    let client = build_client(config)?;
    let (retriever, max_results) = build_retriever(config);
    let cancel = cancel_on_interrupt();

    info!(
        docs = %retriever.collection().root().display(),
        max_results,
        model = client.model(),
        "answering question"
    );

    let answer = with_spinner(
        "Consulting the documentation",
        qros_core::answer_question(&retriever, &client, question, max_results, &cancel),
    )
    .await?;

    emit(json, &answer, render::answer)
}

/// Ranked sources for `question`; an unreadable docs dir yields none.
fn find_sources(config: &AppConfig, question: &str) -> Result<Vec<RetrievedSource>> {
    let (retriever, max_results) = build_retriever(config);
    let sources = qros_core::gather_sources(&retriever, question, max_results)?;
    Ok(sources)
}

fn cmd_sources(config: &AppConfig, question: &str, json: bool) -> Result<()> {
    let sources = find_sources(config, question)?;
    emit(json, &sources, |s| render::sources(s))
}

async fn cmd_build_log(config: &AppConfig, file: Option<&Path>, json: bool) -> Result<()> {
    let log = read_input(file)?;
    let client = build_client(config)?;
    let cancel = cancel_on_interrupt();

    let analysis = with_spinner(
        "Analyzing build log",
        qros_core::analyze_build_log(&client, &log, &cancel),
    )
    .await?;

    emit(json, &analysis, render::build_log)
}

async fn cmd_launch(
    config: &AppConfig,
    file: Option<&Path>,
    kind: Option<LaunchKind>,
    json: bool,
) -> Result<()> {
    let file_type = match (kind, file) {
        (Some(kind), _) => LaunchFileType::from(kind),
        (None, Some(path)) => LaunchFileType::from_path(path).ok_or_else(|| {
            eyre!(
                "cannot infer launch file type from '{}'; pass --type xml|yaml|py",
                path.display()
            )
        })?,
        (None, None) => return Err(eyre!("reading from stdin requires --type xml|yaml|py")),
    };

    let content = read_input(file)?;
    let client = build_client(config)?;
    let cancel = cancel_on_interrupt();

    let report = with_spinner(
        "Debugging launch file",
        qros_core::debug_launch_file(&client, &content, file_type, &cancel),
    )
    .await?;

    emit(json, &report, render::launch_file)
}

async fn cmd_tf_tree(config: &AppConfig, file: Option<&Path>, json: bool) -> Result<()> {
    let tree = read_input(file)?;
    let client = build_client(config)?;
    let cancel = cancel_on_interrupt();

    let analysis = with_spinner(
        "Analyzing TF tree",
        qros_core::analyze_tf_tree(&client, &tree, &cancel),
    )
    .await?;

    emit(json, &analysis, render::tf_tree)
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => {
            write_default_config(path)?;
            path.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
