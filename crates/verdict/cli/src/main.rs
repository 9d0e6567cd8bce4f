use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use verdict_bench::persona::{PersonaSet, DEFAULT_THRESHOLD};
use verdict_pipeline::{AuditConfig, AuditPipeline, AuditRequest};

#[derive(Parser)]
#[command(name = "verdict", about = "Adjudicated forensic audits of agent-built repositories")]
#[command(version)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a repository (and optionally its report and diagrams)
    Audit(AuditArgs),

    /// Check that judge persona charters are textually distinct
    Personas(PersonaArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    Default,
    Strict,
    Fast,
}

impl Preset {
    fn config(self) -> AuditConfig {
        match self {
            Preset::Default => AuditConfig::default(),
            Preset::Strict => AuditConfig::strict(),
            Preset::Fast => AuditConfig::fast(),
        }
    }
}

#[derive(Args)]
struct AuditArgs {
    /// Git URL or local path of the repository under audit
    #[arg(long)]
    repo: String,

    /// Architecture report (Markdown or text; a PDF needs a text sibling)
    #[arg(long)]
    doc: Option<PathBuf>,

    /// Directory of diagram images extracted from the report
    #[arg(long)]
    images: Option<PathBuf>,

    /// Rubric JSON (overrides the config file)
    #[arg(long, env = "VERDICT_RUBRIC")]
    rubric: Option<PathBuf>,

    /// TOML config file; a missing file means defaults
    #[arg(short, long, env = "VERDICT_CONFIG")]
    config: Option<PathBuf>,

    /// Built-in settings used when no config file is given
    #[arg(long, value_enum, default_value = "default")]
    preset: Preset,

    /// Write the Markdown report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the report as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Args)]
struct PersonaArgs {
    /// TOML file of [[personas]] id/charter entries
    #[arg(short, long)]
    file: PathBuf,

    /// Maximum tolerated pairwise similarity
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "verdict=debug" } else { "verdict=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn audit(args: AuditArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AuditConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => args.preset.config(),
    };
    if let Some(rubric) = args.rubric {
        config.rubric_path = rubric;
    }
    tracing::debug!(?config, "configuration resolved");

    let pipeline = AuditPipeline::from_config(config).context("preparing audit pipeline")?;
    let request = AuditRequest {
        repo_locator: args.repo,
        document: args.doc,
        images: args.images,
    };
    let outcome = pipeline
        .run_and_write(&request, args.output.as_deref(), args.json.as_deref())
        .await
        .context("writing report")?;
    if args.output.is_none() {
        print!("{}", outcome.markdown);
    }
    Ok(())
}

fn personas(args: PersonaArgs) -> Result<()> {
    let set = PersonaSet::load(&args.file).with_context(|| format!("loading personas {}", args.file.display()))?;
    let report = set.check(args.threshold)?;
    for pair in &report.pairs {
        let flag = if pair.similarity > report.threshold { "  over threshold" } else { "" };
        println!("{:<20} {:<20} {:.2}{flag}", pair.first, pair.second, pair.similarity);
    }
    let violations = report.violations().count();
    if violations > 0 {
        bail!(
            "{violations} persona pair(s) exceed similarity threshold {:.2}",
            report.threshold
        );
    }
    println!("personas are distinct (threshold {:.2})", report.threshold);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Audit(args) => audit(args).await,
        Commands::Personas(args) => personas(args),
    }
}
