//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use agentdocs_core::pipeline::{ExportReport, PostBuildHook, ProgressReporter};
use agentdocs_core::{ArtifactMeta, build_model, post_build};
use agentdocs_shared::{DocsConfig, init_config, load_config, load_config_from, normalize_base_url};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// agentdocs: export documentation for AI agents and integrations.
#[derive(Parser)]
#[command(
    name = "agentdocs",
    version,
    about = "Export llms.txt, discovery index, JSON schemas and section bundles from a docs tree.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./agentdocs.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the post-build export into a built site directory.
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Built site directory that receives the artifacts.
        #[arg(long, default_value = "build")]
        out: PathBuf,

        /// Artifact families to emit (comma-separated). Defaults to all.
        #[arg(long)]
        emit: Option<String>,
    },

    /// Print the grouped document model as JSON without writing anything.
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Where documents come from and how they are addressed.
#[derive(Args, Debug, Default)]
pub(crate) struct SourceArgs {
    /// Document root (overrides `site.docs_dir`).
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Base URL of the built site (overrides `site.base_url`).
    #[arg(long, env = "DOCS_BASE_URL")]
    pub base_url: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write agentdocs.toml with defaults into the current directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "agentdocs=info",
        1 => "agentdocs=debug",
        _ => "agentdocs=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
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
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Build { source, out, emit } => {
            let config = resolve_config(config_path, &source, emit.as_deref())?;
            cmd_build(&config, &out)
        }
        Command::Inspect { source } => {
            let config = resolve_config(config_path, &source, None)?;
            cmd_inspect(&config)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => {
                let config = resolve_config(config_path, &SourceArgs::default(), None)?;
                cmd_config_show(&config)
            }
        },
    }
}

/// Config file (explicit path, else `./agentdocs.toml`, else defaults) with
/// CLI overrides applied on top.
fn resolve_config(path: Option<&Path>, source: &SourceArgs, emit: Option<&str>) -> Result<DocsConfig> {
    let mut config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config(&std::env::current_dir()?)?,
    };
    apply_overrides(&mut config, source, emit);
    Ok(config)
}

fn apply_overrides(config: &mut DocsConfig, source: &SourceArgs, emit: Option<&str>) {
    if let Some(docs) = &source.docs {
        config.site.docs_dir = docs.to_string_lossy().into_owned();
    }
    if let Some(base_url) = &source.base_url {
        config.site.base_url = base_url.clone();
    }
    config.site.base_url = normalize_base_url(&config.site.base_url);
    if let Some(emit) = emit {
        config.export.emit = parse_emit(emit);
    }
}

fn parse_emit(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(config: &DocsConfig, out: &Path) -> Result<()> {
    let hook = PostBuildHook {
        docs_dir: PathBuf::from(&config.site.docs_dir),
        out_dir: out.to_path_buf(),
        base_url: config.site.base_url.clone(),
    };

    info!(
        docs = %hook.docs_dir.display(),
        out = %hook.out_dir.display(),
        base_url = %hook.base_url,
        emit = %config.export.emit.join(","),
        "exporting documentation"
    );

    let reporter = CliProgress::new();
    let report = post_build(config, &hook, &reporter).inspect_err(|_| reporter.clear())?;

    println!();
    println!("  Export complete!");
    println!("  Documents: {}", report.documents);
    println!("  Sections:  {}", report.sections);
    println!("  Artifacts: {}", report.artifacts.len());
    println!("  Output:    {}", hook.out_dir.display());
    println!("  Time:      {:.2}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_inspect(config: &DocsConfig) -> Result<()> {
    let model = build_model(Path::new(&config.site.docs_dir), config, &config.site.base_url);
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config(&std::env::current_dir()?)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &DocsConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn artifact_written(&self, meta: &ArtifactMeta) {
        self.spinner.set_message(format!("Wrote {}", meta.path));
    }

    fn done(&self, _report: &ExportReport) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("agentdocs").chain(args.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn build_flags_parse() {
        let cli = parse(&[
            "build",
            "--docs",
            "site/docs",
            "--out",
            "site/build",
            "--base-url",
            "/developer-docs/",
            "--emit",
            "knowledge,bundles",
            "-v",
        ]);
        assert_eq!(cli.verbose, 1);
        let Command::Build { source, out, emit } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(source.docs.as_deref(), Some(Path::new("site/docs")));
        assert_eq!(source.base_url.as_deref(), Some("/developer-docs/"));
        assert_eq!(out, PathBuf::from("site/build"));
        assert_eq!(emit.as_deref(), Some("knowledge,bundles"));
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = parse(&["config", "show", "--config", "custom.toml"]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("custom.toml")));
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agentdocs.toml");
        std::fs::write(
            &path,
            "[site]\nbase_url = \"/from-file/\"\ndocs_dir = \"content\"\n\n[export]\nemit = [\"schemas\"]\n",
        )
        .unwrap();

        let file_only = resolve_config(Some(&path), &SourceArgs::default(), None).unwrap();
        assert_eq!(file_only.site.base_url, "/from-file/");
        assert_eq!(file_only.site.docs_dir, "content");
        assert_eq!(file_only.export.emit, ["schemas"]);

        let source = SourceArgs {
            docs: Some(PathBuf::from("docs")),
            base_url: Some("developer-docs".into()),
        };
        let overridden = resolve_config(Some(&path), &source, Some("knowledge, bundles,")).unwrap();
        assert_eq!(overridden.site.base_url, "/developer-docs/");
        assert_eq!(overridden.site.docs_dir, "docs");
        assert_eq!(overridden.export.emit, ["knowledge", "bundles"]);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(resolve_config(Some(&missing), &SourceArgs::default(), None).is_err());
    }
}
