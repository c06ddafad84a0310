use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use curricuforge_core::{
    bootstrap,
    settings::{Loader, Settings},
    CoreConfig, CurriculumForm, GenerationMode, RenderedCurriculum, ViewState,
};
use directories::ProjectDirs;
use indicatif::ProgressBar;
use output::{OutputFormat, Renderer};
use progress::spinner;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "curricuforge",
    version,
    about = "Generate personalized curricula and render them as HTML from the shell."
)]
struct Cli {
    /// Output style for command results.
    #[arg(long, global = true, value_enum, default_value = "html")]
    format: OutputFormat,
    /// Configuration file layered over the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the curriculum service base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Disable ANSI colors in CLI output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Suppress non-critical CLI output.
    #[arg(long, global = true)]
    quiet: bool,
    /// Disable the spinner shown while a curriculum is generated.
    #[arg(long, global = true)]
    no_progress: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Submit the curriculum form and print the rendered result.
    Generate {
        /// Subject or topic to learn.
        #[arg(long)]
        topic: String,
        /// beginner, intermediate or advanced.
        #[arg(long)]
        level: String,
        /// Total duration in weeks.
        #[arg(long, alias = "duration-weeks")]
        weeks: String,
        /// visual, auditory, kinesthetic or reading.
        #[arg(long, alias = "learning-style")]
        style: String,
        /// Render the built-in template instead of calling the service.
        #[arg(long)]
        offline: bool,
    },
    /// Render curriculum text from a file (or stdin) as HTML.
    Format {
        /// Input file; reads stdin when omitted.
        path: Option<PathBuf>,
    },
    /// Check whether the curriculum service is up.
    Health,
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Debug, Serialize)]
struct HealthReport {
    base_url: String,
    healthy: bool,
}

impl Cli {
    fn progress_enabled(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let renderer = Renderer::new(cli.format);
    match &cli.command {
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "curricuforge", &mut std::io::stdout());
            Ok(())
        }
        Command::Format { path } => handle_format(path.clone(), &renderer).await,
        Command::Generate {
            topic,
            level,
            weeks,
            style,
            offline,
        } => {
            let form = CurriculumForm::new(topic, level, weeks, style);
            let mode = if *offline {
                GenerationMode::Offline
            } else {
                GenerationMode::Remote
            };
            handle_generate(form, mode, &cli, &renderer).await
        }
        Command::Health => handle_health(&cli, &renderer).await,
    }
}

async fn handle_generate(
    form: CurriculumForm,
    mode: GenerationMode,
    cli: &Cli,
    renderer: &Renderer,
) -> Result<()> {
    let mut config = CoreConfig::new(load_settings(cli)?);
    config.mode = mode;
    let runtime = bootstrap(config)?;
    let service = runtime.service();

    let label = format!("Generating curriculum for `{}`...", form.topic.trim());
    let progress = spinner(cli.progress_enabled(), label);
    let view = service.submit(&form).await;

    match view {
        ViewState::Results { text, html } => {
            finish_spinner(progress, Some("Curriculum ready".to_string()));
            if cli.quiet {
                return Ok(());
            }
            let topic = Some(form.topic.trim().to_string());
            renderer.curriculum(&RenderedCurriculum::new(topic, text, html))
        }
        ViewState::Error { message, .. } => {
            finish_spinner(progress, None);
            Err(anyhow!(message))
        }
        other => {
            finish_spinner(progress, None);
            Err(anyhow!("submit ended in unexpected state: {other:?}"))
        }
    }
}

async fn handle_format(path: Option<PathBuf>, renderer: &Renderer) -> Result<()> {
    let text = match &path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("failed to read stdin")?;
            buffer
        }
    };

    let topic = path
        .as_ref()
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned());
    renderer.curriculum(&RenderedCurriculum::from_text(topic, &text))
}

async fn handle_health(cli: &Cli, renderer: &Renderer) -> Result<()> {
    let runtime = bootstrap(CoreConfig::new(load_settings(cli)?))?;
    let service = runtime.service();
    let report = HealthReport {
        base_url: service.client().base_url().to_string(),
        healthy: service.check_connection().await,
    };

    if !cli.quiet {
        renderer.health(&report)?;
    }
    if report.healthy {
        Ok(())
    } else {
        anyhow::bail!("curriculum service at {} is not healthy", report.base_url)
    }
}

/// Defaults, then the user config file, then `CURRICUFORGE__*` variables, then flags.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut loader = Loader::new();
    if let Some(path) = user_config_path() {
        debug!(target: "curricuforge_cli", path = %path.display(), "checking user config");
        loader = loader.with_optional_file(path);
    }
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    loader = loader.with_env();
    if let Some(base_url) = &cli.base_url {
        loader = loader
            .set_override("api.base_url", base_url.as_str())
            .context("invalid --base-url override")?;
    }
    loader.build().context("failed to load configuration")
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "CurricuForge", "curricuforge")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,curricuforge_cli=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_ansi(!cli.no_color)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}

fn finish_spinner(spinner: Option<ProgressBar>, message: Option<String>) {
    if let Some(progress) = spinner {
        if let Some(msg) = message {
            progress.finish_with_message(msg);
        } else {
            progress.finish_and_clear();
        }
    }
}

mod output {
    use anyhow::Result;
    use clap::ValueEnum;
    use curricuforge_core::RenderedCurriculum;

    use crate::HealthReport;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
    pub enum OutputFormat {
        /// Rendered HTML fragment.
        Html,
        Json,
        /// Curriculum text as written, without HTML.
        Text,
    }

    #[derive(Copy, Clone, Debug)]
    pub struct Renderer {
        format: OutputFormat,
    }

    impl Renderer {
        pub fn new(format: OutputFormat) -> Self {
            Self { format }
        }

        pub fn curriculum(&self, rendered: &RenderedCurriculum) -> Result<()> {
            println!("{}", self.curriculum_output(rendered)?);
            Ok(())
        }

        pub fn health(&self, report: &HealthReport) -> Result<()> {
            println!("{}", self.health_output(report)?);
            Ok(())
        }

        pub fn curriculum_output(&self, rendered: &RenderedCurriculum) -> Result<String> {
            Ok(match self.format {
                OutputFormat::Json => serde_json::to_string_pretty(rendered)?,
                OutputFormat::Html => rendered.html.clone(),
                OutputFormat::Text => rendered.text.clone(),
            })
        }

        pub fn health_output(&self, report: &HealthReport) -> Result<String> {
            Ok(match self.format {
                OutputFormat::Json => serde_json::to_string_pretty(report)?,
                OutputFormat::Html | OutputFormat::Text => {
                    let status = if report.healthy { "healthy" } else { "unreachable" };
                    format!("{}: {status}", report.base_url)
                }
            })
        }
    }
}

mod progress {
    use std::time::Duration;

    use indicatif::{ProgressBar, ProgressStyle};

    pub fn spinner(message_enabled: bool, message: impl Into<String>) -> Option<ProgressBar> {
        if !message_enabled {
            return None;
        }
        let progress = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress.set_style(style);
        progress.set_message(message.into());
        progress.enable_steady_tick(Duration::from_millis(80));
        Some(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_flag_defaults_to_html() {
        let cli = Cli::try_parse_from(["curricuforge", "health"]).expect("parses");
        assert_eq!(cli.format, OutputFormat::Html);
    }

    #[test]
    fn format_flag_accepts_html_json_and_text() {
        for (value, expected) in [
            ("html", OutputFormat::Html),
            ("json", OutputFormat::Json),
            ("text", OutputFormat::Text),
        ] {
            let args = ["curricuforge", "--format", value, "format", "/dev/null"];
            let cli = Cli::try_parse_from(args).expect("parses");
            assert_eq!(cli.format, expected);
        }
    }

    #[test]
    fn format_flag_rejects_plain() {
        let result = Cli::try_parse_from(["curricuforge", "--format", "plain", "health"]);
        assert!(result.is_err());
    }

    #[test]
    fn text_output_prints_source_instead_of_html() {
        let rendered = RenderedCurriculum::from_text(None, "# Rust\n\n**Ownership**");
        let text = Renderer::new(OutputFormat::Text)
            .curriculum_output(&rendered)
            .expect("renders");
        assert_eq!(text, "# Rust\n\n**Ownership**");

        let html = Renderer::new(OutputFormat::Html)
            .curriculum_output(&rendered)
            .expect("renders");
        assert_eq!(html, "<h3>Rust</h3><p><strong>Ownership</strong></p>");
    }

    #[test]
    fn json_output_carries_text_and_html() {
        let rendered = RenderedCurriculum::from_text(Some("rust".to_string()), "*own*");
        let json = Renderer::new(OutputFormat::Json)
            .curriculum_output(&rendered)
            .expect("renders");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["topic"], "rust");
        assert_eq!(value["text"], "*own*");
        assert_eq!(value["html"], "<p><em>own</em></p>");
    }

    #[test]
    fn health_output_is_a_status_line_outside_json() {
        let report = HealthReport {
            base_url: "http://localhost:8000".to_string(),
            healthy: false,
        };
        let line = Renderer::new(OutputFormat::Text)
            .health_output(&report)
            .expect("renders");
        assert_eq!(line, "http://localhost:8000: unreachable");
    }
}
