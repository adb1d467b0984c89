use clap::{Parser, Subcommand, ValueEnum};
use kumiki::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Suffix appended to the workflow name of UI-form files when both forms are written.
const UI_SUFFIX: &str = "ui";

/// Build persona workflows and write them as execution or editor JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Persona store file: {"personas": {"<id>": {...}}}
    #[arg(short, long)]
    personas: PathBuf,

    /// Pipeline configuration file; every field is optional
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the workflow files are written to
    #[arg(short, long, default_value = "workflows")]
    out: PathBuf,

    /// Second directory to copy each file into, if it exists
    #[arg(long)]
    mirror: Option<PathBuf>,

    /// Which form to write
    #[arg(short, long, value_enum, default_value_t = FormatCli::Exec)]
    format: FormatCli,

    /// Overrides the sampler seed of every workflow
    #[arg(long)]
    seed: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatCli {
    Exec,
    Ui,
    Both,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Single-persona image workflow
    Image { persona: String },
    /// Single-persona video workflow
    Video { persona: String },
    /// One image workflow applying the adapters of several personas
    Multi {
        #[arg(required = true)]
        personas: Vec<String>,
        /// Base prompt the trigger words are appended to
        #[arg(long)]
        prompt: Option<String>,
    },
    /// One image workflow per adapter strength
    StrengthTest {
        persona: String,
        /// Comma-separated strengths; defaults to the configured list
        #[arg(long, value_delimiter = ',')]
        strengths: Vec<f64>,
        /// Replaces the configured positive prompt
        #[arg(long)]
        prompt: Option<String>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let personas = PersonaDirectory::from_file(&cli.personas)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load personas: {}", e)));
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => PipelineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let catalog = NodeCatalog::builtin();
    let pipeline = Pipeline::builder(&catalog).config(config).build();

    let workflows = build_workflows(&pipeline, &personas, &cli.command)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to build workflow: {}", e)));

    let mut written = 0;
    for workflow in &workflows {
        for (name, format) in outputs(&workflow.name, cli.format) {
            let file = WorkflowFile::render(&name, &workflow.graph, format)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            let paths = file
                .save_with_mirror(&cli.out, cli.mirror.as_deref())
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            for path in &paths {
                println!("{}", path.display());
            }
            written += paths.len();
        }
    }
    tracing::info!(workflows = workflows.len(), files = written, "done");
}

fn build_workflows(
    pipeline: &Pipeline<'_>,
    personas: &PersonaDirectory,
    command: &Command,
) -> std::result::Result<Vec<NamedGraph>, PipelineError> {
    match command {
        Command::Image { persona } => Ok(vec![pipeline.image_workflow(personas, persona)?]),
        Command::Video { persona } => Ok(vec![pipeline.video_workflow(personas, persona)?]),
        Command::Multi { personas: ids, prompt } => Ok(vec![pipeline.multi_persona_workflow(
            personas,
            ids.as_slice(),
            prompt.as_deref(),
        )?]),
        Command::StrengthTest {
            persona,
            strengths,
            prompt,
        } => {
            let strengths = if strengths.is_empty() {
                pipeline.config().strength_test.strengths.clone()
            } else {
                strengths.clone()
            };
            pipeline.strength_test_workflows(personas, persona, &strengths, prompt.as_deref())
        }
    }
}

/// File names and forms to write for one workflow.
fn outputs(name: &str, format: FormatCli) -> Vec<(String, WorkflowFormat)> {
    let ui_name = || format!("{}_{}", name, UI_SUFFIX);
    match format {
        FormatCli::Exec => vec![(name.to_string(), WorkflowFormat::Execution)],
        FormatCli::Ui => vec![(name.to_string(), WorkflowFormat::Ui)],
        FormatCli::Both => vec![
            (name.to_string(), WorkflowFormat::Execution),
            (ui_name(), WorkflowFormat::Ui),
        ],
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
