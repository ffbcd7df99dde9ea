//! CLI entrypoint for mock-trial
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use trial_application::{
    Bench, CaseRetriever, ConversationLogger, HearingProgress, MemoryAttachment,
    NoConversationLogger, NoProgress, NoRetriever, RunBatchInput, RunBatchUseCase,
    RunHearingUseCase,
};
use trial_domain::config::validation::has_errors;
use trial_domain::{ReportFormat, Severity};
use trial_infrastructure::config::FileConfig;
use trial_infrastructure::{
    ConfigLoader, DatasetLoader, EmbeddingClient, EmbeddingIndexRetriever, JsonCheckpointStore,
    JsonReportWriter, JsonTranscriptStore, JsonlConversationLogger, OpenAiGateway, VectorIndex,
};
use trial_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_cli_overrides(&cli, &mut config);

    let out_dir = config.output.dir.clone();
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Cannot create output directory {}", out_dir.display()))?;
    let _log_guard = init_logging(cli.verbose, &out_dir);
    ConsoleFormatter::set_color(config.output.color);

    info!("Starting mock-trial");

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => error!(code = ?issue.code, "{}", issue.message),
            Severity::Warning => warn!(code = ?issue.code, "{}", issue.message),
        }
    }
    if has_errors(&issues) {
        let messages: Vec<&str> = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.message.as_str())
            .collect();
        bail!("Invalid configuration:\n  {}", messages.join("\n  "));
    }

    let Some(cases_path) = config.batch.cases.clone() else {
        bail!("No case file given. Pass --cases <PATH> or set [batch].cases.");
    };
    let records = DatasetLoader::load_records(&cases_path)?;
    let mut input = RunBatchInput::new(records);
    if let Some(truth_path) = &config.batch.truth {
        input = input.with_truth(DatasetLoader::load_truth(truth_path)?);
    }

    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiGateway::new(&config.provider)?);
    let embedder = EmbeddingClient::new(
        gateway.client().clone(),
        config
            .retrieval
            .embedding_base_url
            .clone()
            .unwrap_or_else(|| config.provider.base_url.clone()),
        gateway.api_key().map(str::to_string),
        config.retrieval.embedding_model.clone(),
    );

    let memory = match (&config.memory.index_path, config.memory.enabled) {
        (Some(path), true) => {
            let index = VectorIndex::load(path).context("Failed to load memory index")?;
            let memory = EmbeddingIndexRetriever::new(index, embedder.clone(), config.memory.top_k)
                .with_score_threshold(Some(config.memory.score_threshold));
            Some(MemoryAttachment {
                memory: Arc::new(memory),
                roles: config.memory_roles(),
            })
        }
        _ => None,
    };

    let retriever: Arc<dyn CaseRetriever> =
        match (&config.retrieval.index_path, config.retrieval.enabled) {
            (Some(path), true) => {
                let index = VectorIndex::load(path).context("Failed to load retrieval index")?;
                Arc::new(
                    EmbeddingIndexRetriever::new(index, embedder, config.retrieval.top_k)
                        .with_score_threshold(config.retrieval.score_threshold),
                )
            }
            _ => Arc::new(NoRetriever),
        };

    let (models, _) = config.models.to_role_models();
    let prompts = config.prompt_catalog()?;
    let bench = Bench::from_gateway(gateway, &models, &prompts, memory.as_ref());
    let hearing = RunHearingUseCase::new(bench, retriever, config.hearing.to_params());

    let use_case = RunBatchUseCase::new(
        hearing,
        Arc::new(JsonCheckpointStore::in_dir(&out_dir)),
        Arc::new(JsonTranscriptStore::new(&out_dir)),
        Arc::new(JsonReportWriter::in_dir(&out_dir)),
    );

    let conversation_log = JsonlConversationLogger::in_dir(&out_dir);
    let logger: &dyn ConversationLogger = match &conversation_log {
        Some(log) => log,
        None => &NoConversationLogger,
    };

    let progress: Box<dyn HearingProgress> = if cli.quiet {
        Box::new(NoProgress)
    } else if cli.verbose >= 2 {
        // Debug logs interleave badly with a live bar
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let cancellation = CancellationToken::new();
    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current turn");
            ctrl_c.cancel();
        }
    });

    info!(
        cases = %cases_path.display(),
        out = %out_dir.display(),
        selection = %config.hearing.selection,
        "running batch"
    );

    let outcome = use_case
        .execute(input, progress.as_ref(), logger, &cancellation)
        .await?;

    let format: ReportFormat = config.output.format;
    println!("{}", ConsoleFormatter::format(&outcome, format));

    Ok(())
}

/// Command-line flags take precedence over every configuration layer.
fn apply_cli_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(cases) = &cli.cases {
        config.batch.cases = Some(cases.clone());
    }
    if let Some(truth) = &cli.truth {
        config.batch.truth = Some(truth.clone());
    }
    if let Some(out) = &cli.out {
        config.output.dir = out.clone();
    }
    if let Some(rounds) = cli.outer_rounds {
        config.hearing.outer_rounds = rounds;
    }
    if let Some(rounds) = cli.inner_rounds {
        config.hearing.inner_rounds = rounds;
    }
    if let Some(selection) = cli.selection {
        config.hearing.selection = selection.into();
    }
    if let Some(model) = &cli.model {
        config.models.default = model.clone();
        config.models.judge = None;
        config.models.plaintiff_team = None;
        config.models.defendant_team = None;
    }
    if cli.no_retrieval {
        config.retrieval.enabled = false;
    }
    if let Some(output) = cli.output {
        config.output.format = output.into();
    }
}

/// Console layer filtered by `-v` (or `RUST_LOG`), plus a daily log file
/// under `<out>/logs/`.
fn init_logging(verbose: u8, out_dir: &Path) -> WorkerGuard {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::daily(out_dir.join("logs"), "mock-trial.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    guard
}
