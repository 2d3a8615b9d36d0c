// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use paper_analyzer::utils::logging::{
    format_error, format_info, format_module_header, format_success, format_warning,
};
use paper_analyzer::{
    AnswerPipeline, Config, GroqAnswerClient, JsonExporter, LanceDbClient, LanceResponseStore,
    MemoryResponseStore, PlainTextExtractor, ProgressTracker, ResponseStore, RetrievalMode,
    SchemaManager, TextNormalizer, Validator, format_matrices,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "paper_analyzer")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Question paper analyzer with cached module answers", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a question paper into modules and answer each one
    Analyze {
        /// PDF file, or a text file with --text
        file: PathBuf,

        /// cached-first, force-refresh or concise
        #[arg(short, long)]
        mode: Option<RetrievalMode>,

        /// Treat the input as already extracted UTF-8 text
        #[arg(long)]
        text: bool,

        /// Directory to write a JSON export of the answers to
        #[arg(short, long, value_name = "DIR")]
        export: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Show cached answers for a subject code and module body
    Lookup {
        subject_code: String,

        module: String,
    },

    Verify {
        #[arg(long)]
        create_schema: bool,
    },

    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    paper_analyzer::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Analyze {
            file,
            mode,
            text,
            export,
            pretty,
        } => {
            let mode = mode.unwrap_or(config.pipeline.default_mode);
            cmd_analyze(&config, &file, mode, text, export, pretty, cli.color).await?;
        }
        Commands::Lookup {
            subject_code,
            module,
        } => {
            cmd_lookup(&config, &subject_code, &module).await?;
        }
        Commands::Verify { create_schema } => {
            cmd_verify(&config, create_schema).await?;
        }
        Commands::Stats => {
            cmd_stats(&config).await?;
        }
    }

    Ok(())
}

async fn open_store(config: &Config) -> Arc<dyn ResponseStore> {
    match LanceResponseStore::open(config.database.clone()).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Response cache unavailable, answers will not persist: {}", e);
            Arc::new(MemoryResponseStore::new())
        }
    }
}

async fn cmd_analyze(
    config: &Config,
    file: &Path,
    mode: RetrievalMode,
    text: bool,
    export: Option<PathBuf>,
    pretty: bool,
    color: bool,
) -> Result<()> {
    info!("Analyzing {} ({})", file.display(), mode);
    let start_time = Instant::now();

    Validator::validate_file_path(file)?;
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Validator::validate_content_not_empty(&bytes)?;

    let store: Arc<dyn ResponseStore> = if mode.reads_cache() || mode.writes_cache() {
        open_store(config).await
    } else {
        Arc::new(MemoryResponseStore::new())
    };
    let generator = Arc::new(
        GroqAnswerClient::from_config(&config.generation)
            .context("Failed to create generation client")?,
    );

    let mut pipeline = AnswerPipeline::new(store, generator);
    if text || !Validator::is_pdf(file) {
        pipeline = pipeline.with_extractor(Arc::new(PlainTextExtractor));
    }

    let mut run = pipeline
        .process(&bytes, mode)
        .context("Failed to extract text from document")?;

    if run.is_empty() {
        println!("{}", format_warning("No modules detected in the document"));
        return Ok(());
    }

    println!(
        "{}",
        format_info(&format!(
            "Subject {} with {} modules",
            run.subject_code(),
            run.module_count()
        ))
    );

    let tracker = ProgressTracker::with_color(run.module_count(), color);
    let mut reports = Vec::with_capacity(run.module_count());

    while let Some(report) = run.next_report().await {
        tracker.record_outcome(&report.outcome);
        tracker.suspend(|| print_report(config, &report));
        reports.push(report);
    }

    tracker.finish();
    let stats = run.stats();

    if let Some(output) = export {
        let exporter =
            JsonExporter::new(output)?.with_matrix_rendering(config.pipeline.render_matrices);
        let manifest = exporter.build_manifest(run.subject_code(), mode, stats.clone(), &reports);
        let path = exporter.export(&manifest, pretty)?;
        println!(
            "{}",
            format_success(&format!("Exported answers to {}", path.display()))
        );
    }

    let summary = format!(
        "{} modules: {} cached ({:.0}% hit rate), {} generator calls, {} failed, {:.0}% answered in {:.2}s",
        stats.modules_processed(),
        stats.cache_hits,
        stats.cache_hit_rate(),
        stats.generator_calls(),
        stats.failed,
        stats.success_rate(),
        start_time.elapsed().as_secs_f64()
    );
    if stats.failed > 0 {
        println!("{}", format_warning(&summary));
    } else {
        println!("{}", format_success(&summary));
    }

    Ok(())
}

fn print_report(config: &Config, report: &paper_analyzer::ModuleReport) {
    println!("\n{}", format_module_header(report));
    println!("{}", "=".repeat(80));

    if let Some(e) = report.outcome.error() {
        println!("{}", format_error(&e.to_string()));
        return;
    }

    for answer in report.outcome.answers() {
        if config.pipeline.render_matrices {
            println!("{}\n", format_matrices(answer));
        } else {
            println!("{}\n", answer);
        }
    }
}

async fn cmd_lookup(config: &Config, subject_code: &str, module: &str) -> Result<()> {
    let store = LanceResponseStore::open(config.database.clone())
        .await
        .context("Failed to open response cache")?;

    let module = TextNormalizer::new().normalize(module);
    let records = store
        .records(subject_code, &module)
        .await
        .context("Lookup failed")?;

    if records.is_empty() {
        println!(
            "\nNo cached answers for subject \"{}\" and module \"{}\"\n",
            subject_code,
            Validator::truncate_text(&module, 60)
        );
        return Ok(());
    }

    println!("\nFound {} cached answer(s)\n", records.len());
    for record in records {
        println!("{}", "=".repeat(80));
        println!("#{}", record.id);
        println!("{}\n", record.response);
    }

    Ok(())
}

async fn cmd_verify(config: &Config, create_schema: bool) -> Result<()> {
    info!("Verifying response cache");

    let client = LanceDbClient::new(config.database.clone())
        .await
        .context("Failed to create LanceDB client")?;

    client.ping().await.inspect_err(|e| error!("Cannot connect to LanceDB: {}", e))?;

    let schema_manager = SchemaManager::new(&client);

    if schema_manager.verify_schema().await? {
        println!("{}", format_success("Responses table exists"));
    } else if create_schema {
        schema_manager
            .initialize()
            .await
            .context("Failed to create schema")?;
        println!("{}", format_success("Responses table created"));
    } else {
        println!(
            "{}",
            format_warning("Responses table missing, use --create-schema to create it")
        );
    }

    Ok(())
}

async fn cmd_stats(config: &Config) -> Result<()> {
    let client = LanceDbClient::new(config.database.clone())
        .await
        .context("Failed to create LanceDB client")?;

    let count = client.get_response_count().await?;
    println!(
        "{}",
        format_info(&format!(
            "{} cached responses in table '{}'",
            count,
            client.table_name()
        ))
    );

    Ok(())
}
