// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored status lines

use crate::pipeline::{ModuleOutcome, ModuleReport};
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber. `RUST_LOG` wins over the verbosity flag.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose {
        "paper_analyzer=debug,info"
    } else {
        "paper_analyzer=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

/// Heading line printed above a module's answers.
pub fn format_module_header(report: &ModuleReport) -> String {
    let title = format!("Module {} Response", report.module.index);
    let status = match &report.outcome {
        ModuleOutcome::CacheHit(answers) => format!("(cached, {} answers)", answers.len()).cyan(),
        ModuleOutcome::Stored(_) => "(generated)".green(),
        ModuleOutcome::Uncached(_) => "(generated, not cached)".yellow(),
        ModuleOutcome::Failed(_) => "(failed)".red(),
    };
    format!("{} {}", title.bold(), status)
}
