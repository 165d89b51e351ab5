//! intl-catalog - compiles ICU message catalogs and loads them per locale
//!
//! Entry point for the application. Handles CLI argument parsing,
//! logging initialization and command dispatch.

mod catalog;
mod compiler;
mod config;
mod error;
mod icu;
mod locale;
mod state;
mod ui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use compiler::{error_chain, BatchCompiler};
use config::Config;
use locale::{normalize, LocaleData, LocaleTable};
use state::IntlContext;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use ui::{render_page, Intl};

#[derive(Debug, Parser)]
#[command(name = "intl-catalog", version, about = "Compile message catalogs and render them per locale")]
struct Cli {
    /// Configuration file (default: ./intl-catalog.json, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile every source catalog into the compiled catalog directory
    CompileMessages,

    /// Render the demo page in the ambient locale
    Show {
        /// Switch to this locale after bootstrapping, as a user selection would
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// List the supported locales and the catalog each one loads
    Locales,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the logging system
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info,intl_catalog=debug");
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::CompileMessages => compile_messages(&config).await,
        Command::Show { locale } => show(&config, locale.as_deref()).await,
        Command::Locales => list_locales(&config),
    }
}

async fn compile_messages(config: &Config) -> anyhow::Result<ExitCode> {
    let compiler = BatchCompiler::from_config(&config.catalogs);

    let report = match compiler.run().await {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", error_chain(&e));
            return Ok(ExitCode::FAILURE);
        }
    };

    report.log();
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn show(config: &Config, selection: Option<&str>) -> anyhow::Result<ExitCode> {
    let table = locale_table(config)?;
    let context = IntlContext::new(table);
    let mut applied = context.subscribe();

    context.bootstrap().await.context("loading the ambient locale")?;
    render_applied(&context, &mut applied);

    if let Some(tag) = selection {
        context
            .set_locale(normalize(tag))
            .await
            .with_context(|| format!("loading locale '{}'", tag))?;
        println!();
        render_applied(&context, &mut applied);
    }

    log::debug!("Final state: {:?}", context.state());
    Ok(ExitCode::SUCCESS)
}

/// Re-render the page from the most recently applied mapping
fn render_applied(context: &IntlContext, applied: &mut watch::Receiver<Option<Arc<LocaleData>>>) {
    if let Some(data) = applied.borrow_and_update().clone() {
        let intl = Intl::new(data, context.table().default_locale());
        print!("{}", render_page(&intl, context.table().supported()));
    }
}

fn list_locales(config: &Config) -> anyhow::Result<ExitCode> {
    let table = locale_table(config)?;

    for supported in table.supported() {
        let resolved = table.resolve(&supported.code);
        let note = if resolved.is_fallback {
            format!(" (falls back to {})", resolved.locale)
        } else {
            String::new()
        };
        println!(
            "{}\t{}\t{}{}",
            supported.code,
            supported.name,
            resolved.path.display(),
            note
        );
    }
    println!("default: {}", table.default_locale());
    println!(
        "catalogs: {}",
        table.codes().collect::<Vec<_>>().join(", ")
    );

    Ok(ExitCode::SUCCESS)
}

fn locale_table(config: &Config) -> anyhow::Result<LocaleTable> {
    LocaleTable::from_config(config).with_context(|| {
        format!(
            "no catalog configured for the default locale '{}'",
            config.locales.default_locale
        )
    })
}
