// SPDX-License-Identifier: PMPL-1.0-or-later

//! locale-patch: patch and verify JSON locale catalogs
//!
//! Every subcommand operates on a directory of `<locale>.json` documents and
//! the registry of locales the application ships.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use locale_patch::batch::{self, BatchConfig, BatchReport};
use locale_patch::catalog::{LocaleStore, DEFAULT_INDENT};
use locale_patch::commands::{self, SyncOptions};
use locale_patch::config::{
    Settings, DEFAULT_DIR, DEFAULT_REFERENCE, DIR_ENV, EMAIL_ENV, ENDPOINT_ENV, INDENT_ENV,
    REFERENCE_ENV,
};
use locale_patch::diagnostics;
use locale_patch::patch;
use locale_patch::registry::LocaleRegistry;
use locale_patch::report::{self, ReportOutputFormat};
use locale_patch::translate::{
    self, MyMemoryConfig, MyMemoryTranslator, TranslateRequest, DEFAULT_ENDPOINT,
    DEFAULT_TIMEOUT_SECS,
};
use locale_patch::verify;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "locale-patch")]
#[command(version)]
#[command(about = "Patch and verify JSON locale catalogs")]
#[command(long_about = None)]
struct Cli {
    /// Directory holding one <locale>.json document per locale
    #[arg(long, global = true, env = DIR_ENV, default_value = DEFAULT_DIR)]
    dir: PathBuf,

    /// Reference locale every other catalog is checked against
    #[arg(long, global = true, env = REFERENCE_ENV, default_value = DEFAULT_REFERENCE)]
    reference: String,

    /// Indentation width for rewritten documents
    #[arg(
        long,
        global = true,
        env = INDENT_ENV,
        default_value_t = DEFAULT_INDENT as u8,
        value_parser = clap::value_parser!(u8).range(0..=8)
    )]
    indent: u8,

    /// Only touch these locales (repeatable; default: every registered locale)
    #[arg(short = 'l', long = "locale", global = true, value_name = "CODE")]
    locales: Vec<String>,

    /// Suppress per-locale progress and summaries
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every catalog against the reference
    Verify {
        /// Output format (default: from the --output extension, else text)
        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exit non-zero when any issue is found
        #[arg(long)]
        strict: bool,
    },

    /// Apply a YAML or JSON patch plan to every locale
    Apply {
        /// Plan file (.yaml/.yml or .json)
        #[arg(value_name = "PLAN")]
        plan: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Delete keys from every locale
    Delete {
        /// Keys to remove
        #[arg(value_name = "KEY", required = true)]
        keys: Vec<String>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Rename a key in every locale, keeping its position
    Rename {
        #[arg(value_name = "OLD")]
        from: String,

        #[arg(value_name = "NEW")]
        to: String,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Add reference keys missing from other locales
    Sync {
        /// Also delete keys the reference does not have
        #[arg(long)]
        prune: bool,

        /// Overwrite blank values with the reference text
        #[arg(long)]
        fill_empty: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Machine-translate missing or untranslated values
    Translate {
        /// Only these keys (repeatable); forces retranslation
        #[arg(short, long = "key", value_name = "KEY")]
        keys: Vec<String>,

        /// Source text for a single --key, written verbatim to the reference
        #[arg(long)]
        text: Option<String>,

        /// Translation endpoint
        #[arg(long, env = ENDPOINT_ENV, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Contact address sent to the provider
        #[arg(long, env = EMAIL_ENV)]
        email: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Check the locale directory and provider configuration
    Doctor,
}

#[derive(Args)]
struct RunArgs {
    /// Show what would change without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Write the run report (JSON) to a file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl RunArgs {
    fn config(&self, operation: &str, quiet: bool) -> BatchConfig {
        let mut config = BatchConfig::new(operation);
        config.dry_run = self.dry_run;
        config.quiet = quiet;
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings {
        dir: cli.dir,
        reference: cli.reference,
        indent: usize::from(cli.indent),
        locales: cli.locales,
    };
    let quiet = cli.quiet;

    match cli.command {
        Commands::Verify {
            format,
            output,
            strict,
        } => {
            let (store, registry) = open(&settings)?;
            let report = verify::verify_store(&store, &registry)?;
            let format = format
                .or_else(|| output.as_deref().and_then(ReportOutputFormat::from_path))
                .unwrap_or(ReportOutputFormat::Text);

            match (&output, format) {
                (Some(path), format) => {
                    report::save_report(&report, format, path)?;
                    if !quiet {
                        println!("Report saved to: {}", path.display());
                    }
                }
                (None, ReportOutputFormat::Text) => report::print_report(&report),
                (None, format) => println!("{}", format.serialize(&report)?),
            }

            if strict && !report.is_clean() {
                bail!(
                    "verification found {} issue(s) across {} locale(s), {} structural",
                    report.total_issues(),
                    report.locales.iter().filter(|l| !l.issues.is_empty()).count(),
                    report.structural_issues()
                );
            }
        }

        Commands::Apply { plan, run } => {
            let (store, registry) = open(&settings)?;
            let patch = patch::load_plan(&plan, &registry)?;
            if !quiet {
                println!(
                    "Applying {} entr{} from {}",
                    patch.len(),
                    if patch.len() == 1 { "y" } else { "ies" },
                    plan.display()
                );
            }
            let report =
                commands::apply_patch(&store, &registry, &patch, &run.config("apply", quiet))?;
            finish(&report, &run, quiet)?;
        }

        Commands::Delete { keys, run } => {
            let (store, registry) = open(&settings)?;
            let report =
                commands::delete_keys(&store, &registry, &keys, &run.config("delete", quiet))?;
            finish(&report, &run, quiet)?;
        }

        Commands::Rename { from, to, run } => {
            if from == to {
                bail!("cannot rename '{}' to itself", from);
            }
            let (store, registry) = open(&settings)?;
            let report =
                commands::rename_key(&store, &registry, &from, &to, &run.config("rename", quiet))?;
            finish(&report, &run, quiet)?;
        }

        Commands::Sync {
            prune,
            fill_empty,
            run,
        } => {
            let (store, registry) = open(&settings)?;
            let options = SyncOptions { prune, fill_empty };
            let report =
                commands::sync_reference(&store, &registry, options, &run.config("sync", quiet))?;
            finish(&report, &run, quiet)?;
        }

        Commands::Translate {
            keys,
            text,
            endpoint,
            email,
            timeout,
            run,
        } => {
            let (store, registry) = open(&settings)?;
            let report = run_translate(
                &store,
                &registry,
                TranslateRequest { keys, text },
                MyMemoryConfig {
                    endpoint,
                    email: email.filter(|value| !value.trim().is_empty()),
                    timeout: Duration::from_secs(timeout),
                },
                &run.config("translate", quiet),
            )?;
            finish(&report, &run, quiet)?;
        }

        Commands::Doctor => diagnostics::run_doctor(&settings)?,
    }

    Ok(())
}

fn open(settings: &Settings) -> Result<(LocaleStore, LocaleRegistry)> {
    let registry = settings.registry().context("invalid locale selection")?;
    let store = settings.store()?;
    Ok((store, registry))
}

fn run_translate(
    store: &LocaleStore,
    registry: &LocaleRegistry,
    request: TranslateRequest,
    provider: MyMemoryConfig,
    config: &BatchConfig,
) -> Result<BatchReport> {
    let translator =
        MyMemoryTranslator::new(provider).context("failed to build translation client")?;
    let report = translate::translate_locales(store, registry, &translator, &request, config)?;
    Ok(report)
}

fn finish(report: &BatchReport, run: &RunArgs, quiet: bool) -> Result<()> {
    batch::print_summary(report, quiet);
    if let Some(path) = &run.report {
        batch::write_report(report, path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        if !quiet {
            println!("Report saved to: {}", path.display());
        }
    }
    Ok(())
}
