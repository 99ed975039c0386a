// stockrecon CLI - offsets missing stock against surplus stock of the same
// category and price.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use stockrecon_catalog::{dedup_barcodes, CatalogClient, CatalogConfig, CatalogSnapshot, ProductLookup};
use stockrecon_cli::exit_codes::{EXIT_CONFIG_INVALID, EXIT_PARTIAL_COVERAGE, EXIT_SUCCESS};
use stockrecon_cli::request::{self, ReconData, ReconRequest, ReconResponse, RequestError};
use stockrecon_cli::settings::{self, FileConfig};
use stockrecon_cli::{logging, CliError};
use stockrecon_core::{DiscrepancyEntry, ProductMeta};
use stockrecon_recon::load_csv_entries;

#[derive(Parser)]
#[command(name = "stockrecon")]
#[command(about = "Offset missing stock against surplus of the same category and price")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation and print the response payload
    #[command(after_help = "\
Examples:
  stockrecon reconcile --request audit.json
  cat audit.json | stockrecon reconcile --request -
  stockrecon reconcile --missing missing.csv --over over.csv --output result.json
  stockrecon reconcile --request audit.json --snapshot products.json --compact")]
    Reconcile {
        /// Request JSON ({missingItems, overItems}); `-` reads stdin
        #[arg(long, conflicts_with_all = ["missing", "over"], required_unless_present_all = ["missing", "over"])]
        request: Option<PathBuf>,

        /// Missing-items CSV
        #[arg(long, requires = "over")]
        missing: Option<PathBuf>,

        /// Over-items CSV
        #[arg(long, requires = "missing")]
        over: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// Write the payload to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Resolve barcodes and print their category and price
    #[command(after_help = "\
Examples:
  stockrecon lookup 4600000000017 4600000000024
  stockrecon lookup 4600000000017 --snapshot products.json")]
    Lookup {
        #[arg(required = true)]
        barcodes: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Config file operations
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Validate settings without contacting the catalog
    Check {
        /// Config file (default: $STOCKRECON_CONFIG, then the user config dir)
        #[arg(long, env = "STOCKRECON_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// Where catalog settings and product metadata come from.
#[derive(clap::Args)]
struct SourceArgs {
    /// Config file (default: $STOCKRECON_CONFIG, then the user config dir)
    #[arg(long, env = "STOCKRECON_CONFIG")]
    config: Option<PathBuf>,

    /// Answer lookups from a catalog export instead of the live catalog
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  stockrecon-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Reconcile { request, missing, over, source, output, compact } => {
            cmd_reconcile(request, missing, over, source, output, compact)
        }
        Commands::Lookup { barcodes, source, compact } => cmd_lookup(barcodes, source, compact),
        Commands::Config(ConfigCommands::Check { config }) => cmd_config_check(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// shared
// ============================================================================

fn read_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::usage(format!("cannot read stdin: {e}")))?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| CliError::usage(format!("cannot read {}: {e}", path.display())))
}

fn load_snapshot(path: &Path) -> Result<CatalogSnapshot, CliError> {
    CatalogSnapshot::from_path(path).map_err(|e| CliError::input(format!("snapshot: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, CliError> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    text.map_err(|e| CliError::general(format!("JSON serialization error: {e}")))
}

// ============================================================================
// reconcile
// ============================================================================

fn load_csv(path: &Path, list: &str, config: &FileConfig) -> Result<Vec<DiscrepancyEntry>, CliError> {
    let text = read_input(path)?;
    load_csv_entries(list, &text, &config.csv).map_err(|e| CliError::input(e.to_string()))
}

fn build_request(
    request: Option<PathBuf>,
    missing: Option<PathBuf>,
    over: Option<PathBuf>,
    config: &FileConfig,
) -> Result<ReconRequest, CliError> {
    match (request, missing, over) {
        (Some(path), _, _) => {
            let text = read_input(&path)?;
            serde_json::from_str(&text)
                .map_err(|e| CliError::input(format!("invalid request {}: {e}", path.display())))
        }
        (None, Some(missing), Some(over)) => {
            Ok(ReconRequest {
                missing_items: load_csv(&missing, "missing", config)?,
                over_items: load_csv(&over, "over", config)?,
            })
        }
        _ => Err(CliError::usage("pass --request, or both --missing and --over")),
    }
}

fn print_summary(data: &ReconData) {
    let s = &data.summary;
    eprintln!(
        "reconcile: {} missing, {} over; {} matched, {} missing unmatched, {} unresolved",
        s.missing_total,
        s.over_total,
        data.matched_count,
        s.missing_unmatched,
        s.missing_unresolved + s.over_unresolved,
    );
    if !data.failed_batches.is_empty() {
        let unanswered: usize = data.failed_batches.iter().map(|f| f.barcodes.len()).sum();
        eprintln!(
            "warning: {} catalog batch(es) failed; {} barcode(s) left unmatched",
            data.failed_batches.len(),
            unanswered
        );
    }
}

fn cmd_reconcile(
    request: Option<PathBuf>,
    missing: Option<PathBuf>,
    over: Option<PathBuf>,
    source: SourceArgs,
    output: Option<PathBuf>,
    compact: bool,
) -> Result<(), CliError> {
    let config = settings::load(source.config.as_deref())?;
    let req = build_request(request, missing, over, &config)?;

    let result = match &source.snapshot {
        Some(path) => {
            let snapshot = load_snapshot(path)?;
            request::reconcile_with(&snapshot, &req, &config.request)
        }
        None => request::try_handle(&config.catalog, &req, &config.request),
    };

    let (response, failure) = match result {
        Ok(data) => {
            print_summary(&data);
            (ReconResponse::ok(data), None)
        }
        Err(e) => (ReconResponse::failure(e.to_string()), Some(CliError::from(e))),
    };

    let json = to_json(&response, compact)?;
    match &output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .map_err(|e| CliError::output(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ============================================================================
// lookup
// ============================================================================

fn cmd_lookup(barcodes: Vec<String>, source: SourceArgs, compact: bool) -> Result<(), CliError> {
    let config = settings::load(source.config.as_deref())?;

    let report = match &source.snapshot {
        Some(path) => load_snapshot(path)?.lookup(&barcodes),
        None => {
            let catalog = CatalogConfig::from_settings(&config.catalog).map_err(RequestError::Config)?;
            let client = CatalogClient::connect(catalog).map_err(RequestError::Credential)?;
            client.lookup(&barcodes)
        }
    };

    let sorted: BTreeMap<&str, &ProductMeta> = dedup_barcodes(&barcodes)
        .iter()
        .filter_map(|code| report.metadata.get_key_value(code.as_str()))
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    println!("{}", to_json(&sorted, compact)?);

    for failure in &report.failed_batches {
        eprintln!("warning: batch {} failed: {}", failure.index, failure.reason);
    }

    if !report.is_complete() {
        return Err(CliError::new(
            EXIT_PARTIAL_COVERAGE,
            format!(
                "{} catalog batch(es) failed; {} barcode(s) unanswered",
                report.failed_batches.len(),
                report.unanswered()
            ),
        ));
    }

    let not_found = report.not_found(&barcodes);
    if !not_found.is_empty() {
        eprintln!("note: {} barcode(s) not in catalog: {}", not_found.len(), not_found.join(", "));
    }
    Ok(())
}

// ============================================================================
// config check
// ============================================================================

fn cmd_config_check(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = settings::load(config_path.as_deref())?;
    let catalog = CatalogConfig::from_settings(&config.catalog)
        .map_err(|e| CliError::new(EXIT_CONFIG_INVALID, e.to_string()))?;

    let source = config
        .source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(environment only)".to_string());

    println!("config:       {source}");
    println!("retailer_id:  {}", catalog.retailer_id);
    println!("client_id:    {}", catalog.client_id);
    println!("api_base:     {}", catalog.api_base);
    println!("token_url:    {}", catalog.token_url);
    println!("batch_size:   {}", catalog.batch_size);
    println!("page_size:    {}", catalog.page_size);
    println!("timeout:      {}s", catalog.timeout.as_secs());
    println!("max_entries:  {}", config.request.max_entries);
    println!(
        "csv columns:  barcode={} quantity={} is_offset={} offset_partner={}",
        config.csv.barcode, config.csv.quantity, config.csv.is_offset, config.csv.offset_partner
    );
    eprintln!("config ok");
    Ok(())
}
