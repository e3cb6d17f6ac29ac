//! Vigil CLI
//!
//! Hidden-service reconnaissance: multi-engine dark web search and
//! surface vulnerability scoring.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod export;

use export::FileExporter;
use vigil_core::{validate_engines, ExportFormat, DEFAULT_SEARCH_ENGINES};
use vigil_scanner::Scanner;
use vigil_tor::{check_tor_connection, CrawlConfig, Crawler, TorClient, TorConfig};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(author, version, about = "Vigil: hidden-service search and vulnerability scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,

    /// SOCKS5 proxy address for Tor routing
    #[arg(long, env = "VIGIL_SOCKS", default_value = "socks5h://127.0.0.1:9050")]
    socks: String,

    /// Connect directly instead of through the Tor proxy
    #[arg(long)]
    no_proxy: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search hidden-service engines for a term
    Crawl {
        /// The search term
        #[arg(short, long)]
        term: String,

        /// Probe each result URL for liveness
        #[arg(long)]
        check_alive: bool,

        /// Export results in this format
        #[arg(long, value_enum)]
        export: Option<ExportArg>,

        /// Directory exported files are written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Score a target's surface security posture
    Scan {
        /// Target URL or bare host
        #[arg(short, long)]
        url: String,

        /// Run the deep probes as well
        #[arg(long)]
        detail: bool,
    },

    /// Check Tor connection status
    Status,
}

/// CLI mirror of the core export formats
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportArg {
    Json,
    Csv,
    Markdown,
    Txt,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Json => Self::Json,
            ExportArg::Csv => Self::Csv,
            ExportArg::Markdown => Self::Markdown,
            ExportArg::Txt => Self::Txt,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let tor_config = if cli.no_proxy {
        TorConfig::direct()
    } else {
        TorConfig {
            socks_addr: Some(cli.socks.clone()),
            ..TorConfig::default()
        }
    };

    match cli.command {
        Commands::Crawl {
            term,
            check_alive,
            export,
            output,
        } => {
            run_crawl(&tor_config, &term, check_alive, export.map(Into::into), output).await?;
        }
        Commands::Scan { url, detail } => {
            run_scan(&tor_config, &url, detail).await?;
        }
        Commands::Status => {
            check_status(&tor_config).await?;
        }
    }

    Ok(())
}

async fn run_crawl(
    tor_config: &TorConfig,
    term: &str,
    check_alive: bool,
    export: Option<ExportFormat>,
    output: PathBuf,
) -> Result<()> {
    // Registry misconfiguration is fatal before any request goes out
    validate_engines(DEFAULT_SEARCH_ENGINES)?;

    let client = Arc::new(TorClient::new(tor_config)?);
    let config = CrawlConfig {
        export_format: export,
        export_path: output,
        ..CrawlConfig::default()
    };
    let crawler = Crawler::new(client, config).with_exporter(Arc::new(FileExporter));

    println!("🔍 Searching hidden-service engines for: {term}\n");
    let results = crawler.crawl(term, check_alive).await;

    for (engine, records) in &results.results {
        println!("[{engine}] {} result(s)", records.len());
        for record in records {
            let liveness = match record.alive {
                Some(true) => " [LIVE]",
                Some(false) => " [DEAD]",
                None => "",
            };
            println!("  {} - {}{}", record.title, record.url, liveness);
        }
        println!();
    }
    println!("Total: {} result(s)", results.total());

    Ok(())
}

async fn run_scan(tor_config: &TorConfig, url: &str, detail: bool) -> Result<()> {
    let client = Arc::new(TorClient::new(tor_config)?);
    let scanner = Scanner::new(url, detail, client);

    println!("🛡️  Scanning: {}\n", scanner.target());
    let report = scanner.analyze().await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(level) = report.threat_level {
        println!(
            "\nRisk score: {} | Threat level: {}",
            report.risk_score, level
        );
    } else if let Some(error) = &report.error {
        println!("\nScan failed: {error}");
    }

    Ok(())
}

async fn check_status(config: &TorConfig) -> Result<()> {
    println!("🔌 Checking Tor connection...\n");

    match check_tor_connection(config).await {
        Ok(true) => {
            println!("✅ Tor is running and accessible");
            if let Some(addr) = &config.socks_addr {
                println!("   Proxy: {addr}");
            }
        }
        Ok(false) => {
            println!("❌ Tor is not accessible");
            if let Some(addr) = &config.socks_addr {
                println!("   Expected proxy at: {addr}");
            }
            println!("\n   To install Tor:");
            println!("   - Linux: sudo apt install tor");
            println!("   - Mac: brew install tor");
            println!("   - Then start: sudo systemctl start tor (or brew services start tor)");
        }
        Err(e) => {
            println!("❌ Error checking Tor: {e}");
        }
    }

    Ok(())
}
