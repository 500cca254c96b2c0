//! # crawl-mcp CLI Application
//!
//! Runs the crawl MCP server, or a single crawl from the command line.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands:
//!   - `serve` (default): MCP server over stdio or SSE
//!   - `crawl`: one crawl without any transport, printing the summary
//! - Telemetry bootstrap: stderr logging, optional log file, optional OTLP
//!
//! Logs never go to stdout, which belongs to the stdio transport.

mod telemetry;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crawl_mcp::crawler::SpiderEngine;
use crawl_mcp::mcp::{self, format_summary, TransportConfig, DEFAULT_SSE_PORT};
use crawl_mcp::orchestrator::{
    default_results_dir, CrawlRequest, Orchestrator, OrchestratorConfig, DEFAULT_MAX_DEPTH,
};
use crawl_mcp::processor::CrawlOutcome;
use crawl_mcp::sanitize::{OutputEncoding, TextSanitizer};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use telemetry::TelemetryConfig;
use tracing::instrument;
use url::Url;

#[derive(Parser)]
#[command(author, version, about = "MCP server that crawls websites into structured markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transport used by the MCP server
    #[arg(long, value_enum, default_value_t = Transport::Stdio, global = true)]
    transport: Transport,

    /// Port to listen on for SSE
    #[arg(long, default_value_t = DEFAULT_SSE_PORT, global = true)]
    port: u16,

    /// Directory for generated result files (default: crawl_results next to the executable)
    #[arg(long, global = true)]
    results_dir: Option<PathBuf>,

    /// Abort a crawl that runs longer than this many seconds
    #[arg(long, global = true)]
    crawl_timeout_secs: Option<u64>,

    /// Encoding of the console (default: detected from the locale)
    #[arg(long, value_enum, global = true)]
    output_encoding: Option<OutputEncoding>,

    /// Also write logs to crawl-mcp.log in this directory
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Export traces and metrics over OTLP
    #[arg(long, global = true)]
    otel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Sse,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (default)
    Serve,

    /// Crawl a website once and save the content
    Crawl(CrawlArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// URL to crawl
    #[arg(required = true)]
    url: String,

    /// Crawl depth
    #[arg(short, long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: u32,

    /// Follow links to other hosts
    #[arg(short, long)]
    include_external: bool,

    /// Only log the run summary
    #[arg(short, long)]
    quiet: bool,

    /// Save crawled content to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();
    let encoding = cli.output_encoding.unwrap_or_else(OutputEncoding::detect);

    let _otel = telemetry::init_tracing_subscriber(&TelemetryConfig {
        encoding,
        log_dir: cli.log_file.clone(),
        otel: cli.otel,
    })?;

    let config = OrchestratorConfig::builder()
        .results_dir(cli.results_dir.clone().unwrap_or_else(default_results_dir))
        .crawl_timeout(cli.crawl_timeout_secs.map(Duration::from_secs))
        .build();
    let orchestrator = Orchestrator::new(Arc::new(SpiderEngine), config);
    let sanitizer = TextSanitizer::new(encoding);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let transport = match cli.transport {
                Transport::Stdio => TransportConfig::Stdio,
                Transport::Sse => TransportConfig::sse_on_port(cli.port),
            };
            mcp::run(orchestrator, sanitizer, transport).await?;
        }
        Commands::Crawl(args) => {
            crawl_command(orchestrator, sanitizer, args).await?;
        }
    }

    Ok(())
}

#[instrument(skip(orchestrator, sanitizer))]
async fn crawl_command(
    orchestrator: Orchestrator,
    sanitizer: TextSanitizer,
    args: CrawlArgs,
) -> anyhow::Result<()> {
    let start_url =
        Url::parse(&args.url).with_context(|| format!("Invalid URL: {}", args.url))?;

    let mut request = CrawlRequest::new(start_url);
    request.max_depth = args.depth;
    request.include_external = args.include_external;
    request.verbose = !args.quiet;
    request.output_file = args.output;

    match orchestrator.run(request).await {
        CrawlOutcome::Success { file_path, stats } => {
            if args.format == "json" {
                let report = json!({
                    "url": args.url,
                    "file_path": file_path,
                    "stats": stats.to_json(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let summary = format_summary(&args.url, &file_path, &stats);
                println!("{}", sanitizer.sanitize(Some(&summary)));
            }
            Ok(())
        }
        CrawlOutcome::Failure { error, .. } => Err(anyhow!(sanitizer.sanitize(Some(&error)))),
    }
}
