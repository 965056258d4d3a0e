// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (to stderr, controlled by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the results, then save the report file
// 5. Exit with proper code (0 = finished, 2 = error)
//
// Failures of individual seeds (DNS, timeouts, HTTP errors) never reach this
// file: they are rows in the report, and so are seeds that aren't valid
// URLs. Only setup problems do, such as an unreadable seeds file or an
// output file we can't write.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domain_mapper::crawl::Crawler;
use domain_mapper::net::{check_redirect, HttpFetcher, SystemResolver};
use domain_mapper::report::{write_report, ExportFormat, Report, COLUMNS};
use domain_mapper::{config, extract, net};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `--json` output on stdout stays machine-readable
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            seeds,
            seeds_file,
            output,
            format,
            timeout,
            concurrency,
            json,
        } => {
            let settings = ScanSettings {
                seeds,
                seeds_file,
                output,
                format,
                timeout: Duration::from_secs(timeout),
                concurrency,
                json,
            };
            handle_scan(settings).await
        }
        Commands::Extract {
            html_file,
            base_domain,
            json,
        } => handle_extract(&html_file, &base_domain, json),
        Commands::Redirects { urls, timeout, json } => {
            handle_redirects(&urls, Duration::from_secs(timeout), json).await
        }
    }
}

struct ScanSettings {
    seeds: Vec<String>,
    seeds_file: Option<PathBuf>,
    output: Option<PathBuf>,
    format: ExportFormat,
    timeout: Duration,
    concurrency: usize,
    json: bool,
}

// Handles the 'scan' subcommand
async fn handle_scan(settings: ScanSettings) -> Result<i32> {
    let mut raw_seeds = settings.seeds;
    if let Some(path) = &settings.seeds_file {
        let from_file = config::load_seed_file(path)?;
        if from_file.is_empty() {
            anyhow::bail!("No http(s) URLs found in {}", path.display());
        }
        raw_seeds.extend(from_file);
    }

    let seeds = if raw_seeds.is_empty() {
        config::default_seeds()
    } else {
        config::parse_seeds(&raw_seeds)
    };

    let output_path = match settings.output {
        Some(path) => path,
        None => config::default_output_path(settings.format.extension())?,
    };

    if !settings.json {
        println!("🔍 Scanning {} seed page(s)", seeds.len());
        println!("⏱️  Fetch timeout: {}s", settings.timeout.as_secs());
    }

    let fetcher = HttpFetcher::new(settings.timeout).context("Failed to create HTTP client")?;
    let crawler = Crawler::new(fetcher, SystemResolver).with_concurrency(settings.concurrency);

    let report = crawler.run(&seeds).await;

    let mut stdout = std::io::stdout().lock();
    finish_scan(&report, &output_path, settings.format, settings.json, &mut stdout)?;

    Ok(0)
}

// Shows the report, then saves it. Printing comes first so a failed save
// still leaves the results on screen.
fn finish_scan<W: Write>(
    report: &Report,
    output_path: &Path,
    format: ExportFormat,
    json: bool,
    out: &mut W,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    } else {
        writeln!(out)?;
        write_table(report, out)?;
    }
    out.flush()?;

    write_report(report, output_path, format)?;

    let saved = format!("✅ Report ({}) saved to: {}", format.extension(), output_path.display());
    if json {
        eprintln!("{}", saved);
    } else {
        writeln!(out, "\n{}", saved)?;
    }

    Ok(())
}

// Handles the 'extract' subcommand
fn handle_extract(html_file: &Path, base_domain: &str, json: bool) -> Result<i32> {
    let bytes = std::fs::read(html_file)
        .with_context(|| format!("Failed to read {}", html_file.display()))?;
    let html = net::decode_body(&bytes);

    let domains = extract::extract_third_party_domains(&html, base_domain);

    if json {
        println!("{}", serde_json::to_string_pretty(&domains)?);
    } else if domains.is_empty() {
        println!("✅ No third-party domains found");
    } else {
        for domain in &domains {
            println!("{}", domain);
        }
        println!("\n📋 {} third-party domain(s)", domains.len());
    }

    Ok(0)
}

// Handles the 'redirects' subcommand
async fn handle_redirects(urls: &[String], timeout: Duration, json: bool) -> Result<i32> {
    let fetcher = HttpFetcher::new(timeout).context("Failed to create HTTP client")?;
    let mut checks = Vec::new();
    let mut failed = 0;

    for seed in config::parse_seeds(urls) {
        let url = match seed.url() {
            Ok(url) => url,
            Err(reason) => {
                eprintln!("❌ {}: {}", seed, reason);
                failed += 1;
                continue;
            }
        };

        match check_redirect(&fetcher, &SystemResolver, url).await {
            Ok(check) => checks.push(check),
            Err(e) => {
                eprintln!("❌ {}: {}", seed, e);
                failed += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
    } else {
        for check in &checks {
            if check.redirected {
                println!("↪️  {} -> {} ({})", check.url, check.final_url, check.status);
            } else {
                println!("✅ {} (no redirect, {})", check.url, check.status);
            }
            println!("   IP: {}", check.final_ip);
        }
    }

    Ok(if failed > 0 { 1 } else { 0 })
}

// Writes the report as a human-readable table
fn write_table<W: Write>(report: &Report, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{:<32} {:<40} {:<40}", COLUMNS[0], COLUMNS[1], COLUMNS[2])?;
    writeln!(out, "{}", "=".repeat(112))?;

    for row in report.rows() {
        writeln!(
            out,
            "{:<32} {:<40} {:<40}",
            truncate(&row.query_domain, 32),
            truncate(&row.domain, 40),
            truncate(&row.ip_address, 40)
        )?;
    }

    writeln!(out)?;

    let summary = report.summary();
    writeln!(out, "📊 Summary:")?;
    writeln!(out, "   🌐 Seeds: {}", summary.seeds)?;
    writeln!(out, "   🔗 Third-party domains: {}", summary.discovered)?;
    writeln!(out, "   ⏱️  Timeouts: {}", summary.timeouts)?;
    writeln!(out, "   ❌ Fetch errors: {}", summary.errors)?;
    writeln!(out, "   🧭 DNS failures: {}", summary.dns_failures)
}

// Shortens text for a table column, counting characters rather than bytes
// so multi-byte error messages can't be cut mid-character
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
