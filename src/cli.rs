// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use domain_mapper::config::DEFAULT_FETCH_TIMEOUT_SECS;
use domain_mapper::report::ExportFormat;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "domain-mapper",
    version = "0.1.0",
    about = "Map websites to the third-party domains they load, with IP addresses",
    long_about = "domain-mapper fetches a list of seed pages, finds every third-party domain their \
                  scripts, images, stylesheets and iframes come from, resolves all of them to IP \
                  addresses and saves the result as an Excel workbook."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl seed pages and write the domain/IP report
    ///
    /// Example: domain-mapper scan https://example.com https://example.org
    Scan {
        /// Seed URLs to scan (the built-in list is used when none are given)
        seeds: Vec<String>,

        /// Read more seed URLs from a file
        ///
        /// Any text works: URLs are picked out of it, one per site, and lines
        /// starting with '#' are ignored.
        #[arg(long)]
        seeds_file: Option<PathBuf>,

        /// Where to write the report (default: ~/Downloads/web_domain_ips.<format>)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Report file format
        #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
        format: ExportFormat,

        /// Seconds to wait for each seed page before recording a timeout
        #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
        timeout: u64,

        /// How many seeds to crawl at the same time
        ///
        /// The report order is the same whatever this is set to.
        #[arg(long, default_value_t = 1)]
        concurrency: usize,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the third-party domains referenced by a saved HTML file
    ///
    /// Example: domain-mapper extract page.html --base-domain example.com
    Extract {
        /// Path to the HTML file
        html_file: PathBuf,

        /// The page's own domain (hosts containing it are left out)
        #[arg(long)]
        base_domain: String,

        /// Print the domains as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show where URLs redirect to and the IP of the final host
    ///
    /// Example: domain-mapper redirects http://example.com
    Redirects {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,

        /// Seconds to wait for each URL
        #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
        timeout: u64,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}
