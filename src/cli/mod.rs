//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::generate::GenerateArgs;
use commands::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(name = "projectgpt")]
#[command(about = "ProjectGPT - generate a project idea, its tools and the steps to build it", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./projectgpt.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the web UI
    Serve(ServeArgs),

    /// Run the idea, tools and steps prompts once and print the results
    Generate(GenerateArgs),

    /// List the selectable project types and languages
    Options,
}

/// Print `err` in the requested format and exit with status 1
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1)
}
