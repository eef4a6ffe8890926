//! Atlas CLI
//!
//! Entry point for the `atlas` command-line tool.

use atlas_loader::config::EffectiveConfig;
use atlas_loader::hierarchy::{HierarchyBuilder, IgnoreRules};
use atlas_loader::{RasterBackend, Registry};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Image asset loader", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the folder hierarchy discovered under a directory
    Scan {
        /// Asset root
        dir: PathBuf,

        /// Path to loader config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Load every asset under a directory and print the load report
    Load {
        /// Asset root
        dir: PathBuf,

        /// Pixels per unit (overrides the config file)
        #[arg(long, short = 'u')]
        unit: Option<f64>,

        /// Path to loader config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { dir, config, json } => run_scan(dir, config, json),
        Commands::Load {
            dir,
            unit,
            config,
            json,
        } => run_load(dir, unit, config, json),
    }
}

fn build_config(config_path: Option<PathBuf>, unit: Option<f64>) -> EffectiveConfig {
    let cli = unit.map(|unit| serde_json::json!({ "unit": unit }));
    match EffectiveConfig::build(config_path.as_deref(), cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn run_scan(dir: PathBuf, config_path: Option<PathBuf>, json_output: bool) {
    let config = build_config(config_path, None).loader;

    let ignore = match IgnoreRules::new(&config.ignore_suffix).with_patterns(&config.ignore_patterns) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let folders = match HierarchyBuilder::new(&config, &ignore).build(&dir) {
        Ok(folders) => folders,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.kind(), e);
            process::exit(1);
        }
    };

    if json_output {
        match serde_json::to_string_pretty(&folders) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing folders: {}", e);
                process::exit(1);
            }
        }
    } else {
        for folder in &folders {
            println!("{}", folder);
        }
        println!();
        println!("{} folder(s)", folders.len());
    }
}

fn run_load(dir: PathBuf, unit: Option<f64>, config_path: Option<PathBuf>, json_output: bool) {
    let config = build_config(config_path, unit);
    for source in &config.sources {
        log::debug!("config source: {:?}", source);
    }

    let mut registry = match Registry::with_config(RasterBackend, config.loader) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let report = match registry.load(&dir, None) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.kind(), e);
            process::exit(1);
        }
    };

    if json_output {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("Loaded {}", report.root.display());
    println!("  {}", report.human_summary());
    for folder in registry.folders() {
        let names: Vec<&str> = registry.images_in(folder).collect();
        println!("  {}: {}", folder, names.join(", "));
    }
    for sheet in &report.sheets {
        if let Ok(cells) = registry.get_sheet(sheet) {
            println!("  sheet {}: {} cell(s)", sheet, cells.len());
        }
    }
    for advisory in &report.advisories {
        println!("  warning: {}", advisory);
    }
    for name in &report.stale {
        println!("  stale: {}", name);
    }
}
