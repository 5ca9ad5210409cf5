use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use homehub_app::{Hub, HubPaths};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Home Hub launcher")]
struct Cli {
    /// Hub root containing apps/, widgets/, languages/, config/ and data/
    #[arg(long)]
    root: Option<PathBuf>,

    /// Switch to this language before showing anything
    #[arg(long)]
    language: Option<String>,

    /// Print the discovered apps and exit
    #[arg(long, default_value_t = false)]
    list_apps: bool,

    /// Print the discovered widgets and exit
    #[arg(long, default_value_t = false)]
    list_widgets: bool,

    /// Open this app in the content area
    #[arg(long)]
    launch: Option<String>,

    /// Delete all application data before starting
    #[arg(long, default_value_t = false)]
    reset_data: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let args = Cli::parse();
    let root = args.root.unwrap_or_else(HubPaths::default_root);
    let mut hub = Hub::new(HubPaths::from_root(&root), homehub_plugins::builtin_module())
        .with_context(|| format!("failed to start hub at {}", root.display()))?;

    if let Some(language) = args.language.as_deref() {
        hub.set_language(language);
    }

    if args.list_apps || args.list_widgets {
        if args.list_apps {
            println!("Apps:");
            for entry in hub.list_apps() {
                println!("  - {} ({})", entry.name, entry.id);
            }
        }
        if args.list_widgets {
            println!("Widgets:");
            for entry in hub.list_widgets() {
                println!("  - {} ({})", entry.name, entry.id);
            }
        }
        return Ok(());
    }

    if args.reset_data {
        let report = hub.reset_data();
        println!("Removed {} data file(s).", report.deleted.len());
        for error in &report.errors {
            eprintln!("  {error}");
        }
    }

    println!("{}", hub.translate("app_title"));
    for (slot, rendered) in hub.top_bar().render().into_iter().enumerate() {
        match rendered {
            Some(text) => println!("[{slot}] {}", text.replace('\n', " | ")),
            None => println!("[{slot}] -"),
        }
    }

    if let Some(id) = args.launch.as_deref() {
        if !hub.launch_app(id) {
            bail!("app {id:?} could not be launched");
        }
        if let Some(rendered) = hub.content().render() {
            println!();
            println!("{rendered}");
        }
        return Ok(());
    }

    println!();
    println!("{}", hub.translate("home"));
    for tile in hub.dashboard_tiles() {
        let preview = tile
            .preview
            .map(|text| text.replace('\n', " | "))
            .unwrap_or_else(|| "-".to_string());
        println!("  ({}, {}) {} [{}]: {preview}", tile.row, tile.col, tile.name, tile.id);
    }
    Ok(())
}
