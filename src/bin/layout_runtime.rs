//! Command-line inspection of layouts and data models
//!
//! Parses layout documents, walks their component trees and resolves key
//! paths against JSON data files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use layout_runtime::model::DataModelAccessor;
use layout_runtime::{
    Component, ComponentContext, ComponentKind, IndexContext, JsonDataModel, KeyPath,
    LayoutModel, ResolutionMode, RuntimeConfig,
};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "layout-runtime")]
#[command(about = "Inspect form layouts and resolve key paths against data models")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// JSON runtime configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Report unresolved paths as errors
    #[arg(long, global = true)]
    strict: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a layout document and summarise its pages
    Check {
        /// Layout document
        layout: PathBuf,
    },
    /// Print every page and component, depth first
    Tree {
        /// Layout document
        layout: PathBuf,
    },
    /// Read the value at a key path
    Get {
        /// JSON data file
        data: PathBuf,
        /// Key path, e.g. `people.name` or `people[0].name`
        path: String,
        /// Ambient row index, outermost first; repeatable
        #[arg(short, long = "index")]
        indices: Vec<usize>,
    },
    /// Count the elements of the collection at a key path
    Count {
        /// JSON data file
        data: PathBuf,
        /// Key path
        path: String,
        /// Ambient row index, outermost first; repeatable
        #[arg(short, long = "index")]
        indices: Vec<usize>,
    },
    /// Expand repeating groups against a data file and print the contexts
    Contexts {
        /// Layout document
        layout: PathBuf,
        /// JSON data file
        data: PathBuf,
    },
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    // RUST_LOG overrides the level picked here
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::default(),
    };
    if cli.strict {
        config.resolution_mode = ResolutionMode::Strict;
    }

    match cli.command {
        Commands::Check { layout } => handle_check(&layout),
        Commands::Tree { layout } => handle_tree(&layout),
        Commands::Get {
            data,
            path,
            indices,
        } => handle_get(&data, &path, &indices, &config),
        Commands::Count {
            data,
            path,
            indices,
        } => handle_count(&data, &path, &indices, &config),
        Commands::Contexts { layout, data } => handle_contexts(&layout, &data, &config),
    }
}

fn load_layout(path: &Path) -> Result<LayoutModel> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    LayoutModel::from_reader(BufReader::new(file))
        .with_context(|| format!("building layout from {}", path.display()))
}

fn load_data(path: &Path) -> Result<JsonDataModel> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    JsonDataModel::from_json_str(&json).with_context(|| format!("parsing {}", path.display()))
}

fn handle_check(layout: &Path) -> Result<()> {
    let layout = load_layout(layout)?;
    for page in layout.pages() {
        println!("{}: {} components", page.id(), page.descendant_count());
    }
    println!("✓ layout is valid");
    Ok(())
}

fn handle_tree(layout: &Path) -> Result<()> {
    let layout = load_layout(layout)?;
    for component in &layout {
        println!("{}{}", "  ".repeat(depth(component)), describe(component));
    }
    Ok(())
}

fn handle_get(data: &Path, path: &str, indices: &[usize], config: &RuntimeConfig) -> Result<()> {
    let model = load_data(data)?;
    let path = KeyPath::parse(path)?;
    match model.get_model_data(&path, &IndexContext::new(indices), config.resolution_mode)? {
        Some(value) => println!("{value}"),
        None => println!("null"),
    }
    Ok(())
}

fn handle_count(data: &Path, path: &str, indices: &[usize], config: &RuntimeConfig) -> Result<()> {
    let model = load_data(data)?;
    let path = KeyPath::parse(path)?;
    match model.get_model_data_count(&path, &IndexContext::new(indices), config.resolution_mode)? {
        Some(count) => println!("{count}"),
        None => println!("null"),
    }
    Ok(())
}

fn handle_contexts(layout: &Path, data: &Path, config: &RuntimeConfig) -> Result<()> {
    let layout = load_layout(layout)?;
    let model = load_data(data)?;
    for context in layout.component_contexts(&model, config)? {
        print_context(&context, 0, &model, config)?;
    }
    Ok(())
}

fn print_context(
    context: &ComponentContext,
    level: usize,
    model: &JsonDataModel,
    config: &RuntimeConfig,
) -> Result<()> {
    let component = context.component();
    let mut line = format!("{}{}", "  ".repeat(level), describe(component));
    if !context.row_indices().is_empty() {
        line.push_str(&format!(" {}", context.row_indices()));
    }
    if let Some(value) = context.value(model, config)? {
        line.push_str(&format!(" = {value}"));
    }
    println!("{line}");

    for child in context.children() {
        print_context(child, level + 1, model, config)?;
    }
    Ok(())
}

fn depth(component: &Component) -> usize {
    let mut depth = 0;
    let mut current = component.parent();
    while let Some(parent) = current {
        depth += 1;
        current = parent.parent();
    }
    depth
}

fn describe(component: &Component) -> String {
    match component.kind() {
        ComponentKind::RepeatingGroup { max_count, .. } => {
            format!("{component} maxCount={max_count}")
        }
        ComponentKind::Summary { .. } => match component.summary_refs() {
            Some((page, target)) => format!("{component} -> {page}/{target}"),
            None => component.to_string(),
        },
        _ => match component.simple_binding() {
            Some(binding) => format!("{component} [{binding}]"),
            None => component.to_string(),
        },
    }
}
