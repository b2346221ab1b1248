use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bookmeta_core::batch::process_folder;
use bookmeta_core::config::{config_path, load_config, Settings};
use bookmeta_core::epub::parse_epub;
use bookmeta_core::vault::DirVault;

#[derive(Parser)]
#[command(name = "bookmeta")]
#[command(about = "EPUB metadata extraction, cover export, and note generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every EPUB in the configured input folder
    Run {
        /// Vault root directory
        #[arg(long, default_value = ".")]
        vault: String,

        /// Override the configured input folder
        #[arg(long)]
        input: Option<String>,

        /// Override the configured metadata folder
        #[arg(long)]
        metadata: Option<String>,

        /// Override the configured template path
        #[arg(long)]
        template: Option<String>,

        /// Override the configured output folder
        #[arg(long)]
        output: Option<String>,
    },

    /// Show the metadata of one EPUB
    Info {
        /// Input file
        #[arg(required = true)]
        input: String,
    },

    /// Extract the cover image of one EPUB
    Cover {
        /// Input file
        #[arg(required = true)]
        input: String,

        /// Output file (default: cover.<ext> next to the input)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init,
    /// Show current config
    Show,
    /// Set a config value
    Set { key: String, value: String },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let result = match &cli.command {
        Commands::Run { vault, input, metadata, template, output } => run_batch(
            vault,
            input.as_deref(),
            metadata.as_deref(),
            template.as_deref(),
            output.as_deref(),
            cli.json,
        ),
        Commands::Info { input } => run_info(input, cli.json),
        Commands::Cover { input, output } => run_cover(input, output.as_deref(), cli.json),
        Commands::Config { action } => run_config(action, cli.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_batch(
    vault_root: &str,
    input: Option<&str>,
    metadata: Option<&str>,
    template: Option<&str>,
    output: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut settings = load_config();
    if let Some(f) = input {
        settings.input_folder = f.to_string();
    }
    if let Some(f) = metadata {
        settings.metadata_folder = f.to_string();
    }
    if let Some(p) = template {
        settings.template_path = p.to_string();
    }
    if let Some(f) = output {
        settings.output_folder = f.to_string();
    }

    let vault = DirVault::new(vault_root);
    let summary = process_folder(&vault, &settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Processed {} of {}", summary.processed, summary.total);
        if summary.skipped > 0 {
            println!("Skipped {} already-existing", summary.skipped);
        }
        for failure in &summary.failures {
            println!("Failed: {}: {}", failure.path, failure.message);
        }
    }
    Ok(())
}

fn run_info(input: &str, json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = File::open(Path::new(input))?;
    let meta = parse_epub(BufReader::new(file))?;

    if json {
        // cover bytes stay out of the terminal
        let mut value = serde_json::to_value(&meta)?;
        if let Some(cover) = value.get_mut("cover").filter(|c| !c.is_null()) {
            cover["data"] = serde_json::Value::Null;
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        if !meta.title.is_empty() {
            println!("Title: {}", meta.title);
        }
        if !meta.authors.is_empty() {
            println!("Authors: {}", meta.authors.join(", "));
        }
        if !meta.publisher.is_empty() {
            println!("Publisher: {}", meta.publisher);
        }
        if !meta.isbn.is_empty() {
            println!("ISBN: {}", meta.isbn);
        }
        if !meta.languages.is_empty() {
            println!("Languages: {}", meta.languages.join(", "));
        }
        println!("Manifest items: {}", meta.manifest.len());
        println!("Spine items: {}", meta.spine.len());
        if let Some(nav) = &meta.toc_nav {
            println!("Nav ToC entries: {}", nav.len());
        }
        if let Some(ncx) = &meta.toc_ncx {
            println!("NCX ToC entries: {}", ncx.len());
        }
        if let Some(cover) = &meta.cover {
            println!("Cover: {} ({})", cover.path, cover.mime);
        }
    }
    Ok(())
}

fn run_cover(
    input: &str,
    output: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let path = Path::new(input);
    let file = File::open(path)?;
    let meta = parse_epub(BufReader::new(file))?;
    let cover = meta.cover.ok_or("No cover image found")?;
    let data = cover.data.ok_or("Cover image data unreadable")?;
    let ext = if cover.mime.contains("png") { "png" } else { "jpg" };
    let out_path = output.map(|s| Path::new(s).to_path_buf()).unwrap_or_else(|| {
        path.parent()
            .unwrap_or(Path::new("."))
            .join(format!("cover.{}", ext))
    });
    std::fs::write(&out_path, &data)?;
    if !json {
        println!("Extracted cover to {}", out_path.display());
    }
    Ok(())
}

fn run_config(
    action: &ConfigAction,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match action {
        ConfigAction::Init => {
            let path = config_path().ok_or("Could not determine config directory")?;
            std::fs::create_dir_all(path.parent().unwrap())?;
            let default_cfg = Settings::default();
            let toml = toml::to_string_pretty(&default_cfg)?;
            std::fs::write(&path, toml)?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            let cfg = load_config();
            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else {
                println!("{}", toml::to_string_pretty(&cfg)?);
            }
        }
        ConfigAction::Set { key, value } => {
            let path = config_path().ok_or("Could not determine config directory")?;
            let mut cfg: Settings = if path.exists() {
                let s = std::fs::read_to_string(&path)?;
                toml::from_str(&s).unwrap_or_default()
            } else {
                Settings::default()
            };

            set_config_key(&mut cfg, key, value)?;

            std::fs::create_dir_all(path.parent().unwrap())?;
            let toml = toml::to_string_pretty(&cfg)?;
            std::fs::write(&path, toml)?;
            if !json {
                println!("Updated {}", key);
            }
        }
    }
    Ok(())
}

fn set_config_key(
    cfg: &mut Settings,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match key {
        "input_folder" => cfg.input_folder = value.to_string(),
        "metadata_folder" => cfg.metadata_folder = value.to_string(),
        "template_path" => cfg.template_path = value.to_string(),
        "output_folder" => cfg.output_folder = value.to_string(),
        _ => return Err(format!("Unknown key: {}", key).into()),
    }
    Ok(())
}
