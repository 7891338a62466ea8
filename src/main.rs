//! # Cardpress CLI
//!
//! Command-line interface for ID-card templates.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP server for the editor and print stations
//! cardpress serve --listen 0.0.0.0:8080
//!
//! # List bindable fields
//! cardpress fields --custom-fields custom.json
//!
//! # Preview the FRONT face of a template bound to a record
//! cardpress preview badge.json --record employee.json --out front.html
//!
//! # Rasterize the BACK face to PNG
//! cardpress capture badge.json --record employee.json --face back --png back.png
//!
//! # Print document for several records (FRONT/BACK per record)
//! cardpress print badge.json a.json b.json --out print.html
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cardpress::{
    CardError, FaceKind, Template,
    config::{DEFAULT_LISTEN_ADDR, EngineConfig},
    fields::BindingContext,
    print::{PrintRecord, capture_batch, compose_image_pages, compose_pages},
    server::{ServerConfig, serve},
};

/// Cardpress - ID card layout and rendering
#[derive(Parser, Debug)]
#[command(name = "cardpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FaceArg {
    Front,
    Back,
}

impl From<FaceArg> for FaceKind {
    fn from(face: FaceArg) -> Self {
        match face {
            FaceArg::Front => FaceKind::Front,
            FaceArg::Back => FaceKind::Back,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, env = "CARDPRESS_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
        listen: String,

        #[command(flatten)]
        config: EngineConfig,
    },

    /// List bindable fields as JSON
    Fields {
        #[command(flatten)]
        config: EngineConfig,
    },

    /// Render one face as standalone HTML
    Preview {
        /// Template JSON file
        template: PathBuf,

        /// Record JSON file (omit to preview unbound)
        #[arg(long, value_name = "FILE")]
        record: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "front")]
        face: FaceArg,

        /// Output file (defaults to stdout)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        #[command(flatten)]
        config: EngineConfig,
    },

    /// Rasterize one face to PNG
    Capture {
        /// Template JSON file
        template: PathBuf,

        /// Record JSON file (omit to capture unbound)
        #[arg(long, value_name = "FILE")]
        record: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "front")]
        face: FaceArg,

        /// Output PNG file
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        #[command(flatten)]
        config: EngineConfig,
    },

    /// Build a print document for one or more records
    Print {
        /// Template JSON file
        template: PathBuf,

        /// Record JSON files, printed in order
        records: Vec<PathBuf>,

        /// Rasterize each face and print the bitmaps
        #[arg(long)]
        rasterize: bool,

        /// Output file (defaults to stdout)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        #[command(flatten)]
        config: EngineConfig,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CardError> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(dispatch(cli.command))
}

async fn dispatch(command: Commands) -> Result<(), CardError> {
    match command {
        Commands::Serve { listen, config } => {
            serve(ServerConfig {
                listen_addr: listen,
                engine: config,
            })
            .await
        }

        Commands::Fields { config } => {
            let catalog = config.catalog();
            println!("{}", serde_json::to_string_pretty(&catalog)?);
            Ok(())
        }

        Commands::Preview {
            template,
            record,
            face,
            out,
            config,
        } => {
            let template = load_template(&template)?;
            let ctx = record.as_deref().map(load_context).transpose()?;
            let kind = FaceKind::from(face);
            let face = template
                .face(kind)
                .ok_or_else(|| CardError::Template(format!("template has no {} face", kind)))?;
            let renderer = config.renderer()?;
            let markup = renderer.preview_markup(kind, face, ctx.as_ref()).await;
            let html = format!(
                "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body style=\"margin:0\">{}</body>\n</html>\n",
                cardpress::render::html::escape_html(&template.name),
                markup
            );
            write_output(out.as_deref(), &html)
        }

        Commands::Capture {
            template,
            record,
            face,
            png,
            config,
        } => {
            let template = load_template(&template)?;
            let ctx = record.as_deref().map(load_context).transpose()?;
            let kind = FaceKind::from(face);
            let face = template
                .face(kind)
                .ok_or_else(|| CardError::Template(format!("template has no {} face", kind)))?;
            let renderer = config.renderer()?;
            let bitmap = renderer.capture_face(kind, face, ctx.as_ref()).await;
            std::fs::write(&png, bitmap.to_png()?)?;
            info!(
                path = %png.display(),
                width = bitmap.width(),
                height = bitmap.height(),
                "capture saved"
            );
            Ok(())
        }

        Commands::Print {
            template,
            records,
            rasterize,
            out,
            config,
        } => {
            let template = load_template(&template)?;
            let records: Vec<PrintRecord> = if records.is_empty() {
                vec![PrintRecord::new(template, None)]
            } else {
                records
                    .iter()
                    .map(|path| Ok(PrintRecord::new(template.clone(), Some(load_context(path)?))))
                    .collect::<Result<_, CardError>>()?
            };
            let renderer = config.renderer()?;
            let pages = if rasterize {
                let captured = capture_batch(&renderer, &records).await;
                let images = captured
                    .iter()
                    .map(|c| c.bitmap.to_data_uri())
                    .collect::<Result<Vec<_>, _>>()?;
                let (width, height) = (records[0].template.front.width, records[0].template.front.height);
                compose_image_pages(&images, width, height)
            } else {
                compose_pages(&renderer, &records).await
            };
            write_output(out.as_deref(), &pages.to_html())
        }
    }
}

fn load_template(path: &Path) -> Result<Template, CardError> {
    let text = std::fs::read_to_string(path)?;
    Template::from_json(&text)
        .map_err(|e| CardError::Template(format!("{}: {}", path.display(), e)))
}

fn load_context(path: &Path) -> Result<BindingContext, CardError> {
    let text = std::fs::read_to_string(path)?;
    let record: Value = serde_json::from_str(&text)
        .map_err(|e| CardError::Record(format!("{}: {}", path.display(), e)))?;
    Ok(BindingContext::from_record(&record))
}

fn write_output(out: Option<&Path>, content: &str) -> Result<(), CardError> {
    match out {
        Some(path) => {
            std::fs::write(path, content)?;
            info!(path = %path.display(), "written");
        }
        None => print!("{}", content),
    }
    Ok(())
}
