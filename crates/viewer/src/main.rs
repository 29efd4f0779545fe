//! DocView - command-line document viewer
//!
//! Drives the document manager the way the desktop shell does: open a
//! document, project it through the adapter, and render the navigation
//! tree and content views as text.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc_manager::navigation::NavigationTree;
use doc_manager::{DocumentAdapter, DocumentError, DocumentManager, Projection};
use std::path::PathBuf;
use store::{SettingsManager, ShellSettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// View, create and export Word documents
#[derive(Parser, Debug)]
#[command(name = "docview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding settings.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the navigation tree of a document
    Tree {
        /// Document to open
        file: PathBuf,
    },

    /// Print the content view of one node
    Show {
        /// Document to open
        file: PathBuf,

        /// Node id, e.g. `paragraphs`, `p2`, `metadata`
        node: String,
    },

    /// Print the plain text of a document
    Text {
        /// Document to open
        file: PathBuf,
    },

    /// Create a document and save it
    New {
        /// Output path (.docx or .doc)
        output: PathBuf,

        /// Document title
        #[arg(short, long)]
        title: Option<String>,

        /// Paragraph to append; repeat for more
        #[arg(short, long = "paragraph")]
        paragraphs: Vec<String>,
    },

    /// Export a document as PDF
    Export {
        /// Document to export
        file: PathBuf,

        /// PDF output path
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config_dir.as_ref())?;
    let mut manager = DocumentManager::with_settings(&settings);
    let tree = NavigationTree::new(&settings.view);

    match cli.command {
        Command::Tree { file } => {
            manager
                .open_read_only(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let adapter = DocumentAdapter::new(manager.current_document());
            print!("{}", render::tree(&tree, &adapter));
        }
        Command::Show { file, node } => {
            manager
                .open_read_only(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let adapter = DocumentAdapter::new(manager.current_document());
            print!("{}", tree.content(&adapter, &node));
        }
        Command::Text { file } => {
            manager
                .open_read_only(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let adapter = DocumentAdapter::new(manager.current_document());
            println!("{}", adapter.text());
        }
        Command::New {
            output,
            title,
            paragraphs,
        } => {
            let document = manager.new_document()?;
            if let Some(title) = title {
                document.set_title(&title);
            }
            for paragraph in &paragraphs {
                document.add_paragraph(paragraph)?;
            }
            let id = document.id();
            manager
                .save_as(id, &output)
                .with_context(|| format!("Failed to save {}", output.display()))?;
            println!("Created {}", output.display());
        }
        Command::Export { file, output } => {
            let id = manager
                .open(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?
                .id();
            match manager.export_to_pdf(id, &output) {
                Ok(()) => println!("Exported {}", output.display()),
                Err(DocumentError::ExportNotImplemented { output, fallback }) => {
                    eprintln!(
                        "PDF export is not available yet; {} was not written. Saved {} instead.",
                        output.display(),
                        fallback.display()
                    );
                }
                Err(e) => return Err(e).context("Export failed"),
            }
        }
    }

    Ok(())
}

fn load_settings(config_dir: Option<&PathBuf>) -> Result<ShellSettings> {
    let Some(dir) = config_dir else {
        return Ok(ShellSettings::default());
    };
    let mut settings = SettingsManager::new(dir);
    settings
        .load_sync()
        .with_context(|| format!("Failed to load settings from {}", dir.display()))?;
    tracing::debug!(path = %settings.settings_path().display(), "Loaded settings");
    Ok(settings.get().clone())
}
