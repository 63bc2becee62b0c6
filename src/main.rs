//! CLI entry point for labmark
//!
//! A developer preview tool for the content pipeline: render a single
//! file, inspect its parsed front matter, or sweep a whole content tree.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labmark::content::loader;
use labmark::Renderer;

#[derive(Parser)]
#[command(name = "labmark")]
#[command(version)]
#[command(about = "Render lab-website content files to HTML fragments", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a content file to an HTML fragment
    Render {
        /// Content file to render
        file: PathBuf,

        /// Base path prepended to relative asset URLs
        #[arg(short, long, default_value = "")]
        base_path: String,

        /// Write the fragment to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a file's parsed front matter as JSON
    Frontmatter {
        /// Content file to inspect
        file: PathBuf,
    },

    /// Render every Markdown file under a directory and report
    Check {
        /// Directory to sweep
        dir: PathBuf,

        /// Base path prepended to relative asset URLs
        #[arg(short, long, default_value = "")]
        base_path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "labmark=debug,info"
    } else {
        "labmark=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Render {
            file,
            base_path,
            output,
        } => {
            let source = loader::load_file(&file)?;
            let page = Renderer::new(base_path).render(&source);

            match output {
                Some(path) => {
                    fs::write(&path, &page.html)?;
                    tracing::info!("wrote {:?}", path);
                }
                None => println!("{}", page.html),
            }
        }

        Commands::Frontmatter { file } => {
            let source = loader::load_file(&file)?;
            let (front_matter, _) = labmark::FrontMatter::parse(&source);
            println!("{}", serde_json::to_string_pretty(&front_matter)?);
        }

        Commands::Check { dir, base_path } => {
            let files = loader::find_content_files(&dir);
            if files.is_empty() {
                println!("no markdown files under {:?}", dir);
                return Ok(());
            }

            let renderer = Renderer::new(base_path);
            let mut failed = 0usize;

            for path in &files {
                match loader::load_file(path) {
                    Ok(source) => {
                        if source.matches("```").count() % 2 != 0 {
                            tracing::warn!("{:?}: unbalanced code fences", path);
                        }
                        let page = renderer.render(&source);
                        tracing::debug!("{:?}: {} bytes of html", path, page.html.len());
                    }
                    Err(e) => {
                        tracing::warn!("{}", e);
                        failed += 1;
                    }
                }
            }

            println!("checked {} files, {} failed to load", files.len(), failed);
            if failed > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
