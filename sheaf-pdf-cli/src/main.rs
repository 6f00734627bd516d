use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sheaf_pdf::operations::{merge_pdf_files_with, MergeOptions, MetadataMode};
use sheaf_pdf::{
    split_pdf_file, Canvas, Color, Document, PageOrientation, PageSize, Rectangle,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "sheafpdf",
    about = "Create, inspect, merge and split PDF files",
    version,
    author
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a PDF with blank pages
    Create {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of pages
        #[arg(short = 'n', long, default_value_t = 1)]
        pages: usize,

        /// Page size (A0-A6, Letter, Legal, Tabloid, Ledger)
        #[arg(short, long, default_value = "A4")]
        size: PageSize,

        /// Page orientation (portrait or landscape)
        #[arg(long, default_value = "portrait")]
        orientation: PageOrientation,

        /// Document title
        #[arg(short, long)]
        title: Option<String>,

        /// Document author
        #[arg(short, long)]
        author: Option<String>,

        /// Document subject
        #[arg(long)]
        subject: Option<String>,

        /// Document keywords
        #[arg(long)]
        keywords: Option<String>,

        /// Draw a frame half an inch inside each page edge
        #[arg(long)]
        frame: bool,
    },

    /// Get information about a PDF file
    Info {
        /// Input PDF file
        input: PathBuf,

        /// Show every page
        #[arg(short, long)]
        detailed: bool,
    },

    /// Merge multiple PDFs into one
    Merge {
        /// Input PDF files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Keep title, author, subject and keywords of the first file
        #[arg(long)]
        keep_metadata: bool,
    },

    /// Split a PDF into one file per page
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Output pattern ({} or {page} for the page number, {n} zero-padded)
        #[arg(short = 'p', long, default_value = "page_{}.pdf")]
        pattern: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = if verbose {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Create {
            output,
            pages,
            size,
            orientation,
            title,
            author,
            subject,
            keywords,
            frame,
        } => {
            if pages == 0 {
                bail!("a document needs at least one page");
            }

            let mut doc = Document::new();
            if let Some(title) = title {
                doc.set_title(title);
            }
            if let Some(author) = author {
                doc.set_author(author);
            }
            if let Some(subject) = subject {
                doc.set_subject(subject);
            }
            if let Some(keywords) = keywords {
                doc.set_keywords(keywords);
            }

            for _ in 0..pages {
                let page = doc
                    .add_page(size, orientation)
                    .with_context(|| format!("Failed to create a {size} page"))?;
                if frame {
                    let bounds = Rectangle::new(0.0, 0.0, page.width(), page.height()).inset(36.0);
                    if let Some(canvas) = page.graphics() {
                        canvas.stroke_rect(bounds, Color::black());
                    }
                }
            }

            doc.save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "✓ PDF created successfully: {} ({} {} page{})",
                output.display(),
                pages,
                size,
                if pages == 1 { "" } else { "s" }
            );
        }

        Commands::Info { input, detailed } => {
            let doc = Document::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let metadata = doc.metadata();

            println!("PDF Information for: {}", input.display());
            println!("==========================================");
            println!("Pages: {}", doc.page_count());

            let fields = [
                ("Title", &metadata.title),
                ("Author", &metadata.author),
                ("Subject", &metadata.subject),
                ("Keywords", &metadata.keywords),
                ("Creator", &metadata.creator),
                ("Producer", &metadata.producer),
            ];
            for (label, value) in fields {
                if let Some(value) = value {
                    println!("{label}: {value}");
                }
            }
            if let Some(date) = metadata.creation_date {
                println!("Created: {}", date.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if let Some(date) = metadata.modification_date {
                println!("Modified: {}", date.format("%Y-%m-%d %H:%M:%S UTC"));
            }

            if detailed {
                println!("\nPage Information:");
                println!("-----------------");
                for (i, page) in doc.pages().iter().enumerate() {
                    print!(
                        "Page {}: {} {} ({:.0}x{:.0} pts)",
                        i + 1,
                        page.size(),
                        page.orientation(),
                        page.width(),
                        page.height()
                    );
                    if page.rotation() != 0 {
                        print!(", rotated {}°", page.rotation());
                    }
                    println!();
                }
            }
        }

        Commands::Merge {
            files,
            output,
            keep_metadata,
        } => {
            let options = MergeOptions {
                metadata_mode: if keep_metadata {
                    MetadataMode::FromFirst
                } else {
                    MetadataMode::Fresh
                },
            };
            debug!(inputs = files.len(), "Merging");

            let pages = merge_pdf_files_with(&files, &output, &options)
                .context("Failed to merge PDF files")?;
            println!(
                "✓ Merged {} files ({} pages) into {}",
                files.len(),
                pages,
                output.display()
            );
        }

        Commands::Split { input, pattern } => {
            let outputs = split_pdf_file(&input, &pattern)
                .with_context(|| format!("Failed to split {}", input.display()))?;
            for path in &outputs {
                println!("{}", path.display());
            }
            println!("✓ Split into {} files", outputs.len());
        }
    }

    Ok(())
}
