//! pdftotext CLI - PDF page text extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftotext::render::{to_json, to_text};
use pdftotext::{
    ExtractOptions, ExtractedDocument, ExtractionStats, JsonFormat, LopdfBackend, PageSelection,
    Pdf, PdfBackend,
};

#[derive(Parser)]
#[command(name = "pdftotext")]
#[command(version)]
#[command(about = "Extract page text from PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output text file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Password for encrypted documents
    #[arg(long, global = true, env = "PDFTOTEXT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract plain text
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Keep content stream order instead of rebuilding reading order
        #[arg(long)]
        raw: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Replace unreadable pages with empty text instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Extract text as JSON, one entry per page
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Keep content stream order instead of rebuilding reading order
        #[arg(long)]
        raw: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Replace unreadable pages with empty text instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the positioned glyph runs of one page as JSON
    Runs {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let password = cli.password.as_deref();

    let result = match cli.command {
        Some(Commands::Text {
            input,
            output,
            raw,
            pages,
            lenient,
        }) => cmd_text(
            &input,
            output.as_deref(),
            password,
            raw,
            pages.as_deref(),
            lenient,
        ),
        Some(Commands::Json {
            input,
            output,
            compact,
            raw,
            pages,
            lenient,
        }) => cmd_json(
            &input,
            output.as_deref(),
            password,
            compact,
            raw,
            pages.as_deref(),
            lenient,
        ),
        Some(Commands::Info { input, json }) => cmd_info(&input, password, json),
        Some(Commands::Runs {
            input,
            page,
            compact,
        }) => cmd_runs(&input, password, page, compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract text if input is provided
            if let Some(input) = cli.input {
                cmd_text(&input, cli.output.as_deref(), password, false, None, false)
            } else {
                println!("{}", "Usage: pdftotext <FILE> [OUTPUT]".yellow());
                println!("       pdftotext --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn extract_options(password: Option<&str>, raw: bool, lenient: bool) -> ExtractOptions {
    let mut options = ExtractOptions::new();
    if let Some(password) = password {
        options = options.with_password(password);
    }
    if raw {
        options = options.raw();
    }
    if lenient {
        options = options.lenient();
    }
    options
}

fn open(input: &Path, options: ExtractOptions) -> Result<Pdf, Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    Ok(Pdf::open_with_options(&data, options)?)
}

fn page_selection(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    Ok(match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    })
}

/// Spinner that keeps animating while the calling thread is busy.
fn spinner(message: String) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Read the selected pages, with a spinner when stdout is not the target.
fn read_selected(
    pdf: &Pdf,
    selection: &PageSelection,
    show_progress: bool,
) -> Result<Vec<(u32, String)>, Box<dyn std::error::Error>> {
    if !show_progress {
        return Ok(pdf.read_pages(selection)?);
    }

    let pb = spinner(format!("Extracting text ({} pages)...", pdf.page_count()))?;
    let pages = pdf.read_pages(selection);
    pb.finish_and_clear();
    Ok(pages?)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    password: Option<&str>,
    raw: bool,
    pages: Option<&str>,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let selection = page_selection(pages)?;
    let pdf = open(input, extract_options(password, raw, lenient))?;

    let text = if selection == PageSelection::All && !lenient {
        pdf.read_all_parallel()?
    } else {
        to_text(&read_selected(&pdf, &selection, output.is_some())?)
    };

    write_output(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    password: Option<&str>,
    compact: bool,
    raw: bool,
    pages: Option<&str>,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let selection = page_selection(pages)?;
    let pdf = open(input, extract_options(password, raw, lenient))?;
    let pages = read_selected(&pdf, &selection, output.is_some())?;
    let doc = ExtractedDocument::new(pdf.layout_mode(), pdf.page_count(), pages);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    write_output(output, &to_json(&doc, format)?)
}

fn cmd_info(
    input: &Path,
    password: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let backend = LopdfBackend::load(&data)?;
    let version = backend.version();
    let encrypted = backend.is_encrypted();

    // Unreadable pages should not hide the rest of the statistics
    let pdf = Pdf::from_backend(backend, extract_options(password, false, true))?;
    let pages = pdf.read_pages(&PageSelection::All)?;
    let stats = ExtractionStats::from_pages(pages.iter().map(|(_, text)| text.as_str()));

    if json {
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "version": version,
            "encrypted": encrypted,
            "page_count": pdf.page_count(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), version);
    println!("{}: {}", "Pages".bold(), pdf.page_count());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if encrypted { "Yes" } else { "No" }
    );

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);
    if stats.empty_page_count > 0 {
        println!("{}: {}", "Empty pages".bold(), stats.empty_page_count);
    }

    Ok(())
}

fn cmd_runs(
    input: &Path,
    password: Option<&str>,
    page: u32,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if page == 0 {
        return Err("page numbers start at 1".into());
    }
    let pdf = open(input, extract_options(password, false, false))?;
    let content = pdf.page_content(page as usize - 1)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    println!("{}", to_json(&content, format)?);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdftotext".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF page text extraction tool");
    println!();
    println!("License: MIT");
}
