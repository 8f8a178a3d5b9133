//! pdflens CLI - content overlay and Q&A for analyzed PDFs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdflens::client::DEFAULT_BASE_URL;
use pdflens::model::{PageGeometry, PixelSize};
use pdflens::session::Session;
use pdflens::{
    load_analysis, load_fragments, locate_match, overlay_boxes, parse_source, to_json, Backend,
    ClientOptions, HttpBackend, JsonFormat, LocateOptions, MatchKind, TypeFilter, ViewModel,
    DEFAULT_RENDER_SCALE,
};

#[derive(Parser)]
#[command(name = "pdflens")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Analyze PDFs, map content overlays, and ask questions", long_about = None)]
struct Cli {
    /// Analysis backend base URL
    #[arg(long, global = true, env = "PDFLENS_SERVER", default_value = DEFAULT_BASE_URL)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a PDF for analysis and save the result as JSON
    Analyze {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Ask a question about the most recently analyzed document
    Ask {
        /// Question text
        #[arg(value_name = "QUESTION")]
        question: String,
    },

    /// List content items of a saved analysis
    #[command(alias = "ls")]
    List {
        /// Saved analysis JSON
        #[arg(value_name = "ANALYSIS")]
        analysis: PathBuf,

        /// Content type to show (all, heading, paragraph)
        #[arg(long = "type", value_name = "TYPE", default_value = "all")]
        content_type: TypeFilter,

        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Print overlay rectangles for one page
    Overlay {
        /// Saved analysis JSON
        #[arg(value_name = "ANALYSIS")]
        analysis: PathBuf,

        /// Page number (1-indexed)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Paper size: letter, a4, or WxH in inches
        #[arg(long, default_value = "letter")]
        paper: String,

        /// Render scale in pixels per PDF point
        #[arg(long, default_value_t = DEFAULT_RENDER_SCALE)]
        scale: f64,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the text fragments that would be highlighted for some text
    Locate {
        /// Item text to look for
        #[arg(value_name = "TEXT")]
        text: String,

        /// JSON array of text fragments
        #[arg(short, long, value_name = "FILE")]
        fragments: PathBuf,

        /// Leading words used as the anchor
        #[arg(long, default_value = "5")]
        anchor_words: usize,

        /// Maximum fragments joined per window
        #[arg(long, default_value = "50")]
        max_window: usize,
    },

    /// Parse a D(page,x1,y1,...,x4,y4) source string
    Source {
        /// Source string, regions separated by ';'
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let server = cli.server;

    let result = match cli.command {
        Commands::Analyze {
            input,
            output,
            compact,
        } => cmd_analyze(&server, &input, output.as_deref(), compact),
        Commands::Ask { question } => cmd_ask(&server, &question),
        Commands::List {
            analysis,
            content_type,
            search,
            json,
        } => cmd_list(&analysis, content_type, search.as_deref(), json),
        Commands::Overlay {
            analysis,
            page,
            paper,
            scale,
            json,
        } => cmd_overlay(&analysis, page, &paper, scale, json),
        Commands::Locate {
            text,
            fragments,
            anchor_words,
            max_window,
        } => cmd_locate(&text, &fragments, anchor_words, max_window),
        Commands::Source { source } => cmd_source(&source),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn backend(server: &str) -> Result<HttpBackend, Box<dyn std::error::Error>> {
    log::debug!("using backend at {}", server);
    Ok(HttpBackend::new(
        ClientOptions::new().with_base_url(server),
    )?)
}

fn cmd_analyze(
    server: &str,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = backend(server)?;
    let rt = tokio::runtime::Runtime::new()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Analyzing {}...", input.display()));

    let doc = match rt.block_on(backend.analyze_file(input)) {
        Ok(doc) => doc,
        Err(e) => {
            pb.finish_and_clear();
            return Err(format!("Failed to analyze document: {}", e).into());
        }
    };
    pb.finish_and_clear();

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(&doc, format)?;
    if doc.is_empty() {
        eprintln!("{}", "No content extracted yet".yellow());
    }

    if let Some(path) = output {
        fs::write(path, &json)?;
        eprintln!("{}", "Document analyzed successfully!".green());
        eprintln!(
            "{} {} items on {} pages",
            "Found".bold(),
            doc.items().len(),
            doc.page_count()
        );
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_ask(server: &str, question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let question = question.trim();
    if question.is_empty() {
        return Err("Question is required".into());
    }

    let backend = backend(server)?;
    let rt = tokio::runtime::Runtime::new()?;

    match rt.block_on(backend.query(question)) {
        Ok(answer) => {
            println!("{}: {}", "You".bold(), question);
            println!("{}: {}", "Assistant".cyan().bold(), answer);
            Ok(())
        }
        Err(e) => Err(format!("Sorry, I couldn't process your question: {}", e).into()),
    }
}

fn cmd_list(
    analysis: &Path,
    filter: TypeFilter,
    search: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_analysis(analysis)?;

    let mut session = Session::new();
    session.load_document(doc);
    session.set_filter(filter);
    if let Some(q) = search {
        session.set_query(q);
    }
    let view = ViewModel::from_session(&session);

    if json {
        println!("{}", to_json(&view.rows, JsonFormat::Pretty)?);
        return Ok(());
    }

    println!("{}", view.count_label.cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if let Some(message) = &view.empty_message {
        println!("{}", message.dimmed());
        return Ok(());
    }

    for row in &view.rows {
        let tag = match row.content_type {
            pdflens::ContentType::Heading => row.content_type.label().yellow().bold(),
            _ => row.content_type.label().normal(),
        };
        println!(
            "{} {} {}",
            format!("[p{}]", row.page).dimmed(),
            tag,
            row.id.dimmed()
        );
        println!("    {}", row.text);
    }

    Ok(())
}

fn cmd_overlay(
    analysis: &Path,
    page: u32,
    paper: &str,
    scale: f64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_analysis(analysis)?;
    let page_count = doc.page_count();
    if page < 1 || page > page_count {
        return Err(pdflens::Error::PageOutOfRange(page, page_count).into());
    }

    let geometry = parse_paper(paper)?;
    let rendered = geometry.rendered_size(scale);
    let boxes = overlay_boxes(doc.items(), page, &geometry, rendered, None);

    if json {
        println!("{}", to_json(&boxes, JsonFormat::Pretty)?);
        return Ok(());
    }

    println!(
        "{} {} ({:.0}x{:.0} px)",
        "Page".cyan().bold(),
        page,
        rendered.width,
        rendered.height
    );
    println!("{}", "─".repeat(40).dimmed());
    for b in &boxes {
        println!(
            "{:<12} {:<10} left={:.1} top={:.1} width={:.1} height={:.1}",
            b.id,
            b.content_type.as_str(),
            b.rect.left,
            b.rect.top,
            b.rect.width,
            b.rect.height
        );
    }
    println!("\n{} {} boxes", "Done!".green().bold(), boxes.len());

    Ok(())
}

/// Parse `letter`, `a4`, or `WxH` (inches).
fn parse_paper(paper: &str) -> Result<PageGeometry, Box<dyn std::error::Error>> {
    match paper.trim().to_ascii_lowercase().as_str() {
        "letter" => Ok(PageGeometry::letter()),
        "a4" => Ok(PageGeometry::a4()),
        other => {
            let (w, h) = other
                .split_once('x')
                .ok_or_else(|| format!("Invalid paper size: {}", paper))?;
            let geometry = PageGeometry::new(w.trim().parse()?, h.trim().parse()?);
            if geometry
                .scale_factors(PixelSize::new(1.0, 1.0))
                .is_none()
            {
                return Err(format!("Invalid paper size: {}", paper).into());
            }
            Ok(geometry)
        }
    }
}

fn cmd_locate(
    text: &str,
    fragments: &Path,
    anchor_words: usize,
    max_window: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let fragments = load_fragments(fragments)?;
    let options = LocateOptions::new()
        .with_anchor_words(anchor_words)
        .with_max_window(max_window);

    let Some(found) = locate_match(text, &fragments, &options) else {
        println!("{}", "No match".yellow());
        return Ok(());
    };

    let stage = match found.kind {
        MatchKind::Anchor => "Anchor match".green().bold(),
        MatchKind::Fallback => "Fallback match".yellow().bold(),
    };
    println!("{}: {} fragments", stage, found.indices.len());
    for i in &found.indices {
        println!("  {} {}", format!("{:>4}", i).dimmed(), fragments[*i].text);
    }

    Ok(())
}

fn cmd_source(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    let boxes = parse_source(source);
    if boxes.is_empty() {
        return Err(format!("No valid regions in source: {}", source).into());
    }

    for b in &boxes {
        let corners: Vec<String> = b
            .points
            .iter()
            .map(|p| format!("({}, {})", p.x, p.y))
            .collect();
        println!("{} {}: {}", "Page".bold(), b.page, corners.join(" "));
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdflens".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Content overlay and Q&A for analyzed PDFs");
    println!();
    println!("License: MIT");
}
