mod error;
mod output;
mod parser;
mod record;
mod settings;
mod source;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use parser::extract::llm::{GeminiClient, LlmExtractor};
use parser::extract::{RuleExtractor, SectionExtractor};
use parser::sections::{split_sections, BoundaryMarker};
use parser::Pipeline;
use settings::{ExtractorKind, Settings};

#[derive(Parser)]
#[command(name = "syllabus_extract", about = "Structure-aware syllabus to JSON extractor")]
struct Cli {
    /// Settings file (TOML). Missing file means built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract course records from a PDF or text document into JSON
    Extract {
        /// Syllabus PDF, or plain text from a previous `text` run
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "syllabus_extracted.json")]
        output: PathBuf,
        /// Override the configured extractor
        #[arg(short, long, value_enum)]
        extractor: Option<ExtractorKind>,
        /// Process sections one at a time
        #[arg(long)]
        sequential: bool,
    },
    /// Extract and normalize the document text only
    Text {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "data.txt")]
        output: PathBuf,
    },
    /// List the course sections found in a document
    Sections {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let marker = BoundaryMarker::new(&settings.boundary_pattern)?;

    match cli.command {
        Commands::Extract {
            input,
            output,
            extractor,
            sequential,
        } => {
            let kind = extractor.unwrap_or(settings.extractor);
            let extractor: Box<dyn SectionExtractor> = match kind {
                ExtractorKind::Rules => Box::new(RuleExtractor::new(marker.clone(), &settings)),
                ExtractorKind::Llm => Box::new(LlmExtractor::new(
                    GeminiClient::from_settings(&settings.llm)?,
                    marker.clone(),
                )),
            };
            run_extract(&settings, &marker, extractor.as_ref(), &input, &output, !sequential)?;
        }
        Commands::Text { input, output } => {
            let pages = source::open(&input)?;
            let doc = parser::normalize::normalize(pages);
            output::write_atomic(&output, doc.as_bytes())?;
            println!("Wrote {} characters to {:?}", doc.chars().count(), output);
        }
        Commands::Sections { input } => {
            let doc = parser::normalize::normalize(source::open(&input)?);
            let seg = split_sections(&doc, &marker, settings.min_section_chars);
            println!(
                "{} markers, {} sections, {} too short{}",
                seg.markers,
                seg.sections.len(),
                seg.dropped_short,
                if seg.fallback { " (no markers: whole document)" } else { "" }
            );
            for (i, s) in seg.sections.iter().enumerate() {
                let (title, _) =
                    parser::extract::header::title_and_group(s.text, &marker, settings.title_scan_lines);
                println!(
                    "{:>3} | @{:<8} | {:<6} | {:>7} chars | {}",
                    i + 1,
                    s.start,
                    marker.identifier(s.text).unwrap_or("-"),
                    s.text.chars().count(),
                    truncate(title.as_deref().unwrap_or("-"), 50)
                );
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn run_extract(
    settings: &Settings,
    marker: &BoundaryMarker,
    extractor: &dyn SectionExtractor,
    input: &Path,
    output_path: &Path,
    parallel: bool,
) -> anyhow::Result<()> {
    println!("Reading {:?}...", input);
    let pages = source::open(input).with_context(|| format!("Cannot read input {:?}", input))?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sections ({per_sec})")?
            .progress_chars("#>-"),
    );

    let extraction = Pipeline {
        marker,
        extractor,
        min_section_chars: settings.min_section_chars,
        parallel,
    }
    .run(pages, &pb);

    output::write_json_atomic(output_path, &extraction.output)?;
    extraction.summary.print();

    let courses = &extraction.output.courses;
    for (i, c) in courses.iter().take(5).enumerate() {
        println!(
            "  {}. {}: {} ({} modules)",
            i + 1,
            if c.course_code.is_empty() { "N/A" } else { c.course_code.as_str() },
            truncate(&c.title, 30),
            c.modules.len()
        );
    }
    if courses.len() > 5 {
        println!("  ... and {} more courses", courses.len() - 5);
    }
    println!("Saved {} courses to {:?}", courses.len(), output_path);
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
