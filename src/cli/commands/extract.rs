use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::analyze::{Analysis, analyze_text};
use crate::config::Config;
use crate::extract::{DocumentKind, ExtractionOutcome, Extractor};
use crate::insights::{ContentInsights, InsightsClient};

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static BRAIN: Emoji<'_, '_> = Emoji("🧠 ", "");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[!!] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(
    paths: Vec<PathBuf>,
    no_insights: bool,
    preserve_layout: Option<bool>,
) -> Result<()> {
    let started = Instant::now();

    println!();
    println!("{}", style(" DocSight - Document Analyzer ").bold().reverse());
    println!();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(preserve) = preserve_layout {
        config.extraction.preserve_layout = preserve;
    }

    // Collect documents
    print!("{}Scanning for documents... ", LOOKING_GLASS);
    let documents = collect_documents(&paths)?;
    println!(
        "{}",
        style(format!("found {}", documents.len())).green().bold()
    );

    if documents.is_empty() {
        println!();
        println!(
            "{}",
            style("No supported documents found (.pdf, .png, .jpg, .jpeg)").yellow()
        );
        return Ok(());
    }

    let extractor = Extractor::new(config.extraction.clone());

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{}{{spinner:.green}} [{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} {{msg}}",
                PAPER
            ))
            .unwrap()
            .progress_chars("━━╸━"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut outcomes: Vec<(String, DocumentKind, ExtractionOutcome)> = Vec::new();
    for (doc_path, kind) in &documents {
        let filename = doc_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        pb.set_message(format!("{}", style(&filename).dim()));

        let outcome = match std::fs::read(doc_path) {
            Ok(bytes) => extractor.extract(*kind, &bytes),
            Err(e) => ExtractionOutcome::Failed {
                reason: e.to_string(),
            },
        };
        outcomes.push((filename, *kind, outcome));
        pb.inc(1);
    }
    pb.finish_and_clear();

    // Per-file results
    let mut extracted: Vec<&str> = Vec::new();
    for (filename, kind, outcome) in &outcomes {
        match outcome {
            ExtractionOutcome::Extracted { text } => {
                println!("{}{}", PAPER, style(filename).cyan().bold());
                println!();
                println!("{}", text);
                println!();
                extracted.push(text);
            }
            ExtractionOutcome::NoText => {
                println!(
                    "{}{}: {}",
                    WARN,
                    style(filename).cyan().bold(),
                    style(outcome.render_text(*kind)).yellow()
                );
            }
            ExtractionOutcome::Failed { .. } => {
                println!(
                    "{}{}: {}",
                    CROSS,
                    style(filename).cyan().bold(),
                    style(outcome.render_text(*kind)).red()
                );
            }
        }
    }

    let combined = extracted.join("\n\n");
    if combined.is_empty() {
        println!();
        println!("{}", style("No text extracted; nothing to analyze").yellow());
        return Ok(());
    }

    let insights = if no_insights {
        ContentInsights::default()
    } else {
        let client = InsightsClient::new(&config.insights);
        if client.is_enabled() {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template(&format!("{}{{spinner:.green}} {{msg}}", BRAIN))
                    .unwrap(),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message("Generating content insights...");
            let insights = client.generate(&combined).await;
            spinner.finish_and_clear();
            insights
        } else {
            println!(
                "{}{}",
                WARN,
                style("No Gemini API key configured; AI insights skipped").yellow()
            );
            ContentInsights::default()
        }
    };

    println!();
    if let Some(analysis) = analyze_text(&combined, &insights) {
        print_analysis(&analysis);
    }

    println!();
    println!(
        "{}Done in {}",
        SPARKLE,
        style(HumanDuration(started.elapsed())).green().bold()
    );

    Ok(())
}

fn collect_documents(paths: &[PathBuf]) -> Result<Vec<(PathBuf, DocumentKind)>> {
    let mut documents = Vec::new();

    for path in paths {
        if path.is_file() {
            if let Some(kind) = kind_of(path) {
                documents.push((path.clone(), kind));
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file()
                    && let Some(kind) = kind_of(entry_path)
                {
                    documents.push((entry_path.to_path_buf(), kind));
                }
            }
        } else {
            anyhow::bail!("Path does not exist: {}", path.display());
        }
    }

    Ok(documents)
}

fn kind_of(path: &Path) -> Option<DocumentKind> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(DocumentKind::from_filename)
}

fn print_analysis(analysis: &Analysis) {
    let summary = &analysis.summary;

    println!("{}Analysis:", SPARKLE);
    bullet("Words", &summary.words);
    bullet("Characters", &summary.chars);
    bullet("Avg word length", &summary.avg_word_len);
    bullet("Hashtags", &summary.hashtags);
    bullet("Mentions", &summary.mentions);
    bullet("URLs", &summary.urls);
    bullet("Tone", &summary.tone);
    bullet("Sentiment", &summary.sentiment.compound);
    if !summary.top_keywords.is_empty() {
        let keywords = summary
            .top_keywords
            .iter()
            .map(|(word, count)| format!("{} ({})", word, count))
            .collect::<Vec<_>>()
            .join(", ");
        bullet("Top keywords", &keywords);
    }

    println!();
    println!("{}Suggested caption:", SPARKLE);
    println!("  {}", style(&analysis.ai_generated.caption).italic());
    if !analysis.ai_generated.recommended_hashtags.is_empty() {
        println!(
            "  {}",
            style(analysis.ai_generated.recommended_hashtags.join(" ")).cyan()
        );
    }

    if !analysis.engagement.is_empty() {
        println!();
        println!("{}Engagement ideas:", SPARKLE);
        for suggestion in &analysis.engagement {
            println!("  {} {}", style("•").cyan(), suggestion);
        }
    }
}

fn bullet(label: &str, value: &str) {
    println!("  {} {}: {}", style("•").cyan(), style(label).bold(), value);
}
