use std::sync::Arc;

use anyhow::{Context, Result};
use console::{Emoji, style};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::extract::Extractor;
use crate::insights::InsightsClient;
use crate::web::{AppState, create_router};

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let insights = InsightsClient::new(&config.insights);
    let insights_enabled = insights.is_enabled();
    let state = AppState {
        extractor: Arc::new(Extractor::new(config.extraction)),
        insights: Arc::new(insights),
    };
    let router = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!();
    println!("{}", style(" DocSight - Document Analyzer ").bold().reverse());
    println!();
    println!(
        "{}Listening on {}",
        ROCKET,
        style(format!("http://{}", addr)).cyan().bold()
    );
    println!("{}Open it in a browser to upload PDFs or images", GLOBE);
    if !insights_enabled {
        println!(
            "{}{}",
            WARN,
            style("No Gemini API key configured; AI insights disabled").yellow()
        );
    }
    println!();

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
