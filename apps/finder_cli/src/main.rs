use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    config::{load_settings, normalize_service_url, Settings},
    InteractionOrchestrator, QueryOutcome, SessionEvent,
};
use shared::domain::{FilterKind, UserId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{parse_line, ReplCommand, HELP_TEXT};
use render::{render_catalog, render_persona, render_session};

#[derive(Parser, Debug)]
#[command(name = "finder", about = "Ask the recommendation service for tools")]
struct Args {
    /// Base URL of the recommendation service.
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    user_id: Option<String>,
    /// Category filter to select before querying; repeatable.
    #[arg(long = "category")]
    categories: Vec<String>,
    /// Pricing filter to select before querying; repeatable.
    #[arg(long = "pricing")]
    pricing: Vec<String>,
    /// Ask once and exit. Without a query an interactive prompt starts.
    query: Vec<String>,
}

fn apply_args(args: &Args, mut settings: Settings) -> Result<Settings> {
    if let Some(url) = &args.service_url {
        settings.service_url = normalize_service_url(url)?;
    }
    if let Some(user_id) = args.user_id.as_deref().map(str::trim) {
        if !user_id.is_empty() {
            settings.user_id = UserId::new(user_id);
        }
    }
    Ok(settings)
}

async fn toggle(client: &Arc<InteractionOrchestrator>, kind: FilterKind, value: &str) -> bool {
    let outcome = client.toggle_filter(kind, value).await;
    if let Some(telemetry) = outcome.telemetry {
        if let Err(err) = telemetry.await {
            warn!("click telemetry task failed: {err}");
        }
    }
    outcome.selected
}

async fn ask(client: &InteractionOrchestrator, query: &str) {
    match client.submit_query(query).await {
        QueryOutcome::Skipped => println!("Type a question first."),
        QueryOutcome::Superseded => {}
        QueryOutcome::Resolved | QueryOutcome::Failed(_) => {
            println!("{}", render_session(&client.snapshot().await));
        }
    }
}

fn spawn_persona_listener(client: &InteractionOrchestrator) -> tokio::task::JoinHandle<()> {
    let mut events = client.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::PersonaChanged(persona) => {
                    println!("{}", render_persona(Some(&persona)));
                }
                SessionEvent::TelemetryFailed(message) => {
                    warn!("persona not updated: {message}");
                }
                _ => {}
            }
        }
    })
}

async fn run_interactive(client: Arc<InteractionOrchestrator>) -> Result<()> {
    println!("{HELP_TEXT}\n");
    println!("{}", render_persona(client.snapshot().await.persona.as_deref()));
    let listener = spawn_persona_listener(&client);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{HELP_TEXT}"),
            ReplCommand::ShowFilters => println!("{}", render_catalog(&client.snapshot().await)),
            ReplCommand::ShowPersona => {
                println!("{}", render_persona(client.snapshot().await.persona.as_deref()));
            }
            ReplCommand::ToggleCategory(value) => {
                // Telemetry runs in the background; the listener prints the new persona.
                let outcome = client.toggle_filter(FilterKind::Category, &value).await;
                let state = if outcome.selected { "on" } else { "off" };
                println!("Category '{value}' {state}");
            }
            ReplCommand::TogglePricing(value) => {
                let outcome = client.toggle_filter(FilterKind::Pricing, &value).await;
                let state = if outcome.selected { "on" } else { "off" };
                println!("Pricing '{value}' {state}");
            }
            ReplCommand::ClickTool(name) => {
                if client.click_tool(&name).await.telemetry.is_none() {
                    println!("No such tool: {name}");
                    continue;
                }
                println!("{}", render_session(&client.snapshot().await));
            }
            ReplCommand::Query(query) => ask(&client, &query).await,
        }
    }

    listener.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = apply_args(&args, load_settings()?)?;

    let client = InteractionOrchestrator::from_settings(&settings)?;
    client.bootstrap().await;

    for category in &args.categories {
        toggle(&client, FilterKind::Category, category).await;
    }
    for tier in &args.pricing {
        toggle(&client, FilterKind::Pricing, tier).await;
    }

    let query = args.query.join(" ");
    if query.trim().is_empty() {
        return run_interactive(client).await;
    }

    ask(&client, &query).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_words_are_collected_positionally() {
        let args = Args::try_parse_from([
            "finder",
            "--category",
            "Writing",
            "--category",
            "Video",
            "--pricing",
            "Free",
            "essay",
            "helpers",
        ])
        .expect("parse");

        assert_eq!(args.categories, vec!["Writing", "Video"]);
        assert_eq!(args.pricing, vec!["Free"]);
        assert_eq!(args.query.join(" "), "essay helpers");
    }

    #[test]
    fn flags_override_loaded_settings() {
        let args = Args::try_parse_from([
            "finder",
            "--service-url",
            "http://localhost:4000/",
            "--user-id",
            " alice ",
        ])
        .expect("parse");

        let settings = apply_args(&args, Settings::default()).expect("settings");
        assert_eq!(settings.service_url, "http://localhost:4000");
        assert_eq!(settings.user_id, UserId::new("alice"));
    }

    #[test]
    fn missing_flags_keep_base_settings() {
        let args = Args::try_parse_from(["finder", "--user-id", "  "]).expect("parse");
        let base = Settings {
            service_url: "http://finder.internal:9000".into(),
            user_id: UserId::new("bob"),
            ..Settings::default()
        };

        let settings = apply_args(&args, base.clone()).expect("settings");
        assert_eq!(settings, base);
    }
}
