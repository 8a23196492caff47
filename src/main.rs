mod catalog;
mod cli;
mod client;
mod config;
mod generate;
mod output;
mod tui;

use std::io::{self, Read};

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use client::{now_millis, Language, VisualizationKind, VizClient};
use config::Config;
use generate::Orchestrator;
use output::{classify, ContentKind};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse_args();

    // CLI overrides land in the environment before the config is loaded
    if let Some(url) = args.backend_url.as_deref() {
        std::env::set_var("VIZ_BACKEND_URL", url);
    }
    if let Some(timeout) = args.timeout {
        std::env::set_var("VIZ_REQUEST_TIMEOUT", timeout.to_string());
    }

    let cfg = Config::load();

    if args.check {
        return run_health_check(&cfg).await;
    }

    let language = args
        .language
        .or_else(|| language_from_config(&cfg))
        .unwrap_or(Language::Python);
    let kind = args
        .kind
        .or_else(|| kind_from_config(&cfg))
        .unwrap_or(VisualizationKind::Static);

    // Piped stdin runs a single generation without the editor
    if !io::stdin().is_terminal() {
        let mut code = String::new();
        io::stdin()
            .read_to_string(&mut code)
            .context("failed to read script from stdin")?;
        return run_oneshot(&cfg, &code, language, kind).await;
    }

    let initial_code = match &args.file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };

    tui::run_tui(&cfg, language, kind, initial_code).await
}

/// One-shot pipe mode: submit stdin, print the content reference.
async fn run_oneshot(
    cfg: &Config,
    code: &str,
    language: Language,
    kind: VisualizationKind,
) -> Result<()> {
    let client = VizClient::from_config(cfg)?;
    let mut orchestrator = Orchestrator::new();

    let submission = match orchestrator.begin(code, language, kind) {
        Ok(submission) => submission,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            std::process::exit(1);
        }
    };

    match client.generate(&submission.request).await {
        Ok(artifact) => {
            let reference = client.asset_url(&artifact.output_url, now_millis());
            if let Some(logs) = artifact.logs.as_deref() {
                if !logs.trim().is_empty() {
                    eprintln!("{}", logs);
                }
            }
            let kind_label = match classify(&reference) {
                ContentKind::Image => "image",
                ContentKind::InteractiveDocument => "interactive document",
            };
            eprintln!("{} {}", "generated".green(), kind_label);
            println!("{}", reference);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            std::process::exit(1);
        }
    }
}

/// Query the service health endpoint and print per-service status.
async fn run_health_check(cfg: &Config) -> Result<()> {
    let client = VizClient::from_config(cfg)?;
    match client.health().await {
        Ok(health) => {
            println!("status: {}", health.status);
            if let Some(version) = health.version.as_deref() {
                println!("version: {}", version);
            }
            if let Some(environment) = health.environment.as_deref() {
                println!("environment: {}", environment);
            }
            for (service, up) in &health.services {
                if *up {
                    println!("  {} {}", "ok".green(), service);
                } else {
                    println!("  {} {}", "down".red(), service);
                }
            }
            if health.services.values().any(|up| !up) {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", format!("{:#}", err).red());
            std::process::exit(1);
        }
    }
}

fn language_from_config(cfg: &Config) -> Option<Language> {
    match cfg.get("VIZ_DEFAULT_LANGUAGE")?.to_ascii_lowercase().as_str() {
        "python" => Some(Language::Python),
        "r" => Some(Language::R),
        _ => None,
    }
}

fn kind_from_config(cfg: &Config) -> Option<VisualizationKind> {
    match cfg.get("VIZ_DEFAULT_TYPE")?.to_ascii_lowercase().as_str() {
        "static" => Some(VisualizationKind::Static),
        "interactive" => Some(VisualizationKind::Interactive),
        _ => None,
    }
}
