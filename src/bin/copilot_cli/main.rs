// ABOUTME: Copilot CLI - interactive terminal chat with the Copiloto Alivee
// ABOUTME: Streams replies from the proxy and renders them from session snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee
//!
//! Usage:
//! ```bash
//! # Talk to a local proxy
//! copilot-cli
//!
//! # Talk to a deployment, attaching an extracted invoice
//! copilot-cli --base-url https://project.example.co --key pk_... --context nota.json
//! ```
//!
//! In the session: type a question, a quick-question number, `/context <file>`,
//! `/context` to detach, or `/quit`. Ctrl-C cancels a reply in progress.

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use alivee_copilot::client::{ChatOptions, CopilotChat, CopilotContext, HttpTransport};
use alivee_copilot::config::ClientConfig;
use alivee_copilot::logging::LoggingConfig;
use anyhow::Result;
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "copilot-cli",
    about = "Copiloto Alivee terminal chat",
    long_about = "Interactive chat with the Copiloto Alivee, the NFS-e and tax reform assistant."
)]
struct Cli {
    /// Proxy base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Platform bearer credential override
    #[arg(long)]
    key: Option<String>,

    /// JSON file describing the invoice under review
    #[arg(long)]
    context: Option<PathBuf>,
}

/// One line of user input
enum Input {
    Quit,
    Context(Option<PathBuf>),
    Message(String),
    Nothing,
}

fn parse_input(line: &str, quick_questions: &[&str]) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Nothing;
    }
    if line == "/quit" || line == "/sair" {
        return Input::Quit;
    }
    if let Some(rest) = line.strip_prefix("/context") {
        let path = rest.trim();
        return Input::Context((!path.is_empty()).then(|| PathBuf::from(path)));
    }
    if let Some(question) = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| quick_questions.get(index))
    {
        return Input::Message((*question).to_owned());
    }
    Input::Message(line.to_owned())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    LoggingConfig::for_cli().init()?;

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(key) = cli.key {
        config.publishable_key = Some(key);
    }
    config.validate()?;
    info!(endpoint = %config.endpoint(), "Copilot CLI starting");

    let transport = Arc::new(HttpTransport::new(&config)?);
    let shutdown = CancellationToken::new();
    let options = ChatOptions {
        shutdown: shutdown.clone(),
        ..ChatOptions::from_config(&config)
    };
    let (chat, updates) = CopilotChat::new(transport, options);

    if let Some(path) = cli.context {
        chat.set_context(Some(CopilotContext::from_json_file(&path)?))
            .await;
        render::print_notice(&format!("Contexto carregado de {}", path.display()));
    }

    let initial = chat.snapshot().await;
    render::print_banner(chat.quick_questions().await);
    let renderer = tokio::spawn(render::render_snapshots(initial, updates));

    let result = run_repl(&chat).await;

    shutdown.cancel();
    drop(chat);
    if let Err(e) = renderer.await {
        warn!("Renderer task failed: {e}");
    }
    result
}

async fn run_repl(chat: &CopilotChat) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            return Ok(());
        };

        match parse_input(&line, chat.quick_questions().await) {
            Input::Quit => return Ok(()),
            Input::Nothing => render::print_prompt(),
            Input::Context(None) => {
                chat.set_context(None).await;
                render::print_notice("Contexto removido");
            }
            Input::Context(Some(path)) => match CopilotContext::from_json_file(&path) {
                Ok(context) => {
                    chat.set_context(Some(context)).await;
                    render::print_notice(&format!("Contexto carregado de {}", path.display()));
                }
                Err(e) => render::print_notice(&e.message),
            },
            Input::Message(text) => {
                let worker = chat.clone();
                let mut exchange = tokio::spawn(async move { worker.submit(&text).await });

                let outcome = tokio::select! {
                    joined = &mut exchange => joined?,
                    _ = signal::ctrl_c() => {
                        chat.cancel().await;
                        exchange.await?
                    }
                };
                render::print_outcome(&outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTIONS: [&str; 2] = ["Como funciona o IBS/CBS?", "Validar esta nota fiscal"];

    #[test]
    fn test_numbers_select_quick_questions() {
        assert!(matches!(parse_input("2", &QUESTIONS), Input::Message(text) if text == QUESTIONS[1]));
        assert!(matches!(parse_input("3", &QUESTIONS), Input::Message(text) if text == "3"));
        assert!(matches!(parse_input("0", &QUESTIONS), Input::Message(text) if text == "0"));
    }

    #[test]
    fn test_commands() {
        assert!(matches!(parse_input("/quit", &QUESTIONS), Input::Quit));
        assert!(matches!(parse_input("/context", &QUESTIONS), Input::Context(None)));
        assert!(matches!(
            parse_input("/context nota.json", &QUESTIONS),
            Input::Context(Some(path)) if path == PathBuf::from("nota.json")
        ));
        assert!(matches!(parse_input("   ", &QUESTIONS), Input::Nothing));
    }
}
