// ABOUTME: Terminal rendering for the copilot CLI
// ABOUTME: Prints the banner and streams assistant text incrementally from session snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

use std::collections::HashMap;
use std::io::{self, Write};

use alivee_copilot::client::{RejectReason, SessionSnapshot, SessionState, SubmitOutcome};
use alivee_copilot::constants::copilot;
use alivee_copilot::llm::MessageRole;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tracing::warn;
use uuid::Uuid;

/// Print the header, quick questions and command help
pub fn print_banner(quick_questions: &[&str]) {
    println!("{} | {}", copilot::ASSISTANT_NAME, copilot::ASSISTANT_TAGLINE);
    println!("{}", "=".repeat(60));
    if !quick_questions.is_empty() {
        println!("Perguntas rápidas:");
        for (number, question) in quick_questions.iter().enumerate() {
            println!("  {}. {question}", number + 1);
        }
    }
    println!("Comandos: /context <arquivo>, /context, /quit. Ctrl-C interrompe a resposta.");
}

pub fn print_prompt() {
    print!("\n{} > ", copilot::INPUT_PLACEHOLDER);
    flush();
}

pub fn print_notice(text: &str) {
    println!("[{text}]");
    print_prompt();
}

/// Report outcomes that leave no trace in the transcript
pub fn print_outcome(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Rejected(RejectReason::Busy) => print_notice("Aguarde a resposta atual"),
        SubmitOutcome::Rejected(RejectReason::EmptyInput) => print_prompt(),
        SubmitOutcome::Cancelled => println!("\n[Resposta interrompida]"),
        SubmitOutcome::Completed | SubmitOutcome::Failed(_) | SubmitOutcome::TimedOut => {}
    }
}

/// Consume snapshots until the chat is dropped
pub async fn render_snapshots(
    initial: SessionSnapshot,
    updates: UnboundedReceiver<SessionSnapshot>,
) {
    let mut printer = TranscriptPrinter::default();
    printer.render(&initial);
    print_prompt();

    let mut updates = UnboundedReceiverStream::new(updates);
    while let Some(snapshot) = updates.next().await {
        printer.render(&snapshot);
    }
    println!("\nAté logo!");
}

/// Prints only what was not printed before
#[derive(Default)]
struct TranscriptPrinter {
    printed: HashMap<Uuid, usize>,
    state: SessionState,
}

impl TranscriptPrinter {
    fn render(&mut self, snapshot: &SessionSnapshot) {
        for message in &snapshot.messages {
            let done = self.printed.get(&message.id).copied().unwrap_or(0);
            if message.role == MessageRole::User {
                self.printed.insert(message.id, message.content.len());
                continue;
            }

            let Some(fresh) = message.content.get(done..) else {
                continue;
            };
            if fresh.is_empty() {
                continue;
            }
            if done == 0 {
                print!("\n{}: ", copilot::ASSISTANT_NAME);
            }
            print!("{fresh}");
            self.printed.insert(message.id, message.content.len());
        }

        if snapshot.state == SessionState::Idle && self.state != SessionState::Idle {
            println!();
            print_prompt();
        }
        self.state = snapshot.state;
        flush();
    }
}

fn flush() {
    if let Err(e) = io::stdout().flush() {
        warn!("Failed to flush stdout: {e}");
    }
}
