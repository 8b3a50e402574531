// ABOUTME: Copilot persona constants for the chat session
// ABOUTME: Seeded greeting and the quick questions offered before the first exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

/// Display name of the assistant
pub const ASSISTANT_NAME: &str = "Copiloto Alivee";

/// Subtitle shown next to the assistant name
pub const ASSISTANT_TAGLINE: &str = "Especialista em NFS-e";

/// Greeting seeded into a new session; displayed but never sent upstream
pub const GREETING: &str = "Olá! Sou o Copiloto Alivee, seu assistente especializado em NFS-e e reforma tributária. Como posso ajudar você hoje?";

/// Suggested prompts offered while the transcript holds only the greeting
pub const QUICK_QUESTIONS: [&str; 4] = [
    "Como funciona o IBS/CBS?",
    "Validar esta nota fiscal",
    "Calcular créditos tributários",
    "Explicar campos da NFS-e",
];

/// Input placeholder
pub const INPUT_PLACEHOLDER: &str = "Digite sua pergunta...";
