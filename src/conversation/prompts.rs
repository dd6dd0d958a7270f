//! The two fixed message sets for the conversation flow.
//!
//! User-visible conversation replies always come from one of these sets;
//! internal error detail is logged, never shown. The admin command surface
//! (see `commands.rs`) replies in English only.

use crate::lang::Locale;

/// Localized strings for one locale.
pub struct MessageSet {
    /// Prompt #1 — asks for the problem description.
    pub prompt_details: &'static str,
    /// Prompt #2 — asks for a short title.
    pub prompt_title: &'static str,
    /// Prompt #3 — asks for evidence attachments.
    pub prompt_evidence: &'static str,
    /// Generic submission failure.
    pub failure: &'static str,
    /// Channel has no task list bound.
    pub unconfigured: &'static str,
}

const ENGLISH: MessageSet = MessageSet {
    prompt_details: "👋 Hi! What task or problem would you like to report? \
                     Please provide the url where the problem is happening",
    prompt_title: "Got it! Please provide a short title for this task.",
    prompt_evidence: "Great! now, could you attach any related evidence like \
                      screenshots or screen recordings?",
    failure: "🚨 There was an error creating the task.",
    unconfigured: "⚠️ This channel is not linked to a task list yet. Ask an \
                   administrator to run `configure-list <listId>` here first.",
};

const SPANISH: MessageSet = MessageSet {
    prompt_details: "👋 ¡Hola! ¿Qué tarea o problema quieres reportar? \
                     Por favor incluye la url donde ocurre el problema",
    prompt_title: "¡Entendido! Ahora dame un título corto para esta tarea.",
    prompt_evidence: "¡Perfecto! ¿Puedes adjuntar evidencia relacionada, como \
                      capturas de pantalla o grabaciones?",
    failure: "🚨 Hubo un error al crear la tarea.",
    unconfigured: "⚠️ Este canal todavía no está vinculado a una lista de tareas. \
                   Pide a un administrador que ejecute `configure-list <listId>` \
                   aquí primero.",
};

/// The message set for a locale.
pub fn messages(locale: Locale) -> &'static MessageSet {
    match locale {
        Locale::English => &ENGLISH,
        Locale::Spanish => &SPANISH,
    }
}

/// Success reply carrying the created task id.
pub fn success_reply(locale: Locale, task_id: &str) -> String {
    match locale {
        Locale::English => format!(
            "✅ Success! Your task has been created. Reference number: **{task_id}**"
        ),
        Locale::Spanish => format!(
            "✅ ¡Listo! Tu tarea ha sido creada. Número de referencia: **{task_id}**"
        ),
    }
}
