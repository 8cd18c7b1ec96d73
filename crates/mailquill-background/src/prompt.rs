//! Prompt assembly from configured templates.
//!
//! Templates carry fixed placeholder tokens that are substituted verbatim.
//! Substitution never leaves a dangling token behind: absent conversation
//! context becomes an explicit marker instead.

use mailquill_protocols::{
    SourceTag, SELECTED_TEXT_TOKEN, TALKING_POINTS_TOKEN, THREAD_CONTEXT_TOKEN,
};

/// Marker substituted for the context token when no conversation context
/// applies (generic editable surfaces).
pub const NOT_APPLICABLE: &str = "(not applicable)";

/// System instruction sent alongside compose prompts.
pub const COMPOSE_SYSTEM: &str =
    "You are an email writing assistant. Output only the requested text, \
     with no preamble and no surrounding quotes.";

/// System instruction sent alongside improve prompts.
pub const IMPROVE_SYSTEM: &str =
    "You are an editing assistant. Output only the revised text, with no \
     preamble and no surrounding quotes.";

/// Substitute both compose tokens into `template`.
pub fn render_compose(template: &str, talking_points: &str, thread_context: Option<&str>) -> String {
    template
        .replace(TALKING_POINTS_TOKEN, talking_points)
        .replace(
            THREAD_CONTEXT_TOKEN,
            thread_context.filter(|c| !c.trim().is_empty()).unwrap_or(NOT_APPLICABLE),
        )
}

/// Substitute the improve tokens into `template`.
///
/// The source tag does not change the substitution rules, only which
/// template/model the caller selected; it is accepted here so the absence
/// of context on the generic surface is deliberate at the call site.
pub fn render_improve(
    template: &str,
    selected_text: &str,
    thread_context: Option<&str>,
    _source: SourceTag,
) -> String {
    template.replace(SELECTED_TEXT_TOKEN, selected_text).replace(
        THREAD_CONTEXT_TOKEN,
        thread_context.filter(|c| !c.trim().is_empty()).unwrap_or(NOT_APPLICABLE),
    )
}
