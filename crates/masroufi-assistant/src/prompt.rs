//! System prompt for the finance assistant.

/// Placeholder sent when the caller supplies no financial context.
pub const NO_CONTEXT: &str = "No financial data available for this user.";

const PERSONA: &str = "You are Masroufi's AI financial assistant. You help users manage \
their personal finances: budgeting, saving, spending habits and financial goals. \
Keep answers concise, practical and actionable, and ground them in the user's own \
numbers when they are relevant.";

/// Build the system message. `user_context` is embedded verbatim; an empty or
/// absent context is replaced with [`NO_CONTEXT`].
pub fn system_prompt(user_context: Option<&str>) -> String {
    let context = user_context.filter(|c| !c.is_empty()).unwrap_or(NO_CONTEXT);
    format!("{PERSONA}\n\nUser financial context:\n{context}")
}
