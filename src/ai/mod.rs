//! External AI backends for the agronomist chat.

/// Google Gemini `generateContent` client
pub mod gemini;

pub use gemini::{GeminiClient, GeminiConfig, GeminiConversation};
