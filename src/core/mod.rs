//! Core business logic - framework-agnostic catalog, calculator, comparison,
//! guide, chat, and contact operations. Nothing in here knows about Discord.

/// Treatment cost arithmetic and per-user calculator state
pub mod calculator;
/// The seeded, validated product catalog
pub mod catalog;
/// AI agronomist chat sessions
pub mod chat;
/// Price comparison filtering and row formatting
pub mod compare;
/// Simulated supplier contact form
pub mod contact;
/// Resource guides and the guide viewer
pub mod guides;
