//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `FarmGuard`: slash commands for
//! each section of the site (comparison, calculator, guides, agronomist chat,
//! contact), autocomplete handlers, and the shared bot context.

/// Discord command implementations (compare, calculate, guides, ask, contact, general)
pub mod commands;
/// Framework setup, error handling, and the client run loop
pub mod framework;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::Settings,
    core::{
        calculator::CalculatorSession, catalog::Catalog, chat::ChatDesk, guides::GuideLibrary,
        guides::GuideViewer,
    },
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

/// Discord caps message content at 2000 characters.
pub const MESSAGE_LIMIT: usize = 2000;

/// Shared data available to all bot commands.
///
/// The catalog and guides are read-only. Calculator and guide-viewer state is
/// kept per Discord user; chat sessions are kept per channel by the desk.
pub struct BotData {
    /// Read-only product catalog
    pub catalog: Arc<Catalog>,
    /// Read-only resource guides
    pub guides: GuideLibrary,
    /// Settings loaded at startup
    pub settings: Settings,
    /// AI agronomist conversations
    pub chat: ChatDesk,
    calculators: Mutex<HashMap<u64, CalculatorSession>>,
    viewers: Mutex<HashMap<u64, GuideViewer>>,
}

impl BotData {
    /// Creates a new `BotData` instance.
    /// This is typically called during bot initialization to set up the
    /// shared context for all commands.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, guides: GuideLibrary, settings: Settings, chat: ChatDesk) -> Self {
        Self {
            catalog,
            guides,
            settings,
            chat,
            calculators: Mutex::new(HashMap::new()),
            viewers: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` against the calling user's calculator session, creating it on first use.
    pub async fn with_calculator<R>(
        &self,
        user_id: u64,
        f: impl FnOnce(&mut CalculatorSession) -> R,
    ) -> R {
        let mut calculators = self.calculators.lock().await;
        let labor = self.settings.calculator.default_labor_cost_per_acre;
        let session = calculators
            .entry(user_id)
            .or_insert_with(|| CalculatorSession::new(labor));
        f(session)
    }

    /// Runs `f` against the calling user's guide viewer, creating it on first use.
    pub async fn with_viewer<R>(&self, user_id: u64, f: impl FnOnce(&mut GuideViewer) -> R) -> R {
        let mut viewers = self.viewers.lock().await;
        f(viewers.entry(user_id).or_default())
    }
}

/// Cuts `text` to fit in one Discord message, marking the cut with an ellipsis.
#[must_use]
pub fn fit_message(text: &str) -> String {
    if text.chars().count() <= MESSAGE_LIMIT {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MESSAGE_LIMIT - 1).collect();
    cut.push('…');
    cut
}

pub use commands::*;
pub use handlers::*;
