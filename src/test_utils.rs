//! Shared test utilities for `FarmGuard`.
//!
//! Fixture products, the seeded catalog, and scripted chat backends so chat
//! behavior can be tested without a network.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        catalog::Catalog,
        chat::{AgronomistReply, ChatBackend, ConversationStarter, GroundingSource},
    },
    entities::{OUNCES_PER_ACRE, PackageUnit, Product, ProductType},
    errors::{Error, Result},
};
use async_trait::async_trait;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};
use tokio::sync::Notify;

/// The built-in catalog. Panics if it fails validation.
pub fn seeded_catalog() -> Catalog {
    Catalog::seeded().unwrap()
}

/// Creates a valid product with sensible defaults.
///
/// # Defaults
/// * price: 64.0 per 1 Gallon (0.5 per ounce)
/// * rate: 8-16 oz/acre
/// * crops: Corn
pub fn sample_product(id: &str, product_type: ProductType) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Test Product {id}"),
        manufacturer: "Test Co".to_string(),
        product_type,
        active_ingredient: "Testazine".to_string(),
        crops: vec!["Corn".to_string()],
        price: 64.0,
        package_size: 1.0,
        package_unit: PackageUnit::Gallon,
        rate_min: 8.0,
        rate_max: 16.0,
        rate_unit: OUNCES_PER_ACRE.to_string(),
    }
}

/// A reply carrying a single citation.
pub fn reply_with_source(text: &str, title: &str, uri: &str) -> AgronomistReply {
    AgronomistReply {
        text: text.to_string(),
        sources: vec![GroundingSource {
            title: title.to_string(),
            uri: uri.to_string(),
        }],
    }
}

/// Backend that plays back a fixed list of outcomes and records what it was sent.
/// Fails with [`Error::Agronomist`] once the script runs out.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<AgronomistReply>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<AgronomistReply>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Messages received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send_message(&self, text: &str) -> Result<AgronomistReply> {
        self.calls.lock().unwrap().push(text.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(Error::Agronomist {
                    message: "script exhausted".to_string(),
                })
            })
    }
}

/// Backend that never answers.
pub struct HangingBackend;

#[async_trait]
impl ChatBackend for HangingBackend {
    async fn send_message(&self, _text: &str) -> Result<AgronomistReply> {
        std::future::pending().await
    }
}

/// Backend that answers "released" only after [`GatedBackend::release`] is called.
#[derive(Default)]
pub struct GatedBackend {
    gate: Notify,
}

impl GatedBackend {
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl ChatBackend for GatedBackend {
    async fn send_message(&self, _text: &str) -> Result<AgronomistReply> {
        self.gate.notified().await;
        Ok(AgronomistReply {
            text: "released".to_string(),
            sources: Vec::new(),
        })
    }
}

/// Starter whose conversations all share one gated backend.
pub fn gated_starter(gate: &Arc<GatedBackend>) -> Arc<dyn ConversationStarter> {
    let gate = Arc::clone(gate);
    Arc::new(move || -> Arc<dyn ChatBackend> { Arc::clone(&gate) as Arc<dyn ChatBackend> })
}

/// Starter that gives every new conversation its own gated backend. The
/// returned list holds the backends in the order conversations were opened.
pub fn gated_starter_per_conversation()
-> (Arc<dyn ConversationStarter>, Arc<Mutex<Vec<Arc<GatedBackend>>>>) {
    let opened = Arc::new(Mutex::new(Vec::new()));
    let starter: Arc<dyn ConversationStarter> = {
        let opened = Arc::clone(&opened);
        Arc::new(move || -> Arc<dyn ChatBackend> {
            let backend = Arc::new(GatedBackend::default());
            opened.lock().unwrap().push(Arc::clone(&backend));
            backend
        })
    };
    (starter, opened)
}
