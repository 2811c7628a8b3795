//! Driven port producing opaque identifiers and login secrets.
//!
//! The portal service never interprets the strings it receives; it only
//! checks them for collisions against the record store before use.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh entity ids and secret codes.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityGenerator: Send + Sync {
    /// Identifier for a new user or complaint.
    fn entity_id(&self) -> String;

    /// Login secret for a new user.
    fn secret_code(&self) -> String;
}

/// Deterministic generator handing out counter-based hex strings.
///
/// Ids look like `00000001`, secrets like `5ec000000001`.
#[derive(Debug, Default)]
pub struct FixtureIdentityGenerator {
    ids: AtomicU64,
    secrets: AtomicU64,
}

impl FixtureIdentityGenerator {
    /// Start both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityGenerator for FixtureIdentityGenerator {
    fn entity_id(&self) -> String {
        let next = self.ids.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{next:08x}")
    }

    fn secret_code(&self) -> String {
        let next = self.secrets.fetch_add(1, Ordering::Relaxed) + 1;
        format!("5ec{next:09x}")
    }
}
