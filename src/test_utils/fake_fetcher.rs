//! In-memory fetch collaborator.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::GdscanError;
use crate::store::{ItemFetcher, ItemRecord};

/// [`ItemFetcher`] backed by a map, recording every id it is asked for.
///
/// Unknown ids fail with [`GdscanError::NotFound`]. An alias answers a request for
/// one id with a record carrying another id, to simulate an inconsistent service.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    records: HashMap<String, ItemRecord>,
    aliases: HashMap<String, ItemRecord>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    /// A fetcher that knows no items.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetcher that knows the given records.
    pub fn with_records(records: impl IntoIterator<Item = ItemRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id().to_string(), r)).collect(),
            ..Self::default()
        }
    }

    /// Answer requests for `requested` with `record`, whatever its id.
    #[must_use]
    pub fn with_alias(mut self, requested: impl Into<String>, record: ItemRecord) -> Self {
        self.aliases.insert(requested.into(), record);
        self
    }

    /// Every requested id, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// How many times `id` was requested.
    pub fn call_count(&self, id: &str) -> usize {
        self.calls().iter().filter(|c| *c == id).count()
    }
}

impl ItemFetcher for FakeFetcher {
    async fn fetch_item(&self, id: &str) -> Result<ItemRecord, GdscanError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(id.to_string());
        }

        self.aliases.get(id).or_else(|| self.records.get(id)).cloned().ok_or_else(|| {
            GdscanError::NotFound {
                id: id.to_string(),
            }
        })
    }
}
