//! Id-keyed item repository with fetch-on-miss.
//!
//! The store is seeded with the records of the bulk listing. When path resolution
//! needs a parent that was not part of that batch (the listing was limited, or the
//! folder is owned by someone else and was never listed), the store asks its
//! [`ItemFetcher`] for just that item, checks the answer and keeps it for the rest
//! of the run. Nothing is ever evicted or refetched.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::GdscanError;

/// The fields of an item needed to reconstruct its paths.
///
/// Records are immutable once created. Parent ids form a set: duplicates are
/// dropped, keeping the first occurrence so resolution order stays that of the
/// source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    id: String,
    name: String,
    parents: Vec<String>,
}

impl ItemRecord {
    /// Create a record. An empty `parents` list makes the item a root.
    pub fn new(id: impl Into<String>, name: impl Into<String>, parents: Vec<String>) -> Self {
        let mut unique = Vec::with_capacity(parents.len());
        for parent in parents {
            if !unique.contains(&parent) {
                unique.push(parent);
            }
        }
        Self {
            id: id.into(),
            name: name.into(),
            parents: unique,
        }
    }

    /// Create a root record (no parents).
    pub fn root(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, Vec::new())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent ids in source order.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Single-item fetch collaborator.
///
/// Given an id, returns that item's id, name and parents, or
/// [`GdscanError::NotFound`] when the id is unknown or inaccessible. Retrying
/// transient failures is the implementor's business; the store never retries.
pub trait ItemFetcher {
    /// Fetch the record for `id`.
    fn fetch_item(&self, id: &str) -> impl Future<Output = Result<ItemRecord, GdscanError>> + Send;
}

/// Repository of [`ItemRecord`]s keyed by id, populated lazily.
pub struct ItemStore<F> {
    fetcher: F,
    items: HashMap<String, Arc<ItemRecord>>,
    fetch_count: usize,
}

impl<F: ItemFetcher> ItemStore<F> {
    /// Create a store seeded with an initial batch.
    ///
    /// If the batch contains the same id twice the later record wins.
    pub fn new(fetcher: F, records: impl IntoIterator<Item = ItemRecord>) -> Self {
        let items: HashMap<_, _> =
            records.into_iter().map(|r| (r.id.clone(), Arc::new(r))).collect();
        debug!("Item store seeded with {} records", items.len());
        Self {
            fetcher,
            items,
            fetch_count: 0,
        }
    }

    /// Return the record for `id`, fetching and caching it on a miss.
    ///
    /// # Errors
    ///
    /// - [`GdscanError::NotFound`] (or any other error) from the fetcher, unchanged
    /// - [`GdscanError::Consistency`] if the fetched record carries a different id;
    ///   nothing is stored in that case
    pub async fn get_item(&mut self, id: &str) -> Result<Arc<ItemRecord>, GdscanError> {
        if let Some(item) = self.items.get(id) {
            trace!("Item store hit for {id}");
            return Ok(Arc::clone(item));
        }

        debug!("Fetching information for item {id}");
        self.fetch_count += 1;
        let record = self.fetcher.fetch_item(id).await?;
        if record.id != id {
            return Err(GdscanError::Consistency {
                requested: id.to_string(),
                returned: record.id,
            });
        }

        let record = Arc::new(record);
        self.items.insert(id.to_string(), Arc::clone(&record));
        Ok(record)
    }

    /// Whether `id` is already held, without fetching.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of calls made to the fetcher so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
