//! Root-to-item path resolution.
//!
//! Drive items form a directed acyclic graph: a file can sit in several folders,
//! and so can each of those folders. [`PathResolver`] turns an item id into every
//! path from a root down to that item by walking `parents` edges until it reaches
//! records without parents.
//!
//! # Algorithm
//!
//! Resolution is a depth-first walk over an explicit stack of frames, one per item
//! whose paths are being computed:
//!
//! 1. A memoized item answers immediately.
//! 2. Otherwise its record is taken from the [`ItemStore`] (fetched on a miss) and
//!    each parent is visited in source order, skipping parents already memoized.
//! 3. Once every parent is resolved, the item's paths are each parent's paths (in
//!    parent order, then in the parent's own order) with the item's name appended,
//!    or the single one-segment path for a root. The result is memoized.
//!
//! The memo is a side table owned by the resolver, so records stay immutable and
//! each id is computed once per run. Visiting a parent that is still on the stack
//! means the graph loops; resolution stops with [`GdscanError::Cycle`] instead of
//! recursing forever. The walk never recurses, so deep folder chains cannot exhaust
//! the call stack.
//!
//! Paths are not deduplicated: two distinct parents whose paths happen to spell the
//! same names produce the same string twice.
//!
//! # Example
//!
//! ```rust,no_run
//! use gdscan::resolver::PathResolver;
//! use gdscan::store::{ItemRecord, ItemStore};
//! # use gdscan::test_utils::FakeFetcher;
//!
//! # async fn example() -> Result<(), gdscan::core::GdscanError> {
//! let records = vec![
//!     ItemRecord::root("a", "A"),
//!     ItemRecord::root("b", "B"),
//!     ItemRecord::new("d", "D", vec!["a".into(), "b".into()]),
//! ];
//! let mut resolver = PathResolver::new(ItemStore::new(FakeFetcher::new(), records));
//!
//! let paths = resolver.resolve_encoded("d").await?;
//! assert_eq!(paths, ["A/D", "B/D"]);
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::codec::ItemPath;
use crate::core::GdscanError;
use crate::store::{ItemFetcher, ItemRecord, ItemStore};


/// Resolved paths of one item, shared between the memo and callers.
pub type ItemPaths = Arc<[ItemPath]>;

/// An item whose paths are being computed.
struct Frame {
    record: Arc<ItemRecord>,
    /// Index of the next parent to visit.
    next_parent: usize,
}

/// Memoizing multi-parent path resolver over an [`ItemStore`].
pub struct PathResolver<F> {
    store: ItemStore<F>,
    memo: HashMap<String, ItemPaths>,
}

impl<F: ItemFetcher> PathResolver<F> {
    pub fn new(store: ItemStore<F>) -> Self {
        Self {
            store,
            memo: HashMap::new(),
        }
    }

    /// Resolve every root-to-`id` path.
    ///
    /// Repeated calls for the same id, and calls for any ancestor resolved along the
    /// way, return the memoized result without touching the store.
    ///
    /// # Errors
    ///
    /// - [`GdscanError::NotFound`] if the item or any ancestor cannot be fetched
    /// - [`GdscanError::Consistency`] if the fetcher answers with the wrong item
    /// - [`GdscanError::Cycle`] if the parent graph loops
    ///
    /// On error nothing is memoized for `id`; ancestors fully resolved before the
    /// failure stay memoized.
    pub async fn resolve(&mut self, id: &str) -> Result<ItemPaths, GdscanError> {
        if let Some(paths) = self.memo.get(id) {
            trace!("Path memo hit for {id}");
            return Ok(Arc::clone(paths));
        }

        let record = self.store.get_item(id).await?;
        // Ids of the frames on `stack`.
        let mut in_progress = HashSet::from([record.id().to_string()]);
        let mut stack = vec![Frame {
            record,
            next_parent: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let pending = frame.record.parents().get(frame.next_parent).cloned();
            match pending {
                Some(parent_id) => {
                    frame.next_parent += 1;
                    if self.memo.contains_key(&parent_id) {
                        continue;
                    }
                    if in_progress.contains(&parent_id) {
                        let start =
                            stack.iter().position(|f| f.record.id() == parent_id).unwrap_or(0);
                        return Err(cycle_error(&stack[start..], &parent_id));
                    }
                    let record = self.store.get_item(&parent_id).await?;
                    in_progress.insert(parent_id);
                    stack.push(Frame {
                        record,
                        next_parent: 0,
                    });
                }
                None => {
                    let record = Arc::clone(&frame.record);
                    stack.pop();
                    in_progress.remove(record.id());

                    let paths = self.combine(&record);
                    debug!("Resolved {} path(s) for {}", paths.len(), record.id());
                    self.memo.insert(record.id().to_string(), Arc::clone(&paths));

                    if stack.is_empty() {
                        return Ok(paths);
                    }
                }
            }
        }

        unreachable!("the bottom frame returns when it is popped")
    }

    /// Resolve `id` and return the encoded path strings.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    pub async fn resolve_encoded(&mut self, id: &str) -> Result<Vec<String>, GdscanError> {
        let paths = self.resolve(id).await?;
        Ok(paths.iter().map(|p| p.encoded().to_string()).collect())
    }

    /// Memoized paths for `id`, if it has been resolved.
    pub fn cached(&self, id: &str) -> Option<&ItemPaths> {
        self.memo.get(id)
    }

    /// Number of memoized items.
    pub fn cached_len(&self) -> usize {
        self.memo.len()
    }

    pub fn store(&self) -> &ItemStore<F> {
        &self.store
    }

    /// Paths of `record`, given that all of its parents are memoized.
    fn combine(&self, record: &ItemRecord) -> ItemPaths {
        if record.is_root() {
            return Arc::from(vec![ItemPath::root(record.name())]);
        }

        let mut paths = Vec::new();
        for parent_id in record.parents() {
            let parent_paths = &self.memo[parent_id.as_str()];
            paths.extend(parent_paths.iter().map(|p| p.append(record.name())));
        }
        Arc::from(paths)
    }
}

fn cycle_error(frames: &[Frame], reentered: &str) -> GdscanError {
    let chain = frames
        .iter()
        .map(|f| f.record.id())
        .chain(std::iter::once(reentered))
        .collect::<Vec<_>>()
        .join(" → ");
    GdscanError::Cycle {
        chain,
    }
}
