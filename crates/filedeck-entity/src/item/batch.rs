//! Batch mutation payloads and per-item results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use filedeck_core::types::FolderId;

use super::key::{EntityType, ItemKey};

/// Wire-level item reference sent to the batch endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchItem {
    /// Item id.
    pub id: String,
    /// Item entity type.
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

impl BatchItem {
    /// Create a batch item.
    pub fn new(id: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            id: id.into(),
            entity_type,
        }
    }

    /// The selection key this item refers to.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.id.clone(), self.entity_type)
    }
}

impl From<&ItemKey> for BatchItem {
    fn from(key: &ItemKey) -> Self {
        Self::new(key.id(), key.entity_type())
    }
}

/// The mutation applied by one batch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Soft-delete every item into the trash.
    Delete,
    /// Move every item under `target` (`None` = root).
    Move {
        /// Destination folder.
        target: Option<FolderId>,
    },
    /// Restore every item out of the trash.
    Restore,
}

impl BatchOperation {
    /// Endpoint suffix and log label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Move { .. } => "move",
            Self::Restore => "restore",
        }
    }

    /// Past-tense verb for result summaries.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Delete => "deleted",
            Self::Move { .. } => "moved",
            Self::Restore => "restored",
        }
    }
}

/// One successfully mutated item as reported by the service.
///
/// The service may omit the type; such an entry matches a requested
/// item by id alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Item id.
    pub id: String,
    /// Item entity type, when reported.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
}

/// One item the service failed to mutate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Item id.
    pub id: String,
    /// Item entity type, when reported.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    /// Service-provided reason.
    #[serde(default)]
    pub error: String,
}

/// Per-item outcome of a best-effort batch request.
///
/// `successes` and `errors` only ever mention requested items, but an item
/// may appear in neither. Callers treat anything not in `successes` as
/// not mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Items the service mutated.
    #[serde(default)]
    pub successes: Vec<BatchOutcome>,
    /// Items the service rejected.
    #[serde(default)]
    pub errors: Vec<BatchFailure>,
}

impl BatchResult {
    /// Requested keys confirmed by an entry in `successes`.
    ///
    /// A typed success confirms exactly its key. An untyped success confirms
    /// a requested item only when its id picks out one candidate: items
    /// already confirmed or rejected with a matching type are excluded, and
    /// an id still shared by several requested items confirms none of them.
    pub fn succeeded_keys(&self, requested: &[BatchItem]) -> Vec<ItemKey> {
        let mut confirmed: HashSet<ItemKey> = requested
            .iter()
            .filter(|item| {
                self.successes
                    .iter()
                    .any(|s| s.id == item.id && s.entity_type == Some(item.entity_type))
            })
            .map(BatchItem::key)
            .collect();

        for success in self.successes.iter().filter(|s| s.entity_type.is_none()) {
            let candidates: Vec<ItemKey> = requested
                .iter()
                .filter(|item| item.id == success.id && !self.rejected_with_type(item))
                .map(BatchItem::key)
                .filter(|key| !confirmed.contains(key))
                .collect();
            if let [only] = candidates.as_slice() {
                confirmed.insert(only.clone());
            }
        }

        requested
            .iter()
            .map(BatchItem::key)
            .filter(|key| confirmed.contains(key))
            .collect()
    }

    fn rejected_with_type(&self, item: &BatchItem) -> bool {
        self.errors
            .iter()
            .any(|e| e.id == item.id && e.entity_type == Some(item.entity_type))
    }

    /// Requested keys not confirmed as mutated, whether reported as errors or omitted.
    pub fn unconfirmed_keys(&self, requested: &[BatchItem]) -> Vec<ItemKey> {
        let succeeded: HashSet<ItemKey> = self.succeeded_keys(requested).into_iter().collect();
        requested
            .iter()
            .map(BatchItem::key)
            .filter(|key| !succeeded.contains(key))
            .collect()
    }

    /// Error message the service gave for `key`, if any.
    pub fn error_for(&self, key: &ItemKey) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.id == key.id() && e.entity_type.is_none_or(|t| t == key.entity_type()))
            .map(|e| e.error.as_str())
    }
}
