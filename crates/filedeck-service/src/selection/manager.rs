//! Selection set keyed by `(entity type, id)`.

use std::collections::HashSet;

use filedeck_entity::{BatchItem, EntityType, File, Folder, ItemKey};

/// The set of items currently selected in one view.
///
/// Owned by exactly one view. The view clears it on navigation; the batch
/// coordinator removes only the keys a batch confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    keys: HashSet<ItemKey>,
}

impl SelectionManager {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `key`. Returns whether it is now selected.
    pub fn toggle(&mut self, key: ItemKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Flip membership of the item with this id and type.
    pub fn toggle_item(&mut self, id: impl Into<String>, entity_type: EntityType) -> bool {
        self.toggle(ItemKey::new(id, entity_type))
    }

    /// Clear a non-empty selection, or select every listed item when empty.
    pub fn select_all(&mut self, folders: &[Folder], files: &[File]) {
        if !self.keys.is_empty() {
            self.keys.clear();
            return;
        }
        self.keys.extend(folders.iter().map(|f| ItemKey::Folder(f.id.clone())));
        self.keys.extend(files.iter().map(|f| ItemKey::File(f.id.clone())));
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Drop the given keys, returning how many were selected.
    pub fn remove_keys<'a>(&mut self, keys: impl IntoIterator<Item = &'a ItemKey>) -> usize {
        keys.into_iter().filter(|key| self.keys.remove(*key)).count()
    }

    /// Whether `key` is selected.
    pub fn contains(&self, key: &ItemKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The batch toolbar is shown whenever anything is selected.
    pub fn toolbar_visible(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Selected keys in a stable order.
    pub fn keys(&self) -> Vec<ItemKey> {
        let mut keys: Vec<ItemKey> = self.keys.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// The selection as batch request items, in a stable order.
    pub fn batch_items(&self) -> Vec<BatchItem> {
        self.keys().iter().map(BatchItem::from).collect()
    }
}
