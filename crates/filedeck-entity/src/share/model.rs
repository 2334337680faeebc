//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use filedeck_core::types::ShareId;

use crate::item::EntityType;

/// Access level granted by a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    /// Read-only access.
    View,
    /// Read-write access.
    Edit,
}

impl SharePermission {
    /// Return the permission as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

impl std::fmt::Display for SharePermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An account reference embedded in share records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareParty {
    /// Account email.
    pub email: String,
}

/// The shared item's display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedItem {
    /// Item name.
    pub name: String,
}

/// A grant giving another account access to a file or folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    /// Unique share identifier.
    pub id: ShareId,
    /// Shared item id.
    pub item_id: String,
    /// Shared item type.
    pub item_type: EntityType,
    /// Account that created the share.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Account the item is shared with.
    #[serde(default)]
    pub shared_with_id: Option<String>,
    /// Granted access level.
    pub permission: SharePermission,
    /// When the share was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Owner details, when expanded by the service.
    #[serde(default)]
    pub owner: Option<ShareParty>,
    /// Recipient details, when expanded by the service.
    #[serde(default)]
    pub shared_with: Option<ShareParty>,
    /// Item details, when expanded by the service.
    #[serde(default)]
    pub item: Option<SharedItem>,
}

impl Share {
    /// Display name of the shared item, falling back to its id.
    pub fn item_name(&self) -> &str {
        self.item.as_ref().map(|i| i.name.as_str()).unwrap_or(&self.item_id)
    }
}

/// Request body for granting access to an item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShare {
    /// Item id.
    #[validate(length(min = 1, message = "Item id is required"))]
    pub item_id: String,
    /// Item type.
    pub item_type: EntityType,
    /// Recipient email.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    /// Granted access level.
    pub permission: SharePermission,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_share_rejects_bad_email() {
        let req = CreateShare {
            item_id: "F1".to_string(),
            item_type: EntityType::Folder,
            email: "not-an-email".to_string(),
            permission: SharePermission::View,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_share_wire_shape() {
        let req = CreateShare {
            item_id: "a".to_string(),
            item_type: EntityType::File,
            email: "bob@example.com".to_string(),
            permission: SharePermission::Edit,
        };
        assert!(req.validate().is_ok());
        let json = serde_json::to_value(&req).expect("json");
        assert_eq!(
            json,
            serde_json::json!({"itemId": "a", "itemType": "file", "email": "bob@example.com", "permission": "edit"})
        );
    }
}
