//! Audit log entries and change detection for item updates.

use crate::item::{ItemAttributes, ItemUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity recorded on audit entries when no actor is configured.
pub const DEFAULT_CHANGED_BY: &str = "admin";

/// The attribute an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditField {
    /// Synthetic entry written once when the item is created.
    Creation,
    Name,
    Description,
    Category,
    Price,
    Tags,
}

/// Mutable attributes in the order their changes are recorded.
pub const MUTABLE_FIELDS: [AuditField; 5] = [
    AuditField::Name,
    AuditField::Description,
    AuditField::Category,
    AuditField::Price,
    AuditField::Tags,
];

impl std::fmt::Display for AuditField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Creation => write!(f, "creation"),
            Self::Name => write!(f, "name"),
            Self::Description => write!(f, "description"),
            Self::Category => write!(f, "category"),
            Self::Price => write!(f, "price"),
            Self::Tags => write!(f, "tags"),
        }
    }
}

/// An immutable record of a single attribute change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Which attribute changed.
    pub field: AuditField,

    /// Value before the change; `None` for the creation entry.
    #[serde(default)]
    pub old_value: Option<Value>,

    /// Value after the change.
    #[serde(default)]
    pub new_value: Option<Value>,

    /// Who made the change.
    pub changed_by: String,

    /// When the change happened (ISO 8601 UTC).
    pub changed_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create the synthetic entry carrying an item's initial attributes.
    ///
    /// # Errors
    /// Returns an error if the attributes cannot be encoded as JSON.
    pub fn creation(
        attributes: &ItemAttributes,
        changed_by: impl Into<String>,
        changed_at: DateTime<Utc>,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            field: AuditField::Creation,
            old_value: None,
            new_value: Some(serde_json::to_value(attributes)?),
            changed_by: changed_by.into(),
            changed_at,
        })
    }

    /// Create an entry for a single attribute change.
    #[must_use]
    pub fn change(
        field: AuditField,
        old_value: Value,
        new_value: Value,
        changed_by: impl Into<String>,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            field,
            old_value: Some(old_value),
            new_value: Some(new_value),
            changed_by: changed_by.into(),
            changed_at,
        }
    }
}

/// Compute the audit entries an update would produce.
///
/// Only attributes present in `proposed` and different from `current` yield an
/// entry. Entries follow [`MUTABLE_FIELDS`] order regardless of how the update
/// was built. Tags compare order- and length-sensitively.
#[must_use]
#[allow(clippy::float_cmp)] // prices are compared for exact equality
pub fn compute_changes(
    current: &ItemAttributes,
    proposed: &ItemUpdate,
    changed_by: &str,
    changed_at: DateTime<Utc>,
) -> Vec<AuditEntry> {
    let mut changes = Vec::new();

    for field in MUTABLE_FIELDS {
        let diff = match field {
            AuditField::Name => proposed
                .name
                .as_ref()
                .filter(|name| **name != current.name)
                .map(|name| (Value::from(current.name.as_str()), Value::from(name.as_str()))),
            AuditField::Description => proposed
                .description
                .as_ref()
                .filter(|description| **description != current.description)
                .map(|description| {
                    (
                        Value::from(current.description.as_str()),
                        Value::from(description.as_str()),
                    )
                }),
            AuditField::Category => proposed
                .category
                .as_ref()
                .filter(|category| **category != current.category)
                .map(|category| {
                    (
                        Value::from(current.category.as_str()),
                        Value::from(category.as_str()),
                    )
                }),
            AuditField::Price => proposed
                .price
                .filter(|price| *price != current.price)
                .map(|price| (Value::from(current.price), Value::from(price))),
            AuditField::Tags => proposed
                .tags
                .as_ref()
                .filter(|tags| **tags != current.tags)
                .map(|tags| (Value::from(current.tags.clone()), Value::from(tags.clone()))),
            AuditField::Creation => None,
        };

        if let Some((old_value, new_value)) = diff {
            changes.push(AuditEntry::change(
                field, old_value, new_value, changed_by, changed_at,
            ));
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pen() -> ItemAttributes {
        ItemAttributes {
            name: "Pen".to_string(),
            description: String::new(),
            category: "Office".to_string(),
            price: 1.5,
            tags: vec!["blue".to_string()],
        }
    }

    #[test]
    fn test_empty_update_produces_nothing() {
        let changes = compute_changes(&pen(), &ItemUpdate::default(), "admin", Utc::now());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_equal_values_are_skipped() {
        let update = ItemUpdate::default()
            .with_name("Pen")
            .with_category("Office")
            .with_price(1.5)
            .with_tags(["blue"]);

        let changes = compute_changes(&pen(), &update, "admin", Utc::now());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_price_change() {
        let mut current = pen();
        current.price = 10.0;

        let same = compute_changes(
            &current,
            &ItemUpdate::default().with_price(10.0),
            "admin",
            Utc::now(),
        );
        assert!(same.is_empty());

        let changes = compute_changes(
            &current,
            &ItemUpdate::default().with_price(10.01),
            "admin",
            Utc::now(),
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, AuditField::Price);
        assert_eq!(changes[0].old_value, Some(json!(10.0)));
        assert_eq!(changes[0].new_value, Some(json!(10.01)));
    }

    #[test]
    fn test_tag_order_matters() {
        let mut current = pen();
        current.tags = vec!["a".to_string(), "b".to_string()];

        let changes = compute_changes(
            &current,
            &ItemUpdate::default().with_tags(["b", "a"]),
            "admin",
            Utc::now(),
        );

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, AuditField::Tags);
        assert_eq!(changes[0].old_value, Some(json!(["a", "b"])));
        assert_eq!(changes[0].new_value, Some(json!(["b", "a"])));
    }

    #[test]
    fn test_entries_follow_fixed_field_order() {
        let update = ItemUpdate::default()
            .with_tags(["red"])
            .with_price(3.0)
            .with_description("Gel ink")
            .with_name("Gel Pen");

        let changes = compute_changes(&pen(), &update, "alice", Utc::now());
        let fields: Vec<AuditField> = changes.iter().map(|c| c.field).collect();

        assert_eq!(
            fields,
            vec![
                AuditField::Name,
                AuditField::Description,
                AuditField::Price,
                AuditField::Tags
            ]
        );
        assert!(changes.iter().all(|c| c.changed_by == "alice"));
        assert!(changes.iter().all(|c| c.field != AuditField::Creation));
    }

    #[test]
    fn test_creation_entry() {
        let entry = AuditEntry::creation(&pen(), DEFAULT_CHANGED_BY, Utc::now()).unwrap();

        assert_eq!(entry.field, AuditField::Creation);
        assert!(entry.old_value.is_none());
        assert_eq!(
            entry.new_value,
            Some(json!({
                "name": "Pen",
                "description": "",
                "category": "Office",
                "price": 1.5,
                "tags": ["blue"]
            }))
        );
    }

    #[test]
    fn test_entry_serialization() {
        let entry = AuditEntry::change(
            AuditField::Category,
            json!("Office"),
            json!("Stationery"),
            "admin",
            Utc::now(),
        );
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains(r#""field":"category""#));
        assert!(json.contains(r#""oldValue":"Office""#));
        assert!(json.contains(r#""newValue":"Stationery""#));
        assert!(json.contains(r#""changedBy":"admin""#));
    }
}
