//! Inventory item model.

use crate::audit::AuditEntry;
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix shared by every item identifier.
pub const ITEM_ID_PREFIX: &str = "itm_";

/// Generate a fresh item identifier (e.g., "itm_3f2a...").
#[must_use]
pub fn new_item_id() -> String {
    format!("{ITEM_ID_PREFIX}{}", Uuid::new_v4().as_simple())
}

/// Check whether a string has the shape of an item identifier.
#[must_use]
pub fn is_valid_item_id(id: &str) -> bool {
    id.strip_prefix(ITEM_ID_PREFIX).is_some_and(|hex| {
        hex.len() == 32 && hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    })
}

/// Split a comma-separated tag list, trimming entries and dropping blanks.
#[must_use]
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A catalog record tracked by the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Category label (empty when uncategorized).
    #[serde(default)]
    pub category: String,

    /// Unit price, never negative.
    pub price: f64,

    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Append-only history of attribute changes.
    #[serde(default)]
    pub audit_log: Vec<AuditEntry>,

    /// Creation timestamp (ISO 8601 UTC).
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (ISO 8601 UTC).
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Build a freshly created item from validated attributes.
    #[must_use]
    pub fn from_attributes(
        id: impl Into<String>,
        attributes: ItemAttributes,
        now: DateTime<Utc>,
    ) -> Self {
        let ItemAttributes {
            name,
            description,
            category,
            price,
            tags,
        } = attributes;

        Self {
            id: id.into(),
            name,
            description,
            category,
            price,
            tags,
            audit_log: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot the mutable attributes.
    #[must_use]
    pub fn attributes(&self) -> ItemAttributes {
        ItemAttributes {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            price: self.price,
            tags: self.tags.clone(),
        }
    }

    /// Apply the attributes present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: &ItemUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(description) = &update.description {
            self.description.clone_from(description);
        }
        if let Some(category) = &update.category {
            self.category.clone_from(category);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(tags) = &update.tags {
            self.tags.clone_from(tags);
        }
    }

    /// Check if the item carries a tag (exact match).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// The mutable attributes of an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemAttributes {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub tags: Vec<String>,
}

/// Attributes supplied when creating an item.
///
/// Every field is optional at the wire level so that a missing `name` or
/// `price` surfaces as a validation error rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NewItem {
    /// Create a request with the two required attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            ..Default::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Validate required attributes and fill in defaults.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` if `name` or `price` is missing or malformed.
    pub fn validate(self) -> Result<ItemAttributes> {
        let name = self
            .name
            .ok_or_else(|| CoreError::validation("name is required"))?;
        check_name(&name)?;

        let price = self
            .price
            .ok_or_else(|| CoreError::validation("price is required"))?;
        check_price(price)?;

        Ok(ItemAttributes {
            name,
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            price,
            tags: self.tags.unwrap_or_default(),
        })
    }
}

/// A partial update: only the attributes present are changed.
///
/// Unknown keys are ignored and `null` is read as "not supplied".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ItemUpdate {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// True when no attribute is supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.tags.is_none()
    }

    /// Validate only the attributes being changed.
    ///
    /// Attributes left out of the update are never inspected, so an item whose
    /// stored values predate a stricter rule can still be edited.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` if a supplied attribute is malformed.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name must not be empty"));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::validation(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_item_defaults() {
        let attrs = NewItem::new("Widget", 9.99).validate().unwrap();

        assert_eq!(attrs.name, "Widget");
        assert_eq!(attrs.price, 9.99);
        assert_eq!(attrs.description, "");
        assert_eq!(attrs.category, "");
        assert!(attrs.tags.is_empty());
    }

    #[test]
    fn test_new_item_requires_name_and_price() {
        let missing_name = NewItem {
            price: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(missing_name.validate(), Err(CoreError::Validation(_))));

        let missing_price = NewItem {
            name: Some("Pen".to_string()),
            ..Default::default()
        };
        assert!(matches!(missing_price.validate(), Err(CoreError::Validation(_))));

        assert!(matches!(
            NewItem::new("   ", 1.0).validate(),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            NewItem::new("Pen", -0.5).validate(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_update_validates_only_supplied_fields() {
        assert!(ItemUpdate::default().validate().is_ok());
        assert!(ItemUpdate::default().with_category("").validate().is_ok());
        assert!(ItemUpdate::default().with_name("").validate().is_err());
        assert!(ItemUpdate::default().with_price(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_apply_is_partial() {
        let attrs = NewItem::new("Pen", 1.5)
            .with_category("Office")
            .with_tags(["blue"])
            .validate()
            .unwrap();
        let mut item = Item::from_attributes(new_item_id(), attrs, Utc::now());

        item.apply(&ItemUpdate::default().with_price(2.0));

        assert_eq!(item.price, 2.0);
        assert_eq!(item.name, "Pen");
        assert_eq!(item.category, "Office");
        assert_eq!(item.tags, vec!["blue"]);
    }

    #[test]
    fn test_update_ignores_unknown_and_null_keys() {
        let update: ItemUpdate =
            serde_json::from_str(r#"{"colour": "red", "description": null}"#).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(parse_tag_list(" a, b,,c "), vec!["a", "b", "c"]);
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list(" , ").is_empty());
    }

    #[test]
    fn test_item_id_shape() {
        let id = new_item_id();
        assert!(is_valid_item_id(&id));
        assert!(!is_valid_item_id("itm_../../etc"));
        assert!(!is_valid_item_id("3f2a"));
        assert!(!is_valid_item_id(&id.to_uppercase()));
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let attrs = NewItem::new("Pen", 1.5).validate().unwrap();
        let item = Item::from_attributes(new_item_id(), attrs, Utc::now());
        let json = serde_json::to_value(&item).unwrap();

        assert!(json.get("auditLog").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
