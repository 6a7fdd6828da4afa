//! Describing a REST resource so one generic view-model can manage it.

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};

/// Static facts about one resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Capitalized singular used in success notices ("Beneficiary").
    pub label: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    pub collection_path: &'static str,
    /// Where new records are posted when it differs from the collection.
    pub create_path: Option<&'static str>,
    pub required_fields: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    /// Ask the user before deleting.
    pub confirm_delete: bool,
}

impl ResourceDescriptor {
    #[must_use]
    pub fn create_path(&self) -> &'static str {
        self.create_path.unwrap_or(self.collection_path)
    }

    /// `{collection}/{id}`, the update and delete target.
    #[must_use]
    pub fn item_path(&self, id: i64) -> String {
        format!("{}/{id}", self.collection_path.trim_end_matches('/'))
    }

    #[must_use]
    pub fn fetch_failed(&self) -> String {
        format!("Failed to fetch {}", self.plural)
    }

    #[must_use]
    pub fn create_failed(&self) -> String {
        format!("Failed to create {}", self.singular)
    }

    #[must_use]
    pub fn update_failed(&self) -> String {
        format!("Failed to update {}", self.singular)
    }

    #[must_use]
    pub fn delete_failed(&self) -> String {
        format!("Failed to delete {}", self.singular)
    }

    #[must_use]
    pub fn created_notice(&self) -> String {
        format!("{} added successfully", self.label)
    }

    #[must_use]
    pub fn updated_notice(&self) -> String {
        format!("{} updated successfully", self.label)
    }

    #[must_use]
    pub fn deleted_notice(&self) -> String {
        format!("{} deleted successfully", self.label)
    }

    #[must_use]
    pub fn delete_prompt(&self) -> String {
        format!("Are you sure you want to delete this {}?", self.singular)
    }
}

/// Title / body pair a list page shows for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub body: String,
    pub meta: Option<String>,
}

impl Card {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            meta: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }
}

/// A record type the API exposes as a CRUD collection.
pub trait Resource: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Form contents submitted on create and update.
    type Draft: Serialize + Clone + Default + Debug + Send + Sync + for<'a> From<&'a Self>;

    const DESCRIPTOR: ResourceDescriptor;

    fn id(&self) -> i64;

    /// Text of a searchable field, by descriptor field name.
    fn field(&self, name: &str) -> Option<&str>;

    fn card(&self) -> Card;

    /// Required fields still empty in `draft`.
    fn missing_required(draft: &Self::Draft) -> Vec<&'static str>;

    /// Case-insensitive substring match across the descriptor's search fields.
    /// `needle` must already be lower-cased.
    #[must_use]
    fn matches(&self, needle: &str) -> bool {
        Self::DESCRIPTOR.search_fields.iter().any(|name| {
            self.field(name)
                .is_some_and(|value| value.to_lowercase().contains(needle))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: ResourceDescriptor = ResourceDescriptor {
        label: "Widget",
        singular: "widget",
        plural: "widgets",
        collection_path: "/widgets/",
        create_path: None,
        required_fields: &["name"],
        search_fields: &["name"],
        confirm_delete: false,
    };

    #[test]
    fn paths() {
        assert_eq!(WIDGETS.create_path(), "/widgets/");
        assert_eq!(WIDGETS.item_path(4), "/widgets/4");
        let custom = ResourceDescriptor {
            create_path: Some("/widgets/create"),
            ..WIDGETS
        };
        assert_eq!(custom.create_path(), "/widgets/create");
    }

    #[test]
    fn messages() {
        assert_eq!(WIDGETS.fetch_failed(), "Failed to fetch widgets");
        assert_eq!(WIDGETS.create_failed(), "Failed to create widget");
        assert_eq!(WIDGETS.created_notice(), "Widget added successfully");
        assert_eq!(
            WIDGETS.delete_prompt(),
            "Are you sure you want to delete this widget?"
        );
    }
}
