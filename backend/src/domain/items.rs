//! Demo item catalogue.
//!
//! `Item` is the declared response shape of `GET /items/`. The listing itself
//! only ever carries a name; the full shape is documented but never populated.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Declared item shape published in the OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Item name.
    #[schema(example = "Foo")]
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Optional tax amount.
    #[serde(default)]
    pub tax: Option<f64>,
    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Entry actually returned by the item listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemListing {
    /// Item name.
    pub name: String,
}

/// The fixed item listing.
///
/// # Examples
/// ```
/// use hello_timer::domain::list_items;
///
/// assert_eq!(list_items()[0].name, "Foo");
/// ```
#[must_use]
pub fn list_items() -> Vec<ItemListing> {
    vec![ItemListing {
        name: "Foo".to_owned(),
    }]
}
