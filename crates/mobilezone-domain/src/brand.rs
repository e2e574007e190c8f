//! Brand module - selectable brand facets

use serde::{Deserialize, Serialize};

/// A selectable brand with a precomputed listing count
///
/// The count comes with the catalogue data and is not recomputed from the
/// live filtered set, so it can disagree with what a filter returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandFacet {
    /// Brand name, matched exactly against `PhoneRecord::brand`
    pub name: String,

    /// Precomputed listing count
    pub count: u32,

    /// Optional logo URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl BrandFacet {
    /// Create a facet without a logo
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
            logo: None,
        }
    }
}
