//! MobileZone Catalogue
//!
//! The static catalogue source: an immutable collection of phone listings
//! and brand facets, available synchronously at startup.
//!
//! # Data format
//!
//! ```json
//! {
//!   "currency": "Rs.",
//!   "brands": [{ "name": "Samsung", "count": 145 }],
//!   "phones": [{ "id": "1", "name": "Galaxy S24 Ultra", "brand": "Samsung", ... }]
//! }
//! ```
//!
//! Brand counts are taken as given and never recomputed from the listings.
//!
//! # Examples
//!
//! ```
//! use mobilezone_catalogue::Catalogue;
//!
//! let catalogue = Catalogue::builtin().unwrap();
//! let samsung = catalogue.filter(Some("Samsung"), None);
//! assert!(samsung.iter().all(|p| p.brand == "Samsung"));
//! ```

#![warn(missing_docs)]

use mobilezone_domain::phone::SYNTHESIZED_ID_PREFIX;
use mobilezone_domain::{filter_phones, BrandFacet, PhoneRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Built-in catalogue shipped with the crate
const BUILTIN_CATALOGUE: &str = include_str!("../data/catalogue.json");

/// Currency label used when a data file does not name one
pub const DEFAULT_CURRENCY: &str = "Rs.";

/// Errors that can occur while loading a catalogue
#[derive(Error, Debug)]
pub enum CatalogueError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data is not valid catalogue JSON
    #[error("Invalid catalogue JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two listings share an id
    #[error("Duplicate phone id: {0}")]
    DuplicateId(String),

    /// A listing uses the id range reserved for search results
    #[error("Phone id '{0}' uses the reserved 'ai-' prefix")]
    ReservedId(String),

    /// A listing is malformed
    #[error("Invalid phone '{id}': {reason}")]
    InvalidPhone {
        /// Offending id
        id: String,
        /// What is wrong with it
        reason: String,
    },
}

/// On-disk shape of a catalogue
#[derive(Debug, Serialize, Deserialize)]
struct CatalogueData {
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default)]
    brands: Vec<BrandFacet>,
    phones: Vec<PhoneRecord>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Immutable collection of listings and brand facets
#[derive(Debug, Clone)]
pub struct Catalogue {
    currency: String,
    brands: Vec<BrandFacet>,
    phones: Vec<PhoneRecord>,
}

impl Catalogue {
    /// Build a catalogue, validating the listings
    ///
    /// # Errors
    ///
    /// Returns an error if ids repeat, use the reserved prefix, or a listing
    /// has an empty name or a negative or non-finite price.
    pub fn new(
        currency: impl Into<String>,
        brands: Vec<BrandFacet>,
        phones: Vec<PhoneRecord>,
    ) -> Result<Self, CatalogueError> {
        validate_phones(&phones)?;

        let mut seen = HashSet::new();
        for facet in &brands {
            if !seen.insert(facet.name.as_str()) {
                warn!("Brand facet '{}' listed more than once", facet.name);
            }
        }

        Ok(Self {
            currency: currency.into(),
            brands,
            phones,
        })
    }

    /// The catalogue shipped with the crate
    pub fn builtin() -> Result<Self, CatalogueError> {
        Self::from_json(BUILTIN_CATALOGUE)
    }

    /// Parse a catalogue from JSON text
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let data: CatalogueData = serde_json::from_str(json)?;
        let catalogue = Self::new(data.currency, data.brands, data.phones)?;
        debug!(
            "Loaded catalogue: {} phones, {} brands",
            catalogue.phones.len(),
            catalogue.brands.len()
        );
        Ok(catalogue)
    }

    /// Load a catalogue from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogueError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Serialize the catalogue back to pretty JSON
    pub fn to_json(&self) -> Result<String, CatalogueError> {
        let data = CatalogueData {
            currency: self.currency.clone(),
            brands: self.brands.clone(),
            phones: self.phones.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Currency label of the catalogue
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Brand facets with their static counts
    pub fn brands(&self) -> &[BrandFacet] {
        &self.brands
    }

    /// All listings in catalogue order
    pub fn phones(&self) -> &[PhoneRecord] {
        &self.phones
    }

    /// Look up a listing by id
    pub fn get(&self, id: &str) -> Option<&PhoneRecord> {
        self.phones.iter().find(|p| p.id == id)
    }

    /// Whether a brand is one of the facets
    pub fn has_brand(&self, name: &str) -> bool {
        self.brands.iter().any(|b| b.name == name)
    }

    /// Listings matching an optional brand and search term, in catalogue order
    pub fn filter(&self, brand: Option<&str>, term: Option<&str>) -> Vec<&PhoneRecord> {
        filter_phones(&self.phones, brand, term)
    }

    /// Number of listings
    pub fn len(&self) -> usize {
        self.phones.len()
    }

    /// Whether the catalogue has no listings
    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }
}

fn validate_phones(phones: &[PhoneRecord]) -> Result<(), CatalogueError> {
    let mut ids = HashSet::with_capacity(phones.len());

    for phone in phones {
        if phone.id.starts_with(SYNTHESIZED_ID_PREFIX) {
            return Err(CatalogueError::ReservedId(phone.id.clone()));
        }
        if !ids.insert(phone.id.as_str()) {
            return Err(CatalogueError::DuplicateId(phone.id.clone()));
        }
        if phone.name.trim().is_empty() {
            return Err(CatalogueError::InvalidPhone {
                id: phone.id.clone(),
                reason: "name is empty".to_string(),
            });
        }
        if !phone.price.is_finite() || phone.price < 0.0 {
            return Err(CatalogueError::InvalidPhone {
                id: phone.id.clone(),
                reason: format!("price {} is not a non-negative number", phone.price),
            });
        }
        if !(0.0..=5.0).contains(&phone.rating) {
            warn!("Phone '{}' has rating {} outside 0-5", phone.id, phone.rating);
        }
    }

    Ok(())
}
