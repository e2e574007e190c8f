//! Catalogue filter - brand and free-text matching over listings
//!
//! Filtering never fails: an unknown brand matches nothing, an absent or
//! empty term matches everything. Results keep the input order.

use crate::phone::PhoneRecord;

/// Filter listings by an optional exact brand and an optional search term
///
/// The brand must equal `PhoneRecord::brand` exactly (case-sensitive, brand
/// values come from the facet list). The term is matched case-insensitively
/// as a substring of the name or the brand. An empty brand or term is treated
/// as absent.
///
/// # Examples
///
/// ```
/// use mobilezone_domain::{filter_phones, PhoneRecord, PhoneSpecs};
///
/// let phone = PhoneRecord {
///     id: "1".into(),
///     name: "Galaxy S24 Ultra".into(),
///     brand: "Samsung".into(),
///     price: 449_999.0,
///     currency: "Rs.".into(),
///     image: String::new(),
///     specs: PhoneSpecs::default(),
///     release_date: "2024".into(),
///     rating: 4.8,
///     is_trending: None,
/// };
/// let phones = vec![phone];
///
/// assert_eq!(filter_phones(&phones, Some("Samsung"), Some("ULTRA")).len(), 1);
/// assert!(filter_phones(&phones, Some("samsung"), None).is_empty());
/// ```
pub fn filter_phones<'a>(
    phones: &'a [PhoneRecord],
    brand: Option<&str>,
    term: Option<&str>,
) -> Vec<&'a PhoneRecord> {
    let filter = CatalogueFilter {
        brand: brand.map(str::to_string),
        term: term.map(str::to_string),
    };
    filter.apply(phones)
}

/// Reusable brand + term filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueFilter {
    /// Exact brand constraint
    pub brand: Option<String>,

    /// Free-text term
    pub term: Option<String>,
}

impl CatalogueFilter {
    /// A filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain to one brand
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Constrain to a search term
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Whether a single listing passes
    pub fn matches(&self, phone: &PhoneRecord) -> bool {
        self.matches_folded(phone, self.folded_term().as_deref())
    }

    /// Ordered subsequence of `phones` that passes
    pub fn apply<'a>(&self, phones: &'a [PhoneRecord]) -> Vec<&'a PhoneRecord> {
        let term = self.folded_term();
        phones
            .iter()
            .filter(|phone| self.matches_folded(phone, term.as_deref()))
            .collect()
    }

    fn folded_term(&self) -> Option<String> {
        self.term
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_folded(&self, phone: &PhoneRecord, folded_term: Option<&str>) -> bool {
        let brand_ok = match self.brand.as_deref() {
            None | Some("") => true,
            Some(brand) => phone.brand == brand,
        };
        if !brand_ok {
            return false;
        }

        match folded_term {
            None => true,
            Some(term) => {
                phone.name.to_lowercase().contains(term)
                    || phone.brand.to_lowercase().contains(term)
            }
        }
    }
}
