//! Phone module - the listing record shared by the catalogue and AI search

use serde::{Deserialize, Serialize};

/// Sentinel shown for any specification the source did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Id prefix reserved for listings synthesized from remote search results
///
/// Catalogue data may never use it, so synthesized ids cannot collide with
/// catalogue ids.
pub const SYNTHESIZED_ID_PREFIX: &str = "ai-";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Fixed-shape technical specification of a phone
///
/// Every field is free text. Fields missing from a source payload
/// deserialize to [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneSpecs {
    /// Chipset, e.g. "Snapdragon 8 Gen 3"
    #[serde(default = "not_available")]
    pub processor: String,

    /// Memory, e.g. "12GB"
    #[serde(default = "not_available")]
    pub ram: String,

    /// Built-in storage, e.g. "256GB"
    #[serde(default = "not_available")]
    pub storage: String,

    /// Display description
    #[serde(default = "not_available")]
    pub display: String,

    /// Camera description
    #[serde(default = "not_available")]
    pub camera: String,

    /// Battery description
    #[serde(default = "not_available")]
    pub battery: String,

    /// Operating system
    #[serde(default = "not_available")]
    pub os: String,
}

impl PhoneSpecs {
    /// Specs with every field set to the sentinel
    pub fn unknown() -> Self {
        Self {
            processor: not_available(),
            ram: not_available(),
            storage: not_available(),
            display: not_available(),
            camera: not_available(),
            battery: not_available(),
            os: not_available(),
        }
    }

    /// Labelled spec rows in display order
    pub fn rows(&self) -> [(&'static str, &str); 7] {
        [
            ("Processor", &self.processor),
            ("RAM", &self.ram),
            ("Storage", &self.storage),
            ("Display", &self.display),
            ("Camera", &self.camera),
            ("Battery", &self.battery),
            ("OS", &self.os),
        ]
    }
}

impl Default for PhoneSpecs {
    fn default() -> Self {
        Self::unknown()
    }
}

/// A mobile-phone listing
///
/// Local catalogue entries and normalized AI search candidates share this
/// exact shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneRecord {
    /// Identifier, unique within a result set
    pub id: String,

    /// Model name
    pub name: String,

    /// Brand name
    pub brand: String,

    /// Non-negative price in `currency` units
    pub price: f64,

    /// Currency display label, not validated
    pub currency: String,

    /// Image URI
    pub image: String,

    /// Technical specification
    #[serde(default)]
    pub specs: PhoneSpecs,

    /// Release label (free text, not a parsed date)
    pub release_date: String,

    /// Rating, expected in 0..=5
    pub rating: f64,

    /// Highlighted as trending in listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_trending: Option<bool>,
}

impl PhoneRecord {
    /// Whether the listing carries the trending flag
    pub fn trending(&self) -> bool {
        self.is_trending.unwrap_or(false)
    }

    /// Whether the id belongs to the synthesized (remote search) range
    pub fn is_synthesized(&self) -> bool {
        self.id.starts_with(SYNTHESIZED_ID_PREFIX)
    }

    /// Whole stars to light for the rating, clamped to 0..=5
    pub fn full_stars(&self) -> u8 {
        self.rating.clamp(0.0, 5.0).floor() as u8
    }

    /// Price with thousands separators, e.g. "129,999"
    ///
    /// Fractional parts are kept to at most two digits, trailing zeros dropped.
    pub fn formatted_price(&self) -> String {
        group_thousands(self.price)
    }

    /// Currency label followed by the formatted price, e.g. "Rs. 129,999"
    pub fn price_label(&self) -> String {
        format!("{} {}", self.currency, self.formatted_price())
    }
}

/// Build a fresh id for the `index`-th listing of a remote search response
///
/// The UUIDv7 suffix keeps ids distinct across responses, the index keeps
/// them readable within one.
///
/// # Examples
///
/// ```
/// use mobilezone_domain::phone::synthesize_id;
///
/// let a = synthesize_id(0);
/// let b = synthesize_id(0);
/// assert!(a.starts_with("ai-0-"));
/// assert_ne!(a, b);
/// ```
pub fn synthesize_id(index: usize) -> String {
    format!(
        "{}{}-{}",
        SYNTHESIZED_ID_PREFIX,
        index,
        uuid::Uuid::now_v7().simple()
    )
}

fn group_thousands(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac != 0 {
        let digits = format!("{:02}", frac);
        grouped.push('.');
        grouped.push_str(digits.trim_end_matches('0'));
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
