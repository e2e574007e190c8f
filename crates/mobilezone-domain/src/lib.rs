//! MobileZone Domain Layer
//!
//! This crate contains the data model and the pure browsing logic for
//! MobileZone. It defines the fundamental concepts, value objects, and the
//! trait interface for the remote search capability that all other layers
//! depend upon.
//!
//! ## Key Concepts
//!
//! - **PhoneRecord**: One normalized mobile-phone listing, local or AI-sourced
//! - **BrandFacet**: A selectable brand with a precomputed listing count
//! - **SearchOutcome**: Idle, pending, or settled state of a remote search
//! - **CatalogueFilter**: Brand + free-text filtering over a fixed collection
//!
//! ## Architecture
//!
//! - Pure business logic only, no I/O
//! - Infrastructure implementations (catalogue data, providers) live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod brand;
pub mod filter;
pub mod outcome;
pub mod phone;
pub mod traits;

// Re-exports for convenience
pub use brand::BrandFacet;
pub use filter::{filter_phones, CatalogueFilter};
pub use outcome::{Citation, SearchOutcome, SearchReport};
pub use phone::{PhoneRecord, PhoneSpecs, NOT_AVAILABLE};
