//! Core entry types: fields, segments, issuers, card ids, configuration.
//!
//! Everything here is plain data. The behaviour lives in `store`, `focus`,
//! `assembler` and `form`.

pub mod field;
pub mod issuer;
pub mod ids;
pub mod config;

pub use field::{Field, FieldMap, SegmentId};
pub use issuer::{CardIssuer, ParseIssuerError};
pub use ids::{CardId, CardIdGenerator};
pub use config::{
    ConfigError, ContentKind, DisplayHints, ExpiryRule, FieldConfig, FormConfig, SegmentConfig,
    Width,
};
