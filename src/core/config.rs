//! Form configuration types.
//!
//! The entry engine is driven by a declarative table instead of per-field
//! handler code:
//! - `SegmentConfig`: content kind, length bounds and display hints of one segment
//! - `FieldConfig`: the ordered segments of one field
//! - `FormConfig`: all five fields plus form-wide submit settings
//!
//! `FormConfig::standard()` reproduces the usual card-registration layout.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::field::{Field, SegmentId};
use crate::validate::{is_digit_string, is_letter_string};

/// What characters a segment accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// Decimal digits, shown as typed.
    Digits,
    /// Alphabetic characters.
    Letters,
    /// Decimal digits, hidden on display.
    MaskedDigits,
}

impl ContentKind {
    /// Check a whole value against this kind. The empty string always passes.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            ContentKind::Digits | ContentKind::MaskedDigits => is_digit_string(value),
            ContentKind::Letters => is_letter_string(value),
        }
    }

    #[must_use]
    pub const fn is_masked(self) -> bool {
        matches!(self, ContentKind::MaskedDigits)
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Digits => f.write_str("digits"),
            ContentKind::Letters => f.write_str("letters"),
            ContentKind::MaskedDigits => f.write_str("masked digits"),
        }
    }
}

/// Horizontal extent requested from the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Width {
    /// Fixed width in pixels.
    Fixed(u16),
    /// Fill the available row.
    Full,
}

/// Display hints passed through to the render layer untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayHints {
    pub width: Width,
    pub centered: bool,
    pub placeholder: Option<String>,
}

impl Default for DisplayHints {
    fn default() -> Self {
        Self {
            width: Width::Full,
            centered: false,
            placeholder: None,
        }
    }
}

/// Configuration of a single segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub kind: ContentKind,

    /// Minimum length for the segment to count as complete.
    pub min_len: usize,

    /// Maximum length. Reaching it moves focus to the next segment.
    pub max_len: usize,

    #[serde(default)]
    pub display: DisplayHints,
}

impl SegmentConfig {
    /// Create a segment with `min_len..=max_len` characters of `kind`.
    pub fn new(kind: ContentKind, min_len: usize, max_len: usize) -> Self {
        Self {
            kind,
            min_len,
            max_len,
            display: DisplayHints::default(),
        }
    }

    /// Create a segment that must be exactly `len` characters.
    pub fn exact(kind: ContentKind, len: usize) -> Self {
        Self::new(kind, len, len)
    }

    /// Request a fixed pixel width.
    #[must_use]
    pub fn with_width(mut self, px: u16) -> Self {
        self.display.width = Width::Fixed(px);
        self
    }

    /// Center the value inside the segment.
    #[must_use]
    pub fn centered(mut self) -> Self {
        self.display.centered = true;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.display.placeholder = Some(placeholder.into());
        self
    }
}

/// Configuration of one field: its ordered segments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub field: Field,

    /// Label shown above the field.
    pub label: String,

    pub segments: SmallVec<[SegmentConfig; 4]>,
}

impl FieldConfig {
    /// Create a field with no segments; add them with [`FieldConfig::with_segment`].
    pub fn new(field: Field, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            segments: SmallVec::new(),
        }
    }

    /// Append a segment.
    #[must_use]
    pub fn with_segment(mut self, segment: SegmentConfig) -> Self {
        self.segments.push(segment);
        self
    }

    /// Append `count` copies of a segment.
    #[must_use]
    pub fn with_segments(mut self, count: usize, segment: SegmentConfig) -> Self {
        for _ in 0..count {
            self.segments.push(segment.clone());
        }
        self
    }

    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&SegmentConfig> {
        self.segments.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// When an expiration month stops being valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryRule {
    /// Valid through the last day of the expiration month.
    #[default]
    EndOfMonth,
    /// Valid only up to the first day of the expiration month.
    StartOfMonth,
}

/// Invalid form configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no configuration for field `{0}`")]
    MissingField(Field),

    #[error("field `{0}` is configured more than once")]
    DuplicateField(Field),

    #[error("field `{0}` has no segments")]
    NoSegments(Field),

    #[error("segment {0} has a maximum length of 0")]
    ZeroMaxLength(SegmentId),

    #[error("segment {segment} has min length {min} above max length {max}")]
    MinExceedsMax { segment: SegmentId, min: usize, max: usize },

    #[error("expiration date needs exactly 2 segments (month, year), found {0}")]
    ExpirationShape(usize),

    #[error("validity horizon must be at least one year")]
    ZeroValidityHorizon,
}

/// Complete form configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Field configurations. Entry order comes from [`Field`], not from this list.
    pub fields: Vec<FieldConfig>,

    #[serde(default)]
    pub expiry_rule: ExpiryRule,

    /// Expirations more than this many years ahead are rejected as implausible.
    #[serde(default = "default_validity_years")]
    pub max_validity_years: u32,

    /// Seed for card id generation. `None` seeds from OS entropy.
    #[serde(default)]
    pub id_seed: Option<u64>,
}

const fn default_validity_years() -> u32 {
    20
}

impl FormConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            expiry_rule: ExpiryRule::default(),
            max_validity_years: default_validity_years(),
            id_seed: None,
        }
    }

    /// The standard card-registration layout.
    ///
    /// | field      | segments                          | length |
    /// |------------|-----------------------------------|--------|
    /// | number     | 2 digits groups, 2 masked groups  | 4      |
    /// | expiration | month, year                       | 2      |
    /// | owner      | letters                           | 0..=30 |
    /// | CVC        | masked                            | 3      |
    /// | password   | 2 masked                          | 1      |
    pub fn standard() -> Self {
        let group = |kind| SegmentConfig::exact(kind, 4).with_width(75).centered();

        Self::new()
            .with_field(
                FieldConfig::new(Field::CardNumber, "Card number")
                    .with_segments(2, group(ContentKind::Digits))
                    .with_segments(2, group(ContentKind::MaskedDigits)),
            )
            .with_field(
                FieldConfig::new(Field::ExpirationDate, "Expiration date")
                    .with_segment(
                        SegmentConfig::exact(ContentKind::Digits, 2)
                            .with_width(75)
                            .centered()
                            .with_placeholder("MM"),
                    )
                    .with_segment(
                        SegmentConfig::exact(ContentKind::Digits, 2)
                            .with_width(75)
                            .centered()
                            .with_placeholder("YY"),
                    ),
            )
            .with_field(
                FieldConfig::new(Field::Owner, "Card owner name (optional)").with_segment(
                    SegmentConfig::new(ContentKind::Letters, 0, 30)
                        .with_placeholder("Enter the name exactly as shown on the card."),
                ),
            )
            .with_field(
                FieldConfig::new(Field::Cvc, "Security code (CVC/CVV)")
                    .with_segment(
                        SegmentConfig::exact(ContentKind::MaskedDigits, 3).with_width(75),
                    ),
            )
            .with_field(
                FieldConfig::new(Field::Password, "Card password")
                    .with_segments(
                        2,
                        SegmentConfig::exact(ContentKind::MaskedDigits, 1).with_width(40),
                    ),
            )
    }

    /// Add a field configuration.
    #[must_use]
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_expiry_rule(mut self, rule: ExpiryRule) -> Self {
        self.expiry_rule = rule;
        self
    }

    #[must_use]
    pub fn with_max_validity_years(mut self, years: u32) -> Self {
        self.max_validity_years = years;
        self
    }

    /// Use a fixed seed for card ids (deterministic ids in tests and replays).
    #[must_use]
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.id_seed = Some(seed);
        self
    }

    /// Get a field config.
    #[must_use]
    pub fn get_field(&self, field: Field) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Check the table is usable by the entry engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in Field::ALL {
            let mut matching = self.fields.iter().filter(|f| f.field == field);
            let config = matching.next().ok_or(ConfigError::MissingField(field))?;
            if matching.next().is_some() {
                return Err(ConfigError::DuplicateField(field));
            }
            if config.is_empty() {
                return Err(ConfigError::NoSegments(field));
            }
            for (index, segment) in config.segments.iter().enumerate() {
                let id = SegmentId::new(field, index);
                if segment.max_len == 0 {
                    return Err(ConfigError::ZeroMaxLength(id));
                }
                if segment.min_len > segment.max_len {
                    return Err(ConfigError::MinExceedsMax {
                        segment: id,
                        min: segment.min_len,
                        max: segment.max_len,
                    });
                }
            }
            if field == Field::ExpirationDate && config.len() != 2 {
                return Err(ConfigError::ExpirationShape(config.len()));
            }
        }

        if self.max_validity_years == 0 {
            return Err(ConfigError::ZeroValidityHorizon);
        }
        Ok(())
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config_is_valid() {
        let config = FormConfig::standard();
        assert_eq!(config.validate(), Ok(()));

        let number = config.get_field(Field::CardNumber).unwrap();
        assert_eq!(number.len(), 4);
        assert_eq!(number.segment(0).unwrap().kind, ContentKind::Digits);
        assert_eq!(number.segment(2).unwrap().kind, ContentKind::MaskedDigits);

        let owner = config.get_field(Field::Owner).unwrap();
        assert_eq!(owner.segment(0).unwrap().max_len, 30);
        assert_eq!(owner.segment(0).unwrap().min_len, 0);

        let password = config.get_field(Field::Password).unwrap();
        assert_eq!(password.len(), 2);
        assert_eq!(password.segment(1).unwrap().display.width, Width::Fixed(40));
    }

    #[test]
    fn test_content_kind_accepts() {
        assert!(ContentKind::Digits.accepts("0123"));
        assert!(ContentKind::MaskedDigits.accepts(""));
        assert!(!ContentKind::Digits.accepts("12a"));
        assert!(ContentKind::Letters.accepts("Kim"));
        assert!(!ContentKind::Letters.accepts("Kim1"));
        assert!(ContentKind::MaskedDigits.is_masked());
        assert!(!ContentKind::Digits.is_masked());
    }

    #[test]
    fn test_segment_builder() {
        let segment = SegmentConfig::exact(ContentKind::Digits, 2)
            .with_width(75)
            .centered()
            .with_placeholder("MM");

        assert_eq!(segment.min_len, 2);
        assert_eq!(segment.max_len, 2);
        assert_eq!(segment.display.width, Width::Fixed(75));
        assert!(segment.display.centered);
        assert_eq!(segment.display.placeholder.as_deref(), Some("MM"));
    }

    #[test]
    fn test_missing_field() {
        let mut config = FormConfig::standard();
        config.fields.retain(|f| f.field != Field::Cvc);

        assert_eq!(config.validate(), Err(ConfigError::MissingField(Field::Cvc)));
    }

    #[test]
    fn test_duplicate_field() {
        let config = FormConfig::standard().with_field(
            FieldConfig::new(Field::Owner, "Again")
                .with_segment(SegmentConfig::new(ContentKind::Letters, 0, 10)),
        );

        assert_eq!(config.validate(), Err(ConfigError::DuplicateField(Field::Owner)));
    }

    #[test]
    fn test_invalid_lengths() {
        let mut config = FormConfig::standard();
        config.fields.retain(|f| f.field != Field::Cvc);
        let config = config.with_field(
            FieldConfig::new(Field::Cvc, "CVC")
                .with_segment(SegmentConfig::new(ContentKind::MaskedDigits, 4, 3)),
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::MinExceedsMax {
                segment: SegmentId::new(Field::Cvc, 0),
                min: 4,
                max: 3,
            })
        );

        let mut config = FormConfig::standard();
        config.fields.retain(|f| f.field != Field::Cvc);
        let config = config.with_field(
            FieldConfig::new(Field::Cvc, "CVC")
                .with_segment(SegmentConfig::new(ContentKind::MaskedDigits, 0, 0)),
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroMaxLength(SegmentId::new(Field::Cvc, 0)))
        );
    }

    #[test]
    fn test_expiration_shape() {
        let mut config = FormConfig::standard();
        config.fields.retain(|f| f.field != Field::ExpirationDate);
        let config = config.with_field(
            FieldConfig::new(Field::ExpirationDate, "Expiry")
                .with_segment(SegmentConfig::exact(ContentKind::Digits, 4)),
        );

        assert_eq!(config.validate(), Err(ConfigError::ExpirationShape(1)));
    }

    #[test]
    fn test_zero_validity_horizon() {
        let config = FormConfig::standard().with_max_validity_years(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroValidityHorizon));
    }

    #[test]
    fn test_builder_pattern() {
        let config = FormConfig::standard()
            .with_expiry_rule(ExpiryRule::StartOfMonth)
            .with_max_validity_years(10)
            .with_id_seed(7);

        assert_eq!(config.expiry_rule, ExpiryRule::StartOfMonth);
        assert_eq!(config.max_validity_years, 10);
        assert_eq!(config.id_seed, Some(7));
    }

    #[test]
    fn test_serialization() {
        let config = FormConfig::standard().with_id_seed(42);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: FormConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "fields": [
                {"field": "Owner", "label": "Owner", "segments": [
                    {"kind": "Letters", "min_len": 0, "max_len": 30}
                ]}
            ]
        }"#;
        let config: FormConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.expiry_rule, ExpiryRule::EndOfMonth);
        assert_eq!(config.max_validity_years, 20);
        assert_eq!(config.id_seed, None);
        assert_eq!(config.fields[0].segments[0].display, DisplayHints::default());
        assert_eq!(config.validate(), Err(ConfigError::MissingField(Field::CardNumber)));
    }
}
