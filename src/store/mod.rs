//! Segment state store.
//!
//! Holds the current value of every segment, grouped by field. Writes are
//! copy-on-write: each accepted write produces a new persistent snapshot
//! (`im::Vector` per field), so an observer holding an older
//! [`FieldValues`] can compare it against the current one cheaply and never
//! sees it change underneath.
//!
//! ## Write pipeline
//!
//! 1. Expiration segments are clamped (month at index 0, year at index 1).
//! 2. The staged value is checked against the segment's content kind and
//!    maximum length. Failures leave the store untouched.
//! 3. The value replaces the segment in a new snapshot.
//! 4. A [`SegmentWrite`] reports the new length for focus handling.

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ContentKind, Field, FieldConfig, FieldMap, FormConfig, SegmentConfig, SegmentId};
use crate::validate::{clamp_month, clamp_year};

/// Why a staged segment value was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputRejection {
    /// A character outside the segment's content kind.
    WrongContent(ContentKind),
    /// Longer than the segment's maximum length.
    TooLong { len: usize, max: usize },
}

impl std::fmt::Display for InputRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputRejection::WrongContent(kind) => write!(f, "only {} allowed", kind),
            InputRejection::TooLong { len, max } => {
                write!(f, "{} characters, at most {} allowed", len, max)
            }
        }
    }
}

/// Errors raised while editing a form.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EntryError {
    /// Rejected at the point of entry. Expected during normal typing; the
    /// render layer drops it without showing a message.
    #[error("invalid input for {segment}: {reason}")]
    InvalidSegmentInput {
        segment: SegmentId,
        reason: InputRejection,
    },

    #[error("no segment {0} in this form")]
    UnknownSegment(SegmentId),

    /// The form already handed off its card.
    #[error("form already submitted")]
    FormClosed,
}

/// Outcome of an accepted write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentWrite {
    pub segment: SegmentId,

    /// Length of the stored value, in characters.
    pub len: usize,

    /// Maximum length of the segment.
    pub max_len: usize,
}

impl SegmentWrite {
    /// The segment is now full.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == self.max_len
    }

    /// The segment was cleared.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.len == 0
    }
}

/// Snapshot of every segment value, per field.
///
/// Cloning is O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValues(FieldMap<Vector<String>>);

impl FieldValues {
    /// Build values from a factory returning each field's segments.
    pub fn new(factory: impl Fn(Field) -> Vec<String>) -> Self {
        Self(FieldMap::new(|field| factory(field).into_iter().collect()))
    }

    /// Empty values shaped after a form layout.
    pub fn empty(config: &FormConfig) -> Self {
        Self::new(|field| {
            let count = config.get_field(field).map_or(0, FieldConfig::len);
            vec![String::new(); count]
        })
    }

    /// Build values from string slices, one slice per field in entry order.
    ///
    /// ```
    /// use card_entry::core::Field;
    /// use card_entry::store::FieldValues;
    ///
    /// let values = FieldValues::from_slices(
    ///     &["1111", "2222", "3333", "4444"],
    ///     &["12", "30"],
    ///     &[""],
    ///     &["123"],
    ///     &["1", "2"],
    /// );
    /// assert_eq!(values.to_vec(Field::ExpirationDate), vec!["12", "30"]);
    /// ```
    pub fn from_slices(
        number: &[&str],
        expiration: &[&str],
        owner: &[&str],
        cvc: &[&str],
        password: &[&str],
    ) -> Self {
        let pick = |field| match field {
            Field::CardNumber => number,
            Field::ExpirationDate => expiration,
            Field::Owner => owner,
            Field::Cvc => cvc,
            Field::Password => password,
        };
        Self::new(|field| pick(field).iter().map(|s| s.to_string()).collect())
    }

    /// Segment values of one field.
    #[must_use]
    pub fn field(&self, field: Field) -> &Vector<String> {
        &self.0[field]
    }

    /// Value of one segment.
    #[must_use]
    pub fn get(&self, segment: SegmentId) -> Option<&str> {
        self.0[segment.field].get(segment.index).map(String::as_str)
    }

    /// Copy one field's segments out.
    #[must_use]
    pub fn to_vec(&self, field: Field) -> Vec<String> {
        self.0[field].iter().cloned().collect()
    }

    fn replaced(&self, segment: SegmentId, value: String) -> Self {
        let mut next = self.clone();
        next.0[segment.field] = self.0[segment.field].update(segment.index, value);
        next
    }
}

/// Current segment values of one form plus the layout that constrains them.
#[derive(Clone, Debug)]
pub struct SegmentStore {
    layout: FieldMap<FieldConfig>,
    values: FieldValues,
}

impl SegmentStore {
    /// Create an empty store for a validated configuration.
    ///
    /// Fields the configuration does not mention get no segments; callers
    /// validate the configuration first.
    #[must_use]
    pub fn new(config: &FormConfig) -> Self {
        let layout = FieldMap::new(|field| {
            config
                .get_field(field)
                .cloned()
                .unwrap_or_else(|| FieldConfig::new(field, field.label()))
        });

        Self {
            layout,
            values: FieldValues::empty(config),
        }
    }

    /// Stage, validate and commit a segment value.
    pub fn set_segment(
        &mut self,
        segment: SegmentId,
        raw: impl Into<String>,
    ) -> Result<SegmentWrite, EntryError> {
        let (kind, max_len) = self
            .segment_config(segment)
            .map(|c| (c.kind, c.max_len))
            .ok_or(EntryError::UnknownSegment(segment))?;

        let mut staged = raw.into();
        if segment.field == Field::ExpirationDate {
            match segment.index {
                0 => clamp_month(&mut staged),
                1 => clamp_year(&mut staged),
                _ => {}
            }
        }

        if !kind.accepts(&staged) {
            tracing::trace!(%segment, %kind, "rejected segment input");
            return Err(EntryError::InvalidSegmentInput {
                segment,
                reason: InputRejection::WrongContent(kind),
            });
        }

        let len = staged.chars().count();
        if len > max_len {
            tracing::trace!(%segment, len, max_len, "rejected over-long segment input");
            return Err(EntryError::InvalidSegmentInput {
                segment,
                reason: InputRejection::TooLong { len, max: max_len },
            });
        }

        self.values = self.values.replaced(segment, staged);
        tracing::debug!(%segment, len, "segment updated");

        Ok(SegmentWrite { segment, len, max_len })
    }

    /// Current value of a segment.
    #[must_use]
    pub fn value(&self, segment: SegmentId) -> Option<&str> {
        self.values.get(segment)
    }

    /// Current values, borrowed.
    #[must_use]
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Current values as an independent snapshot.
    #[must_use]
    pub fn snapshot(&self) -> FieldValues {
        self.values.clone()
    }

    /// Layout of one field.
    #[must_use]
    pub fn field_config(&self, field: Field) -> &FieldConfig {
        &self.layout[field]
    }

    #[must_use]
    pub fn segment_config(&self, segment: SegmentId) -> Option<&SegmentConfig> {
        self.layout[segment.field].segment(segment.index)
    }

    /// Every segment of the form, in entry order.
    pub fn segment_ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.layout
            .iter()
            .flat_map(|(field, config)| {
                (0..config.len()).map(move |index| SegmentId::new(field, index))
            })
    }

    /// Every segment of `field` holds at least its minimum length.
    #[must_use]
    pub fn is_complete(&self, field: Field) -> bool {
        self.layout[field]
            .segments
            .iter()
            .zip(self.values.field(field).iter())
            .all(|(config, value)| value.chars().count() >= config.min_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SegmentStore {
        SegmentStore::new(&FormConfig::standard())
    }

    fn id(field: Field, index: usize) -> SegmentId {
        SegmentId::new(field, index)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = store();

        assert_eq!(store.segment_ids().count(), 10);
        assert!(store.segment_ids().all(|s| store.value(s) == Some("")));
        assert_eq!(store.values().field(Field::CardNumber).len(), 4);
    }

    #[test]
    fn test_accepts_digits() {
        let mut store = store();
        let write = store.set_segment(id(Field::CardNumber, 1), "12").unwrap();

        assert_eq!(write.len, 2);
        assert_eq!(write.max_len, 4);
        assert!(!write.is_full());
        assert_eq!(store.value(id(Field::CardNumber, 1)), Some("12"));
    }

    #[test]
    fn test_rejects_wrong_content() {
        let mut store = store();
        store.set_segment(id(Field::Cvc, 0), "12").unwrap();

        let err = store.set_segment(id(Field::Cvc, 0), "12a").unwrap_err();
        assert_eq!(
            err,
            EntryError::InvalidSegmentInput {
                segment: id(Field::Cvc, 0),
                reason: InputRejection::WrongContent(ContentKind::MaskedDigits),
            }
        );
        assert_eq!(store.value(id(Field::Cvc, 0)), Some("12"));
    }

    #[test]
    fn test_rejects_too_long() {
        let mut store = store();

        let err = store.set_segment(id(Field::CardNumber, 0), "12345").unwrap_err();
        assert!(matches!(
            err,
            EntryError::InvalidSegmentInput {
                reason: InputRejection::TooLong { len: 5, max: 4 },
                ..
            }
        ));
        assert_eq!(store.value(id(Field::CardNumber, 0)), Some(""));
    }

    #[test]
    fn test_owner_accepts_letters_only() {
        let mut store = store();

        assert!(store.set_segment(id(Field::Owner, 0), "SUN").is_ok());
        assert!(store.set_segment(id(Field::Owner, 0), "SUN1").is_err());
        assert_eq!(store.value(id(Field::Owner, 0)), Some("SUN"));
    }

    #[test]
    fn test_unknown_segment() {
        let mut store = store();
        let missing = id(Field::Cvc, 1);

        assert_eq!(store.set_segment(missing, "1"), Err(EntryError::UnknownSegment(missing)));
    }

    #[test]
    fn test_month_is_clamped_before_commit() {
        let mut store = store();

        let write = store.set_segment(id(Field::ExpirationDate, 0), "13").unwrap();
        assert_eq!(store.value(id(Field::ExpirationDate, 0)), Some("12"));
        assert!(write.is_full());

        let write = store.set_segment(id(Field::ExpirationDate, 0), "0").unwrap();
        assert_eq!(store.value(id(Field::ExpirationDate, 0)), Some("1"));
        assert_eq!(write.len, 1);
    }

    #[test]
    fn test_year_is_not_clamped() {
        let mut store = store();
        store.set_segment(id(Field::ExpirationDate, 1), "00").unwrap();
        assert_eq!(store.value(id(Field::ExpirationDate, 1)), Some("00"));
    }

    #[test]
    fn test_copy_on_write() {
        let mut store = store();
        store.set_segment(id(Field::CardNumber, 0), "1111").unwrap();
        let before = store.snapshot();

        store.set_segment(id(Field::CardNumber, 1), "2222").unwrap();

        assert_eq!(before.get(id(Field::CardNumber, 1)), Some(""));
        assert_eq!(store.value(id(Field::CardNumber, 1)), Some("2222"));
        assert_ne!(&before, store.values());
        assert_eq!(before.field(Field::Owner), store.values().field(Field::Owner));
    }

    #[test]
    fn test_clear_is_accepted() {
        let mut store = store();
        store.set_segment(id(Field::Password, 1), "7").unwrap();

        let write = store.set_segment(id(Field::Password, 1), "").unwrap();
        assert!(write.is_cleared());
        assert_eq!(store.value(id(Field::Password, 1)), Some(""));
    }

    #[test]
    fn test_is_complete() {
        let mut store = store();
        assert!(store.is_complete(Field::Owner));
        assert!(!store.is_complete(Field::Password));

        store.set_segment(id(Field::Password, 0), "1").unwrap();
        assert!(!store.is_complete(Field::Password));
        store.set_segment(id(Field::Password, 1), "2").unwrap();
        assert!(store.is_complete(Field::Password));
    }

    #[test]
    fn test_length_counts_characters() {
        let mut store = store();
        let write = store.set_segment(id(Field::Owner, 0), "홍길동").unwrap();
        assert_eq!(write.len, 3);
    }
}
