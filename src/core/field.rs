//! Field and segment identification, and per-field data storage.
//!
//! ## Field
//!
//! The five logical pieces of card data, in entry order.
//!
//! ## FieldMap
//!
//! Per-field storage backed by a `Vec` with one slot per [`Field`],
//! indexable by `Field`. Every map always holds all five fields.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Index, IndexMut};

/// One logical piece of card data.
///
/// Declaration order is entry order: focus walks number segments first,
/// then expiration, owner, CVC and finally password.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    CardNumber,
    ExpirationDate,
    Owner,
    Cvc,
    Password,
}

impl Field {
    /// Every field, in entry order.
    pub const ALL: [Field; 5] = [
        Field::CardNumber,
        Field::ExpirationDate,
        Field::Owner,
        Field::Cvc,
        Field::Password,
    ];

    /// Position of this field in entry order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Field::CardNumber => "card number",
            Field::ExpirationDate => "expiration date",
            Field::Owner => "card owner",
            Field::Cvc => "security code (CVC/CVV)",
            Field::Password => "card password",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies one segment: a field plus the segment's index inside it.
///
/// ```
/// use card_entry::core::{Field, SegmentId};
///
/// let month = SegmentId::new(Field::ExpirationDate, 0);
/// assert_eq!(month.field, Field::ExpirationDate);
/// assert_eq!(format!("{}", month), "expiration date[0]");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId {
    pub field: Field,
    pub index: usize,
}

impl SegmentId {
    #[must_use]
    pub const fn new(field: Field, index: usize) -> Self {
        Self { field, index }
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.field, self.index)
    }
}

/// Per-field data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use card_entry::core::{Field, FieldMap};
///
/// let mut counts: FieldMap<usize> = FieldMap::with_value(0);
/// counts[Field::Cvc] = 3;
///
/// assert_eq!(counts[Field::Cvc], 3);
/// assert_eq!(counts[Field::Owner], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldMap<T> {
    data: Vec<T>,
}

impl<T> FieldMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Field) -> T) -> Self {
        Self {
            data: Field::ALL.iter().map(|&f| factory(f)).collect(),
        }
    }

    /// Create a map with every entry set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    #[must_use]
    pub fn get(&self, field: Field) -> &T {
        &self.data[field.index()]
    }

    pub fn get_mut(&mut self, field: Field) -> &mut T {
        &mut self.data[field.index()]
    }

    /// Iterate over (Field, &T) pairs in entry order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &T)> {
        Field::ALL.iter().copied().zip(self.data.iter())
    }

    /// Transform every entry, keeping the field association.
    pub fn map<U>(&self, mut f: impl FnMut(Field, &T) -> U) -> FieldMap<U> {
        FieldMap {
            data: self.iter().map(|(field, v)| f(field, v)).collect(),
        }
    }
}

impl<T> Index<Field> for FieldMap<T> {
    type Output = T;

    fn index(&self, field: Field) -> &Self::Output {
        self.get(field)
    }
}

impl<T> IndexMut<Field> for FieldMap<T> {
    fn index_mut(&mut self, field: Field) -> &mut Self::Output {
        self.get_mut(field)
    }
}

impl<T: Serialize> Serialize for FieldMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = Vec::<T>::deserialize(deserializer)?;
        if data.len() != Field::ALL.len() {
            return Err(D::Error::invalid_length(data.len(), &"one entry per field"));
        }
        Ok(Self { data })
    }
}
