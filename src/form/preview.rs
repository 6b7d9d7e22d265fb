//! Display snapshot of the card being entered.

use serde::Serialize;

use crate::core::{CardIssuer, Field, FieldConfig};
use crate::store::FieldValues;

/// Character shown in place of each masked digit.
pub const MASK_CHAR: char = '•';

/// What the card preview shows: issuer, number groups with masked groups
/// hidden, owner and `MM/YY`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardPreview {
    pub issuer: Option<CardIssuer>,
    pub number_groups: Vec<String>,
    pub owner: String,
    pub expiration: String,
}

impl CardPreview {
    pub(crate) fn build(
        issuer: Option<CardIssuer>,
        values: &FieldValues,
        number_layout: &FieldConfig,
    ) -> Self {
        let number_groups = values
            .field(Field::CardNumber)
            .iter()
            .zip(number_layout.segments.iter())
            .map(|(value, segment)| {
                if segment.kind.is_masked() {
                    mask(value)
                } else {
                    value.clone()
                }
            })
            .collect();

        let expiration = values.to_vec(Field::ExpirationDate);
        let expiration = if expiration.iter().all(String::is_empty) {
            String::new()
        } else {
            expiration.join("/")
        };

        Self {
            issuer,
            number_groups,
            owner: values.to_vec(Field::Owner).concat(),
            expiration,
        }
    }

    /// Number groups joined the way they are printed on the card.
    #[must_use]
    pub fn number_line(&self) -> String {
        self.number_groups
            .iter()
            .filter(|g| !g.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Replace every character of `value` with [`MASK_CHAR`].
#[must_use]
pub fn mask(value: &str) -> String {
    value.chars().map(|_| MASK_CHAR).collect()
}
