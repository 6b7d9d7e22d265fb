//! Assembled card records and the collaborators that receive them.

use serde::Serialize;

use crate::core::{CardId, CardIssuer, Field};
use crate::store::FieldValues;

/// Immutable result of a successful submit.
///
/// Only the assembler creates records; fields are frozen copies of the
/// segment values at submit time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardRecord {
    id: CardId,
    issuer: CardIssuer,
    card_numbers: Vec<String>,
    expiration_date: Vec<String>,
    owner: Vec<String>,
    cvc: Vec<String>,
    password: Vec<String>,
}

impl CardRecord {
    pub(crate) fn assemble(id: CardId, issuer: CardIssuer, values: &FieldValues) -> Self {
        Self {
            id,
            issuer,
            card_numbers: values.to_vec(Field::CardNumber),
            expiration_date: values.to_vec(Field::ExpirationDate),
            owner: values.to_vec(Field::Owner),
            cvc: values.to_vec(Field::Cvc),
            password: values.to_vec(Field::Password),
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn issuer(&self) -> CardIssuer {
        self.issuer
    }

    /// Card number groups, in entry order.
    #[must_use]
    pub fn card_numbers(&self) -> &[String] {
        &self.card_numbers
    }

    /// Month and year segments.
    #[must_use]
    pub fn expiration_date(&self) -> &[String] {
        &self.expiration_date
    }

    #[must_use]
    pub fn owner(&self) -> &[String] {
        &self.owner
    }

    #[must_use]
    pub fn cvc(&self) -> &[String] {
        &self.cvc
    }

    #[must_use]
    pub fn password(&self) -> &[String] {
        &self.password
    }

    /// Values of one field.
    #[must_use]
    pub fn field(&self, field: Field) -> &[String] {
        match field {
            Field::CardNumber => &self.card_numbers,
            Field::ExpirationDate => &self.expiration_date,
            Field::Owner => &self.owner,
            Field::Cvc => &self.cvc,
            Field::Password => &self.password,
        }
    }
}

/// Externally owned, ordered collection of submitted cards.
///
/// The engine only appends; insertion order is submission order.
pub trait CardList {
    fn append_card(&mut self, record: CardRecord);
}

impl CardList for Vec<CardRecord> {
    fn append_card(&mut self, record: CardRecord) {
        self.push(record);
    }
}

impl CardList for im::Vector<CardRecord> {
    fn append_card(&mut self, record: CardRecord) {
        self.push_back(record);
    }
}

impl<L: CardList + ?Sized> CardList for &mut L {
    fn append_card(&mut self, record: CardRecord) {
        (**self).append_card(record);
    }
}

/// Receives the hand-off to the follow-up card naming step.
pub trait Navigator {
    fn card_naming(&mut self, card: CardId);
}

/// No navigation.
impl Navigator for () {
    fn card_naming(&mut self, _card: CardId) {}
}

/// Remembers the last requested card.
impl Navigator for Option<CardId> {
    fn card_naming(&mut self, card: CardId) {
        *self = Some(card);
    }
}

impl<N: Navigator + ?Sized> Navigator for &mut N {
    fn card_naming(&mut self, card: CardId) {
        (**self).card_naming(card);
    }
}
