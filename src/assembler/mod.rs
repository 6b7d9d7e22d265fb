//! Card assembler.
//!
//! Merges the segment values and the selected issuer into a [`CardRecord`]
//! after the cross-field checks:
//!
//! 1. An issuer must be selected (`MissingIssuer`).
//! 2. The expiration segments must name a plausible, unexpired month of
//!    the 21st century (`ExpiredCard`).
//!
//! ## Expiration semantics
//!
//! The segments `(MM, YY)` denote the month `20YY-MM`. Whether the card is
//! still usable during that month is set by [`ExpiryRule`]:
//! `EndOfMonth` treats it as valid through the month's last day,
//! `StartOfMonth` only up to its first day. An expiration more than
//! `max_validity_years` years ahead of "now" is refused as implausible,
//! reported as `ExpiredCard` like every other bad expiration.
//!
//! ## Example
//!
//! ```
//! use card_entry::assembler::{CardAssembler, SubmitError};
//! use card_entry::core::{CardIdGenerator, CardIssuer, ExpiryRule};
//! use card_entry::store::FieldValues;
//! use chrono::NaiveDate;
//!
//! let mut assembler = CardAssembler::new(ExpiryRule::EndOfMonth, 20, CardIdGenerator::new(1));
//! let values = FieldValues::from_slices(
//!     &["1111", "2222", "3333", "4444"],
//!     &["12", "30"],
//!     &[""],
//!     &["123"],
//!     &["1", "2"],
//! );
//! let now = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!
//! assert_eq!(assembler.submit(&values, None, now), Err(SubmitError::MissingIssuer));
//!
//! let record = assembler.submit(&values, Some(CardIssuer::Visa), now).unwrap();
//! assert_eq!(record.issuer(), CardIssuer::Visa);
//! ```

mod record;

pub use record::{CardList, CardRecord, Navigator};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{CardIdGenerator, CardIssuer, ExpiryRule, Field, FormConfig, SegmentId};
use crate::store::FieldValues;
use crate::validate::is_digit_string;

/// A submit refusal the user can fix. Exactly one is shown at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    MissingIssuer,
    ExpiredCard,
}

impl RejectReason {
    /// User-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            RejectReason::MissingIssuer => "Please choose a card issuer.",
            RejectReason::ExpiredCard => "Please enter a valid card expiration date.",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Errors returned by a submit attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no card issuer selected")]
    MissingIssuer,

    #[error("card expiration date is invalid or in the past")]
    ExpiredCard,

    #[error("form already submitted")]
    FormClosed,
}

impl SubmitError {
    /// The user-correctable reason behind this error, if any.
    #[must_use]
    pub const fn reject_reason(self) -> Option<RejectReason> {
        match self {
            SubmitError::MissingIssuer => Some(RejectReason::MissingIssuer),
            SubmitError::ExpiredCard => Some(RejectReason::ExpiredCard),
            SubmitError::FormClosed => None,
        }
    }
}

/// Expiration month of a card, `20YY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Expiration {
    year: i32,
    month: u32,
}

impl Expiration {
    /// Parse the month and year segments.
    ///
    /// The month is one or two digits in `1..=12`; the year exactly two digits.
    ///
    /// ```
    /// use card_entry::assembler::Expiration;
    ///
    /// let exp = Expiration::parse("07", "31").unwrap();
    /// assert_eq!((exp.month(), exp.year()), (7, 2031));
    ///
    /// assert!(Expiration::parse("00", "31").is_none());
    /// assert!(Expiration::parse("07", "3").is_none());
    /// ```
    #[must_use]
    pub fn parse(month: &str, year: &str) -> Option<Self> {
        if !(1..=2).contains(&month.len()) || year.len() != 2 {
            return None;
        }
        if !is_digit_string(month) || !is_digit_string(year) {
            return None;
        }

        let month: u32 = month.parse().ok()?;
        let year: i32 = year.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }

        Some(Self { year: 2000 + year, month })
    }

    /// Read the expiration segments out of a values snapshot.
    #[must_use]
    pub fn from_values(values: &FieldValues) -> Option<Self> {
        let month = values.get(SegmentId::new(Field::ExpirationDate, 0))?;
        let year = values.get(SegmentId::new(Field::ExpirationDate, 1))?;
        Self::parse(month, year)
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the expiration month.
    #[must_use]
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Last day of the expiration month.
    #[must_use]
    pub fn last_day(self) -> Option<NaiveDate> {
        self.first_day()?.checked_add_months(Months::new(1))?.pred_opt()
    }

    /// Last day on which a card with this expiration is usable.
    #[must_use]
    pub fn valid_through(self, rule: ExpiryRule) -> Option<NaiveDate> {
        match rule {
            ExpiryRule::EndOfMonth => self.last_day(),
            ExpiryRule::StartOfMonth => self.first_day(),
        }
    }

    /// Expired when `now` lies after the last usable day.
    #[must_use]
    pub fn is_expired(self, now: NaiveDate, rule: ExpiryRule) -> bool {
        self.valid_through(rule).map_or(true, |last| now > last)
    }

    /// More than `years` calendar years ahead of `now`.
    #[must_use]
    pub fn is_beyond_horizon(self, now: NaiveDate, years: u32) -> bool {
        i64::from(self.year) > i64::from(now.year()) + i64::from(years)
    }
}

impl std::fmt::Display for Expiration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

/// Cross-field validation and record assembly.
#[derive(Clone, Debug)]
pub struct CardAssembler {
    rule: ExpiryRule,
    max_validity_years: u32,
    ids: CardIdGenerator,
}

impl CardAssembler {
    #[must_use]
    pub fn new(rule: ExpiryRule, max_validity_years: u32, ids: CardIdGenerator) -> Self {
        Self {
            rule,
            max_validity_years,
            ids,
        }
    }

    /// Build an assembler from the form-wide settings of a configuration.
    #[must_use]
    pub fn from_config(config: &FormConfig) -> Self {
        Self::new(
            config.expiry_rule,
            config.max_validity_years,
            CardIdGenerator::from_seed_opt(config.id_seed),
        )
    }

    #[must_use]
    pub fn expiry_rule(&self) -> ExpiryRule {
        self.rule
    }

    /// Validate the expiration segments against `now`.
    pub fn check_expiration(
        &self,
        values: &FieldValues,
        now: NaiveDate,
    ) -> Result<Expiration, SubmitError> {
        let expiration = Expiration::from_values(values).ok_or(SubmitError::ExpiredCard)?;

        if expiration.is_beyond_horizon(now, self.max_validity_years) {
            tracing::debug!(%expiration, %now, "expiration beyond validity horizon");
            return Err(SubmitError::ExpiredCard);
        }
        if expiration.is_expired(now, self.rule) {
            tracing::debug!(%expiration, %now, "card expired");
            return Err(SubmitError::ExpiredCard);
        }
        Ok(expiration)
    }

    /// Validate and assemble a record with a fresh id.
    pub fn submit(
        &mut self,
        values: &FieldValues,
        issuer: Option<CardIssuer>,
        now: NaiveDate,
    ) -> Result<CardRecord, SubmitError> {
        let issuer = issuer.ok_or(SubmitError::MissingIssuer)?;
        self.check_expiration(values, now)?;

        let id = self.ids.next_id();
        Ok(CardRecord::assemble(id, issuer, values))
    }
}
