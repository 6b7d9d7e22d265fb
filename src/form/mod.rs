//! Form context: one card-entry form instance.
//!
//! `FormContext` owns everything a single form needs and is the only thing
//! the render layer talks to:
//! - the segment store (values, layout)
//! - the focus sequencer (cursor, focus sink)
//! - the selected issuer
//! - the card assembler (expiry rule, id generator)
//! - the form state machine
//!
//! ## State machine
//!
//! ```text
//! Editing ──edit──▶ Editing
//! Editing ──submit (invalid)──▶ Rejected(reason)
//! Rejected ──edit / submit──▶ Editing (then re-validated)
//! Editing ──submit (valid)──▶ Submitted(id)   terminal
//! ```
//!
//! Only one rejection is representable at a time, so rendering the error
//! reduces to a single match on [`FormContext::error`].
//!
//! ## Example
//!
//! ```
//! use card_entry::core::{CardId, CardIssuer, Field, FormConfig, SegmentId};
//! use card_entry::form::{FormContext, FormState};
//! use card_entry::assembler::CardRecord;
//! use chrono::NaiveDate;
//!
//! let mut form = FormContext::new(&FormConfig::standard().with_id_seed(1)).unwrap();
//! for (i, group) in ["1111", "2222", "3333", "4444"].iter().enumerate() {
//!     form.input(SegmentId::new(Field::CardNumber, i), *group).unwrap();
//! }
//! form.input(SegmentId::new(Field::ExpirationDate, 0), "12").unwrap();
//! form.input(SegmentId::new(Field::ExpirationDate, 1), "30").unwrap();
//! form.select_issuer(Some(CardIssuer::Visa)).unwrap();
//!
//! let mut cards: Vec<CardRecord> = Vec::new();
//! let mut next_page: Option<CardId> = None;
//! let now = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let id = form.submit(now, &mut cards, &mut next_page).unwrap();
//!
//! assert_eq!(cards[0].id(), id);
//! assert_eq!(next_page, Some(id));
//! assert_eq!(form.state(), FormState::Submitted(id));
//! ```

mod preview;

pub use preview::{mask, CardPreview, MASK_CHAR};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assembler::{CardAssembler, CardList, Navigator, RejectReason, SubmitError};
use crate::core::{
    CardId, CardIssuer, ConfigError, Field, FieldConfig, FormConfig, SegmentConfig, SegmentId,
};
use crate::focus::{FocusMove, FocusSequencer, FocusSink};
use crate::store::{EntryError, FieldValues, SegmentStore, SegmentWrite};

/// Lifecycle state of a form instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormState {
    /// Accepting edits; no error shown.
    Editing,
    /// Last submit was refused; still accepting edits.
    Rejected(RejectReason),
    /// Card handed off. No further edits or submits.
    Submitted(CardId),
}

impl FormState {
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, FormState::Submitted(_))
    }
}

/// What the render layer needs to draw one segment.
#[derive(Clone, Debug)]
pub struct SegmentView<'a> {
    pub id: SegmentId,
    pub value: &'a str,
    pub config: &'a SegmentConfig,
    pub focused: bool,
}

impl SegmentView<'_> {
    /// Value as it should be shown: masked segments show one mask character
    /// per digit.
    #[must_use]
    pub fn display_value(&self) -> String {
        if self.config.kind.is_masked() {
            mask(self.value)
        } else {
            self.value.to_string()
        }
    }

    /// Characters entered out of the maximum, e.g. `"3 / 30"`.
    #[must_use]
    pub fn counter(&self) -> String {
        format!("{} / {}", self.value.chars().count(), self.config.max_len)
    }
}

/// One card-entry form instance.
#[derive(Clone, Debug)]
pub struct FormContext<F = ()> {
    store: SegmentStore,
    focus: FocusSequencer,
    assembler: CardAssembler,
    issuer: Option<CardIssuer>,
    state: FormState,
    sink: F,
}

impl FormContext<()> {
    /// Create a form whose focus changes are not forwarded anywhere.
    pub fn new(config: &FormConfig) -> Result<Self, ConfigError> {
        Self::with_focus_sink(config, ())
    }
}

impl<F: FocusSink> FormContext<F> {
    /// Create a form that forwards every focus change to `sink`.
    ///
    /// The first segment receives focus immediately, as on mount.
    pub fn with_focus_sink(config: &FormConfig, mut sink: F) -> Result<Self, ConfigError> {
        config.validate()?;

        let store = SegmentStore::new(config);
        let focus = FocusSequencer::new(store.segment_ids().collect());
        sink.focus(focus.current());

        Ok(Self {
            store,
            focus,
            assembler: CardAssembler::from_config(config),
            issuer: None,
            state: FormState::Editing,
            sink,
        })
    }

    // === Editing ===

    /// Write handler for one segment.
    ///
    /// Rejected input leaves every value and the focus untouched; the
    /// caller is expected to drop [`EntryError::InvalidSegmentInput`]
    /// silently.
    pub fn input(
        &mut self,
        segment: SegmentId,
        raw: impl Into<String>,
    ) -> Result<SegmentWrite, EntryError> {
        self.input_with_focus(segment, raw).map(|(write, _)| write)
    }

    /// Like [`FormContext::input`], also reporting how focus moved.
    pub fn input_with_focus(
        &mut self,
        segment: SegmentId,
        raw: impl Into<String>,
    ) -> Result<(SegmentWrite, FocusMove), EntryError> {
        self.reopen().map_err(|_| EntryError::FormClosed)?;

        let write = self.store.set_segment(segment, raw)?;
        let moved = self.focus.react(&write, &mut self.sink);
        Ok((write, moved))
    }

    /// Place focus on a segment the user clicked into.
    pub fn focus_segment(&mut self, segment: SegmentId) -> bool {
        self.focus.focus(segment, &mut self.sink)
    }

    /// Issuer chooser callback. `None` clears the selection.
    pub fn select_issuer(&mut self, issuer: Option<CardIssuer>) -> Result<(), EntryError> {
        self.reopen().map_err(|_| EntryError::FormClosed)?;
        self.issuer = issuer;
        tracing::debug!(issuer = ?issuer, "issuer selected");
        Ok(())
    }

    // === Submit ===

    /// Validate and hand off the card.
    ///
    /// On success the record is appended to `cards`, `navigator` is sent
    /// the new id and the form closes. On a user-correctable failure the
    /// form moves to `Rejected` and stays editable.
    pub fn submit(
        &mut self,
        now: NaiveDate,
        cards: &mut impl CardList,
        navigator: &mut impl Navigator,
    ) -> Result<CardId, SubmitError> {
        self.reopen()?;

        match self.assembler.submit(self.store.values(), self.issuer, now) {
            Ok(record) => {
                let id = record.id();
                cards.append_card(record);
                navigator.card_naming(id);
                self.state = FormState::Submitted(id);
                tracing::info!(card = %id, "card submitted");
                Ok(id)
            }
            Err(err) => {
                if let Some(reason) = err.reject_reason() {
                    self.state = FormState::Rejected(reason);
                }
                tracing::debug!(error = %err, "submit rejected");
                Err(err)
            }
        }
    }

    /// [`FormContext::submit`] against today's local date.
    pub fn submit_today(
        &mut self,
        cards: &mut impl CardList,
        navigator: &mut impl Navigator,
    ) -> Result<CardId, SubmitError> {
        self.submit(chrono::Local::now().date_naive(), cards, navigator)
    }

    /// Leave `Rejected` before the next edit or submit; refuse once submitted.
    fn reopen(&mut self) -> Result<(), SubmitError> {
        match self.state {
            FormState::Submitted(_) => Err(SubmitError::FormClosed),
            FormState::Rejected(_) => {
                self.state = FormState::Editing;
                Ok(())
            }
            FormState::Editing => Ok(()),
        }
    }

    // === Render boundary ===

    #[must_use]
    pub fn state(&self) -> FormState {
        self.state
    }

    /// The one rejection to show, if any.
    #[must_use]
    pub fn error(&self) -> Option<RejectReason> {
        match self.state {
            FormState::Rejected(reason) => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn issuer(&self) -> Option<CardIssuer> {
        self.issuer
    }

    /// FocusCursor: index of the focused segment in entry order.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.focus.cursor()
    }

    #[must_use]
    pub fn focused_segment(&self) -> SegmentId {
        self.focus.current()
    }

    /// Every segment in entry order.
    #[must_use]
    pub fn focus_order(&self) -> &[SegmentId] {
        self.focus.order()
    }

    #[must_use]
    pub fn value(&self, segment: SegmentId) -> Option<&str> {
        self.store.value(segment)
    }

    #[must_use]
    pub fn values(&self) -> &FieldValues {
        self.store.values()
    }

    /// Independent O(1) snapshot of all values, for change detection.
    #[must_use]
    pub fn snapshot(&self) -> FieldValues {
        self.store.snapshot()
    }

    #[must_use]
    pub fn field_config(&self, field: Field) -> &FieldConfig {
        self.store.field_config(field)
    }

    /// Every segment of `field` meets its minimum length.
    #[must_use]
    pub fn is_complete(&self, field: Field) -> bool {
        self.store.is_complete(field)
    }

    /// Views of every segment, in entry order.
    pub fn segments(&self) -> impl Iterator<Item = SegmentView<'_>> + '_ {
        let focused = self.focus.current();
        self.focus.order().iter().filter_map(move |&id| {
            Some(SegmentView {
                id,
                value: self.store.value(id)?,
                config: self.store.segment_config(id)?,
                focused: id == focused,
            })
        })
    }

    /// Display snapshot for the card preview.
    #[must_use]
    pub fn preview(&self) -> CardPreview {
        CardPreview::build(
            self.issuer,
            self.store.values(),
            self.store.field_config(Field::CardNumber),
        )
    }

    #[must_use]
    pub fn sink(&self) -> &F {
        &self.sink
    }

    /// Consume the form, returning its focus sink.
    pub fn into_sink(self) -> F {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::CardRecord;

    fn form() -> FormContext {
        FormContext::new(&FormConfig::standard().with_id_seed(42)).unwrap()
    }

    fn id(field: Field, index: usize) -> SegmentId {
        SegmentId::new(field, index)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fill_valid(form: &mut FormContext<impl FocusSink>) {
        for (i, group) in ["1111", "2222", "3333", "4444"].iter().enumerate() {
            form.input(id(Field::CardNumber, i), *group).unwrap();
        }
        form.input(id(Field::ExpirationDate, 0), "12").unwrap();
        form.input(id(Field::ExpirationDate, 1), "30").unwrap();
    }

    #[test]
    fn test_new_form() {
        let form = form();

        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.cursor(), 0);
        assert_eq!(form.focused_segment(), id(Field::CardNumber, 0));
        assert_eq!(form.focus_order().len(), 10);
        assert_eq!(form.issuer(), None);
        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_invalid_config() {
        let config = FormConfig::standard().with_max_validity_years(0);
        assert_eq!(FormContext::new(&config).unwrap_err(), ConfigError::ZeroValidityHorizon);
    }

    #[test]
    fn test_mount_focuses_first_segment() {
        let form =
            FormContext::with_focus_sink(&FormConfig::standard(), Vec::<SegmentId>::new()).unwrap();
        assert_eq!(form.sink(), &vec![id(Field::CardNumber, 0)]);
    }

    #[test]
    fn test_typing_walks_focus_forward() {
        let mut form =
            FormContext::with_focus_sink(&FormConfig::standard(), Vec::<SegmentId>::new()).unwrap();
        fill_valid(&mut form);

        assert_eq!(form.cursor(), 6);
        assert_eq!(form.focused_segment(), id(Field::Owner, 0));

        let focused = form.into_sink();
        assert_eq!(focused.len(), 7);
        assert_eq!(focused[4], id(Field::ExpirationDate, 0));
    }

    #[test]
    fn test_backspace_to_empty_retreats() {
        let mut form = form();
        form.input(id(Field::CardNumber, 0), "1111").unwrap();
        form.input(id(Field::CardNumber, 1), "2").unwrap();
        assert_eq!(form.cursor(), 1);

        let (_, moved) = form.input_with_focus(id(Field::CardNumber, 1), "").unwrap();
        assert_eq!(moved, FocusMove::Retreated(id(Field::CardNumber, 0)));
        assert_eq!(form.cursor(), 0);
    }

    #[test]
    fn test_input_and_input_with_focus_agree() {
        let mut plain = form();
        let mut reported = form();
        let segment = id(Field::CardNumber, 0);

        let write = plain.input(segment, "1234").unwrap();
        let (same, moved) = reported.input_with_focus(segment, "1234").unwrap();
        assert_eq!(write, same);
        assert_eq!(moved, FocusMove::Advanced(id(Field::CardNumber, 1)));
        assert_eq!(plain.cursor(), reported.cursor());
        assert_eq!(plain.values(), reported.values());

        plain.submit(date(2024, 1, 1), &mut Vec::<CardRecord>::new(), &mut ()).unwrap_err();
        assert_eq!(plain.state(), FormState::Rejected(RejectReason::MissingIssuer));
        plain.input(id(Field::CardNumber, 1), "x").unwrap_err();
        assert_eq!(plain.state(), FormState::Editing);
    }

    #[test]
    fn test_rejected_input_changes_nothing() {
        let mut form = form();
        form.input(id(Field::CardNumber, 0), "12").unwrap();
        let before = form.snapshot();

        let err = form.input(id(Field::CardNumber, 0), "12x").unwrap_err();
        assert!(matches!(err, EntryError::InvalidSegmentInput { .. }));
        assert_eq!(form.values(), &before);
        assert_eq!(form.cursor(), 0);
    }

    #[test]
    fn test_submit_without_issuer() {
        let mut form = form();
        fill_valid(&mut form);
        let mut cards: Vec<CardRecord> = Vec::new();

        let result = form.submit(date(2024, 1, 1), &mut cards, &mut ());
        assert_eq!(result, Err(SubmitError::MissingIssuer));
        assert_eq!(form.error(), Some(RejectReason::MissingIssuer));
        assert!(cards.is_empty());
    }

    #[test]
    fn test_rejected_resets_on_edit() {
        let mut form = form();
        form.submit(date(2024, 1, 1), &mut Vec::<CardRecord>::new(), &mut ()).unwrap_err();
        assert_eq!(form.state(), FormState::Rejected(RejectReason::MissingIssuer));

        form.input(id(Field::Owner, 0), "PARK").unwrap();
        assert_eq!(form.state(), FormState::Editing);
    }

    #[test]
    fn test_resubmit_replaces_error() {
        let mut form = form();
        form.select_issuer(Some(CardIssuer::Lotte)).unwrap();
        form.input(id(Field::ExpirationDate, 0), "01").unwrap();
        form.input(id(Field::ExpirationDate, 1), "20").unwrap();

        form.submit(date(2024, 1, 1), &mut Vec::<CardRecord>::new(), &mut ()).unwrap_err();
        assert_eq!(form.error(), Some(RejectReason::ExpiredCard));

        form.select_issuer(None).unwrap();
        form.submit(date(2024, 1, 1), &mut Vec::<CardRecord>::new(), &mut ()).unwrap_err();
        assert_eq!(form.error(), Some(RejectReason::MissingIssuer));
    }

    #[test]
    fn test_successful_submit_closes_form() {
        let mut form = form();
        fill_valid(&mut form);
        form.select_issuer(Some(CardIssuer::Visa)).unwrap();

        let mut cards: Vec<CardRecord> = Vec::new();
        let mut nav: Option<CardId> = None;
        let card = form.submit(date(2024, 1, 1), &mut cards, &mut nav).unwrap();

        assert_eq!(form.state(), FormState::Submitted(card));
        assert_eq!(form.error(), None);
        assert_eq!(nav, Some(card));
        assert_eq!(cards.len(), 1);

        assert_eq!(form.input(id(Field::Cvc, 0), "1"), Err(EntryError::FormClosed));
        assert_eq!(form.select_issuer(None), Err(EntryError::FormClosed));
        assert_eq!(
            form.submit(date(2024, 1, 1), &mut cards, &mut nav),
            Err(SubmitError::FormClosed)
        );
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_segment_views() {
        let mut form = form();
        form.input(id(Field::CardNumber, 2), "12").unwrap();
        form.input(id(Field::Owner, 0), "KIM").unwrap();

        let views: Vec<_> = form.segments().collect();
        assert_eq!(views.len(), 10);

        let masked = &views[2];
        assert_eq!(masked.value, "12");
        assert_eq!(masked.display_value(), "••");

        let owner = &views[6];
        assert_eq!(owner.counter(), "3 / 30");
        assert!(owner.focused);
        assert_eq!(views.iter().filter(|v| v.focused).count(), 1);
    }

    #[test]
    fn test_focus_segment_on_click() {
        let mut form = form();
        assert!(form.focus_segment(id(Field::Cvc, 0)));
        assert_eq!(form.cursor(), 7);
    }

    #[test]
    fn test_preview_follows_edits() {
        let mut form = form();
        form.select_issuer(Some(CardIssuer::Shinhan)).unwrap();
        fill_valid(&mut form);

        let preview = form.preview();
        assert_eq!(preview.issuer, Some(CardIssuer::Shinhan));
        assert_eq!(preview.number_line(), "1111 2222 •••• ••••");
        assert_eq!(preview.expiration, "12/30");
    }
}
