//! # card-entry
//!
//! Segmented payment-card entry engine.
//!
//! A card is typed into a sequence of short, fixed-length segments (four
//! number groups, month, year, owner, CVC, two password digits). The engine
//! decides what each segment accepts, moves focus as segments fill up or
//! empty out, and assembles the validated values into a card record.
//! Rendering, dialogs and routing are collaborators that display engine
//! state and forward user events.
//!
//! ## Design Principles
//!
//! 1. **Table-driven**: every segment's content kind and length bounds come
//!    from `FormConfig`; there is no per-field handler code.
//!
//! 2. **Explicit focus order**: the segment ordering is built once from the
//!    configuration and never inferred from layout.
//!
//! 3. **One error at a time**: a form is `Editing`, `Rejected(reason)` or
//!    `Submitted(id)`; rendering the error is a single match.
//!
//! ## Architecture
//!
//! - **Copy-on-write values**: segment values live in `im` persistent
//!   vectors. Every accepted write yields a new snapshot, so observers
//!   detect changes by comparing snapshots.
//!
//! - **Synchronous**: each keystroke or submit runs to completion before the
//!   next event. A form instance exclusively owns its state.
//!
//! ## Modules
//!
//! - `core`: fields, segment ids, issuers, card ids, configuration
//! - `validate`: digit/letter predicates, month/year clamps
//! - `store`: segment state store
//! - `focus`: focus sequencer and the focus sink boundary
//! - `assembler`: expiration checks, card records, card list / navigation boundaries
//! - `form`: the form context and its state machine

pub mod core;
pub mod validate;
pub mod store;
pub mod focus;
pub mod assembler;
pub mod form;

// Re-export commonly used types
pub use crate::core::{
    Field, FieldMap, SegmentId,
    CardIssuer, ParseIssuerError,
    CardId, CardIdGenerator,
    ContentKind, DisplayHints, Width, SegmentConfig, FieldConfig, FormConfig,
    ExpiryRule, ConfigError,
};

pub use crate::validate::{is_digit_string, is_letter_string, clamp_month, clamp_year};

pub use crate::store::{SegmentStore, FieldValues, SegmentWrite, EntryError, InputRejection};

pub use crate::focus::{FocusSequencer, FocusSink, FocusMove};

pub use crate::assembler::{
    CardAssembler, CardRecord, CardList, Navigator,
    Expiration, RejectReason, SubmitError,
};

pub use crate::form::{FormContext, FormState, SegmentView, CardPreview};
