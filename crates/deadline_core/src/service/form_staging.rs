//! Create/edit draft staging.
//!
//! # Responsibility
//! - Hold an in-progress, unvalidated copy of item fields.
//! - Validate drafts and route commits to `ItemStore::create` or `update`.
//!
//! # Invariants
//! - A draft never reaches the collection without passing `validate`.
//! - A failed commit leaves the store untouched.
//! - One session holds at most one active draft.

use crate::model::item::{
    format_deadline, parse_deadline, Item, ItemFields, ItemId, ItemType, ItemValidationError,
    RequiredField,
};
use crate::repo::slot::PersistenceSlot;
use crate::service::item_store::{ItemStore, StoreError};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Loosely typed form state; may hold empty or malformed values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    /// Present when editing an existing item.
    pub id: Option<ItemId>,
    pub title: String,
    pub kind: ItemType,
    /// Raw `YYYY-MM-DD` text as typed.
    pub deadline: String,
    pub description: String,
    pub completed: bool,
}

/// One field edit applied to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Title(String),
    Kind(ItemType),
    Deadline(String),
    Description(String),
    Completed(bool),
}

/// Starts a draft: a copy of `initial` in edit mode, else an empty activity.
pub fn begin(initial: Option<&Item>) -> Draft {
    match initial {
        Some(item) => Draft {
            id: Some(item.id),
            title: item.title.clone(),
            kind: item.kind,
            deadline: format_deadline(item.deadline),
            description: item.description.clone(),
            completed: item.completed,
        },
        None => Draft::default(),
    }
}

impl Draft {
    /// Returns a copy with one field replaced. No validation happens here.
    pub fn with_field(mut self, field: DraftField) -> Draft {
        match field {
            DraftField::Title(value) => self.title = value,
            DraftField::Kind(value) => self.kind = value,
            DraftField::Deadline(value) => self.deadline = value,
            DraftField::Description(value) => self.description = value,
            DraftField::Completed(value) => self.completed = value,
        }
        self
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    /// Checks that required fields are filled and the deadline parses.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        self.to_fields().map(|_| ())
    }

    /// Converts into store-ready fields, trimming title and deadline.
    pub fn to_fields(&self) -> Result<ItemFields, ItemValidationError> {
        let title = self.title.trim();
        let deadline = self.deadline.trim();

        let mut missing = Vec::new();
        if title.is_empty() {
            missing.push(RequiredField::Title);
        }
        if deadline.is_empty() {
            missing.push(RequiredField::Deadline);
        }
        if !missing.is_empty() {
            return Err(ItemValidationError::MissingRequiredField(missing));
        }

        Ok(ItemFields {
            title: title.to_string(),
            kind: self.kind,
            deadline: parse_deadline(deadline)?,
            description: self.description.clone(),
            completed: self.completed,
        })
    }
}

/// Commit failure surfaced back to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    Validation(ItemValidationError),
    Store(StoreError),
}

impl Display for CommitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ItemValidationError> for CommitError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CommitError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

/// Validates `draft` and writes it through `store`.
///
/// Drafts carrying an id update that item; others create a new one.
pub fn commit<S: PersistenceSlot>(
    draft: &Draft,
    store: &mut ItemStore<S>,
) -> Result<Item, CommitError> {
    let fields = draft.to_fields().inspect_err(|err| {
        debug!("event=draft_commit module=form status=rejected error={err}");
    })?;

    let item = match draft.id {
        Some(id) => store.update(id, fields)?,
        None => store.create(fields)?,
    };
    Ok(item)
}

/// Editing session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Drafting(Draft),
    Committed(Item),
}

/// Single-draft editing session driving the form state machine.
#[derive(Debug, Default)]
pub struct FormSession {
    state: FormState,
    last_error: Option<CommitError>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Active draft, if any.
    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            FormState::Drafting(draft) => Some(draft),
            _ => None,
        }
    }

    /// Error from the last failed commit, cleared on the next edit.
    pub fn last_error(&self) -> Option<&CommitError> {
        self.last_error.as_ref()
    }

    /// Opens a new draft, discarding any uncommitted one.
    pub fn begin(&mut self, initial: Option<&Item>) -> Draft {
        if let FormState::Drafting(previous) = &self.state {
            debug!(
                "event=draft_discard module=form status=ok editing={}",
                previous.is_editing()
            );
        }
        let draft = begin(initial);
        self.last_error = None;
        self.state = FormState::Drafting(draft.clone());
        draft
    }

    /// Applies one field edit. Returns `None` when no draft is active.
    pub fn update(&mut self, field: DraftField) -> Option<&Draft> {
        let FormState::Drafting(draft) = &mut self.state else {
            return None;
        };
        *draft = std::mem::take(draft).with_field(field);
        self.last_error = None;
        self.draft()
    }

    /// Commits the active draft.
    ///
    /// On failure the draft stays editable and the error is kept in
    /// `last_error`. Returns `None` when no draft is active.
    pub fn commit<S: PersistenceSlot>(
        &mut self,
        store: &mut ItemStore<S>,
    ) -> Option<Result<Item, CommitError>> {
        let draft = self.draft()?;
        let result = commit(draft, store);
        match &result {
            Ok(item) => {
                info!(
                    "event=draft_commit module=form status=ok item_id={}",
                    item.id
                );
                self.last_error = None;
                self.state = FormState::Committed(item.clone());
            }
            Err(err) => self.last_error = Some(err.clone()),
        }
        Some(result)
    }

    /// Drops the active draft and returns to idle.
    pub fn cancel(&mut self) {
        self.state = FormState::Idle;
        self.last_error = None;
    }
}
