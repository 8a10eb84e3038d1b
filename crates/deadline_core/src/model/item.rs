//! Deadline item domain model.
//!
//! # Responsibility
//! - Define the canonical record rendered by calendar and list views.
//! - Own the closed category set and its presentation metadata.
//! - Normalize deadline text into calendar-day dates.
//!
//! # Invariants
//! - `id` is stable and never reassigned to another item.
//! - `title` is never empty or whitespace-only once stored.
//! - `deadline` has day granularity and serializes as `YYYY-MM-DD`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Wire format for normalized deadline strings.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

static DEADLINE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid deadline regex"));

/// Stable identifier for every item in the collection.
pub type ItemId = i64;

/// Closed category set for deadline items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Homework-style assignment.
    #[default]
    Activity,
    /// Exam or graded test.
    Evaluation,
    /// Quiz or questionnaire.
    Questionnaire,
    /// Forum participation.
    Forum,
}

impl ItemType {
    /// All categories in display order.
    pub const ALL: [ItemType; 4] = [
        ItemType::Activity,
        ItemType::Evaluation,
        ItemType::Questionnaire,
        ItemType::Forum,
    ];

    /// Stable wire string used in persisted snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Evaluation => "evaluation",
            Self::Questionnaire => "questionnaire",
            Self::Forum => "forum",
        }
    }

    /// User-facing category label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Activity => "Actividad",
            Self::Evaluation => "Evaluación",
            Self::Questionnaire => "Cuestionario",
            Self::Forum => "Foro",
        }
    }

    /// Icon glyph shown next to the title.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Activity => "📝",
            Self::Evaluation => "📊",
            Self::Questionnaire => "📋",
            Self::Forum => "💬",
        }
    }

    /// Color token consumed by presentation themes.
    pub fn color(self) -> &'static str {
        match self {
            Self::Activity => "blue",
            Self::Evaluation => "red",
            Self::Questionnaire => "green",
            Self::Forum => "purple",
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one category from its wire string.
pub fn parse_item_type(value: &str) -> Option<ItemType> {
    match value.trim() {
        "activity" => Some(ItemType::Activity),
        "evaluation" => Some(ItemType::Evaluation),
        "questionnaire" => Some(ItemType::Questionnaire),
        "forum" => Some(ItemType::Forum),
        _ => None,
    }
}

/// Parses a normalized `YYYY-MM-DD` deadline.
///
/// Rejects unpadded forms (`2025-1-5`) and impossible dates (`2025-02-30`).
pub fn parse_deadline(value: &str) -> Result<NaiveDate, ItemValidationError> {
    let trimmed = value.trim();
    if !DEADLINE_SHAPE_RE.is_match(trimmed) {
        return Err(ItemValidationError::InvalidDeadline(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DEADLINE_FORMAT)
        .map_err(|_| ItemValidationError::InvalidDeadline(trimmed.to_string()))
}

/// Formats a deadline in the normalized wire shape.
pub fn format_deadline(date: NaiveDate) -> String {
    date.format(DEADLINE_FORMAT).to_string()
}

/// Field that must be filled before an item can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Deadline,
}

impl RequiredField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Deadline => "deadline",
        }
    }
}

/// Validation errors for item write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// One or more required fields are empty.
    MissingRequiredField(Vec<RequiredField>),
    /// Deadline text is not a normalized calendar date.
    InvalidDeadline(String),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField(fields) => {
                let names = fields
                    .iter()
                    .map(|field| field.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "missing required field(s): {names}")
            }
            Self::InvalidDeadline(value) => {
                write!(f, "deadline `{value}` is not a valid YYYY-MM-DD date")
            }
        }
    }
}

impl Error for ItemValidationError {}

fn validate_title(title: &str) -> Result<(), ItemValidationError> {
    if title.trim().is_empty() {
        return Err(ItemValidationError::MissingRequiredField(vec![
            RequiredField::Title,
        ]));
    }
    Ok(())
}

/// Validated field set for create/update; everything but the `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub title: String,
    pub kind: ItemType,
    pub deadline: NaiveDate,
    pub description: String,
    pub completed: bool,
}

impl ItemFields {
    /// Creates an open item with empty description.
    pub fn new(title: impl Into<String>, kind: ItemType, deadline: NaiveDate) -> Self {
        Self {
            title: title.into(),
            kind,
            deadline,
            description: String::new(),
            completed: false,
        }
    }

    /// Sets the description, builder style.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the completion flag, builder style.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Checks write-path invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_title(&self.title)
    }
}

/// Canonical stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Serialized as `type` to match the persisted schema.
    #[serde(rename = "type")]
    pub kind: ItemType,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(with = "deadline_format")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Item {
    /// Builds a stored item from an id and validated fields.
    pub fn from_fields(id: ItemId, fields: ItemFields) -> Self {
        Self {
            id,
            title: fields.title,
            kind: fields.kind,
            deadline: fields.deadline,
            description: fields.description,
            completed: fields.completed,
        }
    }

    /// Returns a copy of every field except `id`.
    pub fn fields(&self) -> ItemFields {
        ItemFields {
            title: self.title.clone(),
            kind: self.kind,
            deadline: self.deadline,
            description: self.description.clone(),
            completed: self.completed,
        }
    }

    /// Replaces every field except `id`.
    pub fn apply(&mut self, fields: ItemFields) {
        self.title = fields.title;
        self.kind = fields.kind;
        self.deadline = fields.deadline;
        self.description = fields.description;
        self.completed = fields.completed;
    }

    /// Deadline in normalized wire form.
    pub fn deadline_str(&self) -> String {
        format_deadline(self.deadline)
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_title(&self.title)
    }
}

mod deadline_format {
    use super::{format_deadline, parse_deadline};
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_deadline(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_deadline(&raw).map_err(D::Error::custom)
    }
}
