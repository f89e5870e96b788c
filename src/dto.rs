//! # SpecEduTracker — Request/Response DTOs
//!
//! API contract types in one module.
//!
//! Conventions:
//! - `*Form`     → deserialized from client JSON body, validated before use
//! - `*Response` → serialized to client JSON
//! - Validation is expressed via `validator` derive macros

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::daily_log::{Emotion, LogEntry, Mood, NewLogEntry, SensoryIssue, NOTES_MAX_CHARS};

// ============================================================================
// Daily log form
// ============================================================================

/// POST /api/daily-logs
///
/// Every field is optional at the wire level so a missing selection is
/// reported as `required` instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogForm {
    #[validate(required(message = "Velg humør"), custom = "validate_mood")]
    pub mood: Option<String>,

    #[validate(required(message = "Velg følelse"), custom = "validate_emotion")]
    pub emotions: Option<String>,

    #[validate(
        required(message = "Velg sensorisk utfordring"),
        custom = "validate_sensory_issue"
    )]
    pub sensory_issues: Option<String>,

    #[validate(
        required(message = "Notat er påkrevd"),
        length(min = 1, code = "required", message = "Notat er påkrevd"),
        length(
            max = 500,
            code = "too_long",
            message = "Notatet kan ikke være lengre enn 500 tegn"
        )
    )]
    pub notes: Option<String>,
}

impl DailyLogForm {
    /// Validate every field and convert into a typed entry. All failing
    /// fields are reported at once.
    pub fn into_entry(self) -> Result<NewLogEntry, FieldErrors> {
        self.validate()?;

        Ok(NewLogEntry {
            mood: parse_label(self.mood, Field::Mood)?,
            emotions: parse_label(self.emotions, Field::Emotions)?,
            sensory_issues: parse_label(self.sensory_issues, Field::SensoryIssues)?,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

fn parse_label<T: FromStr>(value: Option<String>, field: Field) -> Result<T, FieldErrors> {
    let Some(raw) = value else {
        return Err(FieldError::new(field, Reason::Required, field.required_message()).into());
    };
    raw.parse()
        .map_err(|_| FieldError::new(field, Reason::InvalidOption, "Ugyldig valg").into())
}

fn invalid_option() -> ValidationError {
    let mut err = ValidationError::new("invalid_option");
    err.message = Some(Cow::from("Ugyldig valg"));
    err
}

fn validate_mood(value: &str) -> Result<(), ValidationError> {
    value.parse::<Mood>().map(|_| ()).map_err(|_| invalid_option())
}

fn validate_emotion(value: &str) -> Result<(), ValidationError> {
    value.parse::<Emotion>().map(|_| ()).map_err(|_| invalid_option())
}

fn validate_sensory_issue(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<SensoryIssue>()
        .map(|_| ())
        .map_err(|_| invalid_option())
}

// ============================================================================
// Validation errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Mood,
    Emotions,
    SensoryIssues,
    Notes,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Mood => "mood",
            Field::Emotions => "emotions",
            Field::SensoryIssues => "sensoryIssues",
            Field::Notes => "notes",
        }
    }

    fn from_validator_key(key: &str) -> Option<Self> {
        match key {
            "mood" => Some(Field::Mood),
            "emotions" => Some(Field::Emotions),
            "sensory_issues" | "sensoryIssues" => Some(Field::SensoryIssues),
            "notes" => Some(Field::Notes),
            _ => None,
        }
    }

    fn required_message(&self) -> &'static str {
        match self {
            Field::Mood => "Velg humør",
            Field::Emotions => "Velg følelse",
            Field::SensoryIssues => "Velg sensorisk utfordring",
            Field::Notes => "Notat er påkrevd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Required,
    TooLong,
    InvalidOption,
}

impl Reason {
    fn from_code(code: &str) -> Self {
        match code {
            "too_long" => Reason::TooLong,
            "invalid_option" => Reason::InvalidOption,
            _ => Reason::Required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub reason: Reason,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, reason: Reason, message: impl Into<String>) -> Self {
        Self {
            field,
            reason,
            message: message.into(),
        }
    }
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl FieldErrors {
    /// Field-level view of a body that failed to deserialize, e.g.
    /// `mood: invalid type: integer `5`, expected a string at line 1 column 9`.
    pub fn from_deserialize_error(detail: &str) -> Option<Self> {
        let (path, _) = detail.split_once(": ")?;
        let field = Field::from_validator_key(path)?;
        Some(FieldError::new(field, Reason::InvalidOption, "Ugyldig valg").into())
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let by_field: HashMap<&'static str, &Vec<ValidationError>> = errors.field_errors();
        let mut fields: Vec<FieldError> = by_field
            .into_iter()
            .filter_map(|(key, errs)| {
                let field = Field::from_validator_key(key)?;
                // One reason per field; the first failing check wins.
                let first = errs.first()?;
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| field.required_message().to_string());
                Some(FieldError::new(field, Reason::from_code(&first.code), message))
            })
            .collect();
        fields.sort_by_key(|e| e.field);
        Self(fields)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field.as_str(), e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

// ============================================================================
// Form options
// ============================================================================

/// GET /api/options — the fixed choices, in display order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogOptionsResponse {
    pub moods: [Mood; 6],
    pub emotions: [Emotion; 6],
    pub sensory_issues: [SensoryIssue; 6],
    pub notes_max_chars: usize,
}

impl Default for LogOptionsResponse {
    fn default() -> Self {
        Self {
            moods: Mood::ALL,
            emotions: Emotion::ALL,
            sensory_issues: SensoryIssue::ALL,
            notes_max_chars: NOTES_MAX_CHARS,
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

pub const NO_ENTRIES_TEXT: &str = "Ingen registreringer enda";

/// GET /api/dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardResponse {
    pub cards: Vec<DashboardCard>,
    pub latest: Option<LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCard {
    pub title: String,
    /// Raw label of the latest entry, absent when nothing is logged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub text: String,
}

impl DashboardCard {
    pub fn new(title: &str, value: Option<String>) -> Self {
        let text = value.clone().unwrap_or_else(|| NO_ENTRIES_TEXT.to_string());
        Self {
            title: title.to_string(),
            value,
            text,
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadyzResponse {
    pub status: String,
    pub checks: ReadyzChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyzChecks {
    pub storage: bool,
}
