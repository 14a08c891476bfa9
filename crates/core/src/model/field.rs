use thiserror::Error;

use crate::model::ids::FieldId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldError {
    #[error("field name cannot be empty")]
    EmptyName,

    #[error("default time per question must be > 0")]
    InvalidTimePerQuestion,
}

//
// ─── FIELD ─────────────────────────────────────────────────────────────────────
//

/// A quiz field: one exam/subject grouping that questions belong to.
///
/// Fields are authored by admins and read-only to learners. The per-question
/// time default applies to questions without their own allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    id: FieldId,
    name: String,
    description: String,
    audience: String,
    default_time_per_question: u32,
}

impl Field {
    /// Fallback per-question time when the backend omits one, in seconds.
    pub const DEFAULT_TIME_PER_QUESTION: u32 = 60;

    /// Creates a field from backend data.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::EmptyName` if the name is blank and
    /// `FieldError::InvalidTimePerQuestion` if the time default is zero.
    pub fn new(
        id: FieldId,
        name: impl Into<String>,
        description: impl Into<String>,
        audience: impl Into<String>,
        default_time_per_question: u32,
    ) -> Result<Self, FieldError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FieldError::EmptyName);
        }
        if default_time_per_question == 0 {
            return Err(FieldError::InvalidTimePerQuestion);
        }

        Ok(Self {
            id,
            name,
            description: description.into(),
            audience: audience.into(),
            default_time_per_question,
        })
    }

    #[must_use]
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The exam audience this field targets (the backend's `for` attribute).
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Seconds granted per question when a question carries no allocation.
    #[must_use]
    pub fn default_time_per_question(&self) -> u32 {
        self.default_time_per_question
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Admin-entered data for creating or updating a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDraft {
    name: String,
    description: String,
    audience: String,
    default_time_per_question: Option<u32>,
}

impl FieldDraft {
    /// Validates admin input for a field create/update.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::EmptyName` if the name is blank and
    /// `FieldError::InvalidTimePerQuestion` for an explicit zero time.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        audience: impl Into<String>,
        default_time_per_question: Option<u32>,
    ) -> Result<Self, FieldError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FieldError::EmptyName);
        }
        if default_time_per_question == Some(0) {
            return Err(FieldError::InvalidTimePerQuestion);
        }

        Ok(Self {
            name,
            description: description.into(),
            audience: audience.into(),
            default_time_per_question,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    #[must_use]
    pub fn default_time_per_question(&self) -> Option<u32> {
        self.default_time_per_question
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_id() -> FieldId {
        FieldId::new("f1").unwrap()
    }

    #[test]
    fn field_rejects_empty_name() {
        let err = Field::new(field_id(), "  ", "", "", 60).unwrap_err();
        assert_eq!(err, FieldError::EmptyName);
    }

    #[test]
    fn field_rejects_zero_time() {
        let err = Field::new(field_id(), "Physics", "", "JEE", 0).unwrap_err();
        assert_eq!(err, FieldError::InvalidTimePerQuestion);
    }

    #[test]
    fn draft_allows_missing_time_default() {
        let draft = FieldDraft::new("Physics", "Mechanics and waves", "JEE", None).unwrap();
        assert_eq!(draft.default_time_per_question(), None);
        assert!(FieldDraft::new("Physics", "", "", Some(0)).is_err());
    }
}
