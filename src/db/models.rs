use crate::error::RecordsError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `records` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Record {
    pub id: String,
    pub title: String,
}

impl Record {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Body of `POST /api/recordslist`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRecord {
    pub id: Option<String>,
    pub title: Option<String>,
}

impl TryFrom<NewRecord> for Record {
    type Error = RecordsError;

    fn try_from(value: NewRecord) -> Result<Self, Self::Error> {
        let id = required("id", value.id)?;
        let title = required("title", value.title)?;
        Ok(Record { id, title })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, RecordsError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(RecordsError::Validation(format!(
            "'{field}' must not be blank"
        ))),
        None => Err(RecordsError::Validation(format!(
            "missing '{field}' in request body"
        ))),
    }
}

/// Body of `PATCH /api/recordslist/{id}`.
///
/// `id` may be echoed back but cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordPatch {
    pub id: Option<String>,
    pub title: Option<String>,
}

impl RecordPatch {
    /// Reject patches that rename the record, blank a field, or change nothing.
    pub fn validate_for(&self, id: &str) -> Result<(), RecordsError> {
        if let Some(body_id) = self.id.as_deref()
            && body_id != id
        {
            return Err(RecordsError::Validation(format!(
                "id '{body_id}' in body does not match '{id}' in path"
            )));
        }
        match self.title.as_deref() {
            Some(title) if title.trim().is_empty() => Err(RecordsError::Validation(
                "'title' must not be blank".to_string(),
            )),
            Some(_) => Ok(()),
            None => Err(RecordsError::Validation(
                "request body must contain 'title'".to_string(),
            )),
        }
    }
}
