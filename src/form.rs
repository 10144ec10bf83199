//! Form state for create/edit dialogs.
//!
//! A [`FormState`] is a draft of field values kept apart from fetched data.
//! It starts empty for a create dialog or seeded from a record for an edit
//! dialog. Submitting validates required fields locally first; a failed
//! write leaves the draft untouched so the user can retry, and a successful
//! one clears it.

use crate::errors::{Error, Result};
use std::{collections::BTreeMap, future::Future};
use tracing::debug;

/// A record that can seed an edit form.
pub trait FormRecord {
    /// Id of the record being edited
    fn record_id(&self) -> i64;

    /// Field name/value pairs the form starts from.
    fn form_fields(&self) -> Vec<(&'static str, String)>;
}

/// Whether the form creates a new record or edits an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: i64 },
}

/// Owned copy of a form's values, handed to the submit callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormValues {
    mode: FormMode,
    fields: BTreeMap<&'static str, String>,
}

impl FormValues {
    /// Create or edit
    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    /// Trimmed value of `field`, empty when unset.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map_or("", |value| value.trim())
    }

    /// Trimmed value of `field`, `None` when unset or blank.
    #[must_use]
    pub fn optional(&self, field: &str) -> Option<String> {
        Some(self.get(field))
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
    }
}

/// Draft values for one dialog.
#[derive(Clone, Debug)]
pub struct FormState {
    required: &'static [&'static str],
    values: FormValues,
}

impl FormState {
    /// Empty create form with the given required fields.
    #[must_use]
    pub const fn new(required: &'static [&'static str]) -> Self {
        Self {
            required,
            values: FormValues {
                mode: FormMode::Create,
                fields: BTreeMap::new(),
            },
        }
    }

    /// Edit form seeded from `record`.
    #[must_use]
    pub fn editing(required: &'static [&'static str], record: &impl FormRecord) -> Self {
        let mut form = Self::new(required);
        form.load_from(record);
        form
    }

    /// Clears every field and returns to create mode.
    pub fn reset(&mut self) {
        self.values.mode = FormMode::Create;
        self.values.fields.clear();
    }

    /// Replaces the draft with the fields of `record`, in edit mode.
    pub fn load_from(&mut self, record: &impl FormRecord) {
        self.values.mode = FormMode::Edit {
            id: record.record_id(),
        };
        self.values.fields = record.form_fields().into_iter().collect();
    }

    /// Sets one field.
    pub fn set(&mut self, field: &'static str, value: impl Into<String>) {
        self.values.fields.insert(field, value.into());
    }

    /// Sets `field` only when a value was provided, keeping the draft otherwise.
    pub fn set_if_some(&mut self, field: &'static str, value: Option<String>) {
        if let Some(value) = value {
            self.set(field, value);
        }
    }

    /// Current values
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Checks that every required field is non-blank.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = self
            .required
            .iter()
            .copied()
            .filter(|field| self.values.get(field).is_empty())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "Please fill in all required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// Validates, then runs `write` with a copy of the values.
    ///
    /// The draft is cleared only when `write` succeeds.
    pub async fn submit<F, Fut, T>(&mut self, write: F) -> Result<T>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.validate()?;
        let output = write(self.values.clone()).await?;
        debug!("Form submitted in {:?} mode", self.values.mode);
        self.reset();
        Ok(output)
    }
}
