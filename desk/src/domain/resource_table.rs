//! Generic CRUD table use-case, parametrised by a [`ResourceSchema`].
//!
//! The service never holds per-user state: callers pass in the
//! [`ModeController`] that belongs to the current form and persist it
//! afterwards. Every failure is turned into a [`Notice`] for the user and an
//! error event in the log; nothing is retried.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::mode::ModeController;
use crate::domain::ports::ResourceApi;
use crate::domain::record::{FormValues, Record, RecordId};
use crate::domain::schema::ResourceSchema;
use crate::domain::validation::{ValidationError, validate};

/// Alert shown when the record selected for editing no longer exists.
pub const STALE_EDIT_MESSAGE: &str = "El registro seleccionado ya no existe.";

/// Blocking alert shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
}

impl Notice {
    /// Wrap an alert message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Alert text.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl From<&ValidationError> for Notice {
    fn from(value: &ValidationError) -> Self {
        Self::new(value.to_string())
    }
}

/// Everything needed to render one resource page.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// Records in API order; the table body is rebuilt from these.
    pub records: Vec<Record>,
    /// Values shown in the form.
    pub form: FormValues,
    /// Alert raised while assembling the view.
    pub notice: Option<Notice>,
    /// False when the record list could not be fetched.
    pub loaded: bool,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A new record was stored; `None` when the upstream only acknowledged
    /// the write.
    Created(Option<Record>),
    /// An existing record was updated and the form returned to create mode.
    Updated(Record),
}

/// Why a submission did not go through.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// The form failed validation; the API was not called.
    Invalid(ValidationError),
    /// The API call failed.
    Upstream(Notice),
}

impl SubmitError {
    /// Alert to show for this failure.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Invalid(err) => Notice::from(err),
            Self::Upstream(notice) => notice.clone(),
        }
    }
}

/// CRUD table operations for one resource.
#[derive(Clone)]
pub struct ResourceTableService {
    schema: Arc<ResourceSchema>,
    api: Arc<dyn ResourceApi>,
}

impl ResourceTableService {
    /// Bind a schema to the API client serving it.
    #[must_use]
    pub fn new(schema: Arc<ResourceSchema>, api: Arc<dyn ResourceApi>) -> Self {
        Self { schema, api }
    }

    /// Schema this service is bound to.
    #[must_use]
    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    /// Load the table and work out the form contents.
    ///
    /// `submitted` carries values the user just posted so a rejected form is
    /// shown again unchanged. Otherwise an edit in progress is pre-filled from
    /// the freshly loaded record; if that record has disappeared the form
    /// falls back to create mode.
    pub async fn view(&self, mode: &mut ModeController, submitted: Option<FormValues>) -> TableView {
        let (records, mut notice, loaded) = match self.api.list().await {
            Ok(records) => (records, None, true),
            Err(err) => {
                error!(resource = self.schema.slug(), error = %err, "table load failed");
                (
                    Vec::new(),
                    Some(Notice::new(self.schema.messages().load_failed)),
                    false,
                )
            }
        };

        let form = match (submitted, mode.editing().cloned()) {
            (Some(form), _) => form,
            (None, None) => FormValues::empty(),
            (None, Some(id)) => match records.iter().find(|record| record.id() == &id) {
                Some(record) => FormValues::from_record(&self.schema, record),
                None if loaded => {
                    mode.activate_create();
                    notice = Some(Notice::new(STALE_EDIT_MESSAGE));
                    FormValues::empty()
                }
                None => FormValues::empty(),
            },
        };

        TableView {
            records,
            form,
            notice,
            loaded,
        }
    }

    /// Submit the form through the handler installed in `mode`.
    ///
    /// Validation runs first and short-circuits before any API call. A
    /// successful update switches `mode` back to create.
    ///
    /// # Errors
    /// [`SubmitError::Invalid`] for rejected forms, [`SubmitError::Upstream`]
    /// when the API call fails.
    pub async fn submit(
        &self,
        mode: &mut ModeController,
        form: &FormValues,
    ) -> Result<SubmitOutcome, SubmitError> {
        validate(&self.schema, form).map_err(SubmitError::Invalid)?;

        let slug = self.schema.slug();
        let messages = self.schema.messages();
        let payload = form.to_payload(&self.schema).map_err(|err| {
            error!(resource = slug, error = %err, "validated form did not convert");
            SubmitError::Upstream(Notice::new(messages.save_failed))
        })?;

        match mode.editing().cloned() {
            None => {
                let record = self.api.create(&payload).await.map_err(|err| {
                    error!(resource = slug, error = %err, "create failed");
                    SubmitError::Upstream(Notice::new(messages.save_failed))
                })?;
                match &record {
                    Some(stored) => info!(resource = slug, id = %stored.id(), "record created"),
                    None => info!(resource = slug, "record created without echoed id"),
                }
                Ok(SubmitOutcome::Created(record))
            }
            Some(id) => {
                let record = self.api.update(&id, &payload).await.map_err(|err| {
                    error!(resource = slug, id = %id, error = %err, "update failed");
                    SubmitError::Upstream(Notice::new(messages.update_failed))
                })?;
                mode.activate_create();
                info!(resource = slug, id = %id, "record updated");
                Ok(SubmitOutcome::Updated(record))
            }
        }
    }

    /// Switch the form to editing `id`.
    pub fn begin_edit(&self, mode: &mut ModeController, id: RecordId) {
        mode.activate_edit(id);
    }

    /// Abandon an edit and return to create mode.
    pub fn cancel_edit(&self, mode: &mut ModeController) {
        mode.activate_create();
    }

    /// Find one record for the delete confirmation page.
    ///
    /// # Errors
    /// Returns the load alert when listing fails. A missing record yields
    /// `Ok(None)`.
    pub async fn find(&self, id: &RecordId) -> Result<Option<Record>, Notice> {
        let records = self.api.list().await.map_err(|err| {
            error!(resource = self.schema.slug(), error = %err, "table load failed");
            Notice::new(self.schema.messages().load_failed)
        })?;
        Ok(records.into_iter().find(|record| record.id() == id))
    }

    /// Delete a record. Deleting the record being edited returns the form to
    /// create mode.
    ///
    /// # Errors
    /// Returns the delete alert when the API call fails.
    pub async fn delete(&self, mode: &mut ModeController, id: &RecordId) -> Result<(), Notice> {
        let slug = self.schema.slug();
        self.api.delete(id).await.map_err(|err| {
            error!(resource = slug, id = %id, error = %err, "delete failed");
            Notice::new(self.schema.messages().delete_failed)
        })?;
        if mode.editing() == Some(id) {
            mode.activate_create();
        }
        info!(resource = slug, id = %id, "record deleted");
        Ok(())
    }
}
