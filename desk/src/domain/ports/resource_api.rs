//! Driven port for the upstream REST resource.
//!
//! One implementation instance talks to one resource endpoint. Every
//! operation is a single call: no retry, no caching, no pagination.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::define_port_error;
use crate::domain::record::{Record, RecordId};

/// JSON body sent on create and update.
pub type Payload = Map<String, Value>;

define_port_error! {
    /// Per-operation failures raised by the REST resource.
    pub enum ResourceApiError {
        /// Listing failed or the response could not be decoded.
        Fetch { message: String } => "could not fetch records: {message}",
        /// Creating failed.
        Create { message: String } => "could not create record: {message}",
        /// Updating failed.
        Update { message: String } => "could not update record: {message}",
        /// Deleting failed.
        Delete { message: String } => "could not delete record: {message}",
    }
}

/// CRUD operations against one REST resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// `GET /api/{resource}`.
    async fn list(&self) -> Result<Vec<Record>, ResourceApiError>;

    /// `POST /api/{resource}`.
    ///
    /// Returns the stored record when the upstream echoes it, or `None` when
    /// the write is acknowledged without an identifier.
    async fn create(&self, payload: &Payload) -> Result<Option<Record>, ResourceApiError>;

    /// `PUT /api/{resource}/{id}`, returning the stored record.
    async fn update(&self, id: &RecordId, payload: &Payload) -> Result<Record, ResourceApiError>;

    /// `DELETE /api/{resource}/{id}`.
    async fn delete(&self, id: &RecordId) -> Result<(), ResourceApiError>;
}

/// In-process resource used when no upstream API is configured and in tests.
///
/// Records keep insertion order; ids are random UUIDs in simple form.
#[derive(Debug, Default)]
pub struct InMemoryResourceApi {
    records: Mutex<Vec<Record>>,
}

impl InMemoryResourceApi {
    /// Start from an existing set of records.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Copy of the stored records.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ResourceApi for InMemoryResourceApi {
    async fn list(&self) -> Result<Vec<Record>, ResourceApiError> {
        Ok(self.snapshot())
    }

    async fn create(&self, payload: &Payload) -> Result<Option<Record>, ResourceApiError> {
        let id = RecordId::new(Uuid::new_v4().simple().to_string())
            .map_err(|err| ResourceApiError::create(err.to_string()))?;
        let record = Record::new(id, payload.clone());
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(Some(record))
    }

    async fn update(&self, id: &RecordId, payload: &Payload) -> Result<Record, ResourceApiError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| ResourceApiError::update(format!("no record with id {id}")))?;
        *slot = Record::new(id.clone(), payload.clone());
        Ok(slot.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ResourceApiError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(ResourceApiError::delete(format!("no record with id {id}")));
        }
        Ok(())
    }
}
