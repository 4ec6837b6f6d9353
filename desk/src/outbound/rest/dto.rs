//! DTOs for decoding upstream record JSON.
//!
//! Identifiers arrive as strings, integers or Mongo extended JSON
//! (`{"$oid": "..."}`); all are normalised to [`RecordId`].

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::record::{ID_KEY, Record, RecordId};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RecordIdDto {
    Text(String),
    Integer(i64),
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl RecordIdDto {
    fn into_domain(self) -> Result<RecordId, String> {
        let raw = match self {
            Self::Text(raw) | Self::ObjectId { oid: raw } => raw,
            Self::Integer(raw) => raw.to_string(),
        };
        RecordId::new(raw).map_err(|err| format!("invalid {ID_KEY}: {err}"))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RecordDto {
    #[serde(rename = "_id")]
    pub(super) id: Option<RecordIdDto>,
    #[serde(flatten)]
    pub(super) fields: Map<String, Value>,
}

impl RecordDto {
    pub(super) fn into_domain(self) -> Result<Record, String> {
        let id = self
            .id
            .ok_or_else(|| format!("record is missing {ID_KEY}"))?
            .into_domain()?;
        Ok(Record::new(id, self.fields))
    }

    /// Decode an update echo. Bodies without an identifier are treated as an
    /// acknowledgement and the sent fields are kept.
    pub(super) fn into_domain_or(
        self,
        id: &RecordId,
        sent: &Map<String, Value>,
    ) -> Result<Record, String> {
        match self.id {
            Some(echoed) => Ok(Record::new(echoed.into_domain()?, self.fields)),
            None => Ok(Record::new(id.clone(), sent.clone())),
        }
    }
}

/// Decode a create reply. Replies that are not an object, or carry no
/// identifier, acknowledge the write without echoing the stored record.
pub(super) fn created_record(body: Value) -> Result<Option<Record>, String> {
    if !body.is_object() {
        return Ok(None);
    }
    let dto: RecordDto =
        serde_json::from_value(body).map_err(|err| format!("invalid record payload: {err}"))?;
    match dto.id {
        Some(_) => dto.into_domain().map(Some),
        None => Ok(None),
    }
}

/// Decode a list reply, skipping entries that are not usable records.
pub(super) fn into_domain_records(entries: Vec<Value>) -> Vec<Record> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let decoded = serde_json::from_value::<RecordDto>(entry)
                .map_err(|err| format!("invalid record payload: {err}"))
                .and_then(RecordDto::into_domain);
            match decoded {
                Ok(record) => Some(record),
                Err(reason) => {
                    warn!(index, %reason, "skipping unusable record in list");
                    None
                }
            }
        })
        .collect()
}
