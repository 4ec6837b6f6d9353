//! Domain primitives and use-cases.
//!
//! Purpose: describe the CRUD resources (schema, records, validation) and the
//! create/edit form state independently of HTTP and of the upstream API.
//!
//! Public surface:
//! - Error / ErrorCode: failure payload rendered by the inbound adapter.
//! - ResourceSchema / ResourceCatalog: per-resource field definitions.
//! - Record / RecordId / FormValues: canonical records and form contents.
//! - Mode / ModeController: the single active submit handler.
//! - ResourceTableService: the generic CRUD table use-case.

pub mod dates;
pub mod error;
pub mod mode;
pub mod ports;
pub mod record;
pub mod resource_table;
pub mod schema;
mod trace_id;
pub mod validation;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::mode::{Mode, ModeController};
pub use self::record::{FormValues, PayloadError, Record, RecordId, RecordIdValidationError};
pub use self::resource_table::{
    Notice, ResourceTableService, SubmitError, SubmitOutcome, TableView,
};
pub use self::schema::{
    DateRange, DisplayFormat, FieldKind, FieldSpec, ResourceCatalog, ResourceMessages,
    ResourceSchema, SchemaError,
};
pub use self::trace_id::TraceId;
pub use self::validation::{ValidationError, validate};

/// Convenient result alias for page handlers.
///
/// # Examples
/// ```
/// use hotel_desk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such resource"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
