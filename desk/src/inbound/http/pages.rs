//! Resource page handlers.
//!
//! ```text
//! GET  /
//! GET  /{resource}
//! POST /{resource}
//! POST /{resource}/cancel
//! POST /{resource}/{id}/edit
//! GET  /{resource}/{id}/delete
//! POST /{resource}/{id}/delete
//! ```
//!
//! Successful mutations redirect back to the resource page with `303 See
//! Other`. Rejected forms are rendered again with the submitted values:
//! `422` for validation failures, `502` when the upstream API failed.

use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get, post, web};

use crate::domain::resource_table::STALE_EDIT_MESSAGE;
use crate::domain::{
    Error, FormValues, ModeController, Notice, RecordId, ResourceTableService, SubmitError,
    TableView,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{render_delete_page, render_index_page, render_resource_page};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(body)
}

fn see_other(table: &ResourceTableService) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/{}", table.schema().slug())))
        .finish()
}

fn parse_id(raw: String) -> Result<RecordId, Error> {
    RecordId::new(raw).map_err(|err| Error::invalid_request(format!("identificador inválido: {err}")))
}

/// Render the table page, persisting the mode first.
fn table_page(
    state: &HttpState,
    session: &SessionContext,
    table: &ResourceTableService,
    mode: ModeController,
    view: &TableView,
    status: StatusCode,
    invalid: Option<&str>,
) -> ApiResult<HttpResponse> {
    let active = mode.mode().clone();
    session.store_mode(table.schema().slug(), mode)?;
    Ok(html(
        status,
        render_resource_page(state.catalog(), table.schema(), &active, view, invalid),
    ))
}

/// Navigation index.
#[get("/")]
pub async fn index(state: web::Data<HttpState>) -> HttpResponse {
    html(StatusCode::OK, render_index_page(state.catalog()))
}

/// Table and form for one resource, in the session's mode.
#[get("/{resource}")]
pub async fn show_resource(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let table = state.table(&path)?;
    let slug = table.schema().slug();
    let mut mode = session.mode(slug)?;
    let mut view = table.view(&mut mode, None).await;
    if let Some(flashed) = session.take_notice(slug) {
        view.notice = Some(flashed);
    }
    let status = if view.loaded {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    table_page(&state, &session, table, mode, &view, status, None)
}

/// Submit the form through the active mode.
#[post("/{resource}")]
pub async fn submit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<FormValues>,
) -> ApiResult<HttpResponse> {
    let table = state.table(&path)?;
    let slug = table.schema().slug();
    let mut mode = session.mode(slug)?;
    let form = form.into_inner();

    match table.submit(&mut mode, &form).await {
        Ok(_) => {
            session.store_mode(slug, mode)?;
            Ok(see_other(table))
        }
        Err(err) => {
            let (status, invalid) = match &err {
                SubmitError::Invalid(validation) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, validation.field())
                }
                SubmitError::Upstream(_) => (StatusCode::BAD_GATEWAY, None),
            };
            let mut view = table.view(&mut mode, Some(form)).await;
            view.notice = Some(err.notice());
            table_page(&state, &session, table, mode, &view, status, invalid)
        }
    }
}

/// Leave edit mode without saving.
#[post("/{resource}/cancel")]
pub async fn cancel_edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let table = state.table(&path)?;
    let slug = table.schema().slug();
    let mut mode = session.mode(slug)?;
    table.cancel_edit(&mut mode);
    session.store_mode(slug, mode)?;
    Ok(see_other(table))
}

/// Switch the form to editing one record.
#[post("/{resource}/{id}/edit")]
pub async fn begin_edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (resource, raw_id) = path.into_inner();
    let table = state.table(&resource)?;
    let slug = table.schema().slug();
    let id = parse_id(raw_id)?;
    let mut mode = session.mode(slug)?;
    table.begin_edit(&mut mode, id);
    session.store_mode(slug, mode)?;
    Ok(see_other(table))
}

/// Ask before deleting a record.
#[get("/{resource}/{id}/delete")]
pub async fn confirm_delete(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (resource, raw_id) = path.into_inner();
    let table = state.table(&resource)?;
    let id = parse_id(raw_id)?;
    match table.find(&id).await {
        Ok(Some(record)) => Ok(html(
            StatusCode::OK,
            render_delete_page(state.catalog(), table.schema(), &record, None),
        )),
        Ok(None) => {
            session.push_notice(table.schema().slug(), &Notice::new(STALE_EDIT_MESSAGE))?;
            Ok(see_other(table))
        }
        Err(notice) => Err(Error::upstream(notice.message())),
    }
}

/// Delete a record and return to the table.
#[post("/{resource}/{id}/delete")]
pub async fn delete_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (resource, raw_id) = path.into_inner();
    let table = state.table(&resource)?;
    let slug = table.schema().slug();
    let id = parse_id(raw_id)?;
    let mut mode = session.mode(slug)?;

    match table.delete(&mut mode, &id).await {
        Ok(()) => {
            session.store_mode(slug, mode)?;
            Ok(see_other(table))
        }
        Err(notice) => {
            let mut view = table.view(&mut mode, None).await;
            view.notice = Some(notice);
            table_page(
                &state,
                &session,
                table,
                mode,
                &view,
                StatusCode::BAD_GATEWAY,
                None,
            )
        }
    }
}
