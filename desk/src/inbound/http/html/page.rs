//! Full page layouts.

use crate::domain::{Mode, Notice, Record, ResourceCatalog, ResourceSchema, TableView};

use super::{cell_text, escape, render_form, render_table};

fn layout(catalog: Option<&ResourceCatalog>, title: &str, body: &str) -> String {
    let nav = catalog
        .map(|catalog| {
            let links = catalog
                .iter()
                .map(|schema| {
                    format!(
                        "<li><a href=\"/{slug}\">{title}</a></li>",
                        slug = schema.slug(),
                        title = escape(schema.title()),
                    )
                })
                .collect::<String>();
            format!("<header><nav><ul><li><a href=\"/\">Inicio</a></li>{links}</ul></nav></header>\n")
        })
        .unwrap_or_default();
    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{title}</title>\n</head>\n<body>\n{nav}<main>\n{body}\n</main>\n</body>\n</html>\n"
        ),
        title = escape(title),
        nav = nav,
        body = body,
    )
}

fn render_notice(notice: Option<&Notice>) -> String {
    notice
        .map(|notice| {
            format!(
                "<div class=\"alert\" role=\"alert\">{}</div>\n",
                escape(notice.message())
            )
        })
        .unwrap_or_default()
}

/// Table and form for one resource.
pub fn render_resource_page(
    catalog: &ResourceCatalog,
    schema: &ResourceSchema,
    mode: &Mode,
    view: &TableView,
    invalid: Option<&str>,
) -> String {
    let body = format!(
        "{notice}<h1>{title}</h1>\n{form}\n{table}",
        notice = render_notice(view.notice.as_ref()),
        title = escape(schema.title()),
        form = render_form(schema, mode, &view.form, invalid),
        table = render_table(schema, &view.records),
    );
    layout(Some(catalog), schema.title(), &body)
}

/// Confirmation step before deleting `record`.
pub fn render_delete_page(
    catalog: &ResourceCatalog,
    schema: &ResourceSchema,
    record: &Record,
    notice: Option<&Notice>,
) -> String {
    let slug = schema.slug();
    let id = escape(record.id().as_str());
    let summary = schema
        .fields()
        .iter()
        .map(|field| {
            format!(
                "<dt>{label}</dt><dd>{text}</dd>",
                label = escape(field.label),
                text = escape(&cell_text(field, record)),
            )
        })
        .collect::<String>();
    let body = format!(
        concat!(
            "{notice}<h1>{title}</h1>\n<p>{prompt}</p>\n<dl>{summary}</dl>\n",
            "<form method=\"post\" action=\"/{slug}/{id}/delete\">",
            "<button type=\"submit\" class=\"btn-delete\" data-id=\"{id}\">Eliminar</button> ",
            "<a href=\"/{slug}\">Cancelar</a></form>"
        ),
        notice = render_notice(notice),
        title = escape(schema.title()),
        prompt = escape(schema.messages().delete_prompt),
        summary = summary,
        slug = slug,
        id = id,
    );
    layout(Some(catalog), schema.title(), &body)
}

/// Landing page linking every resource.
pub fn render_index_page(catalog: &ResourceCatalog) -> String {
    let items = catalog
        .iter()
        .map(|schema| {
            format!(
                "<li><a href=\"/{slug}\">{title}</a></li>",
                slug = schema.slug(),
                title = escape(schema.title()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let body = format!("<h1>Hotel</h1>\n<ul class=\"resources\">\n{items}\n</ul>");
    layout(Some(catalog), "Hotel", &body)
}

/// Standalone error page; carries the trace id when one is known.
pub fn render_error_page(status: u16, message: &str, trace_id: Option<&str>) -> String {
    let trace = trace_id
        .map(|id| format!("<p class=\"trace-id\">Referencia: <code>{}</code></p>\n", escape(id)))
        .unwrap_or_default();
    let body = format!(
        "<div class=\"alert\" role=\"alert\">{message}</div>\n<h1>Error {status}</h1>\n{trace}<p><a href=\"/\">Volver al inicio</a></p>",
        message = escape(message),
    );
    layout(None, "Error", &body)
}
