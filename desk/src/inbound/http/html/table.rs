//! Table body rendering for one resource.

use crate::domain::dates::{display_value, parse_date};
use crate::domain::record::value_text;
use crate::domain::{DisplayFormat, FieldSpec, Record, ResourceSchema};

use super::escape;

/// Header of the trailing actions column.
const ACTIONS_LABEL: &str = "Acciones";

/// Display text of one cell, before escaping.
///
/// Currency values get a `$` prefix and dates are shown as `dd/mm/yyyy`.
/// Values that do not parse as dates are shown as returned.
pub fn cell_text(field: &FieldSpec, record: &Record) -> String {
    let Some(value) = record.get(field.name) else {
        return String::new();
    };
    let text = value_text(value);
    match field.display {
        DisplayFormat::Plain => text,
        DisplayFormat::Currency if text.is_empty() => text,
        DisplayFormat::Currency => format!("${text}"),
        DisplayFormat::Date => parse_date(&text).map(display_value).unwrap_or(text),
    }
}

/// Full table, one row per record in the order given.
pub fn render_table(schema: &ResourceSchema, records: &[Record]) -> String {
    let headers = schema
        .fields()
        .iter()
        .map(|field| format!("<th scope=\"col\">{}</th>", escape(field.label)))
        .collect::<String>();
    let rows = records
        .iter()
        .map(|record| render_row(schema, record))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<table id=\"tabla-contactos\">\n<thead><tr>{headers}<th scope=\"col\">{ACTIONS_LABEL}</th></tr></thead>\n<tbody>\n{rows}\n</tbody>\n</table>"
    )
}

fn render_row(schema: &ResourceSchema, record: &Record) -> String {
    let slug = schema.slug();
    let id = escape(record.id().as_str());
    let cells = schema
        .fields()
        .iter()
        .map(|field| {
            format!(
                "<td data-label=\"{label}\">{text}</td>",
                label = escape(field.label),
                text = escape(&cell_text(field, record)),
            )
        })
        .collect::<String>();
    format!(
        concat!(
            "<tr data-id=\"{id}\">{cells}<td data-label=\"{actions}\"><div class=\"btn-group\">",
            "<form method=\"post\" action=\"/{slug}/{id}/edit\">",
            "<button type=\"submit\" class=\"btn-edit\" data-id=\"{id}\">Editar</button></form>",
            "<a class=\"btn-delete\" data-id=\"{id}\" href=\"/{slug}/{id}/delete\">Eliminar</a>",
            "</div></td></tr>"
        ),
        id = id,
        cells = cells,
        actions = ACTIONS_LABEL,
        slug = slug,
    )
}
