//! Create/edit form rendering.

use crate::domain::{FieldKind, FieldSpec, FormValues, Mode, ResourceSchema};

use super::escape;

/// Render the resource form for the active `mode`.
///
/// The form always posts to `/{resource}`; the session-held mode decides
/// whether that creates or updates. In edit mode a cancel button posts to
/// `/{resource}/cancel` instead. `invalid` marks the field that failed
/// validation.
pub fn render_form(
    schema: &ResourceSchema,
    mode: &Mode,
    values: &FormValues,
    invalid: Option<&str>,
) -> String {
    let slug = schema.slug();
    let inputs = schema
        .fields()
        .iter()
        .map(|field| render_input(field, values.get(field.name), invalid == Some(field.name)))
        .collect::<Vec<_>>()
        .join("\n");
    let (mode_name, heading, controls) = match mode {
        Mode::Create => (
            "create",
            "Nuevo registro".to_owned(),
            "<button type=\"submit\">Guardar</button>".to_owned(),
        ),
        Mode::Edit(id) => (
            "edit",
            format!("Editando {}", escape(id.as_str())),
            format!(
                concat!(
                    "<button type=\"submit\">Actualizar</button>\n",
                    "<button type=\"submit\" formaction=\"/{slug}/cancel\" formnovalidate>",
                    "Cancelar</button>"
                ),
                slug = slug,
            ),
        ),
    };
    format!(
        concat!(
            "<form id=\"formulario\" method=\"post\" action=\"/{slug}\" data-mode=\"{mode_name}\">\n",
            "<fieldset><legend>{heading}</legend>\n{inputs}\n</fieldset>\n{controls}\n</form>"
        ),
        slug = slug,
        mode_name = mode_name,
        heading = heading,
        inputs = inputs,
        controls = controls,
    )
}

fn render_input(field: &FieldSpec, value: &str, invalid: bool) -> String {
    let step = match field.kind {
        FieldKind::Number => " step=\"any\"",
        _ => "",
    };
    let required = if field.required { " required" } else { "" };
    let aria = if invalid { " aria-invalid=\"true\"" } else { "" };
    format!(
        "<label>{label} <input type=\"{kind}\" name=\"{name}\" value=\"{value}\"{step}{required}{aria}></label>",
        label = escape(field.label),
        kind = field.kind.input_type(),
        name = field.name,
        value = escape(value),
    )
}
