//! Server-side HTML rendering.
//!
//! Pages are assembled from plain `format!` templates. Every value that
//! originates from a record, a form or a message passes through [`escape`].

mod form;
mod page;
mod table;

pub use form::render_form;
pub use page::{render_delete_page, render_error_page, render_index_page, render_resource_page};
pub use table::{cell_text, render_table};

/// Escape text for use in element content and double-quoted attributes.
///
/// # Examples
/// ```
/// use hotel_desk::inbound::http::html::escape;
///
/// assert_eq!(escape("<b>\"Ana\" & 'Luis'</b>"), "&lt;b&gt;&quot;Ana&quot; &amp; &#39;Luis&#39;&lt;/b&gt;");
/// ```
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
