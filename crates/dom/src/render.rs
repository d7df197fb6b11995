//! Page template injection
//!
//! Pure string work: reading templates and writing results is left to the caller.

use crate::document::Document;
use crate::error::Result;

/// Marker replaced by the rendered markup
pub const SSR_PLACEHOLDER: &str = "<!--SSR-->";

/// Replace the first placeholder in `template` with `markup`
///
/// A template without a placeholder is returned unchanged.
pub fn inject(template: &str, markup: &str) -> String {
    if !template.contains(SSR_PLACEHOLDER) {
        tracing::warn!("Template has no {} placeholder", SSR_PLACEHOLDER);
    }
    template.replacen(SSR_PLACEHOLDER, markup, 1)
}

/// Serialize `body.innerHTML` into the template
///
/// A document without an assigned body injects nothing.
pub fn render_body(document: &Document, template: &str) -> Result<String> {
    let markup = match document.body() {
        Some(body) => document.inner_html(body)?,
        None => String::new(),
    };
    tracing::debug!("Rendered {} bytes of body markup", markup.len());
    Ok(inject(template, &markup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_first_placeholder_only() {
        let out = inject("<main><!--SSR--></main><!--SSR-->", "<p>x</p>");
        assert_eq!(out, "<main><p>x</p></main><!--SSR-->");
        assert_eq!(inject("<main></main>", "<p>x</p>"), "<main></main>");
    }

    #[test]
    fn test_render_body() {
        let mut doc = Document::blank().unwrap();
        let body = doc.body().unwrap();
        let p = doc.create_element("p");
        let text = doc.create_text_node("Hey 🌱");
        doc.append_child(p, text).unwrap();
        doc.append_child(body, p).unwrap();

        let page = render_body(&doc, "<body><!--SSR--></body>").unwrap();
        assert_eq!(page, "<body><p>Hey 🌱</p></body>");
    }

    #[test]
    fn test_render_without_body() {
        let doc = Document::new();
        assert_eq!(render_body(&doc, "[<!--SSR-->]").unwrap(), "[]");
    }
}
