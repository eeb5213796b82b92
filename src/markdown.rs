//! # Markdown Rendering Module
//!
//! Converts markdown source to HTML with pulldown-cmark and wraps the result
//! in a standalone document styled after the desktop appearance.

use crate::font::font_descriptor_to_css;
use crate::theme::ThemeAppearance;
use pulldown_cmark::{html, Options, Parser};

/// Family used for body text when the interface font descriptor names none.
const BODY_FALLBACK_FAMILY: &str = "Sans";
/// Family used for code when the monospace font descriptor names none.
const MONOSPACE_FALLBACK_FAMILY: &str = "Monospace";

/// Converts markdown to an HTML fragment.
///
/// Tables, strikethrough, task lists and footnotes are enabled on top of
/// CommonMark.
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        Self { options }
    }

    /// Renders raw file contents to HTML.
    ///
    /// Invalid UTF-8 sequences become U+FFFD and a leading byte order mark is
    /// skipped, so any file renders.
    pub fn render_bytes(&self, source: &[u8]) -> String {
        let text = String::from_utf8_lossy(source);
        self.render(text.strip_prefix('\u{feff}').unwrap_or(&text))
    }

    /// Renders markdown text to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut body = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut body, parser);
        body
    }
}

/// Wraps `body_html` in a complete HTML document with an inline stylesheet.
///
/// `body_html` is embedded as is; it must already be trusted markup. The
/// title is escaped.
pub fn compose_document(title: &str, body_html: &str, appearance: &ThemeAppearance) -> String {
    let body_font = font_descriptor_to_css(&appearance.font_name, BODY_FALLBACK_FAMILY);
    let mono_font =
        font_descriptor_to_css(&appearance.monospace_font_name, MONOSPACE_FALLBACK_FAMILY);
    let palette = appearance.palette();

    let stylesheet = format!(
        ":root{{color-scheme:{scheme};}}\
         body{{max-width:860px;margin:2rem auto;padding:0 1rem;\
         {body_font}line-height:1.6;color:{text};background:{page_bg};}}\
         pre,code{{{mono_font}}}\
         pre{{padding:0.9rem;overflow:auto;background:{surface_bg};border-radius:8px;}}\
         blockquote{{margin-left:0;padding-left:1rem;border-left:4px solid {bq_border};color:{bq_text};}}\
         img{{max-width:100%;height:auto;}}\
         a{{color:{link};text-decoration:none;}}a:hover{{text-decoration:underline;}}\
         table{{border-collapse:collapse;}}th,td{{border:1px solid {table_border};padding:0.35rem 0.5rem;}}",
        scheme = appearance.color_scheme(),
        text = palette.text,
        page_bg = palette.page_bg,
        surface_bg = palette.surface_bg,
        bq_border = palette.blockquote_border,
        bq_text = palette.blockquote_text,
        link = palette.link,
        table_border = palette.table_border,
    );

    let mut doc = String::with_capacity(body_html.len() + stylesheet.len() + 256);
    doc.push_str("<!doctype html><html><head>");
    doc.push_str("<meta charset=\"utf-8\">");
    doc.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    doc.push_str("<meta name=\"color-scheme\" content=\"light dark\">");
    doc.push_str("<title>");
    escape_html(&mut doc, title);
    doc.push_str("</title><style>");
    doc.push_str(&stylesheet);
    doc.push_str("</style></head><body>");
    doc.push_str(body_html);
    doc.push_str("</body></html>");
    doc
}

fn escape_html(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
