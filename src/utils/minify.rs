//! Whitespace minification for HTML fragments and XML.
//!
//! The HTML minifier only touches whitespace. Attribute quoting is left
//! alone, since published records are later scanned for quoted hosted URLs.

use crate::text::{MarkerTable, locate_block, quasi_equal_at};
use std::borrow::Cow;

/// Preformatted blocks are copied verbatim.
const PRE: MarkerTable<'static> = MarkerTable::new(&[("<pre", "</pre>")]);

// ============================================================================
// Types
// ============================================================================

/// Content type for minification.
pub enum MinifyType<'a> {
    /// HTML fragment, such as a project body
    Html(&'a str),
    /// XML document
    Xml(&'a str),
}

// ============================================================================
// Unified Minify Function
// ============================================================================

/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify(content: MinifyType<'_>, enabled: bool) -> Cow<'_, str> {
    match (content, enabled) {
        (MinifyType::Html(html), false) | (MinifyType::Xml(html), false) => Cow::Borrowed(html),
        (MinifyType::Html(html), true) => Cow::Owned(minify_html_inner(html)),
        (MinifyType::Xml(xml), true) => Cow::Owned(minify_xml_inner(xml)),
    }
}

// ============================================================================
// Internal Implementation
// ============================================================================

/// Collapse whitespace runs to one space.
///
/// Runs between a `>` and a `<` are dropped entirely when they contain a
/// line break. Leading and trailing whitespace is dropped.
fn minify_html_inner(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    // Some(contains_newline) while inside a whitespace run
    let mut pending: Option<bool> = None;
    let mut offset = 0;

    while let Some(c) = html[offset..].chars().next() {
        if c.is_whitespace() {
            let newline = matches!(c, '\n' | '\r');
            pending = Some(pending.unwrap_or(false) || newline);
            offset += c.len_utf8();
            continue;
        }

        if let Some(newline) = pending.take() {
            let between_tags = c == '<' && out.ends_with('>');
            if !out.is_empty() && !(newline && between_tags) {
                out.push(' ');
            }
        }

        if c == '<' && quasi_equal_at(html, offset, "<pre").unwrap_or(false) {
            let end = locate_block(html, offset, PRE).map_or(html.len(), |span| span.end);
            out.push_str(&html[offset..end]);
            offset = end;
            continue;
        }

        out.push(c);
        offset += c.len_utf8();
    }
    out
}

/// Minify XML by removing indentation and line breaks.
fn minify_xml_inner(xml: &str) -> String {
    xml.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn html(input: &str) -> String {
        minify(MinifyType::Html(input), true).into_owned()
    }

    #[test]
    fn test_minify_html_collapses_runs() {
        assert_eq!(html("<p>Hello   \t World</p>"), "<p>Hello World</p>");
        assert_eq!(html("<p>line\n  wrapped</p>"), "<p>line wrapped</p>");
    }

    #[test]
    fn test_minify_html_drops_newline_runs_between_tags() {
        assert_eq!(html("<p>a</p>\n  <p>b</p>"), "<p>a</p><p>b</p>");
        // same line: the space may be significant
        assert_eq!(html("<b>a</b> <i>b</i>"), "<b>a</b> <i>b</i>");
    }

    #[test]
    fn test_minify_html_trims_ends() {
        assert_eq!(html("\n\n  <p>x</p>  \n"), "<p>x</p>");
        assert_eq!(html("   "), "");
    }

    #[test]
    fn test_minify_html_keeps_attribute_quotes() {
        let input = "<img src='https://b.s3.us-east-2.amazonaws.com/content/p/a.png'>";
        assert_eq!(html(input), input);
        assert_eq!(html("<embed  src=\"x.pdf\"  type='application/pdf'>"), "<embed src=\"x.pdf\" type='application/pdf'>");
    }

    #[test]
    fn test_minify_html_preserves_pre() {
        let input = "<p>code:</p>\n<pre>\n  fn main() {\n      go();\n  }\n</pre>\n<p>done</p>";
        assert_eq!(
            html(input),
            "<p>code:</p><pre>\n  fn main() {\n      go();\n  }\n</pre><p>done</p>"
        );
    }

    #[test]
    fn test_minify_html_unterminated_pre() {
        assert_eq!(html("<p>a</p>\n<PRE>  x\n  y"), "<p>a</p><PRE>  x\n  y");
    }

    #[test]
    fn test_minify_html_disabled() {
        let input = "<p>a</p>\n  <p>b</p>";
        assert!(matches!(minify(MinifyType::Html(input), false), Cow::Borrowed(s) if s == input));
    }

    #[test]
    fn test_minify_xml_basic() {
        let xml = r#"<?xml version="1.0"?>
<root>
  <item>Hello</item>
</root>"#;
        assert_eq!(
            minify(MinifyType::Xml(xml), true),
            r#"<?xml version="1.0"?><root><item>Hello</item></root>"#
        );
    }

    #[test]
    fn test_minify_xml_removes_empty_lines() {
        let xml = "<root>\n\n  <item/>\n\n</root>";
        assert_eq!(minify(MinifyType::Xml(xml), true), "<root><item/></root>");
        assert_eq!(minify(MinifyType::Xml(xml), false), xml);
    }
}
