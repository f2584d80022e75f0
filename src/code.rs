//! Backtick code spans left over after Markdown rendering.
//!
//! The Markdown renderer handles ordinary code fences itself, but anything
//! sitting inside raw HTML (callout bodies, most notably) reaches the final
//! page with its backticks intact. This pass turns those into code markup:
//!
//! - fenced: ```` ```lang\n…``` ```` → `<pre><code class="language-lang">…</code></pre>`,
//!   with `language-none` when no tag is given;
//! - inline: `` `…` `` → `<code class="inline-code">…</code>`.
//!
//! Fences are rewritten first. Their delimiters would otherwise be read as
//! runs of inline spans.

use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const INLINE_CODE_CLASS: &str = "inline-code";
pub const NO_LANGUAGE: &str = "none";

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:([\w+\-]+)?(?:\r?\n|<br>))?(.*?)```").expect("valid fence regex")
});

/// Which form a code span was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Fenced,
    Inline,
}

/// A code span located in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan<'a> {
    pub kind: SpanKind,
    /// Language tag, fenced spans only.
    pub language: Option<&'a str>,
    pub content: &'a str,
}

impl CodeSpan<'_> {
    pub fn to_html(&self) -> String {
        // Content is emitted verbatim: it is already rendered HTML.
        match self.kind {
            SpanKind::Fenced => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                self.language.unwrap_or(NO_LANGUAGE),
                self.content
            ),
            SpanKind::Inline => format!(
                r#"<code class="{INLINE_CODE_CLASS}">{}</code>"#,
                self.content
            ),
        }
    }
}

/// Body of a fence with its surrounding line breaks removed. Callout bodies
/// separate lines with `<br>`; inside the block those become newlines again.
fn fenced_body(raw: &str) -> String {
    let body = raw.strip_prefix("<br>").unwrap_or(raw);
    let body = body
        .strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .or_else(|| body.strip_suffix("<br>"))
        .unwrap_or(body);
    body.replace("<br>", "\n")
}

/// Rewrite fenced blocks, then inline spans.
pub fn transform_code(html: &str) -> String {
    let fenced = FENCE_RE.replace_all(html, |caps: &Captures<'_>| {
        let body = fenced_body(caps.get(2).map_or("", |m| m.as_str()));
        CodeSpan {
            kind: SpanKind::Fenced,
            language: caps.get(1).map(|m| m.as_str()),
            content: &body,
        }
        .to_html()
    });
    replace_inline(&fenced)
}

/// Byte ranges `(start, end)` of inline spans, delimiters included.
///
/// A span is a backtick, one or more characters that are neither a backtick
/// nor a newline, and a closing backtick; neither delimiter may touch another
/// backtick.
fn inline_ranges(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        // Skip over backtick runs; a delimiter must stand alone.
        let run_end = bytes[i..]
            .iter()
            .position(|&b| b != b'`')
            .map_or(bytes.len(), |n| i + n);
        if run_end - i > 1 {
            i = run_end;
            continue;
        }
        let close = bytes[i + 1..]
            .iter()
            .position(|&b| b == b'`' || b == b'\n')
            .map(|n| i + 1 + n);
        match close {
            Some(end) if bytes[end] == b'`' && end > i + 1 => {
                if bytes.get(end + 1) == Some(&b'`') {
                    // Closing delimiter runs into more backticks; give up on
                    // this opener and rescan from the run.
                    i = end;
                    continue;
                }
                ranges.push((i, end + 1));
                i = end + 1;
            }
            Some(end) => i = end,
            None => break,
        }
    }
    ranges
}

fn replace_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (start, end) in inline_ranges(text) {
        out.push_str(&text[last..start]);
        let span = CodeSpan {
            kind: SpanKind::Inline,
            language: None,
            content: &text[start + 1..end - 1],
        };
        out.push_str(&span.to_html());
        last = end;
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_with_language() {
        let out = transform_code("```python\nx=1\n```");
        assert_eq!(
            out,
            r#"<pre><code class="language-python">x=1</code></pre>"#
        );
    }

    #[test]
    fn fenced_block_without_language() {
        let out = transform_code("```\nx=1\n```");
        assert_eq!(out, r#"<pre><code class="language-none">x=1</code></pre>"#);
    }

    #[test]
    fn fenced_language_may_contain_plus_and_dash() {
        let out = transform_code("```c++\nint x;\n```\n```objective-c\n@end\n```");
        assert!(out.contains(r#"class="language-c++">int x;"#));
        assert!(out.contains(r#"class="language-objective-c">@end"#));
    }

    #[test]
    fn fenced_content_spans_lines_and_is_not_greedy() {
        let out = transform_code("```rs\na\nb\n```\nmiddle\n```\nc\n```");
        assert_eq!(
            out,
            "<pre><code class=\"language-rs\">a\nb</code></pre>\nmiddle\n\
             <pre><code class=\"language-none\">c</code></pre>"
        );
    }

    #[test]
    fn fenced_content_is_not_escaped() {
        let out = transform_code("```html\n<b>&amp;</b>\n```");
        assert!(out.contains("<b>&amp;</b>"));
    }

    #[test]
    fn inline_span_in_sentence() {
        let out = transform_code("call `x` now");
        assert_eq!(out, r#"call <code class="inline-code">x</code> now"#);
    }

    #[test]
    fn inline_span_does_not_cross_newline() {
        let text = "a `b\nc` d";
        assert_eq!(transform_code(text), text);
    }

    #[test]
    fn empty_and_double_backticks_are_left_alone() {
        for text in ["``", "a `` b", "``x``", "lone ` tick"] {
            assert_eq!(transform_code(text), text, "input {text:?}");
        }
    }

    #[test]
    fn inline_and_fenced_in_same_document() {
        let out = transform_code("use `x` here\n```python\nx=1\n```\nand `y`");
        assert!(out.contains(r#"<code class="inline-code">x</code>"#));
        assert!(out.contains(r#"<pre><code class="language-python">x=1</code></pre>"#));
        assert!(out.contains(r#"<code class="inline-code">y</code>"#));
        assert_eq!(out.matches("inline-code").count(), 2);
    }

    #[test]
    fn fence_with_br_line_breaks() {
        let out = transform_code("demo<br>```python<br>a<br>b<br>```");
        assert_eq!(
            out,
            "demo<br><pre><code class=\"language-python\">a\nb</code></pre>"
        );
    }

    #[test]
    fn untagged_fence_with_br_line_breaks() {
        let out = transform_code("```<br>x=1<br>```");
        assert_eq!(out, r#"<pre><code class="language-none">x=1</code></pre>"#);
    }

    #[test]
    fn text_without_backticks_is_unchanged() {
        let html = "<p>Nothing to see</p>\n";
        assert_eq!(transform_code(html), html);
    }
}
