//! Page compilation: one note in, one HTML page out.
//!
//! ```text
//! raw note
//!   → wiki-links / embeds      (links)
//!   → callouts                 (callouts)
//!   → Markdown → HTML          (pulldown-cmark, raw HTML passed through)
//!   → leftover backtick code   (code)
//!   → math container
//!   → page template            (template)
//! ```
//!
//! The first two steps only touch prose. Fenced code blocks in the note are
//! left exactly as written so a `[[link]]` or a `> quote` inside a code sample
//! reaches the reader verbatim. Code produced by the Markdown renderer gets the
//! same `language-*` and `inline-code` classes as spans rewritten by the
//! [`code`](crate::code) pass, and its backticks are written as `&#96;` so
//! that pass leaves it alone.

use crate::callouts::convert_callouts;
use crate::code::{CodeSpan, SpanKind, transform_code};
use crate::config::{MarkdownConfig, SiteConfig};
use crate::links::resolve_links;
use crate::template::{self, PageContext};
use crate::types::Document;
use maud::html;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};

/// A run of source lines, either prose or a fenced code block (fence lines
/// included).
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Prose(&'a str),
    Fence(&'a str),
}

/// The fence opener of a line: `(char, run length)`, for lines indented by at
/// most three spaces that start with three or more backticks or tildes.
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let ch = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = rest.chars().take_while(|c| *c == ch).count();
    (run >= 3).then_some((ch, run))
}

fn closes_fence(line: &str, open: (char, usize)) -> bool {
    match fence_marker(line) {
        Some((ch, run)) if ch == open.0 && run >= open.1 => {
            let rest = line.trim_start_matches(' ').trim_start_matches(ch);
            rest.trim().is_empty()
        }
        _ => false,
    }
}

/// Split a note into prose and fenced-code segments. An unclosed fence runs
/// to the end of the note, as it does in Markdown.
fn split_fences(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut open: Option<(char, usize)> = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let bare = line.trim_end_matches(['\n', '\r']);
        match open {
            None => {
                if let Some(marker) = fence_marker(bare) {
                    if line_start > start {
                        segments.push(Segment::Prose(&text[start..line_start]));
                    }
                    start = line_start;
                    open = Some(marker);
                }
            }
            Some(marker) => {
                if closes_fence(bare, marker) {
                    segments.push(Segment::Fence(&text[start..offset]));
                    start = offset;
                    open = None;
                }
            }
        }
    }
    if start < text.len() {
        let rest = &text[start..];
        segments.push(match open {
            Some(_) => Segment::Fence(rest),
            None => Segment::Prose(rest),
        });
    }
    segments
}

/// Resolve wiki-links and callouts in the prose of a note.
pub fn transform_source(text: &str) -> String {
    split_fences(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Prose(prose) => convert_callouts(&resolve_links(prose)),
            Segment::Fence(code) => code.to_string(),
        })
        .collect()
}

/// Escape text for a code element, backticks included.
fn escape_code(text: &str) -> String {
    html! { (text) }.into_string().replace('`', "&#96;")
}

fn code_language(info: &str) -> Option<String> {
    let lang: String = info
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '+' | '-'))
        .collect();
    (!lang.is_empty()).then_some(lang)
}

struct CodeBlockPending {
    language: Option<String>,
    code: String,
}

impl CodeBlockPending {
    fn to_html(&self) -> String {
        let content = escape_code(&self.code);
        let content = content.strip_suffix('\n').unwrap_or(&content);
        let span = CodeSpan {
            kind: SpanKind::Fenced,
            language: self.language.as_deref(),
            content,
        };
        format!("{}\n", span.to_html())
    }
}

fn markdown_options(config: &MarkdownConfig) -> Options {
    let mut options = Options::empty();
    if config.tables {
        options.insert(Options::ENABLE_TABLES);
    }
    if config.strikethrough {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if config.tasklists {
        options.insert(Options::ENABLE_TASKLISTS);
    }
    options
}

/// Render Markdown to HTML. Raw HTML in the input is passed through as is.
pub fn render_markdown(text: &str, config: &MarkdownConfig) -> String {
    let parser = Parser::new_ext(text, markdown_options(config));
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut code_pending: Option<CodeBlockPending> = None;

    for event in parser {
        if let Some(code) = code_pending.as_mut() {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    events.push(Event::Html(CowStr::from(code.to_html())));
                    code_pending = None;
                }
                Event::Text(text) => code.code.push_str(&text),
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => code_language(&info),
                    CodeBlockKind::Indented => None,
                };
                code_pending = Some(CodeBlockPending {
                    language,
                    code: String::new(),
                });
            }
            Event::Code(text) => {
                let span = CodeSpan {
                    kind: SpanKind::Inline,
                    language: None,
                    content: &escape_code(&text),
                }
                .to_html();
                events.push(Event::InlineHtml(CowStr::from(span)));
            }
            other => events.push(other),
        }
    }

    let mut html_out = String::new();
    md_html::push_html(&mut html_out, events.into_iter());
    html_out
}

/// Compile a note's text into the HTML placed inside the page template.
pub fn compile_body(text: &str, config: &SiteConfig) -> String {
    let source = transform_source(text);
    let rendered = render_markdown(&source, &config.markdown);
    let with_code = transform_code(&rendered);
    template::wrap_math_container(&with_code, &config.math.container_class)
}

/// Compile a note into a complete HTML page.
pub fn compile_page(doc: &Document, pages: &[String], config: &SiteConfig) -> String {
    tracing::debug!(file = %doc.filename, "compiling");
    let content = compile_body(&doc.text, config);
    let ctx = PageContext {
        title: &doc.title,
        content: &content,
        pages,
    };
    template::render_page(&ctx, config).into_string()
}
