//! Page templates.
//!
//! Every page, notes and index alike, shares one document shell built with
//! [maud](https://maud.lambda.xyz/): a stylesheet link, a navigation bar over
//! all generated pages, and the page body. Titles and navigation labels are
//! escaped by maud; the body is inserted as already-rendered HTML.
//!
//! Pages are written to `templates/` and link their assets as `static/...`,
//! the paths they resolve to when a web app serves `templates/` at the root
//! and `static/` beneath it.

use crate::config::SiteConfig;
use crate::naming::nav_label;
use crate::types::PageEntry;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Href of the stylesheet from a generated page.
pub const STYLESHEET_HREF: &str = "static/style.css";

const KATEX_VERSION: &str = "0.16.11";

/// Stock stylesheet, printed by `gen-style`.
pub const STOCK_STYLESHEET: &str = include_str!("../static/style.css");

/// Everything a page render needs.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub title: &'a str,
    /// Rendered HTML body.
    pub content: &'a str,
    /// Output filenames listed in the navigation bar, in order.
    pub pages: &'a [String],
}

/// Render a complete HTML document.
pub fn render_page(ctx: &PageContext<'_>, config: &SiteConfig) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.site.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (ctx.title) }
                link rel="stylesheet" href=(STYLESHEET_HREF);
                @if config.math.enabled {
                    (katex_head(&config.math.container_class))
                }
            }
            body {
                (site_nav(ctx.pages))
                main.page-content {
                    (PreEscaped(ctx.content))
                }
            }
        }
    }
}

/// Navigation bar: one plain link per page, labelled by filename.
fn site_nav(pages: &[String]) -> Markup {
    html! {
        nav.site-nav {
            a.nav-home href="index.html" { "Home" }
            @for page in pages {
                " "
                a href=(page) { (nav_label(page)) }
            }
        }
    }
}

/// KaTeX stylesheet and auto-render hook limited to the math container.
fn katex_head(container_class: &str) -> Markup {
    let base = format!("https://cdn.jsdelivr.net/npm/katex@{KATEX_VERSION}/dist");
    let init = format!(
        r#"document.addEventListener("DOMContentLoaded", function () {{
  document.querySelectorAll(".{container_class}").forEach(function (el) {{
    renderMathInElement(el, {{
      delimiters: [
        {{ left: "$$", right: "$$", display: true }},
        {{ left: "$", right: "$", display: false }}
      ],
      throwOnError: false
    }});
  }});
}});"#
    );
    html! {
        link rel="stylesheet" href={ (base) "/katex.min.css" };
        script defer src={ (base) "/katex.min.js" } {}
        script defer src={ (base) "/contrib/auto-render.min.js" } {}
        script { (PreEscaped(init)) }
    }
}

/// Wrap a rendered page body in the math container.
pub fn wrap_math_container(body: &str, container_class: &str) -> String {
    format!(r#"<div class="{container_class}">{body}</div>"#)
}

/// Body of the index page: a heading and one list item per page.
pub fn render_index_content(entries: &[PageEntry], heading: &str) -> Markup {
    html! {
        h1 { (heading) }
        ul.page-index {
            @for entry in entries {
                li { a href=(entry.filename) { (entry.title) } }
            }
        }
    }
}
