//! Static HTML for the reading surface
//!
//! Mentions become buttons carrying the asset id so a host script can open
//! the detail panel. Mentions whose asset is gone get an extra
//! `asset-missing` class and still show their embedded name.

use crate::library::{Library, NotFoundView, LIBRARY_HREF};
use crate::reading::ReadingView;
use folio_references::{AssetDetail, Renderer, RenderedSegment};

/// Options for HTML rendering
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: HtmlOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Render page content as inline HTML
///
/// Text is escaped and line breaks are kept for a `pre-wrap` container.
pub fn render_content(renderer: &Renderer<'_>, content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for segment in renderer.render(content) {
        push_segment(&mut out, segment);
    }
    out
}

fn push_segment(out: &mut String, segment: RenderedSegment<'_>) {
    match segment {
        RenderedSegment::PlainText { text } => out.push_str(&escape_html(text)),
        RenderedSegment::AssetMention {
            id,
            display_name,
            resolved,
        } => {
            let class = if resolved {
                "asset-mention"
            } else {
                "asset-mention asset-missing"
            };
            out.push_str(&format!(
                "<button class=\"{}\" data-asset-id=\"{}\">{}</button>",
                class,
                escape_html(id),
                escape_html(display_name)
            ));
        }
    }
}

/// Full reading page: table of contents and the active page
pub fn render_reading_page(view: &ReadingView<'_>, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    let project = view.project();

    open_document(&mut ctx, &project.title);

    ctx.add_line("<aside class=\"toc\">");
    ctx.indent();
    ctx.add_line(&format!(
        "<a href=\"{}\">&larr; Back to Library</a>",
        LIBRARY_HREF
    ));
    ctx.add_line(&format!("<h1>{}</h1>", escape_html(&project.title)));
    ctx.add_line(&format!("<p>{}</p>", escape_html(&project.description)));

    for chapter in view.table_of_contents() {
        ctx.add_line("<section>");
        ctx.indent();
        ctx.add_line(&format!("<h3>{}</h3>", escape_html(chapter.title)));
        ctx.add_line("<ul>");
        ctx.indent();
        for page in &chapter.pages {
            let class = if page.active { " class=\"active\"" } else { "" };
            ctx.add_line(&format!(
                "<li{} data-page-id=\"{}\">{}</li>",
                class,
                escape_html(page.id),
                escape_html(page.title)
            ));
        }
        ctx.dedent();
        ctx.add_line("</ul>");
        ctx.dedent();
        ctx.add_line("</section>");
    }

    ctx.dedent();
    ctx.add_line("</aside>");

    ctx.add_line("<main>");
    ctx.indent();
    match view.active_page() {
        Some(page) => {
            ctx.add_line("<article>");
            ctx.indent();
            ctx.add_line(&format!("<h1>{}</h1>", escape_html(&page.title)));
            ctx.add_line(&format!(
                "<div class=\"page-content\">{}</div>",
                render_content(view.renderer(), &page.content)
            ));
            ctx.dedent();
            ctx.add_line("</article>");
        }
        None => ctx.add_line("<p>Select a page to start reading.</p>"),
    }
    ctx.dedent();
    ctx.add_line("</main>");

    close_document(&mut ctx);
    ctx.get_output()
}

/// Published works listing, or the empty-state message
pub fn render_listing(library: &Library<'_>, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    open_document(&mut ctx, "Published Works");

    ctx.add_line("<h1>Published Works</h1>");
    match library.empty_message() {
        Some(message) => ctx.add_line(&format!("<p>{}</p>", escape_html(message))),
        None => {
            for entry in library.listing() {
                ctx.add_line(&format!("<a class=\"work\" href=\"{}\">", escape_html(&entry.href())));
                ctx.indent();
                ctx.add_line(&format!("<h2>{}</h2>", escape_html(entry.title)));
                ctx.add_line(&format!("<p>{}</p>", escape_html(entry.description)));
                ctx.dedent();
                ctx.add_line("</a>");
            }
        }
    }

    close_document(&mut ctx);
    ctx.get_output()
}

pub fn render_not_found(view: &NotFoundView, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    open_document(&mut ctx, "Not found");
    ctx.add_line(&format!("<p>{}</p>", escape_html(view.message)));
    ctx.add_line(&format!(
        "<a href=\"{}\">{}</a>",
        view.back_href,
        escape_html(view.back_label)
    ));
    close_document(&mut ctx);
    ctx.get_output()
}

/// Detail panel fragment for an activated mention
pub fn render_asset_detail(detail: &AssetDetail<'_>) -> String {
    let mut out = String::from("<div class=\"asset-detail\">");
    out.push_str(&format!("<h3>{}</h3>", escape_html(detail.name())));
    out.push_str(&format!("<p class=\"asset-type\">{}</p>", detail.type_label()));
    if let Some(url) = detail.image_url() {
        out.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(url),
            escape_html(detail.name())
        ));
    }
    out.push_str(&format!("<p>{}</p>", escape_html(detail.description())));
    out.push_str("</div>");
    out
}

fn open_document(ctx: &mut Context, title: &str) {
    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();
    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(title)));
    ctx.dedent();
    ctx.add_line("</head>");
    ctx.add_line("<body>");
    ctx.indent();
}

fn close_document(ctx: &mut Context) {
    ctx.dedent();
    ctx.add_line("</body>");
    ctx.dedent();
    ctx.add_line("</html>");
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::ManualClock;
    use folio_model::{Asset, AssetType};

    #[test]
    fn test_mentions_become_buttons() {
        let clock = ManualClock::default();
        let assets = vec![Asset::with_id("a", "Kael", AssetType::Character, &clock).unwrap()];
        let renderer = Renderer::new(&assets);

        let html = render_content(&renderer, "<b> [[asset:a:Kael]] & [[asset:x:Gone]]");
        assert_eq!(
            html,
            "&lt;b&gt; <button class=\"asset-mention\" data-asset-id=\"a\">Kael</button> &amp; \
             <button class=\"asset-mention asset-missing\" data-asset-id=\"x\">Gone</button>"
        );
    }

    #[test]
    fn test_compact_output() {
        let library = Library::new(&[], &[]);
        let html = render_listing(
            &library,
            HtmlOptions {
                pretty: false,
                ..HtmlOptions::default()
            },
        );
        assert!(!html.contains('\n'));
        assert!(html.contains("<p>No works have been published yet.</p>"));
    }
}
