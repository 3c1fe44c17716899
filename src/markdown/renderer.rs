//! Markdown to HTML renderer using pulldown-cmark

use std::collections::HashMap;

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::PreviewTheme;

/// Parser options used for every render
pub fn render_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render markdown to an HTML fragment.
///
/// Single newlines inside a paragraph become `<br />`, and every heading
/// without an explicit `{#id}` gets a slug id. Empty input renders to an
/// empty string.
pub fn render(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let parser = Parser::new_ext(markdown, render_options());
    let events: Vec<Event<'_>> = parser.map(hard_line_break).collect();
    let events = add_heading_anchors(events);

    let mut html_output = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

/// Render markdown into a complete styled HTML document
pub fn preview_document(markdown: &str, theme: &PreviewTheme) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>{}</style>
</head>
<body>
    <div id="content">{}</div>
</body>
</html>"#,
        generate_css(theme),
        render(markdown)
    )
}

fn hard_line_break(event: Event<'_>) -> Event<'_> {
    match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    }
}

/// Fill in `id` for headings that have none. Explicit ids are reserved up
/// front so a generated slug never reuses one that appears later.
fn add_heading_anchors(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut slugger = Slugger::default();
    for event in &events {
        if let Event::Start(Tag::Heading { id: Some(existing), .. }) = event {
            slugger.reserve(existing);
        }
    }

    for i in 0..events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }

        let slug = slugger.slug(&heading_text(&events[i + 1..]));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }

    events
}

/// Plain text of a heading, up to its end tag
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::HardBreak | Event::SoftBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Heading id generator. Ids are unique within one render.
#[derive(Debug, Default)]
struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    fn reserve(&mut self, id: &str) {
        self.seen.entry(id.to_string()).or_insert(0);
    }

    fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut slug = base.clone();

        if self.seen.contains_key(&slug) {
            loop {
                let count = self.seen.entry(base.clone()).or_insert(0);
                *count += 1;
                slug = format!("{}-{}", base, count);
                if !self.seen.contains_key(&slug) {
                    break;
                }
            }
        }

        self.seen.insert(slug.clone(), 0);
        slug
    }
}

/// Lowercase, drop punctuation (keeping `-` and `_`), whitespace to `-`
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if (c.is_ascii_punctuation() && c != '-' && c != '_')
                || ('\u{2000}'..='\u{206F}').contains(&c)
                || ('\u{2E00}'..='\u{2E7F}').contains(&c)
            {
                None
            } else {
                Some(c)
            }
        })
        .collect()
}

/// Generate CSS from theme colors
fn generate_css(theme: &PreviewTheme) -> String {
    format!(
        r#"
* {{
    box-sizing: border-box;
}}

body {{
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    font-size: 15px;
    line-height: 1.6;
    color: {text};
    background: {background};
    padding: 24px;
    max-width: 820px;
    margin: 0 auto;
}}

h1, h2, h3, h4, h5, h6 {{
    color: {heading};
    margin: 24px 0 12px;
    line-height: 1.25;
}}

h1, h2 {{
    border-bottom: 1px solid {border};
    padding-bottom: 0.3em;
}}

code, pre {{
    background: {code_background};
    font-family: "SF Mono", "Fira Code", Consolas, Menlo, monospace;
    border-radius: 4px;
}}

code {{
    padding: 0.15em 0.35em;
    font-size: 0.9em;
}}

pre {{
    padding: 14px;
    overflow-x: auto;
}}

pre code {{
    padding: 0;
    background: none;
}}

blockquote {{
    border-left: 4px solid {accent};
    margin: 0 0 16px 0;
    padding: 0 16px;
    color: {muted};
}}

a {{
    color: {link};
}}

table {{
    border-collapse: collapse;
}}

th, td {{
    border: 1px solid {border};
    padding: 6px 12px;
}}

hr {{
    border: none;
    border-top: 1px solid {border};
}}
"#,
        text = theme.text,
        background = theme.background,
        heading = theme.heading,
        link = theme.link,
        code_background = theme.code_background,
        border = theme.border,
        accent = theme.accent,
        muted = theme.muted,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_render_heading_and_line_breaks() {
        let html = render("# Title\nline1\nline2");
        assert_eq!(
            html,
            "<h1 id=\"title\">Title</h1>\n<p>line1<br />\nline2</p>\n"
        );
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let html = render("# Intro\n\n## Intro\n\n### Intro");
        assert!(html.contains("<h1 id=\"intro\">"));
        assert!(html.contains("<h2 id=\"intro-1\">"));
        assert!(html.contains("<h3 id=\"intro-2\">"));
    }

    #[test]
    fn test_explicit_heading_id_is_kept() {
        let html = render("# Setup {#install}\n\n# Install");
        assert!(html.contains("<h1 id=\"install\">Setup</h1>"));
        assert!(html.contains("<h1 id=\"install-1\">Install</h1>"));
    }

    #[test]
    fn test_later_explicit_id_is_not_taken() {
        let html = render("# Install\n\n# Setup {#install}");
        assert!(html.contains("<h1 id=\"install-1\">Install</h1>"));
        assert!(html.contains("<h1 id=\"install\">Setup</h1>"));
        assert_eq!(html.matches("id=\"install\"").count(), 1);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  what's `new` in 2.0?  "), "whats-new-in-20");
        assert_eq!(slugify("snake_case and-dash"), "snake_case-and-dash");
        assert_eq!(slugify("Überblick"), "überblick");
    }

    #[test]
    fn test_render_gfm_extensions() {
        let html = render("| A | B |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_render_code_block_is_escaped() {
        let html = render("```\n<b>raw</b>\n```");
        assert!(html.contains("<pre><code>&lt;b&gt;raw&lt;/b&gt;"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let text = "# A\n\n# A\n\ntext\nmore";
        assert_eq!(render(text), render(text));
    }

    #[test]
    fn test_preview_document_wraps_fragment() {
        let doc = preview_document("# Hi", &PreviewTheme::default());
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<h1 id=\"hi\">Hi</h1>"));
        assert!(doc.contains(&PreviewTheme::default().background));
    }
}
