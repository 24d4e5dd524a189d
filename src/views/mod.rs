//! View rendering.
//!
//! Each [`View`] renders into the same HTML page shell: a titled document
//! with a `#root` mount element the client bundle hydrates. The markup
//! inside the mount element is the server-rendered fallback for the view.

mod home;
mod new_exercise;

use std::fmt::Write;

use crate::config::PageConfig;
use crate::routing::View;

/// Settings shared by every rendered page.
#[derive(Debug, Clone)]
pub struct PageShell {
    pub app_title: String,
    pub script_src: Option<String>,
}

impl From<&PageConfig> for PageShell {
    fn from(config: &PageConfig) -> Self {
        Self {
            app_title: config.title.clone(),
            script_src: config.script_src.clone(),
        }
    }
}

impl Default for PageShell {
    fn default() -> Self {
        Self::from(&PageConfig::default())
    }
}

impl View {
    /// Render the complete HTML document for this view.
    pub fn render(&self, shell: &PageShell) -> String {
        let app_title = escape_html(&shell.app_title);
        let body = match self {
            View::Home => home::body(&app_title),
            View::NewExercise => new_exercise::body(),
        };

        let mut html = String::with_capacity(512 + body.len());
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        // Writing into a String cannot fail.
        let _ = writeln!(html, "<title>{} | {}</title>", self.title(), app_title);
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(html, "<div id=\"root\" data-view=\"{}\">", self.slug());
        html.push_str(&body);
        html.push_str("</div>\n");
        if let Some(src) = &shell.script_src {
            let _ = writeln!(html, "<script src=\"{}\" defer></script>", escape_html(src));
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
