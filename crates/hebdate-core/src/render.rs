//! Presentation of a lookup result.
//!
//! Every string that came from the converter is treated as untrusted display
//! text and escaped. A failed lookup renders [`FALLBACK_MESSAGE`]; the
//! upstream error text stays in the logs.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::HebrewDateResult;

/// Shown in place of the date when no lookup succeeded.
pub const FALLBACK_MESSAGE: &str = "Unable to load Hebrew date. Please try again later.";

/// Dashboard widget markup.
///
/// The events block is only emitted when there are events.
///
/// ```rust
/// use hebdate_core::{HebrewDateResult, render};
///
/// let html = render::widget_html(&HebrewDateResult::failure("API returned status code 500"), None);
/// assert!(html.contains("Please try again later"));
/// assert!(!html.contains("500"));
/// ```
#[must_use]
pub fn widget_html(result: &HebrewDateResult, icon_url: Option<&str>) -> String {
    let mut html = String::from("<div class=\"hebrew-date-widget\">");

    match result.date() {
        Some(date) => {
            html.push_str(
                "<div class=\"hebrew-date-content\" style=\"display: flex; align-items: center; justify-content: space-around;\">",
            );
            html.push_str("<div class=\"hebrew-date-text\" style=\"text-align: center;\">");
            // write! to String is infallible
            let _ = write!(
                html,
                "<p class=\"hebrew-date-primary\" dir=\"rtl\" style=\"font-size: 2em; margin: 0.25em 0; font-family: 'Times New Roman', serif;\">{}</p>",
                encode_text(&date.hebrew)
            );
            let _ = write!(
                html,
                "<p class=\"hebrew-date-transliterated\" style=\"font-size: 1.1em; color: #666; margin: 0.25em 0;\">{}</p>",
                encode_text(&date.transliterated)
            );
            html.push_str("</div>");

            if let Some(icon) = icon_url {
                let _ = write!(
                    html,
                    "<div class=\"hebrew-date-icon\"><img src=\"{}\" alt=\"Hebrew Calendar\" style=\"width: 64px; height: 64px;\" /></div>",
                    encode_double_quoted_attribute(icon)
                );
            }
            html.push_str("</div>");

            if !date.events.is_empty() {
                html.push_str(
                    "<div class=\"hebrew-date-events\" style=\"text-align: center; margin-top: 1em; padding-top: 0.5em; border-top: 1px solid #eee;\">",
                );
                for event in &date.events {
                    let _ = write!(
                        html,
                        "<p style=\"font-size: 0.95em; color: #0073aa; margin: 0.25em 0; font-style: italic;\">{}</p>",
                        encode_text(event)
                    );
                }
                html.push_str("</div>");
            }
        },
        None => {
            let _ = write!(
                html,
                "<p class=\"hebrew-date-error\" style=\"text-align: center; color: #666; font-style: italic;\">{}</p>",
                encode_text(FALLBACK_MESSAGE)
            );
        },
    }

    html.push_str("</div>");
    html
}

/// Terminal rendering: Hebrew text, transliteration, then one event per line.
#[must_use]
pub fn plain_text(result: &HebrewDateResult) -> String {
    let Some(date) = result.date() else {
        return FALLBACK_MESSAGE.to_string();
    };

    let mut out = format!(
        "{}\n{}",
        strip_control(&date.hebrew),
        strip_control(&date.transliterated)
    );
    if !date.events.is_empty() {
        out.push('\n');
        for event in &date.events {
            let _ = write!(out, "\n  • {}", strip_control(event));
        }
    }
    out
}

/// Drop control characters so upstream text cannot drive the terminal.
fn strip_control(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}
