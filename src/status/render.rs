//! HTML templates for the status page.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::FailureKind;

use super::types::StatusSnapshot;

/// Placeholder for a counter the backend did not send.
pub const MISSING_VALUE: &str = "n/a";

/// Render the page for a successfully fetched snapshot.
pub fn render_snapshot(title: &str, snapshot: &StatusSnapshot, rendered_at: OffsetDateTime) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "      <p>Domains known: {}</p>\n",
        counter(snapshot.current_num_of_domains)
    ));
    body.push_str(&format!(
        "      <p>Domains crawled: {}</p>\n",
        counter(snapshot.current_num_of_crawled_domains)
    ));
    body.push_str(&format!(
        "      <p>Webpages known: {}</p>\n",
        counter(snapshot.current_num_of_webpages)
    ));

    if let Some(message) = &snapshot.message {
        body.push_str(&format!("      <p>Message: {}</p>\n", escape_html(message)));
    }

    layout(title, &body, rendered_at)
}

/// Render the fallback page shown when the snapshot could not be fetched.
pub fn render_unavailable(title: &str, failure: FailureKind, rendered_at: OffsetDateTime) -> String {
    let body = format!(
        "      <p>Status is currently unavailable.</p>\n      <p>Reason: {}.</p>\n",
        failure.describe()
    );

    layout(title, &body, rendered_at)
}

fn layout(title: &str, body: &str, rendered_at: OffsetDateTime) -> String {
    let title = escape_html(title);
    let stamp = rendered_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| rendered_at.unix_timestamp().to_string());

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20 <meta charset=\"utf-8\">\n\
         \x20 <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         \x20 <main>\n\
         \x20   <h1>{title}</h1>\n\
         \x20   <section>\n\
         {body}\
         \x20   </section>\n\
         \x20   <footer>Rendered at {stamp}</footer>\n\
         \x20 </main>\n\
         </body>\n\
         </html>\n"
    )
}

fn counter(value: Option<u64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

/// Escape text for interpolation into HTML element content or attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
