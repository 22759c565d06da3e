//! Error page rendering module
//!
//! Renders the HTML bodies used for the custom 404 and 500 responses.

/// Message shown on the 404 page
pub const NOT_FOUND: &str = "Not Found";
/// Message shown on the 500 page
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Render an error page around `message`.
///
/// The message is expected to be one of the fixed constants above; it is
/// escaped anyway so arbitrary text cannot break the markup.
#[must_use]
pub fn render(message: &str) -> String {
    let message = escape_html(message);
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{message}</title>
    <style>
        html, body {{
            height: 100%;
            margin: 0;
        }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            background: #f7f7f8;
            color: #3c3c43;
        }}
        svg {{
            width: 160px;
            height: 160px;
            margin-bottom: 24px;
        }}
        h1 {{
            font-size: 1.6em;
            font-weight: 600;
            margin: 0;
        }}
    </style>
</head>
<body>
    <svg viewBox="0 0 120 120" xmlns="http://www.w3.org/2000/svg" aria-hidden="true">
        <circle cx="60" cy="60" r="54" fill="none" stroke="#c7c7cc" stroke-width="6"/>
        <circle cx="42" cy="48" r="6" fill="#8e8e93"/>
        <circle cx="78" cy="48" r="6" fill="#8e8e93"/>
        <path d="M38 86 Q60 70 82 86" fill="none" stroke="#8e8e93" stroke-width="6" stroke-linecap="round"/>
    </svg>
    <h1>{message}</h1>
</body>
</html>"##
    )
}

/// Escape text for inclusion in HTML element content or attributes
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
