//! Directory listing module
//!
//! Renders an HTML index for directories without an `index.html`.

use crate::http::error_page::escape_html;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters escaped when a file name becomes one href segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// One visible directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

/// Read the visible entries of `dir`: dotfiles are skipped, directories
/// sort before files, then by name.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        // follows symlinks; dangling links are skipped
        let Ok(metadata) = fs::metadata(entry.path()).await else {
            continue;
        };
        entries.push(ListingEntry {
            name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
        });
    }

    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

/// Render the listing page for the directory at `url_path`
#[must_use]
pub fn render(url_path: &str, entries: &[ListingEntry]) -> String {
    let title = escape_html(url_path);
    let mut rows = String::new();

    if url_path != "/" {
        rows.push_str("        <tr><td><a href=\"../\">../</a></td><td></td></tr>\n");
    }
    for entry in entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        let href = utf8_percent_encode(&entry.name, SEGMENT);
        let size = if entry.is_dir {
            String::new()
        } else {
            format_size(entry.size)
        };
        let _ = writeln!(
            rows,
            "        <tr><td><a href=\"{href}{suffix}\">{}{suffix}</a></td><td>{size}</td></tr>",
            escape_html(&entry.name)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Index of {title}</title>
    <style>
        body {{ font-family: monospace; margin: 2em; }}
        td {{ padding: 0.15em 1.5em 0.15em 0; }}
        td:last-child {{ text-align: right; color: #666; }}
    </style>
</head>
<body>
    <h1>Index of {title}</h1>
    <table>
{rows}    </table>
</body>
</html>"#
    )
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}
