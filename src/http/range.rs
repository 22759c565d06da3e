//! HTTP Range request module
//!
//! Single `bytes=` range support for static files (RFC 7233). Multi-range
//! and non-byte units are ignored and answered with the full body.

/// Inclusive byte span resolved against a file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    #[must_use]
    pub const fn content_length(&self) -> usize {
        self.end - self.start + 1
    }
}

/// What a `Range` header asks for, given the file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable range: send the whole file
    Full,
    /// Send only this span (206)
    Partial(ByteRange),
    /// Range lies outside the file (416)
    Unsatisfiable,
}

/// Resolve a `Range` header against `file_size`.
///
/// Supported forms: `bytes=start-end`, `bytes=start-` and `bytes=-suffix`.
/// An end past the file is clamped to the last byte.
#[must_use]
pub fn resolve_range(range_header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    if spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        let Ok(suffix) = last.parse::<usize>() else {
            return RangeOutcome::Full;
        };
        if suffix == 0 || file_size == 0 {
            return RangeOutcome::Unsatisfiable;
        }
        return RangeOutcome::Partial(ByteRange {
            start: file_size.saturating_sub(suffix),
            end: file_size - 1,
        });
    }

    let Ok(start) = first.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= file_size {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if last.is_empty() {
        file_size - 1
    } else {
        match last.parse::<usize>() {
            Ok(end) => end.min(file_size - 1),
            Err(_) => return RangeOutcome::Full,
        }
    };

    if start > end {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Partial(ByteRange { start, end })
}
