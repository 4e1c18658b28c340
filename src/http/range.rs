//! Byte-range request evaluation (RFC 7233, single range only).

/// Outcome of evaluating a `Range` header against a body of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable range: serve the full body with status 200.
    Full,
    /// Serve `bytes[start..=end]` with status 206.
    Partial { start: usize, end: usize },
    /// Range cannot be satisfied: respond 416.
    Unsatisfiable,
}

/// Evaluate a `Range` header value against a file of `len` bytes.
///
/// Supported forms are `bytes=start-end`, `bytes=start-` and `bytes=-suffix`.
/// Multi-range and malformed headers are ignored and the full body is served,
/// matching common static server behavior.
///
/// # Examples
/// ```
/// use staticsite::http::range::{evaluate_range, RangeOutcome};
/// assert_eq!(
///     evaluate_range(Some("bytes=0-99"), 1000),
///     RangeOutcome::Partial { start: 0, end: 99 }
/// );
/// assert_eq!(evaluate_range(None, 1000), RangeOutcome::Full);
/// ```
pub fn evaluate_range(header: Option<&str>, len: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };

    // Single range only; a multi-range request gets the full body.
    if spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        return evaluate_suffix(end_str, len);
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end_str.is_empty() {
        len - 1
    } else {
        let Ok(end) = end_str.parse::<usize>() else {
            return RangeOutcome::Full;
        };
        // last-byte-pos < first-byte-pos is syntactically invalid per
        // RFC 7233, which invalidates the whole header: serve the full body.
        if end < start {
            return RangeOutcome::Full;
        }
        end.min(len - 1)
    };

    RangeOutcome::Partial { start, end }
}

/// Evaluate a suffix form such as `bytes=-500` (the last 500 bytes).
fn evaluate_suffix(suffix_str: &str, len: usize) -> RangeOutcome {
    let Ok(suffix) = suffix_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if suffix == 0 || len == 0 {
        return RangeOutcome::Unsatisfiable;
    }
    // A suffix longer than the file selects the whole file.
    RangeOutcome::Partial {
        start: len.saturating_sub(suffix),
        end: len - 1,
    }
}
