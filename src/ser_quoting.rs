//! Scalar analysis for the emitter: which texts can be written plain, which need quotes.
//!
//! The checks are structural only. Nothing is quoted for looking like a number
//! or a boolean, since the tree has no implicit typing.

/// Returns true if `s` can be emitted as a plain block scalar and read back unchanged.
#[inline]
pub(crate) fn is_plain_safe(s: &str) -> bool {
    let bytes = s.as_bytes();
    let Some(&first) = bytes.first() else {
        return false;
    };
    if s.starts_with("---") || s.starts_with("...") {
        return false;
    }
    if first.is_ascii_whitespace() || bytes[bytes.len() - 1].is_ascii_whitespace() {
        return false;
    }
    if matches!(
        first,
        b'[' | b']'
            | b'{'
            | b'}'
            | b','
            | b'#'
            | b'&'
            | b'*'
            | b'!'
            | b'|'
            | b'>'
            | b'\''
            | b'"'
            | b'%'
            | b'@'
            | b'`'
    ) {
        return false;
    }
    // `-5`, `?x` and `:x` are plain; `- x`, `? x`, `: x` and a lone indicator are not.
    if matches!(first, b'-' | b'?' | b':')
        && bytes.get(1).is_none_or(|next| next.is_ascii_whitespace())
    {
        return false;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return false;
    }
    !s.chars().any(needs_escape)
}

/// Returns true if `s` can be written single-quoted (no escapes available there).
#[inline]
pub(crate) fn is_single_quote_safe(s: &str) -> bool {
    !s.chars().any(needs_escape)
}

fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{FEFF}' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_accepts_ordinary_text() {
        for s in ["cool", "5", "-5.00", "10.00", "null", "a:b", "http://x.y/z", "my-string", "a#b"] {
            assert!(is_plain_safe(s), "{s} should be plain");
        }
    }

    #[test]
    fn plain_rejects_structural_text() {
        for s in ["", " x", "x ", "- x", "-", "a: b", "a:", "x #c", "#c", "[a]", "'q'", "---", "line\nbreak", "*ref"] {
            assert!(!is_plain_safe(s), "{s:?} should be quoted");
        }
    }

    #[test]
    fn single_quotes_cannot_carry_control_characters() {
        assert!(is_single_quote_safe("it's"));
        assert!(!is_single_quote_safe("tab\there"));
    }
}
