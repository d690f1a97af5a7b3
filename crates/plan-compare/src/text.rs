//! Text helpers shared by the grid and the header labels.

/// Replace every run of line breaks (`\r`, `\n`) with `replacement`.
///
/// Consecutive breaks such as `\r\n` collapse into a single replacement.
///
/// ```rust
/// use plan_compare::text::remove_line_breaks;
///
/// assert_eq!(remove_line_breaks("a\r\nb\nc", " "), "a b c");
/// assert_eq!(remove_line_breaks("Index Seek\n", ""), "Index Seek");
/// ```
pub fn remove_line_breaks(text: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;

    for ch in text.chars() {
        if ch == '\r' || ch == '\n' {
            if !in_break {
                out.push_str(replacement);
                in_break = true;
            }
        } else {
            out.push(ch);
            in_break = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_breaks_is_unchanged() {
        assert_eq!(remove_line_breaks("Estimated Cost", " "), "Estimated Cost");
    }

    #[test]
    fn test_crlf_collapses_to_one_space() {
        assert_eq!(remove_line_breaks("line one\r\nline two", " "), "line one line two");
    }

    #[test]
    fn test_blank_lines_collapse() {
        assert_eq!(remove_line_breaks("a\n\n\nb", " "), "a b");
    }

    #[test]
    fn test_empty_replacement() {
        assert_eq!(remove_line_breaks("\nName\n", ""), "Name");
    }
}
