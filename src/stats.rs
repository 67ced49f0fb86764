//! Editor statistics shown under the code editor

/// Line and character counts of the current editor content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorStats {
    pub lines: usize,
    pub chars: usize,
}

impl EditorStats {
    /// Count newline-separated segments (never less than one) and characters.
    pub fn compute(code: &str) -> Self {
        Self {
            lines: code.split('\n').count(),
            chars: code.chars().count(),
        }
    }

    pub fn lines_label(&self) -> String {
        format!("Lines: {}", self.lines)
    }

    pub fn chars_label(&self) -> String {
        format!("Chars: {}", self.chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_code_has_one_line() {
        let stats = EditorStats::compute("");
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.chars, 0);
        assert_eq!(stats.lines_label(), "Lines: 1");
        assert_eq!(stats.chars_label(), "Chars: 0");
    }

    #[test]
    fn test_trailing_newline_counts_segment() {
        let stats = EditorStats::compute("# Write your Python code here\n");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.chars, 30);
    }

    #[test]
    fn test_lines_match_segments() {
        for code in ["a", "a\nb", "\n\n\n", "x = 1\ny = [1,\n 2]\nprint(y)"] {
            let stats = EditorStats::compute(code);
            assert_eq!(stats.lines, code.matches('\n').count() + 1, "{:?}", code);
        }
    }

    #[test]
    fn test_chars_counts_scalars_not_bytes() {
        let stats = EditorStats::compute("print('ü')");
        assert_eq!(stats.chars, 10);
    }
}
