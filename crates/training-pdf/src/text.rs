//! Text measuring, wrapping and fitting

/// Approximate average glyph width of the builtin Helvetica faces as a
/// fraction of the font size
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Smallest size `fit` shrinks text to before cutting it
pub const MIN_FIT_FONT_SIZE_PT: f32 = 7.0;

const FIT_STEP_PT: f32 = 0.5;
const ELLIPSIS: &str = "...";

/// Rough rendered width of `text` in points when set in builtin Helvetica
pub fn text_width_pt(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * font_size_pt * HELVETICA_CHAR_WIDTH_RATIO
}

/// Greedy word wrap so no line measures more than `max_width`.
///
/// Explicit newlines are kept; words wider than a line are split between
/// characters.
pub fn wrap(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if measure(&candidate) <= max_width {
                line = candidate;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if measure(word) <= max_width {
                line = word.to_string();
                continue;
            }

            for ch in word.chars() {
                line.push(ch);
                if measure(&line) > max_width && line.chars().count() > 1 {
                    line.pop();
                    lines.push(std::mem::take(&mut line));
                    line.push(ch);
                }
            }
        }

        lines.push(line);
    }

    lines
}

/// Wrapped text guaranteed to take at most the requested number of lines
#[derive(Debug, Clone, PartialEq)]
pub struct Fitted {
    pub lines: Vec<String>,
    pub size: f32,
    /// Some text had to be dropped
    pub truncated: bool,
}

/// Wrap `text` into at most `max_lines` lines of `max_width`.
///
/// Text that does not fit at `size` is reflowed and set smaller, down to
/// `MIN_FIT_FONT_SIZE_PT`. If it still does not fit, the overflow is cut and
/// the last line ends with an ellipsis. `measure` takes a string and a size.
pub fn fit(
    text: &str,
    max_width: f32,
    max_lines: usize,
    size: f32,
    measure: impl Fn(&str, f32) -> f32,
) -> Fitted {
    let max_lines = max_lines.max(1);
    let lines = wrap(text, max_width, |s| measure(s, size));
    if lines.len() <= max_lines {
        return Fitted {
            lines,
            size,
            truncated: false,
        };
    }

    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let min_size = MIN_FIT_FONT_SIZE_PT.min(size);
    let mut current = size;
    loop {
        current = (current - FIT_STEP_PT).max(min_size);
        let mut lines = wrap(&flat, max_width, |s| measure(s, current));
        if lines.len() <= max_lines {
            return Fitted {
                lines,
                size: current,
                truncated: false,
            };
        }
        if current <= min_size {
            lines.truncate(max_lines);
            if let Some(last) = lines.last_mut() {
                *last = ellipsize(last, max_width, |s| measure(s, current));
            }
            return Fitted {
                lines,
                size: current,
                truncated: true,
            };
        }
    }
}

/// `line` shortened until it fits with a trailing ellipsis
fn ellipsize(line: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> String {
    let mut kept = line.trim_end().to_string();
    loop {
        let candidate = format!("{}{}", kept, ELLIPSIS);
        if kept.is_empty() || measure(&candidate) <= max_width {
            return candidate;
        }
        kept.pop();
        let trimmed = kept.trim_end().len();
        kept.truncate(trimmed);
    }
}

/// Replace characters the builtin fonts cannot encode
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '-',
            c if (c as u32) < 0x100 && !c.is_control() => c,
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> f32 {
        text.chars().count() as f32
    }

    fn helvetica(text: &str, size: f32) -> f32 {
        text_width_pt(text, size)
    }

    #[test]
    fn test_wrap_on_word_boundaries() {
        let lines = wrap("pass and move quickly", 10.0, chars);
        assert_eq!(lines, vec!["pass and", "move", "quickly"]);
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        let lines = wrap("one\ntwo three", 20.0, chars);
        assert_eq!(lines, vec!["one", "two three"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghij", 4.0, chars);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_long_word_after_text() {
        let lines = wrap("go abcdefgh", 4.0, chars);
        assert_eq!(lines, vec!["go", "abcd", "efgh"]);
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        let lines = wrap("Разминка с мячом", 8.0, chars);
        assert_eq!(lines, vec!["Разминка", "с мячом"]);
    }

    #[test]
    fn test_fit_keeps_size_when_text_fits() {
        let fitted = fit("short drill", 200.0, 1, 10.0, helvetica);
        assert_eq!(fitted.lines, vec!["short drill"]);
        assert_eq!(fitted.size, 10.0);
        assert!(!fitted.truncated);
    }

    #[test]
    fn test_fit_shrinks_before_cutting() {
        // 30 chars at 10pt is 150pt wide; 8pt brings it to 120pt
        let text = "x".repeat(30);
        let fitted = fit(&text, 120.0, 1, 10.0, helvetica);
        assert_eq!(fitted.lines.len(), 1);
        assert_eq!(fitted.size, 8.0);
        assert!(!fitted.truncated);
    }

    #[test]
    fn test_fit_reflows_newlines() {
        let fitted = fit("a\nb\nc", 100.0, 1, 10.0, helvetica);
        assert_eq!(fitted.lines, vec!["a b c"]);
    }

    #[test]
    fn test_fit_truncates_with_ellipsis() {
        let text = "word ".repeat(200);
        let fitted = fit(&text, 100.0, 2, 10.0, helvetica);
        assert_eq!(fitted.lines.len(), 2);
        assert_eq!(fitted.size, MIN_FIT_FONT_SIZE_PT);
        assert!(fitted.truncated);
        let last = &fitted.lines[1];
        assert!(last.ends_with(ELLIPSIS));
        assert!(helvetica(last, fitted.size) <= 100.0);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("“Press” – now • é"), "\"Press\" - now - é");
        assert_eq!(sanitize("Разминка"), "????????");
    }
}
