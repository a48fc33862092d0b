//! The small markdown subset essays are written in
//!
//! `**strong**` / `__strong__`, `*em*` / `_em_`, and blank-line paragraphs.
//! Emphasis never spans a line break. Input is HTML-escaped first.

/// Inline rendering for the typing effect: no block elements, line breaks
/// become `<br>` and paragraph breaks `<br><br>`.
pub fn render_inline(text: &str) -> String {
    let html = emphasize(&escape_html(text));

    let mut out = String::with_capacity(html.len());
    let mut newlines = 0usize;
    for ch in html.chars() {
        if ch == '\n' {
            newlines += 1;
            continue;
        }
        push_breaks(&mut out, newlines);
        newlines = 0;
        out.push(ch);
    }
    push_breaks(&mut out, newlines);
    out
}

/// Final rendering shown once typing ends: one `<p>` per paragraph.
pub fn render_blocks(text: &str) -> String {
    paragraphs(text)
        .into_iter()
        .map(|p| {
            let html = emphasize(&escape_html(p.trim()));
            format!("<p>{}</p>", html.replace('\n', "<br>"))
        })
        .collect()
}

fn push_breaks(out: &mut String, newlines: usize) {
    match newlines {
        0 => {}
        1 => out.push_str("<br>"),
        _ => out.push_str("<br><br>"),
    }
}

/// Split on runs of blank lines, dropping empty paragraphs.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        if line.is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out.retain(|p| !p.trim().is_empty());
    out
}

fn emphasize(text: &str) -> String {
    let text = wrap_delimited(text, "**", "strong");
    let text = wrap_delimited(&text, "__", "strong");
    let text = wrap_delimited(&text, "*", "em");
    wrap_delimited(&text, "_", "em")
}

/// Wrap the shortest non-empty `delim ... delim` runs within a line in `<tag>`.
fn wrap_delimited(text: &str, delim: &str, tag: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(delim) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + delim.len()..];
        let line = &after[..after.find('\n').unwrap_or(after.len())];
        let close = line
            .chars()
            .next()
            .map(char::len_utf8)
            .and_then(|first| line[first..].find(delim).map(|p| p + first));
        match close {
            Some(end) => {
                out.push_str(&format!("<{tag}>{}</{tag}>", &after[..end]));
                rest = &after[end + delim.len()..];
            }
            None => {
                // Delimiters are ASCII, so one byte is one char.
                out.push_str(&delim[..1]);
                rest = &rest[pos + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_emphasis() {
        assert_eq!(
            render_inline("a **bold** and *soft* and __also__ _this_"),
            "a <strong>bold</strong> and <em>soft</em> and <strong>also</strong> <em>this</em>"
        );
    }

    #[test]
    fn test_inline_line_breaks() {
        assert_eq!(render_inline("one\ntwo\n\n\nthree"), "one<br>two<br><br>three");
    }

    #[test]
    fn test_unclosed_and_cross_line_delimiters_stay_literal() {
        assert_eq!(render_inline("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(render_inline("*start\nend*"), "*start<br>end*");
        assert_eq!(render_inline("**"), "**");
    }

    #[test]
    fn test_blocks_make_paragraphs() {
        assert_eq!(
            render_blocks("First line\nsame para\n\n\n  *Second*  \n\n"),
            "<p>First line<br>same para</p><p><em>Second</em></p>"
        );
        assert_eq!(render_blocks(""), "");
    }

    #[test]
    fn test_markup_is_escaped() {
        assert_eq!(render_inline("<b>x</b> & y"), "&lt;b&gt;x&lt;/b&gt; &amp; y");
    }

    #[test]
    fn test_non_ascii_content() {
        assert_eq!(render_inline("*šuma* i _reč_"), "<em>šuma</em> i <em>reč</em>");
    }
}
