//! Markdown subset to HTML for generated curricula.
//!
//! Recognizes `#`, `##` and `###` headings (rendered one step lower as `h3`
//! to `h5`), `**strong**` and `*em*` spans, and blank-line separated blocks.
//! Input is not escaped; callers rendering untrusted text must sanitize it.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator between blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

// `R` gives the regexes CRLF-aware line ends: `$` stops before `\r\n` and `.` skips `\r`.
static HEADINGS: Lazy<[(Regex, &'static str); 3]> = Lazy::new(|| {
    [
        (
            Regex::new(r"(?mR)^# (.*?)$").expect("h3 regex"),
            "<h3>${1}</h3>",
        ),
        (
            Regex::new(r"(?mR)^## (.*?)$").expect("h4 regex"),
            "<h4>${1}</h4>",
        ),
        (
            Regex::new(r"(?mR)^### (.*?)$").expect("h5 regex"),
            "<h5>${1}</h5>",
        ),
    ]
});

static STRONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?R)\*\*(.*?)\*\*").expect("strong regex"));

static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?R)\*(.*?)\*").expect("emphasis regex"));

type Stage = fn(&str) -> String;

/// Inline rewrites, in order. Later stages only see what earlier ones left behind.
const INLINE_STAGES: [Stage; 3] = [rewrite_headings, rewrite_strong, rewrite_emphasis];

/// Converts curriculum text into an HTML fragment.
///
/// Never fails: unmatched markers are left in place and empty input yields an
/// empty string. Header blocks are emitted bare; every other block is wrapped
/// in `<p>` with its single line breaks turned into `<br>`.
pub fn format_curriculum(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let inline = INLINE_STAGES
        .iter()
        .fold(text.to_string(), |current, stage| stage(&current));

    let mut html = String::with_capacity(inline.len() + 16);
    for block in split_blocks(&inline) {
        block.render_into(&mut html);
    }
    html
}

/// Number of blocks `text` renders to.
pub fn block_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split(BLOCK_SEPARATOR).count()
    }
}

/// A blank-line separated chunk of already inline-rewritten text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    /// Starts with a heading tag produced by the heading stage.
    Heading(&'a str),
    /// Any other block; wrapped in `<p>` with line breaks as `<br>`.
    Paragraph(&'a str),
}

impl<'a> Block<'a> {
    /// Classifies a block by whether it opens with `<h3`, `<h4` or `<h5`.
    pub fn classify(raw: &'a str) -> Self {
        if matches!(raw.as_bytes(), [b'<', b'h', b'3'..=b'5', ..]) {
            Block::Heading(raw)
        } else {
            Block::Paragraph(raw)
        }
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Block::Heading(html) => out.push_str(html),
            Block::Paragraph(text) => {
                out.push_str("<p>");
                out.push_str(&text.replace('\n', "<br>"));
                out.push_str("</p>");
            }
        }
    }
}

/// Splits inline-rewritten text into blocks, preserving order.
pub fn split_blocks(inline: &str) -> impl Iterator<Item = Block<'_>> {
    inline.split(BLOCK_SEPARATOR).map(Block::classify)
}

fn rewrite_headings(text: &str) -> String {
    HEADINGS
        .iter()
        .fold(text.to_string(), |current, (pattern, replacement)| {
            pattern.replace_all(&current, *replacement).into_owned()
        })
}

fn rewrite_strong(text: &str) -> String {
    STRONG.replace_all(text, "<strong>${1}</strong>").into_owned()
}

fn rewrite_emphasis(text: &str) -> String {
    EMPHASIS.replace_all(text, "<em>${1}</em>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_shift_down_two_levels() {
        assert_eq!(format_curriculum("# Title"), "<h3>Title</h3>");
        assert_eq!(format_curriculum("## Sub"), "<h4>Sub</h4>");
        assert_eq!(format_curriculum("### Detail"), "<h5>Detail</h5>");
    }

    #[test]
    fn deeper_headings_stay_literal() {
        assert_eq!(
            format_curriculum("#### Week 1-2: Foundations"),
            "<p>#### Week 1-2: Foundations</p>"
        );
    }

    #[test]
    fn hash_mid_line_is_text() {
        assert_eq!(format_curriculum("Lesson # 3"), "<p>Lesson # 3</p>");
        assert_eq!(format_curriculum("#NoSpace"), "<p>#NoSpace</p>");
    }

    #[test]
    fn emphasis_spans() {
        assert_eq!(
            format_curriculum("**bold**"),
            "<p><strong>bold</strong></p>"
        );
        assert_eq!(format_curriculum("*italic*"), "<p><em>italic</em></p>");
    }

    #[test]
    fn strong_matches_shortest_span() {
        assert_eq!(
            format_curriculum("**a** and **b**"),
            "<p><strong>a</strong> and <strong>b</strong></p>"
        );
    }

    #[test]
    fn emphasis_does_not_cross_lines() {
        assert_eq!(
            format_curriculum("*open\nclose*"),
            "<p>*open<br>close*</p>"
        );
    }

    #[test]
    fn lone_asterisk_passes_through() {
        assert_eq!(format_curriculum("5 * 3"), "<p>5 * 3</p>");
    }

    #[test]
    fn single_line_breaks_become_br() {
        assert_eq!(format_curriculum("line1\nline2"), "<p>line1<br>line2</p>");
    }

    #[test]
    fn blocks_keep_order_and_headers_stay_bare() {
        assert_eq!(
            format_curriculum("# H\n\nPara one.\n\nPara two."),
            "<h3>H</h3><p>Para one.</p><p>Para two.</p>"
        );
    }

    #[test]
    fn heading_block_lines_are_not_joined_with_br() {
        assert_eq!(
            format_curriculum("## Student Level: beginner\n## Learning Style: visual"),
            "<h4>Student Level: beginner</h4>\n<h4>Learning Style: visual</h4>"
        );
    }

    #[test]
    fn heading_after_text_is_wrapped_with_its_block() {
        assert_eq!(
            format_curriculum("Intro\n# Title"),
            "<p>Intro<br><h3>Title</h3></p>"
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(format_curriculum(""), "");
        assert_eq!(block_count(""), 0);
    }

    #[test]
    fn whitespace_block_still_renders_paragraph() {
        assert_eq!(format_curriculum("a\n\n  \n\nb"), "<p>a</p><p>  </p><p>b</p>");
        assert_eq!(block_count("a\n\n  \n\nb"), 3);
    }

    #[test]
    fn html_is_not_escaped() {
        assert_eq!(
            format_curriculum("<b>raw</b> & more"),
            "<p><b>raw</b> & more</p>"
        );
    }

    #[test]
    fn crlf_stays_outside_heading_tags() {
        assert_eq!(
            format_curriculum("# Title\r\nBody"),
            "<h3>Title</h3>\r\nBody"
        );
    }

    #[test]
    fn malformed_nesting_never_panics() {
        let html = format_curriculum("*a**b*");
        assert!(html.starts_with("<p>"));
        assert!(html.ends_with("</p>"));
    }

    #[test]
    fn classify_recognises_rendered_headings_only() {
        assert_eq!(Block::classify("<h5>x</h5>"), Block::Heading("<h5>x</h5>"));
        assert_eq!(Block::classify("<h2>x</h2>"), Block::Paragraph("<h2>x</h2>"));
        assert_eq!(Block::classify(""), Block::Paragraph(""));
    }
}
