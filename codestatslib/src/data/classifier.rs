//! Line classification.
//!
//! Every line of a file is exactly one of:
//!
//! - **blank**: nothing but whitespace
//! - **comment**: the stripped line starts with a configured comment prefix
//! - **code**: anything else
//!
//! Extensions with a [`BlockCommentStyle`] get a pre-pass that finds
//! docstring regions (triple-quoted strings for Python) and counts the lines
//! they cover as comments. How those lines are reconciled with the per-line
//! pass depends on [`DocstringAccounting`].

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::source::config::{DocstringAccounting, ScanConfig};

use super::record::LineCounts;

/// A block-comment syntax whose regions count as comment lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCommentStyle {
    /// `'''…'''` and `"""…"""` strings, matched non-greedily across lines
    TripleQuoted,
}

impl BlockCommentStyle {
    /// The block-comment style files with `extension` use, if any.
    pub fn for_extension(extension: &str, config: &ScanConfig) -> Option<Self> {
        if config.docstring_extensions.contains(extension) {
            Some(BlockCommentStyle::TripleQuoted)
        } else {
            None
        }
    }

    fn regex(&self) -> &'static Regex {
        static TRIPLE_QUOTED: OnceLock<Regex> = OnceLock::new();
        match self {
            BlockCommentStyle::TripleQuoted => TRIPLE_QUOTED.get_or_init(|| {
                Regex::new(r##"'''[\s\S]*?'''|"""[\s\S]*?""""##)
                    .expect("triple-quote pattern is valid")
            }),
        }
    }

    /// Byte ranges of every block-comment region, leftmost-first and
    /// non-overlapping.
    pub fn regions(&self, text: &str) -> Vec<Range<usize>> {
        self.regex().find_iter(text).map(|m| m.range()).collect()
    }
}

/// Result of classifying one file's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    /// Final code/comment/blank counts
    pub counts: LineCounts,
    /// Number of docstring regions found
    pub docstrings: u64,
    /// Lines spanned by all docstring regions
    pub docstring_lines: u64,
    /// Blank lines legacy accounting could not subtract (always 0 for exact)
    pub clamped_blanks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Code,
    Comment,
    Blank,
}

fn line_kind(line: &str, config: &ScanConfig) -> LineKind {
    let stripped = line.trim();
    if stripped.is_empty() {
        LineKind::Blank
    } else if config.is_comment(stripped) {
        LineKind::Comment
    } else {
        LineKind::Code
    }
}

fn tally(counts: &mut LineCounts, kind: LineKind) {
    match kind {
        LineKind::Code => counts.code += 1,
        LineKind::Comment => counts.comment += 1,
        LineKind::Blank => counts.blank += 1,
    }
}

fn count_lines<'a>(lines: impl Iterator<Item = &'a str>, config: &ScanConfig) -> LineCounts {
    let mut counts = LineCounts::new();
    for line in lines {
        tally(&mut counts, line_kind(line, config));
    }
    counts
}

/// Strip the `\n` or `\r\n` terminator the way `str::lines` does.
fn without_line_ending(raw: &str) -> &str {
    match raw.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => raw,
    }
}

/// Classify the lines of `text`, a file with the given extension.
///
/// Lines are counted the way `str::lines` splits them, so a trailing newline
/// does not add an empty line. With [`DocstringAccounting::Exact`] the
/// returned counts always sum to `text.lines().count()`.
pub fn classify(text: &str, extension: &str, config: &ScanConfig) -> Classification {
    let Some(style) = BlockCommentStyle::for_extension(extension, config) else {
        return Classification {
            counts: count_lines(text.lines(), config),
            ..Classification::default()
        };
    };

    let regions = style.regions(text);
    let docstrings = regions.len() as u64;
    let docstring_lines = regions
        .iter()
        .map(|r| text[r.clone()].split('\n').count() as u64)
        .sum();

    match config.docstring_accounting {
        DocstringAccounting::Exact => Classification {
            counts: classify_tracked(text, &regions, config),
            docstrings,
            docstring_lines,
            clamped_blanks: 0,
        },
        DocstringAccounting::Legacy => {
            let mut stripped = String::with_capacity(text.len());
            let mut cursor = 0;
            for region in &regions {
                stripped.push_str(&text[cursor..region.start]);
                cursor = region.end;
            }
            stripped.push_str(&text[cursor..]);

            let mut counts = count_lines(stripped.lines(), config);
            counts.comment += docstring_lines;
            // Each removed region leaves one line behind when re-split
            let clamped_blanks = docstrings.saturating_sub(counts.blank);
            counts.blank = counts.blank.saturating_sub(docstrings);

            Classification {
                counts,
                docstrings,
                docstring_lines,
                clamped_blanks,
            }
        }
    }
}

/// Classify each original line once. A line touched by a region is judged by
/// whatever is left on it outside the region(s); if nothing is left it is a
/// comment line.
fn classify_tracked(text: &str, regions: &[Range<usize>], config: &ScanConfig) -> LineCounts {
    let mut counts = LineCounts::new();
    let mut first = 0;
    let mut start = 0;

    for raw in text.split_inclusive('\n') {
        let end = start + raw.len();
        let content_end = start + without_line_ending(raw).len();

        while first < regions.len() && regions[first].end <= start {
            first += 1;
        }

        let mut touched = false;
        let mut remainder = String::new();
        let mut cursor = start;
        for region in regions[first..].iter().take_while(|r| r.start < end) {
            touched = true;
            if region.start > cursor {
                remainder.push_str(&text[cursor..region.start.min(content_end)]);
            }
            cursor = cursor.max(region.end.min(content_end));
        }

        let kind = if touched {
            remainder.push_str(&text[cursor..content_end]);
            match line_kind(&remainder, config) {
                LineKind::Blank => LineKind::Comment,
                other => other,
            }
        } else {
            line_kind(&text[start..content_end], config)
        };
        tally(&mut counts, kind);

        start = end;
    }

    counts
}
