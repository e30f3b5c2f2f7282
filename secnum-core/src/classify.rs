//! Line classification for Markdown pages.
//!
//! A single forward scan tracks whether the current line sits inside a
//! fenced code block. Outside fences, a line is a heading when it starts with
//! a run of one to six `#` followed by whitespace and some text. Longer marker
//! runs are plain text and are left as written.
use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use crate::{types::HeadingLine, utils::never_matching_regex};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(#{1,6})[ \t]+(\S.*)$").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile HEADING_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
});

/// Count the leading `#` characters of a line.
///
/// ```
/// use secnum_core::classify::heading_depth;
///
/// assert_eq!(heading_depth("a line"), 0);
/// assert_eq!(heading_depth("# heading"), 1);
/// assert_eq!(heading_depth("### heading"), 3);
/// ```
#[must_use]
pub fn heading_depth(line: &str) -> usize {
  line.bytes().take_while(|b| *b == b'#').count()
}

/// Return the fence character if the line opens or closes a fenced block.
#[must_use]
pub fn fence_delimiter(line: &str) -> Option<char> {
  if line.starts_with("```") {
    Some('`')
  } else if line.starts_with("~~~") {
    Some('~')
  } else {
    None
  }
}

/// Split a heading line into its depth and text, if it is one.
///
/// Bare markers (`#`, `## `) and markers glued to text (`#tag`) are not
/// headings.
#[must_use]
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
  let caps = HEADING_RE.captures(line)?;
  let depth = caps.get(1)?.as_str().len();
  let text = caps.get(2)?.as_str();
  Some((depth, text))
}

/// Find the heading lines of a page, in order.
///
/// Lines inside fenced code blocks are never headings. A fence is closed only
/// by a delimiter made of the same character that opened it.
#[must_use]
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Vec<HeadingLine> {
  let mut headings = Vec::new();
  let mut open_fence: Option<char> = None;

  for (index, line) in lines.iter().enumerate() {
    let line = line.as_ref();

    if let Some(fence) = fence_delimiter(line) {
      open_fence = match open_fence {
        None => Some(fence),
        Some(open) if open == fence => None,
        Some(open) => Some(open),
      };
      continue;
    }

    if open_fence.is_some() {
      continue;
    }

    if let Some((depth, text)) = parse_heading(line) {
      headings.push(HeadingLine::new(index, depth, text));
    }
  }

  trace!("Classified {} heading lines", headings.len());
  headings
}
