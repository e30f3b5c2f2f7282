//! Markdown pages: line-based numbering and rendering.
use std::path::Path;

use crate::{
  classify::{classify_lines, heading_depth},
  error::NumberingResult,
  html::HtmlPage,
  outline::Outline,
  types::{NumberingOptions, SPAN_CLASS},
};

/// Markup of a page, decided from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
  Markdown,
  Html,
}

impl PageKind {
  /// Guess the page kind from its extension. Anything that is not HTML is
  /// treated as Markdown.
  #[must_use]
  pub fn from_path(path: &str) -> Self {
    match Path::new(path)
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase)
      .as_deref()
    {
      Some("html" | "htm") => Self::Html,
      _ => Self::Markdown,
    }
  }
}

/// A Markdown page with its numbered headings.
#[derive(Debug, Clone)]
pub struct MarkdownPage {
  lines:   Vec<String>,
  outline: Outline,
}

impl MarkdownPage {
  /// Classify and number the lines of a page.
  #[must_use]
  pub fn new<S: AsRef<str>>(lines: &[S], options: &NumberingOptions) -> Self {
    let outline = Outline::new(classify_lines(lines), options);
    Self {
      lines: lines.iter().map(|l| l.as_ref().to_string()).collect(),
      outline,
    }
  }

  /// Numbered headings of the page.
  #[must_use]
  pub const fn outline(&self) -> &Outline {
    &self.outline
  }

  /// Shift the page so it starts at `chapter`.
  pub fn set_page_chapter(&mut self, chapter: u32) {
    self.outline.set_chapter(chapter);
  }

  /// Render the page with section numbers inserted into heading lines.
  #[must_use]
  pub fn enumerate_headings(&self, add_span_element: bool) -> Vec<String> {
    let mut lines = self.lines.clone();

    for heading in self.outline.headings() {
      if heading.section_numbering.is_unassigned() {
        continue;
      }
      if let Some(line) = lines.get_mut(heading.index) {
        *line = insert_heading_number(
          line,
          &heading.section_number_string(),
          add_span_element,
        );
      }
    }

    lines
  }
}

/// Insert a section number after the heading marker of a line.
///
/// ```
/// use secnum_core::page::insert_heading_number;
///
/// assert_eq!(
///   insert_heading_number("## Example page", "2.2", false),
///   "## 2.2 Example page"
/// );
/// ```
#[must_use]
pub fn insert_heading_number(line: &str, number: &str, wrap: bool) -> String {
  let (marker, text) = line.split_at(heading_depth(line));
  let text = text.trim_start();

  if wrap {
    format!("{marker} <span class=\"{SPAN_CLASS}\">{number}</span> {text}")
  } else {
    format!("{marker} {number} {text}")
  }
}

/// Number the headings of a Markdown page.
///
/// With `chapter` set, the page's level 1 counter is shifted to start there;
/// without it, the page keeps its own numbering.
///
/// # Errors
///
/// Returns an error when validation fails under `options.strict`.
pub fn number_page<S: AsRef<str>>(
  lines: &[S],
  chapter: Option<u32>,
  options: &NumberingOptions,
) -> NumberingResult<Vec<String>> {
  number_named_page("<page>", lines, chapter, options)
}

/// Like [`number_page`], naming the page in diagnostics.
///
/// # Errors
///
/// Returns an error when validation fails under `options.strict`.
pub fn number_named_page<S: AsRef<str>>(
  page: &str,
  lines: &[S],
  chapter: Option<u32>,
  options: &NumberingOptions,
) -> NumberingResult<Vec<String>> {
  let mut md = MarkdownPage::new(lines, options);
  md.outline().validate(page, options)?;

  if let Some(chapter) = chapter {
    md.set_page_chapter(chapter);
  }

  Ok(md.enumerate_headings(options.add_span_wrapper))
}

/// Count the level 1 headings of a page, whatever its markup.
#[must_use]
pub fn level1_count<S: AsRef<str>>(
  page: &str,
  lines: &[S],
  options: &NumberingOptions,
) -> usize {
  match PageKind::from_path(page) {
    PageKind::Markdown => MarkdownPage::new(lines, options).outline().level1_count(),
    PageKind::Html => {
      let html = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
      HtmlPage::parse(&html, options).outline().level1_count()
    },
  }
}

/// Split YAML front matter (`---` fenced, at the very top) from the body.
///
/// Returns the front matter lines, delimiters included, and the body lines.
/// A page without a closing delimiter has no front matter.
#[must_use]
pub fn split_front_matter(content: &str) -> (Vec<String>, Vec<String>) {
  let lines: Vec<String> = content.lines().map(str::to_string).collect();

  if lines.first().is_some_and(|l| l.trim_end() == "---")
    && let Some(end) = lines.iter().skip(1).position(|l| {
      let l = l.trim_end();
      l == "---" || l == "..."
    })
  {
    let split = end + 2;
    let body = lines[split..].to_vec();
    let mut front = lines;
    front.truncate(split);
    return (front, body);
  }

  (Vec::new(), lines)
}
