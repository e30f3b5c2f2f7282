//! Type definitions shared by the numbering passes.
//!
//! Contains:
//! - [`SectionNumber`], the per-level counters of one heading
//! - [`HeadingLine`], a heading found on a page
//! - [`NumberingOptions`] and its builder
//!
//! # Examples
//!
//! ```
//! use secnum_core::{NumberingMode, NumberingOptions};
//!
//! let options = NumberingOptions {
//!   mode: NumberingMode::Strict,
//!   toc_depth: 2,
//!   ..Default::default()
//! };
//! assert!(options.add_span_wrapper);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of heading levels that carry a counter (`h1` through `h6`).
pub const MAX_DEPTH: usize = 6;

/// CSS class of the element wrapping an inserted section number.
pub const SPAN_CLASS: &str = "section-number";

/// Running counters of one heading, one per level.
///
/// Index 0 holds the level 1 counter, which is the chapter. Levels that were
/// never reached stay at zero.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct SectionNumber([u32; MAX_DEPTH]);

impl SectionNumber {
  /// Create a section number from raw counters.
  #[must_use]
  pub const fn new(counters: [u32; MAX_DEPTH]) -> Self {
    Self(counters)
  }

  /// Raw counters, level 1 first.
  #[must_use]
  pub const fn counters(&self) -> &[u32; MAX_DEPTH] {
    &self.0
  }

  /// Counter at `depth` (1-based). Depths outside `1..=6` read as zero.
  #[must_use]
  pub fn get(&self, depth: usize) -> u32 {
    depth
      .checked_sub(1)
      .and_then(|idx| self.0.get(idx))
      .copied()
      .unwrap_or(0)
  }

  /// Set the counter at `depth` (1-based). Depths outside `1..=6` are
  /// ignored.
  pub fn set(&mut self, depth: usize, value: u32) {
    if let Some(slot) = depth.checked_sub(1).and_then(|idx| self.0.get_mut(idx))
    {
      *slot = value;
    }
  }

  /// The level 1 counter.
  #[must_use]
  pub const fn chapter(&self) -> u32 {
    self.0[0]
  }

  /// Whether no counter has been assigned at all.
  #[must_use]
  pub fn is_unassigned(&self) -> bool {
    self.0.iter().all(|n| *n == 0)
  }

  /// Shift the level 1 counter so the page starts at `chapter`.
  ///
  /// A heading whose own level 1 counter is zero (the page opened below
  /// level 1) takes `chapter` outright, otherwise the counter is offset by
  /// `chapter - 1`.
  pub const fn set_chapter(&mut self, chapter: u32) {
    let own = self.0[0];
    self.0[0] = if own == 0 { chapter } else { own - 1 + chapter };
  }
}

impl fmt::Display for SectionNumber {
  /// Trailing zeros are dropped and the rest joined with dots. A lone
  /// chapter number keeps a trailing dot (`1.`), deeper numbers do not
  /// (`2.1`). An unassigned number renders as an empty string.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let len = self.0.iter().rposition(|n| *n != 0).map_or(0, |idx| idx + 1);
    let counters = &self.0[..len];

    for (idx, n) in counters.iter().enumerate() {
      if idx > 0 {
        f.write_str(".")?;
      }
      write!(f, "{n}")?;
    }

    if len == 1 {
      f.write_str(".")?;
    }
    Ok(())
  }
}

/// A heading found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingLine {
  /// Position of the heading among the page's lines (Markdown) or heading
  /// elements (HTML).
  pub index: usize,

  /// Heading depth. Markdown marker runs longer than six are kept as-is.
  pub depth: usize,

  /// Heading text without the depth marker.
  pub raw_content: String,

  /// Anchor ID of the heading, if it has one.
  pub anchor: Option<String>,

  /// Computed counters.
  pub section_numbering: SectionNumber,
}

impl HeadingLine {
  /// Create an unnumbered heading.
  #[must_use]
  pub fn new(index: usize, depth: usize, raw_content: impl Into<String>) -> Self {
    Self {
      index,
      depth,
      raw_content: raw_content.into(),
      anchor: None,
      section_numbering: SectionNumber::default(),
    }
  }

  /// Rendered section number, e.g. `"2.1"`.
  #[must_use]
  pub fn section_number_string(&self) -> String {
    self.section_numbering.to_string()
  }
}

/// Numbering algorithm used within a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingMode {
  /// Headings may jump forward any number of levels; skipped levels read
  /// as zero.
  #[default]
  Lenient,

  /// Levels must be entered one step at a time. Skips are reported (and
  /// rejected under strict validation) but numbered like lenient mode.
  Strict,
}

impl std::str::FromStr for NumberingMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "lenient" => Ok(Self::Lenient),
      "strict" => Ok(Self::Strict),
      _ => Err(format!("Unknown numbering mode: {s}")),
    }
  }
}

/// How many chapters a page consumes in the cross-page sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterCounting {
  /// Every page consumes `max(level 1 headings, 1)` chapters.
  #[default]
  Page,

  /// A page consumes exactly its level 1 headings. Pages without one
  /// continue the previous page's last chapter.
  Heading,
}

impl std::str::FromStr for ChapterCounting {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "page" => Ok(Self::Page),
      "heading" => Ok(Self::Heading),
      _ => Err(format!("Unknown chapter counting: {s}")),
    }
  }
}

/// Options controlling numbering and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct NumberingOptions {
  /// Numbering algorithm within a page.
  pub mode: NumberingMode,

  /// Treat validation failures as errors instead of warnings.
  pub strict: bool,

  /// Numbering starts at this heading (1-based); earlier headings are left
  /// untouched.
  pub order: usize,

  /// Wrap inserted numbers in `<span class="section-number">`.
  pub add_span_wrapper: bool,

  /// Prefix table of contents links for headings up to this depth. Zero
  /// disables the pass.
  pub toc_depth: u8,

  /// Continue chapter numbering from one page to the next.
  pub increment_across_pages: bool,

  /// How many chapters a page consumes.
  pub chapter_counting: ChapterCounting,
}

impl Default for NumberingOptions {
  fn default() -> Self {
    Self {
      mode:                   NumberingMode::Lenient,
      strict:                 false,
      order:                  1,
      add_span_wrapper:       true,
      toc_depth:              0,
      increment_across_pages: true,
      chapter_counting:       ChapterCounting::Page,
    }
  }
}

/// Builder for constructing [`NumberingOptions`] with method chaining.
#[derive(Debug, Clone, Default)]
pub struct NumberingOptionsBuilder {
  options: NumberingOptions,
}

impl NumberingOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Select the numbering algorithm.
  #[must_use]
  pub const fn mode(mut self, mode: NumberingMode) -> Self {
    self.options.mode = mode;
    self
  }

  /// Make validation failures fatal.
  #[must_use]
  pub const fn strict(mut self, enabled: bool) -> Self {
    self.options.strict = enabled;
    self
  }

  /// Start numbering at the `order`-th heading.
  #[must_use]
  pub const fn order(mut self, order: usize) -> Self {
    self.options.order = order;
    self
  }

  /// Enable or disable the span wrapper.
  #[must_use]
  pub const fn add_span_wrapper(mut self, enabled: bool) -> Self {
    self.options.add_span_wrapper = enabled;
    self
  }

  /// Set the table of contents depth.
  #[must_use]
  pub const fn toc_depth(mut self, depth: u8) -> Self {
    self.options.toc_depth = depth;
    self
  }

  /// Enable or disable cross-page chapter continuation.
  #[must_use]
  pub const fn increment_across_pages(mut self, enabled: bool) -> Self {
    self.options.increment_across_pages = enabled;
    self
  }

  /// Select how chapters are counted per page.
  #[must_use]
  pub const fn chapter_counting(mut self, counting: ChapterCounting) -> Self {
    self.options.chapter_counting = counting;
    self
  }

  /// Build the final [`NumberingOptions`].
  #[must_use]
  pub fn build(self) -> NumberingOptions {
    self.options
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_section_number_string() {
    assert_eq!(SectionNumber::new([1, 0, 0, 0, 0, 0]).to_string(), "1.");
    assert_eq!(SectionNumber::new([2, 1, 0, 0, 0, 0]).to_string(), "2.1");
    assert_eq!(SectionNumber::new([2, 0, 1, 0, 0, 0]).to_string(), "2.0.1");
    assert_eq!(SectionNumber::new([0, 1, 0, 0, 0, 0]).to_string(), "0.1");
    assert_eq!(SectionNumber::new([1, 2, 3, 4, 5, 6]).to_string(), "1.2.3.4.5.6");
  }

  #[test]
  fn test_unassigned_number_renders_empty() {
    let number = SectionNumber::default();
    assert!(number.is_unassigned());
    assert_eq!(number.to_string(), "");
  }

  #[test]
  fn test_set_chapter() {
    let mut own = SectionNumber::new([2, 1, 0, 0, 0, 0]);
    own.set_chapter(5);
    assert_eq!(own.counters(), &[6, 1, 0, 0, 0, 0]);

    let mut missing = SectionNumber::new([0, 3, 0, 0, 0, 0]);
    missing.set_chapter(4);
    assert_eq!(missing.to_string(), "4.3");
  }

  #[test]
  fn test_get_and_set_out_of_range() {
    let mut number = SectionNumber::default();
    number.set(7, 9);
    number.set(0, 9);
    assert!(number.is_unassigned());
    assert_eq!(number.get(0), 0);
    assert_eq!(number.get(7), 0);

    number.set(3, 2);
    assert_eq!(number.get(3), 2);
  }

  #[test]
  fn test_parse_modes() {
    assert_eq!("Strict".parse::<NumberingMode>(), Ok(NumberingMode::Strict));
    assert_eq!(
      "heading".parse::<ChapterCounting>(),
      Ok(ChapterCounting::Heading)
    );
    assert!("sideways".parse::<ChapterCounting>().is_err());
  }

  #[test]
  fn test_builder() {
    let options = NumberingOptionsBuilder::new()
      .mode(NumberingMode::Strict)
      .order(2)
      .toc_depth(3)
      .add_span_wrapper(false)
      .build();

    assert_eq!(options.mode, NumberingMode::Strict);
    assert_eq!(options.order, 2);
    assert_eq!(options.toc_depth, 3);
    assert!(!options.add_span_wrapper);
    assert!(options.increment_across_pages);
  }
}
