//! The numbered headings of one page, independent of its markup.
//!
//! Both Markdown and HTML pages build an [`Outline`] from the headings they
//! find, then render the numbers back into their own markup.
use log::{debug, warn};

use crate::{
  error::{NumberingError, NumberingResult},
  numbering::{SkippedLevel, number_depths},
  types::{HeadingLine, NumberingOptions},
};

/// Numbered headings of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
  headings: Vec<HeadingLine>,
  skips:    Vec<SkippedLevel>,
}

impl Outline {
  /// Number the given headings.
  ///
  /// Headings before the `options.order`-th are dropped from the outline and
  /// keep their original text.
  #[must_use]
  pub fn new(mut headings: Vec<HeadingLine>, options: &NumberingOptions) -> Self {
    let skip = options.order.saturating_sub(1).min(headings.len());
    if skip > 0 {
      debug!("Leaving the first {skip} heading(s) unnumbered");
      headings.drain(..skip);
    }

    let depths: Vec<usize> = headings.iter().map(|h| h.depth).collect();
    let numbering = number_depths(&depths, options.mode);

    for (heading, number) in headings.iter_mut().zip(numbering.numbers) {
      heading.section_numbering = number;
    }

    Self {
      headings,
      skips: numbering.skips,
    }
  }

  /// Numbered headings, in page order.
  #[must_use]
  pub fn headings(&self) -> &[HeadingLine] {
    &self.headings
  }

  /// Level skips found by strict numbering.
  #[must_use]
  pub fn skips(&self) -> &[SkippedLevel] {
    &self.skips
  }

  /// Whether the outline has no headings.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.headings.is_empty()
  }

  /// Number of level 1 headings.
  #[must_use]
  pub fn level1_count(&self) -> usize {
    self.headings.iter().filter(|h| h.depth == 1).count()
  }

  /// Highest level 1 counter reached on the page.
  #[must_use]
  pub fn max_chapter(&self) -> u32 {
    self
      .headings
      .iter()
      .map(|h| h.section_numbering.chapter())
      .max()
      .unwrap_or(0)
  }

  /// Shift every heading so the page starts at `chapter`.
  pub fn set_chapter(&mut self, chapter: u32) {
    for heading in &mut self.headings {
      heading.section_numbering.set_chapter(chapter);
    }
  }

  /// Check that the page opens with a level 1 heading and, in strict mode,
  /// that no level was skipped.
  ///
  /// Returns `Ok(true)` when the page is valid. Violations are logged as
  /// warnings and yield `Ok(false)`, unless `options.strict` is set, in
  /// which case the first violation is returned as an error.
  ///
  /// # Errors
  ///
  /// Returns [`NumberingError::FirstHeadingNotTopLevel`] or
  /// [`NumberingError::SkippedLevel`] under strict validation.
  pub fn validate(
    &self,
    page: &str,
    options: &NumberingOptions,
  ) -> NumberingResult<bool> {
    let mut valid = true;

    if let Some(first) = self.headings.first()
      && first.depth != 1
    {
      let err = NumberingError::FirstHeadingNotTopLevel {
        depth:   first.depth,
        heading: first.raw_content.clone(),
      };
      if options.strict {
        return Err(err.in_page(page));
      }
      warn!("{page}: {err}");
      valid = false;
    }

    for skip in &self.skips {
      // The page-level check above already covers a page opening too deep
      if skip.from == 0 {
        continue;
      }
      let heading = self
        .headings
        .get(skip.position)
        .map(|h| h.raw_content.clone())
        .unwrap_or_default();
      let err = NumberingError::SkippedLevel {
        from: skip.from,
        to: skip.to,
        heading,
      };
      if options.strict {
        return Err(err.in_page(page));
      }
      warn!("{page}: {err}");
      valid = false;
    }

    Ok(valid)
  }
}
