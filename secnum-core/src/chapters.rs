//! Chapter sequencing across the pages of a site.
//!
//! Every page gets a starting chapter, the level 1 counter its numbering is
//! shifted to. The sequencer needs the level 1 heading count of every page
//! up front, so it runs as a pre-pass over the whole site and produces a
//! [`ChapterMap`] that page rendering then only reads from.
use std::{collections::HashMap, io};

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use crate::{
  error::{NumberingError, NumberingResult},
  page::level1_count,
  types::{ChapterCounting, NumberingOptions},
  utils::normalize_page_path,
};

/// Ordered pages of a site, in display order.
///
/// The same page may appear more than once; only its first occurrence
/// counts.
pub trait SiteNavigation {
  fn site_pages(&self) -> Vec<String>;
}

impl<T: AsRef<str>> SiteNavigation for [T] {
  fn site_pages(&self) -> Vec<String> {
    self.iter().map(|p| p.as_ref().to_string()).collect()
  }
}

impl<T: AsRef<str>, const N: usize> SiteNavigation for [T; N] {
  fn site_pages(&self) -> Vec<String> {
    self.as_slice().site_pages()
  }
}

impl<T: AsRef<str>> SiteNavigation for Vec<T> {
  fn site_pages(&self) -> Vec<String> {
    self.as_slice().site_pages()
  }
}

/// Provides the lines of a page, front matter already stripped.
pub trait PageSource {
  /// # Errors
  ///
  /// Returns an error if the page cannot be read.
  fn page_lines(&self, page: &str) -> io::Result<Vec<String>>;
}

impl PageSource for HashMap<String, Vec<String>> {
  fn page_lines(&self, page: &str) -> io::Result<Vec<String>> {
    self.get(page).cloned().ok_or_else(|| {
      io::Error::new(io::ErrorKind::NotFound, format!("no such page: {page}"))
    })
  }
}

/// Per-page exclude, include and restart predicates.
pub trait PageRules {
  fn is_excluded(&self, page: &str) -> bool;
  fn is_included(&self, page: &str) -> bool;
  fn restarts_numbering(&self, page: &str) -> bool;

  /// Whether a page is left out of numbering. Includes override excludes.
  fn is_skipped(&self, page: &str) -> bool {
    self.is_excluded(page) && !self.is_included(page)
  }
}

/// Rules that exclude nothing and never restart.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRules;

impl PageRules for NoRules {
  fn is_excluded(&self, _page: &str) -> bool {
    false
  }

  fn is_included(&self, _page: &str) -> bool {
    false
  }

  fn restarts_numbering(&self, _page: &str) -> bool {
    false
  }
}

/// Running chapter total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterCounter {
  counting: ChapterCounting,
  total:    u32,
}

impl ChapterCounter {
  #[must_use]
  pub const fn new(counting: ChapterCounting) -> Self {
    Self { counting, total: 0 }
  }

  /// Start counting from zero again.
  pub const fn reset(&mut self) {
    self.total = 0;
  }

  /// Assign the starting chapter of the next page, given its level 1
  /// heading count, and advance the total.
  pub fn next(&mut self, count: usize) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);

    match self.counting {
      ChapterCounting::Page => {
        let chapter = self.total + 1;
        self.total = self.total.saturating_add(count.max(1));
        chapter
      },
      ChapterCounting::Heading => {
        let at_start = self.total == 0;
        let chapter = if count > 0 || at_start {
          self.total + 1
        } else {
          // No chapter of its own, continue the last one
          self.total
        };
        let consumed = if at_start { count.max(1) } else { count };
        self.total = self.total.saturating_add(consumed);
        chapter
      },
    }
  }
}

/// Starting chapters for a sequence of level 1 heading counts, where a page
/// without level 1 headings continues the previous chapter.
///
/// ```
/// use secnum_core::chapters::chapter_numbers;
///
/// assert_eq!(chapter_numbers(&[1, 1, 1]), vec![1, 2, 3]);
/// assert_eq!(chapter_numbers(&[0, 0, 0]), vec![1, 1, 1]);
/// assert_eq!(chapter_numbers(&[0, 1, 2]), vec![1, 2, 3]);
/// ```
#[must_use]
pub fn chapter_numbers(counts: &[usize]) -> Vec<u32> {
  let mut counter = ChapterCounter::new(ChapterCounting::Heading);
  counts.iter().map(|&c| counter.next(c)).collect()
}

/// Starting chapters for a sequence of level 1 heading counts, where every
/// page is at least one chapter.
///
/// ```
/// use secnum_core::chapters::page_chapter_numbers;
///
/// assert_eq!(page_chapter_numbers(&[2, 1]), vec![1, 3]);
/// assert_eq!(page_chapter_numbers(&[0, 0, 3, 1]), vec![1, 2, 3, 6]);
/// ```
#[must_use]
pub fn page_chapter_numbers(counts: &[usize]) -> Vec<u32> {
  let mut counter = ChapterCounter::new(ChapterCounting::Page);
  counts.iter().map(|&c| counter.next(c)).collect()
}

/// Starting chapter of every numbered page, in site order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChapterMap(IndexMap<String, u32>);

impl ChapterMap {
  /// Starting chapter of `page`, if it is numbered.
  #[must_use]
  pub fn get(&self, page: &str) -> Option<u32> {
    self.0.get(&normalize_page_path(page)).copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
    self.0.iter().map(|(page, chapter)| (page.as_str(), *chapter))
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Compute the starting chapter of every page of a site.
///
/// Skipped pages are left out of the map and of the running total. A page
/// appearing again reuses the chapter of its first occurrence.
///
/// # Errors
///
/// Returns [`NumberingError::Source`] if a page cannot be read.
pub fn compute_chapter_map<N, S, R>(
  site: &N,
  source: &S,
  rules: &R,
  options: &NumberingOptions,
) -> NumberingResult<ChapterMap>
where
  N: SiteNavigation + ?Sized,
  S: PageSource + ?Sized,
  R: PageRules + ?Sized,
{
  let mut map = IndexMap::new();
  let mut counter = ChapterCounter::new(options.chapter_counting);

  for page in site.site_pages() {
    let key = normalize_page_path(&page);

    if rules.is_skipped(&key) {
      debug!("Skipping excluded page {key}");
      continue;
    }
    if map.contains_key(&key) {
      trace!("Page {key} repeated in navigation, keeping its chapter");
      continue;
    }

    if !options.increment_across_pages {
      counter.reset();
    }
    if rules.restarts_numbering(&key) {
      debug!("Restarting chapter numbering at {key}");
      counter.reset();
    }

    let lines = source.page_lines(&page).map_err(|source| {
      NumberingError::Source {
        page: key.clone(),
        source,
      }
    })?;
    let count = level1_count(&key, &lines, options);
    let chapter = counter.next(count);

    trace!("Page {key}: {count} level 1 heading(s), chapter {chapter}");
    map.insert(key, chapter);
  }

  Ok(ChapterMap(map))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  struct Rules {
    excludes: Vec<&'static str>,
    includes: Vec<&'static str>,
    restarts: Vec<&'static str>,
  }

  impl PageRules for Rules {
    fn is_excluded(&self, page: &str) -> bool {
      self.excludes.contains(&page)
    }

    fn is_included(&self, page: &str) -> bool {
      self.includes.contains(&page)
    }

    fn restarts_numbering(&self, page: &str) -> bool {
      self.restarts.contains(&page)
    }
  }

  fn source(pages: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    pages
      .iter()
      .map(|(name, lines)| {
        (
          (*name).to_string(),
          lines.iter().map(|l| (*l).to_string()).collect(),
        )
      })
      .collect()
  }

  fn site() -> HashMap<String, Vec<String>> {
    source(&[
      ("p1.md", &["# A", "## a", "# B"]),
      ("p2.md", &["# C"]),
      ("p3.md", &["text only"]),
      ("p4.md", &["# D", "# E"]),
    ])
  }

  fn chapters(map: &ChapterMap) -> Vec<(&str, u32)> {
    map.iter().collect()
  }

  #[test]
  fn test_chapter_counter_page_mode() {
    let mut counter = ChapterCounter::new(ChapterCounting::Page);
    assert_eq!(counter.next(0), 1);
    assert_eq!(counter.next(2), 2);
    assert_eq!(counter.next(1), 4);
    counter.reset();
    assert_eq!(counter.next(5), 1);
  }

  #[test]
  fn test_chapter_numbers() {
    assert_eq!(chapter_numbers(&[1, 1, 1]), vec![1, 2, 3]);
    assert_eq!(chapter_numbers(&[0, 0, 0]), vec![1, 1, 1]);
    assert_eq!(chapter_numbers(&[0, 1, 2]), vec![1, 2, 3]);
    assert_eq!(chapter_numbers(&[2, 0, 1]), vec![1, 2, 3]);
    assert!(chapter_numbers(&[]).is_empty());
  }

  #[test]
  fn test_page_chapter_numbers_closed_form() {
    let counts = [3, 0, 1, 0, 2];
    let expected: Vec<u32> = (0..counts.len())
      .map(|i| {
        1 + counts[..i]
          .iter()
          .map(|&c| u32::try_from(c.max(1)).unwrap())
          .sum::<u32>()
      })
      .collect();
    assert_eq!(page_chapter_numbers(&counts), expected);
  }

  #[test]
  fn test_two_pages() {
    let source =
      source(&[("page1.md", &["# A", "# B"]), ("page2.md", &["# C"])]);
    let map = compute_chapter_map(
      &["page1.md", "page2.md"],
      &source,
      &NoRules,
      &NumberingOptions::default(),
    )
    .unwrap();
    assert_eq!(chapters(&map), vec![("page1.md", 1), ("page2.md", 3)]);
  }

  #[test]
  fn test_site_in_page_mode() {
    let map = compute_chapter_map(
      &["p1.md", "p2.md", "p3.md", "p4.md"],
      &site(),
      &NoRules,
      &NumberingOptions::default(),
    )
    .unwrap();
    assert_eq!(chapters(&map), vec![
      ("p1.md", 1),
      ("p2.md", 3),
      ("p3.md", 4),
      ("p4.md", 5)
    ]);
  }

  #[test]
  fn test_site_in_heading_mode() {
    let options = NumberingOptions {
      chapter_counting: ChapterCounting::Heading,
      ..Default::default()
    };
    let map = compute_chapter_map(
      &["p1.md", "p2.md", "p3.md", "p4.md"],
      &site(),
      &NoRules,
      &options,
    )
    .unwrap();
    // p3 has no level 1 heading and stays in chapter 3
    assert_eq!(map.get("p3.md"), Some(3));
    assert_eq!(map.get("p4.md"), Some(4));
  }

  #[test]
  fn test_excluded_page_does_not_count() {
    let rules = Rules {
      excludes: vec!["p1.md", "p2.md"],
      includes: vec!["p2.md"],
      restarts: vec![],
    };
    let map = compute_chapter_map(
      &["p1.md", "p2.md", "p4.md"],
      &site(),
      &rules,
      &NumberingOptions::default(),
    )
    .unwrap();
    assert_eq!(map.get("p1.md"), None);
    assert_eq!(chapters(&map), vec![("p2.md", 1), ("p4.md", 2)]);
  }

  #[test]
  fn test_repeated_page_keeps_first_chapter() {
    let map = compute_chapter_map(
      &["p1.md", "p2.md", "./p1.md", "p4.md"],
      &site(),
      &NoRules,
      &NumberingOptions::default(),
    )
    .unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get("p1.md"), Some(1));
    assert_eq!(map.get("p4.md"), Some(4));
  }

  #[test]
  fn test_restart_after() {
    let rules = Rules {
      excludes: vec![],
      includes: vec![],
      restarts: vec!["p4.md"],
    };
    let map = compute_chapter_map(
      &["p1.md", "p2.md", "p4.md"],
      &site(),
      &rules,
      &NumberingOptions::default(),
    )
    .unwrap();
    assert_eq!(chapters(&map), vec![
      ("p1.md", 1),
      ("p2.md", 3),
      ("p4.md", 1)
    ]);
  }

  #[test]
  fn test_no_increment_across_pages() {
    let options = NumberingOptions {
      increment_across_pages: false,
      ..Default::default()
    };
    let map = compute_chapter_map(
      &["p1.md", "p2.md", "p4.md"],
      &site(),
      &NoRules,
      &options,
    )
    .unwrap();
    assert!(map.iter().all(|(_, chapter)| chapter == 1));
  }

  #[test]
  fn test_missing_page_is_an_error() {
    let err = compute_chapter_map(
      &["nope.md"],
      &site(),
      &NoRules,
      &NumberingOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
      err,
      NumberingError::Source { ref page, .. } if page == "nope.md"
    ));
  }

  #[test]
  fn test_chapter_map_serializes_in_order() {
    let map = compute_chapter_map(
      &["p2.md", "p1.md"],
      &site(),
      &NoRules,
      &NumberingOptions::default(),
    )
    .unwrap();
    assert_eq!(
      serde_json::to_string(&map).unwrap(),
      r#"{"p2.md":1,"p1.md":2}"#
    );
  }
}
