//! Site navigation trees.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::utils::normalize_page_path;

/// One entry of a navigation tree.
///
/// Entries are either a page path, a list of entries, or a titled entry
/// written as a single-key table (`{ "Guide" = [...] }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[allow(clippy::use_self, reason = "Spelled out for the serde derive")]
pub enum NavItem {
  Page(String),
  Section(Vec<NavItem>),
  Titled(IndexMap<String, NavItem>),
}

impl NavItem {
  fn collect_pages(&self, pages: &mut Vec<String>) {
    match self {
      Self::Page(path) => pages.push(normalize_page_path(path)),
      Self::Section(items) => {
        for item in items {
          item.collect_pages(pages);
        }
      },
      Self::Titled(entries) => {
        for item in entries.values() {
          item.collect_pages(pages);
        }
      },
    }
  }
}

/// Flatten a navigation tree depth-first into its page paths.
///
/// Pages referenced more than once are kept at every position.
#[must_use]
pub fn flatten(items: &[NavItem]) -> Vec<String> {
  let mut pages = Vec::new();
  for item in items {
    item.collect_pages(&mut pages);
  }
  pages
}

/// Remove repeated pages, keeping the first occurrence.
#[must_use]
pub fn dedup_pages(pages: &[String]) -> Vec<String> {
  let mut seen = std::collections::HashSet::new();
  pages
    .iter()
    .filter(|page| seen.insert(page.as_str()))
    .cloned()
    .collect()
}
