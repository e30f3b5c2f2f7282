//! # secnum-core - Hierarchical section numbering for documentation sites
//!
//! Numbers the headings of Markdown and HTML pages (`1.`, `1.1`, `2.0.1`)
//! and continues chapter numbering from one page of a site to the next.
//!
//! ## Quick Start
//!
//! ```rust
//! use secnum_core::{NumberingOptions, number_page};
//!
//! let options = NumberingOptions {
//!   add_span_wrapper: false,
//!   ..Default::default()
//! };
//! let lines = ["# Intro", "## Scope", "## Terms"];
//!
//! let numbered = number_page(&lines, None, &options).unwrap();
//! assert_eq!(numbered, ["# 1. Intro", "## 1.1 Scope", "## 1.2 Terms"]);
//! ```
//!
//! ## Numbering a site
//!
//! Chapters are assigned in a pre-pass over every page, then each page is
//! rendered with its own starting chapter:
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use secnum_core::{NoRules, NumberingOptions, compute_chapter_map};
//!
//! let mut pages = HashMap::new();
//! pages.insert("a.md".to_string(), vec!["# A".to_string(), "# B".to_string()]);
//! pages.insert("b.md".to_string(), vec!["# C".to_string()]);
//!
//! let map = compute_chapter_map(
//!   &["a.md", "b.md"],
//!   &pages,
//!   &NoRules,
//!   &NumberingOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(map.get("b.md"), Some(3));
//! ```
//!
//! ## Features
//!
//! - **Lenient and strict numbering** with identical output, strict mode
//!   reporting skipped levels
//! - **Chapter continuation** across pages, with restarts, exclusions and
//!   repeated navigation entries
//! - **Markdown and HTML pages**, including table of contents links

pub mod chapters;
pub mod classify;
pub mod error;
pub mod html;
pub mod nav;
pub mod numbering;
pub mod outline;
pub mod page;
pub mod types;
pub mod utils;

pub use crate::{
  chapters::{
    ChapterCounter,
    ChapterMap,
    NoRules,
    PageRules,
    PageSource,
    SiteNavigation,
    chapter_numbers,
    compute_chapter_map,
    page_chapter_numbers,
  },
  error::{NumberingError, NumberingResult},
  html::{HtmlPage, number_html},
  nav::NavItem,
  numbering::{SkippedLevel, heading_number, section_numbers},
  outline::Outline,
  page::{MarkdownPage, PageKind, number_named_page, number_page},
  types::{
    ChapterCounting,
    HeadingLine,
    NumberingMode,
    NumberingOptions,
    NumberingOptionsBuilder,
    SectionNumber,
  },
};
