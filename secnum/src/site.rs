//! Pages of a site on disk.
use std::{
  fs,
  io,
  path::{Path, PathBuf},
};

use log::{info, trace};
use secnum_config::Config;
use secnum_core::{
  PageKind,
  PageSource,
  SiteNavigation,
  nav::{dedup_pages, flatten},
  page::split_front_matter,
  utils::normalize_page_path,
};
use walkdir::WalkDir;

const PAGE_EXTENSIONS: [&str; 4] = ["md", "markdown", "html", "htm"];

/// Collect every Markdown or HTML file below `input_dir`, sorted by path.
#[must_use]
pub fn collect_page_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files = Vec::with_capacity(100);

  for entry in WalkDir::new(input_dir)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_map(Result::ok)
  {
    let path = entry.path();
    let is_page = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| PAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
    if path.is_file() && is_page {
      files.push(path.to_owned());
    }
  }

  trace!("Found {} pages to process", files.len());
  files
}

/// A page split into its front matter and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
  pub front_matter:     Vec<String>,
  pub body:             Vec<String>,
  pub trailing_newline: bool,
}

/// The pages of a site below one directory, in navigation order.
#[derive(Debug, Clone)]
pub struct FsSite {
  root:  PathBuf,
  pages: Vec<String>,
}

impl FsSite {
  /// Discover every page below `root`, in path order.
  #[must_use]
  pub fn discover(root: &Path) -> Self {
    let pages = collect_page_files(root)
      .iter()
      .filter_map(|path| path.strip_prefix(root).ok())
      .map(|rel| normalize_page_path(&rel.to_string_lossy()))
      .collect();

    Self {
      root: root.to_path_buf(),
      pages,
    }
  }

  /// Use the pages of the config's `nav`, or discover them when it is empty.
  #[must_use]
  pub fn open(root: &Path, config: &Config) -> Self {
    if config.nav.is_empty() {
      let site = Self::discover(root);
      info!("Discovered {} pages in {}", site.pages.len(), root.display());
      site
    } else {
      let pages = flatten(&config.nav);
      info!("Using {} navigation entries", pages.len());
      Self {
        root: root.to_path_buf(),
        pages,
      }
    }
  }

  #[must_use]
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Pages in navigation order, repeats included.
  #[must_use]
  pub fn pages(&self) -> &[String] {
    &self.pages
  }

  /// Pages in navigation order, each once.
  #[must_use]
  pub fn unique_pages(&self) -> Vec<String> {
    dedup_pages(&self.pages)
  }

  /// Location of a page on disk.
  #[must_use]
  pub fn page_path(&self, page: &str) -> PathBuf {
    self.root.join(page)
  }

  /// Read a page, splitting off the front matter of Markdown pages.
  ///
  /// # Errors
  ///
  /// Returns an error if the page cannot be read.
  pub fn read_page(&self, page: &str) -> io::Result<PageContent> {
    let content = fs::read_to_string(self.page_path(page))?;
    let trailing_newline = content.ends_with('\n');

    let (front_matter, body) = match PageKind::from_path(page) {
      PageKind::Markdown => split_front_matter(&content),
      PageKind::Html => {
        (Vec::new(), content.lines().map(str::to_string).collect())
      },
    };

    Ok(PageContent {
      front_matter,
      body,
      trailing_newline,
    })
  }
}

impl SiteNavigation for FsSite {
  fn site_pages(&self) -> Vec<String> {
    self.pages.clone()
  }
}

impl PageSource for FsSite {
  fn page_lines(&self, page: &str) -> io::Result<Vec<String>> {
    self.read_page(page).map(|content| content.body)
  }
}
