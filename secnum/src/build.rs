//! Two-phase site build.
//!
//! Phase 1 reads every page once to assign starting chapters. Phase 2
//! renders pages in parallel, each only looking at its own chapter. Nothing
//! is written until every page has rendered, so a failing page leaves the
//! output directory untouched.
use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;
use secnum_config::Config;
use secnum_core::{
  ChapterMap,
  NumberingOptions,
  PageKind,
  compute_chapter_map,
  number_html,
  number_named_page,
};

use crate::site::FsSite;

/// What a build did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
  /// Pages written with numbered headings.
  pub numbered: usize,

  /// Excluded pages copied unchanged.
  pub copied: usize,
}

/// Compute the chapter map of a site, after checking the config's rules
/// against its pages.
///
/// # Errors
///
/// Returns an error if a rule names an unknown page or a page cannot be
/// read.
pub fn chapter_map(config: &Config, site: &FsSite) -> Result<ChapterMap> {
  config.validate_rules_against(&site.unique_pages())?;

  let map =
    compute_chapter_map(site, site, config, &config.numbering_options())?;
  debug!("Assigned chapters to {} pages", map.len());
  Ok(map)
}

/// Render one page with the given starting chapter.
///
/// # Errors
///
/// Returns an error if the page cannot be read or fails strict validation.
pub fn render_page(
  site: &FsSite,
  page: &str,
  chapter: Option<u32>,
  options: &NumberingOptions,
) -> Result<String> {
  match PageKind::from_path(page) {
    PageKind::Markdown => {
      let content = site
        .read_page(page)
        .wrap_err_with(|| format!("Failed to read page {page}"))?;
      let body = number_named_page(page, &content.body, chapter, options)?;

      let mut rendered = content.front_matter;
      rendered.extend(body);
      let mut out = rendered.join("\n");
      if content.trailing_newline {
        out.push('\n');
      }
      Ok(out)
    },
    PageKind::Html => {
      let path = site.page_path(page);
      let content = fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read page {}", path.display()))?;
      Ok(number_html(page, &content, chapter, options)?)
    },
  }
}

/// Number every page of the site below `input_dir` into `output_dir`.
///
/// Pages without a chapter (excluded ones) are copied unchanged.
///
/// # Errors
///
/// Returns an error if phase 1 fails, or if any page cannot be rendered or
/// written. Rendering errors are reported before any file is written.
pub fn build(
  config: &Config,
  input_dir: &Path,
  output_dir: &Path,
) -> Result<BuildSummary> {
  info!("Input directory: {}", input_dir.display());
  let site = FsSite::open(input_dir, config);
  let map = chapter_map(config, &site)?;
  let options = config.numbering_options();

  let pages = site.unique_pages();
  let rendered = pages
    .par_iter()
    .map(|page| -> Result<(String, Option<String>)> {
      let content = map
        .get(page)
        .map(|chapter| render_page(&site, page, Some(chapter), &options))
        .transpose()?;
      Ok((page.clone(), content))
    })
    .collect::<Result<Vec<_>>>()?;

  fs::create_dir_all(output_dir).wrap_err_with(|| {
    format!("Failed to create output directory {}", output_dir.display())
  })?;
  info!("Output directory: {}", output_dir.display());

  rendered.par_iter().try_for_each(|(page, content)| -> Result<()> {
    let output_path = output_dir.join(page);
    if let Some(parent) = output_path.parent() {
      fs::create_dir_all(parent)?;
    }

    if let Some(content) = content {
      fs::write(&output_path, content).wrap_err_with(|| {
        format!("Failed to write {}", output_path.display())
      })?;
    } else {
      debug!("Copying excluded page {page}");
      fs::copy(site.page_path(page), &output_path).wrap_err_with(|| {
        format!("Failed to copy {page} to {}", output_path.display())
      })?;
    }
    Ok(())
  })?;

  let numbered = rendered
    .iter()
    .filter(|(_, content)| content.is_some())
    .count();

  let summary = BuildSummary {
    numbered,
    copied: pages.len() - numbered,
  };
  info!(
    "Numbered {} pages, copied {} excluded pages",
    summary.numbered, summary.copied
  );
  Ok(summary)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_render_page_keeps_front_matter() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
      dir.path().join("a.md"),
      "---\ntitle: A\n---\n# A\n## B\n",
    )
    .unwrap();

    let site = FsSite::discover(dir.path());
    let options = NumberingOptions {
      add_span_wrapper: false,
      ..Default::default()
    };
    let out = render_page(&site, "a.md", Some(2), &options).unwrap();
    assert_eq!(out, "---\ntitle: A\n---\n# 2. A\n## 2.1 B\n");
  }

  #[test]
  fn test_chapter_map_rejects_unknown_exact_rule() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "# A").unwrap();

    let mut config = Config::default();
    config.apply_override("restart_after", "b.md").unwrap();
    config.validate().unwrap();

    let site = FsSite::open(dir.path(), &config);
    let err = chapter_map(&config, &site).unwrap_err();
    assert!(err.to_string().contains("unknown page 'b.md'"));
  }
}
