#![allow(
  clippy::unwrap_used,
  clippy::field_reassign_with_default,
  reason = "Fine in tests"
)]
use std::{fs, path::Path};

use secnum::{
  build::{BuildSummary, build, chapter_map},
  site::FsSite,
};
use secnum_config::Config;

fn write(root: &Path, rel: &str, content: &str) {
  let path = root.join(rel);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
  fs::read_to_string(root.join(rel)).unwrap()
}

/// A small site with Markdown and HTML pages and a drafts directory.
fn sample_site(root: &Path) {
  write(
    root,
    "index.md",
    "---\ntitle: Home\n---\n# Welcome\n## Scope\n# Overview\n",
  );
  write(
    root,
    "guide/install.md",
    "# Install\n```\n# shell comment\n```\n## Linux\n",
  );
  write(
    root,
    "guide/notes.html",
    "<html><body><h2 id=\"n\">Notes</h2></body></html>",
  );
  write(root, "drafts/wip.md", "# WIP\n");
}

fn config(overrides: &[&str]) -> Config {
  let mut config = Config::default();
  config.add_span_wrapper = false;
  config
    .apply_overrides(
      &overrides
        .iter()
        .map(|o| (*o).to_string())
        .collect::<Vec<_>>(),
    )
    .unwrap();
  config.validate().unwrap();
  config
}

#[test]
fn test_build_numbers_discovered_pages() {
  let input = tempfile::tempdir().unwrap();
  let output = tempfile::tempdir().unwrap();
  sample_site(input.path());

  let summary =
    build(&config(&["excludes=drafts/"]), input.path(), output.path()).unwrap();
  assert_eq!(summary, BuildSummary {
    numbered: 3,
    copied:   1,
  });

  let out = output.path();
  assert_eq!(
    read(out, "guide/install.md"),
    "# 1. Install\n```\n# shell comment\n```\n## 1.1 Linux\n"
  );
  assert!(read(out, "guide/notes.html").contains(r#"<h2 id="n">2.1 Notes</h2>"#));
  assert_eq!(
    read(out, "index.md"),
    "---\ntitle: Home\n---\n# 3. Welcome\n## 3.1 Scope\n# 4. Overview\n"
  );
  assert_eq!(read(out, "drafts/wip.md"), "# WIP\n");
}

#[test]
fn test_build_follows_nav_order() {
  let input = tempfile::tempdir().unwrap();
  let output = tempfile::tempdir().unwrap();
  sample_site(input.path());

  let mut config = config(&["chapter_counting=heading"]);
  config.nav = serde_json::from_str(
    r#"["index.md", {"Guide": ["guide/install.md", "guide/notes.html"]}]"#,
  )
  .unwrap();

  build(&config, input.path(), output.path()).unwrap();

  let out = output.path();
  assert!(read(out, "index.md").contains("# 2. Overview"));
  assert!(read(out, "guide/install.md").starts_with("# 3. Install"));
  // No level 1 heading: continues chapter 3
  assert!(read(out, "guide/notes.html").contains("3.1 Notes"));
  // Not part of the nav
  assert!(!out.join("drafts/wip.md").exists());
}

#[test]
fn test_chapter_map_with_restart() {
  let input = tempfile::tempdir().unwrap();
  sample_site(input.path());

  let config = config(&["excludes=drafts/", "restart_after=index.md"]);
  let site = FsSite::open(input.path(), &config);
  let map = chapter_map(&config, &site).unwrap();

  assert_eq!(
    serde_json::to_string(&map).unwrap(),
    r#"{"guide/install.md":1,"guide/notes.html":2,"index.md":1}"#
  );
}

#[test]
fn test_strict_validation_fails_the_build() {
  let input = tempfile::tempdir().unwrap();
  let output = tempfile::tempdir().unwrap();
  sample_site(input.path());

  let err = build(
    &config(&["excludes=drafts/", "strict=true"]),
    input.path(),
    output.path(),
  )
  .unwrap_err();
  assert!(format!("{err:#}").contains("guide/notes.html"));
  // Valid pages are not written either
  assert!(fs::read_dir(output.path()).unwrap().next().is_none());
}

#[test]
fn test_strict_failure_late_in_site_writes_nothing() {
  let input = tempfile::tempdir().unwrap();
  let output = tempfile::tempdir().unwrap();
  for i in 0..40 {
    write(input.path(), &format!("page{i:02}.md"), "# Page
## Part
");
  }
  write(input.path(), "zz-late.md", "## late
");

  let result = build(&config(&["strict=true"]), input.path(), output.path());
  assert!(result.is_err());
  assert!(fs::read_dir(output.path()).unwrap().next().is_none());
}

#[test]
fn test_nav_page_outside_input_dir_is_rejected() {
  let root = tempfile::tempdir().unwrap();
  let input = root.path().join("docs");
  let output = root.path().join("site");
  write(&input, "index.md", "# Home
");
  write(root.path(), "outside.md", "# Outside
");

  let config: Config =
    serde_json::from_str(r#"{"nav": ["index.md", "../outside.md"]}"#).unwrap();
  let err = build(&config, &input, &output).unwrap_err();

  assert!(err.to_string().contains("'../outside.md'"));
  assert!(!output.exists());
}

#[test]
fn test_unknown_exact_exclude_is_a_config_error() {
  let input = tempfile::tempdir().unwrap();
  let output = tempfile::tempdir().unwrap();
  sample_site(input.path());

  let err = build(
    &config(&["excludes=missing.md"]),
    input.path(),
    output.path(),
  )
  .unwrap_err();
  assert!(err.to_string().contains("missing.md"));
  // Nothing is written when the config is invalid
  assert!(fs::read_dir(output.path()).unwrap().next().is_none());
}
