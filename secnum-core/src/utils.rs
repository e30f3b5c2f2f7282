use regex::Regex;

/// Normalise a page path for matching and map keys.
///
/// Backslashes become `/` and a leading `./` is removed.
#[must_use]
pub fn normalize_page_path(path: &str) -> String {
  let fixed = path.replace('\\', "/");
  fixed.strip_prefix("./").unwrap_or(&fixed).to_string()
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
///
/// # Panics
///
/// Panics if the fallback regex pattern `r"^\b$"` fails to compile, which
/// should never happen.
#[must_use]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(
      clippy::expect_used,
      reason = "This pattern is guaranteed to be valid"
    )]
    Regex::new(r"^\b$").expect("regex pattern ^\\b$ should always compile")
  })
}
