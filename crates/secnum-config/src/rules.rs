//! Path rules for `excludes`, `includes` and `restart_after`.
use glob::Pattern;
use regex::Regex;
use secnum_core::utils::normalize_page_path;
use serde::{
  Deserialize,
  Deserializer,
  Serialize,
  de::{self, MapAccess, Visitor},
};

use crate::error::ConfigError;

/// Matches pages by path.
///
/// Written either as a shorthand string or as a table with `exact`, `glob`
/// and/or `regex` keys. In the shorthand, a string containing `*`, `?` or `[`
/// is a glob, anything else an exact path. An exact path ending in `/`
/// matches every page below that directory.
///
/// When several keys are given, all of them must match.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PathRule {
  /// Exact page path, or a directory when it ends in `/`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub exact: Option<String>,

  /// Glob pattern. `*` also matches across `/`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub glob: Option<String>,

  /// Regex pattern for path matching.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub regex: Option<String>,

  /// Compiled glob (populated by [`PathRule::compile`]).
  #[serde(skip)]
  pub compiled_glob: Option<Pattern>,

  /// Compiled regex (populated by [`PathRule::compile`]).
  #[serde(skip)]
  pub compiled_regex: Option<Regex>,
}

impl PartialEq for PathRule {
  fn eq(&self, other: &Self) -> bool {
    self.exact == other.exact
      && self.glob == other.glob
      && self.regex == other.regex
  }
}

impl Eq for PathRule {}

impl PathRule {
  /// Parse the shorthand form of a rule.
  #[must_use]
  pub fn shorthand(value: &str) -> Self {
    if value.contains(['*', '?', '[']) {
      Self {
        glob: Some(value.to_string()),
        ..Default::default()
      }
    } else {
      Self {
        exact: Some(normalize_page_path(value)),
        ..Default::default()
      }
    }
  }

  /// Exact page path of the rule, unless it names a directory or carries
  /// other conditions.
  #[must_use]
  pub fn exact_page(&self) -> Option<&str> {
    if self.glob.is_some() || self.regex.is_some() {
      return None;
    }
    self.exact.as_deref().filter(|exact| !exact.ends_with('/'))
  }

  /// Validate and compile the glob and regex patterns of the rule.
  ///
  /// # Errors
  ///
  /// Returns an error if the rule is empty or a pattern is invalid.
  pub fn compile(&mut self) -> Result<(), ConfigError> {
    if self.exact.is_none() && self.glob.is_none() && self.regex.is_none() {
      return Err(ConfigError::Pattern(
        "A rule needs at least one of 'exact', 'glob' or 'regex'".to_string(),
      ));
    }

    if let Some(ref pattern) = self.glob {
      self.compiled_glob = Some(Pattern::new(pattern).map_err(|e| {
        ConfigError::Pattern(format!("Invalid glob '{pattern}': {e}"))
      })?);
    }

    if let Some(ref pattern) = self.regex {
      self.compiled_regex = Some(Regex::new(pattern).map_err(|e| {
        ConfigError::Pattern(format!("Invalid regex '{pattern}': {e}"))
      })?);
    }

    Ok(())
  }

  /// Check if this rule matches the given page path.
  ///
  /// Patterns that were not compiled never match.
  #[must_use]
  pub fn matches(&self, page: &str) -> bool {
    let page = normalize_page_path(page);

    if let Some(ref exact) = self.exact {
      let exact = normalize_page_path(exact);
      let hit = if exact.ends_with('/') {
        page.starts_with(&exact)
      } else {
        page == exact
      };
      if !hit {
        return false;
      }
    }

    if self.glob.is_some()
      && !self
        .compiled_glob
        .as_ref()
        .is_some_and(|pattern| pattern.matches(&page))
    {
      return false;
    }

    if self.regex.is_some()
      && !self
        .compiled_regex
        .as_ref()
        .is_some_and(|re| re.is_match(&page))
    {
      return false;
    }

    true
  }
}

/// Whether any rule of the list matches the page.
#[must_use]
pub fn any_match(rules: &[PathRule], page: &str) -> bool {
  rules.iter().any(|rule| rule.matches(page))
}

struct PathRuleVisitor;

impl<'de> Visitor<'de> for PathRuleVisitor {
  type Value = PathRule;

  fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
    formatter
      .write_str("a path string or a map with 'exact', 'glob' and/or 'regex'")
  }

  fn visit_str<E>(self, value: &str) -> Result<PathRule, E>
  where
    E: de::Error,
  {
    Ok(PathRule::shorthand(value))
  }

  fn visit_map<M>(self, mut map: M) -> Result<PathRule, M::Error>
  where
    M: MapAccess<'de>,
  {
    let mut rule = PathRule::default();

    while let Some(key) = map.next_key::<String>()? {
      let slot = match key.as_str() {
        "exact" => &mut rule.exact,
        "glob" => &mut rule.glob,
        "regex" => &mut rule.regex,
        _ => {
          return Err(de::Error::unknown_field(&key, &[
            "exact", "glob", "regex",
          ]));
        },
      };
      if slot.is_some() {
        return Err(de::Error::custom(format!("duplicate field `{key}`")));
      }
      *slot = Some(map.next_value()?);
    }

    rule.exact = rule.exact.map(|exact| normalize_page_path(&exact));
    Ok(rule)
  }
}

impl<'de> Deserialize<'de> for PathRule {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    deserializer.deserialize_any(PathRuleVisitor)
  }
}
