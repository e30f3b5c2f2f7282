use std::{
  collections::HashSet,
  fs,
  path::{Component, Path, PathBuf},
  sync::OnceLock,
};

use secnum_core::{
  ChapterCounting,
  NavItem,
  NumberingMode,
  NumberingOptions,
  PageRules,
  nav::flatten,
  utils::normalize_page_path,
};
use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigError,
  rules::{PathRule, any_match},
};

/// Configuration for secnum.
///
/// [`Config`] holds every option controlling how pages are numbered and
/// where they are read from and written to. Fields are typically loaded from
/// a TOML or JSON config file, and can be overridden with `--config
/// KEY=VALUE` on the command line. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct Config {
  /// Input directory containing the pages.
  pub input_dir: Option<PathBuf>,

  /// Output directory for numbered pages.
  pub output_dir: PathBuf,

  /// Navigation tree giving the page order.
  pub nav: Vec<NavItem>,

  /// Use the stack-based numbering that reports skipped levels.
  pub strict_mode: bool,

  /// Treat validation problems as errors.
  pub strict: bool,

  /// Continue chapter numbers from one page to the next.
  pub increment_across_pages: bool,

  /// How many chapters a page consumes.
  pub chapter_counting: ChapterCounting,

  /// Pages restarting at chapter 1.
  pub restart_after: Vec<PathRule>,

  /// Pages left out of numbering.
  pub excludes: Vec<PathRule>,

  /// Pages numbered despite a matching exclude.
  pub includes: Vec<PathRule>,

  /// Depth up to which table of contents links are numbered.
  pub toc_depth: u8,

  /// Wrap numbers in a span element.
  pub add_span_wrapper: bool,

  /// Heading (1-based) numbering starts at.
  pub order: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input_dir:              None,
      output_dir:             PathBuf::from("site"),
      nav:                    Vec::new(),
      strict_mode:            false,
      strict:                 false,
      increment_across_pages: true,
      chapter_counting:       ChapterCounting::Page,
      restart_after:          Vec::new(),
      excludes:               Vec::new(),
      includes:               Vec::new(),
      toc_depth:              0,
      add_span_wrapper:       true,
      order:                  1,
    }
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn parse_value<T: std::str::FromStr>(
  key: &str,
  value: &str,
) -> Result<T, ConfigError> {
  value.parse().map_err(|_| {
    ConfigError::Config(format!("Invalid value for '{key}': '{value}'"))
  })
}

/// Pages whose path leaves the site root, through `..` or an absolute path.
fn pages_outside_root<S: AsRef<str>>(pages: &[S]) -> Vec<String> {
  pages
    .iter()
    .map(AsRef::as_ref)
    .filter(|page| {
      Path::new(page).components().any(|component| {
        !matches!(component, Component::Normal(_) | Component::CurDir)
      })
    })
    .map(str::to_string)
    .collect()
}

fn check_pages_inside_root<S: AsRef<str>>(
  pages: &[S],
) -> Result<(), ConfigError> {
  let outside = pages_outside_root(pages);
  if outside.is_empty() {
    Ok(())
  } else {
    Err(ConfigError::Config(format!(
      "Pages must stay inside the input directory: '{}'",
      outside.join("', '")
    )))
  }
}

/// Comma-separated shorthand rules.
fn parse_rules(value: &str) -> Vec<PathRule> {
  value
    .split(',')
    .map(str::trim)
    .filter(|rule| !rule.is_empty())
    .map(PathRule::shorthand)
    .collect()
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from config files and overrides, then validate it.
  ///
  /// Config files are merged in order. Without any, a config file is looked
  /// for in the usual places, falling back to the defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is invalid, or
  /// validation fails.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let load_file = |path: &PathBuf| {
        Self::from_file(path).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to load config from {}: {}",
            path.display(),
            e
          ))
        })
      };

      let mut merged_config = load_file(first)?;
      for config_path in rest {
        merged_config.merge(load_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load discovered config from {}: {}",
          discovered_config.display(),
          e
        ))
      })?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, names an
  /// unknown key, or has a value of the wrong type.
  ///
  /// # Example
  ///
  /// ```rust
  /// use secnum_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&["toc_depth=3".to_string(), "strict=yes".to_string()])
  ///   .unwrap();
  /// assert_eq!(config.toc_depth, 3);
  /// assert!(config.strict);
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// Rule lists take comma-separated shorthand rules, which are appended.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys and unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "input_dir" => {
        self.input_dir = (!value.is_empty()).then(|| PathBuf::from(value));
      },
      "output_dir" => self.output_dir = PathBuf::from(value),
      "strict_mode" => self.strict_mode = parse_bool(key, value)?,
      "strict" => self.strict = parse_bool(key, value)?,
      "increment_across_pages" => {
        self.increment_across_pages = parse_bool(key, value)?;
      },
      "add_span_wrapper" => self.add_span_wrapper = parse_bool(key, value)?,
      "chapter_counting" => {
        self.chapter_counting = value.parse().map_err(|e: String| {
          ConfigError::Config(format!(
            "Invalid value for '{key}': '{value}' - {e}"
          ))
        })?;
      },
      "toc_depth" => self.toc_depth = parse_value(key, value)?,
      "order" => self.order = parse_value(key, value)?,
      "restart_after" => self.restart_after.extend(parse_rules(value)),
      "excludes" => self.excludes.extend(parse_rules(value)),
      "includes" => self.includes.extend(parse_rules(value)),
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - [`Vec<T>`] fields: Other's vec is appended to this config's vec
  /// - Plain fields (bool, numbers, etc.): Other's value always replaces,
  ///   so a later file that omits `strict` resets it to its default
  pub fn merge(&mut self, other: Self) {
    if other.input_dir.is_some() {
      self.input_dir = other.input_dir;
    }
    self.output_dir = other.output_dir;
    self.nav.extend(other.nav);
    self.strict_mode = other.strict_mode;
    self.strict = other.strict;
    self.increment_across_pages = other.increment_across_pages;
    self.chapter_counting = other.chapter_counting;
    self.restart_after.extend(other.restart_after);
    self.excludes.extend(other.excludes);
    self.includes.extend(other.includes);
    self.toc_depth = other.toc_depth;
    self.add_span_wrapper = other.add_span_wrapper;
    self.order = other.order;
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "secnum.toml",
          "secnum.json",
          ".secnum.toml",
          ".secnum.json",
          ".config/secnum.toml",
          ".config/secnum.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["secnum.toml", "secnum.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Check option ranges and nav paths, and compile every path rule.
  ///
  /// # Errors
  ///
  /// Returns an error for an out-of-range `toc_depth` or `order`, a `nav`
  /// page outside the input directory, or an invalid rule.
  pub fn validate(&mut self) -> Result<(), ConfigError> {
    if self.toc_depth > 6 {
      return Err(ConfigError::Config(format!(
        "'toc_depth' must be between 0 and 6, got {}",
        self.toc_depth
      )));
    }
    if self.order == 0 {
      return Err(ConfigError::Config(
        "'order' starts counting at 1".to_string(),
      ));
    }
    check_pages_inside_root(&flatten(&self.nav))?;

    for (name, rules) in [
      ("restart_after", &mut self.restart_after),
      ("excludes", &mut self.excludes),
      ("includes", &mut self.includes),
    ] {
      for rule in rules.iter_mut() {
        rule.compile().map_err(|e| {
          ConfigError::Config(format!("Invalid rule in '{name}': {e}"))
        })?;
      }
    }

    Ok(())
  }

  /// Check that every page stays inside the input directory and every
  /// exact-path rule names a page of the site.
  ///
  /// # Errors
  ///
  /// Returns an error for a page outside the input directory, or one listing
  /// the rules naming unknown pages.
  pub fn validate_rules_against(
    &self,
    pages: &[String],
  ) -> Result<(), ConfigError> {
    check_pages_inside_root(pages)?;

    let known: HashSet<String> =
      pages.iter().map(|page| normalize_page_path(page)).collect();

    let mut errors = Vec::new();
    for (name, rules) in [
      ("restart_after", &self.restart_after),
      ("excludes", &self.excludes),
      ("includes", &self.includes),
    ] {
      for page in rules.iter().filter_map(PathRule::exact_page) {
        if !known.contains(page) {
          errors.push(format!("'{name}' names unknown page '{page}'"));
        }
      }
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Config(errors.join("; ")))
    }
  }

  /// Numbering options derived from this config.
  #[must_use]
  pub const fn numbering_options(&self) -> NumberingOptions {
    NumberingOptions {
      mode:                   if self.strict_mode {
        NumberingMode::Strict
      } else {
        NumberingMode::Lenient
      },
      strict:                 self.strict,
      order:                  self.order,
      add_span_wrapper:       self.add_span_wrapper,
      toc_depth:              self.toc_depth,
      increment_across_pages: self.increment_across_pages,
      chapter_counting:       self.chapter_counting,
    }
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unknown or the file cannot be written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

impl PageRules for Config {
  fn is_excluded(&self, page: &str) -> bool {
    any_match(&self.excludes, page)
  }

  fn is_included(&self, page: &str) -> bool {
    any_match(&self.includes, page)
  }

  fn restarts_numbering(&self, page: &str) -> bool {
    any_match(&self.restart_after, page)
  }
}
