use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// Indicates that the requested configuration format is not supported.
  /// Contains the name of the unsupported format.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML, with every option commented.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# secnum configuration file

# Directory containing the pages to number (Markdown or HTML)
input_dir = "docs"

# Directory the numbered pages are written to
output_dir = "site"

# Page order. Without it, pages are numbered in path order.
# Entries are a page path, a list of entries, or a titled entry.
# nav = [
#   "index.md",
#   { Guide = ["guide/install.md", "guide/usage.md"] },
# ]

# Require every heading level to be entered one step at a time.
# Numbers are the same either way, strict mode reports skipped levels.
strict_mode = false

# Abort on validation problems instead of warning about them
strict = false

# Continue chapter numbers from one page to the next
increment_across_pages = true

# How many chapters a page consumes:
#   "page"    - one per level 1 heading, at least one per page
#   "heading" - one per level 1 heading, pages without one continue
#               the previous chapter
chapter_counting = "page"

# Pages that start again at chapter 1
restart_after = []

# Pages left untouched. A rule is a path, a directory ending in "/",
# a glob such as "drafts/*.md", or a table like { regex = "^api/" }.
excludes = []

# Pages numbered even though an exclude rule matches them
includes = []

# Number table of contents links for headings up to this level (0 disables)
toc_depth = 0

# Wrap numbers in <span class="section-number">
add_span_wrapper = true

# Start numbering at the N-th heading of each page
order = 1
"#;

/// Default configuration template in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "input_dir": "docs",
  "output_dir": "site",
  "nav": [],
  "strict_mode": false,
  "strict": false,
  "increment_across_pages": true,
  "chapter_counting": "page",
  "restart_after": [],
  "excludes": [],
  "includes": [],
  "toc_depth": 0,
  "add_span_wrapper": true,
  "order": 1
}
"#;

/// Get the default configuration template for a format.
///
/// # Errors
///
/// Returns [`TemplateError::UnsupportedFormat`] for anything but `toml` and
/// `json`.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
