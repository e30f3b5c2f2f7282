use std::io;

use thiserror::Error;

/// Error type for numbering operations.
#[derive(Debug, Error)]
pub enum NumberingError {
  #[error(
    "The first heading should be level 1, found level {depth} in '{heading}'. \
     Use '# <your title>'"
  )]
  FirstHeadingNotTopLevel { depth: usize, heading: String },

  #[error("Heading '{heading}' skips from level {from} to level {to}")]
  SkippedLevel {
    from:    usize,
    to:      usize,
    heading: String,
  },

  #[error("Failed to read page source '{page}': {source}")]
  Source {
    page:   String,
    #[source]
    source: io::Error,
  },

  #[error("Failed to serialize HTML: {0}")]
  Serialize(#[source] io::Error),

  #[error("{page}: {source}")]
  Page {
    page:   String,
    #[source]
    source: Box<Self>,
  },
}

impl NumberingError {
  /// Attach the page path to a content error.
  #[must_use]
  pub fn in_page(self, page: &str) -> Self {
    match self {
      Self::Source { .. } | Self::Page { .. } => self,
      other => {
        Self::Page {
          page:   page.to_string(),
          source: Box::new(other),
        }
      },
    }
  }
}

/// Result type for numbering operations.
pub type NumberingResult<T> = Result<T, NumberingError>;
