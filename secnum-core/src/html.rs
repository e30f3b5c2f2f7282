//! HTML pages: numbering of `h1`–`h6` elements and table of contents links.
//!
//! The page is parsed into a DOM with kuchikikiki. Headings are the heading
//! elements in document order, their depth taken from the tag name.
use std::io;

use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use log::trace;
use markup5ever::{QualName, local_name, ns};
use tendril::TendrilSink;

use crate::{
  error::{NumberingError, NumberingResult},
  outline::Outline,
  types::{HeadingLine, NumberingOptions, SPAN_CLASS},
};

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Depth of a heading tag name (`h1` → 1), if it is one.
fn heading_tag_depth(tag: &str) -> Option<usize> {
  let depth = tag.strip_prefix('h')?.parse::<usize>().ok()?;
  (1..=6).contains(&depth).then_some(depth)
}

fn is_inside_heading(node: &NodeRef) -> bool {
  node.ancestors().any(|ancestor| {
    ancestor
      .as_element()
      .is_some_and(|el| heading_tag_depth(&el.name.local).is_some())
  })
}

/// A parsed HTML page with its numbered headings.
pub struct HtmlPage {
  document: NodeRef,
  nodes:    Vec<NodeRef>,
  outline:  Outline,
}

impl HtmlPage {
  /// Parse a page and number its headings.
  #[must_use]
  pub fn parse(content: &str, options: &NumberingOptions) -> Self {
    let document = kuchikikiki::parse_html().one(content);

    let mut nodes = Vec::new();
    let mut headings = Vec::new();

    if let Ok(elements) = document.select(HEADING_SELECTOR) {
      for element in elements {
        let Some(depth) = heading_tag_depth(&element.name.local) else {
          continue;
        };
        let node = element.as_node().clone();

        let mut heading =
          HeadingLine::new(nodes.len(), depth, node.text_contents().trim());
        heading.anchor = element
          .attributes
          .borrow()
          .get("id")
          .map(str::to_string);

        headings.push(heading);
        nodes.push(node);
      }
    }

    trace!("Found {} heading elements", headings.len());

    Self {
      document,
      nodes,
      outline: Outline::new(headings, options),
    }
  }

  /// Numbered headings of the page.
  #[must_use]
  pub const fn outline(&self) -> &Outline {
    &self.outline
  }

  /// Shift the page so it starts at `chapter`.
  pub fn set_page_chapter(&mut self, chapter: u32) {
    self.outline.set_chapter(chapter);
  }

  /// Insert section numbers at the start of every numbered heading.
  ///
  /// With `add_span_element`, the number is wrapped in
  /// `<span class="section-number">`.
  pub fn enumerate_headings(&self, add_span_element: bool) {
    for heading in self.outline.headings() {
      if heading.section_numbering.is_unassigned() {
        continue;
      }
      let Some(node) = self.nodes.get(heading.index) else {
        continue;
      };

      let number = heading.section_number_string();
      node.prepend(NodeRef::new_text(" "));

      if add_span_element {
        let span = NodeRef::new_element(
          QualName::new(None, ns!(html), local_name!("span")),
          vec![(ExpandedName::new("", "class"), Attribute {
            prefix: None,
            value:  SPAN_CLASS.into(),
          })],
        );
        span.append(NodeRef::new_text(number));
        node.prepend(span);
      } else {
        node.prepend(NodeRef::new_text(number));
      }
    }
  }

  /// Prefix table of contents links with the number of the heading they
  /// point at.
  ///
  /// Only links outside heading elements whose `href` is `#<heading id>` are
  /// touched, and only for headings up to `depth`. A depth of zero does
  /// nothing.
  pub fn enumerate_toc(&self, depth: u8) {
    if depth == 0 {
      return;
    }

    let Ok(selected) = self.document.select("a[href]") else {
      return;
    };
    let links: Vec<(NodeRef, String)> = selected
      .filter(|link| !is_inside_heading(link.as_node()))
      .filter_map(|link| {
        let href = link.attributes.borrow().get("href")?.to_string();
        Some((link.as_node().clone(), href))
      })
      .collect();

    for heading in self.outline.headings() {
      if heading.depth > usize::from(depth) {
        continue;
      }
      let Some(ref anchor) = heading.anchor else {
        continue;
      };
      let target = format!("#{anchor}");

      for (link, href) in &links {
        if *href == target {
          link.prepend(NodeRef::new_text(" "));
          link.prepend(NodeRef::new_text(heading.section_number_string()));
        }
      }
    }
  }

  /// Serialize the page back to HTML.
  ///
  /// # Errors
  ///
  /// Returns [`NumberingError::Serialize`] if the document cannot be written
  /// out as UTF-8 text.
  pub fn to_html(&self) -> NumberingResult<String> {
    let mut out = Vec::new();
    self
      .document
      .serialize(&mut out)
      .map_err(NumberingError::Serialize)?;
    String::from_utf8(out).map_err(|e| {
      NumberingError::Serialize(io::Error::new(io::ErrorKind::InvalidData, e))
    })
  }
}

/// Number the headings of an HTML page and its table of contents links.
///
/// # Errors
///
/// Returns an error when validation fails under `options.strict`, or when
/// the numbered page cannot be serialized.
pub fn number_html(
  page: &str,
  content: &str,
  chapter: Option<u32>,
  options: &NumberingOptions,
) -> NumberingResult<String> {
  let mut html = HtmlPage::parse(content, options);
  html.outline().validate(page, options)?;

  if let Some(chapter) = chapter {
    html.set_page_chapter(chapter);
  }

  html.enumerate_headings(options.add_span_wrapper);
  html.enumerate_toc(options.toc_depth);
  html.to_html().map_err(|e| e.in_page(page))
}
