#![allow(clippy::unwrap_used, reason = "Fine in tests")]
use secnum_core::{
  NumberingMode,
  NumberingOptions,
  SectionNumber,
  heading_number,
  number_named_page,
  number_page,
};

fn plain() -> NumberingOptions {
  NumberingOptions {
    add_span_wrapper: false,
    ..Default::default()
  }
}

/// Number a page given as one string.
fn number(md: &str, chapter: Option<u32>, options: &NumberingOptions) -> String {
  let lines: Vec<&str> = md.lines().collect();
  number_page(&lines, chapter, options).unwrap().join("\n")
}

#[test]
fn test_heading_number_examples() {
  assert_eq!(heading_number(&[1, 2, 1, 2, 2], 1), vec![1, 1, 2, 2, 2]);
  assert_eq!(heading_number(&[1, 2, 1, 2, 2], 2), vec![0, 1, 0, 1, 2]);
}

#[test]
fn test_section_number_formatting() {
  assert_eq!(SectionNumber::new([1, 0, 0, 0, 0, 0]).to_string(), "1.");
  assert_eq!(SectionNumber::new([2, 1, 0, 0, 0, 0]).to_string(), "2.1");
  assert_eq!(SectionNumber::new([2, 0, 1, 0, 0, 0]).to_string(), "2.0.1");
}

#[test]
fn test_three_heading_page() {
  assert_eq!(
    number("# A\n## B\n## C", None, &plain()),
    "# 1. A\n## 1.1 B\n## 1.2 C"
  );
}

#[test]
fn test_full_document() {
  let md = "\
# Getting started

Some text.

## Install

```sh
# not a heading
```

### From source

## Configure

# Reference

~~~
## also not a heading
```
still fenced
~~~

## Options";

  let expected = "\
# 3. Getting started

Some text.

## 3.1 Install

```sh
# not a heading
```

### 3.1.1 From source

## 3.2 Configure

# 4. Reference

~~~
## also not a heading
```
still fenced
~~~

## 4.1 Options";

  assert_eq!(number(md, Some(3), &plain()), expected);
}

#[test]
fn test_page_starting_below_level_one() {
  assert_eq!(number("## A\n### B", None, &plain()), "## 0.1 A\n### 0.1.1 B");
  // A chapter fills the missing level 1 counter
  assert_eq!(number("## A\n### B", Some(2), &plain()), "## 2.1 A\n### 2.1.1 B");
}

#[test]
fn test_skipped_levels_are_numbered_with_zeros() {
  assert_eq!(number("# A\n### B", None, &plain()), "# 1. A\n### 1.0.1 B");
}

#[test]
fn test_bare_and_glued_markers_are_text() {
  assert_eq!(
    number("# A\n#\n#tag\n## B", None, &plain()),
    "# 1. A\n#\n#tag\n## 1.1 B"
  );
}

#[test]
fn test_strict_mode_numbers_like_lenient() {
  let strict = NumberingOptions {
    mode: NumberingMode::Strict,
    ..plain()
  };
  let md = "# A\n### B\n## C\n#### D\n# E";
  assert_eq!(number(md, None, &strict), number(md, None, &plain()));
}

#[test]
fn test_strict_mode_rejects_skips_under_strict_validation() {
  let options = NumberingOptions {
    mode: NumberingMode::Strict,
    strict: true,
    ..plain()
  };
  let err = number_named_page("guide.md", &["# A", "### B"], None, &options)
    .unwrap_err();
  assert_eq!(
    err.to_string(),
    "guide.md: Heading 'B' skips from level 1 to level 3"
  );
}

#[test]
fn test_numbering_is_idempotent_on_source() {
  let md = "# A\n## B\n#### C\n# D";
  assert_eq!(number(md, Some(5), &plain()), number(md, Some(5), &plain()));
}

#[test]
fn test_span_wrapper_does_not_change_numbers() {
  let wrapped = number("# A\n## B", Some(2), &NumberingOptions::default());
  assert_eq!(
    wrapped,
    "# <span class=\"section-number\">2.</span> A\n## <span \
     class=\"section-number\">2.1</span> B"
  );
}
