//! Section numbering within a single page.
//!
//! Two algorithms are provided and select through [`NumberingMode`]:
//!
//! - [`section_numbers`] looks at every heading depth separately and combines
//!   the per-depth counters afterwards. Skipped levels simply read as zero.
//! - [`strict_section_numbers`] walks the headings with an explicit stack of
//!   open levels, pushing on deeper headings and popping on shallower ones.
//!   It reports every place where a level was entered without its parent.
//!
//! Both produce the same numbers for any depth sequence.

use serde::Serialize;

use crate::types::{MAX_DEPTH, NumberingMode, SectionNumber};

/// Determine, for one heading depth, the running counter at every heading.
///
/// # Example
///
/// ```
/// use secnum_core::numbering::heading_number;
///
/// let depths = [1, 2, 1, 2, 2];
/// assert_eq!(heading_number(&depths, 1), vec![1, 1, 2, 2, 2]);
/// assert_eq!(heading_number(&depths, 2), vec![0, 1, 0, 1, 2]);
/// ```
#[must_use]
pub fn heading_number(depths: &[usize], target: usize) -> Vec<u32> {
  let mut numbers: Vec<u32> = Vec::with_capacity(depths.len());

  for (i, &depth) in depths.iter().enumerate() {
    let previous = if i == 0 { 0 } else { numbers[i - 1] };
    let number = if i == 0 {
      // Start counting only if the first heading is at this depth
      u32::from(depth == target)
    } else if depth < target {
      // A shallower heading closes the deeper numbering context
      0
    } else if depth == target {
      previous + 1
    } else {
      previous
    };
    numbers.push(number);
  }

  numbers
}

/// Compute the section number of every heading from its depth.
#[must_use]
pub fn section_numbers(depths: &[usize]) -> Vec<SectionNumber> {
  let mut numbers = vec![SectionNumber::default(); depths.len()];

  for target in 1..=MAX_DEPTH {
    for (number, value) in numbers.iter_mut().zip(heading_number(depths, target))
    {
      number.set(target, value);
    }
  }

  numbers
}

/// A heading that entered a level without passing through its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedLevel {
  /// Position of the offending heading in the depth sequence.
  pub position: usize,
  /// Depth of the innermost open level, zero at the top of the page.
  pub from:     usize,
  /// Depth of the offending heading.
  pub to:       usize,
}

struct Frame {
  depth: usize,
  count: u32,
}

/// Stack-based numbering that tracks open levels explicitly.
///
/// Each heading closes every open level deeper than itself, then either
/// continues the sibling count at its own level or opens a new level.
#[must_use]
pub fn strict_section_numbers(
  depths: &[usize],
) -> (Vec<SectionNumber>, Vec<SkippedLevel>) {
  let mut numbers = Vec::with_capacity(depths.len());
  let mut skips = Vec::new();
  let mut stack: Vec<Frame> = Vec::with_capacity(MAX_DEPTH);

  for (position, &depth) in depths.iter().enumerate() {
    while stack.last().is_some_and(|frame| frame.depth > depth) {
      stack.pop();
    }

    let parent_depth = stack.last().map_or(0, |frame| frame.depth);
    if parent_depth == depth {
      if let Some(frame) = stack.last_mut() {
        frame.count += 1;
      }
    } else {
      if depth > parent_depth + 1 {
        skips.push(SkippedLevel {
          position,
          from: parent_depth,
          to: depth,
        });
      }
      stack.push(Frame { depth, count: 1 });
    }

    let mut number = SectionNumber::default();
    for frame in &stack {
      number.set(frame.depth, frame.count);
    }
    numbers.push(number);
  }

  (numbers, skips)
}

/// Section numbers for a page plus any level skips found on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Numbering {
  pub numbers: Vec<SectionNumber>,
  pub skips:   Vec<SkippedLevel>,
}

/// Number a depth sequence with the selected algorithm.
///
/// Lenient mode never reports skips.
#[must_use]
pub fn number_depths(depths: &[usize], mode: NumberingMode) -> Numbering {
  match mode {
    NumberingMode::Lenient => {
      Numbering {
        numbers: section_numbers(depths),
        skips:   Vec::new(),
      }
    },
    NumberingMode::Strict => {
      let (numbers, skips) = strict_section_numbers(depths);
      Numbering { numbers, skips }
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn strings(numbers: &[SectionNumber]) -> Vec<String> {
    numbers.iter().map(ToString::to_string).collect()
  }

  #[test]
  fn test_heading_number_per_depth() {
    let depths = [1, 2, 1, 2, 2];
    assert_eq!(heading_number(&depths, 1), vec![1, 1, 2, 2, 2]);
    assert_eq!(heading_number(&depths, 2), vec![0, 1, 0, 1, 2]);
    assert_eq!(heading_number(&depths, 3), vec![0, 0, 0, 0, 0]);
  }

  #[test]
  fn test_heading_number_empty() {
    assert!(heading_number(&[], 1).is_empty());
    assert!(section_numbers(&[]).is_empty());
  }

  #[test]
  fn test_section_numbers() {
    let numbers = section_numbers(&[1, 2, 2, 3, 1, 2]);
    assert_eq!(strings(&numbers), vec![
      "1.", "1.1", "1.2", "1.2.1", "2.", "2.1"
    ]);
  }

  #[test]
  fn test_page_starting_below_level_one() {
    let numbers = section_numbers(&[2, 2, 3]);
    assert_eq!(strings(&numbers), vec!["0.1", "0.2", "0.2.1"]);
  }

  #[test]
  fn test_skipped_levels_read_as_zero() {
    let numbers = section_numbers(&[1, 3, 3, 2]);
    assert_eq!(strings(&numbers), vec!["1.", "1.0.1", "1.0.2", "1.1"]);
  }

  #[test]
  fn test_strict_reports_skips() {
    let (numbers, skips) = strict_section_numbers(&[1, 3, 2, 4]);
    assert_eq!(strings(&numbers), vec!["1.", "1.0.1", "1.1", "1.1.0.1"]);
    assert_eq!(skips, vec![
      SkippedLevel {
        position: 1,
        from:     1,
        to:       3,
      },
      SkippedLevel {
        position: 3,
        from:     2,
        to:       4,
      },
    ]);
  }

  #[test]
  fn test_strict_well_formed_has_no_skips() {
    let (_, skips) = strict_section_numbers(&[1, 2, 3, 2, 1, 2]);
    assert!(skips.is_empty());
  }

  #[test]
  fn test_strict_first_heading_below_level_one_is_a_skip() {
    let (numbers, skips) = strict_section_numbers(&[2, 2]);
    assert_eq!(strings(&numbers), vec!["0.1", "0.2"]);
    assert_eq!(skips.len(), 1);
    assert_eq!(skips[0].from, 0);
  }

  #[test]
  fn test_modes_agree_on_every_short_sequence() {
    // Exhaustive over depths 1..=7 (7 exceeds the counted levels)
    fn check(depths: &mut Vec<usize>, remaining: usize) {
      let (strict, _) = strict_section_numbers(depths);
      assert_eq!(section_numbers(depths), strict, "depths: {depths:?}");
      if remaining == 0 {
        return;
      }
      for depth in 1..=7 {
        depths.push(depth);
        check(depths, remaining - 1);
        depths.pop();
      }
    }

    check(&mut Vec::new(), 5);
  }

  #[test]
  fn test_numbering_is_deterministic() {
    let depths = [1, 2, 4, 2, 1, 3];
    assert_eq!(section_numbers(&depths), section_numbers(&depths));
  }

  #[test]
  fn test_number_depths_lenient_never_skips() {
    let numbering = number_depths(&[1, 4], NumberingMode::Lenient);
    assert!(numbering.skips.is_empty());
    assert_eq!(strings(&numbering.numbers), vec!["1.", "1.0.0.1"]);
  }
}
