//! Terminal preview of generated conditions.

use crate::condition::Condition;
use crate::markup::{self, ColorOutput};

/// Pick `count` items at evenly spaced indices, first and last included.
///
/// - `count == 0` or no items: empty
/// - `count == 1`: the middle item
/// - `count >= items.len()`: every item
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "indices are rounded within 0..items.len()"
)]
pub fn sample_evenly<T>(items: &[T], count: usize) -> Vec<&T> {
    let len = items.len();
    if count == 0 || len == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![&items[len / 2]];
    }
    if count >= len {
        return items.iter().collect();
    }

    let span = (len - 1) as f64 / (count - 1) as f64;
    (0..count)
        .map(|i| {
            let index = (i as f64 * span).round_ties_even() as usize;
            &items[index.min(len - 1)]
        })
        .collect()
}

/// One line per condition: comparator, threshold, rendered text.
#[must_use]
pub fn preview_line(condition: &Condition, output: ColorOutput) -> String {
    format!(
        "{}{:>5}  {}",
        condition.comparator(),
        condition.threshold(),
        markup::render_with(condition.text(), output)
    )
}

/// Preview lines for an even sample of `conditions`, or all of them.
#[must_use]
pub fn preview_lines(
    conditions: &[Condition],
    samples: Option<usize>,
    output: ColorOutput,
) -> Vec<String> {
    let picked = match samples {
        Some(count) => sample_evenly(conditions, count),
        None => conditions.iter().collect(),
    };
    picked
        .into_iter()
        .map(|condition| preview_line(condition, output))
        .collect()
}
