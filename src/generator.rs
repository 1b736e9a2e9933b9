//! Condition generator.
//!
//! Turns a [`BarConfig`] into the ordered list of [`Condition`]s that a
//! display engine walks to pick the state matching a live signal value.
//! Every state draws the bar with sub-cell precision using eight block
//! glyphs per cell, followed by a percentage label.
//!
//! ```
//! use blockbar::condition::Comparator;
//! use blockbar::generator::{BarConfig, generate};
//!
//! let config = BarConfig::builder().length(2).step_size(4).build();
//! let conditions = generate(&config).unwrap();
//!
//! assert_eq!(conditions.len(), 5);
//! assert_eq!(conditions[0].comparator(), Comparator::LessOrEqual);
//! assert_eq!(
//!     conditions[2].text(),
//!     "[font=technology-slot-level-font]\u{2588}\u{2588}0[/font]  50.0%"
//! );
//! ```

use std::fmt;

use crate::color::ColorMapper;
use crate::condition::{Comparator, Condition};

/// Block glyphs from one eighth filled to fully filled.
pub const BLOCK_GLYPHS: [char; 8] = [
    '\u{258F}', // ▏
    '\u{258E}', // ▎
    '\u{258D}', // ▍
    '\u{258C}', // ▌
    '\u{258B}', // ▋
    '\u{258A}', // ▊
    '\u{2589}', // ▉
    '\u{2588}', // █
];

/// Glyph steps per cell.
pub const DIVISIONS: i64 = 8;

/// The heaviest glyph.
pub const FULL_BLOCK: char = BLOCK_GLYPHS[7];

/// Font wrapped around the bar glyphs.
pub const DEFAULT_FONT: &str = "technology-slot-level-font";

/// Signal the conditions compare against when none is configured.
pub const DEFAULT_SIGNAL: &str = "parameter-0";

/// Padding character that keeps the label column aligned. It renders
/// invisibly in the bar font but still occupies a cell.
const ALIGN_FILLER: char = '0';

/// Error type for condition generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarError {
    /// A configuration field is outside its valid range.
    InvalidConfiguration {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },
}

impl fmt::Display for BarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration {
                field,
                value,
                reason,
            } => write!(f, "invalid bar configuration: {field} = {value} ({reason})"),
        }
    }
}

impl std::error::Error for BarError {}

/// Bar configuration. Immutable once built; see [`BarConfig::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct BarConfig {
    position: (i32, i32),
    signal: String,
    prefix: String,
    font: String,
    color_mapper: Option<ColorMapper>,
    length: i64,
    step_size: i64,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            position: (0, 0),
            signal: DEFAULT_SIGNAL.to_string(),
            prefix: String::new(),
            font: DEFAULT_FONT.to_string(),
            color_mapper: None,
            length: 10,
            step_size: 1,
        }
    }
}

impl BarConfig {
    /// Start from the defaults: 10 cells, step 1, no colors.
    #[must_use]
    pub fn builder() -> BarConfigBuilder {
        BarConfigBuilder {
            config: Self::default(),
        }
    }

    /// A builder seeded with this configuration.
    #[must_use]
    pub fn to_builder(&self) -> BarConfigBuilder {
        BarConfigBuilder {
            config: self.clone(),
        }
    }

    /// Anchor of the display entity.
    #[must_use]
    pub const fn position(&self) -> (i32, i32) {
        self.position
    }

    #[must_use]
    pub fn signal(&self) -> &str {
        &self.signal
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn font(&self) -> &str {
        &self.font
    }

    #[must_use]
    pub const fn color_mapper(&self) -> Option<&ColorMapper> {
        self.color_mapper.as_ref()
    }

    /// Number of full cells at maximum value.
    #[must_use]
    pub const fn length(&self) -> i64 {
        self.length
    }

    /// Threshold granularity in eighths of a cell.
    #[must_use]
    pub const fn step_size(&self) -> i64 {
        self.step_size
    }

    /// Highest signal value the bar distinguishes (`length * 8`).
    ///
    /// # Errors
    ///
    /// See [`BarConfig::validate`].
    pub fn max_threshold(&self) -> Result<i64, BarError> {
        self.validate()?;
        self.length
            .checked_mul(DIVISIONS)
            .ok_or(BarError::InvalidConfiguration {
                field: "length",
                value: self.length,
                reason: "cell count overflows the threshold range",
            })
    }

    /// Check `length >= 1` and `step_size >= 1`.
    ///
    /// # Errors
    ///
    /// Returns `BarError::InvalidConfiguration` naming the offending field.
    pub fn validate(&self) -> Result<(), BarError> {
        if self.length < 1 {
            return Err(BarError::InvalidConfiguration {
                field: "length",
                value: self.length,
                reason: "must be at least 1",
            });
        }
        if self.step_size < 1 {
            return Err(BarError::InvalidConfiguration {
                field: "step_size",
                value: self.step_size,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Builder for [`BarConfig`].
#[derive(Debug, Clone)]
pub struct BarConfigBuilder {
    config: BarConfig,
}

impl BarConfigBuilder {
    #[must_use]
    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.config.position = (x, y);
        self
    }

    #[must_use]
    pub fn signal(mut self, signal: impl Into<String>) -> Self {
        self.config.signal = signal.into();
        self
    }

    /// Text placed before the font tag.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.config.font = font.into();
        self
    }

    #[must_use]
    pub fn color_mapper(mut self, mapper: ColorMapper) -> Self {
        self.config.color_mapper = Some(mapper);
        self
    }

    #[must_use]
    pub fn no_color(mut self) -> Self {
        self.config.color_mapper = None;
        self
    }

    #[must_use]
    pub fn length(mut self, length: i64) -> Self {
        self.config.length = length;
        self
    }

    #[must_use]
    pub fn step_size(mut self, step_size: i64) -> Self {
        self.config.step_size = step_size;
        self
    }

    #[must_use]
    pub fn build(self) -> BarConfig {
        self.config
    }
}

/// Raw step schedule: `-1, -1 + step, ...` up to `length * 8 - 1`, with the
/// final value appended when the stride skips it.
///
/// # Errors
///
/// Returns `BarError::InvalidConfiguration` when either argument is below 1.
pub fn raw_steps(length: i64, step_size: i64) -> Result<Vec<i64>, BarError> {
    let config = BarConfig::builder()
        .length(length)
        .step_size(step_size)
        .build();
    let last = config.max_threshold()? - 1;
    let stride = usize::try_from(step_size).map_err(|_| BarError::InvalidConfiguration {
        field: "step_size",
        value: step_size,
        reason: "stride exceeds the address space",
    })?;

    let mut steps: Vec<i64> = (-1..=last).step_by(stride).collect();
    if steps.last().is_some_and(|&step| step < last) {
        steps.push(last);
    }
    Ok(steps)
}

/// Generate the ordered display conditions for `config`.
///
/// Thresholds are strictly increasing; the first condition compares with
/// `≤`, the last with `≥`, all others with `=`.
///
/// # Errors
///
/// Returns `BarError::InvalidConfiguration` when `length < 1` or
/// `step_size < 1`.
pub fn generate(config: &BarConfig) -> Result<Vec<Condition>, BarError> {
    let max_threshold = config.max_threshold()?;
    let steps = raw_steps(config.length, config.step_size)?;

    log::debug!(
        "generating {} conditions for {} (length {}, step {})",
        steps.len(),
        config.signal,
        config.length,
        config.step_size
    );

    let mut conditions: Vec<Condition> = steps
        .into_iter()
        .map(|step| condition_for_step(config, step, max_threshold))
        .collect();

    if let Some(first) = conditions.first_mut() {
        first.set_comparator(Comparator::LessOrEqual);
    }
    if let Some(last) = conditions.last_mut() {
        last.set_comparator(Comparator::GreaterOrEqual);
    }
    Ok(conditions)
}

fn condition_for_step(config: &BarConfig, step: i64, max_threshold: i64) -> Condition {
    let num_before = step.div_euclid(DIVISIONS).max(0);

    let (bar, num_after) = if step == -1 {
        (String::new(), config.length)
    } else {
        let mut bar = full_blocks(num_before);
        bar.push(BLOCK_GLYPHS[glyph_index(step)]);
        (bar, config.length - num_before - 1)
    };
    let bar = colorize(config, bar, fraction(step, max_threshold - 1));

    let threshold = step + 1;
    let (label, leading_spaces) = percentage_label(threshold, max_threshold);

    let mut tail = full_blocks(num_after);
    tail.extend(std::iter::repeat_n(ALIGN_FILLER, leading_spaces));
    let tail = colorize(config, tail, fraction(threshold, max_threshold - 1));

    let text = format!(
        "{}[font={}]{bar}{tail}[/font]  {label}",
        config.prefix, config.font
    );
    log::trace!("step {step} -> threshold {threshold}: {text}");

    Condition::new(threshold, Comparator::Equal, text)
}

fn full_blocks(count: i64) -> String {
    let count = usize::try_from(count).unwrap_or(0);
    std::iter::repeat_n(FULL_BLOCK, count).collect()
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "rem_euclid yields 0..DIVISIONS"
)]
const fn glyph_index(step: i64) -> usize {
    step.rem_euclid(DIVISIONS) as usize
}

#[expect(clippy::cast_precision_loss, reason = "thresholds stay far below 2^52")]
fn fraction(numerator: i64, denominator: i64) -> f64 {
    numerator as f64 / denominator as f64
}

/// Wrap a non-empty segment in a color span when a mapper is configured.
fn colorize(config: &BarConfig, segment: String, t: f64) -> String {
    match &config.color_mapper {
        Some(mapper) if !segment.is_empty() => {
            format!("[color={}]{segment}[/color]", mapper.map(t).hex())
        }
        _ => segment,
    }
}

/// Percentage with one decimal digit, right-aligned in five columns, then
/// trimmed. Returns the label and the number of trimmed spaces.
fn percentage_label(threshold: i64, max_threshold: i64) -> (String, usize) {
    let percent = fraction(threshold, max_threshold) * 100.0;
    let padded = format!("{percent:>5.1}%");
    let label = padded.trim_start();
    let leading = padded.len() - label.len();
    (label.to_string(), leading)
}
