//! Colors, palettes and the color-mapping strategy used by the generator.
//!
//! # Examples
//!
//! ## Parsing Colors
//!
//! ```
//! use blockbar::color::ColorTriplet;
//!
//! let orange = ColorTriplet::parse_hex("#ff8800").unwrap();
//! let with_alpha = ColorTriplet::parse_hex("#00ff8800").unwrap(); // alpha ignored
//! assert_eq!(orange, with_alpha);
//! assert_eq!(orange.hex(), "#ff8800");
//! ```
//!
//! ## Mapping Progress to a Color
//!
//! ```
//! use blockbar::color::{ColorMapper, ColorTriplet, Palette};
//!
//! let constant = ColorMapper::constant(ColorTriplet::new(233, 64, 64));
//! assert_eq!(constant.map(0.7).hex(), "#e94040");
//!
//! let gradient = ColorMapper::continuous(Palette::grayscale());
//! assert_eq!(gradient.map(1.0), ColorTriplet::new(255, 255, 255));
//! ```

use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::Mutex;

use crate::sync::{lock_recover, lock_recover_debug};

/// SGR sequence that resets all attributes.
pub const ANSI_RESET: &str = "\x1b[0m";

/// Default bucket width for [`ColorMapper::Stepped`].
pub const DEFAULT_BUCKET_WIDTH: f64 = 0.1;

static HEX_CACHE: LazyLock<Mutex<LruCache<String, ColorTriplet>>> =
    LazyLock::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(256).expect("non-zero"))));

/// RGB color triplet with values 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorTriplet {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorTriplet {
    /// Create a new color triplet from RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns CSS-style hex format `#rrggbb`.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// 24-bit foreground SGR sequence, e.g. `\x1b[38;2;255;0;0m`.
    #[must_use]
    pub fn ansi_foreground(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.red, self.green, self.blue)
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(&self, other: Self, t: f64) -> Self {
        let t = clamp_unit(t);
        Self::new(
            lerp_channel(self.red, other.red, t),
            lerp_channel(self.green, other.green, t),
            lerp_channel(self.blue, other.blue, t),
        )
    }

    /// Parse `#rrggbb`, `#aarrggbb` or `#rgb`.
    ///
    /// The alpha pair of the 8-digit form is discarded. Results are kept in
    /// a small LRU cache since the same handful of colors is parsed for every
    /// condition of a bar.
    ///
    /// # Errors
    ///
    /// - `Empty` if the string is empty
    /// - `InvalidHex` if the string is not one of the accepted forms
    pub fn parse_hex(color: &str) -> Result<Self, ColorParseError> {
        let normalized = color.trim().to_ascii_lowercase();

        if let Some(cached) = lock_recover(&HEX_CACHE).get(&normalized) {
            return Ok(*cached);
        }

        let result = Self::parse_hex_uncached(&normalized)?;
        lock_recover_debug(&HEX_CACHE, "ColorTriplet::parse_hex cache").put(normalized, result);
        Ok(result)
    }

    fn parse_hex_uncached(color: &str) -> Result<Self, ColorParseError> {
        if color.is_empty() {
            return Err(ColorParseError::Empty);
        }
        let invalid = || ColorParseError::InvalidHex(color.to_string());

        let hex = color.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Ok(Self::new(
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            3 => {
                let doubled: Vec<String> = hex.chars().map(|c| format!("{c}{c}")).collect();
                Ok(Self::new(
                    channel(&doubled[0])?,
                    channel(&doubled[1])?,
                    channel(&doubled[2])?,
                ))
            }
            _ => Err(invalid()),
        }
    }
}

fn clamp_unit(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is rounded and clamped to 0..=255"
)]
fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let from = f64::from(from);
    let to = f64::from(to);
    (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
}

impl From<(u8, u8, u8)> for ColorTriplet {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<[u8; 3]> for ColorTriplet {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

impl fmt::Display for ColorTriplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for ColorTriplet {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<&str> for ColorTriplet {
    type Error = ColorParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse_hex(value)
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    Empty,
    InvalidHex(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty color string"),
            Self::InvalidHex(s) => write!(f, "Invalid hex color: {s}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

// ============================================================================
// Palettes
// ============================================================================

/// Evenly spaced color stops, interpolated linearly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    stops: Vec<ColorTriplet>,
}

/// Diverging red to white to blue, dark ends.
static RED_BLUE_STOPS: [ColorTriplet; 11] = [
    ColorTriplet::new(103, 0, 31),
    ColorTriplet::new(178, 24, 43),
    ColorTriplet::new(214, 96, 77),
    ColorTriplet::new(244, 165, 130),
    ColorTriplet::new(253, 219, 199),
    ColorTriplet::new(247, 247, 247),
    ColorTriplet::new(209, 229, 240),
    ColorTriplet::new(146, 197, 222),
    ColorTriplet::new(67, 147, 195),
    ColorTriplet::new(33, 102, 172),
    ColorTriplet::new(5, 48, 97),
];

impl Palette {
    /// Build a palette from its stops.
    ///
    /// # Errors
    ///
    /// Returns `ColorParseError::Empty` when `stops` is empty.
    pub fn new(stops: Vec<ColorTriplet>) -> Result<Self, ColorParseError> {
        if stops.is_empty() {
            return Err(ColorParseError::Empty);
        }
        Ok(Self { stops })
    }

    /// Build a palette from hex strings.
    ///
    /// # Errors
    ///
    /// Fails on the first unparsable stop, or when `stops` is empty.
    pub fn from_hex<S: AsRef<str>>(stops: &[S]) -> Result<Self, ColorParseError> {
        let parsed = stops
            .iter()
            .map(|s| ColorTriplet::parse_hex(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    /// The 11-stop diverging red/blue map.
    #[must_use]
    pub fn red_blue() -> Self {
        Self {
            stops: RED_BLUE_STOPS.to_vec(),
        }
    }

    /// Black to white.
    #[must_use]
    pub fn grayscale() -> Self {
        Self {
            stops: vec![ColorTriplet::new(0, 0, 0), ColorTriplet::new(255, 255, 255)],
        }
    }

    #[must_use]
    pub fn stops(&self) -> &[ColorTriplet] {
        &self.stops
    }

    /// Color at position `t`, clamped to `[0, 1]`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "position is clamped to 0..=stops.len() - 1"
    )]
    pub fn lookup(&self, t: f64) -> ColorTriplet {
        let last = self.stops.len() - 1;
        if last == 0 {
            return self.stops[0];
        }
        let position = clamp_unit(t) * last as f64;
        let index = (position.floor() as usize).min(last - 1);
        let fraction = position - index as f64;
        self.stops[index].lerp(self.stops[index + 1], fraction)
    }
}

// ============================================================================
// Color mapping strategy
// ============================================================================

/// Maps a progress fraction in `[0, 1]` to a color.
///
/// Arguments outside the unit interval are clamped; `NaN` maps like `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorMapper {
    /// Same color everywhere.
    Constant(ColorTriplet),
    /// Snap `t` to the nearest multiple of `bucket_width` (ties to even),
    /// then look up the palette.
    Stepped { palette: Palette, bucket_width: f64 },
    /// Direct palette lookup.
    Continuous(Palette),
}

impl ColorMapper {
    #[must_use]
    pub const fn constant(color: ColorTriplet) -> Self {
        Self::Constant(color)
    }

    /// Stepped lookup with the default bucket width of `0.1`.
    #[must_use]
    pub fn stepped(palette: Palette) -> Self {
        Self::Stepped {
            palette,
            bucket_width: DEFAULT_BUCKET_WIDTH,
        }
    }

    #[must_use]
    pub fn continuous(palette: Palette) -> Self {
        Self::Continuous(palette)
    }

    /// Map a progress fraction to a color.
    #[must_use]
    pub fn map(&self, t: f64) -> ColorTriplet {
        match self {
            Self::Constant(color) => *color,
            Self::Stepped {
                palette,
                bucket_width,
            } => palette.lookup(quantize(clamp_unit(t), *bucket_width)),
            Self::Continuous(palette) => palette.lookup(t),
        }
    }
}

fn quantize(t: f64, bucket_width: f64) -> f64 {
    if !bucket_width.is_finite() || bucket_width <= 0.0 {
        return t;
    }
    (t / bucket_width).round_ties_even() * bucket_width
}
