//! Built-in bar sets.

use crate::color::{ColorMapper, ColorParseError, ColorTriplet};
use crate::generator::BarConfig;

/// `(hex color, signal)` for each science pack, one bar per pack.
pub const SCIENCE_PACKS: [(&str, &str); 12] = [
    ("#8e1dcc", "production-science-pack"),
    ("#e82195", "electromagnetic-science-pack"),
    ("#e94040", "automation-science-pack"),
    ("#ff9a25", "metallurgic-science-pack"),
    ("#f5e45b", "utility-science-pack"),
    ("#a2b90b", "agricultural-science-pack"),
    ("#55f261", "logistic-science-pack"),
    ("#3ec5e3", "chemical-science-pack"),
    ("#2c46c5", "cryogenic-science-pack"),
    ("#29274f", "promethium-science-pack"),
    ("#71788f", "military-science-pack"),
    ("#f9f9f9", "space-science-pack"),
];

/// One constant-color bar per science pack, stacked two rows apart.
///
/// Everything but position, signal and color is taken from `base`.
///
/// # Errors
///
/// Fails only if a preset color is not valid hex.
pub fn science_pack_bars(base: &BarConfig) -> Result<Vec<BarConfig>, ColorParseError> {
    SCIENCE_PACKS
        .iter()
        .zip(0_i32..)
        .map(|(&(hex, signal), row)| {
            let color = ColorTriplet::parse_hex(hex)?;
            Ok(base
                .to_builder()
                .position(0, 2 * row)
                .signal(signal)
                .color_mapper(ColorMapper::constant(color))
                .build())
        })
        .collect()
}
