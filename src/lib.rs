//! # blockbar
//!
//! Pre-computed progress bar states for display engines that can only
//! switch between fixed texts.
//!
//! A bar is rendered ahead of time into an ordered list of
//! [`Condition`](condition::Condition)s. Each one pairs an integer threshold
//! and a comparator with a text that draws the bar using eighth-cell block
//! glyphs, optional color markup, and a percentage label. The consuming
//! engine shows the first condition that accepts the live signal value.
//!
//! ## Quick Start
//!
//! ```rust
//! use blockbar::prelude::*;
//!
//! let config = BarConfig::builder()
//!     .length(10)
//!     .color_mapper(ColorMapper::constant(ColorTriplet::new(0x3e, 0xc5, 0xe3)))
//!     .build();
//! let conditions = generate(&config).unwrap();
//! assert_eq!(conditions.len(), 81);
//!
//! // Preview one state in the terminal.
//! let preview = blockbar::markup::render(conditions[35].text());
//! assert!(preview.ends_with("  43.8%"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Generator**: [`generator::generate`] turns a [`generator::BarConfig`]
//!   into conditions
//! - **Color mapping**: [`color::ColorMapper`] picks the color of each bar
//!   segment from its progress fraction
//! - **Markup**: [`markup::render`] resolves font and color tags into
//!   terminal text for inspection

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cells;
pub mod color;
pub mod condition;
pub mod generator;
pub mod logging;
pub mod markup;
pub mod presets;
pub mod preview;
pub mod sync;

/// Re-exports for convenient usage
pub mod prelude {
    pub use crate::color::{ColorMapper, ColorTriplet, Palette};
    pub use crate::condition::{Comparator, Condition, evaluate};
    pub use crate::generator::{BarConfig, BarConfigBuilder, BarError, generate};
    pub use crate::markup::{ColorOutput, render};
}

// Re-export key types at crate root
pub use color::{ColorMapper, ColorTriplet, Palette};
pub use condition::{Comparator, Condition};
pub use generator::{BarConfig, BarError, generate};
