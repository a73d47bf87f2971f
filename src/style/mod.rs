//! Style configuration, palettes and themes.

mod config;
mod palette;
mod theme;

pub use config::StyleConfig;
pub use palette::{ColorCycle, Palette};
pub use theme::Theme;
