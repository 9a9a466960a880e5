//! Rule implementations.
//!
//! Each rule implements the `Rule` trait for one acceptance check.

mod color_space;
mod dpi;

pub use color_space::ColorSpaceRule;
pub use dpi::{DpiRule, DEFAULT_DPI_THRESHOLD};
