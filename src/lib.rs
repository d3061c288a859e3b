//! Color math and dot-globe projection, plus the picker and catalog models a
//! front end drives.
//!
//! The numeric core ([`color`], [`math`], [`sphere`]) is pure: every call
//! depends only on its arguments and may run on any thread.

pub mod animation;
pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod math;
pub mod picker;
pub mod sphere;

pub use color::{hsv_to_rgb, parse_hex, rgb_to_hsv, rgb_to_hsv_int, to_hex, Hsv, Rgba};
pub use error::{ColorError, ConfigError};
pub use math::{clamp, clamp_offset};
pub use sphere::{generate_dots, DotSpec, GlobeGeometry, ProjectedPoint, Rotation};
