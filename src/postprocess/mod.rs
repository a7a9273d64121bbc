//! Presentation steps applied after edge detection.
//!
//! Neither step feeds back into the engines: the anti-aliased mask is a
//! smoothed copy for display and the flow preview is purely diagnostic.

pub mod antialias;
pub mod lic;

pub use antialias::anti_alias;
pub use lic::{visualize_flow, LicParams};
