//! SVG viewBox fitting and marker placement geometry.
//!
//! Pure geometry without rendering or global state. `no_std` compatible.
//!
//! # Modules
//!
//! - [`aspect`]: `preserveAspectRatio` policies and the viewBox → viewport transform
//! - [`geometry`]: points, sizes, rects, scale/translate and affine matrices
//! - [`parse`]: attribute micro-syntax (`viewBox`, `preserveAspectRatio`, `orient`, `markerUnits`)
//! - [`marker`]: `<marker>` placement and the [`MarkerCanvas`] drawing seam
//! - `position`: marker positions along a path (requires `alloc`)
//! - `svg`: debug visualization of a fit (requires `svg`)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod aspect;
pub mod geometry;
pub mod marker;
pub mod parse;
#[cfg(feature = "alloc")]
pub mod position;
#[cfg(feature = "svg")]
pub mod svg;

// Re-exports: core types from aspect module
pub use aspect::{
    AlignmentPolicy, AxisAlign, Dimension, MeetOrSlice, PreserveAspectRatio, ViewBoxError,
    compute, visible_rect,
};
pub use geometry::{Affine, Point, Rect, Size, Transform, ViewBox};
pub use marker::{
    Marker, MarkerCanvas, MarkerKind, MarkerPlacement, MarkerPosition, MarkerUnits, Orient,
};
pub use parse::ParseError;
#[cfg(feature = "alloc")]
pub use position::{MarkerSet, PathSegment, marker_positions, render_markers};
