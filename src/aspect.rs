//! ViewBox fitting: `preserveAspectRatio` alignment and meet/slice scaling.
//!
//! Computes the scale + translate that maps viewBox coordinates into a
//! destination viewport. Pure geometry without allocations or state,
//! `no_std` compatible.
//!
//! # Example
//!
//! ```
//! use zenviewbox::{AlignmentPolicy, MeetOrSlice, Size, ViewBox, compute};
//!
//! let t = compute(
//!     ViewBox::new(0.0, 0.0, 100.0, 100.0),
//!     Size::new(200.0, 100.0),
//!     AlignmentPolicy::X_MID_Y_MID,
//!     MeetOrSlice::Meet,
//! )
//! .unwrap();
//!
//! // Content is scaled 1:1 and centered horizontally.
//! assert_eq!((t.scale_x, t.translate_x, t.translate_y), (1.0, 50.0, 0.0));
//! ```

use num_traits::Float;

use crate::geometry::{Rect, Size, Transform, ViewBox};

/// Where leftover space goes along one axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisAlign {
    /// Content hugs the near edge (left or top).
    Min,
    /// Content is centered.
    #[default]
    Mid,
    /// Content hugs the far edge (right or bottom).
    Max,
}

impl AxisAlign {
    /// Offset for `extra` units of leftover space.
    ///
    /// `extra` is negative when the content overflows (slice).
    pub fn offset(self, extra: f64) -> f64 {
        match self {
            Self::Min => 0.0,
            Self::Mid => extra / 2.0,
            Self::Max => extra,
        }
    }
}

/// The `<align>` part of `preserveAspectRatio`.
///
/// `None` stretches each axis independently. `Aligned` scales uniformly
/// and distributes leftover space per axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AlignmentPolicy {
    /// Non-uniform scaling; meet/slice is ignored.
    None,
    /// Uniform scaling with per-axis placement.
    Aligned { x: AxisAlign, y: AxisAlign },
}

impl Default for AlignmentPolicy {
    fn default() -> Self {
        Self::X_MID_Y_MID
    }
}

impl AlignmentPolicy {
    pub const X_MIN_Y_MIN: Self = Self::aligned(AxisAlign::Min, AxisAlign::Min);
    pub const X_MID_Y_MIN: Self = Self::aligned(AxisAlign::Mid, AxisAlign::Min);
    pub const X_MAX_Y_MIN: Self = Self::aligned(AxisAlign::Max, AxisAlign::Min);
    pub const X_MIN_Y_MID: Self = Self::aligned(AxisAlign::Min, AxisAlign::Mid);
    pub const X_MID_Y_MID: Self = Self::aligned(AxisAlign::Mid, AxisAlign::Mid);
    pub const X_MAX_Y_MID: Self = Self::aligned(AxisAlign::Max, AxisAlign::Mid);
    pub const X_MIN_Y_MAX: Self = Self::aligned(AxisAlign::Min, AxisAlign::Max);
    pub const X_MID_Y_MAX: Self = Self::aligned(AxisAlign::Mid, AxisAlign::Max);
    pub const X_MAX_Y_MAX: Self = Self::aligned(AxisAlign::Max, AxisAlign::Max);

    /// All ten policies, `none` first, then row-major `xMinYMin..xMaxYMax`.
    pub const ALL: [Self; 10] = [
        Self::None,
        Self::X_MIN_Y_MIN,
        Self::X_MID_Y_MIN,
        Self::X_MAX_Y_MIN,
        Self::X_MIN_Y_MID,
        Self::X_MID_Y_MID,
        Self::X_MAX_Y_MID,
        Self::X_MIN_Y_MAX,
        Self::X_MID_Y_MAX,
        Self::X_MAX_Y_MAX,
    ];

    /// Uniform scaling with the given per-axis placement.
    pub const fn aligned(x: AxisAlign, y: AxisAlign) -> Self {
        Self::Aligned { x, y }
    }

    /// The SVG keyword for this policy (`"none"`, `"xMidYMid"`, ...).
    pub fn keyword(self) -> &'static str {
        use AxisAlign::*;
        match self {
            Self::None => "none",
            Self::Aligned { x: Min, y: Min } => "xMinYMin",
            Self::Aligned { x: Mid, y: Min } => "xMidYMin",
            Self::Aligned { x: Max, y: Min } => "xMaxYMin",
            Self::Aligned { x: Min, y: Mid } => "xMinYMid",
            Self::Aligned { x: Mid, y: Mid } => "xMidYMid",
            Self::Aligned { x: Max, y: Mid } => "xMaxYMid",
            Self::Aligned { x: Min, y: Max } => "xMinYMax",
            Self::Aligned { x: Mid, y: Max } => "xMidYMax",
            Self::Aligned { x: Max, y: Max } => "xMaxYMax",
        }
    }
}

/// Uniform scaling rule for aligned policies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MeetOrSlice {
    /// Whole viewBox visible; viewport may have empty bands.
    #[default]
    Meet,
    /// Viewport fully covered; viewBox content may be clipped.
    Slice,
}

impl MeetOrSlice {
    /// The SVG keyword (`"meet"` or `"slice"`).
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Meet => "meet",
            Self::Slice => "slice",
        }
    }
}

/// A parsed `preserveAspectRatio` value.
///
/// Defaults to `xMidYMid meet`. Build one directly, or parse the attribute
/// text with [`str::parse`] (see [`crate::parse`]).
///
/// ```
/// use zenviewbox::{AlignmentPolicy, MeetOrSlice, PreserveAspectRatio, Size, ViewBox};
///
/// let par: PreserveAspectRatio = "xMinYMax slice".parse().unwrap();
/// assert_eq!(par.align, AlignmentPolicy::X_MIN_Y_MAX);
/// assert_eq!(par.meet_or_slice, MeetOrSlice::Slice);
///
/// let t = par
///     .compute(ViewBox::new(0.0, 0.0, 10.0, 20.0), Size::new(40.0, 40.0))
///     .unwrap();
/// assert_eq!(t.scale_x, 4.0);
/// assert_eq!(t.translate_y, -40.0);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PreserveAspectRatio {
    pub align: AlignmentPolicy,
    pub meet_or_slice: MeetOrSlice,
}

impl PreserveAspectRatio {
    /// Create from both policies.
    pub const fn new(align: AlignmentPolicy, meet_or_slice: MeetOrSlice) -> Self {
        Self {
            align,
            meet_or_slice,
        }
    }

    /// Stretch to fill (`none`).
    pub const fn none() -> Self {
        Self::new(AlignmentPolicy::None, MeetOrSlice::Meet)
    }

    /// Set the alignment policy.
    pub fn with_align(mut self, align: AlignmentPolicy) -> Self {
        self.align = align;
        self
    }

    /// Set meet or slice.
    pub fn with_meet_or_slice(mut self, meet_or_slice: MeetOrSlice) -> Self {
        self.meet_or_slice = meet_or_slice;
        self
    }

    /// Fit `view_box` into `viewport` using this policy.
    pub fn compute(&self, view_box: ViewBox, viewport: Size) -> Result<Transform, ViewBoxError> {
        compute(view_box, viewport, self.align, self.meet_or_slice)
    }
}

/// Which input dimension was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    ViewBoxWidth,
    ViewBoxHeight,
    ViewportWidth,
    ViewportHeight,
    /// `min_x` or `min_y` of the viewBox (only rejected when not finite).
    ViewBoxOrigin,
    /// Stroke width used to scale `markerUnits="strokeWidth"` markers.
    StrokeWidth,
    /// Resolved marker rotation, in degrees.
    MarkerAngle,
    /// `refX` or `refY`.
    MarkerRef,
    /// Vertex a marker is placed at.
    MarkerOrigin,
    /// Finite inputs whose composed marker matrix overflowed.
    MarkerTransform,
}

impl core::fmt::Display for Dimension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::ViewBoxWidth => "viewBox width",
            Self::ViewBoxHeight => "viewBox height",
            Self::ViewportWidth => "viewport width",
            Self::ViewportHeight => "viewport height",
            Self::ViewBoxOrigin => "viewBox origin",
            Self::StrokeWidth => "stroke width",
            Self::MarkerAngle => "marker angle",
            Self::MarkerRef => "marker reference point",
            Self::MarkerOrigin => "marker origin",
            Self::MarkerTransform => "marker transform",
        })
    }
}

/// ViewBox fitting error.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ViewBoxError {
    /// A width or height is zero, negative or not finite, or the viewBox
    /// origin is not finite.
    #[error("invalid {dimension}: {value}")]
    InvalidDimension { dimension: Dimension, value: f64 },
}

/// Fit `view_box` into `viewport`.
///
/// Returns the per-axis scale and translation mapping viewBox coordinates
/// into viewport coordinates. With [`AlignmentPolicy::None`] each axis is
/// scaled independently and `meet_or_slice` is ignored; otherwise the
/// scale is uniform (the smaller axis ratio for meet, the larger for slice)
/// and leftover space is distributed per axis.
///
/// Fails with [`ViewBoxError::InvalidDimension`] if any width or height is
/// `<= 0` or not finite, or if the ratio between them over- or underflows
/// `f64`. Never clamps.
pub fn compute(
    view_box: ViewBox,
    viewport: Size,
    align: AlignmentPolicy,
    meet_or_slice: MeetOrSlice,
) -> Result<Transform, ViewBoxError> {
    validate(&view_box, &viewport)?;

    let sx = ratio(viewport.width, view_box.width, Dimension::ViewBoxWidth)?;
    let sy = ratio(viewport.height, view_box.height, Dimension::ViewBoxHeight)?;

    let (x, y) = match align {
        AlignmentPolicy::None => {
            return finite(
                Transform {
                    scale_x: sx,
                    scale_y: sy,
                    translate_x: -view_box.min_x * sx,
                    translate_y: -view_box.min_y * sy,
                },
                &view_box,
            );
        }
        AlignmentPolicy::Aligned { x, y } => (x, y),
    };

    let scale = match meet_or_slice {
        MeetOrSlice::Meet => Float::min(sx, sy),
        MeetOrSlice::Slice => Float::max(sx, sy),
    };

    let extra_x = viewport.width - view_box.width * scale;
    let extra_y = viewport.height - view_box.height * scale;

    finite(
        Transform {
            scale_x: scale,
            scale_y: scale,
            translate_x: x.offset(extra_x) - view_box.min_x * scale,
            translate_y: y.offset(extra_y) - view_box.min_y * scale,
        },
        &view_box,
    )
}

/// The part of the viewport covered by viewBox content.
///
/// Equal to the viewport for `slice` (content overflows and must be
/// clipped to it) and for `none`; smaller than the viewport for `meet`
/// when aspect ratios differ.
pub fn visible_rect(
    view_box: ViewBox,
    viewport: Size,
    par: PreserveAspectRatio,
) -> Result<Rect, ViewBoxError> {
    let t = par.compute(view_box, viewport)?;
    let mapped = t.map_view_box(&view_box);
    // Both rects have positive area once validated, and the fitted content
    // always overlaps the viewport.
    Ok(mapped
        .intersect(&Rect::from_size(viewport))
        .unwrap_or(mapped))
}

fn validate(view_box: &ViewBox, viewport: &Size) -> Result<(), ViewBoxError> {
    positive(view_box.width, Dimension::ViewBoxWidth)?;
    positive(view_box.height, Dimension::ViewBoxHeight)?;
    positive(viewport.width, Dimension::ViewportWidth)?;
    positive(viewport.height, Dimension::ViewportHeight)?;
    for v in [view_box.min_x, view_box.min_y] {
        if !v.is_finite() {
            return Err(ViewBoxError::InvalidDimension {
                dimension: Dimension::ViewBoxOrigin,
                value: v,
            });
        }
    }
    Ok(())
}

/// `num / den` as a scale factor; must stay positive and finite.
fn ratio(num: f64, den: f64, dimension: Dimension) -> Result<f64, ViewBoxError> {
    let r = num / den;
    if !(r > 0.0) || !r.is_finite() {
        return Err(ViewBoxError::InvalidDimension {
            dimension,
            value: den,
        });
    }
    Ok(r)
}

/// A huge origin times a large scale can still overflow the translation.
fn finite(t: Transform, view_box: &ViewBox) -> Result<Transform, ViewBoxError> {
    if !t.translate_x.is_finite() {
        return Err(ViewBoxError::InvalidDimension {
            dimension: Dimension::ViewBoxOrigin,
            value: view_box.min_x,
        });
    }
    if !t.translate_y.is_finite() {
        return Err(ViewBoxError::InvalidDimension {
            dimension: Dimension::ViewBoxOrigin,
            value: view_box.min_y,
        });
    }
    Ok(t)
}

fn positive(value: f64, dimension: Dimension) -> Result<(), ViewBoxError> {
    // `!(value > 0.0)` also catches NaN.
    if !(value > 0.0) || !value.is_finite() {
        return Err(ViewBoxError::InvalidDimension { dimension, value });
    }
    Ok(())
}
