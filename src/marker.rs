//! SVG `<marker>` placement.
//!
//! A marker is a small symbol (typically an arrowhead) drawn at path
//! vertices. Placing one combines four things:
//!
//! 1. the vertex position and the path direction there ([`MarkerPosition`]),
//! 2. the marker's `orient` rule,
//! 3. `markerUnits` scaling by the stroke width,
//! 4. the marker viewport (`markerWidth` × `markerHeight`), its optional
//!    `viewBox` + `preserveAspectRatio`, and the `refX`/`refY` anchor.
//!
//! The graphics context stays opaque: [`Marker::render`] drives any
//! [`MarkerCanvas`] implementation.
//!
//! ```text
//!   user space ──translate(origin)──rotate(angle)──scale(stroke)──┐
//!                                                                 │
//!   marker viewport (clip 0,0,w,h) ◄──translate(-ref)─────────────┘
//!        │
//!        └──viewBox transform──► marker content
//! ```

use crate::aspect::{AlignmentPolicy, Dimension, MeetOrSlice, PreserveAspectRatio, ViewBoxError};
use crate::geometry::{Affine, Point, Rect, Size, Transform, ViewBox};

/// Coordinate system for `markerWidth`, `markerHeight` and content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MarkerUnits {
    /// Scaled by the stroke width of the referencing path.
    #[default]
    StrokeWidth,
    /// User units of the referencing path, no extra scaling.
    UserSpaceOnUse,
}

/// Marker rotation rule (`orient` attribute).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Orient {
    /// Fixed angle in degrees, clockwise.
    Angle(f64),
    /// Follow the path direction at the vertex.
    Auto,
    /// Like [`Auto`](Self::Auto), but start markers point backwards.
    AutoStartReverse,
}

impl Default for Orient {
    fn default() -> Self {
        Self::Angle(0.0)
    }
}

/// Which kind of vertex a marker sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// First vertex of the path (`marker-start`).
    Start,
    /// Any interior vertex (`marker-mid`).
    Mid,
    /// Last vertex of the path (`marker-end`).
    End,
}

/// A vertex where a marker is drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MarkerPosition {
    pub kind: MarkerKind,
    /// Vertex in the path's user space.
    pub origin: Point,
    /// Path direction at the vertex, in degrees (0 = +x, 90 = +y).
    pub angle: f64,
}

impl MarkerPosition {
    /// Create a new position.
    pub const fn new(kind: MarkerKind, origin: Point, angle: f64) -> Self {
        Self {
            kind,
            origin,
            angle,
        }
    }
}

/// Resolved geometry for drawing one marker instance.
///
/// Draw by concatenating [`viewport`](Self::viewport), clipping to
/// [`clip`](Self::clip), then concatenating [`content`](Self::content).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MarkerPlacement {
    /// Maps marker viewport coordinates into the path's user space.
    pub viewport: Affine,
    /// Marker viewport rectangle, in viewport coordinates.
    pub clip: Rect,
    /// Maps marker content (viewBox) coordinates into the marker viewport.
    pub content: Transform,
}

impl MarkerPlacement {
    /// Single matrix from marker content coordinates to user space.
    pub fn transform(&self) -> Affine {
        self.viewport * self.content.to_affine()
    }
}

/// Drawing surface for markers.
///
/// Implemented by the host's graphics context. Calls arrive balanced:
/// every `save` is matched by a `restore`.
pub trait MarkerCanvas {
    /// Push the current transform and clip.
    fn save(&mut self);
    /// Pop back to the last `save`.
    fn restore(&mut self);
    /// Pre-multiply `m` onto the current transform.
    fn concat(&mut self, m: &Affine);
    /// Intersect the clip with `rect`, in current coordinates.
    fn clip_rect(&mut self, rect: &Rect);
    /// Draw the marker's child content in current coordinates.
    fn draw_content(&mut self);
}

/// A `<marker>` element's geometry attributes.
///
/// Defaults match SVG: 3×3 viewport, reference point at the origin,
/// `markerUnits="strokeWidth"`, `orient="0"`, no viewBox.
///
/// ```
/// use zenviewbox::{Marker, MarkerKind, MarkerPosition, Orient, Point, ViewBox};
///
/// let arrow = Marker::new()
///     .with_size(10.0, 10.0)
///     .with_view_box(ViewBox::new(0.0, 0.0, 10.0, 10.0))
///     .with_ref(10.0, 5.0)
///     .with_orient(Orient::Auto);
///
/// let at = MarkerPosition::new(MarkerKind::End, Point::new(100.0, 50.0), 0.0);
/// let placement = arrow.placement(&at, 1.0).unwrap();
///
/// // The arrow tip (refX, refY) lands exactly on the vertex.
/// let tip = placement.transform().apply(Point::new(10.0, 5.0));
/// assert_eq!(tip, Point::new(100.0, 50.0));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Marker {
    /// Reference point x, in content (viewBox) coordinates.
    pub ref_x: f64,
    /// Reference point y, in content (viewBox) coordinates.
    pub ref_y: f64,
    pub marker_width: f64,
    pub marker_height: f64,
    pub marker_units: MarkerUnits,
    pub orient: Orient,
    pub view_box: Option<ViewBox>,
    pub preserve_aspect_ratio: PreserveAspectRatio,
}

impl Default for Marker {
    fn default() -> Self {
        Self::new()
    }
}

impl Marker {
    /// A marker with SVG default attributes.
    pub const fn new() -> Self {
        Self {
            ref_x: 0.0,
            ref_y: 0.0,
            marker_width: 3.0,
            marker_height: 3.0,
            marker_units: MarkerUnits::StrokeWidth,
            orient: Orient::Angle(0.0),
            view_box: None,
            preserve_aspect_ratio: PreserveAspectRatio::new(
                AlignmentPolicy::X_MID_Y_MID,
                MeetOrSlice::Meet,
            ),
        }
    }

    /// Set `refX`/`refY`.
    pub fn with_ref(mut self, ref_x: f64, ref_y: f64) -> Self {
        self.ref_x = ref_x;
        self.ref_y = ref_y;
        self
    }

    /// Set `markerWidth`/`markerHeight`.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.marker_width = width;
        self.marker_height = height;
        self
    }

    /// Set `markerUnits`.
    pub fn with_units(mut self, units: MarkerUnits) -> Self {
        self.marker_units = units;
        self
    }

    /// Set `orient`.
    pub fn with_orient(mut self, orient: Orient) -> Self {
        self.orient = orient;
        self
    }

    /// Set the marker's `viewBox`.
    pub fn with_view_box(mut self, view_box: ViewBox) -> Self {
        self.view_box = Some(view_box);
        self
    }

    /// Set `preserveAspectRatio`; only used together with a viewBox.
    pub fn with_preserve_aspect_ratio(mut self, par: PreserveAspectRatio) -> Self {
        self.preserve_aspect_ratio = par;
        self
    }

    /// Marker viewport size in marker units.
    pub fn viewport_size(&self) -> Size {
        Size::new(self.marker_width, self.marker_height)
    }

    /// Rotation in degrees for a marker at `position`.
    pub fn resolve_angle(&self, position: &MarkerPosition) -> f64 {
        match self.orient {
            Orient::Angle(a) => a,
            Orient::Auto => position.angle,
            Orient::AutoStartReverse if position.kind == MarkerKind::Start => {
                position.angle + 180.0
            }
            Orient::AutoStartReverse => position.angle,
        }
    }

    /// Compute where and how to draw this marker at `position`.
    ///
    /// Fails with [`ViewBoxError::InvalidDimension`] when the marker
    /// viewport or viewBox is empty, when `markerUnits="strokeWidth"`
    /// and `stroke_width` is not positive, or when the angle, reference
    /// point or origin is not finite. SVG treats all of these as
    /// "don't render".
    pub fn placement(
        &self,
        position: &MarkerPosition,
        stroke_width: f64,
    ) -> Result<MarkerPlacement, ViewBoxError> {
        let viewport = self.viewport_size();

        let content = match self.view_box {
            Some(vb) => self.preserve_aspect_ratio.compute(vb, viewport)?,
            None => {
                check_viewport(viewport)?;
                Transform::IDENTITY
            }
        };

        let units = match self.marker_units {
            MarkerUnits::StrokeWidth => {
                if !(stroke_width > 0.0) || !stroke_width.is_finite() {
                    return Err(ViewBoxError::InvalidDimension {
                        dimension: Dimension::StrokeWidth,
                        value: stroke_width,
                    });
                }
                stroke_width
            }
            MarkerUnits::UserSpaceOnUse => 1.0,
        };

        let angle = self.resolve_angle(position);
        check_finite(&[angle], Dimension::MarkerAngle)?;
        check_finite(&[self.ref_x, self.ref_y], Dimension::MarkerRef)?;
        check_finite(
            &[position.origin.x, position.origin.y],
            Dimension::MarkerOrigin,
        )?;

        // The reference point is given in content coordinates.
        let anchor = content.apply(Point::new(self.ref_x, self.ref_y));

        let viewport_to_user = Affine::translate(position.origin.x, position.origin.y)
            * Affine::rotate_degrees(angle)
            * Affine::scale(units, units)
            * Affine::translate(-anchor.x, -anchor.y);
        if !viewport_to_user.is_finite() {
            return Err(ViewBoxError::InvalidDimension {
                dimension: Dimension::MarkerTransform,
                value: f64::INFINITY,
            });
        }

        let placement = MarkerPlacement {
            viewport: viewport_to_user,
            clip: Rect::from_size(viewport),
            content,
        };
        tracing::trace!(?position, ?placement, "marker placed");
        Ok(placement)
    }

    /// Draw this marker at `position` on `canvas`.
    ///
    /// Invalid geometry is a content error, not a fault: the marker is
    /// skipped and `false` is returned. Returns `true` if drawn.
    pub fn render<C: MarkerCanvas + ?Sized>(
        &self,
        canvas: &mut C,
        position: &MarkerPosition,
        stroke_width: f64,
    ) -> bool {
        let placement = match self.placement(position, stroke_width) {
            Ok(p) => p,
            Err(error) => {
                tracing::debug!(%error, ?position, "skipping marker");
                return false;
            }
        };

        canvas.save();
        canvas.concat(&placement.viewport);
        canvas.clip_rect(&placement.clip);
        canvas.concat(&placement.content.to_affine());
        canvas.draw_content();
        canvas.restore();
        true
    }
}

fn check_finite(values: &[f64], dimension: Dimension) -> Result<(), ViewBoxError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(ViewBoxError::InvalidDimension { dimension, value }),
        None => Ok(()),
    }
}

fn check_viewport(viewport: Size) -> Result<(), ViewBoxError> {
    for (value, dimension) in [
        (viewport.width, Dimension::ViewportWidth),
        (viewport.height, Dimension::ViewportHeight),
    ] {
        if !(value > 0.0) || !value.is_finite() {
            return Err(ViewBoxError::InvalidDimension { dimension, value });
        }
    }
    Ok(())
}
