//! Value types shared by the fitting, parsing and marker modules.
//!
//! Everything here is `Copy`, allocation-free and works in user units
//! (`f64`). SVG's y-down coordinate convention applies throughout: a
//! positive rotation turns the x axis towards the y axis (clockwise on
//! screen).

use num_traits::Float;

/// A point in user units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width × height in user units.
///
/// Used as the viewport a viewBox is fitted into. Positive dimensions
/// are required by [`compute`](crate::aspect::compute); the type itself
/// does not enforce it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in user units.
    pub width: f64,
    /// Height in user units.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Source coordinate rectangle of vector content (`viewBox` attribute).
///
/// `min_x`/`min_y` may be any finite value; `width`/`height` must be
/// positive for the rectangle to be usable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Create a new viewBox.
    pub const fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Width × height of the viewBox.
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Axis-aligned rectangle in user units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect at the origin covering `size`.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Right edge.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Overlap of two rects. `None` when they don't share any area.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = Float::max(self.x, other.x);
        let y0 = Float::max(self.y, other.y);
        let x1 = Float::min(self.max_x(), other.max_x());
        let y1 = Float::min(self.max_y(), other.max_y());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Scale followed by translation, per axis.
///
/// Maps a source point `p` to `(p.x * scale_x + translate_x,
/// p.y * scale_y + translate_y)`. This is the output of viewBox fitting;
/// see [`compute`](crate::aspect::compute).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    /// No scaling, no translation.
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Map a point from source (viewBox) space to destination space.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale_x + self.translate_x,
            p.y * self.scale_y + self.translate_y,
        )
    }

    /// Where the viewBox rectangle lands in destination space.
    pub fn map_view_box(&self, vb: &ViewBox) -> Rect {
        let origin = self.apply(Point::new(vb.min_x, vb.min_y));
        Rect::new(
            origin.x,
            origin.y,
            vb.width * self.scale_x,
            vb.height * self.scale_y,
        )
    }

    /// Whether both axes use the same scale factor.
    pub fn is_uniform(&self) -> bool {
        self.scale_x == self.scale_y
    }

    /// The equivalent full affine matrix.
    pub fn to_affine(&self) -> Affine {
        Affine::new(
            self.scale_x,
            0.0,
            0.0,
            self.scale_y,
            self.translate_x,
            self.translate_y,
        )
    }
}

impl From<Transform> for Affine {
    fn from(t: Transform) -> Self {
        t.to_affine()
    }
}

/// 2×3 affine matrix in SVG `matrix(a b c d e f)` order.
///
/// ```text
///     | a  c  e |
///     | b  d  f |
///     | 0  0  1 |
/// ```
///
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`. `A * B` applies `B` first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Create from the six matrix coefficients.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Pure translation.
    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Pure scale about the origin.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation about the origin, in degrees.
    pub fn rotate_degrees(degrees: f64) -> Self {
        if degrees == 0.0 {
            return Self::IDENTITY;
        }
        let (s, c) = Float::sin_cos(Float::to_radians(degrees));
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// `self * inner`: the result applies `inner` first, then `self`.
    pub fn pre_concat(&self, inner: &Affine) -> Affine {
        Affine {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    /// Apply `self` first, then `outer`.
    pub fn then(&self, outer: &Affine) -> Affine {
        outer.pre_concat(self)
    }

    /// Map a point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Whether every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl core::ops::Mul for Affine {
    type Output = Affine;

    fn mul(self, rhs: Affine) -> Affine {
        self.pre_concat(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        Float::abs(a - b) < 1e-9
    }

    fn assert_point(p: Point, x: f64, y: f64) {
        assert!(close(p.x, x) && close(p.y, y), "{p:?} != ({x}, {y})");
    }

    #[test]
    fn transform_apply_scales_then_translates() {
        let t = Transform {
            scale_x: 2.0,
            scale_y: 3.0,
            translate_x: 10.0,
            translate_y: -5.0,
        };
        assert_point(t.apply(Point::new(1.0, 1.0)), 12.0, -2.0);
    }

    #[test]
    fn transform_to_affine_agrees_with_apply() {
        let t = Transform {
            scale_x: 0.5,
            scale_y: 4.0,
            translate_x: 7.0,
            translate_y: 1.0,
        };
        let p = Point::new(-3.0, 2.5);
        let a = Affine::from(t);
        assert_eq!(t.apply(p), a.apply(p));
    }

    #[test]
    fn map_view_box_offsets_min_corner() {
        let t = Transform {
            scale_x: 2.0,
            scale_y: 2.0,
            translate_x: 20.0,
            translate_y: 20.0,
        };
        let r = t.map_view_box(&ViewBox::new(-10.0, -10.0, 50.0, 25.0));
        assert_eq!(r, Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn rotate_quarter_turn_is_clockwise_on_screen() {
        let r = Affine::rotate_degrees(90.0);
        assert_point(r.apply(Point::new(1.0, 0.0)), 0.0, 1.0);
        assert_point(r.apply(Point::new(0.0, 1.0)), -1.0, 0.0);
    }

    #[test]
    fn pre_concat_applies_inner_first() {
        let t = Affine::translate(10.0, 0.0);
        let s = Affine::scale(2.0, 2.0);
        // scale first, then translate
        assert_point((t * s).apply(Point::new(1.0, 1.0)), 12.0, 2.0);
        // translate first, then scale
        assert_point(t.then(&s).apply(Point::new(1.0, 1.0)), 22.0, 2.0);
    }

    #[test]
    fn identity_is_neutral() {
        let m = Affine::new(1.5, 0.2, -0.3, 0.9, 4.0, 5.0);
        assert_eq!(m * Affine::IDENTITY, m);
        assert_eq!(Affine::IDENTITY * m, m);
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(50.0, -10.0, 100.0, 30.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(50.0, 0.0, 50.0, 20.0)));
        let far = Rect::new(200.0, 200.0, 1.0, 1.0);
        assert_eq!(a.intersect(&far), None);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), None);
    }
}
