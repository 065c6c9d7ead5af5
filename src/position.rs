//! Marker positions along a path.
//!
//! Walks path segments and produces one [`MarkerPosition`] per vertex,
//! with the direction used by `orient="auto"`. At interior vertices the
//! direction bisects the incoming and outgoing tangents; at open path
//! ends only one tangent exists. Closed subpaths wrap around, so their
//! first and last vertices see both the closing segment and the first
//! segment.
//!
//! Zero-length segments contribute no direction.
//!
//! ```
//! use zenviewbox::{MarkerKind, PathSegment, Point, marker_positions};
//!
//! let path = [
//!     PathSegment::MoveTo(Point::new(0.0, 0.0)),
//!     PathSegment::LineTo(Point::new(10.0, 0.0)),
//!     PathSegment::LineTo(Point::new(10.0, 10.0)),
//! ];
//! let positions = marker_positions(&path);
//!
//! assert_eq!(positions.len(), 3);
//! assert_eq!(positions[1].kind, MarkerKind::Mid);
//! assert!((positions[1].angle - 45.0).abs() < 1e-9);
//! ```

use alloc::vec::Vec;

use num_traits::Float;

use crate::geometry::Point;
use crate::marker::{Marker, MarkerCanvas, MarkerKind, MarkerPosition};

/// One path command, in absolute user-space coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathSegment {
    /// Start a new subpath.
    MoveTo(Point),
    /// Straight line to the point.
    LineTo(Point),
    /// Quadratic Bézier: control point, end point.
    QuadTo(Point, Point),
    /// Cubic Bézier: two control points, end point.
    CubicTo(Point, Point, Point),
    /// Line back to the subpath start.
    Close,
}

/// Tangent direction as a non-zero vector.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Dir {
    dx: f64,
    dy: f64,
}

impl Dir {
    fn between(from: Point, to: Point) -> Option<Dir> {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        (dx != 0.0 || dy != 0.0).then_some(Dir { dx, dy })
    }

    fn degrees(self) -> f64 {
        Float::to_degrees(Float::atan2(self.dy, self.dx))
    }
}

/// A vertex and the tangents on either side of it.
#[derive(Copy, Clone, Debug)]
struct Vertex {
    point: Point,
    incoming: Option<Dir>,
    outgoing: Option<Dir>,
}

impl Vertex {
    fn new(point: Point, incoming: Option<Dir>) -> Self {
        Self {
            point,
            incoming,
            outgoing: None,
        }
    }

    fn angle(&self) -> f64 {
        match (self.incoming, self.outgoing) {
            (Some(i), Some(o)) => bisect(i.degrees(), o.degrees()),
            (Some(d), None) | (None, Some(d)) => d.degrees(),
            (None, None) => 0.0,
        }
    }
}

/// Mean direction of two angles, taking the short way round.
fn bisect(a_in: f64, a_out: f64) -> f64 {
    let mut diff = a_out - a_in;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff <= -180.0 {
        diff += 360.0;
    }
    a_in + diff / 2.0
}

/// First non-zero direction among the candidates.
fn first_dir(candidates: &[(Point, Point)]) -> Option<Dir> {
    candidates.iter().find_map(|&(a, b)| Dir::between(a, b))
}

fn collect_vertices(segments: &[PathSegment]) -> Vec<Vertex> {
    let mut vertices: Vec<Vertex> = Vec::with_capacity(segments.len() + 1);
    let mut current = Point::ZERO;
    let mut subpath_start = 0usize;
    let mut closed = false;

    for segment in segments {
        let draws = !matches!(segment, PathSegment::MoveTo(_) | PathSegment::Close);
        // Drawing commands before any MoveTo start at the origin; after a
        // Close they open a new subpath at the closed one's start point.
        if draws && (vertices.is_empty() || closed) {
            subpath_start = vertices.len();
            vertices.push(Vertex::new(current, None));
            closed = false;
        }

        let (end, leaving, arriving) = match *segment {
            PathSegment::MoveTo(p) => {
                subpath_start = vertices.len();
                vertices.push(Vertex::new(p, None));
                current = p;
                closed = false;
                continue;
            }
            PathSegment::LineTo(p) => {
                let d = Dir::between(current, p);
                (p, d, d)
            }
            PathSegment::QuadTo(c, p) => (
                p,
                first_dir(&[(current, c), (current, p)]),
                first_dir(&[(c, p), (current, p)]),
            ),
            PathSegment::CubicTo(c1, c2, p) => (
                p,
                first_dir(&[(current, c1), (current, c2), (current, p)]),
                first_dir(&[(c2, p), (c1, p), (current, p)]),
            ),
            PathSegment::Close => {
                if !closed {
                    close_subpath(&mut vertices, subpath_start, current);
                    closed = true;
                }
                if let Some(start) = vertices.get(subpath_start) {
                    current = start.point;
                }
                continue;
            }
        };

        if let Some(last) = vertices.last_mut()
            && last.outgoing.is_none()
        {
            last.outgoing = leaving;
        }
        vertices.push(Vertex::new(end, arriving));
        current = end;
    }

    vertices
}

fn close_subpath(vertices: &mut Vec<Vertex>, start: usize, current: Point) {
    let Some(first) = vertices.get(start).copied() else {
        return;
    };

    match Dir::between(current, first.point) {
        Some(closing) => {
            if let Some(last) = vertices.last_mut() {
                last.outgoing = Some(closing);
            }
            let mut end = Vertex::new(first.point, Some(closing));
            end.outgoing = first.outgoing;
            vertices.push(end);
            vertices[start].incoming = Some(closing);
        }
        None => {
            // Already back at the start: the last vertex doubles as the
            // closing vertex.
            let last_index = vertices.len() - 1;
            if last_index == start {
                return;
            }
            let arriving = vertices[last_index].incoming;
            vertices[last_index].outgoing = first.outgoing;
            vertices[start].incoming = arriving;
        }
    }
}

/// Marker positions for every vertex of `segments`.
///
/// The first vertex is [`MarkerKind::Start`], the last is
/// [`MarkerKind::End`], everything between is [`MarkerKind::Mid`]. A path
/// with a single vertex yields both a start and an end position there.
pub fn marker_positions(segments: &[PathSegment]) -> Vec<MarkerPosition> {
    let vertices = collect_vertices(segments);
    let last = vertices.len().saturating_sub(1);

    let mut positions = Vec::with_capacity(vertices.len() + 1);
    for (i, v) in vertices.iter().enumerate() {
        let kind = match i {
            0 => MarkerKind::Start,
            i if i == last => MarkerKind::End,
            _ => MarkerKind::Mid,
        };
        positions.push(MarkerPosition::new(kind, v.point, v.angle()));
    }
    if let [only] = vertices.as_slice() {
        positions.push(MarkerPosition::new(MarkerKind::End, only.point, only.angle()));
    }
    positions
}

/// The `marker-start`, `marker-mid` and `marker-end` references of a path.
#[derive(Copy, Clone, Debug, Default)]
pub struct MarkerSet<'a> {
    pub start: Option<&'a Marker>,
    pub mid: Option<&'a Marker>,
    pub end: Option<&'a Marker>,
}

impl<'a> MarkerSet<'a> {
    /// The same marker at every vertex (the `marker` shorthand).
    pub fn all(marker: &'a Marker) -> Self {
        Self {
            start: Some(marker),
            mid: Some(marker),
            end: Some(marker),
        }
    }

    fn for_kind(&self, kind: MarkerKind) -> Option<&'a Marker> {
        match kind {
            MarkerKind::Start => self.start,
            MarkerKind::Mid => self.mid,
            MarkerKind::End => self.end,
        }
    }
}

/// Draw the markers of a stroked path. Returns how many were drawn.
///
/// Markers with invalid geometry are skipped (see [`Marker::render`]).
pub fn render_markers<C: MarkerCanvas + ?Sized>(
    canvas: &mut C,
    markers: &MarkerSet<'_>,
    segments: &[PathSegment],
    stroke_width: f64,
) -> usize {
    if markers.start.is_none() && markers.mid.is_none() && markers.end.is_none() {
        return 0;
    }
    let mut drawn = 0;
    for pos in marker_positions(segments) {
        if let Some(marker) = markers.for_kind(pos.kind)
            && marker.render(canvas, &pos, stroke_width)
        {
            drawn += 1;
        }
    }
    drawn
}
