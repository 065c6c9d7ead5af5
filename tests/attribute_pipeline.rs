//! End-to-end: attribute text → parsed marker → positions along a path →
//! drawing calls, checked against hand-computed geometry.

#![cfg(feature = "alloc")]

use zenviewbox::*;

/// Parse a `<marker>` element's attributes the way a document loader would.
fn marker_from_attrs(attrs: &[(&str, &str)]) -> Result<Marker, ParseError> {
    let mut m = Marker::new();
    for &(key, value) in attrs {
        match key {
            "viewBox" => m = m.with_view_box(value.parse()?),
            "preserveAspectRatio" => m = m.with_preserve_aspect_ratio(value.parse()?),
            "orient" => m = m.with_orient(value.parse()?),
            "markerUnits" => m = m.with_units(value.parse()?),
            "refX" => m.ref_x = number(value)?,
            "refY" => m.ref_y = number(value)?,
            "markerWidth" => m.marker_width = number(value)?,
            "markerHeight" => m.marker_height = number(value)?,
            other => panic!("unexpected attribute {other}"),
        }
    }
    Ok(m)
}

fn number(value: &str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber { at: 0 })
}

fn assert_point(p: Point, x: f64, y: f64) {
    assert!(
        (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
        "{p:?} != ({x}, {y})"
    );
}

/// The classic arrowhead: a 10×10 triangle pointing +x, tip at (10, 5).
fn arrowhead(orient: &str) -> Marker {
    marker_from_attrs(&[
        ("viewBox", "0 0 10 10"),
        ("refX", "10"),
        ("refY", "5"),
        ("markerWidth", "6"),
        ("markerHeight", "6"),
        ("orient", orient),
    ])
    .unwrap()
}

/// Records the full transform at each `draw_content` call.
struct TransformLog {
    stack: Vec<Affine>,
    current: Affine,
    draws: Vec<Affine>,
    clips: usize,
}

impl TransformLog {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            current: Affine::IDENTITY,
            draws: Vec::new(),
            clips: 0,
        }
    }
}

impl MarkerCanvas for TransformLog {
    fn save(&mut self) {
        self.stack.push(self.current);
    }
    fn restore(&mut self) {
        self.current = self.stack.pop().expect("balanced save/restore");
    }
    fn concat(&mut self, m: &Affine) {
        self.current = self.current * *m;
    }
    fn clip_rect(&mut self, _rect: &Rect) {
        self.clips += 1;
    }
    fn draw_content(&mut self) {
        self.draws.push(self.current);
    }
}

#[test]
fn arrowhead_tip_sits_on_path_end() {
    let arrow = arrowhead("auto");
    let path = [
        PathSegment::MoveTo(Point::new(0.0, 0.0)),
        PathSegment::LineTo(Point::new(0.0, 40.0)),
    ];
    let set = MarkerSet {
        end: Some(&arrow),
        ..MarkerSet::default()
    };

    let mut log = TransformLog::new();
    assert_eq!(render_markers(&mut log, &set, &path, 2.0), 1);
    assert!(log.stack.is_empty());
    assert_eq!(log.clips, 1);

    let m = log.draws[0];
    // Tip lands on the vertex.
    assert_point(m.apply(Point::new(10.0, 5.0)), 0.0, 40.0);
    // Path points down, so the arrow's back edge is above the tip.
    // viewBox 10 → viewport 6 (scale 0.6) → stroke 2 (scale 1.2 total).
    assert_point(m.apply(Point::new(0.0, 5.0)), 0.0, 28.0);
}

#[test]
fn auto_start_reverse_points_start_marker_backwards() {
    let arrow = arrowhead("auto-start-reverse");
    let path = [
        PathSegment::MoveTo(Point::new(0.0, 0.0)),
        PathSegment::LineTo(Point::new(100.0, 0.0)),
    ];
    let mut log = TransformLog::new();
    assert_eq!(
        render_markers(&mut log, &MarkerSet::all(&arrow), &path, 1.0),
        2
    );

    let (start, end) = (log.draws[0], log.draws[1]);
    // Start arrow points -x: its back edge is to the right of the tip.
    assert_point(start.apply(Point::new(10.0, 5.0)), 0.0, 0.0);
    assert_point(start.apply(Point::new(0.0, 5.0)), 6.0, 0.0);
    // End arrow points +x.
    assert_point(end.apply(Point::new(10.0, 5.0)), 100.0, 0.0);
    assert_point(end.apply(Point::new(0.0, 5.0)), 94.0, 0.0);
}

#[test]
fn fixed_orient_and_user_space_units() {
    let dot = marker_from_attrs(&[
        ("markerUnits", "userSpaceOnUse"),
        ("orient", "90deg"),
        ("markerWidth", "4"),
        ("markerHeight", "4"),
        ("refX", "2"),
        ("refY", "2"),
    ])
    .unwrap();

    let pos = MarkerPosition::new(MarkerKind::Mid, Point::new(10.0, 10.0), -33.0);
    let placement = dot.placement(&pos, 8.0).unwrap();
    let m = placement.transform();
    assert_point(m.apply(Point::new(2.0, 2.0)), 10.0, 10.0);
    // +x of the marker maps to +y on screen (90° fixed), not scaled by stroke.
    assert_point(m.apply(Point::new(3.0, 2.0)), 10.0, 11.0);
}

#[test]
fn slice_marker_is_clipped_to_viewport() {
    let m = marker_from_attrs(&[
        ("viewBox", "0 0 20 10"),
        ("preserveAspectRatio", "xMidYMid slice"),
        ("markerWidth", "10"),
        ("markerHeight", "10"),
        ("markerUnits", "userSpaceOnUse"),
    ])
    .unwrap();
    let pos = MarkerPosition::new(MarkerKind::Start, Point::ZERO, 0.0);
    let p = m.placement(&pos, 1.0).unwrap();

    // Content scaled to cover height: 20×10 → 20×10 in a 10×10 viewport.
    assert_eq!(p.content.scale_x, 1.0);
    assert_eq!(p.content.translate_x, -5.0);
    assert_eq!(p.clip, Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn bad_attributes_fail_at_parse_time() {
    assert_eq!(
        marker_from_attrs(&[("viewBox", "0 0 10")]).unwrap_err(),
        ParseError::WrongNumberCount {
            expected: 4,
            found: 3
        }
    );
    assert!(marker_from_attrs(&[("preserveAspectRatio", "center")]).is_err());
    assert!(marker_from_attrs(&[("orient", "sideways")]).is_err());
    assert!(marker_from_attrs(&[("markerUnits", "pixels")]).is_err());
    // Overflowing numbers never reach the marker.
    assert_eq!(
        marker_from_attrs(&[("orient", "1e400")]).unwrap_err(),
        ParseError::InvalidNumber { at: 0 }
    );
    assert!(marker_from_attrs(&[("viewBox", "0 0 1e400 1")]).is_err());
}

#[test]
fn zero_size_marker_is_skipped_not_fatal() {
    let m = marker_from_attrs(&[("markerWidth", "0")]).unwrap();
    let path = [
        PathSegment::MoveTo(Point::new(0.0, 0.0)),
        PathSegment::LineTo(Point::new(5.0, 5.0)),
    ];
    let mut log = TransformLog::new();
    assert_eq!(render_markers(&mut log, &MarkerSet::all(&m), &path, 1.0), 0);
    assert!(log.draws.is_empty());
}
