//! Parametric invariants for viewBox fitting.
//!
//! Sweeps viewBox/viewport sizes, origins and every alignment policy, and
//! checks the geometric guarantees of each policy:
//!
//! - `none` scales each axis to the exact ratio
//! - `meet` keeps the whole viewBox inside the viewport
//! - `slice` covers the whole viewport
//! - the leftover space is split according to Min/Mid/Max
//!
//! All failures are collected and reported together.

use zenviewbox::*;

const EPS: f64 = 1e-9;

const SIZES: [f64; 9] = [0.5, 1.0, 3.0, 10.0, 24.0, 100.0, 333.3, 1920.0, 1e6];
const ORIGINS: [(f64, f64); 4] = [(0.0, 0.0), (-50.0, 25.0), (12.5, -7.25), (1e4, 1e4)];

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0)
}

fn cases() -> Vec<(ViewBox, Size)> {
    let mut out = Vec::new();
    for &vw in &SIZES {
        for &vh in &SIZES {
            for &(mx, my) in &ORIGINS {
                // A handful of viewports per viewBox keeps the grid tractable.
                for (pw, ph) in [(vw, vh), (vw * 2.0, vh), (vw, vh * 3.0), (7.0, 700.0)] {
                    out.push((ViewBox::new(mx, my, vw, vh), Size::new(pw, ph)));
                }
            }
        }
    }
    out
}

#[test]
fn parametric_invariants() {
    let mut failures = Vec::new();
    let mut checked = 0u64;

    for (vb, vp) in cases() {
        for align in AlignmentPolicy::ALL {
            for mos in [MeetOrSlice::Meet, MeetOrSlice::Slice] {
                let tag = format!("{} {} {vb:?} -> {vp:?}", align.keyword(), mos.keyword());
                let t = match compute(vb, vp, align, mos) {
                    Ok(t) => t,
                    Err(e) => {
                        failures.push(format!("{tag}: error {e:?}"));
                        continue;
                    }
                };
                checked += 1;

                if !(t.scale_x > 0.0 && t.scale_y > 0.0) {
                    failures.push(format!("{tag}: non-positive scale {t:?}"));
                }

                let mapped = t.map_view_box(&vb);
                // Large origins cancel against the translation; allow for it.
                let slack = EPS
                    * 10.0
                    * [
                        1.0,
                        (vb.min_x * t.scale_x).abs(),
                        (vb.min_y * t.scale_y).abs(),
                        vp.width,
                        vp.height,
                    ]
                    .into_iter()
                    .fold(0.0, f64::max);

                match align {
                    AlignmentPolicy::None => {
                        if !close(t.scale_x, vp.width / vb.width)
                            || !close(t.scale_y, vp.height / vb.height)
                        {
                            failures.push(format!("{tag}: none scale mismatch {t:?}"));
                        }
                        if mapped.x.abs() > slack || mapped.y.abs() > slack {
                            failures.push(format!("{tag}: none origin {mapped:?}"));
                        }
                    }
                    AlignmentPolicy::Aligned { x, y } => {
                        if !t.is_uniform() {
                            failures.push(format!("{tag}: non-uniform {t:?}"));
                        }
                        let fits_w = mapped.width <= vp.width * (1.0 + EPS);
                        let fits_h = mapped.height <= vp.height * (1.0 + EPS);
                        let covers_w = mapped.width >= vp.width * (1.0 - EPS);
                        let covers_h = mapped.height >= vp.height * (1.0 - EPS);
                        match mos {
                            MeetOrSlice::Meet if !(fits_w && fits_h) => {
                                failures.push(format!("{tag}: meet overflows {mapped:?}"));
                            }
                            MeetOrSlice::Slice if !(covers_w && covers_h) => {
                                failures.push(format!("{tag}: slice leaves gaps {mapped:?}"));
                            }
                            _ => {}
                        }

                        let extra_x = vp.width - mapped.width;
                        let extra_y = vp.height - mapped.height;
                        let want_x = match x {
                            AxisAlign::Min => 0.0,
                            AxisAlign::Mid => extra_x / 2.0,
                            AxisAlign::Max => extra_x,
                        };
                        let want_y = match y {
                            AxisAlign::Min => 0.0,
                            AxisAlign::Mid => extra_y / 2.0,
                            AxisAlign::Max => extra_y,
                        };
                        if (mapped.x - want_x).abs() > slack || (mapped.y - want_y).abs() > slack {
                            failures.push(format!(
                                "{tag}: placed at ({}, {}), want ({want_x}, {want_y})",
                                mapped.x, mapped.y
                            ));
                        }
                    }
                }
            }
        }
    }

    assert!(checked > 0);
    assert!(
        failures.is_empty(),
        "{} of {checked} cases failed:\n{}",
        failures.len(),
        failures
            .iter()
            .take(50)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[test]
fn any_non_positive_dimension_fails() {
    let bad = [0.0, -1.0, -0.0, f64::NAN];
    let good_vb = ViewBox::new(0.0, 0.0, 10.0, 10.0);
    let good_vp = Size::new(10.0, 10.0);

    for &v in &bad {
        let inputs = [
            (ViewBox { width: v, ..good_vb }, good_vp),
            (ViewBox { height: v, ..good_vb }, good_vp),
            (good_vb, Size { width: v, ..good_vp }),
            (good_vb, Size { height: v, ..good_vp }),
        ];
        for (vb, vp) in inputs {
            for align in AlignmentPolicy::ALL {
                for mos in [MeetOrSlice::Meet, MeetOrSlice::Slice] {
                    assert!(
                        matches!(
                            compute(vb, vp, align, mos),
                            Err(ViewBoxError::InvalidDimension { .. })
                        ),
                        "{vb:?} {vp:?} {align:?} {mos:?} should fail"
                    );
                }
            }
        }
    }
}

#[test]
fn identical_inputs_give_identical_output() {
    for (vb, vp) in cases().into_iter().step_by(7) {
        for align in AlignmentPolicy::ALL {
            for mos in [MeetOrSlice::Meet, MeetOrSlice::Slice] {
                let a = compute(vb, vp, align, mos).unwrap();
                let b = compute(vb, vp, align, mos).unwrap();
                let bits = |t: Transform| {
                    [
                        t.scale_x.to_bits(),
                        t.scale_y.to_bits(),
                        t.translate_x.to_bits(),
                        t.translate_y.to_bits(),
                    ]
                };
                assert_eq!(bits(a), bits(b));
            }
        }
    }
}

#[test]
fn visible_rect_stays_inside_viewport() {
    for (vb, vp) in cases() {
        for align in AlignmentPolicy::ALL {
            for mos in [MeetOrSlice::Meet, MeetOrSlice::Slice] {
                let par = PreserveAspectRatio::new(align, mos);
                let r = visible_rect(vb, vp, par).unwrap();
                let slack = EPS * vp.width.max(vp.height).max(1.0) * 10.0;
                assert!(
                    r.x >= -slack
                        && r.y >= -slack
                        && r.max_x() <= vp.width + slack
                        && r.max_y() <= vp.height + slack,
                    "{par:?} {vb:?} {vp:?}: {r:?}"
                );
            }
        }
    }
}
