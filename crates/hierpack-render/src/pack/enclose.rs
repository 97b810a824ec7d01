//! Minimal enclosing circle of a set of circles (Welzl-style move-to-front with a basis of at
//! most three circles).
//!
//! Input order is shuffled with a fixed-seed LCG, so results are reproducible across runs.

use super::Circle;
use hierpack_core::geom::point;

/// Basis restarts allowed per input circle before giving up on an exact answer.
const RESTARTS_PER_CIRCLE: usize = 64;

struct Lcg(u64);

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    fn new() -> Self {
        Self(1)
    }

    fn next_f64(&mut self) -> f64 {
        self.0 = (Self::A * self.0 + Self::C) % Self::M;
        self.0 as f64 / Self::M as f64
    }
}

fn shuffle(items: &mut [Circle], rng: &mut Lcg) {
    let mut m = items.len();
    while m > 0 {
        let i = (rng.next_f64() * m as f64) as usize;
        m -= 1;
        items.swap(m, i.min(m));
    }
}

pub(crate) fn enclose(circles: &[Circle]) -> Circle {
    if circles.is_empty() {
        return Circle::new(0.0, 0.0, 0.0);
    }

    let mut items = circles.to_vec();
    shuffle(&mut items, &mut Lcg::new());

    let mut basis: Vec<Circle> = Vec::new();
    let mut e: Option<Circle> = None;
    let mut restarts = 0usize;
    let budget = items.len() * RESTARTS_PER_CIRCLE;
    let mut i = 0usize;
    while i < items.len() {
        let p = items[i];
        if e.is_some_and(|e| encloses_weak(&e, &p)) {
            i += 1;
            continue;
        }

        restarts += 1;
        let next = extend_basis(&basis, p)
            .map(|b| (enclose_basis(&b), b))
            .filter(|(c, _)| c.is_finite());
        match next {
            Some((c, b)) if restarts <= budget => {
                basis = b;
                e = Some(c);
                i = 0;
            }
            _ => {
                tracing::warn!(
                    circles = circles.len(),
                    restarts,
                    "enclosing circle did not converge; using bounding enclosure"
                );
                return bounding_enclosure(circles);
            }
        }
    }

    e.unwrap_or_else(|| bounding_enclosure(circles))
}

/// A circle around the bounding box centre that contains every input circle. Not minimal.
fn bounding_enclosure(circles: &[Circle]) -> Circle {
    let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for c in circles {
        x0 = x0.min(c.center.x - c.r);
        y0 = y0.min(c.center.y - c.r);
        x1 = x1.max(c.center.x + c.r);
        y1 = y1.max(c.center.y + c.r);
    }
    let center = point((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    let r = circles
        .iter()
        .map(|c| center.distance_to(c.center) + c.r)
        .fold(0.0, f64::max);
    Circle { center, r }
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }

    for &b in basis {
        if encloses_not(&p, &b) && encloses_weak_all(&enclose_basis2(&b, &p), basis) {
            return Some(vec![b, p]);
        }
    }

    for (i, bi) in basis.iter().enumerate() {
        for bj in &basis[i + 1..] {
            if encloses_not(&enclose_basis2(bi, bj), &p)
                && encloses_not(&enclose_basis2(bi, &p), bj)
                && encloses_not(&enclose_basis2(bj, &p), bi)
                && encloses_weak_all(&enclose_basis3(bi, bj, &p), basis)
            {
                return Some(vec![*bi, *bj, p]);
            }
        }
    }

    None
}

/// `a` does not contain `b`.
fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let d = b.center - a.center;
    dr < 0.0 || dr * dr < d.square_length()
}

/// `a` contains `b`, with a relative tolerance.
fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let d = b.center - a.center;
    dr > 0.0 && dr * dr > d.square_length()
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => bounding_enclosure(basis),
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let d = b.center - a.center;
    let l = d.length();
    if l == 0.0 {
        return if a.r >= b.r { *a } else { *b };
    }
    let dr = b.r - a.r;
    Circle {
        center: point(
            (a.center.x + b.center.x + d.x / l * dr) / 2.0,
            (a.center.y + b.center.y + d.y / l * dr) / 2.0,
        ),
        r: (l + a.r + b.r) / 2.0,
    }
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let (x1, y1, r1) = (a.center.x, a.center.y, a.r);
    let (x2, y2, r2) = (b.center.x, b.center.y, b.r);
    let (x3, y3, r3) = (c.center.x, c.center.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle {
        center: point(x1 + xa + xb * r, y1 + ya + yb * r),
        r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(outer: &Circle, inner: &Circle) -> bool {
        outer.center.distance_to(inner.center) + inner.r <= outer.r + 1e-6
    }

    #[test]
    fn single_circle_encloses_itself() {
        let c = Circle::new(3.0, -2.0, 5.0);
        assert_eq!(enclose(&[c]), c);
    }

    #[test]
    fn two_circles_span_their_diameter() {
        let e = enclose(&[Circle::new(-1.0, 0.0, 1.0), Circle::new(2.0, 0.0, 2.0)]);
        assert!((e.r - 3.0).abs() < 1e-9);
        assert!((e.center.x - 1.0).abs() < 1e-9);
        assert!(e.center.y.abs() < 1e-9);
    }

    #[test]
    fn three_equal_circles_in_a_triangle() {
        let s = 3f64.sqrt();
        let circles = [
            Circle::new(0.0, 2.0 / s, 1.0),
            Circle::new(-1.0, -1.0 / s, 1.0),
            Circle::new(1.0, -1.0 / s, 1.0),
        ];
        let e = enclose(&circles);
        assert!((e.r - (1.0 + 2.0 / s)).abs() < 1e-6, "r = {}", e.r);
        for c in &circles {
            assert!(contains(&e, c));
        }
    }

    #[test]
    fn nested_circle_is_absorbed() {
        let e = enclose(&[Circle::new(0.0, 0.0, 10.0), Circle::new(2.0, 1.0, 1.0)]);
        assert_eq!(e, Circle::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn many_circles_are_all_contained_and_result_is_stable() {
        let circles = (0..25)
            .map(|i| {
                let t = i as f64 * 0.7;
                Circle::new(t.cos() * i as f64, t.sin() * i as f64, 1.0 + (i % 4) as f64)
            })
            .collect::<Vec<_>>();
        let e = enclose(&circles);
        for c in &circles {
            assert!(contains(&e, c), "{c:?} escapes {e:?}");
        }
        assert_eq!(enclose(&circles), e);
    }

    #[test]
    fn bounding_enclosure_contains_everything() {
        let circles = [Circle::new(0.0, 0.0, 1.0), Circle::new(10.0, 4.0, 3.0)];
        let e = bounding_enclosure(&circles);
        for c in &circles {
            assert!(contains(&e, c));
        }
    }
}
