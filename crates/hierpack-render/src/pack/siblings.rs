//! Front-chain sibling packing.
//!
//! Circles are placed in slice order. The first two are tangent on the x axis, the third is
//! tangent to both. Every later circle is placed tangent to the current front pair `(a, b)`;
//! when that placement intersects a circle on the front chain, the pair is advanced toward the
//! intersecting circle (whichever side is closer along the chain) and placement is retried.
//! After a successful insertion the front pair is reset to the pair whose weighted midpoint is
//! closest to the origin, which keeps the packing compact.

use super::Circle;
use super::enclose::enclose;
use hierpack_core::geom::{point, vector};

/// Packs `circles` in place and returns the radius of their enclosing circle. On return the
/// enclosing circle is centred on the origin.
pub(crate) fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].center = point(0.0, 0.0);
    if n == 1 {
        return circles[0].r;
    }

    circles[0].center = point(-circles[1].r, 0.0);
    circles[1].center = point(circles[0].r, 0.0);
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    let (first, second) = (circles[0], circles[1]);
    place(&second, &first, &mut circles[2]);

    // Front chain as a circular doubly linked list over circle indices.
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    next[0] = 1;
    prev[2] = 1;
    next[1] = 2;
    prev[0] = 2;
    next[2] = 0;
    prev[1] = 0;

    let (mut a, mut b) = (0usize, 1usize);
    let mut i = 3usize;
    'pack: while i < n {
        let (ca, cb) = (circles[a], circles[b]);
        place(&ca, &cb, &mut circles[i]);
        let c = circles[i];

        let (mut j, mut k) = (next[b], prev[a]);
        let (mut sj, mut sk) = (cb.r, ca.r);
        loop {
            if sj <= sk {
                if intersects(&circles[j], &c) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &c) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[i] = a;
        next[i] = b;
        next[a] = i;
        prev[b] = i;
        b = i;

        let mut best = score(circles, &next, a);
        let mut cur = next[i];
        while cur != b {
            let s = score(circles, &next, cur);
            if s < best {
                a = cur;
                best = s;
            }
            cur = next[cur];
        }
        b = next[a];
        i += 1;
    }

    let mut front = vec![circles[b]];
    let mut cur = next[b];
    while cur != b {
        front.push(circles[cur]);
        cur = next[cur];
    }
    let e = enclose(&front);

    let shift = vector(e.center.x, e.center.y);
    for circle in circles.iter_mut() {
        circle.center -= shift;
    }
    e.r
}

/// Places `c` tangent to both `a` and `b`.
fn place(b: &Circle, a: &Circle, c: &mut Circle) {
    let d = b.center - a.center;
    let d2 = d.square_length();
    if d2 == 0.0 {
        c.center = point(a.center.x + c.r, a.center.y);
        return;
    }

    let a2 = (a.r + c.r) * (a.r + c.r);
    let b2 = (b.r + c.r) * (b.r + c.r);
    if a2 > b2 {
        let x = (d2 + b2 - a2) / (2.0 * d2);
        let y = (b2 / d2 - x * x).max(0.0).sqrt();
        c.center = point(
            b.center.x - x * d.x - y * d.y,
            b.center.y - x * d.y + y * d.x,
        );
    } else {
        let x = (d2 + a2 - b2) / (2.0 * d2);
        let y = (a2 / d2 - x * x).max(0.0).sqrt();
        c.center = point(
            a.center.x + x * d.x - y * d.y,
            a.center.y + x * d.y + y * d.x,
        );
    }
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let d = b.center - a.center;
    dr > 0.0 && dr * dr > d.square_length()
}

/// Squared distance from the origin to the radius-weighted midpoint of `node` and its successor.
fn score(circles: &[Circle], next: &[usize], node: usize) -> f64 {
    let a = &circles[node];
    let b = &circles[next[node]];
    let ab = a.r + b.r;
    let x = (a.center.x * b.r + b.center.x * a.r) / ab;
    let y = (a.center.y * b.r + b.center.y * a.r) / ab;
    x * x + y * y
}
