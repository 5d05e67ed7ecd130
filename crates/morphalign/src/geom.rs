//! Small 2D helpers shared by the contour and profile modules.

/// Euclidean distance between two points.
pub(crate) fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

pub(crate) fn midpoint(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5]
}

/// Angle at `tip` between the rays `tip -> a` and `tip -> b`, in degrees.
///
/// Always in [0, 180]; degenerate rays (zero length) give 0.
pub(crate) fn angle_deg(tip: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let ux = a[0] - tip[0];
    let uy = a[1] - tip[1];
    let vx = b[0] - tip[0];
    let vy = b[1] - tip[1];
    let nu = (ux * ux + uy * uy).sqrt();
    let nv = (vx * vx + vy * vy).sqrt();
    if nu < f64::EPSILON || nv < f64::EPSILON {
        return 0.0;
    }
    let cos = ((ux * vx + uy * vy) / (nu * nv)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Area centroid of a closed polygon (shoelace-weighted).
///
/// Falls back to the mean of the vertices when the enclosed area is
/// degenerate (collinear points).
pub(crate) fn centroid(points: &[[f64; 2]]) -> [f64; 2] {
    if points.is_empty() {
        return [0.0, 0.0];
    }
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let cross = p[0] * q[1] - q[0] * p[1];
        area2 += cross;
        cx += (p[0] + q[0]) * cross;
        cy += (p[1] + q[1]) * cross;
    }
    if area2.abs() < f64::EPSILON {
        let n = points.len() as f64;
        let mut mx = 0.0;
        let mut my = 0.0;
        for p in points {
            mx += p[0];
            my += p[1];
        }
        return [mx / n, my / n];
    }
    [cx / (3.0 * area2), cy / (3.0 * area2)]
}

/// Signed shoelace area of a closed polygon; positive for counter-clockwise
/// winding in a y-up frame.
pub(crate) fn signed_area(points: &[[f64; 2]]) -> f64 {
    let mut area2 = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        area2 += p[0] * q[1] - q[0] * p[1];
    }
    area2 * 0.5
}

/// Even-odd ray-cast point-in-polygon test.
///
/// Points exactly on an edge may land on either side; callers treat the
/// result as a disambiguation hint, not an exact predicate.
pub(crate) fn contains(points: &[[f64; 2]], p: [f64; 2]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let pi = points[i];
        let pj = points[j];
        if (pi[1] > p[1]) != (pj[1] > p[1])
            && p[0] < (pj[0] - pi[0]) * (p[1] - pi[1]) / (pj[1] - pi[1]) + pi[0]
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
