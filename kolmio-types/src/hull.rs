use crate::cartesian::Orientation;
use crate::Point2d;

/// Convex hull of the points as a closed ring (the first point is repeated at the end), counterclockwise.
///
/// Inputs with fewer than three distinct points have no area; such inputs are returned deduplicated and
/// without the closing point.
pub fn convex_hull(points: &[Point2d]) -> Vec<Point2d> {
    let mut sorted: Vec<Point2d> = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();

    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point2d> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        push_turning_left(&mut lower, *p);
    }

    let mut upper: Vec<Point2d> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        push_turning_left(&mut upper, *p);
    }

    lower.pop();
    upper.pop();
    lower.append(&mut upper);

    if lower.len() < 3 {
        // All points on a single line.
        return sorted;
    }

    lower.push(lower[0]);
    lower
}

fn push_turning_left(chain: &mut Vec<Point2d>, point: Point2d) {
    while chain.len() >= 2
        && Orientation::triplet(&chain[chain.len() - 2], &chain[chain.len() - 1], &point)
            != Orientation::Counterclockwise
    {
        chain.pop();
    }
    chain.push(point);
}
