/// Rising-edge detector for a polled mouse button.
#[derive(Clone, Debug, Default)]
pub struct ClickDetector {
    was_down: bool,
}

impl ClickDetector {
    /// Returns true once per press.
    pub fn update(&mut self, down: bool) -> bool {
        let clicked = down && !self.was_down;
        self.was_down = down;
        clicked
    }
}

/// Which trails sit under the pointer, and the alpha each one is drawn with.
#[derive(Clone, Debug)]
pub struct TrailHighlight {
    baseline: f64,
    pick_radius: f64,
    highlighted: Vec<usize>,
}

impl TrailHighlight {
    pub fn new(baseline: f64, pick_radius: f64) -> Self {
        TrailHighlight {
            baseline,
            pick_radius,
            highlighted: Vec::new(),
        }
    }

    pub fn alpha(&self, robot_id: usize) -> f64 {
        if self.highlighted.contains(&robot_id) {
            1.0
        } else {
            self.baseline
        }
    }

    pub fn highlighted(&self) -> &[usize] {
        &self.highlighted
    }

    /// Re-evaluates the hover set against trails given in pixel coordinates.
    /// Returns true when the set changed.
    pub fn hover<'a, I>(&mut self, pointer: (f64, f64), trails: I) -> bool
    where
        I: IntoIterator<Item = (usize, &'a [(f64, f64)])>,
    {
        let highlighted = trails
            .into_iter()
            .filter(|(_, trail)| distance_to_polyline(pointer, trail) <= self.pick_radius)
            .map(|(robot_id, _)| robot_id)
            .collect::<Vec<_>>();

        let changed = highlighted != self.highlighted;
        self.highlighted = highlighted;
        changed
    }
}

/// Shortest distance from `p` to any segment of `points`; a single point
/// counts as a zero-length segment and an empty path is infinitely far.
pub fn distance_to_polyline(p: (f64, f64), points: &[(f64, f64)]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => distance(p, *only),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let len2 = ab.0.powi(2) + ab.1.powi(2);
    if len2 == 0.0 {
        return distance(p, a);
    }
    let t = (((p.0 - a.0) * ab.0 + (p.1 - a.1) * ab.1) / len2).clamp(0.0, 1.0);
    distance(p, (a.0 + t * ab.0, a.1 + t * ab.1))
}
