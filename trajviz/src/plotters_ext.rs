use plotters::element::{Drawable, PointCollection};
use plotters::style::ShapeStyle;
use plotters_backend::{BackendCoord, DrawingBackend, DrawingErrorKind};

// Dashed polyline element. The dash pattern runs continuously across vertices.
pub struct DashedPath<Coord> {
    points: Vec<Coord>,
    dash: u32,
    gap: u32,
    style: ShapeStyle,
}

impl<Coord> DashedPath<Coord> {
    pub fn new<S: Into<ShapeStyle>>(points: Vec<Coord>, dash: u32, gap: u32, style: S) -> Self {
        Self {
            points,
            dash: dash.max(1),
            gap,
            style: style.into(),
        }
    }
}

impl<'a, Coord> PointCollection<'a, Coord> for &'a DashedPath<Coord> {
    type Point = &'a Coord;
    type IntoIter = &'a [Coord];
    fn point_iter(self) -> &'a [Coord] {
        &self.points
    }
}

impl<Coord, DB: DrawingBackend> Drawable<DB> for DashedPath<Coord> {
    fn draw<I: Iterator<Item = BackendCoord>>(
        &self,
        points: I,
        backend: &mut DB,
        _: (u32, u32),
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let points = points.collect::<Vec<_>>();
        if points.len() == 1 {
            return backend.draw_line(points[0], points[0], &self.style);
        }

        let period = (self.dash + self.gap) as f64;
        let mut phase = 0.0f64;
        for w in points.windows(2) {
            let (from, to) = (w[0], w[1]);
            let dx = (to.0 - from.0) as f64;
            let dy = (to.1 - from.1) as f64;
            let length = (dx * dx + dy * dy).sqrt();
            if length == 0.0 {
                continue;
            }

            let mut travelled = 0.0;
            while travelled < length {
                let in_dash = phase < self.dash as f64;
                let left_in_state = if in_dash {
                    self.dash as f64 - phase
                } else {
                    period - phase
                };
                let step = left_in_state.min(length - travelled);

                if in_dash {
                    let at = |d: f64| {
                        (
                            from.0 + (dx * d / length).round() as i32,
                            from.1 + (dy * d / length).round() as i32,
                        )
                    };
                    backend.draw_line(at(travelled), at(travelled + step), &self.style)?;
                }

                travelled += step;
                phase = (phase + step) % period;
            }
        }
        Ok(())
    }
}
