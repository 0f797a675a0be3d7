/// Interface for accepting a sequence of path commands.
///
/// This is a general abstraction to unify ouput for processes that decode and/or
/// transform outlines.
///
/// AbstractPen in Python terms.
/// <https://github.com/fonttools/fonttools/blob/78e10d8b42095b709cd4125e592d914d3ed1558e/Lib/fontTools/pens/basePen.py#L54>
pub trait Pen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f32, y: f32);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f32, y: f32);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// Captured command to a [`Pen`], useful for testing.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PenCommand {
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    QuadTo {
        cx0: f32,
        cy0: f32,
        x: f32,
        y: f32,
    },
    CurveTo {
        cx0: f32,
        cy0: f32,
        cx1: f32,
        cy1: f32,
        x: f32,
        y: f32,
    },
    Close,
}

impl Pen for Vec<PenCommand> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.push(PenCommand::MoveTo { x, y })
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(PenCommand::LineTo { x, y })
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.push(PenCommand::QuadTo { cx0, cy0, x, y })
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.push(PenCommand::CurveTo {
            cx0,
            cy0,
            cx1,
            cy1,
            x,
            y,
        })
    }

    fn close(&mut self) {
        self.push(PenCommand::Close)
    }
}

#[cfg(feature = "kurbo")]
impl Pen for kurbo::BezPath {
    fn move_to(&mut self, x: f32, y: f32) {
        kurbo::BezPath::move_to(self, (x as f64, y as f64))
    }

    fn line_to(&mut self, x: f32, y: f32) {
        kurbo::BezPath::line_to(self, (x as f64, y as f64))
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        kurbo::BezPath::quad_to(self, (cx0 as f64, cy0 as f64), (x as f64, y as f64))
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        kurbo::BezPath::curve_to(
            self,
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        )
    }

    fn close(&mut self) {
        kurbo::BezPath::close_path(self)
    }
}

#[cfg(all(test, feature = "kurbo"))]
mod tests {
    use super::Pen;
    use kurbo::Shape;

    #[test]
    fn kurbo_pen_bounds() {
        let mut path = kurbo::BezPath::new();
        Pen::move_to(&mut path, 0.0, 0.0);
        Pen::line_to(&mut path, 100.0, 0.0);
        Pen::curve_to(&mut path, 100.0, 50.0, 50.0, 100.0, 0.0, 100.0);
        Pen::close(&mut path);
        let bounds = path.bounding_box();
        assert_eq!((bounds.x0, bounds.y0), (0.0, 0.0));
        assert_eq!((bounds.x1, bounds.y1), (100.0, 100.0));
    }
}
