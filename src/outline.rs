use kurbo::{BezPath, PathEl};
use std::fmt::Write as _;

/// Interface for accepting a sequence of path commands.
pub trait OutlinePen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// Feed every element of a kurbo path to a pen.
pub fn draw(path: &BezPath, pen: &mut impl OutlinePen) {
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pen.move_to(p.x, p.y),
            PathEl::LineTo(p) => pen.line_to(p.x, p.y),
            PathEl::QuadTo(c, p) => pen.quad_to(c.x, c.y, p.x, p.y),
            PathEl::CurveTo(c0, c1, p) => pen.curve_to(c0.x, c0.y, c1.x, c1.y, p.x, p.y),
            PathEl::ClosePath => pen.close(),
        }
    }
}

/// A pen which writes absolute SVG path commands
///
/// ```rust
/// use iconfont::{OutlinePen, SvgPathPen};
/// let mut pen = SvgPathPen::new();
/// pen.move_to(0.0, 0.0);
/// pen.line_to(100.0, -0.0);
/// pen.line_to(100.5, 100.0);
/// pen.close();
/// assert_eq!(pen.build(), "M0,0 L100,0 L100.5,100 Z");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SvgPathPen {
    data: String,
}

impl SvgPathPen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> String {
        self.data
    }

    fn command(&mut self, command: char, points: &[(f64, f64)]) {
        if !self.data.is_empty() {
            self.data.push(' ');
        }
        self.data.push(command);
        for (ix, (x, y)) in points.iter().enumerate() {
            if ix > 0 {
                self.data.push(' ');
            }
            // Writing to a String can't fail
            let _ = write!(self.data, "{},{}", clean(*x), clean(*y));
        }
    }
}

/// Round off float noise and never write `-0`.
fn clean(value: f64) -> f64 {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

impl OutlinePen for SvgPathPen {
    fn move_to(&mut self, x: f64, y: f64) {
        self.command('M', &[(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.command('L', &[(x, y)]);
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        self.command('Q', &[(cx0, cy0), (x, y)]);
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        self.command('C', &[(cx0, cy0), (cx1, cy1), (x, y)]);
    }

    fn close(&mut self) {
        self.command('Z', &[]);
    }
}
