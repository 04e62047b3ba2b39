//=========================================================================
// Vector
//=========================================================================
//
// Point + bearing value type shared by input and sprite code.
//
// A Vector carries a position and, optionally, a bearing (direction in
// radians + magnitude) derived from a second point. Values are immutable
// once built; callers replace a Vector rather than mutate it.
//
// Construction paths:
// ```text
//   Vector::new(x, y)                  → bearing (0, 0)
//   Vector::with_bearing(x, y, d, m)   → explicit bearing
//   Vector::toward(origin, target)     → position = origin
//   Vector::from_motion(prev, current) → position = current
// ```
//
// The two-point constructors always recompute the bearing from their
// inputs; there is no way to pass an explicit bearing alongside them.
//
//=========================================================================

//=== Point ===============================================================

/// A plain 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

//=== Vector ==============================================================

/// Position plus bearing.
///
/// `direction` is `atan2(dy, dx)` in radians and `magnitude` the euclidean
/// distance between the two points the bearing was derived from. Both are
/// zero for a Vector built from a single point. Fields are read-only; build
/// a new Vector to change any of them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    x: f64,
    y: f64,
    direction: f64,
    magnitude: f64,
}

impl Vector {
    //--- Single Point -----------------------------------------------------

    /// Vector at `(x, y)` with no bearing.
    pub const fn new(x: f64, y: f64) -> Self {
        Self::with_bearing(x, y, 0.0, 0.0)
    }

    /// Vector at `(x, y)` with an explicit bearing.
    pub const fn with_bearing(x: f64, y: f64, direction: f64, magnitude: f64) -> Self {
        Self { x, y, direction, magnitude }
    }

    //--- Two Points -------------------------------------------------------

    /// Positioned at `origin`, bearing pointing from `origin` to `target`.
    pub fn toward(origin: Point, target: Point) -> Self {
        let (direction, magnitude) = bearing(origin, target);
        Self { x: origin.x, y: origin.y, direction, magnitude }
    }

    /// Positioned at `current`, bearing describing the step from `previous`.
    ///
    /// This is the pointer-tracking form: `direction`/`magnitude` describe
    /// how the pointer moved between two samples.
    pub fn from_motion(previous: Point, current: Point) -> Self {
        let (direction, magnitude) = bearing(previous, current);
        Self { x: current.x, y: current.y, direction, magnitude }
    }

    //--- Accessors --------------------------------------------------------

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Bearing angle in radians, `atan2(dy, dx)`.
    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Same position, bearing dropped.
    pub fn without_bearing(&self) -> Self {
        Self::new(self.x, self.y)
    }
}

impl From<Point> for Vector {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Vector {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 4]> for Vector {
    fn from([x, y, direction, magnitude]: [f64; 4]) -> Self {
        Self::with_bearing(x, y, direction, magnitude)
    }
}

fn bearing(from: Point, to: Point) -> (f64, f64) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    (dy.atan2(dx), dx.hypot(dy))
}

//=========================================================================
// Unit Tests
//=========================================================================
