use serde::{Deserialize, Serialize};

/// Canvas coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned block bounds; `origin` is the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds {
    pub origin: Point,
    pub size: Size,
}

impl Bounds {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Where outgoing connections leave: middle of the right edge.
    pub fn output_anchor(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Where incoming connections arrive: middle of the left edge.
    pub fn input_anchor(&self) -> Point {
        Point::new(self.origin.x, self.origin.y + self.size.height / 2.0)
    }

    pub fn center_x(&self) -> f64 {
        self.origin.x + self.size.width / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }
}
