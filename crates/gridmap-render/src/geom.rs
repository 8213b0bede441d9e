//! Screen-space geometry aliases.

pub type Unit = euclid::UnknownUnit;

pub type PixelPoint = euclid::Point2D<f64, Unit>;
pub type PixelVector = euclid::Vector2D<f64, Unit>;

pub fn pixel_point(x: f64, y: f64) -> PixelPoint {
    euclid::point2(x, y)
}

pub fn pixel_vector(x: f64, y: f64) -> PixelVector {
    euclid::vec2(x, y)
}
