use std::ops::{Add, Mul, Sub};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vec2<T> {
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Copy + Sub<Output = T> + Mul<Output = T>> Vec2<T> {
    /// Z component of the 3-D cross product, i.e. twice the signed area of
    /// the parallelogram spanned by both vectors.
    #[inline]
    pub fn cross(&self, other: &Vec2<T>) -> T {
        self.x * other.y - self.y * other.x
    }
}

impl Vec2<f64> {
    #[inline]
    pub fn len(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Polar angle in degrees, in `(-180, 180]`. The zero vector has angle 0.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }
}

impl<T: Add<Output = T>> Add for Vec2<T> {
    type Output = Vec2<T>;

    #[inline]
    fn add(self, other: Vec2<T>) -> Self::Output {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<T: Sub<Output = T>> Sub for Vec2<T> {
    type Output = Vec2<T>;

    #[inline]
    fn sub(self, other: Vec2<T>) -> Self::Output {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

#[test]
fn cross_is_signed_area() {
    let a = Vec2::new(2.0, 0.0);
    let b = Vec2::new(0.0, 3.0);

    assert_eq!(6.0, a.cross(&b));
    assert_eq!(-6.0, b.cross(&a));
}

#[test]
fn angle_of_axes() {
    assert_eq!(0.0, Vec2::new(0.0, 0.0).angle());
    assert_eq!(0.0, Vec2::new(1.0, 0.0).angle());
    assert!((Vec2::new(0.0, 0.5).angle() - 90.0).abs() < 1e-9);
    assert!((Vec2::new(1.0, 1.0).angle() - 45.0).abs() < 1e-9);
}

