//! Mapping of mesh positions to colors.
//!
//! Two interchangeable samplers exist: [`AngleGradient`] projects a vertex's
//! normalized lattice coordinates on a rotated axis and samples a multi-stop
//! [`Gradient`], while [`LinearGradient`] blends two colors left to right.

use std::fmt;

use crate::{
    color::Color,
    error::{Error, Result},
    geometry::Point,
};

pub trait GradientSampler: fmt::Debug {
    /// Scalar gradient position of a reference vertex on a canvas `width`
    /// pixels wide.
    fn position(&self, vertex: &Point, width: f64) -> f64;

    /// Color at a gradient position. Deterministic for a given position.
    fn sample(&self, pos: f64) -> Color;

    /// Whether points must carry normalized lattice coordinates.
    fn tracks_local(&self) -> bool {
        false
    }

    #[inline]
    fn color_at(&self, vertex: &Point, width: f64) -> Color {
        self.sample(self.position(vertex, width))
    }
}

/// Ordered color stops, evenly spaced, sampled piecewise-linearly.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    colors: Vec<Color>,
}

impl Gradient {
    pub fn new(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::EmptyGradient);
        }

        Ok(Self { colors })
    }

    /// The segment is picked from `|pos|` and clamped to the last one, so
    /// positions past 1 extrapolate along the last segment.
    pub fn point(&self, pos: f64) -> Color {
        let n = self.colors.len();
        if n == 1 {
            return self.colors[0];
        }

        let segments = (n - 1) as f64;
        let index = ((pos.abs() * segments).floor() as usize).min(n - 2);
        let t = pos * segments - index as f64;

        self.colors[index].lerp(&self.colors[index + 1], t)
    }
}

/// Multi-stop gradient running along a direction given in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleGradient {
    gradient: Gradient,
    angle: f64,
}

impl AngleGradient {
    pub fn new(gradient: Gradient, angle: f64) -> Self {
        Self { gradient, angle }
    }
}

impl GradientSampler for AngleGradient {
    /// Length of the projection of the vertex's lattice coordinates on the
    /// gradient axis.
    fn position(&self, vertex: &Point, _width: f64) -> f64 {
        let local = vertex.local.unwrap_or_default();

        let beta = local.angle();
        let gamma = beta - self.angle;

        local.len() * gamma.to_radians().cos()
    }

    fn sample(&self, pos: f64) -> Color {
        self.gradient.point(pos)
    }

    fn tracks_local(&self) -> bool {
        true
    }
}

/// Two-color gradient running across the canvas width.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    from: Color,
    to: Color,
    /// Border points lie outside the canvas, so unclamped positions leave
    /// `[0, 1]` and overshoot both colors.
    clamp: bool,
}

impl LinearGradient {
    pub const fn new(from: Color, to: Color, clamp: bool) -> Self {
        Self { from, to, clamp }
    }
}

impl GradientSampler for LinearGradient {
    fn position(&self, vertex: &Point, width: f64) -> f64 {
        let pos = vertex.x() / width;

        if self.clamp {
            pos.max(0.0).min(1.0)
        } else {
            pos
        }
    }

    fn sample(&self, pos: f64) -> Color {
        self.from.lerp(&self.to, pos)
    }
}

#[cfg(test)]
use crate::vec2::Vec2;

#[cfg(test)]
fn local(x: f64, y: f64) -> Point {
    Point {
        position: Vec2::default(),
        local: Some(Vec2::new(x, y)),
    }
}

#[cfg(test)]
fn stops() -> Gradient {
    Gradient::new(vec![Color::new(255, 0, 0), Color::new(0, 255, 0), Color::new(0, 0, 255)]).unwrap()
}

#[test]
fn empty_gradient_is_rejected() {
    assert!(matches!(Gradient::new(Vec::new()), Err(Error::EmptyGradient)));
}

#[test]
fn endpoints_are_exact() {
    let gradient = stops();

    assert_eq!(Color::new(255, 0, 0), gradient.point(0.0));
    assert_eq!(Color::new(0, 255, 0), gradient.point(0.5));
    assert_eq!(Color::new(0, 0, 255), gradient.point(1.0));
}

#[test]
fn interpolates_within_segment() {
    let gradient = stops();

    assert_eq!(Color::new(127, 127, 0), gradient.point(0.25));
    assert_eq!(Color::new(0, 127, 127), gradient.point(0.75));
}

#[test]
fn past_the_end_extrapolates_last_segment() {
    let gradient = stops();

    // Segment 1 with t = 1.5.
    assert_eq!(Color::new(0, -128, 382), gradient.point(1.25));
}

#[test]
fn sampling_is_idempotent() {
    let gradient = stops();

    for &pos in &[0.0, 0.1, 0.33, 0.9, 1.3] {
        assert_eq!(gradient.point(pos), gradient.point(pos));
    }
}

#[test]
fn single_stop_is_constant() {
    let gradient = Gradient::new(vec![Color::new(1, 2, 3)]).unwrap();

    assert_eq!(Color::new(1, 2, 3), gradient.point(0.0));
    assert_eq!(Color::new(1, 2, 3), gradient.point(0.7));
}

#[test]
fn angle_zero_projects_on_x() {
    let sampler = AngleGradient::new(stops(), 0.0);

    assert!((sampler.position(&local(0.4, 0.3), 1.0) - 0.4).abs() < 1e-12);
    assert!((sampler.position(&local(0.8, 0.0), 1.0) - 0.8).abs() < 1e-12);
    assert_eq!(0.0, sampler.position(&local(0.0, 0.0), 1.0));
}

#[test]
fn angle_ninety_projects_on_y() {
    let sampler = AngleGradient::new(stops(), 90.0);

    assert!((sampler.position(&local(0.4, 0.3), 1.0) - 0.3).abs() < 1e-12);
    assert!((sampler.position(&local(0.0, 0.6), 1.0) - 0.6).abs() < 1e-12);
}

#[test]
fn diagonal_angle() {
    let sampler = AngleGradient::new(stops(), 45.0);
    let expected = (0.5 + 0.5) / 2f64.sqrt();

    assert!((sampler.position(&local(0.5, 0.5), 1.0) - expected).abs() < 1e-12);
}

#[test]
fn linear_endpoints_and_midpoint() {
    let from = Color::new(0, 100, 255);
    let to = Color::new(255, 0, 0);
    let sampler = LinearGradient::new(from, to, true);

    assert_eq!(from, sampler.sample(0.0));
    assert_eq!(to, sampler.sample(1.0));
    assert_eq!(Color::new(127, 50, 127), sampler.sample(0.5));
}

#[test]
fn linear_position_clamping() {
    let from = Color::new(0, 0, 0);
    let to = Color::new(200, 200, 200);
    let clamped = LinearGradient::new(from, to, true);
    let raw = LinearGradient::new(from, to, false);

    assert_eq!(0.5, clamped.position(&Point::new(50.0, 10.0), 100.0));
    assert_eq!(0.0, clamped.position(&Point::new(-50.0, 10.0), 100.0));
    assert_eq!(1.0, clamped.position(&Point::new(150.0, 10.0), 100.0));

    assert_eq!(-0.5, raw.position(&Point::new(-50.0, 10.0), 100.0));
    assert_eq!(Color::new(300, 300, 300), raw.color_at(&Point::new(150.0, 0.0), 100.0));
    assert_eq!(to, clamped.color_at(&Point::new(150.0, 0.0), 100.0));
}

#[test]
fn linear_position_is_relative_to_width() {
    let sampler = LinearGradient::new(Color::BLACK, Color::new(100, 100, 100), true);
    let vertex = Point::new(50.0, 0.0);

    assert_eq!(0.5, sampler.position(&vertex, 100.0));
    assert_eq!(0.25, sampler.position(&vertex, 200.0));
    assert_eq!(Color::new(25, 25, 25), sampler.color_at(&vertex, 200.0));
}

#[test]
fn only_angle_gradient_tracks_local() {
    assert!(AngleGradient::new(stops(), 0.0).tracks_local());
    assert!(!LinearGradient::new(Color::BLACK, Color::BLACK, true).tracks_local());
}
