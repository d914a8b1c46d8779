use crate::{
    color::Color,
    geometry::{Mesh, Triangle},
    gradient::GradientSampler,
    random::RandomSource,
    surface::Surface,
};

/// Colors triangles from a gradient and paints them onto a canvas `width`
/// pixels wide.
pub struct Shader<'a> {
    sampler: &'a dyn GradientSampler,
    /// Per-channel color noise on the 0..255 scale.
    randomness: u32,
    width: f64,
}

impl<'a> Shader<'a> {
    pub fn new(sampler: &'a dyn GradientSampler, randomness: u32, width: f64) -> Self {
        Self {
            sampler,
            randomness,
            width,
        }
    }

    /// Gradient color at the triangle's reference vertex, then perturbed.
    pub fn color(&self, triangle: &Triangle, rng: &mut dyn RandomSource) -> Color {
        self.sampler
            .color_at(triangle.reference(), self.width)
            .randomize(self.randomness, rng)
    }

    pub fn shade<S: Surface + ?Sized>(&self, triangle: &Triangle, surface: &mut S, rng: &mut dyn RandomSource) {
        let color = self.color(triangle, rng);
        triangle.draw(surface, color);
    }

    /// Paints the whole mesh, lower set first.
    pub fn paint<S: Surface + ?Sized>(&self, mesh: &Mesh, surface: &mut S, rng: &mut dyn RandomSource) {
        for triangle in mesh.triangles() {
            self.shade(triangle, surface, rng);
        }
    }
}

#[cfg(test)]
use crate::{
    geometry::{Grid, Lattice, Point},
    gradient::LinearGradient,
    random::Constant,
    surface::{Op, Recorder},
};

#[cfg(test)]
static LINEAR: LinearGradient = LinearGradient::new(Color::new(0, 0, 0), Color::new(100, 200, 40), true);

#[cfg(test)]
fn linear(randomness: u32) -> Shader<'static> {
    Shader::new(&LINEAR, randomness, 100.0)
}

#[test]
fn color_without_noise_is_the_gradient_color() {
    let shader = linear(0);
    let triangle = Triangle::new([Point::new(50.0, 0.0), Point::new(60.0, 10.0), Point::new(50.0, 10.0)], None);

    assert_eq!(Color::new(50, 100, 20), shader.color(&triangle, &mut Constant(0.3)));
}

#[test]
fn color_is_sampled_before_jitter() {
    let shader = linear(0);
    let stable = [Point::new(50.0, 0.0), Point::new(60.0, 10.0), Point::new(50.0, 10.0)];
    let jittered = [Point::new(75.0, 0.0), Point::new(60.0, 10.0), Point::new(50.0, 10.0)];
    let triangle = Triangle::new(jittered, Some(stable));

    assert_eq!(Color::new(50, 100, 20), shader.color(&triangle, &mut Constant(0.3)));
}

#[test]
fn color_noise_is_applied_after_sampling() {
    let shader = linear(5);
    let triangle = Triangle::new([Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(0.0, 1.0)], None);

    assert_eq!(Color::new(-5, -5, -5), shader.color(&triangle, &mut Constant(0.0)));
}

#[test]
fn shade_fills_and_strokes_with_one_color() {
    let shader = linear(0);
    let triangle = Triangle::new([Point::new(0.0, 0.0), Point::new(10.0, 10.0), Point::new(0.0, 10.0)], None);
    let mut surface = Recorder::new(100, 100);

    shader.shade(&triangle, &mut surface, &mut Constant(0.5));

    assert_eq!(
        vec![
            Op::BeginPath,
            Op::MoveTo(0.0, 0.0),
            Op::LineTo(10.0, 10.0),
            Op::LineTo(0.0, 10.0),
            Op::ClosePath,
            Op::FillColor(Color::BLACK),
            Op::StrokeColor(Color::BLACK),
            Op::Fill,
            Op::Stroke,
        ],
        surface.ops
    );
}

#[test]
fn paint_follows_mesh_order() {
    let grid = Grid::build(Lattice::new(1, 1).unwrap(), 100.0, 100.0, false);
    let mesh = Mesh::triangulate(&grid, None);
    let mut surface = Recorder::new(100, 100);

    linear(0).paint(&mesh, &mut surface, &mut Constant(0.5));

    let moves: Vec<Op> = surface.ops.iter().filter(|op| matches!(op, Op::MoveTo(..))).cloned().collect();
    let expected: Vec<Op> = mesh
        .triangles()
        .map(|t| Op::MoveTo(t.vertices()[0].x(), t.vertices()[0].y()))
        .collect();
    assert_eq!(18, moves.len());
    assert_eq!(expected, moves);
    assert_eq!(Op::MoveTo(-100.0, -100.0), moves[0]);

    // Lower triangles first: the third vertex sits below the first one.
    let thirds: Vec<&Op> = surface.ops.iter().filter(|op| matches!(op, Op::LineTo(..))).skip(1).step_by(2).collect();
    assert_eq!(&Op::LineTo(-100.0, 0.0), thirds[0]);
    assert_eq!(&Op::LineTo(0.0, -100.0), thirds[9]);
}
