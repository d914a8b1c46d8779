use log::{debug, warn};

use crate::{
    color::Color,
    config::{GradientOptions, Options},
    error::{Error, Result},
    geometry::{Grid, Lattice, Mesh},
    gradient::{AngleGradient, Gradient, GradientSampler, LinearGradient},
    perturb::{Noise, Perturb},
    random::RandomSource,
    shader::Shader,
    surface::Surface,
};

/// Side of the squares drawn by the `dots` overlay.
const DOT_SIZE: f64 = 6.0;

/// What a single paint produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Lattice after resolution noise.
    pub lattice: Lattice,
    pub points: usize,
    pub triangles: usize,
}

/// Low-poly background generator.
///
/// The gradient is built once. Every [`paint`](Background::paint) rebuilds
/// the lattice, mesh and colors from scratch.
#[derive(Debug)]
pub struct Background {
    options: Options,
    sampler: Box<dyn GradientSampler>,
}

impl Background {
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;

        if let GradientOptions::Linear { .. } = options.gradient {
            if options.randomness.size() != 0 {
                warn!("`randomness.size` only applies to multi-stop gradients, ignoring");
            }
            if options.angle != 0.0 {
                warn!("`angle` only applies to multi-stop gradients, ignoring");
            }
        }

        let sampler: Box<dyn GradientSampler> = match &options.gradient {
            GradientOptions::Stops(colors) => Box::new(AngleGradient::new(Gradient::new(colors.clone())?, options.angle)),
            GradientOptions::Linear { from, to, clamp, .. } => Box::new(LinearGradient::new(*from, *to, *clamp)),
        };

        Ok(Self { options, sampler })
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Builds the jittered lattice, splits it into triangles and paints them
    /// onto `surface`, lower triangles first.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S, rng: &mut dyn RandomSource) -> Result<Summary> {
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            return Err(Error::EmptyCanvas { width, height });
        }
        let (width, height) = (f64::from(width), f64::from(height));

        let tracks_local = self.sampler.tracks_local();

        let mut lattice = self.options.lattice()?;
        if let GradientOptions::Stops(..) = self.options.gradient {
            lattice = lattice.randomize(self.options.randomness.size(), rng);
        }
        debug!("building {}x{} lattice on {}x{} canvas", lattice.cols, lattice.rows, width, height);

        let mut grid = Grid::build(lattice, width, height, tracks_local);
        let snapshot = if self.options.stable_sampling {
            Some(grid.clone())
        } else {
            None
        };
        grid.perturb(&Noise::new(f64::from(self.options.randomness.pos()), width), rng);

        let mesh = Mesh::triangulate(&grid, snapshot.as_ref());
        debug!("triangulated {} points into {} triangles", grid.len(), mesh.len());

        let shader = Shader::new(&*self.sampler, self.options.color_randomness(), width);
        shader.paint(&mesh, surface, rng);

        if self.options.dots {
            draw_points(&grid, surface);
        }

        Ok(Summary {
            lattice,
            points: grid.len(),
            triangles: mesh.len(),
        })
    }
}

/// Marks every lattice point with a black square.
fn draw_points<S: Surface + ?Sized>(grid: &Grid, surface: &mut S) {
    let half = DOT_SIZE / 2.0;

    surface.set_fill_color(Color::BLACK);
    for point in grid.points() {
        let (x, y) = (point.x() - half, point.y() - half);

        surface.begin_path();
        surface.move_to(x, y);
        surface.line_to(x + DOT_SIZE, y);
        surface.line_to(x + DOT_SIZE, y + DOT_SIZE);
        surface.line_to(x, y + DOT_SIZE);
        surface.close_path();
        surface.fill();
    }
}

#[cfg(test)]
use crate::{
    random::{Constant, Sequence},
    surface::{Canvas, Op, Recorder},
};

#[cfg(test)]
fn fill_colors(ops: &[Op]) -> Vec<Color> {
    ops.iter()
        .filter_map(|op| match op {
            Op::FillColor(color) => Some(*color),
            _ => None,
        })
        .collect()
}

#[test]
fn two_by_two_scenario() {
    let options = Options::from_json(r##"{ "x": 2, "y": 2, "gradient": ["#204060", "#c08040"] }"##).unwrap();
    let mut surface = Recorder::new(100, 100);

    let summary = Background::new(options).unwrap().paint(&mut surface, &mut Constant(0.5)).unwrap();

    assert_eq!(Lattice { cols: 2, rows: 2 }, summary.lattice);
    assert_eq!(25, summary.points);
    assert_eq!(32, summary.triangles);

    let colors = fill_colors(&surface.ops);
    assert_eq!(32, colors.len());
    for color in colors {
        assert!((0x20..=0xc0).contains(&color.r), "{:?}", color);
        assert!((0x40..=0x80).contains(&color.g), "{:?}", color);
        assert!((0x40..=0x60).contains(&color.b), "{:?}", color);
    }

    // First triangle starts at the top-left border point, unjittered.
    assert_eq!(Op::MoveTo(-50.0, -50.0), surface.ops[1]);
}

#[test]
fn zero_angle_follows_columns() {
    let options = Options::from_json(r##"{ "x": 2, "y": 2, "gradient": ["#000000", "#fe0000"] }"##).unwrap();
    let mut surface = Recorder::new(100, 100);

    Background::new(options).unwrap().paint(&mut surface, &mut Constant(0.5)).unwrap();

    // Column i has local x = i / 5 and every cell of a column shares it.
    let colors = fill_colors(&surface.ops);
    let expected: Vec<Color> = [0, 50, 101, 152]
        .iter()
        .flat_map(|&r| std::iter::repeat(Color::new(r, 0, 0)).take(4))
        .collect();
    assert_eq!(expected, colors[..16].to_vec());
    assert_eq!(expected, colors[16..].to_vec());
}

#[test]
fn jitter_moves_vertices_but_not_colors() {
    let json = r##"{ "x": 2, "y": 2, "randomness": { "pos": 8 }, "gradient": { "from": "#000000", "to": "#646464" } }"##;
    let background = Background::new(Options::from_json(json).unwrap()).unwrap();

    let mut calm = Recorder::new(100, 100);
    let mut shaken = Recorder::new(100, 100);
    background.paint(&mut calm, &mut Constant(0.5)).unwrap();
    // Points get the lowest jitter, colors are left alone by the zero color noise.
    background.paint(&mut shaken, &mut Constant(0.0)).unwrap();

    assert_eq!(Op::MoveTo(-50.0, -50.0), calm.ops[1]);
    assert_eq!(Op::MoveTo(-58.0, -58.0), shaken.ops[1]);
    assert_eq!(fill_colors(&calm.ops), fill_colors(&shaken.ops));
}

#[test]
fn unstable_sampling_follows_jitter() {
    let json = r##"{
        "x": 2, "y": 2, "randomness": 10, "stable_sampling": false,
        "gradient": { "from": "#000000", "to": "#c8c8c8", "clamp": false }
    }"##;
    let background = Background::new(Options::from_json(json).unwrap()).unwrap();
    let mut surface = Recorder::new(100, 100);

    background.paint(&mut surface, &mut Constant(0.0)).unwrap();

    // Reference vertex of the first triangle moved from x = -50 to x = -60.
    assert_eq!(Color::new(-120, -120, -120), fill_colors(&surface.ops)[0]);
}

#[test]
fn size_noise_changes_density() {
    let json = r##"{ "x": 4, "y": 4, "randomness": { "size": 2 }, "gradient": ["#000000", "#ffffff"] }"##;
    let background = Background::new(Options::from_json(json).unwrap()).unwrap();
    let mut surface = Recorder::new(100, 100);

    let summary = background.paint(&mut surface, &mut Constant(0.0)).unwrap();

    assert_eq!(Lattice { cols: 2, rows: 2 }, summary.lattice);
    assert_eq!(32, summary.triangles);
}

#[test]
fn size_noise_is_ignored_for_linear_gradient() {
    let json = r##"{ "x": 4, "y": 4, "randomness": { "size": 2 }, "gradient": { "from": "#000000", "to": "#ffffff" } }"##;
    let background = Background::new(Options::from_json(json).unwrap()).unwrap();
    let mut surface = Recorder::new(100, 100);

    let summary = background.paint(&mut surface, &mut Constant(0.0)).unwrap();

    assert_eq!(Lattice { cols: 4, rows: 4 }, summary.lattice);
}

#[test]
fn color_noise_consumes_three_values_per_triangle() {
    let json = r##"{ "x": 1, "y": 1, "randomness": { "color": 10 }, "gradient": ["#808080", "#808080"] }"##;
    let background = Background::new(Options::from_json(json).unwrap()).unwrap();
    let mut surface = Recorder::new(10, 10);

    // Size noise and point jitter are zero and still draw from the sequence.
    background
        .paint(&mut surface, &mut Sequence::new(vec![0.5, 0.5, 0.0, 0.5, 0.999_999]))
        .unwrap();

    let colors = fill_colors(&surface.ops);
    assert_eq!(18, colors.len());
    assert!(colors.iter().all(|c| c.r >= 118 && c.r <= 138));
    assert!(colors.iter().any(|c| *c != Color::new(128, 128, 128)));
}

#[test]
fn dots_are_drawn_last() {
    let json = r##"{ "x": 1, "y": 1, "dots": true, "gradient": ["#ffffff"] }"##;
    let background = Background::new(Options::from_json(json).unwrap()).unwrap();
    let mut surface = Recorder::new(10, 10);

    background.paint(&mut surface, &mut Constant(0.5)).unwrap();

    let tail = &surface.ops[18 * 9..];
    assert_eq!(Op::FillColor(Color::BLACK), tail[0]);
    assert_eq!(16, tail.iter().filter(|op| **op == Op::Fill).count());
    assert_eq!(Op::MoveTo(-13.0, -13.0), tail[2]);
}

#[test]
fn paints_onto_a_canvas() {
    let json = r##"{ "x": 3, "y": 2, "randomness": { "pos": 4, "color": 3 }, "gradient": ["#ff0000", "#0000ff"] }"##;
    let background = Background::new(Options::from_json(json).unwrap()).unwrap();
    let mut canvas = Canvas::new(60, 40, Color::new(0, 255, 0)).unwrap();

    background.paint(&mut canvas, &mut Sequence::new(vec![0.1, 0.7, 0.4, 0.9])).unwrap();

    // The border ring hides the background everywhere.
    assert!(canvas.to_image().pixels().all(|p| p.0[1] < 16));
}

#[test]
fn empty_surface_is_rejected() {
    let options = Options::from_json(r##"{ "x": 2, "y": 2, "gradient": ["#ffffff"] }"##).unwrap();
    let result = Background::new(options).unwrap().paint(&mut Recorder::new(0, 50), &mut Constant(0.5));

    assert!(matches!(result, Err(Error::EmptyCanvas { width: 0, height: 50 })));
}

#[test]
fn gradient_is_built_with_the_background() {
    let stops = Options::from_json(r##"{ "x": 2, "y": 2, "gradient": ["#000000", "#0000ff"] }"##).unwrap();
    let background = Background::new(stops).unwrap();
    assert!(background.sampler.tracks_local());
    assert_eq!(Color::new(0, 0, 255), background.sampler.sample(1.0));

    let linear = Options::from_json(r##"{ "x": 2, "y": 2, "gradient": { "from": "#000000", "to": "#0000ff" } }"##).unwrap();
    assert!(!Background::new(linear).unwrap().sampler.tracks_local());
}

#[test]
fn one_background_paints_canvases_of_any_width() {
    let json = r##"{ "x": 4, "y": 2, "gradient": { "from": "#000000", "to": "#c8c8c8" } }"##;
    let background = Background::new(Options::from_json(json).unwrap()).unwrap();

    let mut narrow = Recorder::new(100, 50);
    let mut wide = Recorder::new(400, 50);
    background.paint(&mut narrow, &mut Constant(0.5)).unwrap();
    background.paint(&mut wide, &mut Constant(0.5)).unwrap();

    // Colors follow the horizontal fraction, not the pixel position.
    assert_eq!(fill_colors(&narrow.ops), fill_colors(&wide.ops));
    assert_eq!(Op::MoveTo(-25.0, -25.0), narrow.ops[1]);
    assert_eq!(Op::MoveTo(-100.0, -25.0), wide.ops[1]);
}
