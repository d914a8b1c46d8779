//! Immediate-mode 2-D drawing surfaces.

use std::path::Path;

use image::{Rgb, RgbImage};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::{
    color::Color,
    error::{Error, Result},
};

/// Path-based drawing context. Calls take effect in the order they are made.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Discards the current path.
    fn begin_path(&mut self);
    /// Starts a new subpath at the given point.
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Connects the last point of the current subpath back to its start.
    fn close_path(&mut self);

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);

    /// Paints the interior of the current path with the fill color.
    fn fill(&mut self);
    /// Paints the outline of the current path with the stroke color.
    fn stroke(&mut self);
}

/// Raster surface backed by a `tiny_skia` pixmap.
///
/// Paths are filled with the even-odd rule and stroked one pixel wide, both
/// without anti-aliasing. The pixmap is always opaque.
pub struct Canvas {
    pixmap: Pixmap,
    path: PathBuilder,
    fill: Paint<'static>,
    stroke: Paint<'static>,
}

impl Canvas {
    const LINE_WIDTH: f32 = 1.0;

    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or(Error::EmptyCanvas { width, height })?;
        let Rgb([r, g, b]) = Rgb::<u8>::from(background);
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));

        Ok(Self {
            pixmap,
            path: PathBuilder::new(),
            fill: solid(Color::BLACK),
            stroke: solid(Color::BLACK),
        })
    }

    /// Copies the pixmap into an RGB image, dropping the alpha channel.
    pub fn to_image(&self) -> RgbImage {
        let width = self.pixmap.width();
        let data = self.pixmap.data();

        // Opaque pixels are identical in premultiplied and straight form.
        RgbImage::from_fn(width, self.pixmap.height(), |x, y| {
            let i = 4 * (y * width + x) as usize;
            Rgb([data[i], data[i + 1], data[i + 2]])
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image().save(path)?;
        Ok(())
    }
}

fn solid(color: Color) -> Paint<'static> {
    let Rgb([r, g, b]) = Rgb::<u8>::from(color);

    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = false;
    paint
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn begin_path(&mut self) {
        self.path = PathBuilder::new();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(x as f32, y as f32);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        // Like a 2-D canvas, a lone `line_to` acts as `move_to`.
        if self.path.is_empty() {
            self.move_to(x, y);
        } else {
            self.path.line_to(x as f32, y as f32);
        }
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = solid(color);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = solid(color);
    }

    fn fill(&mut self) {
        // An empty or non-finite path has nothing to paint.
        if let Some(path) = self.path.clone().finish() {
            self.pixmap
                .fill_path(&path, &self.fill, FillRule::EvenOdd, Transform::identity(), None);
        }
    }

    fn stroke(&mut self) {
        let stroke = Stroke {
            width: Self::LINE_WIDTH,
            ..Stroke::default()
        };

        if let Some(path) = self.path.clone().finish() {
            self.pixmap
                .stroke_path(&path, &self.stroke, &stroke, Transform::identity(), None);
        }
    }
}

/// Surface call as recorded by [`Recorder`].
#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    FillColor(Color),
    StrokeColor(Color),
    Fill,
    Stroke,
}

/// Surface that only remembers what was asked of it.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<Op>,
}

#[cfg(test)]
impl Recorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Surface for Recorder {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.ops.push(Op::ClosePath);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(Op::FillColor(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(Op::StrokeColor(color));
    }

    fn fill(&mut self) {
        self.ops.push(Op::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }
}

#[cfg(test)]
fn polygon<S: Surface>(surface: &mut S, points: &[(f64, f64)]) {
    surface.begin_path();
    surface.move_to(points[0].0, points[0].1);
    for &(x, y) in &points[1..] {
        surface.line_to(x, y);
    }
    surface.close_path();
}

#[cfg(test)]
fn painted(canvas: &Canvas, background: Rgb<u8>) -> usize {
    canvas.to_image().pixels().filter(|&&p| p != background).count()
}

#[test]
fn empty_canvas_is_rejected() {
    assert!(matches!(Canvas::new(0, 10, Color::BLACK), Err(Error::EmptyCanvas { width: 0, height: 10 })));
}

#[test]
fn background_fills_every_pixel() {
    let canvas = Canvas::new(4, 3, Color::new(1, 2, 3)).unwrap();

    assert_eq!(12, canvas.to_image().pixels().filter(|&&p| p == Rgb([1, 2, 3])).count());
}

#[test]
fn fill_covers_pixel_centres() {
    let mut canvas = Canvas::new(8, 8, Color::BLACK).unwrap();

    polygon(&mut canvas, &[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]);
    canvas.set_fill_color(Color::new(255, 0, 0));
    canvas.fill();

    assert_eq!(4, painted(&canvas, Rgb([0, 0, 0])));
    for &(x, y) in &[(1, 1), (2, 1), (1, 2), (2, 2)] {
        assert_eq!(Rgb([255, 0, 0]), *canvas.to_image().get_pixel(x, y));
    }
}

#[test]
fn fill_triangle() {
    let mut canvas = Canvas::new(20, 20, Color::BLACK).unwrap();

    polygon(&mut canvas, &[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
    canvas.set_fill_color(Color::new(0, 0, 255));
    canvas.fill();

    assert_eq!(Rgb([0, 0, 255]), *canvas.to_image().get_pixel(1, 1));
    assert_eq!(Rgb([0, 0, 255]), *canvas.to_image().get_pixel(7, 0));
    assert_eq!(Rgb([0, 0, 0]), *canvas.to_image().get_pixel(9, 9));
    assert_eq!(Rgb([0, 0, 0]), *canvas.to_image().get_pixel(15, 2));
}

#[test]
fn fill_is_clipped_to_the_canvas() {
    let mut canvas = Canvas::new(10, 10, Color::BLACK).unwrap();

    polygon(&mut canvas, &[(-50.0, -50.0), (60.0, -50.0), (60.0, 60.0), (-50.0, 60.0)]);
    canvas.set_fill_color(Color::new(9, 9, 9));
    canvas.fill();

    assert_eq!(100, painted(&canvas, Rgb([0, 0, 0])));
}

#[test]
fn fill_colors_are_clamped() {
    let mut canvas = Canvas::new(4, 4, Color::BLACK).unwrap();

    polygon(&mut canvas, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    canvas.set_fill_color(Color::new(300, -5, 128));
    canvas.fill();

    assert_eq!(Rgb([255, 0, 128]), *canvas.to_image().get_pixel(2, 2));
}

#[test]
fn later_paint_wins() {
    let mut canvas = Canvas::new(4, 4, Color::BLACK).unwrap();

    polygon(&mut canvas, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    canvas.set_fill_color(Color::new(10, 0, 0));
    canvas.fill();
    polygon(&mut canvas, &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    canvas.set_fill_color(Color::new(20, 0, 0));
    canvas.fill();

    assert_eq!(Rgb([20, 0, 0]), *canvas.to_image().get_pixel(1, 1));
    assert_eq!(Rgb([10, 0, 0]), *canvas.to_image().get_pixel(3, 3));
}

#[test]
fn stroke_draws_one_pixel_line() {
    let mut canvas = Canvas::new(10, 10, Color::BLACK).unwrap();

    canvas.begin_path();
    canvas.move_to(2.0, 5.0);
    canvas.line_to(8.0, 5.0);
    canvas.set_stroke_color(Color::new(0, 255, 0));
    canvas.stroke();

    let image = canvas.to_image();
    let rows: Vec<u32> = (0..10)
        .filter(|&y| (0..10).any(|x| *image.get_pixel(x, y) != Rgb([0, 0, 0])))
        .collect();
    assert_eq!(1, rows.len());
    assert!(rows[0] == 4 || rows[0] == 5, "{:?}", rows);
    for x in 2..8 {
        assert_eq!(Rgb([0, 255, 0]), *image.get_pixel(x, rows[0]));
    }
    assert_eq!(6, painted(&canvas, Rgb([0, 0, 0])));
}

#[test]
fn stroke_does_not_fill() {
    let mut canvas = Canvas::new(20, 20, Color::BLACK).unwrap();

    polygon(&mut canvas, &[(2.0, 2.0), (18.0, 2.0), (18.0, 18.0), (2.0, 18.0)]);
    canvas.set_stroke_color(Color::new(0, 255, 0));
    canvas.stroke();

    let image = canvas.to_image();
    assert_eq!(Rgb([0, 0, 0]), *image.get_pixel(10, 10));
    assert!(*image.get_pixel(10, 1) != Rgb([0, 0, 0]) || *image.get_pixel(10, 2) != Rgb([0, 0, 0]));
}

#[test]
fn begin_path_discards_previous_path() {
    let mut canvas = Canvas::new(8, 8, Color::BLACK).unwrap();

    polygon(&mut canvas, &[(0.0, 0.0), (8.0, 0.0), (8.0, 8.0), (0.0, 8.0)]);
    canvas.begin_path();
    canvas.set_fill_color(Color::new(255, 255, 255));
    canvas.fill();

    assert_eq!(0, painted(&canvas, Rgb([0, 0, 0])));
}

#[test]
fn recorder_keeps_call_order() {
    let mut recorder = Recorder::new(10, 10);

    polygon(&mut recorder, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    recorder.fill();

    assert_eq!(
        vec![
            Op::BeginPath,
            Op::MoveTo(0.0, 0.0),
            Op::LineTo(1.0, 0.0),
            Op::LineTo(0.0, 1.0),
            Op::ClosePath,
            Op::Fill,
        ],
        recorder.ops
    );
}
