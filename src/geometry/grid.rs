//! Jittered lattice of points covering the canvas plus a one-cell border.

use crate::{
    error::{Error, Result},
    perturb::{Noise, Perturb},
    random::RandomSource,
    vec2::Vec2,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    /// Absolute canvas coordinates.
    pub position: Vec2<f64>,
    /// Lattice coordinates normalized by the number of points per axis.
    /// Only tracked when the gradient projects on them.
    pub local: Option<Vec2<f64>>,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            local: None,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }
}

impl Perturb for Point {
    fn perturb(&mut self, noise: &Noise, rng: &mut dyn RandomSource) {
        self.position.x += rng.uniform(noise.pixels).floor();
        self.position.y += rng.uniform(noise.pixels).floor();

        if let Some(local) = self.local.as_mut() {
            local.x += rng.uniform(noise.local);
            local.y += rng.uniform(noise.local);
        }
    }
}

/// Number of mesh cells along each axis of the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Lattice {
    pub cols: u32,
    pub rows: u32,
}

impl Lattice {
    pub fn new(cols: u32, rows: u32) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::InvalidResolution { cols, rows });
        }

        Ok(Self { cols, rows })
    }

    /// Shifts both dimensions by a uniform integer in `[-noise, noise]`.
    /// Never goes below a single cell.
    pub fn randomize(&self, noise: u32, rng: &mut dyn RandomSource) -> Lattice {
        let mut shift = |v: u32| (i64::from(v) + rng.uniform_int(noise)).clamp(1, i64::from(u32::MAX)) as u32;

        let cols = shift(self.cols);
        let rows = shift(self.rows);

        Lattice { cols, rows }
    }

    /// Points per column of the grid, border included.
    #[inline]
    pub fn columns(&self) -> usize {
        self.cols as usize + 3
    }

    /// Points per row of the grid, border included.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows as usize + 3
    }
}

/// Points stored column-major: index `(i, j)` lives at `i * rows + j`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    lattice: Lattice,
    points: Vec<Point>,
}

impl Grid {
    /// Lattice coordinate `(i, j)` maps to `((i - 1) * width / cols, (j - 1) * height / rows)`,
    /// so the outermost ring lies one cell outside the canvas.
    pub fn build(lattice: Lattice, width: f64, height: f64, track_local: bool) -> Self {
        let columns = lattice.columns();
        let rows = lattice.rows();

        let mut points = Vec::with_capacity(columns * rows);
        for i in 0..columns {
            for j in 0..rows {
                let x = ((i as f64 - 1.0) * width) / lattice.cols as f64;
                let y = ((j as f64 - 1.0) * height) / lattice.rows as f64;

                let local = if track_local {
                    Some(Vec2::new(i as f64 / columns as f64, j as f64 / rows as f64))
                } else {
                    None
                };

                points.push(Point {
                    position: Vec2::new(x, y),
                    local,
                });
            }
        }

        Self { lattice, points }
    }

    #[inline]
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.lattice.columns()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.lattice.rows()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &Point {
        debug_assert!(i < self.columns() && j < self.rows());
        &self.points[i * self.rows() + j]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}

impl Perturb for Grid {
    fn perturb(&mut self, noise: &Noise, rng: &mut dyn RandomSource) {
        for point in &mut self.points {
            point.perturb(noise, rng);
        }
    }
}

#[cfg(test)]
use crate::random::{Constant, Sequence};

#[test]
fn point_count() {
    for &(cols, rows) in &[(1, 1), (2, 2), (7, 3), (16, 9)] {
        let grid = Grid::build(Lattice::new(cols, rows).unwrap(), 640.0, 480.0, false);
        assert_eq!(((cols + 3) * (rows + 3)) as usize, grid.len());
    }
}

#[test]
fn zero_resolution_is_rejected() {
    assert!(matches!(Lattice::new(0, 4), Err(Error::InvalidResolution { cols: 0, rows: 4 })));
    assert!(matches!(Lattice::new(4, 0), Err(Error::InvalidResolution { cols: 4, rows: 0 })));
}

#[test]
fn exact_coordinates_without_jitter() {
    let grid = Grid::build(Lattice::new(2, 2).unwrap(), 100.0, 100.0, false);

    assert_eq!(5, grid.columns());
    assert_eq!(5, grid.rows());
    for i in 0..5 {
        for j in 0..5 {
            let point = grid.get(i, j);
            assert_eq!((i as f64 - 1.0) * 50.0, point.x());
            assert_eq!((j as f64 - 1.0) * 50.0, point.y());
            assert_eq!(None, point.local);
        }
    }
}

#[test]
fn local_coordinates_are_fractions_of_the_lattice_span() {
    let grid = Grid::build(Lattice::new(2, 1).unwrap(), 100.0, 100.0, true);

    assert_eq!(Some(Vec2::new(0.0, 0.0)), grid.get(0, 0).local);
    assert_eq!(Some(Vec2::new(0.2, 0.5)), grid.get(1, 2).local);
    assert_eq!(Some(Vec2::new(0.8, 0.75)), grid.get(4, 3).local);
}

#[test]
fn zero_noise_keeps_positions() {
    let mut grid = Grid::build(Lattice::new(3, 2).unwrap(), 300.0, 200.0, true);
    let snapshot = grid.clone();

    grid.perturb(&Noise::default(), &mut Constant(0.9));

    assert_eq!(snapshot, grid);
}

#[test]
fn jitter_is_floored_and_leaves_snapshot_intact() {
    let mut grid = Grid::build(Lattice::new(2, 2).unwrap(), 100.0, 100.0, false);
    let snapshot = grid.clone();

    grid.perturb(&Noise::new(4.0, 100.0), &mut Constant(0.0));

    for i in 0..grid.columns() {
        for j in 0..grid.rows() {
            let before = snapshot.get(i, j);
            let after = grid.get(i, j);
            assert_eq!(before.x() - 4.0, after.x());
            assert_eq!(before.y() - 4.0, after.y());
        }
    }
    assert_eq!(-50.0, snapshot.get(0, 0).x());
}

#[test]
fn jitter_consumes_x_then_y_then_local() {
    let mut point = Point {
        position: Vec2::new(10.0, 10.0),
        local: Some(Vec2::new(0.5, 0.5)),
    };
    // x: +1.5 floors to +1, y: -0.5 floors to -1.
    let mut rng = Sequence::new(vec![0.875, 0.375, 1.0, 0.0]);

    point.perturb(&Noise { pixels: 2.0, local: 0.25 }, &mut rng);

    assert_eq!(Vec2::new(11.0, 9.0), point.position);
    assert_eq!(Some(Vec2::new(0.75, 0.25)), point.local);
}

#[test]
fn randomized_lattice() {
    let lattice = Lattice::new(10, 6).unwrap();

    assert_eq!(Lattice { cols: 7, rows: 3 }, lattice.randomize(3, &mut Constant(0.0)));
    assert_eq!(lattice, lattice.randomize(3, &mut Constant(0.5)));
    assert_eq!(Lattice { cols: 13, rows: 9 }, lattice.randomize(3, &mut Constant(0.999_999)));
    assert_eq!(lattice, lattice.randomize(0, &mut Constant(0.0)));
}

#[test]
fn randomized_lattice_keeps_one_cell() {
    let lattice = Lattice::new(2, 1).unwrap();

    assert_eq!(Lattice { cols: 1, rows: 1 }, lattice.randomize(5, &mut Constant(0.0)));
}

#[test]
fn randomized_lattice_never_wraps() {
    let lattice = Lattice::new(4, 4).unwrap();

    assert_eq!(Lattice { cols: 1, rows: 1 }, lattice.randomize(u32::MAX, &mut Constant(0.0)));
    assert!(lattice.randomize(u32::MAX, &mut Constant(0.999_999_999)).cols > u32::MAX - 16);

    let wide = Lattice::new(u32::MAX, 1).unwrap();
    assert_eq!(u32::MAX, wide.randomize(10, &mut Constant(0.999_999)).cols);
}
