//! Model that contains two triangles per lattice cell.

use crate::{
    color::Color,
    geometry::{Grid, Point},
    surface::Surface,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    vertices: [Point; 3],

    /// Same lattice positions before jitter, when a snapshot was kept.
    /// Colors are sampled from these so shading does not follow the visual noise.
    stable: Option<[Point; 3]>,
}

impl Triangle {
    pub fn new(vertices: [Point; 3], stable: Option<[Point; 3]>) -> Self {
        Self { vertices, stable }
    }

    #[inline]
    pub fn vertices(&self) -> &[Point; 3] {
        &self.vertices
    }

    #[inline]
    pub fn stable(&self) -> Option<&[Point; 3]> {
        self.stable.as_ref()
    }

    /// Vertex the gradient is sampled at: the first vertex, pre-jitter when available.
    #[inline]
    pub fn reference(&self) -> &Point {
        match &self.stable {
            Some(stable) => &stable[0],
            None => &self.vertices[0],
        }
    }

    /// Signed area. Lower and upper triangles of a mesh wind in opposite directions.
    pub fn area(&self) -> f64 {
        let [a, b, c] = &self.vertices;
        (b.position - a.position).cross(&(c.position - a.position)) / 2.0
    }

    /// Fills and strokes the closed outline with the same color.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, color: Color) {
        let [a, b, c] = &self.vertices;

        surface.begin_path();
        surface.move_to(a.x(), a.y());
        surface.line_to(b.x(), b.y());
        surface.line_to(c.x(), c.y());
        surface.close_path();
        surface.set_fill_color(color);
        surface.set_stroke_color(color);
        surface.fill();
        surface.stroke();
    }
}

/// Both triangle sets of a grid.
///
/// Every cell `(x, y)` is split along its `(x, y)-(x + 1, y + 1)` diagonal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// `(x, y)`, `(x + 1, y + 1)`, `(x, y + 1)` of every cell.
    pub lower: Vec<Triangle>,
    /// `(x, y)`, `(x + 1, y + 1)`, `(x + 1, y)` of every cell.
    pub upper: Vec<Triangle>,
}

impl Mesh {
    /// Splits every cell of `grid`. `snapshot` must be the same grid before jitter.
    pub fn triangulate(grid: &Grid, snapshot: Option<&Grid>) -> Self {
        debug_assert!(snapshot.map_or(true, |s| s.lattice() == grid.lattice()));

        let cells = (grid.columns() - 1) * (grid.rows() - 1);
        let corners = |g: &Grid, x: usize, y: usize, (dx, dy): (usize, usize)| {
            [*g.get(x, y), *g.get(x + 1, y + 1), *g.get(x + dx, y + dy)]
        };
        let split = |third: (usize, usize)| {
            let mut set = Vec::with_capacity(cells);
            for x in 0..grid.columns() - 1 {
                for y in 0..grid.rows() - 1 {
                    let vertices = corners(grid, x, y, third);
                    let stable = snapshot.map(|s| corners(s, x, y, third));
                    set.push(Triangle::new(vertices, stable));
                }
            }
            set
        };

        Mesh {
            lower: split((0, 1)),
            upper: split((1, 0)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    /// All triangles in paint order: the lower set, then the upper set.
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.lower.iter().chain(self.upper.iter())
    }
}

#[cfg(test)]
use crate::{
    geometry::Lattice,
    perturb::{Noise, Perturb},
    random::Constant,
};

#[cfg(test)]
fn grid(cols: u32, rows: u32) -> Grid {
    Grid::build(Lattice::new(cols, rows).unwrap(), 100.0, 100.0, false)
}

#[test]
fn triangle_count() {
    for &(cols, rows) in &[(1, 1), (2, 2), (5, 3), (12, 7)] {
        let mesh = Mesh::triangulate(&grid(cols, rows), None);

        let per_set = ((cols + 2) * (rows + 2)) as usize;
        assert_eq!(per_set, mesh.lower.len());
        assert_eq!(per_set, mesh.upper.len());
        assert_eq!(2 * per_set, mesh.len());
    }
}

#[test]
fn scenario_two_by_two() {
    let mesh = Mesh::triangulate(&grid(2, 2), None);

    assert_eq!(32, mesh.len());
    assert_eq!(32, mesh.triangles().count());
}

#[test]
fn no_triangle_is_degenerate_before_jitter() {
    let mesh = Mesh::triangulate(&grid(4, 3), None);

    for triangle in &mesh.lower {
        assert!(triangle.area() > 0.0);
    }
    for triangle in &mesh.upper {
        assert!(triangle.area() < 0.0);
    }
}

#[test]
fn cell_halves_share_the_diagonal() {
    let g = grid(3, 3);
    let mesh = Mesh::triangulate(&g, None);

    for (lower, upper) in mesh.lower.iter().zip(&mesh.upper) {
        assert_eq!(lower.vertices()[0], upper.vertices()[0]);
        assert_eq!(lower.vertices()[1], upper.vertices()[1]);
        assert_ne!(lower.vertices()[2], upper.vertices()[2]);
    }

    // Cell (1, 2) is the 8th cell in column-major order of a 5x5 cell grid.
    let cell = 1 * 5 + 2;
    assert_eq!([*g.get(1, 2), *g.get(2, 3), *g.get(1, 3)], *mesh.lower[cell].vertices());
    assert_eq!([*g.get(1, 2), *g.get(2, 3), *g.get(2, 2)], *mesh.upper[cell].vertices());
}

#[test]
fn halves_cover_each_cell() {
    let mesh = Mesh::triangulate(&grid(2, 2), None);
    let cell_area = 50.0 * 50.0;

    for (lower, upper) in mesh.lower.iter().zip(&mesh.upper) {
        assert_eq!(cell_area, lower.area().abs() + upper.area().abs());
    }
}

#[test]
fn snapshot_is_carried_per_triangle() {
    let snapshot = grid(2, 2);
    let mut jittered = snapshot.clone();
    jittered.perturb(&Noise::new(3.0, 100.0), &mut Constant(0.0));

    let mesh = Mesh::triangulate(&jittered, Some(&snapshot));

    for triangle in mesh.triangles() {
        let stable = triangle.stable().unwrap();
        for (v, s) in triangle.vertices().iter().zip(stable) {
            assert_eq!(s.x() - 3.0, v.x());
            assert_eq!(s.y() - 3.0, v.y());
        }
        assert_eq!(&stable[0], triangle.reference());
    }
}

#[test]
fn reference_falls_back_to_jittered_vertex() {
    let mesh = Mesh::triangulate(&grid(1, 1), None);

    for triangle in mesh.triangles() {
        assert_eq!(None, triangle.stable());
        assert_eq!(&triangle.vertices()[0], triangle.reference());
    }
}
