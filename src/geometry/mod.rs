mod grid;
mod mesh;

pub use self::grid::{Grid, Lattice, Point};
pub use self::mesh::{Mesh, Triangle};
