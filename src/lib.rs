//! Procedural low-poly backgrounds.
//!
//! A jittered lattice of points is split into triangles, each triangle is
//! colored from a gradient and painted onto a [`Surface`].

#[macro_use]
extern crate serde_derive;

pub use crate::background::{Background, Summary};
pub use crate::color::Color;
pub use crate::config::{GradientOptions, Options, Randomness};
pub use crate::error::{Error, Result};
pub use crate::random::{Entropy, RandomSource};
pub use crate::surface::{Canvas, Surface};

pub mod background;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gradient;
pub mod perturb;
pub mod random;
pub mod shader;
pub mod surface;
pub mod vec2;
