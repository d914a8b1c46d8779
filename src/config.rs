//! Background options as read from JSON.
//!
//! ```json
//! {
//!     "x": 12, "y": 8,
//!     "randomness": { "pos": 30, "size": 2, "color": 8 },
//!     "angle": 30,
//!     "gradient": ["#1d2b64", "#f8cdda"]
//! }
//! ```
//!
//! A `gradient` given as `{ "from": .., "to": .. }` selects the two-color
//! gradient instead, whose color noise lives in `gradient.randomness`.

use std::{fs::File, io::BufReader, path::Path};

use crate::{
    color::Color,
    error::{Error, Result},
    geometry::Lattice,
};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Options {
    /// Lattice columns.
    #[serde(alias = "w")]
    pub x: u32,
    /// Lattice rows.
    #[serde(alias = "h")]
    pub y: u32,
    #[serde(default)]
    pub randomness: Randomness,
    /// Gradient direction in degrees. Multi-stop gradients only.
    #[serde(default)]
    pub angle: f64,
    pub gradient: GradientOptions,
    /// Draws every jittered lattice point on top of the mesh.
    #[serde(default)]
    pub dots: bool,
    /// Samples colors from lattice positions before jitter.
    #[serde(default = "default_stable_sampling")]
    pub stable_sampling: bool,
    /// Canvas color behind the mesh.
    #[serde(default)]
    pub background: Color,
}

/// Upper bound of per-channel color noise.
pub const MAX_COLOR_RANDOMNESS: u32 = 255;
/// Upper bound of lattice resolution noise.
pub const MAX_SIZE_RANDOMNESS: u32 = 1024;

fn default_stable_sampling() -> bool {
    true
}

/// Either one pixel jitter magnitude or per-concern magnitudes.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Randomness {
    Pos(u32),
    Split {
        #[serde(default)]
        pos: u32,
        #[serde(default)]
        size: u32,
        #[serde(default)]
        color: u32,
    },
}

impl Default for Randomness {
    fn default() -> Self {
        Randomness::Split {
            pos: 0,
            size: 0,
            color: 0,
        }
    }
}

impl Randomness {
    /// Point jitter in pixels.
    pub fn pos(&self) -> u32 {
        match *self {
            Randomness::Pos(pos) => pos,
            Randomness::Split { pos, .. } => pos,
        }
    }

    /// Jitter of the lattice resolution.
    pub fn size(&self) -> u32 {
        match *self {
            Randomness::Pos(..) => 0,
            Randomness::Split { size, .. } => size,
        }
    }

    /// Per-channel color noise.
    pub fn color(&self) -> u32 {
        match *self {
            Randomness::Pos(..) => 0,
            Randomness::Split { color, .. } => color,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GradientOptions {
    /// Evenly spaced stops, rotated by `angle`.
    Stops(Vec<Color>),
    /// Two colors blended across the canvas width.
    Linear {
        from: Color,
        to: Color,
        #[serde(default)]
        randomness: Option<u32>,
        /// Keeps the blend position inside `[0, 1]`.
        #[serde(default = "default_clamp")]
        clamp: bool,
    },
}

fn default_clamp() -> bool {
    true
}

impl Options {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let options: Options = serde_json::from_reader(BufReader::new(file))?;
        options.validate()?;

        Ok(options)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let options: Options = serde_json::from_str(json)?;
        options.validate()?;

        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        self.lattice()?;

        match &self.gradient {
            GradientOptions::Stops(colors) if colors.is_empty() => return Err(Error::EmptyGradient),
            GradientOptions::Linear {
                randomness: Some(randomness),
                ..
            } => at_most("gradient.randomness", *randomness, MAX_COLOR_RANDOMNESS)?,
            _ => {}
        }

        at_most("randomness.color", self.randomness.color(), MAX_COLOR_RANDOMNESS)?;
        at_most("randomness.size", self.randomness.size(), MAX_SIZE_RANDOMNESS)?;

        Ok(())
    }

    pub fn lattice(&self) -> Result<Lattice> {
        Lattice::new(self.x, self.y)
    }

    /// Color noise, preferring the two-color gradient's own setting.
    pub fn color_randomness(&self) -> u32 {
        match self.gradient {
            GradientOptions::Linear {
                randomness: Some(randomness),
                ..
            } => randomness,
            _ => self.randomness.color(),
        }
    }
}

fn at_most(option: &'static str, value: u32, max: u32) -> Result<()> {
    if value > max {
        return Err(Error::InvalidRandomness { option, value, max });
    }

    Ok(())
}

#[test]
fn angle_gradient_options() {
    let options = Options::from_json(
        r##"{
            "x": 12, "y": 8,
            "randomness": { "pos": 30, "size": 2, "color": 8 },
            "angle": 30,
            "gradient": ["#1d2b64", "#f8cdda"]
        }"##,
    )
    .unwrap();

    assert_eq!(Lattice { cols: 12, rows: 8 }, options.lattice().unwrap());
    assert_eq!(30, options.randomness.pos());
    assert_eq!(2, options.randomness.size());
    assert_eq!(8, options.color_randomness());
    assert_eq!(30.0, options.angle);
    assert_eq!(
        GradientOptions::Stops(vec![Color::new(0x1d, 0x2b, 0x64), Color::new(0xf8, 0xcd, 0xda)]),
        options.gradient
    );
    assert!(!options.dots);
    assert!(options.stable_sampling);
    assert_eq!(Color::BLACK, options.background);
}

#[test]
fn linear_gradient_options_with_aliases() {
    let options = Options::from_json(
        r##"{
            "w": 5, "h": 3,
            "randomness": 20,
            "gradient": { "from": "#000000", "to": "#ffffff", "randomness": 6 }
        }"##,
    )
    .unwrap();

    assert_eq!(Lattice { cols: 5, rows: 3 }, options.lattice().unwrap());
    assert_eq!(Randomness::Pos(20), options.randomness);
    assert_eq!(0, options.randomness.size());
    assert_eq!(6, options.color_randomness());
    assert_eq!(
        GradientOptions::Linear {
            from: Color::new(0, 0, 0),
            to: Color::new(255, 255, 255),
            randomness: Some(6),
            clamp: true,
        },
        options.gradient
    );
}

#[test]
fn missing_randomness_means_none() {
    let options = Options::from_json(r##"{ "x": 1, "y": 1, "gradient": ["#010203"], "dots": true }"##).unwrap();

    assert_eq!(0, options.randomness.pos());
    assert_eq!(0, options.randomness.size());
    assert_eq!(0, options.color_randomness());
    assert!(options.dots);
}

#[test]
fn invalid_options_are_rejected() {
    let zero = Options::from_json(r##"{ "x": 0, "y": 4, "gradient": ["#ffffff"] }"##);
    assert!(matches!(zero, Err(Error::InvalidResolution { cols: 0, rows: 4 })));

    let empty = Options::from_json(r##"{ "x": 2, "y": 2, "gradient": [] }"##);
    assert!(matches!(empty, Err(Error::EmptyGradient)));

    let bad_color = Options::from_json(r##"{ "x": 2, "y": 2, "gradient": ["#12345z"] }"##);
    assert!(matches!(bad_color, Err(Error::Json(..))));

    let negative = Options::from_json(r##"{ "x": -2, "y": 2, "gradient": ["#123456"] }"##);
    assert!(matches!(negative, Err(Error::Json(..))));
}

#[test]
fn randomness_is_bounded() {
    let color = Options::from_json(r##"{ "x": 2, "y": 2, "randomness": { "color": 256 }, "gradient": ["#ffffff"] }"##);
    assert!(matches!(
        color,
        Err(Error::InvalidRandomness { option: "randomness.color", value: 256, max: 255 })
    ));

    let linear = Options::from_json(
        r##"{ "x": 2, "y": 2, "gradient": { "from": "#000000", "to": "#ffffff", "randomness": 300 } }"##,
    );
    assert!(matches!(
        linear,
        Err(Error::InvalidRandomness { option: "gradient.randomness", value: 300, max: 255 })
    ));

    let size = Options::from_json(r##"{ "x": 2, "y": 2, "randomness": { "size": 5000 }, "gradient": ["#ffffff"] }"##);
    assert!(matches!(
        size,
        Err(Error::InvalidRandomness { option: "randomness.size", value: 5000, max: 1024 })
    ));

    let edge = Options::from_json(
        r##"{ "x": 2, "y": 2, "randomness": { "pos": 4000000000, "size": 1024, "color": 255 }, "gradient": ["#ffffff"] }"##,
    );
    assert!(edge.is_ok());
}
