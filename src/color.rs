use std::{convert::TryFrom, fmt};

use image::Rgb;

use crate::{
    error::{Error, Result},
    random::RandomSource,
};

/// RGB color with unclamped integer channels.
///
/// Interpolation and randomization may push channels outside `0..=255`;
/// they are clamped only when converted to a pixel.
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    #[inline]
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| Error::InvalidColor(hex.to_owned()))?;

        let channel = |at: usize| {
            i32::from_str_radix(&digits[at..at + 2], 16).map_err(|_| Error::InvalidColor(hex.to_owned()))
        };

        Ok(Color::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Linear interpolation, floored per channel. `t` is not clamped.
    pub fn lerp(&self, to: &Color, t: f64) -> Color {
        let mix = |from: i32, to: i32| (from as f64 + (to - from) as f64 * t).floor() as i32;

        Color::new(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b))
    }

    /// Offsets every channel independently by a uniform integer in
    /// `[-amount, amount]`.
    /// Channels saturate at the bounds of `i32`.
    pub fn randomize(&self, amount: u32, rng: &mut dyn RandomSource) -> Color {
        let mut shift = |channel: i32| {
            (i64::from(channel) + rng.uniform_int(amount)).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };

        let r = shift(self.r);
        let g = shift(self.g);
        let b = shift(self.b);

        Color::new(r, g, b)
    }

    pub fn clamped(&self) -> Color {
        Color::new(self.r.clamp(0, 255), self.g.clamp(0, 255), self.b.clamp(0, 255))
    }

    pub fn to_rgb_string(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(hex: String) -> Result<Self> {
        Color::from_hex(&hex)
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        let c = color.clamped();
        Rgb([c.r as u8, c.g as u8, c.b as u8])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rgb_string())
    }
}

#[cfg(test)]
use crate::random::{Constant, Sequence};

#[test]
fn from_hex() {
    assert_eq!(Color::new(255, 136, 0), Color::from_hex("#ff8800").unwrap());
    assert_eq!(Color::new(171, 205, 239), Color::from_hex("#ABCDEF").unwrap());
}

#[test]
fn from_hex_rejects_malformed() {
    for hex in &["ff8800", "#ff880", "#ff88001", "#gg8800", "", "#", "#ff 800"] {
        match Color::from_hex(hex) {
            Err(Error::InvalidColor(s)) => assert_eq!(*hex, s),
            other => panic!("{:?} parsed as {:?}", hex, other),
        }
    }
}

#[test]
fn deserialize_from_hex_string() {
    let color: Color = serde_json::from_str("\"#102030\"").unwrap();
    assert_eq!(Color::new(16, 32, 48), color);

    assert!(serde_json::from_str::<Color>("\"red\"").is_err());
}

#[test]
fn lerp_floors() {
    let from = Color::new(0, 0, 0);
    let to = Color::new(255, 100, 1);

    assert_eq!(Color::new(127, 50, 0), from.lerp(&to, 0.5));
    assert_eq!(from, from.lerp(&to, 0.0));
    assert_eq!(to, from.lerp(&to, 1.0));
}

#[test]
fn lerp_extrapolates() {
    let from = Color::new(100, 100, 100);
    let to = Color::new(200, 0, 100);

    assert_eq!(Color::new(300, -100, 100), from.lerp(&to, 2.0));
}

#[test]
fn randomize_with_zero_amount_is_identity() {
    let color = Color::new(12, 200, 255);

    for &v in &[0.0, 0.3, 0.5, 0.999] {
        assert_eq!(color, color.randomize(0, &mut Constant(v)));
    }
}

#[test]
fn randomize_offsets_each_channel() {
    let color = Color::new(100, 100, 100);
    let mut rng = Sequence::new(vec![0.0, 0.5, 0.999_999]);

    assert_eq!(Color::new(90, 100, 110), color.randomize(10, &mut rng));
}

#[test]
fn randomize_saturates_extreme_channels() {
    let color = Color::new(i32::MAX, i32::MIN, 0);

    assert_eq!(
        Color::new(i32::MAX, i32::MIN + 255, 255),
        color.randomize(255, &mut Constant(0.999_999_999))
    );
    assert_eq!(Color::new(i32::MAX - 255, i32::MIN, -255), color.randomize(255, &mut Constant(0.0)));
    assert_eq!(color, color.randomize(u32::MAX, &mut Constant(0.5)));
}

#[test]
fn clamped_pixel() {
    let color = Color::new(-20, 128, 300);

    assert_eq!(Color::new(0, 128, 255), color.clamped());
    assert_eq!(Rgb([0, 128, 255]), Rgb::from(color));
}

#[test]
fn rgb_string() {
    assert_eq!("rgb(255, 136, 0)", Color::new(255, 136, 0).to_rgb_string());
    assert_eq!("rgb(-1, 0, 256)", Color::new(-1, 0, 256).to_string());
}
