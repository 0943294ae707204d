use std::ops::{ Add, Mul };

use crate::feq;

/// An 8-bit RGB triple, as handed to the image encoder.
pub type Rgb8 = [u8; 3];

/// A color.
///
/// Represented with red-green-blue (RGB) values on the same 0.0 to 255.0
/// scale as the 8-bit colors a scene is described with. Intermediate results
/// (a sphere color scaled by a light intensity, a reflection blend) stay in
/// floating point until converted with `to_rgb8`.
///
/// # Examples
///
/// Scale red by half an intensity and convert it back to bytes:
///
/// ```
/// # use sphere_tracer::color::Color;
/// let red = Color::from_rgb8([255, 0, 0]);
/// assert_eq!((red * 0.5).to_rgb8(), [127, 0, 0]);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Similar to the `PartialEq` implementation on `Vector3`, `Color`s are
/// compared component-wise, accounting for possible floating point error in
/// comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<Rgb8> for Color {
    fn from(c: Rgb8) -> Color {
        Color::from_rgb8(c)
    }
}

impl Color {
    /// Creates a color with red, green and blue values on the 0-255 scale.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    pub fn from_rgb8(c: Rgb8) -> Color {
        Color {
            r: c[0] as f64,
            g: c[1] as f64,
            b: c[2] as f64,
        }
    }

    /// The color black.
    pub fn black() -> Color {
        Color {
            r: 0.0,
            g: 0.0,
            b: 0.0
        }
    }

    /// The color white.
    pub fn white() -> Color {
        Color {
            r: 255.0,
            g: 255.0,
            b: 255.0
        }
    }

    /// Clamps every channel to `[0, 255]`.
    ///
    /// NaN channels become 0.
    pub fn clamped(&self) -> Color {
        let clamp = |c: f64| if c.is_nan() { 0.0 } else { c.clamp(0.0, 255.0) };

        Color {
            r: clamp(self.r),
            g: clamp(self.g),
            b: clamp(self.b),
        }
    }

    /// Converts to an 8-bit triple.
    ///
    /// Channels are clamped to `[0, 255]` and then truncated toward zero, so
    /// `127.9` becomes `127`.
    pub fn to_rgb8(&self) -> Rgb8 {
        let c = self.clamped();
        [c.r as u8, c.g as u8, c.b as u8]
    }

    /// Blends two colors as `(1 - weight) * self + weight * other`.
    ///
    /// With `weight` in `[0, 1]` this is a convex combination; `weight == 0`
    /// yields `self` exactly.
    pub fn blend(&self, other: &Color, weight: f64) -> Color {
        *self * (1.0 - weight) + *other * weight
    }
}

/// Adds two colors together.
///
/// Components are added together individually.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

/// Multiplies a color by a scalar.
///
/// Each component is multiplied by the scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// Multiplies a scalar by a color.
impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(90.0, 60.0, 75.0);
    let c2 = Color::rgb(70.0, 10.0, 25.0);

    assert_eq!(c1 + c2, Color::rgb(160.0, 70.0, 100.0));
}

#[test]
fn multiply_color_by_scalar() {
    let c1 = Color::rgb(20.0, 30.0, 40.0);

    assert_eq!(c1 * 2.0, Color::rgb(40.0, 60.0, 80.0));
    assert_eq!(0.5 * c1, Color::rgb(10.0, 15.0, 20.0));
}

#[test]
fn to_rgb8_clamps_and_truncates() {
    assert_eq!(Color::rgb(300.0, -20.0, 127.9).to_rgb8(), [255, 0, 127]);
    assert_eq!(Color::rgb(f64::NAN, 255.0, 0.0).to_rgb8(), [0, 255, 0]);
}

#[test]
fn blend_is_convex() {
    let local = Color::rgb(200.0, 0.0, 100.0);
    let reflected = Color::rgb(0.0, 100.0, 100.0);

    assert_eq!(local.blend(&reflected, 0.0), local);
    assert_eq!(local.blend(&reflected, 1.0), reflected);
    assert_eq!(local.blend(&reflected, 0.25), Color::rgb(150.0, 25.0, 100.0));
}
