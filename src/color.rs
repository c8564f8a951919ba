//! Colors in the CIE L\*a\*b\* space (D65 white point).
//!
//! A [`Color`] is stored as Cartesian Lab coordinates and can be viewed
//! in cylindrical form ([`Lch`]) or encoded as an sRGB hex triplet.

use std::fmt;
use std::str::FromStr;
use rgb::{RGBA, RGB8, RGB16, RGBA8, RGBA16};
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// Specifies the methods a RGB pixel encoding must provide to be
/// converted from and to a [`Color`].
pub trait RGBColor: Sized {
    /// Return the red, green, blue and alpha components of the color
    /// (in \[0, 255\]).
    fn to_rgba(&self) -> RGBA<f64>;

    /// Create a color from its RGBA components (in \[0, 255\], possibly
    /// outside that range for colors outside the sRGB gamut).
    fn from_rgba(rgba: RGBA<f64>) -> Self;
}

#[inline]
fn channel8(x: f64) -> u8 { x.round().clamp(0., 255.) as u8 }

#[inline]
fn channel16(x: f64) -> u16 { (x * 257.).round().clamp(0., 65535.) as u16 }

impl RGBColor for RGBA<f64> {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> { *self }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self { c }
}

impl RGBColor for RGB8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64, g: self.g as f64, b: self.b as f64, a: 255. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGB8 { r: channel8(c.r),  g: channel8(c.g),  b: channel8(c.b) }
    }
}

impl RGBColor for RGB16 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64 / 257., g: self.g as f64 / 257.,
              b: self.b as f64 / 257., a: 255. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGB16 { r: channel16(c.r),  g: channel16(c.g),  b: channel16(c.b) }
    }
}

impl RGBColor for RGBA8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64, g: self.g as f64, b: self.b as f64,
              a: self.a as f64 }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGBA8 { r: channel8(c.r),  g: channel8(c.g),  b: channel8(c.b),
                a: channel8(c.a) }
    }
}

impl RGBColor for RGBA16 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64 / 257., g: self.g as f64 / 257.,
              b: self.b as f64 / 257., a: self.a as f64 / 257. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGBA16 { r: channel16(c.r),  g: channel16(c.g),  b: channel16(c.b),
                 a: channel16(c.a) }
    }
}

/// Cartesian coordinates of a color in CIE L\*a\*b\*.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    /// The lightness in the range 0. to 100.
    pub l: f64,
    /// Green (negative) to red (positive) axis.
    pub a: f64,
    /// Blue (negative) to yellow (positive) axis.
    pub b: f64,
}

/// Cylindrical coordinates of a color in CIE L\*C\*h.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lch {
    /// The lightness in the range 0. to 100.
    pub l: f64,
    /// The chroma, ≥ 0, in practice below ~130.
    pub c: f64,
    /// The hue in degrees in the range 0. to 360.
    pub h: f64,
}

/// An immutable color.  Two colors with the same coordinates are
/// interchangeable.
///
/// Serialized as its hex encoding (see [`Color::to_hex`]), which is
/// also the form palettes are persisted in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    l: f64,
    a: f64,
    b: f64,
}

const EPS0: f64 = 6. / 29.;
const EPS: f64 = EPS0 * EPS0 * EPS0;
// D65 reference white.
const WHITE_X: f64 = 0.95047;
const WHITE_Z: f64 = 1.08883;
// Tolerance on linear sRGB channels for `is_displayable`.
const GAMUT_TOL: f64 = 1e-3;

#[inline]
fn to_linear(v: f64) -> f64 {
    let v = v / 255.;
    if v <= 0.04045 { v / 12.92 } else { ((v + 0.055) / 1.055).powf(2.4) }
}

#[inline]
fn from_linear(v: f64) -> f64 {
    let v = v.clamp(0., 1.);
    255. * if v <= 0.0031308 { 12.92 * v }
           else { 1.055 * v.powf(1. / 2.4) - 0.055 }
}

/// Return the linear sRGB components (nominally in \[0, 1\]) of the Lab
/// point `(l, a, b)`.
fn linear_rgb(l: f64, a: f64, b: f64) -> [f64; 3] {
    const C0: f64 = 108. / 841.;
    const C1: f64 = 4. / 29.;
    let fy = (l + 16.) / 116.;
    let fx = a / 500. + fy;
    let fz = fy - b / 200.;
    let x = WHITE_X * if fx > EPS0 { fx * fx * fx } else { C0 * (fx - C1) };
    let y = if fy > EPS0 { fy * fy * fy } else { C0 * (fy - C1) };
    let z = WHITE_Z * if fz > EPS0 { fz * fz * fz } else { C0 * (fz - C1) };
    [ 3.2404542 * x - 1.5371385 * y - 0.4985314 * z,
     -0.9692660 * x + 1.8760108 * y + 0.0415560 * z,
      0.0556434 * x - 0.2040259 * y + 1.0572252 * z]
}

#[inline]
fn finite_or_zero(x: f64) -> f64 { if x.is_finite() { x } else { 0. } }

/// Circular distance between two hue angles (in degrees), in \[0, 180\].
pub fn hue_distance(h0: f64, h1: f64) -> f64 {
    let d = (h0 - h1).rem_euclid(360.);
    if d > 180. { 360. - d } else { d }
}

impl Color {
    /// Build a color from cylindrical coordinates that are known to be
    /// finite.
    pub(crate) fn polar(l: f64, c: f64, h: f64) -> Color {
        let h = h.rem_euclid(360.).to_radians();
        let c = c.max(0.);
        Color { l: l.clamp(0., 100.), a: c * h.cos(), b: c * h.sin() }
    }

    /// Create a color from its L\*a\*b\* coordinates.  The lightness is
    /// clamped to \[0, 100\].
    pub fn lab(l: f64, a: f64, b: f64) -> Result<Color> {
        if !(l.is_finite() && a.is_finite() && b.is_finite()) {
            return Err(Error::NonFinite)
        }
        Ok(Color { l: l.clamp(0., 100.), a, b })
    }

    /// Create a color from its L\*C\*h coordinates (`h` in degrees).
    /// The lightness is clamped to \[0, 100\], the chroma to ≥ 0 and
    /// the hue wraps around.
    pub fn lch(l: f64, c: f64, h: f64) -> Result<Color> {
        if !(l.is_finite() && c.is_finite() && h.is_finite()) {
            return Err(Error::NonFinite)
        }
        Ok(Color::polar(l, c, h))
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive).
    pub fn from_hex(s: &str) -> Result<Color> {
        let err = || Error::InvalidHex(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|c| c.is_ascii_hexdigit()) { return Err(err()) }
        let channel = |i: usize, w: usize| {
            u8::from_str_radix(&hex[i .. i + w], 16).map_err(|_| err())
        };
        let rgb = match hex.len() {
            6 => RGB8 { r: channel(0, 2)?, g: channel(2, 2)?, b: channel(4, 2)? },
            3 => RGB8 { r: 17 * channel(0, 1)?, g: 17 * channel(1, 1)?,
                        b: 17 * channel(2, 1)? },
            _ => return Err(err()),
        };
        Ok(Color::from_display(rgb))
    }

    /// Convert any RGB pixel type into a color.  The alpha channel is
    /// ignored.
    pub fn from_display<C: RGBColor>(c: C) -> Color {
        const C0: f64 = 841. / 108.;
        const C1: f64 = 4. / 29.;
        let c = c.to_rgba();
        let r = to_linear(finite_or_zero(c.r));
        let g = to_linear(finite_or_zero(c.g));
        let b = to_linear(finite_or_zero(c.b));
        let x = (0.4124564 * r + 0.3575761 * g + 0.1804375 * b) / WHITE_X;
        let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
        let z = (0.0193339 * r + 0.1191920 * g + 0.9503041 * b) / WHITE_Z;
        let f = |t: f64| if t > EPS { t.cbrt() } else { C0 * t + C1 };
        let (fx, fy, fz) = (f(x), f(y), f(z));
        Color { l: (116. * fy - 16.).clamp(0., 100.),
                a: 500. * (fx - fy),
                b: 200. * (fy - fz) }
    }

    /// Encode the color as an RGB pixel, clamping channels that fall
    /// outside the sRGB gamut.
    pub fn to_display<C: RGBColor>(&self) -> C {
        let [r, g, b] = linear_rgb(self.l, self.a, self.b);
        C::from_rgba(RGBA { r: from_linear(r), g: from_linear(g),
                            b: from_linear(b), a: 255. })
    }

    /// The `#RRGGBB` (upper-case) encoding of the color.  Lossy for
    /// colors outside the sRGB gamut.
    pub fn to_hex(&self) -> String {
        let c: RGB8 = self.to_display();
        format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
    }

    /// The color as it will be persisted, i.e. re-read from its hex
    /// encoding.
    pub fn snapped(&self) -> Color {
        Color::from_display(self.to_display::<RGB8>())
    }

    /// Whether the color lies (up to a small tolerance) inside the sRGB
    /// gamut, so that its hex encoding is not lossy.
    pub fn is_displayable(&self) -> bool {
        linear_rgb(self.l, self.a, self.b).iter()
            .all(|&v| (-GAMUT_TOL ..= 1. + GAMUT_TOL).contains(&v))
    }

    #[inline]
    pub fn to_lab(&self) -> Lab { Lab { l: self.l, a: self.a, b: self.b } }

    #[inline]
    pub fn to_lch(&self) -> Lch {
        Lch { l: self.l, c: self.chroma(), h: self.hue() }
    }

    #[inline]
    pub fn lightness(&self) -> f64 { self.l }

    #[inline]
    pub fn chroma(&self) -> f64 { self.a.hypot(self.b) }

    /// The hue in degrees, in \[0, 360).  Zero for achromatic colors.
    pub fn hue(&self) -> f64 {
        let h = self.b.atan2(self.a).to_degrees();
        if h < 0. { h + 360. } else { h }
    }

    /// Perceptual distance (CIE76 ΔE\*ab) between two colors.  A value
    /// around 2.3 is a just noticeable difference.
    pub fn distance(&self, other: &Color) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// Return the color with its hue rotated by `deg` degrees.
    pub fn rotate_hue(&self, deg: f64) -> Color {
        Color::polar(self.l, self.chroma(), self.hue() + finite_or_zero(deg))
    }

    /// Return the color with its lightness shifted by `dl` (clamped).
    pub fn shift_lightness(&self, dl: f64) -> Color {
        Color { l: (self.l + finite_or_zero(dl)).clamp(0., 100.), ..*self }
    }

    /// Return the color with its chroma shifted by `dc` (clamped to ≥ 0).
    pub fn shift_chroma(&self, dc: f64) -> Color {
        Color::polar(self.l, self.chroma() + finite_or_zero(dc), self.hue())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> { Color::from_hex(s) }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> { Color::from_hex(&s) }
}

impl From<Color> for String {
    fn from(c: Color) -> String { c.to_hex() }
}
