use crate::util::normalize_rgba_color;

/// Represents a color in RGBA format.
///
/// Each channel is an 8-bit unsigned integer. Colors are normalized to
/// `[0.0, 1.0]` floats before they are handed to the GPU, both for the
/// per-vertex tint of the page mesh and for the clear color.
///
/// # Examples
///
/// ```
/// use kami::Color;
///
/// let white = Color::WHITE;
/// assert_eq!(white.normalize(), [1.0, 1.0, 1.0, 1.0]);
///
/// let paper = Color::rgb(250, 246, 233);
/// assert_eq!(paper.to_array(), [250, 246, 233, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// A fully transparent color.
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    /// An opaque black color.
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    /// An opaque white color.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Creates a new color with the specified RGB values and full opacity.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Creates a new color with the specified RGBA values.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Normalizes the color values to the range `[0.0, 1.0]`.
    pub fn normalize(&self) -> [f32; 4] {
        normalize_rgba_color(&self.0)
    }

    /// Returns the color as an array of 4 `u8` values.
    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }
}
