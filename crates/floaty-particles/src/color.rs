//! Color utilities for the particle surface.

use ratatui::style::Color;

/// A straight (non-premultiplied) RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Premultiplied components `[r*a, g*a, b*a, a]`.
    pub fn premultiplied(self) -> [f32; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }

    /// Convert to a terminal color, dropping alpha.
    pub fn to_color(self) -> Color {
        let to8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::Rgb(to8(self.r), to8(self.g), to8(self.b))
    }
}

/// Build a color from HSL (hue in degrees, saturation and lightness in `0..=1`) and alpha.
pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Rgba {
    if s == 0.0 {
        return Rgba::new(l, l, l, a);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h / 360.0;

    Rgba::new(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
        a,
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8() {
        let c = Rgba::from_rgb8(0x04, 0x58, 0xb9);
        assert_eq!(c.a, 1.0);
        assert_eq!(c.to_color(), Color::Rgb(0x04, 0x58, 0xb9));
        assert_eq!(Rgba::from_rgb8(255, 255, 255), Rgba::WHITE);
    }

    #[test]
    fn test_hsla() {
        assert_eq!(hsla(0.0, 0.0, 1.0, 1.0), Rgba::WHITE);
        let red = hsla(0.0, 1.0, 0.5, 1.0);
        assert_eq!(red.to_color(), Color::Rgb(255, 0, 0));
        let blue = hsla(240.0, 1.0, 0.5, 0.5);
        assert_eq!(blue.to_color(), Color::Rgb(0, 0, 255));
        assert_eq!(blue.a, 0.5);
    }
}
