//! Pixel surface the particles draw onto.

use crate::color::Rgba;

/// How a fill combines with the pixels already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeOp {
    /// Paint the source over the destination.
    #[default]
    SourceOver,
    /// Scale covered pixels by the source alpha. Uncovered pixels are left as they are.
    DestinationIn,
    /// Add source and destination, saturating at full intensity.
    Lighter,
}

/// An RGBA raster stored as premultiplied `f32` pixels, row-major.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Surface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize the surface. Content is discarded, as with a canvas.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Premultiplied pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Fill a rectangle. Pixels whose centers lie inside it are affected.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba, op: CompositeOp) {
        let Some((x0, x1)) = covered_span(x, w, self.width) else {
            return;
        };
        let Some((y0, y1)) = covered_span(y, h, self.height) else {
            return;
        };
        let src = color.premultiplied();
        let stride = self.width as usize;
        for py in y0..y1 {
            let row = py * stride;
            for dst in &mut self.pixels[row + x0..row + x1] {
                composite(dst, src, op);
            }
        }
    }

    /// Flatten a pixel onto an opaque background color.
    pub fn composite_over(&self, x: u32, y: u32, background: Rgba) -> Rgba {
        match self.pixel(x, y) {
            Some([r, g, b, a]) => Rgba::new(
                (r + background.r * (1.0 - a)).min(1.0),
                (g + background.g * (1.0 - a)).min(1.0),
                (b + background.b * (1.0 - a)).min(1.0),
                1.0,
            ),
            None => background,
        }
    }
}

/// Pixel index range `[start, end)` whose centers fall in `[pos, pos + len)`.
fn covered_span(pos: f64, len: f64, limit: u32) -> Option<(usize, usize)> {
    if !pos.is_finite() || !len.is_finite() || len <= 0.0 {
        return None;
    }
    let start = (pos - 0.5).ceil().max(0.0);
    let end = (pos + len - 0.5).ceil().min(f64::from(limit));
    (start < end).then(|| (start as usize, end as usize))
}

fn composite(dst: &mut [f32; 4], src: [f32; 4], op: CompositeOp) {
    match op {
        CompositeOp::SourceOver => {
            let inv = 1.0 - src[3];
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s + *d * inv;
            }
        }
        CompositeOp::DestinationIn => {
            for d in dst.iter_mut() {
                *d *= src[3];
            }
        }
        CompositeOp::Lighter => {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = (*d + s).min(1.0);
            }
        }
    }
}
