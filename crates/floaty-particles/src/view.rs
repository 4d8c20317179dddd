//! Terminal presentation of a particle surface.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::color::Rgba;
use crate::surface::Surface;

/// Upper half block: foreground paints the top pixel, background the bottom one.
const HALF_BLOCK: &str = "▀";

/// Renders a [`Surface`] as half-block cells, two pixels per cell.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceView<'a> {
    surface: &'a Surface,
    background: Rgba,
}

impl<'a> SurfaceView<'a> {
    pub fn new(surface: &'a Surface, background: Rgba) -> Self {
        Self {
            surface,
            background,
        }
    }

    /// Build `rows` lines of `cols` cells each.
    pub fn lines(&self, cols: u16, rows: u16) -> Vec<Line<'static>> {
        (0..rows)
            .map(|row| {
                let spans: Vec<Span> = (0..cols)
                    .map(|col| self.cell(u32::from(col), u32::from(row)))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    fn cell(&self, x: u32, row: u32) -> Span<'static> {
        let top = self.surface.composite_over(x, row * 2, self.background);
        let bottom = self.surface.composite_over(x, row * 2 + 1, self.background);
        Span::styled(
            HALF_BLOCK,
            Style::new().fg(top.to_color()).bg(bottom.to_color()),
        )
    }

    /// Render the surface into `area` of the frame.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines = self.lines(area.width, area.height);
        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CompositeOp;
    use ratatui::style::Color;

    #[test]
    fn test_lines_pair_pixels_per_cell() {
        let mut surface = Surface::new(2, 4);
        surface.fill_rect(1.0, 1.0, 1.0, 1.0, Rgba::WHITE, CompositeOp::SourceOver);
        let bg = Rgba::from_rgb8(4, 88, 185);
        let lines = SurfaceView::new(&surface, bg).lines(3, 3);

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.spans.len() == 3));

        let lit = &lines[0].spans[1];
        assert_eq!(lit.content, HALF_BLOCK);
        assert_eq!(lit.style.fg, Some(Color::Rgb(4, 88, 185)));
        assert_eq!(lit.style.bg, Some(Color::Rgb(255, 255, 255)));

        // Outside the surface only the background shows.
        let outside = &lines[2].spans[2];
        assert_eq!(outside.style.fg, Some(Color::Rgb(4, 88, 185)));
        assert_eq!(outside.style.bg, Some(Color::Rgb(4, 88, 185)));
    }
}
