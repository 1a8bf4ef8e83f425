//! Glyph outline extraction: ttf-parser outline callbacks converted into a
//! `lyon::path::Path`, scaled from font units and offset by the pen position.

use lyon::math::point;
use lyon::path::Path;

/// Builds a lyon path from ttf-parser outline callbacks.
///
/// Coordinates arrive in font units with Y up, which matches the world axes,
/// so no flip is applied. Scale and pen offset are baked in during collection.
pub struct OutlineCollector {
    builder: lyon::path::path::Builder,
    scale: f32,
    offset_x: f32,
    open: bool,
}

impl OutlineCollector {
    pub fn new(scale: f32, offset_x: f32) -> Self {
        Self {
            builder: Path::builder(),
            scale,
            offset_x,
            open: false,
        }
    }

    fn map(&self, x: f32, y: f32) -> lyon::math::Point {
        point(x * self.scale + self.offset_x, y * self.scale)
    }

    pub fn build(mut self) -> Path {
        if self.open {
            self.builder.close();
        }
        self.builder.build()
    }
}

impl ttf_parser::OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.builder.close();
        }
        self.builder.begin(self.map(x, y));
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.map(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quadratic_bezier_to(self.map(x1, y1), self.map(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder
            .cubic_bezier_to(self.map(x1, y1), self.map(x2, y2), self.map(x, y));
    }

    fn close(&mut self) {
        self.builder.close();
        self.open = false;
    }
}

/// Extract a glyph outline as a lyon path in world units.
///
/// Returns `None` for glyphs with no outline (e.g. space).
pub fn glyph_outline(
    face: &ttf_parser::Face,
    glyph_id: ttf_parser::GlyphId,
    scale: f32,
    offset_x: f32,
) -> Option<Path> {
    let mut collector = OutlineCollector::new(scale, offset_x);
    face.outline_glyph(glyph_id, &mut collector)?;
    Some(collector.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_parser::OutlineBuilder;

    #[test]
    fn test_collector_scales_and_offsets() {
        let mut collector = OutlineCollector::new(0.5, 10.0);
        collector.move_to(2.0, 4.0);
        collector.line_to(6.0, 4.0);
        collector.line_to(6.0, 8.0);
        collector.close();

        let path = collector.build();
        let first = path.iter().next();
        match first {
            Some(lyon::path::Event::Begin { at }) => {
                assert!((at.x - 11.0).abs() < 1e-6);
                assert!((at.y - 2.0).abs() < 1e-6);
            }
            other => panic!("Expected Begin event, got {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_contour_is_closed_on_build() {
        let mut collector = OutlineCollector::new(1.0, 0.0);
        collector.move_to(0.0, 0.0);
        collector.line_to(1.0, 0.0);
        collector.line_to(1.0, 1.0);
        // No explicit close; build() must close the contour.
        let path = collector.build();

        let closed = path.iter().any(|event| {
            matches!(event, lyon::path::Event::End { close: true, .. })
        });
        assert!(closed, "Contour left open after build");
    }
}
