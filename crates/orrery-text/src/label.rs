//! Naive single-line text layout: one baseline, pen advance per glyph, no
//! kerning or shaping. Enough for a short floating label.

use thiserror::Error;

use crate::extrude::{ExtrudedMesh, extrude_path};
use crate::outline::glyph_outline;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("failed to parse font face: {0}")]
    FaceParse(#[from] ttf_parser::FaceParsingError),

    #[error("glyph tessellation failed: {0}")]
    Tessellation(String),

    #[error("text size must be positive, got {0}")]
    NonPositiveSize(f32),
}

/// A laid-out, extruded string.
#[derive(Debug, Default, Clone)]
pub struct LabelMesh {
    pub mesh: ExtrudedMesh,
    /// Total pen advance in world units, useful for centering.
    pub advance_width: f32,
}

/// Build an extruded mesh for a single line of text.
///
/// The baseline sits at y = 0 and the pen starts at x = 0; the caller places
/// the result with a model transform. Characters without an outline (spaces,
/// glyphs missing from the font) still advance the pen.
pub fn build_label_mesh(
    font_bytes: &[u8],
    text: &str,
    size: f32,
    depth: f32,
) -> Result<LabelMesh, TextError> {
    if size <= 0.0 {
        return Err(TextError::NonPositiveSize(size));
    }

    let face = ttf_parser::Face::parse(font_bytes, 0)?;
    let scale = size / f32::from(face.units_per_em());
    let tolerance = (size * 0.005).max(1e-4);

    let mut label = LabelMesh::default();
    let mut pen_x = 0.0f32;
    let mut missing = 0usize;

    for ch in text.chars() {
        let Some(glyph_id) = face.glyph_index(ch) else {
            missing += 1;
            pen_x += size * 0.5;
            continue;
        };

        if let Some(path) = glyph_outline(&face, glyph_id, scale, pen_x) {
            let glyph_mesh = extrude_path(&path, tolerance, depth)
                .map_err(|e| TextError::Tessellation(format!("{e:?}")))?;
            label.mesh.append(&glyph_mesh);
        }

        if let Some(advance) = face.glyph_hor_advance(glyph_id) {
            pen_x += f32::from(advance) * scale;
        }
    }

    if missing > 0 {
        tracing::warn!(missing, text, "font is missing glyphs for label");
    }

    label.advance_width = pen_x;
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn be16(buf: &mut Vec<u8>, v: u16) {
        buf.extend_from_slice(&v.to_be_bytes());
    }

    fn be32(buf: &mut Vec<u8>, v: u32) {
        buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Hand-assembled two-glyph TrueType face: glyph 0 empty, glyph 1 a
    /// 200-unit square that 'A' maps to. 1000 units per em, advance 600.
    /// Carries just the tables parsing, outlining, and metrics need.
    fn square_glyph_font() -> Vec<u8> {
        let mut head = Vec::new();
        be32(&mut head, 0x0001_0000); // version
        be32(&mut head, 0); // fontRevision
        be32(&mut head, 0); // checkSumAdjustment
        be32(&mut head, 0x5F0F_3CF5); // magicNumber
        be16(&mut head, 0); // flags
        be16(&mut head, 1000); // unitsPerEm
        head.extend_from_slice(&[0u8; 16]); // created + modified
        for bound in [0i16, 0, 200, 200] {
            head.extend_from_slice(&bound.to_be_bytes());
        }
        be16(&mut head, 0); // macStyle
        be16(&mut head, 8); // lowestRecPPEM
        be16(&mut head, 2); // fontDirectionHint
        be16(&mut head, 0); // indexToLocFormat: short loca
        be16(&mut head, 0); // glyphDataFormat

        let mut hhea = Vec::new();
        be32(&mut hhea, 0x0001_0000);
        for metric in [800i16, -200, 0] {
            hhea.extend_from_slice(&metric.to_be_bytes());
        }
        be16(&mut hhea, 600); // advanceWidthMax
        for field in [0i16, 0, 200, 1, 0, 0, 0, 0, 0, 0, 0] {
            hhea.extend_from_slice(&field.to_be_bytes());
        }
        be16(&mut hhea, 2); // numberOfHMetrics

        let mut maxp = Vec::new();
        be32(&mut maxp, 0x0001_0000);
        be16(&mut maxp, 2); // numGlyphs
        for field in [4u16, 1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0] {
            be16(&mut maxp, field);
        }

        let mut hmtx = Vec::new();
        for (advance, lsb) in [(500u16, 0i16), (600, 0)] {
            be16(&mut hmtx, advance);
            hmtx.extend_from_slice(&lsb.to_be_bytes());
        }

        // Format 4 subtable with two segments: ['A', 'A'] and the 0xFFFF
        // terminator. idDelta maps 0x41 to glyph 1.
        let mut cmap = Vec::new();
        be16(&mut cmap, 0); // version
        be16(&mut cmap, 1); // numTables
        be16(&mut cmap, 3); // platform: Windows
        be16(&mut cmap, 1); // encoding: Unicode BMP
        be32(&mut cmap, 12); // subtable offset
        be16(&mut cmap, 4); // format
        be16(&mut cmap, 32); // length
        be16(&mut cmap, 0); // language
        be16(&mut cmap, 4); // segCountX2
        be16(&mut cmap, 4); // searchRange
        be16(&mut cmap, 1); // entrySelector
        be16(&mut cmap, 0); // rangeShift
        for end in [0x0041u16, 0xFFFF] {
            be16(&mut cmap, end);
        }
        be16(&mut cmap, 0); // reservedPad
        for start in [0x0041u16, 0xFFFF] {
            be16(&mut cmap, start);
        }
        for delta in [0xFFC0u16, 1] {
            be16(&mut cmap, delta);
        }
        for range_offset in [0u16, 0] {
            be16(&mut cmap, range_offset);
        }

        // Glyph 1: one clockwise square contour, four on-curve points with
        // short coordinate deltas.
        let mut glyf = Vec::new();
        for header in [1i16, 0, 0, 200, 200] {
            glyf.extend_from_slice(&header.to_be_bytes());
        }
        be16(&mut glyf, 3); // endPtsOfContours
        be16(&mut glyf, 0); // instructionLength
        glyf.extend_from_slice(&[0x37, 0x37, 0x37, 0x17]); // point flags
        glyf.extend_from_slice(&[0, 0, 200, 0]); // x deltas
        glyf.extend_from_slice(&[0, 200, 0, 200]); // y deltas

        // Short loca, offsets in words: glyph 0 is empty.
        let mut loca = Vec::new();
        for offset in [0u16, 0, (glyf.len() / 2) as u16] {
            be16(&mut loca, offset);
        }

        // Table directory, tags in sorted order. Checksums are left zero;
        // the parser does not verify them.
        let tables: [(&[u8; 4], &[u8]); 7] = [
            (b"cmap", &cmap),
            (b"glyf", &glyf),
            (b"head", &head),
            (b"hhea", &hhea),
            (b"hmtx", &hmtx),
            (b"loca", &loca),
            (b"maxp", &maxp),
        ];

        let mut font = Vec::new();
        be32(&mut font, 0x0001_0000); // sfnt version
        be16(&mut font, tables.len() as u16);
        be16(&mut font, 64); // searchRange
        be16(&mut font, 2); // entrySelector
        be16(&mut font, 48); // rangeShift

        let mut offset = 12 + tables.len() * 16;
        for (tag, data) in &tables {
            font.extend_from_slice(*tag);
            be32(&mut font, 0); // checksum
            be32(&mut font, offset as u32);
            be32(&mut font, data.len() as u32);
            offset += data.len().next_multiple_of(4);
        }
        for (_, data) in &tables {
            font.extend_from_slice(data);
            font.resize(font.len().next_multiple_of(4), 0);
        }
        font
    }

    #[test]
    fn test_ascii_text_builds_solid_mesh() {
        let font = square_glyph_font();
        let depth = 0.02;
        let label = build_label_mesh(&font, "AA", 0.15, depth).unwrap();

        assert!(!label.mesh.is_empty());
        let count = label.mesh.vertices.len() as u32;
        assert!(label.mesh.indices.iter().all(|&i| i < count));
        assert_eq!(label.mesh.indices.len() % 3, 0);

        // Every vertex sits on one of the two caps.
        for vertex in &label.mesh.vertices {
            assert!((vertex.position[2].abs() - depth * 0.5).abs() < 1e-6);
        }

        // Two glyphs at 600 font units each, scaled by 0.15 / 1000.
        assert!((label.advance_width - 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_glyphless_characters_still_advance_pen() {
        let font = square_glyph_font();
        let solid = build_label_mesh(&font, "A", 0.15, 0.02).unwrap();
        let spaced = build_label_mesh(&font, "?A", 0.15, 0.02).unwrap();

        assert_eq!(solid.mesh.vertices.len(), spaced.mesh.vertices.len());
        assert!(spaced.advance_width > solid.advance_width);
    }

    #[test]
    fn test_garbage_bytes_fail_to_parse() {
        let result = build_label_mesh(&[0u8; 16], "Hi", 0.15, 0.02);
        assert!(matches!(result, Err(TextError::FaceParse(_))));
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let result = build_label_mesh(&[], "Hi", 0.0, 0.02);
        assert!(matches!(result, Err(TextError::NonPositiveSize(_))));
    }
}
