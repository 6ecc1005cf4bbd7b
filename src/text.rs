use std::{fs, path::Path};

use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, Point, PxScale, ScaleFont};

use crate::{Angle, Error, Result};

/// Bounding-box measurement of a word, the only thing placement needs from a font.
pub trait GlyphMetrics {
    /// `(width, height)` of `text` at `font_size`, already swapped for vertical words.
    fn measure(&self, text: &str, font_size: f32, angle: Angle) -> (u32, u32);
}

fn oriented((width, height): (u32, u32), angle: Angle) -> (u32, u32) {
    match angle {
        Angle::Horizontal => (width, height),
        Angle::Vertical => (height, width),
    }
}

/// Metrics from a real font file.
pub struct FontMetrics {
    font: FontVec,
}

impl FontMetrics {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|_| Error::InvalidFont)?;
        Ok(FontMetrics { font })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    pub fn font(&self) -> &FontVec {
        &self.font
    }
}

impl GlyphMetrics for FontMetrics {
    fn measure(&self, text: &str, font_size: f32, angle: Angle) -> (u32, u32) {
        let glyphs = text_to_glyphs(text, &self.font, PxScale::from(font_size));
        oriented((glyphs.width, glyphs.height), angle)
    }
}

/// Font-free approximation: ASCII characters advance `advance` em, everything
/// else (Hangul, CJK) a full em. Lines are `line_height` em tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        MonospaceMetrics {
            advance: 0.5,
            line_height: 1.25,
        }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn measure(&self, text: &str, font_size: f32, angle: Angle) -> (u32, u32) {
        let ems: f32 = text
            .chars()
            .filter(|c| !c.is_control())
            .map(|c| if c.is_ascii() { self.advance } else { 1.0 })
            .sum();
        if ems == 0.0 {
            return (0, 0);
        }

        let width = (ems * font_size).ceil() as u32;
        let height = (self.line_height * font_size).ceil() as u32;
        oriented((width, height), angle)
    }
}

#[derive(Clone, Debug)]
pub struct GlyphData {
    pub glyphs: Vec<Glyph>,
    pub width: u32,
    pub height: u32,
}

//把文本转换为字体，方便画图
pub fn text_to_glyphs(text: &str, font: &FontVec, scale: PxScale) -> GlyphData {
    let scaled_font = font.as_scaled(scale);

    let mut glyphs: Vec<Glyph> = vec![];
    layout_paragraph(scaled_font, point(0.0, 0.0), text, &mut glyphs);

    if glyphs.is_empty() {
        return GlyphData {
            glyphs,
            width: 0,
            height: 0,
        };
    }

    let glyphs_height = scaled_font.height().ceil() as u32;
    let glyphs_width = {
        let min_x = glyphs[0].position.x;
        let last_glyph = &glyphs[glyphs.len() - 1];
        let max_x = last_glyph.position.x + scaled_font.h_advance(last_glyph.id);
        (max_x - min_x).ceil() as u32
    };

    GlyphData {
        glyphs,
        width: glyphs_width,
        height: glyphs_height,
    }
}

/// Lays out a single line; words never contain line breaks, so control
/// characters are skipped.
pub fn layout_paragraph<F, SF>(font: SF, position: Point, text: &str, target: &mut Vec<Glyph>)
where
    F: Font,
    SF: ScaleFont<F>,
{
    let mut caret = position + point(0.0, font.ascent());
    let mut last_glyph: Option<GlyphId> = None;
    for c in text.chars() {
        if c.is_control() {
            continue;
        }

        let mut glyph = font.scaled_glyph(c);
        if let Some(previous) = last_glyph.take() {
            caret.x += font.kern(previous, glyph.id);
        }
        glyph.position = caret;
        last_glyph = Some(glyph.id);
        caret.x += font.h_advance(glyph.id);

        target.push(glyph);
    }
}

#[cfg(test)]
mod tests {
    use super::{FontMetrics, GlyphMetrics, MonospaceMetrics};
    use crate::{Angle, Error};

    fn font() -> FontMetrics {
        FontMetrics::from_bytes(include_bytes!("../fonts/DejaVuSansMono.ttf").to_vec()).unwrap()
    }

    #[test]
    fn font_measures_glyph_boxes() {
        let font = font();
        let (width, height) = font.measure("dog", 20.0, Angle::Horizontal);
        assert!(width > 0 && height >= 20, "{width}x{height}");
        assert_eq!(font.measure("dog", 20.0, Angle::Vertical), (height, width));

        // fixed advance: twice the text, twice the width
        let (double, _) = font.measure("dogdog", 20.0, Angle::Horizontal);
        assert!(double.abs_diff(2 * width) <= 1, "{double} vs {width}");

        let (bigger, _) = font.measure("dog", 40.0, Angle::Horizontal);
        assert!(bigger > width);
        assert_eq!(font.measure("", 20.0, Angle::Horizontal), (0, 0));
    }

    #[test]
    fn monospace_measures_ascii_and_hangul() {
        let metrics = MonospaceMetrics::default();
        assert_eq!(metrics.measure("dog", 10.0, Angle::Horizontal), (15, 13));
        assert_eq!(metrics.measure("여우", 10.0, Angle::Horizontal), (20, 13));
        assert_eq!(metrics.measure("dog", 10.0, Angle::Vertical), (13, 15));
        assert_eq!(metrics.measure("\n", 10.0, Angle::Horizontal), (0, 0));
    }

    #[test]
    fn larger_font_is_never_smaller() {
        let metrics = MonospaceMetrics::default();
        let (w1, h1) = metrics.measure("cloud", 12.0, Angle::Horizontal);
        let (w2, h2) = metrics.measure("cloud", 24.0, Angle::Horizontal);
        assert!(w2 >= w1 && h2 >= h1);
    }

    #[test]
    fn garbage_font_is_rejected() {
        assert!(matches!(
            FontMetrics::from_bytes(vec![0, 1, 2, 3]),
            Err(Error::InvalidFont)
        ));
    }

    #[test]
    fn missing_font_file_is_io_error() {
        assert!(matches!(
            FontMetrics::from_path("does/not/exist.ttf"),
            Err(Error::Io(_))
        ));
    }
}
