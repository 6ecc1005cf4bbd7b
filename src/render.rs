use ab_glyph::{Font, PxScale};
use image::{imageops, Rgba, RgbaImage};

use crate::{text, Angle, FontMetrics, LayoutResult, Placement};

/// Draws every placement onto a `background` canvas, `scale` times the layout size.
pub fn render(
    layout: &LayoutResult,
    font: &FontMetrics,
    background: Rgba<u8>,
    scale: f32,
) -> RgbaImage {
    let mut canvas = blank_canvas(layout, background, scale);

    for placement in layout {
        let word = rasterize(placement, font, scale);
        let word = match placement.angle {
            Angle::Horizontal => word,
            Angle::Vertical => imageops::rotate270(&word),
        };

        imageops::overlay(
            &mut canvas,
            &word,
            (placement.x as f32 * scale) as i64,
            (placement.y as f32 * scale) as i64,
        );
    }

    canvas
}

fn blank_canvas(layout: &LayoutResult, background: Rgba<u8>, scale: f32) -> RgbaImage {
    RgbaImage::from_pixel(
        (layout.width as f32 * scale) as u32,
        (layout.height as f32 * scale) as u32,
        background,
    )
}

/// Horizontal rendering of one word, glyph coverage in the alpha channel.
fn rasterize(placement: &Placement, font: &FontMetrics, scale: f32) -> RgbaImage {
    let font = font.font();
    let scale = PxScale::from(placement.font_size * scale);
    let glyph_data = text::text_to_glyphs(placement.text(), font, scale);
    let mut buffer = RgbaImage::new(glyph_data.width.max(1), glyph_data.height.max(1));
    let [r, g, b] = placement.color.0;

    for glyph in glyph_data.glyphs {
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|x, y, v| {
                let final_x = bounds.min.x as i64 + x as i64;
                let final_y = bounds.min.y as i64 + y as i64;
                if final_x < 0
                    || final_y < 0
                    || final_x >= buffer.width() as i64
                    || final_y >= buffer.height() as i64
                {
                    return;
                }

                let px = buffer.get_pixel_mut(final_x as u32, final_y as u32);
                let alpha = (v.clamp(0.0, 1.0) * 255.0) as u8;
                if alpha > px.0[3] {
                    *px = Rgba([r, g, b, alpha]);
                }
            })
        }
    }

    buffer
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::{blank_canvas, render};
    use crate::{Angle, FontMetrics, GlyphMetrics, LayoutResult, Placement, Rgb, Word};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn placement(font: &FontMetrics, text: &str, x: u32, y: u32, angle: Angle) -> Placement {
        let (width, height) = font.measure(text, 24.0, angle);
        Placement {
            word: Word {
                text: text.into(),
                count: 1,
            },
            x,
            y,
            width,
            height,
            font_size: 24.0,
            angle,
            color: Rgb([0, 0, 0]),
        }
    }

    #[test]
    fn words_are_drawn_inside_their_boxes() {
        let font =
            FontMetrics::from_bytes(include_bytes!("../fonts/DejaVuSansMono.ttf").to_vec())
                .unwrap();
        let layout = LayoutResult::new(
            160,
            80,
            vec![
                placement(&font, "dog", 10, 10, Angle::Horizontal),
                placement(&font, "cat", 110, 5, Angle::Vertical),
            ],
        );
        let image = render(&layout, &font, WHITE, 1.0);
        assert_eq!(image.dimensions(), (160, 80));

        let inside = |x: u32, y: u32| {
            layout.iter().any(|p| {
                let b = p.bounds();
                x >= b.x && x < b.right() && y >= b.y && y < b.bottom()
            })
        };
        for (x, y, px) in image.enumerate_pixels() {
            if !inside(x, y) {
                assert_eq!(*px, WHITE, "stray ink at {x},{y}");
            }
        }

        for p in &layout {
            let b = p.bounds();
            let inked = (b.y..b.bottom())
                .flat_map(|y| (b.x..b.right()).map(move |x| (x, y)))
                .any(|(x, y)| image.get_pixel(x, y)[0] < 128);
            assert!(inked, "{} was not drawn", p.text());
        }
    }

    #[test]
    fn canvas_is_scaled_background() {
        let layout = LayoutResult::new(10, 6, Vec::new());
        let image = blank_canvas(&layout, Rgba([255, 255, 255, 255]), 2.0);

        assert_eq!(image.dimensions(), (20, 12));
        assert!(image.pixels().all(|px| *px == Rgba([255, 255, 255, 255])));
    }
}
