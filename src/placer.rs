use std::sync::atomic::{AtomicBool, Ordering};

use nanorand::{Rng, WyRand};
use palette::{Hsl, IntoColor, Pixel, Srgb};
use tracing::{debug, info, trace};

use crate::{
    Angle, CanvasMask, Error, FrequencyTable, GlyphMetrics, LayoutResult, OccupancyGrid,
    Placement, Rect, Result, Rgb, Word,
};

/// Picks a word's colour from the layout's colour stream.
pub type ColorFunc = fn(&Word, &mut WyRand) -> Rgb;

/// Colour stream seed offset, so colour functions never shift positions.
const COLOR_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

pub const MAX_WORD_MARGIN: u32 = 1024;

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub min_font_size: f32,
    pub max_font_size: f32,
    /// Exponent of the count ratio in the sizing law; 0.5 is a square-root compression.
    pub scale_exponent: f32,
    /// Multiplier applied to the font size when a word does not fit.
    pub font_decay: f32,
    /// Free cells kept around each word, split between both sides.
    pub word_margin: u32,
    /// Probability that a word prefers the vertical orientation.
    pub word_rotate_chance: f64,
    pub seed: u64,
    pub color_func: ColorFunc,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            min_font_size: 4.0,
            max_font_size: 120.0,
            scale_exponent: 0.5,
            font_decay: 0.95,
            word_margin: 2,
            word_rotate_chance: 0.10,
            seed: 42,
            color_func: random_color,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Err(Error::InvalidConfig(reason.to_owned()));

        if !(self.min_font_size.is_finite() && self.min_font_size > 0.0) {
            return invalid("min_font_size must be positive");
        }
        if !(self.max_font_size.is_finite() && self.max_font_size >= self.min_font_size) {
            return invalid("max_font_size must be at least min_font_size");
        }
        if !(self.font_decay > 0.0 && self.font_decay < 1.0) {
            return invalid("font_decay must be in (0, 1)");
        }
        if !self.scale_exponent.is_finite() || self.scale_exponent < 0.0 {
            return invalid("scale_exponent must be a non-negative number");
        }
        if !(0.0..=1.0).contains(&self.word_rotate_chance) {
            return invalid("word_rotate_chance must be in [0, 1]");
        }
        if self.word_margin > MAX_WORD_MARGIN {
            return invalid("word_margin must be at most 1024");
        }
        Ok(())
    }

    /// `max * (count / max_count) ^ exponent`, clamped to the configured range.
    pub fn font_size_for(&self, count: usize, max_count: usize) -> f32 {
        if max_count == 0 {
            return self.min_font_size;
        }
        let ratio = count as f32 / max_count as f32;
        (self.max_font_size * ratio.powf(self.scale_exponent))
            .clamp(self.min_font_size, self.max_font_size)
    }
}

/// Fully saturated colour with a random hue.
pub fn random_color(_: &Word, rng: &mut WyRand) -> Rgb {
    let hue: u16 = rng.generate_range(0..360);

    let col = Hsl::new(hue as f32, 1.0, 0.5);
    let rgb: Srgb = col.into_color();

    let raw: [u8; 3] = rgb.into_format().into_raw();

    Rgb(raw)
}

/// Lays out `table` on `mask`, largest words first.
pub fn layout<M>(
    table: &FrequencyTable,
    mask: &CanvasMask,
    metrics: &M,
    config: &LayoutConfig,
) -> Result<LayoutResult>
where
    M: GlyphMetrics + ?Sized,
{
    layout_with_cancel(table, mask, metrics, config, &AtomicBool::new(false))
}

/// Like [`layout`], but stops with [`Error::Cancelled`] once `cancel` is set.
/// The flag is checked before each word.
pub fn layout_with_cancel<M>(
    table: &FrequencyTable,
    mask: &CanvasMask,
    metrics: &M,
    config: &LayoutConfig,
    cancel: &AtomicBool,
) -> Result<LayoutResult>
where
    M: GlyphMetrics + ?Sized,
{
    config.validate()?;
    Placer::new(mask, metrics, config).run(table, cancel)
}

struct Placer<'a, M: ?Sized> {
    metrics: &'a M,
    config: &'a LayoutConfig,
    grid: OccupancyGrid,
    seed_point: (u32, u32),
    rng: WyRand,
    color_rng: WyRand,
}

impl<'a, M: GlyphMetrics + ?Sized> Placer<'a, M> {
    fn new(mask: &CanvasMask, metrics: &'a M, config: &'a LayoutConfig) -> Self {
        Placer {
            metrics,
            config,
            grid: OccupancyGrid::from_mask(mask),
            seed_point: mask.seed_point(),
            rng: WyRand::new_seed(config.seed),
            color_rng: WyRand::new_seed(config.seed ^ COLOR_STREAM),
        }
    }

    fn run(mut self, table: &FrequencyTable, cancel: &AtomicBool) -> Result<LayoutResult> {
        let max_count = table.max_count();
        let mut placements = Vec::with_capacity(table.len());
        // a word never starts larger than the one placed before it
        let mut ceiling = self.config.max_font_size;

        for word in table {
            if cancel.load(Ordering::Relaxed) {
                info!(placed = placements.len(), "layout cancelled");
                return Err(Error::Cancelled {
                    placed: placements.len(),
                });
            }

            let font_size = self.config.font_size_for(word.count, max_count).min(ceiling);
            let angle = self.preferred_angle();

            match self.place(&word.text, font_size, angle) {
                Some((bounds, font_size, angle)) => {
                    ceiling = font_size;
                    let color = (self.config.color_func)(word, &mut self.color_rng);
                    debug!(
                        word = %word.text,
                        x = bounds.x,
                        y = bounds.y,
                        font_size,
                        ?angle,
                        "placed"
                    );

                    placements.push(Placement {
                        word: word.clone(),
                        x: bounds.x,
                        y: bounds.y,
                        width: bounds.width,
                        height: bounds.height,
                        font_size,
                        angle,
                        color,
                    });
                }
                None => debug!(word = %word.text, "no room left, skipped"),
            }
        }

        info!(
            placed = placements.len(),
            skipped = table.len() - placements.len(),
            free_cells = self.grid.free_cells(),
            "layout finished"
        );

        Ok(LayoutResult::new(
            self.grid.width(),
            self.grid.height(),
            placements,
        ))
    }

    fn preferred_angle(&mut self) -> Angle {
        let roll = self.rng.generate_range(0..10_000u32) as f64 / 10_000.0;
        if roll < self.config.word_rotate_chance {
            Angle::Vertical
        } else {
            Angle::Horizontal
        }
    }

    /// Tries `text` at decreasing sizes until it fits. Returns the glyph box,
    /// the final font size and orientation.
    fn place(
        &mut self,
        text: &str,
        start_size: f32,
        preferred: Angle,
    ) -> Option<(Rect, f32, Angle)> {
        let orientations = if self.config.word_rotate_chance > 0.0 {
            vec![preferred, preferred.flipped()]
        } else {
            vec![Angle::Horizontal]
        };
        let margin = self.config.word_margin;
        let mut font_size = start_size;

        loop {
            for &angle in &orientations {
                let (width, height) = self.metrics.measure(text, font_size, angle);
                if width == 0 || height == 0 {
                    return None;
                }

                let (Some(footprint_w), Some(footprint_h)) =
                    (width.checked_add(margin), height.checked_add(margin))
                else {
                    continue;
                };
                if let Some(footprint) = self.search(footprint_w, footprint_h) {
                    self.grid.occupy(&footprint);
                    let bounds = Rect {
                        x: footprint.x + margin / 2,
                        y: footprint.y + margin / 2,
                        width,
                        height,
                    };
                    return Some((bounds, font_size, angle));
                }
            }

            if font_size <= self.config.min_font_size {
                return None;
            }
            font_size = (font_size * self.config.font_decay).max(self.config.min_font_size);
            trace!(text, font_size, "shrinking");
        }
    }

    /// First free `width` x `height` footprint along the spiral around the seed point.
    fn search(&self, width: u32, height: u32) -> Option<Rect> {
        let (canvas_w, canvas_h) = (self.grid.width(), self.grid.height());
        if width > canvas_w
            || height > canvas_h
            || width as usize * height as usize > self.grid.free_cells()
        {
            return None;
        }

        let spiral = Spiral::centered(
            self.seed_point,
            width,
            height,
            canvas_w - width,
            canvas_h - height,
        );
        let footprint = |(x, y): (u32, u32)| Rect {
            x,
            y,
            width,
            height,
        };

        spiral
            .find(|x, y| self.grid.region_is_empty(&footprint((x, y))))
            .map(footprint)
    }
}

/// Square rings of top-left candidates around a centre, clipped to
/// `[0, max_x] x [0, max_y]`. Every in-range position is visited exactly once,
/// ring by ring, clockwise from the top-left corner of each ring.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Spiral {
    cx: i64,
    cy: i64,
    max_x: i64,
    max_y: i64,
}

impl Spiral {
    /// Centres a `width` x `height` box on `seed`, clamped into range.
    pub(crate) fn centered(
        seed: (u32, u32),
        width: u32,
        height: u32,
        max_x: u32,
        max_y: u32,
    ) -> Self {
        let cx = (seed.0 as i64 - width as i64 / 2).clamp(0, max_x as i64);
        let cy = (seed.1 as i64 - height as i64 / 2).clamp(0, max_y as i64);
        Spiral {
            cx,
            cy,
            max_x: max_x as i64,
            max_y: max_y as i64,
        }
    }

    fn max_radius(&self) -> i64 {
        self.cx
            .max(self.max_x - self.cx)
            .max(self.cy)
            .max(self.max_y - self.cy)
    }

    pub(crate) fn find<F>(&self, mut accept: F) -> Option<(u32, u32)>
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut probe = |x: i64, y: i64| {
            let (x, y) = (x as u32, y as u32);
            accept(x, y).then_some((x, y))
        };

        if let Some(hit) = probe(self.cx, self.cy) {
            return Some(hit);
        }

        for r in 1..=self.max_radius() {
            let (top, bottom) = (self.cy - r, self.cy + r);
            let (left, right) = (self.cx - r, self.cx + r);
            let (x0, x1) = (left.max(0), right.min(self.max_x));
            let inner_y0 = (top + 1).max(0);

            if top >= 0 {
                for x in x0..=x1 {
                    if let Some(hit) = probe(x, top) {
                        return Some(hit);
                    }
                }
            }
            if right <= self.max_x {
                for y in inner_y0..=bottom.min(self.max_y) {
                    if let Some(hit) = probe(right, y) {
                        return Some(hit);
                    }
                }
            }
            if bottom <= self.max_y {
                for x in (x0..=(right - 1).min(self.max_x)).rev() {
                    if let Some(hit) = probe(x, bottom) {
                        return Some(hit);
                    }
                }
            }
            if left >= 0 {
                for y in (inner_y0..=(bottom - 1).min(self.max_y)).rev() {
                    if let Some(hit) = probe(left, y) {
                        return Some(hit);
                    }
                }
            }
        }

        None
    }
}
