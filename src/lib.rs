use image::{GrayImage, Rgba, RgbaImage};

pub use error::{Error, Result};
pub use frequency::{FrequencyTable, TableOptions, Word};
pub use layout::{Angle, LayoutResult, Placement, Rgb};
pub use mask::{CanvasMask, DEFAULT_MASK_THRESHOLD};
pub use placer::{
    layout, layout_with_cancel, random_color, ColorFunc, LayoutConfig, MAX_WORD_MARGIN,
};
pub use render::render;
pub use sat::{OccupancyGrid, Rect};
pub use stopwords::{Stopwords, ENGLISH_STOPWORDS, KOREAN_STOPWORDS};
pub use text::{FontMetrics, GlyphMetrics, MonospaceMetrics};
pub use tokenizer::{ChineseTokenizer, RegexTokenizer, Tokenizer};

mod error;
mod frequency;
mod layout;
mod mask;
mod placer;
mod render;
mod sat;
mod stopwords;
mod text;
mod tokenizer;

pub enum WordCloudSize {
    FromDimensions { width: u32, height: u32 },
    /// Silhouette mask; dark pixels are drawable. The canvas takes the image's size.
    FromMask(GrayImage),
}

impl WordCloudSize {
    pub fn to_mask(&self, threshold: u8) -> Result<CanvasMask> {
        match self {
            WordCloudSize::FromDimensions { width, height } => {
                CanvasMask::from_rectangle(*width, *height)
            }
            WordCloudSize::FromMask(image) => {
                CanvasMask::from_gray(image, image.width(), image.height(), threshold)
            }
        }
    }
}

/// Text in, word cloud out: tokenizer, filters, layout settings and colours
/// for one kind of cloud. Holds no state between runs.
pub struct WordCloud {
    tokenizer: Box<dyn Tokenizer>,
    stopwords: Stopwords,
    table_options: TableOptions,
    layout_config: LayoutConfig,
    mask_threshold: u8,
    background_color: Rgba<u8>,
}

impl Default for WordCloud {
    fn default() -> Self {
        WordCloud {
            tokenizer: Box::new(RegexTokenizer::default()),
            stopwords: Stopwords::default(),
            table_options: TableOptions::default(),
            layout_config: LayoutConfig::default(),
            mask_threshold: DEFAULT_MASK_THRESHOLD,
            background_color: Rgba([255, 255, 255, 255]),
        }
    }
}

impl WordCloud {
    pub fn with_tokenizer(mut self, value: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(value);
        self
    }

    pub fn with_stopwords(mut self, value: Stopwords) -> Self {
        self.stopwords = value;
        self
    }

    pub fn with_table_options(mut self, value: TableOptions) -> Self {
        self.table_options = value;
        self
    }

    pub fn with_layout_config(mut self, value: LayoutConfig) -> Self {
        self.layout_config = value;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.layout_config.seed = seed;
        self
    }

    pub fn with_mask_threshold(mut self, value: u8) -> Self {
        self.mask_threshold = value;
        self
    }

    pub fn with_background_color(mut self, value: Rgba<u8>) -> Self {
        self.background_color = value;
        self
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout_config
    }

    pub fn frequencies(&self, text: &str) -> Result<FrequencyTable> {
        let tokens = self.tokenizer.tokenize(text);
        FrequencyTable::build(tokens, &self.stopwords, &self.table_options)
    }

    pub fn layout_frequencies<M: GlyphMetrics + ?Sized>(
        &self,
        table: &FrequencyTable,
        size: &WordCloudSize,
        metrics: &M,
    ) -> Result<LayoutResult> {
        let mask = size.to_mask(self.mask_threshold)?;
        layout(table, &mask, metrics, &self.layout_config)
    }

    pub fn layout_text<M: GlyphMetrics + ?Sized>(
        &self,
        text: &str,
        size: &WordCloudSize,
        metrics: &M,
    ) -> Result<LayoutResult> {
        let table = self.frequencies(text)?;
        self.layout_frequencies(&table, size, metrics)
    }

    pub fn generate_from_text(
        &self,
        text: &str,
        size: &WordCloudSize,
        font: &FontMetrics,
        scale: f32,
    ) -> Result<RgbaImage> {
        let layout = self.layout_text(text, size, font)?;
        Ok(render(&layout, font, self.background_color, scale))
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};

    use super::{WordCloud, WordCloudSize};
    use crate::{Error, MonospaceMetrics, Stopwords, TableOptions};

    const TEXT: &str = "여우 여우 여우 개 개 고양이 고양이 그리고 그리고 그리고 토끼 사자 사자 사자 사자";

    #[test]
    fn text_to_layout() {
        let cloud = WordCloud::default();
        let table = cloud.frequencies(TEXT).unwrap();
        let words: Vec<&str> = table.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(words, vec!["사자", "여우", "고양이"]);

        let size = WordCloudSize::FromDimensions {
            width: 200,
            height: 120,
        };
        let layout = cloud
            .layout_text(TEXT, &size, &MonospaceMetrics::default())
            .unwrap();
        assert_eq!(layout.len(), 3);
        assert_eq!((layout.width, layout.height), (200, 120));
    }

    #[test]
    fn nothing_matched_is_reported() {
        let cloud = WordCloud::default().with_table_options(TableOptions {
            min_count: 10,
            ..Default::default()
        });
        assert!(matches!(cloud.frequencies(TEXT), Err(Error::EmptyResult)));
    }

    #[test]
    fn blank_mask_is_reported() {
        let cloud = WordCloud::default().with_stopwords(Stopwords::empty());
        let size = WordCloudSize::FromMask(GrayImage::from_pixel(32, 32, Luma([255])));
        let result = cloud.layout_text(TEXT, &size, &MonospaceMetrics::default());
        assert!(matches!(result, Err(Error::InvalidMask { .. })));
    }

    #[test]
    fn seed_is_threaded_through() {
        let size = WordCloudSize::FromDimensions {
            width: 150,
            height: 150,
        };
        let metrics = MonospaceMetrics::default();
        let a = WordCloud::default().with_seed(7).layout_text(TEXT, &size, &metrics).unwrap();
        let b = WordCloud::default().with_seed(7).layout_text(TEXT, &size, &metrics).unwrap();
        assert_eq!(a, b);
    }
}
