use std::{
    fs,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use clap::{Parser, ValueEnum};
use image::Rgba;
use kwcloud::{
    layout_with_cancel, render, CanvasMask, ChineseTokenizer, Error, FontMetrics, FrequencyTable,
    GlyphMetrics, LayoutConfig, MonospaceMetrics, RegexTokenizer, Result, Stopwords,
    TableOptions, Tokenizer, ENGLISH_STOPWORDS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TokenizerKind {
    /// Hangul, Latin and digit runs
    Regex,
    /// jieba segmentation
    Jieba,
    /// jieba segmentation, nouns only
    JiebaNouns,
}

/// Builds a word cloud from a text file.
#[derive(Debug, Parser)]
#[clap(name = "kwcloud", version)]
struct Args {
    /// UTF-8 text file
    input: PathBuf,
    /// PNG output, requires --font
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Layout records as JSON
    #[clap(long)]
    json: Option<PathBuf>,
    #[clap(long)]
    font: Option<PathBuf>,
    /// Silhouette image; dark pixels are drawable
    #[clap(long)]
    mask: Option<PathBuf>,
    #[clap(long, default_value_t = 800)]
    width: u32,
    #[clap(long, default_value_t = 800)]
    height: u32,
    #[clap(long, default_value_t = 128)]
    threshold: u8,
    #[clap(long, value_enum, default_value = "regex")]
    tokenizer: TokenizerKind,
    #[clap(long, default_value_t = 2)]
    min_length: usize,
    #[clap(long, default_value_t = 2)]
    min_count: usize,
    #[clap(long, default_value_t = 200)]
    top_n: usize,
    /// Stopwords added to the English defaults, comma separated
    #[clap(long, default_value = "그리고,하지만,있다,하는,것,수,위한,등,이번,오늘")]
    stopwords: String,
    #[clap(long, default_value_t = 4.0)]
    min_font_size: f32,
    #[clap(long, default_value_t = 120.0)]
    max_font_size: f32,
    #[clap(long, default_value_t = 0.5)]
    scale_exponent: f32,
    #[clap(long, default_value_t = 0.95)]
    font_decay: f32,
    #[clap(long, default_value_t = 2)]
    margin: u32,
    #[clap(long, default_value_t = 0.1)]
    rotate_chance: f64,
    #[clap(long, default_value_t = 42)]
    seed: u64,
    #[clap(long, default_value = "white")]
    background: String,
    /// Output image scale relative to the layout canvas
    #[clap(long, default_value_t = 1.0)]
    scale: f32,
    /// Print the frequency table
    #[clap(long)]
    list: bool,
    /// Abandon the layout after this many milliseconds
    #[clap(long)]
    timeout_ms: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        tracing::error!(error = %e, "word cloud failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let text = fs::read_to_string(&args.input)?;

    let tokenizer: Box<dyn Tokenizer> = match args.tokenizer {
        TokenizerKind::Regex => Box::new(RegexTokenizer::default()),
        TokenizerKind::Jieba => Box::new(ChineseTokenizer::default()),
        TokenizerKind::JiebaNouns => Box::new(ChineseTokenizer::default().with_nouns_only(true)),
    };
    let stopwords = Stopwords::empty()
        .with_words(ENGLISH_STOPWORDS)
        .with_list(&args.stopwords);
    let options = TableOptions {
        min_length: args.min_length,
        min_count: args.min_count,
        top_n: args.top_n,
    };

    let table = match FrequencyTable::build(tokenizer.tokenize(&text), &stopwords, &options) {
        Ok(table) => table,
        Err(Error::EmptyResult) => {
            tracing::warn!("no words matched the filters");
            println!("No words matched. Adjust the filters.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if args.list {
        for word in &table {
            println!("{}\t{}", word.text, word.count);
        }
    }

    let mask = match &args.mask {
        Some(path) => {
            let image = image::open(path)?;
            CanvasMask::from_image(&image, args.width, args.height, args.threshold)?
        }
        None => CanvasMask::from_rectangle(args.width, args.height)?,
    };

    let config = LayoutConfig {
        min_font_size: args.min_font_size,
        max_font_size: args.max_font_size,
        scale_exponent: args.scale_exponent,
        font_decay: args.font_decay,
        word_margin: args.margin,
        word_rotate_chance: args.rotate_chance,
        seed: args.seed,
        ..Default::default()
    };

    let font = args
        .font
        .as_ref()
        .map(|path| FontMetrics::from_path(path))
        .transpose()?;
    if font.is_none() && args.output.is_some() {
        return Err(Error::InvalidConfig("--output needs --font".into()));
    }
    let monospace = MonospaceMetrics::default();
    let metrics: &dyn GlyphMetrics = match &font {
        Some(font) => font,
        None => &monospace,
    };

    let cancel = Arc::new(AtomicBool::new(false));
    if let Some(ms) = args.timeout_ms {
        let cancel = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(ms));
            cancel.store(true, Ordering::Relaxed);
        });
    }

    let now = Instant::now();
    let layout = layout_with_cancel(&table, &mask, metrics, &config, &cancel)?;
    tracing::info!(
        words = table.len(),
        placed = layout.len(),
        elapsed_ms = now.elapsed().as_millis() as u64,
        "layout done"
    );
    if layout.is_empty() {
        println!("No words could be placed. Try a larger canvas or a smaller minimum font size.");
    }

    if let Some(path) = &args.json {
        fs::write(path, layout.to_json()?)?;
    }

    if let (Some(path), Some(font)) = (&args.output, &font) {
        let background = parse_color(&args.background)?;
        render(&layout, font, background, args.scale).save(path)?;
        println!("Saved {}", path.display());
    }

    Ok(())
}

fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let color = csscolorparser::parse(value).map_err(|e| Error::InvalidColor(e.to_string()))?;
    Ok(Rgba(color.to_rgba8()))
}
