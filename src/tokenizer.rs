use jieba_rs::Jieba;
use regex::Regex;

/// Splits raw text into candidate tokens. Filtering by length, stopwords and
/// counts happens later in [`FrequencyTable::build`](crate::FrequencyTable::build).
pub trait Tokenizer {
    fn tokenize<'a>(&'a self, text: &'a str) -> Vec<&'a str>;
}

/// Runs of Hangul syllables, Latin letters and digits.
pub const HANGUL_PATTERN: &str = "[가-힣A-Za-z0-9]+";

pub struct RegexTokenizer {
    regex: Regex,
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        let regex = Regex::new(HANGUL_PATTERN).expect("Unable to compile tokenization regex");
        RegexTokenizer { regex }
    }
}

impl RegexTokenizer {
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(RegexTokenizer {
            regex: Regex::new(pattern)?,
        })
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize<'a>(&'a self, text: &'a str) -> Vec<&'a str> {
        self.regex.find_iter(text).map(|mat| mat.as_str()).collect()
    }
}

pub struct ChineseTokenizer {
    //分词正则
    regex: Regex,
    pub jieba: Jieba,
    pub exclude_numbers: bool,
    /// Keep only words whose part-of-speech tag marks a noun.
    pub nouns_only: bool,
}

impl Default for ChineseTokenizer {
    fn default() -> Self {
        let regex = Regex::new("\\w[\\w']*").expect("Unable to compile tokenization regex");

        ChineseTokenizer {
            regex,
            jieba: Jieba::new(),
            exclude_numbers: true,
            nouns_only: false,
        }
    }
}

impl ChineseTokenizer {
    pub fn with_word(mut self, word: &str) -> Self {
        self.jieba.add_word(word, None, None);
        self
    }

    pub fn with_exclude_numbers(mut self, value: bool) -> Self {
        self.exclude_numbers = value;
        self
    }

    pub fn with_nouns_only(mut self, value: bool) -> Self {
        self.nouns_only = value;
        self
    }

    fn segment<'a>(&'a self, chunk: &'a str) -> Vec<&'a str> {
        if self.nouns_only {
            self.jieba
                .tag(chunk, true)
                .into_iter()
                .filter(|tag| tag.tag.starts_with('n'))
                .map(|tag| tag.word)
                .collect()
        } else {
            self.jieba.cut(chunk, false)
        }
    }
}

impl Tokenizer for ChineseTokenizer {
    fn tokenize<'a>(&'a self, text: &'a str) -> Vec<&'a str> {
        self.regex
            .find_iter(text)
            .map(|mat| mat.as_str())
            .filter(|str| !str.is_empty())
            .flat_map(|str| self.segment(str))
            .filter(|word| !(self.exclude_numbers && word.chars().all(char::is_numeric)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChineseTokenizer, RegexTokenizer, Tokenizer};

    #[test]
    fn regex_splits_hangul_and_latin() {
        let tokenizer = RegexTokenizer::default();
        let tokens = tokenizer.tokenize("오늘은 Rust로 워드클라우드를, 2024년에! 만든다.");

        assert_eq!(
            tokens,
            vec!["오늘은", "Rust로", "워드클라우드를", "2024년에", "만든다"]
        );
    }

    #[test]
    fn regex_custom_pattern() {
        let tokenizer = RegexTokenizer::with_pattern("[a-z]+").unwrap();
        assert_eq!(tokenizer.tokenize("fox DOG cat"), vec!["fox", "cat"]);
        assert!(RegexTokenizer::with_pattern("[").is_err());
    }

    #[test]
    fn jieba_segments_sentence() {
        let tokenizer = ChineseTokenizer::default();
        let tokens = tokenizer.tokenize("我们中出了一个叛徒");

        assert_eq!(tokens, vec!["我们", "中", "出", "了", "一个", "叛徒"]);
    }

    #[test]
    fn jieba_excludes_numbers() {
        let text = "2023 悟空传";
        let tokenizer = ChineseTokenizer::default();
        let tokens = tokenizer.tokenize(text);
        assert!(!tokens.contains(&"2023"));
        assert!(!tokens.is_empty());

        let tokenizer = ChineseTokenizer::default().with_exclude_numbers(false);
        let tokens = tokenizer.tokenize(text);
        assert!(tokens.contains(&"2023"));
    }

    #[test]
    fn jieba_nouns_drop_particles() {
        let tokenizer = ChineseTokenizer::default().with_nouns_only(true);
        let tokens = tokenizer.tokenize("我们中出了一个叛徒");

        assert!(!tokens.contains(&"了"));
        assert!(!tokens.contains(&"我们"));
    }
}
