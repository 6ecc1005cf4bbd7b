use std::collections::HashSet;

/// English stopwords shipped with the classic python wordcloud package.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm",
    "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k",
    "let's", "like", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours",
    "ourselves", "out", "over", "own", "r", "same", "shall", "shan't", "she", "she'd",
    "she'll", "she's", "should", "shouldn't", "since", "so", "some", "such", "than", "that",
    "that's", "the", "their", "theirs", "them", "themselves", "then", "there", "there's",
    "therefore", "these", "they", "they'd", "they'll", "they're", "they've", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd",
    "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with", "won't",
    "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];

/// Korean function words filtered by default.
pub const KOREAN_STOPWORDS: &[&str] = &[
    "그리고", "하지만", "있다", "하는", "것", "수", "위한", "등", "이번", "오늘",
];

/// Case-insensitive stopword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Stopwords::empty()
            .with_words(ENGLISH_STOPWORDS)
            .with_words(KOREAN_STOPWORDS)
    }
}

impl Stopwords {
    pub fn empty() -> Self {
        Stopwords {
            words: HashSet::new(),
        }
    }

    pub fn with_words<S: AsRef<str>>(mut self, words: &[S]) -> Self {
        self.extend(words.iter().map(|word| word.as_ref()));
        self
    }

    /// Adds every non-blank entry of a comma separated list, e.g. `"이번, 오늘"`.
    pub fn with_list(mut self, list: &str) -> Self {
        self.extend(Self::parse_list(list));
        self
    }

    pub fn parse_list(list: &str) -> impl Iterator<Item = &str> {
        list.split(',').map(str::trim).filter(|word| !word.is_empty())
    }

    pub fn extend<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        self.words
            .extend(words.into_iter().map(|word| word.to_lowercase()));
    }

    pub fn contains(&self, word: &str) -> bool {
        !self.words.is_empty() && self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Stopwords;

    #[test]
    fn default_has_english_and_korean() {
        let stopwords = Stopwords::default();
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("The"));
        assert!(stopwords.contains("그리고"));
        assert!(!stopwords.contains("여우"));
    }

    #[test]
    fn list_is_trimmed_and_skips_blanks() {
        let stopwords = Stopwords::empty().with_list(" 이번, ,오늘 ,,Fox");
        assert_eq!(stopwords.len(), 3);
        assert!(stopwords.contains("이번"));
        assert!(stopwords.contains("오늘"));
        assert!(stopwords.contains("fox"));
    }

    #[test]
    fn empty_contains_nothing() {
        assert!(!Stopwords::empty().contains(""));
        assert!(Stopwords::empty().is_empty());
    }
}
