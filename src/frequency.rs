use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Stopwords};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub count: usize,
}

/// Selection policy applied while building a [`FrequencyTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    /// Minimum token length in chars.
    pub min_length: usize,
    pub min_count: usize,
    pub top_n: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            min_length: 2,
            min_count: 2,
            top_n: 200,
        }
    }
}

/// Words sorted by descending count, ties kept in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    words: Vec<Word>,
}

impl FrequencyTable {
    pub fn build<I, S>(tokens: I, stopwords: &Stopwords, options: &TableOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counter = Counter::default();

        for token in tokens {
            let token = token.as_ref();
            if token.chars().count() < options.min_length || stopwords.contains(token) {
                continue;
            }
            counter.add(token, 1);
        }

        Self::select(counter.words, options)
    }

    /// Builds a table from precomputed `(word, count)` pairs. Repeated words are
    /// merged and zero counts are dropped; stopwords are not consulted.
    pub fn from_counts<I, S>(counts: I, options: &TableOptions) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        let mut counter = Counter::default();

        for (word, count) in counts {
            let word = word.as_ref();
            if count == 0 || word.chars().count() < options.min_length {
                continue;
            }
            counter.add(word, count);
        }

        Self::select(counter.words, options)
    }

    fn select(mut words: Vec<Word>, options: &TableOptions) -> Result<Self> {
        words.retain(|word| word.count >= options.min_count);
        // sort_by is stable, so equal counts keep insertion order
        words.sort_by(|a, b| b.count.cmp(&a.count));
        words.truncate(options.top_n);

        if words.is_empty() {
            return Err(Error::EmptyResult);
        }

        Ok(FrequencyTable { words })
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn max_count(&self) -> usize {
        self.words.first().map_or(0, |word| word.count)
    }

    /// Expands the table back into a token stream, each word repeated `count` times.
    pub fn to_tokens(&self) -> Vec<&str> {
        self.words
            .iter()
            .flat_map(|word| std::iter::repeat(word.text.as_str()).take(word.count))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FrequencyTable {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

#[derive(Default)]
struct Counter {
    index: HashMap<String, usize>,
    words: Vec<Word>,
}

impl Counter {
    fn add(&mut self, text: &str, count: usize) {
        match self.index.get(text) {
            Some(&i) => self.words[i].count += count,
            None => {
                self.index.insert(text.to_owned(), self.words.len());
                self.words.push(Word {
                    text: text.to_owned(),
                    count,
                });
            }
        }
    }
}
