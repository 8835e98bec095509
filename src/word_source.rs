use include_dir::{include_dir, Dir};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

use crate::error::{Error, Result};

static LANG_DIR: Dir = include_dir!("src/lang");

const BUILTIN_LIST: &str = "english.json";

#[derive(Deserialize, Clone, Debug)]
struct WordList {
    name: String,
    words: Vec<String>,
}

/// A finite pool of candidate words to draw the target text from.
#[derive(Debug, Clone, PartialEq)]
pub struct WordPool {
    name: String,
    words: Vec<String>,
}

impl WordPool {
    /// Read a whitespace separated word file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::WordSourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_words(
            path.display().to_string(),
            contents.split_whitespace().map(str::to_owned),
        )
    }

    /// The word list shipped with the binary.
    pub fn builtin() -> Result<Self> {
        let file = LANG_DIR
            .get_file(BUILTIN_LIST)
            .ok_or_else(|| Error::BuiltinWords(format!("{BUILTIN_LIST} is missing")))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::BuiltinWords(format!("{BUILTIN_LIST} is not utf-8")))?;
        let list: WordList =
            serde_json::from_str(contents).map_err(|e| Error::BuiltinWords(e.to_string()))?;

        Self::from_words(list.name, list.words)
    }

    /// Build a pool from arbitrary strings, dropping anything that could not
    /// be typed as a single word.
    pub fn from_words<I, S>(name: impl Into<String>, words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|w| is_typeable_word(w))
            .collect();

        if words.is_empty() {
            return Err(Error::EmptyWordPool(name));
        }

        Ok(Self { name, words })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Uniform pick with replacement.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }

    /// Endless stream of picks driven by `seed`. The same seed over the same
    /// pool always yields the same sequence.
    pub fn seeded(&self, seed: u64) -> SeededWords<'_> {
        SeededWords {
            pool: self,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

/// The grid gives every char one cell, so wide and combining chars are out.
fn is_typeable_word(word: &str) -> bool {
    !word.is_empty()
        && !word.chars().any(|c| c.is_whitespace() || c.is_control())
        && word.width() == word.chars().count()
}

/// Iterator returned by [`WordPool::seeded`].
#[derive(Debug, Clone)]
pub struct SeededWords<'a> {
    pool: &'a WordPool,
    rng: StdRng,
}

impl<'a> Iterator for SeededWords<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.pool.pick(&mut self.rng)
    }
}
