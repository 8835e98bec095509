use itertools::Itertools;
use std::fmt;

use crate::error::{Error, Result};

/// The cell placed after every word. It is typed like any other character.
pub const SEPARATOR: char = ' ';

/// Word-wrapped target text, one `Vec<char>` per display row.
///
/// Every row ends with a [`SEPARATOR`]. A layout that stopped before filling
/// the grid carries one trailing empty row, which marks the end of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBuffer {
    rows: Vec<Vec<char>>,
    columns: usize,
}

impl TargetBuffer {
    /// Take rows verbatim. The column width is the longest row.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<Vec<char>> = rows
            .into_iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);

        Self { rows, columns }
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<char> {
        self.rows.get(row)?.get(column).copied()
    }

    pub fn is_separator(&self, row: usize, column: usize) -> bool {
        self.get(row, column) == Some(SEPARATOR)
    }

    /// Total number of typeable cells, separators included.
    pub fn char_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn row_string(&self, row: usize) -> String {
        self.rows.get(row).map(|r| r.iter().collect()).unwrap_or_default()
    }
}

impl fmt::Display for TargetBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .rows
            .iter()
            .map(|row| row.iter().collect::<String>())
            .join("\n");
        f.write_str(&text)
    }
}

/// Lay words out on a `columns` x `rows` grid.
///
/// Words are consumed from `words` until `word_budget` words are placed, the
/// iterator runs dry, or the next word would need a row past `rows`. `None`
/// as budget fills the grid. A word that cannot fit even on an empty row is
/// an error rather than something to skip.
pub fn build<I, S>(
    words: I,
    columns: usize,
    rows: usize,
    word_budget: Option<usize>,
) -> Result<TargetBuffer>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if columns == 0 || rows == 0 {
        return Err(Error::InvalidDimensions {
            columns,
            rows,
            min_columns: 1,
            min_rows: 1,
        });
    }

    let budget = word_budget.unwrap_or(usize::MAX);
    let mut filled: Vec<Vec<char>> = Vec::with_capacity(rows);
    let mut current: Vec<char> = Vec::with_capacity(columns);
    let mut placed = 0;
    let mut words = words.into_iter();

    while placed < budget {
        let Some(word) = words.next() else {
            break;
        };
        let word = word.as_ref();
        let width = word.chars().count();

        if width + 1 > columns {
            return Err(Error::WordTooWide {
                word: word.to_owned(),
                columns,
            });
        }

        if current.len() + width + 1 > columns {
            if filled.len() + 1 == rows {
                break;
            }
            filled.push(std::mem::take(&mut current));
        }

        current.extend(word.chars());
        current.push(SEPARATOR);
        placed += 1;
    }

    if placed == 0 {
        return Err(Error::NoWordsPlaced);
    }

    filled.push(current);
    if filled.len() < rows {
        filled.push(Vec::new());
    }

    tracing::debug!(rows = filled.len(), words = placed, columns, "layout built");

    Ok(TargetBuffer {
        rows: filled,
        columns,
    })
}
