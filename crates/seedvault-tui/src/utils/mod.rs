//! Utility functions for the TUI

use std::fmt::Write;

use zeroize::Zeroizing;

/// Longest English BIP-39 word
const MAX_WORD_LEN: usize = 8;

/// Number of grid columns for a phrase of `word_count` words
pub fn grid_columns(word_count: usize) -> usize {
    if word_count > 12 {
        4
    } else {
        3
    }
}

/// Lay out numbered words row by row
///
/// Lines hold phrase material and are wiped when dropped. Each line is
/// formatted in place into a buffer reserved up front, so no unwiped
/// temporary or reallocated copy is left behind.
pub fn word_grid(words: &[String], columns: usize) -> Vec<Zeroizing<String>> {
    let columns = columns.max(1);

    words
        .chunks(columns)
        .enumerate()
        .map(|(row, chunk)| {
            let mut line = Zeroizing::new(String::with_capacity(row_capacity(chunk)));
            for (col, word) in chunk.iter().enumerate() {
                if col > 0 {
                    line.push_str("   ");
                }
                let number = row * columns + col + 1;
                // Writing to a String cannot fail
                let _ = write!(line, "{:>2}. {:<width$}", number, word, width = MAX_WORD_LEN);
            }
            let trimmed = line.trim_end().len();
            line.truncate(trimmed);
            line
        })
        .collect()
}

/// Upper bound on the bytes one grid row needs
fn row_capacity(chunk: &[String]) -> usize {
    // Separator, three-digit number, ". ", the word and its padding
    chunk
        .iter()
        .map(|word| 3 + 3 + 2 + word.len() + MAX_WORD_LEN)
        .sum()
}

/// Shorten a string from the left, keeping its tail
pub fn truncate_start(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().skip(len - max_len).collect()
    } else {
        let tail: String = s.chars().skip(len - (max_len - 3)).collect();
        format!("...{}", tail)
    }
}
