//! Word-to-number normalization for the numeric pipeline.

mod words;

pub use words::{PhraseError, convert_words_to_numbers, to_digit_string};
