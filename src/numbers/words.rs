//! Spoken number phrase parsing.
//!
//! Turns transcripts such as "twenty three" or "two hundred and five"
//! into their canonical digit string. Words outside the number vocabulary
//! are dropped, so filler around the number ("it is twenty three") does
//! not spoil the parse; a phrase with no number words at all is an error.

use regex::Regex;
use thiserror::Error;

/// Why a phrase could not be converted to a number.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhraseError {
    #[error("no number words in the phrase")]
    NoNumber,
    #[error("the number is too large to represent")]
    Overflow,
}

/// Role a token plays in a number phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberWord {
    /// A direct value: units, teens, tens ("seven", "fifteen", "forty").
    Value(u64),
    /// The "hundred" multiplier, which scales the current group.
    Hundred,
    /// A scale word that closes the current group ("thousand", "million").
    Magnitude(u64),
    /// Filler that carries no value ("and").
    Connective,
}

/// Classify one lowercase token.
fn number_word(token: &str) -> Option<NumberWord> {
    let word = match token {
        "zero" => NumberWord::Value(0),
        "one" => NumberWord::Value(1),
        "two" => NumberWord::Value(2),
        "three" => NumberWord::Value(3),
        "four" => NumberWord::Value(4),
        "five" => NumberWord::Value(5),
        "six" => NumberWord::Value(6),
        "seven" => NumberWord::Value(7),
        "eight" => NumberWord::Value(8),
        "nine" => NumberWord::Value(9),
        "ten" => NumberWord::Value(10),
        "eleven" => NumberWord::Value(11),
        "twelve" => NumberWord::Value(12),
        "thirteen" => NumberWord::Value(13),
        "fourteen" => NumberWord::Value(14),
        "fifteen" => NumberWord::Value(15),
        "sixteen" => NumberWord::Value(16),
        "seventeen" => NumberWord::Value(17),
        "eighteen" => NumberWord::Value(18),
        "nineteen" => NumberWord::Value(19),
        "twenty" => NumberWord::Value(20),
        "thirty" => NumberWord::Value(30),
        "forty" => NumberWord::Value(40),
        "fifty" => NumberWord::Value(50),
        "sixty" => NumberWord::Value(60),
        "seventy" => NumberWord::Value(70),
        "eighty" => NumberWord::Value(80),
        "ninety" => NumberWord::Value(90),
        "hundred" => NumberWord::Hundred,
        "thousand" => NumberWord::Magnitude(1_000),
        "million" => NumberWord::Magnitude(1_000_000),
        "billion" => NumberWord::Magnitude(1_000_000_000),
        "and" => NumberWord::Connective,
        _ => return None,
    };
    Some(word)
}

/// Convert a spoken number phrase to its digit string.
///
/// Accepts hyphenated and punctuated transcripts ("Twenty-three." is 23)
/// as well as digit tokens mixed into the phrase. Words outside the
/// number vocabulary are ignored.
///
/// # Errors
/// [`PhraseError::NoNumber`] when the phrase contains no number words at
/// all, [`PhraseError::Overflow`] when the value does not fit in `u64`.
pub fn convert_words_to_numbers(text: &str) -> Result<String, PhraseError> {
    let token_pattern = Regex::new(r"[a-z]+|[0-9]+").expect("token pattern is valid");
    let lowered = text.to_lowercase();

    let mut total: u64 = 0;
    let mut group: u64 = 0;
    let mut seen_number = false;

    for token in token_pattern.find_iter(&lowered).map(|m| m.as_str()) {
        let word = if token.chars().all(|c| c.is_ascii_digit()) {
            NumberWord::Value(token.parse().map_err(|_| PhraseError::Overflow)?)
        } else {
            match number_word(token) {
                Some(word) => word,
                None => continue,
            }
        };

        match word {
            NumberWord::Value(value) => {
                group = group.checked_add(value).ok_or(PhraseError::Overflow)?;
                seen_number = true;
            }
            NumberWord::Hundred => {
                group = if group == 0 {
                    100
                } else {
                    group.checked_mul(100).ok_or(PhraseError::Overflow)?
                };
                seen_number = true;
            }
            NumberWord::Magnitude(scale) => {
                let multiplier = if group == 0 { 1 } else { group };
                let closed = multiplier.checked_mul(scale).ok_or(PhraseError::Overflow)?;
                total = total.checked_add(closed).ok_or(PhraseError::Overflow)?;
                group = 0;
                seen_number = true;
            }
            NumberWord::Connective => {}
        }
    }

    if !seen_number {
        return Err(PhraseError::NoNumber);
    }

    let value = total.checked_add(group).ok_or(PhraseError::Overflow)?;
    Ok(value.to_string())
}

/// Extract the digit string a transcript stands for.
///
/// Literal digits win: "route 66" yields "66" without consulting the
/// phrase grammar. Only when the transcript carries no digits at all is it
/// parsed as a spoken number phrase.
pub fn to_digit_string(text: &str) -> Result<String, PhraseError> {
    let literal: String = text.chars().filter(char::is_ascii_digit).collect();
    if !literal.is_empty() {
        return Ok(literal);
    }
    convert_words_to_numbers(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_phrase() {
        assert_eq!(convert_words_to_numbers("twenty three").unwrap(), "23");
    }

    #[test]
    fn test_hyphens_and_punctuation() {
        assert_eq!(convert_words_to_numbers("Twenty-three.").unwrap(), "23");
        assert_eq!(convert_words_to_numbers("forty-two").unwrap(), "42");
    }

    #[test]
    fn test_hundreds_with_connective() {
        assert_eq!(convert_words_to_numbers("two hundred and five").unwrap(), "205");
    }

    #[test]
    fn test_bare_scale_words() {
        assert_eq!(convert_words_to_numbers("hundred").unwrap(), "100");
        assert_eq!(convert_words_to_numbers("thousand").unwrap(), "1000");
    }

    #[test]
    fn test_large_magnitudes() {
        assert_eq!(convert_words_to_numbers("three thousand four hundred").unwrap(), "3400");
        assert_eq!(convert_words_to_numbers("seven million").unwrap(), "7000000");
    }

    #[test]
    fn test_zero() {
        assert_eq!(convert_words_to_numbers("zero").unwrap(), "0");
    }

    #[test]
    fn test_phrase_without_number_words_fails() {
        assert_eq!(convert_words_to_numbers("hello"), Err(PhraseError::NoNumber));
    }

    #[test]
    fn test_filler_words_are_dropped() {
        assert_eq!(convert_words_to_numbers("twenty bananas").unwrap(), "20");
        assert_eq!(convert_words_to_numbers("it is twenty three").unwrap(), "23");
    }

    #[test]
    fn test_empty_and_filler_only_phrases() {
        assert_eq!(convert_words_to_numbers(""), Err(PhraseError::NoNumber));
        assert_eq!(convert_words_to_numbers("and"), Err(PhraseError::NoNumber));
        assert_eq!(convert_words_to_numbers("..."), Err(PhraseError::NoNumber));
    }

    #[test]
    fn test_digit_token_inside_phrase() {
        assert_eq!(convert_words_to_numbers("42").unwrap(), "42");
    }

    #[test]
    fn test_digit_token_overflow() {
        assert_eq!(
            convert_words_to_numbers("99999999999999999999"),
            Err(PhraseError::Overflow)
        );
    }

    #[test]
    fn test_literal_digits_bypass_the_grammar() {
        assert_eq!(to_digit_string("route 66").unwrap(), "66");
        assert_eq!(to_digit_string("I said 1 2 3").unwrap(), "123");
    }

    #[test]
    fn test_digit_string_falls_back_to_words() {
        assert_eq!(to_digit_string("twenty three").unwrap(), "23");
        assert_eq!(to_digit_string("it is twenty three").unwrap(), "23");
        assert_eq!(to_digit_string("hello"), Err(PhraseError::NoNumber));
    }
}
