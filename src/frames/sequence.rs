//! Symbol classification and the resolved frame sequence.

use image::RgbaImage;

/// One character of input, normalized for asset lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// An ASCII letter, folded to its uppercase form `A`..`Z`.
    Letter(char),
    /// An ASCII digit `0`..`9`.
    Digit(char),
    /// Anything else; contributes no frames.
    Ignored(char),
}

impl Symbol {
    /// Classify a raw input character.
    pub fn classify(c: char) -> Self {
        if c.is_ascii_alphabetic() {
            Symbol::Letter(c.to_ascii_uppercase())
        } else if c.is_ascii_digit() {
            Symbol::Digit(c)
        } else {
            Symbol::Ignored(c)
        }
    }
}

/// Decoded frames in processing order.
///
/// An empty sequence means the input had no renderable content; the
/// assembler writes nothing for it.
#[derive(Debug, Default)]
pub struct FrameSequence {
    frames: Vec<RgbaImage>,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one decoded frame.
    pub fn push(&mut self, frame: RgbaImage) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frames in order.
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Dimensions of the first frame, which set the artifact canvas.
    pub fn canvas(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|frame| frame.dimensions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_letters_fold_to_uppercase() {
        assert_eq!(Symbol::classify('a'), Symbol::Letter('A'));
        assert_eq!(Symbol::classify('Z'), Symbol::Letter('Z'));
    }

    #[test]
    fn test_classify_digits_and_ignored() {
        assert_eq!(Symbol::classify('7'), Symbol::Digit('7'));
        assert_eq!(Symbol::classify(' '), Symbol::Ignored(' '));
        assert_eq!(Symbol::classify('!'), Symbol::Ignored('!'));
        assert_eq!(Symbol::classify('é'), Symbol::Ignored('é'));
    }

    #[test]
    fn test_sequence_keeps_insertion_order() {
        let mut sequence = FrameSequence::new();
        assert!(sequence.is_empty());
        assert!(sequence.canvas().is_none());

        sequence.push(RgbaImage::new(4, 4));
        sequence.push(RgbaImage::new(8, 8));

        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.canvas(), Some((4, 4)));
        assert_eq!(sequence.frames()[1].dimensions(), (8, 8));
    }
}
