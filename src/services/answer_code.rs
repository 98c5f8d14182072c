use std::fmt;

use thiserror::Error;

/// Letter for one multiple-choice option; only four options are addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum AnswerLetter {
    A,
    B,
    C,
    D,
}

const LETTERS: [AnswerLetter; 4] =
    [AnswerLetter::A, AnswerLetter::B, AnswerLetter::C, AnswerLetter::D];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum AnswerCodeError {
    #[error("option {0} has no answer letter")]
    IndexOutOfAlphabet(usize),
    #[error("'{0}' is not an answer letter")]
    UnknownLetter(char),
}

impl AnswerLetter {
    pub(crate) fn from_index(index: usize) -> Result<Self, AnswerCodeError> {
        LETTERS.get(index).copied().ok_or(AnswerCodeError::IndexOutOfAlphabet(index))
    }

    pub(crate) fn from_char(value: char) -> Result<Self, AnswerCodeError> {
        match value.to_ascii_uppercase() {
            'A' => Ok(Self::A),
            'B' => Ok(Self::B),
            'C' => Ok(Self::C),
            'D' => Ok(Self::D),
            _ => Err(AnswerCodeError::UnknownLetter(value)),
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    pub(crate) fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Answer letters in question order, e.g. `BACD`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct AnswerCode(Vec<AnswerLetter>);

impl AnswerCode {
    pub(crate) fn from_indices<I>(indices: I) -> Result<Self, AnswerCodeError>
    where
        I: IntoIterator<Item = usize>,
    {
        indices.into_iter().map(AnswerLetter::from_index).collect::<Result<Vec<_>, _>>().map(Self)
    }

    /// Separators (commas, whitespace) between letters are ignored.
    pub(crate) fn parse(raw: &str) -> Result<Self, AnswerCodeError> {
        raw.chars()
            .filter(|ch| !ch.is_whitespace() && *ch != ',')
            .map(AnswerLetter::from_char)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub(crate) fn get(&self, position: usize) -> Option<AnswerLetter> {
        self.0.get(position).copied()
    }
}

impl fmt::Display for AnswerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in &self.0 {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_map_to_fixed_alphabet() {
        let code = AnswerCode::from_indices([1, 0, 2, 3]).expect("code");
        assert_eq!(code.to_string(), "BACD");
        assert_eq!(code.get(0), Some(AnswerLetter::B));
        assert_eq!(code.get(3), Some(AnswerLetter::D));
        assert_eq!(code.get(4), None);
    }

    #[test]
    fn index_letter_index_is_identity() {
        for index in 0..LETTERS.len() {
            let letter = AnswerLetter::from_index(index).expect("letter");
            assert_eq!(letter.index(), index);
            assert_eq!(AnswerLetter::from_char(letter.as_char()), Ok(letter));
        }
    }

    #[test]
    fn fifth_option_has_no_letter() {
        assert_eq!(AnswerLetter::from_index(4), Err(AnswerCodeError::IndexOutOfAlphabet(4)));
        assert!(AnswerCode::from_indices([0, 4]).is_err());
    }

    #[test]
    fn parse_ignores_separators_and_case() {
        let code = AnswerCode::parse("a, b,C d").expect("parse");
        assert_eq!(code.to_string(), "ABCD");
        assert_eq!(AnswerCode::parse("ABE"), Err(AnswerCodeError::UnknownLetter('E')));
        assert_eq!(AnswerCode::parse("").expect("empty"), AnswerCode::default());
    }
}
