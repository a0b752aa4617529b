//! Input sequences for an exercise.
//!
//! A [`SequencePair`] is the only piece of engine state that a session layer
//! persists: a reloaded exercise rebuilds a fresh engine from it and restarts
//! at `PRE`.

use std::fmt;

use crate::error::EngineError;

/// Names one of the two inputs in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Which {
    /// The row sequence.
    X,
    /// The column sequence.
    Y,
}

impl fmt::Display for Which {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Which::X => f.write_str("x"),
            Which::Y => f.write_str("y"),
        }
    }
}

/// Set of symbols an exercise accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alphabet {
    /// Any Unicode scalar value.
    #[default]
    Any,
    /// Nucleotides `A`, `C`, `G`, `T`.
    Dna,
    /// `a` through `z`.
    AsciiLowercase,
    /// An explicit symbol list.
    Custom(Vec<char>),
}

impl Alphabet {
    /// Returns true if `symbol` belongs to this alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        match self {
            Alphabet::Any => true,
            Alphabet::Dna => matches!(symbol, 'A' | 'C' | 'G' | 'T'),
            Alphabet::AsciiLowercase => symbol.is_ascii_lowercase(),
            Alphabet::Custom(symbols) => symbols.contains(&symbol),
        }
    }

    /// Check every symbol of `seq`, reporting the first one rejected.
    pub fn validate(&self, which: Which, seq: &[char]) -> Result<(), EngineError> {
        match seq.iter().position(|&c| !self.contains(c)) {
            Some(position) => Err(EngineError::InvalidSequence {
                which,
                position,
                symbol: seq[position],
            }),
            None => Ok(()),
        }
    }
}

/// The two immutable inputs of an LCS exercise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequencePair {
    x: Vec<char>,
    y: Vec<char>,
}

impl SequencePair {
    /// Build a pair from two strings. Empty strings are legal.
    pub fn new(x: &str, y: &str) -> Self {
        Self {
            x: x.chars().collect(),
            y: y.chars().collect(),
        }
    }

    /// Row sequence.
    pub fn x(&self) -> &[char] {
        &self.x
    }

    /// Column sequence.
    pub fn y(&self) -> &[char] {
        &self.y
    }

    /// `|x|`.
    pub fn n(&self) -> usize {
        self.x.len()
    }

    /// `|y|`.
    pub fn m(&self) -> usize {
        self.y.len()
    }

    /// Row sequence as a `String`.
    pub fn x_string(&self) -> String {
        self.x.iter().collect()
    }

    /// Column sequence as a `String`.
    pub fn y_string(&self) -> String {
        self.y.iter().collect()
    }

    pub(crate) fn validate(&self, alphabet: &Alphabet, max_len: usize) -> Result<(), EngineError> {
        for (which, seq) in [(Which::X, &self.x), (Which::Y, &self.y)] {
            if seq.len() > max_len {
                return Err(EngineError::SequenceTooLong {
                    which,
                    len: seq.len(),
                    max: max_len,
                });
            }
            alphabet.validate(which, seq)?;
        }
        Ok(())
    }
}
