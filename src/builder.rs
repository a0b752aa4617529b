use crate::engine::StepEngine;
use crate::error::EngineError;
use crate::sequence::{Alphabet, SequencePair};

/// Longest accepted input by default, per sequence.
///
/// Table and undo-log memory both grow with `n * m`.
pub const DEFAULT_MAX_LEN: usize = 4096;

/// Configures and validates a [`StepEngine`].
///
/// ```
/// use dp_stepper::{Alphabet, EngineBuilder, EngineError};
///
/// let engine = EngineBuilder::new("GATTACA", "TACG")
///     .alphabet(Alphabet::Dna)
///     .build()
///     .unwrap();
/// assert_eq!(engine.sequences().n(), 7);
///
/// let err = EngineBuilder::new("gattaca", "TACG")
///     .alphabet(Alphabet::Dna)
///     .build()
///     .unwrap_err();
/// assert!(matches!(err, EngineError::InvalidSequence { position: 0, .. }));
/// ```
pub struct EngineBuilder {
    pair: SequencePair,
    alphabet: Alphabet,
    max_len: usize,
}

impl EngineBuilder {
    pub fn new(x: &str, y: &str) -> Self {
        Self::from_pair(SequencePair::new(x, y))
    }

    /// Start from a stored pair, e.g. one restored by a session layer.
    pub fn from_pair(pair: SequencePair) -> Self {
        Self {
            pair,
            alphabet: Alphabet::Any,
            max_len: DEFAULT_MAX_LEN,
        }
    }

    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn build(self) -> Result<StepEngine, EngineError> {
        self.pair.validate(&self.alphabet, self.max_len)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            n = self.pair.n(),
            m = self.pair.m(),
            alphabet = ?self.alphabet,
            "engine built"
        );
        Ok(StepEngine::from_pair(self.pair))
    }
}
