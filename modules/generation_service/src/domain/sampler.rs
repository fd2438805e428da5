//! Weighted categorical sampling

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    #[error("expected {outcomes} weights, got {weights}")]
    LengthMismatch { outcomes: usize, weights: usize },

    /// Empty, negative, non-finite or all-zero weights
    #[error("unusable weights: {0}")]
    InvalidWeights(String),
}

/// Draws one of a fixed set of outcomes, using the weights as relative
/// probabilities.
#[derive(Debug, Clone)]
pub struct WeightedSampler<'a, T> {
    outcomes: &'a [T],
    index: WeightedIndex<f64>,
}

impl<'a, T> WeightedSampler<'a, T> {
    /// `weights[i]` is the relative weight of `outcomes[i]`
    pub fn new(outcomes: &'a [T], weights: &[f64]) -> Result<Self, SamplerError> {
        if outcomes.len() != weights.len() {
            return Err(SamplerError::LengthMismatch {
                outcomes: outcomes.len(),
                weights: weights.len(),
            });
        }

        let index =
            WeightedIndex::new(weights).map_err(|e| SamplerError::InvalidWeights(e.to_string()))?;

        Ok(Self { outcomes, index })
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a T {
        &self.outcomes[self.index.sample(rng)]
    }
}
