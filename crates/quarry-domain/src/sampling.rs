//! Sampling module - decoding strategy requested from the completion service

use serde::{Deserialize, Serialize};

/// Decoding strategy for a single completion call
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Sampling {
    /// Deterministic, highest-probability decoding
    #[default]
    Greedy,

    /// Nucleus sampling with fixed parameters
    Stochastic {
        /// Number of highest-probability tokens considered
        top_k: u32,
        /// Cumulative probability cut-off
        top_p: f32,
        /// Softmax temperature
        temperature: f32,
    },
}

impl Sampling {
    /// Parameters used by the RAG answerer unless configured otherwise
    pub fn rag_default() -> Self {
        Sampling::Stochastic {
            top_k: 50,
            top_p: 0.95,
            temperature: 0.7,
        }
    }

    /// Whether this is greedy decoding
    pub fn is_greedy(&self) -> bool {
        matches!(self, Sampling::Greedy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rag_default() {
        match Sampling::rag_default() {
            Sampling::Stochastic { top_k, top_p, temperature } => {
                assert_eq!(top_k, 50);
                assert!((top_p - 0.95).abs() < f32::EPSILON);
                assert!((temperature - 0.7).abs() < f32::EPSILON);
            }
            Sampling::Greedy => panic!("Expected stochastic sampling"),
        }
    }

    #[test]
    fn test_default_is_greedy() {
        assert!(Sampling::default().is_greedy());
        assert!(!Sampling::rag_default().is_greedy());
    }
}
