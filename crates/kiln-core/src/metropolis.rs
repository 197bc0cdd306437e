//! The Metropolis acceptance decision shared by every explorer.

use rand::Rng;

use crate::random;

/// Outcome of one Metropolis evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Acceptance probability used for this decision.
    pub probability: f64,
    /// Whether the proposed change is accepted.
    pub accepted: bool,
}

/// Decides whether to accept a proposed change in objective value.
///
/// Improving or neutral changes (`change_in_objective <= 0`) are accepted
/// unconditionally with probability 1 and consume no draw. Worsening
/// changes are accepted with probability `exp(-change_in_objective /
/// temperature)`, compared against a uniform draw over the closed interval
/// [0, 1]: accept iff `probability > draw`.
///
/// The caller guarantees `temperature > 0` through its validated setter.
pub fn decide<R: Rng + ?Sized>(
    change_in_objective: f64,
    temperature: f64,
    rng: &mut R,
) -> Decision {
    debug_assert!(temperature > 0.0, "temperature must be strictly positive");

    if change_in_objective <= 0.0 {
        return Decision {
            probability: 1.0,
            accepted: true,
        };
    }

    let probability = (-change_in_objective / temperature).exp();
    Decision {
        probability,
        accepted: probability > random::closed_unit(rng),
    }
}
