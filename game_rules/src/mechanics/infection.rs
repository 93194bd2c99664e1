//! Infection-risk simulation invoked after risky actions.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Inputs describing one exposure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exposure {
    pub currently_infected: bool,
    /// Chance (0.0 - 1.0) that the susceptibility roll hits.
    pub susceptibility: f32,
    pub risk_factor: f32,
    /// Number of other people involved in the action.
    pub participant_count: u32,
}

/// Result of simulating an exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InfectionResult {
    pub is_infected: bool,
    pub newly_infected: u32,
}

/// Infection model collaborator. Randomness is injected so callers can seed it.
pub trait InfectionModel {
    fn simulate(&self, exposure: &Exposure, rng: &mut dyn RngCore) -> InfectionResult;
}

/// Default model: a random share of the participants is already sick, and the
/// player either catches it or passes it on depending on a single roll.
#[derive(Debug, Clone, Copy, Default)]
pub struct CovidInfectionModel;

impl InfectionModel for CovidInfectionModel {
    fn simulate(&self, exposure: &Exposure, rng: &mut dyn RngCore) -> InfectionResult {
        let already_infected = rng.gen_range(0..=exposure.participant_count);
        let at_risk = exposure.participant_count - already_infected;
        let hit = rng.gen::<f32>() <= exposure.susceptibility;

        if exposure.currently_infected {
            InfectionResult {
                is_infected: true,
                newly_infected: if hit {
                    (at_risk as f32 * exposure.risk_factor).floor() as u32
                } else {
                    0
                },
            }
        } else {
            InfectionResult {
                is_infected: hit,
                newly_infected: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn exposure(currently_infected: bool, susceptibility: f32) -> Exposure {
        Exposure {
            currently_infected,
            susceptibility,
            risk_factor: 1.0,
            participant_count: 10,
        }
    }

    #[test]
    fn test_healthy_player_with_no_susceptibility_stays_healthy() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let result = CovidInfectionModel.simulate(&exposure(false, -1.0), &mut rng);
            assert!(!result.is_infected);
            assert_eq!(result.newly_infected, 0);
        }
    }

    #[test]
    fn test_healthy_player_with_full_susceptibility_gets_infected() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = CovidInfectionModel.simulate(&exposure(false, 1.0), &mut rng);
        assert!(result.is_infected);
    }

    #[test]
    fn test_infected_player_spreads_within_participant_count() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let result = CovidInfectionModel.simulate(&exposure(true, 1.0), &mut rng);
            assert!(result.is_infected);
            assert!(result.newly_infected <= 10);
        }
    }
}
