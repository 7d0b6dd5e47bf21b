//! Partial safety factors.
//!
//! | load        | favorable       | unfavorable |
//! |-------------|-----------------|-------------|
//! | weight      | 1.0 (permanent) | 1.1         |
//! | wind        | 0.0             | 1.2         |
//! | friction    | 0.0             | 1.3         |
//!
//! Favorable variable weight gets no credit (0.0). Added ballast is
//! divided by [`GAMMA_BALLAST`] unless the settings override it.

use crate::loads::{LoadType, Variability};

/// Favorable permanent weight
pub const GAMMA_FAVORABLE_PERMANENT: f64 = 1.0;
/// Any other favorable load
pub const GAMMA_FAVORABLE_OTHER: f64 = 0.0;
pub const GAMMA_WIND: f64 = 1.2;
pub const GAMMA_WEIGHT: f64 = 1.1;
pub const GAMMA_FRICTION: f64 = 1.3;
/// Default ballast safety factor
pub const GAMMA_BALLAST: f64 = 1.0;

/// γ for a load acting favorably (stabilizing) or unfavorably.
///
/// # Example
/// ```
/// use ballast_core::loads::{LoadType, Variability};
/// use ballast_core::safety_factors::partial_safety_factor;
///
/// assert_eq!(partial_safety_factor(LoadType::Weight, Variability::Permanent, true), 1.0);
/// assert_eq!(partial_safety_factor(LoadType::Wind, Variability::Variable, false), 1.2);
/// ```
pub fn partial_safety_factor(load_type: LoadType, variability: Variability, favorable: bool) -> f64 {
    match (load_type, variability, favorable) {
        (LoadType::Weight, Variability::Permanent, true) => GAMMA_FAVORABLE_PERMANENT,
        (_, _, true) => GAMMA_FAVORABLE_OTHER,
        (LoadType::Wind, _, false) => GAMMA_WIND,
        (LoadType::Weight, _, false) => GAMMA_WEIGHT,
        (LoadType::Friction, _, false) => GAMMA_FRICTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_combination_is_a_table_constant() {
        let constants = [
            GAMMA_FAVORABLE_PERMANENT,
            GAMMA_FAVORABLE_OTHER,
            GAMMA_WIND,
            GAMMA_WEIGHT,
            GAMMA_FRICTION,
            GAMMA_BALLAST,
        ];
        for t in LoadType::ALL {
            for v in Variability::ALL {
                for fav in [true, false] {
                    let g = partial_safety_factor(t, v, fav);
                    assert!(constants.contains(&g), "{:?}/{:?}/{} -> {}", t, v, fav, g);
                }
            }
        }
    }

    #[test]
    fn test_favorable_permanent_weight_is_one() {
        assert_eq!(partial_safety_factor(LoadType::Weight, Variability::Permanent, true), 1.0);
        assert_eq!(partial_safety_factor(LoadType::Weight, Variability::Variable, true), 0.0);
        assert_eq!(partial_safety_factor(LoadType::Wind, Variability::Permanent, true), 0.0);
    }

    #[test]
    fn test_unfavorable_values() {
        assert_eq!(partial_safety_factor(LoadType::Weight, Variability::Permanent, false), 1.1);
        assert_eq!(partial_safety_factor(LoadType::Friction, Variability::Variable, false), 1.3);
    }
}
