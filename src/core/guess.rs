use crate::domain::model::Species;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Uniform pick over every species.
pub fn random_species<R: Rng + ?Sized>(rng: &mut R) -> Species {
    *Species::ALL
        .choose(rng)
        .unwrap_or(&Species::Adelie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_every_species_is_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<Species, usize> = HashMap::new();
        for _ in 0..3000 {
            *counts.entry(random_species(&mut rng)).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        for species in Species::ALL {
            let n = counts[&species];
            assert!((800..1200).contains(&n), "{} drawn {} times", species, n);
        }
    }
}
