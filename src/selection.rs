//! How the cart workflow picks among required variation choices (size,
//! color, ...). The strategy is injected so tests can pin the choice down
//! while real runs stay random across enabled options.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// One enabled choice in an open selection menu. `index` addresses the
/// option within the menu's rendered option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationOption {
    pub index: usize,
    pub label: String,
}

pub trait SelectionStrategy: Send + Sync {
    /// Pick one of the offered options, or `None` to decline the menu.
    fn choose<'a>(&self, options: &'a [VariationOption]) -> Option<&'a VariationOption>;
}

/// Default strategy: any enabled option, no preference ordering.
pub struct RandomChoice;

impl SelectionStrategy for RandomChoice {
    fn choose<'a>(&self, options: &'a [VariationOption]) -> Option<&'a VariationOption> {
        options.choose(&mut rand::thread_rng())
    }
}

/// Deterministic strategy for tests: always the first enabled option.
pub struct FirstChoice;

impl SelectionStrategy for FirstChoice {
    fn choose<'a>(&self, options: &'a [VariationOption]) -> Option<&'a VariationOption> {
        options.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(labels: &[&str]) -> Vec<VariationOption> {
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| VariationOption {
                index,
                label: label.to_string(),
            })
            .collect()
    }

    #[test]
    fn first_choice_is_deterministic() {
        let opts = options(&["Small", "Medium", "Large"]);
        assert_eq!(FirstChoice.choose(&opts).unwrap().label, "Small");
        assert_eq!(FirstChoice.choose(&opts).unwrap().label, "Small");
    }

    #[test]
    fn random_choice_picks_from_the_offered_set() {
        let opts = options(&["Red", "Blue"]);
        for _ in 0..20 {
            let picked = RandomChoice.choose(&opts).unwrap();
            assert!(opts.contains(picked));
        }
    }

    #[test]
    fn empty_menus_yield_no_choice() {
        assert!(RandomChoice.choose(&[]).is_none());
        assert!(FirstChoice.choose(&[]).is_none());
    }
}
