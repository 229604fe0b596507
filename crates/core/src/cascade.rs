use tracing::info;

use crate::logging::Verbosity;

/// One strategy in a fallback chain.
pub struct Tier<'a, T> {
    pub name: &'static str,
    run: Box<dyn FnOnce() -> Vec<T> + 'a>,
}

impl<'a, T> Tier<'a, T> {
    pub fn new(name: &'static str, run: impl FnOnce() -> Vec<T> + 'a) -> Self {
        Self {
            name,
            run: Box::new(run),
        }
    }
}

/// Run `tiers` in order and return the first non-empty yield.
///
/// Later tiers are never evaluated once one produces something.
pub fn first_non_empty<'a, T>(
    verbosity: Verbosity,
    operation: &str,
    tiers: impl IntoIterator<Item = Tier<'a, T>>,
) -> Vec<T> {
    for tier in tiers {
        let name = tier.name;
        let found = (tier.run)();
        if verbosity.shows_summary() {
            info!(operation, tier = name, count = found.len(), "tier finished");
        }
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn stops_at_first_non_empty_tier() {
        let third_ran = Cell::new(false);
        let out = first_non_empty(
            Verbosity::Quiet,
            "test",
            [
                Tier::new("a", Vec::<u32>::new),
                Tier::new("b", || vec![1, 2]),
                Tier::new("c", || {
                    third_ran.set(true);
                    vec![3]
                }),
            ],
        );
        assert_eq!(out, vec![1, 2]);
        assert!(!third_ran.get());
    }

    #[test]
    fn all_empty_yields_empty() {
        let out: Vec<u32> = first_non_empty(
            Verbosity::Summary,
            "test",
            [Tier::new("a", Vec::new), Tier::new("b", Vec::new)],
        );
        assert!(out.is_empty());
    }
}
