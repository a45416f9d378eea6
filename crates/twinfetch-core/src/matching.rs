//! Weighted trait matching
//!
//! A twin is the other Deathbat sharing the most heavily weighted traits.

use crate::catalog::{Catalog, Deathbat, Traits};

/// Trait slots that count towards a match, with their weights
fn weighted_slots(traits: &Traits) -> [(&str, u32); 8] {
    [
        (traits.mask.as_str(), 6),
        (traits.facial_hair.as_str(), 5),
        (traits.eyes.as_str(), 4),
        (traits.mouth.as_str(), 4),
        (traits.nose.as_str(), 4),
        (traits.head.as_str(), 3),
        (traits.skin.as_str(), 2),
        (traits.background.as_str(), 1),
    ]
}

/// Score of `candidate` against `source`: sum of weights of the non-empty
/// source traits the candidate shares exactly
pub fn score(source: &Traits, candidate: &Traits) -> u32 {
    weighted_slots(source)
        .into_iter()
        .zip(weighted_slots(candidate))
        .filter(|((wanted, _), (have, _))| !wanted.is_empty() && wanted == have)
        .map(|((_, weight), _)| weight)
        .sum()
}

/// Find the closest twin of `source` in `catalog`.
///
/// One-of-ones, and records nothing else shares a trait with, are their own
/// twin. Ties go to the candidate whose id is closest to the source id.
pub fn find_twin<'a>(catalog: &'a Catalog, source: &'a Deathbat) -> &'a Deathbat {
    if source.traits.is_one_of_one() {
        return source;
    }

    let mut twin = source;
    let mut best = 0;
    for candidate in catalog.iter() {
        if candidate.id == source.id {
            continue;
        }

        let candidate_score = score(&source.traits, &candidate.traits);
        if candidate_score > best {
            twin = candidate;
            best = candidate_score;
        }

        if candidate_score == best && distance(source, candidate) < distance(source, twin) {
            twin = candidate;
        }
    }

    twin
}

fn distance(a: &Deathbat, b: &Deathbat) -> u64 {
    a.id.abs_diff(b.id)
}
