//! Candidate selector
//!
//! Picks the languages a personality type competes over. The exact-type
//! pass runs first; while the set is below the floor the search widens to
//! one-axis neighbors, then the cognitive pair, then the remaining two-axis
//! neighbors. Relaxation stops at two axes and the result is truncated to
//! the ceiling, so the full catalog is never returned wholesale.

use crate::catalog::Catalog;
use crate::personality::PersonalityType;
use langfit_common::EngineConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, error};

/// Furthest relaxation step the selector needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPass {
    /// Exact type match only
    Exact,
    /// Type plus its four one-axis neighbors
    OneAxis,
    /// Plus the cognitive pair (E/I and J/P flipped)
    CognitivePair,
    /// Plus every other two-axis neighbor
    TwoAxis,
}

/// Ordered, duplicate-free candidate ids with the pass that produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub candidates: Vec<String>,
    pub pass: SelectionPass,
}

impl Selection {
    pub fn into_candidates(self) -> Vec<String> {
        self.candidates
    }
}

/// Candidate selector over a catalog
pub struct CandidateSelector<'a> {
    catalog: &'a Catalog,
    floor: usize,
    ceiling: usize,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(catalog: &'a Catalog, config: &EngineConfig) -> Self {
        Self {
            catalog,
            floor: config.candidate_floor,
            ceiling: config.candidate_ceiling,
        }
    }

    /// Select candidates for `personality`
    ///
    /// # Returns
    /// Candidate ids in catalog order within each pass, at most `ceiling`
    /// long. Empty only when the catalog is empty or no record has an
    /// affinity within two axes.
    pub fn select(&self, personality: PersonalityType) -> Selection {
        if self.catalog.is_empty() {
            error!(
                "Language catalog is empty; no candidates for {}",
                personality
            );
            return Selection {
                candidates: Vec::new(),
                pass: SelectionPass::Exact,
            };
        }

        let mut accepted: HashSet<PersonalityType> = HashSet::from([personality]);
        let mut candidates = Vec::new();
        let mut pass = SelectionPass::Exact;
        self.extend(&mut candidates, &accepted);

        if candidates.len() < self.floor {
            pass = SelectionPass::OneAxis;
            accepted.extend(personality.one_axis_neighbors());
            self.extend(&mut candidates, &accepted);
        }

        if candidates.len() < self.floor {
            pass = SelectionPass::CognitivePair;
            accepted.insert(personality.cognitive_pair());
            self.extend(&mut candidates, &accepted);
        }

        if candidates.len() < self.floor {
            pass = SelectionPass::TwoAxis;
            accepted.extend(personality.other_two_axis_neighbors());
            self.extend(&mut candidates, &accepted);
        }

        if candidates.len() < self.floor {
            debug!(
                "{} has only {} candidates after full relaxation",
                personality,
                candidates.len()
            );
        }

        candidates.truncate(self.ceiling);
        debug!(
            "Selected {} candidates for {} ({:?}): {:?}",
            candidates.len(),
            personality,
            pass,
            candidates
        );

        Selection { candidates, pass }
    }

    /// Append records with an accepted affinity, catalog order, skipping duplicates
    fn extend(&self, candidates: &mut Vec<String>, accepted: &HashSet<PersonalityType>) {
        for record in self.catalog {
            if candidates.contains(&record.id) {
                continue;
            }
            if record.affinities.iter().any(|a| accepted.contains(a)) {
                candidates.push(record.id.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(code: &str) -> PersonalityType {
        code.parse().unwrap()
    }

    fn catalog_with(records: &[(&str, &[&str])]) -> Catalog {
        let mut doc = String::new();
        for (id, affinities) in records {
            let quoted: Vec<String> = affinities.iter().map(|a| format!("\"{}\"", a)).collect();
            doc.push_str(&format!(
                "[[language]]\nid = \"{id}\"\nname = \"{id}\"\ndescription = \"-\"\naffinities = [{}]\n\n",
                quoted.join(", ")
            ));
        }
        Catalog::from_toml_str(&doc).unwrap()
    }

    #[test]
    fn test_exact_pass_sufficient() {
        let catalog = Catalog::builtin().unwrap();
        let selection =
            CandidateSelector::new(&catalog, &EngineConfig::default()).select(t("ISTJ"));

        assert_eq!(selection.pass, SelectionPass::Exact);
        assert!(selection.candidates.len() >= 6);
        for id in &selection.candidates {
            assert!(catalog.get(id).unwrap().suits(t("ISTJ")));
        }
    }

    #[test]
    fn test_relaxes_one_axis_before_two() {
        let catalog = catalog_with(&[
            ("a", &["INTJ"]),
            ("far", &["ESFP"]),
            ("two", &["ENTP"]),
            ("one", &["INTP"]),
            ("pair", &["ENTP"]),
        ]);
        let config = EngineConfig {
            candidate_floor: 2,
            ..EngineConfig::default()
        };
        let selection = CandidateSelector::new(&catalog, &config).select(t("INTJ"));

        assert_eq!(selection.candidates, vec!["a", "one"]);
        assert_eq!(selection.pass, SelectionPass::OneAxis);
    }

    #[test]
    fn test_cognitive_pair_before_other_two_axis() {
        let catalog = catalog_with(&[("a", &["INTJ"]), ("isfj", &["ISFJ"]), ("entp", &["ENTP"])]);
        let config = EngineConfig {
            candidate_floor: 2,
            ..EngineConfig::default()
        };
        let selection = CandidateSelector::new(&catalog, &config).select(t("INTJ"));

        // ENTP is the cognitive pair of INTJ; ISFJ is a plain two-axis neighbor
        assert_eq!(selection.candidates, vec!["a", "entp"]);
        assert_eq!(selection.pass, SelectionPass::CognitivePair);
    }

    #[test]
    fn test_never_relaxes_beyond_two_axes() {
        let catalog = catalog_with(&[
            ("a", &["INTJ"]),
            ("opposite", &["ESFP"]),
            ("three", &["ESFJ"]),
        ]);
        let selection =
            CandidateSelector::new(&catalog, &EngineConfig::default()).select(t("INTJ"));

        assert_eq!(selection.candidates, vec!["a"]);
        assert_eq!(selection.pass, SelectionPass::TwoAxis);
    }

    #[test]
    fn test_ceiling_truncates() {
        let catalog = Catalog::builtin().unwrap();
        let config = EngineConfig {
            candidate_floor: 3,
            candidate_ceiling: 3,
            ..EngineConfig::default()
        };
        let selection = CandidateSelector::new(&catalog, &config).select(t("INTP"));
        assert_eq!(selection.candidates.len(), 3);
    }

    #[test]
    fn test_empty_catalog_gives_empty_set() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        let selection =
            CandidateSelector::new(&catalog, &EngineConfig::default()).select(t("INTP"));
        assert!(selection.candidates.is_empty());
    }

    #[test]
    fn test_selection_preserves_catalog_order_without_duplicates() {
        let catalog = Catalog::builtin().unwrap();
        for personality in PersonalityType::all() {
            let selection =
                CandidateSelector::new(&catalog, &EngineConfig::default()).select(personality);
            let mut seen = HashSet::new();
            for id in &selection.candidates {
                assert!(
                    seen.insert(id.clone()),
                    "{} duplicated for {}",
                    id,
                    personality
                );
            }
        }
    }
}
