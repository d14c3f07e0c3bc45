//! Caller-held vote draft.
//!
//! The presentation layer collects picks one screen at a time; the engine
//! only ever accepts whole sheets. `VoteDraft` is the scratch area in
//! between: it accumulates picks, validates them against the catalog, and
//! converts into a single atomic `submit_vote` payload once complete. It is
//! never persisted.

use civdraft_core::catalog::ItemCatalog;
use civdraft_core::error::{DraftError, Result};
use civdraft_core::session::VoteSheet;
use std::collections::BTreeMap;

/// Accumulates one participant's category picks before submission.
#[derive(Debug, Clone, Default)]
pub struct VoteDraft {
    picks: BTreeMap<String, String>,
}

impl VoteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pick, replacing any earlier pick for the category.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownOption`] if the catalog does not offer
    /// `option` under `category`.
    pub fn set(&mut self, catalog: &ItemCatalog, category: &str, option: &str) -> Result<()> {
        let known = catalog
            .category(category)
            .is_some_and(|c| c.has_option(option));
        if !known {
            return Err(DraftError::UnknownOption {
                category: category.to_string(),
                option: option.to_string(),
            });
        }
        self.picks.insert(category.to_string(), option.to_string());
        Ok(())
    }

    /// The participant's current pick for a category, if any.
    pub fn pick(&self, category: &str) -> Option<&str> {
        self.picks.get(category).map(|o| o.as_str())
    }

    /// Categories still missing a pick, in catalog order.
    pub fn missing(&self, catalog: &ItemCatalog) -> Vec<String> {
        catalog
            .categories()
            .iter()
            .filter(|c| !self.picks.contains_key(&c.name))
            .map(|c| c.name.clone())
            .collect()
    }

    /// Whether every configured category has a pick.
    pub fn is_complete(&self, catalog: &ItemCatalog) -> bool {
        self.missing(catalog).is_empty()
    }

    /// Converts the draft into a full vote sheet.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::IncompleteVote`] while categories are missing.
    pub fn into_sheet(self, catalog: &ItemCatalog) -> Result<VoteSheet> {
        let missing = self.missing(catalog);
        if !missing.is_empty() {
            return Err(DraftError::IncompleteVote { missing });
        }
        Ok(self.picks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civdraft_core::catalog::SetupCategory;

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(
            Vec::new(),
            vec![
                SetupCategory::new("Map", &["Continents", "Pangaea"]),
                SetupCategory::new("Speed", &["Standard", "Quick"]),
            ],
        )
    }

    #[test]
    fn test_draft_fills_incrementally() {
        let catalog = catalog();
        let mut draft = VoteDraft::new();

        assert_eq!(draft.missing(&catalog), vec!["Map", "Speed"]);
        draft.set(&catalog, "Map", "Pangaea").unwrap();
        assert!(!draft.is_complete(&catalog));

        // Re-picking a category overwrites.
        draft.set(&catalog, "Map", "Continents").unwrap();
        assert_eq!(draft.pick("Map"), Some("Continents"));

        draft.set(&catalog, "Speed", "Quick").unwrap();
        assert!(draft.is_complete(&catalog));

        let sheet = draft.into_sheet(&catalog).unwrap();
        assert_eq!(sheet["Map"], "Continents");
        assert_eq!(sheet["Speed"], "Quick");
    }

    #[test]
    fn test_rejects_unknown_picks() {
        let catalog = catalog();
        let mut draft = VoteDraft::new();

        assert!(draft.set(&catalog, "Map", "Doughnut").is_err());
        assert!(draft.set(&catalog, "Era", "Ancient").is_err());
        assert!(draft.pick("Map").is_none());
    }

    #[test]
    fn test_incomplete_draft_cannot_become_sheet() {
        let catalog = catalog();
        let mut draft = VoteDraft::new();
        draft.set(&catalog, "Map", "Pangaea").unwrap();

        let err = draft.into_sheet(&catalog).unwrap_err();
        match err {
            DraftError::IncompleteVote { missing } => assert_eq!(missing, vec!["Speed"]),
            other => panic!("expected IncompleteVote, got {other:?}"),
        }
    }
}
