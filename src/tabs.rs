use crate::digest::Digest;

/// Selection state for the digest's category tabs.
///
/// Owns the derived tab set (unique category codes in first-seen order) and
/// the active selection. The direction field only sequences presentational
/// transitions; it carries no correctness weight.
#[derive(Debug, Default)]
pub struct TabController {
    categories: Vec<String>,
    active: Option<String>,
    direction: i8,
}

impl TabController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the tab set from a freshly loaded digest.
    ///
    /// Keeps the active tab when it survives the change, falls back to the
    /// first tab otherwise, and clears the selection when the digest has no
    /// categories at all. Direction resets; a date change renders without a
    /// slide.
    pub fn sync(&mut self, digest: &Digest) {
        self.categories = digest.category_codes();
        let keep = self
            .active
            .as_deref()
            .map_or(false, |active| self.categories.iter().any(|c| c == active));
        if !keep {
            self.active = self.categories.first().cloned();
        }
        self.direction = 0;
    }

    /// Forgets all tab state (used when no digest is displayable).
    pub fn clear(&mut self) {
        self.categories.clear();
        self.active = None;
        self.direction = 0;
    }

    /// Activates `code`. A no-op when the code is unknown or already
    /// active; otherwise records +1 or -1 depending on which side of the
    /// current tab the target sits. Returns whether the active tab changed.
    pub fn change_tab(&mut self, code: &str) -> bool {
        let Some(target) = self.categories.iter().position(|c| c == code) else {
            return false;
        };
        let current = self
            .active
            .as_deref()
            .and_then(|active| self.categories.iter().position(|c| c == active));
        if current == Some(target) {
            return false;
        }
        self.direction = match current {
            Some(from) if target < from => -1,
            _ => 1,
        };
        self.active = Some(self.categories[target].clone());
        true
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn direction(&self) -> i8 {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{Article, CategoryBucket};

    fn digest_with(codes: &[&str]) -> Digest {
        let entries = codes
            .iter()
            .map(|code| {
                (
                    code.to_string(),
                    vec![Article {
                        subject: format!("{code} headline"),
                        summary: "summary".to_string(),
                        links: None,
                    }],
                )
            })
            .collect();
        Digest::new(vec![CategoryBucket::from_entries(entries)])
    }

    #[test]
    fn test_sync_selects_first_category() {
        let mut tabs = TabController::new();
        tabs.sync(&digest_with(&["ID", "US", "Crypto"]));
        assert_eq!(tabs.categories(), ["ID", "US", "Crypto"]);
        assert_eq!(tabs.active(), Some("ID"));
        assert_eq!(tabs.direction(), 0);
    }

    #[test]
    fn test_sync_keeps_surviving_active_tab() {
        let mut tabs = TabController::new();
        tabs.sync(&digest_with(&["ID", "US"]));
        tabs.change_tab("US");

        tabs.sync(&digest_with(&["US", "XAUUSD"]));
        assert_eq!(tabs.active(), Some("US"));
        assert_eq!(tabs.direction(), 0);
    }

    #[test]
    fn test_sync_falls_back_to_first_when_active_disappears() {
        let mut tabs = TabController::new();
        tabs.sync(&digest_with(&["ID", "US", "Crypto"]));
        tabs.change_tab("Crypto");

        tabs.sync(&digest_with(&["A", "B"]));
        assert_eq!(tabs.active(), Some("A"));
    }

    #[test]
    fn test_sync_with_empty_digest_clears_selection() {
        let mut tabs = TabController::new();
        tabs.sync(&digest_with(&["ID"]));
        tabs.sync(&Digest::new(Vec::new()));
        assert!(tabs.categories().is_empty());
        assert_eq!(tabs.active(), None);
    }

    #[test]
    fn test_duplicate_codes_across_buckets_collapse() {
        let digest = Digest::new(vec![
            CategoryBucket::from_entries(vec![
                ("ID".to_string(), Vec::new()),
                ("US".to_string(), Vec::new()),
            ]),
            CategoryBucket::from_entries(vec![("ID".to_string(), Vec::new())]),
        ]);
        let mut tabs = TabController::new();
        tabs.sync(&digest);
        assert_eq!(tabs.categories(), ["ID", "US"]);
    }

    #[test]
    fn test_change_tab_records_direction() {
        let mut tabs = TabController::new();
        tabs.sync(&digest_with(&["ID", "US", "Crypto"]));

        assert!(tabs.change_tab("Crypto"));
        assert_eq!(tabs.active(), Some("Crypto"));
        assert_eq!(tabs.direction(), 1);

        assert!(tabs.change_tab("ID"));
        assert_eq!(tabs.active(), Some("ID"));
        assert_eq!(tabs.direction(), -1);
    }

    #[test]
    fn test_change_tab_ignores_unknown_code() {
        let mut tabs = TabController::new();
        tabs.sync(&digest_with(&["ID", "US"]));
        assert!(!tabs.change_tab("EURUSD"));
        assert_eq!(tabs.active(), Some("ID"));
        assert_eq!(tabs.direction(), 0);
    }

    #[test]
    fn test_change_tab_ignores_already_active() {
        let mut tabs = TabController::new();
        tabs.sync(&digest_with(&["ID", "US"]));
        tabs.change_tab("US");
        let direction_before = tabs.direction();
        assert!(!tabs.change_tab("US"));
        assert_eq!(tabs.direction(), direction_before);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut tabs = TabController::new();
        tabs.sync(&digest_with(&["ID", "US"]));
        tabs.change_tab("US");
        tabs.clear();
        assert!(tabs.categories().is_empty());
        assert_eq!(tabs.active(), None);
        assert_eq!(tabs.direction(), 0);
    }
}
