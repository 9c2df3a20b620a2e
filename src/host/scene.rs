//! Scene eligibility.

use std::collections::HashSet;

use crate::config::schema::DEFAULT_EXCLUDED_SCENES;

/// Decides which scenes can host the fishing minigame.
///
/// Names are matched exactly and case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneFilter {
    excluded: HashSet<String>,
}

impl SceneFilter {
    /// Builds a filter that rejects the given scene names.
    #[must_use]
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether automation may attach in `scene`.
    #[must_use]
    pub fn is_gameplay_scene(&self, scene: &str) -> bool {
        !self.excluded.contains(scene)
    }
}

impl Default for SceneFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_SCENES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rejects_menus() {
        let filter = SceneFilter::default();
        for scene in ["MainMenu", "LoadingScreen", "Boot", "Intro"] {
            assert!(!filter.is_gameplay_scene(scene), "{scene} should be excluded");
        }
    }

    #[test]
    fn test_default_accepts_gameplay() {
        let filter = SceneFilter::default();
        assert!(filter.is_gameplay_scene("Harbor"));
        assert!(filter.is_gameplay_scene(""));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let filter = SceneFilter::default();
        assert!(filter.is_gameplay_scene("mainmenu"));
    }

    #[test]
    fn test_custom_list() {
        let filter = SceneFilter::new(["Credits"]);
        assert!(!filter.is_gameplay_scene("Credits"));
        assert!(filter.is_gameplay_scene("MainMenu"));
    }
}
