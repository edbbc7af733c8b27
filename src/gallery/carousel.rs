//! Paged thumbnail strip state

use crate::constants;

/// What the strip shows for one discovered scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl SceneSummary {
    pub fn new(id: &str, task: Option<&str>) -> Self {
        let task = task.unwrap_or(constants::assets::SUMMARY_FALLBACK_TASK);
        Self {
            id: id.to_string(),
            title: format!("Scene {}", id),
            description: truncate_description(task, constants::assets::SUMMARY_MAX_CHARS),
        }
    }
}

/// Cuts `text` to `max_chars` characters and appends `...` when it was longer
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Discovered scenes plus the first visible thumbnail index
#[derive(Debug, Clone)]
pub struct ThumbnailCarousel {
    scenes: Vec<SceneSummary>,
    index: usize,
    page_size: usize,
    active: Option<String>,
}

impl Default for ThumbnailCarousel {
    fn default() -> Self {
        Self::new(constants::carousel::PAGE_SIZE)
    }
}

impl ThumbnailCarousel {
    pub fn new(page_size: usize) -> Self {
        Self {
            scenes: Vec::new(),
            index: 0,
            page_size: page_size.max(1),
            active: None,
        }
    }

    /// Replaces the scene list, rewinds the strip and marks the first scene active
    pub fn set_scenes(&mut self, scenes: Vec<SceneSummary>) {
        self.active = scenes.first().map(|scene| scene.id.clone());
        self.scenes = scenes;
        self.index = 0;
    }

    pub fn scenes(&self) -> &[SceneSummary] {
        &self.scenes
    }

    pub fn total(&self) -> usize {
        self.scenes.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn max_index(&self) -> usize {
        self.total().saturating_sub(self.page_size)
    }

    pub fn can_go_previous(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.index < self.max_index()
    }

    /// Returns true when the strip moved
    pub fn previous(&mut self) -> bool {
        if self.can_go_previous() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Returns true when the strip moved
    pub fn next(&mut self) -> bool {
        if self.can_go_next() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Scenes currently inside the visible window
    pub fn visible(&self) -> &[SceneSummary] {
        let start = self.index.min(self.total());
        let end = (start + self.page_size).min(self.total());
        &self.scenes[start..end]
    }

    /// Marks one thumbnail active. Unknown IDs clear the active mark.
    pub fn select(&mut self, scene_id: &str) {
        self.active = self
            .scenes
            .iter()
            .find(|scene| scene.id == scene_id)
            .map(|scene| scene.id.clone());
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, scene_id: &str) -> bool {
        self.active.as_deref() == Some(scene_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenes(count: usize) -> Vec<SceneSummary> {
        (1..=count)
            .map(|n| SceneSummary::new(&format!("{:03}", n), Some("task")))
            .collect()
    }

    #[test]
    fn test_paging_clamps() {
        let mut carousel = ThumbnailCarousel::new(4);
        carousel.set_scenes(scenes(10));
        assert_eq!(carousel.max_index(), 6);
        assert!(!carousel.can_go_previous());
        assert!(!carousel.previous());
        assert_eq!(carousel.index(), 0);

        for _ in 0..20 {
            carousel.next();
        }
        assert_eq!(carousel.index(), 6);
        assert!(!carousel.can_go_next());
        assert!(carousel.can_go_previous());
        assert_eq!(carousel.visible().len(), 4);
        assert_eq!(carousel.visible()[0].id, "007");
    }

    #[test]
    fn test_fewer_scenes_than_page() {
        let mut carousel = ThumbnailCarousel::new(4);
        carousel.set_scenes(scenes(3));
        assert_eq!(carousel.max_index(), 0);
        assert!(!carousel.can_go_next());
        assert!(!carousel.next());
        assert_eq!(carousel.visible().len(), 3);
    }

    #[test]
    fn test_active_is_exclusive() {
        let mut carousel = ThumbnailCarousel::new(4);
        carousel.set_scenes(scenes(5));
        assert_eq!(carousel.active(), Some("001"));

        carousel.select("003");
        assert!(carousel.is_active("003"));
        assert!(!carousel.is_active("001"));

        carousel.select("999");
        assert_eq!(carousel.active(), None);
    }

    #[test]
    fn test_summary_truncation() {
        let long = "a".repeat(60);
        let summary = SceneSummary::new("004", Some(&long));
        assert_eq!(summary.description, format!("{}...", "a".repeat(50)));
        assert_eq!(summary.title, "Scene 004");

        let fallback = SceneSummary::new("005", None);
        assert_eq!(fallback.description, "Tabletop Organization");
        assert_eq!(truncate_description(&"b".repeat(50), 50), "b".repeat(50));
    }
}
