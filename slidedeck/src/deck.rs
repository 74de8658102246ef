//! Deck state: documents, assets, slides and the image viewer
//!
//! Slides are recomputed from the full document list after every change to
//! it; nothing is patched incrementally.

use crate::acquisition::{Acquired, FileContent};
use crate::assets::{AssetLibrary, DataUrlStore, ImageFormat, ResourceStore};
use crate::config::DeckConfig;
use crate::document::{DocumentList, DragReorder};
use crate::renderer::{self, RenderedSlide};
use crate::segmenter::{build_slides, Slide};
use crate::viewport::{ImageViewer, Size};
use std::path::Path;

/// A slide deck under construction or being presented
#[derive(Debug)]
pub struct Deck<S: ResourceStore = DataUrlStore> {
    title: String,
    documents: DocumentList,
    reorder: DragReorder,
    assets: AssetLibrary<S>,
    slides: Vec<Slide>,
    current: usize,
    viewer: ImageViewer,
}

impl Deck<DataUrlStore> {
    /// Empty deck with data-URL assets
    pub fn new(title: impl Into<String>, config: &DeckConfig) -> Self {
        Self::with_store(title, config, DataUrlStore::default())
    }
}

impl<S: ResourceStore> Deck<S> {
    pub fn with_store(title: impl Into<String>, config: &DeckConfig, store: S) -> Self {
        Self {
            title: title.into(),
            documents: DocumentList::new(),
            reorder: DragReorder::new(),
            assets: AssetLibrary::new(store),
            slides: Vec::new(),
            current: 0,
            viewer: ImageViewer::new(config.viewer),
        }
    }

    /// Load everything acquired from a directory
    ///
    /// Documents are appended in name order; images are added to the asset
    /// library keyed by their relative path.
    pub fn load(&mut self, acquired: Acquired) {
        for file in acquired.images {
            if let FileContent::Binary(bytes) = file.content {
                let mime = ImageFormat::from_path(Path::new(&file.name)).mime_type();
                self.assets.insert(&file.name, &bytes, mime);
            }
        }
        for file in acquired.documents {
            if let FileContent::Text(content) = file.content {
                self.documents.push(file.name, content);
            }
        }
        self.refresh();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn documents(&self) -> &DocumentList {
        &self.documents
    }

    pub fn assets(&self) -> &AssetLibrary<S> {
        &self.assets
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Append a document and re-segment
    pub fn add_document(&mut self, name: impl Into<String>, content: impl Into<String>) -> String {
        let id = self.documents.push(name, content);
        self.refresh();
        id
    }

    pub fn remove_document(&mut self, id: &str) -> bool {
        let removed = self.documents.remove(id).is_some();
        if removed {
            self.refresh();
        }
        removed
    }

    pub fn update_document(&mut self, id: &str, content: impl Into<String>) -> bool {
        let updated = self.documents.set_content(id, content);
        if updated {
            self.refresh();
        }
        updated
    }

    pub fn move_document(&mut self, from: usize, to: usize) -> bool {
        let moved = self.documents.move_to(from, to);
        if moved {
            self.refresh();
        }
        moved
    }

    pub fn sort_documents(&mut self) {
        self.documents.sort_by_name();
        self.refresh();
    }

    /// Start dragging a document in the list
    pub fn begin_reorder(&mut self, id: &str) {
        self.reorder.begin(id);
    }

    /// Dragged document hovered over `target_id`
    pub fn reorder_over(&mut self, target_id: &str) -> bool {
        let moved = self.reorder.hover(&mut self.documents, target_id);
        if moved {
            self.refresh();
        }
        moved
    }

    pub fn end_reorder(&mut self) {
        self.reorder.end();
    }

    pub fn add_asset(&mut self, path: &str, data: &[u8], mime_type: &str) -> String {
        self.assets.insert(path, data, mime_type)
    }

    /// Remove an asset; closes the viewer if it was showing it
    pub fn remove_asset(&mut self, path: &str) -> bool {
        let key = crate::assets::normalize_key(path);
        if self.viewer.image() == Some(key.as_str()) {
            self.viewer.close();
        }
        self.assets.remove(&key)
    }

    /// Recompute slides from the full document list
    fn refresh(&mut self) {
        self.slides = build_slides(self.documents.as_slice());
        if self.current >= self.slides.len() {
            self.current = self.slides.len().saturating_sub(1);
        }
        log::debug!(
            "Deck '{}' now has {} slides from {} documents",
            self.title,
            self.slides.len(),
            self.documents.len()
        );
    }

    /// Index of the slide being shown
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    /// Advance one slide; stays on the last slide
    pub fn next_slide(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    /// Go back one slide; stays on the first slide
    pub fn previous_slide(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    pub fn first_slide(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn last_slide(&mut self) -> bool {
        self.go_to(self.slides.len().saturating_sub(1))
    }

    /// Jump to a slide
    ///
    /// # Returns
    /// * `true` - The current slide changed
    /// * `false` - Index out of range or already current
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.slides.len() || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    /// Render one slide, resolving images through the asset library
    pub fn render_slide(&self, index: usize) -> Option<RenderedSlide> {
        let slide = self.slides.get(index)?;
        Some(renderer::render_markdown(&slide.content, |key| {
            self.assets.resolve(key).map(str::to_string)
        }))
    }

    /// An embedded image was clicked; open it in the viewer
    ///
    /// # Returns
    /// * `false` - No asset with that key
    pub fn activate_image(&mut self, key: &str) -> bool {
        let Some(entry) = self.assets.get(key) else {
            log::warn!("Activated image '{}' is not in the asset library", key);
            return false;
        };
        let size = entry
            .dimensions
            .map(|(w, h)| Size::new(f64::from(w), f64::from(h)));
        self.viewer.open(crate::assets::normalize_key(key), size);
        true
    }

    pub fn viewer(&self) -> &ImageViewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut ImageViewer {
        &mut self.viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::AcquiredFile;
    use crate::viewport::{Point, ViewportConfig, ZoomDirection};

    fn deck() -> Deck {
        Deck::new("Test", &DeckConfig::default())
    }

    fn contents(deck: &Deck) -> Vec<&str> {
        deck.slides().iter().map(|s| s.content.as_str()).collect()
    }

    // Minimal 1x1 PNG header, enough for imagesize
    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89,
    ];

    #[test]
    fn test_slides_follow_document_changes() {
        let mut deck = deck();
        let a = deck.add_document("a.md", "# A\none");
        let b = deck.add_document("b.md", "## B\ntwo");
        assert_eq!(contents(&deck), vec!["# A\none", "## B\ntwo"]);

        deck.update_document(&b, "## B\nchanged");
        assert_eq!(contents(&deck), vec!["# A\none", "## B\nchanged"]);

        deck.remove_document(&a);
        assert_eq!(contents(&deck), vec!["## B\nchanged"]);
    }

    #[test]
    fn test_reorder_resegments() {
        let mut deck = deck();
        let a = deck.add_document("a.md", "# A");
        let b = deck.add_document("b.md", "# B");

        deck.begin_reorder(&b);
        assert!(deck.reorder_over(&a));
        deck.end_reorder();
        assert_eq!(contents(&deck), vec!["# B", "# A"]);

        assert!(deck.move_document(0, 1));
        assert_eq!(contents(&deck), vec!["# A", "# B"]);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut deck = deck();
        deck.add_document("a.md", "# 1\n# 2\n# 3");
        assert_eq!(deck.current_index(), 0);
        assert!(!deck.previous_slide());
        assert!(deck.next_slide());
        assert!(deck.last_slide());
        assert_eq!(deck.current_index(), 2);
        assert!(!deck.next_slide());
        assert!(deck.first_slide());
        assert!(!deck.go_to(7));
        assert_eq!(deck.current_slide().unwrap().content, "# 1");
    }

    #[test]
    fn test_current_index_clamped_when_slides_shrink() {
        let mut deck = deck();
        let id = deck.add_document("a.md", "# 1\n# 2\n# 3");
        deck.last_slide();
        deck.update_document(&id, "# only");
        assert_eq!(deck.current_index(), 0);
        deck.remove_document(&id);
        assert!(deck.current_slide().is_none());
    }

    #[test]
    fn test_load_acquired_and_render_image() {
        let mut deck = deck();
        deck.load(Acquired {
            documents: vec![AcquiredFile {
                name: "intro.md".to_string(),
                content: FileContent::Text("# Hello\n\n![pic](./img/dot.png)".to_string()),
            }],
            images: vec![AcquiredFile {
                name: "img/dot.png".to_string(),
                content: FileContent::Binary(PNG_1X1.to_vec()),
            }],
            skipped: Vec::new(),
        });

        assert_eq!(deck.slides().len(), 1);
        assert_eq!(deck.assets().get("img/dot.png").unwrap().dimensions, Some((1, 1)));

        let rendered = deck.render_slide(0).unwrap();
        assert_eq!(rendered.images, vec!["img/dot.png"]);
        assert!(rendered.html.contains("data:image/png;base64,"));
        assert!(deck.render_slide(1).is_none());
    }

    #[test]
    fn test_activate_image_opens_reset_viewer() {
        let mut deck = deck();
        deck.add_asset("a.png", PNG_1X1, "image/png");
        deck.add_asset("b.png", PNG_1X1, "image/png");

        assert!(deck.activate_image("./a.png"));
        assert_eq!(deck.viewer().image(), Some("a.png"));
        assert_eq!(deck.viewer().image_size(), Some(Size::new(1.0, 1.0)));

        let container = Size::new(10.0, 10.0);
        let image = Size::new(10.0, 10.0);
        deck.viewer_mut()
            .transform_mut()
            .apply_zoom_button(ZoomDirection::In, container, image);
        assert!(deck.viewer().transform().scale() > 1.0);

        assert!(deck.activate_image("b.png"));
        assert_eq!(deck.viewer().transform().scale(), 1.0);
        assert_eq!(deck.viewer().transform().offset(), Point::ORIGIN);

        assert!(!deck.activate_image("missing.png"));
    }

    #[test]
    fn test_unvalidated_viewer_config_uses_defaults() {
        let mut config = DeckConfig::default();
        config.viewer.min_scale = 2.0;
        config.viewer.max_scale = 1.5;
        let mut deck = Deck::new("Test", &config);
        deck.add_asset("a.png", PNG_1X1, "image/png");
        assert!(deck.activate_image("a.png"));

        let container = Size::new(10.0, 10.0);
        let image = Size::new(10.0, 10.0);
        let transform = deck.viewer_mut().transform_mut();
        transform.apply_zoom_button(ZoomDirection::In, container, image);
        transform.apply_wheel_zoom(Point::new(5.0, 5.0), 400.0, container, image);
        assert_eq!(*deck.viewer().transform().config(), ViewportConfig::default());
        assert!((deck.viewer().transform().scale() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_removing_viewed_asset_closes_viewer() {
        let mut deck = deck();
        deck.add_asset("a.png", PNG_1X1, "image/png");
        deck.activate_image("a.png");
        assert!(deck.remove_asset("./a.png"));
        assert!(!deck.viewer().is_open());
        assert!(deck.assets().is_empty());
    }
}
