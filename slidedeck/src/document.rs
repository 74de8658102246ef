//! Ordered document list and drag-to-reorder state

/// One unit of markup text contributing to the deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Stable identifier, unique within the owning list
    pub id: String,

    /// Display and sort label (may embed a relative path, e.g. "part1/intro.md")
    pub name: String,

    /// Raw markup content
    pub content: String,
}

impl Document {
    /// Create a document with an explicit id
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Ordered sequence of documents; insertion order is presentation order
#[derive(Debug, Default)]
pub struct DocumentList {
    documents: Vec<Document>,

    /// Next id suffix. Ids are never reused, even after removal.
    next_id: u64,
}

impl DocumentList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document, allocating a fresh id for it
    ///
    /// # Returns
    /// * `String` - The id assigned to the new document
    pub fn push(&mut self, name: impl Into<String>, content: impl Into<String>) -> String {
        self.next_id += 1;
        let id = format!("doc-{}", self.next_id);
        let document = Document::new(id.clone(), name, content);
        log::debug!("Added document {} ({})", document.id, document.name);
        self.documents.push(document);
        id
    }

    /// Remove a document by id
    ///
    /// # Returns
    /// * `Some(Document)` - The removed document
    /// * `None` - No document with that id exists
    pub fn remove(&mut self, id: &str) -> Option<Document> {
        let index = self.position(id)?;
        let removed = self.documents.remove(index);
        log::debug!("Removed document {} ({})", removed.id, removed.name);
        Some(removed)
    }

    /// Move the document at `from` so that it ends up at index `to`
    ///
    /// Out-of-range indices leave the list untouched and return `false`.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        let len = self.documents.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let document = self.documents.remove(from);
            self.documents.insert(to, document);
        }
        true
    }

    /// Replace the content of an existing document
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.documents.iter_mut().find(|d| d.id == id) {
            Some(document) => {
                document.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Sort documents by name (stable, byte-wise)
    pub fn sort_by_name(&mut self) {
        self.documents.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Index of the document with the given id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn as_slice(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }
}

impl<'a> IntoIterator for &'a DocumentList {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Drag-to-reorder state for the document list
///
/// While an item is being dragged, hovering over another item moves the
/// dragged item into the hovered item's position immediately, so the list
/// always shows the order that would result from dropping right now.
#[derive(Debug, Default)]
pub struct DragReorder {
    dragging: Option<String>,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging the document with the given id
    pub fn begin(&mut self, id: impl Into<String>) {
        self.dragging = Some(id.into());
    }

    /// Id of the document currently being dragged
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Pointer moved over the document `target_id`
    ///
    /// # Returns
    /// * `true` - The list order changed
    /// * `false` - Nothing is being dragged, the target is the dragged item,
    ///   or either id is unknown
    pub fn hover(&self, documents: &mut DocumentList, target_id: &str) -> bool {
        let Some(ref dragging) = self.dragging else {
            return false;
        };
        if dragging == target_id {
            return false;
        }
        match (documents.position(dragging), documents.position(target_id)) {
            (Some(from), Some(to)) => documents.move_to(from, to),
            _ => false,
        }
    }

    /// Drop or cancel; the order produced by `hover` is kept
    pub fn end(&mut self) {
        self.dragging = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &DocumentList) -> Vec<&str> {
        list.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_push_assigns_unique_ids() {
        let mut list = DocumentList::new();
        let a = list.push("a.md", "# A");
        let b = list.push("b.md", "# B");
        assert_ne!(a, b);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(&a).unwrap().content, "# A");
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut list = DocumentList::new();
        let a = list.push("a.md", "");
        list.remove(&a).unwrap();
        let b = list.push("b.md", "");
        assert_ne!(a, b);
        assert!(list.get(&a).is_none());
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut list = DocumentList::new();
        list.push("a.md", "");
        assert!(list.remove("doc-99").is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_move_to() {
        let mut list = DocumentList::new();
        list.push("a", "");
        list.push("b", "");
        list.push("c", "");

        assert!(list.move_to(0, 2));
        assert_eq!(names(&list), vec!["b", "c", "a"]);

        assert!(list.move_to(2, 0));
        assert_eq!(names(&list), vec!["a", "b", "c"]);

        assert!(!list.move_to(0, 3));
        assert_eq!(names(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_by_name() {
        let mut list = DocumentList::new();
        list.push("02_b.md", "");
        list.push("01_a.md", "");
        list.sort_by_name();
        assert_eq!(names(&list), vec!["01_a.md", "02_b.md"]);
    }

    #[test]
    fn test_drag_reorder_moves_on_hover() {
        let mut list = DocumentList::new();
        let a = list.push("a", "");
        let _b = list.push("b", "");
        let c = list.push("c", "");

        let mut drag = DragReorder::new();
        drag.begin(a.clone());
        assert!(drag.hover(&mut list, &c));
        assert_eq!(names(&list), vec!["b", "c", "a"]);

        // Hovering over itself is a no-op
        assert!(!drag.hover(&mut list, &a));

        drag.end();
        assert!(drag.dragging().is_none());
        assert!(!drag.hover(&mut list, &c));
        assert_eq!(names(&list), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_drag_reorder_unknown_target() {
        let mut list = DocumentList::new();
        let a = list.push("a", "");
        let mut drag = DragReorder::new();
        drag.begin(a);
        assert!(!drag.hover(&mut list, "missing"));
    }
}
