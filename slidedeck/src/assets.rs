//! Asset library: logical image paths to resource locators
//!
//! The library owns one resource handle per key. A handle is released
//! exactly once: when its key is overwritten, when the key is removed, or
//! when the library itself is dropped.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::BTreeMap;
use std::path::Path;

/// Creates and releases the handles behind asset locators
pub trait ResourceStore {
    /// Create a handle for `data` and return its locator
    fn create(&mut self, data: &[u8], mime_type: &str) -> String;

    /// Release a handle previously returned by `create`
    fn release(&mut self, locator: &str);
}

/// Store that encodes assets as base64 `data:` URLs
///
/// Data URLs own no external resource, so releasing is bookkeeping only.
#[derive(Debug, Default)]
pub struct DataUrlStore {
    live: usize,
}

impl DataUrlStore {
    /// Number of handles created and not yet released
    pub fn live(&self) -> usize {
        self.live
    }
}

impl ResourceStore for DataUrlStore {
    fn create(&mut self, data: &[u8], mime_type: &str) -> String {
        self.live += 1;
        format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
    }

    fn release(&mut self, _locator: &str) {
        self.live = self.live.saturating_sub(1);
    }
}

/// Image format types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Svg,
    Other,
}

impl ImageFormat {
    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::Webp,
            "svg" => ImageFormat::Svg,
            _ => ImageFormat::Other,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
            ImageFormat::Other => "application/octet-stream",
        }
    }

    /// Whether files of this format are picked up as assets
    pub fn is_image(self) -> bool {
        self != ImageFormat::Other
    }
}

/// One entry of the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Locator handed out by the resource store
    pub locator: String,

    pub mime_type: String,

    /// Pixel dimensions, when the image header could be read
    pub dimensions: Option<(u32, u32)>,
}

/// Normalize a logical asset path
///
/// Backslashes become `/` and any leading `./` segments are stripped, so
/// `./img/a.png`, `././img/a.png` and `img\a.png` name the same asset.
pub fn normalize_key(path: &str) -> String {
    let mut key = path.replace('\\', "/");
    while let Some(rest) = key.strip_prefix("./") {
        key = rest.to_string();
    }
    key
}

/// Pixel size from the image header, if the format is recognized
fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let size = imagesize::blob_size(data).ok()?;
    Some((u32::try_from(size.width).ok()?, u32::try_from(size.height).ok()?))
}

/// Mapping from normalized logical path to asset entry
pub struct AssetLibrary<S: ResourceStore = DataUrlStore> {
    store: S,
    entries: BTreeMap<String, AssetEntry>,
}

impl Default for AssetLibrary<DataUrlStore> {
    fn default() -> Self {
        Self::new(DataUrlStore::default())
    }
}

impl<S: ResourceStore> AssetLibrary<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: BTreeMap::new(),
        }
    }

    /// Add an asset, replacing (and releasing) any entry under the same key
    ///
    /// # Returns
    /// * `String` - The normalized key the asset is stored under
    pub fn insert(&mut self, path: &str, data: &[u8], mime_type: &str) -> String {
        let key = normalize_key(path);
        let locator = self.store.create(data, mime_type);
        let entry = AssetEntry {
            locator,
            mime_type: mime_type.to_string(),
            dimensions: image_dimensions(data),
        };

        if let Some(previous) = self.entries.insert(key.clone(), entry) {
            log::debug!("Replacing asset {}", key);
            self.store.release(&previous.locator);
        }
        key
    }

    /// Delete an asset and release its handle
    pub fn remove(&mut self, path: &str) -> bool {
        match self.entries.remove(&normalize_key(path)) {
            Some(entry) => {
                self.store.release(&entry.locator);
                true
            }
            None => false,
        }
    }

    /// Release every handle and empty the library
    pub fn clear(&mut self) {
        for (_, entry) in std::mem::take(&mut self.entries) {
            self.store.release(&entry.locator);
        }
    }

    pub fn get(&self, path: &str) -> Option<&AssetEntry> {
        self.entries.get(&normalize_key(path))
    }

    /// Locator for a logical path, as used by the renderer
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.get(path).map(|entry| entry.locator.as_str())
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ResourceStore> Drop for AssetLibrary<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<S: ResourceStore> std::fmt::Debug for AssetLibrary<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLibrary")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
