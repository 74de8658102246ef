//! slidedeck - turn a folder of markdown documents into a slide deck
//!
//! The library holds the pieces the command-line tool wires together:
//! slide segmentation, the image viewer's zoom/pan transform, the document
//! list, the asset library, acquisition from disk, rendering and export.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod acquisition;
pub mod assets;
pub mod config;
pub mod deck;
pub mod document;
pub mod html_exporter;
pub mod renderer;
pub mod segmenter;
pub mod viewport;

pub use assets::{AssetLibrary, DataUrlStore, ResourceStore};
pub use config::DeckConfig;
pub use deck::Deck;
pub use document::{Document, DocumentList, DragReorder};
pub use segmenter::{segment_slides, Slide, SlideKind};
pub use viewport::{ImageViewer, Point, Size, ViewportConfig, ViewportTransform, ZoomDirection};
