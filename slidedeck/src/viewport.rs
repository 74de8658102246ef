//! Zoom/pan transform for the image viewer
//!
//! The image is drawn centred in its container and transformed by
//! `translate(offset) scale(scale)`. `offset` lives in a frame whose origin
//! is the container centre; pointer positions passed in are container-local
//! (origin at the top-left) and converted here.

use serde::{Deserialize, Serialize};

/// Smallest allowed scale with default configuration
pub const MIN_SCALE: f64 = 0.5;

/// Largest allowed scale with default configuration
pub const MAX_SCALE: f64 = 8.0;

/// Scale change per unit of wheel delta
pub const WHEEL_SENSITIVITY: f64 = 0.001;

/// Factor applied by the zoom-in button
pub const ZOOM_IN_FACTOR: f64 = 1.25;

/// Factor applied by the zoom-out button
pub const ZOOM_OUT_FACTOR: f64 = 0.8;

/// A 2D point or displacement in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Direction of a discrete zoom button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Tunables for the viewport transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub wheel_sensitivity: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            wheel_sensitivity: WHEEL_SENSITIVITY,
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
        }
    }
}

impl ViewportConfig {
    /// Check that the limits and factors describe a usable zoom range
    ///
    /// # Returns
    /// * `Err(reason)` - The first problem found
    pub fn validate(&self) -> Result<(), String> {
        let finite = [
            self.min_scale,
            self.max_scale,
            self.wheel_sensitivity,
            self.zoom_in_factor,
            self.zoom_out_factor,
        ]
        .iter()
        .all(|value| value.is_finite());
        if !finite {
            return Err(format!("non-finite viewer setting in {:?}", self));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0 && self.max_scale >= 1.0) {
            return Err(format!(
                "scale range [{}, {}] must be positive and contain 1",
                self.min_scale, self.max_scale
            ));
        }
        if self.wheel_sensitivity <= 0.0 {
            return Err(format!(
                "wheel sensitivity {} must be positive",
                self.wheel_sensitivity
            ));
        }
        if !(self.zoom_in_factor > 1.0 && self.zoom_out_factor > 0.0 && self.zoom_out_factor < 1.0)
        {
            return Err(format!(
                "zoom factors in={} out={} must zoom in and out",
                self.zoom_in_factor, self.zoom_out_factor
            ));
        }
        Ok(())
    }
}

/// Read-only view of the transform for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    pub scale: f64,
    pub offset: Point,
}

impl ViewportSnapshot {
    /// CSS `transform` value equivalent to this snapshot
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset.x, self.offset.y, self.scale
        )
    }
}

/// Active drag: where the pointer and offset were when it started
#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    pointer: Point,
    offset: Point,
}

/// Scale and offset of an image under wheel zoom, button zoom and drag pan
///
/// Every mutation ends with the offset clamped to the overhang of the scaled
/// image, so the renderer never sees an offset that exposes empty space on
/// an axis where the image is larger than the container, and never sees a
/// non-zero offset on an axis where it is not.
#[derive(Debug, Clone)]
pub struct ViewportTransform {
    config: ViewportConfig,
    scale: f64,
    offset: Point,
    drag: Option<DragAnchor>,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl ViewportTransform {
    /// Transform at native scale; an unusable `config` is replaced by the defaults
    pub fn new(config: ViewportConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(reason) => {
                log::warn!("Ignoring viewer configuration: {}", reason);
                ViewportConfig::default()
            }
        };
        Self {
            config,
            scale: 1.0,
            offset: Point::ORIGIN,
            drag: None,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            scale: self.scale,
            offset: self.offset,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Zoom by a wheel delta, keeping the point under the cursor fixed
    ///
    /// # Parameters
    /// * `cursor` - Cursor position, container-local
    /// * `delta_y` - Vertical wheel delta (positive zooms out)
    /// * `container` - Container size
    /// * `image` - Rendered image size at scale 1
    pub fn apply_wheel_zoom(&mut self, cursor: Point, delta_y: f64, container: Size, image: Size) {
        if !delta_y.is_finite() {
            return;
        }
        let factor = 1.0 - delta_y * self.config.wheel_sensitivity;
        let anchor = to_centered(cursor, container);
        self.zoom_around(anchor, factor, container, image);
    }

    /// Zoom by a fixed step, keeping the container centre fixed
    pub fn apply_zoom_button(&mut self, direction: ZoomDirection, container: Size, image: Size) {
        let factor = match direction {
            ZoomDirection::In => self.config.zoom_in_factor,
            ZoomDirection::Out => self.config.zoom_out_factor,
        };
        self.zoom_around(Point::ORIGIN, factor, container, image);
    }

    /// Primary button pressed at `pointer`
    ///
    /// # Returns
    /// * `true` - Dragging started
    /// * `false` - Scale is at or below 1, there is nothing to pan
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        if self.scale <= 1.0 {
            return false;
        }
        self.drag = Some(DragAnchor {
            pointer,
            offset: self.offset,
        });
        true
    }

    /// Pointer moved while dragging; the image follows the pointer exactly
    pub fn update_drag(&mut self, pointer: Point, container: Size, image: Size) {
        let Some(anchor) = self.drag else {
            return;
        };
        if self.scale <= 1.0 {
            self.drag = None;
            return;
        }
        self.offset = Point::new(
            anchor.offset.x + (pointer.x - anchor.pointer.x),
            anchor.offset.y + (pointer.y - anchor.pointer.y),
        );
        self.clamp_offset(container, image);
    }

    /// Pointer released or left the surface
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Back to native scale, centred
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Point::ORIGIN;
        self.drag = None;
    }

    /// Largest permitted |offset| per axis at the current scale
    pub fn overhang(&self, container: Size, image: Size) -> Point {
        Point::new(
            axis_overhang(image.width * self.scale, container.width),
            axis_overhang(image.height * self.scale, container.height),
        )
    }

    fn zoom_around(&mut self, anchor: Point, factor: f64, container: Size, image: Size) {
        let old_scale = self.scale;
        let new_scale = (old_scale * factor).clamp(self.config.min_scale, self.config.max_scale);

        self.offset = Point::new(
            anchor.x - ((anchor.x - self.offset.x) / old_scale) * new_scale,
            anchor.y - ((anchor.y - self.offset.y) / old_scale) * new_scale,
        );
        self.scale = new_scale;
        // Nothing left to pan once back at native scale
        if new_scale <= 1.0 {
            self.drag = None;
        }
        self.clamp_offset(container, image);
    }

    fn clamp_offset(&mut self, container: Size, image: Size) {
        let bound = self.overhang(container, image);
        self.offset = Point::new(
            clamp_axis(self.offset.x, bound.x),
            clamp_axis(self.offset.y, bound.y),
        );
    }
}

/// Container-local position to the centre-origin frame
fn to_centered(position: Point, container: Size) -> Point {
    let center = container.center();
    Point::new(position.x - center.x, position.y - center.y)
}

fn axis_overhang(scaled: f64, container: f64) -> f64 {
    ((scaled - container) / 2.0).max(0.0)
}

fn clamp_axis(value: f64, overhang: f64) -> f64 {
    if overhang <= 0.0 {
        0.0
    } else {
        value.clamp(-overhang, overhang)
    }
}

/// Viewer for one image at a time
///
/// Opening the viewer, or switching it to a different image, always starts
/// from a reset transform.
#[derive(Debug, Default)]
pub struct ImageViewer {
    image: Option<String>,
    image_size: Option<Size>,
    transform: ViewportTransform,
}

impl ImageViewer {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            image: None,
            image_size: None,
            transform: ViewportTransform::new(config),
        }
    }

    /// Show the image identified by `key`
    pub fn open(&mut self, key: impl Into<String>, image_size: Option<Size>) {
        let key = key.into();
        log::debug!("Opening image viewer on {}", key);
        self.image = Some(key);
        self.image_size = image_size;
        self.transform.reset();
    }

    pub fn close(&mut self) {
        self.image = None;
        self.image_size = None;
        self.transform.reset();
    }

    pub fn is_open(&self) -> bool {
        self.image.is_some()
    }

    /// Key of the image being viewed
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn image_size(&self) -> Option<Size> {
        self.image_size
    }

    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut ViewportTransform {
        &mut self.transform
    }
}
