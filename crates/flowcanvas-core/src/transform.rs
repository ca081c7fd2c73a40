//! View transform for pan/zoom.

use crate::config::CanvasConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Maps world coordinates to screen coordinates:
/// `screen = world * scale + translate`.
///
/// The fields are private and every method that writes `scale` routes it
/// through [`CanvasConfig::clamp_scale`], so a constructed transform always
/// satisfies `min_scale <= scale <= max_scale`. `translate` is
/// unconstrained. A deserialized transform is clamped again when handed to
/// [`CanvasController::set_transform`](crate::CanvasController::set_transform).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Current zoom level (1.0 = 100%).
    scale: f64,
    /// Screen-space offset of the world origin.
    translate: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }
}

/// Translation that places `world` at `screen` under `scale`.
pub(crate) fn translate_pinning(world: Point, screen: Point, scale: f64) -> Vec2 {
    Vec2::new(screen.x - world.x * scale, screen.y - world.y * scale)
}

impl ViewTransform {
    /// Create a transform, clamping `scale` into the configured range.
    pub fn new(scale: f64, translate: Vec2, config: &CanvasConfig) -> Self {
        Self {
            scale: config.clamp_scale(scale),
            translate,
        }
    }

    /// Current zoom level (1.0 = 100%).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Screen-space offset of the world origin.
    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    /// Same scale, different translation.
    pub fn with_translate(self, translate: Vec2) -> Self {
        Self { translate, ..self }
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Convert a screen point to world coordinates.
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate.x) / self.scale,
            (screen.y - self.translate.y) / self.scale,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.translate.x,
            world.y * self.scale + self.translate.y,
        )
    }

    /// Convert a screen-space length to world units.
    pub fn screen_len_to_world(&self, len: f64) -> f64 {
        len / self.scale
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Set the zoom level, keeping the world point under `pivot` fixed.
    ///
    /// Returns `false` when the transform did not change (NaN input, or the
    /// clamped scale equals the current one).
    pub fn set_zoom(&mut self, new_scale: f64, pivot: Point, config: &CanvasConfig) -> bool {
        if new_scale.is_nan() {
            log::warn!("Ignoring NaN zoom request at {:?}", pivot);
            return false;
        }
        let new_scale = config.clamp_scale(new_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }

        let world = self.to_world(pivot);
        self.scale = new_scale;
        self.translate = translate_pinning(world, pivot, new_scale);
        log::trace!("Zoom to {:.3} around {:?}", self.scale, pivot);
        true
    }

    /// Multiply the zoom level by `factor` around `pivot`.
    pub fn zoom_by(&mut self, factor: f64, pivot: Point, config: &CanvasConfig) -> bool {
        self.set_zoom(self.scale * factor, pivot, config)
    }

    /// Apply one wheel event at `position`.
    ///
    /// Scrolling up (negative `delta.y`) zooms in by `wheel_zoom_factor`,
    /// scrolling down zooms out by the same factor. A purely horizontal
    /// scroll is ignored.
    pub fn apply_wheel(&mut self, delta: Vec2, position: Point, config: &CanvasConfig) -> bool {
        let new_scale = if delta.y < 0.0 {
            self.scale * config.wheel_zoom_factor
        } else if delta.y > 0.0 {
            self.scale / config.wheel_zoom_factor
        } else {
            return false;
        };
        self.set_zoom(new_scale, position, config)
    }

    /// Zoom in one step around the viewport center.
    pub fn zoom_in(&mut self, viewport: Size, config: &CanvasConfig) -> bool {
        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.zoom_by(config.wheel_zoom_factor, center, config)
    }

    /// Zoom out one step around the viewport center.
    pub fn zoom_out(&mut self, viewport: Size, config: &CanvasConfig) -> bool {
        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.zoom_by(1.0 / config.wheel_zoom_factor, center, config)
    }

    /// Zoom level as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// Reset to 100% with the world origin at the screen origin.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fit the transform so `bounds` (world) is centered in `viewport`.
    pub fn fit_to_bounds(
        &mut self,
        bounds: Rect,
        viewport: Size,
        padding: f64,
        config: &CanvasConfig,
    ) {
        if bounds.width() <= 0.0 && bounds.height() <= 0.0 {
            // Single point or empty graph: center it at 100%.
            self.scale = config.clamp_scale(1.0);
        } else {
            let padded_viewport = Size::new(
                (viewport.width - padding * 2.0).max(1.0),
                (viewport.height - padding * 2.0).max(1.0),
            );
            let scale_x = padded_viewport.width / bounds.width().max(f64::EPSILON);
            let scale_y = padded_viewport.height / bounds.height().max(f64::EPSILON);
            self.scale = config.clamp_scale(scale_x.min(scale_y));
        }

        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.translate = translate_pinning(bounds.center(), viewport_center, self.scale);
        log::debug!(
            "Fit {:?} into {:?}: scale {:.3}",
            bounds,
            viewport,
            self.scale
        );
    }
}
