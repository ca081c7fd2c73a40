//! Gesture state machine unifying mouse drag, wheel and touch input.
//!
//! Transitions are driven by how many pointers are down, never by mode
//! flags. Each update is a pure function of `(state, event, transform)`
//! returning the next state and, when the view moved, the new transform.

use crate::config::CanvasConfig;
use crate::input::{PointerEvent, TouchEvent, TouchPhase, midpoint};
use crate::transform::{ViewTransform, translate_pinning};
use kurbo::{Point, Vec2};

/// Distances below this are treated as coincident fingers.
const MIN_PINCH_DISTANCE: f64 = 1e-6;

/// Active gesture, if any.
///
/// A gesture is created when pointers go down and is re-created from
/// scratch on every pointer-count change. It is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Single pointer drag.
    Panning {
        /// Screen position where the drag started.
        start_point: Point,
        /// Translation at drag start.
        start_translate: Vec2,
    },
    /// Two-finger pinch.
    Pinching {
        /// Screen midpoint of the two fingers at pinch start.
        start_point: Point,
        /// Translation at pinch start.
        start_translate: Vec2,
        /// Finger distance at pinch start.
        initial_distance: f64,
        /// Scale at pinch start.
        initial_scale: f64,
    },
}

/// Result of feeding one event into the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureUpdate {
    pub state: GestureState,
    /// New transform if the event moved the view.
    pub transform: Option<ViewTransform>,
}

impl GestureUpdate {
    fn settled(state: GestureState) -> Self {
        Self {
            state,
            transform: None,
        }
    }
}

impl GestureState {
    /// Start a single-pointer pan at `point`.
    pub fn begin_pan(point: Point, transform: &ViewTransform) -> Self {
        log::debug!("Gesture: pan start at {:?}", point);
        GestureState::Panning {
            start_point: point,
            start_translate: transform.translate(),
        }
    }

    /// Start a two-finger pinch.
    pub fn begin_pinch(a: Point, b: Point, transform: &ViewTransform) -> Self {
        let initial_distance = a.distance(b);
        log::debug!("Gesture: pinch start, distance {:.1}", initial_distance);
        GestureState::Pinching {
            start_point: midpoint(a, b),
            start_translate: transform.translate(),
            initial_distance,
            initial_scale: transform.scale(),
        }
    }

    /// Whether a pan or pinch is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, GestureState::Idle)
    }

    /// Number of pointers this state tracks.
    pub fn pointer_count(&self) -> usize {
        match self {
            GestureState::Idle => 0,
            GestureState::Panning { .. } => 1,
            GestureState::Pinching { .. } => 2,
        }
    }

    /// Transform for the current pointer positions, without changing state.
    ///
    /// Returns `None` when the state is idle, the pointer slice does not
    /// match the state, or the pinch started with coincident fingers.
    pub fn transform_for(
        &self,
        pointers: &[Point],
        current: &ViewTransform,
        config: &CanvasConfig,
    ) -> Option<ViewTransform> {
        match (*self, pointers) {
            (
                GestureState::Panning {
                    start_point,
                    start_translate,
                },
                [p, ..],
            ) => Some(current.with_translate(start_translate + (*p - start_point))),
            (
                GestureState::Pinching {
                    start_point,
                    start_translate,
                    initial_distance,
                    initial_scale,
                },
                [a, b, ..],
            ) => {
                if initial_distance < MIN_PINCH_DISTANCE {
                    log::debug!("Pinch started with coincident fingers, ignoring move");
                    return None;
                }
                // The world anchor comes from the pinch start, never from the
                // current frame.
                let anchor = Point::new(
                    (start_point.x - start_translate.x) / initial_scale,
                    (start_point.y - start_translate.y) / initial_scale,
                );
                let candidate = initial_scale * (a.distance(*b) / initial_distance);
                let scale = config.clamp_scale(candidate);
                let translate = translate_pinning(anchor, midpoint(*a, *b), scale);
                Some(ViewTransform::new(scale, translate, config))
            }
            _ => None,
        }
    }

    /// Feed a mouse event.
    ///
    /// Any button press starts a pan; release ends it. Wheel events zoom
    /// around the cursor and leave the gesture untouched.
    pub fn on_pointer(
        self,
        event: &PointerEvent,
        transform: &ViewTransform,
        config: &CanvasConfig,
    ) -> GestureUpdate {
        match event {
            PointerEvent::Down { position, .. } => {
                GestureUpdate::settled(Self::begin_pan(*position, transform))
            }
            PointerEvent::Move { position } => GestureUpdate {
                state: self,
                transform: match self {
                    GestureState::Panning { .. } => {
                        self.transform_for(&[*position], transform, config)
                    }
                    _ => None,
                },
            },
            PointerEvent::Up { .. } => {
                if self.is_active() {
                    log::debug!("Gesture: pointer up, idle");
                }
                GestureUpdate::settled(GestureState::Idle)
            }
            PointerEvent::Scroll { position, delta } => {
                let mut next = *transform;
                let changed = next.apply_wheel(*delta, *position, config);
                GestureUpdate {
                    state: self,
                    transform: changed.then_some(next),
                }
            }
        }
    }

    /// Feed a touch event.
    ///
    /// More than two fingers are treated as a pinch of the first two. A
    /// change in finger count re-enters the matching state anchored at the
    /// current finger positions; dropping from two fingers to one starts a
    /// fresh pan at the remaining finger.
    pub fn on_touch(
        self,
        event: &TouchEvent,
        transform: &ViewTransform,
        config: &CanvasConfig,
    ) -> GestureUpdate {
        if event.phase == TouchPhase::Cancel {
            log::debug!("Gesture: touch cancelled, idle");
            return GestureUpdate::settled(GestureState::Idle);
        }

        let touches = &event.touches;
        let count = touches.len().min(2);
        if count != self.pointer_count() {
            let next = match touches.as_slice() {
                [] => {
                    log::debug!("Gesture: all fingers lifted, idle");
                    GestureState::Idle
                }
                [p] => Self::begin_pan(*p, transform),
                [a, b, ..] => Self::begin_pinch(*a, *b, transform),
            };
            return GestureUpdate::settled(next);
        }

        match event.phase {
            TouchPhase::Move => GestureUpdate {
                state: self,
                transform: self.transform_for(touches, transform, config),
            },
            // Same count on start/end (e.g. a third finger): keep the gesture.
            _ => GestureUpdate::settled(self),
        }
    }
}
