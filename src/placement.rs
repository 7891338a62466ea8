//! # Interactive Placement Engine
//!
//! Pointer and keyboard handling for the editing canvas. The engine only
//! produces the next document state; the caller re-renders the node named
//! in the returned [`PlacementEffect`].
//!
//! ## Drag state machine (per item)
//!
//! ```text
//!            press                move ≥ 3px (either axis)
//!   Idle ───────────► Armed ─────────────────────────► Dragging
//!    ▲                  │ release (click)                  │ release
//!    └──────────────────┴──────────────────────────────────┘
//! ```
//!
//! Each press creates its own [`DragSession`] which is threaded through
//! [`PlacementEngine::update_drag`] and [`PlacementEngine::end_drag`], so two
//! pointers can never share state. The grab offset is taken from the item's
//! stored position, not from its on-screen box, so positions do not drift
//! across successive drags.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{Face, FaceKind, ItemId};
use crate::units::{mm_to_px, px_to_mm};

/// Pointer travel (px, either axis) that turns a press into a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Arrow-key nudge in mm.
pub const NUDGE_MM: f64 = 0.5;

/// Arrow-key nudge in mm with the modifier held.
pub const NUDGE_FAST_MM: f64 = 1.0;

/// A point in page pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pressed, below the movement threshold.
    Armed,
    /// Threshold crossed; moves write the item position.
    Dragging,
}

/// State of one press-move-release gesture on one item.
#[derive(Debug, Clone)]
pub struct DragSession {
    face: FaceKind,
    item: ItemId,
    press: Point,
    container: Point,
    grab: Point,
    phase: DragPhase,
}

impl DragSession {
    pub fn item(&self) -> &ItemId {
        &self.item
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Pointer → container-relative px, minus grab offset, clamped at 0, in mm.
    fn project(&self, pointer: Point) -> (f64, f64) {
        let x = (pointer.x - self.container.x - self.grab.x).max(0.0);
        let y = (pointer.y - self.container.y - self.grab.y).max(0.0);
        (px_to_mm(y), px_to_mm(x))
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// What changed, so the caller can re-render just that node.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementEffect {
    None,
    /// Item position changed; `x`/`y` is the node's new translate in px.
    Moved { item: ItemId, x: f64, y: f64 },
    /// Selection changed (`None` = cleared).
    Selection(Option<ItemId>),
    /// Item removed from the face.
    Deleted(ItemId),
}

/// Selection and gesture handling for the face being edited.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    face: FaceKind,
    selected: Option<ItemId>,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementEngine {
    pub fn new() -> Self {
        Self {
            face: FaceKind::Front,
            selected: None,
        }
    }

    /// Face currently being edited.
    pub fn face(&self) -> FaceKind {
        self.face
    }

    pub fn selected(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    /// Switch the edited face. Always clears the selection.
    pub fn switch_face(&mut self, face: FaceKind) -> PlacementEffect {
        self.face = face;
        if self.selected.take().is_some() {
            PlacementEffect::Selection(None)
        } else {
            PlacementEffect::None
        }
    }

    /// Toggle selection of `item`; selecting one item deselects any other.
    pub fn click(&mut self, item: &ItemId) -> PlacementEffect {
        if self.selected.as_ref() == Some(item) {
            self.selected = None;
        } else {
            self.selected = Some(item.clone());
        }
        PlacementEffect::Selection(self.selected.clone())
    }

    /// Delete `item` from the face.
    pub fn double_click(&mut self, face: &mut Face, item: &ItemId) -> PlacementEffect {
        if face.remove(item).is_none() {
            return PlacementEffect::None;
        }
        if self.selected.as_ref() == Some(item) {
            self.selected = None;
        }
        debug!(item = %item, "item deleted");
        PlacementEffect::Deleted(item.clone())
    }

    /// Start a press on `item`.
    ///
    /// `container` is the face container's top-left corner in page px.
    /// Returns `None` if the item is not on the face.
    pub fn begin_drag(
        &self,
        face: &Face,
        item: &ItemId,
        pointer: Point,
        container: Point,
    ) -> Option<DragSession> {
        let stored = face.item(item)?;
        let grab = Point::new(
            pointer.x - container.x - mm_to_px(stored.left),
            pointer.y - container.y - mm_to_px(stored.top),
        );
        Some(DragSession {
            face: self.face,
            item: item.clone(),
            press: pointer,
            container,
            grab,
            phase: DragPhase::Armed,
        })
    }

    /// Pointer moved during a press.
    pub fn update_drag(
        &mut self,
        session: &mut DragSession,
        face: &mut Face,
        pointer: Point,
    ) -> PlacementEffect {
        if session.face != self.face {
            return PlacementEffect::None;
        }
        if session.phase == DragPhase::Armed {
            let dx = (pointer.x - session.press.x).abs();
            let dy = (pointer.y - session.press.y).abs();
            if dx < DRAG_THRESHOLD_PX && dy < DRAG_THRESHOLD_PX {
                return PlacementEffect::None;
            }
            session.phase = DragPhase::Dragging;
            self.selected = Some(session.item.clone());
        }
        self.apply_projection(session, face, pointer)
    }

    /// Pointer released. A release that never crossed the threshold is a click.
    pub fn end_drag(
        &mut self,
        mut session: DragSession,
        face: &mut Face,
        pointer: Point,
    ) -> PlacementEffect {
        if session.face != self.face {
            return PlacementEffect::None;
        }
        match session.phase {
            DragPhase::Armed => {
                // Releasing past the threshold without an intermediate move still drags.
                let moved = self.update_drag(&mut session, face, pointer);
                if session.phase == DragPhase::Dragging {
                    moved
                } else {
                    self.click(&session.item)
                }
            }
            DragPhase::Dragging => self.apply_projection(&session, face, pointer),
        }
    }

    fn apply_projection(
        &self,
        session: &DragSession,
        face: &mut Face,
        pointer: Point,
    ) -> PlacementEffect {
        let Some(item) = face.item_mut(&session.item) else {
            return PlacementEffect::None;
        };
        let (top, left) = session.project(pointer);
        item.top = top;
        item.left = left;
        PlacementEffect::Moved {
            item: session.item.clone(),
            x: mm_to_px(left),
            y: mm_to_px(top),
        }
    }

    /// Arrow-key nudge of the selected item.
    ///
    /// Ignored while focus is in an editable control or nothing is selected.
    pub fn key(
        &mut self,
        face: &mut Face,
        key: Key,
        fast: bool,
        focus_in_editable: bool,
    ) -> PlacementEffect {
        if focus_in_editable {
            return PlacementEffect::None;
        }
        let Some(selected) = self.selected.clone() else {
            return PlacementEffect::None;
        };
        let step = if fast { NUDGE_FAST_MM } else { NUDGE_MM };
        let (dx, dy) = match key {
            Key::ArrowUp => (0.0, -step),
            Key::ArrowDown => (0.0, step),
            Key::ArrowLeft => (-step, 0.0),
            Key::ArrowRight => (step, 0.0),
            Key::Other => return PlacementEffect::None,
        };
        let Some(item) = face.item_mut(&selected) else {
            return PlacementEffect::None;
        };
        item.left = (item.left + dx).max(0.0);
        item.top = (item.top + dy).max(0.0);
        PlacementEffect::Moved {
            item: selected,
            x: mm_to_px(item.left),
            y: mm_to_px(item.top),
        }
    }
}
