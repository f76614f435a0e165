// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event payload dispatched through [`crate::emitter::Emitter`] channels
//! and [`canvas2d_responder`]'s capture/target/bubble walk (§4.10).

use crate::node::NodeId;

/// Which channel an [`Event`] was raised on (§4.10, §4.12, §4.13).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    PointerDown,
    PointerUp,
    PointerMove,
    Wheel,
    Click,
    DblClick,
    PointerEnter,
    PointerLeave,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
    DragStart,
    DragMove,
    DragEnd,
    DragEnter,
    DragLeave,
    Drop,
}

impl EventKind {
    /// The channel name used for `on`/`off`/`emit` (§4.10).
    #[must_use]
    pub const fn channel(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::PointerMove => "pointermove",
            Self::Wheel => "wheel",
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::DragStart => "dragstart",
            Self::DragMove => "dragmove",
            Self::DragEnd => "dragend",
            Self::DragEnter => "dragenter",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
        }
    }

    /// Whether this kind bubbles from target to root (§4.10): pointer and
    /// keyboard events do; enter/leave and focus/blur are target-only.
    #[must_use]
    pub const fn bubbles(self) -> bool {
        !matches!(
            self,
            Self::PointerEnter | Self::PointerLeave | Self::Focus | Self::Blur
        )
    }
}

/// A single dispatched event instance.
#[derive(Clone, Debug)]
pub struct Event {
    pub kind: EventKind,
    /// The node the event was raised on (hit target, focused node, ...).
    pub target: Option<NodeId>,
    /// The node currently running a handler during bubble/capture; distinct
    /// from `target` once propagation has moved past it.
    pub current_target: Option<NodeId>,
    pub scene_x: f64,
    pub scene_y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    pub key: Option<&'static str>,
    /// For drag-family events: the node being dragged (§4.12).
    pub dragged: Option<NodeId>,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl Event {
    #[must_use]
    pub fn new(kind: EventKind, target: Option<NodeId>) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            scene_x: 0.0,
            scene_y: 0.0,
            delta_x: 0.0,
            delta_y: 0.0,
            key: None,
            dragged: None,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// A blank event for tests that only exercise emitter plumbing.
    #[must_use]
    pub fn synthetic() -> Self {
        Self::new(EventKind::PointerMove, None)
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
