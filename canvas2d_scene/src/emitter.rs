// Copyright 2026 the canvas2d Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node named-channel event emitter (Module B, §4.10).
//!
//! No pack file models a listener-list emitter with `on`/`off`/`once`
//! snapshot-safe semantics, so this is authored directly against §4.10 and
//! §9's "Event mutation safety" design note: `emit` walks a snapshot of the
//! listener ids registered *before* the call, re-resolving each id against
//! the live list as it goes. A handler added mid-emit has no id in that
//! snapshot, so it never fires in the current emit; a handler removed
//! mid-emit (by a sibling handler, via a channel that outlives the `Emitter`
//! borrow at a higher layer) simply isn't found by id and is skipped.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::event::Event;

/// Opaque handle returned by [`Emitter::on`]/[`Emitter::once`], passed back
/// to [`Emitter::off`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u64);

struct Listener {
    id: u64,
    once: bool,
    handler: Box<dyn FnMut(&mut Event)>,
}

/// Named-channel listener lists with emit-safe mutation (§4.10).
pub struct Emitter {
    channels: HashMap<String, Vec<Listener>>,
    next_id: u64,
}

impl Emitter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers `handler` on `channel`, returning a handle for [`Self::off`].
    pub fn on(&mut self, channel: &str, handler: impl FnMut(&mut Event) + 'static) -> ListenerId {
        self.push(channel, false, Box::new(handler))
    }

    /// Registers a handler that removes itself after its first invocation.
    pub fn once(&mut self, channel: &str, handler: impl FnMut(&mut Event) + 'static) -> ListenerId {
        self.push(channel, true, Box::new(handler))
    }

    fn push(&mut self, channel: &str, once: bool, handler: Box<dyn FnMut(&mut Event)>) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.channels
            .entry(String::from(channel))
            .or_default()
            .push(Listener { id, once, handler });
        ListenerId(id)
    }

    /// Unregisters a listener. Idempotent: a missing/already-removed handle
    /// is a no-op (§4.15 "`off(handler)` on an unregistered handler...
    /// silent").
    pub fn off(&mut self, channel: &str, listener: ListenerId) {
        if let Some(list) = self.channels.get_mut(channel) {
            list.retain(|l| l.id != listener.0);
        }
    }

    /// Returns `true` if `channel` has at least one registered listener —
    /// used by drag's drop-target filter (§4.12: "filtered to nodes whose
    /// emitter has at least one `dragenter` or `drop` listener").
    #[must_use]
    pub fn has_listener(&self, channel: &str) -> bool {
        self.channels.get(channel).is_some_and(|list| !list.is_empty())
    }

    /// Fires every listener registered on `channel` at call time, in
    /// registration order, against a snapshot of listener ids (§4.10, §9).
    pub fn emit(&mut self, channel: &str, event: &mut Event) {
        let Some(snapshot): Option<Vec<u64>> = self
            .channels
            .get(channel)
            .map(|list| list.iter().map(|l| l.id).collect())
        else {
            return;
        };

        for id in snapshot {
            let Some(list) = self.channels.get_mut(channel) else {
                break;
            };
            let Some(pos) = list.iter().position(|l| l.id == id) else {
                // Removed by an earlier handler in this same emit, or by
                // `off` called between snapshot and now; skip it.
                continue;
            };
            // Take the listener out so its own call can't alias
            // `self.channels` (a handler may call `on`/`off`/`emit`).
            let mut listener = list.remove(pos);
            (listener.handler)(event);
            if !listener.once {
                if let Some(list) = self.channels.get_mut(channel) {
                    list.push(listener);
                }
            }
        }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Emitter")
            .field("channels", &self.channels.len())
            .finish_non_exhaustive()
    }
}
