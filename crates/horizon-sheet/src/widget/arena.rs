//! Arena of render primitives with per-kind free lists.
//!
//! The host toolkit draws whatever primitives are visible; the sheet only
//! creates, repositions and hides them. Creating primitives is the expensive
//! part, so every primitive lives in a slot that is reused instead of freed.
//!
//! Two usage styles share the arena:
//!
//! - Frame mode, for cell contents: [`begin_frame`](PrimitiveArena::begin_frame)
//!   moves every shown primitive of a pane to its kind's free list,
//!   [`place`](PrimitiveArena::place) pops one (or allocates) for each needed
//!   primitive, and [`end_frame`](PrimitiveArena::end_frame) hides whatever was
//!   not reused.
//! - Pinned mode, for long-lived handles such as selection boxes:
//!   [`acquire`](PrimitiveArena::acquire) and [`release`](PrimitiveArena::release).

use std::collections::HashMap;

use horizon_sheet_core::{Color, Rect};
use slotmap::{SlotMap, new_key_type};

use crate::model::Align;

new_key_type! {
    /// Handle of a render primitive.
    pub struct PrimitiveId;
}

/// The sibling canvases of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Table,
    Header,
    Index,
    Corner,
}

/// What a primitive draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Text,
    CellBackground,
    GridLine,
    DropdownArrow,
    Checkbox,
    SelectionFill,
    SelectionBorder,
    GutterShade,
    CurrentBorder,
    FillHandle,
}

/// Appearance of one primitive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimitiveStyle {
    pub fill: Option<Color>,
    pub outline: Option<Color>,
    /// Text lines, for text primitives.
    pub lines: Vec<String>,
    pub align: Align,
    /// Check state, for checkboxes.
    pub checked: bool,
}

impl PrimitiveStyle {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn outlined(color: Color) -> Self {
        Self {
            outline: Some(color),
            ..Self::default()
        }
    }

    pub fn text(lines: Vec<String>, color: Color, align: Align) -> Self {
        Self {
            fill: Some(color),
            lines,
            align,
            ..Self::default()
        }
    }
}

/// One render primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub pane: Pane,
    pub kind: PrimitiveKind,
    pub rect: Rect,
    pub style: PrimitiveStyle,
    pub visible: bool,
}

/// Counters for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Primitives allocated because no free slot of that kind existed.
    pub created: usize,
    /// Primitives taken from a free list and repositioned.
    pub reused: usize,
    /// Leftover primitives hidden at the end of the frame.
    pub hidden: usize,
}

impl FrameStats {
    /// Primitives created or repositioned.
    pub fn touched(&self) -> usize {
        self.created + self.reused
    }
}

type PoolKey = (Pane, PrimitiveKind);

/// Slot arena of primitives.
#[derive(Debug, Default)]
pub struct PrimitiveArena {
    slots: SlotMap<PrimitiveId, Primitive>,
    shown: HashMap<PoolKey, Vec<PrimitiveId>>,
    free: HashMap<PoolKey, Vec<PrimitiveId>>,
    stats: FrameStats,
}

impl PrimitiveArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.slots.get(id)
    }

    /// Total allocated primitives, shown or not.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Visible primitives of `pane`.
    pub fn visible_in(&self, pane: Pane) -> impl Iterator<Item = &Primitive> {
        self.slots.values().filter(move |p| p.visible && p.pane == pane)
    }

    /// Visible primitives of `pane` and `kind`.
    pub fn visible_of(&self, pane: Pane, kind: PrimitiveKind) -> impl Iterator<Item = &Primitive> {
        self.visible_in(pane).filter(move |p| p.kind == kind)
    }

    /// Counters since the last `begin_frame`.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn take_or_create(&mut self, pane: Pane, kind: PrimitiveKind, rect: Rect, style: PrimitiveStyle) -> PrimitiveId {
        let reused = self.free.get_mut(&(pane, kind)).and_then(Vec::pop);
        match reused.and_then(|id| self.slots.get_mut(id).map(|p| (id, p))) {
            Some((id, primitive)) => {
                primitive.rect = rect;
                primitive.style = style;
                primitive.visible = true;
                self.stats.reused += 1;
                id
            }
            None => {
                self.stats.created += 1;
                self.slots.insert(Primitive {
                    pane,
                    kind,
                    rect,
                    style,
                    visible: true,
                })
            }
        }
    }

    // =========================================================================
    // Frame mode
    // =========================================================================

    /// Start a frame for the given panes: shown primitives become reusable.
    pub fn begin_frame(&mut self, panes: &[Pane]) {
        self.stats = FrameStats::default();
        let keys: Vec<PoolKey> = self.shown.keys().filter(|(p, _)| panes.contains(p)).copied().collect();
        for key in keys {
            if let Some(ids) = self.shown.remove(&key) {
                self.free.entry(key).or_default().extend(ids);
            }
        }
    }

    /// Show a primitive for this frame, reusing a free one when possible.
    pub fn place(&mut self, pane: Pane, kind: PrimitiveKind, rect: Rect, style: PrimitiveStyle) -> PrimitiveId {
        let id = self.take_or_create(pane, kind, rect, style);
        self.shown.entry((pane, kind)).or_default().push(id);
        id
    }

    /// Hide every primitive of the given panes that was not placed this frame.
    pub fn end_frame(&mut self, panes: &[Pane]) -> FrameStats {
        for (key, ids) in &self.free {
            if !panes.contains(&key.0) {
                continue;
            }
            for &id in ids {
                if let Some(primitive) = self.slots.get_mut(id)
                    && primitive.visible
                {
                    primitive.visible = false;
                    self.stats.hidden += 1;
                }
            }
        }
        self.stats
    }

    // =========================================================================
    // Pinned mode
    // =========================================================================

    /// Take a primitive that stays shown until released.
    pub fn acquire(&mut self, pane: Pane, kind: PrimitiveKind, rect: Rect, style: PrimitiveStyle) -> PrimitiveId {
        self.take_or_create(pane, kind, rect, style)
    }

    /// Reposition or restyle a pinned primitive.
    pub fn update(&mut self, id: PrimitiveId, rect: Rect, style: PrimitiveStyle) -> bool {
        match self.slots.get_mut(id) {
            Some(primitive) => {
                primitive.rect = rect;
                primitive.style = style;
                primitive.visible = true;
                true
            }
            None => false,
        }
    }

    /// Hide a pinned primitive and return it to its free list.
    pub fn release(&mut self, id: PrimitiveId) {
        if let Some(primitive) = self.slots.get_mut(id) {
            primitive.visible = false;
            self.free.entry((primitive.pane, primitive.kind)).or_default().push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(i: usize) -> Rect {
        Rect::new(0.0, i as f64 * 10.0, 10.0, 10.0)
    }

    fn draw(arena: &mut PrimitiveArena, count: usize) -> FrameStats {
        arena.begin_frame(&[Pane::Table]);
        for i in 0..count {
            arena.place(Pane::Table, PrimitiveKind::Text, rect(i), PrimitiveStyle::default());
        }
        arena.end_frame(&[Pane::Table])
    }

    #[test]
    fn test_frames_reuse_slots() {
        let mut arena = PrimitiveArena::new();
        let first = draw(&mut arena, 5);
        assert_eq!(first, FrameStats { created: 5, reused: 0, hidden: 0 });

        let second = draw(&mut arena, 3);
        assert_eq!(second, FrameStats { created: 0, reused: 3, hidden: 2 });
        assert_eq!(arena.allocated(), 5);
        assert_eq!(arena.visible_in(Pane::Table).count(), 3);

        let third = draw(&mut arena, 6);
        assert_eq!(third, FrameStats { created: 1, reused: 5, hidden: 0 });
        assert_eq!(arena.allocated(), 6);
    }

    #[test]
    fn test_frame_leaves_other_panes() {
        let mut arena = PrimitiveArena::new();
        arena.place(Pane::Header, PrimitiveKind::Text, rect(0), PrimitiveStyle::default());
        draw(&mut arena, 1);
        draw(&mut arena, 0);
        assert_eq!(arena.visible_in(Pane::Header).count(), 1);
        assert_eq!(arena.visible_in(Pane::Table).count(), 0);
    }

    #[test]
    fn test_pinned_release_and_reacquire() {
        let mut arena = PrimitiveArena::new();
        let id = arena.acquire(Pane::Table, PrimitiveKind::SelectionFill, rect(0), PrimitiveStyle::default());
        arena.release(id);
        assert!(!arena.get(id).unwrap().visible);

        let again = arena.acquire(Pane::Table, PrimitiveKind::SelectionFill, rect(1), PrimitiveStyle::default());
        assert_eq!(again, id);
        assert_eq!(arena.get(id).unwrap().rect, rect(1));
        assert!(arena.update(id, rect(2), PrimitiveStyle::default()));
    }
}
