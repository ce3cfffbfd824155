//! Per-glyph interaction contract: hover tooltip, click-to-pin, draw order
//!
//! Surface-agnostic. The dashboard feeds pointer positions in; the
//! controller mutates the scene paint order and the pinned reference.

use super::layout::Point;
use super::scene::Scene;
use super::snapshot::{epoch_of, NodeId, Snapshot, Status};
use super::state::{NodeRef, UiState};
use tracing::debug;

/// Tooltip offset from the pointer, in screen pixels
pub const TOOLTIP_OFFSET: (f64, f64) = (10.0, -28.0);

#[derive(Clone, Debug, PartialEq)]
pub enum NodeEvent {
    Enter { node: NodeId, pointer: Point },
    Move { pointer: Point },
    Leave { node: NodeId },
    Select { node: NodeId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Pointer position in screen space
    pub pointer: Point,
    pub slot: u64,
    pub epoch: u64,
    pub support_percent: f64,
    pub status: Status,
}

impl Tooltip {
    pub fn position(&self) -> Point {
        Point::new(
            self.pointer.x + TOOLTIP_OFFSET.0,
            self.pointer.y + TOOLTIP_OFFSET.1,
        )
    }

    pub fn lines(&self) -> [String; 4] {
        [
            format!("Slot: {}", self.slot),
            format!("Epoch: {}", self.epoch),
            format!("Support: {:.2}%", self.support_percent),
            format!("Status: {}", self.status.label()),
        ]
    }
}

/// Block data shown in the detail panel
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetails {
    pub block_root: String,
    pub slot: u64,
    pub epoch: u64,
    pub status: Status,
    pub support_percent: f64,
    /// Absolute supporting stake in ETH
    pub stake: f64,
}

impl NodeDetails {
    pub fn lines(&self) -> [String; 6] {
        [
            format!("Block Root: {}", self.block_root),
            format!("Slot: {}", self.slot),
            format!("Epoch: {}", self.epoch),
            format!("Status: {}", self.status.label()),
            format!("Supporting Percentage: {:.2}%", self.support_percent),
            format!("Supporting Stake: {} ETH", self.stake),
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailPanel {
    pub details: NodeDetails,
    /// False once a refresh pruned the pinned block
    pub in_snapshot: bool,
}

impl DetailPanel {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.details.lines().to_vec();
        if !self.in_snapshot {
            lines.push("(not in current snapshot)".to_string());
        }
        lines
    }
}

/// Hover and pin state for the current scene
#[derive(Debug, Default)]
pub struct InteractionController {
    hovered: Option<NodeId>,
    tooltip: Option<Tooltip>,
    panel: Option<DetailPanel>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn panel(&self) -> Option<&DetailPanel> {
        self.panel.as_ref()
    }

    pub fn handle(
        &mut self,
        event: NodeEvent,
        scene: &mut Scene,
        snapshot: &Snapshot,
        ui: &mut UiState,
    ) {
        match event {
            NodeEvent::Enter { node, pointer } => {
                let Some(glyph) = scene.glyph(node) else {
                    return;
                };
                self.tooltip = Some(Tooltip {
                    pointer,
                    slot: glyph.slot,
                    epoch: epoch_of(glyph.slot),
                    support_percent: snapshot.support_percent(glyph.weight),
                    status: glyph.status,
                });
                self.hovered = Some(node);
                scene.raise(node);
            }
            NodeEvent::Move { pointer } => {
                if let Some(tooltip) = &mut self.tooltip {
                    tooltip.pointer = pointer;
                }
            }
            NodeEvent::Leave { node } => {
                if self.hovered == Some(node) {
                    self.hovered = None;
                    self.tooltip = None;
                }
                scene.restore_order();
                raise_pinned(scene, ui);
            }
            NodeEvent::Select { node } => {
                let Some(details) = details_for(scene, snapshot, node) else {
                    return;
                };
                debug!(root = %details.block_root, slot = details.slot, "Pinned block");
                ui.pinned = Some(NodeRef(details.block_root.clone()));
                self.panel = Some(DetailPanel {
                    details,
                    in_snapshot: true,
                });
                scene.raise(node);
            }
        }
    }

    /// Translate a pointer position into enter/move/leave events
    ///
    /// `scene_pos` is the pointer in scene space (inverse view transform
    /// applied), `screen_pos` the raw pointer used for tooltip placement.
    pub fn track_pointer(
        &mut self,
        scene_pos: Option<Point>,
        screen_pos: Point,
        scene: &mut Scene,
        snapshot: &Snapshot,
        ui: &mut UiState,
    ) {
        let hit = scene_pos.and_then(|p| scene.hit_test(p));
        match (self.hovered, hit) {
            (Some(current), Some(hit)) if current == hit => {
                self.handle(NodeEvent::Move { pointer: screen_pos }, scene, snapshot, ui);
            }
            (current, hit) => {
                if let Some(current) = current {
                    self.handle(NodeEvent::Leave { node: current }, scene, snapshot, ui);
                }
                if let Some(hit) = hit {
                    self.handle(
                        NodeEvent::Enter {
                            node: hit,
                            pointer: screen_pos,
                        },
                        scene,
                        snapshot,
                        ui,
                    );
                }
            }
        }
    }

    /// Select the glyph under `scene_pos`; clicks on empty space do nothing
    pub fn click(
        &mut self,
        scene_pos: Point,
        scene: &mut Scene,
        snapshot: &Snapshot,
        ui: &mut UiState,
    ) -> Option<NodeId> {
        let node = scene.hit_test(scene_pos)?;
        self.handle(NodeEvent::Select { node }, scene, snapshot, ui);
        Some(node)
    }

    /// Bind to a freshly rendered scene
    ///
    /// Hover state is dropped since node ids are per-scene. The pinned block
    /// is looked up by root: re-raised with fresh details when present,
    /// otherwise the last known details stay with the panel marked stale.
    pub fn attach(&mut self, scene: &mut Scene, snapshot: &Snapshot, ui: &UiState) {
        self.hovered = None;
        self.tooltip = None;

        let Some(pinned) = &ui.pinned else {
            self.panel = None;
            return;
        };
        match scene.find(&pinned.0) {
            Some(id) => {
                scene.raise(id);
                self.panel = details_for(scene, snapshot, id).map(|details| DetailPanel {
                    details,
                    in_snapshot: true,
                });
            }
            None => {
                if let Some(panel) = &mut self.panel {
                    if panel.in_snapshot {
                        debug!(root = %pinned.0, "Pinned block not in snapshot");
                    }
                    panel.in_snapshot = false;
                }
            }
        }
    }
}

fn raise_pinned(scene: &mut Scene, ui: &UiState) {
    if let Some(id) = ui.pinned.as_ref().and_then(|p| scene.find(&p.0)) {
        scene.raise(id);
    }
}

fn details_for(scene: &Scene, snapshot: &Snapshot, id: NodeId) -> Option<NodeDetails> {
    let glyph = scene.glyph(id)?;
    Some(NodeDetails {
        block_root: glyph.block_root.clone(),
        slot: glyph.slot,
        epoch: epoch_of(glyph.slot),
        status: glyph.status,
        support_percent: snapshot.support_percent(glyph.weight),
        stake: glyph.weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::{layout, Viewport};
    use crate::core::scene::render;
    use crate::core::snapshot::{parse, tests::FORKED, tests::TWO_BLOCKS};

    fn setup(raw: &str) -> (Snapshot, Scene, UiState) {
        let snapshot = parse(raw).unwrap();
        let ui = UiState::default();
        let tree = layout(
            snapshot.proto_array.as_ref().unwrap(),
            ui.layout_style,
            Viewport::default(),
        );
        let scene = render(&tree, &snapshot, &ui);
        (snapshot, scene, ui)
    }

    fn enter(node: usize, pointer: Point) -> NodeEvent {
        NodeEvent::Enter {
            node: NodeId(node),
            pointer,
        }
    }

    fn leave(node: usize) -> NodeEvent {
        NodeEvent::Leave { node: NodeId(node) }
    }

    fn select(node: usize) -> NodeEvent {
        NodeEvent::Select { node: NodeId(node) }
    }

    #[test]
    fn test_enter_shows_tooltip_and_raises() {
        let (snapshot, mut scene, mut ui) = setup(TWO_BLOCKS);
        let mut ctl = InteractionController::new();
        let pointer = Point::new(5.0, 6.0);
        ctl.handle(enter(0, pointer), &mut scene, &snapshot, &mut ui);

        assert_eq!(scene.topmost(), Some(NodeId(0)));
        let tooltip = ctl.tooltip().unwrap();
        assert_eq!(
            tooltip.lines(),
            ["Slot: 100", "Epoch: 3", "Support: 60.00%", "Status: Final"]
        );
        assert_eq!(tooltip.position(), Point::new(15.0, -22.0));

        let moved = NodeEvent::Move {
            pointer: Point::new(7.0, 8.0),
        };
        ctl.handle(moved, &mut scene, &snapshot, &mut ui);
        assert_eq!(ctl.tooltip().unwrap().pointer, Point::new(7.0, 8.0));

        ctl.handle(leave(0), &mut scene, &snapshot, &mut ui);
        assert!(ctl.tooltip().is_none());
        assert_eq!(scene.topmost(), Some(NodeId(1)));
    }

    #[test]
    fn test_select_pins_and_survives_leave() {
        let (snapshot, mut scene, mut ui) = setup(FORKED);
        let mut ctl = InteractionController::new();
        ctl.handle(select(1), &mut scene, &snapshot, &mut ui);
        assert_eq!(ui.pinned, Some(NodeRef("0x02".into())));

        let panel = ctl.panel().unwrap();
        assert!(panel.in_snapshot);
        assert_eq!(
            panel.details.lines(),
            [
                "Block Root: 0x02",
                "Slot: 97",
                "Epoch: 3",
                "Status: Best Just.",
                "Supporting Percentage: 60.00%",
                "Supporting Stake: 60 ETH",
            ]
        );

        ctl.handle(enter(3, Point::default()), &mut scene, &snapshot, &mut ui);
        assert_eq!(scene.topmost(), Some(NodeId(3)));
        ctl.handle(leave(3), &mut scene, &snapshot, &mut ui);
        assert_eq!(scene.topmost(), Some(NodeId(1)));
    }

    #[test]
    fn test_new_selection_replaces_pin() {
        let (snapshot, mut scene, mut ui) = setup(FORKED);
        let mut ctl = InteractionController::new();
        ctl.handle(select(1), &mut scene, &snapshot, &mut ui);
        ctl.handle(select(3), &mut scene, &snapshot, &mut ui);
        assert_eq!(ui.pinned, Some(NodeRef("0x03".into())));
        assert_eq!(ctl.panel().unwrap().details.support_percent, 30.5);
    }

    #[test]
    fn test_track_pointer_diffs_hover() {
        let (snapshot, mut scene, mut ui) = setup(FORKED);
        let mut ctl = InteractionController::new();
        let a = scene.glyphs[2].center;
        let b = scene.glyphs[3].center;

        ctl.track_pointer(Some(a), a, &mut scene, &snapshot, &mut ui);
        assert_eq!(ctl.hovered(), Some(NodeId(2)));
        ctl.track_pointer(Some(b), b, &mut scene, &snapshot, &mut ui);
        assert_eq!(ctl.hovered(), Some(NodeId(3)));
        assert_eq!(ctl.tooltip().unwrap().slot, 98);
        ctl.track_pointer(None, b, &mut scene, &snapshot, &mut ui);
        assert_eq!(ctl.hovered(), None);
        assert!(ctl.tooltip().is_none());
    }

    #[test]
    fn test_click_on_empty_space_keeps_pin() {
        let (snapshot, mut scene, mut ui) = setup(FORKED);
        let mut ctl = InteractionController::new();
        let target = scene.glyphs[2].center;
        let hit = ctl.click(target, &mut scene, &snapshot, &mut ui);
        assert_eq!(hit, Some(NodeId(2)));
        let outside = Point::new(-50.0, -50.0);
        assert!(ctl.click(outside, &mut scene, &snapshot, &mut ui).is_none());
        assert_eq!(ui.pinned, Some(NodeRef("0x04".into())));
    }

    #[test]
    fn test_attach_keeps_pin_across_refresh() {
        let (snapshot, mut scene, mut ui) = setup(FORKED);
        let mut ctl = InteractionController::new();
        ctl.handle(select(3), &mut scene, &snapshot, &mut ui);

        // Rebuilt from the same data: pin is re-raised
        let (_, mut rebuilt, _) = setup(FORKED);
        ctl.attach(&mut rebuilt, &snapshot, &ui);
        assert_eq!(rebuilt.topmost(), Some(NodeId(3)));
        assert!(ctl.panel().unwrap().in_snapshot);

        // Block pruned: details kept, marked stale
        let (pruned_snapshot, mut pruned, _) = setup(TWO_BLOCKS);
        ctl.attach(&mut pruned, &pruned_snapshot, &ui);
        let panel = ctl.panel().unwrap();
        assert!(!panel.in_snapshot);
        assert_eq!(panel.details.block_root, "0x03");
        assert_eq!(panel.lines().last().unwrap(), "(not in current snapshot)");
        assert_eq!(pruned.topmost(), Some(NodeId(1)));
    }

    #[test]
    fn test_attach_drops_hover() {
        let (snapshot, mut scene, mut ui) = setup(FORKED);
        let mut ctl = InteractionController::new();
        ctl.handle(enter(0, Point::default()), &mut scene, &snapshot, &mut ui);
        let (_, mut rebuilt, _) = setup(FORKED);
        ctl.attach(&mut rebuilt, &snapshot, &ui);
        assert!(ctl.hovered().is_none());
        assert!(ctl.tooltip().is_none());
        assert!(ctl.panel().is_none());
    }
}
