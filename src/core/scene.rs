//! Render pipeline: positioned tree + snapshot → scene graph
//!
//! The scene is rebuilt from scratch on every draw. It is surface-agnostic:
//! the egui canvas paints it, [`Scene::to_svg`](super::svg) serializes it.

use super::layout::{Point, PositionedTree, Rect, Viewport};
use super::snapshot::{NodeId, PathKind, Snapshot, Status};
use super::state::UiState;
use tracing::trace;

/// Pixels per em
pub const EM_PX: f64 = 16.0;
/// Glyph height in em
pub const NODE_HEIGHT_EM: f64 = 1.5;

/// Glyph width in em: `max(1, floor(log10(slot)))`, slot 0 included
pub fn node_width_units(slot: u64) -> u32 {
    match slot.checked_ilog10() {
        Some(digits) => digits.max(1),
        None => 1,
    }
}

/// HSL color, hue in degrees, saturation and lightness in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    /// Red (0) → yellow → green (1) support gradient
    pub fn support(fraction: f64) -> Self {
        Self {
            hue: 120.0 * fraction,
            saturation: 0.6,
            lightness: 0.5,
        }
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        let s = self.saturation.clamp(0.0, 1.0);
        let l = self.lightness.clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [channel(r), channel(g), channel(b)]
    }

    /// CSS notation, `hsl(72,60%,50%)`
    pub fn css(&self) -> String {
        format!(
            "hsl({},{}%,{}%)",
            trim_float(self.hue),
            trim_float(self.saturation * 100.0),
            trim_float(self.lightness * 100.0)
        )
    }
}

fn trim_float(v: f64) -> String {
    let s = format!("{:.4}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStyle {
    Default,
    Canonical,
}

/// Parent→child edge drawn as a horizontal cubic curve
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub parent: NodeId,
    pub child: NodeId,
    pub style: LinkStyle,
    /// Child end, two control points, parent end
    pub curve: [Point; 4],
}

impl Link {
    fn between(parent: Point, child: Point) -> [Point; 4] {
        let mid = (child.x + parent.x) / 2.0;
        [
            child,
            Point::new(mid, child.y),
            Point::new(mid, parent.y),
            parent,
        ]
    }

    pub fn class(&self) -> &'static str {
        match self.style {
            LinkStyle::Default => "tree-link",
            LinkStyle::Canonical => "tree-link tree-link-canonical",
        }
    }
}

/// Style classes attached to a glyph
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphClass {
    pub root: bool,
    pub internal: bool,
    pub status: Status,
}

impl GlyphClass {
    pub fn names(&self) -> [&'static str; 4] {
        [
            "node",
            if self.internal { "node-internal" } else { "node-leaf" },
            if self.root { "node-root" } else { "node-non-root" },
            match self.status {
                Status::Final => "node-final",
                Status::Justified => "node-justified",
                Status::Pending => "node-pending",
            },
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    /// Left end of the baseline
    pub anchor: Point,
}

/// Node box with the block data bound to it
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub id: NodeId,
    pub block_root: String,
    pub slot: u64,
    pub weight: f64,
    pub status: Status,
    pub center: Point,
    pub width_units: u32,
    pub fill: Hsl,
    pub class: GlyphClass,
    pub label: Option<Label>,
}

impl Glyph {
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(
            self.center,
            self.width_units as f64 * EM_PX,
            NODE_HEIGHT_EM * EM_PX,
        )
    }
}

/// One complete drawing of a snapshot
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    pub links: Vec<Link>,
    /// Indexed by `NodeId`
    pub glyphs: Vec<Glyph>,
    /// Paint order, last is topmost
    order: Vec<NodeId>,
}

impl Scene {
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            links: Vec::new(),
            glyphs: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph(&self, id: NodeId) -> Option<&Glyph> {
        self.glyphs.get(id.0)
    }

    /// Glyph for a block root, if it is part of this scene
    pub fn find(&self, block_root: &str) -> Option<NodeId> {
        self.glyphs
            .iter()
            .find(|g| g.block_root == block_root)
            .map(|g| g.id)
    }

    /// Glyphs in paint order
    pub fn painted(&self) -> impl Iterator<Item = &Glyph> {
        self.order.iter().filter_map(|&id| self.glyph(id))
    }

    pub fn topmost(&self) -> Option<NodeId> {
        self.order.last().copied()
    }

    /// Move a glyph to the top of the paint order
    pub fn raise(&mut self, id: NodeId) {
        if let Some(pos) = self.order.iter().position(|&o| o == id) {
            let raised = self.order.remove(pos);
            self.order.push(raised);
        }
    }

    /// Restore document (preorder) paint order
    pub fn restore_order(&mut self) {
        self.order = self.glyphs.iter().map(|g| g.id).collect();
    }

    /// Topmost glyph under a scene-space point
    pub fn hit_test(&self, p: Point) -> Option<NodeId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&id| self.glyph(id).is_some_and(|g| g.rect().contains(p)))
    }

    pub fn label_count(&self) -> usize {
        self.glyphs.iter().filter(|g| g.label.is_some()).count()
    }

    pub fn canonical_link_count(&self) -> usize {
        self.links
            .iter()
            .filter(|l| l.style == LinkStyle::Canonical)
            .count()
    }
}

/// Build a fresh scene for `tree`, which must come from `snapshot`
pub fn render(tree: &PositionedTree, snapshot: &Snapshot, ui: &UiState) -> Scene {
    let mut scene = Scene::empty(tree.viewport);
    scene.glyphs.reserve(tree.nodes.len());

    for (visit, placed) in snapshot.nodes().zip(&tree.nodes) {
        debug_assert_eq!(visit.id, placed.id);
        let node = visit.node;
        let center = placed.position();
        let width_units = node_width_units(node.slot);

        if let Some(parent) = placed.parent.and_then(|p| tree.get(p)) {
            scene.links.push(Link {
                parent: parent.id,
                child: placed.id,
                style: match node.path {
                    PathKind::Canonical => LinkStyle::Canonical,
                    PathKind::Other => LinkStyle::Default,
                },
                curve: Link::between(parent.position(), center),
            });
        }

        let label = (!ui.labels_hidden).then(|| Label {
            text: node.slot.to_string(),
            anchor: Point::new(
                center.x - width_units as f64 * EM_PX / 2.0,
                center.y + NODE_HEIGHT_EM * EM_PX / 4.0,
            ),
        });

        scene.glyphs.push(Glyph {
            id: placed.id,
            block_root: node.root.clone(),
            slot: node.slot,
            weight: node.weight,
            status: node.status,
            center,
            width_units,
            fill: Hsl::support(snapshot.support_fraction(node.weight)),
            class: GlyphClass {
                root: node.is_root(),
                internal: placed.has_children,
                status: node.status,
            },
            label,
        });
    }

    scene.restore_order();
    trace!(
        glyphs = scene.glyphs.len(),
        links = scene.links.len(),
        labels = scene.label_count(),
        "Scene built"
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::{layout, LayoutStyle};
    use crate::core::snapshot::{parse, tests::FORKED, tests::TWO_BLOCKS};

    fn draw(raw: &str, ui: &UiState) -> Scene {
        let snapshot = parse(raw).unwrap();
        let tree = layout(
            snapshot.proto_array.as_ref().unwrap(),
            ui.layout_style,
            Viewport::default(),
        );
        render(&tree, &snapshot, ui)
    }

    #[test]
    fn test_width_units() {
        assert_eq!(node_width_units(0), 1);
        assert_eq!(node_width_units(1), 1);
        assert_eq!(node_width_units(9), 1);
        assert_eq!(node_width_units(10), 1);
        assert_eq!(node_width_units(100), 2);
        assert_eq!(node_width_units(999), 2);
        assert_eq!(node_width_units(5_662_737), 6);
    }

    #[test]
    fn test_support_colors() {
        let scene = draw(TWO_BLOCKS, &UiState::default());
        assert!((scene.glyphs[0].fill.hue - 72.0).abs() < 1e-9);
        assert!((scene.glyphs[1].fill.hue - 48.0).abs() < 1e-9);
        assert_eq!(scene.glyphs[0].fill.css(), "hsl(72,60%,50%)");
        assert_eq!(scene.glyphs[1].status.label(), "Pending");
        assert_eq!(Hsl::support(0.0).to_rgb(), [204, 51, 51]);
        assert_eq!(Hsl::support(1.0).to_rgb(), [51, 204, 51]);
        assert_eq!(Hsl::support(0.5).to_rgb(), [204, 204, 51]);
    }

    #[test]
    fn test_one_link_per_non_root_node() {
        let scene = draw(FORKED, &UiState::default());
        assert_eq!(scene.glyphs.len(), 4);
        assert_eq!(scene.links.len(), 3);
        let scene = draw(TWO_BLOCKS, &UiState::default());
        assert_eq!(scene.links.len(), 1);
        assert_eq!(scene.canonical_link_count(), 0);
    }

    #[test]
    fn test_canonical_links_follow_child_path() {
        let scene = draw(FORKED, &UiState::default());
        let canonical: Vec<NodeId> = scene
            .links
            .iter()
            .filter(|l| l.style == LinkStyle::Canonical)
            .map(|l| l.child)
            .collect();
        // 0x02 and 0x04 are canonical children; 0x03 is a fork
        assert_eq!(canonical, vec![NodeId(1), NodeId(2)]);
        assert_eq!(scene.links[2].class(), "tree-link");
    }

    #[test]
    fn test_single_root_class() {
        let scene = draw(FORKED, &UiState::default());
        let roots: Vec<_> = scene.glyphs.iter().filter(|g| g.class.root).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].class.names()[2], "node-root");
        assert_eq!(
            scene.glyphs[3].class.names(),
            ["node", "node-leaf", "node-non-root", "node-pending"]
        );
        assert_eq!(scene.glyphs[1].class.names()[1], "node-internal");
    }

    #[test]
    fn test_labels_toggle_only_labels() {
        let mut ui = UiState::default();
        let with_labels = draw(FORKED, &ui);
        ui.labels_hidden = true;
        let without = draw(FORKED, &ui);

        assert_eq!(with_labels.label_count(), 4);
        assert_eq!(without.label_count(), 0);
        assert_eq!(with_labels.links, without.links);
        for (a, b) in with_labels.glyphs.iter().zip(&without.glyphs) {
            assert_eq!(a.rect(), b.rect());
            assert_eq!(a.fill, b.fill);
        }
        assert_eq!(with_labels.glyphs[0].label.as_ref().unwrap().text, "96");
    }

    #[test]
    fn test_style_switch_keeps_elements() {
        let mut ui = UiState::default();
        let tree = draw(FORKED, &ui);
        ui.layout_style = LayoutStyle::Cluster;
        let cluster = draw(FORKED, &ui);
        ui.layout_style = LayoutStyle::Tree;
        let back = draw(FORKED, &ui);

        assert_eq!(tree.glyphs.len(), cluster.glyphs.len());
        assert_eq!(tree.links.len(), cluster.links.len());
        let labels = |s: &Scene| -> Vec<String> {
            s.glyphs.iter().filter_map(|g| g.label.clone()).map(|l| l.text).collect()
        };
        assert_eq!(labels(&tree), labels(&cluster));
        assert_eq!(tree, back);
    }

    #[test]
    fn test_render_is_idempotent() {
        assert_eq!(draw(FORKED, &UiState::default()), draw(FORKED, &UiState::default()));
    }

    #[test]
    fn test_raise_and_hit_test() {
        let mut scene = draw(TWO_BLOCKS, &UiState::default());
        assert_eq!(scene.topmost(), Some(NodeId(1)));
        scene.raise(NodeId(0));
        assert_eq!(scene.topmost(), Some(NodeId(0)));
        assert_eq!(scene.painted().count(), 2);
        scene.restore_order();
        assert_eq!(scene.topmost(), Some(NodeId(1)));

        let center = scene.glyphs[1].center;
        assert_eq!(scene.hit_test(center), Some(NodeId(1)));
        assert_eq!(scene.hit_test(Point::new(-100.0, -100.0)), None);
        assert_eq!(scene.find("0xbb"), Some(NodeId(1)));
    }
}
