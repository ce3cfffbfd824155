//! Tree layout engine
//!
//! Positions every block of a snapshot on a (depth, sibling) grid scaled to
//! the viewport. Two algorithms are available:
//! - [`LayoutStyle::Tree`]: Reingold–Tilford tidy tree, Buchheim's linear-time
//!   formulation with Walker's apportioning
//! - [`LayoutStyle::Cluster`]: dendrogram with every leaf on the deepest rank
//!
//! Depth runs left to right, siblings top to bottom. Output is a pure
//! function of (tree shape, style, viewport).

use super::snapshot::{Node, NodeId};

/// Space reserved around the drawing, in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const MARGINS: Margins = Margins {
    top: 20.0,
    right: 90.0,
    bottom: 30.0,
    left: 90.0,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_center_size(center: Point, width: f64, height: f64) -> Self {
        Self {
            min: Point::new(center.x - width / 2.0, center.y - height / 2.0),
            max: Point::new(center.x + width / 2.0, center.y + height / 2.0),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Drawing surface size in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along the depth axis after margins
    fn depth_extent(&self) -> f64 {
        (self.width - MARGINS.left - MARGINS.right).max(0.0)
    }

    /// Extent along the sibling axis after margins
    fn sibling_extent(&self) -> f64 {
        (self.height - MARGINS.top - MARGINS.bottom).max(0.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Layout algorithm selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutStyle {
    #[default]
    Tree,
    Cluster,
}

impl LayoutStyle {
    pub const ALL: &'static [LayoutStyle] = &[LayoutStyle::Tree, LayoutStyle::Cluster];

    pub fn label(self) -> &'static str {
        match self {
            LayoutStyle::Tree => "Tree",
            LayoutStyle::Cluster => "Cluster",
        }
    }
}

/// A laid-out block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub has_children: bool,
    /// Offset along the depth axis inside the margins
    pub depth_pos: f64,
    /// Offset along the sibling axis inside the margins
    pub sibling_pos: f64,
}

impl PlacedNode {
    /// Position in scene coordinates (margins applied)
    pub fn position(&self) -> Point {
        Point::new(MARGINS.left + self.depth_pos, MARGINS.top + self.sibling_pos)
    }
}

/// Layout result, nodes in preorder so that `nodes[i].id == NodeId(i)`
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedTree {
    pub style: LayoutStyle,
    pub viewport: Viewport,
    pub nodes: Vec<PlacedNode>,
}

impl PositionedTree {
    pub fn get(&self, id: NodeId) -> Option<&PlacedNode> {
        self.nodes.get(id.0)
    }

    /// Parent/child pairs, one per non-root node
    pub fn edges(&self) -> impl Iterator<Item = (&PlacedNode, &PlacedNode)> {
        self.nodes
            .iter()
            .filter_map(|child| Some((self.get(child.parent?)?, child)))
    }
}

/// Lay out `root` with `style`, scaled into `viewport` minus [`MARGINS`]
pub fn layout(root: &Node, style: LayoutStyle, viewport: Viewport) -> PositionedTree {
    let mut arena = Arena::build(root);
    let (sibling, depth) = match style {
        LayoutStyle::Tree => arena.tidy(viewport),
        LayoutStyle::Cluster => arena.cluster(viewport),
    };

    let nodes = (0..arena.len())
        .map(|v| PlacedNode {
            id: NodeId(v),
            parent: arena.parent[v].map(NodeId),
            depth: arena.depth[v],
            has_children: !arena.children[v].is_empty(),
            depth_pos: depth[v],
            sibling_pos: sibling[v],
        })
        .collect();

    PositionedTree {
        style,
        viewport,
        nodes,
    }
}

/// Index-based copy of the tree shape plus the tidy-tree working fields.
/// Arena slots are in preorder, so slot 0 is the root.
struct Arena {
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// Position among siblings
    number: Vec<usize>,
    depth: Vec<usize>,
    postorder: Vec<usize>,

    prelim: Vec<f64>,
    modifier: Vec<f64>,
    change: Vec<f64>,
    shift: Vec<f64>,
    thread: Vec<Option<usize>>,
    ancestor: Vec<usize>,
    default_ancestor: Vec<Option<usize>>,
}

impl Arena {
    fn build(root: &Node) -> Self {
        let mut parent = Vec::new();
        let mut children: Vec<Vec<usize>> = Vec::new();
        let mut number = Vec::new();
        let mut depth = Vec::new();

        for visit in root.preorder() {
            let v = visit.id.0;
            let p = visit.parent.map(|p| p.0);
            let n = match p {
                Some(p) => {
                    children[p].push(v);
                    children[p].len() - 1
                }
                None => 0,
            };
            parent.push(p);
            children.push(Vec::with_capacity(visit.node.children.len()));
            number.push(n);
            depth.push(visit.depth);
        }

        let len = parent.len();
        let postorder = postorder(&children);
        Self {
            parent,
            children,
            number,
            depth,
            postorder,
            prelim: vec![0.0; len],
            modifier: vec![0.0; len],
            change: vec![0.0; len],
            shift: vec![0.0; len],
            thread: vec![None; len],
            ancestor: (0..len).collect(),
            default_ancestor: vec![None; len],
        }
    }

    fn len(&self) -> usize {
        self.parent.len()
    }

    /// Siblings sit one unit apart, cousins two
    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.parent[a] == self.parent[b] {
            1.0
        } else {
            2.0
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.children[v].first().copied().or(self.thread[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.children[v].last().copied().or(self.thread[v])
    }

    /// Returns (sibling axis, depth axis) positions scaled to the viewport
    fn tidy(&mut self, viewport: Viewport) -> (Vec<f64>, Vec<f64>) {
        for i in 0..self.postorder.len() {
            let v = self.postorder[i];
            self.first_walk(v);
        }

        // Second walk in preorder; the root's virtual parent carries -prelim.
        let mut x = vec![0.0; self.len()];
        for v in 0..self.len() {
            let parent_mod = match self.parent[v] {
                Some(p) => self.modifier[p],
                None => -self.prelim[v],
            };
            x[v] = self.prelim[v] + parent_mod;
            self.modifier[v] += parent_mod;
        }

        let (mut left, mut right, mut bottom) = (0, 0, 0);
        for v in 0..self.len() {
            if x[v] < x[left] {
                left = v;
            }
            if x[v] > x[right] {
                right = v;
            }
            if self.depth[v] > self.depth[bottom] {
                bottom = v;
            }
        }

        let s = if left == right {
            1.0
        } else {
            self.separation(left, right) / 2.0
        };
        let tx = s - x[left];
        let kx = viewport.sibling_extent() / (x[right] + s + tx);
        let ky = viewport.depth_extent() / self.depth[bottom].max(1) as f64;

        let sibling = x.iter().map(|x| (x + tx) * kx).collect();
        let depth = self.depth.iter().map(|&d| d as f64 * ky).collect();
        (sibling, depth)
    }

    fn first_walk(&mut self, v: usize) {
        let w = match self.parent[v] {
            Some(p) if self.number[v] > 0 => Some(self.children[p][self.number[v] - 1]),
            _ => None,
        };

        let ends = (self.children[v].first().copied(), self.children[v].last().copied());
        if let (Some(first), Some(last)) = ends {
            self.execute_shifts(v);
            let midpoint = (self.prelim[first] + self.prelim[last]) / 2.0;
            match w {
                Some(w) => {
                    self.prelim[v] = self.prelim[w] + self.separation(v, w);
                    self.modifier[v] = self.prelim[v] - midpoint;
                }
                None => self.prelim[v] = midpoint,
            }
        } else if let Some(w) = w {
            self.prelim[v] = self.prelim[w] + self.separation(v, w);
        }

        if let Some(p) = self.parent[v] {
            let default = self.default_ancestor[p].unwrap_or(self.children[p][0]);
            self.default_ancestor[p] = Some(self.apportion(v, w, default));
        }
    }

    /// Walks the facing contours of `v`'s subtree and its left siblings,
    /// shifting `v` right wherever they would overlap.
    fn apportion(&mut self, v: usize, w: Option<usize>, mut default: usize) -> usize {
        let (Some(w), Some(p)) = (w, self.parent[v]) else {
            return default;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.children[p][0];
        let mut sip = self.modifier[vip];
        let mut sop = self.modifier[vop];
        let mut sim = self.modifier[vim];
        let mut som = self.modifier[vom];

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            vim = im;
            vip = ip;
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.ancestor[vop] = v;

            let shift = self.prelim[vim] + sim - self.prelim[vip] - sip + self.separation(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, default);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.modifier[vim];
            sip += self.modifier[vip];
            som += self.modifier[vom];
            sop += self.modifier[vop];

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if next_im.is_some() && self.next_right(vop).is_none() {
            self.thread[vop] = next_im;
            self.modifier[vop] += sim - sop;
        }
        if next_ip.is_some() && self.next_left(vom).is_none() {
            self.thread[vom] = next_ip;
            self.modifier[vom] += sip - som;
            default = v;
        }
        default
    }

    fn next_ancestor(&self, vim: usize, v: usize, default: usize) -> usize {
        let a = self.ancestor[vim];
        if self.parent[a] == self.parent[v] {
            a
        } else {
            default
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = (self.number[wp] - self.number[wm]) as f64;
        let change = shift / subtrees;
        self.change[wp] -= change;
        self.shift[wp] += shift;
        self.change[wm] += change;
        self.prelim[wp] += shift;
        self.modifier[wp] += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.children[v].len()).rev() {
            let w = self.children[v][i];
            self.prelim[w] += shift;
            self.modifier[w] += shift;
            change += self.change[w];
            shift += self.shift[w] + change;
        }
    }

    /// Returns (sibling axis, depth axis) positions scaled to the viewport
    fn cluster(&self, viewport: Viewport) -> (Vec<f64>, Vec<f64>) {
        let mut x = vec![0.0; self.len()];
        // Height above the deepest leaf of the subtree
        let mut height = vec![0usize; self.len()];
        let mut previous_leaf: Option<usize> = None;
        let mut cursor = 0.0;

        for &v in &self.postorder {
            let kids = &self.children[v];
            if kids.is_empty() {
                if let Some(prev) = previous_leaf {
                    cursor += self.separation(v, prev);
                    x[v] = cursor;
                }
                previous_leaf = Some(v);
            } else {
                x[v] = kids.iter().map(|&c| x[c]).sum::<f64>() / kids.len() as f64;
                height[v] = 1 + kids.iter().map(|&c| height[c]).max().unwrap_or(0);
            }
        }

        let left = self.leaf_left(0);
        let right = self.leaf_right(0);
        let x0 = x[left] - self.separation(left, right) / 2.0;
        let x1 = x[right] + self.separation(right, left) / 2.0;
        let dx = viewport.sibling_extent();
        let dy = viewport.depth_extent();
        let root_height = height[0];

        let sibling = x.iter().map(|x| (x - x0) / (x1 - x0) * dx).collect();
        let depth = height
            .iter()
            .map(|&h| {
                let rank = if root_height > 0 {
                    h as f64 / root_height as f64
                } else {
                    1.0
                };
                (1.0 - rank) * dy
            })
            .collect();
        (sibling, depth)
    }

    fn leaf_left(&self, mut v: usize) -> usize {
        while let Some(&first) = self.children[v].first() {
            v = first;
        }
        v
    }

    fn leaf_right(&self, mut v: usize) -> usize {
        while let Some(&last) = self.children[v].last() {
            v = last;
        }
        v
    }
}

/// Children-first order with left siblings before right ones
fn postorder(children: &[Vec<usize>]) -> Vec<usize> {
    let mut order = Vec::with_capacity(children.len());
    if children.is_empty() {
        return order;
    }
    let mut stack = vec![0usize];
    while let Some(v) = stack.pop() {
        order.push(v);
        stack.extend(children[v].iter().copied());
    }
    order.reverse();
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::{PathKind, Status};

    fn block(slot: u64, children: Vec<Node>) -> Node {
        Node {
            root: format!("0x{:x}", slot),
            slot,
            weight: 1.0,
            status: Status::Pending,
            path: PathKind::Other,
            index: slot,
            children,
        }
    }

    fn viewport() -> Viewport {
        // 300 x 200 drawing area inside the margins
        Viewport::new(300.0 + 180.0, 200.0 + 50.0)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_node_is_centred() {
        let tree = layout(&block(0, vec![]), LayoutStyle::Tree, viewport());
        assert_eq!(tree.nodes.len(), 1);
        assert!(close(tree.nodes[0].sibling_pos, 100.0));
        assert!(close(tree.nodes[0].depth_pos, 0.0));
        assert_eq!(tree.nodes[0].position(), Point::new(90.0, 120.0));
    }

    #[test]
    fn parent_centred_over_two_children() {
        let root = block(0, vec![block(1, vec![]), block(2, vec![])]);
        let tree = layout(&root, LayoutStyle::Tree, viewport());
        let pos: Vec<f64> = tree.nodes.iter().map(|n| n.sibling_pos).collect();
        assert!(close(pos[0], 100.0));
        assert!(close(pos[1], 50.0));
        assert!(close(pos[2], 150.0));
        assert!(close(tree.nodes[1].depth_pos, 300.0));
    }

    #[test]
    fn cousins_get_double_separation() {
        // 0 -> [1 -> [3], 2 -> [4]]; preorder ids: 0, 1, 3, 2, 4
        let left = block(1, vec![block(3, vec![])]);
        let right = block(2, vec![block(4, vec![])]);
        let root = block(0, vec![left, right]);
        let tree = layout(&root, LayoutStyle::Tree, viewport());
        let x = |i: usize| tree.nodes[i].sibling_pos;
        let unit = 200.0 / 3.0;
        assert!(close(x(0), 100.0));
        assert!(close(x(1), unit / 2.0));
        assert!(close(x(2), x(1)));
        assert!(close(x(3), unit / 2.0 + 2.0 * unit));
        assert!(close(x(4), x(3)));
    }

    fn leaves(slots: &[u64]) -> Vec<Node> {
        slots.iter().map(|&slot| block(slot, vec![])).collect()
    }

    fn uneven_tree() -> Node {
        let wide = block(4, leaves(&[9, 10, 11]));
        let pair = block(6, leaves(&[7, 8]));
        block(
            0,
            vec![
                block(1, vec![wide]),
                block(2, vec![]),
                block(3, vec![block(5, vec![]), pair]),
            ],
        )
    }

    #[test]
    fn tree_layout_never_overlaps_within_a_rank() {
        let tree = layout(&uneven_tree(), LayoutStyle::Tree, viewport());
        let max_depth = tree.nodes.iter().map(|n| n.depth).max().unwrap();
        for depth in 0..=max_depth {
            // preorder within one rank is left-to-right order
            let rank: Vec<f64> = tree
                .nodes
                .iter()
                .filter(|n| n.depth == depth)
                .map(|n| n.sibling_pos)
                .collect();
            for pair in rank.windows(2) {
                assert!(pair[1] > pair[0], "depth {} overlaps: {:?}", depth, rank);
            }
        }
        for node in &tree.nodes {
            assert!(node.sibling_pos >= 0.0 && node.sibling_pos <= 200.0);
            assert!(close(node.depth_pos, node.depth as f64 * 100.0));
        }
    }

    #[test]
    fn cluster_puts_all_leaves_on_last_rank() {
        let tree = layout(&uneven_tree(), LayoutStyle::Cluster, viewport());
        for node in &tree.nodes {
            if node.has_children {
                assert!(node.depth_pos < 300.0);
            } else {
                assert!(close(node.depth_pos, 300.0), "leaf {:?}", node.id);
            }
        }
        assert!(close(tree.nodes[0].depth_pos, 0.0));
    }

    #[test]
    fn cluster_centres_parents_over_children() {
        let root = block(0, vec![block(1, vec![]), block(2, vec![]), block(3, vec![])]);
        let tree = layout(&root, LayoutStyle::Cluster, viewport());
        let x: Vec<f64> = tree.nodes.iter().map(|n| n.sibling_pos).collect();
        assert!(close(x[0], (x[1] + x[2] + x[3]) / 3.0));
        assert!(close(x[1], 200.0 / 6.0));
        assert!(close(x[3], 200.0 * 5.0 / 6.0));
    }

    #[test]
    fn layout_is_deterministic() {
        for &style in LayoutStyle::ALL {
            let a = layout(&uneven_tree(), style, viewport());
            let b = layout(&uneven_tree(), style, viewport());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn edges_cover_every_non_root_node() {
        let tree = layout(&uneven_tree(), LayoutStyle::Tree, viewport());
        assert_eq!(tree.edges().count(), tree.nodes.len() - 1);
        for (parent, child) in tree.edges() {
            assert_eq!(child.parent, Some(parent.id));
            assert_eq!(child.depth, parent.depth + 1);
        }
    }

    #[test]
    fn tiny_viewport_collapses_to_margins() {
        let tree = layout(&uneven_tree(), LayoutStyle::Tree, Viewport::new(10.0, 10.0));
        for node in &tree.nodes {
            assert_eq!(node.depth_pos, 0.0);
            assert_eq!(node.sibling_pos, 0.0);
        }
    }
}
