//! Fork-choice snapshot model and parser
//!
//! Parses the `/data` document produced by the fork-choice backend into a
//! typed, immutable [`Snapshot`]. Numeric fields are accepted both as JSON
//! numbers and as decimal strings, because beacon-API payloads quote their
//! integers.

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Slots per epoch on the beacon chain
pub const SLOTS_PER_EPOCH: u64 = 32;

/// Backend sentinel: genesis has not happened yet
const SLOT_PRE_GENESIS: i64 = -1;
/// Backend sentinel: head moved while the backend was collecting data
const SLOT_HEAD_UNSTABLE: i64 = -2;

/// Epoch containing `slot`
pub fn epoch_of(slot: u64) -> u64 {
    slot / SLOTS_PER_EPOCH
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("total balance must be positive for a non-empty tree, got {0}")]
    NonPositiveBalance(f64),

    #[error("tree root has index {0}, expected 0")]
    RootIndex(u64),

    #[error("block {0} carries index 0 but is not the tree root")]
    DuplicateRoot(String),

    #[error("block {1:?} is missing `{0}`")]
    MissingField(&'static str, String),
}

/// Finality classification of a block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Status {
    Final,
    Justified,
    #[default]
    Pending,
}

impl Status {
    /// Human label shown in tooltips and the detail panel
    pub fn label(self) -> &'static str {
        match self {
            Status::Final => "Final",
            Status::Justified => "Best Just.",
            Status::Pending => "Pending",
        }
    }

    /// Returns the status and whether the wire value was a known one.
    fn from_wire(raw: &str) -> (Self, bool) {
        match raw {
            "final" => (Status::Final, true),
            "justified" => (Status::Justified, true),
            "pending" => (Status::Pending, true),
            _ => (Status::Pending, false),
        }
    }
}

/// Whether a block sits on the path to the current head
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PathKind {
    Canonical,
    #[default]
    Other,
}

impl PathKind {
    fn from_wire(raw: &str) -> (Self, bool) {
        match raw {
            "canonical" => (PathKind::Canonical, true),
            "noncanonical" | "other" => (PathKind::Other, true),
            _ => (PathKind::Other, false),
        }
    }
}

/// Preorder position of a node within one snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A block in the fork-choice tree
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub root: String,
    pub slot: u64,
    /// Cumulative supporting stake (ETH)
    pub weight: f64,
    pub status: Status,
    pub path: PathKind,
    pub index: u64,
    /// Children in wire order; never re-sorted
    pub children: Vec<Node>,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.index == 0
    }

    /// Depth-first preorder walk, children visited in wire order
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: vec![(self, None, 0)],
            next_id: 0,
        }
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        self.preorder().count()
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// One step of a preorder walk
#[derive(Clone, Copy, Debug)]
pub struct Visit<'a> {
    pub node: &'a Node,
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
}

pub struct Preorder<'a> {
    stack: Vec<(&'a Node, Option<NodeId>, usize)>,
    next_id: usize,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, parent, depth) = self.stack.pop()?;
        let id = NodeId(self.next_id);
        self.next_id += 1;
        for child in node.children.iter().rev() {
            self.stack.push((child, Some(id), depth + 1));
        }
        Some(Visit {
            node,
            id,
            parent,
            depth,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Head {
    pub root: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Checkpoint {
    #[serde(deserialize_with = "lenient::u64")]
    pub epoch: u64,
    pub root: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FinalityCheckpoints {
    pub finalized: Checkpoint,
    pub current_justified: Checkpoint,
}

/// One immutable fetched view of the fork-choice tree
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// `None` for the empty snapshot
    pub proto_array: Option<Node>,
    /// Total active stake (ETH), denominator for support
    pub total_balance: f64,
    /// Negative values are backend sentinels, see [`ChainPhase`]
    pub current_slot: i64,
    pub current_head: Option<Head>,
    pub finality_checkpoints: Option<FinalityCheckpoints>,
}

impl Snapshot {
    /// Snapshot substituted for failed or malformed fetches
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.proto_array.is_none()
    }

    pub fn node_count(&self) -> usize {
        self.proto_array.as_ref().map_or(0, Node::count)
    }

    /// Preorder walk over the tree (empty for the empty snapshot)
    pub fn nodes(&self) -> impl Iterator<Item = Visit<'_>> {
        self.proto_array.iter().flat_map(Node::preorder)
    }

    /// Fraction of total stake backing `weight`, 0 when there is no stake
    pub fn support_fraction(&self, weight: f64) -> f64 {
        if self.total_balance > 0.0 {
            weight / self.total_balance
        } else {
            0.0
        }
    }

    /// Support in percent, rounded to two decimals
    pub fn support_percent(&self, weight: f64) -> f64 {
        (self.support_fraction(weight) * 10_000.0).round() / 100.0
    }

    pub fn phase(&self) -> ChainPhase {
        match self.current_slot {
            SLOT_PRE_GENESIS => ChainPhase::PreGenesis,
            SLOT_HEAD_UNSTABLE => ChainPhase::HeadUnstable,
            slot if slot < 0 => ChainPhase::HeadUnstable,
            slot => ChainPhase::Live(slot as u64),
        }
    }

    pub fn summary(&self) -> Summary {
        let current_slot = match self.phase() {
            ChainPhase::Live(slot) => Some(slot),
            _ => None,
        };
        let checkpoints = self.finality_checkpoints.as_ref();
        Summary {
            phase: self.phase(),
            current_slot,
            current_epoch: current_slot.map(epoch_of),
            finalized: checkpoints.map(|c| c.finalized.clone()),
            justified: checkpoints.map(|c| c.current_justified.clone()),
            head_root: self.current_head.as_ref().map(|h| h.root.clone()),
        }
    }
}

/// Chain phase as reported through the `current_slot` sentinels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainPhase {
    PreGenesis,
    HeadUnstable,
    Live(u64),
}

/// Read-only summary fields shown above the tree
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub phase: ChainPhase,
    pub current_slot: Option<u64>,
    pub current_epoch: Option<u64>,
    pub finalized: Option<Checkpoint>,
    pub justified: Option<Checkpoint>,
    pub head_root: Option<String>,
}

impl Summary {
    /// Summary lines in display order
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(6);
        match self.phase {
            ChainPhase::PreGenesis => lines.push("Genesis has not happened yet".to_string()),
            ChainPhase::HeadUnstable => {
                lines.push("Head changed while collecting data".to_string())
            }
            ChainPhase::Live(slot) => {
                lines.push(format!("Current Slot: {}", slot));
                lines.push(format!("Current Epoch: {}", epoch_of(slot)));
            }
        }
        if let Some(cp) = &self.finalized {
            lines.push(format!("Finalized Epoch: {} ({})", cp.epoch, cp.root));
        }
        if let Some(cp) = &self.justified {
            lines.push(format!("Justified Epoch: {} ({})", cp.epoch, cp.root));
        }
        if let Some(root) = &self.head_root {
            lines.push(format!("Head: {}", root));
        }
        lines
    }
}

#[derive(Deserialize)]
struct WireSnapshot {
    /// `{}` arrives as a node with every field missing
    #[serde(default)]
    proto_array: Option<WireNode>,
    #[serde(default, deserialize_with = "lenient::f64")]
    total_balance: f64,
    #[serde(default, deserialize_with = "lenient::i64")]
    current_slot: i64,
    #[serde(default)]
    current_head: Option<Head>,
    #[serde(default)]
    finality_checkpoints: Option<FinalityCheckpoints>,
}

#[derive(Deserialize)]
struct WireNode {
    #[serde(default)]
    root: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    slot: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    weight: Option<f64>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    path: String,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    index: Option<u64>,
    #[serde(default)]
    children: Vec<WireNode>,
}

impl WireNode {
    fn is_blank(&self) -> bool {
        self.root.is_none()
            && self.slot.is_none()
            && self.weight.is_none()
            && self.index.is_none()
            && self.status.is_empty()
            && self.path.is_empty()
            && self.children.is_empty()
    }
}

impl Drop for WireNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Wire labels that fell outside the known vocabulary
#[derive(Default)]
struct UnknownLabels {
    statuses: Vec<String>,
    paths: Vec<String>,
}

impl UnknownLabels {
    fn note(list: &mut Vec<String>, raw: &str) {
        if !list.iter().any(|seen| seen == raw) {
            list.push(raw.to_string());
        }
    }
}

/// Convert one block, leaving its children in place
fn convert_block(wire: &mut WireNode, unknown: &mut UnknownLabels) -> Result<Node, ParseError> {
    let root = wire
        .root
        .take()
        .ok_or_else(|| ParseError::MissingField("root", String::new()))?;
    let missing = |field| ParseError::MissingField(field, root.clone());
    let slot = wire.slot.ok_or_else(|| missing("slot"))?;
    let weight = wire.weight.ok_or_else(|| missing("weight"))?;
    let index = wire.index.ok_or_else(|| missing("index"))?;

    let (status, known) = Status::from_wire(&wire.status);
    if !known {
        UnknownLabels::note(&mut unknown.statuses, &wire.status);
    }
    let (path, known) = PathKind::from_wire(&wire.path);
    if !known {
        UnknownLabels::note(&mut unknown.paths, &wire.path);
    }
    Ok(Node {
        root,
        slot,
        weight,
        status,
        path,
        index,
        children: Vec::with_capacity(wire.children.len()),
    })
}

/// Build the node tree without recursing once per level
fn convert(wire: WireNode, unknown: &mut UnknownLabels) -> Result<Node, ParseError> {
    // Preorder list of blocks paired with their parent's position
    let mut flat: Vec<(Node, Option<usize>)> = Vec::new();
    let mut pending = vec![(wire, None)];
    while let Some((mut wire, parent)) = pending.pop() {
        let node = convert_block(&mut wire, unknown)?;
        let at = flat.len();
        flat.push((node, parent));
        let children = std::mem::take(&mut wire.children);
        pending.extend(children.into_iter().rev().map(|child| (child, Some(at))));
    }

    // Descendants sit after their ancestors, so popping completes every
    // child list before its owner is attached to the parent.
    while let Some((mut node, parent)) = flat.pop() {
        node.children.reverse();
        match parent {
            Some(p) => flat[p].0.children.push(node),
            None => return Ok(node),
        }
    }
    Err(ParseError::MissingField("root", String::new()))
}

fn validate(snapshot: &Snapshot) -> Result<(), ParseError> {
    let Some(root) = &snapshot.proto_array else {
        return Ok(());
    };
    if !(snapshot.total_balance > 0.0) {
        return Err(ParseError::NonPositiveBalance(snapshot.total_balance));
    }
    if root.index != 0 {
        return Err(ParseError::RootIndex(root.index));
    }
    if let Some(visit) = root.preorder().skip(1).find(|v| v.node.index == 0) {
        return Err(ParseError::DuplicateRoot(visit.node.root.clone()));
    }
    Ok(())
}

/// Parse a `/data` response body
pub fn parse(raw: &str) -> Result<Snapshot, ParseError> {
    trace!(len = raw.len(), "Parsing snapshot");

    let mut de = serde_json::Deserializer::from_str(raw);
    // Fork-choice trees nest two JSON levels per block and routinely exceed
    // serde_json's default depth during periods of non-finality. The stacker
    // moves deep nesting onto heap-allocated stack segments.
    de.disable_recursion_limit();
    let wire = WireSnapshot::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;

    let mut unknown = UnknownLabels::default();
    let proto_array = match wire.proto_array {
        Some(node) if !node.is_blank() => Some(convert(node, &mut unknown)?),
        _ => None,
    };

    if !unknown.statuses.is_empty() || !unknown.paths.is_empty() {
        warn!(
            statuses = ?unknown.statuses,
            paths = ?unknown.paths,
            "Unknown node labels, displaying as Pending/non-canonical"
        );
    }

    let snapshot = Snapshot {
        proto_array,
        total_balance: wire.total_balance,
        current_slot: wire.current_slot,
        current_head: wire.current_head,
        finality_checkpoints: wire.finality_checkpoints,
    };
    validate(&snapshot)?;

    debug!(
        nodes = snapshot.node_count(),
        current_slot = snapshot.current_slot,
        total_balance = snapshot.total_balance,
        "Snapshot parsed"
    );
    Ok(snapshot)
}

/// Deserializers accepting JSON numbers or numeric strings
mod lenient {
    use super::{Deserialize, Deserializer};
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numeric {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Text(String),
    }

    pub fn u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        match Numeric::deserialize(d)? {
            Numeric::Unsigned(v) => Ok(v),
            Numeric::Signed(v) => Err(D::Error::custom(format!("expected unsigned, got {}", v))),
            Numeric::Float(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => {
                Ok(v as u64)
            }
            Numeric::Float(v) => Err(D::Error::custom(format!("expected integer, got {}", v))),
            Numeric::Text(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }

    pub fn i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match Numeric::deserialize(d)? {
            Numeric::Unsigned(v) => i64::try_from(v).map_err(D::Error::custom),
            Numeric::Signed(v) => Ok(v),
            Numeric::Float(v) if v.fract() == 0.0 && v.abs() <= i64::MAX as f64 => Ok(v as i64),
            Numeric::Float(v) => Err(D::Error::custom(format!("expected integer, got {}", v))),
            Numeric::Text(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        u64(d).map(Some)
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        f64(d).map(Some)
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Numeric::deserialize(d)? {
            Numeric::Unsigned(v) => Ok(v as f64),
            Numeric::Signed(v) => Ok(v as f64),
            Numeric::Float(v) => Ok(v),
            Numeric::Text(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two-block snapshot: finalized canonical root with one pending fork
    pub(crate) const TWO_BLOCKS: &str = r#"{
        "proto_array": {
            "root": "0xaa", "slot": 100, "weight": 60, "status": "final",
            "path": "canonical", "index": 0,
            "children": [
                {"root": "0xbb", "slot": 132, "weight": 40, "status": "pending",
                 "path": "other", "index": 1, "children": []}
            ]
        },
        "total_balance": 100,
        "current_slot": 140,
        "current_head": {"root": "0xaa"},
        "finality_checkpoints": {
            "finalized": {"epoch": 3, "root": "0xaa"},
            "current_justified": {"epoch": 4, "root": "0xaa"}
        }
    }"#;

    /// Root with a canonical chain of two blocks and a short fork
    pub(crate) const FORKED: &str = r#"{
        "proto_array": {
            "root": "0x01", "slot": "96", "weight": "90.5", "status": "final",
            "path": "canonical", "index": "0",
            "children": [
                {"root": "0x02", "slot": "97", "weight": "60", "status": "justified",
                 "path": "canonical", "index": "1",
                 "children": [
                    {"root": "0x04", "slot": "99", "weight": "60", "status": "pending",
                     "path": "canonical", "index": "3", "children": []}
                 ]},
                {"root": "0x03", "slot": "98", "weight": "30.5", "status": "pending",
                 "path": "noncanonical", "index": "2", "children": []}
            ]
        },
        "total_balance": 100.0,
        "current_slot": 99,
        "current_head": {"root": "0x04", "canonical": true},
        "finality_checkpoints": {
            "finalized": {"epoch": "3", "root": "0x01"},
            "current_justified": {"epoch": "3", "root": "0x01"}
        }
    }"#;

    #[test]
    fn test_parse_two_blocks() {
        let snapshot = parse(TWO_BLOCKS).unwrap();
        let root = snapshot.proto_array.as_ref().unwrap();
        assert_eq!(root.slot, 100);
        assert_eq!(root.status, Status::Final);
        assert_eq!(root.path, PathKind::Canonical);
        assert!(root.is_root());
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].status.label(), "Pending");
        assert_eq!(snapshot.node_count(), 2);
        assert_eq!(snapshot.total_balance, 100.0);
    }

    #[test]
    fn test_parse_quoted_numbers() {
        let snapshot = parse(FORKED).unwrap();
        let root = snapshot.proto_array.as_ref().unwrap();
        assert_eq!(root.slot, 96);
        assert_eq!(root.weight, 90.5);
        assert_eq!(root.children[1].path, PathKind::Other);
        let checkpoints = snapshot.finality_checkpoints.as_ref().unwrap();
        assert_eq!(checkpoints.finalized.epoch, 3);
        assert_eq!(snapshot.current_head.as_ref().unwrap().root, "0x04");
    }

    #[test]
    fn test_parse_empty_tree() {
        let snapshot = parse(r#"{"proto_array": {}, "total_balance": 0}"#).unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.node_count(), 0);
        assert_eq!(snapshot.nodes().count(), 0);
    }

    #[test]
    fn test_parse_pre_genesis_sentinel() {
        let raw = r#"{"current_slot": -1, "proto_array": {}, "total_balance": 0,
                      "current_head": null, "finality_checkpoints": null}"#;
        let snapshot = parse(raw).unwrap();
        assert_eq!(snapshot.phase(), ChainPhase::PreGenesis);
        let summary = snapshot.summary();
        assert_eq!(summary.current_epoch, None);
        assert_eq!(summary.lines(), vec!["Genesis has not happened yet".to_string()]);
    }

    #[test]
    fn test_unknown_labels_fall_back() {
        let raw = r#"{"proto_array": {"root": "0x01", "slot": 5, "weight": 1,
                      "status": "orphaned", "path": "sideways", "index": 0},
                      "total_balance": 2}"#;
        let root = parse(raw).unwrap().proto_array.unwrap();
        assert_eq!(root.status, Status::Pending);
        assert_eq!(root.path, PathKind::Other);
    }

    #[test]
    fn test_reject_malformed_json() {
        assert!(matches!(parse("{not json"), Err(ParseError::Json(_))));
        assert!(matches!(parse(r#"{"proto_array": 7}"#), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_reject_zero_balance_with_tree() {
        let raw = r#"{"proto_array": {"root": "0x01", "slot": 5, "weight": 0,
                      "status": "final", "path": "canonical", "index": 0},
                      "total_balance": 0}"#;
        assert!(matches!(parse(raw), Err(ParseError::NonPositiveBalance(_))));
    }

    #[test]
    fn test_reject_second_root_index() {
        let raw = r#"{"proto_array": {"root": "0x01", "slot": 5, "weight": 1,
                      "status": "final", "path": "canonical", "index": 0,
                      "children": [{"root": "0x02", "slot": 6, "weight": 1,
                                    "status": "pending", "path": "canonical", "index": 0}]},
                      "total_balance": 2}"#;
        match parse(raw) {
            Err(ParseError::DuplicateRoot(root)) => assert_eq!(root, "0x02"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_preorder_follows_wire_order() {
        let snapshot = parse(FORKED).unwrap();
        let visits: Vec<_> = snapshot
            .nodes()
            .map(|v| (v.node.root.as_str(), v.parent, v.depth))
            .collect();
        assert_eq!(
            visits,
            vec![
                ("0x01", None, 0),
                ("0x02", Some(NodeId(0)), 1),
                ("0x04", Some(NodeId(1)), 2),
                ("0x03", Some(NodeId(0)), 1),
            ]
        );
    }

    #[test]
    fn test_support_percent_rounds_to_two_decimals() {
        let mut snapshot = parse(TWO_BLOCKS).unwrap();
        assert_eq!(snapshot.support_percent(60.0), 60.0);
        snapshot.total_balance = 3.0;
        assert_eq!(snapshot.support_percent(1.0), 33.33);
        assert_eq!(Snapshot::empty().support_percent(5.0), 0.0);
    }

    fn linear_chain(depth: usize) -> String {
        let mut doc = String::with_capacity(depth * 120);
        doc.push_str(r#"{"total_balance": 10, "proto_array": "#);
        for i in 0..depth {
            doc.push_str(&format!(
                concat!(
                    r#"{{"root":"0x{:x}","slot":{},"weight":1,"status":"pending","#,
                    r#""path":"canonical","index":{},"children":["#
                ),
                i,
                i + 1,
                i
            ));
        }
        doc.push_str(&"]}".repeat(depth));
        doc.push('}');
        doc
    }

    #[test]
    fn test_deep_chain_parses() {
        let snapshot = parse(&linear_chain(200)).unwrap();
        assert_eq!(snapshot.node_count(), 200);
    }

    #[test]
    fn test_long_non_finality_chain_on_small_stack() {
        // 64k blocks on a 1 MiB thread, well below the UI thread's stack
        let depth = 65_536;
        let doc = linear_chain(depth);
        let handle = std::thread::Builder::new()
            .stack_size(1 << 20)
            .spawn(move || {
                let snapshot = parse(&doc).unwrap();
                let deepest = snapshot.nodes().last().unwrap();
                (snapshot.node_count(), deepest.depth, deepest.node.slot)
            })
            .unwrap();
        assert_eq!(handle.join().unwrap(), (depth, depth - 1, depth as u64));
    }

    #[test]
    fn test_reject_block_missing_slot() {
        let raw = r#"{"proto_array": {"root": "0x01", "slot": 5, "weight": 1,
                      "status": "final", "path": "canonical", "index": 0,
                      "children": [{"root": "0x02", "weight": 1,
                                    "status": "pending", "path": "canonical", "index": 1}]},
                      "total_balance": 2}"#;
        match parse(raw) {
            Err(ParseError::MissingField(field, root)) => {
                assert_eq!(field, "slot");
                assert_eq!(root, "0x02");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_null_tree_is_empty() {
        let snapshot = parse(r#"{"proto_array": null, "total_balance": 0}"#).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_summary_lines() {
        let summary = parse(TWO_BLOCKS).unwrap().summary();
        assert_eq!(summary.current_slot, Some(140));
        assert_eq!(summary.current_epoch, Some(4));
        assert_eq!(
            summary.lines(),
            vec![
                "Current Slot: 140".to_string(),
                "Current Epoch: 4".to_string(),
                "Finalized Epoch: 3 (0xaa)".to_string(),
                "Justified Epoch: 4 (0xaa)".to_string(),
                "Head: 0xaa".to_string(),
            ]
        );
    }
}
