//! Platform-agnostic core - shared between the dashboard (native/WASM) and CLI

pub mod interaction;
pub mod layout;
pub mod refresh;
pub mod scene;
pub mod session;
pub mod snapshot;
pub mod state;
mod svg;

pub use interaction::{DetailPanel, InteractionController, NodeDetails, NodeEvent, Tooltip};
pub use layout::{layout, LayoutStyle, Point, PositionedTree, Rect, Viewport};
pub use refresh::{
    Completion, FetchError, FetchTicket, RefreshController, RefreshState, SnapshotSource,
    DEFAULT_REFRESH_INTERVAL,
};
pub use scene::{render, Glyph, Hsl, Link, LinkStyle, Scene};
pub use session::Session;
pub use snapshot::{parse, ChainPhase, Node, NodeId, ParseError, Snapshot, Status, Summary};
pub use state::{NodeRef, UiState, ViewTransform, SCALE_EXTENT};
