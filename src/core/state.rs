//! User-held view state that outlives every snapshot and redraw

use super::layout::{LayoutStyle, Point};

/// Zoom limits for the view transform
pub const SCALE_EXTENT: (f64, f64) = (0.1, 4.0);

/// Stable reference to a block across snapshots (its root hash)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef(pub String);

/// Pan/zoom transform applied to the whole scene: `screen = scene * k + t`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub tx: f64,
    pub ty: f64,
    pub k: f64,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        tx: 0.0,
        ty: 0.0,
        k: 1.0,
    };

    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.tx, p.y * self.k + self.ty)
    }

    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.tx) / self.k, (p.y - self.ty) / self.k)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.tx += dx;
        self.ty += dy;
    }

    /// Scale by `factor` keeping the screen point `focus` fixed
    pub fn zoom_at(&mut self, focus: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let k = (self.k * factor).clamp(SCALE_EXTENT.0, SCALE_EXTENT.1);
        let anchor = self.invert(focus);
        self.k = k;
        self.tx = focus.x - anchor.x * k;
        self.ty = focus.y - anchor.y * k;
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Settings the operator controls; never touched by a refresh
#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    pub layout_style: LayoutStyle,
    pub labels_hidden: bool,
    pub pinned: Option<NodeRef>,
    pub view_transform: ViewTransform,
    pub auto_refresh: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            layout_style: LayoutStyle::Tree,
            labels_hidden: false,
            pinned: None,
            view_transform: ViewTransform::IDENTITY,
            auto_refresh: true,
        }
    }
}
