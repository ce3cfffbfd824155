//! Application session: owns every piece of state the components act on
//!
//! All calls are synchronous and made from the UI thread. Network I/O is
//! delegated to a [`SnapshotSource`] passed in by the caller.

use super::interaction::InteractionController;
use super::layout::{layout, LayoutStyle, Point, Viewport};
use super::refresh::{RefreshController, RefreshState, SnapshotSource};
use super::scene::{render, Scene};
use super::snapshot::{Snapshot, Summary};
use super::state::UiState;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Session {
    ui: UiState,
    snapshot: Snapshot,
    scene: Scene,
    viewport: Viewport,
    interaction: InteractionController,
    refresh: RefreshController,
    /// Number of snapshots applied so far
    applied: u64,
}

impl Session {
    /// Session with auto-refresh enabled; polling starts on the first tick
    pub fn new(interval: Duration, viewport: Viewport) -> Self {
        Self {
            ui: UiState::default(),
            snapshot: Snapshot::empty(),
            scene: Scene::empty(viewport),
            viewport,
            interaction: InteractionController::new(),
            refresh: RefreshController::new(interval),
            applied: 0,
        }
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn summary(&self) -> Summary {
        self.snapshot.summary()
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.refresh.state()
    }

    /// Clock time of the next scheduled fetch while running
    pub fn next_fetch_due(&self) -> Option<f64> {
        self.refresh.schedule().map(|s| s.next_due())
    }

    pub fn applied_count(&self) -> u64 {
        self.applied
    }

    /// Drive the refresh schedule and apply finished fetches
    ///
    /// Returns true when a new snapshot was applied.
    pub fn tick(&mut self, now: f64, source: &mut dyn SnapshotSource) -> bool {
        if self.ui.auto_refresh && self.refresh.state() == RefreshState::Paused {
            if let Some(ticket) = self.refresh.start(now) {
                source.request(ticket);
            }
        }
        if let Some(ticket) = self.refresh.poll(now) {
            debug!(seq = ticket.seq, "Scheduled fetch");
            source.request(ticket);
        }

        let mut changed = false;
        for completion in source.drain() {
            if let Some(snapshot) = self.refresh.accept(completion) {
                self.apply(snapshot);
                changed = true;
            }
        }
        changed
    }

    /// Replace the stored snapshot and rebuild the scene
    pub fn apply(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.applied += 1;
        self.redraw();
        debug!(
            nodes = self.scene.glyphs.len(),
            links = self.scene.links.len(),
            "Snapshot applied"
        );
    }

    /// Layout → render → interaction from the stored snapshot
    pub fn redraw(&mut self) {
        self.scene = match &self.snapshot.proto_array {
            Some(root) => {
                let tree = layout(root, self.ui.layout_style, self.viewport);
                render(&tree, &self.snapshot, &self.ui)
            }
            None => Scene::empty(self.viewport),
        };
        self.interaction
            .attach(&mut self.scene, &self.snapshot, &self.ui);
    }

    pub fn set_layout_style(&mut self, style: LayoutStyle) {
        if self.ui.layout_style != style {
            self.ui.layout_style = style;
            self.redraw();
        }
    }

    pub fn toggle_labels(&mut self) {
        self.ui.labels_hidden = !self.ui.labels_hidden;
        self.redraw();
    }

    /// Re-render the stored snapshot at a new size; never fetches
    pub fn resize(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.redraw();
        }
    }

    pub fn toggle_auto_refresh(&mut self, now: f64, source: &mut dyn SnapshotSource) {
        self.ui.auto_refresh = !self.ui.auto_refresh;
        if self.ui.auto_refresh {
            if let Some(ticket) = self.refresh.start(now) {
                source.request(ticket);
            }
        } else {
            self.refresh.pause();
        }
        info!(enabled = self.ui.auto_refresh, "Auto-refresh toggled");
    }

    pub fn reset_view(&mut self) {
        self.ui.view_transform.reset();
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.ui.view_transform.pan(dx, dy);
    }

    pub fn zoom_at(&mut self, focus: Point, factor: f64) {
        self.ui.view_transform.zoom_at(focus, factor);
    }

    /// Pointer position in screen space, `None` once it left the surface
    pub fn pointer_moved(&mut self, screen: Option<Point>) {
        let scene_pos = screen.map(|p| self.ui.view_transform.invert(p));
        self.interaction.track_pointer(
            scene_pos,
            screen.unwrap_or_default(),
            &mut self.scene,
            &self.snapshot,
            &mut self.ui,
        );
    }

    pub fn click(&mut self, screen: Point) -> bool {
        let scene_pos = self.ui.view_transform.invert(screen);
        self.interaction
            .click(scene_pos, &mut self.scene, &self.snapshot, &mut self.ui)
            .is_some()
    }
}
