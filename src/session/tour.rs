//! Tour session: owns scroll, camera and timer state and is the only writer
//! of the published snapshot.
//!
//! Everything runs on one logical thread. The host feeds input events,
//! advances the millisecond clock so timers can fire, and calls
//! `render_tick` once per frame. Programmatic scrolls are queued as
//! `ScrollCommand`s for the host to apply.

use crate::algorithm::camera_path::{
    CameraMode, CameraPathInterpolator, CameraPose, CameraRig, CameraState,
};
use crate::algorithm::free_look::FreeLookController;
use crate::algorithm::loop_blend::{LoopTransitionBlender, TransitionState};
use crate::algorithm::loop_reset::{LoopReset, LoopResetPhase, LoopResetStep};
use crate::algorithm::scroll_tracker::{ScrollState, ScrollTracker, ScrollUpdate};
use crate::algorithm::snap::{SnapRequest, SnapScheduler};
use crate::models::config::{ScrollBehavior, TourConfig};
use crate::models::events::{
    EventDisposition, HostEvent, KeyAction, MoveDirection, ScrollCommand,
};
use crate::models::snapshot::{PublishedPose, TourSnapshot};
use crate::models::viewpoint::ViewpointTable;
use crate::models::TourError;
use crate::session::timers::{TimerQueue, TimerToken};
use crate::telemetry::publisher::{StatePublisher, SubscriberId};

/// Programmatic scrolls closer than this to the current offset are dropped.
const SCROLL_COMMAND_TOLERANCE_PX: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TourTimer {
    Snap(SnapRequest),
    LoopReset(LoopResetStep),
}

impl From<SnapRequest> for TourTimer {
    fn from(request: SnapRequest) -> Self {
        TourTimer::Snap(request)
    }
}

impl From<LoopResetStep> for TourTimer {
    fn from(step: LoopResetStep) -> Self {
        TourTimer::LoopReset(step)
    }
}

#[derive(Debug)]
pub struct TourSession {
    table: ViewpointTable,
    config: TourConfig,
    now_ms: u64,
    timers: TimerQueue<TourTimer>,
    scroll: ScrollTracker,
    snap: SnapScheduler,
    loop_reset: LoopReset,
    camera: CameraState,
    interpolator: CameraPathInterpolator,
    blender: LoopTransitionBlender,
    free_look: FreeLookController,
    publisher: StatePublisher,
    commands: Vec<ScrollCommand>,
    shut_down: bool,
}

impl TourSession {
    pub fn new(
        table: ViewpointTable,
        config: TourConfig,
        viewport_height: f64,
    ) -> Result<Self, TourError> {
        config.validate()?;

        let start = table.first();
        let camera = CameraState::new(start, &config.camera);
        let initial = TourSnapshot {
            current_section: 0,
            section_progress: 0.0,
            total_sections: table.len(),
            current_camera_position: PublishedPose::from_vectors(start.position, start.target),
        };

        log::info!(
            "tour_session: viewpoints={}, viewport_height={viewport_height}",
            table.len()
        );

        Ok(Self {
            scroll: ScrollTracker::new(table.len(), viewport_height, &config.scroll),
            snap: SnapScheduler::new(&config.scroll),
            loop_reset: LoopReset::new(&config.loop_reset),
            interpolator: CameraPathInterpolator::new(&config.camera),
            blender: LoopTransitionBlender::new(&config.camera),
            free_look: FreeLookController::new(&config.free_look, camera.pose()),
            publisher: StatePublisher::new(initial),
            camera,
            table,
            config,
            now_ms: 0,
            timers: TimerQueue::new(),
            commands: Vec::new(),
            shut_down: false,
        })
    }

    /// Showcase viewpoints with default tuning.
    pub fn with_defaults(viewport_height: f64) -> Result<Self, TourError> {
        Self::new(ViewpointTable::default(), TourConfig::default(), viewport_height)
    }

    // ─── Read access ─────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TourSnapshot {
        self.publisher.latest()
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriberId
    where
        F: FnMut(&TourSnapshot) + Send + 'static,
    {
        self.publisher.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.publisher.unsubscribe(id)
    }

    pub fn mode(&self) -> CameraMode {
        self.camera.mode
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn transition(&self) -> TransitionState {
        self.camera.transition
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn loop_phase(&self) -> LoopResetPhase {
        self.loop_reset.phase()
    }

    pub fn viewpoints(&self) -> &ViewpointTable {
        &self.table
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Earliest moment a pending timer wants to fire.
    pub fn next_timer_due_ms(&self) -> Option<u64> {
        self.timers.next_due_ms()
    }

    /// Takes the programmatic scrolls queued since the last call.
    pub fn drain_scroll_commands(&mut self) -> Vec<ScrollCommand> {
        std::mem::take(&mut self.commands)
    }

    // ─── Input ───────────────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: HostEvent) -> EventDisposition {
        match event {
            HostEvent::Scroll { offset_px } => self.on_scroll(offset_px),
            HostEvent::Wheel { delta_y } => self.on_wheel(delta_y),
            HostEvent::KeyDown { key } => self.on_key(&key),
            HostEvent::Resize { viewport_height } => self.on_resize(viewport_height),
            HostEvent::OrbitDrag { dx, dy } => self.on_orbit_drag(dx, dy),
            HostEvent::OrbitZoom { delta } => self.on_orbit_zoom(delta),
            HostEvent::JumpToSection { index } => self.jump_to_section(index),
        }
    }

    pub fn on_scroll(&mut self, offset_px: f64) -> EventDisposition {
        if self.scroll_input_blocked() {
            log::debug!("on_scroll: ignored offset={offset_px}, phase={:?}", self.loop_reset.phase());
            return EventDisposition::Ignored;
        }

        match self.scroll.on_scroll(offset_px) {
            ScrollUpdate::BoundaryReached => self.begin_loop_reset(),
            ScrollUpdate::Tracked {
                section_index,
                progress,
                direction,
            } => {
                let request = SnapRequest {
                    section_index,
                    progress,
                    direction,
                    raw_offset_px: self.scroll.raw_offset_px(),
                    viewport_height: self.scroll.viewport_height(),
                };
                self.snap.schedule(&mut self.timers, self.now_ms, request);
                self.publish();
            }
        }
        EventDisposition::PassThrough
    }

    pub fn on_wheel(&mut self, delta_y: f64) -> EventDisposition {
        if self.scroll_input_blocked() {
            return EventDisposition::Ignored;
        }
        if self.scroll.wheel_triggers_loop(delta_y) {
            log::debug!("on_wheel: forward wheel at end, delta_y={delta_y}");
            self.begin_loop_reset();
            return EventDisposition::Consumed;
        }
        EventDisposition::PassThrough
    }

    pub fn on_key(&mut self, key: &str) -> EventDisposition {
        match self.config.keys.resolve(key) {
            Some(KeyAction::ToggleFreeLook) => {
                self.toggle_free_look();
                EventDisposition::Consumed
            }
            Some(KeyAction::Move(direction)) => self.move_free_look(direction),
            Some(KeyAction::LogPose) => {
                self.log_pose();
                EventDisposition::Consumed
            }
            None => EventDisposition::Ignored,
        }
    }

    pub fn on_resize(&mut self, viewport_height: f64) -> EventDisposition {
        self.snap.cancel(&mut self.timers);
        self.scroll.set_viewport_height(viewport_height);
        if self.loop_reset.phase() == LoopResetPhase::CommittingEnd {
            // Offset is still at the end; keep the terminal pose until it resets.
            self.scroll.commit_end();
        }
        log::debug!(
            "on_resize: viewport_height={viewport_height}, section={}, progress={:.3}",
            self.scroll.section_index(),
            self.scroll.progress()
        );
        self.publish();
        EventDisposition::PassThrough
    }

    pub fn on_orbit_drag(&mut self, dx: f64, dy: f64) -> EventDisposition {
        if self.camera.mode != CameraMode::FreeLook {
            return EventDisposition::Ignored;
        }
        self.free_look.orbit(dx, dy);
        EventDisposition::Consumed
    }

    pub fn on_orbit_zoom(&mut self, delta: f64) -> EventDisposition {
        if self.camera.mode != CameraMode::FreeLook {
            return EventDisposition::Ignored;
        }
        self.free_look.zoom(delta);
        EventDisposition::Consumed
    }

    /// Queues a scroll to the start of section `index` (clamped).
    pub fn jump_to_section(&mut self, index: usize) -> EventDisposition {
        if self.loop_reset.is_guarding() {
            return EventDisposition::Ignored;
        }
        let index = index.min(self.table.last_index());
        let top = index as f64 * self.scroll.viewport_height();
        log::info!("jump_to_section: index={index}, top={top}");
        self.commands.push(ScrollCommand {
            top,
            behavior: self.config.scroll.scroll_behavior,
        });
        EventDisposition::Consumed
    }

    pub fn toggle_free_look(&mut self) -> CameraMode {
        match self.camera.mode {
            CameraMode::Automatic => {
                self.snap.cancel(&mut self.timers);
                self.blender.cancel(&mut self.camera);
                let pose = self.camera.pose();
                self.camera.snap_to(pose);
                self.free_look.engage(pose);
                self.camera.mode = CameraMode::FreeLook;
            }
            CameraMode::FreeLook => {
                self.camera.snap_to(self.free_look.pose());
                self.camera.mode = CameraMode::Automatic;
            }
        }
        log::info!("toggle_free_look: mode={:?}", self.camera.mode);
        self.camera.mode
    }

    // ─── Clock ───────────────────────────────────────────────────────────────

    /// Moves the session clock forward and fires every timer that came due,
    /// each at its own deadline. Returns the number of timers fired.
    pub fn advance_clock(&mut self, now_ms: u64) -> usize {
        if now_ms < self.now_ms {
            log::warn!("advance_clock: clock went backwards {} -> {now_ms}", self.now_ms);
            return 0;
        }

        let mut fired = 0;
        while let Some((token, due_ms, timer)) = self.timers.pop_next_due(now_ms) {
            self.now_ms = due_ms.max(self.now_ms);
            self.fire_timer(token, timer);
            fired += 1;
        }
        self.now_ms = now_ms;
        fired
    }

    // ─── Render ──────────────────────────────────────────────────────────────

    /// One render frame: runs the path for the current mode, drives `rig`,
    /// and publishes the resulting snapshot.
    pub fn render_tick<R: CameraRig + ?Sized>(&mut self, delta_seconds: f64, rig: &mut R) -> TourSnapshot {
        let dt = if delta_seconds.is_finite() && delta_seconds > 0.0 {
            delta_seconds
        } else {
            0.0
        };

        match self.camera.mode {
            CameraMode::Automatic => self.tick_automatic(dt),
            CameraMode::FreeLook => self.tick_free_look(),
        }

        rig.apply_pose(&self.camera.pose());
        self.publish()
    }

    fn tick_automatic(&mut self, dt: f64) {
        let section = self.scroll.section_index();
        let progress = self.scroll.progress();
        let blended = self.blender.tick(
            &mut self.camera,
            &self.interpolator,
            &self.table,
            section,
            progress,
            dt,
        );
        if !blended {
            self.interpolator
                .tick(&mut self.camera, &self.table, section, progress, dt);
        }
    }

    fn tick_free_look(&mut self) {
        self.camera.snap_to(self.free_look.pose());
    }

    // ─── Teardown ────────────────────────────────────────────────────────────

    /// Cancels every pending timer. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.snap.cancel(&mut self.timers);
        self.loop_reset.abort(&mut self.timers);
        self.blender.cancel(&mut self.camera);
        let leftover = self.timers.clear();
        self.commands.clear();
        self.shut_down = true;
        log::info!("tour_session: shut down, leftover_timers={leftover}");
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    fn scroll_input_blocked(&self) -> bool {
        self.shut_down || self.camera.mode == CameraMode::FreeLook || self.loop_reset.is_guarding()
    }

    fn begin_loop_reset(&mut self) {
        self.snap.cancel(&mut self.timers);
        if self.loop_reset.begin(&mut self.timers, self.now_ms) {
            self.scroll.commit_end();
            self.publish();
        }
    }

    fn fire_timer(&mut self, token: TimerToken, timer: TourTimer) {
        match timer {
            TourTimer::Snap(request) => {
                let Some(top) = self.snap.fire(token, &request, self.table.len()) else {
                    return;
                };
                if self.scroll_input_blocked() {
                    return;
                }
                if (top - self.scroll.raw_offset_px()).abs() < SCROLL_COMMAND_TOLERANCE_PX {
                    return;
                }
                log::info!("snap: scrolling to top={top}");
                self.commands.push(ScrollCommand {
                    top,
                    behavior: self.config.scroll.scroll_behavior,
                });
            }
            TourTimer::LoopReset(step) => {
                let applied = self
                    .loop_reset
                    .advance(&mut self.timers, self.now_ms, token, step);
                if applied == Some(LoopResetStep::ResetOffset) {
                    self.reset_offset();
                }
            }
        }
    }

    fn reset_offset(&mut self) {
        let pre_reset = self.camera.pose();
        self.scroll.reset_to_start();
        self.commands.push(ScrollCommand {
            top: 0.0,
            behavior: ScrollBehavior::Auto,
        });
        if self.camera.mode == CameraMode::Automatic {
            self.blender.arm(pre_reset);
        }
        self.publish();
    }

    fn move_free_look(&mut self, direction: MoveDirection) -> EventDisposition {
        if self.camera.mode != CameraMode::FreeLook {
            return EventDisposition::Ignored;
        }
        self.free_look.translate(direction);
        EventDisposition::Consumed
    }

    fn log_pose(&self) {
        let pose = current_published_pose(&self.camera.pose());
        match serde_json::to_string(&pose) {
            Ok(json) => log::info!("camera_pose: {json}"),
            Err(e) => log::warn!("camera_pose: failed to serialize pose: {e}"),
        }
    }

    fn publish(&mut self) -> TourSnapshot {
        let scroll = self.scroll.state();
        self.publisher.publish(TourSnapshot {
            current_section: scroll.section_index,
            section_progress: scroll.progress,
            total_sections: self.table.len(),
            current_camera_position: current_published_pose(&self.camera.pose()),
        })
    }
}

impl Drop for TourSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn current_published_pose(pose: &CameraPose) -> PublishedPose {
    PublishedPose::from_vectors(pose.position, pose.look_at)
}
