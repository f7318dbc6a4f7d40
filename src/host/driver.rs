//! Async host loop: feeds channel events into a `TourSession`, ticks the
//! render path on a fixed interval and forwards programmatic scrolls.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::algorithm::camera_path::CameraRig;
use crate::models::events::{HostEvent, ScrollCommand};
use crate::session::TourSession;

#[derive(Debug, Clone, Copy)]
pub struct DriverOptions {
    pub frame_interval: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
        }
    }
}

/// Runs until the event channel closes, then shuts the session down and
/// hands it back.
pub async fn run<R: CameraRig>(
    mut session: TourSession,
    mut events: mpsc::Receiver<HostEvent>,
    commands: mpsc::Sender<ScrollCommand>,
    rig: &mut R,
    options: DriverOptions,
) -> TourSession {
    let started = Instant::now();
    let clock_base = session.now_ms();
    let mut frames = tokio::time::interval(options.frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_frame = Instant::now();
    let mut forward_commands = true;

    log::info!(
        "driver: started, frame_interval_ms={}",
        options.frame_interval.as_millis()
    );

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                session.advance_clock(clock_base + elapsed_ms(started));
                let disposition = session.handle_event(event);
                log::trace!("driver: event disposition={disposition:?}");
            }
            tick = frames.tick() => {
                session.advance_clock(clock_base + elapsed_ms(started));
                let dt = tick.duration_since(last_frame).as_secs_f64();
                last_frame = tick;
                session.render_tick(dt, rig);
            }
        }

        for command in session.drain_scroll_commands() {
            if !forward_commands {
                continue;
            }
            if commands.send(command).await.is_err() {
                log::warn!("driver: scroll command receiver dropped");
                forward_commands = false;
            }
        }
    }

    session.shutdown();
    log::info!("driver: event channel closed, stopped");
    session
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
