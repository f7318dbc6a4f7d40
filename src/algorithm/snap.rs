use crate::algorithm::scroll_tracker::ScrollDirection;
use crate::models::config::ScrollConfig;
use crate::session::timers::{TimerQueue, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapRequest {
    pub section_index: usize,
    pub progress: f64,
    pub direction: ScrollDirection,
    pub raw_offset_px: f64,
    pub viewport_height: f64,
}

/// Section the document should settle on for `request`.
pub fn snap_target_section(request: &SnapRequest, threshold: f64, section_count: usize) -> usize {
    let last = section_count.saturating_sub(1);
    let section = request.section_index.min(last);
    let progress = request.progress;

    let target = if progress > 1.0 - threshold {
        section + 1
    } else if progress < threshold {
        section
    } else {
        match request.direction {
            ScrollDirection::Forward if progress > 0.5 => section + 1,
            ScrollDirection::Backward if progress < 0.5 => section,
            _ => nearest_section(request),
        }
    };
    target.min(last)
}

fn nearest_section(request: &SnapRequest) -> usize {
    if !(request.viewport_height > 0.0) {
        return request.section_index;
    }
    (request.raw_offset_px / request.viewport_height)
        .round()
        .max(0.0) as usize
}

#[derive(Debug, Clone)]
pub struct SnapScheduler {
    enabled: bool,
    delay_ms: u64,
    threshold: f64,
    pending: Option<TimerToken>,
}

impl SnapScheduler {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            enabled: config.enable_snapping,
            delay_ms: config.snap_delay_ms,
            threshold: config.snap_threshold,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn schedule<T: From<SnapRequest>>(
        &mut self,
        timers: &mut TimerQueue<T>,
        now_ms: u64,
        request: SnapRequest,
    ) {
        if !self.enabled {
            return;
        }
        self.cancel(timers);
        let token = timers.schedule(now_ms.saturating_add(self.delay_ms), T::from(request));
        self.pending = Some(token);
    }

    pub fn cancel<T>(&mut self, timers: &mut TimerQueue<T>) {
        if let Some(token) = self.pending.take() {
            timers.cancel(token);
        }
    }

    /// Resolves a fired timer into the offset to scroll to. Stale tokens
    /// (already replaced or cancelled) resolve to `None`.
    pub fn fire(
        &mut self,
        token: TimerToken,
        request: &SnapRequest,
        section_count: usize,
    ) -> Option<f64> {
        if self.pending != Some(token) {
            return None;
        }
        self.pending = None;

        let target = snap_target_section(request, self.threshold, section_count);
        log::debug!(
            "snap: section={}, progress={:.3}, direction={:?} -> target={target}",
            request.section_index,
            request.progress,
            request.direction
        );
        Some(target as f64 * request.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(section_index: usize, progress: f64, direction: ScrollDirection) -> SnapRequest {
        SnapRequest {
            section_index,
            progress,
            direction,
            raw_offset_px: (section_index as f64 + progress) * 800.0,
            viewport_height: 800.0,
        }
    }

    #[test]
    fn near_end_of_section_snaps_forward() {
        let r = request(4, 0.95, ScrollDirection::Still);
        assert_eq!(snap_target_section(&r, 0.1, 13), 5);
    }

    #[test]
    fn near_start_of_section_snaps_back() {
        let r = request(4, 0.05, ScrollDirection::Forward);
        assert_eq!(snap_target_section(&r, 0.1, 13), 4);
    }

    #[test]
    fn middle_zone_uses_direction_then_rounding() {
        assert_eq!(
            snap_target_section(&request(4, 0.5, ScrollDirection::Forward), 0.1, 13),
            5
        );
        assert_eq!(
            snap_target_section(&request(4, 0.7, ScrollDirection::Forward), 0.1, 13),
            5
        );
        assert_eq!(
            snap_target_section(&request(4, 0.3, ScrollDirection::Backward), 0.1, 13),
            4
        );
        assert_eq!(
            snap_target_section(&request(4, 0.3, ScrollDirection::Forward), 0.1, 13),
            4
        );
        assert_eq!(
            snap_target_section(&request(4, 0.7, ScrollDirection::Backward), 0.1, 13),
            5
        );
    }

    #[test]
    fn target_never_passes_last_section() {
        let r = request(12, 0.99, ScrollDirection::Forward);
        assert_eq!(snap_target_section(&r, 0.1, 13), 12);
    }

    #[test]
    fn rescheduling_keeps_single_timer_in_flight() {
        let mut timers: TimerQueue<SnapRequest> = TimerQueue::new();
        let mut snap = SnapScheduler::new(&ScrollConfig::default());

        snap.schedule(&mut timers, 0, request(1, 0.2, ScrollDirection::Forward));
        snap.schedule(&mut timers, 100, request(1, 0.95, ScrollDirection::Forward));
        assert_eq!(timers.len(), 1);

        assert!(timers.pop_due(399).is_empty());
        let fired = timers.pop_due(400);
        assert_eq!(fired.len(), 1);
        let (token, req) = fired[0];
        assert_eq!(snap.fire(token, &req, 13), Some(1_600.0));
        assert!(!snap.is_pending());
    }

    #[test]
    fn disabled_snapping_schedules_nothing() {
        let mut timers: TimerQueue<SnapRequest> = TimerQueue::new();
        let config = ScrollConfig {
            enable_snapping: false,
            ..ScrollConfig::default()
        };
        let mut snap = SnapScheduler::new(&config);
        snap.schedule(&mut timers, 0, request(1, 0.5, ScrollDirection::Forward));
        assert!(timers.is_empty());
    }

    #[test]
    fn stale_token_does_not_fire() {
        let mut timers: TimerQueue<SnapRequest> = TimerQueue::new();
        let mut snap = SnapScheduler::new(&ScrollConfig::default());
        snap.schedule(&mut timers, 0, request(2, 0.5, ScrollDirection::Forward));
        let (token, req) = timers.pop_due(10_000)[0];
        snap.cancel(&mut timers);
        assert_eq!(snap.fire(token, &req, 13), None);
    }
}
