use crate::models::config::ScrollConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    Forward,
    Backward,
    #[default]
    Still,
}

impl ScrollDirection {
    pub fn sign(self) -> i8 {
        match self {
            ScrollDirection::Forward => 1,
            ScrollDirection::Backward => -1,
            ScrollDirection::Still => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    pub raw_offset_px: f64,
    pub section_index: usize,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollUpdate {
    Tracked {
        section_index: usize,
        progress: f64,
        direction: ScrollDirection,
    },
    /// The offset reached the end of the document; the loop reset must start.
    BoundaryReached,
}

#[derive(Debug, Clone)]
pub struct ScrollTracker {
    section_count: usize,
    viewport_height: f64,
    raw_offset_px: f64,
    section_index: usize,
    progress: f64,
    /// Last non-zero movement direction.
    direction: ScrollDirection,
    scroll_edge_epsilon_px: f64,
    wheel_edge_epsilon_px: f64,
}

impl ScrollTracker {
    pub fn new(section_count: usize, viewport_height: f64, config: &ScrollConfig) -> Self {
        Self {
            section_count: section_count.max(2),
            viewport_height: sanitize_height(viewport_height),
            raw_offset_px: 0.0,
            section_index: 0,
            progress: 0.0,
            direction: ScrollDirection::Still,
            scroll_edge_epsilon_px: config.scroll_edge_epsilon_px,
            wheel_edge_epsilon_px: config.wheel_edge_epsilon_px,
        }
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            raw_offset_px: self.raw_offset_px,
            section_index: self.section_index,
            progress: self.progress,
        }
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn raw_offset_px(&self) -> f64 {
        self.raw_offset_px
    }

    pub fn section_index(&self) -> usize {
        self.section_index
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn section_count(&self) -> usize {
        self.section_count
    }

    pub fn max_scroll(&self) -> f64 {
        self.viewport_height * (self.section_count - 1) as f64
    }

    pub fn on_scroll(&mut self, raw_offset_px: f64) -> ScrollUpdate {
        let offset = self.sanitize_offset(raw_offset_px);
        let delta = offset - self.raw_offset_px;
        if delta > 0.0 {
            self.direction = ScrollDirection::Forward;
        } else if delta < 0.0 {
            self.direction = ScrollDirection::Backward;
        }
        self.raw_offset_px = offset;

        if self.at_boundary(self.scroll_edge_epsilon_px) {
            log::debug!(
                "on_scroll: boundary reached, offset={offset:.1}, max_scroll={:.1}",
                self.max_scroll()
            );
            return ScrollUpdate::BoundaryReached;
        }

        let (section_index, progress) =
            section_position(offset, self.viewport_height, self.section_count);
        self.section_index = section_index;
        self.progress = progress;

        ScrollUpdate::Tracked {
            section_index,
            progress,
            direction: self.direction,
        }
    }

    /// True when forward wheel input arrives close enough to the end that the
    /// document may have nothing left to scroll.
    pub fn wheel_triggers_loop(&self, delta_y: f64) -> bool {
        delta_y > 0.0 && self.at_boundary(self.wheel_edge_epsilon_px)
    }

    /// Shows the terminal pose: last section, full progress.
    pub fn commit_end(&mut self) {
        self.section_index = self.section_count - 1;
        self.progress = 1.0;
    }

    pub fn reset_to_start(&mut self) {
        self.raw_offset_px = 0.0;
        self.section_index = 0;
        self.progress = 0.0;
        self.direction = ScrollDirection::Still;
    }

    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        self.viewport_height = sanitize_height(viewport_height);
        self.raw_offset_px = self.raw_offset_px.min(self.max_scroll());
        let (section_index, progress) =
            section_position(self.raw_offset_px, self.viewport_height, self.section_count);
        self.section_index = section_index;
        self.progress = progress;
    }

    fn at_boundary(&self, epsilon_px: f64) -> bool {
        self.viewport_height > 0.0
            && self.raw_offset_px > 0.0
            && self.raw_offset_px >= self.max_scroll() - epsilon_px
    }

    fn sanitize_offset(&self, raw_offset_px: f64) -> f64 {
        if !raw_offset_px.is_finite() || raw_offset_px < 0.0 {
            if raw_offset_px != 0.0 {
                log::warn!("on_scroll: invalid offset {raw_offset_px}, using 0");
            }
            return 0.0;
        }
        raw_offset_px.min(self.max_scroll())
    }
}

/// Section index and fractional progress for `offset`. A zero viewport maps
/// everything to the first section.
pub fn section_position(offset: f64, viewport_height: f64, section_count: usize) -> (usize, f64) {
    if !(viewport_height > 0.0) || !offset.is_finite() || offset <= 0.0 {
        return (0, 0.0);
    }

    let last = section_count.saturating_sub(1);
    let section = (offset / viewport_height).floor() as usize;
    if section > last {
        log::warn!("section_position: section {section} clamped to {last}");
        return (last, 0.0);
    }
    let progress = (offset % viewport_height) / viewport_height;
    (section, progress.clamp(0.0, 1.0))
}

fn sanitize_height(viewport_height: f64) -> f64 {
    if viewport_height.is_finite() && viewport_height > 0.0 {
        viewport_height
    } else {
        log::warn!("viewport height {viewport_height} unusable, treating as 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(viewport_height: f64) -> ScrollTracker {
        ScrollTracker::new(13, viewport_height, &ScrollConfig::default())
    }

    #[test]
    fn maps_offsets_to_section_and_progress() {
        let mut t = tracker(800.0);
        assert_eq!(t.max_scroll(), 9_600.0);

        assert_eq!(
            t.on_scroll(4_000.0),
            ScrollUpdate::Tracked {
                section_index: 5,
                progress: 0.0,
                direction: ScrollDirection::Forward,
            }
        );
        assert_eq!(
            t.on_scroll(4_400.0),
            ScrollUpdate::Tracked {
                section_index: 5,
                progress: 0.5,
                direction: ScrollDirection::Forward,
            }
        );
    }

    #[test]
    fn progress_stays_in_unit_interval_below_max_scroll() {
        let vh = 800.0;
        let mut offset = 0.0;
        while offset < 9_600.0 - 20.0 {
            let (section, progress) = section_position(offset, vh, 13);
            assert_eq!(section, (offset / vh).floor() as usize);
            assert!((0.0..1.0).contains(&progress), "offset {offset} → {progress}");
            assert!((progress - (offset % vh) / vh).abs() < 1e-12);
            offset += 37.5;
        }
    }

    #[test]
    fn offset_within_epsilon_of_end_reaches_boundary() {
        let mut t = tracker(800.0);
        assert_eq!(t.on_scroll(9_585.0), ScrollUpdate::BoundaryReached);
        assert_eq!(t.raw_offset_px(), 9_585.0);
    }

    #[test]
    fn records_last_non_zero_direction() {
        let mut t = tracker(800.0);
        t.on_scroll(1_000.0);
        t.on_scroll(900.0);
        assert_eq!(t.direction(), ScrollDirection::Backward);
        t.on_scroll(900.0);
        assert_eq!(t.direction(), ScrollDirection::Backward);
        assert_eq!(t.direction().sign(), -1);
    }

    #[test]
    fn negative_and_nan_offsets_clamp_to_zero() {
        let mut t = tracker(800.0);
        for bad in [-250.0, f64::NAN, f64::NEG_INFINITY] {
            match t.on_scroll(bad) {
                ScrollUpdate::Tracked {
                    section_index,
                    progress,
                    ..
                } => {
                    assert_eq!(section_index, 0);
                    assert_eq!(progress, 0.0);
                }
                other => panic!("unexpected update {other:?}"),
            }
            assert_eq!(t.raw_offset_px(), 0.0);
        }
    }

    #[test]
    fn zero_viewport_never_divides_or_loops() {
        let mut t = tracker(0.0);
        assert_eq!(
            t.on_scroll(500.0),
            ScrollUpdate::Tracked {
                section_index: 0,
                progress: 0.0,
                direction: ScrollDirection::Still,
            }
        );
        assert!(!t.wheel_triggers_loop(100.0));
    }

    #[test]
    fn tiny_document_does_not_loop_from_the_top() {
        let mut t = tracker(1.0);
        assert!(t.max_scroll() <= ScrollConfig::default().scroll_edge_epsilon_px);
        assert!(matches!(t.on_scroll(0.0), ScrollUpdate::Tracked { .. }));
        assert!(!t.wheel_triggers_loop(120.0));

        assert_eq!(t.on_scroll(5.0), ScrollUpdate::BoundaryReached);
    }

    #[test]
    fn wheel_forward_near_end_triggers_loop() {
        let mut t = tracker(800.0);
        t.on_scroll(9_560.0);
        assert!(t.wheel_triggers_loop(120.0));
        assert!(!t.wheel_triggers_loop(-120.0));

        t.on_scroll(8_000.0);
        assert!(!t.wheel_triggers_loop(120.0));
    }

    #[test]
    fn resize_rederives_and_clamps_section() {
        let mut t = tracker(800.0);
        t.on_scroll(8_800.0);
        assert_eq!(t.section_index(), 11);

        t.set_viewport_height(400.0);
        assert_eq!(t.raw_offset_px(), 4_800.0);
        assert_eq!(t.section_index(), 12);
        assert!(t.section_index() <= 12);
    }

    #[test]
    fn section_position_clamps_oversized_offsets() {
        assert_eq!(section_position(50_000.0, 800.0, 13), (12, 0.0));
    }
}
