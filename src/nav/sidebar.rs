use std::time::{Duration, Instant};

pub const OPEN_DURATION: Duration = Duration::from_millis(300);
pub const CLOSE_DURATION: Duration = Duration::from_millis(250);
pub const OVERLAY_OPEN_OPACITY: f32 = 0.5;
pub const DEFAULT_PANEL_WIDTH: f32 = 34.0;

/// Cubic ease-in-out over `t` in `[0, 1]`.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
}

impl Tween {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn value(&self, now: Instant) -> f32 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_in_out(t)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    Opening,
    Closing,
}

#[derive(Clone, Copy, Debug)]
struct Animation {
    motion: Motion,
    offset: Tween,
    opacity: Tween,
}

/// Slide-in panel with a dimming overlay.
///
/// `visible` turns on as soon as an open starts and turns off only when a
/// close has fully played out, so the panel stays drawn while it slides away.
#[derive(Clone, Debug)]
pub struct SidebarState {
    visible: bool,
    panel_width: f32,
    slide_offset: f32,
    overlay_opacity: f32,
    animation: Option<Animation>,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new(DEFAULT_PANEL_WIDTH)
    }
}

impl SidebarState {
    pub fn new(panel_width: f32) -> Self {
        let panel_width = panel_width.max(0.0);
        Self {
            visible: false,
            panel_width,
            slide_offset: -panel_width,
            overlay_opacity: 0.0,
            animation: None,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// True while open or opening; false once a close has started.
    pub fn is_open(&self) -> bool {
        self.visible && self.motion() != Some(Motion::Closing)
    }

    pub fn motion(&self) -> Option<Motion> {
        self.animation.map(|a| a.motion)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn slide_offset(&self) -> f32 {
        self.slide_offset
    }

    pub fn overlay_opacity(&self) -> f32 {
        self.overlay_opacity
    }

    pub fn panel_width(&self) -> f32 {
        self.panel_width
    }

    /// Resize the panel. Only a resting closed panel moves immediately; an
    /// animation in flight keeps its targets until the next open/close.
    pub fn set_panel_width(&mut self, width: f32) {
        self.panel_width = width.max(0.0);
        if !self.visible && self.animation.is_none() {
            self.slide_offset = -self.panel_width;
        }
    }

    pub fn open(&mut self, now: Instant) {
        if self.is_open() {
            return;
        }
        self.visible = true;
        self.start(now, Motion::Opening, 0.0, OVERLAY_OPEN_OPACITY, OPEN_DURATION);
    }

    pub fn close(&mut self, now: Instant) {
        if !self.is_open() {
            return;
        }
        let closed = -self.panel_width;
        self.start(now, Motion::Closing, closed, 0.0, CLOSE_DURATION);
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_open() {
            self.close(now);
        } else {
            self.open(now);
        }
    }

    fn start(&mut self, now: Instant, motion: Motion, offset: f32, opacity: f32, duration: Duration) {
        self.animation = Some(Animation {
            motion,
            offset: Tween {
                from: self.slide_offset,
                to: offset,
                start: now,
                duration,
            },
            opacity: Tween {
                from: self.overlay_opacity,
                to: opacity,
                start: now,
                duration,
            },
        });
    }

    /// Advance the animation. Returns true when something moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        self.slide_offset = anim.offset.value(now);
        self.overlay_opacity = anim.opacity.value(now);
        if anim.offset.progress(now) >= 1.0 {
            self.animation = None;
            if anim.motion == Motion::Closing {
                self.visible = false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_starts_closed() {
        let sidebar = SidebarState::new(30.0);
        assert!(!sidebar.visible());
        assert_eq!(sidebar.slide_offset(), -30.0);
        assert_eq!(sidebar.overlay_opacity(), 0.0);
    }

    #[test]
    fn test_open_is_visible_immediately() {
        let t0 = Instant::now();
        let mut sidebar = SidebarState::new(30.0);
        sidebar.open(t0);
        assert!(sidebar.visible());
        assert_eq!(sidebar.motion(), Some(Motion::Opening));

        sidebar.tick(t0 + ms(150));
        assert!(sidebar.slide_offset() > -30.0 && sidebar.slide_offset() < 0.0);
        assert!(sidebar.overlay_opacity() > 0.0 && sidebar.overlay_opacity() < 0.5);

        sidebar.tick(t0 + OPEN_DURATION);
        assert_eq!(sidebar.slide_offset(), 0.0);
        assert_eq!(sidebar.overlay_opacity(), OVERLAY_OPEN_OPACITY);
        assert!(!sidebar.is_animating());
    }

    #[test]
    fn test_close_hides_only_after_animation() {
        let t0 = Instant::now();
        let mut sidebar = SidebarState::new(30.0);
        sidebar.open(t0);
        sidebar.tick(t0 + OPEN_DURATION);

        let t1 = t0 + OPEN_DURATION;
        sidebar.close(t1);
        assert!(sidebar.visible());
        assert!(!sidebar.is_open());

        sidebar.tick(t1 + ms(249));
        assert!(sidebar.visible());

        sidebar.tick(t1 + CLOSE_DURATION);
        assert!(!sidebar.visible());
        assert_eq!(sidebar.slide_offset(), -30.0);
        assert_eq!(sidebar.overlay_opacity(), 0.0);
    }

    #[test]
    fn test_close_mid_open_reverses_from_current_position() {
        let t0 = Instant::now();
        let mut sidebar = SidebarState::new(30.0);
        sidebar.open(t0);
        sidebar.tick(t0 + ms(150));
        let midway = sidebar.slide_offset();

        sidebar.close(t0 + ms(150));
        sidebar.tick(t0 + ms(150));
        assert_eq!(sidebar.slide_offset(), midway);
        assert!(sidebar.visible());
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let t0 = Instant::now();
        let mut sidebar = SidebarState::new(30.0);
        sidebar.close(t0);
        assert!(!sidebar.is_animating());
        assert!(!sidebar.tick(t0 + ms(500)));
    }

    #[test]
    fn test_toggle_alternates() {
        let t0 = Instant::now();
        let mut sidebar = SidebarState::new(20.0);
        sidebar.toggle(t0);
        assert!(sidebar.is_open());
        sidebar.toggle(t0 + ms(10));
        assert!(!sidebar.is_open());
    }

    #[test]
    fn test_ease_in_out_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(ease_in_out(-1.0), 0.0);
    }

    #[test]
    fn test_resize_moves_resting_panel() {
        let mut sidebar = SidebarState::new(20.0);
        sidebar.set_panel_width(40.0);
        assert_eq!(sidebar.slide_offset(), -40.0);
    }
}
