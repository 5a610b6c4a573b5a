//! Pointer input types and double-click tracking.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const ALT: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: true,
        meta: false,
    };

    /// Whether any modifier key is held.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Pointer event in surface (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    /// The pointer left the surface. Handled like a release.
    Leave {
        position: Point,
    },
    Wheel {
        position: Point,
        delta: Vec2,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Leave { position }
            | PointerEvent::Wheel { position, .. } => position,
        }
    }

    /// Left-button press without modifiers.
    pub fn down(position: impl Into<Point>) -> Self {
        PointerEvent::Down {
            position: position.into(),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    /// Left-button release without modifiers.
    pub fn up(position: impl Into<Point>) -> Self {
        PointerEvent::Up {
            position: position.into(),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn moved(position: impl Into<Point>) -> Self {
        PointerEvent::Move {
            position: position.into(),
        }
    }

    /// Attach modifiers to a press or release. Other events are returned unchanged.
    pub fn with_modifiers(self, mods: Modifiers) -> Self {
        match self {
            PointerEvent::Down {
                position, button, ..
            } => PointerEvent::Down {
                position,
                button,
                modifiers: mods,
            },
            PointerEvent::Up {
                position, button, ..
            } => PointerEvent::Up {
                position,
                button,
                modifiers: mods,
            },
            other => other,
        }
    }
}

/// Detects two releases close together in time and space.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    distance: f64,
    last: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new(window: Duration, distance: f64) -> Self {
        Self {
            window,
            distance,
            last: None,
        }
    }

    /// Register a click; returns true when it completes a double click.
    ///
    /// A completed double click resets the tracker so a third click starts over.
    pub fn register(&mut self, position: Point, now: Instant) -> bool {
        if let Some((time, last_position)) = self.last {
            let elapsed = now.saturating_duration_since(time);
            if elapsed < self.window && (position - last_position).hypot() < self.distance {
                self.last = None;
                return true;
            }
        }
        self.last = Some((now, position));
        false
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Pointer state carried between events.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub screen: Point,
    /// Current pointer position in world coordinates.
    pub world: Point,
    /// Whether a press is in progress.
    pub is_down: bool,
    /// Screen position of the current press.
    pub press_origin: Option<Point>,
    /// Modifiers reported with the last press or release.
    pub modifiers: Modifiers,
    clicks: ClickTracker,
}

impl InputState {
    pub fn new(double_click_window: Duration, double_click_distance: f64) -> Self {
        Self {
            screen: Point::ZERO,
            world: Point::ZERO,
            is_down: false,
            press_origin: None,
            modifiers: Modifiers::NONE,
            clicks: ClickTracker::new(double_click_window, double_click_distance),
        }
    }

    /// Record a press.
    pub fn press(&mut self, screen: Point, world: Point, modifiers: Modifiers) {
        self.screen = screen;
        self.world = world;
        self.is_down = true;
        self.press_origin = Some(screen);
        self.modifiers = modifiers;
    }

    /// Record a release. Returns false if there was no press to end.
    pub fn release(&mut self, screen: Point, world: Point, modifiers: Modifiers) -> bool {
        self.screen = screen;
        self.world = world;
        self.modifiers = modifiers;
        let was_down = self.is_down;
        self.is_down = false;
        was_down
    }

    /// Update the pointer position. Returns the screen delta since the last event.
    pub fn track(&mut self, screen: Point, world: Point) -> Vec2 {
        let delta = screen - self.screen;
        self.screen = screen;
        self.world = world;
        delta
    }

    /// Whether the pointer stayed within `slop` pixels of where the press started.
    pub fn within_slop(&self, slop: f64) -> bool {
        self.press_origin
            .is_some_and(|origin| (self.screen - origin).hypot() <= slop)
    }

    /// Feed a completed click into double-click detection.
    pub fn register_click(&mut self, now: Instant) -> bool {
        self.clicks.register(self.screen, now)
    }

    pub fn reset_clicks(&mut self) {
        self.clicks.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ClickTracker {
        ClickTracker::new(Duration::from_millis(500), 5.0)
    }

    #[test]
    fn test_double_click_detected() {
        let mut clicks = tracker();
        let t0 = Instant::now();
        assert!(!clicks.register(Point::new(10.0, 10.0), t0));
        assert!(clicks.register(Point::new(12.0, 11.0), t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_double_click_window_and_distance() {
        let mut clicks = tracker();
        let t0 = Instant::now();
        clicks.register(Point::ZERO, t0);
        assert!(!clicks.register(Point::ZERO, t0 + Duration::from_millis(600)));

        let t1 = t0 + Duration::from_secs(2);
        clicks.register(Point::ZERO, t1);
        assert!(!clicks.register(Point::new(6.0, 0.0), t1 + Duration::from_millis(100)));
    }

    #[test]
    fn test_triple_click_does_not_chain() {
        let mut clicks = tracker();
        let t0 = Instant::now();
        clicks.register(Point::ZERO, t0);
        assert!(clicks.register(Point::ZERO, t0 + Duration::from_millis(100)));
        assert!(!clicks.register(Point::ZERO, t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_release_without_press() {
        let mut input = InputState::new(Duration::from_millis(500), 5.0);
        assert!(!input.release(Point::ZERO, Point::ZERO, Modifiers::NONE));
        input.press(Point::ZERO, Point::ZERO, Modifiers::SHIFT);
        assert!(input.is_down);
        assert!(input.release(Point::ZERO, Point::ZERO, Modifiers::NONE));
    }

    #[test]
    fn test_track_and_slop() {
        let mut input = InputState::new(Duration::from_millis(500), 5.0);
        input.press(Point::new(100.0, 100.0), Point::new(100.0, 100.0), Modifiers::NONE);
        let delta = input.track(Point::new(103.0, 104.0), Point::new(103.0, 104.0));
        assert_eq!(delta, Vec2::new(3.0, 4.0));
        assert!(input.within_slop(5.0));
        input.track(Point::new(110.0, 100.0), Point::new(110.0, 100.0));
        assert!(!input.within_slop(5.0));
    }

    #[test]
    fn test_event_builders() {
        let event = PointerEvent::down((5.0, 6.0)).with_modifiers(Modifiers::ALT);
        assert_eq!(event.position(), Point::new(5.0, 6.0));
        assert!(matches!(
            event,
            PointerEvent::Down { modifiers: Modifiers { alt: true, .. }, .. }
        ));
        assert!(Modifiers::SHIFT.any());
        assert!(!Modifiers::NONE.any());
    }
}
