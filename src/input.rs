//! Input intents
//!
//! Device callbacks (keyboard, touch, mouse) reduce raw events to a small
//! set of intents and record them in an `IntentBuffer`. The tick drains the
//! buffer once at the start of each frame. Each intent keeps a held mask
//! over its bindings plus a pending flag, so a burst of key-repeat events
//! collapses into one effect per tick.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Abstract player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Accelerate,
    Brake,
    Nitro,
    Pause,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::Accelerate,
        Intent::Brake,
        Intent::Nitro,
        Intent::Pause,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Level-triggered intents keep firing every tick while held
    pub fn is_level_triggered(self) -> bool {
        self == Intent::Accelerate
    }
}

#[derive(Debug, Default)]
struct IntentFlags {
    /// One bit per physical binding currently down
    held: AtomicU8,
    /// A press happened since the last drain
    pending: AtomicBool,
}

/// A physical control bound to an intent.
///
/// Several keys can drive the same intent; each gets its own `slot` so
/// releasing one never makes a key still held look freshly pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub intent: Intent,
    /// In `0..MAX_BINDINGS`
    pub slot: u8,
}

/// Physical bindings tracked per intent
pub const MAX_BINDINGS: u8 = 8;

/// Slot used by `pulse`, kept apart from keyboard bindings
const PULSE_SLOT: u8 = MAX_BINDINGS - 1;

impl Binding {
    pub fn new(intent: Intent, slot: u8) -> Self {
        Self {
            intent,
            slot: slot.min(MAX_BINDINGS - 1),
        }
    }

    fn mask(self) -> u8 {
        1 << self.slot
    }
}

/// Single-writer-per-binding, single-reader flag buffer.
///
/// Writers call `press`/`release` from any thread; the tick calls `drain`.
/// An intent counts as newly pressed only when its first binding goes down.
#[derive(Debug, Default)]
pub struct IntentBuffer {
    flags: [IntentFlags; 6],
}

impl IntentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Control went down on the primary binding
    pub fn press(&self, intent: Intent) {
        self.press_binding(Binding::new(intent, 0));
    }

    /// Control went up on the primary binding
    pub fn release(&self, intent: Intent) {
        self.release_binding(Binding::new(intent, 0));
    }

    /// A binding went down. Repeats, and presses while another binding
    /// already holds the intent, are ignored.
    pub fn press_binding(&self, binding: Binding) {
        let flags = &self.flags[binding.intent.index()];
        if flags.held.fetch_or(binding.mask(), Ordering::AcqRel) == 0 {
            flags.pending.store(true, Ordering::Release);
        }
    }

    /// A binding went up
    pub fn release_binding(&self, binding: Binding) {
        self.flags[binding.intent.index()]
            .held
            .fetch_and(!binding.mask(), Ordering::AcqRel);
    }

    /// A press and release in one go (taps, swipes, buttons)
    pub fn pulse(&self, intent: Intent) {
        let binding = Binding::new(intent, PULSE_SLOT);
        self.press_binding(binding);
        self.release_binding(binding);
    }

    /// Forget everything, including held controls
    pub fn clear(&self) {
        for flags in &self.flags {
            flags.held.store(0, Ordering::Release);
            flags.pending.store(false, Ordering::Release);
        }
    }

    fn take(&self, intent: Intent) -> bool {
        let flags = &self.flags[intent.index()];
        let pending = flags.pending.swap(false, Ordering::AcqRel);
        if intent.is_level_triggered() {
            pending || flags.held.load(Ordering::Acquire) != 0
        } else {
            pending
        }
    }

    /// Consume this tick's intents, clearing the edge-triggered ones
    pub fn drain(&self) -> TickInput {
        TickInput {
            move_left: self.take(Intent::MoveLeft),
            move_right: self.take(Intent::MoveRight),
            accelerate: self.take(Intent::Accelerate),
            brake: self.take(Intent::Brake),
            nitro: self.take(Intent::Nitro),
            pause: self.take(Intent::Pause),
        }
    }
}

/// Map a keyboard key name to its binding
pub fn binding_for_key(key: &str) -> Option<Binding> {
    let (intent, slot) = match key {
        "ArrowLeft" => (Intent::MoveLeft, 0),
        "a" | "A" => (Intent::MoveLeft, 1),
        "ArrowRight" => (Intent::MoveRight, 0),
        "d" | "D" => (Intent::MoveRight, 1),
        "ArrowUp" => (Intent::Accelerate, 0),
        "ArrowDown" => (Intent::Brake, 0),
        // Space is the secondary brake
        " " | "Space" => (Intent::Brake, 1),
        "Escape" => (Intent::Pause, 0),
        _ => return None,
    };
    Some(Binding::new(intent, slot))
}

/// Map a keyboard key name to an intent
pub fn intent_for_key(key: &str) -> Option<Intent> {
    binding_for_key(key).map(|b| b.intent)
}

/// Minimum vertical travel (px) for a touch to count as a swipe
pub const MIN_SWIPE: f32 = 40.0;

/// Classify a completed touch.
///
/// A mostly vertical swipe is nitro (up) or brake (down); anything else
/// is a tap that steers toward the half of the surface it started in.
pub fn classify_touch(start: (f32, f32), end: (f32, f32), surface_width: f32) -> Intent {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    if dy.abs() > MIN_SWIPE && dy.abs() > dx.abs() {
        if dy < 0.0 { Intent::Nitro } else { Intent::Brake }
    } else {
        classify_tap(start.0, surface_width)
    }
}

/// Left half steers left, right half steers right
pub fn classify_tap(x: f32, surface_width: f32) -> Intent {
    if x < surface_width / 2.0 {
        Intent::MoveLeft
    } else {
        Intent::MoveRight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_press_fires_once_per_press() {
        let buf = IntentBuffer::new();
        buf.press(Intent::MoveLeft);
        buf.press(Intent::MoveLeft); // key repeat
        assert!(buf.drain().move_left);
        // Still held, but already consumed
        assert!(!buf.drain().move_left);
        buf.release(Intent::MoveLeft);
        buf.press(Intent::MoveLeft);
        assert!(buf.drain().move_left);
    }

    #[test]
    fn test_accelerate_is_level_triggered() {
        let buf = IntentBuffer::new();
        buf.press(Intent::Accelerate);
        assert!(buf.drain().accelerate);
        assert!(buf.drain().accelerate);
        buf.release(Intent::Accelerate);
        assert!(!buf.drain().accelerate);
    }

    #[test]
    fn test_quick_tap_between_ticks_is_not_lost() {
        let buf = IntentBuffer::new();
        buf.pulse(Intent::Nitro);
        buf.pulse(Intent::Accelerate);
        let input = buf.drain();
        assert!(input.nitro);
        assert!(input.accelerate);
        assert!(buf.drain().is_empty());
    }

    #[test]
    fn test_clear_drops_everything() {
        let buf = IntentBuffer::new();
        buf.press(Intent::Accelerate);
        buf.pulse(Intent::Pause);
        buf.clear();
        assert!(buf.drain().is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let buf = Arc::new(IntentBuffer::new());
        let writer = Arc::clone(&buf);
        std::thread::spawn(move || writer.pulse(Intent::MoveRight))
            .join()
            .unwrap();
        assert!(buf.drain().move_right);
    }

    #[test]
    fn test_second_binding_does_not_retrigger_held_key() {
        let buf = IntentBuffer::new();
        let a = binding_for_key("a").unwrap();
        let arrow = binding_for_key("ArrowLeft").unwrap();

        buf.press_binding(a);
        assert!(buf.drain().move_left);

        // Tap the other binding while `a` stays down
        buf.press_binding(arrow);
        buf.release_binding(arrow);
        // Key repeat from `a`
        buf.press_binding(a);
        assert!(!buf.drain().move_left);

        buf.release_binding(a);
        buf.press_binding(a);
        assert!(buf.drain().move_left);
    }

    #[test]
    fn test_pulse_leaves_held_key_alone() {
        let buf = IntentBuffer::new();
        buf.press(Intent::Accelerate);
        buf.pulse(Intent::Accelerate);
        buf.drain();
        assert!(buf.drain().accelerate);
    }

    #[test]
    fn test_accelerate_held_by_either_binding() {
        let buf = IntentBuffer::new();
        buf.press_binding(Binding::new(Intent::Accelerate, 0));
        buf.press_binding(Binding::new(Intent::Accelerate, 3));
        buf.release_binding(Binding::new(Intent::Accelerate, 0));
        assert!(buf.drain().accelerate);
        buf.release_binding(Binding::new(Intent::Accelerate, 3));
        assert!(!buf.drain().accelerate);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(intent_for_key("ArrowLeft"), Some(Intent::MoveLeft));
        assert_eq!(intent_for_key("d"), Some(Intent::MoveRight));
        assert_eq!(intent_for_key(" "), Some(Intent::Brake));
        assert_eq!(intent_for_key("Escape"), Some(Intent::Pause));
        assert_eq!(intent_for_key("q"), None);
        assert_ne!(binding_for_key(" "), binding_for_key("ArrowDown"));
        assert_eq!(binding_for_key("D"), binding_for_key("d"));
    }

    #[test]
    fn test_touch_classification() {
        // Swipe up
        assert_eq!(classify_touch((100.0, 500.0), (110.0, 400.0), 720.0), Intent::Nitro);
        // Swipe down
        assert_eq!(classify_touch((100.0, 400.0), (90.0, 480.0), 720.0), Intent::Brake);
        // Short drag is a tap where it started
        assert_eq!(classify_touch((100.0, 400.0), (500.0, 420.0), 720.0), Intent::MoveLeft);
        assert_eq!(classify_touch((600.0, 400.0), (600.0, 410.0), 720.0), Intent::MoveRight);
    }
}
