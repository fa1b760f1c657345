//! Input classification: six buttons sampled once per tick, debounced, with
//! accelerating auto-repeat on the two adjust buttons.

use embassy_time::{Duration, Instant};

use crate::shared_constants::{
    BUTTON_DEBOUNCE, REPEAT_DELAY, REPEAT_INTERVAL_FLOOR, REPEAT_INTERVAL_START,
    REPEAT_INTERVAL_STEP,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Confirm,
    Back,
}

impl Button {
    /// Classification order. When several keys edge in the same tick the
    /// last one in this order wins; there is no event queue.
    pub const ALL: [Self; 6] = [
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::Confirm,
        Self::Back,
    ];

    const fn repeats(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Pressed levels for one sample, polarity already normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyLevels {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub confirm: bool,
    pub back: bool,
}

impl KeyLevels {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            left: false,
            right: false,
            up: false,
            down: false,
            confirm: false,
            back: false,
        }
    }

    #[must_use]
    pub const fn with(mut self, button: Button) -> Self {
        match button {
            Button::Left => self.left = true,
            Button::Right => self.right = true,
            Button::Up => self.up = true,
            Button::Down => self.down = true,
            Button::Confirm => self.confirm = true,
            Button::Back => self.back = true,
        }
        self
    }

    #[must_use]
    pub const fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Left => self.left,
            Button::Right => self.right,
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Confirm => self.confirm,
            Button::Back => self.back,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Edge {
    None,
    Pressed,
    Released,
}

/// One debounced key: a raw-level change only becomes an edge after the
/// level has held for the debounce window.
#[derive(Clone, Copy, Debug)]
struct DebouncedKey {
    stable: bool,
    raw: bool,
    changed_at: Instant,
}

impl DebouncedKey {
    const fn new() -> Self {
        Self {
            stable: false,
            raw: false,
            changed_at: Instant::MIN,
        }
    }

    /// Adopts `level` as already stable, so no edge is pending for it.
    fn force(&mut self, level: bool, now: Instant) {
        self.stable = level;
        self.raw = level;
        self.changed_at = now;
    }

    #[expect(
        clippy::arithmetic_side_effects,
        reason = "changed_at is always a past sample instant, so the subtraction cannot underflow."
    )]
    fn sample(&mut self, raw: bool, now: Instant) -> Edge {
        if raw != self.raw {
            self.raw = raw;
            self.changed_at = now;
        }
        if raw != self.stable && now - self.changed_at >= BUTTON_DEBOUNCE {
            self.stable = raw;
            return if raw { Edge::Pressed } else { Edge::Released };
        }
        Edge::None
    }
}

struct Keys {
    left: DebouncedKey,
    right: DebouncedKey,
    up: DebouncedKey,
    down: DebouncedKey,
    confirm: DebouncedKey,
    back: DebouncedKey,
}

impl Keys {
    const fn new() -> Self {
        Self {
            left: DebouncedKey::new(),
            right: DebouncedKey::new(),
            up: DebouncedKey::new(),
            down: DebouncedKey::new(),
            confirm: DebouncedKey::new(),
            back: DebouncedKey::new(),
        }
    }

    fn get_mut(&mut self, button: Button) -> &mut DebouncedKey {
        match button {
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Confirm => &mut self.confirm,
            Button::Back => &mut self.back,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Repeat {
    button: Button,
    fired: bool,
    interval: Duration,
    next_at: Instant,
}

/// Classifies raw key levels into at most one event per poll.
///
/// A pressed edge always wins the tick. Holding up or down emits the first
/// synthetic repeat after [`REPEAT_DELAY`], then repeats at an interval that
/// shrinks by [`REPEAT_INTERVAL_STEP`] each time down to
/// [`REPEAT_INTERVAL_FLOOR`]; releasing the key re-arms the full delay.
pub struct Keypad {
    keys: Keys,
    repeat: Option<Repeat>,
}

impl Keypad {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keys: Keys::new(),
            repeat: None,
        }
    }

    /// One classification pass over a sample of the key levels.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "Instant plus a small Duration stays far from the u64 tick range."
    )]
    pub fn poll(&mut self, levels: &KeyLevels, now: Instant) -> Option<Button> {
        let mut event = None;
        for button in Button::ALL {
            match self.keys.get_mut(button).sample(levels.is_pressed(button), now) {
                Edge::Pressed => {
                    event = Some(button);
                    if button.repeats() {
                        self.repeat = Some(Repeat {
                            button,
                            fired: false,
                            interval: REPEAT_INTERVAL_START,
                            next_at: now + REPEAT_DELAY,
                        });
                    }
                }
                Edge::Released => {
                    if self.repeat.is_some_and(|repeat| repeat.button == button) {
                        self.repeat = None;
                    }
                }
                Edge::None => {}
            }
        }

        if event.is_none() {
            if let Some(repeat) = &mut self.repeat {
                if now >= repeat.next_at {
                    event = Some(repeat.button);
                    repeat.fired = true;
                    repeat.next_at = now + repeat.interval;
                    repeat.interval = Duration::from_ticks(
                        repeat
                            .interval
                            .as_ticks()
                            .saturating_sub(REPEAT_INTERVAL_STEP.as_ticks()),
                    )
                    .max(REPEAT_INTERVAL_FLOOR);
                }
            }
        }
        event
    }

    /// Adopts the current levels as the stable state, discarding pending
    /// edges and any running auto-repeat.
    ///
    /// Call after a path outside the classifier has consumed a press (the
    /// annunciation loop polls confirm raw); without this the still-held
    /// key would replay as a fresh debounced press on the next poll.
    pub fn sync(&mut self, levels: &KeyLevels, now: Instant) {
        for button in Button::ALL {
            self.keys
                .get_mut(button)
                .force(levels.is_pressed(button), now);
        }
        self.repeat = None;
    }

    /// True once auto-repeat has produced an event and the key is still held.
    /// The editor keeps the field visible while this holds.
    #[must_use]
    pub fn repeat_active(&self) -> bool {
        self.repeat.is_some_and(|repeat| repeat.fired)
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "pico")]
pub use pins::KeypadPins;

#[cfg(feature = "pico")]
mod pins {
    use embassy_rp::gpio::Input;

    use super::KeyLevels;

    /// The six front-panel buttons, wired active-low with pull-ups.
    pub struct KeypadPins {
        left: Input<'static>,
        right: Input<'static>,
        up: Input<'static>,
        down: Input<'static>,
        confirm: Input<'static>,
        back: Input<'static>,
    }

    impl KeypadPins {
        #[must_use]
        pub fn new(
            left: Input<'static>,
            right: Input<'static>,
            up: Input<'static>,
            down: Input<'static>,
            confirm: Input<'static>,
            back: Input<'static>,
        ) -> Self {
            Self {
                left,
                right,
                up,
                down,
                confirm,
                back,
            }
        }

        #[must_use]
        pub fn read(&self) -> KeyLevels {
            KeyLevels {
                left: self.left.is_low(),
                right: self.right.is_low(),
                up: self.up.is_low(),
                down: self.down.is_low(),
                confirm: self.confirm.is_low(),
                back: self.back.is_low(),
            }
        }

        /// Raw confirm level for the annunciation loop, which polls between
        /// buzzer toggles instead of running the debouncer.
        #[must_use]
        pub fn confirm_pressed(&self) -> bool {
            self.confirm.is_low()
        }
    }
}
