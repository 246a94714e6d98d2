//! Confetti Container - The restartable celebration effect.
//!
//! Implements [`CelebrationTarget`]. Turning `popped` on after it was off
//! rewinds the animation to frame 0; the host steps it with `advance()` once
//! per tick until `CONFETTI_FRAMES` is reached. `popped` stays on afterwards,
//! the way an attribute would, but nothing is drawn.
//!
//! Particle positions are a pure function of frame and area, so a repaint of
//! the same frame draws the same confetti.

use spark_signals::{signal, Signal};

use super::celebrate::CelebrationTarget;

/// Frames one burst lasts.
pub const CONFETTI_FRAMES: u32 = 40;

/// Particles per burst.
const PARTICLE_COUNT: u32 = 28;

const GLYPHS: [char; 5] = ['*', '+', '•', '✦', '·'];

/// One piece of confetti, relative to the container's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub x: u16,
    pub y: u16,
    pub glyph: char,
    /// Palette slot, 0..4. The painter maps it to theme colors.
    pub color: u8,
}

/// The confetti effect host.
#[derive(Clone)]
pub struct ConfettiContainer {
    popped: Signal<bool>,
    frame: Signal<u32>,
    bursts: Signal<u32>,
}

impl ConfettiContainer {
    /// Element id the component looks the container up by.
    pub const ID: &'static str = "confetti";

    pub fn new() -> Self {
        Self {
            popped: signal(false),
            frame: signal(CONFETTI_FRAMES),
            bursts: signal(0),
        }
    }

    /// Current frame while a burst is playing, `None` otherwise.
    ///
    /// Tracked inside deriveds, so the frame derived repaints as it advances.
    pub fn active_frame(&self) -> Option<u32> {
        let frame = self.frame.get();
        if self.popped.get() && frame < CONFETTI_FRAMES {
            Some(frame)
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_frame().is_some()
    }

    /// Step the animation. Returns false once there is nothing to play.
    pub fn advance(&self) -> bool {
        match self.active_frame() {
            Some(frame) => {
                self.frame.set(frame + 1);
                true
            }
            None => false,
        }
    }

    /// How many times the burst has been (re)started.
    pub fn bursts(&self) -> u32 {
        self.bursts.get()
    }
}

impl Default for ConfettiContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl CelebrationTarget for ConfettiContainer {
    fn set_popped(&self, popped: bool) {
        let was = self.popped.get();
        if popped && !was {
            self.frame.set(0);
            self.bursts.set(self.bursts.get() + 1);
            tracing::debug!(burst = self.bursts.get(), "confetti popped");
        }
        self.popped.set(popped);
    }

    fn is_popped(&self) -> bool {
        self.popped.get()
    }
}

/// Particles visible at `frame` inside a `width` x `height` area.
pub fn particles(frame: u32, width: u16, height: u16) -> Vec<Particle> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(PARTICLE_COUNT as usize);
    for i in 0..PARTICLE_COUNT {
        let h = mix(i.wrapping_add(1).wrapping_mul(0x9E37_79B9));

        // 1..=3 rows every 3 frames, starting up to 5 rows above the top
        let speed = 1 + (h >> 8) % 3;
        let lead = ((h >> 12) % 6) as i64;
        let y = (frame * speed / 3) as i64 - lead;
        if y < 0 || y >= height as i64 {
            continue;
        }

        // Sideways drift of -1, 0, +1
        let drift = ((frame + i) / 6 % 3) as i64 - 1;
        let x = ((h % width as u32) as i64 + drift).clamp(0, width as i64 - 1);

        out.push(Particle {
            x: x as u16,
            y: y as u16,
            glyph: GLYPHS[((h >> 16) % GLYPHS.len() as u32) as usize],
            color: ((h >> 20) % 4) as u8,
        });
    }
    out
}

/// Integer hash (xorshift-multiply).
fn mix(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

// =============================================================================
// TESTS
// =============================================================================
