//! Packed colors and per-step attenuation.
//!
//! Colors are `0x00RRGGBB`, the layout softbuffer presents. The top byte is
//! kept at zero so a packed value of 0 means every channel is black.

pub const BLACK: u32 = 0x000000;
pub const WHITE: u32 = 0xFFFFFF;

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

#[inline]
pub fn unpack_rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Subtract `amount` from every channel, saturating at 0.
pub fn darken(color: u32, amount: u8) -> u32 {
    let (r, g, b) = unpack_rgb(color);
    pack_rgb(
        r.saturating_sub(amount),
        g.saturating_sub(amount),
        b.saturating_sub(amount),
    )
}

/// Color state carried along a ray while it is marched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attenuation {
    color: u32,
    counter: u32,
    rate: u32,
}

impl Attenuation {
    /// `rate` is the number of steps per darkening; 0 is treated as 1.
    pub fn new(color: u32, rate: u32) -> Self {
        Self {
            color: color & WHITE,
            counter: 0,
            rate: rate.max(1),
        }
    }

    #[inline]
    pub fn color(&self) -> u32 {
        self.color
    }

    /// Count one step, darkening by one level every `rate` steps.
    #[inline]
    pub fn tick(&mut self) {
        self.counter += 1;
        if self.counter >= self.rate {
            self.color = darken(self.color, 1);
            self.counter = 0;
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.color == BLACK
    }
}
