//! Detection rows and the corpus-wide frame rate.
//!
//! A [`Detection`] is one bounding box at one frame, in source-video pixel
//! coordinates. [`FrameRate`] is the fixed rate used to map frames to
//! seconds; it is kept as an exact ratio so timeline binning never depends
//! on floating-point division.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// One detection box at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub frame: u64,
    pub box_index: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A detection as returned by the single-frame query (the frame is implied
/// by the request).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxView {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub box_index: u32,
}

impl From<&Detection> for BoxView {
    fn from(d: &Detection) -> Self {
        Self {
            x: d.x,
            y: d.y,
            width: d.width,
            height: d.height,
            box_index: d.box_index,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame rate
// ---------------------------------------------------------------------------

/// Frame rate used when none is configured.
pub const DEFAULT_FPS: FrameRate = FrameRate { num: 24, den: 1 };

/// Maximum number of fractional digits accepted in a decimal frame rate.
const MAX_FPS_DECIMALS: usize = 9;

/// An exact frame rate `num / den` frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    num: u64,
    den: u64,
}

impl FrameRate {
    /// Build a frame rate from a ratio, reduced to lowest terms.
    ///
    /// Returns `None` when either part is zero.
    pub fn new(num: u64, den: u64) -> Option<Self> {
        if num == 0 || den == 0 {
            return None;
        }
        let g = gcd(num, den);
        Some(Self {
            num: num / g,
            den: den / g,
        })
    }

    pub fn num(&self) -> u64 {
        self.num
    }

    pub fn den(&self) -> u64 {
        self.den
    }

    /// The rate as a float, for clients that seek by time.
    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Whole seconds elapsed at `frame`: `floor(frame / fps)`.
    ///
    /// Computed as `floor(frame * den / num)` in 128-bit integers.
    pub fn seconds_of(&self, frame: u64) -> u64 {
        let secs = u128::from(frame) * u128::from(self.den) / u128::from(self.num);
        u64::try_from(secs).unwrap_or(u64::MAX)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        DEFAULT_FPS
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for FrameRate {
    type Err = CoreError;

    /// Accepts `"24"`, `"23.976"`, or `"24000/1001"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CoreError::Validation(format!("invalid frame rate '{s}'"));

        let (num, den) = if let Some((n, d)) = s.split_once('/') {
            let n: u64 = n.trim().parse().map_err(|_| invalid())?;
            let d: u64 = d.trim().parse().map_err(|_| invalid())?;
            (n, d)
        } else if let Some((whole, frac)) = s.split_once('.') {
            if frac.is_empty()
                || frac.len() > MAX_FPS_DECIMALS
                || !frac.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(invalid());
            }
            let whole: u64 = if whole.is_empty() {
                0
            } else {
                whole.parse().map_err(|_| invalid())?
            };
            let frac_value: u64 = frac.parse().map_err(|_| invalid())?;
            let den = 10u64.pow(frac.len() as u32);
            let num = whole
                .checked_mul(den)
                .and_then(|v| v.checked_add(frac_value))
                .ok_or_else(invalid)?;
            (num, den)
        } else {
            (s.parse().map_err(|_| invalid())?, 1)
        };

        FrameRate::new(num, den).ok_or_else(invalid)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
