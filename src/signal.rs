//! Signal catalog: the four colored pads and the tone each one plays.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Signal {
    Red,
    Green,
    Yellow,
    Purple,
}

impl Signal {
    pub const COUNT: usize = 4;

    /// Catalog order. Random draws index into this.
    pub const ALL: [Signal; Signal::COUNT] =
        [Signal::Red, Signal::Green, Signal::Yellow, Signal::Purple];

    pub fn from_index(idx: usize) -> Option<Signal> {
        Self::ALL.get(idx).copied()
    }

    /// DOM id of the pad element for this signal.
    pub fn id(self) -> &'static str {
        match self {
            Signal::Red => "red",
            Signal::Green => "green",
            Signal::Yellow => "yellow",
            Signal::Purple => "purple",
        }
    }

    /// Playback frequency in Hz (E4, C4, G4, C5).
    pub fn tone_hz(self) -> f32 {
        match self {
            Signal::Red => 329.63,
            Signal::Green => 261.63,
            Signal::Yellow => 392.0,
            Signal::Purple => 523.25,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Signal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|sig| sig.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownSignal(s.to_string()))
    }
}
