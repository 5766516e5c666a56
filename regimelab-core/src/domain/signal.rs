//! Trading signal: long or flat.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Flat,
    Long,
}

impl Signal {
    /// Position size implied by the signal (0.0 or 1.0).
    pub fn position(self) -> f64 {
        match self {
            Signal::Flat => 0.0,
            Signal::Long => 1.0,
        }
    }

    pub fn is_long(self) -> bool {
        matches!(self, Signal::Long)
    }
}

impl From<bool> for Signal {
    fn from(long: bool) -> Self {
        if long {
            Signal::Long
        } else {
            Signal::Flat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_position() {
        assert_eq!(Signal::Long.position(), 1.0);
        assert_eq!(Signal::Flat.position(), 0.0);
        assert_eq!(Signal::from(true), Signal::Long);
        assert_eq!(Signal::from(false), Signal::Flat);
    }
}
