//! Fixed-point XMR amounts.
//!
//! Pool balances arrive in piconero (1 XMR = 10^12 piconero). Amounts stay in
//! integer smallest-unit form everywhere in the daemon and only become a
//! decimal string at render time, so repeated renders never drift.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Piconero per XMR.
pub const PICONERO_PER_XMR: u64 = 1_000_000_000_000;

/// An amount in piconero, the smallest XMR unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Piconero(pub u64);

impl Piconero {
    pub const ZERO: Piconero = Piconero(0);

    pub fn from_raw(raw: u64) -> Self {
        Piconero(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Render as XMR with six decimal places, e.g. "3.000000".
    ///
    /// Integer math throughout: whole XMR and the first six fractional
    /// digits (micro-XMR) are computed separately.
    pub fn format_xmr(&self) -> String {
        let whole = self.0 / PICONERO_PER_XMR;
        let micro = (self.0 % PICONERO_PER_XMR) / 1_000_000;
        format!("{}.{:06}", whole, micro)
    }
}

impl fmt::Display for Piconero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} XMR", self.format_xmr())
    }
}
