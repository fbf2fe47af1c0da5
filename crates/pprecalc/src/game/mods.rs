use std::fmt;

use serde::{Deserialize, Serialize};

/// Gameplay modifier bit-field as stored in the `mods` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mods(u32);

impl Mods {
    pub const NOMOD: Mods = Mods(0);
    pub const NOFAIL: Mods = Mods(1 << 0);
    pub const EASY: Mods = Mods(1 << 1);
    pub const TOUCHSCREEN: Mods = Mods(1 << 2);
    pub const HIDDEN: Mods = Mods(1 << 3);
    pub const HARDROCK: Mods = Mods(1 << 4);
    pub const SUDDENDEATH: Mods = Mods(1 << 5);
    pub const DOUBLETIME: Mods = Mods(1 << 6);
    pub const RELAX: Mods = Mods(1 << 7);
    pub const HALFTIME: Mods = Mods(1 << 8);
    pub const NIGHTCORE: Mods = Mods(1 << 9);
    pub const FLASHLIGHT: Mods = Mods(1 << 10);
    pub const AUTOPLAY: Mods = Mods(1 << 11);
    pub const SPUNOUT: Mods = Mods(1 << 12);
    pub const AUTOPILOT: Mods = Mods(1 << 13);
    pub const PERFECT: Mods = Mods(1 << 14);
    pub const KEY4: Mods = Mods(1 << 15);
    pub const KEY5: Mods = Mods(1 << 16);
    pub const KEY6: Mods = Mods(1 << 17);
    pub const KEY7: Mods = Mods(1 << 18);
    pub const KEY8: Mods = Mods(1 << 19);
    pub const FADEIN: Mods = Mods(1 << 20);
    pub const RANDOM: Mods = Mods(1 << 21);
    pub const CINEMA: Mods = Mods(1 << 22);
    pub const TARGET: Mods = Mods(1 << 23);
    pub const KEY9: Mods = Mods(1 << 24);
    pub const KEYCOOP: Mods = Mods(1 << 25);
    pub const KEY1: Mods = Mods(1 << 26);
    pub const KEY3: Mods = Mods(1 << 27);
    pub const KEY2: Mods = Mods(1 << 28);
    pub const SCOREV2: Mods = Mods(1 << 29);

    /// Flags the compute engine understands, in rendering order.
    const READABLE: [(Mods, &'static str); 11] = [
        (Mods::NOFAIL, "NF"),
        (Mods::EASY, "EZ"),
        (Mods::HIDDEN, "HD"),
        (Mods::HARDROCK, "HR"),
        (Mods::DOUBLETIME, "DT"),
        (Mods::NIGHTCORE, "NC"),
        (Mods::HALFTIME, "HT"),
        (Mods::FLASHLIGHT, "FL"),
        (Mods::SPUNOUT, "SO"),
        (Mods::TOUCHSCREEN, "TD"),
        (Mods::RELAX, "RX"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Build from a database integer; bits above 31 are dropped.
    pub fn from_db(value: i64) -> Self {
        Self(value as u32)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: Mods) -> bool {
        self.0 & other.0 != 0
    }

    /// Two-letter tokens for every recognised flag, concatenated.
    ///
    /// Returns `None` when no bit is set at all. A non-zero field with no
    /// recognised flag yields `Some("")`.
    pub fn readable(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        Some(
            Self::READABLE
                .iter()
                .filter(|(flag, _)| self.contains(*flag))
                .map(|(_, token)| *token)
                .collect(),
        )
    }
}

impl std::ops::BitOr for Mods {
    type Output = Mods;

    fn bitor(self, rhs: Mods) -> Mods {
        Mods(self.0 | rhs.0)
    }
}

impl From<u32> for Mods {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Mods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.readable() {
            None => f.write_str("NM"),
            Some(tokens) if tokens.is_empty() => write!(f, "?{}", self.0),
            Some(tokens) => f.write_str(&tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_doubletime() {
        assert_eq!(Mods::from_bits(72).readable().as_deref(), Some("HDDT"));
        assert_eq!(Mods::HIDDEN | Mods::DOUBLETIME, Mods::from_bits(72));
    }

    #[test]
    fn test_nomod_is_absent() {
        assert_eq!(Mods::NOMOD.readable(), None);
        assert_eq!(Mods::NOMOD.to_string(), "NM");
    }

    #[test]
    fn test_unrecognised_bits_render_empty() {
        let mods = Mods::KEY4 | Mods::SCOREV2 | Mods::PERFECT;
        assert_eq!(mods.readable().as_deref(), Some(""));
        assert_ne!(mods.readable(), Mods::NOMOD.readable());
    }

    #[test]
    fn test_order_is_fixed() {
        // Relax is bit 7 but renders last; touchscreen is bit 2 but renders after SO
        let mods = Mods::RELAX | Mods::TOUCHSCREEN | Mods::SPUNOUT | Mods::NOFAIL;
        assert_eq!(mods.readable().as_deref(), Some("NFSOTDRX"));
    }

    #[test]
    fn test_nightcore_keeps_doubletime() {
        let mods = Mods::DOUBLETIME | Mods::NIGHTCORE | Mods::HARDROCK;
        assert_eq!(mods.readable().as_deref(), Some("HRDTNC"));
    }

    #[test]
    fn test_all_recognised() {
        assert_eq!(
            Mods::from_bits(u32::MAX).readable().as_deref(),
            Some("NFEZHDHRDTNCHTFLSOTDRX")
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        for bits in (0..=u16::MAX as u32).step_by(7).chain([u32::MAX, 1 << 31]) {
            let mods = Mods::from_bits(bits);
            assert_eq!(mods.readable(), mods.readable());
            if let Some(tokens) = mods.readable() {
                assert_eq!(tokens.len() % 2, 0);
            }
        }
    }

    #[test]
    fn test_from_db_truncates() {
        assert_eq!(Mods::from_db(72).bits(), 72);
        assert_eq!(Mods::from_db((1 << 32) | 8).bits(), 8);
    }
}
