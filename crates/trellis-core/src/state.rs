//! Widget state flags.
//!
//! The low 16 bits hold lifecycle flags owned by the kernel. The high 16 bits
//! are feature flags, available to the kernel and to widget kinds alike, so
//! an extension can never collide with a lifecycle bit.

use std::fmt;
use std::ops::BitOr;

use static_assertions::const_assert;

/// Lifecycle and feature flags of a widget.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StateFlags(u32);

impl StateFlags {
    /// Bits reserved for lifecycle flags.
    pub const LIFECYCLE_MASK: u32 = 0x0000_FFFF;
    /// Bits available for feature flags.
    pub const FEATURE_MASK: u32 = 0xFFFF_0000;

    pub const NONE: StateFlags = StateFlags(0);

    /// Terminal flag. Never cleared once set.
    pub const DISPOSED: StateFlags = StateFlags(1 << 0);
    /// The dispose event has been sent.
    pub const DISPOSE_SENT: StateFlags = StateFlags(1 << 1);
    /// In-process buffers have been released.
    pub const RELEASED: StateFlags = StateFlags(1 << 2);
    /// The data slot is in its keyed representation.
    pub const KEYED_DATA: StateFlags = StateFlags(1 << 3);
    /// The peer hook has run and the widget is registered.
    pub const BUILT: StateFlags = StateFlags(1 << 4);
    /// Construction finished and dispose has not been requested.
    pub const ACTIVE: StateFlags = StateFlags(1 << 5);

    /// Check for subwindows when computing visibility.
    pub const CHECK_SUBWINDOW: StateFlags = StateFlags(1 << 16);
    /// A reskin has been requested and not yet delivered.
    pub const SKIN_NEEDED: StateFlags = StateFlags(1 << 17);
    /// A property changed since the last peer sync.
    pub const DIRTY: StateFlags = StateFlags(1 << 18);

    /// First feature bit free for widget kinds.
    const FIRST_EXTENSION_BIT: u32 = 24;

    /// A feature flag for widget kinds, `index` counting from the first bit
    /// the kernel leaves free. Returns `None` past the end of the range.
    pub const fn extension(index: u32) -> Option<StateFlags> {
        if index < 32 - Self::FIRST_EXTENSION_BIT {
            Some(StateFlags(1 << (Self::FIRST_EXTENSION_BIT + index)))
        } else {
            None
        }
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: StateFlags) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn intersects(self, other: StateFlags) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn insert(&mut self, other: StateFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: StateFlags) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: StateFlags, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// Only the lifecycle bits.
    pub const fn lifecycle(self) -> StateFlags {
        StateFlags(self.0 & Self::LIFECYCLE_MASK)
    }

    /// Only the feature bits.
    pub const fn features(self) -> StateFlags {
        StateFlags(self.0 & Self::FEATURE_MASK)
    }
}

const_assert!(StateFlags::LIFECYCLE_MASK & StateFlags::FEATURE_MASK == 0);
const_assert!(
    (StateFlags::DISPOSED.0
        | StateFlags::DISPOSE_SENT.0
        | StateFlags::RELEASED.0
        | StateFlags::KEYED_DATA.0
        | StateFlags::BUILT.0
        | StateFlags::ACTIVE.0)
        & !StateFlags::LIFECYCLE_MASK
        == 0
);
const_assert!(
    (StateFlags::CHECK_SUBWINDOW.0 | StateFlags::SKIN_NEEDED.0 | StateFlags::DIRTY.0)
        & !StateFlags::FEATURE_MASK
        == 0
);

impl BitOr for StateFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        StateFlags(self.0 | rhs.0)
    }
}

impl fmt::Debug for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(StateFlags, &str); 9] = [
            (StateFlags::DISPOSED, "DISPOSED"),
            (StateFlags::DISPOSE_SENT, "DISPOSE_SENT"),
            (StateFlags::RELEASED, "RELEASED"),
            (StateFlags::KEYED_DATA, "KEYED_DATA"),
            (StateFlags::BUILT, "BUILT"),
            (StateFlags::ACTIVE, "ACTIVE"),
            (StateFlags::CHECK_SUBWINDOW, "CHECK_SUBWINDOW"),
            (StateFlags::SKIN_NEEDED, "SKIN_NEEDED"),
            (StateFlags::DIRTY, "DIRTY"),
        ];
        let mut set = f.debug_set();
        let mut known = 0;
        for (flag, name) in NAMES {
            known |= flag.0;
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        let rest = self.0 & !known;
        if rest != 0 {
            set.entry(&format_args!("{rest:#x}"));
        }
        set.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let all = StateFlags::DISPOSED
            | StateFlags::ACTIVE
            | StateFlags::DIRTY
            | StateFlags::SKIN_NEEDED;
        assert_eq!(all.lifecycle(), StateFlags::DISPOSED | StateFlags::ACTIVE);
        assert_eq!(all.features(), StateFlags::DIRTY | StateFlags::SKIN_NEEDED);
    }

    #[test]
    fn test_extension_bits_are_features() {
        let first = StateFlags::extension(0).unwrap();
        let last = StateFlags::extension(7).unwrap();
        assert_eq!(first.lifecycle(), StateFlags::NONE);
        assert_eq!(last.bits(), 1 << 31);
        assert!(StateFlags::extension(8).is_none());
        assert!(!first.intersects(StateFlags::DIRTY | StateFlags::SKIN_NEEDED));
    }

    #[test]
    fn test_set_and_debug() {
        let mut flags = StateFlags::NONE;
        flags.set(StateFlags::ACTIVE, true);
        flags.set(StateFlags::DIRTY, true);
        flags.set(StateFlags::ACTIVE, false);
        assert_eq!(flags, StateFlags::DIRTY);
        assert_eq!(format!("{flags:?}"), "{DIRTY}");
    }
}
