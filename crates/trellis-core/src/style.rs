//! Style bits and exclusivity-group canonicalization.
//!
//! A widget is constructed with a requested [`Style`]. Some flags are
//! mutually exclusive (a button is a push button *or* a check box, never
//! both), so each widget kind declares its exclusivity groups and the kernel
//! reduces the requested style with [`canonicalize`] once per group. The
//! result, possibly adjusted further by platform-forced bits, is the
//! widget's effective style.
//!
//! ```
//! use trellis_core::style::{canonicalize, Style};
//!
//! let requested = Style::CHECK | Style::RADIO | Style::BORDER;
//! let effective = canonicalize(requested, Style::BUTTON_KIND);
//! assert_eq!(effective, Style::CHECK | Style::BORDER);
//! ```

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Maximum number of flags in one exclusivity group.
pub const MAX_GROUP_LEN: usize = 6;

/// A bit mask of requested or effective widget configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style(u32);

impl Style {
    /// No style bits.
    pub const NONE: Style = Style(0);

    pub const TOGGLE: Style = Style(1 << 0);
    pub const ARROW: Style = Style(1 << 1);
    pub const PUSH: Style = Style(1 << 2);
    pub const RADIO: Style = Style(1 << 3);
    pub const CHECK: Style = Style(1 << 4);
    pub const SEPARATOR: Style = Style(1 << 5);
    pub const DROP_DOWN: Style = Style(1 << 6);

    pub const LEFT: Style = Style(1 << 7);
    pub const RIGHT: Style = Style(1 << 8);
    pub const CENTER: Style = Style(1 << 9);
    pub const UP: Style = Style(1 << 10);
    pub const DOWN: Style = Style(1 << 11);

    pub const HORIZONTAL: Style = Style(1 << 12);
    pub const VERTICAL: Style = Style(1 << 13);
    /// Request a horizontal scroll bar on a scrollable container.
    pub const H_SCROLL: Style = Style(1 << 14);
    /// Request a vertical scroll bar on a scrollable container.
    pub const V_SCROLL: Style = Style(1 << 15);

    pub const TOP: Style = Style(1 << 16);
    pub const BOTTOM: Style = Style(1 << 17);

    pub const BORDER: Style = Style(1 << 18);
    pub const FLAT: Style = Style(1 << 19);
    pub const WRAP: Style = Style(1 << 20);
    pub const NO_FOCUS: Style = Style(1 << 21);
    pub const READ_ONLY: Style = Style(1 << 22);

    pub const LEFT_TO_RIGHT: Style = Style(1 << 25);
    pub const RIGHT_TO_LEFT: Style = Style(1 << 26);

    /// Button kinds.
    pub const BUTTON_KIND: &'static [Style] =
        &[Self::PUSH, Self::ARROW, Self::CHECK, Self::RADIO, Self::TOGGLE];
    /// Horizontal alignment.
    pub const ALIGNMENT: &'static [Style] = &[Self::LEFT, Self::RIGHT, Self::CENTER];
    /// Arrow direction, used by arrow buttons.
    pub const ARROW_DIRECTION: &'static [Style] = &[Self::UP, Self::DOWN, Self::LEFT, Self::RIGHT];
    pub const ORIENTATION: &'static [Style] = &[Self::HORIZONTAL, Self::VERTICAL];
    pub const TEXT_DIRECTION: &'static [Style] = &[Self::LEFT_TO_RIGHT, Self::RIGHT_TO_LEFT];
    pub const TAB_POSITION: &'static [Style] = &[Self::TOP, Self::BOTTOM];
    /// Tool item kinds.
    pub const ITEM_KIND: &'static [Style] =
        &[Self::PUSH, Self::CHECK, Self::RADIO, Self::SEPARATOR, Self::DROP_DOWN];

    /// Create a style from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Style(bits)
    }

    /// The raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check if no bits are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if every bit of `other` is set.
    pub const fn contains(self, other: Style) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any bit of `other` is set.
    pub const fn intersects(self, other: Style) -> bool {
        (self.0 & other.0) != 0
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Style) {
        self.0 |= other.0;
    }

    /// Clear the bits of `other`.
    pub fn remove(&mut self, other: Style) {
        self.0 &= !other.0;
    }
}

impl BitOr for Style {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Style(self.0 | rhs.0)
    }
}

impl BitOrAssign for Style {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Style {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Style(self.0 & rhs.0)
    }
}

impl Not for Style {
    type Output = Self;

    fn not(self) -> Self::Output {
        Style(!self.0)
    }
}

/// Reduce `style` so that at most one flag of `group` is set.
///
/// If `style` intersects none of the group, the first group flag is set. If
/// it intersects several, only the first matching flag in group order is
/// kept. Bits outside the group are preserved. Empty entries in `group` are
/// ignored. The function is pure and idempotent.
pub fn canonicalize(style: Style, group: &[Style]) -> Style {
    debug_assert!(
        group.len() <= MAX_GROUP_LEN,
        "exclusivity group has {} flags",
        group.len()
    );

    let mut flags = group.iter().copied().filter(|flag| !flag.is_empty());
    let mask = group.iter().fold(Style::NONE, |acc, flag| acc | *flag);

    let keep = flags
        .clone()
        .find(|flag| style.intersects(*flag))
        .or_else(|| flags.next());

    match keep {
        Some(flag) => Style((style.0 & !mask.0) | flag.0),
        None => style,
    }
}

/// Inherit the text direction of `parent` when `style` requests none.
///
/// A child that asks for neither direction takes the parent's. When the
/// parent has none either, left-to-right is used.
pub fn inherit_direction(style: Style, parent: Option<Style>) -> Style {
    let directions = Style::LEFT_TO_RIGHT | Style::RIGHT_TO_LEFT;
    if style.intersects(directions) {
        return style;
    }
    let inherited = parent
        .map(|p| p & directions)
        .filter(|d| !d.is_empty())
        .unwrap_or(Style::LEFT_TO_RIGHT);
    style | inherited
}
