//! Scroll bars owned by scrollable containers.

use trellis_core::{
    ContainmentOwner, KernelError, Result, Style, Widget, WidgetBehavior, WidgetKind,
};

#[derive(Debug)]
struct ScrollBarBehavior {
    minimum: i32,
    maximum: i32,
    selection: i32,
    thumb: i32,
}

impl ScrollBarBehavior {
    /// Highest selectable value. Computed in `i64` so extreme ranges cannot
    /// overflow.
    fn upper(&self) -> i32 {
        let upper = (i64::from(self.maximum) - i64::from(self.thumb)).max(i64::from(self.minimum));
        i32::try_from(upper).unwrap_or(self.maximum)
    }
}

impl Default for ScrollBarBehavior {
    fn default() -> Self {
        Self {
            minimum: 0,
            maximum: 100,
            selection: 0,
            thumb: 10,
        }
    }
}

impl ContainmentOwner for ScrollBarBehavior {}

impl WidgetBehavior for ScrollBarBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ScrollBar
    }

    fn style_groups(&self) -> &'static [&'static [Style]] {
        &[Style::ORIENTATION]
    }
}

widget_handle!(
    /// A scroll bar. Scroll bars are never created directly: a container
    /// built with `H_SCROLL` or `V_SCROLL` owns them.
    ScrollBar
);

impl ScrollBar {
    pub(crate) fn create(owner: &Widget, orientation: Style) -> Result<Self> {
        Widget::new_owned(owner, ScrollBarBehavior::default(), orientation).map(Self::from_widget)
    }

    pub fn is_horizontal(&self) -> Result<bool> {
        Ok(self.widget.effective_style()?.contains(Style::HORIZONTAL))
    }

    pub fn selection(&self) -> Result<i32> {
        self.widget.with_behavior(|b: &mut ScrollBarBehavior| b.selection)
    }

    /// Set the selection, clamped to `[minimum, maximum - thumb]`.
    pub fn set_selection(&self, value: i32) -> Result<()> {
        self.widget.with_behavior(|b: &mut ScrollBarBehavior| {
            b.selection = value.clamp(b.minimum, b.upper());
        })?;
        self.widget.mark_dirty()
    }

    pub fn range(&self) -> Result<(i32, i32)> {
        self.widget
            .with_behavior(|b: &mut ScrollBarBehavior| (b.minimum, b.maximum))
    }

    /// Set the range. Fails when `minimum >= maximum`.
    pub fn set_range(&self, minimum: i32, maximum: i32) -> Result<()> {
        if minimum >= maximum {
            return Err(KernelError::InvalidArgument("scroll bar minimum must be below maximum"));
        }
        self.widget.with_behavior(|b: &mut ScrollBarBehavior| {
            b.minimum = minimum;
            b.maximum = maximum;
            let span = i64::from(maximum) - i64::from(minimum);
            b.thumb = i32::try_from(span).map_or(b.thumb, |span| b.thumb.min(span));
            b.selection = b.selection.clamp(b.minimum, b.upper());
        })?;
        self.widget.mark_dirty()
    }
}

/// The horizontal and vertical scroll bar slots of a scrollable container.
#[derive(Debug, Default)]
pub(crate) struct ScrollSlots {
    horizontal: Option<Widget>,
    vertical: Option<Widget>,
}

impl ScrollSlots {
    pub(crate) fn check_adopt(&self, kind: WidgetKind, style: Style) -> Result<()> {
        if kind != WidgetKind::ScrollBar {
            return Err(KernelError::InvalidArgument("widget does not own this kind"));
        }
        let slot = if style.contains(Style::HORIZONTAL) {
            &self.horizontal
        } else {
            &self.vertical
        };
        match slot {
            Some(_) => Err(KernelError::InvalidArgument("scroll bar already exists")),
            None => Ok(()),
        }
    }

    pub(crate) fn adopt(&mut self, bar: Widget) {
        let horizontal = bar
            .effective_style()
            .is_ok_and(|style| style.contains(Style::HORIZONTAL));
        if horizontal {
            self.horizontal = Some(bar);
        } else {
            self.vertical = Some(bar);
        }
    }

    pub(crate) fn horizontal(&self) -> Option<ScrollBar> {
        self.horizontal.clone().map(ScrollBar::from_widget)
    }

    pub(crate) fn vertical(&self) -> Option<ScrollBar> {
        self.vertical.clone().map(ScrollBar::from_widget)
    }

    pub(crate) fn owned(&self) -> Vec<Widget> {
        self.horizontal.iter().chain(&self.vertical).cloned().collect()
    }

    pub(crate) fn detach(&mut self, widget: &Widget) -> bool {
        for slot in [&mut self.horizontal, &mut self.vertical] {
            if slot.as_ref() == Some(widget) {
                *slot = None;
                return true;
            }
        }
        false
    }

    pub(crate) fn release(&mut self) -> Vec<Widget> {
        self.horizontal.take().into_iter().chain(self.vertical.take()).collect()
    }
}

/// Create the scroll bars `style` asks for.
pub(crate) fn create_scroll_bars(owner: &Widget, style: Style) -> Result<()> {
    if style.contains(Style::H_SCROLL) {
        ScrollBar::create(owner, Style::HORIZONTAL)?;
    }
    if style.contains(Style::V_SCROLL) {
        ScrollBar::create(owner, Style::VERTICAL)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Composite, Shell};
    use trellis_core::Display;

    fn vertical_bar(display: &Display) -> ScrollBar {
        let shell = Shell::new(display, Style::NONE).unwrap();
        let composite = Composite::new(&shell, Style::V_SCROLL).unwrap();
        composite.vertical_bar().unwrap().unwrap()
    }

    #[test]
    fn test_extreme_range_does_not_overflow() {
        let display = Display::new();
        let bar = vertical_bar(&display);

        bar.set_range(i32::MIN, i32::MAX).unwrap();
        assert_eq!(bar.range().unwrap(), (i32::MIN, i32::MAX));

        bar.set_selection(i32::MAX).unwrap();
        assert_eq!(bar.selection().unwrap(), i32::MAX - 10);
        bar.set_selection(i32::MIN).unwrap();
        assert_eq!(bar.selection().unwrap(), i32::MIN);
    }

    #[test]
    fn test_narrow_range_shrinks_thumb() {
        let display = Display::new();
        let bar = vertical_bar(&display);

        bar.set_selection(50).unwrap();
        bar.set_range(0, 4).unwrap();
        assert_eq!(bar.selection().unwrap(), 0);
        bar.set_selection(3).unwrap();
        assert_eq!(bar.selection().unwrap(), 0);

        assert!(bar.set_range(5, 5).unwrap_err().is_invalid_argument());
        assert_eq!(bar.range().unwrap(), (0, 4));
    }
}
