//! List box control.
//!
//! A scrollable list of string items with optional icons, checkmarks,
//! single or multiple selection, and optional key-ordered insertion. The
//! widget owns its [`ItemStore`] exclusively and mutates it synchronously
//! inside event handlers; repaint requests accumulate as exact invalidation
//! rectangles on the widget base.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::widgets::ListBox;
//!
//! let mut list = ListBox::new();
//! list.add_string("Apple").unwrap();
//! list.add_string("Banana").unwrap();
//!
//! list.selection_changed.connect(|&row| {
//!     println!("selected row {row}");
//! });
//! ```

use trellis_core::{Object, ObjectId, Signal};
use trellis_render::{
    CheckMark, Color, ItemImage, MonospaceMetrics, Point, Rect, TextMetrics, TextStyle,
};

use crate::error::{duplicate_text, ControlError, ControlResult};
use crate::model::{CheckState, ItemStore, ListBoxItemInfo, ListItem};
use crate::widget::{
    FocusPolicy, Key, KeyPressEvent, MouseButton, MouseMoveEvent, MousePressEvent,
    MouseReleaseEvent, PaintContext, ScrollBarPolicy, ScrollBarVisibility, ScrollCommand,
    ScrollInfo, SizeHint, SizePolicy, SizePolicyPair, Widget, WidgetBase, WidgetEvent,
};

/// Gap between the checkmark, image and text elements of an item row.
const INTER_IMAGE_TEXT: f32 = 2.0;

/// Inset subtracted from the item height to size the checkmark glyph.
const CHECKMARK_MIN_INSET: f32 = 6.0;

/// Construction-time style set of a [`ListBox`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ListBoxStyle {
    /// Emit owner notifications.
    pub notify: bool,
    /// Keep items in key order; positions passed to insertion are ignored.
    pub sort: bool,
    /// Multiple items may carry the selection mark.
    pub multiple_sel: bool,
    /// Render a tri-state checkmark before each item.
    pub checkbox: bool,
    /// Clicking the checkmark (or pressing Space) cycles the check state.
    pub auto_check: bool,
    /// Render the per-item image handle before the text.
    pub use_icon: bool,
    /// Selection follows the mouse while it moves over the list.
    pub mouse_follow: bool,
    /// Keep the vertical scrollbar visible even when nothing overflows.
    pub scrollbar_always: bool,
}

/// Per-state colors used by the render dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListBoxPalette {
    /// Item background at rest.
    pub normal_bg: Color,
    /// Item text at rest.
    pub normal_fg: Color,
    /// Selected item background.
    pub hilite_bg: Color,
    /// Selected item text.
    pub hilite_fg: Color,
    /// Disabled item background.
    pub disabled_bg: Color,
    /// Disabled item text.
    pub disabled_fg: Color,
    /// Significant item background.
    pub significant_bg: Color,
    /// Significant item text.
    pub significant_fg: Color,
    /// Checkmark and focus frame color.
    pub mark_fg: Color,
}

impl Default for ListBoxPalette {
    fn default() -> Self {
        Self {
            normal_bg: Color::WHITE,
            normal_fg: Color::BLACK,
            hilite_bg: Color::from_rgb8(51, 153, 255),
            hilite_fg: Color::WHITE,
            disabled_bg: Color::from_rgb8(240, 240, 240),
            disabled_fg: Color::from_rgb8(160, 160, 160),
            significant_bg: Color::from_rgb8(255, 240, 200),
            significant_fg: Color::BLACK,
            mark_fg: Color::from_rgb8(100, 100, 100),
        }
    }
}

/// Multi-selection membership operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOp {
    /// Set the selection mark.
    Set,
    /// Clear the selection mark.
    Clear,
    /// Flip the selection mark.
    Toggle,
}

/// A scrollable, optionally multi-selectable, optionally sorted list of
/// string items.
///
/// # Signals
///
/// All signals are gated by the `notify` style.
///
/// - `selection_changed(usize)`: the selection moved to a new row
/// - `clicked(usize)`: a row was clicked (outside the checkmark hot zone)
/// - `double_clicked(())`: a row was double-clicked
/// - `enter_pressed(())`: Enter was pressed with the list focused
/// - `selection_cancelled(())`: the selection was cancelled
/// - `checkmark_clicked(usize)`: the checkmark hot zone was clicked
/// - `focus_gained(())` / `focus_lost(())`: keyboard focus changes
/// - `space_exhausted(())`: an insertion failed for lack of memory
pub struct ListBox {
    /// Widget base.
    base: WidgetBase,

    /// Style set, fixed at construction.
    style: ListBoxStyle,

    /// The items.
    store: ItemStore,

    /// Index of the first visible item.
    item_top: usize,
    /// Number of fully visible items, derived from the client height.
    item_visibles: usize,
    /// Height of one item row.
    item_height: f32,
    /// Horizontal scroll offset in pixels.
    item_left: f32,
    /// Visible width, derived from the client width.
    item_width: f32,
    /// Width of the widest item.
    item_max_width: f32,

    /// Caret position, independent of the selection marks.
    highlighted: Option<usize>,
    /// Selection the owner saw last; only used with the mouse-follow style.
    sel_item: Option<usize>,

    /// Scrollbar presentation policy.
    sb_policy: ScrollBarPolicy,

    /// Layout-time text measurement.
    metrics: Box<dyn TextMetrics>,

    /// Colors handed to the renderer.
    palette: ListBoxPalette,

    /// Signal emitted when the selection moves to a new row.
    pub selection_changed: Signal<usize>,
    /// Signal emitted when a row is clicked.
    pub clicked: Signal<usize>,
    /// Signal emitted when a row is double-clicked.
    pub double_clicked: Signal<()>,
    /// Signal emitted when Enter is pressed.
    pub enter_pressed: Signal<()>,
    /// Signal emitted when the selection is cancelled.
    pub selection_cancelled: Signal<()>,
    /// Signal emitted when the checkmark hot zone is clicked.
    pub checkmark_clicked: Signal<usize>,
    /// Signal emitted when the widget gains focus.
    pub focus_gained: Signal<()>,
    /// Signal emitted when the widget loses focus.
    pub focus_lost: Signal<()>,
    /// Signal emitted when an insertion fails for lack of memory.
    pub space_exhausted: Signal<()>,
}

impl ListBox {
    /// Create a list box with the default style set.
    pub fn new() -> Self {
        Self::with_style(ListBoxStyle::default())
    }

    /// Create a list box with an explicit style set.
    pub fn with_style(style: ListBoxStyle) -> Self {
        let mut base = WidgetBase::new::<Self>();
        base.set_focus_policy(FocusPolicy::StrongFocus);
        base.set_size_policy(SizePolicyPair::new(
            SizePolicy::Expanding,
            SizePolicy::Expanding,
        ));

        let metrics: Box<dyn TextMetrics> = Box::new(MonospaceMetrics::default());
        let sb_policy = if style.scrollbar_always {
            ScrollBarPolicy::Always
        } else {
            ScrollBarPolicy::Automatic
        };

        Self {
            base,
            style,
            store: ItemStore::new(style.sort),
            item_top: 0,
            item_visibles: 0,
            item_height: metrics.line_height(),
            item_left: 0.0,
            item_width: 0.0,
            item_max_width: 0.0,
            highlighted: None,
            sel_item: None,
            sb_policy,
            metrics,
            palette: ListBoxPalette::default(),
            selection_changed: Signal::new(),
            clicked: Signal::new(),
            double_clicked: Signal::new(),
            enter_pressed: Signal::new(),
            selection_cancelled: Signal::new(),
            checkmark_clicked: Signal::new(),
            focus_gained: Signal::new(),
            focus_lost: Signal::new(),
            space_exhausted: Signal::new(),
        }
    }

    /// Inject the host's text metrics (builder pattern).
    pub fn with_metrics(mut self, metrics: Box<dyn TextMetrics>) -> Self {
        self.item_height = self.item_height.max(metrics.line_height());
        self.metrics = metrics;
        self
    }

    /// The style set this list box was created with.
    pub fn style(&self) -> ListBoxStyle {
        self.style
    }

    /// The palette handed to the renderer.
    pub fn palette(&self) -> ListBoxPalette {
        self.palette
    }

    /// Replace the palette.
    pub fn set_palette(&mut self, palette: ListBoxPalette) {
        if self.palette != palette {
            self.palette = palette;
            self.base.invalidate_all();
        }
    }

    /// Swap in new text metrics, e.g. after a host font change.
    ///
    /// Re-clamps the item height to the new line height, recomputes the
    /// viewport and the horizontal extent, and repaints everything.
    pub fn set_text_metrics(&mut self, metrics: Box<dyn TextMetrics>) {
        self.metrics = metrics;
        if self.item_height < self.metrics.line_height() {
            self.item_height = self.metrics.line_height();
        }
        self.calc_params();
        self.item_max_width = self.max_display_width();
        self.base.invalidate_all();
    }

    /// Replace the key comparator; fails once items exist.
    pub fn set_comparator(
        &mut self,
        comparator: Box<dyn crate::model::KeyComparator>,
    ) -> ControlResult<()> {
        self.store.set_comparator(comparator)
    }

    /// The scrollbar presentation policy.
    pub fn scrollbar_policy(&self) -> ScrollBarPolicy {
        self.sb_policy
    }

    /// Set the scrollbar presentation policy.
    pub fn set_scrollbar_policy(&mut self, policy: ScrollBarPolicy) {
        self.sb_policy = policy;
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Append a string item (or place it in key order when sorted).
    ///
    /// Returns the resulting 0-based position.
    pub fn add_string(&mut self, text: &str) -> ControlResult<usize> {
        if text.is_empty() {
            return Err(ControlError::InvalidArgument);
        }
        let key = duplicate_text(text).map_err(|e| self.report_space_exhausted(e))?;
        self.insert_entry(ListItem::new(key), None)
    }

    /// Insert a string item at `position`; `None` appends.
    pub fn insert_string(&mut self, position: Option<usize>, text: &str) -> ControlResult<usize> {
        if text.is_empty() {
            return Err(ControlError::InvalidArgument);
        }
        let key = duplicate_text(text).map_err(|e| self.report_space_exhausted(e))?;
        self.insert_entry(ListItem::new(key), position)
    }

    /// Append an item described by a full info record.
    ///
    /// Only meaningful for checkbox- or icon-style lists.
    pub fn add_item(&mut self, info: &ListBoxItemInfo) -> ControlResult<usize> {
        self.insert_item(None, info)
    }

    /// Insert an info-record item at `position`; `None` appends.
    pub fn insert_item(
        &mut self,
        position: Option<usize>,
        info: &ListBoxItemInfo,
    ) -> ControlResult<usize> {
        if !self.style.checkbox && !self.style.use_icon {
            return Err(ControlError::InvalidArgument);
        }
        let item = self.item_from_info(info)?;
        self.insert_entry(item, position)
    }

    /// Append a batch of string items, stopping at the first empty string.
    ///
    /// Returns the position of the last item added. Sorted stores place each
    /// item in key order.
    pub fn add_strings(&mut self, texts: &[&str]) -> ControlResult<usize> {
        let start = self.store.len();
        let mut last = None;
        for text in texts {
            if text.is_empty() {
                break;
            }
            let key = duplicate_text(text).map_err(|e| self.report_space_exhausted(e))?;
            let item = ListItem::new(key);
            let width = self.item_display_width(&item);
            let pos = self
                .store
                .insert(item, None)
                .map_err(|e| self.report_space_exhausted(e))?;
            if width > self.item_max_width {
                self.item_max_width = width;
            }
            last = Some(pos);
        }

        let last = last.ok_or(ControlError::InvalidArgument)?;
        self.invalidate_item_run(start, last);
        Ok(last)
    }

    /// Delete the item at `index`.
    pub fn delete_string(&mut self, index: usize) -> ControlResult<()> {
        let removed = self
            .store
            .remove(index)
            .ok_or(ControlError::InvalidArgument)?;

        let removed_width = self.item_display_width(&removed);
        if removed_width >= self.item_max_width {
            self.item_max_width = self.max_display_width();
        }

        let count = self.store.len();
        if self.item_top != 0 && count <= self.item_visibles {
            self.item_top = 0;
            self.base.invalidate_all();
        } else {
            self.invalidate_from_item(index);
            if index <= self.item_top {
                self.item_top = self.item_top.saturating_sub(1);
            }
        }

        self.highlighted = if count == 0 {
            None
        } else {
            let h = self.highlighted.map_or(self.item_top, |h| h);
            let h = h.min(count - 1).max(self.item_top).min(self.item_bottom());
            Some(h.min(count - 1))
        };
        self.sel_item = self.highlighted;
        Ok(())
    }

    /// Remove every item and rewind the view.
    pub fn reset_content(&mut self) {
        self.store.reset();
        self.item_left = 0.0;
        self.item_max_width = 0.0;
        self.item_top = 0;
        self.highlighted = None;
        self.sel_item = None;
        self.base.invalidate_all();
    }

    // =========================================================================
    // Query
    // =========================================================================

    /// Number of items.
    pub fn count(&self) -> usize {
        self.store.len()
    }

    /// The text of the item at `index`.
    pub fn text(&self, index: usize) -> ControlResult<&str> {
        self.store
            .get(index)
            .map(|i| i.text())
            .ok_or(ControlError::InvalidArgument)
    }

    /// Byte length of the text at `index`.
    pub fn text_len(&self, index: usize) -> ControlResult<usize> {
        self.text(index).map(str::len)
    }

    /// Replace the text of the item at `index`.
    pub fn set_text(&mut self, index: usize, text: &str) -> ControlResult<()> {
        let key = duplicate_text(text).map_err(|e| self.report_space_exhausted(e))?;
        let old_width = {
            let item = self
                .store
                .get(index)
                .ok_or(ControlError::InvalidArgument)?;
            self.item_display_width(item)
        };

        self.store
            .get_mut(index)
            .ok_or(ControlError::InvalidArgument)?
            .set_text(key);

        let new_width = {
            let item = self.store.get(index).ok_or(ControlError::InvalidArgument)?;
            self.item_display_width(item)
        };
        if new_width >= self.item_max_width {
            self.item_max_width = new_width;
        } else if old_width >= self.item_max_width {
            // The widest item just shrank.
            self.item_max_width = self.max_display_width();
        }

        self.invalidate_item(index);
        Ok(())
    }

    /// Linear prefix search from `start`, wrapping `start` to 0 when past
    /// the end.
    pub fn find_string(&self, start: usize, text: &str) -> ControlResult<usize> {
        self.store.find(start, text, false)
    }

    /// Linear exact search from `start`.
    pub fn find_string_exact(&self, start: usize, text: &str) -> ControlResult<usize> {
        self.store.find(start, text, true)
    }

    /// Read the info record of the item at `index`.
    ///
    /// Only meaningful for checkbox- or icon-style lists.
    pub fn item_data(&self, index: usize) -> ControlResult<ListBoxItemInfo> {
        if !self.style.checkbox && !self.style.use_icon {
            return Err(ControlError::InvalidArgument);
        }
        let item = self.store.get(index).ok_or(ControlError::InvalidArgument)?;
        Ok(ListBoxItemInfo {
            text: item.text().to_string(),
            check: item.check(),
            image: item.image(),
            significant: item.flags().significant,
        })
    }

    /// Update the item at `index` from an info record.
    ///
    /// An empty `info.text` leaves the existing text in place.
    pub fn set_item_data(&mut self, index: usize, info: &ListBoxItemInfo) -> ControlResult<()> {
        if !self.style.checkbox && !self.style.use_icon {
            return Err(ControlError::InvalidArgument);
        }
        if self.store.get(index).is_none() {
            return Err(ControlError::InvalidArgument);
        }

        let new_text = if info.text.is_empty() {
            None
        } else {
            Some(duplicate_text(&info.text).map_err(|e| self.report_space_exhausted(e))?)
        };

        let use_icon = self.style.use_icon;
        let item = self.store.get_mut(index).ok_or(ControlError::InvalidArgument)?;
        item.set_check(info.check);
        item.flags_mut().significant = info.significant;
        item.set_image(if use_icon { info.image } else { None });
        if let Some(text) = new_text {
            item.set_text(text);
        }

        self.invalidate_item(index);
        Ok(())
    }

    /// The opaque application value of the item at `index`.
    pub fn user_data(&self, index: usize) -> ControlResult<u64> {
        self.store
            .get(index)
            .map(ListItem::user_data)
            .ok_or(ControlError::InvalidArgument)
    }

    /// Attach an opaque application value to the item at `index`.
    pub fn set_user_data(&mut self, index: usize, data: u64) -> ControlResult<()> {
        self.store
            .get_mut(index)
            .map(|i| i.set_user_data(data))
            .ok_or(ControlError::InvalidArgument)
    }

    /// The check state of the item at `index` (checkbox style only).
    pub fn check_mark(&self, index: usize) -> ControlResult<CheckState> {
        if !self.style.checkbox {
            return Err(ControlError::InvalidArgument);
        }
        self.store
            .get(index)
            .map(ListItem::check)
            .ok_or(ControlError::InvalidArgument)
    }

    /// Set the check state of the item at `index` (checkbox style only).
    pub fn set_check_mark(&mut self, index: usize, state: CheckState) -> ControlResult<()> {
        if !self.style.checkbox {
            return Err(ControlError::InvalidArgument);
        }
        self.store
            .get_mut(index)
            .map(|i| i.set_check(state))
            .ok_or(ControlError::InvalidArgument)?;
        self.invalidate_item(index);
        Ok(())
    }

    /// Whether the item at `index` is disabled.
    pub fn is_item_disabled(&self, index: usize) -> ControlResult<bool> {
        self.store
            .get(index)
            .map(|i| i.flags().disabled)
            .ok_or(ControlError::InvalidArgument)
    }

    /// Enable or disable the item at `index`.
    pub fn set_item_disabled(&mut self, index: usize, disabled: bool) -> ControlResult<()> {
        self.store
            .get_mut(index)
            .map(|i| i.flags_mut().disabled = disabled)
            .ok_or(ControlError::InvalidArgument)?;
        self.invalidate_from_item(index);
        Ok(())
    }

    /// Render the item at `index` bold or regular.
    pub fn set_item_bold(&mut self, index: usize, bold: bool) -> ControlResult<()> {
        self.store
            .get_mut(index)
            .map(|i| i.flags_mut().bold = bold)
            .ok_or(ControlError::InvalidArgument)?;
        self.invalidate_from_item(index);
        Ok(())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// The selected row (single-select), or the caret row (multi-select).
    pub fn cur_sel(&self) -> Option<usize> {
        if self.style.multiple_sel {
            self.highlighted
        } else {
            self.store.iter().position(|i| i.flags().selected)
        }
    }

    /// Move the selection (and caret) to `index`, scrolling it into view.
    ///
    /// Returns the previous caret row. Passing `None` (or an out-of-range
    /// index) clears the selection in single-select mode and is an error in
    /// multi-select mode. Selecting a disabled item cancels the existing
    /// selection instead of selecting it.
    pub fn set_cur_sel(&mut self, index: Option<usize>) -> ControlResult<Option<usize>> {
        let count = self.store.len();
        let new = match index {
            Some(i) if i < count => i,
            _ => {
                if self.style.multiple_sel {
                    return Err(ControlError::InvalidArgument);
                }
                return Ok(self.cancel_selection());
            }
        };

        let old = self.highlighted;
        if old != Some(new) {
            self.item_top = if count - new >= self.item_visibles {
                new
            } else {
                count.saturating_sub(self.item_visibles)
            };
            self.highlighted = Some(new);
            self.sel_item = self.highlighted;
        }

        if !self.style.multiple_sel {
            if self.is_item_disabled(new).unwrap_or(false) {
                self.cancel_selection();
                return Ok(old);
            }
            self.select_item(new);
        }

        self.base.invalidate_all();
        Ok(old)
    }

    /// The caret row.
    pub fn caret_index(&self) -> Option<usize> {
        self.highlighted
    }

    /// Move the caret (same transition as [`set_cur_sel`](Self::set_cur_sel)).
    pub fn set_caret_index(&mut self, index: usize) -> ControlResult<Option<usize>> {
        self.set_cur_sel(Some(index))
    }

    /// Change an item's selection membership (multi-select style only).
    ///
    /// Disabled items cannot be toggled.
    pub fn set_sel(&mut self, index: usize, op: SelectionOp) -> ControlResult<()> {
        if !self.style.multiple_sel {
            return Err(ControlError::InvalidArgument);
        }
        let item = self.store.get_mut(index).ok_or(ControlError::InvalidArgument)?;
        if item.flags().disabled {
            return Err(ControlError::InvalidArgument);
        }
        let flags = item.flags_mut();
        flags.selected = match op {
            SelectionOp::Set => true,
            SelectionOp::Clear => false,
            SelectionOp::Toggle => !flags.selected,
        };
        self.invalidate_item(index);
        Ok(())
    }

    /// Whether the item at `index` carries the selection mark.
    pub fn is_selected(&self, index: usize) -> ControlResult<bool> {
        self.store
            .get(index)
            .map(|i| i.flags().selected)
            .ok_or(ControlError::InvalidArgument)
    }

    /// Number of selected items.
    pub fn sel_count(&self) -> usize {
        self.store.iter().filter(|i| i.flags().selected).count()
    }

    /// Indices of all selected items, in list order.
    pub fn sel_items(&self) -> Vec<usize> {
        self.store
            .iter()
            .enumerate()
            .filter(|(_, i)| i.flags().selected)
            .map(|(pos, _)| pos)
            .collect()
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Index of the first visible item.
    pub fn top_index(&self) -> usize {
        self.item_top
    }

    /// Scroll so `index` becomes the first visible item.
    ///
    /// The index is clamped to `[0, max(count - visibles, 0)]`; when the top
    /// actually moves, the caret is re-clamped into the visible window.
    pub fn set_top_index(&mut self, index: usize) {
        let new_top = index.min(self.store.len().saturating_sub(self.item_visibles));
        if self.item_top == new_top {
            return;
        }
        self.item_top = new_top;

        if let Some(h) = self.highlighted {
            let clamped = h.max(self.item_top).min(self.item_bottom());
            self.highlighted = Some(clamped.min(self.store.len().saturating_sub(1)));
        }
        self.sel_item = self.highlighted;
        self.base.invalidate_all();
    }

    /// Height of one item row.
    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    /// Set the item row height, floored to the metrics' line height.
    ///
    /// Returns the effective height.
    pub fn set_item_height(&mut self, height: f32) -> f32 {
        let height = height.max(self.metrics.line_height());
        if (self.item_height - height).abs() > f32::EPSILON {
            self.item_height = height;
            self.calc_params();
            self.base.invalidate_all();
        }
        self.item_height
    }

    /// Number of fully visible items.
    pub fn visible_count(&self) -> usize {
        self.item_visibles
    }

    /// The widest item extent, in pixels.
    pub fn horizontal_extent(&self) -> f32 {
        self.item_max_width
    }

    /// Override the horizontal scroll extent.
    ///
    /// The override lasts until the next mutation recomputes the extent.
    pub fn set_horizontal_extent(&mut self, extent: f32) {
        self.item_max_width = extent.max(0.0);
    }

    /// The widget-relative rectangle of the item at `index`.
    pub fn item_rect(&self, index: usize) -> ControlResult<Rect> {
        if self.store.len() == 0 || index > self.store.len() {
            return Err(ControlError::InvalidArgument);
        }
        let top = (index as f32 - self.item_top as f32) * self.item_height;
        Ok(Rect::new(0.0, top, self.base.width(), self.item_height))
    }

    /// Range, page and position for the host's vertical scrollbar.
    pub fn vertical_scroll_info(&self) -> ScrollInfo {
        if matches!(self.sb_policy, ScrollBarPolicy::Never) {
            return ScrollInfo::hidden();
        }

        let count = self.store.len();
        if self.item_visibles >= count {
            let mut info = ScrollInfo::hidden();
            if matches!(self.sb_policy, ScrollBarPolicy::Always) {
                info.max = (count as f32 * self.item_height - 1.0).max(0.0);
                info.page = info.max + 1.0;
                info.visibility = ScrollBarVisibility::DisabledFull;
            }
            return info;
        }

        ScrollInfo {
            min: 0.0,
            max: count as f32 * self.item_height - 1.0,
            page: self.item_visibles.min(count) as f32 * self.item_height,
            pos: self.item_top as f32 * self.item_height,
            visibility: ScrollBarVisibility::Enabled,
        }
    }

    /// Range, page and position for the host's horizontal scrollbar.
    pub fn horizontal_scroll_info(&self) -> ScrollInfo {
        if matches!(self.sb_policy, ScrollBarPolicy::Never) {
            return ScrollInfo::hidden();
        }

        if self.item_width >= self.item_max_width {
            let mut info = ScrollInfo::hidden();
            if matches!(self.sb_policy, ScrollBarPolicy::Always) {
                info.visibility = ScrollBarVisibility::DisabledFull;
            }
            return info;
        }

        ScrollInfo {
            min: 0.0,
            max: self.item_max_width,
            page: self.item_width,
            pos: self.item_left,
            visibility: ScrollBarVisibility::Enabled,
        }
    }

    /// Apply a vertical scroll command. Returns `true` if the view moved.
    pub fn scroll_vertical(&mut self, command: ScrollCommand) -> bool {
        let count = self.store.len();
        let mut new_top = self.item_top;

        match command {
            ScrollCommand::LineForward => {
                if self.item_bottom() + 1 < count {
                    new_top += 1;
                }
            }
            ScrollCommand::LineBack => {
                new_top = new_top.saturating_sub(1);
            }
            ScrollCommand::PageForward => {
                if self.item_top + 2 * self.item_visibles <= count {
                    new_top += self.item_visibles;
                } else {
                    new_top = count.saturating_sub(self.item_visibles);
                }
            }
            ScrollCommand::PageBack => {
                new_top = new_top.saturating_sub(self.item_visibles);
            }
            ScrollCommand::ThumbTrack(pos) => {
                if self.item_height > 0.0 {
                    let row = (pos / self.item_height).max(0.0) as usize;
                    new_top = row.min(count.saturating_sub(self.item_visibles));
                }
            }
        }

        if new_top != self.item_top {
            self.item_top = new_top;
            self.base.invalidate_all();
            true
        } else {
            false
        }
    }

    /// Apply a horizontal scroll command. Returns `true` if the view moved.
    pub fn scroll_horizontal(&mut self, command: ScrollCommand) -> bool {
        let mut new_left = self.item_left;

        match command {
            ScrollCommand::LineForward => {
                if self.item_max_width > self.item_width + new_left {
                    new_left += 1.0;
                }
            }
            ScrollCommand::LineBack => {
                new_left = (new_left - 1.0).max(0.0);
            }
            ScrollCommand::PageBack => {
                new_left = (new_left - self.item_width).max(0.0);
            }
            ScrollCommand::PageForward => {
                if new_left + 2.0 * self.item_width <= self.item_max_width {
                    new_left += self.item_width;
                } else {
                    new_left = (self.item_max_width - self.item_width).max(0.0);
                }
            }
            ScrollCommand::ThumbTrack(pos) => {
                new_left = pos
                    .min(self.item_max_width - self.item_width)
                    .max(0.0);
            }
        }

        if (new_left - self.item_left).abs() > f32::EPSILON {
            self.item_left = new_left;
            self.base.invalidate_all();
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Internal: geometry and invalidation
    // =========================================================================

    /// Index of the last fully visible row.
    fn item_bottom(&self) -> usize {
        self.item_top + self.item_visibles.saturating_sub(1)
    }

    /// Derive the viewport from the client rectangle.
    fn calc_params(&mut self) {
        let rect = self.base.rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        self.item_visibles = (rect.height() / self.item_height) as usize;
        self.item_width = rect.width();
    }

    /// Size of the checkmark glyph for the current item height.
    fn checkmark_metric(&self) -> f32 {
        let h = self.item_height - CHECKMARK_MIN_INSET;
        if h > 0.0 { h + h / 4.0 } else { 0.0 }
    }

    /// Pixel width one item occupies, including checkmark and image.
    fn item_display_width(&self, item: &ListItem) -> f32 {
        let mut x = INTER_IMAGE_TEXT;
        if self.style.checkbox {
            x += self.checkmark_metric() + INTER_IMAGE_TEXT;
        }
        if self.style.use_icon
            && let Some(image) = item.image()
        {
            x += image.width() + INTER_IMAGE_TEXT;
        }
        if !item.text().is_empty() {
            let style = TextStyle {
                bold: item.flags().bold,
            };
            x += self.metrics.text_extent(item.text(), style).width + INTER_IMAGE_TEXT;
        }
        x
    }

    /// Widest extent over all items.
    fn max_display_width(&self) -> f32 {
        self.store
            .iter()
            .map(|item| self.item_display_width(item))
            .fold(0.0, f32::max)
    }

    /// Invalidate the single row of `index`, if visible.
    fn invalidate_item(&mut self, index: usize) {
        if index < self.item_top || index > self.item_top + self.item_visibles {
            return;
        }
        let top = (index - self.item_top) as f32 * self.item_height;
        let rect = Rect::new(0.0, top, self.base.width(), self.item_height);
        self.base.invalidate_rect(rect);
    }

    /// Invalidate from the row of `index` down to the bottom of the widget.
    fn invalidate_from_item(&mut self, index: usize) {
        if index < self.item_top || index > self.item_top + self.item_visibles {
            return;
        }
        let top = (index - self.item_top) as f32 * self.item_height;
        let rect = Rect::new(0.0, top, self.base.width(), self.base.height() - top);
        self.base.invalidate_rect(rect);
    }

    /// Invalidate the contiguous run of rows between `a` and `b`.
    fn invalidate_item_run(&mut self, a: usize, b: usize) {
        let lo = a.min(b);
        let hi = a.max(b);
        if lo > self.item_top + self.item_visibles || hi < self.item_top {
            return;
        }
        let top = (lo as f32 - self.item_top as f32) * self.item_height;
        let bottom = (hi as f32 - self.item_top as f32 + 1.0) * self.item_height;
        if top < bottom {
            self.base
                .invalidate_rect(Rect::new(0.0, top, self.base.width(), bottom - top));
        }
    }

    // =========================================================================
    // Internal: selection engine
    // =========================================================================

    fn insert_entry(&mut self, item: ListItem, position: Option<usize>) -> ControlResult<usize> {
        let width = self.item_display_width(&item);
        let pos = self
            .store
            .insert(item, position)
            .map_err(|e| self.report_space_exhausted(e))?;

        if width > self.item_max_width {
            self.item_max_width = width;
        }
        self.invalidate_from_item(pos);
        tracing::trace!(position = pos, count = self.store.len(), "item inserted");
        Ok(pos)
    }

    fn item_from_info(&self, info: &ListBoxItemInfo) -> ControlResult<ListItem> {
        let key = duplicate_text(&info.text).map_err(|e| self.report_space_exhausted(e))?;
        let mut item = ListItem::new(key);
        item.set_check(info.check);
        if self.style.use_icon {
            item.set_image(info.image);
        }
        item.flags_mut().significant = info.significant;
        Ok(item)
    }

    fn report_space_exhausted(&self, err: ControlError) -> ControlError {
        if err == ControlError::OutOfSpace {
            tracing::warn!("item allocation failed");
            if self.style.notify {
                self.space_exhausted.emit(());
            }
        }
        err
    }

    /// Apply the selection transition for `new` becoming current.
    ///
    /// In multi-select mode the item's mark is toggled and nothing else
    /// changes. In single-select mode the previously marked item (wherever
    /// it is) loses its mark. Returns the previously marked row for redraw
    /// and change detection. Callers have already rejected disabled items.
    fn select_item(&mut self, new: usize) -> Option<usize> {
        if self.style.multiple_sel {
            if let Some(item) = self.store.get_mut(new) {
                let flags = item.flags_mut();
                flags.selected = !flags.selected;
            }
            return Some(new);
        }

        let current = self.store.iter().position(|i| i.flags().selected);
        match current {
            Some(cur) if cur != new => {
                if let Some(item) = self.store.get_mut(cur) {
                    item.flags_mut().selected = false;
                }
                if let Some(item) = self.store.get_mut(new) {
                    item.flags_mut().selected = true;
                }
                Some(cur)
            }
            Some(cur) => Some(cur),
            None => {
                if let Some(item) = self.store.get_mut(new) {
                    item.flags_mut().selected = true;
                }
                self.highlighted
            }
        }
    }

    /// Clear the selection mark wherever it is; returns the cleared row.
    fn cancel_selection(&mut self) -> Option<usize> {
        let index = self.store.iter().position(|i| i.flags().selected)?;
        if let Some(item) = self.store.get_mut(index) {
            item.flags_mut().selected = false;
        }
        self.invalidate_item(index);
        Some(index)
    }

    fn item_disabled(&self, index: usize) -> bool {
        self.store
            .get(index)
            .is_some_and(|i| i.flags().disabled)
    }

    /// Caret movement shared by the navigation keys and prefix search.
    fn apply_caret_move(&mut self, new_sel: usize, new_top: usize) {
        if self.highlighted == Some(new_sel) {
            return;
        }

        if self.item_top != new_top {
            self.item_top = new_top;
            self.highlighted = Some(new_sel);
            self.sel_item = self.highlighted;
            if !self.style.multiple_sel {
                if self.item_disabled(new_sel) {
                    self.cancel_selection();
                } else {
                    let old = self.select_item(new_sel);
                    if self.style.notify && old != Some(new_sel) {
                        self.selection_changed.emit(new_sel);
                    }
                }
            }
            self.base.invalidate_all();
            return;
        }

        if !self.style.multiple_sel {
            if self.item_disabled(new_sel) {
                self.cancel_selection();
                self.base.invalidate_all();
            } else {
                let old = self.select_item(new_sel);
                if self.style.notify && old != Some(new_sel) {
                    self.selection_changed.emit(new_sel);
                }
                if let Some(old) = old
                    && old >= self.item_top
                    && old <= self.item_bottom() + 1
                {
                    self.invalidate_item(old);
                }
            }
            self.highlighted = Some(new_sel);
            self.sel_item = self.highlighted;
            self.invalidate_item(new_sel);
        } else {
            if self.item_disabled(new_sel) {
                return;
            }
            if let Some(old) = self.highlighted {
                self.invalidate_item(old);
            }
            self.highlighted = Some(new_sel);
            self.invalidate_item(new_sel);
        }
    }

    // =========================================================================
    // Event Handlers
    // =========================================================================

    fn handle_key_press(&mut self, event: &KeyPressEvent) -> bool {
        let count = self.store.len();
        if count == 0 {
            return false;
        }

        match event.key {
            Key::Space => self.handle_space_key(),
            Key::Home
            | Key::End
            | Key::ArrowUp
            | Key::ArrowDown
            | Key::PageUp
            | Key::PageDown => self.handle_nav_key(event.key),
            Key::Enter | Key::NumpadEnter => {
                if self.style.notify {
                    self.enter_pressed.emit(());
                }
                true
            }
            _ => {
                if let Some(ch) = event.text.chars().next()
                    && !ch.is_control()
                {
                    self.handle_char_nav(ch)
                } else {
                    false
                }
            }
        }
    }

    fn handle_nav_key(&mut self, key: Key) -> bool {
        let count = self.store.len() as i64;
        let visibles = self.item_visibles as i64;
        let cur = self.highlighted.map_or(-1, |h| h as i64);
        let top = self.item_top as i64;
        let bottom = self.item_bottom() as i64;
        let mut new_top = top;

        let new_sel: i64 = match key {
            Key::Home => {
                new_top = 0;
                0
            }
            Key::End => {
                new_top = (count - visibles).max(0);
                count - 1
            }
            Key::ArrowDown => {
                let ns = cur + 1;
                if ns >= count {
                    return true;
                }
                if ns > bottom {
                    new_top += 1;
                }
                ns
            }
            Key::ArrowUp => {
                let ns = cur - 1;
                if ns < 0 {
                    return true;
                }
                if ns < top {
                    new_top -= 1;
                }
                ns
            }
            Key::PageDown => {
                let ns = (cur + visibles).min(count - 1);
                new_top = if count - ns >= visibles {
                    ns
                } else {
                    (count - visibles).max(0)
                };
                ns
            }
            Key::PageUp => {
                let ns = (cur - visibles).max(0);
                new_top = (top - visibles).max(0);
                ns
            }
            _ => return false,
        };

        self.apply_caret_move(new_sel.max(0) as usize, new_top.max(0) as usize);
        true
    }

    fn handle_space_key(&mut self) -> bool {
        let Some(h) = self.highlighted else {
            return false;
        };
        if self.item_disabled(h) {
            return true;
        }

        if self.style.multiple_sel {
            self.select_item(h);
            self.invalidate_item(h);
        } else if self.style.checkbox {
            if self.style.notify {
                self.checkmark_clicked.emit(h);
            }
            if self.style.auto_check {
                self.cycle_check_mark(h);
            }
        }
        true
    }

    /// Checked goes back to blank (cancelling), anything else becomes checked.
    fn cycle_check_mark(&mut self, index: usize) {
        let was_checked = self
            .store
            .get(index)
            .is_some_and(|i| i.check() == CheckState::Checked);

        if let Some(item) = self.store.get_mut(index) {
            item.set_check(if was_checked {
                CheckState::Blank
            } else {
                CheckState::Checked
            });
        }
        if was_checked && self.style.notify {
            self.selection_cancelled.emit(());
        }
        self.invalidate_item(index);
    }

    fn handle_char_nav(&mut self, ch: char) -> bool {
        let count = self.store.len();
        let needle = ch.to_string();
        let start = self.highlighted.map_or(0, |h| h + 1);

        let found = self
            .store
            .find(start, &needle, false)
            .or_else(|_| self.store.find(0, &needle, false));

        if let Ok(index) = found {
            self.item_top = if count - index >= self.item_visibles {
                index
            } else {
                count.saturating_sub(self.item_visibles)
            };
            self.highlighted = Some(index);
            self.sel_item = self.highlighted;
            if !self.style.multiple_sel {
                if self.item_disabled(index) {
                    self.cancel_selection();
                } else {
                    let old = self.select_item(index);
                    if self.style.notify && old != Some(index) {
                        self.selection_changed.emit(index);
                    }
                }
            }
            self.base.invalidate_all();
        }
        true
    }

    /// Shared body of the mouse press/move/release handlers.
    fn mouse_hit(&mut self, pos: Point, is_release: bool) -> bool {
        let count = self.store.len();
        if count == 0 || pos.y < 0.0 {
            return false;
        }

        let hit = (pos.y / self.item_height) as usize + self.item_top;
        if hit >= count {
            return false;
        }
        if self.item_disabled(hit) {
            return false;
        }

        let old_sel = self.select_item(hit);

        let mut click_mark = false;
        if self.style.checkbox && pos.x > 0.0 && pos.x < self.checkmark_metric() {
            click_mark = true;
            if is_release {
                if self.style.notify {
                    self.checkmark_clicked.emit(hit);
                }
                if self.style.auto_check {
                    self.cycle_check_mark(hit);
                }
            }
        }

        if let Some(old) = old_sel
            && old >= self.item_top
            && old <= self.item_top + self.item_visibles
        {
            self.invalidate_item(old);
        }
        if let Some(old_caret) = self.highlighted {
            self.invalidate_item(old_caret);
        }
        self.highlighted = Some(hit);
        self.invalidate_item(hit);

        if is_release && self.style.notify {
            let previous = if self.style.mouse_follow {
                let previous = self.sel_item;
                self.sel_item = Some(hit);
                previous
            } else {
                old_sel
            };
            if previous != Some(hit) {
                self.selection_changed.emit(hit);
            }
            if !click_mark {
                self.clicked.emit(hit);
            }
        }
        true
    }

    fn handle_mouse_press(&mut self, event: &MousePressEvent) -> bool {
        if event.button != MouseButton::Left {
            return false;
        }
        // Press and move only track for single-select mouse-follow lists;
        // everything else reacts on release.
        if self.style.multiple_sel || !self.style.mouse_follow {
            return false;
        }
        self.mouse_hit(event.local_pos, false)
    }

    fn handle_mouse_move(&mut self, event: &MouseMoveEvent) -> bool {
        if self.style.multiple_sel || !self.style.mouse_follow {
            return false;
        }
        self.mouse_hit(event.local_pos, false)
    }

    fn handle_mouse_release(&mut self, event: &MouseReleaseEvent) -> bool {
        if event.button != MouseButton::Left {
            return false;
        }
        self.mouse_hit(event.local_pos, true)
    }

    fn handle_focus_in(&mut self) {
        if self.base.has_focus() {
            return;
        }
        self.base.set_focused(true);
        if let Some(h) = self.highlighted {
            self.invalidate_item(h);
        }
        if self.style.notify {
            self.focus_gained.emit(());
        }
    }

    fn handle_focus_out(&mut self) {
        if let Some(h) = self.highlighted {
            self.invalidate_item(h);
        }
        self.base.set_focused(false);
        if self.style.notify {
            self.selection_cancelled.emit(());
            self.focus_lost.emit(());
        }
    }

    // =========================================================================
    // Painting
    // =========================================================================

    fn paint_items(&self, ctx: &mut PaintContext<'_>) {
        let width = ctx.width();
        let checkmark = self.checkmark_metric();
        let mut y = 0.0;

        for item in self
            .store
            .iter()
            .skip(self.item_top)
            .take(self.item_visibles + 1)
        {
            let row = Rect::new(0.0, y, width, self.item_height);
            let flags = item.flags();

            let fg = if flags.disabled {
                ctx.renderer().draw_disabled_item(row, self.palette.disabled_bg);
                self.palette.disabled_fg
            } else if flags.selected {
                ctx.renderer().draw_hilite_item(row, self.palette.hilite_bg);
                self.palette.hilite_fg
            } else {
                ctx.renderer().draw_normal_item(row, self.palette.normal_bg);
                self.palette.normal_fg
            };

            let fg = if flags.significant && !flags.disabled {
                ctx.renderer()
                    .draw_significant_item(row, self.palette.significant_bg);
                self.palette.significant_fg
            } else {
                fg
            };

            let mut x = INTER_IMAGE_TEXT - self.item_left;

            if self.style.checkbox {
                let mark_rect = Rect::new(
                    x,
                    y + (self.item_height - checkmark) / 2.0,
                    checkmark,
                    checkmark,
                );
                let state = match item.check() {
                    CheckState::Blank => CheckMark::Blank,
                    CheckState::Checked => CheckMark::Checked,
                    CheckState::PartiallyChecked => CheckMark::PartiallyChecked,
                };
                ctx.renderer()
                    .draw_checkmark(mark_rect, self.palette.mark_fg, state);
                x += checkmark + INTER_IMAGE_TEXT;
            }

            if self.style.use_icon
                && let Some(image) = item.image()
            {
                match image {
                    ItemImage::Icon(icon) => {
                        let rect = Rect::new(x, y, icon.width(), self.item_height);
                        ctx.renderer().draw_icon(rect, icon);
                    }
                    ItemImage::Bitmap(bitmap) => {
                        let rect = Rect::new(x, y, bitmap.width(), bitmap.height());
                        ctx.renderer().draw_bitmap(rect, bitmap);
                    }
                }
                x += image.width() + INTER_IMAGE_TEXT;
            }

            let style = TextStyle { bold: flags.bold };
            let extent = ctx.renderer().text_extent(item.text(), style);
            let text_y = y + (self.item_height - extent.height) / 2.0;
            ctx.renderer()
                .draw_text(Point::new(x, text_y), item.text(), fg, style);

            y += self.item_height;
        }
    }

    fn paint_focus_frame(&self, ctx: &mut PaintContext<'_>) {
        if !self.base.has_focus() {
            return;
        }
        let Some(h) = self.highlighted else {
            return;
        };
        if h < self.item_top || h > self.item_top + self.item_visibles {
            return;
        }

        let top = (h - self.item_top) as f32 * self.item_height;
        let rect = Rect::new(0.0, top, ctx.width(), self.item_height).deflated(1.0, 1.0);
        ctx.renderer().draw_focus_frame(rect, self.palette.mark_fg);
    }
}

impl Widget for ListBox {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::from_dimensions(160.0, 120.0).with_minimum_dimensions(40.0, 40.0)
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        self.paint_items(ctx);
        self.paint_focus_frame(ctx);
    }

    fn event(&mut self, event: &mut WidgetEvent) -> bool {
        match event {
            WidgetEvent::KeyPress(e) => {
                let e = e.clone();
                self.handle_key_press(&e)
            }
            WidgetEvent::MousePress(e) => {
                let e = e.clone();
                self.handle_mouse_press(&e)
            }
            WidgetEvent::MouseMove(e) => {
                let e = e.clone();
                self.handle_mouse_move(&e)
            }
            WidgetEvent::MouseRelease(e) => {
                let e = e.clone();
                self.handle_mouse_release(&e)
            }
            WidgetEvent::MouseDoubleClick(e) => {
                if e.button == MouseButton::Left && self.style.notify {
                    self.double_clicked.emit(());
                }
                false
            }
            WidgetEvent::FocusIn(_) => {
                self.handle_focus_in();
                false
            }
            WidgetEvent::FocusOut(_) => {
                self.handle_focus_out();
                false
            }
            WidgetEvent::Wheel(e) => {
                let command = if e.delta_y > 0.0 {
                    ScrollCommand::LineBack
                } else {
                    ScrollCommand::LineForward
                };
                self.scroll_vertical(command)
            }
            WidgetEvent::Resize(_) => {
                self.calc_params();
                false
            }
            _ => false,
        }
    }
}

impl Object for ListBox {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

impl Default for ListBox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::KeyboardModifiers;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use trellis_core::init_global_registry;

    fn setup() {
        init_global_registry();
    }

    fn press(list: &mut ListBox, key: Key) {
        let mut event =
            WidgetEvent::KeyPress(KeyPressEvent::new(key, KeyboardModifiers::default(), ""));
        list.event(&mut event);
    }

    fn type_char(list: &mut ListBox, ch: char) {
        let mut event = WidgetEvent::KeyPress(KeyPressEvent::character(ch));
        list.event(&mut event);
    }

    fn click(list: &mut ListBox, x: f32, y: f32) {
        let mut event = WidgetEvent::MouseRelease(MouseReleaseEvent::new(
            Point::new(x, y),
            MouseButton::Left,
            KeyboardModifiers::default(),
        ));
        list.event(&mut event);
    }

    fn notifying() -> ListBoxStyle {
        ListBoxStyle {
            notify: true,
            ..ListBoxStyle::default()
        }
    }

    #[test]
    fn test_unsorted_order_and_prefix_find() {
        setup();
        let mut list = ListBox::new();
        list.add_string("Banana").unwrap();
        list.add_string("Apple").unwrap();
        list.add_string("Cherry").unwrap();

        assert_eq!(list.count(), 3);
        assert_eq!(list.text(0), Ok("Banana"));
        assert_eq!(list.text(1), Ok("Apple"));
        assert_eq!(list.text(2), Ok("Cherry"));
        assert_eq!(list.find_string(0, "Ch"), Ok(2));
    }

    #[test]
    fn test_sorted_insertion() {
        setup();
        let mut list = ListBox::with_style(ListBoxStyle {
            sort: true,
            ..ListBoxStyle::default()
        });
        list.add_string("Banana").unwrap();
        list.add_string("Apple").unwrap();
        list.add_string("Cherry").unwrap();

        assert_eq!(list.text(0), Ok("Apple"));
        assert_eq!(list.text(1), Ok("Banana"));
        assert_eq!(list.text(2), Ok("Cherry"));
    }

    #[test]
    fn test_set_top_index_clamps() {
        setup();
        let mut list = ListBox::new();
        list.widget_base_mut().resize(100.0, 100.0);
        list.set_item_height(20.0);
        let mut event = WidgetEvent::Resize(crate::widget::ResizeEvent::new(
            trellis_render::Size::ZERO,
            trellis_render::Size::new(100.0, 100.0),
        ));
        list.event(&mut event);
        assert_eq!(list.visible_count(), 5);

        for i in 0..12 {
            list.add_string(&format!("item {i}")).unwrap();
        }
        list.set_top_index(20);
        assert_eq!(list.top_index(), 7);
    }

    #[test]
    fn test_single_select_moves_selection() {
        setup();
        let mut list = ListBox::new();
        for i in 0..8 {
            list.add_string(&format!("item {i}")).unwrap();
        }

        let previous = list.set_cur_sel(Some(2)).unwrap();
        assert_eq!(previous, None);
        assert_eq!(list.cur_sel(), Some(2));

        let previous = list.set_cur_sel(Some(5)).unwrap();
        assert_eq!(previous, Some(2));
        assert_eq!(list.cur_sel(), Some(5));
        assert_eq!(list.is_selected(2), Ok(false));
        assert_eq!(list.is_selected(5), Ok(true));
        assert_eq!(list.sel_count(), 1);
    }

    #[test]
    fn test_out_of_range_selection_cancels_single() {
        setup();
        let mut list = ListBox::new();
        list.add_string("a").unwrap();
        list.add_string("b").unwrap();
        list.set_cur_sel(Some(1)).unwrap();

        let previous = list.set_cur_sel(None).unwrap();
        assert_eq!(previous, Some(1));
        assert_eq!(list.cur_sel(), None);
        assert_eq!(list.sel_count(), 0);
    }

    #[test]
    fn test_out_of_range_selection_errors_multi() {
        setup();
        let mut list = ListBox::with_style(ListBoxStyle {
            multiple_sel: true,
            ..ListBoxStyle::default()
        });
        list.add_string("a").unwrap();
        assert_eq!(list.set_cur_sel(Some(5)), Err(ControlError::InvalidArgument));
    }

    #[test]
    fn test_disabled_item_cancels_selection() {
        setup();
        let mut list = ListBox::new();
        for text in ["a", "b", "c"] {
            list.add_string(text).unwrap();
        }
        list.set_cur_sel(Some(0)).unwrap();
        list.set_item_disabled(2, true).unwrap();

        let previous = list.set_cur_sel(Some(2)).unwrap();
        assert_eq!(previous, Some(0));
        // The disabled item is not selected and the old selection is gone.
        assert_eq!(list.is_selected(2), Ok(false));
        assert_eq!(list.sel_count(), 0);
        // The caret still moved onto the disabled item.
        assert_eq!(list.caret_index(), Some(2));
    }

    #[test]
    fn test_multi_select_toggle() {
        setup();
        let mut list = ListBox::with_style(ListBoxStyle {
            multiple_sel: true,
            ..ListBoxStyle::default()
        });
        for text in ["a", "b", "c", "d"] {
            list.add_string(text).unwrap();
        }

        list.set_sel(1, SelectionOp::Set).unwrap();
        list.set_sel(3, SelectionOp::Set).unwrap();
        assert_eq!(list.sel_count(), 2);
        assert_eq!(list.sel_items(), vec![1, 3]);

        list.set_sel(1, SelectionOp::Toggle).unwrap();
        assert_eq!(list.sel_items(), vec![3]);

        list.set_item_disabled(0, true).unwrap();
        assert_eq!(
            list.set_sel(0, SelectionOp::Set),
            Err(ControlError::InvalidArgument)
        );
    }

    #[test]
    fn test_delete_reclamps_highlight() {
        setup();
        let mut list = ListBox::new();
        for text in ["a", "b", "c"] {
            list.add_string(text).unwrap();
        }
        list.set_cur_sel(Some(0)).unwrap();

        list.delete_string(0).unwrap();
        assert_eq!(list.count(), 2);
        assert_eq!(list.caret_index(), Some(0));
        assert_eq!(list.text(0), Ok("b"));
    }

    #[test]
    fn test_delete_selected_item_drops_selection() {
        setup();
        let mut list = ListBox::new();
        for text in ["a", "b", "c"] {
            list.add_string(text).unwrap();
        }
        list.set_cur_sel(Some(1)).unwrap();
        list.delete_string(1).unwrap();

        assert_eq!(list.cur_sel(), None);
        assert_eq!(list.sel_count(), 0);
    }

    #[test]
    fn test_delete_out_of_range() {
        setup();
        let mut list = ListBox::new();
        list.add_string("only").unwrap();
        assert_eq!(list.delete_string(3), Err(ControlError::InvalidArgument));
        assert_eq!(list.count(), 1);
    }

    #[test]
    fn test_reset_content_idempotent() {
        setup();
        let mut list = ListBox::new();
        list.add_string("a").unwrap();
        list.add_string("b").unwrap();
        list.set_cur_sel(Some(1)).unwrap();

        list.reset_content();
        assert_eq!(list.count(), 0);
        assert_eq!(list.cur_sel(), None);
        assert_eq!(list.caret_index(), None);

        list.reset_content();
        assert_eq!(list.count(), 0);

        list.add_string("fresh").unwrap();
        assert_eq!(list.text(0), Ok("fresh"));
    }

    #[test]
    fn test_bulk_add() {
        setup();
        let mut list = ListBox::new();
        let last = list.add_strings(&["a", "b", "c"]).unwrap();
        assert_eq!(last, 2);
        assert_eq!(list.count(), 3);

        // The batch stops at the first empty string.
        let last = list.add_strings(&["d", "", "e"]).unwrap();
        assert_eq!(last, 3);
        assert_eq!(list.count(), 4);
    }

    #[test]
    fn test_empty_text_rejected() {
        setup();
        let mut list = ListBox::new();
        assert_eq!(list.add_string(""), Err(ControlError::InvalidArgument));
        assert_eq!(list.find_string(0, ""), Err(ControlError::InvalidArgument));
    }

    #[test]
    fn test_item_data_requires_style() {
        setup();
        let mut plain = ListBox::new();
        plain.add_string("a").unwrap();
        assert_eq!(plain.item_data(0), Err(ControlError::InvalidArgument));
        assert_eq!(plain.check_mark(0), Err(ControlError::InvalidArgument));

        let mut checks = ListBox::with_style(ListBoxStyle {
            checkbox: true,
            ..ListBoxStyle::default()
        });
        checks
            .add_item(&ListBoxItemInfo::new("task").with_check(CheckState::Checked))
            .unwrap();
        assert_eq!(checks.check_mark(0), Ok(CheckState::Checked));

        checks
            .set_check_mark(0, CheckState::PartiallyChecked)
            .unwrap();
        let info = checks.item_data(0).unwrap();
        assert_eq!(info.text, "task");
        assert_eq!(info.check, CheckState::PartiallyChecked);
    }

    #[test]
    fn test_user_data_round_trip() {
        setup();
        let mut list = ListBox::new();
        list.add_string("a").unwrap();
        list.set_user_data(0, 0xDEAD).unwrap();
        assert_eq!(list.user_data(0), Ok(0xDEAD));
        assert_eq!(list.user_data(9), Err(ControlError::InvalidArgument));
    }

    #[test]
    fn test_vertical_scroll_info() {
        setup();
        let mut list = ListBox::new();
        list.widget_base_mut().resize(100.0, 100.0);
        list.set_item_height(20.0);
        let mut event = WidgetEvent::Resize(crate::widget::ResizeEvent::new(
            trellis_render::Size::ZERO,
            trellis_render::Size::new(100.0, 100.0),
        ));
        list.event(&mut event);

        for i in 0..3 {
            list.add_string(&format!("item {i}")).unwrap();
        }
        // Everything fits: the bar hides.
        let info = list.vertical_scroll_info();
        assert_eq!(info.visibility, ScrollBarVisibility::Hidden);

        for i in 3..12 {
            list.add_string(&format!("item {i}")).unwrap();
        }
        let info = list.vertical_scroll_info();
        assert_eq!(info.visibility, ScrollBarVisibility::Enabled);
        assert_eq!(info.max, 12.0 * 20.0 - 1.0);
        assert_eq!(info.page, 5.0 * 20.0);
        assert_eq!(info.pos, 0.0);

        list.set_top_index(4);
        assert_eq!(list.vertical_scroll_info().pos, 80.0);
    }

    #[test]
    fn test_scroll_commands() {
        setup();
        let mut list = ListBox::new();
        list.widget_base_mut().resize(100.0, 100.0);
        list.set_item_height(20.0);
        let mut event = WidgetEvent::Resize(crate::widget::ResizeEvent::new(
            trellis_render::Size::ZERO,
            trellis_render::Size::new(100.0, 100.0),
        ));
        list.event(&mut event);
        for i in 0..12 {
            list.add_string(&format!("item {i}")).unwrap();
        }

        assert!(list.scroll_vertical(ScrollCommand::LineForward));
        assert_eq!(list.top_index(), 1);
        assert!(list.scroll_vertical(ScrollCommand::PageForward));
        assert_eq!(list.top_index(), 6);
        // Forward from 6 clamps to the last page.
        assert!(list.scroll_vertical(ScrollCommand::PageForward));
        assert_eq!(list.top_index(), 7);
        assert!(!list.scroll_vertical(ScrollCommand::PageForward));
        assert!(list.scroll_vertical(ScrollCommand::PageBack));
        assert_eq!(list.top_index(), 2);
        assert!(list.scroll_vertical(ScrollCommand::ThumbTrack(100.0)));
        assert_eq!(list.top_index(), 5);
    }

    #[test]
    fn test_keyboard_navigation_selects() {
        setup();
        let mut list = ListBox::with_style(notifying());
        for text in ["a", "b", "c"] {
            list.add_string(text).unwrap();
        }

        let changes = Arc::new(AtomicUsize::new(0));
        let probe = changes.clone();
        list.selection_changed.connect(move |_| {
            probe.fetch_add(1, Ordering::SeqCst);
        });

        press(&mut list, Key::ArrowDown);
        assert_eq!(list.caret_index(), Some(0));
        assert_eq!(list.cur_sel(), Some(0));

        press(&mut list, Key::ArrowDown);
        assert_eq!(list.cur_sel(), Some(1));

        press(&mut list, Key::End);
        assert_eq!(list.cur_sel(), Some(2));

        press(&mut list, Key::Home);
        assert_eq!(list.cur_sel(), Some(0));

        assert_eq!(changes.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_multi_select_keyboard_moves_caret_only() {
        setup();
        let mut list = ListBox::with_style(ListBoxStyle {
            multiple_sel: true,
            ..ListBoxStyle::default()
        });
        for text in ["a", "b", "c"] {
            list.add_string(text).unwrap();
        }

        press(&mut list, Key::ArrowDown);
        press(&mut list, Key::ArrowDown);
        assert_eq!(list.caret_index(), Some(1));
        assert_eq!(list.sel_count(), 0);

        // Space toggles membership at the caret.
        press(&mut list, Key::Space);
        assert_eq!(list.sel_items(), vec![1]);
        press(&mut list, Key::Space);
        assert_eq!(list.sel_count(), 0);
    }

    #[test]
    fn test_char_navigation_wraps() {
        setup();
        let mut list = ListBox::new();
        for text in ["Apple", "Banana", "Avocado", "Cherry"] {
            list.add_string(text).unwrap();
        }

        type_char(&mut list, 'A');
        assert_eq!(list.caret_index(), Some(0));
        type_char(&mut list, 'A');
        assert_eq!(list.caret_index(), Some(2));
        // Wraps back to the first match.
        type_char(&mut list, 'A');
        assert_eq!(list.caret_index(), Some(0));
    }

    #[test]
    fn test_click_selects_row() {
        setup();
        let mut list = ListBox::with_style(notifying());
        list.widget_base_mut().resize(100.0, 100.0);
        list.set_item_height(20.0);
        let mut event = WidgetEvent::Resize(crate::widget::ResizeEvent::new(
            trellis_render::Size::ZERO,
            trellis_render::Size::new(100.0, 100.0),
        ));
        list.event(&mut event);
        for text in ["a", "b", "c"] {
            list.add_string(text).unwrap();
        }

        let clicks = Arc::new(AtomicUsize::new(0));
        let probe = clicks.clone();
        list.clicked.connect(move |&row| {
            assert_eq!(row, 1);
            probe.fetch_add(1, Ordering::SeqCst);
        });

        click(&mut list, 50.0, 30.0);
        assert_eq!(list.cur_sel(), Some(1));
        assert_eq!(list.caret_index(), Some(1));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_click_on_disabled_row_ignored() {
        setup();
        let mut list = ListBox::new();
        list.widget_base_mut().resize(100.0, 100.0);
        list.set_item_height(20.0);
        for text in ["a", "b"] {
            list.add_string(text).unwrap();
        }
        list.set_item_disabled(1, true).unwrap();

        click(&mut list, 50.0, 30.0);
        assert_eq!(list.cur_sel(), None);
        assert_eq!(list.caret_index(), None);
    }

    #[test]
    fn test_auto_check_cycles_on_space() {
        setup();
        let mut list = ListBox::with_style(ListBoxStyle {
            checkbox: true,
            auto_check: true,
            ..ListBoxStyle::default()
        });
        list.add_item(&ListBoxItemInfo::new("task")).unwrap();
        list.set_cur_sel(Some(0)).unwrap();

        press(&mut list, Key::Space);
        assert_eq!(list.check_mark(0), Ok(CheckState::Checked));
        press(&mut list, Key::Space);
        assert_eq!(list.check_mark(0), Ok(CheckState::Blank));
    }

    #[test]
    fn test_horizontal_extent_tracks_widest() {
        setup();
        let mut list = ListBox::new();
        list.add_string("short").unwrap();
        let narrow = list.horizontal_extent();

        list.add_string("a much longer item text").unwrap();
        let wide = list.horizontal_extent();
        assert!(wide > narrow);

        // Removing the widest item rescans down to the survivor.
        list.delete_string(1).unwrap();
        assert_eq!(list.horizontal_extent(), narrow);
    }

    #[test]
    fn test_set_text_updates_extent() {
        setup();
        let mut list = ListBox::new();
        list.add_string("aa").unwrap();
        list.add_string("bbbb").unwrap();
        let wide = list.horizontal_extent();

        // Shrinking the widest item triggers the rescan.
        list.set_text(1, "b").unwrap();
        assert!(list.horizontal_extent() < wide);
        assert_eq!(list.text(1), Ok("b"));
    }

    #[test]
    fn test_item_rect() {
        setup();
        let mut list = ListBox::new();
        list.widget_base_mut().resize(100.0, 100.0);
        list.set_item_height(20.0);
        for i in 0..3 {
            list.add_string(&format!("item {i}")).unwrap();
        }

        let rect = list.item_rect(2).unwrap();
        assert_eq!(rect, Rect::new(0.0, 40.0, 100.0, 20.0));
        assert!(list.item_rect(17).is_err());
    }

    #[test]
    fn test_comparator_rejected_after_insert() {
        setup();
        let mut list = ListBox::new();
        list.add_string("a").unwrap();
        assert_eq!(
            list.set_comparator(Box::new(crate::model::CaseInsensitiveComparator)),
            Err(ControlError::InvalidArgument)
        );
    }
}
