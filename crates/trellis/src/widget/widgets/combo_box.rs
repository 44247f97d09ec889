//! Combo box control.
//!
//! A composite control coupling a [`LineEdit`] with, depending on the mode,
//! a [`ListBox`] child and/or a pair of spin buttons. The mode is fixed for
//! the lifetime of the widget:
//!
//! - **Simple**: edit field on top, an always-visible list below.
//! - **AutoSpin**: digits-only edit field whose numeric value the spin
//!   buttons step through a configurable range.
//! - **SpinList**: hidden list; the spin buttons step its selection and the
//!   edit field mirrors the selected item's text.
//! - **DropDownList**: a popup list toggled by the drop-down button,
//!   positioned under the edit field (or above it near the screen bottom).
//!
//! The combo owns its children and forwards events to them; everything runs
//! synchronously inside the delivering handler. Held-button auto-repeat is
//! the host runtime's job: while [`pressed_spin`](ComboBox::pressed_spin)
//! reports a button, the host's repeat timer re-delivers
//! [`fast_spin`](ComboBox::fast_spin).
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::widgets::{ComboBox, ComboBoxKind};
//!
//! let mut combo = ComboBox::new(ComboBoxKind::DropDownList);
//! combo.add_string("Small").unwrap();
//! combo.add_string("Large").unwrap();
//!
//! combo.selection_changed.connect(|&row| {
//!     println!("picked {row}");
//! });
//! ```

use trellis_core::{Object, ObjectId, Signal};
use trellis_render::{ArrowDirection, ButtonState, Color, Point, Rect, TextMetrics};

use crate::error::{ControlError, ControlResult};
use crate::model::KeyComparator;
use crate::widget::widgets::line_edit::LineEdit;
use crate::widget::widgets::list_box::{ListBox, ListBoxStyle};
use crate::widget::{
    FocusPolicy, Key, MouseButton, PaintContext, SizeHint, SizePolicy, SizePolicyPair, Widget,
    WidgetBase, WidgetEvent,
};

/// Gap between the edit field and a spin button.
const INTER_EDIT_BUTTON: f32 = 2.0;

/// Gap between the edit field and the list of a simple combo.
const INTER_EDIT_LISTBOX: f32 = 4.0;

/// Default height of the list child.
const DEF_LIST_HEIGHT: f32 = 60.0;

/// Largest spin-button extent.
const MAX_SPIN_EXTENT: f32 = 16.0;

/// The behavioral mode of a [`ComboBox`], fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComboBoxKind {
    /// Edit field with an always-visible list below it.
    #[default]
    Simple,
    /// Numeric value stepped by the spin buttons.
    AutoSpin,
    /// Hidden list whose selection the spin buttons step.
    SpinList,
    /// Popup list toggled by the drop-down button.
    DropDownList,
}

/// Where the spin buttons sit relative to the edit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinArrowPlacement {
    /// Up/down pair stacked on the right edge.
    #[default]
    StackedRight,
    /// Up above the edit field, down below it.
    TopBottom,
    /// Left/right arrows on either side of the edit field.
    LeftRight,
}

/// Direction of a spin step.
///
/// `Increase` means a larger numeric value in auto-spin mode and the next
/// item in spin-list mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinDirection {
    /// Step towards the maximum / the next item.
    Increase,
    /// Step towards the minimum / the previous item.
    Decrease,
}

/// One of the two spin affordances, for hover/press tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinButton {
    /// The increase affordance.
    Increase,
    /// The decrease affordance.
    Decrease,
}

impl SpinButton {
    /// The spin direction this button triggers.
    pub fn direction(&self) -> SpinDirection {
        match self {
            Self::Increase => SpinDirection::Increase,
            Self::Decrease => SpinDirection::Decrease,
        }
    }
}

/// Construction-time style set of a [`ComboBox`].
#[derive(Debug, Clone, Copy)]
pub struct ComboBoxStyle {
    /// The behavioral mode.
    pub kind: ComboBoxKind,
    /// Emit owner notifications.
    pub notify: bool,
    /// Keep the list child sorted.
    pub sort: bool,
    /// Reject edits typed into the edit field.
    pub read_only: bool,
    /// Wrap to the opposite bound on numeric overflow instead of clamping.
    pub wrap: bool,
    /// Spin button placement (auto-spin and spin-list modes).
    pub arrow_placement: SpinArrowPlacement,
    /// Height of the list child.
    pub list_height: f32,
}

impl Default for ComboBoxStyle {
    fn default() -> Self {
        Self {
            kind: ComboBoxKind::Simple,
            notify: false,
            sort: false,
            read_only: false,
            wrap: false,
            arrow_placement: SpinArrowPlacement::default(),
            list_height: DEF_LIST_HEIGHT,
        }
    }
}

/// Value template of the numeric auto-spin mode.
///
/// A template is literal text around a single `{}` placeholder, e.g.
/// `"{} px"`. Rendering substitutes the value; parsing strips the literal
/// parts and reads the integer between them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SpinFormat {
    prefix: String,
    suffix: String,
}

impl SpinFormat {
    fn parse(template: &str) -> ControlResult<Self> {
        let (prefix, suffix) = template
            .split_once("{}")
            .ok_or(ControlError::InvalidArgument)?;
        if suffix.contains("{}") {
            return Err(ControlError::InvalidArgument);
        }
        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    fn render(&self, value: i32) -> String {
        format!("{}{}{}", self.prefix, value, self.suffix)
    }

    /// Read the value back out of display text. Unparseable text reads as 0,
    /// matching the forgiving scan of the display buffer.
    fn parse_value(&self, text: &str) -> i32 {
        let text = text.strip_prefix(self.prefix.as_str()).unwrap_or(text);
        let text = text.strip_suffix(self.suffix.as_str()).unwrap_or(text);
        let text = text.trim();

        let end = text
            .char_indices()
            .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && c == '-'))
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        text[..end].parse().unwrap_or(0)
    }
}

impl Default for SpinFormat {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

/// Numeric state of the auto-spin mode.
#[derive(Debug, Clone)]
struct SpinState {
    min: i32,
    max: i32,
    pace: i32,
    fast_pace: i32,
    format: SpinFormat,
}

impl Default for SpinState {
    fn default() -> Self {
        Self {
            min: 0,
            max: 100,
            pace: 1,
            fast_pace: 5,
            format: SpinFormat::default(),
        }
    }
}

/// Per-mode state of the coordinator.
enum ComboMode {
    Simple,
    AutoSpin(SpinState),
    SpinList,
    DropDownList { dropped: bool },
}

impl ComboMode {
    fn kind(&self) -> ComboBoxKind {
        match self {
            Self::Simple => ComboBoxKind::Simple,
            Self::AutoSpin(_) => ComboBoxKind::AutoSpin,
            Self::SpinList => ComboBoxKind::SpinList,
            Self::DropDownList { .. } => ComboBoxKind::DropDownList,
        }
    }
}

/// A multi-mode combo control: edit field plus list child and/or spin
/// buttons.
///
/// # Signals
///
/// All signals are gated by the `notify` style.
///
/// - `selection_changed(usize)`: the list child's selection moved
/// - `text_changed(String)`: the edit field's text changed
/// - `clicked(())` / `double_clicked(())`: clicks on the control
/// - `popup_opened(())` / `popup_closed(())`: drop-down visibility
/// - `selection_confirmed(())` / `selection_cancelled(())`: how the popup
///   (or a checkmark interaction) resolved
/// - `focus_gained(())` / `focus_lost(())`: keyboard focus changes
pub struct ComboBox {
    /// Widget base.
    base: WidgetBase,

    /// Style set, fixed at construction.
    style: ComboBoxStyle,

    /// Mode state machine.
    mode: ComboMode,

    /// The edit child; always present.
    edit: LineEdit,
    /// The list child; absent in auto-spin mode.
    list: Option<ListBox>,

    /// Increase spin affordance, in widget-local coordinates.
    inc_spin_rect: Rect,
    /// Decrease spin affordance. Coincides with `inc_spin_rect` for the
    /// drop-down button.
    dec_spin_rect: Rect,
    /// The list child's rectangle (popup rectangle in drop-down mode).
    list_rect: Rect,

    /// Which spin affordance the mouse is over. Per instance; several combo
    /// widgets can track hover at the same time.
    hovered_spin: Option<SpinButton>,
    /// Which spin affordance is held down.
    pressed_spin: Option<SpinButton>,

    /// Bottom edge of the screen in parent coordinates, used to flip the
    /// popup above the edit field when it would run off-screen.
    screen_bottom: Option<f32>,

    /// Arrow glyph color.
    arrow_color: Color,

    /// Signal emitted when the list selection moves.
    pub selection_changed: Signal<usize>,
    /// Signal emitted when the edit text changes.
    pub text_changed: Signal<String>,
    /// Signal emitted on a click.
    pub clicked: Signal<()>,
    /// Signal emitted on a double-click.
    pub double_clicked: Signal<()>,
    /// Signal emitted when the popup opens.
    pub popup_opened: Signal<()>,
    /// Signal emitted when the popup closes.
    pub popup_closed: Signal<()>,
    /// Signal emitted when the popup closes with a pick.
    pub selection_confirmed: Signal<()>,
    /// Signal emitted when the popup closes without a new pick.
    pub selection_cancelled: Signal<()>,
    /// Signal emitted when the widget gains focus.
    pub focus_gained: Signal<()>,
    /// Signal emitted when the widget loses focus.
    pub focus_lost: Signal<()>,
}

impl ComboBox {
    /// Create a combo box of the given kind with default styling.
    pub fn new(kind: ComboBoxKind) -> Self {
        Self::with_style(ComboBoxStyle {
            kind,
            ..ComboBoxStyle::default()
        })
    }

    /// Create a combo box with an explicit style set.
    pub fn with_style(style: ComboBoxStyle) -> Self {
        let mut base = WidgetBase::new::<Self>();
        base.set_focus_policy(FocusPolicy::StrongFocus);
        base.set_size_policy(SizePolicyPair::new(
            SizePolicy::Preferred,
            SizePolicy::Fixed,
        ));

        let mut edit = LineEdit::new();
        edit.set_read_only(style.read_only);

        let mode = match style.kind {
            ComboBoxKind::Simple => ComboMode::Simple,
            ComboBoxKind::AutoSpin => {
                edit.set_digits_only(true);
                ComboMode::AutoSpin(SpinState::default())
            }
            ComboBoxKind::SpinList => ComboMode::SpinList,
            ComboBoxKind::DropDownList => ComboMode::DropDownList { dropped: false },
        };

        let list = if matches!(style.kind, ComboBoxKind::AutoSpin) {
            None
        } else {
            let mut list = ListBox::with_style(ListBoxStyle {
                notify: true,
                sort: style.sort,
                mouse_follow: matches!(style.kind, ComboBoxKind::DropDownList),
                ..ListBoxStyle::default()
            });
            if !matches!(style.kind, ComboBoxKind::Simple) {
                list.widget_base_mut().hide();
            }
            Some(list)
        };

        let combo = Self {
            base,
            style,
            mode,
            edit,
            list,
            inc_spin_rect: Rect::ZERO,
            dec_spin_rect: Rect::ZERO,
            list_rect: Rect::ZERO,
            hovered_spin: None,
            pressed_spin: None,
            screen_bottom: None,
            arrow_color: Color::from_rgb8(100, 100, 100),
            selection_changed: Signal::new(),
            text_changed: Signal::new(),
            clicked: Signal::new(),
            double_clicked: Signal::new(),
            popup_opened: Signal::new(),
            popup_closed: Signal::new(),
            selection_confirmed: Signal::new(),
            selection_cancelled: Signal::new(),
            focus_gained: Signal::new(),
            focus_lost: Signal::new(),
        };

        let _ = combo.edit.widget_base().set_parent(Some(combo.base.object_id()));
        if let Some(list) = &combo.list {
            let _ = list.widget_base().set_parent(Some(combo.base.object_id()));
        }
        combo
    }

    /// The behavioral mode.
    pub fn kind(&self) -> ComboBoxKind {
        self.mode.kind()
    }

    /// The style set this combo was created with.
    pub fn style(&self) -> ComboBoxStyle {
        self.style
    }

    /// The edit child.
    pub fn edit_child(&self) -> &LineEdit {
        &self.edit
    }

    /// The list child, absent in auto-spin mode.
    pub fn list_child(&self) -> Option<&ListBox> {
        self.list.as_ref()
    }

    /// Which spin affordance is currently held down.
    ///
    /// The host's auto-repeat timer re-delivers
    /// [`fast_spin`](Self::fast_spin) while this reports a button.
    pub fn pressed_spin(&self) -> Option<SpinButton> {
        self.pressed_spin
    }

    /// Tell the combo where the screen ends so the drop-down popup can flip
    /// above the edit field instead of running past it.
    pub fn set_screen_bottom(&mut self, bottom: Option<f32>) {
        self.screen_bottom = bottom;
        self.compute_layout();
    }

    /// Whether the drop-down popup is currently open.
    pub fn is_dropped_down(&self) -> bool {
        matches!(self.mode, ComboMode::DropDownList { dropped: true })
    }

    /// The rectangle the popup occupies when open.
    pub fn dropped_rect(&self) -> ControlResult<Rect> {
        if self.list.is_some() {
            Ok(self.list_rect)
        } else {
            Err(ControlError::InvalidArgument)
        }
    }

    /// Propagate new text metrics to the list child.
    pub fn set_text_metrics(&mut self, metrics: Box<dyn TextMetrics>) {
        if let Some(list) = self.list.as_mut() {
            list.set_text_metrics(metrics);
        }
    }

    // =========================================================================
    // Edit-field family
    // =========================================================================

    /// The edit field's text.
    pub fn text(&self) -> &str {
        self.edit.text()
    }

    /// Set the edit field's text.
    pub fn set_text(&mut self, text: &str) {
        self.set_edit_text(text);
    }

    /// Write `text` into the edit field, emitting `text_changed` once when
    /// the content actually differs.
    fn set_edit_text(&mut self, text: &str) {
        if self.edit.text() == text {
            return;
        }
        self.edit.set_text(text);
        if self.style.notify {
            self.text_changed.emit(text.to_string());
        }
    }

    // =========================================================================
    // List-forwarding family
    // =========================================================================

    fn list_ref(&self) -> ControlResult<&ListBox> {
        self.list.as_ref().ok_or(ControlError::InvalidArgument)
    }

    fn list_mut(&mut self) -> ControlResult<&mut ListBox> {
        self.list.as_mut().ok_or(ControlError::InvalidArgument)
    }

    /// Append a string to the list child.
    pub fn add_string(&mut self, text: &str) -> ControlResult<usize> {
        self.list_mut()?.add_string(text)
    }

    /// Insert a string into the list child; `None` appends.
    pub fn insert_string(&mut self, position: Option<usize>, text: &str) -> ControlResult<usize> {
        self.list_mut()?.insert_string(position, text)
    }

    /// Delete a list item, then re-seat the selection next to it.
    pub fn delete_string(&mut self, index: usize) -> ControlResult<()> {
        self.list_mut()?.delete_string(index)?;
        let count = self.list_ref()?.count();
        let reselect = if count <= index {
            count.checked_sub(1)
        } else {
            Some(index)
        };
        let _ = self.set_cur_sel(reselect);
        Ok(())
    }

    /// Number of list items.
    pub fn count(&self) -> usize {
        self.list.as_ref().map_or(0, ListBox::count)
    }

    /// Text of the list item at `index`.
    pub fn item_text(&self, index: usize) -> ControlResult<String> {
        self.list_ref()?.text(index).map(String::from)
    }

    /// Byte length of the list item text at `index`.
    pub fn item_text_len(&self, index: usize) -> ControlResult<usize> {
        self.list_ref()?.text_len(index)
    }

    /// Prefix search in the list child.
    pub fn find_string(&self, start: usize, text: &str) -> ControlResult<usize> {
        self.list_ref()?.find_string(start, text)
    }

    /// Exact search in the list child.
    pub fn find_string_exact(&self, start: usize, text: &str) -> ControlResult<usize> {
        self.list_ref()?.find_string_exact(start, text)
    }

    /// Opaque application value of the list item at `index`.
    pub fn user_data(&self, index: usize) -> ControlResult<u64> {
        self.list_ref()?.user_data(index)
    }

    /// Attach an opaque application value to the list item at `index`.
    pub fn set_user_data(&mut self, index: usize, data: u64) -> ControlResult<()> {
        self.list_mut()?.set_user_data(index, data)
    }

    /// Row height of the list child.
    pub fn item_height(&self) -> ControlResult<f32> {
        self.list_ref().map(ListBox::item_height)
    }

    /// Set the row height of the list child; returns the effective height.
    pub fn set_item_height(&mut self, height: f32) -> ControlResult<f32> {
        Ok(self.list_mut()?.set_item_height(height))
    }

    /// Replace the list child's key comparator; fails once items exist.
    pub fn set_comparator(&mut self, comparator: Box<dyn KeyComparator>) -> ControlResult<()> {
        self.list_mut()?.set_comparator(comparator)
    }

    /// The list child's selection.
    pub fn cur_sel(&self) -> Option<usize> {
        self.list.as_ref().and_then(ListBox::cur_sel)
    }

    /// Move the list selection and mirror the picked text into the edit
    /// field. Returns the previous caret row of the list child.
    pub fn set_cur_sel(&mut self, index: Option<usize>) -> ControlResult<Option<usize>> {
        let previous = match self.list_mut()?.set_cur_sel(index) {
            Ok(previous) => previous,
            Err(err) => {
                self.set_edit_text("");
                return Err(err);
            }
        };

        let text = self
            .list_ref()?
            .cur_sel()
            .and_then(|i| self.list_ref().ok()?.text(i).ok().map(String::from));
        self.set_edit_text(text.as_deref().unwrap_or(""));
        Ok(previous)
    }

    /// Select the first list item matching `text` and mirror it into the
    /// edit field.
    pub fn select_string(&mut self, start: usize, text: &str) -> ControlResult<usize> {
        let index = self.list_ref()?.find_string(start, text)?;
        self.set_cur_sel(Some(index))?;
        Ok(index)
    }

    /// Empty the list child and the edit field.
    pub fn reset_content(&mut self) -> ControlResult<()> {
        self.list_mut()?.reset_content();
        self.set_edit_text("");
        Ok(())
    }

    // =========================================================================
    // Numeric spin family (auto-spin mode only)
    // =========================================================================

    fn spin_state(&self) -> ControlResult<&SpinState> {
        match &self.mode {
            ComboMode::AutoSpin(spin) => Ok(spin),
            _ => Err(ControlError::InvalidArgument),
        }
    }

    fn spin_state_mut(&mut self) -> ControlResult<&mut SpinState> {
        match &mut self.mode {
            ComboMode::AutoSpin(spin) => Ok(spin),
            _ => Err(ControlError::InvalidArgument),
        }
    }

    /// Set the value template, e.g. `"{} px"`. The template must contain
    /// exactly one `{}` placeholder.
    pub fn set_spin_format(&mut self, template: &str) -> ControlResult<()> {
        let format = SpinFormat::parse(template)?;
        self.spin_state_mut()?.format = format;
        Ok(())
    }

    /// The numeric range.
    pub fn spin_range(&self) -> ControlResult<(i32, i32)> {
        self.spin_state().map(|s| (s.min, s.max))
    }

    /// Set the numeric range; rejects an inverted range and re-clamps the
    /// current value into the new bounds.
    pub fn set_spin_range(&mut self, min: i32, max: i32) -> ControlResult<()> {
        if min > max {
            return Err(ControlError::InvalidArgument);
        }
        {
            let spin = self.spin_state_mut()?;
            spin.min = min;
            spin.max = max;
        }

        let spin = self.spin_state()?;
        let format = spin.format.clone();
        let current = format.parse_value(self.edit.text());
        if current < min {
            self.set_edit_text(&format.render(min));
        } else if current > max {
            self.set_edit_text(&format.render(max));
        }
        Ok(())
    }

    /// The current numeric value, parsed from the edit text.
    pub fn spin_value(&self) -> ControlResult<i32> {
        let spin = self.spin_state()?;
        Ok(spin.format.parse_value(self.edit.text()))
    }

    /// Write a numeric value; rejects values outside the range.
    pub fn set_spin_value(&mut self, value: i32) -> ControlResult<()> {
        let spin = self.spin_state()?;
        if value < spin.min || value > spin.max {
            return Err(ControlError::InvalidArgument);
        }
        let text = spin.format.render(value);
        self.set_edit_text(&text);
        Ok(())
    }

    /// The single-step and fast-step paces.
    pub fn spin_pace(&self) -> ControlResult<(i32, i32)> {
        self.spin_state().map(|s| (s.pace, s.fast_pace))
    }

    /// Set the paces; a zero leaves that pace unchanged.
    pub fn set_spin_pace(&mut self, pace: i32, fast_pace: i32) -> ControlResult<()> {
        let spin = self.spin_state_mut()?;
        if pace != 0 {
            spin.pace = pace;
        }
        if fast_pace != 0 {
            spin.fast_pace = fast_pace;
        }
        Ok(())
    }

    // =========================================================================
    // Spin protocol
    // =========================================================================

    /// Perform one spin step.
    ///
    /// Auto-spin steps the numeric value by the single pace; spin-list moves
    /// the hidden list's selection by one item. Other modes reject the call.
    pub fn spin(&mut self, direction: SpinDirection) -> ControlResult<()> {
        match &self.mode {
            ComboMode::AutoSpin(_) => self.auto_spin_step(direction, false),
            ComboMode::SpinList => {
                let key = match direction {
                    SpinDirection::Increase => Key::ArrowDown,
                    SpinDirection::Decrease => Key::ArrowUp,
                };
                self.forward_key_to_list(key);
                Ok(())
            }
            _ => Err(ControlError::InvalidArgument),
        }
    }

    /// Perform one fast spin step (held button, page keys).
    ///
    /// Auto-spin steps by the fast pace; spin-list moves the selection by a
    /// page.
    pub fn fast_spin(&mut self, direction: SpinDirection) -> ControlResult<()> {
        match &self.mode {
            ComboMode::AutoSpin(_) => self.auto_spin_step(direction, true),
            ComboMode::SpinList => {
                let key = match direction {
                    SpinDirection::Increase => Key::PageDown,
                    SpinDirection::Decrease => Key::PageUp,
                };
                self.forward_key_to_list(key);
                Ok(())
            }
            _ => Err(ControlError::InvalidArgument),
        }
    }

    fn auto_spin_step(&mut self, direction: SpinDirection, fast: bool) -> ControlResult<()> {
        let spin = self.spin_state()?;
        let format = spin.format.clone();
        let (min, max) = (spin.min, spin.max);
        let pace = if fast { spin.fast_pace } else { spin.pace };

        let current = format.parse_value(self.edit.text());
        let mut new_value = match direction {
            SpinDirection::Increase => current.saturating_add(pace),
            SpinDirection::Decrease => current.saturating_sub(pace),
        };

        if self.style.wrap {
            if new_value > max {
                new_value = min;
            } else if new_value < min {
                new_value = max;
            }
        } else {
            new_value = new_value.clamp(min, max);
        }

        if new_value != current {
            self.set_edit_text(&format.render(new_value));
        }
        Ok(())
    }

    /// Deliver a navigation key to the (possibly hidden) list child and
    /// react to the selection it produces.
    fn forward_key_to_list(&mut self, key: Key) {
        use crate::widget::{KeyPressEvent, KeyboardModifiers};
        let mut event =
            WidgetEvent::KeyPress(KeyPressEvent::new(key, KeyboardModifiers::default(), ""));
        self.forward_to_list(&mut event);
    }

    /// Forward an event to the list child; mirror any selection movement
    /// into the edit field and notify the owner.
    fn forward_to_list(&mut self, event: &mut WidgetEvent) -> bool {
        let Some(list) = self.list.as_mut() else {
            return false;
        };
        let before = list.cur_sel();
        let handled = list.event(event);
        let after = list.cur_sel();

        if after != before {
            let text = after.and_then(|i| {
                self.list
                    .as_ref()
                    .and_then(|l| l.text(i).ok().map(String::from))
            });
            self.set_edit_text(text.as_deref().unwrap_or(""));
            if let Some(new_sel) = after
                && self.style.notify
            {
                self.selection_changed.emit(new_sel);
            }
        }
        handled
    }

    // =========================================================================
    // Drop-down protocol
    // =========================================================================

    /// Open the drop-down popup. No-op outside drop-down mode or when
    /// already open.
    pub fn open_popup(&mut self) {
        let ComboMode::DropDownList { dropped } = &mut self.mode else {
            return;
        };
        if *dropped {
            return;
        }
        *dropped = true;

        if let Some(list) = self.list.as_mut() {
            list.widget_base_mut().show();
            list.widget_base_mut().set_focused(true);
        }
        self.edit.widget_base_mut().set_focused(false);
        self.base.invalidate_all();
        tracing::debug!("popup opened");
        if self.style.notify {
            self.popup_opened.emit(());
        }
    }

    /// Close the drop-down popup, reporting whether a pick was confirmed.
    /// No-op outside drop-down mode or when already closed.
    pub fn close_popup(&mut self, confirmed: bool) {
        let ComboMode::DropDownList { dropped } = &mut self.mode else {
            return;
        };
        if !*dropped {
            return;
        }
        *dropped = false;

        if let Some(list) = self.list.as_mut() {
            list.widget_base_mut().set_focused(false);
            list.widget_base_mut().hide();
        }
        self.edit.widget_base_mut().set_focused(true);
        self.base.invalidate_all();
        tracing::debug!(confirmed, "popup closed");
        if self.style.notify {
            if confirmed {
                self.selection_confirmed.emit(());
            } else {
                self.selection_cancelled.emit(());
            }
            self.popup_closed.emit(());
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Recompute the child rectangles from the current size.
    fn compute_layout(&mut self) {
        let rect = self.base.rect();
        if rect.is_empty() {
            return;
        }

        let (edit_box, inc, dec, list_rect) = match self.mode.kind() {
            ComboBoxKind::Simple => {
                let edit_height = self.edit.size_hint().preferred.height;
                let edit_box = Rect::new(0.0, 0.0, rect.width(), edit_height);
                let list_rect = Rect::new(
                    0.0,
                    edit_height + INTER_EDIT_LISTBOX,
                    rect.width(),
                    self.style.list_height,
                );
                (edit_box, Rect::ZERO, Rect::ZERO, list_rect)
            }
            ComboBoxKind::AutoSpin | ComboBoxKind::SpinList => {
                let (edit_box, inc, dec) = spin_layout(rect, self.style.arrow_placement);
                (edit_box, inc, dec, Rect::ZERO)
            }
            ComboBoxKind::DropDownList => {
                let button = rect.height().min(MAX_SPIN_EXTENT);
                let edit_box = Rect::new(
                    0.0,
                    0.0,
                    rect.width() - button - INTER_EDIT_BUTTON,
                    rect.height(),
                );
                let arrow = Rect::new(
                    rect.width() - button,
                    (rect.height() - button) / 2.0,
                    button,
                    button,
                );
                let mut list_rect =
                    Rect::new(0.0, rect.height(), rect.width(), self.style.list_height);
                // Flip above the edit field when the popup would cross the
                // screen bottom.
                if let Some(screen_bottom) = self.screen_bottom
                    && self.base.geometry().bottom() + self.style.list_height > screen_bottom
                {
                    list_rect = Rect::new(0.0, -self.style.list_height, rect.width(), self.style.list_height);
                }
                (edit_box, arrow, arrow, list_rect)
            }
        };

        self.inc_spin_rect = inc;
        self.dec_spin_rect = dec;
        self.list_rect = list_rect;

        self.edit.widget_base_mut().set_geometry(edit_box);

        if let Some(list) = self.list.as_mut() {
            let old_size = list.widget_base().size();
            list.widget_base_mut().set_geometry(list_rect);
            let mut resize = WidgetEvent::Resize(crate::widget::ResizeEvent::new(
                old_size,
                list_rect.size,
            ));
            list.event(&mut resize);
        }
    }

    fn spin_button_at(&self, pos: Point) -> Option<SpinButton> {
        // The drop-down button shares one rectangle; report it as Increase.
        if self.inc_spin_rect.contains(pos) {
            Some(SpinButton::Increase)
        } else if self.dec_spin_rect.contains(pos) {
            Some(SpinButton::Decrease)
        } else {
            None
        }
    }

    fn list_visible(&self) -> bool {
        self.list
            .as_ref()
            .is_some_and(|l| l.widget_base().is_visible())
    }

    // =========================================================================
    // Event handlers
    // =========================================================================

    fn handle_mouse_press(&mut self, pos: Point, button: MouseButton) -> bool {
        if button != MouseButton::Left {
            return false;
        }

        if let Some(spin) = self.spin_button_at(pos) {
            match self.mode.kind() {
                ComboBoxKind::AutoSpin | ComboBoxKind::SpinList => {
                    self.pressed_spin = Some(spin);
                    self.base.invalidate_rect(self.inc_spin_rect.union(self.dec_spin_rect));
                    let _ = self.spin(spin.direction());
                    return true;
                }
                ComboBoxKind::DropDownList => {
                    if self.is_dropped_down() {
                        self.close_popup(false);
                    } else {
                        self.open_popup();
                    }
                    return true;
                }
                ComboBoxKind::Simple => return false,
            }
        }

        if self.list_visible() && self.list_rect.contains(pos) {
            let mut translated = WidgetEvent::MousePress(crate::widget::MousePressEvent::new(
                Point::new(pos.x - self.list_rect.left(), pos.y - self.list_rect.top()),
                button,
                crate::widget::KeyboardModifiers::default(),
            ));
            return self.forward_to_list(&mut translated);
        }

        if self.edit.widget_base().geometry().contains(pos) {
            let mut translated = WidgetEvent::MousePress(crate::widget::MousePressEvent::new(
                self.edit.widget_base().map_from_parent(pos),
                button,
                crate::widget::KeyboardModifiers::default(),
            ));
            let handled = self.edit.event(&mut translated);
            if handled && self.style.notify {
                self.clicked.emit(());
            }
            return handled;
        }

        false
    }

    fn handle_mouse_release(&mut self, pos: Point, button: MouseButton) -> bool {
        if button != MouseButton::Left {
            return false;
        }

        if self.pressed_spin.take().is_some() {
            self.base.invalidate_rect(self.inc_spin_rect.union(self.dec_spin_rect));
            if self.style.notify {
                self.clicked.emit(());
            }
            return true;
        }

        if self.list_visible() && self.list_rect.contains(pos) {
            let mut translated = WidgetEvent::MouseRelease(crate::widget::MouseReleaseEvent::new(
                Point::new(pos.x - self.list_rect.left(), pos.y - self.list_rect.top()),
                button,
                crate::widget::KeyboardModifiers::default(),
            ));
            let handled = self.forward_to_list(&mut translated);
            // A pick inside the open popup resolves and closes it.
            if self.is_dropped_down() {
                self.close_popup(true);
            }
            return handled;
        }

        if self.style.notify {
            self.clicked.emit(());
        }
        false
    }

    fn handle_mouse_move(&mut self, pos: Point) -> bool {
        let hovered = self.spin_button_at(pos);
        if hovered != self.hovered_spin {
            self.hovered_spin = hovered;
            self.base.invalidate_rect(self.inc_spin_rect.union(self.dec_spin_rect));
        }

        if self.list_visible() && self.list_rect.contains(pos) {
            let mut translated = WidgetEvent::MouseMove(crate::widget::MouseMoveEvent::new(
                Point::new(pos.x - self.list_rect.left(), pos.y - self.list_rect.top()),
                crate::widget::KeyboardModifiers::default(),
            ));
            return self.forward_to_list(&mut translated);
        }
        false
    }

    fn handle_key_press(&mut self, event: &crate::widget::KeyPressEvent) -> bool {
        match self.mode.kind() {
            ComboBoxKind::AutoSpin | ComboBoxKind::SpinList => match event.key {
                // The up arrow steps towards the maximum in auto-spin mode
                // but to the previous item in spin-list mode.
                Key::ArrowUp => {
                    let direction = if matches!(self.mode, ComboMode::AutoSpin(_)) {
                        SpinDirection::Increase
                    } else {
                        SpinDirection::Decrease
                    };
                    let _ = self.spin(direction);
                    true
                }
                Key::ArrowDown => {
                    let direction = if matches!(self.mode, ComboMode::AutoSpin(_)) {
                        SpinDirection::Decrease
                    } else {
                        SpinDirection::Increase
                    };
                    let _ = self.spin(direction);
                    true
                }
                Key::PageUp => {
                    let direction = if matches!(self.mode, ComboMode::AutoSpin(_)) {
                        SpinDirection::Increase
                    } else {
                        SpinDirection::Decrease
                    };
                    let _ = self.fast_spin(direction);
                    true
                }
                Key::PageDown => {
                    let direction = if matches!(self.mode, ComboMode::AutoSpin(_)) {
                        SpinDirection::Decrease
                    } else {
                        SpinDirection::Increase
                    };
                    let _ = self.fast_spin(direction);
                    true
                }
                _ => self.forward_key_to_edit(event),
            },
            ComboBoxKind::DropDownList => match event.key {
                Key::Escape => {
                    if self.is_dropped_down() {
                        self.close_popup(false);
                        return true;
                    }
                    false
                }
                Key::Enter | Key::NumpadEnter => {
                    if self.is_dropped_down() {
                        self.close_popup(true);
                        return true;
                    }
                    false
                }
                Key::ArrowUp | Key::ArrowDown | Key::PageUp | Key::PageDown => {
                    if self.is_dropped_down() {
                        let mut event = WidgetEvent::KeyPress(event.clone());
                        self.forward_to_list(&mut event)
                    } else {
                        self.open_popup();
                        true
                    }
                }
                _ => false,
            },
            ComboBoxKind::Simple => self.forward_key_to_edit(event),
        }
    }

    /// Deliver a key to the edit child; when the text changes, locate the
    /// matching list entry and notify the owner.
    fn forward_key_to_edit(&mut self, event: &crate::widget::KeyPressEvent) -> bool {
        let before = self.edit.text().to_string();
        let mut event = WidgetEvent::KeyPress(event.clone());
        let handled = self.edit.event(&mut event);

        if self.edit.text() != before {
            let text = self.edit.text().to_string();
            if !text.is_empty()
                && let Some(list) = self.list.as_mut()
                && let Ok(index) = list.find_string(0, &text)
            {
                let _ = list.set_cur_sel(Some(index));
            }
            if self.style.notify {
                self.text_changed.emit(text);
            }
        }
        handled
    }

    fn handle_focus_out(&mut self) {
        if self.is_dropped_down() {
            self.close_popup(false);
        }
        if self.style.notify {
            self.focus_lost.emit(());
        }
    }

    // =========================================================================
    // Painting
    // =========================================================================

    fn spin_button_state(&self, button: SpinButton) -> ButtonState {
        if self.pressed_spin == Some(button) {
            ButtonState::Pressed
        } else if self.hovered_spin == Some(button) {
            ButtonState::Hilite
        } else {
            ButtonState::Normal
        }
    }

    fn paint_spin_buttons(&self, ctx: &mut PaintContext<'_>) {
        match self.mode.kind() {
            ComboBoxKind::Simple => {}
            ComboBoxKind::AutoSpin | ComboBoxKind::SpinList => {
                let (inc_dir, dec_dir) = match self.style.arrow_placement {
                    SpinArrowPlacement::LeftRight => {
                        (ArrowDirection::Right, ArrowDirection::Left)
                    }
                    _ => (ArrowDirection::Up, ArrowDirection::Down),
                };
                ctx.renderer().draw_arrow(
                    self.inc_spin_rect,
                    self.arrow_color,
                    inc_dir,
                    self.spin_button_state(SpinButton::Increase),
                );
                ctx.renderer().draw_arrow(
                    self.dec_spin_rect,
                    self.arrow_color,
                    dec_dir,
                    self.spin_button_state(SpinButton::Decrease),
                );
            }
            ComboBoxKind::DropDownList => {
                ctx.renderer().draw_arrow(
                    self.inc_spin_rect,
                    self.arrow_color,
                    ArrowDirection::Down,
                    self.spin_button_state(SpinButton::Increase),
                );
            }
        }
    }
}

/// Spin-button geometry shared by the auto-spin and spin-list modes.
fn spin_layout(rect: Rect, placement: SpinArrowPlacement) -> (Rect, Rect, Rect) {
    match placement {
        SpinArrowPlacement::TopBottom => {
            let w = rect.width().min(MAX_SPIN_EXTENT);
            let h = (rect.height() / 2.0).min(w / 2.0);

            let edit = Rect::new(
                0.0,
                h + INTER_EDIT_BUTTON,
                rect.width(),
                rect.height() - 2.0 * (h + INTER_EDIT_BUTTON),
            );
            let inc = Rect::new((rect.width() - w) / 2.0, 0.0, w, h);
            let dec = Rect::new((rect.width() - w) / 2.0, rect.height() - h, w, h);
            (edit, inc, dec)
        }
        SpinArrowPlacement::LeftRight => {
            let h = rect.height();
            let w = h.min(MAX_SPIN_EXTENT);

            let edit = Rect::new(
                w / 2.0 + INTER_EDIT_BUTTON,
                0.0,
                rect.width() - w - 2.0 * INTER_EDIT_BUTTON,
                h,
            );
            let dec = Rect::new(0.0, (h - w) / 2.0, w / 2.0, w);
            let inc = Rect::new(rect.width() - w / 2.0, (h - w) / 2.0, w / 2.0, w);
            (edit, inc, dec)
        }
        SpinArrowPlacement::StackedRight => {
            let h = rect.height();
            let w = h.min(MAX_SPIN_EXTENT);

            let edit = Rect::new(0.0, 0.0, rect.width() - w - INTER_EDIT_BUTTON, h);
            let inc = Rect::from_corners(
                Point::new(rect.width() - w, h / 2.0 - w / 2.0),
                Point::new(rect.width(), h / 2.0 - 1.0),
            );
            let dec = Rect::from_corners(
                Point::new(rect.width() - w, h / 2.0 + 1.0),
                Point::new(rect.width(), h / 2.0 + w / 2.0),
            );
            (edit, inc, dec)
        }
    }
}

impl Widget for ComboBox {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        match self.mode.kind() {
            ComboBoxKind::Simple => SizeHint::from_dimensions(
                120.0,
                self.edit.size_hint().preferred.height
                    + INTER_EDIT_LISTBOX
                    + self.style.list_height,
            ),
            _ => SizeHint::from_dimensions(120.0, 24.0).with_minimum_dimensions(60.0, 18.0),
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        self.paint_spin_buttons(ctx);
    }

    fn event(&mut self, event: &mut WidgetEvent) -> bool {
        match event {
            WidgetEvent::MousePress(e) => {
                let (pos, button) = (e.local_pos, e.button);
                self.handle_mouse_press(pos, button)
            }
            WidgetEvent::MouseRelease(e) => {
                let (pos, button) = (e.local_pos, e.button);
                self.handle_mouse_release(pos, button)
            }
            WidgetEvent::MouseMove(e) => {
                let pos = e.local_pos;
                self.handle_mouse_move(pos)
            }
            WidgetEvent::MouseDoubleClick(e) => {
                if e.button == MouseButton::Left && self.style.notify {
                    self.double_clicked.emit(());
                }
                false
            }
            WidgetEvent::KeyPress(e) => {
                let e = e.clone();
                self.handle_key_press(&e)
            }
            WidgetEvent::FocusIn(_) => {
                self.edit.widget_base_mut().set_focused(true);
                if self.style.notify {
                    self.focus_gained.emit(());
                }
                false
            }
            WidgetEvent::FocusOut(_) => {
                self.handle_focus_out();
                false
            }
            WidgetEvent::Leave(_) => {
                if self.hovered_spin.take().is_some() {
                    self.base
                        .invalidate_rect(self.inc_spin_rect.union(self.dec_spin_rect));
                }
                false
            }
            WidgetEvent::Resize(_) => {
                self.compute_layout();
                false
            }
            _ => false,
        }
    }
}

impl Object for ComboBox {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{KeyPressEvent, KeyboardModifiers};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use trellis_core::init_global_registry;

    fn setup() {
        init_global_registry();
    }

    fn autospin() -> ComboBox {
        ComboBox::with_style(ComboBoxStyle {
            kind: ComboBoxKind::AutoSpin,
            notify: true,
            ..ComboBoxStyle::default()
        })
    }

    fn press(combo: &mut ComboBox, key: Key) {
        let mut event =
            WidgetEvent::KeyPress(KeyPressEvent::new(key, KeyboardModifiers::default(), ""));
        combo.event(&mut event);
    }

    #[test]
    fn test_mode_fixed_at_construction() {
        setup();
        let combo = ComboBox::new(ComboBoxKind::Simple);
        assert_eq!(combo.kind(), ComboBoxKind::Simple);
        assert!(combo.list_child().is_some());
        assert!(combo.list_child().unwrap().widget_base().is_visible());

        let combo = ComboBox::new(ComboBoxKind::AutoSpin);
        assert!(combo.list_child().is_none());
        assert!(combo.edit_child().digits_only());

        let combo = ComboBox::new(ComboBoxKind::SpinList);
        assert!(combo.list_child().is_some());
        assert!(!combo.list_child().unwrap().widget_base().is_visible());

        let combo = ComboBox::new(ComboBoxKind::DropDownList);
        assert!(!combo.is_dropped_down());
        assert!(!combo.list_child().unwrap().widget_base().is_visible());
    }

    #[test]
    fn test_children_are_owned() {
        setup();
        let combo = ComboBox::new(ComboBoxKind::Simple);
        let edit_id = combo.edit_child().widget_base().object_id();
        assert_eq!(
            combo.edit_child().widget_base().parent_id(),
            Some(combo.object_id())
        );
        assert!(combo.widget_base().children_ids().contains(&edit_id));
    }

    #[test]
    fn test_list_forwarding() {
        setup();
        let mut combo = ComboBox::new(ComboBoxKind::Simple);
        combo.add_string("Alpha").unwrap();
        combo.add_string("Beta").unwrap();
        combo.add_string("Gamma").unwrap();

        assert_eq!(combo.count(), 3);
        assert_eq!(combo.item_text(1).unwrap(), "Beta");
        assert_eq!(combo.find_string(0, "Ga"), Ok(2));
        assert_eq!(combo.find_string_exact(0, "Beta"), Ok(1));
        assert_eq!(
            combo.find_string_exact(0, "Bet"),
            Err(ControlError::NotFound)
        );
    }

    #[test]
    fn test_spin_messages_rejected_off_mode() {
        setup();
        let mut combo = ComboBox::new(ComboBoxKind::Simple);
        assert_eq!(combo.spin_range(), Err(ControlError::InvalidArgument));
        assert_eq!(
            combo.set_spin_range(0, 10),
            Err(ControlError::InvalidArgument)
        );
        assert_eq!(combo.spin_value(), Err(ControlError::InvalidArgument));
        assert_eq!(
            combo.spin(SpinDirection::Increase),
            Err(ControlError::InvalidArgument)
        );
    }

    #[test]
    fn test_list_messages_rejected_on_autospin() {
        setup();
        let mut combo = ComboBox::new(ComboBoxKind::AutoSpin);
        assert_eq!(combo.add_string("x"), Err(ControlError::InvalidArgument));
        assert_eq!(combo.cur_sel(), None);
        assert_eq!(combo.count(), 0);
    }

    #[test]
    fn test_set_cur_sel_mirrors_text() {
        setup();
        let mut combo = ComboBox::new(ComboBoxKind::DropDownList);
        combo.add_string("Small").unwrap();
        combo.add_string("Large").unwrap();

        combo.set_cur_sel(Some(1)).unwrap();
        assert_eq!(combo.cur_sel(), Some(1));
        assert_eq!(combo.text(), "Large");

        combo.set_cur_sel(None).unwrap();
        assert_eq!(combo.text(), "");
    }

    #[test]
    fn test_select_string() {
        setup();
        let mut combo = ComboBox::new(ComboBoxKind::Simple);
        combo.add_string("red").unwrap();
        combo.add_string("green").unwrap();

        assert_eq!(combo.select_string(0, "gr"), Ok(1));
        assert_eq!(combo.text(), "green");
        assert_eq!(
            combo.select_string(0, "blue"),
            Err(ControlError::NotFound)
        );
    }

    #[test]
    fn test_delete_string_reselects_neighbor() {
        setup();
        let mut combo = ComboBox::new(ComboBoxKind::Simple);
        for text in ["a", "b", "c"] {
            combo.add_string(text).unwrap();
        }
        combo.set_cur_sel(Some(2)).unwrap();

        combo.delete_string(2).unwrap();
        assert_eq!(combo.count(), 2);
        assert_eq!(combo.cur_sel(), Some(1));
        assert_eq!(combo.text(), "b");
    }

    #[test]
    fn test_reset_content_clears_edit() {
        setup();
        let mut combo = ComboBox::new(ComboBoxKind::Simple);
        combo.add_string("a").unwrap();
        combo.set_cur_sel(Some(0)).unwrap();
        assert_eq!(combo.text(), "a");

        combo.reset_content().unwrap();
        assert_eq!(combo.count(), 0);
        assert_eq!(combo.text(), "");
    }

    #[test]
    fn test_autospin_clamps_without_wrap() {
        setup();
        let mut combo = autospin();
        combo.set_spin_range(0, 100).unwrap();
        combo.set_spin_value(100).unwrap();

        let changes = Arc::new(AtomicUsize::new(0));
        let probe = changes.clone();
        combo.text_changed.connect(move |_| {
            probe.fetch_add(1, Ordering::SeqCst);
        });

        combo.spin(SpinDirection::Increase).unwrap();
        assert_eq!(combo.spin_value(), Ok(100));
        // Clamped at the bound, the value did not change: no notification.
        assert_eq!(changes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_autospin_wraps_and_notifies_once() {
        setup();
        let mut combo = ComboBox::with_style(ComboBoxStyle {
            kind: ComboBoxKind::AutoSpin,
            notify: true,
            wrap: true,
            ..ComboBoxStyle::default()
        });
        combo.set_spin_range(0, 100).unwrap();
        combo.set_spin_value(100).unwrap();

        let changes = Arc::new(AtomicUsize::new(0));
        let probe = changes.clone();
        combo.text_changed.connect(move |_| {
            probe.fetch_add(1, Ordering::SeqCst);
        });

        combo.spin(SpinDirection::Increase).unwrap();
        assert_eq!(combo.spin_value(), Ok(0));
        assert_eq!(changes.load(Ordering::SeqCst), 1);

        combo.spin(SpinDirection::Decrease).unwrap();
        assert_eq!(combo.spin_value(), Ok(100));
        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_autospin_fast_pace() {
        setup();
        let mut combo = autospin();
        combo.set_spin_pace(2, 10).unwrap();
        combo.set_spin_value(50).unwrap();

        combo.spin(SpinDirection::Increase).unwrap();
        assert_eq!(combo.spin_value(), Ok(52));
        combo.fast_spin(SpinDirection::Increase).unwrap();
        assert_eq!(combo.spin_value(), Ok(62));

        // Zero paces leave the configuration untouched.
        combo.set_spin_pace(0, 0).unwrap();
        assert_eq!(combo.spin_pace(), Ok((2, 10)));
    }

    #[test]
    fn test_autospin_range_validation() {
        setup();
        let mut combo = autospin();
        assert_eq!(
            combo.set_spin_range(10, 5),
            Err(ControlError::InvalidArgument)
        );

        combo.set_spin_range(10, 20).unwrap();
        // The current value (0) is below the new minimum and gets clamped.
        assert_eq!(combo.spin_value(), Ok(10));

        assert_eq!(
            combo.set_spin_value(99),
            Err(ControlError::InvalidArgument)
        );
    }

    #[test]
    fn test_autospin_format_round_trip() {
        setup();
        let mut combo = autospin();
        combo.set_spin_format("{} px").unwrap();
        combo.set_spin_value(42).unwrap();

        assert_eq!(combo.text(), "42 px");
        assert_eq!(combo.spin_value(), Ok(42));

        combo.spin(SpinDirection::Increase).unwrap();
        assert_eq!(combo.text(), "43 px");

        assert_eq!(
            combo.set_spin_format("no placeholder"),
            Err(ControlError::InvalidArgument)
        );
    }

    #[test]
    fn test_autospin_keyboard() {
        setup();
        let mut combo = autospin();
        combo.set_spin_value(50).unwrap();

        // The up arrow steps towards the maximum.
        press(&mut combo, Key::ArrowUp);
        assert_eq!(combo.spin_value(), Ok(51));
        press(&mut combo, Key::ArrowDown);
        assert_eq!(combo.spin_value(), Ok(50));
        press(&mut combo, Key::PageUp);
        assert_eq!(combo.spin_value(), Ok(55));
        press(&mut combo, Key::PageDown);
        assert_eq!(combo.spin_value(), Ok(50));
    }

    #[test]
    fn test_spin_list_steps_selection() {
        setup();
        let mut combo = ComboBox::with_style(ComboBoxStyle {
            kind: ComboBoxKind::SpinList,
            notify: true,
            ..ComboBoxStyle::default()
        });
        for text in ["one", "two", "three"] {
            combo.add_string(text).unwrap();
        }

        let changes = Arc::new(AtomicUsize::new(0));
        let probe = changes.clone();
        combo.selection_changed.connect(move |_| {
            probe.fetch_add(1, Ordering::SeqCst);
        });

        combo.spin(SpinDirection::Increase).unwrap();
        assert_eq!(combo.cur_sel(), Some(0));
        assert_eq!(combo.text(), "one");

        combo.spin(SpinDirection::Increase).unwrap();
        assert_eq!(combo.cur_sel(), Some(1));
        assert_eq!(combo.text(), "two");

        combo.spin(SpinDirection::Decrease).unwrap();
        assert_eq!(combo.cur_sel(), Some(0));
        assert_eq!(combo.text(), "one");

        assert_eq!(changes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_dropdown_open_close_notifications() {
        setup();
        let mut combo = ComboBox::with_style(ComboBoxStyle {
            kind: ComboBoxKind::DropDownList,
            notify: true,
            ..ComboBoxStyle::default()
        });
        combo.add_string("a").unwrap();

        let opened = Arc::new(AtomicUsize::new(0));
        let closed = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(AtomicUsize::new(0));
        let confirmed = Arc::new(AtomicUsize::new(0));

        let probe = opened.clone();
        combo.popup_opened.connect(move |_| {
            probe.fetch_add(1, Ordering::SeqCst);
        });
        let probe = closed.clone();
        combo.popup_closed.connect(move |_| {
            probe.fetch_add(1, Ordering::SeqCst);
        });
        let probe = cancelled.clone();
        combo.selection_cancelled.connect(move |_| {
            probe.fetch_add(1, Ordering::SeqCst);
        });
        let probe = confirmed.clone();
        combo.selection_confirmed.connect(move |_| {
            probe.fetch_add(1, Ordering::SeqCst);
        });

        // Arrow key opens the closed popup.
        press(&mut combo, Key::ArrowDown);
        assert!(combo.is_dropped_down());
        assert!(combo.list_child().unwrap().widget_base().is_visible());
        assert_eq!(opened.load(Ordering::SeqCst), 1);

        // Escape cancels.
        press(&mut combo, Key::Escape);
        assert!(!combo.is_dropped_down());
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
        assert_eq!(closed.load(Ordering::SeqCst), 1);

        // Enter while open confirms.
        press(&mut combo, Key::ArrowDown);
        press(&mut combo, Key::Enter);
        assert!(!combo.is_dropped_down());
        assert_eq!(confirmed.load(Ordering::SeqCst), 1);
        assert_eq!(closed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dropdown_closes_on_focus_loss() {
        setup();
        let mut combo = ComboBox::with_style(ComboBoxStyle {
            kind: ComboBoxKind::DropDownList,
            notify: true,
            ..ComboBoxStyle::default()
        });
        combo.add_string("a").unwrap();
        combo.open_popup();
        assert!(combo.is_dropped_down());

        let mut event = WidgetEvent::FocusOut(crate::widget::FocusOutEvent::default());
        combo.event(&mut event);
        assert!(!combo.is_dropped_down());
    }

    #[test]
    fn test_dropdown_keys_navigate_open_list() {
        setup();
        let mut combo = ComboBox::new(ComboBoxKind::DropDownList);
        for text in ["one", "two", "three"] {
            combo.add_string(text).unwrap();
        }
        combo.open_popup();

        press(&mut combo, Key::ArrowDown);
        assert_eq!(combo.cur_sel(), Some(0));
        assert_eq!(combo.text(), "one");

        press(&mut combo, Key::ArrowDown);
        assert_eq!(combo.cur_sel(), Some(1));
        assert_eq!(combo.text(), "two");
    }

    #[test]
    fn test_popup_flips_above_near_screen_bottom() {
        setup();
        let mut combo = ComboBox::new(ComboBoxKind::DropDownList);
        combo.widget_base_mut().set_geometry(Rect::new(10.0, 550.0, 120.0, 24.0));
        combo.set_screen_bottom(Some(600.0));

        let rect = combo.dropped_rect().unwrap();
        // 574 + 60 > 600: the popup opens above the edit field.
        assert!(rect.top() < 0.0);

        combo.widget_base_mut().set_geometry(Rect::new(10.0, 10.0, 120.0, 24.0));
        combo.set_screen_bottom(Some(600.0));
        let rect = combo.dropped_rect().unwrap();
        assert_eq!(rect.top(), 24.0);
    }

    #[test]
    fn test_spin_button_press_tracking() {
        setup();
        let mut combo = autospin();
        combo.widget_base_mut().resize(120.0, 24.0);
        let mut event = WidgetEvent::Resize(crate::widget::ResizeEvent::new(
            trellis_render::Size::ZERO,
            trellis_render::Size::new(120.0, 24.0),
        ));
        combo.event(&mut event);
        combo.set_spin_value(10).unwrap();

        // Press inside the increase arrow (stacked on the right, upper half).
        let mut press_event = WidgetEvent::MousePress(crate::widget::MousePressEvent::new(
            Point::new(115.0, 8.0),
            MouseButton::Left,
            KeyboardModifiers::default(),
        ));
        combo.event(&mut press_event);
        assert_eq!(combo.pressed_spin(), Some(SpinButton::Increase));
        assert_eq!(combo.spin_value(), Ok(11));

        // The host's repeat timer delivers fast steps while held.
        combo
            .fast_spin(combo.pressed_spin().unwrap().direction())
            .unwrap();
        assert_eq!(combo.spin_value(), Ok(16));

        let mut release_event = WidgetEvent::MouseRelease(crate::widget::MouseReleaseEvent::new(
            Point::new(115.0, 8.0),
            MouseButton::Left,
            KeyboardModifiers::default(),
        ));
        combo.event(&mut release_event);
        assert_eq!(combo.pressed_spin(), None);
    }

    #[test]
    fn test_typed_text_locates_list_entry() {
        setup();
        let mut combo = ComboBox::with_style(ComboBoxStyle {
            kind: ComboBoxKind::Simple,
            notify: true,
            ..ComboBoxStyle::default()
        });
        combo.add_string("apple").unwrap();
        combo.add_string("banana").unwrap();

        let changes = Arc::new(AtomicUsize::new(0));
        let probe = changes.clone();
        combo.text_changed.connect(move |_| {
            probe.fetch_add(1, Ordering::SeqCst);
        });

        let mut event = WidgetEvent::KeyPress(KeyPressEvent::character('b'));
        combo.event(&mut event);

        assert_eq!(combo.text(), "b");
        assert_eq!(combo.cur_sel(), Some(1));
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_spin_format_parsing() {
        let format = SpinFormat::parse("{}").unwrap();
        assert_eq!(format.render(7), "7");
        assert_eq!(format.parse_value("7"), 7);
        assert_eq!(format.parse_value("-3"), -3);
        assert_eq!(format.parse_value("junk"), 0);

        let format = SpinFormat::parse("level {} of 9").unwrap();
        assert_eq!(format.render(4), "level 4 of 9");
        assert_eq!(format.parse_value("level 4 of 9"), 4);

        assert!(SpinFormat::parse("{}{}").is_err());
        assert!(SpinFormat::parse("none").is_err());
    }
}
