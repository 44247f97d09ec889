//! Single-line edit child.
//!
//! The combo box owns one of these as its text field. It is intentionally a
//! thin control: the full editing widget with selections, clipboard and
//! undo lives elsewhere; this child carries exactly the surface the combo
//! consumes: owned text, a caret, grapheme-aware deletion, and an input
//! filter the numeric spin mode uses to restrict typed characters to digits.

use trellis_core::{Object, ObjectId, Signal};
use trellis_render::{Color, Point, Rect, TextStyle};
use unicode_segmentation::UnicodeSegmentation;

use crate::widget::{
    FocusPolicy, Key, KeyPressEvent, MouseButton, PaintContext, SizeHint, SizePolicy,
    SizePolicyPair, Widget, WidgetBase, WidgetEvent,
};

/// A single-line text field.
///
/// # Signals
///
/// - `text_changed(String)`: emitted whenever the text content changes
/// - `clicked(())`: emitted on a left-button press
/// - `double_clicked(())`: emitted on a left-button double-click
pub struct LineEdit {
    /// Widget base.
    base: WidgetBase,

    /// The text content.
    text: String,

    /// Caret position as a byte offset into `text`.
    cursor_pos: usize,

    /// Reject edits from input events.
    read_only: bool,

    /// Accept only ASCII digits from typed input.
    digits_only: bool,

    /// Background color.
    background_color: Color,
    /// Text color.
    text_color: Color,

    /// Signal emitted when the text changes.
    pub text_changed: Signal<String>,
    /// Signal emitted on a left-button press.
    pub clicked: Signal<()>,
    /// Signal emitted on a left-button double-click.
    pub double_clicked: Signal<()>,
}

impl LineEdit {
    /// Create an empty line edit.
    pub fn new() -> Self {
        let mut base = WidgetBase::new::<Self>();
        base.set_focus_policy(FocusPolicy::StrongFocus);
        base.set_size_policy(SizePolicyPair::new(
            SizePolicy::Expanding,
            SizePolicy::Fixed,
        ));

        Self {
            base,
            text: String::new(),
            cursor_pos: 0,
            read_only: false,
            digits_only: false,
            background_color: Color::WHITE,
            text_color: Color::BLACK,
            text_changed: Signal::new(),
            clicked: Signal::new(),
            double_clicked: Signal::new(),
        }
    }

    /// Create a line edit with initial text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut edit = Self::new();
        edit.text = text.into();
        edit.cursor_pos = edit.text.len();
        edit
    }

    /// The current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the current text in bytes.
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Replace the text, moving the caret to the end.
    ///
    /// Emits `text_changed` when the content actually differs.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.cursor_pos = self.text.len();
            self.base.invalidate_all();
            self.text_changed.emit(self.text.clone());
        }
    }

    /// Whether edits from input events are rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Set whether edits from input events are rejected.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Whether typed input is restricted to ASCII digits.
    pub fn digits_only(&self) -> bool {
        self.digits_only
    }

    /// Restrict typed input to ASCII digits (plus backspace/delete).
    ///
    /// The filter applies to input events only; [`set_text`](Self::set_text)
    /// is not filtered.
    pub fn set_digits_only(&mut self, digits_only: bool) {
        self.digits_only = digits_only;
    }

    /// Caret position as a byte offset.
    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    fn prev_grapheme_boundary(&self) -> usize {
        self.text[..self.cursor_pos]
            .grapheme_indices(true)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_grapheme_boundary(&self) -> usize {
        self.text[self.cursor_pos..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor_pos + g.len())
            .unwrap_or(self.text.len())
    }

    fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor_pos, ch);
        self.cursor_pos += ch.len_utf8();
        self.base.invalidate_all();
        self.text_changed.emit(self.text.clone());
    }

    fn handle_key_press(&mut self, event: &KeyPressEvent) -> bool {
        match event.key {
            Key::ArrowLeft => {
                if self.cursor_pos > 0 {
                    self.cursor_pos = self.prev_grapheme_boundary();
                    self.base.invalidate_all();
                }
                return true;
            }
            Key::ArrowRight => {
                if self.cursor_pos < self.text.len() {
                    self.cursor_pos = self.next_grapheme_boundary();
                    self.base.invalidate_all();
                }
                return true;
            }
            Key::Home => {
                self.cursor_pos = 0;
                self.base.invalidate_all();
                return true;
            }
            Key::End => {
                self.cursor_pos = self.text.len();
                self.base.invalidate_all();
                return true;
            }
            Key::Backspace => {
                if !self.read_only && self.cursor_pos > 0 {
                    let prev = self.prev_grapheme_boundary();
                    self.text.replace_range(prev..self.cursor_pos, "");
                    self.cursor_pos = prev;
                    self.base.invalidate_all();
                    self.text_changed.emit(self.text.clone());
                }
                return true;
            }
            Key::Delete => {
                if !self.read_only && self.cursor_pos < self.text.len() {
                    let next = self.next_grapheme_boundary();
                    self.text.replace_range(self.cursor_pos..next, "");
                    self.base.invalidate_all();
                    self.text_changed.emit(self.text.clone());
                }
                return true;
            }
            _ => {}
        }

        // Printable input, filtered before it reaches the buffer.
        if !self.read_only
            && let Some(ch) = event.text.chars().next()
            && !ch.is_control()
        {
            if self.digits_only && !ch.is_ascii_digit() {
                return true;
            }
            self.insert_char(ch);
            return true;
        }

        false
    }
}

impl Widget for LineEdit {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::from_dimensions(120.0, 24.0).with_minimum_dimensions(40.0, 18.0)
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let rect = ctx.rect();
        ctx.renderer().draw_normal_item(rect, self.background_color);

        let style = TextStyle::default();
        let extent = ctx.renderer().text_extent(&self.text, style);
        let text_y = (rect.height() - extent.height) / 2.0;
        ctx.renderer()
            .draw_text(Point::new(2.0, text_y), &self.text, self.text_color, style);

        if self.base.has_focus() {
            let caret_x = 2.0
                + ctx
                    .renderer()
                    .text_extent(&self.text[..self.cursor_pos], style)
                    .width;
            ctx.renderer().draw_focus_frame(
                Rect::new(caret_x, text_y, 1.0, extent.height.max(12.0)),
                self.text_color,
            );
        }
    }

    fn event(&mut self, event: &mut WidgetEvent) -> bool {
        match event {
            WidgetEvent::KeyPress(e) => {
                let e = e.clone();
                self.handle_key_press(&e)
            }
            WidgetEvent::FocusIn(_) | WidgetEvent::FocusOut(_) => {
                self.base.invalidate_all();
                false
            }
            WidgetEvent::MousePress(e) => {
                if e.button == MouseButton::Left {
                    self.clicked.emit(());
                    true
                } else {
                    false
                }
            }
            WidgetEvent::MouseDoubleClick(e) => {
                if e.button == MouseButton::Left {
                    self.double_clicked.emit(());
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

impl Object for LineEdit {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

impl Default for LineEdit {
    fn default() -> Self {
        Self::new()
    }
}
