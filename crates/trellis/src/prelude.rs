//! Curated re-exports for typical hosts.
//!
//! ```
//! use trellis::prelude::*;
//! ```

pub use crate::error::{ControlError, ControlResult};
pub use crate::model::{
    CheckState, ItemFlags, KeyComparator, ListBoxItemInfo,
};
pub use crate::widget::widgets::{
    ComboBox, ComboBoxKind, ComboBoxStyle, LineEdit, ListBox, ListBoxPalette, ListBoxStyle,
    SelectionOp, SpinArrowPlacement, SpinButton, SpinDirection,
};
pub use crate::widget::{
    PaintContext, ScrollBarPolicy, ScrollBarVisibility, ScrollCommand, ScrollInfo, Widget,
    WidgetBase, WidgetEvent,
};
pub use trellis_core::{init_global_registry, Object, ObjectId, Signal};
pub use trellis_render::{
    ArrowDirection, ButtonState, CheckMark, Color, ControlRenderer, Icon, ItemImage, Point, Rect,
    Size, TextMetrics, TextStyle,
};
