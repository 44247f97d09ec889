//! The Trellis controls.

mod combo_box;
mod line_edit;
mod list_box;

pub use combo_box::{ComboBox, ComboBoxKind, ComboBoxStyle, SpinArrowPlacement, SpinButton, SpinDirection};
pub use line_edit::LineEdit;
pub use list_box::{ListBox, ListBoxPalette, ListBoxStyle, SelectionOp};
