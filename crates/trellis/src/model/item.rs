//! List item record.

use trellis_render::ItemImage;

use crate::model::arena::ItemIndex;

/// Tri-state check value carried by items of a checkbox-style list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    /// Empty checkmark shell.
    #[default]
    Blank,
    /// Fully checked.
    Checked,
    /// Partially checked.
    PartiallyChecked,
}

/// Per-item state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    /// Item carries the selection mark.
    pub selected: bool,
    /// Item rejects selection and interaction.
    pub disabled: bool,
    /// Item text renders bold.
    pub bold: bool,
    /// Item renders with the emphasis background.
    pub significant: bool,
}

/// One list entry.
///
/// The text is owned by the store that allocated the item; the image is a
/// handle to a host-owned resource. `user_data` is opaque to the toolkit.
#[derive(Debug, Clone)]
pub struct ListItem {
    text: String,
    flags: ItemFlags,
    check: CheckState,
    image: Option<ItemImage>,
    user_data: u64,
    pub(crate) next: Option<ItemIndex>,
}

impl ListItem {
    /// Create an item with the given text and default state.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flags: ItemFlags::default(),
            check: CheckState::Blank,
            image: None,
            user_data: 0,
            next: None,
        }
    }

    /// The item's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the item's text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The item's flags.
    pub fn flags(&self) -> ItemFlags {
        self.flags
    }

    /// Mutable access to the item's flags.
    pub fn flags_mut(&mut self) -> &mut ItemFlags {
        &mut self.flags
    }

    /// The item's check state.
    pub fn check(&self) -> CheckState {
        self.check
    }

    /// Set the item's check state.
    pub fn set_check(&mut self, check: CheckState) {
        self.check = check;
    }

    /// The item's image handle, if any.
    pub fn image(&self) -> Option<ItemImage> {
        self.image
    }

    /// Attach or detach an image handle.
    pub fn set_image(&mut self, image: Option<ItemImage>) {
        self.image = image;
    }

    /// The opaque application value attached to this item.
    pub fn user_data(&self) -> u64 {
        self.user_data
    }

    /// Attach an opaque application value.
    pub fn set_user_data(&mut self, data: u64) {
        self.user_data = data;
    }
}

/// Insertion/query record for checkbox- and icon-style lists.
///
/// Mirrors everything an item exposes to the application apart from the
/// selection flag, which only the selection engine touches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListBoxItemInfo {
    /// Item text.
    pub text: String,
    /// Checkmark state.
    pub check: CheckState,
    /// Icon or bitmap handle.
    pub image: Option<ItemImage>,
    /// Emphasis style.
    pub significant: bool,
}

impl ListBoxItemInfo {
    /// Create an info record with the given text and defaults otherwise.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the check state (builder pattern).
    pub fn with_check(mut self, check: CheckState) -> Self {
        self.check = check;
        self
    }

    /// Set the image handle (builder pattern).
    pub fn with_image(mut self, image: ItemImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Mark the item significant (builder pattern).
    pub fn with_significant(mut self) -> Self {
        self.significant = true;
        self
    }
}
