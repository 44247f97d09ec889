//! Layout size hints and policies.

use trellis_render::Size;

/// How a widget behaves when the layout offers it more or less space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePolicy {
    /// The size hint is exact; the widget never grows or shrinks.
    Fixed,
    /// The hint is preferred but the widget tolerates other sizes.
    #[default]
    Preferred,
    /// The widget actively wants as much space as it can get.
    Expanding,
}

/// A horizontal/vertical pair of size policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePolicyPair {
    /// Horizontal behavior.
    pub horizontal: SizePolicy,
    /// Vertical behavior.
    pub vertical: SizePolicy,
}

impl SizePolicyPair {
    /// Create a policy pair.
    pub fn new(horizontal: SizePolicy, vertical: SizePolicy) -> Self {
        Self { horizontal, vertical }
    }

    /// Both axes fixed.
    pub fn fixed() -> Self {
        Self::new(SizePolicy::Fixed, SizePolicy::Fixed)
    }

    /// Both axes expanding.
    pub fn expanding() -> Self {
        Self::new(SizePolicy::Expanding, SizePolicy::Expanding)
    }
}

/// Preferred and bounding sizes reported by a widget for layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeHint {
    /// The size the widget would like.
    pub preferred: Size,
    /// The smallest usable size, if bounded.
    pub minimum: Option<Size>,
    /// The largest useful size, if bounded.
    pub maximum: Option<Size>,
}

impl SizeHint {
    /// Create a hint with only a preferred size.
    pub fn new(preferred: Size) -> Self {
        Self {
            preferred,
            minimum: None,
            maximum: None,
        }
    }

    /// Create a hint from raw dimensions.
    pub fn from_dimensions(width: f32, height: f32) -> Self {
        Self::new(Size::new(width, height))
    }

    /// Set the minimum size (builder pattern).
    pub fn with_minimum(mut self, minimum: Size) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Set the minimum size from raw dimensions (builder pattern).
    pub fn with_minimum_dimensions(mut self, width: f32, height: f32) -> Self {
        self.minimum = Some(Size::new(width, height));
        self
    }

    /// Set the maximum size (builder pattern).
    pub fn with_maximum(mut self, maximum: Size) -> Self {
        self.maximum = Some(maximum);
        self
    }
}
