//! Tag and directive names shared by the compiler stages.
//!
//! The directive names are consumed by the host engine's template tags and
//! must stay stable across releases.

/// Prefix of every cotton tag name (lower-cased).
pub const COMPONENT_PREFIX: &str = "c-";

/// Named slot tag.
pub const SLOT_TAG: &str = "c-slot";

/// Root-level variable declaration tag.
pub const VARS_TAG: &str = "c-vars";

/// Opens a component invocation.
pub const COMPONENT_OPEN: &str = "cotton_component";

/// Closes a component invocation.
pub const COMPONENT_CLOSE: &str = "end_cotton_component";

/// Opens a slot binding.
pub const SLOT_OPEN: &str = "cotton_slot";

/// Closes a slot binding.
pub const SLOT_CLOSE: &str = "end_cotton_slot";

/// Marks a slot binding that carries an attribute value.
pub const EXPRESSION_ATTR: &str = "expression_attr";

/// Opens a vars frame.
pub const VARS_FRAME_OPEN: &str = "cotton_vars_frame";

/// Closes a vars frame.
pub const VARS_FRAME_CLOSE: &str = "endcotton_vars_frame";

/// Name prefix marking a var whose default is a typed literal.
pub const LITERAL_MARKER: char = ':';
