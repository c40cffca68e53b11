//! Styled document model for the Kestrel browser core.
//!
//! Every markup dialect renders into the same [`Document`]: an ordered list
//! of styled blocks and runs, a page title and a heading [`Outline`].
//! The model is independent of any display technology; presentation layers
//! consume it read-only.
//!
//! # Design
//!
//! Renderers never build blocks by hand. They drive a [`DocumentWriter`],
//! which owns block emission, list and quote nesting, heading capture and
//! the two-phase outline builder.

/// sRGB colors.
pub mod color;
/// Blocks, runs and their styles.
pub mod model;
/// Heading outline and its builder.
pub mod outline;
/// Style bundle mapping roles to attributes.
pub mod style;
/// Block-emission cursor shared by all renderers.
pub mod writer;

pub use color::Color;
pub use model::{
    Alignment, Block, BlockRole, BlockStyle, CharStyle, Document, ListMarker, Run, TextRole,
};
pub use outline::{Outline, OutlineBuilder, OutlineEntry, OutlineNode};
pub use style::{DocumentStyle, TextFormat, ThemeKind};
pub use writer::DocumentWriter;
