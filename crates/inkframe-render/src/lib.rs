//! InkFrame Render Library
//!
//! Paint-context implementations for the InkFrame editor tree.
//! The default implementation records into a Vello scene.

#[cfg(feature = "vello-renderer")]
mod vello_painter;

#[cfg(feature = "vello-renderer")]
pub use vello_painter::VelloPainter;
