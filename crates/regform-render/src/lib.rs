#![forbid(unsafe_code)]

//! Render kernel: styles, cells, buffers, drawing helpers, and ANSI presentation.

pub mod buffer;
pub mod cell;
pub mod drawing;
pub mod presenter;
pub mod style;
