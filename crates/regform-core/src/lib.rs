#![forbid(unsafe_code)]

//! Core: terminal lifecycle, canonical input events, and geometry.

pub mod event;
pub mod geometry;
pub mod terminal_session;
