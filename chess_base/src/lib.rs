//! # Base types for skua
//!
//! This is an auxiliary crate for `skua`, holding the core model types (squares, pieces,
//! castling rights) and the board geometry helpers built on top of them. It exists so the
//! model layer stays dependency-light and separately testable.
//!
//! Normally you don't want to use this crate directly. Use `skua` instead.

pub mod geometry;
pub mod types;
