//! # MouseV2 Types
//!
//! Fundamental type definitions shared by the MouseV2 firmware crates.
//!
//! ## Modules
//!
//! - [`mouse_button`] - Mouse button bitfield
//! - [`report`] - The mouse HID report, its wire encoding and persistence rules
//! - [`descriptor`] - The HID report descriptor matching [`report::MouseReport`]

#![no_std]

pub mod descriptor;
pub mod mouse_button;
pub mod report;
