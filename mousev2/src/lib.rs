#![doc = include_str!("../../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod config;
pub mod debounce;
pub mod driver;
pub mod gpio;
pub mod hid;
pub mod source;
pub mod toggle_queue;
#[cfg(feature = "usb")]
pub mod usb;

pub use mousev2_types as types;
pub use mousev2_types::descriptor::{MOUSE_REPORT_ID, REPORT_DESCRIPTOR};
pub use mousev2_types::mouse_button::MouseButtons;
pub use mousev2_types::report::MouseReport;

/// Raw mutex used by every shared state of the crate.
///
/// Critical sections are the only locking primitive which is safe to take from
/// interrupt context.
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

// Include generated constants
include!(concat!(env!("OUT_DIR"), "/constants.rs"));
