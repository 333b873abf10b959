//! HID report descriptor of the mouse.
//!
//! The layout must stay in sync with [`crate::report::MouseReport::to_bytes`].

/// Report ID of the mouse report
pub const MOUSE_REPORT_ID: u8 = 0x01;

/// Mouse report descriptor: 3 buttons, 8-bit wheel, 12-bit X/Y
#[rustfmt::skip]
pub const REPORT_DESCRIPTOR: [u8; 68] = [
    0x05, 0x01,                 // Usage Page (Generic Desktop)
    0x09, 0x02,                 // Usage (Mouse)
    0xA1, 0x01,                 // Collection (Application)
    0x85, MOUSE_REPORT_ID,      //   Report ID (1)
    0x09, 0x01,                 //   Usage (Pointer)
    0xA1, 0x00,                 //   Collection (Physical)
    0x95, 0x03,                 //     Report Count (3)
    0x75, 0x01,                 //     Report Size (1)
    0x05, 0x09,                 //     Usage Page (Buttons)
    0x19, 0x01,                 //     Usage Minimum (1)
    0x29, 0x03,                 //     Usage Maximum (3)
    0x15, 0x00,                 //     Logical Minimum (0)
    0x25, 0x01,                 //     Logical Maximum (1)
    0x81, 0x02,                 //     Input (Data, Variable, Absolute)
    0x95, 0x01,                 //     Report Count (1)
    0x75, 0x05,                 //     Report Size (5)
    0x81, 0x01,                 //     Input (Constant), padding
    0x95, 0x01,                 //     Report Count (1)
    0x75, 0x08,                 //     Report Size (8)
    0x05, 0x01,                 //     Usage Page (Generic Desktop)
    0x09, 0x38,                 //     Usage (Wheel)
    0x15, 0x81,                 //     Logical Minimum (-127)
    0x25, 0x7F,                 //     Logical Maximum (127)
    0x81, 0x06,                 //     Input (Data, Variable, Relative)
    0x95, 0x02,                 //     Report Count (2)
    0x75, 0x0C,                 //     Report Size (12)
    0x05, 0x01,                 //     Usage Page (Generic Desktop)
    0x09, 0x30,                 //     Usage (X)
    0x09, 0x31,                 //     Usage (Y)
    0x16, 0x01, 0xF8,           //     Logical Minimum (-2047)
    0x26, 0xFF, 0x07,           //     Logical Maximum (2047)
    0x81, 0x06,                 //     Input (Data, Variable, Relative)
    0xC0,                       //   End Collection (Physical)
    0xC0,                       // End Collection (Application)
];
