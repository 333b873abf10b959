use std::path::Path;
use std::{env, fs};

use const_gen::*;
use mousev2_config::MouseTomlConfig;

fn main() {
    // Ensure build.rs is re-run when files change
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=MOUSE_TOML_PATH");

    // Read mouse.toml if it's present
    let config = if let Ok(toml_path) = env::var("MOUSE_TOML_PATH") {
        println!("cargo:rerun-if-changed={toml_path}");
        MouseTomlConfig::load(&toml_path).unwrap_or_else(|e| panic!("❌ {e}"))
    } else {
        MouseTomlConfig::default()
    };

    let constants = get_constants_str(&config);

    // Write to constants.rs file
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&dest_path, constants).expect("Failed to write constants.rs file");
}

fn get_constants_str(config: &MouseTomlConfig) -> String {
    let mouse = &config.mouse;
    let device = &config.device;
    let constant_strs = vec![
        const_declaration!(pub DEBOUNCE_NUM_SHIFTS = mouse.debounce_num_shifts),
        const_declaration!(pub DEBOUNCE_TIMER_PERIOD_US = mouse.debounce_timer_period_us),
        const_declaration!(pub SINK_POST_SEND_DELAY_MS = mouse.sink_post_send_delay_ms),
        const_declaration!(pub SENSOR_SURFACE_QUALITY_THRESHOLD = mouse.sensor_surface_quality_threshold),
        const_declaration!(pub USB_VID = device.vendor_id),
        const_declaration!(pub USB_PID = device.product_id),
        const_declaration!(pub USB_MANUFACTURER = device.manufacturer),
        const_declaration!(pub USB_PRODUCT_NAME = device.product_name),
        const_declaration!(pub USB_SERIAL_NUMBER = device.serial_number),
    ];

    constant_strs
        .into_iter()
        .map(|s| "#[allow(clippy::redundant_static_lifetimes)]\n".to_owned() + s.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
