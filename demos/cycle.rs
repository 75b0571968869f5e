//! Disable and re-enable a gamepad by hardware-id fragment.
//!
//! Usage: `cargo run --example cycle -- "VID_045E&PID_028E"`
//! Changing device state usually requires an elevated prompt.

#[cfg(target_os = "windows")]
fn main() {
    use padcycle::backends::windows::cycle_device;
    use padcycle::HardwareIdFilter;

    let fragment = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "VID_045E&PID_028E".to_string());

    let mut filter = HardwareIdFilter::new(&fragment);
    let report = cycle_device(&mut filter);

    println!("matched: {}", report.matched);
    println!("phase:   {:?}", report.phase);
    if let Some(err) = &report.error {
        eprintln!("error:   {err}");
    }
    if filter.is_cleared() {
        println!("no device matching {fragment:?} is known to the system; stop retrying");
    }
}

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("cycle: this demo drives SetupAPI and only runs on Windows");
}
