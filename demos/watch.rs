//! Print HID hot-plug events as they happen.
//!
//! Usage: `cargo run --example watch`

#[cfg(target_os = "windows")]
fn main() -> Result<(), padcycle::Win32Error> {
    use padcycle::backends::windows::DeviceMonitor;
    use padcycle::logger::Logger;
    use padcycle::{EventFilter, Monitor};
    use std::time::Duration;

    #[cfg(feature = "hid")]
    for dev in padcycle::present::present_devices().unwrap_or_default() {
        println!("present: {} ({:04x}:{:04x})", dev.path, dev.vid, dev.pid);
    }

    let mut monitor = DeviceMonitor::new()?;
    monitor.add_listener(Logger::new(), EventFilter::All, None);
    monitor.start()?;

    println!("watching for HID hot-plug events; Ctrl-C to quit");
    loop {
        monitor.pump();
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("watch: device-change broadcasts are Windows-only");
}
