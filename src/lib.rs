//! PadCycle — gamepad device-state cycling and hot-plug monitoring for Rust.
//!
//! Two independent pieces:
//! - The **toggler** ([`toggle`]): finds a device by hardware-id substring and
//!   flips its enabled state through a SetupAPI class-install transaction. The
//!   usual sequence is [`toggle::disable_re_enable`], which disables the
//!   matched gamepad and immediately re-enables it so an alternate driver
//!   stack can claim it in between.
//! - The **monitor** ([`monitor`], [`eventbus`]): raises [`HotplugEvent`]s as
//!   the OS reports device-interface arrivals and removals.
//!
//! OS primitives sit behind the trait seams in [`toggle`]; the real SetupAPI
//! and message-sink adapters live in [`backends::windows`].

pub mod backends;
pub mod broadcast;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filter;
pub mod filtered_listener;
pub mod logger;
pub mod monitor;
#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod present;
pub mod profile;
pub mod toggle;

pub use error::*;
pub use event::*;
pub use eventbus::*;
pub use filter::*;
pub use monitor::*;
pub use toggle::*;
