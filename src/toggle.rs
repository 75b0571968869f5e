//! Device enumerate-and-toggle protocol.
//!
//! This module is the platform-independent core. It drives an abstract
//! enumeration session ([`DeviceInfoSet`]) obtained from a
//! [`DeviceEnumerator`], matches a record by hardware-id substring, and
//! applies a class-install state change to it. The real SetupAPI adapter
//! lives in [`backends::windows::setupdi`](crate::backends); tests script the
//! same seam with in-memory fakes.
//!
//! ## The three-way enumeration step
//! One enumeration step is *not* a boolean. [`EnumStep`] distinguishes:
//! - `Found(record)` — a record exists at this index, inspect it;
//! - `Continue` — no record here, but the list is not finished (transient);
//! - `Exhausted` — the list is done.
//!
//! Collapsing `Continue` and `Exhausted` either terminates a scan too early
//! or loops forever, depending on which way you collapse.
//!
//! ## The disable/re-enable cycle
//! [`disable_re_enable`] runs two ordered phases against the same filter:
//! DISABLE, then ENABLE. Phase results and any captured OS failure are
//! reported by value in a [`CycleReport`]; nothing is threaded back through
//! out-parameters. A filter that matched nothing is cleared so callers stop
//! retrying (see [`HardwareIdFilter`]).

use crate::error::Win32Error;
use crate::filter::HardwareIdFilter;

/// Target state for a class-install property-change transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateChange {
    Enable,
    Disable,
}

/// Result of one enumeration step at a given index.
#[derive(Debug)]
pub enum EnumStep<R> {
    /// A record exists at this index.
    Found(R),
    /// No record at this index, but more indices may hold one.
    Continue,
    /// The device list is exhausted.
    Exhausted,
}

/// One open device-information session.
///
/// Implementations own the OS session handle and must release it when the
/// value is dropped; [`change_device_state`] relies on that for its
/// release-on-every-path guarantee.
pub trait DeviceInfoSet {
    /// Opaque per-device record handed back by [`enum_step`](Self::enum_step).
    type Record;

    /// Enumerate the record at `index`. See the module docs for the
    /// three-way semantics.
    fn enum_step(&mut self, index: u32) -> Result<EnumStep<Self::Record>, Win32Error>;

    /// Read the record's hardware ids. An empty list means the device
    /// reports none; that is not an error.
    fn hardware_ids(&mut self, record: &Self::Record) -> Result<Vec<String>, Win32Error>;

    /// Submit the property-change transaction for `record`: set the
    /// class-install parameters, then apply the state change. Either step
    /// failing fails the whole transaction.
    fn apply_state_change(
        &mut self,
        record: &Self::Record,
        change: StateChange,
    ) -> Result<(), Win32Error>;
}

/// Factory for enumeration sessions.
pub trait DeviceEnumerator {
    type Set: DeviceInfoSet;

    /// Open a session over *all* device classes; the hardware-id substring
    /// alone discriminates.
    fn open_all_classes(&mut self) -> Result<Self::Set, Win32Error>;
}

/// Result of one enumerate-and-toggle pass.
#[derive(Debug)]
pub enum ToggleOutcome {
    /// A record matched the filter and the state change was applied.
    Matched,
    /// A record matched, but the class-install transaction failed. Matching
    /// is reported independently of transaction success.
    MatchedTransactionFailed(Win32Error),
    /// Enumeration finished cleanly without a match. The device list was not
    /// modified; callers should stop retrying this filter.
    NoMatch,
}

impl ToggleOutcome {
    /// `true` if a real record matched the filter, regardless of whether the
    /// transaction went through.
    pub fn matched(&self) -> bool {
        !matches!(self, ToggleOutcome::NoMatch)
    }
}

/// How far a disable/re-enable cycle progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CyclePhase {
    /// No state change was applied (no match, or the disable failed).
    NotStarted,
    /// The device was disabled but not re-enabled.
    DisableOnly,
    /// Both phases completed: disabled, then re-enabled.
    DisableThenEnable,
}

/// By-value report of one [`disable_re_enable`] cycle.
#[derive(Debug)]
pub struct CycleReport {
    /// Whether a real record matched the filter.
    pub matched: bool,
    /// How far the cycle got.
    pub phase: CyclePhase,
    /// The first OS failure captured during either phase, if any.
    pub error: Option<Win32Error>,
}

impl CycleReport {
    fn idle() -> Self {
        Self {
            matched: false,
            phase: CyclePhase::NotStarted,
            error: None,
        }
    }

    /// Convenience view over [`error`](Self::error).
    pub fn had_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Walk the device list and flip the first record whose hardware id contains
/// `pattern`.
///
/// The session opened here is released on every exit path, including `Err`
/// returns, via the [`DeviceInfoSet`] drop guarantee. Hardware ids are read
/// at most once per inspected record.
///
/// Enumeration-level failures (opening the session, stepping, reading a
/// property) are returned as `Err`. A failing transaction against a matched
/// record is *not* an `Err`: it comes back as
/// [`ToggleOutcome::MatchedTransactionFailed`] so the match itself stays
/// visible.
pub fn change_device_state<E: DeviceEnumerator>(
    enumerator: &mut E,
    pattern: &str,
    change: StateChange,
) -> Result<ToggleOutcome, Win32Error> {
    let mut set = enumerator.open_all_classes()?;

    let mut index = 0u32;
    let matched = loop {
        match set.enum_step(index)? {
            EnumStep::Found(record) => {
                let ids = set.hardware_ids(&record)?;
                if ids.iter().any(|id| id.contains(pattern)) {
                    break Some(record);
                }
                index += 1;
            }
            EnumStep::Continue => index += 1,
            EnumStep::Exhausted => break None,
        }
    };

    let Some(record) = matched else {
        return Ok(ToggleOutcome::NoMatch);
    };

    match set.apply_state_change(&record, change) {
        Ok(()) => Ok(ToggleOutcome::Matched),
        Err(e) => Ok(ToggleOutcome::MatchedTransactionFailed(e)),
    }
}

/// Disable the first device matching `filter`, then re-enable it.
///
/// - A cleared filter returns immediately without touching the OS.
/// - A clean no-match clears the filter so the caller stops retrying.
/// - An enumeration failure keeps the filter armed (the device may simply
///   not be visible yet) and reports the error.
/// - OS failures from either phase are captured into the report rather than
///   raised; [`CycleReport::had_error`] is the boolean view.
pub fn disable_re_enable<E: DeviceEnumerator>(
    enumerator: &mut E,
    filter: &mut HardwareIdFilter,
) -> CycleReport {
    let Some(pattern) = filter.pattern().map(str::to_owned) else {
        return CycleReport::idle();
    };

    match change_device_state(enumerator, &pattern, StateChange::Disable) {
        Ok(ToggleOutcome::NoMatch) => {
            filter.clear();
            CycleReport::idle()
        }
        Ok(ToggleOutcome::MatchedTransactionFailed(e)) => CycleReport {
            matched: true,
            phase: CyclePhase::NotStarted,
            error: Some(e),
        },
        Err(e) => CycleReport {
            matched: false,
            phase: CyclePhase::NotStarted,
            error: Some(e),
        },
        Ok(ToggleOutcome::Matched) => {
            let (phase, error) = match change_device_state(enumerator, &pattern, StateChange::Enable)
            {
                Ok(ToggleOutcome::Matched) => (CyclePhase::DisableThenEnable, None),
                Ok(ToggleOutcome::MatchedTransactionFailed(e)) => {
                    (CyclePhase::DisableOnly, Some(e))
                }
                // The device vanished between phases; the disable stood.
                Ok(ToggleOutcome::NoMatch) => (CyclePhase::DisableOnly, None),
                Err(e) => (CyclePhase::DisableOnly, Some(e)),
            };
            CycleReport {
                matched: true,
                phase,
                error,
            }
        }
    }
}
