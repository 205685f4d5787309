//! Weekly schedule for running the pipeline.
//!
//! The schedule is a list of `(weekday, HH:MM)` slots in local time. The
//! default posts on Monday, Thursday and Saturday at 09:00.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::future::Future;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// One recurring weekly slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduleSlot {
    pub weekday: Weekday,
    #[serde(with = "hhmm")]
    pub at: NaiveTime,
}

impl ScheduleSlot {
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Option<Self> {
        Some(Self {
            weekday,
            at: NaiveTime::from_hms_opt(hour, minute, 0)?,
        })
    }
}

/// `HH:MM` (seconds optional on input) for slot times in YAML.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(|e| D::Error::custom(format!("invalid slot time {s:?}: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub slots: Vec<ScheduleSlot>,
    /// Run once immediately at startup before waiting for the first slot.
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            slots: [Weekday::Mon, Weekday::Thu, Weekday::Sat]
                .into_iter()
                .filter_map(|weekday| ScheduleSlot::new(weekday, 9, 0))
                .collect(),
            run_on_start: true,
        }
    }
}

impl ScheduleConfig {
    /// Human-readable slot list, e.g. `Mon 09:00, Thu 09:00`.
    pub fn describe(&self) -> String {
        self.slots
            .iter()
            .map(|s| format!("{} {}", s.weekday, s.at.format("%H:%M")))
            .join(", ")
    }
}

/// The earliest slot strictly after `now`.
///
/// Returns `None` only when `slots` is empty; otherwise a slot always falls
/// within the next seven days.
pub fn next_slot(now: NaiveDateTime, slots: &[ScheduleSlot]) -> Option<NaiveDateTime> {
    (0..=7)
        .map(|offset| now.date() + Duration::days(offset))
        .flat_map(|date: NaiveDate| {
            slots
                .iter()
                .filter(move |slot| slot.weekday == date.weekday())
                .map(move |slot| date.and_time(slot.at))
        })
        .filter(|candidate| *candidate > now)
        .min()
}

/// Run `job` at every slot until Ctrl-C.
///
/// Each invocation receives the local date of its slot. A job is never run
/// twice for the same slot, even if the clock wakes up slightly early.
/// Ctrl-C is honored while waiting and while a job runs; an interrupted job
/// is dropped at its next await point.
///
/// # Errors
///
/// Returns an error if no slots are configured.
#[instrument(level = "info", skip_all, fields(slots = %config.describe()))]
pub async fn run_scheduled<F, Fut>(config: &ScheduleConfig, mut job: F) -> Result<(), Box<dyn Error>>
where
    F: FnMut(NaiveDate) -> Fut,
    Fut: Future,
{
    if config.slots.is_empty() {
        return Err("no schedule slots configured".into());
    }

    if config.run_on_start {
        info!("Running job at startup");
        if !run_until_ctrl_c(job(Local::now().date_naive()), tokio::signal::ctrl_c()).await {
            return Ok(());
        }
    }

    let mut last_slot: Option<NaiveDateTime> = None;
    loop {
        let now = Local::now().naive_local();
        let from = last_slot.map_or(now, |last| last.max(now));
        let Some(next) = next_slot(from, &config.slots) else {
            return Err("no schedule slots configured".into());
        };

        let wait = (next - now).to_std().unwrap_or_default();
        info!(next = %next, wait_secs = wait.as_secs(), "Waiting for next slot");

        tokio::select! {
            _ = sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C; stopping scheduler");
                return Ok(());
            }
        }

        info!(slot = %next, "Running scheduled job");
        last_slot = Some(next);
        if !run_until_ctrl_c(job(next.date()), tokio::signal::ctrl_c()).await {
            return Ok(());
        }
    }
}

/// Drive `job` to completion unless `shutdown` resolves first.
///
/// Returns `false` when the job was interrupted.
async fn run_until_ctrl_c<Fut, S>(job: Fut, shutdown: S) -> bool
where
    Fut: Future,
    S: Future,
{
    tokio::select! {
        _ = job => true,
        _ = shutdown => {
            warn!("Received Ctrl-C during a run; abandoning it and stopping scheduler");
            false
        }
    }
}
