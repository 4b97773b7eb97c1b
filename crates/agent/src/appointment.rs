//! Appointment slot filling
//!
//! Three fixed slots (date, time, purpose) accumulate across turns. The
//! record fills monotonically: a new non-empty extraction overwrites a slot,
//! an empty extraction never clears one. Once every slot is filled the record
//! is effectively immutable and each further appointment turn re-confirms.

use serde::{Deserialize, Serialize};

/// Slot keys in their fixed reporting order
pub const SLOT_KEYS: [&str; 3] = ["date", "time", "purpose"];

/// Fields extracted from a single message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedSlots {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub purpose: String,
}

impl ExtractedSlots {
    /// True when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.date.trim().is_empty()
            && self.time.trim().is_empty()
            && self.purpose.trim().is_empty()
    }
}

/// State of an appointment record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentState {
    /// At least one slot is still empty
    Collecting,
    /// All slots filled
    Confirmed,
}

/// Per-session appointment slot record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentRecord {
    date: Option<String>,
    time: Option<String>,
    purpose: Option<String>,
}

/// Result of merging a new extraction into the record
#[derive(Debug, Clone, PartialEq)]
pub enum AppointmentOutcome {
    /// Some slots are missing; `prompt` asks for exactly those
    Collecting { prompt: String },
    /// Every slot is filled
    Confirmed { confirmation: String },
}

impl AppointmentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    /// Merge newly extracted values; non-empty values win, empty values never
    /// erase what is already stored.
    pub fn merge(&mut self, extracted: &ExtractedSlots) {
        merge_slot(&mut self.date, &extracted.date);
        merge_slot(&mut self.time, &extracted.time);
        merge_slot(&mut self.purpose, &extracted.purpose);
    }

    /// Names of slots still empty, in the fixed order date, time, purpose
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push(SLOT_KEYS[0]);
        }
        if self.time.is_none() {
            missing.push(SLOT_KEYS[1]);
        }
        if self.purpose.is_none() {
            missing.push(SLOT_KEYS[2]);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn state(&self) -> AppointmentState {
        if self.is_complete() {
            AppointmentState::Confirmed
        } else {
            AppointmentState::Collecting
        }
    }

    /// Merge an extraction and report whether the appointment is complete
    pub fn apply(&mut self, extracted: &ExtractedSlots) -> AppointmentOutcome {
        self.merge(extracted);

        let missing = self.missing_fields();
        if missing.is_empty() {
            AppointmentOutcome::Confirmed {
                confirmation: format!(
                    "Your appointment has been confirmed for {} at {} for {}.",
                    self.date.as_deref().unwrap_or(""),
                    self.time.as_deref().unwrap_or(""),
                    self.purpose.as_deref().unwrap_or(""),
                ),
            }
        } else {
            AppointmentOutcome::Collecting {
                prompt: format!(
                    "I need more details to confirm your appointment. Can you provide the {}?",
                    missing.join(" and ")
                ),
            }
        }
    }
}

fn merge_slot(slot: &mut Option<String>, value: &str) {
    let trimmed = value.trim();
    if !trimmed.is_empty() {
        *slot = Some(trimmed.to_string());
    }
}
