//! Statistics over the action log.
//!
//! All functions here are pure: they take the log and the current instant and
//! never touch a store. Calendar days are taken in the time zone of the `now`
//! argument, so callers pass `Local::now()` for the user's day.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::models::{EcoLogEntry, Impact};

/// Same-day totals shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    /// Number of entries logged on the day
    pub actions_logged: usize,
    /// Sum of CO2 saved across those entries, in kg
    pub co2_saved: f64,
}

impl DailyStats {
    /// Compute totals for the calendar day containing `now`.
    pub fn compute<Tz: TimeZone>(logs: &[EcoLogEntry], now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        let zone = now.timezone();

        let mut actions_logged = 0;
        let mut co2_saved = 0.0;
        for entry in logs {
            if entry.date.with_timezone(&zone).date_naive() == today {
                actions_logged += 1;
                co2_saved += entry.impact.co2_saved;
            }
        }

        Self {
            actions_logged,
            co2_saved,
        }
    }

    /// CO2 total rounded to one decimal place.
    pub fn co2_display(&self) -> String {
        format_one_decimal(self.co2_saved)
    }
}

/// Sum of every impact in the log.
pub fn total_impact(logs: &[EcoLogEntry]) -> Impact {
    logs.iter().fold(Impact::default(), |acc, entry| Impact {
        co2_saved: acc.co2_saved + entry.impact.co2_saved,
        waste_saved: acc.waste_saved + entry.impact.waste_saved,
        energy_saved: acc.energy_saved + entry.impact.energy_saved,
        water_saved: acc.water_saved + entry.impact.water_saved,
    })
}

/// Consecutive days with at least one entry, counted back from today. A day
/// without entries yet does not break a streak that ran through yesterday.
pub fn current_streak<Tz: TimeZone>(logs: &[EcoLogEntry], now: &DateTime<Tz>) -> u32 {
    let zone = now.timezone();
    let days: HashSet<NaiveDate> = logs
        .iter()
        .map(|entry| entry.date.with_timezone(&zone).date_naive())
        .collect();

    let today = now.date_naive();
    let mut day = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// One decimal place. A value exactly halfway between two tenths rounds away
/// from zero; everything else rounds to the nearest tenth of its exact value.
pub fn format_one_decimal(value: f64) -> String {
    // only multiples of 0.25 with an odd quarter count sit exactly on a tie
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && (quarters / 2.0).fract() != 0.0 {
        return format!("{:.1}", (value * 10.0).round() / 10.0);
    }
    format!("{:.1}", value)
}
