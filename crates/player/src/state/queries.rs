//! Derived queries over the session store.
//!
//! Pure functions; nothing here mutates state.

use std::fmt;

use mafen_protocol::Item;

/// Sum of `info.mw` over items that are curiosities and being studied.
pub fn total_carried_weight(items: &[Item]) -> f64 {
    items
        .iter()
        .filter(|item| item.is_studied_curio())
        .map(|item| item.info.mw)
        .sum()
}

/// Study progress of one item with a linear estimate of the time left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Integer percent complete
    pub percent: u8,
    /// `info.time * (100 - percent) / 100`
    pub minutes_left: f64,
}

/// Progress of `item` given its meter reading.
///
/// Returns `None` when the item has no study time to extrapolate from.
pub fn progress(item: &Item, meter: u8) -> Option<Progress> {
    if !item.info.time.is_finite() {
        return None;
    }
    let remaining = f64::from(100 - meter.min(100));
    Some(Progress {
        percent: meter,
        minutes_left: item.info.time * remaining / 100.0,
    })
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% (~{} left)",
            self.percent,
            minutes_to_hours_minutes(self.minutes_left)
        )
    }
}

/// Render minutes as `H:M`.
///
/// Hours are floored, minutes truncated and not zero padded (`75.0` → `1:15`,
/// `62.0` → `1:2`).
pub fn minutes_to_hours_minutes(total_minutes: f64) -> String {
    let hours = (total_minutes / 60.0).floor();
    let minutes = (total_minutes % 60.0).trunc();
    format!("{}:{}", hours as i64, minutes as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mafen_protocol::{ItemId, ItemInfo};
    use serde_json::Map;

    fn item(id: i64, mw: f64, time: f64, curio: bool, study: bool) -> Item {
        Item {
            id: ItemId::new(id),
            info: ItemInfo {
                mw,
                time,
                curio,
                extra: Map::new(),
            },
            study,
            extra: Map::new(),
        }
    }

    #[test]
    fn weight_counts_only_studied_curios() {
        let items = vec![
            item(1, 5.0, 60.0, true, true),
            item(2, 3.0, 60.0, true, false),
            item(3, 7.0, 60.0, false, true),
        ];
        assert_eq!(total_carried_weight(&items), 5.0);
        assert_eq!(total_carried_weight(&[]), 0.0);
    }

    #[test]
    fn progress_extrapolates_remaining_time() {
        let progress = progress(&item(1, 1.0, 100.0, true, true), 25).unwrap();
        assert_eq!(progress.percent, 25);
        assert_eq!(progress.minutes_left, 75.0);
        assert_eq!(progress.to_string(), "25% (~1:15 left)");
    }

    #[test]
    fn finished_study_has_no_time_left() {
        let progress = progress(&item(1, 1.0, 480.0, true, true), 100).unwrap();
        assert_eq!(progress.to_string(), "100% (~0:0 left)");
    }

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(minutes_to_hours_minutes(75.0), "1:15");
        assert_eq!(minutes_to_hours_minutes(62.0), "1:2");
        assert_eq!(minutes_to_hours_minutes(59.9), "0:59");
        assert_eq!(minutes_to_hours_minutes(1440.0), "24:0");
    }
}
