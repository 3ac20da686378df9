//! Recency-weighted random choice among candidate records.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::models::ImageRecord;

/// Selection weight of a record at `now`.
///
/// Shown in the last 24 hours: ×0.1; in the last 72 hours: ×0.5;
/// never shown: ×1.5.
pub fn selection_weight(record: &ImageRecord, now: DateTime<Utc>) -> f64 {
    let mut weight = 1.0;

    if let Some(last_shown) = record.last_shown_at {
        let hours_ago = (now - last_shown).num_seconds() as f64 / 3600.0;
        if hours_ago < 24.0 {
            weight *= 0.1;
        } else if hours_ago < 72.0 {
            weight *= 0.5;
        }
    }

    if record.show_count == 0 {
        weight *= 1.5;
    }

    weight
}

/// Pick one record with probability proportional to its weight
pub fn pick_weighted<'a, R: Rng>(
    candidates: &'a [ImageRecord],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<&'a ImageRecord> {
    let weights: Vec<f64> = candidates
        .iter()
        .map(|r| selection_weight(r, now))
        .collect();
    let total: f64 = weights.iter().sum();
    let target = rng.gen::<f64>() * total;

    let mut cumulative = 0.0;
    for (record, weight) in candidates.iter().zip(&weights) {
        cumulative += weight;
        if target <= cumulative {
            return Some(record);
        }
    }
    candidates.last()
}
