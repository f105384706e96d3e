/**
 * Delivery-Status Reconciliation
 *
 * Outbound messages accumulate delivery-status events from provider webhooks.
 * Webhooks arrive out of order, with clock skew, and with partial or missing
 * timestamps, so the list of raw events must be reconciled into a single
 * authoritative label.
 *
 * # Algorithm
 *
 * One pass, left to right, tracking a running best candidate:
 *
 * 1. Entries without a recognized status are discarded.
 * 2. Each remaining entry gets a comparable time value: the `timestamp` field
 *    converted to epoch milliseconds, falling back to `created_at` when the
 *    timestamp is absent or unparseable. Unknown time loses to any known time.
 * 3. Ties break on `created_at`, then on rank (read > delivered > sent), then
 *    on input position (later wins).
 *
 * Explicit event timestamps are authoritative over array order; array order
 * only decides when no usable timestamp distinguishes two events, matching
 * providers that append status arrays monotonically even when timestamps are
 * missing or identical.
 */

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Numeric timestamps above this value are epoch milliseconds; at or below,
/// epoch seconds. No unit hints are consulted.
const MILLIS_THRESHOLD: f64 = 1_000_000_000_000.0;

/// The three normalized delivery states, in increasing authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizedStatus {
    Sent,
    Delivered,
    Read,
}

impl NormalizedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Sent => 1,
            Self::Delivered => 2,
            Self::Read => 3,
        }
    }
}

/// Raw timestamp as emitted by providers: epoch number or numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Number(f64),
    Text(String),
}

/// A single raw delivery-status event
///
/// `status` is free text; only `sent`, `delivered`/`delivered_*` and
/// `read`/`read_*` are recognized. Unrecognized entries still occupy a list
/// position but never become the result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusEvent {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Normalize a raw status string to one of the three recognized labels
///
/// Matching is case-insensitive and ignores surrounding whitespace.
/// `read`/`delivered` also match suffixed forms (`read_pending`,
/// `delivered_to_device`); `sent` is matched exactly.
pub fn normalize_status(raw: &str) -> Option<NormalizedStatus> {
    let status = raw.trim().to_ascii_lowercase();
    if status == "read" || status.starts_with("read_") {
        Some(NormalizedStatus::Read)
    } else if status == "delivered" || status.starts_with("delivered_") {
        Some(NormalizedStatus::Delivered)
    } else if status == "sent" {
        Some(NormalizedStatus::Sent)
    } else {
        None
    }
}

/// Convert a raw timestamp to epoch milliseconds
///
/// Values above [`MILLIS_THRESHOLD`] are already milliseconds; anything else
/// is seconds. Numeric strings are parsed in the same form; non-numeric or
/// non-finite input yields `None`.
fn epoch_millis(raw: &RawTimestamp) -> Option<i64> {
    let number = match raw {
        RawTimestamp::Number(n) => *n,
        RawTimestamp::Text(text) => text.trim().parse::<f64>().ok()?,
    };
    if !number.is_finite() {
        return None;
    }
    if number > MILLIS_THRESHOLD {
        Some(number as i64)
    } else {
        Some((number * 1000.0) as i64)
    }
}

/// Truncate fractional seconds to at most three digits, keeping any timezone
/// suffix intact. Truncation, not rounding: sub-millisecond precision is
/// dropped.
fn truncate_fraction(value: &str) -> String {
    let Some(dot) = value.find('.') else {
        return value.to_string();
    };
    let frac_start = dot + 1;
    let frac_end = value[frac_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| frac_start + i)
        .unwrap_or(value.len());
    let digits = &value[frac_start..frac_end];
    let kept = &digits[..digits.len().min(3)];
    if kept.is_empty() {
        format!("{}{}", &value[..dot], &value[frac_end..])
    } else {
        format!("{}.{}{}", &value[..dot], kept, &value[frac_end..])
    }
}

/// Parse an ISO-8601-like `created_at` string to epoch milliseconds
///
/// A missing timezone suffix is assumed to be UTC.
fn parse_created_at(raw: &str) -> Option<i64> {
    let value = truncate_fraction(raw.trim());
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&value) {
        return Some(parsed.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&value, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    None
}

struct Candidate {
    status: NormalizedStatus,
    time: Option<i64>,
    created: Option<i64>,
}

/// Any concrete time beats unknown; unknown vs unknown is a tie.
fn compare_time(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Does the later entry displace the current best?
fn displaces(challenger: &Candidate, holder: &Candidate) -> bool {
    match compare_time(challenger.time, holder.time) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => match compare_time(challenger.created, holder.created) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => {
                if challenger.status.rank() != holder.status.rank() {
                    challenger.status.rank() > holder.status.rank()
                } else {
                    // Full tie: last write wins.
                    true
                }
            }
        },
    }
}

/// Select the single most-authoritative status from a list of raw events
///
/// Returns `None` when the input is empty or contains no recognized status.
pub fn pick_latest_status(events: &[StatusEvent]) -> Option<NormalizedStatus> {
    let mut best: Option<Candidate> = None;
    for event in events {
        let Some(status) = event.status.as_deref().and_then(normalize_status) else {
            continue;
        };
        let created = event.created_at.as_deref().and_then(parse_created_at);
        let time = event.timestamp.as_ref().and_then(epoch_millis).or(created);
        let candidate = Candidate {
            status,
            time,
            created,
        };
        best = Some(match best.take() {
            None => candidate,
            Some(holder) if displaces(&candidate, &holder) => candidate,
            Some(holder) => holder,
        });
    }
    best.map(|candidate| candidate.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(status: &str, timestamp: Option<f64>, created_at: Option<&str>) -> StatusEvent {
        StatusEvent {
            status: Some(status.to_string()),
            timestamp: timestamp.map(RawTimestamp::Number),
            created_at: created_at.map(str::to_string),
        }
    }

    #[test]
    fn normalization_ignores_case_and_whitespace() {
        assert_eq!(normalize_status("READ_pending"), Some(NormalizedStatus::Read));
        assert_eq!(
            normalize_status(" read_pending "),
            Some(NormalizedStatus::Read)
        );
        assert_eq!(normalize_status("Delivered"), Some(NormalizedStatus::Delivered));
        assert_eq!(
            normalize_status("delivered_to_device"),
            Some(NormalizedStatus::Delivered)
        );
        assert_eq!(normalize_status("  SENT"), Some(NormalizedStatus::Sent));
        assert_eq!(normalize_status("sent_out"), None);
        assert_eq!(normalize_status("failed"), None);
        assert_eq!(normalize_status(""), None);
    }

    #[test]
    fn result_depends_on_time_not_position() {
        let forward = [event("read", Some(100.0), None), event("sent", Some(50.0), None)];
        let reversed = [event("sent", Some(50.0), None), event("read", Some(100.0), None)];
        assert_eq!(pick_latest_status(&forward), Some(NormalizedStatus::Read));
        assert_eq!(pick_latest_status(&reversed), Some(NormalizedStatus::Read));
    }

    #[test]
    fn rank_breaks_exact_time_ties_in_both_orders() {
        let a = [
            event("delivered", Some(100.0), None),
            event("read", Some(100.0), None),
        ];
        let b = [
            event("read", Some(100.0), None),
            event("delivered", Some(100.0), None),
        ];
        assert_eq!(pick_latest_status(&a), Some(NormalizedStatus::Read));
        assert_eq!(pick_latest_status(&b), Some(NormalizedStatus::Read));
    }

    #[test]
    fn equal_rank_ties_go_to_the_later_entry() {
        let events = [event("sent", Some(100.0), None), event("sent", Some(100.0), None)];
        assert_eq!(pick_latest_status(&events), Some(NormalizedStatus::Sent));
    }

    #[test]
    fn no_recognized_status_yields_none() {
        assert_eq!(pick_latest_status(&[]), None);
        assert_eq!(
            pick_latest_status(&[event("failed", Some(1.0), None)]),
            None
        );
    }

    #[test]
    fn unrecognized_entries_are_skipped_but_recognized_ones_still_win() {
        let events = [
            event("sent", Some(100.0), None),
            event("failed", Some(200.0), None),
        ];
        assert_eq!(pick_latest_status(&events), Some(NormalizedStatus::Sent));
    }

    #[test]
    fn seconds_and_milliseconds_are_disambiguated_by_magnitude() {
        // 1_700_000_000 seconds and 1_700_000_000_500 ms are half a second apart
        let events = [
            event("read", Some(1_700_000_000.0), None),
            event("delivered", Some(1_700_000_000_500.0), None),
        ];
        assert_eq!(pick_latest_status(&events), Some(NormalizedStatus::Delivered));
    }

    #[test]
    fn numeric_string_timestamps_parse() {
        let events = [
            StatusEvent {
                status: Some("sent".to_string()),
                timestamp: Some(RawTimestamp::Text("50".to_string())),
                created_at: None,
            },
            StatusEvent {
                status: Some("read".to_string()),
                timestamp: Some(RawTimestamp::Text("100".to_string())),
                created_at: None,
            },
        ];
        assert_eq!(pick_latest_status(&events), Some(NormalizedStatus::Read));
    }

    #[test]
    fn created_at_is_the_fallback_when_timestamp_is_absent() {
        let events = [
            event("read", None, Some("2024-03-01T10:00:00Z")),
            event("sent", None, Some("2024-03-01T11:00:00Z")),
        ];
        assert_eq!(pick_latest_status(&events), Some(NormalizedStatus::Sent));
    }

    #[test]
    fn created_at_without_timezone_is_treated_as_utc() {
        let events = [
            event("sent", None, Some("2024-03-01T10:00:00")),
            event("read", None, Some("2024-03-01T10:00:01Z")),
        ];
        assert_eq!(pick_latest_status(&events), Some(NormalizedStatus::Read));
    }

    #[test]
    fn microsecond_fractions_are_truncated_not_rounded() {
        // .9996 rounds up to the next millisecond but must truncate to .999
        assert_eq!(
            parse_created_at("2024-03-01T10:00:00.9996Z"),
            parse_created_at("2024-03-01T10:00:00.999Z")
        );
    }

    #[test]
    fn concrete_time_beats_unknown_regardless_of_rank() {
        let events = [
            event("read", None, None),
            event("sent", Some(50.0), None),
        ];
        assert_eq!(pick_latest_status(&events), Some(NormalizedStatus::Sent));
    }

    #[test]
    fn unparseable_time_still_competes_on_rank_and_order() {
        let events = [
            StatusEvent {
                status: Some("sent".to_string()),
                timestamp: Some(RawTimestamp::Text("not-a-number".to_string())),
                created_at: Some("garbage".to_string()),
            },
            event("delivered", None, None),
        ];
        assert_eq!(pick_latest_status(&events), Some(NormalizedStatus::Delivered));
    }

    #[test]
    fn deserializes_mixed_timestamp_forms() {
        let events: Vec<StatusEvent> = serde_json::from_value(serde_json::json!([
            {"status": "sent", "timestamp": 1700000000},
            {"status": "delivered", "timestamp": "1700000100"},
            {"status": "read", "created_at": "2023-11-14T22:16:40.123456Z"}
        ]))
        .unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(pick_latest_status(&events), Some(NormalizedStatus::Read));
    }
}
