use chrono::{DateTime, Duration, Timelike, Utc};

/// One usage-accounting window. `end` is always `start + session_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Default accounting window length.
pub fn default_session_duration() -> Duration {
    Duration::hours(5)
}

/// Find the block containing `now`, if the user is inside one.
///
/// `timestamps` are the activity instants of qualifying transcript records
/// (usage present, not sidechain), in any order. The detection runs in two
/// passes over explicitly sorted arrays so the boundary arithmetic stays
/// auditable:
///
/// 1. newest-first, walk backward while consecutive gaps stay under the
///    session duration to find where the current uninterrupted run began;
/// 2. oldest-first, lay down non-overlapping blocks from that point on,
///    flooring each block start to the top of its hour.
///
/// A gap of exactly the session duration ends the run. An idle stretch
/// longer than the session duration between the newest activity and `now`
/// means no active block at all.
pub fn active_block(
    timestamps: &[DateTime<Utc>],
    now: DateTime<Utc>,
    session_duration: Duration,
) -> Option<SessionBlock> {
    if timestamps.is_empty() {
        return None;
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let most_recent = sorted[0];
    if now - most_recent > session_duration {
        return None;
    }

    let mut continuous_start = most_recent;
    for pair in sorted.windows(2) {
        let (newer, older) = (pair[0], pair[1]);
        if newer - older >= session_duration {
            break;
        }
        continuous_start = older;
    }

    sorted.reverse();

    let mut blocks: Vec<SessionBlock> = Vec::new();
    let mut open: Option<SessionBlock> = None;
    for &ts in &sorted {
        if ts < continuous_start {
            continue;
        }
        if open.is_none_or(|block| ts > block.end) {
            let start = floor_to_hour(ts);
            let block = SessionBlock {
                start,
                end: start + session_duration,
            };
            blocks.push(block);
            open = Some(block);
        }
    }

    blocks.into_iter().find(|block| {
        block.start <= now
            && now <= block.end
            && sorted
                .iter()
                .any(|ts| block.start <= *ts && *ts <= block.end)
    })
}

/// Zero out minutes, seconds and sub-seconds so block starts land on hour
/// boundaries even when the triggering activity was mid-hour.
fn floor_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}
