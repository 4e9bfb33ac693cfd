use crate::domain::Fill;
use std::collections::{HashMap, HashSet};

/// Trade ids observed in earlier polls.
///
/// Unbounded by default. With a retention of N polls, an id is forgotten once
/// it has been absent from N consecutive successful fill polls.
#[derive(Debug, Clone, Default)]
pub struct SeenFillIds {
    /// tid -> poll sequence number in which it was last observed.
    last_seen: HashMap<String, u64>,
    poll_seq: u64,
    retention_polls: Option<u64>,
}

impl SeenFillIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evict ids not observed within the last `polls` polls (minimum 1).
    pub fn with_retention(polls: u64) -> Self {
        Self {
            retention_polls: Some(polls.max(1)),
            ..Self::default()
        }
    }

    pub fn contains(&self, tid: &str) -> bool {
        self.last_seen.contains_key(tid)
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }

    /// Mark every id in one poll's window as seen, then apply retention.
    fn record_poll<'a>(&mut self, tids: impl Iterator<Item = &'a str>) {
        self.poll_seq += 1;
        let seq = self.poll_seq;
        for tid in tids {
            self.last_seen.insert(tid.to_string(), seq);
        }
        if let Some(retention) = self.retention_polls {
            self.last_seen.retain(|_, last| seq - *last < retention);
        }
    }
}

/// Return the fills in `current` whose trade id was never seen before, in
/// input order, and add all of the window's ids to `seen`.
///
/// Fills with a missing or blank trade id are skipped entirely. A repeated
/// id within one window is reported once. On the first cycle every id is
/// recorded and nothing is reported.
pub fn detect_new_fills(
    seen: &mut SeenFillIds,
    current: &[Fill],
    is_first_cycle: bool,
) -> Vec<Fill> {
    let fresh = if is_first_cycle {
        Vec::new()
    } else {
        let mut reported = HashSet::new();
        current
            .iter()
            .filter(|f| match f.trade_id() {
                Some(tid) => !seen.contains(tid) && reported.insert(tid),
                None => false,
            })
            .cloned()
            .collect()
    };

    seen.record_poll(current.iter().filter_map(Fill::trade_id));
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coin, Side, TimeMs};

    fn fill(tid: Option<&str>) -> Fill {
        let fill = Fill::new(Coin::new("BTC"))
            .with_side(Side::Buy)
            .with_time(TimeMs::new(1000));
        match tid {
            Some(tid) => fill.with_tid(tid),
            None => fill,
        }
    }

    fn tids(fills: &[Fill]) -> Vec<Option<&str>> {
        fills.iter().map(Fill::trade_id).collect()
    }

    #[test]
    fn test_first_cycle_records_but_reports_nothing() {
        let mut seen = SeenFillIds::new();
        let fresh = detect_new_fills(&mut seen, &[fill(Some("1")), fill(Some("2"))], true);
        assert!(fresh.is_empty());
        assert!(seen.contains("1"));
        assert!(seen.contains("2"));
    }

    #[test]
    fn test_only_unseen_fills_are_reported() {
        let mut seen = SeenFillIds::new();
        detect_new_fills(&mut seen, &[fill(Some("101"))], true);

        let fresh = detect_new_fills(&mut seen, &[fill(Some("101")), fill(Some("102"))], false);
        assert_eq!(tids(&fresh), vec![Some("102")]);
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("101"));
        assert!(seen.contains("102"));
    }

    #[test]
    fn test_input_order_is_preserved() {
        let mut seen = SeenFillIds::new();
        let fresh = detect_new_fills(
            &mut seen,
            &[fill(Some("9")), fill(Some("3")), fill(Some("7"))],
            false,
        );
        assert_eq!(tids(&fresh), vec![Some("9"), Some("3"), Some("7")]);
    }

    #[test]
    fn test_same_window_twice_is_idempotent() {
        let mut seen = SeenFillIds::new();
        let window = vec![fill(Some("1")), fill(Some("2"))];
        detect_new_fills(&mut seen, &window, false);
        assert!(detect_new_fills(&mut seen, &window, false).is_empty());
    }

    #[test]
    fn test_fill_without_tid_is_ignored() {
        let mut seen = SeenFillIds::new();
        let fresh = detect_new_fills(&mut seen, &[fill(None), fill(Some("5"))], false);
        assert_eq!(tids(&fresh), vec![Some("5")]);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_ids_are_opaque_strings() {
        let mut seen = SeenFillIds::new();
        detect_new_fills(&mut seen, &[fill(Some("18446744073709551615"))], true);

        let fresh = detect_new_fills(
            &mut seen,
            &[fill(Some("18446744073709551615")), fill(Some("0xabc")), fill(Some(""))],
            false,
        );
        assert_eq!(tids(&fresh), vec![Some("0xabc")]);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_duplicate_tid_in_window_reported_once() {
        let mut seen = SeenFillIds::new();
        let fresh = detect_new_fills(&mut seen, &[fill(Some("4")), fill(Some("4"))], false);
        assert_eq!(tids(&fresh), vec![Some("4")]);
    }

    #[test]
    fn test_ids_survive_falling_out_of_window_by_default() {
        let mut seen = SeenFillIds::new();
        detect_new_fills(&mut seen, &[fill(Some("1"))], false);
        for _ in 0..5 {
            detect_new_fills(&mut seen, &[fill(Some("2"))], false);
        }
        assert!(seen.contains("1"));
        assert!(detect_new_fills(&mut seen, &[fill(Some("1"))], false).is_empty());
    }

    #[test]
    fn test_retention_evicts_ids_absent_from_recent_polls() {
        let mut seen = SeenFillIds::with_retention(2);
        detect_new_fills(&mut seen, &[fill(Some("1")), fill(Some("2"))], true);

        detect_new_fills(&mut seen, &[fill(Some("2"))], false);
        assert!(seen.contains("1"));

        detect_new_fills(&mut seen, &[fill(Some("2"))], false);
        assert!(!seen.contains("1"));
        assert!(seen.contains("2"));
    }

    #[test]
    fn test_retention_keeps_ids_still_in_window() {
        let mut seen = SeenFillIds::with_retention(1);
        detect_new_fills(&mut seen, &[fill(Some("8"))], true);
        for _ in 0..3 {
            assert!(detect_new_fills(&mut seen, &[fill(Some("8"))], false).is_empty());
        }
    }
}
