//! Progress cadence for a pipeline run.
//!
//! Every run reports 0 at the start and exactly 100 at completion. In
//! between, the percentage advances by `ceil(100 / total)` once every
//! `ceil(total / 100)` items, so a run never emits more than ~100
//! intermediate updates no matter how many items it covers.

/// Computes when, and with what value, a progress update is due.
#[derive(Debug, Clone)]
pub struct ProgressTicker {
    step: u8,
    interval: usize,
    value: u8,
    seen: usize,
}

impl ProgressTicker {
    /// Create a ticker for a run of `total` items.
    pub fn new(total: usize) -> Self {
        let (step, interval) = if total == 0 {
            (0, 0)
        } else {
            (100usize.div_ceil(total).min(100) as u8, total.div_ceil(100))
        };
        Self {
            step,
            interval,
            value: 0,
            seen: 0,
        }
    }

    /// The initial report, always 0.
    pub fn start(&self) -> u8 {
        0
    }

    /// Record one processed item. Returns the new percentage when an
    /// update is due at this item, `None` otherwise. Clamped at 100 so
    /// the sequence stays monotonic within range.
    pub fn tick(&mut self) -> Option<u8> {
        if self.interval == 0 {
            return None;
        }
        let due = self.seen % self.interval == 0;
        self.seen += 1;
        if due {
            self.value = (usize::from(self.value) + usize::from(self.step)).min(100) as u8;
            Some(self.value)
        } else {
            None
        }
    }

    /// The final report, always exactly 100.
    pub fn finish(&self) -> u8 {
        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(total: usize) -> Vec<u8> {
        let mut ticker = ProgressTicker::new(total);
        let mut reports = vec![ticker.start()];
        for _ in 0..total {
            if let Some(value) = ticker.tick() {
                reports.push(value);
            }
        }
        reports.push(ticker.finish());
        reports
    }

    fn assert_well_formed(reports: &[u8]) {
        assert_eq!(reports.first(), Some(&0));
        assert_eq!(reports.last(), Some(&100));
        assert!(reports.windows(2).all(|w| w[0] <= w[1]), "{reports:?}");
        assert!(reports.iter().all(|&p| p <= 100), "{reports:?}");
    }

    #[test]
    fn test_zero_items_reports_only_start_and_finish() {
        assert_eq!(run(0), vec![0, 100]);
    }

    #[test]
    fn test_small_runs_tick_every_item() {
        // 4 items: step ceil(100/4)=25, interval ceil(4/100)=1.
        assert_eq!(run(4), vec![0, 25, 50, 75, 100, 100]);
    }

    #[test]
    fn test_step_accumulation_clamps_at_100() {
        // 3 items: step 34 would overshoot to 102 on the third tick.
        assert_eq!(run(3), vec![0, 34, 68, 100, 100]);
    }

    #[test]
    fn test_large_runs_are_sampled() {
        for total in [1, 7, 100, 101, 250, 10_000] {
            let reports = run(total);
            assert_well_formed(&reports);
            // Start + at most ~100 intermediate ticks + finish.
            assert!(reports.len() <= 103, "total {total}: {} reports", reports.len());
        }
    }
}
