//! Detection-delay statistics.

use rustc_hash::FxHashMap;

use ped_core::SequenceId;

/// Running count / sum / min / max of detection delays for one sequence.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayStat {
    pub count:    u32,
    pub sum_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for DelayStat {
    fn default() -> Self {
        Self { count: 0, sum_secs: 0.0, min_secs: f64::INFINITY, max_secs: f64::NEG_INFINITY }
    }
}

impl DelayStat {
    pub fn record(&mut self, delay_secs: f64) {
        self.count += 1;
        self.sum_secs += delay_secs;
        self.min_secs = self.min_secs.min(delay_secs);
        self.max_secs = self.max_secs.max(delay_secs);
    }

    pub fn mean_secs(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum_secs / self.count as f64)
    }
}

/// Aggregate over all sequences: mean of per-sequence means, overall
/// min and max.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DelaySummary {
    pub mean_secs: f64,
    pub min_secs:  f64,
    pub max_secs:  f64,
}

#[derive(Clone, Debug, Default)]
pub struct DetectionStats {
    per_sequence: FxHashMap<SequenceId, DelayStat>,
}

impl DetectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sequence: SequenceId, delay_secs: f64) {
        self.per_sequence.entry(sequence).or_default().record(delay_secs);
    }

    pub fn get(&self, sequence: SequenceId) -> Option<&DelayStat> {
        self.per_sequence.get(&sequence)
    }

    /// Total detections across sequences.
    pub fn detections(&self) -> u32 {
        self.per_sequence.values().map(|s| s.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.per_sequence.is_empty()
    }

    /// Per-sequence entries in id order.
    pub fn sorted(&self) -> Vec<(SequenceId, DelayStat)> {
        let mut v: Vec<_> = self.per_sequence.iter().map(|(k, s)| (*k, *s)).collect();
        v.sort_unstable_by_key(|(k, _)| *k);
        v
    }

    /// `None` until at least one detection was recorded.
    pub fn summary(&self) -> Option<DelaySummary> {
        let means: Vec<f64> = self.sorted().iter().filter_map(|(_, s)| s.mean_secs()).collect();
        if means.is_empty() {
            return None;
        }
        let stats = self.per_sequence.values();
        Some(DelaySummary {
            mean_secs: means.iter().sum::<f64>() / means.len() as f64,
            min_secs:  stats.clone().map(|s| s.min_secs).fold(f64::INFINITY, f64::min),
            max_secs:  stats.map(|s| s.max_secs).fold(f64::NEG_INFINITY, f64::max),
        })
    }
}
