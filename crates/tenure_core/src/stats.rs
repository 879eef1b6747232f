use crate::tenure::round_to;
use crate::{Confidence, DataQuality, Histogram, HistogramBucket, NormalizedRecord, Statistics};

/// Aggregates normalized records. Output depends only on the set of inputs,
/// never on their order.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    pub fn calculate(&self, records: &[NormalizedRecord]) -> Statistics {
        if records.is_empty() {
            return Statistics::default();
        }

        let mut tenures: Vec<u32> = records.iter().map(|r| r.tenure_months).collect();
        tenures.sort_unstable();

        let past_count = records.iter().filter(|r| r.raw.is_past).count();
        let n = tenures.len();

        Statistics {
            count: n,
            current_count: n - past_count,
            past_count,
            mean: mean(&tenures),
            median: percentile(&tenures, 50.0),
            p25: percentile(&tenures, 25.0),
            p75: percentile(&tenures, 75.0),
            p90: percentile(&tenures, 90.0),
            min: tenures[0],
            max: tenures[n - 1],
            histogram: histogram(&tenures),
            data_quality: assess_quality(records),
        }
    }
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    round_to(sum as f64 / values.len() as f64, 1)
}

/// Nearest-rank percentile over an ascending slice.
fn percentile(sorted: &[u32], p: f64) -> u32 {
    if sorted.is_empty() {
        return 0;
    }
    let n = sorted.len();
    let rank = ((p / 100.0) * n as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, n as i64 - 1) as usize;
    sorted[index]
}

fn histogram(tenures: &[u32]) -> Histogram {
    let mut bins = Histogram::default();
    for &months in tenures {
        bins.increment(HistogramBucket::for_months(months));
    }
    bins
}

fn assess_quality(records: &[NormalizedRecord]) -> DataQuality {
    DataQuality {
        missing_start_date: records
            .iter()
            .filter(|r| r.raw.start_date_text.is_empty())
            .count(),
        missing_end_date: records
            .iter()
            .filter(|r| r.raw.is_past && r.raw.end_date_text.as_deref().is_none_or(str::is_empty))
            .count(),
        ambiguous_dates: records
            .iter()
            .filter(|r| r.confidence == Confidence::Low)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::{mean, percentile};

    #[test]
    fn nearest_rank_picks_existing_elements() {
        let sorted = [1, 2, 3, 4];
        assert_eq!(percentile(&sorted, 50.0), 2);
        assert_eq!(percentile(&sorted, 25.0), 1);
        assert_eq!(percentile(&sorted, 75.0), 3);
        assert_eq!(percentile(&sorted, 90.0), 4);
        assert_eq!(percentile(&sorted, 0.0), 1);
        assert_eq!(percentile(&[], 50.0), 0);
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        assert_eq!(mean(&[1, 2, 2]), 1.7);
        assert_eq!(mean(&[]), 0.0);
    }
}
