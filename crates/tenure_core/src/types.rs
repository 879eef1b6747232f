use serde::{Deserialize, Serialize};

/// One member entry as extracted from a card, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub title: String,
    pub start_date_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_text: Option<String>,
    pub profile_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_past: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            Confidence::High
        } else if score >= 50 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// A raw record with a computed, strictly positive tenure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    #[serde(flatten)]
    pub raw: RawRecord,
    pub tenure_months: u32,
    pub tenure_years: f64,
    pub confidence: Confidence,
}

/// The seven fixed tenure ranges, in months, half-open with an unbounded tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistogramBucket {
    UpToSixMonths,
    SixToTwelveMonths,
    OneToTwoYears,
    TwoToThreeYears,
    ThreeToFiveYears,
    FiveToTenYears,
    TenYearsPlus,
}

impl HistogramBucket {
    pub const ALL: [HistogramBucket; 7] = [
        HistogramBucket::UpToSixMonths,
        HistogramBucket::SixToTwelveMonths,
        HistogramBucket::OneToTwoYears,
        HistogramBucket::TwoToThreeYears,
        HistogramBucket::ThreeToFiveYears,
        HistogramBucket::FiveToTenYears,
        HistogramBucket::TenYearsPlus,
    ];

    pub fn for_months(months: u32) -> Self {
        match months {
            0..=5 => HistogramBucket::UpToSixMonths,
            6..=11 => HistogramBucket::SixToTwelveMonths,
            12..=23 => HistogramBucket::OneToTwoYears,
            24..=35 => HistogramBucket::TwoToThreeYears,
            36..=59 => HistogramBucket::ThreeToFiveYears,
            60..=119 => HistogramBucket::FiveToTenYears,
            _ => HistogramBucket::TenYearsPlus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HistogramBucket::UpToSixMonths => "0-6m",
            HistogramBucket::SixToTwelveMonths => "6-12m",
            HistogramBucket::OneToTwoYears => "1-2y",
            HistogramBucket::TwoToThreeYears => "2-3y",
            HistogramBucket::ThreeToFiveYears => "3-5y",
            HistogramBucket::FiveToTenYears => "5-10y",
            HistogramBucket::TenYearsPlus => "10y+",
        }
    }
}

/// Bucket counts. Every bucket is always present, including at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Histogram {
    #[serde(rename = "0-6m")]
    pub up_to_six_months: usize,
    #[serde(rename = "6-12m")]
    pub six_to_twelve_months: usize,
    #[serde(rename = "1-2y")]
    pub one_to_two_years: usize,
    #[serde(rename = "2-3y")]
    pub two_to_three_years: usize,
    #[serde(rename = "3-5y")]
    pub three_to_five_years: usize,
    #[serde(rename = "5-10y")]
    pub five_to_ten_years: usize,
    #[serde(rename = "10y+")]
    pub ten_years_plus: usize,
}

impl Histogram {
    pub fn get(&self, bucket: HistogramBucket) -> usize {
        match bucket {
            HistogramBucket::UpToSixMonths => self.up_to_six_months,
            HistogramBucket::SixToTwelveMonths => self.six_to_twelve_months,
            HistogramBucket::OneToTwoYears => self.one_to_two_years,
            HistogramBucket::TwoToThreeYears => self.two_to_three_years,
            HistogramBucket::ThreeToFiveYears => self.three_to_five_years,
            HistogramBucket::FiveToTenYears => self.five_to_ten_years,
            HistogramBucket::TenYearsPlus => self.ten_years_plus,
        }
    }

    pub fn increment(&mut self, bucket: HistogramBucket) {
        let slot = match bucket {
            HistogramBucket::UpToSixMonths => &mut self.up_to_six_months,
            HistogramBucket::SixToTwelveMonths => &mut self.six_to_twelve_months,
            HistogramBucket::OneToTwoYears => &mut self.one_to_two_years,
            HistogramBucket::TwoToThreeYears => &mut self.two_to_three_years,
            HistogramBucket::ThreeToFiveYears => &mut self.three_to_five_years,
            HistogramBucket::FiveToTenYears => &mut self.five_to_ten_years,
            HistogramBucket::TenYearsPlus => &mut self.ten_years_plus,
        };
        *slot += 1;
    }

    /// `(label, count)` pairs in bucket order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        HistogramBucket::ALL
            .into_iter()
            .map(move |bucket| (bucket.label(), self.get(bucket)))
    }

    pub fn total(&self) -> usize {
        HistogramBucket::ALL.into_iter().map(|b| self.get(b)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    pub missing_start_date: usize,
    pub missing_end_date: usize,
    pub ambiguous_dates: usize,
}

/// Aggregate over a set of normalized records.
///
/// `histogram.total() == count` and `current_count + past_count == count`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub count: usize,
    pub current_count: usize,
    pub past_count: usize,
    pub mean: f64,
    pub median: u32,
    pub p25: u32,
    pub p75: u32,
    pub p90: u32,
    pub min: u32,
    pub max: u32,
    pub histogram: Histogram,
    pub data_quality: DataQuality,
}
