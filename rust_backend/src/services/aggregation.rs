//! Grouped aggregates over derived bookings.
//!
//! Every grouping computes the same three aggregates per group: summed
//! nights, mean ADR over the rows where ADR is defined, and summed revenue.
//! Groups come out in first-seen order; ranking is a separate step so each
//! metric can be truncated independently.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::core::domain::{Granularity, ReleaseDaysBucket, SourceColumn, YearMonth};
use crate::preprocessing::enricher::DerivedBooking;

/// Label format of daily periods.
pub const DAY_LABEL_FORMAT: &str = "%d %b %Y";

/// Categorical dimension a chart section is split by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Channel,
    RoomType,
    MealPlan,
    Region,
    ReleaseDays,
}

impl Dimension {
    /// Source column the dimension needs.
    pub fn column(&self) -> SourceColumn {
        match self {
            Dimension::Channel => SourceColumn::Channel,
            Dimension::RoomType => SourceColumn::RoomType,
            Dimension::MealPlan => SourceColumn::MealPlan,
            Dimension::Region => SourceColumn::Region,
            Dimension::ReleaseDays => SourceColumn::ReleaseDays,
        }
    }

    /// Field name of the category axis.
    pub fn field(&self) -> &'static str {
        match self {
            Dimension::Channel => "Channel",
            Dimension::RoomType => "Type",
            Dimension::MealPlan => "Meal Plan",
            Dimension::Region => "Region",
            Dimension::ReleaseDays => "Release Days Group",
        }
    }

    /// Human name used in chart titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dimension::Channel => "Channel",
            Dimension::RoomType => "Room Type",
            Dimension::MealPlan => "Meal Plan",
            Dimension::Region => "Region",
            Dimension::ReleaseDays => "Release Days",
        }
    }

    /// Group key of a row, `None` when the row has no value.
    pub fn key_of<'a>(&self, row: &'a DerivedBooking) -> Option<Cow<'a, str>> {
        let record = &row.record;
        let value = match self {
            Dimension::Channel => &record.channel,
            Dimension::RoomType => &record.room_type,
            Dimension::MealPlan => &record.meal_plan,
            Dimension::Region => &record.region,
            Dimension::ReleaseDays => {
                return row.release_bucket.map(|b| Cow::Borrowed(b.label()));
            }
        };
        value.as_deref().map(Cow::Borrowed)
    }

    /// Fixed category order, when the dimension has one.
    pub fn fixed_order(&self) -> Option<Vec<String>> {
        match self {
            Dimension::ReleaseDays => Some(ReleaseDaysBucket::labels()),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Aggregated measure shown by one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Nights,
    Adr,
    Revenue,
}

impl Metric {
    /// Chart order within a section.
    pub const ALL: [Metric; 3] = [Metric::Nights, Metric::Adr, Metric::Revenue];

    /// Field name of the value axis.
    pub fn field(&self) -> &'static str {
        match self {
            Metric::Nights => "Nights",
            Metric::Adr => "ADR",
            Metric::Revenue => "TTV",
        }
    }

    /// Whether values are amounts of money.
    pub fn is_money(&self) -> bool {
        matches!(self, Metric::Adr | Metric::Revenue)
    }
}

/// Aggregates of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    pub key: String,
    pub nights: f64,
    /// Mean ADR; `None` when no row in the group has one.
    pub adr: Option<f64>,
    pub revenue: f64,
    pub record_count: usize,
}

impl GroupAggregate {
    /// Zero row for a key with no records.
    pub fn zero(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            nights: 0.0,
            adr: None,
            revenue: 0.0,
            record_count: 0,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Nights => Some(self.nights),
            Metric::Adr => self.adr,
            Metric::Revenue => Some(self.revenue),
        }
    }
}

/// Result of a grouping: either groups or an explicit nothing-to-show signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Aggregation {
    Empty,
    Groups(Vec<GroupAggregate>),
}

impl Aggregation {
    fn from_groups(groups: Vec<GroupAggregate>) -> Self {
        if groups.is_empty() {
            Aggregation::Empty
        } else {
            Aggregation::Groups(groups)
        }
    }

    pub fn groups(&self) -> &[GroupAggregate] {
        match self {
            Aggregation::Empty => &[],
            Aggregation::Groups(groups) => groups,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Aggregation::Empty)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    nights: f64,
    revenue: f64,
    adr_sum: f64,
    adr_count: usize,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, row: &DerivedBooking) {
        self.nights += row.nights().unwrap_or(0.0);
        self.revenue += row.ttv.unwrap_or(0.0);
        if let Some(adr) = row.adr {
            self.adr_sum += adr;
            self.adr_count += 1;
        }
        self.count += 1;
    }

    fn finish(self, key: String) -> GroupAggregate {
        GroupAggregate {
            key,
            nights: self.nights,
            adr: (self.adr_count > 0).then(|| self.adr_sum / self.adr_count as f64),
            revenue: self.revenue,
            record_count: self.count,
        }
    }
}

/// Group rows by a categorical dimension.
///
/// Groups appear in first-seen order and rows without a key are ignored.
/// Release-days grouping always yields all eight buckets in display order,
/// zero-filled; only an empty input produces [`Aggregation::Empty`].
pub fn group_by(rows: &[DerivedBooking], dimension: Dimension) -> Aggregation {
    if rows.is_empty() {
        return Aggregation::Empty;
    }

    let mut order: Vec<String> = Vec::new();
    let mut acc: HashMap<String, Accumulator> = HashMap::new();
    for row in rows {
        let Some(key) = dimension.key_of(row) else {
            continue;
        };
        if !acc.contains_key(key.as_ref()) {
            order.push(key.clone().into_owned());
        }
        acc.entry(key.into_owned()).or_default().add(row);
    }

    if let Some(fixed) = dimension.fixed_order() {
        order = fixed;
    }

    let groups = order
        .into_iter()
        .map(|key| match acc.get(&key) {
            Some(a) => a.finish(key),
            None => GroupAggregate::zero(key),
        })
        .collect();

    Aggregation::from_groups(groups)
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort groups by a metric, largest first, keeping at most `top_n`.
///
/// The sort is stable, so ties keep first-seen order. Undefined values
/// rank after every defined one.
///
/// # Examples
///
/// ```
/// use hotel_dashboard::services::aggregation::{rank_by, GroupAggregate, Metric};
///
/// let mut a = GroupAggregate::zero("A");
/// a.revenue = 400.0;
/// let mut b = GroupAggregate::zero("B");
/// b.revenue = 700.0;
/// let mut c = GroupAggregate::zero("C");
/// c.revenue = 400.0;
///
/// let top: Vec<String> = rank_by(&[a, b, c], Metric::Revenue, Some(2))
///     .into_iter()
///     .map(|g| g.key)
///     .collect();
/// assert_eq!(top, vec!["B", "A"]);
/// ```
pub fn rank_by(
    groups: &[GroupAggregate],
    metric: Metric,
    top_n: Option<usize>,
) -> Vec<GroupAggregate> {
    let mut ranked = groups.to_vec();
    ranked.sort_by(|a, b| descending(a.value(metric), b.value(metric)));
    if let Some(n) = top_n {
        ranked.truncate(n);
    }
    ranked
}

/// Time bucket of an arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Month(YearMonth),
    Day(NaiveDate),
}

impl PeriodKey {
    pub fn of(row: &DerivedBooking, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Monthly => PeriodKey::Month(row.arrival_month),
            Granularity::Daily => PeriodKey::Day(row.arrival_date),
        }
    }

    /// The following period of the same granularity.
    pub fn succ(self) -> Option<Self> {
        match self {
            PeriodKey::Month(month) => Some(PeriodKey::Month(month.succ())),
            PeriodKey::Day(day) => day.succ_opt().map(PeriodKey::Day),
        }
    }

    pub fn label(&self) -> String {
        match self {
            PeriodKey::Month(month) => month.to_string(),
            PeriodKey::Day(day) => day.format(DAY_LABEL_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn period_keys(rows: &[DerivedBooking], granularity: Granularity) -> BTreeSet<PeriodKey> {
    rows.iter().map(|row| PeriodKey::of(row, granularity)).collect()
}

/// Distinct period labels present in the rows, in chronological order.
pub fn period_labels(rows: &[DerivedBooking], granularity: Granularity) -> Vec<String> {
    period_keys(rows, granularity).iter().map(PeriodKey::label).collect()
}

/// Longest gap-filled period axis; wider spans keep only the periods with data.
pub const MAX_CONTINUOUS_PERIODS: usize = 3_660;

/// Every period from the first arrival to the last, with no gaps.
///
/// Falls back to [`period_labels`] when the span exceeds
/// [`MAX_CONTINUOUS_PERIODS`], e.g. after a mistyped arrival year.
pub fn continuous_period_labels(rows: &[DerivedBooking], granularity: Granularity) -> Vec<String> {
    let keys = period_keys(rows, granularity);
    let (Some(&first), Some(&last)) = (keys.first(), keys.last()) else {
        return Vec::new();
    };

    let mut labels = Vec::new();
    let mut current = Some(first);
    while let Some(key) = current.filter(|k| *k <= last) {
        if labels.len() == MAX_CONTINUOUS_PERIODS {
            warn!(
                "Arrivals span {} to {}, more than {} periods; showing only periods with bookings",
                first, last, MAX_CONTINUOUS_PERIODS
            );
            return keys.iter().map(PeriodKey::label).collect();
        }
        labels.push(key.label());
        current = key.succ();
    }
    labels
}

/// Aggregate rows per period, reindexed to `labels`.
///
/// Labels with no rows become zero rows; rows whose period is not listed are
/// left out.
pub fn aggregate_by_period(
    rows: &[DerivedBooking],
    granularity: Granularity,
    labels: &[String],
) -> Aggregation {
    if rows.is_empty() {
        return Aggregation::Empty;
    }

    let mut acc: HashMap<String, Accumulator> = HashMap::new();
    for row in rows {
        acc.entry(PeriodKey::of(row, granularity).label())
            .or_default()
            .add(row);
    }

    let groups = labels
        .iter()
        .map(|label| match acc.get(label) {
            Some(a) => a.finish(label.clone()),
            None => GroupAggregate::zero(label.clone()),
        })
        .collect();

    Aggregation::from_groups(groups)
}

/// Headline metrics of the filtered bookings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_revenue: f64,
    /// Mean of defined ADRs; `None` when no row has one.
    pub average_adr: Option<f64>,
    pub total_nights: f64,
    pub record_count: usize,
}

pub fn summary_metrics(rows: &[DerivedBooking]) -> SummaryMetrics {
    let mut acc = Accumulator::default();
    for row in rows {
        acc.add(row);
    }
    let totals = acc.finish(String::new());
    SummaryMetrics {
        total_revenue: totals.revenue,
        average_adr: totals.adr,
        total_nights: totals.nights,
        record_count: totals.record_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use crate::core::domain::BookingRecord;
    use crate::preprocessing::enricher::BookingEnricher;

    fn row(day: (i32, u32, u32), channel: &str, nights: f64, rate: f64, ttv: f64) -> DerivedBooking {
        let arrival = NaiveDate::from_ymd_opt(day.0, day.1, day.2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut record = BookingRecord::new(arrival);
        record.channel = Some(channel.to_string());
        record.nights = Some(nights);
        record.net_base_rate = Some(rate);
        record.ttv = Some(ttv);
        BookingEnricher::new(1.0).derive(&record)
    }

    fn keys(groups: &[GroupAggregate]) -> Vec<&str> {
        groups.iter().map(|g| g.key.as_str()).collect()
    }

    #[test]
    fn test_group_by_channel_first_seen_order() {
        let rows = vec![
            row((2024, 1, 1), "A", 1.0, 100.0, 100.0),
            row((2024, 1, 2), "B", 2.0, 100.0, 200.0),
            row((2024, 1, 3), "A", 3.0, 300.0, 300.0),
            row((2024, 1, 4), "C", 1.0, 50.0, 400.0),
            row((2024, 1, 5), "B", 1.0, 100.0, 500.0),
        ];
        let agg = group_by(&rows, Dimension::Channel);
        let groups = agg.groups();
        assert_eq!(keys(groups), vec!["A", "B", "C"]);
        assert_eq!(groups[0].revenue, 400.0);
        assert_eq!(groups[0].nights, 4.0);
        assert_eq!(groups[0].adr, Some(100.0));
        assert_eq!(groups[1].revenue, 700.0);
        assert_eq!(groups[1].record_count, 2);
        assert_eq!(groups[2].revenue, 400.0);
    }

    #[test]
    fn test_rank_by_is_stable_and_truncates() {
        let rows = vec![
            row((2024, 1, 1), "A", 1.0, 0.0, 100.0),
            row((2024, 1, 1), "B", 1.0, 0.0, 200.0),
            row((2024, 1, 1), "A", 1.0, 0.0, 300.0),
            row((2024, 1, 1), "C", 1.0, 0.0, 400.0),
            row((2024, 1, 1), "B", 1.0, 0.0, 500.0),
        ];
        let agg = group_by(&rows, Dimension::Channel);
        let top = rank_by(agg.groups(), Metric::Revenue, Some(2));
        assert_eq!(keys(&top), vec!["B", "A"]);

        let all = rank_by(agg.groups(), Metric::Revenue, None);
        assert_eq!(keys(&all), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_rank_undefined_adr_last() {
        let mut rows = vec![
            row((2024, 1, 1), "A", 0.0, 100.0, 0.0),
            row((2024, 1, 1), "B", 2.0, 100.0, 0.0),
        ];
        rows[0].adr = None;
        let agg = group_by(&rows, Dimension::Channel);
        assert_eq!(agg.groups()[0].adr, None);
        let ranked = rank_by(agg.groups(), Metric::Adr, None);
        assert_eq!(keys(&ranked), vec!["B", "A"]);
    }

    #[test]
    fn test_empty_input_is_empty_signal() {
        assert!(group_by(&[], Dimension::Channel).is_empty());
        assert!(group_by(&[], Dimension::ReleaseDays).is_empty());
        assert!(aggregate_by_period(&[], Granularity::Monthly, &[]).is_empty());
    }

    #[test]
    fn test_rows_without_key_are_empty_signal() {
        let mut r = row((2024, 1, 1), "A", 1.0, 1.0, 1.0);
        r.record.channel = None;
        assert!(group_by(&[r], Dimension::Channel).is_empty());
    }

    #[test]
    fn test_release_days_always_eight_buckets() {
        let mut r = row((2024, 1, 1), "A", 2.0, 200.0, 500.0);
        r.release_bucket = Some(ReleaseDaysBucket::UpToSixty);
        let agg = group_by(&[r], Dimension::ReleaseDays);
        let groups = agg.groups();
        assert_eq!(keys(groups), ReleaseDaysBucket::labels());
        assert_eq!(groups[5].revenue, 500.0);
        assert_eq!(groups[0], GroupAggregate::zero("0-1 Days"));
    }

    #[test]
    fn test_period_labels_are_chronological() {
        let rows = vec![
            row((2024, 11, 5), "A", 1.0, 1.0, 1.0),
            row((2023, 2, 1), "A", 1.0, 1.0, 1.0),
            row((2024, 2, 9), "A", 1.0, 1.0, 1.0),
        ];
        assert_eq!(
            period_labels(&rows, Granularity::Monthly),
            vec!["2023-02", "2024-02", "2024-11"]
        );
        // "01 Feb" would sort before "05 Nov" but after "09 Feb" lexically
        assert_eq!(
            period_labels(&rows, Granularity::Daily),
            vec!["01 Feb 2023", "09 Feb 2024", "05 Nov 2024"]
        );
    }

    #[test]
    fn test_continuous_period_labels() {
        let rows = vec![
            row((2023, 11, 5), "A", 1.0, 1.0, 1.0),
            row((2024, 2, 9), "A", 1.0, 1.0, 1.0),
        ];
        assert_eq!(
            continuous_period_labels(&rows, Granularity::Monthly),
            vec!["2023-11", "2023-12", "2024-01", "2024-02"]
        );

        let days = vec![
            row((2024, 2, 28), "A", 1.0, 1.0, 1.0),
            row((2024, 3, 1), "A", 1.0, 1.0, 1.0),
        ];
        assert_eq!(
            continuous_period_labels(&days, Granularity::Daily),
            vec!["28 Feb 2024", "29 Feb 2024", "01 Mar 2024"]
        );
        assert!(continuous_period_labels(&[], Granularity::Daily).is_empty());
    }

    #[test]
    fn test_continuous_period_labels_wide_span_falls_back() {
        // 2024 typed as 20240
        let rows = vec![
            row((2024, 3, 1), "A", 1.0, 1.0, 1.0),
            row((20240, 3, 1), "A", 1.0, 1.0, 1.0),
        ];
        let labels = continuous_period_labels(&rows, Granularity::Daily);
        assert_eq!(labels, period_labels(&rows, Granularity::Daily));
        assert_eq!(labels.len(), 2);

        let monthly = continuous_period_labels(&rows, Granularity::Monthly);
        assert_eq!(monthly, vec!["2024-03", "20240-03"]);
    }

    #[test]
    fn test_continuous_period_labels_at_limit() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = start + chrono::Duration::days(MAX_CONTINUOUS_PERIODS as i64 - 1);
        let rows = vec![
            row((2020, 1, 1), "A", 1.0, 1.0, 1.0),
            row((end.year(), end.month(), end.day()), "A", 1.0, 1.0, 1.0),
        ];
        assert_eq!(
            continuous_period_labels(&rows, Granularity::Daily).len(),
            MAX_CONTINUOUS_PERIODS
        );
    }

    #[test]
    fn test_aggregate_by_period_reindexes_with_zero_rows() {
        let rows = vec![
            row((2024, 1, 3), "A", 2.0, 200.0, 100.0),
            row((2024, 1, 20), "A", 1.0, 100.0, 50.0),
            row((2024, 3, 1), "A", 4.0, 400.0, 10.0),
        ];
        let labels = vec!["2024-01".to_string(), "2024-02".to_string(), "2024-03".to_string()];
        let agg = aggregate_by_period(&rows, Granularity::Monthly, &labels);
        let groups = agg.groups();
        assert_eq!(keys(groups), vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(groups[0].revenue, 150.0);
        assert_eq!(groups[0].nights, 3.0);
        assert_eq!(groups[1].record_count, 0);
        assert_eq!(groups[1].revenue, 0.0);
        assert_eq!(groups[2].nights, 4.0);
    }

    #[test]
    fn test_summary_metrics() {
        let mut rows = vec![
            row((2024, 1, 1), "A", 2.0, 200.0, 1000.0),
            row((2024, 1, 1), "A", 4.0, 800.0, 2000.0),
            row((2024, 1, 1), "A", 0.0, 50.0, 500.0),
        ];
        assert_eq!(rows[2].adr, None);
        let metrics = summary_metrics(&rows);
        assert_eq!(metrics.total_revenue, 3500.0);
        assert_eq!(metrics.average_adr, Some(150.0));
        assert_eq!(metrics.total_nights, 6.0);
        assert_eq!(metrics.record_count, 3);

        rows.truncate(0);
        assert_eq!(summary_metrics(&rows), SummaryMetrics::default());
    }
}
