use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::core::domain::{BookingRecord, SourceColumn};
use crate::parsing::cells::format_number;
use crate::preprocessing::enricher::{DerivedBooking, DerivedTable};

/// Fields the user can filter on, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterField {
    #[serde(rename = "Room Type")]
    RoomType,
    #[serde(rename = "Arrival Month")]
    ArrivalMonth,
    #[serde(rename = "Meal Plan")]
    MealPlan,
    #[serde(rename = "Release Days")]
    ReleaseDays,
    #[serde(rename = "Online vs Offline")]
    OnlineOffline,
    #[serde(rename = "Arrival Year")]
    ArrivalYear,
    #[serde(rename = "Channel")]
    Channel,
    #[serde(rename = "Nationality")]
    Nationality,
    #[serde(rename = "Created Year")]
    CreatedYear,
    #[serde(rename = "Created Month")]
    CreatedMonth,
}

impl FilterField {
    pub const ALL: [FilterField; 10] = [
        FilterField::RoomType,
        FilterField::ArrivalMonth,
        FilterField::MealPlan,
        FilterField::ReleaseDays,
        FilterField::OnlineOffline,
        FilterField::ArrivalYear,
        FilterField::Channel,
        FilterField::Nationality,
        FilterField::CreatedYear,
        FilterField::CreatedMonth,
    ];

    /// Label shown next to the selector.
    pub fn label(&self) -> &'static str {
        match self {
            FilterField::RoomType => "Room Type",
            FilterField::ArrivalMonth => "Arrival Month",
            FilterField::MealPlan => "Meal Plan",
            FilterField::ReleaseDays => "Release Days",
            FilterField::OnlineOffline => "Online vs Offline",
            FilterField::ArrivalYear => "Arrival Year",
            FilterField::Channel => "Channel",
            FilterField::Nationality => "Nationality",
            FilterField::CreatedYear => "Created Year",
            FilterField::CreatedMonth => "Created Month",
        }
    }

    /// Source column the filter reads.
    pub fn column(&self) -> SourceColumn {
        match self {
            FilterField::RoomType => SourceColumn::RoomType,
            FilterField::ArrivalMonth => SourceColumn::ArrivalMonth,
            FilterField::MealPlan => SourceColumn::MealPlan,
            FilterField::ReleaseDays => SourceColumn::ReleaseDays,
            FilterField::OnlineOffline => SourceColumn::OnlineOffline,
            FilterField::ArrivalYear => SourceColumn::ArrivalYear,
            FilterField::Channel => SourceColumn::Channel,
            FilterField::Nationality => SourceColumn::Nationality,
            FilterField::CreatedYear => SourceColumn::CreatedYear,
            FilterField::CreatedMonth => SourceColumn::CreatedMonth,
        }
    }

    /// The record's value for this field, as compared against selections.
    pub fn value_of<'a>(&self, record: &'a BookingRecord) -> Option<Cow<'a, str>> {
        let text = match self {
            FilterField::RoomType => &record.room_type,
            FilterField::ArrivalMonth => &record.arrival_month,
            FilterField::MealPlan => &record.meal_plan,
            FilterField::ReleaseDays => {
                return record.release_days.map(|d| Cow::Owned(format_number(d)))
            }
            FilterField::OnlineOffline => &record.online_offline,
            FilterField::ArrivalYear => &record.arrival_year,
            FilterField::Channel => &record.channel,
            FilterField::Nationality => &record.nationality,
            FilterField::CreatedYear => &record.created_year,
            FilterField::CreatedMonth => &record.created_month,
        };
        text.as_deref().map(Cow::Borrowed)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let labels: Vec<&str> = Self::ALL.iter().map(|f| f.label()).collect();
                format!("Unknown filter: {}. Must be one of: {}", wanted, labels.join(", "))
            })
    }
}

/// Values selected per filter field. A field with no values does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection(BTreeMap<FilterField, BTreeSet<String>>);

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add values to a field's selection
    pub fn select<I, S>(&mut self, field: FilterField, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(field)
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Builder form of [`select`](Self::select)
    pub fn with<I, S>(mut self, field: FilterField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select(field, values);
        self
    }

    pub fn values(&self, field: FilterField) -> Option<&BTreeSet<String>> {
        self.0.get(&field).filter(|values| !values.is_empty())
    }

    /// True when no field restricts anything.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|values| values.is_empty())
    }

    /// Fields with at least one selected value.
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &BTreeSet<String>)> + '_ {
        self.0
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| (*field, values))
    }

    /// Parse a `"Label=value"` expression, e.g. `"Channel=Booking.com"`.
    pub fn parse_assignment(expr: &str) -> Result<(FilterField, String), String> {
        let (label, value) = expr
            .split_once('=')
            .ok_or_else(|| format!("Invalid filter '{}'. Expected LABEL=VALUE", expr))?;
        let field = label.parse::<FilterField>()?;
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("Filter '{}' has an empty value", label.trim()));
        }
        Ok((field, value.to_string()))
    }
}

/// Keep only rows whose value for `field` is one of `values`.
///
/// Rows with no value for the field are dropped.
pub fn filter_by_field(
    rows: &[DerivedBooking],
    field: FilterField,
    values: &BTreeSet<String>,
) -> Vec<DerivedBooking> {
    rows.iter()
        .filter(|row| {
            field
                .value_of(&row.record)
                .map(|v| values.contains(v.as_ref()))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Apply every active filter whose column exists in the table.
///
/// Filters are independent membership tests combined with AND, so the
/// order in which they run does not matter.
pub fn apply_filters(table: &DerivedTable, selection: &FilterSelection) -> DerivedTable {
    let mut rows = table.rows.clone();

    for (field, values) in selection.active() {
        if !table.columns.contains(field.column()) {
            debug!("Skipping filter '{}': column not in source", field);
            continue;
        }
        rows = filter_by_field(&rows, field, values);
    }

    DerivedTable::new(rows, table.columns.clone())
}

/// Distinct non-empty values of a field in first-seen order.
///
/// Returns `None` when the field's column is absent from the table.
pub fn filter_options(table: &DerivedTable, field: FilterField) -> Option<Vec<String>> {
    if !table.columns.contains(field.column()) {
        return None;
    }
    Some(distinct_values(&table.rows, field))
}

fn distinct_values(rows: &[DerivedBooking], field: FilterField) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for row in rows {
        if let Some(value) = field.value_of(&row.record) {
            if seen.insert(value.clone().into_owned()) {
                values.push(value.into_owned());
            }
        }
    }
    values
}

/// Apply filters in sidebar order, recording the options each selector
/// would offer given the filters above it.
///
/// The filtered rows are identical to [`apply_filters`]; only the option
/// lists depend on the order.
pub fn cascade_filters(
    table: &DerivedTable,
    selection: &FilterSelection,
) -> (DerivedTable, BTreeMap<FilterField, Vec<String>>) {
    let mut rows = table.rows.clone();
    let mut options = BTreeMap::new();

    for field in FilterField::ALL {
        if !table.columns.contains(field.column()) {
            continue;
        }
        options.insert(field, distinct_values(&rows, field));
        if let Some(values) = selection.values(field) {
            rows = filter_by_field(&rows, field, values);
        }
    }

    (DerivedTable::new(rows, table.columns.clone()), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{BookingTable, ColumnSet};
    use crate::preprocessing::enricher::BookingEnricher;
    use chrono::NaiveDate;

    fn booking(channel: &str, room: &str, release_days: Option<f64>) -> BookingRecord {
        let arrival = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut record = BookingRecord::new(arrival);
        record.channel = Some(channel.to_string());
        record.room_type = Some(room.to_string());
        record.release_days = release_days;
        record
    }

    fn sample_table() -> DerivedTable {
        let records = vec![
            booking("Direct", "Double", Some(3.0)),
            booking("Expedia", "Single", Some(10.0)),
            booking("Direct", "Suite", None),
            booking("Booking.com", "Double", Some(3.0)),
        ];
        let columns: ColumnSet = [
            SourceColumn::ArrivalDate,
            SourceColumn::Channel,
            SourceColumn::RoomType,
            SourceColumn::ReleaseDays,
        ]
        .into_iter()
        .collect();
        BookingEnricher::new(1.0).derive_table(&BookingTable::new(records, columns))
    }

    fn channels(table: &DerivedTable) -> Vec<String> {
        table
            .rows
            .iter()
            .map(|r| r.record.channel.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_filter_by_single_field() {
        let table = sample_table();
        let selection = FilterSelection::new().with(FilterField::Channel, ["Direct"]);
        let filtered = apply_filters(&table, &selection);
        assert_eq!(channels(&filtered), vec!["Direct", "Direct"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let table = sample_table();
        let selection = FilterSelection::new()
            .with(FilterField::Channel, ["Direct", "Booking.com"])
            .with(FilterField::RoomType, ["Double"]);
        let filtered = apply_filters(&table, &selection);
        assert_eq!(channels(&filtered), vec!["Direct", "Booking.com"]);
    }

    #[test]
    fn test_numeric_field_matches_display_text() {
        let table = sample_table();
        let selection = FilterSelection::new().with(FilterField::ReleaseDays, ["3"]);
        let filtered = apply_filters(&table, &selection);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_absent_column_is_skipped() {
        let table = sample_table();
        let selection = FilterSelection::new().with(FilterField::Nationality, ["Egypt"]);
        let filtered = apply_filters(&table, &selection);
        assert_eq!(filtered, table);
    }

    #[test]
    fn test_empty_selection_keeps_every_row() {
        let table = sample_table();
        let mut selection = FilterSelection::new();
        selection.select(FilterField::Channel, Vec::<String>::new());
        assert!(selection.is_empty());
        assert_eq!(apply_filters(&table, &selection), table);
    }

    #[test]
    fn test_filter_options_first_seen_order() {
        let table = sample_table();
        assert_eq!(
            filter_options(&table, FilterField::Channel).unwrap(),
            vec!["Direct", "Expedia", "Booking.com"]
        );
        assert_eq!(
            filter_options(&table, FilterField::ReleaseDays).unwrap(),
            vec!["3", "10"]
        );
        assert!(filter_options(&table, FilterField::Nationality).is_none());
    }

    #[test]
    fn test_cascade_options_follow_earlier_filters() {
        let table = sample_table();
        let selection = FilterSelection::new().with(FilterField::RoomType, ["Double"]);
        let (filtered, options) = cascade_filters(&table, &selection);

        assert_eq!(filtered, apply_filters(&table, &selection));
        // Room Type comes before Channel, so channel options are narrowed
        assert_eq!(options[&FilterField::RoomType], vec!["Double", "Single", "Suite"]);
        assert_eq!(options[&FilterField::Channel], vec!["Direct", "Booking.com"]);
        assert!(!options.contains_key(&FilterField::Nationality));
    }

    #[test]
    fn test_parse_assignment() {
        let (field, value) = FilterSelection::parse_assignment("meal plan = BB").unwrap();
        assert_eq!(field, FilterField::MealPlan);
        assert_eq!(value, "BB");
        assert!(FilterSelection::parse_assignment("Channel").is_err());
        assert!(FilterSelection::parse_assignment("Colour=red").is_err());
        assert!(FilterSelection::parse_assignment("Channel= ").is_err());
    }

    #[test]
    fn test_selection_serializes_by_label() {
        let selection = FilterSelection::new().with(FilterField::OnlineOffline, ["Online"]);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"Online vs Offline":["Online"]}"#);
        let back: FilterSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }
}
