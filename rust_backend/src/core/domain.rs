//! Domain models for hotel booking records and dashboard view options.
//!
//! A [`BookingRecord`] is one reservation line as read from the booking
//! spreadsheet. Records live inside a [`BookingTable`], which also remembers
//! which source columns were present so that absent columns can be told apart
//! from empty cells.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Columns of the raw booking sheet that the dashboard understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceColumn {
    ArrivalDate,
    Nights,
    NetBaseRate,
    Ttv,
    RoomType,
    MealPlan,
    Channel,
    Nationality,
    Region,
    ReleaseDays,
    OnlineOffline,
    ArrivalYear,
    ArrivalMonth,
    CreatedOn,
    CreatedYear,
    CreatedMonth,
}

impl SourceColumn {
    pub const ALL: [SourceColumn; 16] = [
        SourceColumn::ArrivalDate,
        SourceColumn::Nights,
        SourceColumn::NetBaseRate,
        SourceColumn::Ttv,
        SourceColumn::RoomType,
        SourceColumn::MealPlan,
        SourceColumn::Channel,
        SourceColumn::Nationality,
        SourceColumn::Region,
        SourceColumn::ReleaseDays,
        SourceColumn::OnlineOffline,
        SourceColumn::ArrivalYear,
        SourceColumn::ArrivalMonth,
        SourceColumn::CreatedOn,
        SourceColumn::CreatedYear,
        SourceColumn::CreatedMonth,
    ];

    /// Header text as it appears in the booking sheet.
    pub fn header(&self) -> &'static str {
        match self {
            SourceColumn::ArrivalDate => "Arrival2",
            SourceColumn::Nights => "Nights",
            SourceColumn::NetBaseRate => "Net base rate",
            SourceColumn::Ttv => "TTV",
            SourceColumn::RoomType => "Type",
            SourceColumn::MealPlan => "Meal Plan",
            SourceColumn::Channel => "Channel",
            SourceColumn::Nationality => "Nationality",
            SourceColumn::Region => "Region",
            SourceColumn::ReleaseDays => "Release Days",
            SourceColumn::OnlineOffline => "Online/Offline",
            SourceColumn::ArrivalYear => "Arrival Year",
            SourceColumn::ArrivalMonth => "Arrival Month",
            SourceColumn::CreatedOn => "Created on",
            SourceColumn::CreatedYear => "Created Year",
            SourceColumn::CreatedMonth => "Created on Month",
        }
    }

    /// Match a sheet header against the known vocabulary.
    ///
    /// Matching ignores surrounding whitespace and ASCII case, so a header
    /// typed as `"Arrival Month "` still resolves.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|column| column.header().eq_ignore_ascii_case(header))
    }
}

impl fmt::Display for SourceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Set of source columns found in a loaded sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet(BTreeSet<SourceColumn>);

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every known column; handy for tables built in memory.
    pub fn all() -> Self {
        Self(SourceColumn::ALL.iter().copied().collect())
    }

    pub fn insert(&mut self, column: SourceColumn) -> bool {
        self.0.insert(column)
    }

    pub fn remove(&mut self, column: SourceColumn) -> bool {
        self.0.remove(&column)
    }

    pub fn contains(&self, column: SourceColumn) -> bool {
        self.0.contains(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = SourceColumn> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<SourceColumn> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = SourceColumn>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One reservation line from the booking sheet.
///
/// Numeric fields are `None` when the cell was empty or held something that
/// is not a number. Categorical fields keep the cell's display text.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use hotel_dashboard::core::domain::BookingRecord;
///
/// let arrival = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let record = BookingRecord::new(arrival);
/// assert!(record.nights.is_none());
/// assert_eq!(record.arrival_date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub arrival: NaiveDateTime,
    pub nights: Option<f64>,
    pub net_base_rate: Option<f64>,
    pub ttv: Option<f64>,
    pub room_type: Option<String>,
    pub meal_plan: Option<String>,
    pub channel: Option<String>,
    pub nationality: Option<String>,
    pub region: Option<String>,
    pub release_days: Option<f64>,
    pub online_offline: Option<String>,
    pub arrival_year: Option<String>,
    pub arrival_month: Option<String>,
    pub created_on: Option<NaiveDate>,
    pub created_year: Option<String>,
    pub created_month: Option<String>,
}

impl BookingRecord {
    /// A record with only its arrival timestamp set.
    pub fn new(arrival: NaiveDateTime) -> Self {
        Self {
            arrival,
            nights: None,
            net_base_rate: None,
            ttv: None,
            room_type: None,
            meal_plan: None,
            channel: None,
            nationality: None,
            region: None,
            release_days: None,
            online_offline: None,
            arrival_year: None,
            arrival_month: None,
            created_on: None,
            created_year: None,
            created_month: None,
        }
    }

    /// Arrival timestamp truncated to its calendar date.
    pub fn arrival_date(&self) -> NaiveDate {
        self.arrival.date()
    }
}

/// Records loaded from one source together with the columns it provided.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingTable {
    pub records: Vec<BookingRecord>,
    pub columns: ColumnSet,
}

impl BookingTable {
    pub fn new(records: Vec<BookingRecord>, columns: ColumnSet) -> Self {
        Self { records, columns }
    }

    pub fn has_column(&self, column: SourceColumn) -> bool {
        self.columns.contains(column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Calendar month bucket. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month after this one.
    pub fn succ(self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Lead-time bucket for the number of days between booking and arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReleaseDaysBucket {
    #[serde(rename = "0-1 Days")]
    UpToOne,
    #[serde(rename = "2-3 Days")]
    UpToThree,
    #[serde(rename = "4-7 Days")]
    UpToSeven,
    #[serde(rename = "8-14 Days")]
    UpToFourteen,
    #[serde(rename = "15-30 Days")]
    UpToThirty,
    #[serde(rename = "31-60 Days")]
    UpToSixty,
    #[serde(rename = "61-90 Days")]
    UpToNinety,
    #[serde(rename = "91+ Days")]
    OverNinety,
}

impl ReleaseDaysBucket {
    /// All buckets in display order.
    pub const ALL: [ReleaseDaysBucket; 8] = [
        ReleaseDaysBucket::UpToOne,
        ReleaseDaysBucket::UpToThree,
        ReleaseDaysBucket::UpToSeven,
        ReleaseDaysBucket::UpToFourteen,
        ReleaseDaysBucket::UpToThirty,
        ReleaseDaysBucket::UpToSixty,
        ReleaseDaysBucket::UpToNinety,
        ReleaseDaysBucket::OverNinety,
    ];

    /// Exclusive lower edge of the first bucket.
    pub const LOWER_EDGE: f64 = -1.0;

    pub fn label(&self) -> &'static str {
        match self {
            ReleaseDaysBucket::UpToOne => "0-1 Days",
            ReleaseDaysBucket::UpToThree => "2-3 Days",
            ReleaseDaysBucket::UpToSeven => "4-7 Days",
            ReleaseDaysBucket::UpToFourteen => "8-14 Days",
            ReleaseDaysBucket::UpToThirty => "15-30 Days",
            ReleaseDaysBucket::UpToSixty => "31-60 Days",
            ReleaseDaysBucket::UpToNinety => "61-90 Days",
            ReleaseDaysBucket::OverNinety => "91+ Days",
        }
    }

    /// Inclusive upper bound in days; `None` for the open-ended bucket.
    pub fn upper_bound(&self) -> Option<f64> {
        match self {
            ReleaseDaysBucket::UpToOne => Some(1.0),
            ReleaseDaysBucket::UpToThree => Some(3.0),
            ReleaseDaysBucket::UpToSeven => Some(7.0),
            ReleaseDaysBucket::UpToFourteen => Some(14.0),
            ReleaseDaysBucket::UpToThirty => Some(30.0),
            ReleaseDaysBucket::UpToSixty => Some(60.0),
            ReleaseDaysBucket::UpToNinety => Some(90.0),
            ReleaseDaysBucket::OverNinety => None,
        }
    }

    /// Bucket for a release-days value using right-closed intervals
    /// `(-1, 1], (1, 3], ... (90, inf)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hotel_dashboard::core::domain::ReleaseDaysBucket;
    ///
    /// assert_eq!(ReleaseDaysBucket::from_days(0.0), Some(ReleaseDaysBucket::UpToOne));
    /// assert_eq!(ReleaseDaysBucket::from_days(3.0), Some(ReleaseDaysBucket::UpToThree));
    /// assert_eq!(ReleaseDaysBucket::from_days(365.0), Some(ReleaseDaysBucket::OverNinety));
    /// assert_eq!(ReleaseDaysBucket::from_days(-1.0), None);
    /// ```
    pub fn from_days(days: f64) -> Option<Self> {
        if days.is_nan() || days <= Self::LOWER_EDGE {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|bucket| bucket.upper_bound().map_or(true, |upper| days <= upper))
    }

    /// Display labels in order, as used for the fixed chart axis.
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|b| b.label().to_string()).collect()
    }
}

impl fmt::Display for ReleaseDaysBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display currency. Amounts in the source are in Egyptian pounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Egp,
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Egp => "EGP",
            Currency::Usd => "USD",
        }
    }

    /// Multiplier applied to source amounts; `usd_rate` is USD per EGP.
    pub fn rate(&self, usd_rate: f64) -> f64 {
        match self {
            Currency::Egp => 1.0,
            Currency::Usd => usd_rate,
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "egp" => Ok(Currency::Egp),
            "usd" => Ok(Currency::Usd),
            other => Err(format!("Invalid currency: {}. Must be 'EGP' or 'USD'", other)),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Which booking source to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    #[default]
    Past,
    Future,
}

impl BookingType {
    pub fn label(&self) -> &'static str {
        match self {
            BookingType::Past => "Past Bookings",
            BookingType::Future => "Future Bookings",
        }
    }
}

impl FromStr for BookingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "past" | "past bookings" => Ok(BookingType::Past),
            "future" | "future bookings" => Ok(BookingType::Future),
            other => Err(format!(
                "Invalid booking type: {}. Must be 'past' or 'future'",
                other
            )),
        }
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Time bucket used by the revenue and nights time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Monthly,
    Daily,
}

impl Granularity {
    pub fn axis_title(&self) -> &'static str {
        match self {
            Granularity::Monthly => "Month",
            Granularity::Daily => "Date",
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Granularity::Monthly),
            "daily" | "day" => Ok(Granularity::Daily),
            other => Err(format!(
                "Invalid granularity: {}. Must be 'monthly' or 'daily'",
                other
            )),
        }
    }
}
