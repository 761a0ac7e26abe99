//! Report definitions and TSV parsing.
//!
//! A [`ReportRequest`] maps onto the reports service's request headers and
//! JSON body. The finished report arrives as TSV and is reshaped by
//! [`parse_report`] according to the same formatting flags that were sent.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use yd_core::constants::{self, headers};
use yd_core::error::{YdError, YdResult};

use crate::response::ApiError;

/// Declares a closed set of wire values: an enum with its exact wire string,
/// case-insensitive parsing, `Display` and `Serialize`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name { $($variant),+ }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self { $($name::$variant => $wire),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = YdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().replace('-', "_");
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(&wanted))
                    .ok_or_else(|| {
                        YdError::InvalidRequest(format!(
                            concat!("unknown ", stringify!($name), " {:?}"),
                            s
                        ))
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Report type, which determines the available fields.
    pub enum ReportType {
        AccountPerformance => "ACCOUNT_PERFORMANCE_REPORT",
        CampaignPerformance => "CAMPAIGN_PERFORMANCE_REPORT",
        AdgroupPerformance => "ADGROUP_PERFORMANCE_REPORT",
        AdPerformance => "AD_PERFORMANCE_REPORT",
        CriteriaPerformance => "CRITERIA_PERFORMANCE_REPORT",
        CustomReport => "CUSTOM_REPORT",
        ReachAndFrequencyPerformance => "REACH_AND_FREQUENCY_PERFORMANCE_REPORT",
        SearchQueryPerformance => "SEARCH_QUERY_PERFORMANCE_REPORT",
    }
}

wire_enum! {
    /// Predefined report periods. A custom period is [`DateRange::Custom`].
    pub enum DateRangeType {
        Today => "TODAY",
        Yesterday => "YESTERDAY",
        Last3Days => "LAST_3_DAYS",
        Last5Days => "LAST_5_DAYS",
        Last7Days => "LAST_7_DAYS",
        Last14Days => "LAST_14_DAYS",
        Last30Days => "LAST_30_DAYS",
        Last90Days => "LAST_90_DAYS",
        Last365Days => "LAST_365_DAYS",
        ThisWeekMonToday => "THIS_WEEK_MON_TODAY",
        ThisWeekSunToday => "THIS_WEEK_SUN_TODAY",
        LastWeek => "LAST_WEEK",
        LastBusinessWeek => "LAST_BUSINESS_WEEK",
        LastWeekSunSat => "LAST_WEEK_SUN_SAT",
        ThisMonth => "THIS_MONTH",
        LastMonth => "LAST_MONTH",
        AllTime => "ALL_TIME",
        Auto => "AUTO",
    }
}

wire_enum! {
    /// Whether the server builds the report online, offline, or decides itself.
    pub enum ProcessingMode {
        Auto => "auto",
        Online => "online",
        Offline => "offline",
    }
}

wire_enum! {
    /// Conversion attribution model.
    pub enum AttributionModel {
        FirstClick => "FC",
        LastClick => "LC",
        LastSignificantClick => "LSC",
        LastYandexDirectClick => "LYDC",
        FirstClickCrossDevice => "FCCD",
        LastSignificantClickCrossDevice => "LSCCD",
        LastYandexDirectClickCrossDevice => "LYDCCD",
        Auto => "AUTO",
    }
}

wire_enum! {
    /// Comparison applied by a report filter.
    pub enum FilterOperator {
        Equals => "EQUALS",
        NotEquals => "NOT_EQUALS",
        In => "IN",
        NotIn => "NOT_IN",
        LessThan => "LESS_THAN",
        GreaterThan => "GREATER_THAN",
        StartsWithIgnoreCase => "STARTS_WITH_IGNORE_CASE",
        DoesNotStartWithIgnoreCase => "DOES_NOT_START_WITH_IGNORE_CASE",
        StartsWithAnyIgnoreCase => "STARTS_WITH_ANY_IGNORE_CASE",
        DoesNotStartWithAllIgnoreCase => "DOES_NOT_START_WITH_ALL_IGNORE_CASE",
    }
}

wire_enum! {
    pub enum SortOrder {
        Ascending => "ASCENDING",
        Descending => "DESCENDING",
    }
}

wire_enum! {
    /// The platform's YES/NO flag.
    pub enum YesNo {
        Yes => "YES",
        No => "NO",
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

/// Wire form of a boolean header.
fn header_bool(value: bool) -> String {
    String::from(if value { "true" } else { "false" })
}

/// Reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Preset(DateRangeType),
    /// `CUSTOM_DATE` with both bounds, inclusive.
    Custom { from: NaiveDate, to: NaiveDate },
}

impl Default for DateRange {
    fn default() -> Self {
        DateRange::Preset(DateRangeType::Yesterday)
    }
}

impl DateRange {
    pub const CUSTOM_DATE: &'static str = "CUSTOM_DATE";

    pub fn custom(from: NaiveDate, to: NaiveDate) -> YdResult<Self> {
        if from > to {
            return Err(YdError::InvalidRequest(format!(
                "DateFrom {from} is after DateTo {to}"
            )));
        }
        Ok(DateRange::Custom { from, to })
    }

    /// Build a range from loosely supplied parts.
    ///
    /// Both dates make a custom range and cannot be combined with a preset.
    /// No dates use the preset, `YESTERDAY` by default. A single date is
    /// rejected rather than silently dropped.
    pub fn from_parts(
        preset: Option<DateRangeType>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> YdResult<Self> {
        match (preset, from, to) {
            (None, Some(from), Some(to)) => Self::custom(from, to),
            (Some(preset), Some(_), Some(_)) => Err(YdError::InvalidRequest(format!(
                "DateFrom/DateTo are only allowed with {}, not {preset}",
                Self::CUSTOM_DATE
            ))),
            (preset, None, None) => Ok(DateRange::Preset(preset.unwrap_or(DateRangeType::Yesterday))),
            (_, Some(_), None) => Err(YdError::InvalidRequest(
                "DateFrom given without DateTo".into(),
            )),
            (_, None, Some(_)) => Err(YdError::InvalidRequest(
                "DateTo given without DateFrom".into(),
            )),
        }
    }

    /// Value of the `DateRangeType` body field.
    pub fn range_type(&self) -> &'static str {
        match self {
            DateRange::Preset(preset) => preset.as_str(),
            DateRange::Custom { .. } => Self::CUSTOM_DATE,
        }
    }
}

/// Row filter in `SelectionCriteria.Filter`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new<I, S>(field: impl Into<String>, operator: FilterOperator, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Sort key in `OrderBy`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderBy {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Which decoration lines the server should leave out of the TSV.
///
/// The same flags drive [`parse_report`]: a line the server was told to keep
/// is the one the parser strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFormatting {
    /// Omit the first line (report name and period).
    pub skip_report_header: bool,
    /// Omit the line of column names.
    pub skip_column_header: bool,
    /// Omit the trailing totals line.
    pub skip_report_summary: bool,
}

impl Default for ReportFormatting {
    fn default() -> Self {
        Self {
            skip_report_header: true,
            skip_column_header: true,
            skip_report_summary: true,
        }
    }
}

impl ReportFormatting {
    /// Keep every decoration line.
    pub fn keep_all() -> Self {
        Self {
            skip_report_header: false,
            skip_column_header: false,
            skip_report_summary: false,
        }
    }
}

/// A report to request from the reports service.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    /// Unique name; the server caches offline reports under it.
    pub report_name: String,
    pub report_type: ReportType,
    pub field_names: Vec<String>,
    pub date_range: DateRange,
    pub filter: Vec<Filter>,
    /// Metrica goal IDs for conversion fields.
    pub goals: Vec<String>,
    pub attribution_models: Vec<AttributionModel>,
    pub page_limit: u64,
    pub order_by: Vec<OrderBy>,
    pub include_vat: bool,
    /// Advertiser login for agency accounts.
    pub client_login: Option<String>,
    pub processing_mode: ProcessingMode,
    /// Money values as integers multiplied by 1 000 000.
    pub return_money_in_micros: bool,
    pub formatting: ReportFormatting,
}

impl ReportRequest {
    pub fn new<I, S>(report_name: impl Into<String>, report_type: ReportType, field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            report_name: report_name.into(),
            report_type,
            field_names: field_names.into_iter().map(Into::into).collect(),
            date_range: DateRange::default(),
            filter: Vec::new(),
            goals: Vec::new(),
            attribution_models: Vec::new(),
            page_limit: constants::DEFAULT_REPORT_PAGE_LIMIT,
            order_by: Vec::new(),
            include_vat: false,
            client_login: None,
            processing_mode: ProcessingMode::Auto,
            return_money_in_micros: true,
            formatting: ReportFormatting::default(),
        }
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter.push(filter);
        self
    }

    pub fn with_order_by(mut self, field: impl Into<String>, sort_order: Option<SortOrder>) -> Self {
        self.order_by.push(OrderBy {
            field: field.into(),
            sort_order,
        });
        self
    }

    pub fn with_goals(mut self, goals: Vec<String>, models: Vec<AttributionModel>) -> Self {
        self.goals = goals;
        self.attribution_models = models;
        self
    }

    pub fn with_client_login(mut self, login: impl Into<String>) -> Self {
        self.client_login = Some(login.into());
        self
    }

    pub fn with_formatting(mut self, formatting: ReportFormatting) -> Self {
        self.formatting = formatting;
        self
    }

    /// Service-specific request headers. `Client-Login` is added by the
    /// client, which knows the account default.
    pub fn headers(&self) -> Vec<(String, String)> {
        let f = &self.formatting;
        vec![
            (headers::PROCESSING_MODE.into(), self.processing_mode.as_str().into()),
            (headers::RETURN_MONEY_IN_MICROS.into(), header_bool(self.return_money_in_micros)),
            (headers::SKIP_REPORT_HEADER.into(), header_bool(f.skip_report_header)),
            (headers::SKIP_COLUMN_HEADER.into(), header_bool(f.skip_column_header)),
            (headers::SKIP_REPORT_SUMMARY.into(), header_bool(f.skip_report_summary)),
        ]
    }

    /// JSON request body.
    pub fn body(&self) -> YdResult<serde_json::Value> {
        if self.field_names.is_empty() {
            return Err(YdError::InvalidRequest("report needs at least one field".into()));
        }

        let (date_from, date_to) = match self.date_range {
            DateRange::Custom { from, to } => (Some(wire_date(from)), Some(wire_date(to))),
            DateRange::Preset(_) => (None, None),
        };

        let params = ReportParams {
            selection_criteria: SelectionCriteria {
                date_from,
                date_to,
                filter: &self.filter,
            },
            goals: &self.goals,
            attribution_models: &self.attribution_models,
            field_names: &self.field_names,
            page: Page {
                limit: self.page_limit,
            },
            order_by: &self.order_by,
            report_name: &self.report_name,
            report_type: self.report_type,
            date_range_type: self.date_range.range_type(),
            format: REPORT_FORMAT,
            include_vat: self.include_vat.into(),
        };

        Ok(serde_json::json!({ "params": serde_json::to_value(params)? }))
    }
}

const REPORT_FORMAT: &str = "TSV";

fn wire_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ReportParams<'a> {
    selection_criteria: SelectionCriteria<'a>,
    goals: &'a [String],
    attribution_models: &'a [AttributionModel],
    field_names: &'a [String],
    page: Page,
    order_by: &'a [OrderBy],
    report_name: &'a str,
    report_type: ReportType,
    date_range_type: &'static str,
    format: &'static str,
    #[serde(rename = "IncludeVAT")]
    include_vat: YesNo,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SelectionCriteria<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_to: Option<String>,
    filter: &'a [Filter],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Page {
    limit: u64,
}

/// One report row keyed by column name, in the report's column order.
pub type ReportRecord = IndexMap<String, String>;

/// Parsed report rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportRows {
    /// Column names were present: each row zipped with them.
    Records(Vec<ReportRecord>),
    /// No column names: raw field sequences.
    Raw(Vec<Vec<String>>),
}

impl ReportRows {
    pub fn len(&self) -> usize {
        match self {
            ReportRows::Records(rows) => rows.len(),
            ReportRows::Raw(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split('\t').map(str::to_string).collect()
}

/// Reshape a TSV report body.
///
/// Lines the server was asked to keep are stripped here: the report header
/// (first line), the column header (next line, becomes the record keys) and
/// the summary (last line). Missing lines never panic; they just leave fewer
/// rows. Rows shorter than the header produce records with fewer keys.
pub fn parse_report(body: &str, formatting: &ReportFormatting) -> ReportRows {
    let trimmed = body.trim_matches(|c: char| c == '\n' || c == '\r');
    let lines: Vec<&str> = if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect()
    };
    let mut rows = lines.as_slice();

    if !formatting.skip_report_header {
        rows = rows.get(1..).unwrap_or_default();
    }

    let mut columns = Vec::new();
    if !formatting.skip_column_header {
        if let Some((header, rest)) = rows.split_first() {
            columns = split_fields(header);
            rows = rest;
        }
    }

    if !formatting.skip_report_summary {
        rows = rows.split_last().map(|(_, rest)| rest).unwrap_or_default();
    }

    if columns.is_empty() {
        ReportRows::Raw(rows.iter().map(|row| split_fields(row)).collect())
    } else {
        ReportRows::Records(
            rows.iter()
                .map(|row| {
                    columns
                        .iter()
                        .cloned()
                        .zip(row.split('\t').map(str::to_string))
                        .collect()
                })
                .collect(),
        )
    }
}

/// Final state of a report request.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// 200: the report is ready.
    Ready(ReportRows),
    /// Still 201/202 after the attempt budget was spent.
    Pending { status: u16, retry_in: Duration },
    /// The platform rejected the request.
    Failed { status: u16, error: ApiError },
}

impl ReportOutcome {
    /// Classify the last response of a report request.
    pub fn from_response(
        response: &crate::transport::RawResponse,
        formatting: &ReportFormatting,
        default_retry_in: Duration,
    ) -> Self {
        if response.is_success() {
            ReportOutcome::Ready(parse_report(&response.body, formatting))
        } else if response.is_pending() {
            ReportOutcome::Pending {
                status: response.status,
                retry_in: response.retry_in(default_retry_in),
            }
        } else {
            ReportOutcome::Failed {
                status: response.status,
                error: ApiError::from_body(&response.body),
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ReportOutcome::Ready(_))
    }

    /// Server-suggested wait before asking again for a pending report.
    pub fn retry_in(&self) -> Option<Duration> {
        match self {
            ReportOutcome::Pending { retry_in, .. } => Some(*retry_in),
            _ => None,
        }
    }

    pub fn rows(&self) -> Option<&ReportRows> {
        match self {
            ReportOutcome::Ready(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn into_rows(self) -> Option<ReportRows> {
        match self {
            ReportOutcome::Ready(rows) => Some(rows),
            _ => None,
        }
    }
}
