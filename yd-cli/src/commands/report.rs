//! Report command.

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use yd_api::report::{AttributionModel, Filter, FilterOperator, ProcessingMode, SortOrder};
use yd_api::{DateRange, DateRangeType, ReportFormatting, ReportOutcome, ReportRequest, ReportRows, ReportType};
use yd_core::config::AppConfig;
use yd_core::error::{YdError, YdResult};

use crate::OutputFormat;

#[derive(Args)]
pub struct ReportArgs {
    /// Report name. Offline reports are cached by the server under this name.
    #[arg(short, long)]
    name: String,

    /// Report type, e.g. CAMPAIGN_PERFORMANCE_REPORT.
    #[arg(short = 't', long = "type")]
    report_type: ReportType,

    /// Comma-separated field names, e.g. Date,CampaignId,Clicks,Cost.
    #[arg(long, required = true, value_delimiter = ',')]
    fields: Vec<String>,

    /// Predefined period (default YESTERDAY). Cannot be combined with --from/--to.
    #[arg(short, long)]
    range: Option<DateRangeType>,

    /// First day of a custom period (YYYY-MM-DD). Requires --to.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of a custom period (YYYY-MM-DD). Requires --from.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Filter as FIELD:OPERATOR:VALUE[,VALUE...], e.g. CampaignId:IN:1,2. Repeatable.
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<Filter>,

    /// Sort as FIELD[:ASCENDING|DESCENDING]. Repeatable.
    #[arg(long = "order-by")]
    order_by: Vec<String>,

    /// Metrica goal IDs for conversion fields.
    #[arg(long = "goal", value_delimiter = ',')]
    goals: Vec<String>,

    /// Attribution models, e.g. LSC,LC.
    #[arg(long = "attribution", value_delimiter = ',')]
    attribution_models: Vec<AttributionModel>,

    /// Maximum number of rows.
    #[arg(long)]
    limit: Option<u64>,

    /// Include VAT in money values.
    #[arg(long)]
    include_vat: bool,

    /// Return money in currency units instead of micros.
    #[arg(long)]
    money_as_units: bool,

    /// Processing mode: auto, online or offline.
    #[arg(long, default_value = "auto")]
    mode: ProcessingMode,

    /// Advertiser login (agency accounts).
    #[arg(short = 'l', long)]
    client_login: Option<String>,

    /// Keep the report title line (and strip it client-side).
    #[arg(long)]
    keep_report_header: bool,

    /// Ask for column names and key rows by them.
    #[arg(long)]
    keep_column_header: bool,

    /// Keep the totals line (and strip it client-side).
    #[arg(long)]
    keep_summary: bool,

    /// Re-polls while the report is being generated (overrides config).
    #[arg(long)]
    attempts: Option<u32>,
}

/// Parse `FIELD:OPERATOR:VALUE[,VALUE...]`.
fn parse_filter(s: &str) -> Result<Filter, String> {
    let mut parts = s.splitn(3, ':');
    let (Some(field), Some(operator), Some(values)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected FIELD:OPERATOR:VALUES, got {s:?}"));
    };
    let operator: FilterOperator = operator.parse().map_err(|e: YdError| e.to_string())?;
    let values: Vec<&str> = values.split(',').filter(|v| !v.is_empty()).collect();
    if field.is_empty() || values.is_empty() {
        return Err(format!("filter {s:?} needs a field and at least one value"));
    }
    Ok(Filter::new(field, operator, values))
}

/// Parse `FIELD[:ASCENDING|DESCENDING]`.
fn parse_order_by(s: &str) -> YdResult<(String, Option<SortOrder>)> {
    match s.split_once(':') {
        Some((field, order)) => Ok((field.to_string(), Some(order.parse()?))),
        None => Ok((s.to_string(), None)),
    }
}

impl ReportArgs {
    fn into_request(self) -> YdResult<ReportRequest> {
        let date_range = DateRange::from_parts(self.range, self.from, self.to)?;

        let mut request = ReportRequest::new(self.name, self.report_type, self.fields)
            .with_date_range(date_range)
            .with_goals(self.goals, self.attribution_models)
            .with_formatting(ReportFormatting {
                skip_report_header: !self.keep_report_header,
                skip_column_header: !self.keep_column_header,
                skip_report_summary: !self.keep_summary,
            });
        for filter in self.filters {
            request = request.with_filter(filter);
        }
        for spec in &self.order_by {
            let (field, order) = parse_order_by(spec)?;
            request = request.with_order_by(field, order);
        }
        if let Some(limit) = self.limit {
            request.page_limit = limit;
        }
        request.include_vat = self.include_vat;
        request.return_money_in_micros = !self.money_as_units;
        request.processing_mode = self.mode;
        request.client_login = self.client_login;
        Ok(request)
    }
}

pub async fn run(config: &AppConfig, args: ReportArgs, format: OutputFormat) -> YdResult<()> {
    let api = super::create_api_client(config)?;
    let attempts = args.attempts;
    let request = args.into_request()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Waiting for report {}", request.report_name));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let outcome = match attempts {
        Some(n) => api.report_with_attempts(&request, n).await,
        None => api.report(&request).await,
    };
    pb.finish_and_clear();
    let outcome = outcome?;

    match outcome {
        ReportOutcome::Ready(rows) => print_rows(&request.field_names, &rows, format),
        ReportOutcome::Pending { status, retry_in } => {
            eprintln!(
                "{} report {:?} is still being generated (status {status}); run again in {}s",
                style("PENDING").yellow().bold(),
                request.report_name,
                retry_in.as_secs()
            );
            Err(YdError::Timeout(format!(
                "report {} not ready after polling",
                request.report_name
            )))
        }
        ReportOutcome::Failed { status, error } => Err(YdError::Api {
            status,
            message: error.to_string(),
        }),
    }
}

fn print_rows(field_names: &[String], rows: &ReportRows, format: OutputFormat) -> YdResult<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("Report is empty.");
                return Ok(());
            }

            let mut table = super::new_table();
            match rows {
                ReportRows::Records(records) => {
                    table.set_header(field_names.to_vec());
                    for record in records {
                        table.add_row(
                            field_names
                                .iter()
                                .map(|f| record.get(f).map(String::as_str).unwrap_or("-")),
                        );
                    }
                }
                ReportRows::Raw(raw) => {
                    if raw.first().map(Vec::len) == Some(field_names.len()) {
                        table.set_header(field_names.to_vec());
                    }
                    for row in raw {
                        table.add_row(row);
                    }
                }
            }
            println!("{table}");
            println!("\n{} rows", style(rows.len()).cyan());
        }
    }
    Ok(())
}
