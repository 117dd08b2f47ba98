use std::io::{Read, Write};
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{debug, info, trace, warn};

use crate::error::{ConvertError, Result};
use crate::fmt::float_str;
use crate::models::{Category, SourceRecord, TargetExtras, TargetRecord, TARGET_HEADER};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Date/time normalization
// ---------------------------------------------------------------------------

/// Everlance dates are `YYYY-MM-DD`, times `HH:MM AM/PM`; joined as
/// `2017-01-07 08:57AM` once the space before the meridiem is dropped.
const SOURCE_DATETIME_FORMAT: &str = "%Y-%m-%d %I:%M%p";
const TARGET_DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M";

pub fn normalize_datetime(date: &str, time: &str) -> Result<String> {
    let value = format!("{date} {time}");
    let parsed = NaiveDateTime::parse_from_str(&value, SOURCE_DATETIME_FORMAT)
        .map_err(|source| ConvertError::InvalidDateTime { value: value.clone(), source })?;
    Ok(parsed.format(TARGET_DATETIME_FORMAT).to_string())
}

fn compact_time<'a>(raw: &str, default: &'a str) -> std::borrow::Cow<'a, str> {
    let time = raw.replace(' ', "");
    if time.is_empty() {
        std::borrow::Cow::Borrowed(default)
    } else {
        std::borrow::Cow::Owned(time)
    }
}

// ---------------------------------------------------------------------------
// Everlance -> MileIQ
// ---------------------------------------------------------------------------

pub fn mileage_value(miles: &str, rate: f64) -> Result<String> {
    let parsed: f64 = miles.trim().parse().map_err(|source| ConvertError::InvalidMiles {
        value: miles.to_string(),
        source,
    })?;
    Ok(float_str(parsed * rate))
}

impl SourceRecord {
    pub fn datetime_start(&self, settings: &Settings) -> Result<String> {
        let time = compact_time(&self.time_started, &settings.default_start_time);
        normalize_datetime(&self.date, &time)
    }

    pub fn datetime_end(&self, settings: &Settings) -> Result<String> {
        let time = compact_time(&self.time_ended, &settings.default_end_time);
        normalize_datetime(&self.date, &time)
    }

    pub fn to_mile_iq(&self, settings: &Settings) -> Result<TargetRecord> {
        let start = if self.from_address.is_empty() { &self.from_loc } else { &self.from_address };
        let stop = if self.to_address.is_empty() { &self.to_loc } else { &self.to_address };
        let category = Category::from_purpose(&self.purpose);
        let miles_value = mileage_value(&self.miles, settings.mileage_rate)?;

        let extras = TargetExtras {
            miles_value: Some(miles_value.clone()),
            parking: Some("0".to_string()),
            tolls: Some("0".to_string()),
            total: Some(miles_value),
            vehicle: Some(self.vehicle.clone()),
            purpose: Some(category.as_str().to_string()),
            notes: Some(self.income_source.clone()),
        };
        Ok(TargetRecord::new(
            self.datetime_start(settings)?,
            self.datetime_end(settings)?,
            category,
            start.clone(),
            stop.clone(),
            self.miles.clone(),
            extras,
        ))
    }
}

// ---------------------------------------------------------------------------
// Stream driver
// ---------------------------------------------------------------------------

/// First cell of the Everlance column header row; data follows it.
const HEADER_MARKER: &str = "Deduction";

fn deduction_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\$\d+\.\d+$").expect("valid deduction regex"))
}

pub fn is_trip_row(first_cell: &str) -> bool {
    deduction_pattern().is_match(first_cell)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub header_found: bool,
    pub converted: usize,
    pub skipped: usize,
}

/// Read an Everlance export from `input` and write MileIQ lines to `output`,
/// one line per trip as it is read. The first error aborts the run.
pub fn convert<R: Read, W: Write>(input: R, output: &mut W, settings: &Settings) -> Result<ConvertSummary> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut summary = ConvertSummary::default();

    for result in rdr.records() {
        let record = result?;
        let Some(first) = record.get(0) else { continue };
        if !summary.header_found {
            if first == HEADER_MARKER {
                summary.header_found = true;
                writeln!(output, "{TARGET_HEADER}")?;
            }
            continue;
        }
        if !is_trip_row(first) {
            summary.skipped += 1;
            continue;
        }
        let source = SourceRecord::from_record(&record)?;
        trace!(row = %source.to_csv(), "everlance row");
        let target = source.to_mile_iq(settings)?;
        debug!(
            line = record.position().map_or(0, |p| p.line()),
            category = target.get("category").unwrap_or_default(),
            "converted trip"
        );
        writeln!(output, "{}", target.to_csv())?;
        summary.converted += 1;
    }
    output.flush()?;

    if summary.header_found {
        info!(converted = summary.converted, skipped = summary.skipped, "conversion finished");
    } else {
        warn!("no \"{HEADER_MARKER}\" header row found; nothing converted");
    }
    Ok(summary)
}
