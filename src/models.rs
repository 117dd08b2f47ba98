use csv::StringRecord;

use crate::error::{ConvertError, Result};

/// Number of columns in an Everlance export row.
pub const SOURCE_FIELD_COUNT: usize = 17;

/// Header line expected by the MileIQ / QuickBooks Self-Employed importer.
pub const TARGET_HEADER: &str =
    "START_DATE*,END_DATE*,CATEGORY*,START*,STOP*,MILES*,MILES_VALUE,PARKING,TOLLS,TOTAL,VEHICLE,PURPOSE,NOTES";

/// Wrap every value in quotes because addresses contain commas. Embedded
/// quotes are not escaped.
fn quoted_csv<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let joined = values.into_iter().collect::<Vec<_>>().join("\",\"");
    format!("\"{joined}\"")
}

/// One trip row of an Everlance export.
///
/// Columns: Deduction, Miles, From, To, Date, Purpose, Income Source,
/// Map Image URL, Auto Detected?, Notes, Vehicle, Time Started, Time Ended,
/// Time Zone, Photo URL, From Full Address, To Full Address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub deduction: String,
    pub miles: String,
    pub from_loc: String,
    pub to_loc: String,
    pub date: String,
    pub purpose: String,
    pub income_source: String,
    pub map_url: String,
    pub auto_detection: String,
    pub notes: String,
    pub vehicle: String,
    pub time_started: String,
    pub time_ended: String,
    pub time_zone: String,
    pub photo_url: String,
    pub from_address: String,
    pub to_address: String,
}

impl SourceRecord {
    /// Build from positional fields. Contents are not validated here; a bad
    /// `miles` or `date` only fails at conversion time.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> std::result::Result<Self, usize> {
        let [deduction, miles, from_loc, to_loc, date, purpose, income_source, map_url, auto_detection, notes, vehicle, time_started, time_ended, time_zone, photo_url, from_address, to_address] =
            fields
        else {
            return Err(fields.len());
        };
        let own = |s: &S| s.as_ref().to_string();
        Ok(Self {
            deduction: own(deduction),
            miles: own(miles),
            from_loc: own(from_loc),
            to_loc: own(to_loc),
            date: own(date),
            purpose: own(purpose),
            income_source: own(income_source),
            map_url: own(map_url),
            auto_detection: own(auto_detection),
            notes: own(notes),
            vehicle: own(vehicle),
            time_started: own(time_started),
            time_ended: own(time_ended),
            time_zone: own(time_zone),
            photo_url: own(photo_url),
            from_address: own(from_address),
            to_address: own(to_address),
        })
    }

    pub fn from_record(record: &StringRecord) -> Result<Self> {
        let fields: Vec<&str> = record.iter().collect();
        Self::from_fields(&fields).map_err(|found| ConvertError::MalformedRow {
            line: record.position().map_or(0, |p| p.line()),
            expected: SOURCE_FIELD_COUNT,
            found,
        })
    }

    pub fn fields(&self) -> [&str; SOURCE_FIELD_COUNT] {
        [
            &self.deduction,
            &self.miles,
            &self.from_loc,
            &self.to_loc,
            &self.date,
            &self.purpose,
            &self.income_source,
            &self.map_url,
            &self.auto_detection,
            &self.notes,
            &self.vehicle,
            &self.time_started,
            &self.time_ended,
            &self.time_zone,
            &self.photo_url,
            &self.from_address,
            &self.to_address,
        ]
    }

    pub fn to_csv(&self) -> String {
        quoted_csv(self.fields())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Business,
    Personal,
}

impl Category {
    /// Only an exact, case-sensitive `"Personal"` is personal.
    pub fn from_purpose(purpose: &str) -> Self {
        if purpose == "Personal" {
            Self::Personal
        } else {
            Self::Business
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Personal => "Personal",
        }
    }
}

/// Optional MileIQ columns. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetExtras {
    pub miles_value: Option<String>,
    pub parking: Option<String>,
    pub tolls: Option<String>,
    pub total: Option<String>,
    pub vehicle: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

/// One trip row of a MileIQ import sheet.
///
/// Stored as an ordered list of `(column, value)` pairs. Required columns are
/// always present; optional columns are kept only when non-empty, so the
/// serialized width can vary per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRecord {
    fields: Vec<(&'static str, String)>,
}

impl TargetRecord {
    pub fn new(
        start_date: String,
        end_date: String,
        category: Category,
        start: String,
        stop: String,
        miles: String,
        extras: TargetExtras,
    ) -> Self {
        let mut fields = vec![
            ("start_date", start_date),
            ("end_date", end_date),
            ("category", category.as_str().to_string()),
            ("start", start),
            ("stop", stop),
            ("miles", miles),
        ];
        let optional = [
            ("miles_value", extras.miles_value),
            ("parking", extras.parking),
            ("tolls", extras.tolls),
            ("total", extras.total),
            ("vehicle", extras.vehicle),
            ("purpose", extras.purpose),
            ("notes", extras.notes),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v))),
        );
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_csv(&self) -> String {
        quoted_csv(self.fields.iter().map(|(_, v)| v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> Vec<&'static str> {
        vec![
            "$5.35", "10", "Home", "Office", "2017-01-07", "Business", "Acme Co", "https://map",
            "Yes", "client visit", "Civic", "08:57 AM", "09:30 AM", "EST", "",
            "1 Main St, Springfield", "200 Elm St, Springfield",
        ]
    }

    fn required() -> (String, String, Category, String, String, String) {
        (
            "01/07/2017 08:57".to_string(),
            "01/07/2017 09:30".to_string(),
            Category::Business,
            "Home".to_string(),
            "Office".to_string(),
            "10".to_string(),
        )
    }

    #[test]
    fn test_source_from_fields() {
        let rec = SourceRecord::from_fields(&sample_fields()).unwrap();
        assert_eq!(rec.deduction, "$5.35");
        assert_eq!(rec.miles, "10");
        assert_eq!(rec.time_started, "08:57 AM");
        assert_eq!(rec.photo_url, "");
        assert_eq!(rec.to_address, "200 Elm St, Springfield");
    }

    #[test]
    fn test_source_from_fields_rejects_wrong_count() {
        let mut fields = sample_fields();
        fields.pop();
        assert_eq!(SourceRecord::from_fields(&fields), Err(16));
        fields.push("x");
        fields.push("y");
        assert_eq!(SourceRecord::from_fields(&fields), Err(18));
    }

    #[test]
    fn test_source_from_record_reports_line() {
        let data = "a,b\n$1.00,2,3\n";
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes());
        let record = rdr.records().nth(1).unwrap().unwrap();
        match SourceRecord::from_record(&record) {
            Err(ConvertError::MalformedRow { line, expected, found }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, 17);
                assert_eq!(found, 3);
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_source_to_csv_keeps_schema_order() {
        let rec = SourceRecord::from_fields(&sample_fields()).unwrap();
        let line = rec.to_csv();
        assert!(line.starts_with("\"$5.35\",\"10\",\"Home\",\"Office\""));
        assert!(line.contains(",\"\",\"1 Main St, Springfield\","));
        assert!(line.ends_with("\"200 Elm St, Springfield\""));
    }

    #[test]
    fn test_category_from_purpose() {
        assert_eq!(Category::from_purpose("Personal"), Category::Personal);
        assert_eq!(Category::from_purpose("personal"), Category::Business);
        assert_eq!(Category::from_purpose("Personal "), Category::Business);
        assert_eq!(Category::from_purpose(""), Category::Business);
        assert_eq!(Category::from_purpose("Charity"), Category::Business);
    }

    #[test]
    fn test_target_keeps_all_populated_fields() {
        let (sd, ed, cat, start, stop, miles) = required();
        let extras = TargetExtras {
            miles_value: Some("5.35".to_string()),
            parking: Some("0".to_string()),
            tolls: Some("0".to_string()),
            total: Some("5.35".to_string()),
            vehicle: Some("Civic".to_string()),
            purpose: Some("Business".to_string()),
            notes: Some("Acme Co".to_string()),
        };
        let rec = TargetRecord::new(sd, ed, cat, start, stop, miles, extras);
        assert_eq!(rec.len(), 13);
        assert_eq!(rec.get("parking"), Some("0"));
        assert_eq!(
            rec.to_csv(),
            "\"01/07/2017 08:57\",\"01/07/2017 09:30\",\"Business\",\"Home\",\"Office\",\"10\",\
             \"5.35\",\"0\",\"0\",\"5.35\",\"Civic\",\"Business\",\"Acme Co\""
        );
    }

    #[test]
    fn test_target_omits_unset_and_empty_optionals() {
        let (sd, ed, cat, start, stop, miles) = required();
        let extras = TargetExtras {
            miles_value: Some("5.35".to_string()),
            vehicle: Some(String::new()),
            notes: Some("Acme Co".to_string()),
            ..TargetExtras::default()
        };
        let rec = TargetRecord::new(sd, ed, cat, start, stop, miles, extras);
        assert_eq!(rec.len(), 8);
        assert_eq!(rec.get("vehicle"), None);
        assert_eq!(rec.get("tolls"), None);
        assert_eq!(
            rec.to_csv(),
            "\"01/07/2017 08:57\",\"01/07/2017 09:30\",\"Business\",\"Home\",\"Office\",\"10\",\"5.35\",\"Acme Co\""
        );
    }

    #[test]
    fn test_target_keeps_empty_required_fields() {
        let rec = TargetRecord::new(
            "01/07/2017 08:00".to_string(),
            "01/07/2017 17:00".to_string(),
            Category::Personal,
            String::new(),
            String::new(),
            "3".to_string(),
            TargetExtras::default(),
        );
        assert_eq!(rec.len(), 6);
        assert_eq!(
            rec.to_csv(),
            "\"01/07/2017 08:00\",\"01/07/2017 17:00\",\"Personal\",\"\",\"\",\"3\""
        );
    }

    #[test]
    fn test_target_does_not_escape_quotes() {
        let rec = TargetRecord::new(
            "a".to_string(),
            "b".to_string(),
            Category::Business,
            "the \"big\" lot".to_string(),
            "c".to_string(),
            "1".to_string(),
            TargetExtras::default(),
        );
        assert_eq!(rec.to_csv(), "\"a\",\"b\",\"Business\",\"the \"big\" lot\",\"c\",\"1\"");
    }
}
