/// Dataset and storage constants shared across the pipeline steps.
/// Defaults here can be overridden through `Config`; the column schema cannot.

// Redfin data center, city level market tracker
pub const DEFAULT_SOURCE_URL: &str =
    "https://redfin-public-data.s3.us-west-2.amazonaws.com/redfin_market_tracker/city_market_tracker.tsv000.gz";

pub const DEFAULT_TRANSFORMED_BUCKET: &str = "redfin-transformed-data-bkt";
pub const DEFAULT_RAW_BUCKET: &str = "redfin-raw-data-bkt";

pub const DEFAULT_CHUNK_ROWS: usize = 100_000;

/// Prefix of the local artifact file name and of every object key
pub const ARTIFACT_PREFIX: &str = "redfin_data";

/// Timestamp format embedded in artifact names (second precision)
pub const ARTIFACT_TIMESTAMP_FORMAT: &str = "%d%m%Y%H%M%S";

pub const CITY_COLUMN: &str = "CITY";
pub const PERIOD_BEGIN_COLUMN: &str = "PERIOD_BEGIN";
pub const PERIOD_END_COLUMN: &str = "PERIOD_END";

/// Columns every normalized row must carry, in output order
pub const REQUIRED_COLUMNS: [&str; 24] = [
    "PERIOD_BEGIN",
    "PERIOD_END",
    "PERIOD_DURATION",
    "REGION_TYPE",
    "REGION_TYPE_ID",
    "TABLE_ID",
    "IS_SEASONALLY_ADJUSTED",
    "CITY",
    "STATE",
    "STATE_CODE",
    "PROPERTY_TYPE",
    "PROPERTY_TYPE_ID",
    "MEDIAN_SALE_PRICE",
    "MEDIAN_LIST_PRICE",
    "MEDIAN_PPSF",
    "MEDIAN_LIST_PPSF",
    "HOMES_SOLD",
    "INVENTORY",
    "MONTHS_OF_SUPPLY",
    "MEDIAN_DOM",
    "AVG_SALE_TO_LIST",
    "SOLD_ABOVE_LIST",
    "PARENT_METRO_REGION_METRO_CODE",
    "LAST_UPDATED",
];

/// Derived columns appended after `REQUIRED_COLUMNS`
pub const DERIVED_COLUMNS: [&str; 4] = [
    "PERIOD_BEGIN_IN_YEARS",
    "PERIOD_END_IN_YEARS",
    "PERIOD_BEGIN_IN_MONTHS",
    "PERIOD_END_IN_MONTHS",
];

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Field values read as missing, in addition to the empty string.
/// Mirrors the NA markers pandas recognises when reading CSV.
pub const NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Three-letter English abbreviation for a 1-based month number
pub fn month_name(month: u32) -> Option<&'static str> {
    match month {
        1..=12 => Some(MONTH_NAMES[(month - 1) as usize]),
        _ => None,
    }
}

/// Full header of the normalized dataset
pub fn output_header() -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .chain(DERIVED_COLUMNS.iter())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_name_covers_calendar() {
        assert_eq!(month_name(1), Some("Jan"));
        assert_eq!(month_name(3), Some("Mar"));
        assert_eq!(month_name(12), Some("Dec"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn output_header_appends_derived_columns() {
        let header = output_header();
        assert_eq!(header.len(), 28);
        assert_eq!(header[0], "PERIOD_BEGIN");
        assert_eq!(header[23], "LAST_UPDATED");
        assert_eq!(header[24], "PERIOD_BEGIN_IN_YEARS");
        assert_eq!(header[27], "PERIOD_END_IN_MONTHS");
    }
}
