#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use redfin_etl::constants::REQUIRED_COLUMNS;

/// Source header: the required columns with a few extra columns mixed in,
/// in a different order than the normalized output.
pub fn source_header() -> Vec<&'static str> {
    let mut header = vec!["REGION", "PARENT_METRO_REGION"];
    header.extend(REQUIRED_COLUMNS.iter().rev());
    header.insert(10, "PENDING_SALES");
    header
}

pub fn default_value(column: &str) -> &'static str {
    match column {
        "PERIOD_BEGIN" => "2021-01-01",
        "PERIOD_END" => "2021-03-31",
        "PERIOD_DURATION" => "90",
        "REGION_TYPE" => "place",
        "REGION_TYPE_ID" => "6",
        "TABLE_ID" => "17426",
        "IS_SEASONALLY_ADJUSTED" => "f",
        "CITY" => "Seattle",
        "STATE" => "Washington",
        "STATE_CODE" => "WA",
        "PROPERTY_TYPE" => "All Residential",
        "PROPERTY_TYPE_ID" => "-1",
        "MEDIAN_SALE_PRICE" => "750000",
        "MEDIAN_LIST_PRICE" => "725000",
        "MEDIAN_PPSF" => "480.5",
        "MEDIAN_LIST_PPSF" => "470.2",
        "HOMES_SOLD" => "1200",
        "INVENTORY" => "900",
        "MONTHS_OF_SUPPLY" => "1.5",
        "MEDIAN_DOM" => "8",
        "AVG_SALE_TO_LIST" => "1.04",
        "SOLD_ABOVE_LIST" => "0.55",
        "PARENT_METRO_REGION_METRO_CODE" => "42644",
        "LAST_UPDATED" => "2021-04-18 14:25:41",
        "REGION" => "Seattle, WA",
        "PARENT_METRO_REGION" => "Seattle, WA",
        _ => "",
    }
}

/// One source row as tab-separated text, defaults overridden per column
pub fn source_row(overrides: &[(&str, &str)]) -> String {
    source_header()
        .iter()
        .map(|col| {
            overrides
                .iter()
                .find(|(k, _)| k == col)
                .map(|(_, v)| *v)
                .unwrap_or_else(|| default_value(col))
        })
        .collect::<Vec<_>>()
        .join("\t")
}

pub fn source_tsv(rows: &[String]) -> String {
    let mut out = source_header().join("\t");
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// `n` distinct valid rows spread over several cities and months
pub fn varied_rows(n: usize) -> Vec<String> {
    let cities = ["Seattle, WA", "Tacoma", "Spokane", "Bellevue, WA", "Everett"];
    (0..n)
        .map(|i| {
            let begin = format!("2020-{:02}-01", i % 12 + 1);
            let end = format!("2021-{:02}-28", (i + 5) % 12 + 1);
            let price = format!("{}", 400_000 + i * 1000);
            let homes = if i % 9 == 4 { String::new() } else { format!("{}", i) };
            source_row(&[
                ("CITY", cities[i % cities.len()]),
                ("PERIOD_BEGIN", &begin),
                ("PERIOD_END", &end),
                ("MEDIAN_SALE_PRICE", &price),
                ("HOMES_SOLD", &homes),
            ])
        })
        .collect()
}

pub fn write_gzip(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let mut enc = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    enc.write_all(body.as_bytes()).unwrap();
    enc.finish().unwrap();
    path
}

/// Parse published CSV into (header, rows as column -> value maps)
pub fn parse_csv(bytes: &[u8]) -> (Vec<String>, Vec<HashMap<String, String>>) {
    let mut reader = csv::Reader::from_reader(bytes);
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            header
                .iter()
                .cloned()
                .zip(r.iter().map(String::from))
                .collect()
        })
        .collect();
    (header, rows)
}
