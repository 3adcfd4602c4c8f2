use common::model::datasource::Table;
use std::fs;
use std::path::Path;

const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Most frequent of `, ; \t |` in the header line, `,` when none occurs.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = (b',', 0);
    for delimiter in DELIMITERS {
        let count = header_line.bytes().filter(|b| *b == delimiter).count();
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

/// Parses delimited text into a header row and data rows.
///
/// Rows may be shorter or longer than the header; cells are kept as written
/// apart from header trimming.
pub fn parse_table(content: &str) -> Result<Table, csv::Error> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let header_line = content.lines().next().unwrap_or("");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(header_line))
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    Ok(Table { headers, rows })
}

pub fn read_table(path: &Path) -> Result<Table, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    parse_table(&content).map_err(|e| e.to_string())
}
