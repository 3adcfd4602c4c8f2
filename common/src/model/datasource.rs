use serde::{Deserialize, Serialize};

/// A registered CSV upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String, // UUID
    pub md5: String,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub source_type: DataSourceType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DataSourceType {
    Csv,
}

/// Header plus rows of a spreadsheet, as delivered by a table source.
///
/// Treated as an immutable snapshot for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
