//! 按表头名称访问的行
//!
//! 表头取第一条非注释、非空的行；之后的每一行按位置与表头配对。
//! 表头中重复的名称以第一次出现为准，后面的同名列被遮蔽。

use std::collections::HashMap;
use std::io::Read;
use std::mem;
use std::sync::Arc;

use fastcsv_config::ReadConfig;
use fastcsv_log::{debug, Logger};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::csv_reader::CsvReader;
use super::row::CsvRow;
use crate::error::CsvError;

/// 表头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// 原始表头行
    names: Vec<String>,
    /// 去重后的名称，按列顺序
    keys: Vec<String>,
    /// `keys[i]` 对应的原始列号
    columns: Vec<usize>,
    positions: HashMap<String, usize>,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        let mut keys = Vec::with_capacity(names.len());
        let mut columns = Vec::with_capacity(names.len());
        let mut positions = HashMap::with_capacity(names.len());

        for (column, name) in names.iter().enumerate() {
            if positions.contains_key(name) {
                continue;
            }
            positions.insert(name.clone(), keys.len());
            keys.push(name.clone());
            columns.push(column);
        }

        Self {
            names,
            keys,
            columns,
            positions,
        }
    }

    /// 原始表头（含重复名称）
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// 去重后的名称
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// 名称对应的原始列号
    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).map(|&i| self.columns[i])
    }

    /// 去重后的名称个数
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn has_duplicates(&self) -> bool {
        self.keys.len() != self.names.len()
    }
}

/// 以表头名称为键的行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCsvRow {
    original_line_number: u64,
    header: Arc<Header>,
    /// 与 `header.keys()` 一一对应
    values: Vec<String>,
}

impl NamedCsvRow {
    /// 按位置把 `row` 与表头配对；多余的字段被忽略
    pub fn from_row(header: Arc<Header>, row: CsvRow) -> Result<Self, CsvError> {
        let line = row.original_line_number();
        let mut fields = row.into_fields();
        let mut values = Vec::with_capacity(header.len());

        for (name, &column) in header.keys.iter().zip(&header.columns) {
            match fields.get_mut(column) {
                Some(value) => values.push(mem::take(value)),
                None => {
                    return Err(CsvError::MissingField {
                        line,
                        name: name.clone(),
                        index: column,
                    })
                }
            }
        }

        Ok(Self {
            original_line_number: line,
            header,
            values,
        })
    }

    pub fn original_line_number(&self) -> u64 {
        self.original_line_number
    }

    /// 按名称取值；名称不在表头中时返回 `UnknownField`
    pub fn field(&self, name: &str) -> Result<&str, CsvError> {
        self.get(name).ok_or_else(|| CsvError::UnknownField {
            name: name.to_string(),
            valid: self.header.keys.clone(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.header
            .positions
            .get(name)
            .map(|&i| self.values[i].as_str())
    }

    /// (名称, 值)，按表头列顺序
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// 序列化为保持列顺序的 map
impl Serialize for NamedCsvRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// 按名称访问的读取器
pub struct NamedCsvReader<R> {
    reader: CsvReader<R>,
    header: Option<Arc<Header>>,
    failed: bool,
    logger: Arc<Logger>,
}

impl<R: Read> NamedCsvReader<R> {
    pub fn new(reader: R) -> Self {
        let logger = Logger::noop();
        Self {
            reader: CsvReader::new(reader),
            header: None,
            failed: false,
            logger,
        }
    }

    pub fn with_config(reader: R, config: ReadConfig) -> Result<Self, CsvError> {
        Self::with_logger(reader, config, Logger::noop())
    }

    pub fn with_logger(
        reader: R,
        config: ReadConfig,
        logger: Arc<Logger>,
    ) -> Result<Self, CsvError> {
        Ok(Self {
            reader: CsvReader::with_logger(reader, config, logger.clone())?,
            header: None,
            failed: false,
            logger,
        })
    }

    pub fn config(&self) -> &ReadConfig {
        self.reader.config()
    }

    /// 表头；尚未读取时从输入中读取
    ///
    /// 输入中没有任何数据行时返回 `Ok(None)`。
    pub fn header(&mut self) -> Result<Option<Arc<Header>>, CsvError> {
        if let Some(header) = &self.header {
            return Ok(Some(header.clone()));
        }
        if self.failed {
            return Ok(None);
        }

        while let Some(row) = self.fail_on_error(|r| r.reader.next_row())? {
            if row.is_comment() || row.is_empty() {
                continue;
            }
            let header = Arc::new(Header::new(row.into_fields()));
            debug!(
                self.logger,
                "Captured header with {} columns: {:?}",
                header.names().len(),
                header.names()
            );
            if header.has_duplicates() {
                debug!(
                    self.logger,
                    "Header has duplicate names; keeping the first of each ({} distinct)",
                    header.len()
                );
            }
            self.header = Some(header.clone());
            return Ok(Some(header));
        }
        Ok(None)
    }

    pub fn next_row(&mut self) -> Result<Option<NamedCsvRow>, CsvError> {
        let Some(header) = self.header()? else {
            return Ok(None);
        };
        if self.failed {
            return Ok(None);
        }

        while let Some(row) = self.fail_on_error(|r| r.reader.next_row())? {
            if row.is_comment() || row.is_empty() {
                continue;
            }
            let named = self.fail_on_error(|_| NamedCsvRow::from_row(header, row))?;
            return Ok(Some(named));
        }
        Ok(None)
    }

    fn fail_on_error<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, CsvError>,
    ) -> Result<T, CsvError> {
        let result = op(self);
        if result.is_err() {
            self.failed = true;
        }
        result
    }
}

impl<R: Read> Iterator for NamedCsvReader<R> {
    type Item = Result<NamedCsvRow, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastcsv_config::CommentStrategy;

    fn header(names: &[&str]) -> Arc<Header> {
        Arc::new(Header::new(names.iter().map(|s| s.to_string()).collect()))
    }

    fn row(line: u64, fields: &[&str]) -> CsvRow {
        CsvRow::new(line, fields.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_named_field_lookup() {
        let named = NamedCsvRow::from_row(header(&["id", "name"]), row(2, &["1", "Alice"])).unwrap();
        assert_eq!(named.field("name").unwrap(), "Alice");
        assert_eq!(named.original_line_number(), 2);
        assert_eq!(
            named.iter().collect::<Vec<_>>(),
            vec![("id", "1"), ("name", "Alice")]
        );
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let named =
            NamedCsvRow::from_row(header(&["id", "name", "id"]), row(2, &["1", "Alice", "2"]))
                .unwrap();
        assert_eq!(named.field("id").unwrap(), "1");
        assert_eq!(named.len(), 2);
        assert!(named.header().has_duplicates());
        assert_eq!(named.header().column_of("id"), Some(0));
    }

    #[test]
    fn test_unknown_field() {
        let named = NamedCsvRow::from_row(header(&["id", "name"]), row(2, &["1", "Alice"])).unwrap();
        let err = named.field("age").unwrap_err();
        assert_eq!(
            err.to_string(),
            "No element with name 'age' found. Valid names are: [id, name]"
        );
        assert!(named.get("age").is_none());
    }

    #[test]
    fn test_short_row_is_missing_field() {
        let err = NamedCsvRow::from_row(header(&["a", "b", "c"]), row(7, &["1"])).unwrap_err();
        assert!(matches!(
            err,
            CsvError::MissingField { line: 7, index: 1, ref name } if name == "b"
        ));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let named = NamedCsvRow::from_row(header(&["a"]), row(2, &["1", "2", "3"])).unwrap();
        assert_eq!(named.len(), 1);
    }

    #[test]
    fn test_named_reader() {
        let mut reader = NamedCsvReader::new("id,name\n1,Alice\n\n2,Bob\n".as_bytes());
        assert_eq!(reader.header().unwrap().unwrap().names(), &["id", "name"]);

        let rows: Vec<NamedCsvRow> = reader.map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].field("name").unwrap(), "Bob");
        assert_eq!(rows[1].original_line_number(), 4);
        assert!(Arc::ptr_eq(rows[0].header(), rows[1].header()));
    }

    #[test]
    fn test_named_reader_skips_comments_before_header() {
        let config = ReadConfig::default()
            .with_comment_strategy(CommentStrategy::Read)
            .with_skip_empty_rows(false);
        let input = "#generated\n\nid,name\n#mid\n1,Alice\n";
        let reader = NamedCsvReader::with_config(input.as_bytes(), config).unwrap();
        let rows: Vec<NamedCsvRow> = reader.map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field("id").unwrap(), "1");
        assert_eq!(rows[0].original_line_number(), 5);
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let mut reader = NamedCsvReader::new("a,b\n".as_bytes());
        assert!(reader.next_row().unwrap().is_none());
        assert_eq!(reader.header().unwrap().unwrap().len(), 2);

        let mut empty = NamedCsvReader::new("".as_bytes());
        assert!(empty.header().unwrap().is_none());
        assert!(empty.next().is_none());
    }

    #[test]
    fn test_named_reader_poisoned_after_missing_field() {
        let mut reader = NamedCsvReader::new("a,b\n1\n2,3\n".as_bytes());
        assert!(matches!(
            reader.next_row(),
            Err(CsvError::MissingField { line: 2, .. })
        ));
        assert!(reader.next_row().unwrap().is_none());
    }

    #[test]
    fn test_named_row_serializes_in_column_order() {
        let named =
            NamedCsvRow::from_row(header(&["z", "a"]), row(2, &["last", "first"])).unwrap();
        let json = serde_json::to_string(&named).unwrap();
        assert_eq!(json, r#"{"z":"last","a":"first"}"#);
    }
}
