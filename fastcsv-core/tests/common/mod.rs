//! 测试辅助工具
//!
//! 提供读写测试共用的辅助函数

#![allow(dead_code)]

use std::io::Read;

use fastcsv_core::{CsvError, CsvReader, CsvRow, CsvWriter, ReadConfig, WriteConfig};

/// 用给定配置读取全部行
pub fn read_rows(input: &str, config: ReadConfig) -> Result<Vec<CsvRow>, CsvError> {
    CsvReader::with_config(input.as_bytes(), config)?.collect()
}

/// 用默认配置读取，只保留字段
pub fn read_fields(input: &str) -> Vec<Vec<String>> {
    read_rows(input, ReadConfig::default())
        .unwrap()
        .into_iter()
        .map(CsvRow::into_fields)
        .collect()
}

/// 把若干行写成字符串
pub fn write_rows(rows: &[Vec<String>], config: WriteConfig) -> String {
    let mut writer = CsvWriter::with_config(Vec::new(), config).unwrap();
    for row in rows {
        writer.write_row(row).unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

pub fn strings(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|s| s.to_string()).collect()
}

/// 每次最多返回 `chunk` 个字节的 reader，用于覆盖跨块边界的情况
pub struct ChunkedReader<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        Self { data, chunk }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.data.len().min(self.chunk).min(buf.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}
