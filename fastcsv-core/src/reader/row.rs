//! 按索引访问的行

use crate::error::CsvError;

/// 一条逻辑记录
///
/// 多行（引号内含换行）记录的 `original_line_number` 是它开始的物理行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    original_line_number: u64,
    fields: Vec<String>,
    comment: bool,
    empty: bool,
}

impl CsvRow {
    /// 普通数据行，`fields` 至少包含一个字段
    pub(crate) fn new(original_line_number: u64, fields: Vec<String>) -> Self {
        debug_assert!(!fields.is_empty());
        Self {
            original_line_number,
            fields,
            comment: false,
            empty: false,
        }
    }

    /// 注释行：唯一字段是注释标记之后的文本
    pub(crate) fn comment(original_line_number: u64, text: String) -> Self {
        Self {
            original_line_number,
            fields: vec![text],
            comment: true,
            empty: false,
        }
    }

    /// 空行哨兵：恰好一个空字段
    pub(crate) fn empty(original_line_number: u64) -> Self {
        Self {
            original_line_number,
            fields: vec![String::new()],
            comment: false,
            empty: true,
        }
    }

    pub fn original_line_number(&self) -> u64 {
        self.original_line_number
    }

    /// 按索引（从 0 开始）取字段
    pub fn field(&self, index: usize) -> Result<&str, CsvError> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or(CsvError::IndexOutOfRange {
                index,
                count: self.fields.len(),
            })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_comment(&self) -> bool {
        self.comment
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}
