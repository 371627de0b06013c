//! 读取端：字符流 → 行分词器 → 行迭代器

pub mod csv_reader;
pub mod named;
pub mod row;
pub mod stream;
pub mod tokenizer;

pub use csv_reader::CsvReader;
pub use named::{Header, NamedCsvReader, NamedCsvRow};
pub use row::CsvRow;
pub use stream::{CharStream, StreamError};
pub use tokenizer::RowTokenizer;
