pub mod error_log;
pub mod excel_write;
pub mod table_read;
pub mod vocabulary;
