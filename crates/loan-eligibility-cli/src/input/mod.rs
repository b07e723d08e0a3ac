pub mod file;
pub mod rate_table;
pub mod stdin;
