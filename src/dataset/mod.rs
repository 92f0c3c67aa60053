//! 数据集文件工具

pub mod csv_export;
pub mod merge;
