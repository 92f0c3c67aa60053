//! 编排层
//!
//! 持有客户端资源，驱动整表遍历

pub mod sheet_processor;

pub use sheet_processor::App;
