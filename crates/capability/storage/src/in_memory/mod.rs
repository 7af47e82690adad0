//! 内存存储实现模块
//!
//! 仅用于单元测试、集成测试和本地演示。
//!
//! 包含以下实现：
//! - StoreLedger: InMemoryStoreLedger

pub mod ledger;

pub use ledger::*;
