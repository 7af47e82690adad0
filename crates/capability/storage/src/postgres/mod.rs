//! # PostgreSQL 存储实现模块
//!
//! 本模块提供台账接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 数据库模式
//!
//! - `lojas`：门店台账（loja_id PRIMARY KEY, ultimo_ping BIGINT, status TEXT）
//! - `idx_lojas_status_ping`：(status, ultimo_ping) 复合索引，服务于巡检扫描
//!
//! 表结构由 [`crate::connection::ensure_schema`] 在启动时创建。
//!
//! ## 并发
//!
//! 每个写操作都是单条语句，依赖 Postgres 行级锁保证原子性：
//! - 心跳：`insert ... on conflict (loja_id) do update`
//! - 降级：`update ... where status = 'online' and ultimo_ping < $threshold`
//!
//! 不同门店之间的写互不阻塞，应用层无需额外加锁。
//!
//! ## 错误处理
//!
//! 所有存储操作返回 `Result<T, StorageError>`，`sqlx::Error` 自动转换。

pub mod ledger;

pub use ledger::*;
