//! 数据库连接管理
//!
//! 提供数据库连接池初始化与表结构引导：
//! - connect_pool：建立 Postgres 连接池
//! - ensure_schema：创建 `lojas` 表（若不存在）
//!
//! 连接池在进程启动时获取、停机时释放，由调用方显式持有。

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// 建立 Postgres 连接池
///
/// # 参数
/// - `database_url`：Postgres 连接字符串
/// - `max_connections`：连接池上限
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// 创建台账表（幂等）。
///
/// `ultimo_ping` 为 epoch 毫秒，仅在建档瞬间允许为空。
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(
        "create table if not exists lojas (\
         loja_id text primary key, \
         ultimo_ping bigint, \
         status text not null default 'online')",
    )
    .execute(pool)
    .await?;
    sqlx::query("create index if not exists idx_lojas_status_ping on lojas (status, ultimo_ping)")
        .execute(pool)
        .await?;
    Ok(())
}
