//! Postgres 门店台账实现
//!
//! 通过 SQL 查询实现台账读写。
//!
//! 设计要点：
//! - 心跳使用 `insert ... on conflict do update` 单语句 upsert，建档与置 online 之间无竞态
//! - 降级使用带条件的 `update`，只有仍在线且仍超时的行才会被改写
//! - 使用参数化 SQL 防止注入

use crate::connection::{connect_pool, ensure_schema};
use crate::error::StorageError;
use crate::models::{StaleStore, StoreRecord};
use crate::traits::StoreLedger;
use crate::validation::ensure_store_id;
use domain::StoreStatus;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;

pub struct PgStoreLedger {
    pub pool: PgPool,
}

impl PgStoreLedger {
    /// 建立连接池并确保表结构存在
    ///
    /// # 参数
    /// - `database_url`：Postgres 连接字符串
    /// - `max_connections`：连接池上限
    ///
    /// # 返回
    /// - `Result<Self, StorageError>`：台账或错误（启动期错误对进程是致命的）
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = connect_pool(database_url, max_connections).await?;
        ensure_schema(&pool).await?;
        info!(target: "storewatch.storage", max_connections, "ledger_ready");
        Ok(Self { pool })
    }

    /// 关闭连接池（停机时在巡检任务停止之后调用）。
    pub async fn close(&self) {
        self.pool.close().await;
        info!(target: "storewatch.storage", "ledger_closed");
    }
}

fn row_to_record(row: &PgRow) -> Result<StoreRecord, StorageError> {
    let status: String = row.try_get("status")?;
    Ok(StoreRecord {
        store_id: row.try_get("loja_id")?,
        last_ping_ms: row.try_get("ultimo_ping")?,
        status: status.parse::<StoreStatus>()?,
    })
}

#[async_trait::async_trait]
impl StoreLedger for PgStoreLedger {
    /// 建档或刷新心跳
    async fn upsert_heartbeat(
        &self,
        store_id: &str,
        ts_ms: i64,
    ) -> Result<StoreRecord, StorageError> {
        ensure_store_id(store_id)?;
        // greatest() 忽略 NULL：建档时为空的 ultimo_ping 直接取新值
        let row = sqlx::query(
            "insert into lojas (loja_id, ultimo_ping, status) values ($1, $2, 'online') \
             on conflict (loja_id) do update set \
             ultimo_ping = greatest(lojas.ultimo_ping, excluded.ultimo_ping), \
             status = 'online' \
             returning loja_id, ultimo_ping, status",
        )
        .bind(store_id)
        .bind(ts_ms)
        .fetch_one(&self.pool)
        .await?;
        row_to_record(&row)
    }

    /// 全量快照
    async fn read_all(&self) -> Result<Vec<StoreRecord>, StorageError> {
        let rows = sqlx::query("select loja_id, ultimo_ping, status from lojas order by loja_id")
            .fetch_all(&self.pool)
            .await?;
        let mut stores = Vec::with_capacity(rows.len());
        for row in &rows {
            stores.push(row_to_record(row)?);
        }
        Ok(stores)
    }

    /// 超时候选（单条语句，一致性快照）
    async fn read_stale(&self, threshold_ms: i64) -> Result<Vec<StaleStore>, StorageError> {
        let rows = sqlx::query(
            "select loja_id, ultimo_ping from lojas \
             where status = 'online' and (ultimo_ping is null or ultimo_ping < $1) \
             order by loja_id",
        )
        .bind(threshold_ms)
        .fetch_all(&self.pool)
        .await?;
        let mut stale = Vec::with_capacity(rows.len());
        for row in rows {
            stale.push(StaleStore {
                store_id: row.try_get("loja_id")?,
                last_ping_ms: row.try_get("ultimo_ping")?,
            });
        }
        Ok(stale)
    }

    /// 条件降级
    async fn mark_offline(
        &self,
        store_id: &str,
        stale_before_ms: i64,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "update lojas set status = 'offline' \
             where loja_id = $1 and status = 'online' \
             and (ultimo_ping is null or ultimo_ping < $2)",
        )
        .bind(store_id)
        .bind(stale_before_ms)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
