use crate::db::queries;
use crate::models::QuotationRow;
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, Transaction};

/// 报价目标存储
///
/// 插入在 `begin` 与 `commit` 之间进行; `rollback` 丢弃当前未提交的批次。
#[async_trait]
pub trait QuotationStore: Send {
    /// 删除全部已有记录
    async fn clear(&mut self) -> Result<(), sqlx::Error>;
    async fn begin(&mut self) -> Result<(), sqlx::Error>;
    async fn insert(&mut self, row: &QuotationRow) -> Result<(), sqlx::Error>;
    async fn commit(&mut self) -> Result<(), sqlx::Error>;
    async fn rollback(&mut self) -> Result<(), sqlx::Error>;
    async fn count(&mut self) -> Result<i64, sqlx::Error>;
}

/// MySQL 实现
pub struct MySqlQuotationStore {
    pool: MySqlPool,
    tx: Option<Transaction<'static, MySql>>,
}

impl MySqlQuotationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool, tx: None }
    }
}

#[async_trait]
impl QuotationStore for MySqlQuotationStore {
    async fn clear(&mut self) -> Result<(), sqlx::Error> {
        queries::truncate_quotations(&self.pool).await
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        self.tx = Some(self.pool.begin().await?);
        Ok(())
    }

    async fn insert(&mut self, row: &QuotationRow) -> Result<(), sqlx::Error> {
        let tx = self
            .tx
            .as_mut()
            .ok_or_else(|| sqlx::Error::Protocol("insert outside of a transaction".to_string()))?;
        queries::insert_quotation(&mut **tx, row).await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }

    async fn count(&mut self) -> Result<i64, sqlx::Error> {
        queries::count_quotations(&self.pool).await
    }
}
