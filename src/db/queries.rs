use crate::models::QuotationRow;
use sqlx::{Executor, MySql};

/// 清空 quotations 表
pub async fn truncate_quotations<'e, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query("TRUNCATE TABLE quotations")
        .execute(executor)
        .await?;
    Ok(())
}

/// 插入单行报价 (created_at / updated_at 由数据库赋值)
pub async fn insert_quotation<'e, E>(executor: E, row: &QuotationRow) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO quotations
            (microsiga_pn, oracle_pn, pt_description, ncm, ipi, pis, cofins,
             fator_18, fator_12, fator_7, fator_4, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
        "#,
    )
    .bind(&row.microsiga_pn)
    .bind(&row.oracle_pn)
    .bind(&row.pt_description)
    .bind(&row.ncm)
    .bind(&row.ipi)
    .bind(&row.pis)
    .bind(&row.cofins)
    .bind(&row.fator_18)
    .bind(&row.fator_12)
    .bind(&row.fator_7)
    .bind(&row.fator_4)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// 统计 quotations 表行数
pub async fn count_quotations<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotations")
        .fetch_one(executor)
        .await
}
