// シフト台帳のリポジトリ。(user_id, date) をキーに upsert で上書き保存する
use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};

use crate::domain::models::{ShiftEntry, ShiftKind, UserId};
use crate::error::StoreError;

#[derive(Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

// =====================
// DB読み込み用ヘルパー構造体
// =====================

#[derive(FromRow)]
struct ShiftRow {
    date: String,
    is_day: bool,
}

impl ShiftRow {
    // date カラムは "YYYY-MM-DD" のTEXT。壊れた行は警告して読み飛ばす
    fn decode(self, user_id: UserId) -> Option<ShiftEntry> {
        match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(date) => {
                Some(ShiftEntry { user_id, date, kind: ShiftKind::from_is_day(self.is_day) })
            }
            Err(e) => {
                tracing::warn!(raw = %self.date, error = %e, "skipping shift row with unparseable date");
                None
            }
        }
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// strftime('%Y-%m', date) と比較する月キー
fn month_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

impl ShiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 追加または上書き。同じ (user_id, date) の既存行は置き換えられる
    pub async fn upsert(
        &self,
        user_id: UserId,
        date: NaiveDate,
        kind: ShiftKind,
    ) -> Result<(), StoreError> {
        sqlx::query("INSERT OR REPLACE INTO shifts (user_id, date, is_day) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(date_key(date))
            .bind(kind.is_day())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<ShiftKind>, StoreError> {
        let is_day: Option<bool> =
            sqlx::query_scalar("SELECT is_day FROM shifts WHERE user_id = ? AND date = ?")
                .bind(user_id)
                .bind(date_key(date))
                .fetch_optional(&self.pool)
                .await?;
        Ok(is_day.map(ShiftKind::from_is_day))
    }

    /// 削除。行が実際に消えたかどうかを返す（無かった場合はエラーではなく false）
    pub async fn delete(&self, user_id: UserId, date: NaiveDate) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM shifts WHERE user_id = ? AND date = ?")
            .bind(user_id)
            .bind(date_key(date))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// 指定月のエントリを日付昇順で返す
    pub async fn list_month(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> Result<Vec<ShiftEntry>, StoreError> {
        let rows: Vec<ShiftRow> = sqlx::query_as(
            "SELECT date, is_day FROM shifts
             WHERE user_id = ? AND strftime('%Y-%m', date) = ?
             ORDER BY date ASC",
        )
        .bind(user_id)
        .bind(month_key(year, month))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(|row| row.decode(user_id)).collect())
    }

    /// 指定月の直近エントリを日付降順で最大 limit 件返す
    pub async fn recent_in_month(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
        limit: u32,
    ) -> Result<Vec<ShiftEntry>, StoreError> {
        let rows: Vec<ShiftRow> = sqlx::query_as(
            "SELECT date, is_day FROM shifts
             WHERE user_id = ? AND strftime('%Y-%m', date) = ?
             ORDER BY date DESC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(month_key(year, month))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(|row| row.decode(user_id)).collect())
    }

    /// エントリを1件でも持つ全ユーザー（通知スケジューラ用）
    pub async fn list_all_users(&self) -> Result<Vec<UserId>, StoreError> {
        let users: Vec<UserId> = sqlx::query_scalar("SELECT DISTINCT user_id FROM shifts")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// 指定月のエントリを全削除し、消えた行数を返す
    pub async fn delete_month(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM shifts WHERE user_id = ? AND strftime('%Y-%m', date) = ?",
        )
        .bind(user_id)
        .bind(month_key(year, month))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
