// =====================
// エラー型の定義
// =====================
//
// 「削除対象が無かった」は bool、「ペイロードが解読できない」は
// Option の None で表し、ここにはエラーとして載せない。

use thiserror::Error;

use crate::domain::models::UserId;

/// 永続化層の失敗。読み取り経路では呼び出し側の判断で
/// 空の結果に縮退してよい（ビュー構築など）。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// 特定ユーザーへの送信失敗。他ユーザーへの配送や
/// スケジューラ本体には波及させない。
#[derive(Debug, Error)]
#[error("failed to deliver to user {user_id}: {message}")]
pub struct DispatchError {
    pub user_id: UserId,
    pub message: String,
}

/// 起動時設定の不備。プロセス起動時にのみ発生する
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown timezone identifier: {0}")]
    InvalidTimezone(String),

    #[error("invalid notification time (expected HH:MM): {0}")]
    InvalidTime(String),
}
