use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod domain;
pub mod infrastructure;
pub mod application;

pub mod config;
pub mod error;

pub use application::commands::CalendarHandler;
pub use application::notifier::{check_and_notify, notification_loop};
pub use application::transport::ChatPort;
pub use application::view::{Button, Keyboard};
pub use config::NotifyConfig;
pub use domain::action::Action;
pub use domain::models::{PendingSelection, ShiftEntry, ShiftKind, UserId};
pub use error::{ConfigError, DispatchError, StoreError};
pub use infrastructure::shift_repo::ShiftRepository;

// =====================
// DB初期化
// =====================

/// DBファイルを（無ければ作って）開き、マイグレーションを適用する
pub async fn init_db(path: &str) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
