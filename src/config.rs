// =====================
// 起動時設定
// =====================
//
// 基準タイムゾーンと通知時刻はプロセス起動時に固定。
// 実行中の再設定は想定しない（変更は再起動で反映）。

use chrono_tz::Tz;

use crate::error::ConfigError;

const TIMEZONE_ENV: &str = "BOT_TIMEZONE";
const NOTIFY_AT_ENV: &str = "BOT_NOTIFY_AT";

const DEFAULT_TIMEZONE: &str = "Europe/Moscow";
const DEFAULT_NOTIFY_AT: &str = "21:42";

/// 通知スケジューラの設定
#[derive(Debug, Clone, Copy)]
pub struct NotifyConfig {
    /// 通知時刻の基準となるIANAタイムゾーン
    pub tz: Tz,
    pub hour: u32,
    pub minute: u32,
}

impl NotifyConfig {
    pub fn new(tz_name: &str, notify_at: &str) -> Result<Self, ConfigError> {
        let tz: Tz = tz_name
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(tz_name.to_string()))?;

        let (hour, minute) = parse_hhmm(notify_at)?;
        Ok(Self { tz, hour, minute })
    }

    /// 環境変数 BOT_TIMEZONE / BOT_NOTIFY_AT から読み込む。
    /// 未設定の場合は既定値にフォールバックする
    pub fn from_env() -> Result<Self, ConfigError> {
        let tz_name =
            std::env::var(TIMEZONE_ENV).unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
        let notify_at =
            std::env::var(NOTIFY_AT_ENV).unwrap_or_else(|_| DEFAULT_NOTIFY_AT.to_string());
        Self::new(&tz_name, &notify_at)
    }
}

fn parse_hhmm(raw: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = || ConfigError::InvalidTime(raw.to_string());

    let (hour_str, minute_str) = raw.split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour_str.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_str.parse().map_err(|_| invalid())?;

    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}
