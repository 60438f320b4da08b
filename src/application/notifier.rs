// =====================
// 通知スケジューラ
// =====================
//
// 毎日、基準タイムゾーンの決まった時刻に1回だけ起きて、
// 全ユーザーへ「今日と明日の予定」を送る。
// 固定間隔スリープではなく毎回「次の発火時刻」を計算し直すため、
// 遅延が蓄積してもズレたり二重発火したりしない。

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::application::transport::ChatPort;
use crate::config::NotifyConfig;
use crate::domain::models::ShiftKind;
use crate::error::StoreError;
use crate::infrastructure::shift_repo::ShiftRepository;

/// 今日と明日の2行サマリ。各行はそれぞれの日の参照結果だけを反映する
pub fn summary(today: Option<ShiftKind>, tomorrow: Option<ShiftKind>) -> String {
    let today_line = match today {
        None => "Day off today 🌴",
        Some(ShiftKind::Day) => "Today: day shift ☀️",
        Some(ShiftKind::Night) => "Today: night shift 🌙",
    };
    let tomorrow_line = match tomorrow {
        None => "Day off tomorrow 🌴",
        Some(ShiftKind::Day) => "Tomorrow: day shift ☀️",
        Some(ShiftKind::Night) => "Tomorrow: night shift 🌙",
    };
    format!("{today_line}\n{tomorrow_line}")
}

// DSTの切り替えでローカル時刻が存在しない・二重に存在する場合の解決:
// 存在しない時刻は1時間後ろへ、二重の時刻は早い方を採る
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

/// 次の発火時刻。今日の設定時刻がまだ未来ならそれ、
/// 過ぎていれば明日の同時刻（壁時計基準）
pub fn next_wake(now: DateTime<Tz>, hour: u32, minute: u32) -> DateTime<Tz> {
    let tz = now.timezone();
    let wall_clock = |date: NaiveDate| {
        date.and_hms_opt(hour, minute, 0)
            .expect("notification time validated at config load")
    };

    let today_target = resolve_local(tz, wall_clock(now.date_naive()));
    if today_target > now {
        return today_target;
    }

    let tomorrow = now
        .date_naive()
        .succ_opt()
        .expect("calendar overflow computing next wake");
    resolve_local(tz, wall_clock(tomorrow))
}

/// 1回分の通知パス。ユーザー単位の失敗はログに残して次へ進む
pub async fn check_and_notify<P: ChatPort>(
    repo: &ShiftRepository,
    port: &P,
    today: NaiveDate,
) -> Result<(), StoreError> {
    let tomorrow = today.succ_opt().expect("calendar overflow computing tomorrow");

    for user_id in repo.list_all_users().await? {
        let today_kind = match repo.get(user_id, today).await {
            Ok(kind) => kind,
            Err(e) => {
                tracing::error!(user_id, error = %e, "failed to read today's entry");
                continue;
            }
        };
        let tomorrow_kind = match repo.get(user_id, tomorrow).await {
            Ok(kind) => kind,
            Err(e) => {
                tracing::error!(user_id, error = %e, "failed to read tomorrow's entry");
                continue;
            }
        };

        let message = summary(today_kind, tomorrow_kind);
        if let Err(e) = port.send_message(user_id, &message, None).await {
            tracing::error!(user_id, error = %e, "notification dispatch failed");
        }
    }
    Ok(())
}

/// プロセスと同寿命の通知ループ。どのイテレーションの失敗でも止まらない
pub async fn notification_loop<P: ChatPort>(
    repo: ShiftRepository,
    port: std::sync::Arc<P>,
    config: NotifyConfig,
) {
    loop {
        let now = Utc::now().with_timezone(&config.tz);
        let target = next_wake(now, config.hour, config.minute);
        let wait = (target - now).to_std().unwrap_or_default();

        tracing::info!(next = %target, "notification scheduler sleeping");
        tokio::time::sleep(wait).await;

        let fired = Utc::now().with_timezone(&config.tz);
        tracing::info!(at = %fired, "notification scheduler firing");
        if let Err(e) = check_and_notify(&repo, port.as_ref(), fired.date_naive()).await {
            tracing::error!(error = %e, "notification pass failed");
        }
    }
}
