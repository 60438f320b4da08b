// =====================
// ローテーション検出と自動入力計画
// =====================
//
// 「4連休 → 日勤2日 → 夜勤2日」の繰り返し勤務を扱う。
// 月内の直近4件（日付降順）が [夜, 夜, 日, 日] に一致したときだけ
// 「月末まで自動入力しますか？」の提案を出す。

use chrono::Datelike;

use crate::domain::models::{ShiftEntry, ShiftKind};

/// 直近4件（日付降順）の一致パターン。
/// 時系列の順方向では「…日, 日, 夜, 夜」で締めたことを意味する。
pub const ROTATION_SIGNATURE: [ShiftKind; 4] =
    [ShiftKind::Night, ShiftKind::Night, ShiftKind::Day, ShiftKind::Day];

/// 自動入力の提案判定。
///
/// `recent_desc` は月内の直近エントリ（日付降順・高々4件）。
/// 提案が成立する場合、起点となる最終エントリの「日」を返す。
///
/// 成立条件:
/// - ちょうど4件あり、種別が ROTATION_SIGNATURE に一致すること
/// - 最終エントリから月末まで6日以上残っていること
///   （残りが足りないと何も書き込めない提案になるため）
pub fn fill_offer(recent_desc: &[ShiftEntry], days_in_month: u32) -> Option<u32> {
    if recent_desc.len() != 4 {
        return None;
    }
    let kinds: Vec<ShiftKind> = recent_desc.iter().map(|entry| entry.kind).collect();
    if kinds != ROTATION_SIGNATURE {
        return None;
    }

    let last_day = recent_desc[0].date.day();
    if days_in_month - last_day < 6 {
        return None;
    }
    Some(last_day)
}

/// 月末までの自動入力計画を生成する。
///
/// 最終エントリ日 + 5 を起点に8日周期を刻む:
/// 起点から 0,1 日目が日勤、2,3 日目が夜勤、4〜7 日目は休み。
/// 起点より前の4日間（last_day+1 〜 last_day+4）は周期の休み側なので
/// 何も書かない。
pub fn fill_plan(last_day: u32, days_in_month: u32) -> Vec<(u32, ShiftKind)> {
    let start = last_day + 5;
    let mut plan = Vec::new();

    let mut day = start;
    while day <= days_in_month {
        match (day - start) % 8 {
            0 | 1 => plan.push((day, ShiftKind::Day)),
            2 | 3 => plan.push((day, ShiftKind::Night)),
            _ => {} // 休み
        }
        day += 1;
    }
    plan
}
