use chrono::{Datelike, NaiveDate};

/// 指定された年・月の日数を計算する
/// ※ month: 1 (1月) 〜 12 (12月)
/// ※ うるう年の判定は chrono 側に任せる
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // 1. その月の1日を取得
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("Invalid date provided (month should be 1-12)");

    // 2. 翌月の1日との差分を取る
    let (next_year, next_month) = next_month_of(year, month);
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("Invalid date provided (month should be 1-12)");

    next_first.signed_duration_since(first_day).num_days() as u32
}

/// 月初セルの曜日オフセットを取得する (月曜=0, 火曜=1, ..., 日曜=6)
/// 月曜始まりのカレンダーにおける「第1週の空白の数」
pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("Invalid date provided (month should be 1-12)")
        .weekday()
        .num_days_from_monday()
}

/// 翌月へのロールオーバー (12月 → 翌年1月)
pub fn next_month_of(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// 前月へのロールオーバー (1月 → 前年12月)
pub fn prev_month_of(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}
