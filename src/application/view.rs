// =====================
// 月ビュー構築 (チャット側インラインキーボード用DTO)
// =====================
//
// 台帳の内容からグリッドを組み立てるだけの純粋関数。
// ここでは一切DBに触らない（読み取り結果は MonthContext 経由で受け取る）。

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::application::time::{days_in_month, first_weekday_offset, prev_month_of};
use crate::domain::action::{Action, NavDir};
use crate::domain::models::ShiftKind;

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const TODAY_MARKER: &str = "🧐";
const DAY_MARKER: &str = "☀️";
const NIGHT_MARKER: &str = "🌙";

/// グリッド上の1ボタン
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    pub text: String,
    pub callback: String,
}

impl Button {
    fn new(text: impl Into<String>, action: Action) -> Self {
        Self { text: text.into(), callback: action.encode() }
    }
}

/// チャット側へ渡すキーボード全体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

/// 月ビューの入力。呼び出し側が台帳から読み取って詰める
#[derive(Debug, Clone)]
pub struct MonthContext {
    pub year: i32,
    pub month: u32,
    /// 日番号 → シフト種別
    pub entries: BTreeMap<u32, ShiftKind>,
    /// 表示中の月が「今月」の場合のみ Some(今日の日番号)
    pub today: Option<u32>,
    /// ローテーション検出が成立している場合 true
    pub offer_fill: bool,
}

pub fn build_month_view(ctx: &MonthContext) -> Keyboard {
    let (year, month) = (ctx.year, ctx.month);
    let mut rows: Vec<Vec<Button>> = Vec::new();

    // 1. ヘッダ行（月名 + 年、非インタラクティブ）
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("Invalid date provided (month should be 1-12)");
    rows.push(vec![Button::new(first_day.format("%B %Y").to_string(), Action::Ignore)]);

    // 2. 曜日ラベル行（月曜始まり）
    rows.push(
        WEEKDAY_LABELS
            .iter()
            .map(|label| Button::new(*label, Action::Ignore))
            .collect(),
    );

    // 3. 前月の埋め草セル
    let offset = first_weekday_offset(year, month);
    let (prev_year, prev_month) = prev_month_of(year, month);
    let days_in_prev = days_in_month(prev_year, prev_month);

    let mut row: Vec<Button> = Vec::new();
    for i in 0..offset {
        let prev_day = days_in_prev - offset + i + 1;
        row.push(Button::new(prev_day.to_string(), Action::Ignore));
    }

    // 4. 当月の日付セル
    for day in 1..=days_in_month(year, month) {
        let mut text = day.to_string();
        if ctx.today == Some(day) {
            text.push_str(TODAY_MARKER);
        }
        match ctx.entries.get(&day) {
            Some(ShiftKind::Day) => text.push_str(DAY_MARKER),
            Some(ShiftKind::Night) => text.push_str(NIGHT_MARKER),
            None => {}
        }

        row.push(Button::new(text, Action::PickDay { year, month, day }));
        if row.len() == 7 {
            rows.push(std::mem::take(&mut row));
        }
    }

    // 5. 翌月の埋め草セル（最終行を7列に揃える）
    if !row.is_empty() {
        let mut next_day = 1;
        while row.len() < 7 {
            row.push(Button::new(next_day.to_string(), Action::Ignore));
            next_day += 1;
        }
        rows.push(row);
    }

    // 6. 自動入力の提案行
    if ctx.offer_fill {
        rows.push(vec![Button::new(
            "Fill the rest of the month?",
            Action::FillMonth { year, month },
        )]);
    }

    // 7. 月クリア行（1件でもエントリがある月だけ）
    if !ctx.entries.is_empty() {
        rows.push(vec![Button::new(
            "Clear this month's shifts",
            Action::ClearMonth { year, month },
        )]);
    }

    // 8. ナビゲーション行。現在表示中の年月を運び、ロールオーバーは
    //    ハンドラ側で計算する
    rows.push(vec![
        Button::new("<<", Action::Navigate { dir: NavDir::Prev, year, month }),
        Button::new(">>", Action::Navigate { dir: NavDir::Next, year, month }),
    ]);

    Keyboard { rows }
}

/// 日付タップ後の種別選択キーボード。
/// 既にエントリがある日だけ削除ボタンを出す。
pub fn build_shift_chooser(year: i32, month: u32, day: u32, has_entry: bool) -> Keyboard {
    let mut rows = vec![vec![
        Button::new("☀️ Day", Action::AddShift { kind: ShiftKind::Day, year, month, day }),
        Button::new("🌙 Night", Action::AddShift { kind: ShiftKind::Night, year, month, day }),
    ]];

    if has_entry {
        rows.push(vec![Button::new(
            "❌ Delete shift",
            Action::DeleteShift { year, month, day },
        )]);
    }

    rows.push(vec![Button::new("Cancel", Action::Cancel { year, month })]);

    Keyboard { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(year: i32, month: u32) -> MonthContext {
        MonthContext { year, month, entries: BTreeMap::new(), today: None, offer_fill: false }
    }

    fn day_cells(keyboard: &Keyboard) -> Vec<&Button> {
        keyboard
            .rows
            .iter()
            .flatten()
            .filter(|button| button.callback.starts_with("day_"))
            .collect()
    }

    #[test]
    fn test_day_cell_count_follows_leap_years() {
        assert_eq!(day_cells(&build_month_view(&ctx(2024, 2))).len(), 29);
        assert_eq!(day_cells(&build_month_view(&ctx(2023, 2))).len(), 28);
        assert_eq!(day_cells(&build_month_view(&ctx(2024, 5))).len(), 31);
    }

    #[test]
    fn test_week_rows_are_padded_to_seven_columns() {
        let keyboard = build_month_view(&ctx(2024, 5));
        // 行構成: ヘッダ / 曜日 / 週×n / ナビ
        for row in &keyboard.rows[1..keyboard.rows.len() - 1] {
            assert_eq!(row.len(), 7);
        }
    }

    #[test]
    fn test_leading_fillers_continue_previous_month() {
        // 2024年5月1日は水曜 → 埋め草は4月29日・30日
        let keyboard = build_month_view(&ctx(2024, 5));
        let first_week = &keyboard.rows[2];
        assert_eq!(first_week[0].text, "29");
        assert_eq!(first_week[0].callback, "ignore");
        assert_eq!(first_week[1].text, "30");
        assert_eq!(first_week[2].text, "1");
        assert_eq!(first_week[2].callback, "day_2024_5_1");
    }

    #[test]
    fn test_trailing_fillers_continue_next_month() {
        // 2024年5月31日は金曜 → 最終行の残り2セルは 1, 2
        let keyboard = build_month_view(&ctx(2024, 5));
        let nav_index = keyboard.rows.len() - 1;
        let last_week = &keyboard.rows[nav_index - 1];
        assert_eq!(last_week[5].text, "1");
        assert_eq!(last_week[5].callback, "ignore");
        assert_eq!(last_week[6].text, "2");
    }

    #[test]
    fn test_markers_for_today_and_shifts() {
        let mut context = ctx(2024, 5);
        context.today = Some(3);
        context.entries.insert(3, ShiftKind::Day);
        context.entries.insert(4, ShiftKind::Night);

        let keyboard = build_month_view(&context);
        let cells = day_cells(&keyboard);
        assert_eq!(cells[2].text, "3🧐☀️");
        assert_eq!(cells[3].text, "4🌙");
        assert_eq!(cells[4].text, "5");
    }

    #[test]
    fn test_action_rows_appear_only_when_relevant() {
        // 空の月: 提案もクリアも無し
        let keyboard = build_month_view(&ctx(2024, 5));
        let callbacks: Vec<&str> =
            keyboard.rows.iter().flatten().map(|b| b.callback.as_str()).collect();
        assert!(!callbacks.iter().any(|c| c.starts_with("fill_month")));
        assert!(!callbacks.iter().any(|c| c.starts_with("clear_events")));

        // エントリあり + 提案あり
        let mut context = ctx(2024, 5);
        context.entries.insert(10, ShiftKind::Night);
        context.offer_fill = true;
        let keyboard = build_month_view(&context);
        let callbacks: Vec<&str> =
            keyboard.rows.iter().flatten().map(|b| b.callback.as_str()).collect();
        assert!(callbacks.contains(&"fill_month_2024_5"));
        assert!(callbacks.contains(&"clear_events_2024_5"));
    }

    #[test]
    fn test_navigation_row_carries_current_month() {
        let keyboard = build_month_view(&ctx(2024, 12));
        let nav = keyboard.rows.last().unwrap();
        assert_eq!(nav[0].callback, "prev_2024_12");
        assert_eq!(nav[1].callback, "next_2024_12");
    }

    #[test]
    fn test_shift_chooser_delete_row_requires_existing_entry() {
        let without = build_shift_chooser(2024, 5, 3, false);
        assert_eq!(without.rows.len(), 2); // 種別行 + キャンセル行
        assert!(without.rows.iter().flatten().all(|b| !b.callback.starts_with("delete_event")));

        let with = build_shift_chooser(2024, 5, 3, true);
        assert_eq!(with.rows.len(), 3);
        assert_eq!(with.rows[1][0].callback, "delete_event_2024_5_3");
        assert_eq!(with.rows[2][0].callback, "cancel_2024_5");
    }
}
