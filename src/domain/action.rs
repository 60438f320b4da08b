// =====================
// 操作ペイロードのコーデック
// =====================
//
// チャット側から届くボタン操作は "add_day_2024_5_3" のような
// アンダースコア区切りの文字列。ここで Action へ相互変換する。
// 解読できないペイロードは None（= 無言で ACK するだけの扱い）。

use crate::domain::models::ShiftKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDir {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 装飾セル。押されても何も起きない
    Ignore,
    /// 日付セルのタップ
    PickDay { year: i32, month: u32, day: u32 },
    /// シフト種別の確定
    AddShift { kind: ShiftKind, year: i32, month: u32, day: u32 },
    /// 選択中日付のシフト削除
    DeleteShift { year: i32, month: u32, day: u32 },
    /// 月内の全シフト削除
    ClearMonth { year: i32, month: u32 },
    /// ローテーションの月末までの自動入力
    FillMonth { year: i32, month: u32 },
    /// 前月 / 翌月への移動（現在表示中の年月を運ぶ）
    Navigate { dir: NavDir, year: i32, month: u32 },
    /// 種別選択のキャンセル
    Cancel { year: i32, month: u32 },
}

impl Action {
    pub fn encode(&self) -> String {
        match *self {
            Action::Ignore => "ignore".to_string(),
            Action::PickDay { year, month, day } => format!("day_{year}_{month}_{day}"),
            Action::AddShift { kind: ShiftKind::Day, year, month, day } => {
                format!("add_day_{year}_{month}_{day}")
            }
            Action::AddShift { kind: ShiftKind::Night, year, month, day } => {
                format!("add_night_{year}_{month}_{day}")
            }
            Action::DeleteShift { year, month, day } => {
                format!("delete_event_{year}_{month}_{day}")
            }
            Action::ClearMonth { year, month } => format!("clear_events_{year}_{month}"),
            Action::FillMonth { year, month } => format!("fill_month_{year}_{month}"),
            Action::Navigate { dir: NavDir::Prev, year, month } => format!("prev_{year}_{month}"),
            Action::Navigate { dir: NavDir::Next, year, month } => format!("next_{year}_{month}"),
            Action::Cancel { year, month } => format!("cancel_{year}_{month}"),
        }
    }

    pub fn parse(data: &str) -> Option<Action> {
        if data == "ignore" {
            return Some(Action::Ignore);
        }

        // "add_day" が "day" より先に来るよう、接頭辞の長い順に判定する
        if let Some(rest) = data.strip_prefix("add_day_") {
            let (year, month, day) = parse_ymd(rest)?;
            return Some(Action::AddShift { kind: ShiftKind::Day, year, month, day });
        }
        if let Some(rest) = data.strip_prefix("add_night_") {
            let (year, month, day) = parse_ymd(rest)?;
            return Some(Action::AddShift { kind: ShiftKind::Night, year, month, day });
        }
        if let Some(rest) = data.strip_prefix("delete_event_") {
            let (year, month, day) = parse_ymd(rest)?;
            return Some(Action::DeleteShift { year, month, day });
        }
        if let Some(rest) = data.strip_prefix("clear_events_") {
            let (year, month) = parse_ym(rest)?;
            return Some(Action::ClearMonth { year, month });
        }
        if let Some(rest) = data.strip_prefix("fill_month_") {
            let (year, month) = parse_ym(rest)?;
            return Some(Action::FillMonth { year, month });
        }
        if let Some(rest) = data.strip_prefix("day_") {
            let (year, month, day) = parse_ymd(rest)?;
            return Some(Action::PickDay { year, month, day });
        }
        if let Some(rest) = data.strip_prefix("prev_") {
            let (year, month) = parse_ym(rest)?;
            return Some(Action::Navigate { dir: NavDir::Prev, year, month });
        }
        if let Some(rest) = data.strip_prefix("next_") {
            let (year, month) = parse_ym(rest)?;
            return Some(Action::Navigate { dir: NavDir::Next, year, month });
        }
        if let Some(rest) = data.strip_prefix("cancel_") {
            let (year, month) = parse_ym(rest)?;
            return Some(Action::Cancel { year, month });
        }

        None
    }
}

// 年の範囲。カレンダーとして意味を成す西暦のみ受ける
// （捏造ペイロードの極端な年で日付演算を壊させない）
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

fn parse_ym(rest: &str) -> Option<(i32, u32)> {
    let mut parts = rest.split('_');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !YEAR_RANGE.contains(&year) || !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

fn parse_ymd(rest: &str) -> Option<(i32, u32, u32)> {
    let mut parts = rest.split('_');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some()
        || !YEAR_RANGE.contains(&year)
        || !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
    {
        return None;
    }
    Some((year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_parse_round_trip() {
        let actions = [
            Action::Ignore,
            Action::PickDay { year: 2024, month: 5, day: 3 },
            Action::AddShift { kind: ShiftKind::Day, year: 2024, month: 5, day: 3 },
            Action::AddShift { kind: ShiftKind::Night, year: 2024, month: 12, day: 31 },
            Action::DeleteShift { year: 2023, month: 2, day: 28 },
            Action::ClearMonth { year: 2024, month: 1 },
            Action::FillMonth { year: 2024, month: 7 },
            Action::Navigate { dir: NavDir::Prev, year: 2024, month: 1 },
            Action::Navigate { dir: NavDir::Next, year: 2024, month: 12 },
            Action::Cancel { year: 2024, month: 6 },
        ];
        for action in actions {
            assert_eq!(Action::parse(&action.encode()), Some(action));
        }
    }

    #[test]
    fn test_parse_rejects_malformed_payloads() {
        assert_eq!(Action::parse(""), None);
        assert_eq!(Action::parse("unknown_2024_5"), None);
        assert_eq!(Action::parse("day_2024_5"), None); // 日が欠けている
        assert_eq!(Action::parse("day_2024_5_3_9"), None); // 余計なフィールド
        assert_eq!(Action::parse("day_2024_abc_3"), None);
        assert_eq!(Action::parse("prev_2024_13"), None); // 月の範囲外
        assert_eq!(Action::parse("day_2024_5_32"), None);
    }

    #[test]
    fn test_parse_rejects_out_of_range_year() {
        assert_eq!(Action::parse("next_262143_12"), None);
        assert_eq!(Action::parse("prev_10000_1"), None);
        assert_eq!(Action::parse("cancel_0_5"), None);
        assert_eq!(Action::parse("day_-1_5_3"), None);
        assert_eq!(Action::parse("fill_month_99999_6"), None);
        // 境界ぎりぎりは通す
        assert_eq!(Action::parse("next_9999_12"), Some(Action::Navigate {
            dir: NavDir::Next,
            year: 9999,
            month: 12,
        }));
    }

    #[test]
    fn test_add_day_is_not_mistaken_for_pick() {
        // "add_day_..." は "day_..." の接頭辞判定に吸われてはならない
        assert_eq!(
            Action::parse("add_day_2024_5_3"),
            Some(Action::AddShift { kind: ShiftKind::Day, year: 2024, month: 5, day: 3 })
        );
    }
}
