// =====================
// ドメインモデル定義
// =====================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// チャット側のユーザー識別子（中身は不透明なID）
pub type UserId = i64;

/// シフト種別。「予定なし」は第三の値ではなく、台帳に行が無いこと
/// （`Option<ShiftKind>` の `None`）で表現する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftKind {
    Day,
    Night,
}

impl ShiftKind {
    // DBカラム is_day (BOOLEAN) との相互変換
    pub fn is_day(self) -> bool {
        matches!(self, ShiftKind::Day)
    }

    pub fn from_is_day(is_day: bool) -> Self {
        if is_day {
            ShiftKind::Day
        } else {
            ShiftKind::Night
        }
    }
}

/// 台帳の1行分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftEntry {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub kind: ShiftKind,
}

/// 日付をタップしてからシフト種別を選ぶまでの間だけ存在する一時状態。
/// 永続化はしない。種別選択・削除・キャンセル・月移動のいずれかで破棄される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSelection {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl PendingSelection {
    /// カレンダー上あり得ない日付（2月30日など）は None
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}
