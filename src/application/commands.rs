// =====================
// 対話ハンドラ（状態機械）
// =====================
//
// 1ユーザーの操作列を台帳の更新と再描画に変換する。
// 「日付タップ → 種別選択」の間だけ PendingSelection を保持し、
// それ以外のどの操作でも破棄する（途中状態で詰まらないように）。

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Utc};
use chrono_tz::Tz;

use crate::application::time::{days_in_month, next_month_of, prev_month_of};
use crate::application::transport::ChatPort;
use crate::application::view::{build_month_view, build_shift_chooser, Keyboard, MonthContext};
use crate::domain::action::{Action, NavDir};
use crate::domain::models::{PendingSelection, ShiftKind, UserId};
use crate::domain::pattern::{fill_offer, fill_plan};
use crate::error::DispatchError;
use crate::infrastructure::shift_repo::ShiftRepository;

const PROMPT: &str = "Pick a date:";
const GENERIC_FAILURE: &str = "Something went wrong, please try again.";

pub struct CalendarHandler<P: ChatPort> {
    repo: ShiftRepository,
    port: Arc<P>,
    /// 「今日」マーカー判定に使う基準タイムゾーン
    tz: Tz,
    pending: Mutex<HashMap<UserId, PendingSelection>>,
}

impl<P: ChatPort> CalendarHandler<P> {
    pub fn new(repo: ShiftRepository, port: Arc<P>, tz: Tz) -> Self {
        Self { repo, port, tz, pending: Mutex::new(HashMap::new()) }
    }

    /// 初回コンタクト。今月のカレンダーを新規メッセージとして送る
    pub async fn handle_start(&self, user_id: UserId) -> Result<(), DispatchError> {
        let now = Utc::now().with_timezone(&self.tz);
        let keyboard = self.month_keyboard(user_id, now.year(), now.month()).await;
        self.port.send_message(user_id, PROMPT, Some(keyboard)).await
    }

    /// ボタン操作1件の処理。解読できないペイロードは無言でACKする
    pub async fn handle_action(&self, user_id: UserId, payload: &str) -> Result<(), DispatchError> {
        let action = match Action::parse(payload) {
            Some(action) => action,
            None => {
                self.take_pending(user_id);
                return self.port.answer(user_id, None).await;
            }
        };

        match action {
            // 装飾セル。状態は変えない
            Action::Ignore => {
                self.take_pending(user_id);
                self.port.answer(user_id, None).await
            }

            Action::PickDay { year, month, day } => {
                let selection = PendingSelection { year, month, day };
                let date = match selection.to_date() {
                    Some(date) => date,
                    // カレンダー上あり得ない日付は不正ペイロード扱い
                    None => return self.port.answer(user_id, None).await,
                };
                self.set_pending(user_id, selection);

                // 削除ボタンの有無だけの問題なので、読めなければ「無し」に縮退
                let existing = self.repo.get(user_id, date).await.unwrap_or_else(|e| {
                    tracing::error!(user_id, error = %e, "failed to read entry for chooser");
                    None
                });

                let text = format!("Shift on {day}.{month}.{year}:");
                let keyboard = build_shift_chooser(year, month, day, existing.is_some());
                self.port.edit_view(user_id, &text, keyboard).await
            }

            Action::AddShift { kind, year, month, day } => {
                self.take_pending(user_id);
                let selection = PendingSelection { year, month, day };
                let date = match selection.to_date() {
                    Some(date) => date,
                    None => return self.port.answer(user_id, None).await,
                };

                if let Err(e) = self.repo.upsert(user_id, date, kind).await {
                    tracing::error!(user_id, error = %e, "failed to save shift");
                    return self.port.answer(user_id, Some(GENERIC_FAILURE)).await;
                }

                let label = match kind {
                    ShiftKind::Day => "Day",
                    ShiftKind::Night => "Night",
                };
                let toast = format!("{label} shift saved for {day}.{month}.{year}");
                self.port.answer(user_id, Some(toast.as_str())).await?;
                self.render_month(user_id, year, month).await
            }

            Action::DeleteShift { year, month, day } => {
                self.take_pending(user_id);
                let selection = PendingSelection { year, month, day };
                let date = match selection.to_date() {
                    Some(date) => date,
                    None => return self.port.answer(user_id, None).await,
                };

                // 「消した」と「元々無かった」は別の結果として伝える
                match self.repo.delete(user_id, date).await {
                    Ok(true) => {
                        let toast = format!("Shift on {day}.{month}.{year} removed.");
                        self.port.answer(user_id, Some(toast.as_str())).await?;
                    }
                    Ok(false) => {
                        let toast = format!("No shift found on {day}.{month}.{year}.");
                        self.port.answer(user_id, Some(toast.as_str())).await?;
                    }
                    Err(e) => {
                        tracing::error!(user_id, error = %e, "failed to delete shift");
                        return self.port.answer(user_id, Some(GENERIC_FAILURE)).await;
                    }
                }
                self.render_month(user_id, year, month).await
            }

            Action::Cancel { year, month } => {
                self.take_pending(user_id);
                self.render_month(user_id, year, month).await
            }

            Action::Navigate { dir, year, month } => {
                self.take_pending(user_id);
                let (year, month) = match dir {
                    NavDir::Prev => prev_month_of(year, month),
                    NavDir::Next => next_month_of(year, month),
                };
                self.render_month(user_id, year, month).await
            }

            Action::FillMonth { year, month } => {
                self.take_pending(user_id);
                self.fill_month(user_id, year, month).await?;
                self.render_month(user_id, year, month).await
            }

            Action::ClearMonth { year, month } => {
                self.take_pending(user_id);
                match self.repo.delete_month(user_id, year, month).await {
                    Ok(_) => self.port.answer(user_id, Some("Cleared.")).await?,
                    Err(e) => {
                        tracing::error!(user_id, error = %e, "failed to clear month");
                        return self.port.answer(user_id, Some(GENERIC_FAILURE)).await;
                    }
                }
                self.render_month(user_id, year, month).await
            }
        }
    }

    /// ローテーションの月末までの自動入力。
    /// 提案条件を再確認してから書き込む（古いボタンが押された場合は何もしない）
    async fn fill_month(&self, user_id: UserId, year: i32, month: u32) -> Result<(), DispatchError> {
        let days = days_in_month(year, month);
        let recent = match self.repo.recent_in_month(user_id, year, month, 4).await {
            Ok(recent) => recent,
            Err(e) => {
                tracing::error!(user_id, error = %e, "failed to read recent entries for fill");
                return self.port.answer(user_id, Some(GENERIC_FAILURE)).await;
            }
        };

        let last_day = match fill_offer(&recent, days) {
            Some(last_day) => last_day,
            None => return self.port.answer(user_id, None).await,
        };

        for (day, kind) in fill_plan(last_day, days) {
            let date = match chrono::NaiveDate::from_ymd_opt(year, month, day) {
                Some(date) => date,
                None => continue,
            };
            if let Err(e) = self.repo.upsert(user_id, date, kind).await {
                tracing::error!(user_id, error = %e, "failed to save shift during fill");
                return self.port.answer(user_id, Some(GENERIC_FAILURE)).await;
            }
        }

        self.port.answer(user_id, Some("Filled to the end of the month.")).await
    }

    /// 月ビューの再描画。読み取りに失敗した場合は空のグリッドに縮退する
    async fn render_month(&self, user_id: UserId, year: i32, month: u32) -> Result<(), DispatchError> {
        let keyboard = self.month_keyboard(user_id, year, month).await;
        self.port.edit_view(user_id, PROMPT, keyboard).await
    }

    async fn month_keyboard(&self, user_id: UserId, year: i32, month: u32) -> Keyboard {
        let entries = self.repo.list_month(user_id, year, month).await.unwrap_or_else(|e| {
            tracing::error!(user_id, error = %e, "failed to list month, rendering empty grid");
            Vec::new()
        });
        let recent = self.repo.recent_in_month(user_id, year, month, 4).await.unwrap_or_else(|e| {
            tracing::error!(user_id, error = %e, "failed to read recent entries");
            Vec::new()
        });

        let entry_map: BTreeMap<u32, ShiftKind> =
            entries.into_iter().map(|entry| (entry.date.day(), entry.kind)).collect();
        let offer_fill = fill_offer(&recent, days_in_month(year, month)).is_some();

        let now = Utc::now().with_timezone(&self.tz);
        let today = (now.year() == year && now.month() == month).then(|| now.day());

        build_month_view(&MonthContext { year, month, entries: entry_map, today, offer_fill })
    }

    fn set_pending(&self, user_id: UserId, selection: PendingSelection) {
        self.pending
            .lock()
            .expect("pending selection lock poisoned")
            .insert(user_id, selection);
    }

    fn take_pending(&self, user_id: UserId) -> Option<PendingSelection> {
        self.pending
            .lock()
            .expect("pending selection lock poisoned")
            .remove(&user_id)
    }

    /// テスト用: 現在保留中の選択を覗く
    pub fn pending_for(&self, user_id: UserId) -> Option<PendingSelection> {
        self.pending
            .lock()
            .expect("pending selection lock poisoned")
            .get(&user_id)
            .copied()
    }
}
