// =====================
// チャットトランスポート境界
// =====================
//
// 配送・リトライ・レート制限はトランスポート実装側の責務。
// コアはこのトレイト越しに「送る・表示を差し替える・ACKする」だけを行う。

use std::future::Future;

use crate::application::view::Keyboard;
use crate::domain::models::UserId;
use crate::error::DispatchError;

pub trait ChatPort: Send + Sync {
    /// 新規メッセージの送信。通知サマリは本文のみ、
    /// 初回のカレンダー表示はキーボード付きで送る
    fn send_message(
        &self,
        user_id: UserId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;

    /// 表示中メッセージの本文とキーボードを差し替える
    fn edit_view(
        &self,
        user_id: UserId,
        text: &str,
        keyboard: Keyboard,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;

    /// 操作のACK。`toast` があれば短い通知として見せる
    fn answer(
        &self,
        user_id: UserId,
        toast: Option<&str>,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}
