// テスト用のチャットトランスポート。
// 呼び出しを記録するだけで、指定したユーザーには配送失敗を返す

use std::collections::HashSet;
use std::sync::Mutex;

use shift_calendar_bot::{ChatPort, DispatchError, Keyboard, UserId};

#[derive(Debug, Clone, PartialEq)]
pub enum PortEvent {
    Sent { user_id: UserId, text: String, keyboard: Option<Keyboard> },
    Edited { user_id: UserId, text: String, keyboard: Keyboard },
    Answered { user_id: UserId, toast: Option<String> },
}

#[derive(Default)]
pub struct MockPort {
    events: Mutex<Vec<PortEvent>>,
    unreachable: Mutex<HashSet<UserId>>,
}

impl MockPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_unreachable(&self, user_id: UserId) {
        self.unreachable.lock().unwrap().insert(user_id);
    }

    pub fn events(&self) -> Vec<PortEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn take_events(&self) -> Vec<PortEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// 記録済みイベントから最後の Edited を取り出す
    pub fn last_edited(&self) -> Option<(String, Keyboard)> {
        self.events().into_iter().rev().find_map(|event| match event {
            PortEvent::Edited { text, keyboard, .. } => Some((text, keyboard)),
            _ => None,
        })
    }

    fn deliver(&self, user_id: UserId, event: PortEvent) -> Result<(), DispatchError> {
        if self.unreachable.lock().unwrap().contains(&user_id) {
            return Err(DispatchError { user_id, message: "user unreachable".to_string() });
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

impl ChatPort for MockPort {
    async fn send_message(
        &self,
        user_id: UserId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), DispatchError> {
        self.deliver(user_id, PortEvent::Sent { user_id, text: text.to_string(), keyboard })
    }

    async fn edit_view(
        &self,
        user_id: UserId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), DispatchError> {
        self.deliver(user_id, PortEvent::Edited { user_id, text: text.to_string(), keyboard })
    }

    async fn answer(&self, user_id: UserId, toast: Option<&str>) -> Result<(), DispatchError> {
        self.deliver(
            user_id,
            PortEvent::Answered { user_id, toast: toast.map(|t| t.to_string()) },
        )
    }
}
