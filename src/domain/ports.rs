use crate::domain::model::{ContactSubmission, CreateOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

/// CRM 聯絡人 API（proxy 端使用）
#[async_trait]
pub trait CrmContacts: Send + Sync {
    /// 建立聯絡人；409 以 `CreateOutcome::Conflict` 回傳，網路失敗才是 Err
    async fn create_contact(&self, token: &str, contact: &ContactSubmission)
        -> Result<CreateOutcome>;

    /// 只更新名字欄位
    async fn update_contact_name(
        &self,
        token: &str,
        contact_id: &str,
        contact: &ContactSubmission,
    ) -> Result<()>;
}

/// Modal 送出表單時的唯一一次網路呼叫，成功時回傳排程連結
#[async_trait]
pub trait ContactSubmitter: Send + Sync {
    async fn submit(&self, contact: &ContactSubmission) -> Result<String>;
}

/// 畫面端的副作用：dialog 顯示、捲動鎖定、焦點
pub trait ModalHost: Send {
    fn show_dialog(&mut self);
    fn hide_dialog(&mut self);
    fn set_scroll_lock(&mut self, locked: bool);
    fn focus_first_field(&mut self);
}
