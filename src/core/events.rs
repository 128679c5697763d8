use tokio::sync::broadcast;

/// 「開啟預約 demo」的訊號，沒有 payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenDemoModal;

/// 單一事件型別的 pub/sub，取代頁面層級的全域自訂事件
#[derive(Debug, Clone)]
pub struct DemoModalEvents {
    sender: broadcast::Sender<OpenDemoModal>,
}

impl DemoModalEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(8);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OpenDemoModal> {
        self.sender.subscribe()
    }

    /// 發送開啟訊號，回傳收到訊號的訂閱者數量
    pub fn open_demo_modal(&self) -> usize {
        match self.sender.send(OpenDemoModal) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!("open-demo-modal dispatched with no listeners");
                0
            }
        }
    }
}

impl Default for DemoModalEvents {
    fn default() -> Self {
        Self::new()
    }
}
