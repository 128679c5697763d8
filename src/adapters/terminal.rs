use crate::domain::ports::ModalHost;

/// 終端機版的 modal 宿主：沒有真正的 dialog，只記錄狀態
#[derive(Debug, Default)]
pub struct TerminalHost {
    visible: bool,
    scroll_locked: bool,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }
}

impl ModalHost for TerminalHost {
    fn show_dialog(&mut self) {
        self.visible = true;
        tracing::debug!("📋 Book a demo dialog opened");
    }

    fn hide_dialog(&mut self) {
        self.visible = false;
        tracing::debug!("Book a demo dialog closed");
    }

    fn set_scroll_lock(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn focus_first_field(&mut self) {
        tracing::debug!("Focus moved to first name field");
    }
}
