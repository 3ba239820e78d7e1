/// Kind of toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A single toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

/// Dismissible notifications, oldest first.
#[derive(Debug, Default)]
pub struct Toasts {
    next_id: u64,
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) -> u64 {
        self.next_id += 1;
        let toast = Toast {
            id: self.next_id,
            message: message.into(),
            kind,
        };
        match kind {
            ToastKind::Error => tracing::warn!(message = %toast.message, "error toast"),
            _ => tracing::debug!(message = %toast.message, "toast"),
        }
        self.items.push(toast);
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    /// Remove and return every toast.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.items)
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn last(&self) -> Option<&Toast> {
        self.items.last()
    }
}
