//! Modal dialog lifecycle with close hooks.

type CloseHook = Box<dyn FnOnce() + Send>;

/// A dialog that runs registered hooks exactly once when it closes.
///
/// Dropping an open dialog closes it.
pub struct Dialog {
    title: String,
    open: bool,
    on_close: Vec<CloseHook>,
}

impl Dialog {
    pub fn open(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            open: true,
            on_close: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Registers a hook for the next close. Hooks run in registration order.
    pub fn on_close<F>(&mut self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_close.push(Box::new(hook));
    }

    /// Closes the dialog. A second call does nothing.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        tracing::debug!("[Dialog] Closing '{}'", self.title);
        for hook in self.on_close.drain(..) {
            hook();
        }
    }
}

impl Drop for Dialog {
    fn drop(&mut self) {
        self.close();
    }
}
