//! Scoped acquisition of global input listeners.
//!
//! Every editor instance needs one keyboard and one wheel listener on the
//! surrounding surface. Those are global resources: when a host embeds
//! several diagrams, or unmounts and remounts one, leaked handlers pile up
//! and ghost-drive dead instances. The guard here ties attach/detach to
//! the engine instance's own lifetime — detach is guaranteed on drop and
//! runs at most once.

/// An RAII guard for one attached listener.
pub struct InputSubscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl InputSubscription {
    /// Run `attach` now and remember `detach` for teardown.
    pub fn attach(attach: impl FnOnce(), detach: impl FnOnce() + 'static) -> Self {
        attach();
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Detach early, consuming the guard. Dropping does the same thing.
    pub fn detach(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl std::fmt::Debug for InputSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSubscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// The listener pair an editor instance owns while mounted.
#[derive(Debug)]
pub struct EditorListeners {
    pub keyboard: InputSubscription,
    pub wheel: InputSubscription,
}

impl EditorListeners {
    pub fn new(keyboard: InputSubscription, wheel: InputSubscription) -> Self {
        Self { keyboard, wheel }
    }
}
