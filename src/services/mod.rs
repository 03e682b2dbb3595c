use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod delete;
pub mod dialog_form;
pub mod expiry;
pub mod list;

/// Shared busy indicator, e.g. "form is submitting" or "list is loading".
///
/// The owning state raises it while its operation is pending. Clones observe
/// the same flag, so a UI can hold one and disable its controls while the
/// owner is borrowed by the pending operation.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub(crate) fn raise(&self) -> BusyGuard {
        self.busy.store(true, Ordering::SeqCst);
        BusyGuard { flag: self.clone() }
    }
}

/// Lowers its [`BusyFlag`] on drop, on every exit path including unwinding.
pub(crate) struct BusyGuard {
    flag: BusyFlag,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_the_guard() {
        let flag = BusyFlag::new();
        let observer = flag.clone();

        let guard = flag.raise();
        assert!(observer.is_busy());

        drop(guard);
        assert!(!observer.is_busy());
    }

    #[test]
    fn flag_is_lowered_when_work_panics() {
        let flag = BusyFlag::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = flag.raise();
            panic!("request blew up");
        }));

        assert!(result.is_err());
        assert!(!flag.is_busy());
    }
}
