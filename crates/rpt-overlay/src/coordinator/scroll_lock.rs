//! Background scroll lock
//!
//! The page's overflow is captured once when the first modal opens and put
//! back when the last one closes. Writes made by the page in between are
//! overwritten on restore.

use rpt_view::ViewHost;

/// Overflow applied to the page while locked
pub const LOCKED_OVERFLOW: &str = "hidden";

#[derive(Debug, Default)]
pub struct ScrollLock {
    count: usize,
    saved: Option<String>,
}

impl ScrollLock {
    /// Number of open modal overlays holding the lock
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_engaged(&self) -> bool {
        self.count > 0
    }

    /// Overflow value to restore on release
    pub fn saved(&self) -> Option<&str> {
        self.saved.as_deref()
    }

    /// Set the holder count; returns whether the lock engaged or released
    pub(crate) fn update<H: ViewHost>(&mut self, host: &mut H, count: usize) -> bool {
        let was_engaged = self.is_engaged();
        self.count = count;

        match (was_engaged, self.is_engaged()) {
            (false, true) => {
                let current = host.background_overflow();
                tracing::debug!(saved = %current, "scroll lock engaged");
                self.saved = Some(current);
                host.set_background_overflow(LOCKED_OVERFLOW);
                true
            }
            (true, false) => {
                let restored = self.saved.take().unwrap_or_default();
                tracing::debug!(restored = %restored, "scroll lock released");
                host.set_background_overflow(&restored);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpt_view_mock::HeadlessHost;

    #[test]
    fn test_engage_and_release_restore_original() {
        let mut host = HeadlessHost::new();
        host.write_overflow_externally("auto");
        let mut lock = ScrollLock::default();

        assert!(lock.update(&mut host, 1));
        assert_eq!(host.background_overflow(), LOCKED_OVERFLOW);
        assert_eq!(lock.saved(), Some("auto"));

        assert!(!lock.update(&mut host, 2));
        assert!(!lock.update(&mut host, 1));
        assert_eq!(host.overflow_writes(), 1);

        assert!(lock.update(&mut host, 0));
        assert_eq!(host.background_overflow(), "auto");
        assert!(!lock.is_engaged());
    }

    #[test]
    fn test_external_write_while_locked_is_overwritten() {
        let mut host = HeadlessHost::new();
        let mut lock = ScrollLock::default();

        lock.update(&mut host, 1);
        host.write_overflow_externally("scroll");
        lock.update(&mut host, 0);
        assert_eq!(host.background_overflow(), "");
    }
}
