//! Window matching strategies
//!
//! Resolves a [`WindowSelector`] against a snapshot of [`WindowRecord`]s.
//! Matching is pure: it never queries the host, so the same snapshot always
//! resolves the same way.
//!
//! # Matching Strategies
//!
//! For title selectors, the matcher tries in order:
//! 1. **Exact match** - case-sensitive, ordinal comparison
//! 2. **Elevated match** - the title with an `Administrator:` prefix, first
//!    with two spaces after the colon, then with one
//!
//! Process id and handle selectors compare the parsed value for equality.
//!
//! # Tie-breaking
//!
//! Within a strategy, the first record in snapshot order wins. Several
//! windows can share a title or a process id; which one is captured then
//! depends on the host's enumeration order.

use crate::{
    capture::constants::ELEVATED_TITLE_PREFIXES,
    error::{CaptureError, CaptureResult},
    model::{MatchTarget, WindowHandle, WindowRecord, WindowSelector},
};

/// Stateless resolver from selectors to window records
///
/// # Examples
///
/// ```
/// use window_shot_core::{
///     capture::matching::WindowMatcher,
///     model::{WindowHandle, WindowRecord, WindowSelector},
/// };
///
/// let windows = vec![
///     WindowRecord::new(WindowHandle::new(0x10), 100, "Administrator:  Command Prompt").unwrap(),
/// ];
///
/// let record = WindowMatcher::new()
///     .resolve(&WindowSelector::by_title("Command Prompt"), &windows)
///     .unwrap();
/// assert_eq!(record.pid, 100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowMatcher;

impl WindowMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Resolves the selector to exactly one record
    ///
    /// # Errors
    ///
    /// - [`CaptureError::InvalidSelector`] if a process id or handle does not
    ///   parse
    /// - [`CaptureError::WindowNotFound`] if nothing in the snapshot matches
    pub fn resolve(
        &self,
        selector: &WindowSelector,
        windows: &[WindowRecord],
    ) -> CaptureResult<WindowRecord> {
        let target = selector.target()?;

        match self.find_match(target, windows) {
            Some(record) => {
                tracing::debug!(
                    "WindowMatcher: {} resolved to {} (pid: {}, title: '{}')",
                    selector,
                    record.handle,
                    record.pid,
                    record.title
                );
                Ok(record.clone())
            }
            None => {
                tracing::debug!(
                    "WindowMatcher: {} matched none of {} windows",
                    selector,
                    windows.len()
                );
                Err(CaptureError::WindowNotFound {
                    selector: selector.clone(),
                })
            }
        }
    }

    /// Finds the first record matching an already-parsed target
    pub fn find_match<'w>(
        &self,
        target: MatchTarget<'_>,
        windows: &'w [WindowRecord],
    ) -> Option<&'w WindowRecord> {
        match target {
            MatchTarget::Title(title) => try_exact_title_match(title, windows)
                .or_else(|| try_elevated_title_match(title, windows)),
            MatchTarget::ProcessId(pid) => try_pid_match(pid, windows),
            MatchTarget::Handle(handle) => try_handle_match(handle, windows),
        }
    }
}

/// Returns the first window whose title equals `title` exactly
pub fn try_exact_title_match<'w>(title: &str, windows: &'w [WindowRecord]) -> Option<&'w WindowRecord> {
    windows.iter().find(|w| w.title == title)
}

/// Returns the first window whose title is `title` behind an elevation prefix
///
/// Each prefix is tried across the whole snapshot before the next one, so a
/// double-space match anywhere beats a single-space match earlier on.
pub fn try_elevated_title_match<'w>(
    title: &str,
    windows: &'w [WindowRecord],
) -> Option<&'w WindowRecord> {
    ELEVATED_TITLE_PREFIXES.iter().find_map(|prefix| {
        windows.iter().find(|w| {
            w.title
                .strip_prefix(prefix)
                .is_some_and(|rest| rest == title)
        })
    })
}

/// Returns the first window owned by `pid`
pub fn try_pid_match(pid: u32, windows: &[WindowRecord]) -> Option<&WindowRecord> {
    windows.iter().find(|w| w.pid == pid)
}

/// Returns the window with the given handle
pub fn try_handle_match(handle: WindowHandle, windows: &[WindowRecord]) -> Option<&WindowRecord> {
    windows.iter().find(|w| w.handle == handle)
}
