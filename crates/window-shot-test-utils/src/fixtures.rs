//! Window snapshot fixtures
//!
//! Snapshots mirror what the Windows backend returns: host order, no
//! sorting, and the occasional duplicate title or shared process id.

use window_shot_core::model::{WindowHandle, WindowRecord};

/// Builds a record, panicking on a blank title
pub fn record(handle: u64, pid: u32, title: &str) -> WindowRecord {
    WindowRecord::new(WindowHandle::new(handle), pid, title)
        .unwrap_or_else(|| panic!("fixture title {title:?} is blank"))
}

/// A typical desktop
///
/// | Handle  | Pid  | Title                              |
/// |---------|------|------------------------------------|
/// | `10010` | 1000 | `Untitled - Notepad`               |
/// | `20020` | 2000 | `Administrator:  Command Prompt`   |
/// | `30030` | 3000 | `Visual Studio Code`               |
/// | `40040` | 3000 | `Visual Studio Code - Settings`    |
/// | `50050` | 5000 | `Administrator: Windows PowerShell`|
pub fn sample_snapshot() -> Vec<WindowRecord> {
    vec![
        record(0x10010, 1000, "Untitled - Notepad"),
        record(0x20020, 2000, "Administrator:  Command Prompt"),
        record(0x30030, 3000, "Visual Studio Code"),
        record(0x40040, 3000, "Visual Studio Code - Settings"),
        record(0x50050, 5000, "Administrator: Windows PowerShell"),
    ]
}

/// Two windows with the same title, the earlier one first
pub fn duplicate_titles() -> Vec<WindowRecord> {
    vec![
        record(0xA1, 11, "Terminal"),
        record(0xA2, 12, "Terminal"),
    ]
}
