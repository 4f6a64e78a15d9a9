//! Output paging.

use std::collections::VecDeque;

/// Vendor flavor of the more-prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoreStyle {
    /// Cisco-family ` --More-- `.
    #[default]
    Cisco,
    /// Dell `--More-- or (q)uit`.
    Dell,
}

impl MoreStyle {
    /// The prompt text shown at a page boundary.
    pub fn prompt(self) -> &'static str {
        match self {
            MoreStyle::Cisco => " --More-- ",
            MoreStyle::Dell => "--More-- or (q)uit",
        }
    }
}

/// Holds the undelivered remainder of a long command output. A printable
/// key delivers the next page; `q` aborts.
#[derive(Debug)]
pub struct Pager {
    remaining: VecDeque<String>,
    page_len: usize,
    style: MoreStyle,
}

impl Pager {
    /// Start paging `lines` at `page_len` lines per page. The first page
    /// is returned immediately; the rest waits for keys.
    pub fn start(lines: Vec<String>, page_len: usize, style: MoreStyle) -> (Vec<String>, Self) {
        let mut remaining: VecDeque<String> = lines.into();
        let first: Vec<String> = drain_page(&mut remaining, page_len);
        (
            first,
            Self {
                remaining,
                page_len,
                style,
            },
        )
    }

    /// Deliver the next page.
    pub fn next_page(&mut self) -> Vec<String> {
        drain_page(&mut self.remaining, self.page_len)
    }

    /// Drop everything still pending.
    pub fn abort(&mut self) {
        self.remaining.clear();
    }

    /// Whether all output has been delivered.
    pub fn is_done(&self) -> bool {
        self.remaining.is_empty()
    }

    /// The vendor more-prompt.
    pub fn more_prompt(&self) -> &'static str {
        self.style.prompt()
    }
}

fn drain_page(remaining: &mut VecDeque<String>, page_len: usize) -> Vec<String> {
    let count = page_len.min(remaining.len());
    remaining.drain(..count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn test_page_boundaries() {
        let (first, mut pager) = Pager::start(numbered(5), 2, MoreStyle::Cisco);
        assert_eq!(first, vec!["line 0", "line 1"]);
        assert!(!pager.is_done());

        assert_eq!(pager.next_page(), vec!["line 2", "line 3"]);
        assert_eq!(pager.next_page(), vec!["line 4"]);
        assert!(pager.is_done());
    }

    #[test]
    fn test_abort() {
        let (_, mut pager) = Pager::start(numbered(10), 3, MoreStyle::Dell);
        assert_eq!(pager.more_prompt(), "--More-- or (q)uit");
        pager.abort();
        assert!(pager.is_done());
    }
}
