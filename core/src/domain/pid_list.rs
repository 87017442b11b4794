//! Normalization of pid lists printed by external tools.

use std::collections::HashSet;

use crate::error::{Error, Result};

use super::Pid;

/// Ordered, duplicate-free collection of process ids.
///
/// Keeps first-occurrence order. Pid 0 is never a real target (signalling it
/// addresses the caller's whole process group) and is dropped on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PidSet {
    seen: HashSet<Pid>,
    order: Vec<Pid>,
}

impl PidSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pid. Returns `false` if it was already present or is 0.
    pub fn insert(&mut self, pid: Pid) -> bool {
        if pid == 0 || !self.seen.insert(pid) {
            return false;
        }
        self.order.push(pid);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[Pid] {
        &self.order
    }

    /// Convert into the pid list, or [`Error::NotFound`] when empty.
    ///
    /// An empty result and a failure are the same observable condition so the
    /// caller can move on to its next strategy either way.
    pub fn into_found(self, what: &str) -> Result<Vec<Pid>> {
        if self.is_empty() {
            return Err(Error::NotFound(what.to_string()));
        }
        Ok(self.order)
    }
}

impl Extend<Pid> for PidSet {
    fn extend<T: IntoIterator<Item = Pid>>(&mut self, iter: T) {
        for pid in iter {
            self.insert(pid);
        }
    }
}

impl FromIterator<Pid> for PidSet {
    fn from_iter<T: IntoIterator<Item = Pid>>(iter: T) -> Self {
        let mut set = PidSet::new();
        set.extend(iter);
        set
    }
}

/// Parse tool output holding one pid per line (e.g. `lsof -t`).
///
/// Lines that are not integers are skipped. Fails with [`Error::NotFound`]
/// when no pid survives.
pub fn parse_pid_list(output: &str) -> Result<Vec<Pid>> {
    output
        .trim()
        .lines()
        .filter_map(|line| line.trim().parse::<Pid>().ok())
        .collect::<PidSet>()
        .into_found("no pids in output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single() {
        assert_eq!(parse_pid_list("1234\n").unwrap(), vec![1234]);
    }

    #[test]
    fn test_parse_multiple() {
        assert_eq!(parse_pid_list("100\n200\n300\n").unwrap(), vec![100, 200, 300]);
    }

    #[test]
    fn test_parse_deduplicates_in_first_seen_order() {
        assert_eq!(parse_pid_list("100\n200\n100\n").unwrap(), vec![100, 200]);
        assert_eq!(parse_pid_list("300\n100\n300\n200\n").unwrap(), vec![300, 100, 200]);
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(parse_pid_list("  100 \n  200\n").unwrap(), vec![100, 200]);
        assert_eq!(parse_pid_list("100\n\n   \n200\n").unwrap(), vec![100, 200]);
    }

    #[test]
    fn test_parse_skips_garbage_lines() {
        assert_eq!(parse_pid_list("100\nabc\n200\n100\n").unwrap(), vec![100, 200]);
    }

    #[test]
    fn test_parse_empty_is_not_found() {
        assert!(parse_pid_list("").unwrap_err().is_not_found());
        assert!(parse_pid_list("abc\nxyz\n").unwrap_err().is_not_found());
    }

    #[test]
    fn test_pid_zero_is_dropped() {
        assert!(parse_pid_list("0\n").unwrap_err().is_not_found());

        let mut set = PidSet::new();
        assert!(!set.insert(0));
        assert!(set.insert(7));
        assert!(!set.insert(7));
        assert_eq!(set.as_slice(), &[7]);
    }
}
