//! Tests for navigation history.

use kestrel_browser::{History, HistorySnapshot};
use kestrel_common::Location;
use quickcheck_macros::quickcheck;

fn loc(path: &str) -> Location {
    Location::parse(&format!("gemini://host/{path}")).unwrap()
}

fn history(paths: &[&str]) -> History {
    let mut history = History::new();
    for path in paths {
        let _ = history.push(loc(path));
    }
    history
}

// ========== push ==========

#[test]
fn test_empty() {
    let history = History::new();
    assert!(history.is_empty());
    assert_eq!(history.cursor(), None);
    assert_eq!(history.current(), None);
    assert_eq!(history.one_backward(), None);
    assert_eq!(history.one_forward(), None);
    assert_eq!(history.snapshot(), HistorySnapshot::default());
}

#[test]
fn test_push_moves_cursor() {
    let mut history = History::new();
    assert_eq!(history.push(loc("a")), 0);
    assert_eq!(history.push(loc("b")), 1);
    assert_eq!(history.current(), Some(&loc("b")));
    assert_eq!(history.len(), 2);
}

#[test]
fn test_push_after_back_drops_forward_entries() {
    let mut history = history(&["a", "b", "c"]);
    assert!(history.set_cursor(0));
    assert_eq!(history.push(loc("d")), 1);
    assert_eq!(history.entries(), [loc("a"), loc("d")]);
    assert!(!history.can_go_forward());
}

// ========== cursor ==========

#[test]
fn test_back_and_forward_indices() {
    let mut history = history(&["a", "b", "c"]);
    assert_eq!(history.one_backward(), Some(1));
    assert_eq!(history.one_forward(), None);

    assert!(history.set_cursor(1));
    assert_eq!(history.one_backward(), Some(0));
    assert_eq!(history.one_forward(), Some(2));
    assert_eq!(
        history.snapshot(),
        HistorySnapshot {
            can_go_back: true,
            can_go_forward: true,
        }
    );
}

#[test]
fn test_set_cursor_out_of_range() {
    let mut history = history(&["a"]);
    assert!(!history.set_cursor(1));
    assert_eq!(history.cursor(), Some(0));
}

// ========== properties ==========

#[quickcheck]
fn prop_cursor_stays_in_bounds(ops: Vec<(bool, u8)>) -> bool {
    let mut history = History::new();
    for (push, n) in ops {
        if push {
            let _ = history.push(loc(&n.to_string()));
        } else {
            let _ = history.set_cursor(usize::from(n % 8));
        }
        let in_bounds = history.cursor().is_none_or(|cursor| cursor < history.len());
        if !in_bounds {
            return false;
        }
    }
    true
}

#[quickcheck]
fn prop_push_leaves_cursor_at_end(paths: Vec<u8>, back: u8) -> bool {
    let mut history = History::new();
    for n in &paths {
        let _ = history.push(loc(&n.to_string()));
    }
    let _ = history.set_cursor(usize::from(back));
    let cursor = history.push(loc("last"));
    cursor + 1 == history.len() && !history.can_go_forward()
}
