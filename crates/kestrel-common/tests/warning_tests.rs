//! Tests for the per-render warning log.

use kestrel_common::warning::Warnings;

#[test]
fn test_new_log_is_empty() {
    let warnings = Warnings::new("gemtext");
    assert!(warnings.is_empty());
    assert_eq!(warnings.len(), 0);
}

#[test]
fn test_repeated_message_is_recorded_once() {
    let mut warnings = Warnings::new("render");
    for _ in 0..3 {
        warnings.warn("skipping raw HTML block");
    }
    warnings.warn("skipping thematic break");
    assert_eq!(warnings.len(), 2);
    assert!(warnings.contains("skipping raw HTML block"));
    assert!(!warnings.contains("skipping inline HTML"));
}

#[test]
fn test_details_do_not_grow_the_log() {
    let mut warnings = Warnings::new("gemtext");
    for n in 0..10_000 {
        warnings.warn_about("unresolvable link target", &format!("::bad-{n}"));
    }
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_logs_are_independent() {
    let mut first = Warnings::new("gophermap");
    first.warn_about("unknown item type", "x");
    let second = Warnings::new("gophermap");
    assert!(second.is_empty());
    assert!(first.contains("unknown item type"));
}
