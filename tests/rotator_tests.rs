// tests for api key rotation

use promptgate::{Error, KeyRotator};

#[test]
fn test_round_robin_order() {
    let rotator = KeyRotator::parse("a,b,c").unwrap();

    assert_eq!(rotator.next_key(), "a");
    assert_eq!(rotator.next_key(), "b");
    assert_eq!(rotator.next_key(), "c");
    // wraps back around
    assert_eq!(rotator.next_key(), "a");
}

#[test]
fn test_parse_trims_and_drops_empties() {
    let rotator = KeyRotator::parse(" a , , b ,").unwrap();
    assert_eq!(rotator.key_count(), 2);
    assert_eq!(rotator.next_key(), "a");
    assert_eq!(rotator.next_key(), "b");
}

#[test]
fn test_empty_string_is_config_error() {
    assert!(matches!(KeyRotator::parse(""), Err(Error::Config(_))));
    assert!(matches!(KeyRotator::parse(" , ,"), Err(Error::Config(_))));
}

#[test]
fn test_single_key_rotation() {
    let rotator = KeyRotator::parse("only").unwrap();
    assert!(!rotator.has_multiple());
    assert_eq!(rotator.next_key(), "only");
    assert_eq!(rotator.next_key(), "only");
}

#[test]
fn test_has_multiple() {
    assert!(KeyRotator::parse("a,b").unwrap().has_multiple());
    assert!(!KeyRotator::parse("a").unwrap().has_multiple());
}
