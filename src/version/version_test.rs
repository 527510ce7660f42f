use super::*;

fn parse(input: &str) -> NodeVersion {
    NodeVersion::parse(input, false).expect("Should parse valid version")
}

#[test]
fn parse_should_accept_dotted_version_without_build() {
    let version = parse("5.1.0");

    assert_eq!(version.major, 5);
    assert_eq!(version.minor, 1);
    assert_eq!(version.patch, 0);
    assert_eq!(version.build, 0);
    assert!(!version.is_simulated());
}

#[test]
fn parse_should_accept_build_suffix() {
    let version = parse("6.5.1-4960");

    assert_eq!(version.major, 6);
    assert_eq!(version.minor, 5);
    assert_eq!(version.patch, 1);
    assert_eq!(version.build, 4960);
}

#[test]
fn parse_should_preserve_simulated_flag() {
    let version = NodeVersion::parse("1.5.25", true).unwrap();
    assert!(version.is_simulated());
}

#[test]
fn parse_then_format_should_round_trip_all_four_components() {
    for input in ["5.1.0-0", "6.5.1-4960", "0.0.0-0", "10.20.30-40"] {
        let version = parse(input);
        assert_eq!(version.to_string(), input);
    }

    // Missing build formats as an explicit zero
    assert_eq!(parse("5.1.0").to_string(), "5.1.0-0");
}

#[test]
fn parse_should_reject_malformed_input() {
    for input in [
        "",
        "5",
        "5.1",
        "5.1.0.2",
        "5.x.0",
        "5.1.0-abc",
        "5.1.0-",
        "5..0",
        "-1.0.0",
        "5.1.0-1-2",
        "+5.1.0",
    ] {
        let result = NodeVersion::parse(input, false);
        assert!(result.is_err(), "input {input:?} should be rejected");
    }
}

#[test]
fn versions_should_order_lexicographically() {
    let mid = parse("5.1.0");

    assert!(mid > parse("5.0.9"));
    assert!(mid < parse("5.1.1"));
    assert!(mid < parse("6.0.0"));
    assert!(parse("5.1.0-100") > parse("5.1.0-99"));
    assert_eq!(mid, parse("5.1.0-0"));
}

#[test]
fn ordering_should_ignore_simulated_flag() {
    let real = NodeVersion::parse("5.1.0", false).unwrap();
    let simulated = NodeVersion::parse("5.1.0", true).unwrap();

    assert_eq!(real, simulated);
    assert!(NodeVersion::parse("5.1.1", true).unwrap() > real);
}
