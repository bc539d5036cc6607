#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case("plain", "plain")]
#[test_case("", r#""""#)]
#[test_case("two words", r#""two words""#)]
#[test_case("a=b", r#""a=b""#)]
#[test_case(r#"say "hi""#, r#""say \"hi\"""#)]
#[test_case("line\nbreak", r#""line\nbreak""#)]
#[test_case(r"C:\tmp", r#""C:\\tmp""#)]
fn push_value___input___encodes(input: &str, expected: &str) {
    let mut line = String::new();

    push_value(&mut line, input);

    assert_eq!(line, expected);
}

#[test]
fn push_pair___first_pair___has_no_leading_space() {
    let mut line = String::new();

    push_pair(&mut line, "level", "info");

    assert_eq!(line, "level=info");
}

#[test]
fn push_pair___subsequent_pairs___are_space_separated() {
    let mut line = String::new();
    push_pair(&mut line, "level", "warn");

    push_pair(&mut line, "msg", "disk low");

    assert_eq!(line, r#"level=warn msg="disk low""#);
}
