use std::error::Error;

use crate::config::{parse_hex, LoadError, Session, Step};

const SESSION: &str = r#"
version: 1
kind: ReplaySession
name: Reporting mode
description: Enable accelerometer reports and stream three frames
interrupt_channel: 65
control_channel: 64
steps:
  - control: "52 12 00 31"
  - interrupt: "a2 16 00 00 16 d0 01 55"
  - tick: 3
  - initialize
"#;

#[test]
fn test_load_session() -> Result<(), Box<dyn Error>> {
    let session = Session::from_yaml(SESSION.to_string())?;
    assert_eq!(session.name, "Reporting mode");
    assert_eq!(session.kind, "ReplaySession");
    assert_eq!(session.interrupt_channel, 65);
    assert_eq!(session.control_channel, 64);
    assert_eq!(
        session.steps,
        vec![
            Step::Control("52 12 00 31".to_string()),
            Step::Interrupt("a2 16 00 00 16 d0 01 55".to_string()),
            Step::Tick(3),
            Step::Initialize,
        ]
    );
    assert_eq!(session.steps[0].packet()?, Some(vec![0x52, 0x12, 0x00, 0x31]));
    assert_eq!(session.steps[2].packet()?, None);
    Ok(())
}

#[test]
fn test_load_session_with_invalid_hex() {
    let content = SESSION.replace("52 12 00 31", "52 1g");
    let result = Session::from_yaml(content);
    assert!(matches!(result, Err(LoadError::InvalidHex(_))));
}

#[test]
fn test_load_session_with_missing_fields() {
    let result = Session::from_yaml("version: 1\nkind: ReplaySession\n".to_string());
    assert!(matches!(result, Err(LoadError::DeserializeError(_))));
}

#[test]
fn test_load_missing_file() {
    let result = Session::from_yaml_file("does/not/exist.yaml".to_string());
    assert!(matches!(result, Err(LoadError::IoError(_))));
}

#[test]
fn test_parse_hex() -> Result<(), Box<dyn Error>> {
    assert_eq!(parse_hex("a2 16 00")?, vec![0xa2, 0x16, 0x00]);
    assert_eq!(parse_hex("A21600")?, vec![0xa2, 0x16, 0x00]);
    assert_eq!(parse_hex("")?, Vec::<u8>::new());
    assert!(parse_hex("a2 1").is_err());
    assert!(parse_hex("zz").is_err());
    assert!(parse_hex("+1").is_err());
    assert_eq!(parse_hex("a2\n16  00\t")?, vec![0xa2, 0x16, 0x00]);
    Ok(())
}
