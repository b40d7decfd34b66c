use super::*;

#[test]
fn invalid_helper_builds_config_invalid_variant() {
    let err = Error::invalid("acme", "team", "missing maintainer");
    match err {
        Error::ConfigInvalid { org, kind, message } => {
            assert_eq!(org, "acme");
            assert_eq!(kind, "team");
            assert_eq!(message, "missing maintainer");
        }
        other => panic!("expected ConfigInvalid, got {other:?}"),
    }
}
