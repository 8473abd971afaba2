use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        OnairError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        OnairError::resource("x")
            .to_string()
            .contains("resource error:")
    );
    assert!(OnairError::decode("x").to_string().contains("decode error:"));
    assert!(
        OnairError::unsupported("x")
            .to_string()
            .contains("unsupported operation:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OnairError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
