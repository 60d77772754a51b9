use super::*;

#[test]
fn helper_constructors_produce_matching_variants() {
    assert!(matches!(
        PanreelError::invalid_region("w=0"),
        PanreelError::InvalidRegion(_)
    ));
    assert!(matches!(
        PanreelError::missing_asset("img.png"),
        PanreelError::MissingAsset(_)
    ));
    assert!(matches!(
        PanreelError::sink_failure("boom"),
        PanreelError::SinkFailure(_)
    ));
    assert!(matches!(
        PanreelError::validation("bad"),
        PanreelError::Validation(_)
    ));
}

#[test]
fn display_messages_carry_the_diagnostic() {
    assert_eq!(
        PanreelError::sink_failure("ffmpeg exited with status 1").to_string(),
        "sink failure: ffmpeg exited with status 1"
    );
    assert_eq!(
        PanreelError::EmptyTimeline.to_string(),
        "timeline is empty: at least one snippet is required"
    );
}

#[test]
fn anyhow_errors_convert_transparently() {
    let err: PanreelError = anyhow::anyhow!("decode failed").into();
    assert_eq!(err.to_string(), "decode failed");
}
