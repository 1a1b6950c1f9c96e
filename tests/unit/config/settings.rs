use super::*;

#[test]
fn defaults_match_declared_property_defaults() {
    let s = Settings::default();
    assert!(!s.has_location());
    assert_eq!(s.start_frame, 1);
    assert_eq!(s.end_frame, 25);
    assert_eq!(s.prefix, "");
    assert!(s.delete);
    assert_eq!(s.frame_rate(), FrameRate { num: 1, den: 1 });
    assert_eq!(s.output_location, std::env::temp_dir());
}

#[test]
fn json_uses_property_names_and_keeps_defaults() {
    let s = Settings::from_json_str(
        r#"{ "start-frame": 3, "end-frame": 7, "prefix": "f", "framerate-num": 25 }"#,
    )
    .unwrap();
    assert_eq!(s.start_frame, 3);
    assert_eq!(s.end_frame, 7);
    assert_eq!(s.prefix, "f");
    assert_eq!(s.framerate_num, 25);
    assert_eq!(s.framerate_den, 1);
    assert!(s.delete);
}

#[test]
fn json_rejects_unknown_fields() {
    let err = Settings::from_json_str(r#"{ "frames": 3 }"#).unwrap_err();
    assert!(matches!(err, SourceError::Serde(_)));
}

#[test]
fn json_rejects_out_of_range_frames() {
    let err = Settings::from_json_str(r#"{ "start-frame": 0 }"#).unwrap_err();
    assert!(matches!(err, SourceError::InvalidValue(_)));
}

#[test]
fn properties_put_location_first_when_set() {
    let mut s = Settings::default();
    assert_eq!(s.to_properties()[0].name(), PropertyName::OutputLocation);

    s.location = PathBuf::from("scene.blend");
    let props = s.to_properties();
    assert_eq!(props[0], Property::Location(PathBuf::from("scene.blend")));
    assert_eq!(props.len(), PropertyName::ALL.len());
}

#[test]
fn get_reflects_stored_values() {
    let mut s = Settings::default();
    s.store(Property::Delete(false));
    s.store(Property::EndFrame(9));
    assert_eq!(s.get(PropertyName::Delete), PropertyValue::Bool(false));
    assert_eq!(s.get(PropertyName::EndFrame), PropertyValue::Int(9));
}
