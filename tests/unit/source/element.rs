use super::*;
use crate::foundation::core::ClockTime;
use crate::scene::renderer::Scene;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Writes `frame-<n>` to the output path, unless told to skip or fail.
#[derive(Clone, Default)]
struct MockRenderer {
    skip: BTreeSet<u64>,
    fail: BTreeSet<u64>,
    rendered: Arc<Mutex<Vec<PathBuf>>>,
}

struct MockScene {
    cfg: MockRenderer,
    frame: u64,
    out: PathBuf,
}

impl SceneRenderer for MockRenderer {
    fn open_scene(&mut self, _path: &Path) -> SourceResult<Box<dyn Scene>> {
        Ok(Box::new(MockScene {
            cfg: self.clone(),
            frame: 0,
            out: PathBuf::new(),
        }))
    }
}

impl Scene for MockScene {
    fn set_current_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    fn set_output_path(&mut self, path: &Path) {
        self.out = path.to_path_buf();
    }

    fn render_still(&mut self) -> SourceResult<()> {
        if self.cfg.fail.contains(&self.frame) {
            return Err(SourceError::render("mock failure"));
        }
        if !self.cfg.skip.contains(&self.frame) {
            std::fs::write(&self.out, format!("frame-{}", self.frame)).unwrap();
        }
        self.cfg.rendered.lock().unwrap().push(self.out.clone());
        Ok(())
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    scene: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let scene = dir.path().join("valid.scene");
        std::fs::write(&scene, b"scene").unwrap();
        Self { dir, scene }
    }

    fn source(&self, renderer: MockRenderer) -> SceneSource {
        let mut src = SceneSource::new(Box::new(renderer));
        src.set_property(Property::Location(self.scene.clone()))
            .unwrap();
        src.set_property(Property::OutputLocation(self.dir.path().to_path_buf()))
            .unwrap();
        src
    }
}

fn drain(src: &mut SceneSource) -> Vec<RenderedBuffer> {
    let mut out = Vec::new();
    loop {
        match src.create() {
            Flow::Ok(b) => out.push(b),
            Flow::Eos => return out,
            Flow::Error => panic!("unexpected error"),
        }
    }
}

#[test]
fn three_frame_scenario() {
    let fx = Fixture::new();
    let mock = MockRenderer::default();
    let mut src = fx.source(mock.clone());
    src.set_property(Property::StartFrame(1)).unwrap();
    src.set_property(Property::EndFrame(3)).unwrap();
    src.set_property(Property::Prefix("f".to_owned())).unwrap();

    let d = ClockTime::SECOND;
    let bufs = drain(&mut src);
    assert_eq!(bufs.len(), 3);
    for (i, b) in bufs.iter().enumerate() {
        let i = i as u64;
        assert_eq!(b.offset, i);
        assert_eq!(b.offset_end, i + 1);
        assert_eq!(b.pts, ClockTime(i * d.0));
        assert_eq!(b.duration, d);
        assert_eq!(b.data, format!("frame-{}", i + 1).into_bytes());
    }

    let rendered = mock.rendered.lock().unwrap().clone();
    let names: Vec<_> = rendered
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["f000000001.png", "f000000002.png", "f000000003.png"]
    );
    assert_eq!(src.create(), Flow::Eos);
    assert_eq!(src.state(), SourceState::Exhausted);
}

#[test]
fn produces_exactly_frame_count_buffers() {
    let fx = Fixture::new();
    for (s, e) in [(1u32, 1u32), (2, 6), (10, 12)] {
        let mut src = fx.source(MockRenderer::default());
        src.set_property(Property::StartFrame(s)).unwrap();
        src.set_property(Property::EndFrame(e)).unwrap();
        let bufs = drain(&mut src);
        assert_eq!(bufs.len() as u32, e - s + 1);
        let offsets: Vec<u64> = bufs.iter().map(|b| b.offset).collect();
        assert_eq!(offsets, (0..u64::from(e - s + 1)).collect::<Vec<_>>());
    }
}

#[test]
fn inverted_range_is_immediately_eos() {
    let fx = Fixture::new();
    let mock = MockRenderer::default();
    let mut src = fx.source(mock.clone());
    src.set_property(Property::StartFrame(5)).unwrap();
    src.set_property(Property::EndFrame(3)).unwrap();
    assert_eq!(src.create(), Flow::Eos);
    assert_eq!(src.create(), Flow::Eos);
    assert!(mock.rendered.lock().unwrap().is_empty());
}

#[test]
fn start_frame_resets_cursor() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    src.set_property(Property::StartFrame(3)).unwrap();
    src.set_property(Property::EndFrame(10)).unwrap();
    assert!(src.create().buffer().is_some());
    assert!(src.create().buffer().is_some());
    assert_eq!(src.cursor(), 5);

    src.set_property(Property::StartFrame(1)).unwrap();
    assert_eq!(src.cursor(), 1);
    let b = src.create().into_buffer().unwrap();
    assert_eq!(b.offset, 0);
    assert_eq!(b.data, b"frame-1");
}

#[test]
fn end_frame_does_not_move_cursor() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    src.set_property(Property::StartFrame(4)).unwrap();
    src.set_property(Property::EndFrame(2)).unwrap();
    assert_eq!(src.cursor(), 4);
}

#[test]
fn pts_spacing_follows_frame_rate() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    src.set_property(Property::EndFrame(5)).unwrap();
    src.set_property(Property::FramerateNum(25)).unwrap();
    src.set_property(Property::FramerateDen(1)).unwrap();
    let bufs = drain(&mut src);
    for pair in bufs.windows(2) {
        assert_eq!(pair[1].pts.0 - pair[0].pts.0, 40_000_000);
    }
}

#[test]
fn duration_query_after_first_buffer() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    src.set_property(Property::EndFrame(4)).unwrap();
    src.set_property(Property::FramerateNum(3)).unwrap();

    assert_eq!(src.query(&Query::Duration(Format::Time)), QueryReply::Delegated);
    assert!(!src.is_seekable());

    assert!(src.create().buffer().is_some());
    assert_eq!(
        src.query(&Query::Duration(Format::Time)),
        QueryReply::Duration(ClockTime(4 * 333_333_333))
    );
    assert_eq!(src.query(&Query::Duration(Format::Bytes)), QueryReply::Delegated);
    assert!(src.is_seekable());
    assert_eq!(
        src.query(&Query::Seeking(Format::Time)),
        QueryReply::Seeking {
            seekable: true,
            start: ClockTime::ZERO,
            end: Some(ClockTime(4 * 333_333_333)),
        }
    );
}

#[test]
fn duration_reflects_rate_at_production_time() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    src.set_property(Property::EndFrame(2)).unwrap();
    assert!(src.create().buffer().is_some());
    src.set_property(Property::FramerateNum(2)).unwrap();
    // Cached value until the next production.
    assert_eq!(
        src.query(&Query::Duration(Format::Time)),
        QueryReply::Duration(ClockTime::from_seconds(2))
    );
    assert!(src.create().buffer().is_some());
    assert_eq!(
        src.query(&Query::Duration(Format::Time)),
        QueryReply::Duration(ClockTime::from_seconds(1))
    );
}

#[test]
fn caps_are_unrestricted() {
    let src = SceneSource::new(Box::new(MockRenderer::default()));
    assert_eq!(src.query(&Query::Caps(None)), QueryReply::Caps(Caps::Any));
    let png = Caps::Media("image/png".to_owned());
    assert_eq!(
        src.query(&Query::Caps(Some(png.clone()))),
        QueryReply::Caps(png)
    );
}

#[test]
fn seek_repositions_cursor() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    src.set_property(Property::StartFrame(2)).unwrap();
    src.set_property(Property::EndFrame(100)).unwrap();
    src.set_property(Property::FramerateNum(10)).unwrap();

    let mut seg = Segment::seek_to(ClockTime(1_550_000_000), 1.0);
    assert!(src.do_seek(&mut seg));
    assert_eq!(src.cursor(), 2 + 15);
    assert_eq!(seg.time, seg.start);

    let b = src.create().into_buffer().unwrap();
    assert_eq!(b.offset, 15);
    assert_eq!(b.pts, ClockTime(1_500_000_000));
}

#[test]
fn negative_rate_seek_fails_without_moving_cursor() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    src.set_property(Property::EndFrame(10)).unwrap();
    assert!(src.create().buffer().is_some());
    let before = src.cursor();
    let mut seg = Segment::seek_to(ClockTime::ZERO, -1.0);
    assert!(!src.do_seek(&mut seg));
    assert!(matches!(
        src.seek(&mut seg),
        Err(SourceError::UnsupportedSeek(_))
    ));
    assert_eq!(src.cursor(), before);
}

#[test]
fn invalid_location_is_permanent_error() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    let err = src
        .set_property(Property::Location(fx.dir.path().join("missing.scene")))
        .unwrap_err();
    assert!(matches!(err, SourceError::InvalidLocation(_)));
    assert!(!src.is_valid());

    for _ in 0..3 {
        assert_eq!(src.create(), Flow::Error);
    }
    // Fixing the location does not restore validity.
    src.set_property(Property::Location(fx.scene.clone())).unwrap();
    src.set_property(Property::StartFrame(1)).unwrap();
    assert_eq!(src.create(), Flow::Error);
    assert_eq!(src.state(), SourceState::Invalid);
}

#[test]
fn invalid_output_location_invalidates() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    let err = src
        .set_property(Property::OutputLocation(fx.dir.path().join("nope")))
        .unwrap_err();
    assert!(matches!(err, SourceError::InvalidOutputLocation(_)));
    assert_eq!(src.create(), Flow::Error);
}

#[test]
fn output_location_unchecked_once_invalid() {
    let fx = Fixture::new();
    let mut src = SceneSource::new(Box::new(MockRenderer::default()));
    assert!(src.set_property(Property::Location(fx.dir.path().join("missing"))).is_err());
    let nowhere = fx.dir.path().join("nope");
    src.set_property(Property::OutputLocation(nowhere.clone()))
        .unwrap();
    assert_eq!(
        src.property("output-location").unwrap(),
        PropertyValue::Str(nowhere.to_string_lossy().into_owned())
    );
}

#[test]
fn missing_rendered_file_ends_stream() {
    let fx = Fixture::new();
    let mock = MockRenderer {
        skip: [2].into_iter().collect(),
        ..MockRenderer::default()
    };
    let mut src = fx.source(mock);
    src.set_property(Property::EndFrame(5)).unwrap();
    assert!(src.create().buffer().is_some());
    assert_eq!(src.create(), Flow::Eos);
    assert!(src.is_valid());
}

#[test]
fn renderer_failure_is_error_without_advancing() {
    let fx = Fixture::new();
    let mock = MockRenderer {
        fail: [1].into_iter().collect(),
        ..MockRenderer::default()
    };
    let mut src = fx.source(mock);
    assert_eq!(src.create(), Flow::Error);
    assert_eq!(src.cursor(), 1);
    assert!(src.is_valid());
}

#[test]
fn no_scene_loaded_is_error() {
    let mut src = SceneSource::new(Box::new(MockRenderer::default()));
    assert_eq!(src.state(), SourceState::Ready);
    assert_eq!(src.create(), Flow::Error);
    assert!(src.is_valid());
}

#[test]
fn delete_controls_file_persistence() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    src.set_property(Property::EndFrame(2)).unwrap();
    assert!(src.create().buffer().is_some());
    assert!(!fx.dir.path().join("000000001.png").exists());

    src.set_property(Property::Delete(false)).unwrap();
    assert!(src.create().buffer().is_some());
    assert!(fx.dir.path().join("000000002.png").exists());
}

#[test]
fn name_based_access() {
    let mut src = SceneSource::new(Box::new(MockRenderer::default()));
    src.set_property_str("end-frame=7").unwrap();
    src.set_property_value("prefix", PropertyValue::from("shot_"))
        .unwrap();
    src.set_property_value("delete", PropertyValue::Bool(false))
        .unwrap();
    assert_eq!(src.property("end-frame").unwrap(), PropertyValue::Int(7));
    assert_eq!(
        src.property("prefix").unwrap(),
        PropertyValue::Str("shot_".to_owned())
    );
    assert_eq!(src.property("delete").unwrap(), PropertyValue::Bool(false));
    assert!(!src.settings().delete);

    assert!(matches!(
        src.property("bogus"),
        Err(SourceError::UnknownProperty(_))
    ));
    assert!(matches!(
        src.set_property_str("bogus=1"),
        Err(SourceError::UnknownProperty(_))
    ));
    // Boundary errors leave the source valid.
    assert!(src.set_property_str("start-frame=0").is_err());
    assert!(src.is_valid());
}

#[test]
fn configure_applies_settings() {
    let fx = Fixture::new();
    let mut src = SceneSource::new(Box::new(MockRenderer::default()));
    let settings = Settings {
        location: fx.scene.clone(),
        output_location: fx.dir.path().to_path_buf(),
        start_frame: 2,
        end_frame: 3,
        prefix: "c".to_owned(),
        delete: false,
        ..Settings::default()
    };
    src.configure(&settings).unwrap();
    assert_eq!(src.cursor(), 2);
    assert_eq!(drain(&mut src).len(), 2);
    assert!(fx.dir.path().join("c000000002.png").exists());
    assert!(fx.dir.path().join("c000000003.png").exists());
}

#[test]
fn render_notifications_follow_session() {
    let fx = Fixture::new();
    let mut src = SceneSource::new(Box::new(MockRenderer::default()));
    let rx = src.render_notifications();
    src.set_property(Property::Location(fx.scene.clone()))
        .unwrap();
    src.set_property(Property::OutputLocation(fx.dir.path().to_path_buf()))
        .unwrap();
    src.set_property(Property::EndFrame(2)).unwrap();
    drain(&mut src);

    let notices: Vec<RenderNotice> = rx.try_iter().collect();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].frame, 1);
    assert_eq!(notices[1].path, fx.dir.path().join("000000002.png"));
}

#[test]
fn typed_values_are_range_checked() {
    let fx = Fixture::new();
    let mut src = fx.source(MockRenderer::default());
    for prop in [
        Property::FramerateNum(0),
        Property::FramerateDen(0),
        Property::StartFrame(0),
        Property::EndFrame(0),
        Property::StartFrame(u32::MAX),
    ] {
        assert!(matches!(
            src.set_property(prop),
            Err(SourceError::InvalidValue(_))
        ));
    }
    assert!(src.is_valid());
    assert_eq!(src.settings().frame_rate(), FrameRate::default());
    assert_eq!(src.cursor(), 1);

    let b = drain(&mut src);
    assert_eq!(b[1].pts, ClockTime::SECOND);
    assert_eq!(b[1].duration, ClockTime::SECOND);
}

#[test]
fn configure_rejects_out_of_range_settings() {
    let fx = Fixture::new();
    let mut src = SceneSource::new(Box::new(MockRenderer::default()));
    let settings = Settings {
        location: fx.scene.clone(),
        output_location: fx.dir.path().to_path_buf(),
        framerate_den: 0,
        ..Settings::default()
    };
    assert!(matches!(
        src.configure(&settings),
        Err(SourceError::InvalidValue(_))
    ));
    assert!(src.is_valid());
    assert!(src.session().is_none());
}

#[test]
fn failed_delete_is_ignored() {
    let fx = Fixture::new();
    let gone = fx.dir.path().join("never-rendered.png");
    remove_rendered(&gone);
    assert!(!gone.exists());
}
