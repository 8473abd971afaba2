use super::*;
use std::sync::Arc;

use crate::{
    foundation::format::FieldMode,
    gpu::device::SoftwareDevice,
    producer::color::ColorProducer,
};

fn small(format: VideoFormatDesc) -> VideoFormatDesc {
    VideoFormatDesc {
        width: 2,
        height: 2,
        ..format
    }
}

#[test]
fn progressive_tick_draws_exactly_one_quad() {
    let device = Arc::new(SoftwareDevice::new());
    let producer = ColorProducer::from_str(device.clone(), "#00FF00").unwrap();
    let mut renderer =
        FrameRenderer::new(small(VideoFormatDesc::hd720p50()), Box::new(producer)).unwrap();

    let frame = renderer.render_tick().unwrap().unwrap();
    assert!(!frame.is_empty());
    let log = device.take_draw_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].mode, FieldMode::Progressive);
    assert!(!renderer.is_exhausted());
}

#[test]
fn interlaced_tick_merges_two_fields() {
    let device = Arc::new(SoftwareDevice::new());
    let producer = ColorProducer::from_str(device.clone(), "#0000FF").unwrap();
    let mut renderer =
        FrameRenderer::new(small(VideoFormatDesc::pal()), Box::new(producer)).unwrap();

    let frame = renderer.render_tick().unwrap().unwrap();
    assert_eq!(frame.children().len(), 2);

    let log = device.take_draw_log();
    let modes: Vec<_> = log.iter().map(|call| call.mode).collect();
    assert_eq!(modes, vec![FieldMode::Upper, FieldMode::Lower]);
}

#[test]
fn exhausted_chain_holds_the_tick() {
    struct Nothing;
    impl crate::producer::core::FrameProducer for Nothing {
        fn initialize(&mut self, _format: &VideoFormatDesc) -> OnairResult<()> {
            Ok(())
        }
        fn render_frame(&mut self) -> OnairResult<Option<Frame>> {
            Ok(None)
        }
        fn name(&self) -> String {
            "nothing".to_owned()
        }
    }

    let mut renderer =
        FrameRenderer::new(small(VideoFormatDesc::hd720p50()), Box::new(Nothing)).unwrap();
    assert!(renderer.render_tick().unwrap().is_none());
    assert!(renderer.is_exhausted());
}

#[test]
fn chain_hand_off_happens_at_the_top_level() {
    let device = Arc::new(SoftwareDevice::new());

    struct Once {
        device: Arc<SoftwareDevice>,
        frames_left: usize,
        following: Option<BoxedProducer>,
    }
    impl crate::producer::core::FrameProducer for Once {
        fn initialize(&mut self, _format: &VideoFormatDesc) -> OnairResult<()> {
            Ok(())
        }
        fn render_frame(&mut self) -> OnairResult<Option<Frame>> {
            if self.frames_left == 0 {
                return Ok(None);
            }
            self.frames_left -= 1;
            let texture =
                crate::gpu::texture::Texture::new(self.device.clone(), 2, 2).map(Arc::new)?;
            Ok(Some(Frame::leaf(
                texture,
                vec![1],
                FieldMode::Progressive,
            )))
        }
        fn take_following_producer(&mut self) -> Option<BoxedProducer> {
            self.following.take()
        }
        fn name(&self) -> String {
            "once".to_owned()
        }
    }

    let follower = ColorProducer::from_str(device.clone(), "#FFFFFF").unwrap();
    let head = Once {
        device: device.clone(),
        frames_left: 1,
        following: Some(Box::new(follower)),
    };
    let mut renderer =
        FrameRenderer::new(small(VideoFormatDesc::hd720p50()), Box::new(head)).unwrap();

    // Tick 1 from the head, tick 2 transparently from the follower.
    assert!(renderer.render_tick().unwrap().is_some());
    assert!(renderer.render_tick().unwrap().is_some());
    assert!(!renderer.is_exhausted());
}
