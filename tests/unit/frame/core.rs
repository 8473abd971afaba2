use super::*;
use crate::gpu::device::SoftwareDevice;

fn leaf(device: &Arc<SoftwareDevice>, audio: &[i16]) -> Frame {
    let texture = Texture::new(device.clone(), 1, 1).unwrap();
    texture.upload(&[0, 0, 0, 255]).unwrap();
    Frame::leaf(Arc::new(texture), audio.to_vec(), FieldMode::Progressive)
}

#[test]
fn empty_frame_is_inert() {
    let frame = Frame::empty();
    assert!(frame.is_empty());
    assert!(frame.audio_data().is_empty());
    frame.begin_write().unwrap();
    frame.end_write().unwrap();
    frame.begin_read().unwrap();
    frame.draw().unwrap();
    frame.end_read().unwrap();
}

#[test]
fn leaf_phase_cycle_and_draw() {
    let device = Arc::new(SoftwareDevice::new());
    let mut frame = leaf(&device, &[7, 7]);
    frame.transform_mut().pos = Vec2::new(0.25, 0.0);

    frame.begin_write().unwrap();
    frame.end_write().unwrap();
    frame.begin_read().unwrap();
    frame.draw().unwrap();
    frame.end_read().unwrap();

    let log = device.take_draw_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].transform.pos, Vec2::new(0.25, 0.0));
}

#[test]
fn draw_outside_read_phase_fails() {
    let device = Arc::new(SoftwareDevice::new());
    let frame = leaf(&device, &[]);
    assert!(frame.draw().is_err());
}

#[test]
fn pixel_data_only_on_leaves() {
    let device = Arc::new(SoftwareDevice::new());
    let frame = leaf(&device, &[]);
    assert_eq!(frame.pixel_data().unwrap(), vec![0, 0, 0, 255]);

    assert!(matches!(
        Frame::empty().pixel_data(),
        Err(OnairError::Unsupported(_))
    ));
    assert!(matches!(
        Frame::composite().pixel_data(),
        Err(OnairError::Unsupported(_))
    ));
}

#[test]
fn clone_shares_the_texture() {
    let device = Arc::new(SoftwareDevice::new());
    let frame = leaf(&device, &[1]);
    let copy = frame.clone();
    assert_eq!(device.alive_textures(), 1);
    drop(frame);
    assert_eq!(device.alive_textures(), 1);
    drop(copy);
    assert_eq!(device.alive_textures(), 0);
}

#[test]
fn take_audio_leaves_silence() {
    let device = Arc::new(SoftwareDevice::new());
    let mut frame = leaf(&device, &[3, 2, 1]);
    assert_eq!(frame.take_audio(), vec![3, 2, 1]);
    assert!(frame.audio_data().is_empty());
}
