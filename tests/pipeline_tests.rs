use std::cell::Cell;

use quadblit::pipeline::PipelineSlot;
use quadblit::RenderError;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

#[test]
fn slot_starts_uninitialized() {
    let slot: PipelineSlot<u32> = PipelineSlot::Uninitialized;
    assert!(!slot.is_ready());
    assert_eq!(slot.format(), None);
    assert!(slot.get().is_none());
}

#[test]
fn builder_runs_exactly_once() {
    let calls = Cell::new(0);
    let mut slot = PipelineSlot::Uninitialized;

    for _ in 0..3 {
        slot.ensure_built(FORMAT, |_| {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        })
        .expect("build succeeds");
    }

    assert_eq!(calls.get(), 1);
    assert_eq!(slot.get(), Some((&1, FORMAT)));
}

#[test]
fn reports_whether_it_built() {
    let mut slot = PipelineSlot::Uninitialized;
    assert!(slot.ensure_built(FORMAT, |_| Ok(())).unwrap());
    assert!(!slot.ensure_built(FORMAT, |_| Ok(())).unwrap());
}

#[test]
fn first_format_wins() {
    let mut slot = PipelineSlot::Uninitialized;
    slot.ensure_built(FORMAT, |format| Ok(format)).unwrap();
    let rebuilt = slot
        .ensure_built(wgpu::TextureFormat::Rgba8Unorm, |format| Ok(format))
        .unwrap();

    assert!(!rebuilt);
    assert_eq!(slot.format(), Some(FORMAT));
}

#[test]
fn failed_build_can_be_retried() {
    let mut slot: PipelineSlot<u32> = PipelineSlot::Uninitialized;
    let err = slot
        .ensure_built(FORMAT, |_| Err(RenderError::Validation("bad shader".into())))
        .unwrap_err();
    assert!(matches!(err, RenderError::Validation(_)));
    assert!(!slot.is_ready());

    assert!(slot.ensure_built(FORMAT, |_| Ok(7)).unwrap());
    assert_eq!(slot.get(), Some((&7, FORMAT)));
}
