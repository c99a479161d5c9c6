use quadblit::pacing::FramePacer;

#[test]
fn depth_one_waits_on_every_submission() {
    let mut pacer = FramePacer::new(1);
    assert_eq!(pacer.push(1), Some(1));
    assert_eq!(pacer.push(2), Some(2));
    assert_eq!(pacer.in_flight(), 0);
}

#[test]
fn zero_depth_behaves_like_one() {
    let mut pacer = FramePacer::new(0);
    assert_eq!(pacer.depth(), 1);
    assert_eq!(pacer.push("frame"), Some("frame"));
}

#[test]
fn deeper_queue_waits_on_the_oldest() {
    let mut pacer = FramePacer::new(3);
    assert_eq!(pacer.push(1), None);
    assert_eq!(pacer.push(2), None);
    assert_eq!(pacer.push(3), Some(1));
    assert_eq!(pacer.push(4), Some(2));
    assert_eq!(pacer.in_flight(), 2);
}

#[test]
fn drain_returns_newest_and_empties() {
    let mut pacer = FramePacer::new(4);
    let _ = pacer.push(10);
    let _ = pacer.push(11);
    assert_eq!(pacer.drain(), Some(11));
    assert_eq!(pacer.in_flight(), 0);
    assert_eq!(pacer.drain(), None);
}
