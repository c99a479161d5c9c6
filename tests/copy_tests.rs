use quadblit::utils::{copy_compatible, copy_extent};

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

#[test]
fn copy_extent_crops_to_smaller_destination() {
    let region = copy_extent(extent(1024, 768), extent(640, 480));
    assert_eq!(region, extent(640, 480));
}

#[test]
fn copy_extent_crops_to_smaller_source() {
    let region = copy_extent(extent(2, 2), extent(4, 4));
    assert_eq!(region, extent(2, 2));
}

#[test]
fn copy_extent_takes_minimum_per_axis() {
    // wide source into a tall drawable
    let region = copy_extent(extent(300, 50), extent(100, 200));
    assert_eq!(region.width, 100);
    assert_eq!(region.height, 50);
    assert_eq!(region.depth_or_array_layers, 1);
}

#[test]
fn srgb_variants_are_copy_compatible() {
    assert!(copy_compatible(
        wgpu::TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Bgra8UnormSrgb
    ));
    assert!(copy_compatible(
        wgpu::TextureFormat::Rgba8Unorm,
        wgpu::TextureFormat::Rgba8Unorm
    ));
}

#[test]
fn channel_order_changes_are_not_copy_compatible() {
    assert!(!copy_compatible(
        wgpu::TextureFormat::Rgba8Unorm,
        wgpu::TextureFormat::Bgra8Unorm
    ));
}
