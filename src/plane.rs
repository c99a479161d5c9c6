//! Scene-graph bookkeeping for visualizing detected planar surfaces.
//!
//! A plane anchor reports its extent on the horizontal X/Z axes. The visualization is a
//! flat plane node, laid down by rotating it -90 degrees about X, whose size tracks the
//! anchor's extent as tracking refines it.

pub type Matrix4 = [[f32; 4]; 4];

pub const IDENTITY: Matrix4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub const PLANE_COLOR: [f32; 4] = [0.857, 0.919, 0.0, 0.5];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneAnchor {
    pub center: [f32; 3],
    pub extent: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Plane { width: f32, height: f32 },
    Sphere { radius: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub geometry: Option<Geometry>,
    pub color: Option<[f32; 4]>,
    /// Column-major local transform.
    pub transform: Matrix4,
    pub children: Vec<SceneNode>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            geometry: None,
            color: None,
            transform: IDENTITY,
            children: Vec::new(),
        }
    }
}

impl SceneNode {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Default::default()
        }
    }

    /// Small marker sphere, e.g. for hit-test results.
    pub fn sphere(color: [f32; 4]) -> Self {
        Self {
            color: Some(color),
            ..Self::new(Geometry::Sphere { radius: 0.01 })
        }
    }

    pub fn add_child(&mut self, child: SceneNode) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }
}

pub fn rotation_x(angle: f32) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, cos, sin, 0.0],
        [0.0, -sin, cos, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

impl PlaneAnchor {
    fn plane_size(&self) -> (f32, f32) {
        (self.extent[0], self.extent[2])
    }

    pub fn add_plane_node(&self, parent: &mut SceneNode) -> usize {
        let (width, height) = self.plane_size();
        let plane = SceneNode {
            geometry: Some(Geometry::Plane { width, height }),
            color: Some(PLANE_COLOR),
            transform: rotation_x(-std::f32::consts::FRAC_PI_2),
            children: Vec::new(),
        };
        parent.add_child(plane)
    }

    /// Resizes the plane node under `parent` to the current extent.
    ///
    /// Returns `true` if the node existed and its size changed.
    pub fn update_plane_node(&self, parent: &mut SceneNode) -> bool {
        let (width, height) = self.plane_size();
        let Some(node) = find_plane_node(parent) else {
            return false;
        };
        let Some(Geometry::Plane {
            width: current_width,
            height: current_height,
        }) = node.geometry.as_mut()
        else {
            return false;
        };
        if *current_width == width && *current_height == height {
            return false;
        }

        log::debug!("current plane size: ({current_width}, {current_height})");
        *current_width = width;
        *current_height = height;
        log::debug!("updated plane size: ({width}, {height})");
        true
    }
}

pub fn find_plane_node(parent: &mut SceneNode) -> Option<&mut SceneNode> {
    parent
        .children
        .iter_mut()
        .find(|child| matches!(child.geometry, Some(Geometry::Plane { .. })))
}
