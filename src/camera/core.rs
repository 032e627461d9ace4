use glam::{Mat4, Quat, Vec3};

/// Look-at camera defined by an eye position, a target center and an up vector.
///
/// `up` is re-orthogonalized against the view direction on construction, so
/// it is always a unit vector perpendicular to `front()`. The in-place motions
/// below only rotate or translate the frame rigidly and keep that property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    eye: Vec3,
    center: Vec3,
    up: Vec3,
}

impl Camera {
    /// Builds a camera and orthonormalizes `up` against `center - eye`.
    ///
    /// # Panics
    ///
    /// Panics when `up` is parallel to the view direction (or the view
    /// direction is zero). Callers must never pass such a triple; use
    /// [`Camera::try_new`] for untrusted input.
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        match Self::try_new(eye, center, up) {
            Some(camera) => camera,
            None => panic!(
                "degenerate camera: up {up} is parallel to view direction {}",
                center - eye
            ),
        }
    }

    /// Same as [`Camera::new`] but returns `None` for a degenerate triple.
    pub fn try_new(eye: Vec3, center: Vec3, up: Vec3) -> Option<Self> {
        let front = center - eye;
        let left = up.cross(front);
        if left == Vec3::ZERO || !left.is_finite() {
            return None;
        }
        Some(Self {
            eye,
            center,
            up: front.cross(left).normalize(),
        })
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Right-handed look-at view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    pub fn front(&self, normalize: bool) -> Vec3 {
        let front = self.center - self.eye;
        if normalize {
            front.normalize()
        } else {
            front
        }
    }

    /// `cross(up, front)`, which points to the viewer's left.
    pub fn left(&self, normalize: bool) -> Vec3 {
        let left = self.up.cross(self.front(false));
        if normalize {
            left.normalize()
        } else {
            left
        }
    }

    pub fn truck_left(&mut self, offset: f32) {
        self.translate(offset * self.left(true));
    }

    pub fn pedestal_up(&mut self, offset: f32) {
        self.translate(offset * self.up);
    }

    pub fn dolly_in(&mut self, offset: f32) {
        self.translate(offset * self.front(true));
    }

    /// Translates along the local left, up and front axes in one step.
    pub fn move_local(&mut self, truck_left: f32, pedestal_up: f32, dolly_in: f32) {
        let translation =
            truck_left * self.left(true) + pedestal_up * self.up + dolly_in * self.front(true);
        self.translate(translation);
    }

    /// Rotates `up` around the view direction.
    pub fn roll_right(&mut self, radians: f32) {
        self.up = rotate(self.up, radians, self.front(false));
    }

    /// Rotates the view direction and `up` around the local left axis.
    pub fn tilt_down(&mut self, radians: f32) {
        let axis = self.left(false);
        let front = rotate(self.front(false), radians, axis);
        self.center = self.eye + front;
        self.up = rotate(self.up, radians, axis);
    }

    /// Rotates the view direction around `up`; `up` itself is unchanged.
    pub fn pan_left(&mut self, radians: f32) {
        let front = rotate(self.front(false), radians, self.up);
        self.center = self.eye + front;
    }

    /// Roll, then tilt, then pan. Each step uses the frame produced by the
    /// previous one, so the order changes the resulting orientation.
    pub fn rotate_local(&mut self, roll_right: f32, tilt_down: f32, pan_left: f32) {
        self.roll_right(roll_right);
        self.tilt_down(tilt_down);
        self.pan_left(pan_left);
    }

    /// Rotates the view direction and `up` around a world axis, keeping the eye fixed.
    pub fn rotate_world(&mut self, radians: f32, axis: Vec3) {
        let front = rotate(self.front(false), radians, axis);
        self.center = self.eye + front;
        self.up = rotate(self.up, radians, axis);
    }

    /// The `--lookat` command-line value reproducing this camera.
    pub fn lookat_arg(&self) -> String {
        let values: Vec<String> = [self.eye, self.center, self.up]
            .iter()
            .flat_map(|v| v.to_array())
            .map(|c| c.to_string())
            .collect();
        format!("--lookat {}", values.join(","))
    }

    fn translate(&mut self, translation: Vec3) {
        self.eye += translation;
        self.center += translation;
    }
}

impl Default for Camera {
    /// Eye at the origin looking down -Z with +Y up.
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            center: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

fn rotate(v: Vec3, radians: f32, axis: Vec3) -> Vec3 {
    if radians == 0.0 {
        return v;
    }
    Quat::from_axis_angle(axis.normalize(), radians) * v
}
