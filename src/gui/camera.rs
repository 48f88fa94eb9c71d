use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Orthographic3, Perspective3, Point2, Point3, Vector3};

use super::input::{InputEvent, SceneCommand};
use crate::config::{CameraConfig, CameraMode};

const PITCH_LIMIT: f32 = 89.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging { anchor: Point2<f64> },
}

// Euler-angle fly camera. Dragging with the left mouse button turns it (when
// free-look is on), scrolling narrows or widens the field of view, and the
// movement keys slide it along its own front/right axes. The up direction is
// always +y, and pitch stops short of straight up or down so the look-at basis
// never degenerates.
//
// All angles are stored in degrees; they are only converted when building
// matrices.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    // -- position --
    position: Point3<f32>,
    yaw: f32,
    pitch: f32,
    // -- derived basis --
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    // -- perspective --
    width: u32,
    height: u32,
    fov: f32,
    // -- input state --
    cursor: Point2<f64>,
    drag: DragState,
    free_look: bool,
    // -- knobs to fiddle with --
    mode: CameraMode,
    sensitivity: f32,
    move_step: f32,
    fov_limits: (f32, f32),
    z_near: f32,
    z_far: f32,
}

impl FlyCamera {
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let [x, y, z] = config.position;
        let mut camera = FlyCamera {
            position: Point3::new(x, y, z),
            yaw: config.yaw,
            pitch: nalgebra::clamp(config.pitch, -PITCH_LIMIT, PITCH_LIMIT),
            front: -Vector3::z(),
            right: Vector3::x(),
            up: Vector3::y(),
            width: width.max(1),
            height: height.max(1),
            fov: nalgebra::clamp(config.fov, config.fov_min, config.fov_max),
            cursor: Point2::origin(),
            drag: DragState::Idle,
            free_look: config.free_look,
            mode: config.mode,
            sensitivity: config.sensitivity,
            move_step: config.move_step,
            fov_limits: (config.fov_min, config.fov_max),
            z_near: config.z_near,
            z_far: config.z_far,
        };
        camera.update_vectors();
        camera
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::DragButton { pressed: true } => {
                if self.free_look {
                    self.drag = DragState::Dragging {
                        anchor: self.cursor,
                    };
                }
            }
            InputEvent::DragButton { pressed: false } => self.drag = DragState::Idle,
            InputEvent::CursorMoved { x, y } => {
                let curr_pos = Point2::new(x, y);
                if let DragState::Dragging { anchor } = self.drag {
                    // Screen y grows downwards, pitch grows upwards
                    let dx = (curr_pos.x - anchor.x) as f32;
                    let dy = (anchor.y - curr_pos.y) as f32;
                    self.rotate(dx * self.sensitivity, dy * self.sensitivity);
                    self.drag = DragState::Dragging { anchor: curr_pos };
                }
                self.cursor = curr_pos;
            }
            InputEvent::Scroll { delta } => self.zoom(delta as f32),
            // A minimized window reports 0x0; keep the last real viewport
            InputEvent::Resized { width, height } if width > 0 && height > 0 => {
                self.width = width;
                self.height = height;
            }
            InputEvent::Resized { .. } => {}
            InputEvent::Command(command) => self.handle_command(command),
            InputEvent::CloseRequested => {}
        }
    }

    fn handle_command(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::MoveForward => self.position += self.front * self.move_step,
            SceneCommand::MoveBackward => self.position -= self.front * self.move_step,
            SceneCommand::MoveLeft => self.position -= self.right * self.move_step,
            SceneCommand::MoveRight => self.position += self.right * self.move_step,
            SceneCommand::ToggleFreeLook => {
                self.free_look = !self.free_look;
                if !self.free_look {
                    self.drag = DragState::Idle;
                }
                log::debug!("Free look {}", if self.free_look { "on" } else { "off" });
            }
            SceneCommand::ToggleOrbits => {}
        }
    }

    /// Turns by the given angles in degrees. Yaw is left unwrapped.
    pub fn rotate(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw += dyaw;
        self.pitch = nalgebra::clamp(self.pitch + dpitch, -PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Scrolling up (positive) narrows the field of view.
    pub fn zoom(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.fov = nalgebra::clamp(self.fov - delta, self.fov_limits.0, self.fov_limits.1);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(&Vector3::y()).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }

    pub fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.position, &(self.position + self.front), &Vector3::y())
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        match self.mode {
            CameraMode::Perspective => {
                Perspective3::new(aspect, self.fov.to_radians(), self.z_near, self.z_far)
                    .to_homogeneous()
            }
            CameraMode::Orthographic => {
                Orthographic3::new(-aspect, aspect, -1.0, 1.0, self.z_near, self.z_far)
                    .to_homogeneous()
            }
        }
    }

    /// Width over height of the viewport. Never zero.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn free_look(&self) -> bool {
        self.free_look
    }
}

// kiss3d wants a camera to drive its own render pass. Input never reaches the
// camera this way; the simulation feeds it through its input queue instead.
impl Camera for FlyCamera {
    fn handle_event(&mut self, _canvas: &Canvas, _event: &WindowEvent) {}

    fn eye(&self) -> Point3<f32> {
        self.position
    }

    fn view_transform(&self) -> Isometry3<f32> {
        FlyCamera::view_transform(self)
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix(self.aspect()) * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.z_near, self.z_far)
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix(self.aspect()));
        view.upload(&self.view_matrix());
    }
}
