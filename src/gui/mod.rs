use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::camera::FlyCamera;
use self::composer::SceneComposer;
use self::input::{InputEvent, InputQueue, SceneCommand};
use self::renderers::GlRenderer;
use crate::config::SceneConfig;
use crate::error::InitError;
use crate::gfx::{Clock, WallClock};
use crate::model::SolarSystem;

pub mod camera;
pub mod composer;
pub mod input;
mod renderers;

/// Owns the whole viewer: scene, camera, renderer and clock. kiss3d calls
/// `step` once per frame, then renders with the camera and renderer we hand
/// it.
pub struct Simulation {
    system: SolarSystem,
    camera: FlyCamera,
    composer: SceneComposer,
    input: InputQueue,
    clock: WallClock,
    renderer: GlRenderer,
}

impl Simulation {
    pub fn new(config: &SceneConfig, window: &mut Window) -> Result<Self, InitError> {
        let mut renderer = GlRenderer::new(&config.render)?;
        let system = SolarSystem::build(config, renderer.textures_mut())?;
        let composer = SceneComposer::new(&config.render, renderer.geometry_counts());
        let camera = FlyCamera::new(&config.camera, window.width(), window.height());

        Ok(Self {
            system,
            camera,
            composer,
            input: InputQueue::new(),
            // Started last, so t = 0 is the first frame rather than the
            // texture loading
            clock: WallClock::start(),
            renderer,
        })
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.input.push_window_event(&event.value);
        }

        for event in self.input.drain() {
            match event {
                InputEvent::Command(SceneCommand::ToggleOrbits) => self.composer.toggle_orbits(),
                InputEvent::Resized { width, height } => {
                    log::debug!("Viewport resized to {}x{}", width, height);
                    self.camera.handle_event(&event);
                }
                InputEvent::CloseRequested => log::info!("Window close requested"),
                _ => self.camera.handle_event(&event),
            }
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());

        let time = self.clock.elapsed_seconds();
        let frame = self.renderer.begin_frame();
        self.composer
            .compose_frame(&self.system, &self.camera, time, frame);
    }
}
