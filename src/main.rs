// affine-cube: interactive demo of ordered affine transforms

mod renderer;

use affine_cube::{DemoConfig, Scene};
use winit::event_loop::EventLoop;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };
    let scene = match Scene::from_config(&config) {
        Ok(scene) => scene,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");

    let renderer = renderer::Renderer::new(&event_loop, scene).await;
    renderer.run(event_loop);
}
