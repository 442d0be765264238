use std::any::Any;
use std::env;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::info;
use pollster::block_on;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::WindowBuilder;

use shadeview::{
    load_mesh_file, AssetPaths, InputState, KeyCode, Renderer, SceneState, ShadingTechnique,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let assets = AssetPaths::new(&options.assets_dir);

    if options.summary_only {
        run_summary(&assets)
    } else {
        run_interactive(&assets)
    }
}

/// Loads and reports the asset set without touching the GPU.
fn run_summary(assets: &AssetPaths) -> Result<()> {
    println!("Assets in {}", assets.root().display());

    match load_mesh_file(&assets.cube_mesh()) {
        Ok(mesh) => println!(
            " - cube mesh: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.indices.len()
        ),
        Err(_) => println!(" - cube mesh: missing, using built-in cube"),
    }
    match load_mesh_file(&assets.model_mesh()) {
        Ok(mesh) => println!(
            " - model mesh: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.indices.len()
        ),
        Err(_) => println!(" - model mesh: missing, substituting cube"),
    }

    for (name, path) in [
        ("ground texture", assets.ground_texture()),
        ("surface texture", assets.surface_texture()),
    ] {
        let status = if path.is_file() { "found" } else { "missing (placeholder)" };
        println!(" - {name}: {status}");
    }
    let faces_found = assets
        .skybox_faces()
        .iter()
        .filter(|face| face.is_file())
        .count();
    println!(" - skybox faces: {faces_found}/6 found");

    let techniques: Vec<String> = ShadingTechnique::ALL
        .iter()
        .enumerate()
        .map(|(index, technique)| format!("{}={}", index + 1, technique.label()))
        .collect();
    println!("Techniques: {}", techniques.join(" "));
    Ok(())
}

fn run_interactive(assets: &AssetPaths) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop =
        event_loop.map_err(|panic| WindowInitError::from_panic("event loop", panic))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Shadeview")
            .with_inner_size(LogicalSize::new(800.0, 600.0))
            .build(&event_loop)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let renderer = block_on(Renderer::new(Arc::clone(&window), assets))?;
    info!("renderer initialized");

    let mut app = AppState {
        renderer,
        scene: SceneState::new(),
        input: InputState::new(),
        last_error: None,
    };

    let mut event_loop = event_loop;
    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        if let Err(err) = app.process_event(&event, control_flow) {
            app.last_error = Some(err);
            control_flow.set_exit();
        }
    });

    if let Some(err) = app.last_error {
        return Err(err);
    }
    Ok(())
}

struct AppState {
    renderer: Renderer,
    scene: SceneState,
    input: InputState,
    last_error: Option<anyhow::Error>,
}

impl AppState {
    fn process_event(&mut self, event: &Event<()>, control_flow: &mut ControlFlow) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        control_flow.set_exit();
                    }
                    WindowEvent::Resized(size) => {
                        self.renderer.resize(*size);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        self.renderer.resize(**new_inner_size);
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        self.handle_keyboard(input);
                    }
                    _ => {}
                }
            }
            Event::RedrawRequested(window_id) if *window_id == self.renderer.window_id() => {
                if let Err(err) = self.renderer.render(&self.scene) {
                    match err {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            let size = self.renderer.window().inner_size();
                            self.renderer.resize(size);
                        }
                        wgpu::SurfaceError::OutOfMemory => {
                            return Err(anyhow!("GPU is out of memory"));
                        }
                        wgpu::SurfaceError::Timeout => {
                            info!("surface timeout; retrying next frame");
                        }
                    }
                }
            }
            Event::MainEventsCleared => {
                // One update per loop iteration, then redraw.
                self.scene.apply_input(&self.input);
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_keyboard(&self, input: &KeyboardInput) {
        let Some(keycode) = input.virtual_keycode.and_then(map_keycode) else {
            return;
        };
        match input.state {
            ElementState::Pressed => self.input.set_key_down(keycode),
            ElementState::Released => self.input.set_key_up(keycode),
        }
    }
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

/// Maps the viewer's key set; everything else is ignored.
fn map_keycode(code: winit::event::VirtualKeyCode) -> Option<KeyCode> {
    use winit::event::VirtualKeyCode as Key;
    Some(match code {
        Key::Key1 => KeyCode::Digit(1),
        Key::Key2 => KeyCode::Digit(2),
        Key::Key3 => KeyCode::Digit(3),
        Key::Key4 => KeyCode::Digit(4),
        Key::Key5 => KeyCode::Digit(5),
        Key::A => KeyCode::Character('A'),
        Key::D => KeyCode::Character('D'),
        Key::F => KeyCode::Character('F'),
        Key::H => KeyCode::Character('H'),
        Key::I => KeyCode::Character('I'),
        Key::J => KeyCode::Character('J'),
        Key::K => KeyCode::Character('K'),
        Key::L => KeyCode::Character('L'),
        Key::R => KeyCode::Character('R'),
        Key::S => KeyCode::Character('S'),
        Key::U => KeyCode::Character('U'),
        Key::W => KeyCode::Character('W'),
        _ => return None,
    })
}

struct CliOptions {
    assets_dir: String,
    summary_only: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut assets_dir = "assets".to_string();
        let mut summary_only = false;
        let mut positional_seen = false;
        for arg in env::args().skip(1) {
            match arg.as_str() {
                "--summary-only" => summary_only = true,
                other if other.starts_with("--") => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: shadeview [assets-dir] [--summary-only]"
                    ));
                }
                other => {
                    if positional_seen {
                        return Err(anyhow!("Unexpected extra argument: {other}"));
                    }
                    assets_dir = other.to_string();
                    positional_seen = true;
                }
            }
        }
        Ok(Self {
            assets_dir,
            summary_only,
        })
    }
}
