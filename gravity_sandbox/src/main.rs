//! Gravity sandbox
//!
//! Interactive 3D N-body simulation with a fly camera.
//!
//! Controls:
//! - Left mouse drag: Look around
//! - Left click: Select body
//! - Right click: Launch a body from the camera
//! - W/A/S/D: Fly, Space/Shift: Up/down
//! - Scroll: Zoom
//! - P: Pause/resume
//! - R: Reset
//! - Delete: Delete selected body
//! - 1/2/3/4: Presets (Default, Solar System, Binary Stars, Chaos)
//! - T: Toggle trails
//! - G: Toggle grid

use anyhow::Context as _;
use clap::Parser;
use common::camera::MoveInput;
use common::{init_logging, load_or_default, EguiLayer, FlyCamera, FrameBlitter, GraphicsContext};
use egui::{Color32, RichText};
use glam::Vec2;
use gravity_sandbox::equations_ui::{GRAVITY_EQUATIONS, GRAVITY_VARIABLES};
use gravity_sandbox::renderer::{GravityRenderer, RenderOptions, RenderQuality};
use gravity_sandbox::{
    BodyId, BodyKind, CollisionMode, GravityConfig, LaunchConfig, Preset, ScenarioConfig,
    Simulation,
};
use serde::Deserialize;
use std::path::PathBuf;
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

/// Pointer travel below which a left press counts as a click
const CLICK_SLOP: f32 = 3.0;

#[derive(Debug, Parser)]
#[command(name = "gravity_sandbox", about = "3D N-body gravity sandbox")]
struct Args {
    /// YAML file with physics, launch, render and camera settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// YAML scenario describing the starting bodies
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Starting preset: default, solar, binary or chaos
    #[arg(long)]
    preset: Option<Preset>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct SandboxConfig {
    physics: GravityConfig,
    launch: LaunchConfig,
    render: RenderOptions,
    camera: FlyCamera,
    camera_speed: f32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            physics: GravityConfig::default(),
            launch: LaunchConfig::default(),
            render: RenderOptions::default(),
            camera: FlyCamera::default(),
            camera_speed: 10.0,
        }
    }
}

/// Engine state plus everything the control panel edits
struct Sandbox {
    sim: Simulation,
    camera: FlyCamera,
    home_camera: FlyCamera,
    launch: LaunchConfig,
    options: RenderOptions,
    camera_speed: f32,
    moves: MoveInput,
    selected: Option<BodyId>,
    preset: Option<Preset>,
}

impl Sandbox {
    fn new(sim: Simulation, config: &SandboxConfig, preset: Option<Preset>) -> Self {
        let mut sandbox = Self {
            sim,
            camera: config.camera.clamped(),
            home_camera: config.camera.clamped(),
            launch: config.launch.clamped(),
            options: config.render,
            camera_speed: config.camera_speed.clamp(1.0, 30.0),
            moves: MoveInput::default(),
            selected: None,
            preset,
        };
        sandbox.set_trails(sandbox.options.show_trails);
        sandbox
    }

    fn update(&mut self) {
        self.camera.translate(&self.moves, self.camera_speed);
        self.sim.step();
    }

    fn reset(&mut self) {
        self.sim.reset();
        self.camera = self.home_camera;
        self.selected = None;
        self.preset = Some(Preset::Default);
    }

    fn load_preset(&mut self, preset: Preset) {
        self.sim.load_preset(preset);
        self.selected = None;
        self.preset = Some(preset);
    }

    fn launch_body(&mut self) {
        let id = self
            .sim
            .launch_body(&self.launch, self.camera.position, self.camera.forward());
        self.selected = Some(id);
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.selected.take() {
            if let Err(err) = self.sim.delete_body(id) {
                log::warn!("{err}");
            }
        }
    }

    fn set_move_key(&mut self, key: KeyCode, held: bool) -> bool {
        match key {
            KeyCode::KeyW => self.moves.forward = held,
            KeyCode::KeyS => self.moves.back = held,
            KeyCode::KeyA => self.moves.left = held,
            KeyCode::KeyD => self.moves.right = held,
            KeyCode::Space => self.moves.up = held,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.moves.down = held,
            _ => return false,
        }
        true
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        if self.set_move_key(key, pressed) || !pressed {
            return;
        }

        match key {
            KeyCode::KeyP => self.sim.paused = !self.sim.paused,
            KeyCode::KeyR => self.reset(),
            KeyCode::Delete | KeyCode::Backspace => self.delete_selected(),
            KeyCode::Escape => self.selected = None,
            KeyCode::KeyT => self.set_trails(!self.options.show_trails),
            KeyCode::KeyG => self.options.show_grid = !self.options.show_grid,
            KeyCode::Digit1 => self.load_preset(Preset::Default),
            KeyCode::Digit2 => self.load_preset(Preset::Solar),
            KeyCode::Digit3 => self.load_preset(Preset::Binary),
            KeyCode::Digit4 => self.load_preset(Preset::Chaos),
            _ => {}
        }
    }

    fn set_trails(&mut self, on: bool) {
        self.options.show_trails = on;
        self.sim.set_config(GravityConfig {
            record_trails: on,
            ..*self.sim.config()
        });
    }

    fn ui(&mut self, ctx: &egui::Context) {
        common::draw_equations_sidebar(ctx, "N-Body Gravity", GRAVITY_EQUATIONS, GRAVITY_VARIABLES);

        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Bodies: {}", self.sim.bodies().len()));
                ui.separator();
                ui.label(format!(
                    "Preset: {}",
                    self.preset.map_or("Custom", |p| p.label())
                ));
                ui.separator();
                ui.label(format!("Time: {:.1}x", self.sim.config().time_scale));
                ui.separator();
                if self.sim.paused {
                    ui.label(RichText::new("PAUSED").color(Color32::YELLOW));
                } else {
                    ui.label(RichText::new("RUNNING").color(Color32::GREEN));
                }
            });
        });

        egui::SidePanel::left("controls")
            .default_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.simulation_controls(ui);
                    ui.separator();
                    self.launch_controls(ui);
                    ui.separator();
                    self.selection_panel(ui);
                    ui.separator();
                    self.stats_panel(ui);
                });
            });
    }

    fn simulation_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Simulation");
        ui.horizontal_wrapped(|ui| {
            for preset in Preset::ALL {
                if ui.button(preset.label()).clicked() {
                    self.load_preset(preset);
                }
            }
        });

        let mut config = *self.sim.config();
        ui.add(egui::Slider::new(&mut config.g_constant, 0.1..=5.0).text("G"));
        ui.add(egui::Slider::new(&mut config.time_scale, 0.0..=5.0).text("Time scale"));
        ui.horizontal(|ui| {
            ui.label("Collisions");
            ui.radio_value(&mut config.collision_mode, CollisionMode::Merge, "Merge");
            ui.radio_value(&mut config.collision_mode, CollisionMode::Bounce, "Bounce");
        });
        if config != *self.sim.config() {
            self.sim.set_config(config);
        }

        ui.add(egui::Slider::new(&mut self.camera_speed, 1.0..=30.0).text("Camera speed"));

        let mut trails = self.options.show_trails;
        if ui.checkbox(&mut trails, "Show trails").changed() {
            self.set_trails(trails);
        }
        ui.checkbox(&mut self.options.show_grid, "Show grid");
        ui.checkbox(&mut self.options.show_stars, "Show stars");

        ui.horizontal(|ui| {
            ui.label("Quality");
            for quality in RenderQuality::ALL {
                ui.selectable_value(&mut self.options.quality, quality, quality.name());
            }
        });

        ui.horizontal(|ui| {
            let label = if self.sim.paused { "Resume" } else { "Pause" };
            if ui.button(label).clicked() {
                self.sim.paused = !self.sim.paused;
            }
            if ui.button("Reset").clicked() {
                self.reset();
            }
        });
    }

    fn launch_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Launcher");
        ui.add(egui::Slider::new(&mut self.launch.mass, 10.0..=3000.0).text("Mass"));
        ui.add(egui::Slider::new(&mut self.launch.radius, 3.0..=80.0).text("Radius"));
        ui.add(egui::Slider::new(&mut self.launch.speed, 0.0..=30.0).text("Speed"));
        ui.horizontal(|ui| {
            ui.label("Color");
            ui.color_edit_button_rgba_unmultiplied(&mut self.launch.color);
        });
        egui::ComboBox::from_label("Kind")
            .selected_text(self.launch.kind.name())
            .show_ui(ui, |ui| {
                for kind in BodyKind::ALL {
                    ui.selectable_value(&mut self.launch.kind, kind, kind.name());
                }
            });
        if ui.button("Launch").clicked() {
            self.launch_body();
        }
        ui.label(RichText::new("Right click in the view to launch").small().italics());
    }

    fn selection_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Selection");
        let Some(id) = self.selected else {
            ui.label("Left click a body to select it");
            return;
        };
        let Some(body) = self.sim.body(id) else {
            self.selected = None;
            return;
        };

        egui::Grid::new("selected_body").num_columns(2).show(ui, |ui| {
            ui.label("Body");
            ui.label(format!("{} ({})", body.id, body.kind));
            ui.end_row();
            ui.label("Mass");
            ui.label(format!("{:.1}", body.mass));
            ui.end_row();
            ui.label("Radius");
            ui.label(format!("{:.1}", body.radius));
            ui.end_row();
            ui.label("Speed");
            ui.label(format!("{:.2}", body.speed()));
            ui.end_row();
            if let Some(t) = body.temperature {
                ui.label("Temperature");
                ui.label(format!("{t:.0} K"));
                ui.end_row();
            }
        });

        if ui.button("Delete").clicked() {
            self.delete_selected();
        }
    }

    fn stats_panel(&self, ui: &mut egui::Ui) {
        ui.heading("System");
        let com = self.sim.center_of_mass();
        ui.label(format!("Total mass: {:.0}", self.sim.total_mass()));
        ui.label(format!("Kinetic energy: {:.0}", self.sim.kinetic_energy()));
        ui.label(format!("Center of mass: ({:.0}, {:.0}, {:.0})", com.x, com.y, com.z));

        ui.label("Kinetic energy history");
        let samples: Vec<f32> = self.sim.history().iter().map(|s| s.total).collect();
        common::draw_sparkline(ui, &samples, 60.0, Color32::from_rgb(168, 85, 247));
    }
}

struct Drag {
    last: Vec2,
    travelled: f32,
}

struct App {
    gfx: GraphicsContext,
    blitter: FrameBlitter,
    egui: EguiLayer,
    renderer: GravityRenderer,
    sandbox: Sandbox,
    cursor: Option<Vec2>,
    drag: Option<Drag>,
}

impl App {
    fn new(gfx: GraphicsContext, sandbox: Sandbox) -> Self {
        let (width, height) = (gfx.size.width.max(1), gfx.size.height.max(1));
        let blitter = FrameBlitter::new(&gfx, width, height);
        let egui = EguiLayer::new(&gfx);

        Self {
            gfx,
            blitter,
            egui,
            renderer: GravityRenderer::new(width, height),
            sandbox,
            cursor: None,
            drag: None,
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match (button, pressed) {
            (MouseButton::Left, true) => {
                if let Some(pos) = self.cursor {
                    self.drag = Some(Drag {
                        last: pos,
                        travelled: 0.0,
                    });
                }
            }
            (MouseButton::Left, false) => {
                if let Some(drag) = self.drag.take() {
                    if drag.travelled < CLICK_SLOP {
                        self.select_at_cursor();
                    }
                }
            }
            (MouseButton::Right, true) => {
                if self.cursor.and_then(|c| self.blitter.to_frame_coords(c)).is_some() {
                    self.sandbox.launch_body();
                }
            }
            _ => {}
        }
    }

    fn handle_cursor(&mut self, pos: Vec2) {
        self.cursor = Some(pos);
        if let Some(drag) = &mut self.drag {
            let delta = pos - drag.last;
            drag.travelled += delta.length();
            drag.last = pos;
            self.sandbox.camera.rotate(delta.x, delta.y);
        }
    }

    fn select_at_cursor(&mut self) {
        let Some(pointer) = self.cursor.and_then(|c| self.blitter.to_frame_coords(c)) else {
            return;
        };
        let sandbox = &mut self.sandbox;
        sandbox.selected = sandbox
            .sim
            .pick_body(&sandbox.camera, self.renderer.viewport(), pointer);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gfx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let sandbox = &mut self.sandbox;
        let full_output = self.egui.run(&self.gfx.window, |ctx| sandbox.ui(ctx));

        let area = self.egui.free_area();
        let (width, height) = (
            area.width.round().max(1.0) as u32,
            area.height.round().max(1.0) as u32,
        );
        if (width, height) != (self.renderer.frame().width(), self.renderer.frame().height()) {
            self.renderer.resize(width, height);
        }
        self.renderer.render(
            &self.sandbox.sim,
            &self.sandbox.camera,
            self.sandbox.selected,
            &self.sandbox.options,
        );
        self.blitter.upload(&self.gfx, self.renderer.frame());

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.blitter.render(&mut encoder, &view, area);
        self.egui.paint(&self.gfx, &mut encoder, &view, full_output);

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config: SandboxConfig =
        load_or_default(args.config.as_deref()).context("loading sandbox configuration")?;

    let mut sim = Simulation::new(config.physics);
    let preset = match &args.scenario {
        Some(path) => {
            sim.load_scenario(ScenarioConfig::load(path)?);
            None
        }
        None => {
            let preset = args.preset.unwrap_or_default();
            sim.load_preset(preset);
            Some(preset)
        }
    };

    let (gfx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Gravity Sandbox - Rust/wgpu",
        args.width,
        args.height,
    ))?;

    let mut app = App::new(gfx, Sandbox::new(sim, &config, preset));

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.egui.on_window_event(&app.gfx.window, event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => app.gfx.resize(*size),
                    WindowEvent::CursorMoved { position, .. } => {
                        app.handle_cursor(Vec2::new(position.x as f32, position.y as f32));
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        // Releases always reach the app so drags end cleanly
                        if !consumed || *state == ElementState::Released {
                            app.handle_mouse_button(*button, *state);
                        }
                    }
                    WindowEvent::MouseWheel { delta, .. } if !consumed => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => *y * 40.0,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                        };
                        // Larger fov magnifies; wheel up narrows it and zooms out
                        app.sandbox.camera.zoom(-scroll);
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } if !app.egui.wants_keyboard() => app.sandbox.handle_key(*key, *state),
                    WindowEvent::RedrawRequested => {
                        app.sandbox.update();
                        match app.render() {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost) => app.gfx.resize(app.gfx.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Surface out of memory, exiting");
                                elwt.exit();
                            }
                            Err(e) => log::warn!("Render error: {e:?}"),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => app.gfx.window.request_redraw(),
            _ => {}
        }
    })?;

    Ok(())
}
