//! Wave optics visualizer
//!
//! Interference of coherent point sources, sampled per pixel every frame.
//!
//! Controls:
//! - Left click: Place a measurement probe (when measuring)
//! - Space: Pause/resume
//! - M: Toggle measure mode
//! - C: Clear measurements
//! - W: Toggle wavefronts
//! - L: Toggle ruler
//! - 1/2/3/4: Double slit, single slit, grating, circular

use anyhow::Context as _;
use clap::Parser;
use common::{draw_equations_sidebar, draw_sparkline, init_logging, load_or_default};
use common::{EguiLayer, FrameBlitter, GraphicsContext};
use egui::{Color32, RichText};
use glam::Vec2;
use serde::Deserialize;
use std::path::PathBuf;
use wave_optics::equations_ui::{WAVE_EQUATIONS, WAVE_VARIABLES};
use wave_optics::field::CANVAS_SIZE;
use wave_optics::optics::InterferenceKind;
use wave_optics::renderer::{OverlayOptions, WaveRenderer};
use wave_optics::{ColorMode, DiffractionSample, Preset, SimMode, WaveConfig, WaveOptics};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Debug, Parser)]
#[command(name = "wave_optics", about = "Wave interference and diffraction visualizer")]
struct Args {
    /// YAML file with wave and overlay settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting preset: young, wide, high, grating, single, circular or laser
    #[arg(long)]
    preset: Option<Preset>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct OpticsConfig {
    wave: WaveConfig,
    overlays: OverlayOptions,
}

/// Engine state plus everything the control panel edits
struct Lab {
    optics: WaveOptics,
    overlays: OverlayOptions,
    measuring: bool,
    intensity_line: Vec<f32>,
    diffraction: Vec<DiffractionSample>,
}

impl Lab {
    fn new(optics: WaveOptics, overlays: OverlayOptions) -> Self {
        let diffraction = optics.sample_diffraction();
        Self {
            optics,
            overlays,
            measuring: false,
            intensity_line: Vec::new(),
            diffraction,
        }
    }

    fn configure(&mut self, config: WaveConfig) {
        if config != *self.optics.config() {
            self.optics.configure(config);
            self.diffraction = self.optics.sample_diffraction();
        }
    }

    fn apply_preset(&mut self, preset: Preset) {
        self.optics.apply_preset(preset);
        self.diffraction = self.optics.sample_diffraction();
    }

    fn set_mode(&mut self, mode: SimMode) {
        self.configure(WaveConfig {
            mode,
            ..*self.optics.config()
        });
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Space => self.optics.paused = !self.optics.paused,
            KeyCode::KeyM => self.measuring = !self.measuring,
            KeyCode::KeyC => self.optics.clear_measurements(),
            KeyCode::KeyW => self.overlays.show_wavefronts = !self.overlays.show_wavefronts,
            KeyCode::KeyL => self.overlays.show_ruler = !self.overlays.show_ruler,
            KeyCode::Digit1 => self.set_mode(SimMode::DoubleSlit),
            KeyCode::Digit2 => self.set_mode(SimMode::SingleSlit),
            KeyCode::Digit3 => self.set_mode(SimMode::Grating),
            KeyCode::Digit4 => self.set_mode(SimMode::Circular),
            _ => {}
        }
    }

    fn ui(&mut self, ctx: &egui::Context) {
        draw_equations_sidebar(ctx, "Wave Optics", WAVE_EQUATIONS, WAVE_VARIABLES);

        egui::SidePanel::left("controls")
            .default_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.wave_controls(ui);
                    ui.separator();
                    self.tools(ui);
                    ui.separator();
                    self.display_controls(ui);
                });
            });

        egui::TopBottomPanel::bottom("analysis")
            .resizable(true)
            .default_height(200.0)
            .show(ctx, |ui| self.analysis(ui));
    }

    fn wave_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Wave Controls");
        let mut config = *self.optics.config();

        ui.horizontal_wrapped(|ui| {
            for mode in SimMode::ALL {
                ui.selectable_value(&mut config.mode, mode, mode.label());
            }
        });

        ui.add(egui::Slider::new(&mut config.frequency, 5.0..=100.0).step_by(1.0).text("Frequency (Hz)"));
        ui.add(egui::Slider::new(&mut config.separation, 10.0..=200.0).step_by(1.0).text("Separation (px)"));
        ui.add(egui::Slider::new(&mut config.phase_deg, 0.0..=360.0).step_by(15.0).text("Phase (°)"));
        ui.add(egui::Slider::new(&mut config.amplitude, 0.1..=2.0).step_by(0.1).text("Amplitude"));
        match config.mode {
            SimMode::Grating => {
                ui.add(egui::Slider::new(&mut config.source_count, 2..=10).text("Slits"));
            }
            SimMode::SingleSlit => {
                ui.add(egui::Slider::new(&mut config.slit_width, 5.0..=50.0).step_by(1.0).text("Slit width (px)"));
            }
            _ => {}
        }
        ui.add(egui::Slider::new(&mut config.speed, 0.0..=3.0).step_by(0.1).text("Speed"));
        self.configure(config);

        let label = if self.optics.paused { "▶ Play" } else { "⏸ Pause" };
        if ui.button(label).clicked() {
            self.optics.paused = !self.optics.paused;
        }

        ui.label(RichText::new("Presets").strong());
        ui.horizontal_wrapped(|ui| {
            for preset in Preset::ALL {
                if ui.button(preset.label()).clicked() {
                    self.apply_preset(preset);
                }
            }
        });
    }

    fn tools(&mut self, ui: &mut egui::Ui) {
        ui.heading("Measurement Tools");
        ui.checkbox(&mut self.measuring, "Measure mode (click field)");
        ui.checkbox(&mut self.overlays.show_ruler, "Show ruler");
        ui.checkbox(&mut self.overlays.show_wavefronts, "Wavefronts");
        ui.checkbox(&mut self.overlays.show_intensity_line, "Intensity line");

        if self.optics.measurements().is_empty() {
            return;
        }
        ui.horizontal(|ui| {
            ui.label(RichText::new("Readings").color(Color32::YELLOW));
            if ui.small_button("Clear").clicked() {
                self.optics.clear_measurements();
            }
        });
        for (i, point) in self.optics.measurements().iter().enumerate() {
            ui.label(
                RichText::new(format!(
                    "#{}: I={:.3}  φ={:.0}%  ({:.0}, {:.0})",
                    i + 1,
                    point.value,
                    point.phase_percent,
                    point.position.x,
                    point.position.y
                ))
                .monospace()
                .small(),
            );
        }
    }

    fn display_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Display");
        let mut config = *self.optics.config();
        ui.horizontal_wrapped(|ui| {
            for mode in ColorMode::ALL {
                ui.selectable_value(&mut config.color_mode, mode, mode.label());
            }
        });
        self.configure(config);
    }

    fn analysis(&self, ui: &mut egui::Ui) {
        let stats = self.optics.stats();
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(self.optics.config().mode.label()).strong());
            ui.separator();
            ui.label(format!("λ = {:.1} px", stats.wavelength));
            ui.separator();
            ui.label(format!("Δ(30°) = {:.1} px", stats.path_difference));
            if let Some(spacing) = stats.fringe_spacing {
                ui.separator();
                ui.label(format!("Fringe spacing = {spacing:.1} px"));
            }
            ui.separator();
            let color = match stats.interference {
                InterferenceKind::Constructive => Color32::from_rgb(52, 211, 153),
                InterferenceKind::Destructive => Color32::from_rgb(251, 113, 133),
                InterferenceKind::Mixed => Color32::YELLOW,
            };
            ui.label(RichText::new(stats.interference.label()).color(color));
        });
        if !stats.maxima_deg.is_empty() {
            let maxima: Vec<String> = stats.maxima_deg.iter().take(7).map(|a| format!("{a:.1}°")).collect();
            ui.label(format!("Maxima: {}", maxima.join("  ")));
        }

        // Shift the signed profile so the sparkline baseline is the trough
        let amplitude = self.optics.config().amplitude;
        let profile: Vec<f32> = self
            .intensity_line
            .iter()
            .map(|v| v + amplitude)
            .collect();
        let pattern: Vec<f32> = self.diffraction.iter().map(|s| s.intensity as f32).collect();

        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Intensity Profile").color(Color32::from_rgb(34, 211, 238)));
            draw_sparkline(&mut cols[0], &profile, 90.0, Color32::from_rgb(34, 211, 238));
            cols[1].label(RichText::new("Theoretical Pattern (−90°…90°)").color(Color32::from_rgb(168, 85, 247)));
            draw_sparkline(&mut cols[1], &pattern, 90.0, Color32::from_rgb(168, 85, 247));
        });
    }
}

struct App {
    gfx: GraphicsContext,
    blitter: FrameBlitter,
    egui: EguiLayer,
    renderer: WaveRenderer,
    lab: Lab,
    cursor: Option<Vec2>,
}

impl App {
    fn new(gfx: GraphicsContext, lab: Lab) -> Self {
        let blitter = FrameBlitter::new(&gfx, CANVAS_SIZE, CANVAS_SIZE);
        let egui = EguiLayer::new(&gfx);
        Self {
            gfx,
            blitter,
            egui,
            renderer: WaveRenderer::new(),
            lab,
            cursor: None,
        }
    }

    fn handle_click(&mut self) {
        if !self.lab.measuring {
            return;
        }
        if let Some(point) = self.cursor.and_then(|c| self.blitter.to_frame_coords(c)) {
            self.lab.optics.measure_at(point.floor());
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gfx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.lab.optics.advance();
        let field = self.lab.optics.sample_field(self.lab.optics.time());
        self.lab.intensity_line = self.lab.optics.intensity_line(&field);

        let lab = &mut self.lab;
        let full_output = self.egui.run(&self.gfx.window, |ctx| lab.ui(ctx));

        self.renderer.render(&self.lab.optics, &field, &self.lab.overlays);
        self.blitter.upload(&self.gfx, self.renderer.frame());

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.blitter
            .render(&mut encoder, &view, self.egui.free_area());
        self.egui.paint(&self.gfx, &mut encoder, &view, full_output);

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config: OpticsConfig =
        load_or_default(args.config.as_deref()).context("loading wave optics configuration")?;
    let mut optics = WaveOptics::new(config.wave);
    if let Some(preset) = args.preset {
        optics.apply_preset(preset);
    }

    let (gfx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Wave Optics - Rust/wgpu",
        args.width,
        args.height,
    ))?;

    let mut app = App::new(gfx, Lab::new(optics, config.overlays));

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.egui.on_window_event(&app.gfx.window, event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => app.gfx.resize(*size),
                    WindowEvent::CursorMoved { position, .. } => {
                        app.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
                    }
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    } if !consumed => app.handle_click(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    } if !app.egui.wants_keyboard() => app.lab.handle_key(*key),
                    WindowEvent::RedrawRequested => match app.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost) => app.gfx.resize(app.gfx.size),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Surface out of memory, exiting");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("Render error: {e:?}"),
                    },
                    _ => {}
                }
            }
            Event::AboutToWait => app.gfx.window.request_redraw(),
            _ => {}
        }
    })?;

    Ok(())
}
