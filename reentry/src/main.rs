//! Reentry simulator
//!
//! Computes a full descent profile from the entry conditions and plays it
//! back over the trajectory plot.
//!
//! Controls:
//! - Space: Play/pause playback
//! - R: Restart playback
//! - End: Skip to the outcome

use anyhow::Context as _;
use clap::Parser;
use common::{
    draw_equations_sidebar, draw_sparkline, init_logging, load_or_default, EguiLayer,
    FrameBlitter, GraphicsContext,
};
use egui::{Color32, RichText};
use reentry::equations_ui::{REENTRY_EQUATIONS, REENTRY_VARIABLES};
use reentry::renderer::{status_color, ReentryRenderer, CANVAS_HEIGHT, CANVAS_WIDTH};
use reentry::{compute_profile, Playback, ProfileSummary, ReentryParams, ReentryStep};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Instant;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Debug, Parser)]
#[command(name = "reentry", about = "Atmospheric reentry simulator")]
struct Args {
    /// YAML file with entry parameters and playback speed
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ReentryConfig {
    params: ReentryParams,
    /// Profile samples replayed per second
    playback_speed: f32,
}

impl Default for ReentryConfig {
    fn default() -> Self {
        Self {
            params: ReentryParams::default(),
            playback_speed: Playback::default().speed,
        }
    }
}

fn to_color32(color: common::Color) -> Color32 {
    let [r, g, b, a] = common::raster::to_rgba8(color);
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Entry parameters, the profile they produce, and the playback cursor
struct Flight {
    params: ReentryParams,
    profile: Vec<ReentryStep>,
    summary: Option<ProfileSummary>,
    playback: Playback,
}

impl Flight {
    fn new(params: ReentryParams, playback: Playback) -> Self {
        let mut flight = Self {
            params: params.clamped(),
            profile: Vec::new(),
            summary: None,
            playback,
        };
        flight.recompute();
        flight
    }

    fn recompute(&mut self) {
        self.profile = compute_profile(&self.params);
        self.summary = ProfileSummary::from_profile(&self.profile);
        self.playback.restart();
        log::debug!(
            "Profile for {:?}: {} samples",
            self.params,
            self.profile.len()
        );
    }

    fn current(&self) -> Option<&ReentryStep> {
        self.playback
            .index(self.profile.len())
            .and_then(|i| self.profile.get(i))
    }

    fn handle_key(&mut self, key: KeyCode) {
        let len = self.profile.len();
        match key {
            KeyCode::Space => {
                if self.playback.is_finished(len) {
                    self.playback.restart();
                } else {
                    self.playback.toggle();
                }
            }
            KeyCode::KeyR => self.playback.restart(),
            KeyCode::End => self.playback.finish(len),
            _ => {}
        }
    }

    fn ui(&mut self, ctx: &egui::Context) {
        draw_equations_sidebar(ctx, "Atmospheric Reentry", REENTRY_EQUATIONS, REENTRY_VARIABLES);

        egui::SidePanel::left("flight_controls")
            .default_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.parameter_controls(ui);
                    ui.separator();
                    self.playback_controls(ui);
                    ui.separator();
                    self.report(ui);
                });
            });

        egui::TopBottomPanel::bottom("telemetry")
            .resizable(true)
            .default_height(180.0)
            .show(ctx, |ui| self.telemetry(ui));
    }

    fn parameter_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Flight Controls");
        let mut params = self.params;
        ui.add(
            egui::Slider::new(&mut params.entry_angle, 0.5..=10.0)
                .step_by(0.1)
                .text("Entry angle (°)"),
        );
        ui.add(
            egui::Slider::new(&mut params.initial_velocity, 1_000.0..=11_000.0)
                .step_by(100.0)
                .text("Velocity (m/s)"),
        );
        ui.add(
            egui::Slider::new(&mut params.drag_coefficient, 0.1..=3.0)
                .step_by(0.1)
                .text("Drag coeff (Cd)"),
        );
        if params != self.params {
            self.params = params.clamped();
            self.recompute();
        }
    }

    fn playback_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Playback");
        let len = self.profile.len();
        ui.horizontal(|ui| {
            let label = if self.playback.playing { "Pause" } else { "Play" };
            if ui.button(label).clicked() {
                self.handle_key(KeyCode::Space);
            }
            if ui.button("Restart").clicked() {
                self.playback.restart();
            }
            if ui.button("Skip").clicked() {
                self.playback.finish(len);
            }
        });
        ui.add(egui::Slider::new(&mut self.playback.speed, 5.0..=240.0).text("Samples/s"));

        if let Some(mut index) = self.playback.index(len) {
            let slider = egui::Slider::new(&mut index, 0..=len.saturating_sub(1)).text("Sample");
            if ui.add(slider).changed() {
                self.playback.seek(index, len);
            }
        }
    }

    fn report(&self, ui: &mut egui::Ui) {
        ui.heading("Post-Flight Analysis");
        let Some(summary) = self.summary else {
            return;
        };

        egui::Grid::new("report").num_columns(2).show(ui, |ui| {
            ui.label("Outcome");
            ui.label(
                RichText::new(summary.final_status.name())
                    .strong()
                    .color(to_color32(status_color(summary.final_status))),
            );
            ui.end_row();

            ui.label("Max temp");
            let temp_color = if summary.max_temperature > 2_500.0 {
                Color32::RED
            } else {
                Color32::from_rgb(251, 146, 60)
            };
            ui.label(RichText::new(format!("{:.0} °C", summary.max_temperature)).color(temp_color));
            ui.end_row();

            ui.label("Peak g-force");
            let g_color = if summary.max_g_force > 10.0 {
                Color32::RED
            } else {
                Color32::WHITE
            };
            ui.label(RichText::new(format!("{:.1} g", summary.max_g_force)).color(g_color));
            ui.end_row();

            ui.label("Final velocity");
            let v_color = if summary.impact_velocity > 100.0 {
                Color32::RED
            } else {
                Color32::from_rgb(52, 211, 153)
            };
            ui.label(RichText::new(format!("{:.0} m/s", summary.impact_velocity)).color(v_color));
            ui.end_row();

            ui.label("Duration");
            ui.label(format!("{:.1} s", summary.duration));
            ui.end_row();
        });

        if summary.timed_out {
            ui.label(RichText::new("Still airborne at the 600 s limit").small().italics());
        }
    }

    fn telemetry(&self, ui: &mut egui::Ui) {
        if let Some(step) = self.current() {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(step.status.name())
                        .strong()
                        .color(to_color32(status_color(step.status))),
                );
                ui.separator();
                ui.label(format!("t = {:.1} s", step.time));
                ui.separator();
                ui.label(format!("Alt {:.0} m", step.altitude));
                ui.separator();
                ui.label(format!("Vel {:.0} m/s", step.velocity));
                ui.separator();
                ui.label(format!("Temp {:.0} °C", step.temperature));
                ui.separator();
                ui.label(format!("{:.2} g", step.g_force));
                ui.separator();
                ui.label(format!("ρ {:.2e} kg/m³", step.density));
            });
        }

        let series = |f: fn(&ReentryStep) -> f64| -> Vec<f32> {
            self.profile.iter().map(|s| f(s) as f32).collect()
        };
        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Altitude").color(Color32::from_rgb(6, 182, 212)));
            draw_sparkline(&mut cols[0], &series(|s| s.altitude), 50.0, Color32::from_rgb(6, 182, 212));
            cols[0].label(RichText::new("Velocity").color(Color32::from_rgb(59, 130, 246)));
            draw_sparkline(&mut cols[0], &series(|s| s.velocity), 50.0, Color32::from_rgb(59, 130, 246));

            cols[1].label(RichText::new("Temperature").color(Color32::from_rgb(249, 115, 22)));
            draw_sparkline(&mut cols[1], &series(|s| s.temperature), 50.0, Color32::from_rgb(249, 115, 22));
            cols[1].label(RichText::new("G-force").color(Color32::from_rgb(168, 85, 247)));
            draw_sparkline(&mut cols[1], &series(|s| s.g_force), 50.0, Color32::from_rgb(168, 85, 247));
        });
    }
}

struct App {
    gfx: GraphicsContext,
    blitter: FrameBlitter,
    egui: EguiLayer,
    renderer: ReentryRenderer,
    flight: Flight,
}

impl App {
    fn new(gfx: GraphicsContext, flight: Flight) -> Self {
        let blitter = FrameBlitter::new(&gfx, CANVAS_WIDTH, CANVAS_HEIGHT);
        let egui = EguiLayer::new(&gfx);
        Self {
            gfx,
            blitter,
            egui,
            renderer: ReentryRenderer::default(),
            flight,
        }
    }

    fn update(&mut self, dt: f32) {
        self.flight.playback.advance(dt, self.flight.profile.len());
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gfx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let flight = &mut self.flight;
        let full_output = self.egui.run(&self.gfx.window, |ctx| flight.ui(ctx));

        let cursor = self.flight.playback.index(self.flight.profile.len());
        self.renderer.render(&self.flight.profile, cursor);
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

    let config: ReentryConfig =
        load_or_default(args.config.as_deref()).context("loading reentry configuration")?;
    let flight = Flight::new(config.params, Playback::new(config.playback_speed));

    let (gfx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Reentry Simulator - Rust/wgpu",
        args.width,
        args.height,
    ))?;

    let mut app = App::new(gfx, flight);
    let mut last_time = Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                app.egui.on_window_event(&app.gfx.window, event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => app.gfx.resize(*size),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    } if !app.egui.wants_keyboard() => app.flight.handle_key(*key),
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = (now - last_time).as_secs_f32().min(0.1);
                        last_time = now;

                        app.update(dt);
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
