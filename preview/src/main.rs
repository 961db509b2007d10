//! Desktop preview for myrtio-strip-controller
//!
//! Runs the controller against real sockets and paints every registered
//! strip in a window. Send commands with
//! `curl 'http://localhost:8080/set?d=desk&c=c&v=00ffff'` or raw UDP
//! datagrams to port 8000.

mod net;

use std::time::Instant as StdInstant;

use eframe::egui::{self};
use myrtio_strip_controller::controller::TASKS;
use myrtio_strip_controller::{
    ControllerConfig, DeviceId, Instant, LightController, MemoryStorage, OutputDriver, Rgb,
};

use crate::net::{HttpServer, UdpTransport};

/// Maximum number of LEDs per strip
const MAX_LEDS: usize = 120;

/// Number of simulated strips
const DEVICES: usize = 3;

/// Simulated strips as `(leds, name)`
const STRIPS: [(usize, Option<&str>); DEVICES] =
    [(60, Some("desk")), (30, Some("shelf")), (120, None)];

/// Unprivileged port for the text protocol
const PREVIEW_HTTP_PORT: u16 = 8080;

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 12.0;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

type PreviewController = LightController<
    FrameBuffer,
    MemoryStorage<{ DEVICES * 3 }>,
    HttpServer,
    UdpTransport,
    DEVICES,
    MAX_LEDS,
>;

/// Output driver keeping the last written frame for painting
#[derive(Default)]
struct FrameBuffer {
    frame: Vec<Rgb>,
}

impl OutputDriver for FrameBuffer {
    fn write(&mut self, colors: &[Rgb]) {
        self.frame.clear();
        self.frame.extend_from_slice(colors);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ControllerConfig {
        http_port: PREVIEW_HTTP_PORT,
        ..ControllerConfig::default()
    };
    let requests = HttpServer::bind(config.http_port)?;
    let datagrams = UdpTransport::bind(config.datagram_port)?;

    let mut controller =
        PreviewController::new(MemoryStorage::new(), requests, datagrams, config);
    for (leds, name) in STRIPS {
        controller
            .register_device(FrameBuffer::default(), leds, name)
            .map_err(|e| format!("registering strip failed: {e:?}"))?;
    }
    controller
        .start(Instant::from_millis(0))
        .map_err(|e| format!("starting controller failed: {e:?}"))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 400.0])
            .with_title("Strip Controller Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "myrtio-strip-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new(controller)))),
    )?;
    Ok(())
}

struct PreviewApp {
    controller: PreviewController,
    /// Wall-clock origin of the controller time base
    started: StdInstant,
    /// LED pixel size for display
    led_size: f32,
}

impl PreviewApp {
    fn new(controller: PreviewController) -> Self {
        Self {
            controller,
            started: StdInstant::now(),
            led_size: LED_SIZE,
        }
    }

    fn now(&self) -> Instant {
        #[allow(clippy::cast_possible_truncation)]
        let ms = self.started.elapsed().as_millis() as u64;
        Instant::from_millis(ms)
    }

    /// Run every task that is due
    fn run_due_tasks(&mut self) {
        let now = self.now();
        for _ in 0..=TASKS {
            self.controller.tick(now);
        }
    }

    fn toggle(&mut self, id: DeviceId) {
        if let Err(e) = self.controller.registry_mut().toggle(id) {
            eprintln!("preview: toggle of device {id} failed: {e:?}");
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_due_tasks();

        // Sockets are polled from the UI loop
        ctx.request_repaint();

        let mut toggled = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Size: ");
                ui.add(egui::Slider::new(&mut self.led_size, 4.0..=32.0));
                ui.add_space(16.0);
                let config = self.controller.config();
                ui.label(format!(
                    "http :{}  udp :{}",
                    config.http_port, config.datagram_port
                ));
            });

            ui.add_space(16.0);

            let available_width = ui.available_width();
            let led_pitch = self.led_size + LED_GAP;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let leds_per_row = (available_width / led_pitch).floor().max(1.0) as usize;

            for device in self.controller.registry().iter() {
                ui.horizontal(|ui| {
                    if ui.button("⏻").clicked() {
                        toggled = Some(device.id());
                    }
                    ui.monospace(device.info().to_string());
                    if let Some(name) = device.name() {
                        ui.label(name);
                    }
                });

                let frame = &device.driver().frame;
                let rows = frame.len().max(1).div_ceil(leds_per_row);
                #[allow(clippy::cast_precision_loss)]
                let height = rows as f32 * led_pitch;

                let (response, painter) = ui.allocate_painter(
                    egui::vec2(available_width, height),
                    egui::Sense::hover(),
                );
                let origin = response.rect.min;

                #[allow(clippy::cast_precision_loss)]
                for (i, pixel) in frame.iter().enumerate() {
                    let row = i / leds_per_row;
                    let col = i % leds_per_row;
                    let x = origin.x + col as f32 * led_pitch;
                    let y = origin.y + row as f32 * led_pitch;

                    let rect = egui::Rect::from_min_size(
                        egui::pos2(x, y),
                        egui::vec2(self.led_size, self.led_size),
                    );
                    let color = egui::Color32::from_rgb(pixel.r, pixel.g, pixel.b);
                    painter.rect_filled(rect, 3.0, color);
                }

                ui.add_space(12.0);
            }
        });

        if let Some(id) = toggled {
            self.toggle(id);
        }
    }
}
