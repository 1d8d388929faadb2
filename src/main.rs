mod config;
mod core;
mod error;
mod input;
mod playback;
mod session;
mod ui;

use anyhow::{Context as _, Result};
use config::AppSettings;
use crate::core::{DayLabel, Route};
use session::{ControlAction, TrackingSession};
use ui::{AboutDialog, ControlsWindow, FileDialogs, MapFrame, MapView, PanelFrame, VehicleInfoPanel};
use imgui::{Context, FontConfig, FontSource};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use tokio::runtime::Handle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use glutin::prelude::*;
use glutin::display::GetGlDisplay;
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use glow::HasContext;

use std::ffi::CString;
use std::path::Path;
use std::time::Instant;

struct AppState {
    session: TrackingSession,
    settings: AppSettings,
    controls: ControlsWindow,
    map_view: MapView,
    info_panel: VehicleInfoPanel,
    about_dialog: AboutDialog,
    show_controls: bool,
    show_map: bool,
    show_route_open_pending: bool,
    show_days_open_pending: bool,
    status_message: Option<String>,
}

impl AppState {
    fn new(runtime: Handle) -> Result<Self> {
        let settings = AppSettings::load();

        let route = initial_route(&settings)?;
        let days = initial_days(&settings)?;
        info!(points = route.len(), days = days.len(), "Route data ready");

        let session = TrackingSession::new(
            route,
            days,
            settings.playback_config(),
            settings.battery_percent,
            runtime,
        );

        let mut state = Self {
            session,
            controls: ControlsWindow::new(),
            map_view: MapView::new(),
            info_panel: VehicleInfoPanel::new(),
            about_dialog: AboutDialog::new(),
            show_controls: settings.show_controls,
            show_map: settings.show_map,
            show_route_open_pending: false,
            show_days_open_pending: false,
            status_message: None,
            settings,
        };
        if !state.settings.show_track {
            state.session.apply(ControlAction::ToggleTrack);
        }
        Ok(state)
    }

    fn save_settings(&mut self) {
        self.settings.show_track = self.session.show_track();
        self.settings.show_controls = self.show_controls;
        self.settings.show_map = self.show_map;
        self.settings.step_interval_ms = self.session.snapshot().step_interval_ms;
        if let Err(e) = self.settings.save() {
            warn!("Failed to save settings: {:#}", e);
        }
    }

    fn load_route_file(&mut self, path: &Path) {
        match input::load_route(path) {
            Ok(route) => {
                let count = route.len();
                self.session.replace_route(route);
                self.settings.route_file = Some(path.to_path_buf());
                self.status_message = Some(format!("Loaded route with {} points", count));
                info!("Loaded route {} ({} points)", path.display(), count);
            }
            Err(e) => {
                // Keep playing the current route
                self.status_message = Some(format!("Failed to load route: {}", e));
                error!("Failed to load route {}: {}", path.display(), e);
            }
        }
    }

    fn load_days_file(&mut self, path: &Path) {
        match input::load_days(path) {
            Ok(days) => {
                self.status_message = Some(format!("Loaded {} day labels", days.len()));
                self.session.replace_days(days);
                self.settings.days_file = Some(path.to_path_buf());
            }
            Err(e) => {
                self.status_message = Some(format!("Failed to load day list: {}", e));
                error!("Failed to load day list {}: {}", path.display(), e);
            }
        }
    }

    fn reset_to_builtin_route(&mut self) {
        match input::builtin_route() {
            Ok(route) => {
                self.session.replace_route(route);
                self.settings.route_file = None;
                self.status_message = Some("Using built-in route".to_string());
            }
            Err(e) => error!("Built-in route is invalid: {}", e),
        }
    }

    fn process_file_dialogs(&mut self) {
        if self.show_route_open_pending {
            if let Some(path) = FileDialogs::open_route_file() {
                self.load_route_file(&path);
            }
            self.show_route_open_pending = false;
        }

        if self.show_days_open_pending {
            if let Some(path) = FileDialogs::open_days_file() {
                self.load_days_file(&path);
            }
            self.show_days_open_pending = false;
        }
    }

    fn status_line(&self) -> String {
        if let Some(ref msg) = self.status_message {
            return msg.clone();
        }
        let snap = self.session.snapshot();
        let dest = snap
            .destination_index
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "Points: {} | Position: {} | Destination: {} | {:?} | {}",
            self.session.route_len(),
            snap.current_index,
            dest,
            snap.status,
            snap.speed_label()
        )
    }
}

/// Route from the settings file, or the built-in one if that fails
fn initial_route(settings: &AppSettings) -> Result<Route> {
    if let Some(path) = &settings.route_file {
        match input::load_route(path) {
            Ok(route) => return Ok(route),
            Err(e) => warn!("Falling back to built-in route: {}", e),
        }
    }
    input::builtin_route().context("Built-in route is invalid")
}

fn initial_days(settings: &AppSettings) -> Result<Vec<DayLabel>> {
    if let Some(path) = &settings.days_file {
        match input::load_days(path) {
            Ok(days) => return Ok(days),
            Err(e) => warn!("Falling back to built-in day list: {}", e),
        }
    }
    input::builtin_days().context("Built-in day list is invalid")
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Runtime for the playback timer
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

    let event_loop = EventLoop::new().context("Failed to create EventLoop")?;

    // Build the window and GL display using glutin-winit
    let (window, gl_config) = DisplayBuilder::new()
        .with_window_builder(Some(
            WindowBuilder::new()
                .with_title("Vehicle Tracker")
                .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0))
        ))
        .build(&event_loop, glutin::config::ConfigTemplateBuilder::new(), |mut iter| {
            iter.next().expect("No GL config available")
        })
        .map_err(|e| anyhow::anyhow!("Failed to create window and display: {}", e))?;

    let window = window.context("Failed to create window")?;
    let gl_display = gl_config.display();

    let context = unsafe {
        gl_display.create_context(
            &gl_config,
            &glutin::context::ContextAttributesBuilder::new()
                .build(Some(window.raw_window_handle())),
        )
    }.context("Failed to create GL context")?;

    let attrs = window.build_surface_attributes(
        glutin::surface::SurfaceAttributesBuilder::<glutin::surface::WindowSurface>::new()
    );

    let surface = unsafe {
        gl_display.create_window_surface(&gl_config, &attrs)
    }.context("Failed to create surface")?;

    let context = context.make_current(&surface).context("Failed to make context current")?;

    let load_gl = || unsafe {
        glow::Context::from_loader_function(|name| {
            CString::new(name)
                .map(|s| gl_display.get_proc_address(&s) as *const _)
                .unwrap_or(std::ptr::null())
        })
    };
    let gl = load_gl();
    // Second context for clearing (both reference the same GL context)
    let gl_clear = load_gl();

    let mut imgui = Context::create();
    imgui.set_log_filename(None::<std::path::PathBuf>);

    // Window layout lives next to the settings file
    if let Some(dir) = config::config_dir() {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Cannot create config dir {}: {}", dir.display(), e);
        }
        imgui.set_ini_filename(Some(dir.join("layout.ini")));
    }

    imgui.io_mut().config_flags |= imgui::ConfigFlags::DOCKING_ENABLE;

    let hidpi_factor = window.scale_factor();
    let font_size = (14.0 * hidpi_factor) as f32;
    imgui.fonts().add_font(&[FontSource::DefaultFontData {
        config: Some(FontConfig {
            size_pixels: font_size,
            ..FontConfig::default()
        }),
    }]);
    imgui.io_mut().font_global_scale = (1.0 / hidpi_factor) as f32;

    let mut platform = WinitPlatform::init(&mut imgui);
    platform.attach_window(imgui.io_mut(), &window, HiDpiMode::Default);

    let mut renderer = imgui_glow_renderer::AutoRenderer::initialize(gl, &mut imgui)
        .map_err(|e| anyhow::anyhow!("Failed to initialize renderer: {:?}", e))?;

    let mut state = AppState::new(rt.handle().clone())?;
    let mut last_frame_time = Instant::now();
    let mut last_settings_save = Instant::now();

    event_loop.run(move |event, window_target| {
        match event {
            Event::NewEvents(_) => {
                let now = Instant::now();
                imgui.io_mut().update_delta_time(now - last_frame_time);
                last_frame_time = now;
            }
            Event::AboutToWait => {
                state.process_file_dialogs();

                // Save settings periodically (every 30 seconds)
                if last_settings_save.elapsed().as_secs() >= 30 {
                    state.save_settings();
                    last_settings_save = Instant::now();
                }

                if let Err(e) = platform.prepare_frame(imgui.io_mut(), &window) {
                    error!("Failed to prepare frame: {}", e);
                }
                window.request_redraw();
            }
            Event::WindowEvent { event: WindowEvent::RedrawRequested, .. } => {
                let ui = imgui.new_frame();
                let mut actions: Vec<ControlAction> = Vec::new();

                // Menu bar
                ui.main_menu_bar(|| {
                    ui.menu("File", || {
                        if ui.menu_item("Open Route...") {
                            state.show_route_open_pending = true;
                        }
                        if ui.menu_item("Open Day List...") {
                            state.show_days_open_pending = true;
                        }
                        if ui.menu_item("Reset to Built-in Route") {
                            state.reset_to_builtin_route();
                        }
                        ui.separator();
                        if ui.menu_item("Exit") {
                            state.save_settings();
                            window_target.exit();
                        }
                    });

                    ui.menu("Playback", || {
                        if ui.menu_item("Play") {
                            actions.push(ControlAction::Play);
                        }
                        if ui.menu_item("Stop") {
                            actions.push(ControlAction::Stop);
                        }
                        if ui.menu_item("Replay") {
                            actions.push(ControlAction::Replay);
                        }
                        if ui.menu_item("Speed Up") {
                            actions.push(ControlAction::SpeedUp);
                        }
                        if ui.menu_item("Restart Session") {
                            state.session.restart();
                        }
                        ui.separator();
                        ui.text(format!("Speed: {}", state.session.snapshot().speed_label()));
                    });

                    ui.menu("View", || {
                        if ui.menu_item_config("Show Track").selected(state.session.show_track()).build() {
                            actions.push(ControlAction::ToggleTrack);
                        }
                        ui.separator();
                        if ui.menu_item_config("Controls").selected(state.show_controls).build() {
                            state.show_controls = !state.show_controls;
                        }
                        if ui.menu_item_config("Map").selected(state.show_map).build() {
                            state.show_map = !state.show_map;
                        }
                        if ui.menu_item_config("Vehicle Info").selected(state.session.show_panel()).build() {
                            actions.push(if state.session.show_panel() {
                                ControlAction::ClosePanel
                            } else {
                                ControlAction::OpenPanel
                            });
                        }
                    });

                    ui.menu("Help", || {
                        if ui.menu_item("About Vehicle Tracker") {
                            state.about_dialog.show();
                        }
                    });
                });

                // Status bar
                let window_size = window.inner_size();
                let logical_w = window_size.width as f32 / hidpi_factor as f32;
                let logical_h = window_size.height as f32 / hidpi_factor as f32;
                ui.set_cursor_pos([0.0, logical_h - 25.0]);
                ui.child_window("Status")
                    .size([logical_w, 25.0])
                    .build(|| {
                        ui.text(state.status_line());
                    });

                ui.dockspace_over_main_viewport();

                let snapshot = state.session.snapshot();

                if state.show_controls {
                    actions.extend(state.controls.render(
                        ui,
                        &snapshot,
                        state.session.show_track(),
                        &mut state.show_controls,
                    ));
                }

                if state.show_map {
                    let show_track = state.session.show_track();
                    let map_view = &mut state.map_view;
                    let show_map = &mut state.show_map;
                    let clicked = state.session.player().with_engine(|engine| {
                        let route = engine.route();
                        let frame = MapFrame {
                            route: route.points(),
                            bounds: route.bounds(),
                            trail: show_track.then(|| engine.path_so_far()),
                            vehicle: engine.current_point(),
                            destination: engine.destination().map(|d| route.point(d)),
                        };
                        map_view.render(ui, &frame, show_map)
                    });
                    actions.extend(clicked);
                }

                if state.session.show_panel() {
                    let info = state.session.vehicle_info();
                    let frame = PanelFrame {
                        info: &info,
                        route_len: state.session.route_len(),
                        destination: snapshot.destination_index,
                        days: state.session.days(),
                        selected_day: state.session.selected_day(),
                    };
                    let panel_actions = state.info_panel.render(ui, &frame);
                    actions.extend(panel_actions);
                }

                state.about_dialog.render(ui);

                for action in actions {
                    // Any control clears the last load message
                    state.status_message = None;
                    state.session.apply(action);
                }

                // Prepare and render
                platform.prepare_render(ui, &window);
                let draw_data = imgui.render();

                unsafe {
                    gl_clear.clear_color(0.1, 0.1, 0.1, 1.0);
                    gl_clear.clear(glow::COLOR_BUFFER_BIT);
                }

                if let Err(e) = renderer.render(draw_data) {
                    error!("Rendering failed: {:?}", e);
                    window_target.exit();
                }

                if let Err(e) = surface.swap_buffers(&context) {
                    error!("Failed to swap buffers: {}", e);
                }
            }
            Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => {
                state.save_settings();
                window_target.exit();
            }
            _ => {}
        }

        platform.handle_event(imgui.io_mut(), &window, &event);
    }).context("EventLoop error")?;

    Ok(())
}
