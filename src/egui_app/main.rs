/**
 * wachat Desktop App - Main Entry Point
 *
 * Sets up logging, loads the configuration, starts the tokio runtime the
 * sync components run on, and hands the window to eframe.
 */
use eframe::egui;
use std::time::Duration;
use tokio::runtime::Runtime;
use wachat::egui_app::theme::styles;
use wachat::egui_app::{views, AppContext, AppState, Config};

/// Idle repaint period, so polled data shows up without input events
const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "wachat=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("[STARTUP] Invalid configuration, using defaults: {}", e);
            Config::default()
        }
    };
    tracing::info!("[STARTUP] Backend at {}", config.server_url());

    let runtime = Runtime::new()?;
    let ctx = AppContext::http(config);
    let mut state = AppState::new(ctx, runtime.handle().clone());
    state.restore_session();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "wachat",
        options,
        Box::new(|cc| {
            styles::apply_global_theme(&cc.egui_ctx);
            Ok(Box::new(WachatApp { state }))
        }),
    )?;
    Ok(())
}

struct WachatApp {
    state: AppState,
}

impl eframe::App for WachatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.check_auth_result();

        views::render_top_bar(ctx, &mut self.state);
        views::render_main_panel(ctx, &mut self.state);
        views::render_snackbar(ctx, &self.state.snackbar);

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
