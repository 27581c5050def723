mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;

use controller::AppController;
use model::{AppModel, JsonCatalog, JsonLibraryStore, LibraryStore, Viewport};
use view::AppView;

/// Frame budget for the interaction loop; animations are stepped once per
/// frame.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== swipedeck starting ===");

    // Load the persisted library (liked/discovered sets, statistics)
    let store = Arc::new(JsonLibraryStore::new());
    let library = match store.load().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "Could not load saved library, starting fresh");
            Default::default()
        }
    };

    let mut app_model = AppModel::new();
    app_model.set_store(store.clone());
    let model = Arc::new(Mutex::new(app_model));
    model.lock().await.seed_library(library).await;

    let provider = Arc::new(JsonCatalog::from_env());
    let controller = AppController::new(model.clone(), provider);

    // Fetch the initial deck in the background so the UI comes up
    // immediately; until it lands the stack shows its loading state.
    model.lock().await.set_loading(true).await;
    let controller_for_init = controller.clone();
    tokio::spawn(async move {
        controller_for_init.reload_deck().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller, store).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("swipedeck shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    store: Arc<JsonLibraryStore>,
) -> io::Result<()> {
    loop {
        // Step the in-flight animation and commit finished transitions.
        controller.tick(Instant::now()).await;

        // Surface background persistence failures as a non-blocking notice.
        if let Some(message) = store.take_error().await {
            model.lock().await.set_notice(message).await;
        }

        let size = terminal.size()?;
        controller.set_viewport(Viewport::of_cells(size.width, size.height)).await;

        let deck_view = controller.deck_view().await;
        let (ui_state, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old notices (after 5 seconds)
            model_guard.auto_clear_old_notice().await;

            (model_guard.get_ui_state().await, model_guard.should_quit().await)
        };

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &deck_view, &ui_state);
        })?;

        // Drain all pending input; drags produce bursts of mouse events.
        if event::poll(FRAME_INTERVAL)? {
            loop {
                match event::read()? {
                    Event::Key(key) => {
                        let _ = controller.handle_key_event(key).await;
                    }
                    Event::Mouse(mouse) => {
                        let _ = controller.handle_mouse_event(mouse).await;
                    }
                    Event::Resize(cols, rows) => {
                        controller.set_viewport(Viewport::of_cells(cols, rows)).await;
                    }
                    _ => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
