use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use unveil_core::AppConfig;
use unveil_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, Action},
    load_theme,
    widgets::{IntroOverlayWidget, PageWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>, no_intro: bool) -> Result<()> {
    let config = if no_intro && config.intro.enabled {
        let mut config = (*config).clone();
        config.intro.enabled = false;
        Arc::new(config)
    } else {
        config
    };

    // Load theme from config
    let theme = load_theme(&config.ui.theme);

    // Build the page before touching the terminal so mount errors print normally
    let mut app = App::new(config.clone(), theme)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("unveil"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.unmount();
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &AppConfig,
) -> Result<()> {
    // Create event handler with animation FPS support
    let event_handler = EventHandler::with_animation_fps(
        config.ui.tick_rate_ms,
        config.ui.scroll.animation_fps,
    );

    // Checked at the end of each iteration to pick the next poll interval
    let mut needs_fast_update = true;

    loop {
        let now = Instant::now();
        let size = terminal.size()?;
        // Status bar takes the last row
        app.resize(size.width, size.height.saturating_sub(1));
        app.tick(now);

        // Draw UI
        terminal.draw(|frame| {
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            PageWidget::render(frame, main_layout[0], app, now);
            IntroOverlayWidget::render(frame, main_layout[0], app, now);
            StatusBarWidget::render(frame, main_layout[1], app);
        })?;

        // Handle events (use faster tick rate while anything is moving)
        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app);
                    handle_action(app, action);
                }
                AppEvent::Resize(width, height) => {
                    app.resize(width, height.saturating_sub(1));
                }
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_animation_frame(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(app: &mut App, action: Action) {
    // Clear pending key on any action except PendingG
    if action != Action::PendingG {
        app.clear_pending_key();
    }
    if action != Action::None {
        app.status_message = None;
    }

    match action {
        Action::Quit => {
            app.should_quit = true;
        }
        Action::ScrollDown => app.scroll_lines(1),
        Action::ScrollUp => app.scroll_lines(-1),
        Action::ScrollHalfPageDown => app.scroll_half_page(1),
        Action::ScrollHalfPageUp => app.scroll_half_page(-1),
        Action::ScrollPageDown => app.scroll_page(1),
        Action::ScrollPageUp => app.scroll_page(-1),
        Action::JumpToTop => app.jump_to_top(),
        Action::JumpToBottom => app.jump_to_bottom(),
        Action::PendingG => {
            app.pending_key = Some('g');
        }
        Action::ReplayIntro => {
            app.replay_intro();
            app.set_status("Intro restarted");
        }
        Action::SkipIntro => {
            if app.intro.is_active() {
                app.skip_intro();
                app.set_status("Intro skipped");
            }
        }
        Action::None => {}
    }
}
