use super::App;
use crate::controller::SessionEvent;
use crate::event_handler::EventHandler;
use palaver_core::logging;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Result;
use std::{panic, time::Duration};

pub async fn run(app: &mut App) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    logging::pause_stderr(true);

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let backend = CrosstermBackend::new(std::io::stdout());
        if let Ok(mut terminal) = Terminal::new(backend) {
            let _ = terminal.show_cursor();
        }
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);
        logging::pause_stderr(false);
        original_hook(panic_info);
    }));

    terminal.clear()?;
    let size = terminal.size()?;
    app.controller
        .handle_event(SessionEvent::Resize { width: size.width, height: size.height })
        .await;
    app.draw(&mut terminal)?;
    tracing::info!("session started");

    while !app.should_exit() {
        let tui_poll = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            EventHandler::read()
        };

        tokio::select! {
            maybe_event = tui_poll => {
                match maybe_event {
                    Some(event) => {
                        app.handle_terminal_event(event).await;
                        app.draw(&mut terminal)?;
                    }
                    // keep the spinner moving
                    None if app.controller().state().is_loading() => app.draw(&mut terminal)?,
                    None => {}
                }
            }
            event = app.controller.next_completion_event() => {
                app.controller.handle_event(event).await;
                app.draw(&mut terminal)?;
            }
        }
    }

    app.controller.shutdown();
    tracing::info!("session ended");

    terminal.show_cursor()?;
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    logging::pause_stderr(false);

    Ok(())
}
