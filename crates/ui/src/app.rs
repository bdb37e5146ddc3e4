mod event_loop;
mod rendering;

pub use rendering::draw_view;

use crate::controller::{SessionController, Transition};
use crate::event_handler::EventHandler;
use crossterm::event::Event;
use ratatui::{Terminal, backend::Backend};

/// Terminal front end for a [`SessionController`]
pub struct App {
    controller: SessionController,
    /// Spinner frame counter, advanced on each draw while a request is in flight
    tick: usize,
}

impl App {
    pub fn new(controller: SessionController) -> Self {
        Self { controller, tick: 0 }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn should_exit(&self) -> bool {
        self.controller.should_exit()
    }

    /// Run until the user quits
    pub async fn run(&mut self) -> std::io::Result<()> {
        event_loop::run(self).await
    }

    /// Feed one terminal event through the key map into the controller
    pub async fn handle_terminal_event(&mut self, event: Event) -> Option<Transition> {
        let session_event = EventHandler::handle_event(&event, self.controller.mode())?;
        Some(self.controller.handle_event(session_event).await)
    }

    /// Draw the current state
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), B::Error> {
        if self.controller.state().is_loading() {
            self.tick = self.tick.wrapping_add(1);
        }
        let state = self.controller.state();
        let tick = self.tick;
        terminal.draw(|frame| draw_view(frame, state, tick))?;
        Ok(())
    }
}
