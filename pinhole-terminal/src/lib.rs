//! Terminal host for the camera-model diagrams
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, warn};
use pinhole_core::AnyController;
use std::io::{self, stdout, Write};

pub mod renderer;

pub use renderer::AsciiSurface;

/// Pixels of simulated drag per arrow key press
const DRAG_STEP: f64 = 20.0;
/// Slider movement per `[` / `]` press
const SLIDER_STEP: f64 = 0.05;

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    Drag(f64, f64),
    Wheel(f64),
    SelectMode(usize),
    NextSlider,
    PreviousSlider,
    NudgeSlider(f64),
    Reset,
}

impl Command {
    /// Map a key to a command; unbound keys yield `None`
    pub fn from_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Self> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            KeyCode::Left => Some(Command::Drag(-DRAG_STEP, 0.0)),
            KeyCode::Right => Some(Command::Drag(DRAG_STEP, 0.0)),
            KeyCode::Up => Some(Command::Drag(0.0, -DRAG_STEP)),
            KeyCode::Down => Some(Command::Drag(0.0, DRAG_STEP)),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::Wheel(-1.0)),
            KeyCode::Char('-') => Some(Command::Wheel(1.0)),
            KeyCode::Char(c @ '0'..='3') => Some(Command::SelectMode(c as usize - '0' as usize)),
            KeyCode::Tab => Some(Command::NextSlider),
            KeyCode::BackTab => Some(Command::PreviousSlider),
            KeyCode::Char(']') => Some(Command::NudgeSlider(SLIDER_STEP)),
            KeyCode::Char('[') => Some(Command::NudgeSlider(-SLIDER_STEP)),
            KeyCode::Char('r') => Some(Command::Reset),
            _ => None,
        }
    }
}

/// Main application struct for terminal diagram rendering
pub struct TerminalApp {
    controller: AnyController,
    renderer: AsciiSurface,
    selected: usize,
    running: bool,
}

impl TerminalApp {
    pub fn new(controller: AnyController) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(controller, width as usize, height as usize))
    }

    pub fn with_size(controller: AnyController, width: usize, height: usize) -> Self {
        Self {
            controller,
            renderer: AsciiSurface::new(width, height),
            selected: 0,
            running: true,
        }
    }

    pub fn controller(&self) -> &AnyController {
        &self.controller
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    /// Repaint once, then only after input that changed something
    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;

        while self.running {
            let repaint = match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind: KeyEventKind::Press,
                    ..
                }) => match Command::from_key(code, modifiers) {
                    Some(command) => self.apply(command),
                    None => false,
                },
                Event::Resize(width, height) => {
                    debug!("resize to {width}x{height}");
                    self.renderer.resize(width as usize, height as usize);
                    true
                }
                _ => false,
            };

            if repaint && self.running {
                self.render()?;
            }
        }

        Ok(())
    }

    /// Apply a command, returning whether a repaint is due
    pub fn apply(&mut self, command: Command) -> bool {
        let slider_count = self.controller.parameters().len();
        match command {
            Command::Quit => {
                self.running = false;
                false
            }
            Command::Drag(dx, dy) => self.controller.drag(dx, dy),
            Command::Wheel(delta) => self.controller.wheel(delta),
            Command::SelectMode(option) => match self.controller.select_mode(option) {
                Ok(_) => true,
                Err(err) => {
                    warn!("{err}");
                    false
                }
            },
            Command::NextSlider => {
                self.selected = (self.selected + 1) % slider_count;
                true
            }
            Command::PreviousSlider => {
                self.selected = (self.selected + slider_count - 1) % slider_count;
                true
            }
            Command::NudgeSlider(delta) => {
                let result = self
                    .controller
                    .slider_position(self.selected)
                    .and_then(|position| self.controller.set_slider(self.selected, position + delta));
                match result {
                    Ok(_) => true,
                    Err(err) => {
                        warn!("{err}");
                        false
                    }
                }
            }
            Command::Reset => {
                self.controller.apply_default_positions();
                true
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Status line: selected slider, its value and the key bindings
    pub fn status_line(&self) -> String {
        let spec = &self.controller.parameters()[self.selected];
        let value = self
            .controller
            .slider_position(self.selected)
            .map(|position| spec.value_at(position))
            .unwrap_or(f64::NAN);
        format!(
            "Pinhole {} | {} = {:.2} | Arrows=Orbit +/-=Zoom 0-3=View Tab=Slider [ ]=Adjust R=Reset Q=Quit",
            self.controller.kind(),
            spec.label,
            value
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.controller
            .repaint(&mut self.renderer)
            .unwrap_or_else(|never| match never {});

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
