//! The terminal host: schedules frames and feeds input into the controller.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use floaty_config::Config;
use floaty_core::parse_count;
use floaty_particles::{AnimationController, Rgba, SurfaceView};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::Paragraph,
};
use tracing::{info, warn};

use crate::debounce::Debouncer;

/// Rows taken by the count input, the message line and the help line.
const CHROME_ROWS: u16 = 3;

/// Longest poll while no frame or timer is due.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Longest count the input accepts.
const MAX_INPUT_DIGITS: usize = 4;

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    controller: AnimationController,
    config: Config,
    config_path: Option<PathBuf>,
    background: Rgba,
    /// Text of the particle count input.
    count_input: String,
    count_debounce: Debouncer<usize>,
    resize_debounce: Debouncer<(u16, u16)>,
    /// When the configured particle count is first applied.
    initial_count_at: Option<Instant>,
    frame_period: Duration,
    next_frame_at: Instant,
    /// Where the surface was last drawn, for click hit-testing.
    surface_area: Rect,
    /// Message line under the input.
    message: String,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, config_path: Option<PathBuf>) -> color_eyre::Result<Self> {
        config.validate()?;
        let (r, g, b) = config.background_rgb()?;
        let (pr, pg, pb) = config.particle_rgb()?;
        let controller = AnimationController::new()
            .with_tuning(config.tuning)
            .with_particle_color(Rgba::from_rgb8(pr, pg, pb));
        let now = Instant::now();

        Ok(Self {
            running: false,
            controller,
            count_input: config.particles.to_string(),
            count_debounce: Debouncer::new(Duration::from_millis(config.input_debounce_ms)),
            resize_debounce: Debouncer::new(Duration::from_millis(config.resize_debounce_ms)),
            initial_count_at: Some(now + Duration::from_millis(config.initial_delay_ms)),
            frame_period: Duration::from_secs_f64(config.tuning.frame_period_ms / 1000.0),
            next_frame_at: now,
            surface_area: Rect::default(),
            message: String::new(),
            background: Rgba::from_rgb8(r, g, b),
            config,
            config_path,
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let size = terminal.size()?;
        self.apply_terminal_size(size.width, size.height);
        self.controller.attach();

        while self.running {
            let now = Instant::now();
            self.fire_timers(now);
            if now >= self.next_frame_at && self.controller.take_frame_request() {
                self.controller.step();
                self.next_frame_at = now + self.frame_period;
            }
            terminal.draw(|frame| self.render(frame))?;
            let timeout = self.next_deadline(now).saturating_duration_since(Instant::now());
            self.handle_crossterm_events(timeout)?;
        }
        Ok(())
    }

    /// Earliest moment the loop has work to do.
    fn next_deadline(&self, now: Instant) -> Instant {
        let frame = self
            .controller
            .frame_requested()
            .then_some(self.next_frame_at);
        [
            frame,
            self.count_debounce.deadline(),
            self.resize_debounce.deadline(),
            self.initial_count_at,
        ]
        .into_iter()
        .flatten()
        .fold(now + IDLE_POLL, Instant::min)
    }

    /// Deliver debounced values and the delayed initial count.
    fn fire_timers(&mut self, now: Instant) {
        if let Some((cols, rows)) = self.resize_debounce.poll(now) {
            self.apply_terminal_size(cols, rows);
        }
        if let Some(n) = self.count_debounce.poll(now) {
            self.controller.set_num(n);
        }
        if self.initial_count_at.is_some_and(|at| now >= at) {
            self.initial_count_at = None;
            self.controller.set_num(self.config.particles);
        }
    }

    fn apply_terminal_size(&mut self, cols: u16, rows: u16) {
        let (width, height) = surface_size(
            cols,
            rows,
            self.config.surface_scale,
            self.config.surface_ratio,
        );
        info!("{width} x {height}");
        self.controller.set_size(width, height);
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let surface_rows = self.controller.height().div_ceil(2) as u16;
        let surface_cols = (self.controller.width() as u16).min(area.width);

        let chunks = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(surface_rows),
            Constraint::Length(1), // Count input
            Constraint::Length(1), // Message
            Constraint::Fill(1),
            Constraint::Length(1), // Help text
        ])
        .split(area);
        let columns = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(surface_cols),
            Constraint::Fill(1),
        ])
        .split(chunks[1]);
        self.surface_area = columns[1];

        let accent = self.background.to_color();
        match self.controller.surface() {
            Some(surface) => SurfaceView::new(surface, self.background).render(frame, columns[1]),
            None => frame.render_widget(
                Paragraph::new("paused")
                    .style(Style::new().fg(accent))
                    .alignment(Alignment::Center),
                columns[1],
            ),
        }

        let input = Line::from(vec![
            "particles ".dark_gray(),
            format!(" {:>width$} ", self.count_input, width = MAX_INPUT_DIGITS)
                .bold()
                .reversed(),
            format!("  tick {}", self.controller.tick()).dark_gray(),
        ])
        .centered();
        frame.render_widget(input, chunks[2]);

        let message = Paragraph::new(self.message.as_str())
            .style(Style::new().fg(accent))
            .alignment(Alignment::Center);
        frame.render_widget(message, chunks[3]);

        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "click/r".bold().fg(accent),
            " reset  ".dark_gray(),
            "0-9 +/-".bold().fg(accent),
            " count  ".dark_gray(),
            "p".bold().fg(accent),
            " pause  ".dark_gray(),
            "s".bold().fg(accent),
            " save".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[5]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => self.on_resize(cols, rows, Instant::now()),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('r')) => self.controller.click(),
            (_, KeyCode::Char('p')) => self.toggle_pause(),
            (_, KeyCode::Char('s')) => self.save(),
            (_, KeyCode::Char(c @ '0'..='9')) => {
                if self.count_input.len() < MAX_INPUT_DIGITS {
                    self.count_input.push(c);
                    self.on_number_change();
                }
            }
            (_, KeyCode::Backspace) => {
                self.count_input.pop();
                self.on_number_change();
            }
            (_, KeyCode::Char('+' | '=')) => self.adjust_count(1),
            (_, KeyCode::Char('-')) => self.adjust_count(-1),
            _ => {}
        }
    }

    fn on_resize(&mut self, cols: u16, rows: u16, now: Instant) {
        if let Some((cols, rows)) = self.resize_debounce.call((cols, rows), now) {
            self.apply_terminal_size(cols, rows);
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind == MouseEventKind::Down(MouseButton::Left)
            && self
                .surface_area
                .contains(Position::new(mouse.column, mouse.row))
        {
            self.controller.click();
        }
    }

    fn adjust_count(&mut self, delta: i64) {
        let current = parse_count(&self.count_input).map_or(0, |n| n.get() as i64);
        let max = 10_i64.pow(MAX_INPUT_DIGITS as u32) - 1;
        self.count_input = (current + delta).clamp(1, max).to_string();
        self.on_number_change();
    }

    /// Forward a positive count through the debounce; anything else is held back.
    fn on_number_change(&mut self) {
        match parse_count(&self.count_input) {
            Ok(n) => {
                if let Some(n) = self.count_debounce.call(n.get(), Instant::now()) {
                    self.controller.set_num(n);
                }
            }
            Err(e) => {
                if !self.count_input.is_empty() {
                    warn!("not applying count: {e}");
                }
            }
        }
    }

    fn toggle_pause(&mut self) {
        if self.controller.is_attached() {
            self.controller.detach();
        } else {
            self.controller.attach();
        }
    }

    fn save(&mut self) {
        let Some(path) = self.config_path.clone() else {
            self.message = "no config location available".to_string();
            return;
        };
        self.config.particles = self.controller.num().max(1);
        self.message = match self.config.save_to(&path) {
            Ok(()) => format!("saved to {}", path.display()),
            Err(e) => {
                warn!("failed to save config: {e}");
                format!("save failed: {e}")
            }
        };
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Surface size in pixels for a terminal of `cols` x `rows` cells.
///
/// The width is a share of the terminal width and the height follows the
/// ratio, capped to what fits above the chrome at two pixels per row.
pub fn surface_size(cols: u16, rows: u16, scale: f64, ratio: f64) -> (u32, u32) {
    let width = (f64::from(cols) * scale).trunc();
    let height = (width / ratio).trunc();
    let max_height = f64::from(rows.saturating_sub(CHROME_ROWS)) * 2.0;
    (width as u32, height.min(max_height) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_size_follows_ratio() {
        assert_eq!(surface_size(160, 100, 0.75, 16.0 / 9.0), (120, 67));
        assert_eq!(surface_size(100, 100, 1.0, 2.0), (100, 50));
    }

    #[test]
    fn test_surface_size_capped_by_rows() {
        assert_eq!(surface_size(200, 23, 0.75, 16.0 / 9.0), (150, 40));
        assert_eq!(surface_size(80, 2, 0.75, 16.0 / 9.0), (60, 0));
        assert_eq!(surface_size(0, 40, 0.75, 16.0 / 9.0), (0, 0));
    }

    #[test]
    fn test_key_input_edits_count() {
        let mut app = App::new(Config::default(), None).unwrap();
        app.count_input.clear();
        app.on_key_event(KeyEvent::from(KeyCode::Char('7')));
        assert_eq!(app.count_input, "7");
        assert_eq!(app.controller.num(), 7);

        app.on_key_event(KeyEvent::from(KeyCode::Char('+')));
        assert_eq!(app.count_input, "8");
        app.on_key_event(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(app.count_input, "");
        app.on_key_event(KeyEvent::from(KeyCode::Char('-')));
        assert_eq!(app.count_input, "1");

        app.on_key_event(KeyEvent::from(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_initial_count_applied_after_delay() {
        let mut app = App::new(Config::default(), None).unwrap();
        app.controller.attach();
        let at = app.initial_count_at.unwrap();

        app.fire_timers(at - Duration::from_millis(1));
        assert_eq!(app.controller.num(), 1);
        assert_eq!(app.controller.particles().len(), 1);

        app.fire_timers(at);
        assert_eq!(app.controller.num(), 19);
        assert_eq!(app.controller.particles().len(), 19);
        assert!(app.initial_count_at.is_none());

        app.controller.set_num(5);
        app.fire_timers(at + Duration::from_secs(1));
        assert_eq!(app.controller.num(), 5);
    }

    #[test]
    fn test_left_click_inside_surface_resets() {
        let mut app = App::new(Config::default(), None).unwrap();
        app.controller.set_size(40, 20);
        app.controller.attach();
        app.controller.step();
        assert_eq!(app.controller.tick(), 2);
        app.surface_area = Rect::new(10, 5, 40, 10);

        let mouse = |kind: MouseEventKind, column: u16, row: u16| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        app.on_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
        app.on_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 50, 7));
        app.on_mouse_event(mouse(MouseEventKind::Down(MouseButton::Right), 15, 7));
        app.on_mouse_event(mouse(MouseEventKind::Moved, 15, 7));
        assert_eq!(app.controller.tick(), 2);

        app.on_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 15, 7));
        assert_eq!(app.controller.tick(), 0);
    }

    #[test]
    fn test_resize_is_debounced_into_surface_size() {
        let mut app = App::new(Config::default(), None).unwrap();
        app.controller.attach();
        let now = Instant::now();

        app.on_resize(160, 100, now);
        assert_eq!((app.controller.width(), app.controller.height()), (120, 67));

        app.on_resize(200, 23, now + Duration::from_millis(100));
        assert_eq!((app.controller.width(), app.controller.height()), (120, 67));

        app.fire_timers(now + Duration::from_millis(499));
        assert_eq!((app.controller.width(), app.controller.height()), (120, 67));
        app.fire_timers(now + Duration::from_millis(500));
        assert_eq!((app.controller.width(), app.controller.height()), (150, 40));
        let surface = app.controller.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (150, 40));
    }

    #[test]
    fn test_pause_toggles_attachment() {
        let mut app = App::new(Config::default(), None).unwrap();
        app.controller.attach();
        app.on_key_event(KeyEvent::from(KeyCode::Char('p')));
        assert!(!app.controller.is_attached());
        app.on_key_event(KeyEvent::from(KeyCode::Char('p')));
        assert!(app.controller.is_attached());
    }

    #[test]
    fn test_save_writes_current_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = App::new(Config::default(), Some(path.clone())).unwrap();
        app.controller.set_num(33);
        app.save();
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.particles, 33);
        assert!(app.message.starts_with("saved to"));
    }
}
