//! Application state and event loop

use std::io;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal, Frame};

use crate::calendar::{CalendarSurface, GestureSource};
use crate::services::resize;
use crate::services::settings::Settings;

use super::theme::Theme;
use super::widgets::{
    calendar_canvas::{cell_center, viewport_size, CalendarCanvas},
    header::Header,
    help::HelpPopup,
};

/// Display refresh interval
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Options for launching the TUI
#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub settings: Settings,
    pub theme: Theme,
    /// Month to open at; today when absent
    pub date: Option<NaiveDate>,
}

/// Main application
pub struct App {
    surface: CalendarSurface,
    settings: Settings,
    theme: Theme,
    area: Rect,
    show_help: bool,
    should_quit: bool,
}

impl App {
    /// Create the app and mount the calendar into `area`
    pub fn new(settings: Settings, theme: Theme, initial: NaiveDate, area: Rect) -> Self {
        let mut surface = CalendarSurface::new(settings);
        surface.set_dark(theme.is_dark());
        surface.observe_resize();
        surface.mount(initial, viewport_size(area, settings.cell));
        Self {
            surface,
            settings,
            theme,
            area,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn surface(&self) -> &CalendarSurface {
        &self.surface
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle one terminal event at `now` ms. Returns whether the screen
    /// changed outside the calendar's own frame schedule.
    pub fn handle_event(&mut self, event: Event, now: f64) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) if !self.show_help => self.handle_mouse(mouse, now),
            Event::Resize(width, height) => {
                self.area = Rect::new(0, 0, width, height);
                resize::notify_all(viewport_size(self.area, self.settings.cell));
                false
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let step = self.settings.wheel_step;
        let page = (self.surface.viewport().height - self.settings.layout.viewport_padding_top)
            .max(step);
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
            }
            _ if self.show_help => return false,
            KeyCode::Down | KeyCode::Char('j') => self.surface.wheel(step),
            KeyCode::Up | KeyCode::Char('k') => self.surface.wheel(-step),
            KeyCode::PageDown => self.surface.wheel(page),
            KeyCode::PageUp => self.surface.wheel(-page),
            KeyCode::Char('t') => {
                self.surface.scroll_to_date(Local::now().date_naive());
            }
            _ => return false,
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: f64) -> bool {
        let position = cell_center(self.area, mouse.column, mouse.row, self.settings.cell);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.surface.gesture_start(GestureSource::Mouse, position, now);
                false
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.surface.gesture_move(GestureSource::Mouse, position, now);
                false
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.surface.gesture_end(GestureSource::Mouse, now);
                false
            }
            MouseEventKind::ScrollDown => {
                self.surface.wheel(self.settings.wheel_step);
                false
            }
            MouseEventKind::ScrollUp => {
                self.surface.wheel(-self.settings.wheel_step);
                false
            }
            MouseEventKind::Moved => {
                let before = self.surface.hover().target().map(|t| t.day);
                let after = self.surface.pointer_hover(position);
                before != after
            }
            _ => false,
        }
    }

    /// Run one calendar frame; returns whether it drew
    pub fn tick(&mut self, now: f64) -> bool {
        self.surface.set_today(Local::now().date_naive());
        self.surface.run_frame(now)
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cell = self.settings.cell;
        CalendarCanvas::new(self.surface.scene(), cell, self.theme)
            .with_hover(self.surface.hover().target())
            .render(area, buf);
        Header::new(
            self.surface.current_label(),
            &self.settings.layout,
            cell,
            self.theme,
        )
        .render(area, buf);

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the TUI application
pub fn run(options: TuiOptions) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    execute!(io::stdout(), EnableMouseCapture)?;
    let result = run_app(&mut terminal, options);
    let _ = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

fn elapsed_ms(clock: Instant) -> f64 {
    clock.elapsed().as_secs_f64() * 1000.0
}

fn run_app(terminal: &mut DefaultTerminal, options: TuiOptions) -> anyhow::Result<()> {
    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    let initial = options.date.unwrap_or_else(|| Local::now().date_naive());
    let mut app = App::new(options.settings, options.theme, initial, area);

    let clock = Instant::now();
    let mut next_frame = Instant::now() + FRAME_INTERVAL;
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|frame| app.draw(frame))?;
            dirty = false;
        }

        if app.should_quit() {
            break;
        }

        // Wait for input until the next frame is due
        let timeout = next_frame.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            let ev = event::read()?;
            dirty |= app.handle_event(ev, elapsed_ms(clock));
        }

        let now = Instant::now();
        if now >= next_frame {
            dirty |= app.tick(elapsed_ms(clock));
            next_frame += FRAME_INTERVAL;
            if next_frame < now {
                next_frame = now + FRAME_INTERVAL;
            }
        }
    }

    tracing::info!("calendar closed");
    Ok(())
}
