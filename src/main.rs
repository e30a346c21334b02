use std::cell::Cell;
use std::fs;
use std::io::{self, stdout};
use std::panic;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Local, NaiveDateTime, Weekday};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use gantt_grid::{
    time_unit, ClickOutcome, Cursor, Emission, GridAnchor, GridBounds, GridController,
    GridGeometry, GridLayout, GridView, HostSurface, PointerButton, PointerEvent, Resource, Tile,
    ZoomLevel,
};
use ratatui::layout::Position;
use ratatui::{prelude::*, widgets::*};
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

const DEFAULT_DATA_FILE: &str = "schedule.json";
const LOG_FILE: &str = "gantt-grid.log";
const HEADER_LINES: u16 = 2;
const SCROLL_CELLS: i64 = 7;

// --- DATA STRUCTURES ---

#[derive(Clone, Serialize, Deserialize)]
struct ScheduleData {
    #[serde(default = "default_zoom")]
    zoom: ZoomLevel,
    resources: Vec<Resource>,
}

fn default_zoom() -> ZoomLevel {
    ZoomLevel::Day
}

// --- HOST SURFACE ---

/// Terminal stand-in for the browser surface. The grid rectangle is whatever
/// the last frame drew. Mouse capture stays on for the whole session, so
/// listener and text-selection toggles are only logged.
#[derive(Default)]
struct TerminalSurface {
    grid_area: Cell<Rect>,
    cursor: Cell<Cursor>,
}

impl HostSurface for TerminalSurface {
    fn grid_bounds(&self) -> GridBounds {
        let area = self.grid_area.get();
        GridBounds::new(
            f64::from(area.x),
            f64::from(area.y),
            f64::from(area.width),
            f64::from(area.height),
        )
    }

    fn set_window_listeners(&self, attached: bool) {
        trace!(attached, "pointer tracking outside the grid");
    }

    fn set_cursor(&self, cursor: Cursor) {
        self.cursor.set(cursor);
    }

    fn set_text_selection(&self, enabled: bool) {
        trace!(enabled, "text selection");
    }
}

// --- APPLICATION STATE ---

struct App {
    schedule: ScheduleData,
    data_path: PathBuf,
    anchor: GridAnchor,
    layout: GridLayout,
    controller: GridController,
    surface: Rc<TerminalSurface>,
    pressed_tile: Option<String>,
    selected_project: Option<String>,
    bounds_dirty: bool,
    should_quit: bool,
    status_message: String,
}

impl App {
    fn new(data_path: PathBuf, geometry: GridGeometry) -> Self {
        let surface = Rc::new(TerminalSurface::default());
        let controller = GridController::new(surface.clone(), geometry);
        let mut app = App {
            schedule: ScheduleData {
                zoom: default_zoom(),
                resources: vec![],
            },
            data_path,
            anchor: GridAnchor::new(start_of_week()),
            layout: GridLayout::default(),
            controller,
            surface,
            pressed_tile: None,
            selected_project: None,
            bounds_dirty: false,
            should_quit: false,
            status_message: "Welcome! Press 'q' to quit.".to_string(),
        };

        match load_schedule(&app.data_path) {
            Ok(schedule) => {
                app.schedule = schedule;
                app.status_message = format!("Schedule loaded from {}.", app.data_path.display());
                info!(path = %app.data_path.display(), "schedule loaded");
            }
            Err(err) => {
                app.add_default_schedule();
                app.status_message = format!(
                    "Failed to load {}. Starting with a sample schedule.",
                    app.data_path.display()
                );
                warn!(path = %app.data_path.display(), error = %err, "falling back to sample schedule");
            }
        }
        app.relayout();
        app
    }

    fn add_default_schedule(&mut self) {
        let monday = self.anchor.datetime();
        let tile = |id: &str, title: &str, from: i64, to: i64, color: &str| Tile {
            id: id.into(),
            start_date: monday + Duration::days(from),
            end_date: monday + Duration::days(to),
            title: title.into(),
            subtitle: None,
            description: None,
            bg_color: Some(color.into()),
        };
        self.schedule.resources = vec![
            Resource {
                id: "r1".into(),
                label: "Alice".into(),
                projects: vec![
                    tile("p1", "Requirement Gathering", 0, 4, "#2f7d4a"),
                    tile("p2", "UI/UX Design", 3, 9, "#c9a227"),
                ],
            },
            Resource {
                id: "r2".into(),
                label: "Bob".into(),
                projects: vec![tile("p3", "Backend", 2, 12, "#3d5a98")],
            },
            Resource {
                id: "r3".into(),
                label: "Carol".into(),
                projects: vec![],
            },
        ];
    }

    fn save_schedule(&mut self) -> Result<()> {
        let json_data = serde_json::to_string_pretty(&self.schedule)?;
        fs::write(&self.data_path, json_data)
            .with_context(|| format!("writing {}", self.data_path.display()))?;
        self.status_message = format!("Schedule saved to {}!", self.data_path.display());
        Ok(())
    }

    fn relayout(&mut self) {
        self.layout = GridLayout::build(
            &self.schedule.resources,
            self.schedule.zoom,
            self.anchor,
            self.controller.geometry(),
        );
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) {
        if zoom == self.schedule.zoom {
            return;
        }
        self.controller.teardown();
        self.schedule.zoom = zoom;
        self.relayout();
        self.status_message = format!("Zoom: {} view.", zoom.label());
    }

    fn scroll(&mut self, cells: i64) {
        let unit = time_unit(self.schedule.zoom, self.controller.geometry()).unit;
        if let Some(anchor) = unit.add(self.anchor.datetime(), cells) {
            self.controller.teardown();
            self.anchor = GridAnchor::new(anchor);
            self.relayout();
        }
    }

    fn go_to_today(&mut self) {
        self.controller.teardown();
        self.anchor = GridAnchor::new(start_of_week());
        self.relayout();
    }

    fn delete_selected_project(&mut self) {
        let Some(project_id) = self.selected_project.take() else {
            self.status_message = "No project selected.".to_string();
            return;
        };
        for resource in &mut self.schedule.resources {
            resource.projects.retain(|tile| tile.id != project_id);
        }
        self.relayout();
        self.status_message = format!("Project {project_id} deleted.");
    }

    fn next_project_id(&self) -> String {
        let existing: Vec<&str> = self
            .schedule
            .resources
            .iter()
            .flat_map(|resource| resource.projects.iter().map(|tile| tile.id.as_str()))
            .collect();
        (existing.len() + 1..)
            .map(|n| format!("p{n}"))
            .find(|id| !existing.contains(&id.as_str()))
            .unwrap_or_default()
    }

    fn apply(&mut self, emission: Emission) {
        match emission {
            Emission::GridSelect(selection) => {
                let id = self.next_project_id();
                let Some(resource) = self
                    .schedule
                    .resources
                    .iter_mut()
                    .find(|resource| resource.id == selection.resource_id)
                else {
                    return;
                };
                resource.projects.push(Tile {
                    id: id.clone(),
                    start_date: selection.start_date,
                    end_date: selection.end_date,
                    title: "New project".into(),
                    subtitle: None,
                    description: None,
                    bg_color: None,
                });
                self.status_message = format!(
                    "Created {id} for {}: {} - {}.",
                    selection.resource_label,
                    format_date(selection.start_date),
                    format_date(selection.end_date)
                );
                self.selected_project = Some(id);
            }
            Emission::TileChange(change) => {
                let tile = self
                    .schedule
                    .resources
                    .iter_mut()
                    .filter(|resource| resource.id == change.resource_id)
                    .flat_map(|resource| resource.projects.iter_mut())
                    .find(|tile| tile.id == change.project_id);
                if let Some(tile) = tile {
                    tile.start_date = change.start_date;
                    tile.end_date = change.end_date;
                    self.status_message = format!(
                        "Moved '{}' to {} - {}.",
                        tile.title,
                        format_date(change.start_date),
                        format_date(change.end_date)
                    );
                }
            }
        }
        self.relayout();
    }

    fn on_tile_click(&mut self, project_id: String) {
        if let Some(placed) = self.layout.find(&project_id) {
            self.status_message = format!(
                "'{}': {} - {}.",
                placed.tile.title,
                format_date(placed.tile.start_date),
                format_date(placed.tile.end_date)
            );
        }
        self.selected_project = Some(project_id);
    }

    fn tile_id_at(&self, x: f64, y: f64) -> Option<String> {
        let (local_x, local_y) = self.surface.grid_bounds().to_local(x, y);
        self.layout
            .tile_at(local_x, local_y, self.controller.geometry().row_height)
            .map(|placed| placed.tile.id.clone())
    }
}

fn load_schedule(path: &Path) -> Result<ScheduleData> {
    let json_data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let schedule = serde_json::from_str(&json_data)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(schedule)
}

fn start_of_week() -> NaiveDateTime {
    let today = Local::now().date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    monday.and_time(chrono::NaiveTime::MIN)
}

fn format_date(at: NaiveDateTime) -> String {
    at.format("%m/%d/%Y %H:00").to_string()
}

// --- MAIN ---
fn main() -> Result<()> {
    init_tracing()?;
    let mut args = std::env::args().skip(1);
    let data_path = args
        .next()
        .map_or_else(|| PathBuf::from(DEFAULT_DATA_FILE), PathBuf::from);
    let geometry = match args.next() {
        Some(path) => GridGeometry::load(&path)
            .with_context(|| format!("loading grid geometry from {path}"))?,
        None => GridGeometry::terminal(),
    };

    setup_terminal()?;
    let mut app = App::new(data_path, geometry);
    let result = run_app(&mut app);
    restore_terminal()?;
    result
}

fn init_tracing() -> Result<()> {
    let file = fs::File::create(LOG_FILE).with_context(|| format!("creating {LOG_FILE}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(app: &mut App) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;
        if app.bounds_dirty {
            app.controller.resize();
            app.bounds_dirty = false;
        }
        handle_events(app)?;
    }
    app.controller.teardown();
    Ok(())
}

// --- EVENT HANDLING ---
fn handle_events(app: &mut App) -> io::Result<()> {
    if event::poll(std::time::Duration::from_millis(50))? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            Event::Resize(_, _) => app.bounds_dirty = true,
            _ => {}
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers == KeyModifiers::CONTROL {
        if let KeyCode::Char('s') = key.code {
            if let Err(err) = app.save_schedule() {
                warn!(error = %err, "save failed");
                app.status_message = "Failed to save schedule.".into();
            }
        }
        return;
    }
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('+') | KeyCode::Char('=') => app.set_zoom(app.schedule.zoom.zoom_in()),
        KeyCode::Char('-') => app.set_zoom(app.schedule.zoom.zoom_out()),
        KeyCode::Char('h') | KeyCode::Left => app.scroll(-SCROLL_CELLS),
        KeyCode::Char('l') | KeyCode::Right => app.scroll(SCROLL_CELLS),
        KeyCode::Char('t') => app.go_to_today(),
        KeyCode::Char('D') | KeyCode::Delete => app.delete_selected_project(),
        KeyCode::Esc => {
            app.controller.teardown();
            app.status_message = "Drag cancelled.".into();
        }
        _ => {}
    }
}

fn pointer_event(mouse: &MouseEvent) -> Option<PointerEvent> {
    // Column centres keep both tile edges one column wide.
    let x = f64::from(mouse.column) + 0.5;
    let y = f64::from(mouse.row) + 0.5;
    match mouse.kind {
        MouseEventKind::Down(button) => Some(PointerEvent::Down {
            x,
            y,
            button: match button {
                MouseButton::Left => PointerButton::Primary,
                MouseButton::Right => PointerButton::Secondary,
                MouseButton::Middle => PointerButton::Auxiliary,
            },
        }),
        MouseEventKind::Drag(_) | MouseEventKind::Moved => Some(PointerEvent::Move { x, y }),
        MouseEventKind::Up(_) => Some(PointerEvent::Up { x, y }),
        _ => None,
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let Some(pointer) = pointer_event(&mouse) else {
        return;
    };
    let inside = app.surface.grid_area.get().contains(Position::new(mouse.column, mouse.row));
    // An active gesture follows the pointer off the grid so its release still lands.
    if !inside && !app.controller.is_active() {
        return;
    }
    let (x, y) = pointer.position();
    if let PointerEvent::Down { .. } = pointer {
        app.pressed_tile = app.tile_id_at(x, y);
    }

    let view = GridView {
        zoom: app.schedule.zoom,
        anchor: app.anchor,
        resources: &app.schedule.resources,
        layout: &app.layout,
    };
    let emission = app.controller.handle(&pointer, &view);
    if let Some(emission) = emission {
        app.apply(emission);
    }

    if let PointerEvent::Up { .. } = pointer {
        let pressed = app.pressed_tile.take();
        if pressed.is_some() && pressed == app.tile_id_at(x, y) {
            if let (ClickOutcome::Activated, Some(project_id)) = (app.controller.click(), pressed) {
                app.on_tile_click(project_id);
            }
        }
    }
}

// --- UI RENDERING ---
fn ui(frame: &mut Frame, app: &mut App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(frame.area());

    render_schedule(frame, main_layout[0], app);
    render_footer(frame, main_layout[1], app);
}

fn render_schedule(frame: &mut Frame, area: Rect, app: &mut App) {
    let title = format!("Schedule ({} view)", app.schedule.zoom.label());
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let geometry = app.controller.geometry().clone();
    let left_width = (geometry.left_column_width as u16).min(inner_area.width);
    let grid_area = Rect {
        x: inner_area.x + left_width,
        y: inner_area.y + HEADER_LINES.min(inner_area.height),
        width: inner_area.width - left_width,
        height: inner_area.height.saturating_sub(HEADER_LINES),
    };
    if app.surface.grid_area.get() != grid_area {
        app.surface.grid_area.set(grid_area);
        app.bounds_dirty = true;
    }

    let unit = time_unit(app.schedule.zoom, &geometry);
    let cell_cols = (unit.cell_width as u16).max(1);
    let columns = grid_area.width / cell_cols + 1;
    let today = Local::now().date_naive();
    let buf = frame.buffer_mut();

    // Header: period label on the first line, cell label on the second.
    let mut last_period = None;
    for col in 0..columns {
        let Some(at) = unit.unit.add(app.anchor.datetime(), i64::from(col)) else {
            break;
        };
        let x = grid_area.x + col * cell_cols;
        if x >= grid_area.right() {
            break;
        }
        let (period, label) = match app.schedule.zoom {
            ZoomLevel::Week => (at.format("%b %Y").to_string(), format!("W{}", at.iso_week().week())),
            ZoomLevel::Day => (at.format("%b").to_string(), format!("{}{}", at.day(), weekday_char(at.weekday()))),
            ZoomLevel::Hour => (at.format("%a %d").to_string(), at.format("%H").to_string()),
        };
        let style = if at.date() == today && app.schedule.zoom != ZoomLevel::Week {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        let room = (grid_area.right() - x) as usize;
        if last_period.as_ref() != Some(&period) {
            buf.set_stringn(x, inner_area.y, &period, room, Style::default().add_modifier(Modifier::BOLD));
            last_period = Some(period);
        }
        if inner_area.height > 1 {
            buf.set_stringn(x, inner_area.y + 1, &label, room.min(cell_cols as usize), style);
        }
    }

    // Resource labels and the empty grid.
    let mut row = 0usize;
    for (resource, span) in app.schedule.resources.iter().zip(&app.layout.row_spans) {
        for lane in 0..*span {
            let y = grid_area.y as usize + row + lane;
            if y >= grid_area.bottom() as usize {
                break;
            }
            let y = y as u16;
            if lane == 0 {
                let label = truncate(&resource.label, left_width.saturating_sub(1) as usize);
                buf.set_string(inner_area.x, y, label, Style::default().add_modifier(Modifier::BOLD));
            }
            for col in 0..columns {
                let x = grid_area.x + col * cell_cols;
                if x < grid_area.right() {
                    buf.set_string(x, y, "·", Style::default().fg(Color::DarkGray));
                }
            }
        }
        row += span;
    }

    // Tiles, with the dragged one drawn at its ghost position.
    let ghost = app.controller.ghost().map(|(id, ghost)| (id.to_string(), ghost));
    for placed in &app.layout.tiles {
        let (x, width) = match &ghost {
            Some((id, ghost)) if *id == placed.tile.id => (ghost.x, ghost.width),
            _ => (placed.geometry.x, placed.geometry.width),
        };
        let Some(rect) = clip(grid_area, x, width, placed.geometry.y / geometry.row_height) else {
            continue;
        };
        let bg = placed
            .tile
            .bg_color
            .as_deref()
            .and_then(|color| color.parse::<Color>().ok())
            .unwrap_or(Color::Blue);
        let mut style = Style::default().bg(bg).fg(text_color(bg));
        if app.selected_project.as_deref() == Some(placed.tile.id.as_str()) {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        buf.set_style(rect, style);
        buf.set_string(rect.x, rect.y, " ".repeat(rect.width as usize), style);
        buf.set_stringn(rect.x, rect.y, truncate(&placed.tile.title, rect.width as usize), rect.width as usize, style);
    }

    if let Some(selection) = app.controller.selection_overlay() {
        if let Some(rect) = clip(grid_area, selection.x, selection.width, selection.y / geometry.row_height) {
            buf.set_style(rect, Style::default().add_modifier(Modifier::REVERSED));
        }
    }
}

/// Screen rectangle for a grid-local span on `row`, clipped to `area`.
fn clip(area: Rect, x: f64, width: f64, row: f64) -> Option<Rect> {
    let left = i32::from(area.x) + x.floor() as i32;
    let right = left + width.round() as i32;
    let top = i32::from(area.y) + row as i32;
    let left = left.max(i32::from(area.x));
    let right = right.min(i32::from(area.right()));
    if right <= left || top < i32::from(area.y) || top >= i32::from(area.bottom()) {
        return None;
    }
    Some(Rect::new(left as u16, top as u16, (right - left) as u16, 1))
}

fn truncate(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if UnicodeWidthStr::width(out.as_str()) + UnicodeWidthStr::width(ch.to_string().as_str()) >= max_width {
            break;
        }
        out.push(ch);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

fn text_color(bg: Color) -> Color {
    match bg {
        Color::Rgb(r, g, b) => {
            let luminance = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
            if luminance > 150.0 { Color::Black } else { Color::White }
        }
        Color::Yellow | Color::LightYellow | Color::White | Color::LightCyan | Color::LightGreen => Color::Black,
        _ => Color::White,
    }
}

fn weekday_char(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "M",
        Weekday::Tue => "T",
        Weekday::Wed => "W",
        Weekday::Thu => "T",
        Weekday::Fri => "F",
        Weekday::Sat => "S",
        Weekday::Sun => "S",
    }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = "Drag grid (new) | Drag tile (move) | Drag edge (resize) | +/- zoom | h/l scroll | (t)oday | (D)el | (Ctrl-s)ave | (q)uit";
    let status = match app.surface.cursor.get() {
        Cursor::Default => app.status_message.clone(),
        Cursor::Grabbing => format!("[moving] {}", app.status_message),
        Cursor::EwResize => format!("[resizing] {}", app.status_message),
    };

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Left), layout[0]);
    frame.render_widget(
        Paragraph::new(help_text).alignment(Alignment::Right).wrap(Wrap { trim: true }),
        layout[1],
    );
}

// --- TERMINAL SETUP & RESTORATION ---
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
