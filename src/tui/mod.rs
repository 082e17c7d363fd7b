//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel with one slider per waveform parameter,
//! reruns the generation cycle whenever a value changes, and renders the
//! strain and sensitivity charts next to the derived quantities.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::pipeline::{CycleOutput, run_cycle};
use crate::backend::{NoiseModel, WaveformGenerator};
use crate::domain::{
    Approximant, DISTANCE_RANGE, F_LOWER_RANGE, FeatureFlags, MASS_RANGE, SampleRate, WaveformRequest,
};
use crate::error::{AppError, EXIT_RUNTIME, GenerationFailure};

mod plotters_chart;

use plotters_chart::{ChartSeries, LinePlottersChart};

/// Upper bound on points handed to the chart per series.
const MAX_CHART_POINTS: usize = 1200;

const PLUS_COLOR: RGBColor = RGBColor(0, 255, 255);
const CROSS_COLOR: RGBColor = RGBColor(255, 0, 255);
const PSD_COLOR: RGBColor = RGBColor(255, 255, 0);

/// Start the TUI.
pub fn run<B>(initial: WaveformRequest, features: FeatureFlags, export_path: PathBuf, backend: B) -> Result<(), AppError>
where
    B: WaveformGenerator + NoiseModel,
{
    let _guard = TerminalGuard::new()?;

    let backend_term = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend_term)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(initial, features, export_path, backend);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// The six user-facing parameters, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Mass1,
    Mass2,
    Approximant,
    Distance,
    DeltaT,
    FLower,
}

impl Field {
    const ALL: [Field; 6] = [
        Field::Mass1,
        Field::Mass2,
        Field::Approximant,
        Field::Distance,
        Field::DeltaT,
        Field::FLower,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Mass1 => "Mass 1 (Solar Masses)",
            Field::Mass2 => "Mass 2 (Solar Masses)",
            Field::Approximant => "Waveform Approximant",
            Field::Distance => "Distance (Megaparsecs)",
            Field::DeltaT => "Time Step (delta_t)",
            Field::FLower => "Lower Frequency (Hz)",
        }
    }
}

/// Current slider positions. Always in range.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sliders {
    mass1: f64,
    mass2: f64,
    approximant: Approximant,
    distance: f64,
    sample_rate: SampleRate,
    f_lower: f64,
}

impl Sliders {
    fn from_request(req: &WaveformRequest) -> Self {
        Self {
            mass1: req.mass1(),
            mass2: req.mass2(),
            approximant: req.approximant(),
            distance: req.distance(),
            sample_rate: req.sample_rate(),
            f_lower: req.f_lower(),
        }
    }

    /// Snapshot the sliders into a fresh request for one cycle.
    fn request(&self) -> Result<WaveformRequest, AppError> {
        WaveformRequest::new(
            self.mass1,
            self.mass2,
            self.approximant,
            self.distance,
            self.sample_rate,
            self.f_lower,
        )
    }

    /// Move a field by `steps`; returns whether the value changed.
    fn adjust(&mut self, field: Field, steps: i32) -> bool {
        let before = *self;
        match field {
            Field::Mass1 => self.mass1 = MASS_RANGE.nudge(self.mass1, steps),
            Field::Mass2 => self.mass2 = MASS_RANGE.nudge(self.mass2, steps),
            Field::Distance => self.distance = DISTANCE_RANGE.nudge(self.distance, steps),
            Field::FLower => self.f_lower = F_LOWER_RANGE.nudge(self.f_lower, steps),
            Field::Approximant => {
                // Categorical: one option per key press regardless of step size.
                self.approximant = if steps >= 0 {
                    self.approximant.next()
                } else {
                    self.approximant.prev()
                };
            }
            Field::DeltaT => {
                self.sample_rate = if steps >= 0 {
                    self.sample_rate.next()
                } else {
                    self.sample_rate.prev()
                };
            }
        }
        *self != before
    }

    fn value_label(&self, field: Field) -> String {
        match field {
            Field::Mass1 => self.mass1.to_string(),
            Field::Mass2 => self.mass2.to_string(),
            Field::Approximant => self.approximant.to_string(),
            Field::Distance => self.distance.to_string(),
            Field::DeltaT => self.sample_rate.delta_t_label(),
            Field::FLower => self.f_lower.to_string(),
        }
    }
}

/// Result of the most recent cycle.
#[derive(Debug)]
enum CycleState {
    Pending,
    Ready(Box<CycleOutput>),
    Failed(GenerationFailure),
}

struct App<B> {
    sliders: Sliders,
    selected_field: usize,
    features: FeatureFlags,
    export_path: PathBuf,
    backend: B,
    cycle: CycleState,
    needs_cycle: bool,
    status: String,
}

impl<B> App<B>
where
    B: WaveformGenerator + NoiseModel,
{
    fn new(initial: WaveformRequest, features: FeatureFlags, export_path: PathBuf, backend: B) -> Self {
        Self {
            sliders: Sliders::from_request(&initial),
            selected_field: 0,
            features,
            export_path,
            backend,
            cycle: CycleState::Pending,
            needs_cycle: true,
            status: "Generating waveform...".to_string(),
        }
    }

    fn event_loop<T: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<T>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw || self.needs_cycle {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            // Generation blocks; the frame above already shows the pending state.
            if self.needs_cycle {
                self.regenerate();
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_selected(-1),
            KeyCode::Right => self.adjust_selected(1),
            KeyCode::PageDown => self.adjust_selected(-10),
            KeyCode::PageUp => self.adjust_selected(10),
            KeyCode::Home => {
                let defaults = Sliders::from_request(&WaveformRequest::default());
                if defaults != self.sliders {
                    self.sliders = defaults;
                    self.schedule_cycle();
                }
            }
            KeyCode::Char('r') => self.schedule_cycle(),
            KeyCode::Char('s') => self.save_waveform(),
            _ => {}
        }
        false
    }

    fn adjust_selected(&mut self, steps: i32) {
        let field = Field::ALL[self.selected_field];
        if self.sliders.adjust(field, steps) {
            debug!("{}: {}", field.label(), self.sliders.value_label(field));
            self.schedule_cycle();
        }
    }

    fn schedule_cycle(&mut self) {
        self.needs_cycle = true;
        self.status = "Generating waveform...".to_string();
    }

    fn regenerate(&mut self) {
        self.needs_cycle = false;
        let request = match self.sliders.request() {
            Ok(request) => request,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };

        self.cycle = match run_cycle(request, &self.features, &self.backend) {
            Ok(out) => {
                self.status = format!("Generated {} samples.", out.sample.len());
                CycleState::Ready(Box::new(out))
            }
            Err(failure) => {
                info!("cycle failed: {failure}");
                self.status = "Generation failed.".to_string();
                CycleState::Failed(failure)
            }
        };
    }

    fn save_waveform(&mut self) {
        if !self.features.enable_export {
            self.status = "Saving is disabled (--no-export).".to_string();
            return;
        }
        let CycleState::Ready(out) = &self.cycle else {
            self.status = "Nothing to save: no waveform generated.".to_string();
            return;
        };

        let result = crate::io::write_waveform_csv(&self.export_path, &out.sample);
        self.status = format!(
            "[{}] {}",
            Local::now().format("%H:%M:%S"),
            crate::report::export_status(&self.export_path, &result)
        );
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("gwviz", Style::default().fg(Color::Cyan)),
            Span::raw(" - Gravitational Waveform Visualizer"),
        ]));

        let request_line = match self.sliders.request() {
            Ok(req) => crate::report::format_request(&req),
            Err(err) => err.to_string(),
        };
        lines.push(Line::from(Span::styled(request_line, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(42), Constraint::Min(0)])
            .split(area);

        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(Field::ALL.len() as u16 + 2), Constraint::Min(0)])
            .split(columns[0]);

        self.draw_settings(frame, sidebar[0]);
        self.draw_scalars(frame, sidebar[1]);
        self.draw_charts(frame, columns[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|&field| ListItem::new(format!("{:<23} {}", field.label(), self.sliders.value_label(field))))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Waveform Parameters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_scalars(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Derived").borders(Borders::ALL);
        let lines: Vec<Line> = match &self.cycle {
            CycleState::Ready(out) => {
                let mut lines = vec![Line::from(crate::report::format_chirp_mass(&out.scalars))];
                if let Some(isco) = crate::report::format_isco_radius(&out.scalars) {
                    lines.push(Line::from(isco));
                }
                lines.push(Line::from(Span::styled(
                    format!("{} samples, {:.3} s", out.sample.len(), out.sample.duration()),
                    Style::default().fg(Color::Gray),
                )));
                lines
            }
            CycleState::Pending | CycleState::Failed(_) => {
                vec![Line::from(Span::styled("-", Style::default().fg(Color::Gray)))]
            }
        };
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let out = match &self.cycle {
            CycleState::Ready(out) => out,
            CycleState::Pending => {
                let msg = Paragraph::new("Generating waveform...")
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
            CycleState::Failed(failure) => {
                let msg = Paragraph::new(failure.to_string())
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .wrap(Wrap { trim: true })
                    .block(Block::default().title("Error").borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
        };

        match &out.sensitivity {
            Some(curve) => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(area);
                draw_strain_chart(frame, rows[0], out);
                draw_sensitivity_chart(frame, rows[1], &curve.points);
            }
            None => draw_strain_chart(frame, area, out),
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  PgUp/PgDn ×10  Home defaults  r rerun  s save  q quit";
        let status_style = match self.cycle {
            CycleState::Failed(_) => Style::default().fg(Color::Red),
            _ => Style::default().fg(Color::Yellow),
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, status_style),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_strain_chart(frame: &mut ratatui::Frame<'_>, area: Rect, out: &CycleOutput) {
    let title = Line::from(vec![
        Span::raw("Time-Domain Gravitational Waveform  "),
        Span::styled("━ h+", Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled("━ hx", Style::default().fg(Color::Magenta)),
    ]);
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let plus = decimate(&out.sample.h_plus_series(), MAX_CHART_POINTS);
    let cross = decimate(&out.sample.h_cross_series(), MAX_CHART_POINTS);
    let (x_bounds, y_bounds) = strain_bounds(out);

    let series = [
        ChartSeries {
            points: &plus,
            color: PLUS_COLOR,
        },
        ChartSeries {
            points: &cross,
            color: CROSS_COLOR,
        },
    ];
    let widget = LinePlottersChart {
        series: &series,
        x_bounds,
        y_bounds,
        x_label: "Time (s)",
        y_label: "Strain",
        fmt_x: fmt_axis_time,
        fmt_y: fmt_axis_sci,
    };
    frame.render_widget(widget, inner);
}

fn draw_sensitivity_chart(frame: &mut ratatui::Frame<'_>, area: Rect, points: &[(f64, f64)]) {
    let block = Block::default()
        .title("aLIGO Zero-Detuned High Power Sensitivity")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let log_points = decimate(&crate::plot::log_log(points), MAX_CHART_POINTS);
    let Some((x_bounds, y_bounds)) = series_bounds(&log_points) else {
        let msg = Paragraph::new("No sensitivity data above the lower frequency cutoff.")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, inner);
        return;
    };

    let series = [ChartSeries {
        points: &log_points,
        color: PSD_COLOR,
    }];
    let widget = LinePlottersChart {
        series: &series,
        x_bounds,
        y_bounds,
        x_label: "Frequency (Hz)",
        y_label: "Strain Noise",
        fmt_x: fmt_axis_log_hz,
        fmt_y: fmt_axis_log_sci,
    };
    frame.render_widget(widget, inner);
}

/// Time span on x; symmetric strain range on y.
fn strain_bounds(out: &CycleOutput) -> ([f64; 2], [f64; 2]) {
    let mut t0 = out.sample.start_time();
    let mut t1 = out.sample.end_time();
    if t1 <= t0 {
        t0 -= 0.5;
        t1 += 0.5;
    }

    let peak = out.sample.peak_strain();
    let half = if peak.is_finite() && peak > 0.0 { peak * 1.05 } else { 1.0 };
    ([t0, t1], [-half, half])
}

fn series_bounds(points: &[(f64, f64)]) -> Option<([f64; 2], [f64; 2])> {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !(x_min.is_finite() && x_max.is_finite() && x_max > x_min) {
        return None;
    }
    if !(y_min.is_finite() && y_max.is_finite() && y_max > y_min) {
        y_min -= 0.5;
        y_max += 0.5;
    }
    let pad = (y_max - y_min) * 0.05;
    Some(([x_min, x_max], [y_min - pad, y_max + pad]))
}

/// Reduce a dense series to at most `max_points`, keeping each bucket's
/// minimum and maximum so the envelope survives.
fn decimate(points: &[(f64, f64)], max_points: usize) -> Vec<(f64, f64)> {
    let buckets = max_points / 2;
    if points.len() <= max_points || buckets == 0 {
        return points.to_vec();
    }

    let bucket_len = points.len().div_ceil(buckets);
    let mut out = Vec::with_capacity(buckets * 2);
    for chunk in points.chunks(bucket_len) {
        let mut lo = 0;
        let mut hi = 0;
        for (i, p) in chunk.iter().enumerate() {
            if p.1 < chunk[lo].1 {
                lo = i;
            }
            if p.1 > chunk[hi].1 {
                hi = i;
            }
        }
        // Keep time order inside the bucket.
        let (first, second) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        out.push(chunk[first]);
        if second != first {
            out.push(chunk[second]);
        }
    }
    out
}

fn fmt_axis_time(v: f64) -> String {
    format!("{v:.2}")
}

fn fmt_axis_sci(v: f64) -> String {
    format!("{v:.1e}")
}

fn fmt_axis_log_hz(v: f64) -> String {
    format!("{:.0}", 10f64.powf(v))
}

fn fmt_axis_log_sci(v: f64) -> String {
    format!("{:.0e}", 10f64.powf(v))
}
