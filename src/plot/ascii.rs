//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - strain: `+` for h+, `x` for hx (h+ wins where they overlap)
//! - sensitivity: `*`, both axes log10

use crate::domain::{SensitivityCurve, WaveformSample};

/// Render both polarizations against time.
pub fn render_strain_plot(sample: &WaveformSample, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let plus = sample.h_plus_series();
    let cross = sample.h_cross_series();
    let (t_min, t_max) = x_range(&plus).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(&[&plus, &cross]).unwrap_or((-1.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let bounds = Bounds { t_min, t_max, y_min, y_max };
    draw_curve(&mut grid, &plus, bounds, '+');
    draw_curve(&mut grid, &cross, bounds, 'x');

    let header = format!("Plot: t=[{t_min:.4}, {t_max:.4}] s | strain=[{y_min:.3e}, {y_max:.3e}] | + h+  x hx\n");
    finish(header, grid)
}

/// Render the sensitivity curve on log-log axes.
///
/// Non-positive PSD values cannot be placed on a log axis and are skipped.
pub fn render_sensitivity_plot(curve: &SensitivityCurve, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points = log_log(&curve.points);
    let mut grid = vec![vec![' '; width]; height];

    let Some((x_min, x_max)) = x_range(&points) else {
        return "Plot: sensitivity curve has no displayable points\n".to_string();
    };
    let (y_min, y_max) = y_range(&[&points]).unwrap_or((-1.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    draw_curve(&mut grid, &points, Bounds { t_min: x_min, t_max: x_max, y_min, y_max }, '*');

    let header = format!(
        "Plot: f=[{:.1}, {:.1}] Hz | psd=[{:.3e}, {:.3e}] (log-log)\n",
        10f64.powf(x_min),
        10f64.powf(x_max),
        10f64.powf(y_min),
        10f64.powf(y_max),
    );
    finish(header, grid)
}

/// `(log10 x, log10 y)` for strictly positive pairs.
pub fn log_log(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter(|&&(x, y)| x > 0.0 && y > 0.0)
        .map(|&(x, y)| (x.log10(), y.log10()))
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
}

fn finish(header: String, grid: Vec<Vec<char>>) -> String {
    let mut out = header;
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn x_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for &(t, _) in points {
        min_t = min_t.min(t);
        max_t = max_t.max(t);
    }
    if min_t.is_finite() && max_t.is_finite() && max_t > min_t {
        Some((min_t, max_t))
    } else {
        None
    }
}

fn y_range(series: &[&[(f64, f64)]]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for points in series {
        for &(_, y) in *points {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(f64::MIN_POSITIVE);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], b: Bounds, ch: char) {
    if curve.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, b.t_min, b.t_max, width);
        let yy = map_y(y, b.y_min, b.y_max, height);
        match prev {
            // Dense series land many samples in one cell; skip the no-op lines.
            Some(p) if p == (x, yy) => continue,
            Some((x0, y0)) => draw_line(grid, x0, y0, x, yy, ch),
            None => {
                if grid[yy][x] == ' ' {
                    grid[yy][x] = ch;
                }
            }
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(txt: &str) -> Vec<Vec<char>> {
        txt.lines().skip(1).map(|l| l.chars().collect()).collect()
    }

    #[test]
    fn strain_plot_draws_both_polarizations() {
        let sample = WaveformSample::from_series(0.0, 1.0, &[0.0, 1.0], &[1.0, 0.0]).unwrap();
        let txt = render_strain_plot(&sample, 10, 5);
        assert!(txt.starts_with("Plot: t=[0.0000, 1.0000] s"), "{txt}");

        let grid = rows(&txt);
        assert_eq!(grid.len(), 5);
        assert!(grid.iter().all(|r| r.len() == 10));
        // h+ rises from bottom-left to top-right, hx falls.
        assert_eq!(grid[4][0], '+');
        assert_eq!(grid[0][9], '+');
        assert_eq!(grid[0][0], 'x');
        assert_eq!(grid[4][9], 'x');
    }

    #[test]
    fn sensitivity_plot_is_log_log() {
        let curve = SensitivityCurve {
            points: vec![(10.0, 1e-44), (100.0, 1e-46), (1000.0, 1e-45), (2000.0, 0.0)],
        };
        let txt = render_sensitivity_plot(&curve, 20, 6);
        assert!(txt.starts_with("Plot: f=[10.0, 1000.0] Hz"), "{txt}");
        let grid = rows(&txt);
        assert_eq!(grid.len(), 6);
        // Highest PSD at the lowest frequency -> top-left.
        assert_eq!(grid[0][0], '*');
        assert_eq!(grid[0][19], ' ');
    }

    #[test]
    fn empty_sensitivity_curve_renders_hint() {
        let txt = render_sensitivity_plot(&SensitivityCurve::default(), 20, 6);
        assert_eq!(txt, "Plot: sensitivity curve has no displayable points\n");
    }

    #[test]
    fn log_log_skips_non_positive() {
        let pts = log_log(&[(0.0, 1.0), (10.0, 0.0), (100.0, 1e-2)]);
        assert_eq!(pts, vec![(2.0, -2.0)]);
    }
}
