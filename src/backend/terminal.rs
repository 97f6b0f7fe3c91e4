//! Terminal rendering backend built on ratatui.

use super::{AxesHandle, Backend, FigureHandle, GridSlot};
use crate::error::{PanoplotError, Result};
use crate::plots::{AxesDisplay, Colormap, FigSize, Marker, Plot, PlotKind, StyleScope};
use ndarray::IxDyn;
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
    Terminal, TerminalOptions, Viewport,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Dots of output resolution per terminal column.
const DOTS_PER_COLUMN: f64 = 15.0;
/// Dots of output resolution per terminal row (cells are about twice as tall as wide).
const DOTS_PER_ROW: f64 = 30.0;

/// Colors for the second and later series of an axes.
const CYCLE: [Color; 5] = [
    Color::Rgb(251, 73, 52),
    Color::Rgb(184, 187, 38),
    Color::Rgb(211, 134, 155),
    Color::Rgb(142, 192, 124),
    Color::Rgb(254, 128, 25),
];

/// Where `show` draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalViewport {
    /// Below the cursor, scrolling the terminal.
    #[default]
    Inline,
    /// The whole screen; for use inside an alternate screen.
    Fullscreen,
}

/// Terminal backend configuration.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Resolution used by `show` to size figures.
    pub dpi: u32,
    /// Where `show` draws.
    pub viewport: TerminalViewport,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            viewport: TerminalViewport::Inline,
        }
    }
}

impl TerminalConfig {
    /// Cell grid (columns, rows) for a figure size at a resolution.
    pub fn cells(size: FigSize, dpi: u32) -> (u16, u16) {
        let dpi = f64::from(dpi.max(1));
        let cols = (size.width * dpi / DOTS_PER_COLUMN).round().clamp(16.0, 1000.0);
        let rows = (size.height * dpi / DOTS_PER_ROW).round().clamp(8.0, 500.0);
        (cols as u16, rows as u16)
    }
}

#[derive(Debug)]
struct AxesState {
    figure: FigureHandle,
    slot: GridSlot,
    plots: Vec<Plot>,
    display: AxesDisplay,
}

/// Renders figures as character cells: line and scatter plots through the
/// ratatui `Chart` widget, colormaps painted cell by cell.
#[derive(Debug, Default)]
pub struct TerminalBackend {
    config: TerminalConfig,
    next_id: u64,
    figures: BTreeMap<FigureHandle, FigSize>,
    axes: BTreeMap<AxesHandle, AxesState>,
}

/// Colors resolved from a style scope.
#[derive(Debug, Clone, Copy)]
struct Palette {
    background: Color,
    text: Color,
    border: Color,
    line: Color,
    scatter: Color,
    cmap: Colormap,
}

impl Palette {
    fn from_style(style: &StyleScope) -> Self {
        let color = |key: &str, fallback: Color| {
            style
                .get(key)
                .and_then(|value| Color::from_str(value).ok())
                .unwrap_or(fallback)
        };
        Self {
            background: color("axes.facecolor", Color::Reset),
            text: color("text.color", Color::Reset),
            border: color("axes.edgecolor", Color::Gray),
            line: color("lines.color", Color::Cyan),
            scatter: color("scatter.color", Color::Yellow),
            cmap: style
                .get("image.cmap")
                .and_then(|value| value.parse().ok())
                .unwrap_or_default(),
        }
    }
}

impl TerminalBackend {
    /// Create a backend with the given configuration.
    pub fn new(config: TerminalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn figure_size(&self, figure: FigureHandle) -> Result<FigSize> {
        self.figures
            .get(&figure)
            .copied()
            .ok_or_else(|| PanoplotError::resource_state(format!("{} is not open", figure)))
    }

    fn axes_mut(&mut self, axes: AxesHandle) -> Result<&mut AxesState> {
        self.axes
            .get_mut(&axes)
            .ok_or_else(|| PanoplotError::resource_state(format!("{} does not exist", axes)))
    }

    /// Render a figure into `area` of `buf`.
    pub fn render(&self, figure: FigureHandle, area: Rect, buf: &mut Buffer, style: &StyleScope) -> Result<()> {
        self.figure_size(figure)?;
        let palette = Palette::from_style(style);
        buf.set_style(area, Style::default().bg(palette.background).fg(palette.text));

        let mut axes: Vec<&AxesState> = self.axes.values().filter(|a| a.figure == figure).collect();
        axes.sort_by_key(|a| a.slot.index);

        for state in axes {
            if let Some(rect) = slot_rect(area, state.slot) {
                render_axes(state, rect, buf, &palette);
            }
        }
        Ok(())
    }

    /// Render a figure off-screen and return its text, cropped to content.
    pub fn render_text(&self, figure: FigureHandle, dpi: u32, style: &StyleScope) -> Result<String> {
        let (cols, rows) = TerminalConfig::cells(self.figure_size(figure)?, dpi);
        let area = Rect::new(0, 0, cols, rows);
        let mut buf = Buffer::empty(area);
        self.render(figure, area, &mut buf, style)?;
        Ok(buffer_text(&buf))
    }
}

impl Backend for TerminalBackend {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn new_figure(&mut self, size: FigSize) -> Result<FigureHandle> {
        let figure = FigureHandle(self.next_id());
        self.figures.insert(figure, size);
        Ok(figure)
    }

    fn close_figure(&mut self, figure: FigureHandle) -> Result<()> {
        self.figures
            .remove(&figure)
            .ok_or_else(|| PanoplotError::resource_state(format!("{} is not open", figure)))?;
        self.axes.retain(|_, state| state.figure != figure);
        Ok(())
    }

    fn add_axes(&mut self, figure: FigureHandle, slot: GridSlot) -> Result<AxesHandle> {
        self.figure_size(figure)?;
        let axes = AxesHandle(self.next_id());
        self.axes.insert(
            axes,
            AxesState {
                figure,
                slot,
                plots: Vec::new(),
                display: AxesDisplay::default(),
            },
        );
        Ok(axes)
    }

    fn remove_axes(&mut self, axes: AxesHandle) -> Result<()> {
        self.axes
            .remove(&axes)
            .map(|_| ())
            .ok_or_else(|| PanoplotError::resource_state(format!("{} does not exist", axes)))
    }

    fn draw(&mut self, axes: AxesHandle, plot: &Plot) -> Result<()> {
        self.axes_mut(axes)?.plots.push(plot.clone());
        Ok(())
    }

    fn decorate(&mut self, axes: AxesHandle, display: &AxesDisplay) -> Result<()> {
        self.axes_mut(axes)?.display = display.clone();
        Ok(())
    }

    fn show(&mut self, figure: FigureHandle, style: &StyleScope) -> Result<()> {
        let (cols, rows) = TerminalConfig::cells(self.figure_size(figure)?, self.config.dpi);
        let viewport = match self.config.viewport {
            TerminalViewport::Inline => Viewport::Inline(rows),
            TerminalViewport::Fullscreen => Viewport::Fullscreen,
        };
        let mut terminal = Terminal::with_options(
            CrosstermBackend::new(std::io::stdout()),
            TerminalOptions { viewport },
        )?;

        let mut result = Ok(());
        terminal.draw(|f| {
            let full = f.area();
            let area = Rect {
                width: full.width.min(cols),
                height: full.height.min(rows),
                ..full
            };
            result = self.render(figure, area, f.buffer_mut(), style);
        })?;
        result
    }

    fn save(&mut self, figure: FigureHandle, path: &Path, dpi: u32, style: &StyleScope) -> Result<()> {
        let text = self.render_text(figure, dpi, style)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Rectangle of a grid slot, or `None` if the slot lies outside the grid.
fn slot_rect(area: Rect, slot: GridSlot) -> Option<Rect> {
    let (row, col) = slot.cell();
    if slot.nrows == 0 || slot.ncols == 0 || row >= slot.nrows {
        return None;
    }

    let nrows = u32::try_from(slot.nrows).ok()?;
    let ncols = u32::try_from(slot.ncols).ok()?;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, nrows); slot.nrows])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, ncols); slot.ncols])
        .split(rows[row]);
    Some(cols[col])
}

fn render_axes(state: &AxesState, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let display = &state.display;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(fit(&format!(" {} ", display.title), area.width.saturating_sub(2)))
        .title_style(Style::default().fg(palette.text));
    let mut inner = block.inner(area);
    block.render(area, buf);

    if inner.width < 4 || inner.height < 3 {
        return;
    }

    if let Some(title) = &display.colorbar {
        let bar = Rect {
            y: inner.y + inner.height - 1,
            height: 1,
            ..inner
        };
        draw_colorbar(bar, buf, palette, title, display.colorbar_limits);
        inner.height -= 1;
    }

    for plot in state.plots.iter().filter(|p| p.kind() == PlotKind::ColorMap) {
        let cmap = plot.options().colormap.unwrap_or(palette.cmap);
        let limits = plot.options().vlim.or(display.colorbar_limits);
        paint_colormap(plot, inner, buf, cmap, limits);
    }

    let series: Vec<(usize, &Plot, Vec<(f64, f64)>)> = state
        .plots
        .iter()
        .enumerate()
        .filter(|(_, p)| p.kind() != PlotKind::ColorMap)
        .map(|(i, p)| (i, p, p.points()))
        .collect();

    let [x0, x1] = limits_or_unit(display.xlim);
    let [y0, y1] = limits_or_unit(display.ylim);

    let datasets: Vec<Dataset<'_>> = series
        .iter()
        .enumerate()
        .map(|(n, (i, plot, points))| {
            let fallback = match (n, plot.kind()) {
                (0, PlotKind::Scatter) => palette.scatter,
                (0, _) => palette.line,
                (n, _) => CYCLE[(n - 1) % CYCLE.len()],
            };
            let color = plot
                .options()
                .color
                .as_deref()
                .and_then(|c| Color::from_str(c).ok())
                .unwrap_or(fallback);
            let graph_type = match plot.kind() {
                PlotKind::Scatter => GraphType::Scatter,
                _ => GraphType::Line,
            };

            let dataset = Dataset::default()
                .marker(marker_symbol(plot.options().marker.unwrap_or_default()))
                .graph_type(graph_type)
                .style(Style::default().fg(color))
                .data(points);
            match display.legend.get(*i) {
                Some(label) => dataset.name(label.clone()),
                None => dataset,
            }
        })
        .collect();

    let axis_style = Style::default().fg(palette.text);
    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(fit(&display.xlabel, inner.width / 2))
                .style(axis_style)
                .bounds([x0, x1])
                .labels(vec![
                    format_axis_label(x0),
                    format_axis_label((x0 + x1) / 2.0),
                    format_axis_label(x1),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(fit(&display.ylabel, inner.width / 2))
                .style(axis_style)
                .bounds([y0, y1])
                .labels(vec![
                    format_axis_label(y0),
                    format_axis_label((y0 + y1) / 2.0),
                    format_axis_label(y1),
                ]),
        );
    chart.render(inner, buf);
}

/// Paint a 2-D colormap: first data dimension along x, second along y
/// (upwards).
fn paint_colormap(plot: &Plot, area: Rect, buf: &mut Buffer, cmap: Colormap, limits: Option<(f64, f64)>) {
    let data = plot.data().data();
    let shape = data.shape();
    let (nx, ny) = (shape[0], shape[1]);
    if nx == 0 || ny == 0 || area.width == 0 || area.height == 0 {
        return;
    }

    let (lo, hi) = limits.or_else(|| plot.color_bounds()).unwrap_or((0.0, 1.0));
    let mut range = hi - lo;
    if range.abs() < 1e-12 {
        range = 1.0;
    }

    let (width, height) = (area.width as usize, area.height as usize);
    for row in 0..height {
        let iy = ny - 1 - (row * ny / height).min(ny - 1);
        for col in 0..width {
            let ix = (col * nx / width).min(nx - 1);
            let value = data.get(IxDyn(&[ix, iy])).copied().unwrap_or(f64::NAN);
            if let Some(cell) = buf.cell_mut((area.x + col as u16, area.y + row as u16)) {
                if value.is_finite() {
                    let (r, g, b) = cmap.rgb((value - lo) / range);
                    cell.set_char('█').set_fg(Color::Rgb(r, g, b));
                } else {
                    cell.set_char('·').set_fg(Color::DarkGray);
                }
            }
        }
    }
}

fn draw_colorbar(area: Rect, buf: &mut Buffer, palette: &Palette, title: &str, limits: Option<(f64, f64)>) {
    let (lo, hi) = limits.unwrap_or((0.0, 1.0));
    let min_label = format_axis_label(lo);
    let max_label = format_axis_label(hi);
    let text_style = Style::default().fg(palette.text);

    let reserved = (min_label.width() + max_label.width() + 2) as u16;
    let bar_width = area.width.saturating_sub(reserved).min(area.width / 2);

    let mut x = area.x;
    buf.set_stringn(x, area.y, &min_label, area.width as usize, text_style);
    x += min_label.width() as u16 + 1;

    for i in 0..bar_width {
        let t = f64::from(i) / f64::from(bar_width.max(1));
        let (r, g, b) = palette.cmap.rgb(t);
        if let Some(cell) = buf.cell_mut((x + i, area.y)) {
            cell.set_char('█').set_fg(Color::Rgb(r, g, b));
        }
    }
    x += bar_width + 1;

    let right = area.x + area.width;
    if x < right {
        let rest = format!("{} {}", max_label, title);
        buf.set_stringn(x, area.y, fit(&rest, right - x), (right - x) as usize, text_style);
    }
}

fn marker_symbol(marker: Marker) -> symbols::Marker {
    match marker {
        Marker::Braille => symbols::Marker::Braille,
        Marker::Dot => symbols::Marker::Dot,
        Marker::Block => symbols::Marker::Block,
    }
}

fn limits_or_unit(limits: Option<(f64, f64)>) -> [f64; 2] {
    match limits {
        Some((lo, hi)) if hi > lo => [lo, hi],
        Some((v, _)) => [v - 0.5, v + 0.5],
        None => [0.0, 1.0],
    }
}

/// Format axis label with smart precision.
fn format_axis_label(val: f64) -> String {
    if !val.is_finite() {
        return "?".to_string();
    }
    let abs_val = val.abs();
    if abs_val == 0.0 {
        "0".to_string()
    } else if !(1e-2..1e5).contains(&abs_val) {
        format!("{:.1e}", val)
    } else if abs_val >= 100.0 {
        format!("{:.0}", val)
    } else if abs_val >= 1.0 {
        format!("{:.1}", val)
    } else {
        format!("{:.2}", val)
    }
}

/// Truncate `text` to `width` display columns, marking the cut with `…`.
fn fit(text: &str, width: u16) -> String {
    let width = width as usize;
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    if width > 0 {
        out.push('…');
    }
    out
}

/// Buffer contents as text, with trailing blanks removed.
fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut lines: Vec<String> = (area.top()..area.bottom())
        .map(|y| {
            let line: String = (area.left()..area.right())
                .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol()))
                .collect();
            line.trim_end().to_string()
        })
        .collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AxisKind, PlotData, PlotDataAxis};
    use crate::plots::{PlotOptions, StyleName, StyleSource};
    use ndarray::{array, Array, Array2};
    use std::rc::Rc;

    fn scope() -> StyleScope {
        StyleScope::acquire(&StyleSource::Bundled(StyleName::Dark), &Default::default()).unwrap()
    }

    fn line_plot() -> Plot {
        let x = PlotDataAxis::new("x1", "x_1", "", AxisKind::Grid, Array::linspace(0.0, 6.0, 50)).unwrap();
        let y = x.data().mapv(f64::sin).into_dyn();
        let data = PlotData::new("e1", "E_1", "", y, array![1.0], "", vec![x]).unwrap();
        Plot::new(PlotKind::Line, Rc::new(data), PlotOptions::default()).unwrap()
    }

    fn map_plot() -> Plot {
        let x = PlotDataAxis::new("x1", "x_1", "", AxisKind::Grid, Array::linspace(0.0, 1.0, 8)).unwrap();
        let y = PlotDataAxis::new("x2", "x_2", "", AxisKind::Grid, Array::linspace(0.0, 1.0, 4)).unwrap();
        let values = Array2::from_shape_fn((8, 4), |(i, j)| (i + j) as f64).into_dyn();
        let data = PlotData::new("rho", "ρ", "", values, array![1.0], "", vec![x, y]).unwrap();
        Plot::new(PlotKind::ColorMap, Rc::new(data), PlotOptions::default()).unwrap()
    }

    fn display(title: &str, plot: &Plot) -> AxesDisplay {
        AxesDisplay {
            title: title.to_string(),
            xlabel: plot.x_title(),
            ylabel: plot.y_title(),
            xlim: plot.x_bounds(),
            ylim: plot.y_bounds(),
            colorbar: plot.color_title(),
            colorbar_limits: plot.color_bounds(),
            legend: vec![plot.legend_label()],
        }
    }

    #[test]
    fn cells_scale_with_resolution() {
        assert_eq!(TerminalConfig::cells(FigSize::default(), 150), (90, 30));
        assert_eq!(TerminalConfig::cells(FigSize::default(), 300), (180, 60));
        assert_eq!(TerminalConfig::cells(FigSize::default(), 1), (16, 8));
    }

    #[test]
    fn renders_panels_in_grid_order() {
        let mut backend = TerminalBackend::default();
        let figure = backend.new_figure(FigSize::default()).unwrap();

        let left = backend
            .add_axes(figure, GridSlot { nrows: 1, ncols: 2, index: 1 })
            .unwrap();
        let right = backend
            .add_axes(figure, GridSlot { nrows: 1, ncols: 2, index: 2 })
            .unwrap();

        let line = line_plot();
        backend.draw(left, &line).unwrap();
        backend.decorate(left, &display("LEFTPANEL", &line)).unwrap();
        let map = map_plot();
        backend.draw(right, &map).unwrap();
        backend.decorate(right, &display("RIGHTPANEL", &map)).unwrap();

        let text = backend.render_text(figure, 150, &scope()).unwrap();
        let first = text.lines().next().unwrap();
        let l = first.find("LEFTPANEL").unwrap();
        let r = first.find("RIGHTPANEL").unwrap();
        assert!(l < r);
        assert!(text.contains('█'));
    }

    #[test]
    fn closed_figures_cannot_render() {
        let mut backend = TerminalBackend::default();
        let figure = backend.new_figure(FigSize::default()).unwrap();
        backend.close_figure(figure).unwrap();
        assert!(backend.render_text(figure, 150, &scope()).is_err());
        assert!(backend.add_axes(figure, GridSlot { nrows: 1, ncols: 1, index: 1 }).is_err());
    }

    #[test]
    fn slots_outside_the_grid_are_skipped() {
        let area = Rect::new(0, 0, 40, 20);
        assert!(slot_rect(area, GridSlot { nrows: 1, ncols: 2, index: 3 }).is_none());
        let rect = slot_rect(area, GridSlot { nrows: 2, ncols: 2, index: 4 }).unwrap();
        assert_eq!((rect.x, rect.y), (20, 10));
    }

    #[test]
    fn fit_truncates_by_display_width() {
        assert_eq!(fit("abc", 5), "abc");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("ωωωω", 3), "ωω…");
    }

    #[test]
    fn axis_labels() {
        assert_eq!(format_axis_label(0.0), "0");
        assert_eq!(format_axis_label(123.4), "123");
        assert_eq!(format_axis_label(0.5), "0.50");
        assert_eq!(format_axis_label(2.0e6), "2.0e6");
        assert_eq!(format_axis_label(f64::NAN), "?");
    }
}
