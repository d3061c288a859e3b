use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use dotglobe::catalog::group_by_color;
use dotglobe::color::{hsv_to_rgb, Rgba};
use dotglobe::math::{clamp_offset, clamp_unit};
use dotglobe::picker::{FieldTarget, PickerModel};
use dotglobe::sphere::GlobeGeometry;

use crate::app::{App, PickerTarget, Screen, SWATCHES};

const NEON_CYAN: Color = Color::Rgb(0, 255, 255);
const NEON_PINK: Color = Color::Rgb(255, 45, 149);
const NEON_YELLOW: Color = Color::Rgb(255, 215, 0);
const HUD_DIM: Color = Color::Rgb(80, 80, 100);
const HUD_TEXT: Color = Color::Rgb(180, 200, 220);
const HUD_BG: Rgba = Rgba::rgb(8, 8, 18);

// Width of a terminal cell relative to its height
const CELL_ASPECT: f64 = 0.5;

fn tui_color(color: Rgba) -> Color {
    Color::Rgb(color.red, color.green, color.blue)
}

// Scale an RGB color by a given factor (0.0 = black, 1.0 = unchanged).
fn shade(color: Rgba, factor: f64) -> Color {
    let factor = clamp_unit(factor);
    Color::Rgb(
        (color.red as f64 * factor) as u8,
        (color.green as f64 * factor) as u8,
        (color.blue as f64 * factor) as u8,
    )
}

// Composite a translucent color over the HUD background.
fn over_background(color: Rgba) -> Color {
    let t = color.opacity();
    let mix = |fg: u8, bg: u8| (fg as f64 * t + bg as f64 * (1.0 - t)).round() as u8;
    Color::Rgb(
        mix(color.red, HUD_BG.red),
        mix(color.green, HUD_BG.green),
        mix(color.blue, HUD_BG.blue),
    )
}

/// Cell column for a thumb at `fraction` along a track `width` cells wide.
fn thumb_column(fraction: f64, width: u16) -> Option<u16> {
    let last = width.checked_sub(1)? as f64;
    let edge = clamp_offset(clamp_unit(fraction) * last, 0.0, last, 1.0).ok()?;
    Some((edge + 0.5).round() as u16)
}

pub struct GlobeWidget<'a> {
    pub app: &'a mut App,
}

impl<'a> Widget for GlobeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = area.inner(Margin {
            vertical: 1,
            horizontal: 1,
        });
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // Surface is measured in cell heights so the globe comes out round
        if self.app.last_width != inner.width || self.app.last_height != inner.height {
            self.app.last_width = inner.width;
            self.app.last_height = inner.height;
            self.app.geometry =
                GlobeGeometry::for_surface(inner.width as f64 * CELL_ASPECT, inner.height as f64);
        }
        let Some(geometry) = self.app.geometry else {
            return;
        };

        let mut points = geometry.project_all(&self.app.dots, self.app.rotation);
        // far side first so near dots end up on top
        points.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        let (far, near) = geometry.scale_range();
        for p in &points {
            let col = (p.screen_x / CELL_ASPECT).floor();
            let row = p.screen_y.floor();
            if col < 0.0 || row < 0.0 || col >= inner.width as f64 || row >= inner.height as f64 {
                continue;
            }

            let scale = p.radius / geometry.dot_radius;
            let nearness = clamp_unit((scale - far) / (near - far));
            let glyph = if nearness > 0.66 {
                '●'
            } else if nearness > 0.33 {
                '•'
            } else {
                '·'
            };

            if let Some(cell) = buf.cell_mut((inner.x + col as u16, inner.y + row as u16)) {
                cell.set_char(glyph)
                    .set_fg(shade(self.app.dot_color, 0.25 + 0.75 * nearness));
            }
        }
    }
}

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let mut tabs = vec![Span::styled("╡ ", Style::default().fg(HUD_DIM))];
    for screen in Screen::ALL {
        let style = if screen == app.screen {
            Style::default().fg(NEON_PINK).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(HUD_DIM)
        };
        tabs.push(Span::styled(format!(" {} ", screen.title()), style));
    }
    tabs.push(Span::styled(" ╞", Style::default().fg(HUD_DIM)));

    let block = Block::default()
        .title_top(Line::from(tabs))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(NEON_CYAN))
        .style(Style::default().bg(tui_color(HUD_BG)));
    f.render_widget(block, area);

    let [body, footer] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
        .areas(area.inner(Margin {
            vertical: 1,
            horizontal: 1,
        }));

    match app.screen {
        Screen::Globe => render_globe(f, app, body),
        Screen::Picker => render_picker(f, app, body),
        Screen::Catalog => render_catalog(f, app, body),
    }

    render_footer(f, app, footer);
}

fn render_globe(f: &mut Frame, app: &mut App, area: Rect) {
    let [globe_area, info_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    f.render_widget(GlobeWidget { app: &mut *app }, globe_area);

    let mut spans = vec![Span::styled(
        format!("{} dots  ", app.dots.len()),
        Style::default().fg(HUD_TEXT),
    )];
    for (i, swatch) in SWATCHES.iter().enumerate() {
        let marker = if *swatch == app.dot_color { "◉" } else { "●" };
        spans.push(Span::styled(format!("{}{} ", i + 1, marker), Style::default().fg(tui_color(*swatch))));
    }
    spans.push(Span::styled(
        format!(" {}", app.dot_color),
        Style::default().fg(tui_color(app.dot_color)),
    ));
    if app.paused {
        spans.push(Span::styled("  PAUSED", Style::default().fg(NEON_YELLOW)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), info_area);
}

fn render_picker(f: &mut Frame, app: &App, area: Rect) {
    let [spectrum_area, hue_area, opacity_area, fields_area, label_area, target_area] =
        Layout::vertical([
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

    let buf = f.buffer_mut();
    render_spectrum(&app.picker, spectrum_area, buf);
    render_hue_strip(&app.picker, hue_area, buf);
    render_opacity_strip(&app.picker, opacity_area, buf);

    f.render_widget(Paragraph::new(field_line(app)), fields_area);

    let color = app.picker.color();
    let label = Line::from(vec![
        Span::styled("██████ ", Style::default().fg(over_background(color))),
        Span::styled(color.rgba_label(), Style::default().fg(HUD_TEXT)),
    ]);
    f.render_widget(Paragraph::new(label), label_area);

    let target = match &app.picker_target {
        PickerTarget::Globe => "globe dots".to_string(),
        PickerTarget::Catalog(key) => key.clone(),
    };
    let target_line = Line::from(vec![
        Span::styled("[p] apply to ", Style::default().fg(HUD_DIM)),
        Span::styled(target, Style::default().fg(NEON_YELLOW)),
    ]);
    f.render_widget(Paragraph::new(target_line), target_area);
}

// Saturation grows to the right, value grows upwards.
fn render_spectrum(picker: &PickerModel, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let hue = picker.hsv().hue;
    let cols = (area.width.max(2) - 1) as f64;
    let rows = (area.height.max(2) - 1) as f64;

    for y in 0..area.height {
        for x in 0..area.width {
            let saturation = x as f64 / cols * 100.0;
            let value = (1.0 - y as f64 / rows) * 100.0;
            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_char(' ')
                    .set_bg(tui_color(hsv_to_rgb(hue, saturation, value)));
            }
        }
    }

    let hsv = picker.hsv();
    let cursor = (
        thumb_column(hsv.saturation / 100.0, area.width),
        thumb_column(1.0 - hsv.value / 100.0, area.height),
    );
    if let (Some(x), Some(y)) = cursor {
        let fg = if hsv.value > 50.0 { Color::Black } else { Color::White };
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_char('◯').set_fg(fg);
        }
    }
}

fn render_hue_strip(picker: &PickerModel, area: Rect, buf: &mut Buffer) {
    let width = area.width.max(1) as f64;
    for x in 0..area.width {
        let color = hsv_to_rgb(x as f64 / width * 360.0, 100.0, 100.0);
        if let Some(cell) = buf.cell_mut((area.x + x, area.y)) {
            cell.set_char(' ').set_bg(tui_color(color));
        }
    }
    draw_thumb(area, buf, picker.hsv().hue / 360.0);
}

fn render_opacity_strip(picker: &PickerModel, area: Rect, buf: &mut Buffer) {
    let color = picker.color();
    let width = area.width.max(1) as f64;
    for x in 0..area.width {
        let step = color.with_opacity(x as f64 / width);
        if let Some(cell) = buf.cell_mut((area.x + x, area.y)) {
            cell.set_char(' ').set_bg(over_background(step));
        }
    }
    draw_thumb(area, buf, color.opacity());
}

fn draw_thumb(area: Rect, buf: &mut Buffer, fraction: f64) {
    if let Some(x) = thumb_column(fraction, area.width) {
        if let Some(cell) = buf.cell_mut((area.x + x, area.y)) {
            cell.set_char('┃').set_fg(Color::White);
        }
    }
}

fn field_line(app: &App) -> Line<'static> {
    let picker = &app.picker;
    let fields = picker.fields();
    let [a, b, c] = picker.mode().channels();
    let targets = [
        FieldTarget::Opacity,
        FieldTarget::Channel(a),
        FieldTarget::Channel(b),
        FieldTarget::Channel(c),
        FieldTarget::Hex,
    ];
    let keys = ["a", "1", "2", "3", "x"];

    let mut spans = vec![Span::styled(
        format!("{} ", picker.mode().label()),
        Style::default()
            .fg(tui_color(picker.spectrum_hue()))
            .add_modifier(Modifier::BOLD),
    )];
    for (i, target) in targets.iter().enumerate() {
        let editing = app
            .field_input
            .as_ref()
            .filter(|input| input.target() == *target);
        let (text, style) = match editing {
            Some(input) => (
                format!("{}▏", input.buffer()),
                Style::default().fg(Color::Black).bg(NEON_YELLOW),
            ),
            None if *target == FieldTarget::Hex => {
                (picker.hex(), Style::default().fg(HUD_TEXT))
            }
            None => (fields[i].to_string(), Style::default().fg(HUD_TEXT)),
        };
        spans.push(Span::styled(
            format!(" [{}]{} ", keys[i], target.label()),
            Style::default().fg(HUD_DIM),
        ));
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

fn render_catalog(f: &mut Frame, app: &App, area: Rect) {
    let [header_area, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);

    let toggle = |on: bool| if on { "on" } else { "off" };
    let filter_style = if app.filter_editing {
        Style::default().fg(Color::Black).bg(NEON_YELLOW)
    } else {
        Style::default().fg(HUD_TEXT)
    };
    let header = Line::from(vec![
        Span::styled("[/] filter ", Style::default().fg(HUD_DIM)),
        Span::styled(format!("{}▏", app.filter), filter_style),
        Span::styled(
            format!(
                "  [g] group by color: {}  [o] only alpha: {}",
                toggle(app.group_by_color),
                toggle(app.only_alpha)
            ),
            Style::default().fg(HUD_DIM),
        ),
    ]);
    f.render_widget(Paragraph::new(header), header_area);

    let entries = app.catalog.filter(&app.filter, app.only_alpha);
    if entries.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No colors found.",
            Style::default().fg(HUD_DIM),
        )));
        f.render_widget(empty, list_area);
        return;
    }

    let mut lines = Vec::new();
    let mut selected_line = 0;
    let mut index = 0;
    let mut push_entry = |lines: &mut Vec<Line<'static>>, key: &str, color: Rgba| {
        let selected = index == app.selected;
        if selected {
            selected_line = lines.len();
        }
        let key_style = if selected {
            Style::default().fg(Color::Black).bg(NEON_CYAN)
        } else {
            Style::default().fg(HUD_TEXT)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{key:<36}"), key_style),
            Span::styled(format!(" {:<36} ", color.rgba_label()), Style::default().fg(HUD_DIM)),
            Span::styled("████", Style::default().fg(over_background(color))),
        ]));
        index += 1;
    };

    if app.group_by_color {
        for group in group_by_color(&entries) {
            lines.push(Line::from(vec![
                Span::styled(
                    group.color.rgba_label(),
                    Style::default().fg(NEON_PINK).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  [{}]", group.entries.len()), Style::default().fg(HUD_DIM)),
            ]));
            for entry in &group.entries {
                push_entry(&mut lines, &entry.key, entry.color);
            }
        }
    } else {
        for entry in &entries {
            push_entry(&mut lines, &entry.key, entry.color);
        }
    }

    let visible = list_area.height.max(1) as usize;
    let scroll = selected_line.saturating_sub(visible - 1) as u16;
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), list_area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let keys = match app.screen {
        Screen::Globe => "[1-5]color [+/-]dots [space]pause",
        Screen::Picker => "[←→↑↓]spectrum [[/]]hue [,/.]opacity [m]mode [Enter]commit",
        Screen::Catalog => "[↑↓]select [Enter]edit",
    };

    let mut spans = vec![
        Span::styled(" [", Style::default().fg(HUD_DIM)),
        Span::styled("Q", Style::default().fg(NEON_YELLOW)),
        Span::styled("]uit  [", Style::default().fg(HUD_DIM)),
        Span::styled("Tab", Style::default().fg(NEON_YELLOW)),
        Span::styled(format!("]next  │  {keys}"), Style::default().fg(HUD_DIM)),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(format!("  │  {status}"), Style::default().fg(NEON_PINK)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
