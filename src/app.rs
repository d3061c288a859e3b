use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use dotglobe::animation::{AnimationCommand, AnimationEvent};
use dotglobe::catalog::{group_by_color, CatalogEntry, ColorCatalog};
use dotglobe::color::{Rgba, CYAN, GREEN, LIGHT_GRAY, MAGENTA, RED};
use dotglobe::config::{Config, DOT_STEP, MAX_DOTS, MIN_DOTS};
use dotglobe::picker::{FieldInput, FieldTarget, PickerModel};
use dotglobe::sphere::{generate_dots, DotSpec, GlobeGeometry, Rotation};
use std::io;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const SWATCHES: [Rgba; 5] = [RED, CYAN, MAGENTA, GREEN, LIGHT_GRAY];

// Spectrum cursor, hue and opacity steps for one key press
const SPECTRUM_STEP: f64 = 5.0;
const HUE_STEP: f64 = 5.0;
const OPACITY_STEP: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Globe,
    Picker,
    Catalog,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Globe, Screen::Picker, Screen::Catalog];

    pub fn next(self) -> Self {
        match self {
            Screen::Globe => Screen::Picker,
            Screen::Picker => Screen::Catalog,
            Screen::Catalog => Screen::Globe,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Globe => "GLOBE",
            Screen::Picker => "PICKER",
            Screen::Catalog => "CATALOG",
        }
    }
}

/// Where the picker's color goes when applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerTarget {
    Globe,
    Catalog(String),
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub tick_count: u64,
    pub status: Option<String>,

    pub rotation: Rotation,
    pub paused: bool,
    pub dots: Vec<DotSpec>,
    pub dot_color: Rgba,
    pub last_width: u16,
    pub last_height: u16,
    pub geometry: Option<GlobeGeometry>,

    pub picker: PickerModel,
    pub picker_target: PickerTarget,
    pub field_input: Option<FieldInput>,

    pub catalog: ColorCatalog,
    pub filter: String,
    pub filter_editing: bool,
    pub group_by_color: bool,
    pub only_alpha: bool,
    pub selected: usize,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            screen: Screen::default(),
            tick_count: 0,
            status: None,
            rotation: Rotation::default(),
            paused: false,
            dots: generate_dots(&mut rand::thread_rng(), config.dots),
            dot_color: config.dot_color,
            last_width: 0,
            last_height: 0,
            geometry: None,
            picker: PickerModel::new(config.picker_color),
            picker_target: PickerTarget::Globe,
            field_input: None,
            catalog: ColorCatalog::builtin(),
            filter: String::new(),
            filter_editing: false,
            group_by_color: false,
            only_alpha: false,
            selected: 0,
        }
    }

    pub fn handle_animation_event(&mut self, event: AnimationEvent) {
        match event {
            AnimationEvent::Frame { progress } => {
                self.rotation = Rotation::from_progress(progress);
                self.tick_count = self.tick_count.wrapping_add(1);
            }
        }
    }

    pub fn handle_events(&mut self, cmd_sender: &mpsc::Sender<AnimationCommand>) -> io::Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key, cmd_sender);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent, cmd_sender: &mpsc::Sender<AnimationCommand>) {
        if self.field_input.is_some() {
            self.handle_field_key(key.code);
            return;
        }
        if self.filter_editing {
            self.handle_filter_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.screen = self.screen.next();
                self.status = None;
                return;
            }
            _ => {}
        }

        match self.screen {
            Screen::Globe => self.handle_globe_key(key.code, cmd_sender),
            Screen::Picker => self.handle_picker_key(key.code),
            Screen::Catalog => self.handle_catalog_key(key.code),
        }
    }

    fn handle_globe_key(&mut self, code: KeyCode, cmd_sender: &mpsc::Sender<AnimationCommand>) {
        match code {
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.dot_color = SWATCHES[index];
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.set_dot_count(self.dots.len() + DOT_STEP);
            }
            KeyCode::Char('-') => {
                self.set_dot_count(self.dots.len().saturating_sub(DOT_STEP));
            }
            KeyCode::Char(' ') => {
                let cmd = if self.paused {
                    AnimationCommand::Resume
                } else {
                    AnimationCommand::Pause
                };
                match cmd_sender.try_send(cmd) {
                    Ok(()) => self.paused = !self.paused,
                    Err(e) => warn!("animation command dropped: {e}"),
                }
            }
            _ => {}
        }
    }

    /// Regenerates every dot; existing placements are never reused.
    pub fn set_dot_count(&mut self, count: usize) {
        let count = count.clamp(MIN_DOTS, MAX_DOTS);
        if count == self.dots.len() {
            return;
        }
        self.dots = generate_dots(&mut rand::thread_rng(), count);
        info!(count, "regenerated globe dots");
    }

    fn handle_picker_key(&mut self, code: KeyCode) {
        let hsv = self.picker.hsv();
        match code {
            KeyCode::Left => self.picker.set_saturation(hsv.saturation - SPECTRUM_STEP),
            KeyCode::Right => self.picker.set_saturation(hsv.saturation + SPECTRUM_STEP),
            KeyCode::Up => self.picker.set_value(hsv.value + SPECTRUM_STEP),
            KeyCode::Down => self.picker.set_value(hsv.value - SPECTRUM_STEP),
            KeyCode::Char('[') => self.picker.set_hue(hsv.hue - HUE_STEP),
            KeyCode::Char(']') => self.picker.set_hue(hsv.hue + HUE_STEP),
            KeyCode::Char(',') => self.step_opacity(-OPACITY_STEP),
            KeyCode::Char('.') => self.step_opacity(OPACITY_STEP),
            KeyCode::Char('m') => self.picker.toggle_mode(),
            KeyCode::Char('a') => self.open_field(FieldTarget::Opacity),
            KeyCode::Char(c @ '1'..='3') => {
                let channel = self.picker.mode().channels()[c as usize - '1' as usize];
                self.open_field(FieldTarget::Channel(channel));
            }
            KeyCode::Char('x') => self.open_field(FieldTarget::Hex),
            KeyCode::Char('p') => self.apply_picker(),
            _ => {}
        }
    }

    fn step_opacity(&mut self, delta: i32) {
        let percent = self.picker.color().opacity_percent() as i32;
        if let Err(e) = self.picker.set_opacity_percent(percent + delta) {
            self.reject(e.to_string());
        }
    }

    fn open_field(&mut self, target: FieldTarget) {
        self.field_input = Some(FieldInput::new(target, &self.picker));
        self.status = None;
    }

    fn handle_field_key(&mut self, code: KeyCode) {
        let Some(input) = self.field_input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => input.pop(),
            KeyCode::Esc => self.field_input = None,
            KeyCode::Enter => {
                if let Some(input) = self.field_input.take() {
                    match input.commit(&mut self.picker) {
                        Ok(true) => debug!(field = input.target().label(), "field committed"),
                        Ok(false) => {
                            self.reject(format!("'{}' is not a number", input.buffer()));
                        }
                        Err(e) => self.reject(e.to_string()),
                    }
                }
            }
            _ => {}
        }
    }

    pub fn apply_picker(&mut self) {
        let color = self.picker.color();
        match &self.picker_target {
            PickerTarget::Globe => {
                self.dot_color = color;
                self.status = Some(format!("Globe dots set to {color}"));
            }
            PickerTarget::Catalog(key) => {
                self.catalog.set(key.clone(), color);
                self.status = Some(format!("{key} set to {color}"));
            }
        }
        info!(destination = ?self.picker_target, %color, "picker color applied");
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.filter.push(c);
                self.selected = 0;
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.selected = 0;
            }
            KeyCode::Enter | KeyCode::Esc => self.filter_editing = false,
            _ => {}
        }
    }

    fn handle_catalog_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('/') => self.filter_editing = true,
            KeyCode::Char('g') => {
                self.group_by_color = !self.group_by_color;
                self.selected = 0;
            }
            KeyCode::Char('o') => {
                self.only_alpha = !self.only_alpha;
                self.selected = 0;
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                let len = self.visible_entries().len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
    }

    /// Filtered catalog entries in the order they are listed on screen.
    pub fn visible_entries(&self) -> Vec<CatalogEntry> {
        let entries = self.catalog.filter(&self.filter, self.only_alpha);
        if self.group_by_color {
            group_by_color(&entries)
                .into_iter()
                .flat_map(|group| group.entries)
                .collect()
        } else {
            entries
        }
    }

    fn open_selected(&mut self) {
        let Some(entry) = self.visible_entries().into_iter().nth(self.selected) else {
            return;
        };
        self.picker = PickerModel::new(entry.color);
        self.picker_target = PickerTarget::Catalog(entry.key);
        self.screen = Screen::Picker;
        self.status = None;
    }

    fn reject(&mut self, message: String) {
        warn!("{message}");
        self.status = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app() -> (App, mpsc::Sender<AnimationCommand>, mpsc::Receiver<AnimationCommand>) {
        let (tx, rx) = mpsc::channel(8);
        let config = Config {
            dots: 200,
            ..Config::default()
        };
        (App::new(&config), tx, rx)
    }

    fn press(app: &mut App, tx: &mpsc::Sender<AnimationCommand>, codes: &[KeyCode]) {
        for &code in codes {
            app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), tx);
        }
    }

    fn type_text(app: &mut App, tx: &mpsc::Sender<AnimationCommand>, text: &str) {
        for c in text.chars() {
            press(app, tx, &[KeyCode::Char(c)]);
        }
    }

    #[test]
    fn test_dot_count_steps_and_bounds() {
        let (mut app, tx, _rx) = app();
        assert_eq!(app.dots.len(), 200);
        press(&mut app, &tx, &[KeyCode::Char('-'), KeyCode::Char('-'), KeyCode::Char('-')]);
        assert_eq!(app.dots.len(), MIN_DOTS);
        app.set_dot_count(5000);
        assert_eq!(app.dots.len(), MAX_DOTS);
    }

    #[test]
    fn test_swatch_keys() {
        let (mut app, tx, _rx) = app();
        press(&mut app, &tx, &[KeyCode::Char('4')]);
        assert_eq!(app.dot_color, GREEN);
    }

    #[test]
    fn test_space_pauses_animation() {
        let (mut app, tx, mut rx) = app();
        press(&mut app, &tx, &[KeyCode::Char(' ')]);
        assert!(app.paused);
        assert_eq!(rx.try_recv(), Ok(AnimationCommand::Pause));
        press(&mut app, &tx, &[KeyCode::Char(' ')]);
        assert_eq!(rx.try_recv(), Ok(AnimationCommand::Resume));
    }

    #[test]
    fn test_dropped_pause_keeps_running() {
        let (mut app, tx, rx) = app();
        drop(rx);
        press(&mut app, &tx, &[KeyCode::Char(' ')]);
        assert!(!app.paused);
    }

    #[test]
    fn test_opacity_keys_step_by_five() {
        let (mut app, tx, _rx) = app();
        press(&mut app, &tx, &[KeyCode::Tab]);
        assert_eq!(app.screen, Screen::Picker);
        press(&mut app, &tx, &[KeyCode::Char(','), KeyCode::Char(',')]);
        assert_eq!(app.picker.fields()[0], 90);
        press(&mut app, &tx, &[KeyCode::Char('.')]);
        assert_eq!(app.picker.fields()[0], 95);
    }

    #[test]
    fn test_frame_sets_rotation() {
        let (mut app, _tx, _rx) = app();
        app.handle_animation_event(AnimationEvent::Frame { progress: 0.5 });
        assert!((app.rotation.radians() - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(app.tick_count, 1);
    }

    #[test]
    fn test_picker_hex_field_applies_to_globe() {
        let (mut app, tx, _rx) = app();
        press(&mut app, &tx, &[KeyCode::Tab, KeyCode::Char('x')]);
        for _ in 0..6 {
            press(&mut app, &tx, &[KeyCode::Backspace]);
        }
        type_text(&mut app, &tx, "ffff00");
        press(&mut app, &tx, &[KeyCode::Enter, KeyCode::Char('p')]);
        assert_eq!(app.dot_color, Rgba::rgb(255, 255, 0));
        assert!(app.field_input.is_none());
    }

    #[test]
    fn test_bad_field_input_reports_and_keeps_color() {
        let (mut app, tx, _rx) = app();
        let before = app.picker.color();
        press(&mut app, &tx, &[KeyCode::Tab, KeyCode::Char('1')]);
        type_text(&mut app, &tx, "zz");
        press(&mut app, &tx, &[KeyCode::Enter]);
        assert_eq!(app.picker.color(), before);
        assert!(app.status.is_some());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_escape_in_field_does_not_quit() {
        let (mut app, tx, _rx) = app();
        press(&mut app, &tx, &[KeyCode::Tab, KeyCode::Char('a'), KeyCode::Esc]);
        assert!(app.field_input.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_catalog_edit_round_trip() {
        let (mut app, tx, _rx) = app();
        press(&mut app, &tx, &[KeyCode::Tab, KeyCode::Tab, KeyCode::Char('/')]);
        type_text(&mut app, &tx, "panel.back");
        press(&mut app, &tx, &[KeyCode::Enter]);
        assert_eq!(app.visible_entries().len(), 1);

        press(&mut app, &tx, &[KeyCode::Enter]);
        assert_eq!(app.screen, Screen::Picker);
        assert_eq!(
            app.picker_target,
            PickerTarget::Catalog("Panel.background".to_string())
        );

        app.picker.set_rgb(1, 2, 3);
        press(&mut app, &tx, &[KeyCode::Char('p')]);
        assert_eq!(app.catalog.get("Panel.background"), Some(Rgba::rgb(1, 2, 3)));
    }

    #[test]
    fn test_catalog_selection_stays_in_bounds() {
        let (mut app, tx, _rx) = app();
        press(&mut app, &tx, &[KeyCode::Tab, KeyCode::Tab, KeyCode::Char('o')]);
        let len = app.visible_entries().len();
        for _ in 0..len + 5 {
            press(&mut app, &tx, &[KeyCode::Down]);
        }
        assert_eq!(app.selected, len - 1);
        assert!(app.visible_entries().iter().all(|e| e.color.alpha < 255));
    }
}
