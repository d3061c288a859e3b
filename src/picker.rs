//! Color picker state.
//!
//! [`PickerModel`] owns one color and keeps its HSV and RGB forms in step.
//! Every edit goes through a method here; the host never converts on its own.

use crate::color::{hsv_to_rgb, parse_hex, wrap_hue, Hsv, Rgba};
use crate::error::ColorError;
use crate::math::{clamp, clamp_unit};

/// Which channel triple the numeric fields show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Hsv,
    Rgb,
}

impl DisplayMode {
    pub fn channels(self) -> [Channel; 3] {
        match self {
            DisplayMode::Hsv => [Channel::Hue, Channel::Saturation, Channel::Value],
            DisplayMode::Rgb => [Channel::Red, Channel::Green, Channel::Blue],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Hsv => "HSV",
            DisplayMode::Rgb => "RGB",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Hsv => DisplayMode::Rgb,
            DisplayMode::Rgb => DisplayMode::Hsv,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Hue,
    Saturation,
    Value,
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn label(self) -> &'static str {
        match self {
            Channel::Hue => "H",
            Channel::Saturation => "S",
            Channel::Value => "V",
            Channel::Red => "R",
            Channel::Green => "G",
            Channel::Blue => "B",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PickerModel {
    hsv: Hsv,
    color: Rgba,
    mode: DisplayMode,
}

impl PickerModel {
    pub fn new(initial: Rgba) -> Self {
        Self {
            hsv: initial.to_hsv(),
            color: initial,
            mode: DisplayMode::default(),
        }
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    /// Fully saturated, full value color at the current hue.
    pub fn spectrum_hue(&self) -> Rgba {
        hsv_to_rgb(self.hsv.hue, 100.0, 100.0)
    }

    /// `rrggbb`, or `rrggbbaa` once the color is translucent.
    pub fn hex(&self) -> String {
        self.color.to_hex(!self.color.is_opaque())
    }

    pub fn set_hue(&mut self, hue: f64) {
        self.hsv.hue = wrap_hue(hue);
        self.sync_rgb();
    }

    pub fn set_saturation(&mut self, saturation: f64) {
        self.hsv.saturation = clamp_unit(saturation / 100.0) * 100.0;
        self.sync_rgb();
    }

    pub fn set_value(&mut self, value: f64) {
        self.hsv.value = clamp_unit(value / 100.0) * 100.0;
        self.sync_rgb();
    }

    /// Picks saturation (left to right) and value (top to bottom) from a point
    /// inside a `width` x `height` spectrum square.
    pub fn pick_spectrum(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.hsv.saturation = clamp_unit(x / width) * 100.0;
        self.hsv.value = (1.0 - clamp_unit(y / height)) * 100.0;
        self.sync_rgb();
    }

    /// Picks the hue from a point along a `width` long hue strip.
    pub fn pick_hue(&mut self, x: f64, width: f64) {
        self.set_hue(clamp_unit(x / width) * 360.0);
    }

    pub fn set_opacity_percent(&mut self, percent: i32) -> Result<(), ColorError> {
        let percent = clamp(percent, 0, 100)?;
        self.color = self.color.with_opacity(percent as f64 / 100.0);
        Ok(())
    }

    /// Replaces the RGB channels, keeping the current alpha.
    pub fn set_rgb(&mut self, red: u8, green: u8, blue: u8) {
        self.color = Rgba::new(red, green, blue, self.color.alpha);
        self.sync_hsv();
    }

    /// A numeric field edit. Values are clamped to the channel's range first.
    pub fn set_channel(&mut self, channel: Channel, value: i32) -> Result<(), ColorError> {
        match channel {
            Channel::Hue => self.set_hue(clamp(value, 0, 360)? as f64),
            Channel::Saturation => self.set_saturation(clamp(value, 0, 100)? as f64),
            Channel::Value => self.set_value(clamp(value, 0, 100)? as f64),
            Channel::Red | Channel::Green | Channel::Blue => {
                let level = clamp(value, 0, 255)? as u8;
                let Rgba {
                    mut red,
                    mut green,
                    mut blue,
                    ..
                } = self.color;
                match channel {
                    Channel::Red => red = level,
                    Channel::Green => green = level,
                    _ => blue = level,
                }
                self.set_rgb(red, green, blue);
            }
        }
        Ok(())
    }

    pub fn channel_value(&self, channel: Channel) -> i32 {
        let (hue, saturation, value) = self.hsv.rounded();
        match channel {
            Channel::Hue => hue as i32,
            Channel::Saturation => saturation as i32,
            Channel::Value => value as i32,
            Channel::Red => self.color.red as i32,
            Channel::Green => self.color.green as i32,
            Channel::Blue => self.color.blue as i32,
        }
    }

    /// Opacity percent followed by the three channels of the current mode.
    pub fn fields(&self) -> [i32; 4] {
        let [a, b, c] = self.mode.channels();
        [
            self.color.opacity_percent() as i32,
            self.channel_value(a),
            self.channel_value(b),
            self.channel_value(c),
        ]
    }

    /// Takes color and opacity from a hex string. On error nothing changes.
    pub fn apply_hex(&mut self, hex: &str) -> Result<(), ColorError> {
        self.color = parse_hex(hex)?;
        self.sync_hsv();
        Ok(())
    }

    fn sync_rgb(&mut self) {
        self.color = self.hsv.to_rgba().with_alpha(self.color.alpha);
    }

    fn sync_hsv(&mut self) {
        let next = self.color.to_hsv();
        // gray has no hue of its own; keep the one the user was on
        let hue = if next.saturation == 0.0 {
            self.hsv.hue
        } else {
            next.hue
        };
        self.hsv = Hsv { hue, ..next };
    }
}

/// What a text field edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldTarget {
    Opacity,
    Channel(Channel),
    Hex,
}

impl FieldTarget {
    fn max_len(self) -> usize {
        match self {
            FieldTarget::Hex => 9,
            _ => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldTarget::Opacity => "A%",
            FieldTarget::Channel(channel) => channel.label(),
            FieldTarget::Hex => "Hex",
        }
    }
}

/// Text being typed into one picker field.
///
/// Starts from the field's current value. Committing a numeric field that
/// does not parse leaves the model untouched, as if the edit was cancelled.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInput {
    target: FieldTarget,
    buffer: String,
}

impl FieldInput {
    pub fn new(target: FieldTarget, model: &PickerModel) -> Self {
        let buffer = match target {
            FieldTarget::Opacity => model.color().opacity_percent().to_string(),
            FieldTarget::Channel(channel) => model.channel_value(channel).to_string(),
            FieldTarget::Hex => model.hex(),
        };
        Self { target, buffer }
    }

    pub fn target(&self) -> FieldTarget {
        self.target
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn push(&mut self, c: char) {
        if self.buffer.chars().count() < self.target.max_len() {
            self.buffer.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.buffer.pop();
    }

    /// Applies the buffer. `Ok(false)` means it was discarded.
    pub fn commit(&self, model: &mut PickerModel) -> Result<bool, ColorError> {
        if let FieldTarget::Hex = self.target {
            model.apply_hex(&self.buffer)?;
            return Ok(true);
        }
        let Ok(value) = self.buffer.trim().parse::<i32>() else {
            return Ok(false);
        };
        match self.target {
            FieldTarget::Opacity => model.set_opacity_percent(value)?,
            FieldTarget::Channel(channel) => model.set_channel(channel, value)?,
            FieldTarget::Hex => {}
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{CYAN, RED};

    #[test]
    fn test_new_derives_hsv() {
        let model = PickerModel::new(CYAN);
        assert_eq!(model.hsv().rounded(), (180, 100, 100));
        assert_eq!(model.fields(), [100, 180, 100, 100]);
    }

    #[test]
    fn test_hue_edit_updates_rgb() {
        let mut model = PickerModel::new(RED);
        model.set_hue(120.0);
        assert_eq!(model.color(), Rgba::rgb(0, 255, 0));
    }

    #[test]
    fn test_pick_spectrum_clamps_outside_points() {
        let mut model = PickerModel::new(RED);
        model.pick_spectrum(-40.0, 500.0, 240.0, 200.0);
        assert_eq!(model.hsv().saturation, 0.0);
        assert_eq!(model.hsv().value, 0.0);
        assert_eq!(model.color(), Rgba::rgb(0, 0, 0));

        model.pick_spectrum(120.0, 0.0, 240.0, 200.0);
        assert_eq!(model.hsv().rounded(), (0, 50, 100));
        assert_eq!(model.color(), Rgba::rgb(255, 128, 128));
    }

    #[test]
    fn test_pick_hue_end_of_strip_wraps_to_red() {
        let mut model = PickerModel::new(CYAN);
        model.pick_hue(300.0, 200.0);
        assert_eq!(model.color(), RED);
    }

    #[test]
    fn test_rgb_edit_to_gray_keeps_hue() {
        let mut model = PickerModel::new(Rgba::rgb(0, 0, 255));
        model.toggle_mode();
        model.set_rgb(90, 90, 90);
        let (hue, saturation, _) = model.hsv().rounded();
        assert_eq!(hue, 240);
        assert_eq!(saturation, 0);

        // and the hue comes back once there is chroma again
        model.set_saturation(100.0);
        assert_eq!(model.color(), Rgba::rgb(0, 0, 90));
    }

    #[test]
    fn test_set_channel_clamps() {
        let mut model = PickerModel::new(RED);
        model.set_channel(Channel::Green, 999).unwrap();
        assert_eq!(model.color(), Rgba::rgb(255, 255, 0));
        model.set_channel(Channel::Value, -20).unwrap();
        assert_eq!(model.color(), Rgba::rgb(0, 0, 0));
        model.set_channel(Channel::Hue, 720).unwrap();
        assert_eq!(model.hsv().hue, 0.0);
    }

    #[test]
    fn test_opacity_is_kept_across_color_edits() {
        let mut model = PickerModel::new(RED);
        model.set_opacity_percent(50).unwrap();
        model.set_hue(240.0);
        assert_eq!(model.color(), Rgba::new(0, 0, 255, 128));
        assert_eq!(model.hex(), "0000ff80");
        model.set_opacity_percent(250).unwrap();
        assert_eq!(model.color().alpha, 255);
    }

    #[test]
    fn test_typed_opacity_reads_back_unchanged() {
        let mut model = PickerModel::new(RED);
        for percent in 0..=100 {
            model.set_opacity_percent(percent).unwrap();
            assert_eq!(model.fields()[0], percent);
        }
    }

    #[test]
    fn test_apply_hex() {
        let mut model = PickerModel::new(RED);
        model.apply_hex("#00ff0040").unwrap();
        assert_eq!(model.fields(), [25, 120, 100, 100]);

        let before = model.clone();
        assert!(model.apply_hex("nope").is_err());
        assert_eq!(model, before);
    }

    #[test]
    fn test_fields_follow_mode() {
        let mut model = PickerModel::new(Rgba::rgb(10, 20, 30));
        model.toggle_mode();
        assert_eq!(model.mode(), DisplayMode::Rgb);
        assert_eq!(model.fields(), [100, 10, 20, 30]);
    }

    #[test]
    fn test_field_input_commits_numbers() {
        let mut model = PickerModel::new(RED);
        let mut input = FieldInput::new(FieldTarget::Channel(Channel::Hue), &model);
        assert_eq!(input.buffer(), "0");
        input.pop();
        for c in "240".chars() {
            input.push(c);
        }
        assert_eq!(input.commit(&mut model), Ok(true));
        assert_eq!(model.color(), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn test_field_input_reverts_garbage() {
        let mut model = PickerModel::new(RED);
        let mut input = FieldInput::new(FieldTarget::Opacity, &model);
        input.push('x');
        assert_eq!(input.commit(&mut model), Ok(false));
        assert_eq!(model.color(), RED);
    }

    #[test]
    fn test_field_input_limits_length() {
        let model = PickerModel::new(RED);
        let mut input = FieldInput::new(FieldTarget::Hex, &model);
        for c in "abcdef".chars() {
            input.push(c);
        }
        assert_eq!(input.buffer(), "ff0000abc");
    }

    #[test]
    fn test_field_input_hex_error_propagates() {
        let mut model = PickerModel::new(RED);
        let mut input = FieldInput::new(FieldTarget::Hex, &model);
        input.pop();
        assert!(matches!(
            input.commit(&mut model),
            Err(ColorError::InvalidHex(_))
        ));
    }
}
