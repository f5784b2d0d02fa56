use crate::error::{TimelineError, TimelineResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rrggbb`.
    pub fn from_hex(input: &str) -> TimelineResult<Self> {
        let invalid = || TimelineError::InvalidData(format!("invalid hex color `{input}`"));
        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|value| f64::from(value) / 255.0)
                .map_err(|_| invalid())
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats as `#rrggbb`, ignoring alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }

    pub fn validate(self) -> TimelineResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(TimelineError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// One bar in a group's local coordinate space.
///
/// `x` is in local units (bar index times bar interval), `y`/`height` are
/// pixels measured from the top of the timeline strip. A provisional bar
/// carries `blur_from`, the local x where its blurred part begins; the part
/// left of it is drawn sharp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub window_start: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub blur_from: Option<f64>,
}

impl BarRect {
    pub fn validate(self) -> TimelineResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(TimelineError::InvalidData(
                "bar coordinates must be finite".to_owned(),
            ));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(TimelineError::InvalidData(
                "bar width must be finite and > 0".to_owned(),
            ));
        }
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(TimelineError::InvalidData(
                "bar height must be finite and >= 0".to_owned(),
            ));
        }
        if self.blur_from.is_some_and(|from| !from.is_finite()) {
            return Err(TimelineError::InvalidData(
                "bar blur start must be finite".to_owned(),
            ));
        }
        self.fill.validate()
    }

    /// Whether any part of the bar is drawn blurred.
    #[must_use]
    pub fn is_blurred(&self) -> bool {
        self.blur_from.is_some_and(|from| from < self.x + self.width)
    }

    /// Splits the bar at `blur_from` into its sharp and blurred widths.
    #[must_use]
    pub fn blur_split(&self) -> (f64, f64) {
        match self.blur_from {
            Some(from) => {
                let sharp = (from - self.x).clamp(0.0, self.width);
                (sharp, self.width - sharp)
            }
            None => (self.width, 0.0),
        }
    }
}
