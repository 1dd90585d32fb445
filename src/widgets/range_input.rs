//! Min/max editor for a measurement band

use egui::{Response, Ui};

use crate::config::ValueRange;

/// Two drag values editing a [`ValueRange`], kept ordered
pub struct RangeInput<'a> {
    label: &'a str,
    range: &'a mut ValueRange,
    bounds: Option<(f64, f64)>,
    speed: f64,
    suffix: &'a str,
}

impl<'a> RangeInput<'a> {
    pub fn new(label: &'a str, range: &'a mut ValueRange) -> Self {
        Self {
            label,
            range,
            bounds: None,
            speed: 0.1,
            suffix: "",
        }
    }

    /// Limit both ends to `min..=max`
    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds = Some((min, max));
        self
    }

    /// Set the drag speed for value inputs
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn suffix(mut self, suffix: &'a str) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        let (lo, hi) = self.bounds.unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
        let range = self.range;

        ui.horizontal(|ui| {
            ui.label(self.label);

            ui.label("Min");
            ui.add(
                egui::DragValue::new(&mut range.min)
                    .speed(self.speed)
                    .range(lo..=hi)
                    .suffix(self.suffix),
            );

            ui.label("Max");
            ui.add(
                egui::DragValue::new(&mut range.max)
                    .speed(self.speed)
                    .range(lo..=hi)
                    .suffix(self.suffix),
            );

            // Dragging min past max pushes max along
            if range.min > range.max {
                range.max = range.min;
            }
        })
        .response
    }
}
