//! A render target that records what settings push into it.

use plotrc::guide::{Element, Geometry, StyleAttr, StyleSink};

/// Fixed-size colorbar or legend axes
#[derive(Debug, Clone, Copy)]
pub struct FakeAxes {
    pub width: f64,
    pub height: f64,
}

impl FakeAxes {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Geometry for FakeAxes {
    fn size_inches(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// Records every style call in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<(Element, StyleAttr)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes pushed to one element, in order
    pub fn attrs_for(&self, element: Element) -> Vec<&StyleAttr> {
        self.calls
            .iter()
            .filter(|(e, _)| *e == element)
            .map(|(_, attr)| attr)
            .collect()
    }
}

impl StyleSink for RecordingSink {
    fn apply_style(&mut self, element: Element, attr: StyleAttr) {
        self.calls.push((element, attr));
    }
}
