//! Display-ready chart values. A renderer turns these into pixels; nothing
//! here knows about layout.

use serde::Serialize;

use crate::query::shape::{CategoryPoint, YearPoint};

/// One chart slot of a dashboard section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Line(LineChart),
    Bar(BarChart),
    /// The filtered subset was empty; show a message instead of axes.
    NoData(Placeholder),
}

impl Chart {
    pub fn no_data(title: impl Into<String>, message: impl Into<String>) -> Self {
        Chart::NoData(Placeholder {
            title: title.into(),
            message: message.into(),
        })
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Chart::NoData(_))
    }

    pub fn title(&self) -> &str {
        match self {
            Chart::Line(c) => &c.title,
            Chart::Bar(c) => &c.title,
            Chart::NoData(p) => &p.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axes {
    pub x: String,
    pub y: String,
    /// Rotation of the x tick labels in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_angle: Option<i32>,
}

impl Axes {
    pub fn new(x: &str, y: &str) -> Self {
        Axes {
            x: x.to_string(),
            y: y.to_string(),
            tick_angle: None,
        }
    }

    pub fn slanted(mut self) -> Self {
        self.tick_angle = Some(-45);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub points: Vec<YearPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub axes: Axes,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub axes: Axes,
    /// Legend name of the bar series.
    pub name: String,
    pub bars: Vec<CategoryPoint>,
}
