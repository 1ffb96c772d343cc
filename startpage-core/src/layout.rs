use crate::error::StartPageError;
use serde::{Deserialize, Serialize};

/// Grid shape for one page of quick links.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub columns: usize,
    pub rows: usize,
}

impl PageLayout {
    pub const fn new(columns: usize, rows: usize) -> Self {
        PageLayout { columns, rows }
    }

    pub fn items_per_page(&self) -> usize {
        self.columns * self.rows
    }
}

/// One row of the breakpoint table. `max_width: None` is the catch-all bucket.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub max_width: Option<f32>,
    pub layout: PageLayout,
}

/// Ascending viewport-width buckets; a width belongs to the first bucket whose
/// inclusive `max_width` it does not exceed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct BreakpointTable {
    breakpoints: Vec<Breakpoint>,
}

impl BreakpointTable {
    pub fn new(breakpoints: Vec<Breakpoint>) -> Result<Self, StartPageError> {
        let Some(last) = breakpoints.last() else {
            return Err(StartPageError::Config(
                "Breakpoint table must not be empty".to_string(),
            ));
        };
        if last.max_width.is_some() {
            return Err(StartPageError::Config(
                "Last breakpoint must have no max_width".to_string(),
            ));
        }

        let bounds: Vec<f32> = breakpoints.iter().filter_map(|b| b.max_width).collect();
        if bounds.len() != breakpoints.len() - 1 {
            return Err(StartPageError::Config(
                "Only the last breakpoint may omit max_width".to_string(),
            ));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) || bounds.iter().any(|b| !b.is_finite()) {
            return Err(StartPageError::Config(
                "Breakpoint widths must be finite and strictly ascending".to_string(),
            ));
        }
        if breakpoints
            .iter()
            .any(|b| b.layout.columns == 0 || b.layout.rows == 0)
        {
            return Err(StartPageError::Config(
                "Breakpoint layouts need at least one column and one row".to_string(),
            ));
        }

        Ok(BreakpointTable { breakpoints })
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Index of the bucket a viewport width falls into. Zero, negative or
    /// non-finite widths use the smallest bucket.
    pub fn bucket(&self, viewport_width: f32) -> usize {
        if !viewport_width.is_finite() || viewport_width <= 0.0 {
            return 0;
        }
        self.breakpoints
            .iter()
            .position(|bp| bp.max_width.is_none_or(|max| viewport_width <= max))
            .unwrap_or(0)
    }

    pub fn resolve(&self, viewport_width: f32) -> PageLayout {
        self.breakpoints[self.bucket(viewport_width)].layout
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        BreakpointTable {
            breakpoints: vec![
                Breakpoint { max_width: Some(480.0), layout: PageLayout::new(4, 3) },
                Breakpoint { max_width: Some(768.0), layout: PageLayout::new(6, 3) },
                Breakpoint { max_width: Some(1024.0), layout: PageLayout::new(8, 3) },
                Breakpoint { max_width: Some(1440.0), layout: PageLayout::new(10, 3) },
                Breakpoint { max_width: None, layout: PageLayout::new(8, 3) },
            ],
        }
    }
}

impl TryFrom<Vec<Breakpoint>> for BreakpointTable {
    type Error = StartPageError;

    fn try_from(breakpoints: Vec<Breakpoint>) -> Result<Self, Self::Error> {
        BreakpointTable::new(breakpoints)
    }
}

impl From<BreakpointTable> for Vec<Breakpoint> {
    fn from(table: BreakpointTable) -> Self {
        table.breakpoints
    }
}

/// Resolve a layout against the default breakpoint table.
pub fn resolve_layout(viewport_width: f32) -> PageLayout {
    BreakpointTable::default().resolve(viewport_width)
}
