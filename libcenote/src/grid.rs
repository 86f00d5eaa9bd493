//! The fixed reference grid drawn over the survey region
use crate::{
    error::{Error, Result},
    record::Coordinate,
};
use serde::{Deserialize, Serialize};

/// A latitude/longitude bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// The region covered by the surveys, including the surrounding sea
pub const YUCATAN_BOUNDS: Bounds = Bounds {
    south: 16.0,
    west: -94.0,
    north: 24.0,
    east: -84.0,
};

pub const GRID_STEP: f64 = 0.125;

/// Upper limit on the number of lines a grid may draw in either direction
pub const MAX_GRID_LINES: usize = 100_000;

impl Bounds {
    /// The `[[south, west], [north, east]]` corner pair that Leaflet expects
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }
}

/// Leaflet path options for a grid line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: u32,
}

pub const GRID_LINE_STYLE: LineStyle = LineStyle {
    color: "gray",
    weight: 1,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub from: Coordinate,
    pub to: Coordinate,
    pub style: LineStyle,
}

/// Evenly spaced horizontal and vertical lines across a bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    bounds: Bounds,
    step: f64,
}

impl Grid {
    pub fn new(bounds: Bounds, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidGrid(format!("step must be positive, got {step}")));
        }
        let edges = [bounds.south, bounds.west, bounds.north, bounds.east];
        if !edges.iter().all(|edge| edge.is_finite()) {
            return Err(Error::InvalidGrid(format!("bounds must be finite: {bounds:?}")));
        }
        if bounds.north < bounds.south || bounds.east < bounds.west {
            return Err(Error::InvalidGrid(format!("bounds are inverted: {bounds:?}")));
        }
        let lines = step_count(bounds.south, bounds.north, step)
            .max(step_count(bounds.west, bounds.east, step))
            + 1.0;
        if lines > MAX_GRID_LINES as f64 {
            return Err(Error::InvalidGrid(format!(
                "step {step} would draw more than {MAX_GRID_LINES} lines"
            )));
        }
        Ok(Self { bounds, step })
    }

    pub const fn yucatan() -> Self {
        Self {
            bounds: YUCATAN_BOUNDS,
            step: GRID_STEP,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// One line per latitude step, each spanning the full longitude range
    pub fn horizontal_lines(&self) -> impl Iterator<Item = GridLine> + '_ {
        steps(self.bounds.south, self.bounds.north, self.step).map(move |latitude| GridLine {
            from: Coordinate::new(latitude, self.bounds.west),
            to: Coordinate::new(latitude, self.bounds.east),
            style: GRID_LINE_STYLE,
        })
    }

    /// One line per longitude step, each spanning the full latitude range
    pub fn vertical_lines(&self) -> impl Iterator<Item = GridLine> + '_ {
        steps(self.bounds.west, self.bounds.east, self.step).map(move |longitude| GridLine {
            from: Coordinate::new(self.bounds.south, longitude),
            to: Coordinate::new(self.bounds.north, longitude),
            style: GRID_LINE_STYLE,
        })
    }

    pub fn lines(&self) -> Vec<GridLine> {
        self.horizontal_lines()
            .chain(self.vertical_lines())
            .collect()
    }
}

// Positions come from an integer counter rather than repeated addition so rounding error can't
// accumulate. The allowance keeps spans like 0.3 / 0.1 from losing their closing line.
const STEP_ALLOWANCE: f64 = 1e-9;

fn step_count(min: f64, max: f64, step: f64) -> f64 {
    ((max - min) / step + STEP_ALLOWANCE).floor()
}

fn steps(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = step_count(min, max, step) as usize;
    (0..=count).map(move |i| min + i as f64 * step)
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn test_line_counts() {
        let grid = Grid::yucatan();
        assert_eq!(grid.horizontal_lines().count(), 65);
        assert_eq!(grid.vertical_lines().count(), 81);
        assert_eq!(grid.lines().len(), 146);
    }

    #[test]
    fn test_line_endpoints() {
        let grid = Grid::yucatan();
        let horizontal: Vec<GridLine> = grid.horizontal_lines().collect();
        assert_eq!(horizontal[0].from, Coordinate::new(16.0, -94.0));
        assert_eq!(horizontal[0].to, Coordinate::new(16.0, -84.0));
        assert_eq!(horizontal[64].from.latitude, 24.0);
        assert_eq!(horizontal[1].from.latitude, 16.125);

        let vertical: Vec<GridLine> = grid.vertical_lines().collect();
        assert_eq!(vertical[0].from, Coordinate::new(16.0, -94.0));
        assert_eq!(vertical[0].to, Coordinate::new(24.0, -94.0));
        assert_eq!(vertical[80].from.longitude, -84.0);
        assert!(vertical.iter().all(|l| l.style == GRID_LINE_STYLE));
    }

    #[test]
    fn test_custom_grid() {
        let grid = Grid::new(
            Bounds {
                south: 0.0,
                west: 0.0,
                north: 1.0,
                east: 0.3,
            },
            0.1,
        )
        .expect("Failed to create grid");
        assert_eq!(grid.vertical_lines().count(), 3 + 1);
        assert_eq!(grid.horizontal_lines().count(), 10 + 1);
    }

    #[test]
    fn test_invalid_grid() {
        assert!(Grid::new(YUCATAN_BOUNDS, 0.0).is_err());
        assert!(Grid::new(YUCATAN_BOUNDS, f64::NAN).is_err());
        let inverted = Bounds {
            north: 10.0,
            ..YUCATAN_BOUNDS
        };
        assert!(Grid::new(inverted, GRID_STEP).is_err());
        let unbounded = Bounds {
            east: f64::INFINITY,
            ..YUCATAN_BOUNDS
        };
        assert!(Grid::new(unbounded, GRID_STEP).is_err());
    }

    #[test]
    fn test_grid_line_limit() {
        let err = Grid::new(YUCATAN_BOUNDS, 1e-300).expect_err("Tiny steps should be rejected");
        assert!(matches!(err, Error::InvalidGrid(_)));
        // 10 degrees of longitude at this step is exactly the limit
        let step = 10.0 / (MAX_GRID_LINES - 1) as f64;
        assert!(Grid::new(YUCATAN_BOUNDS, step).is_ok());
        assert!(Grid::new(YUCATAN_BOUNDS, step / 2.0).is_err());
    }
}
