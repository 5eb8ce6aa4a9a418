use serde::{Deserialize, Serialize};

/// Underlying surface of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurfaceKind {
    Planar,
    Cylindrical,
    /// Helical flank or crest produced by a modeled thread.
    Thread,
    /// Face displaced from another face by an offset feature.
    Offset,
    Chamfer,
    Fillet,
    /// Surface left behind by a revolve cut.
    Revolved,
}

/// Geometry of an edge curve in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EdgeCurve {
    Line {
        start: [f64; 3],
        end: [f64; 3],
    },
    Circle {
        center: [f64; 3],
        normal: [f64; 3],
        radius: f64,
    },
}

impl EdgeCurve {
    pub fn length(&self) -> f64 {
        match self {
            EdgeCurve::Line { start, end } => {
                let d = [end[0] - start[0], end[1] - start[1], end[2] - start[2]];
                (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
            }
            EdgeCurve::Circle { radius, .. } => std::f64::consts::TAU * radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_length() {
        let e = EdgeCurve::Line {
            start: [0.0, 0.0, 0.0],
            end: [3.0, 4.0, 0.0],
        };
        assert!((e.length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn circle_length_is_circumference() {
        let e = EdgeCurve::Circle {
            center: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            radius: 0.5,
        };
        assert!((e.length() - std::f64::consts::PI).abs() < 1e-12);
    }
}
