//! Connection geometry.
//!
//! A connection leaves the source node's right-center port and enters the
//! target node's left-center port along a cubic Bezier. Both control points
//! sit at the horizontal midpoint, nudged apart by [`CONTROL_OFFSET`], which
//! gives an S-curve for any vertical offset between the nodes.
//!
//! Everything here is a pure function of positions, footprint and the
//! executing flag.

use crate::canvas::NodeFootprint;
use flowdesk_workflow::Position;
use std::fmt::Write as _;

/// Horizontal distance of each control point from the curve's midpoint.
pub const CONTROL_OFFSET: f64 = 20.0;

/// Number of flow markers travelling along an active connection.
pub const FLOW_MARKER_COUNT: usize = 3;

/// Seconds a flow marker takes to traverse the path.
pub const FLOW_MARKER_DURATION_SECS: f64 = 1.5;

/// Stroke palette of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub color: &'static str,
    pub width: u8,
    pub dash: Option<&'static str>,
}

impl StrokeStyle {
    pub const IDLE: Self = Self {
        color: "#94a3b8",
        width: 2,
        dash: None,
    };

    pub const ACTIVE: Self = Self {
        color: "#3b82f6",
        width: 3,
        dash: Some("6 4"),
    };
}

/// A small animated marker that travels the path of an executing connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowMarker {
    /// Animation start delay in seconds.
    pub begin_secs: f64,
    pub duration_secs: f64,
    pub radius: f64,
}

/// Rendered description of one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPath {
    pub start: Position,
    pub control1: Position,
    pub control2: Position,
    pub end: Position,
    pub stroke: StrokeStyle,
    /// Empty unless the owning workflow is executing.
    pub markers: Vec<FlowMarker>,
}

impl ConnectionPath {
    /// The SVG `d` attribute for the curve.
    #[must_use]
    pub fn to_svg_d(&self) -> String {
        let mut d = String::with_capacity(64);
        // Writing into a String cannot fail.
        let _ = write!(
            d,
            "M {} {} C {} {} {} {} {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        );
        d
    }

    /// Evaluates the curve at `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Position {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let u = 1.0 - t;
        let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Position::new(
            b0 * self.start.x + b1 * self.control1.x + b2 * self.control2.x + b3 * self.end.x,
            b0 * self.start.y + b1 * self.control1.y + b2 * self.control2.y + b3 * self.end.y,
        )
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.markers.is_empty()
    }
}

/// Computes the path between two node origins.
#[must_use]
pub fn connection_path(
    source: Position,
    target: Position,
    footprint: NodeFootprint,
    executing: bool,
) -> ConnectionPath {
    let start = Position::new(source.x + footprint.width, source.y + footprint.height / 2.0);
    let end = Position::new(target.x, target.y + footprint.height / 2.0);
    let mid_x = (start.x + end.x) / 2.0;

    let (stroke, markers) = if executing {
        (StrokeStyle::ACTIVE, flow_markers())
    } else {
        (StrokeStyle::IDLE, Vec::new())
    };

    ConnectionPath {
        start,
        control1: Position::new(mid_x + CONTROL_OFFSET, start.y),
        control2: Position::new(mid_x - CONTROL_OFFSET, end.y),
        end,
        stroke,
        markers,
    }
}

fn flow_markers() -> Vec<FlowMarker> {
    let stagger = FLOW_MARKER_DURATION_SECS / FLOW_MARKER_COUNT as f64;
    (0..FLOW_MARKER_COUNT)
        .map(|i| FlowMarker {
            begin_secs: stagger * i as f64,
            duration_secs: FLOW_MARKER_DURATION_SECS,
            radius: 3.0,
        })
        .collect()
}
