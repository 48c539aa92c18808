#![forbid(unsafe_code)]

//! Frame = display list + hit regions for one render pass.
//!
//! The engine never touches pixels. A [`Frame`] lists drawing commands in
//! paint order (background, links, glows, discs, labels, annotations) and
//! records one [`CellHit`] per cell so the host can map a pointer position
//! back to a cell.
//!
//! # Usage
//!
//! ```
//! use mviz_core::{Cell, Point};
//! use mviz_render::frame::{CellHit, Frame};
//!
//! let mut frame = Frame::new(200.0, 100.0);
//! frame.register_hit(CellHit { cell: Cell::new(0, 0), center: Point::new(100.0, 50.0), radius: 20.0 });
//! assert_eq!(frame.hit_test(Point::new(105.0, 55.0)), Some(Cell::new(0, 0)));
//! assert_eq!(frame.hit_test(Point::new(10.0, 10.0)), None);
//! ```

use mviz_core::{Cell, Point};
use mviz_style::{CellRole, Color};

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// What a command draws, independent of how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    /// Canvas fill.
    Background,
    /// Link from a parent cell to a child cell.
    Link { from: Cell, to: Cell, active: bool },
    /// Glow ring behind an emphasized cell.
    Glow(Cell),
    /// A cell disc or its label.
    Cell { cell: Cell, role: CellRole, edge: bool },
    /// The `left + right = value` annotation.
    Formula,
    /// The `(stepIndex+1)/total` readout.
    Progress,
}

/// Geometry and paint of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        origin: Point,
        width: f32,
        height: f32,
        fill: Color,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Color,
        stroke: Color,
        stroke_width: f32,
    },
    Text {
        at: Point,
        text: String,
        color: Color,
        size: f32,
        bold: bool,
        align: TextAlign,
    },
}

/// One drawing command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCmd {
    pub part: Part,
    pub shape: Shape,
}

/// Circular hit region of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellHit {
    pub cell: Cell,
    pub center: Point,
    pub radius: f32,
}

impl CellHit {
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}

/// The output of one render pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    width: f32,
    height: f32,
    commands: Vec<DrawCmd>,
    hits: Vec<CellHit>,
}

impl Frame {
    /// Create an empty frame of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            hits: Vec::new(),
        }
    }

    /// Frame produced for a degenerate viewport: no commands, no hits.
    ///
    /// Negative or non-finite sizes are recorded as zero.
    pub fn empty(width: f32, height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(sanitize(width), sanitize(height))
    }

    /// Frame width in pixels.
    #[inline]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// No drawing commands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Append a command; later commands paint over earlier ones.
    #[inline]
    pub fn push(&mut self, part: Part, shape: Shape) {
        self.commands.push(DrawCmd { part, shape });
    }

    /// Commands in paint order.
    #[inline]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Register a cell hit region.
    pub fn register_hit(&mut self, hit: CellHit) {
        self.hits.push(hit);
    }

    /// All registered hit regions.
    #[inline]
    pub fn hits(&self) -> &[CellHit] {
        &self.hits
    }

    /// The cell under `point`, if any.
    ///
    /// Regions registered later win, matching paint order.
    pub fn hit_test(&self, point: Point) -> Option<Cell> {
        self.hits
            .iter()
            .rev()
            .find(|hit| hit.contains(point))
            .map(|hit| hit.cell)
    }

    /// Text of the label drawn for `cell`.
    pub fn label(&self, cell: Cell) -> Option<&str> {
        self.commands.iter().find_map(|cmd| match (&cmd.part, &cmd.shape) {
            (Part::Cell { cell: c, .. }, Shape::Text { text, .. }) if *c == cell => {
                Some(text.as_str())
            }
            _ => None,
        })
    }

    /// Role the cell was drawn with.
    pub fn role(&self, cell: Cell) -> Option<CellRole> {
        self.commands.iter().find_map(|cmd| match cmd.part {
            Part::Cell { cell: c, role, .. } if c == cell => Some(role),
            _ => None,
        })
    }

    /// The formula annotation, when one was drawn.
    pub fn formula(&self) -> Option<&str> {
        self.text_of(Part::Formula)
    }

    /// The progress readout.
    pub fn progress(&self) -> Option<&str> {
        self.text_of(Part::Progress)
    }

    /// Links as `(from, to, active)`.
    pub fn links(&self) -> impl Iterator<Item = (Cell, Cell, bool)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd.part {
            Part::Link { from, to, active } => Some((from, to, active)),
            _ => None,
        })
    }

    fn text_of(&self, part: Part) -> Option<&str> {
        self.commands.iter().find_map(|cmd| match &cmd.shape {
            Shape::Text { text, .. } if cmd.part == part => Some(text.as_str()),
            _ => None,
        })
    }
}
