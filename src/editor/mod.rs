pub mod hit_test;
pub mod viewport;

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Color, Point};

pub use hit_test::{HOVER_RADIUS, hit_test};
pub use viewport::Viewport;

/// The two outlines a user can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointSetName {
    #[serde(rename = "countertop")]
    Countertop,
    #[serde(rename = "creditCard")]
    CreditCard,
}

impl PointSetName {
    /// Scan and draw order
    pub const ALL: [PointSetName; 2] = [PointSetName::Countertop, PointSetName::CreditCard];

    pub fn color(self) -> Color {
        match self {
            PointSetName::Countertop => Color::BLUE,
            PointSetName::CreditCard => Color::GREEN,
        }
    }
}

impl fmt::Display for PointSetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointSetName::Countertop => write!(f, "countertop"),
            PointSetName::CreditCard => write!(f, "creditCard"),
        }
    }
}

/// Which outline new clicks go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    #[default]
    None,
    Countertop,
    CreditCard,
}

impl SelectionMode {
    pub fn target(self) -> Option<PointSetName> {
        match self {
            SelectionMode::None => None,
            SelectionMode::Countertop => Some(PointSetName::Countertop),
            SelectionMode::CreditCard => Some(PointSetName::CreditCard),
        }
    }
}

impl From<PointSetName> for SelectionMode {
    fn from(name: PointSetName) -> Self {
        match name {
            PointSetName::Countertop => SelectionMode::Countertop,
            PointSetName::CreditCard => SelectionMode::CreditCard,
        }
    }
}

/// Identifies one point by outline and position in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointRef {
    pub set: PointSetName,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSets {
    countertop: Vec<Point>,
    credit_card: Vec<Point>,
}

impl PointSets {
    pub fn get(&self, name: PointSetName) -> &[Point] {
        match name {
            PointSetName::Countertop => &self.countertop,
            PointSetName::CreditCard => &self.credit_card,
        }
    }

    fn get_mut(&mut self, name: PointSetName) -> &mut Vec<Point> {
        match name {
            PointSetName::Countertop => &mut self.countertop,
            PointSetName::CreditCard => &mut self.credit_card,
        }
    }

    /// Sets in scan/draw order
    pub fn iter(&self) -> impl Iterator<Item = (PointSetName, &[Point])> {
        PointSetName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    pub fn total(&self) -> usize {
        self.countertop.len() + self.credit_card.len()
    }
}

/// Input accepted by the annotation editor.
///
/// Pointer positions are in image space; see [`Viewport`] for mapping from
/// screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    SetMode { mode: SelectionMode },
    Click(Point),
    PointerMove(Point),
    PointerDown,
    PointerUp,
    Clear { set: PointSetName },
    #[serde(skip)]
    LoadImage(Arc<DynamicImage>),
}

/// Everything the annotation editor knows.
///
/// Transitions never mutate in place: each one returns the next state, and a
/// rejected transition leaves the caller holding the untouched previous one.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    points: PointSets,
    mode: SelectionMode,
    hover: Option<PointRef>,
    drag: Option<PointRef>,
    image: Option<Arc<DynamicImage>>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &PointSets {
        &self.points
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn hover(&self) -> Option<PointRef> {
        self.hover
    }

    pub fn drag(&self) -> Option<PointRef> {
        self.drag
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_deref()
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| (img.width(), img.height()))
    }

    pub fn apply(&self, event: &EditorEvent) -> Result<EditorState> {
        match event {
            EditorEvent::SetMode { mode } => Ok(self.set_mode(*mode)),
            EditorEvent::Click(point) => self.add_point(*point),
            EditorEvent::PointerMove(point) => self.pointer_move(*point),
            EditorEvent::PointerDown => Ok(self.pointer_down()),
            EditorEvent::PointerUp => Ok(self.pointer_up()),
            EditorEvent::Clear { set } => Ok(self.clear(*set)),
            EditorEvent::LoadImage(image) => Ok(self.load_image(image.clone())),
        }
    }

    pub fn set_mode(&self, mode: SelectionMode) -> EditorState {
        EditorState {
            mode,
            ..self.clone()
        }
    }

    pub fn add_point(&self, point: Point) -> Result<EditorState> {
        let target = self.mode.target().ok_or(Error::NoSelectionMode)?;
        let mut next = self.clone();
        next.points.get_mut(target).push(point);
        log::debug!(
            "Added point ({:.1}, {:.1}) to {} ({} points)",
            point.x,
            point.y,
            target,
            next.points.get(target).len()
        );
        Ok(next)
    }

    pub fn clear(&self, set: PointSetName) -> EditorState {
        let mut next = self.clone();
        next.points.get_mut(set).clear();
        // References into the emptied set would dangle
        if next.hover.is_some_and(|r| r.set == set) {
            next.hover = None;
        }
        if next.drag.is_some_and(|r| r.set == set) {
            next.drag = None;
        }
        next
    }

    pub fn move_point(&self, set: PointSetName, index: usize, to: Point) -> Result<EditorState> {
        let mut next = self.clone();
        let slot = next
            .points
            .get_mut(set)
            .get_mut(index)
            .ok_or(Error::PointOutOfRange { set, index })?;
        *slot = to;
        Ok(next)
    }

    /// While dragging the dragged point follows the pointer and hover is left
    /// alone; otherwise hover is recomputed.
    pub fn pointer_move(&self, pointer: Point) -> Result<EditorState> {
        if let Some(drag) = self.drag {
            return self.move_point(drag.set, drag.index, pointer);
        }

        Ok(EditorState {
            hover: hit_test(&self.points, pointer, HOVER_RADIUS),
            ..self.clone()
        })
    }

    pub fn pointer_down(&self) -> EditorState {
        match self.hover {
            Some(hover) => EditorState {
                drag: Some(hover),
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    pub fn pointer_up(&self) -> EditorState {
        EditorState {
            drag: None,
            ..self.clone()
        }
    }

    /// Replace the backing image. Existing points are kept.
    pub fn load_image(&self, image: Arc<DynamicImage>) -> EditorState {
        log::info!("Loaded image {}x{}", image.width(), image.height());
        EditorState {
            image: Some(image),
            ..self.clone()
        }
    }

    /// Whether moving from `previous` to `self` changes what is on the canvas
    pub fn needs_redraw(&self, previous: &EditorState) -> bool {
        let Some(image) = &self.image else {
            return false;
        };
        let image_changed = match &previous.image {
            Some(prev) => !Arc::ptr_eq(image, prev),
            None => true,
        };
        image_changed || self.points != previous.points || self.hover != previous.hover
    }
}
