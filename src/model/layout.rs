//! Stored layout definitions.
//!
//! A [`LayoutDef`] is the serialisable description of how one display is
//! partitioned. It carries no pixel geometry; [`LayoutTree`] turns it into an
//! arena with computed rectangles.
//!
//! [`LayoutTree`]: crate::model::tree::LayoutTree

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout_engine::Orientation;
use crate::sys::geometry::Rect;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("split at {path} has no children")]
    EmptySplit { path: String },
    #[error("split ratio at {path} must be between 0 and 1 (exclusive), got {ratio}")]
    RatioOutOfRange { path: String, ratio: f64 },
    #[error("inset frame at {path} must lie within the unit square, got {frame:?}")]
    InsetOutOfBounds { path: String, frame: Rect },
    #[error("margin at {path} must be non-negative, got {margin}")]
    NegativeMargin { path: String, margin: f64 },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LayoutDef {
    /// Space kept clear around the region when it is drawn.
    #[serde(default)]
    pub margin: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inset: Option<Box<InsetDef>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SplitDef {
    pub orientation: Orientation,
    /// Fraction of the parent's extent given to the first child. The other
    /// children share the remainder evenly.
    #[serde(default = "default_ratio")]
    pub ratio: f64,
    pub children: Vec<LayoutDef>,
}

/// A region carved out of the host's drawing area, positioned by a frame
/// expressed in fractions of the host rectangle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InsetDef {
    pub frame: Rect,
    #[serde(default)]
    pub layout: LayoutDef,
}

fn default_ratio() -> f64 { 0.5 }

impl LayoutDef {
    pub fn leaf() -> Self { LayoutDef::default() }

    pub fn split(orientation: Orientation, ratio: f64, children: Vec<LayoutDef>) -> Self {
        LayoutDef {
            split: Some(SplitDef { orientation, ratio, children }),
            ..Default::default()
        }
    }

    /// `columns` × `rows` equally sized cells, rows outermost.
    pub fn grid(columns: usize, rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let row = || {
            if columns == 1 {
                LayoutDef::leaf()
            } else {
                LayoutDef::split(
                    Orientation::Horizontal,
                    1.0 / columns as f64,
                    (0..columns).map(|_| LayoutDef::leaf()).collect(),
                )
            }
        };
        if rows == 1 {
            row()
        } else {
            LayoutDef::split(Orientation::Vertical, 1.0 / rows as f64, (0..rows).map(|_| row()).collect())
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_inset(mut self, frame: Rect, layout: LayoutDef) -> Self {
        self.inset = Some(Box::new(InsetDef { frame, layout }));
        self
    }

    pub fn is_leaf(&self) -> bool { self.split.is_none() }

    pub fn validate(&self) -> Result<(), LayoutError> { self.validate_at("root") }

    fn validate_at(&self, path: &str) -> Result<(), LayoutError> {
        if self.margin < 0.0 {
            return Err(LayoutError::NegativeMargin {
                path: path.to_owned(),
                margin: self.margin,
            });
        }
        if let Some(split) = &self.split {
            if split.children.is_empty() {
                return Err(LayoutError::EmptySplit { path: path.to_owned() });
            }
            if !(split.ratio > 0.0 && split.ratio < 1.0) {
                return Err(LayoutError::RatioOutOfRange {
                    path: path.to_owned(),
                    ratio: split.ratio,
                });
            }
            for (i, child) in split.children.iter().enumerate() {
                child.validate_at(&format!("{path}.{i}"))?;
            }
        }
        if let Some(inset) = &self.inset {
            let f = inset.frame;
            let in_unit = f.x >= 0.0
                && f.y >= 0.0
                && f.width > 0.0
                && f.height > 0.0
                && f.right() <= 1.0
                && f.bottom() <= 1.0;
            if !in_unit {
                return Err(LayoutError::InsetOutOfBounds {
                    path: path.to_owned(),
                    frame: f,
                });
            }
            inset.layout.validate_at(&format!("{path}.inset"))?;
        }
        Ok(())
    }
}
