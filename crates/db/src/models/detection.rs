//! Row model for the `boxes` table.

use framebox_core::detection::Detection;
use framebox_core::error::CoreError;
use sqlx::FromRow;

/// A raw row from `boxes`, before range checks.
#[derive(Debug, Clone, FromRow)]
pub struct DetectionRow {
    pub frame: i64,
    pub box_index: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DetectionRow {
    /// Convert to a [`Detection`], rejecting negative or oversized indices.
    pub fn into_detection(self) -> Result<Detection, CoreError> {
        let frame = u64::try_from(self.frame).map_err(|_| {
            CoreError::Internal(format!("stored frame {} is negative", self.frame))
        })?;
        let box_index = u32::try_from(self.box_index).map_err(|_| {
            CoreError::Internal(format!(
                "stored box_index {} is out of range (frame {frame})",
                self.box_index
            ))
        })?;
        Ok(Detection {
            frame,
            box_index,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        })
    }
}

impl TryFrom<&Detection> for DetectionRow {
    type Error = CoreError;

    fn try_from(d: &Detection) -> Result<Self, Self::Error> {
        let frame = i64::try_from(d.frame)
            .map_err(|_| CoreError::Validation(format!("frame {} is too large", d.frame)))?;
        Ok(Self {
            frame,
            box_index: i64::from(d.box_index),
            x: d.x,
            y: d.y,
            width: d.width,
            height: d.height,
        })
    }
}
