//! Axis-aligned boxes in pixel coordinates.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box given by its top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a box from center coordinates plus width and height,
    /// the layout YOLO heads emit.
    pub fn from_xywh(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over union; 0 when either box is empty.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x_min = self.x1.max(other.x1);
        let y_min = self.y1.max(other.y1);
        let x_max = self.x2.min(other.x2);
        let y_max = self.y2.min(other.y2);

        if x_max <= x_min || y_max <= y_min {
            return 0.0;
        }

        let intersection = (x_max - x_min) * (y_max - y_min);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }

    /// Clamps the box into `[0, width] x [0, height]`.
    pub fn clip(&self, width: f32, height: f32) -> Self {
        Self {
            x1: self.x1.clamp(0.0, width),
            y1: self.y1.clamp(0.0, height),
            x2: self.x2.clamp(0.0, width),
            y2: self.y2.clamp(0.0, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iou_calculation() {
        let box1 = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(box1.iou(&box1), 1.0);

        let box2 = BoundingBox::new(200.0, 200.0, 300.0, 300.0);
        assert_eq!(box1.iou(&box2), 0.0);

        let box3 = BoundingBox::new(50.0, 0.0, 150.0, 100.0);
        let iou = box1.iou(&box3);
        assert!((iou - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_xywh() {
        let bbox = BoundingBox::from_xywh(50.0, 40.0, 20.0, 10.0);
        assert_eq!(bbox, BoundingBox::new(40.0, 35.0, 60.0, 45.0));
        assert_eq!(bbox.area(), 200.0);
    }

    #[test]
    fn test_clip_and_degenerate_area() {
        let bbox = BoundingBox::new(-5.0, -5.0, 700.0, 500.0).clip(640.0, 480.0);
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 640.0, 480.0));

        let empty = BoundingBox::new(10.0, 10.0, 5.0, 5.0);
        assert_eq!(empty.area(), 0.0);
        assert_eq!(empty.iou(&bbox), 0.0);
    }
}
