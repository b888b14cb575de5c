use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Axis-aligned box in frame pixel coordinates, serialized as `[x1, y1, x2, y2]`.
///
/// Well-formed boxes have `x1 < x2` and `y1 < y2`, but nothing downstream
/// relies on it: a degenerate box still has a well-defined center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Center of the box, floored onto the integer pixel grid.
    pub fn center(&self) -> Point {
        Point::new(floor_mid(self.x1, self.x2), floor_mid(self.y1, self.y2))
    }

    pub fn is_degenerate(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }
}

fn floor_mid(a: i32, b: i32) -> i32 {
    // The floored mean of two i32 values always fits back into i32.
    (a as i64 + b as i64).div_euclid(2) as i32
}

impl From<[i32; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [i32; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// One detector observation for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub class: ObjectClass,
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class: ObjectClass, confidence: f32) -> Self {
        Self {
            bbox,
            class,
            confidence,
        }
    }

    pub fn center(&self) -> Point {
        self.bbox.center()
    }
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    Car,
    Motorcycle,
    Bus,
    Truck,
    #[serde(other)]
    Other,
}

impl ObjectClass {
    /// Default set of classes that can occupy a parking space.
    pub const VEHICLES: &'static [ObjectClass] = &[
        ObjectClass::Car,
        ObjectClass::Motorcycle,
        ObjectClass::Bus,
        ObjectClass::Truck,
    ];

    /// Maps a COCO class index to a class. Non-vehicle indices map to `Other`.
    pub fn from_coco_id(id: u32) -> Self {
        match id {
            2 => ObjectClass::Car,
            3 => ObjectClass::Motorcycle,
            5 => ObjectClass::Bus,
            7 => ObjectClass::Truck,
            _ => ObjectClass::Other,
        }
    }

    pub fn is_vehicle(self) -> bool {
        Self::VEHICLES.contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_floors_onto_pixel_grid() {
        assert_eq!(BoundingBox::new(1, 1, 3, 3).center(), Point::new(2, 2));
        assert_eq!(BoundingBox::new(0, 0, 5, 5).center(), Point::new(2, 2));
        assert_eq!(BoundingBox::new(-3, -3, 0, 0).center(), Point::new(-2, -2));
        assert_eq!(
            BoundingBox::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX).center(),
            Point::new(i32::MAX, i32::MAX)
        );
    }

    #[test]
    fn degenerate_boxes_still_have_a_center() {
        let inverted = BoundingBox::new(10, 10, 2, 2);
        assert!(inverted.is_degenerate());
        assert_eq!(inverted.center(), Point::new(6, 6));
        assert!(BoundingBox::new(4, 4, 4, 9).is_degenerate());
        assert!(!BoundingBox::new(0, 0, 1, 1).is_degenerate());
    }

    #[test]
    fn detection_json_shape() {
        let json = r#"{"box":[1,2,3,4],"class":"truck","confidence":0.75}"#;
        let det: Detection = serde_json::from_str(json).expect("detection");
        assert_eq!(det.bbox, BoundingBox::new(1, 2, 3, 4));
        assert_eq!(det.class, ObjectClass::Truck);

        let unknown = r#"{"box":[0,0,1,1],"class":"cell_phone","confidence":0.9}"#;
        let det: Detection = serde_json::from_str(unknown).expect("detection");
        assert_eq!(det.class, ObjectClass::Other);
    }

    #[test]
    fn coco_ids_map_to_vehicle_classes() {
        assert_eq!(ObjectClass::from_coco_id(2), ObjectClass::Car);
        assert_eq!(ObjectClass::from_coco_id(7), ObjectClass::Truck);
        assert_eq!(ObjectClass::from_coco_id(0), ObjectClass::Other);
        assert!(ObjectClass::Bus.is_vehicle());
        assert!(!ObjectClass::Other.is_vehicle());
    }
}
