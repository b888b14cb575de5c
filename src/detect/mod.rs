mod filter;
mod result;

pub use filter::DetectionFilter;
pub use result::{BoundingBox, Detection, ObjectClass};
