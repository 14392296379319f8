use crate::raster::Raster;

/// An element prepared by the host whose position is fixed by the next
/// pointer-down.
///
/// Only one can be pending; preparing another replaces it.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingPlacement {
    Text(String),
    Stamp {
        image: Raster,
        width: f32,
        height: f32,
    },
}

impl PendingPlacement {
    pub fn is_stamp(&self) -> bool {
        matches!(self, PendingPlacement::Stamp { .. })
    }
}
