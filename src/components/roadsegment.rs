use arrayvec::ArrayVec;
use bevy_ecs::prelude::{Component, Entity};

/// Lane markings painted on each segment.
pub const MARKINGS_PER_SEGMENT: usize = 4;

/// One tile of the recycled road ring.
#[derive(Component, Debug, Clone, Default)]
pub struct RoadSegment {
    /// Ring slot, fixed for the life of the segment.
    pub slot: usize,
    pub markings: ArrayVec<Entity, MARKINGS_PER_SEGMENT>,
}

/// A yellow lane stripe owned by a [`RoadSegment`].
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LaneMarking;
