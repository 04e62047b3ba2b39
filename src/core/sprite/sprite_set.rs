//=========================================================================
// Sprite Set
//
// Ordered collection of the sprites owned by one instance.
//
// Responsibilities:
// - Hand out stable `SpriteId` handles on insert
// - Produce a z-ordered iteration order (ascending, ties by insertion)
// - Reorder a single sprite to the front or back
//
// Notes:
// Storage keeps insertion order; z order is derived on demand with a
// stable sort so equal z values keep their relative order across ticks.
//
//=========================================================================

//=== External Crates =====================================================
use log::debug;

//=== Internal Modules ====================================================
use super::Sprite;
use crate::core::error::GameError;

//=== SpriteId ============================================================

/// Handle to a sprite inside a [`SpriteSet`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u64);

impl std::fmt::Display for SpriteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sprite#{}", self.0)
    }
}

//=== SpriteSet ===========================================================

#[derive(Debug, Default)]
pub struct SpriteSet {
    sprites: Vec<(SpriteId, Sprite)>,
    next_id: u64,
}

impl SpriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Membership -------------------------------------------------------

    pub fn insert(&mut self, sprite: Sprite) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        debug!(target: "sprite", "Added {} at z = {}", id, sprite.z);
        self.sprites.push((id, sprite));
        id
    }

    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        let index = self.position(id)?;
        debug!(target: "sprite", "Removed {}", id);
        Some(self.sprites.remove(index).1)
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|(sid, _)| *sid == id).map(|(_, sprite)| sprite)
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|(sid, _)| *sid == id).map(|(_, sprite)| sprite)
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Sprites in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.sprites.iter().map(|(id, sprite)| (*id, sprite))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SpriteId, &mut Sprite)> {
        self.sprites.iter_mut().map(|(id, sprite)| (*id, sprite))
    }

    //--- Depth Ordering ---------------------------------------------------

    /// Ids sorted by ascending z. Equal z keeps insertion order.
    pub fn ordered_ids(&self) -> Vec<SpriteId> {
        let mut order: Vec<(SpriteId, f64)> = self.sprites.iter().map(|(id, s)| (*id, s.z)).collect();
        order.sort_by(|a, b| a.1.total_cmp(&b.1));
        order.into_iter().map(|(id, _)| id).collect()
    }

    /// Largest z in the set, `None` when empty.
    pub fn max_z(&self) -> Option<f64> {
        self.sprites.iter().map(|(_, s)| s.z).reduce(f64::max)
    }

    /// Smallest z in the set, `None` when empty.
    pub fn min_z(&self) -> Option<f64> {
        self.sprites.iter().map(|(_, s)| s.z).reduce(f64::min)
    }

    /// Sets the sprite's z to one above the current maximum.
    pub fn bring_to_front(&mut self, id: SpriteId) -> Result<f64, GameError> {
        let max = self
            .max_z()
            .ok_or_else(|| GameError::InvalidOperation("bring_to_front on an empty sprite set".into()))?;
        self.set_z(id, max + 1.0)
    }

    /// Sets the sprite's z to one below the current minimum.
    pub fn send_to_back(&mut self, id: SpriteId) -> Result<f64, GameError> {
        let min = self
            .min_z()
            .ok_or_else(|| GameError::InvalidOperation("send_to_back on an empty sprite set".into()))?;
        self.set_z(id, min - 1.0)
    }

    fn set_z(&mut self, id: SpriteId, z: f64) -> Result<f64, GameError> {
        let sprite = self
            .get_mut(id)
            .ok_or_else(|| GameError::InvalidOperation(format!("{} is not in the sprite set", id)))?;
        sprite.z = z;
        debug!(target: "sprite", "Moved {} to z = {}", id, z);
        Ok(z)
    }

    //--- Per-Tick ---------------------------------------------------------

    /// Advances every sprite's image state.
    pub fn poll_images(&mut self, delta: f64) {
        for (_, sprite) in &mut self.sprites {
            sprite.poll_image(delta);
        }
    }

    fn position(&self, id: SpriteId) -> Option<usize> {
        self.sprites.iter().position(|(sid, _)| *sid == id)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
