//! Fixed-size ring of gap obstacles
//!
//! Slot `i` always sits at angle `2π·i/N`. Only gap heights change at runtime.

use rand::Rng;

use crate::config::WorldConfig;

/// One obstacle: a lower and an upper half with a gap between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub slot: usize,
    /// Top of the lower half, measured from the world surface
    pub bot_height: f32,
    /// Angular centre (radians)
    pub angle: f32,
}

impl Obstacle {
    /// Bottom of the upper half
    pub fn top_height(&self, gap_width: f32) -> f32 {
        self.bot_height + gap_width
    }

    /// Whether a head at `head_height` hits either half
    pub fn is_lethal(&self, head_height: f32, gap_width: f32) -> bool {
        head_height < self.bot_height || head_height > self.top_height(gap_width)
    }
}

/// Where an obstacle was placed, for the rendering side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstaclePlacement {
    pub slot: usize,
    pub angle: f32,
    /// Distance from the world centre to the top of the lower half
    pub bot_radius: f32,
    /// Distance from the world centre to the bottom of the upper half
    pub top_radius: f32,
}

/// Ring of obstacles around the world
#[derive(Debug, Clone)]
pub struct ObstacleRing {
    obstacles: Vec<Obstacle>,
    world_radius: f32,
    min_height: f32,
    height_range: f32,
}

impl ObstacleRing {
    /// Build a ring with every gap at the minimum height
    pub fn new(config: &WorldConfig) -> Self {
        let obstacles = (0..config.num_slots)
            .map(|slot| Obstacle {
                slot,
                bot_height: config.obstacle_min_height,
                angle: slot as f32 * config.slot_spacing(),
            })
            .collect();
        Self {
            obstacles,
            world_radius: config.world_radius,
            min_height: config.obstacle_min_height,
            height_range: config.obstacle_height_range,
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Obstacle at a slot; cursor indices wrap around the ring
    pub fn get(&self, index: u64) -> &Obstacle {
        &self.obstacles[(index % self.obstacles.len() as u64) as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Radial placement of an obstacle for the rendering side
    pub fn placement(&self, slot: usize, gap_width: f32) -> ObstaclePlacement {
        let obstacle = &self.obstacles[slot];
        let bot_radius = self.world_radius + obstacle.bot_height;
        ObstaclePlacement {
            slot,
            angle: obstacle.angle,
            bot_radius,
            top_radius: bot_radius + gap_width,
        }
    }

    /// Give one slot a fresh random gap height. `reduced` halves the draw,
    /// used for the obstacle right in front of a freshly spawned player.
    pub fn randomize_height<R: Rng>(
        &mut self,
        slot: usize,
        gap_width: f32,
        reduced: bool,
        rng: &mut R,
    ) -> ObstaclePlacement {
        let mut frac: f32 = rng.random();
        if reduced {
            frac /= 2.0;
        }
        let ceiling = self.min_height + self.height_range;
        let mut bot_height = self.min_height + self.height_range * frac;
        // frac < 1 can still round up to the ceiling in f32
        if bot_height >= ceiling {
            bot_height = f32::from_bits(ceiling.to_bits() - 1);
        }
        self.obstacles[slot].bot_height = bot_height;
        self.placement(slot, gap_width)
    }

    /// Randomize every slot once, in slot order
    pub fn randomize_all<R: Rng>(
        &mut self,
        gap_width: f32,
        reduced_slot: usize,
        rng: &mut R,
    ) -> Vec<ObstaclePlacement> {
        (0..self.obstacles.len())
            .map(|slot| self.randomize_height(slot, gap_width, slot == reduced_slot, rng))
            .collect()
    }

    /// Randomize every slot except `keep`, leaving the obstacle in view untouched
    pub fn randomize_all_except<R: Rng>(
        &mut self,
        gap_width: f32,
        keep: usize,
        rng: &mut R,
    ) -> Vec<ObstaclePlacement> {
        (0..self.obstacles.len())
            .filter(|&slot| slot != keep)
            .map(|slot| self.randomize_height(slot, gap_width, false, rng))
            .collect()
    }
}
