//! The initial creatures and food scattered over a new world.

use glam::Vec3;
use rand::Rng;
use shoreline_terrain::HeightQuery;

const CREATURE_MIN_SIZE: f32 = 0.1;
const CREATURE_MAX_SIZE: f32 = 5.0;
const CREATURE_MIN_LUNGE: f32 = 1.0;
const CREATURE_MAX_LUNGE: f32 = 40.0;
const CREATURE_MIN_SENSE: f32 = 15.0;
const CREATURE_MAX_SENSE: f32 = 75.0;

/// A living creature as first spawned.
#[derive(Clone, Debug, PartialEq)]
pub struct Creature {
    pub position: Vec3,
    /// Edge length of its cube body.
    pub size: f32,
    pub weight: f32,
    pub color: Vec3,
    /// Per-axis lunge speed.
    pub lunge_speed: Vec3,
    pub sense_distance: f32,
}

/// A piece of food.
#[derive(Clone, Debug, PartialEq)]
pub struct Food {
    pub position: Vec3,
    pub color: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Creature(Creature),
    Food(Food),
}

impl Entity {
    pub fn position(&self) -> Vec3 {
        match self {
            Entity::Creature(c) => c.position,
            Entity::Food(f) => f.position,
        }
    }
}

fn random_vec3<R: Rng>(rng: &mut R, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        rng.random_range(min..=max),
        rng.random_range(min..=max),
        rng.random_range(min..=max),
    )
}

/// A point on the terrain surface with uniformly random `x` in `[0, size_x)`
/// and `z` in `[0, size_z)`.
fn random_ground<H, R>(terrain: &H, size_x: u32, size_z: u32, rng: &mut R) -> Vec3
where
    H: HeightQuery + ?Sized,
    R: Rng,
{
    let x = rng.random_range(0.0..size_x as f32);
    let z = rng.random_range(0.0..size_z as f32);
    Vec3::new(x, terrain.height_at(x, z, 0.0), z)
}

/// Place `creatures` creatures followed by `food` food on the terrain.
pub fn spawn_population<H, R>(
    terrain: &H,
    size_x: u32,
    size_z: u32,
    rng: &mut R,
    creatures: u32,
    food: u32,
) -> Vec<Entity>
where
    H: HeightQuery + ?Sized,
    R: Rng,
{
    let mut entities = Vec::with_capacity(creatures as usize + food as usize);
    if size_x == 0 || size_z == 0 {
        return entities;
    }

    for _ in 0..creatures {
        let position = random_ground(terrain, size_x, size_z, rng);
        let size = rng.random_range(CREATURE_MIN_SIZE..=CREATURE_MAX_SIZE);
        entities.push(Entity::Creature(Creature {
            position,
            size,
            weight: Vec3::splat(size).length() * 0.2,
            color: random_vec3(rng, 0.25, 1.0),
            lunge_speed: random_vec3(rng, CREATURE_MIN_LUNGE, CREATURE_MAX_LUNGE),
            sense_distance: rng.random_range(CREATURE_MIN_SENSE..=CREATURE_MAX_SENSE),
        }));
    }
    for _ in 0..food {
        let position = random_ground(terrain, size_x, size_z, rng);
        entities.push(Entity::Food(Food {
            position,
            color: random_vec3(rng, 0.35, 1.0),
        }));
    }

    entities
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use shoreline_terrain::HeightGrid;

    use super::*;

    fn slope() -> HeightGrid {
        let samples = (0..=8)
            .flat_map(|z| (0..=6).map(move |x| x as f32 + z as f32 * 0.5))
            .collect();
        HeightGrid::from_samples(6, 8, samples)
    }

    #[test]
    fn test_counts_and_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let entities = spawn_population(&slope(), 6, 8, &mut rng, 5, 12);
        assert_eq!(entities.len(), 17);
        assert!(entities[..5].iter().all(|e| matches!(e, Entity::Creature(_))));
        assert!(entities[5..].iter().all(|e| matches!(e, Entity::Food(_))));
    }

    #[test]
    fn test_entities_rest_on_terrain() {
        let terrain = slope();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for entity in spawn_population(&terrain, 6, 8, &mut rng, 20, 50) {
            let p = entity.position();
            assert!((0.0..6.0).contains(&p.x) && (0.0..8.0).contains(&p.z));
            assert_eq!(p.y, terrain.height_at(p.x, p.z, 0.0));
        }
    }

    #[test]
    fn test_attribute_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for entity in spawn_population(&slope(), 6, 8, &mut rng, 30, 30) {
            match entity {
                Entity::Creature(c) => {
                    assert!((CREATURE_MIN_SIZE..=CREATURE_MAX_SIZE).contains(&c.size));
                    assert!((CREATURE_MIN_SENSE..=CREATURE_MAX_SENSE).contains(&c.sense_distance));
                    assert!(c.color.min_element() >= 0.25 && c.color.max_element() <= 1.0);
                    assert!(c.weight > 0.0);
                }
                Entity::Food(f) => {
                    assert!(f.color.min_element() >= 0.35 && f.color.max_element() <= 1.0);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = spawn_population(&slope(), 6, 8, &mut ChaCha8Rng::seed_from_u64(5), 4, 4);
        let b = spawn_population(&slope(), 6, 8, &mut ChaCha8Rng::seed_from_u64(5), 4, 4);
        assert_eq!(a, b);
    }
}
