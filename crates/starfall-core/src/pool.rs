//! Projectile pooling.
//!
//! A [`ProjectilePool`] is constructed explicitly and passed by reference to
//! whatever spawns or retires projectiles; there is no global instance. One
//! mutex guards the free list and the counters, taken unconditionally on
//! every operation.
//!
//! Exhaustion degrades instead of failing: past the configured maximum the
//! pool allocates directly and logs a rate-limited warning.

use crate::projectile::{Projectile, ShotKind};
use parking_lot::Mutex;
use starfall_common::Vec2;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Default ceiling on pooled projectiles.
pub const DEFAULT_MAX_PROJECTILES: usize = 2500;

/// How often exhaustion warnings are emitted.
const EXHAUSTION_LOG_INTERVAL: u64 = 100;

#[derive(Debug)]
struct PoolInner {
    free: VecDeque<Projectile>,
    total_allocated: usize,
    outstanding: usize,
    max_size: usize,
    exhaustion_count: u64,
}

/// Thread-safe free list of reusable projectiles.
#[derive(Debug)]
pub struct ProjectilePool {
    inner: Mutex<PoolInner>,
}

impl ProjectilePool {
    /// Creates an empty pool with the given ceiling.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(PoolInner {
                free: VecDeque::new(),
                total_allocated: 0,
                outstanding: 0,
                max_size,
                exhaustion_count: 0,
            }),
        }
    }

    /// Takes a projectile, reusing a pooled record when one is available.
    ///
    /// Past the ceiling the pool allocates directly; the caller always gets
    /// a projectile.
    pub fn checkout(
        &self,
        kind: ShotKind,
        color: u16,
        position: Vec2,
        heading: f32,
        speed: f32,
    ) -> Projectile {
        let mut inner = self.inner.lock();
        inner.outstanding += 1;

        if let Some(mut shot) = inner.free.pop_front() {
            shot.reset(kind, color, position, heading, speed);
            return shot;
        }

        if inner.total_allocated >= inner.max_size {
            inner.exhaustion_count += 1;
            if inner.exhaustion_count % EXHAUSTION_LOG_INTERVAL == 1 {
                warn!(
                    exhaustions = inner.exhaustion_count,
                    max = inner.max_size,
                    "projectile pool exhausted, allocating past the ceiling"
                );
            }
        }
        inner.total_allocated += 1;
        Projectile::new(kind, color, position, heading, speed)
    }

    /// Returns a projectile to the pool.
    ///
    /// The record is parked off-screen with its motion queue cleared. Records
    /// past the ceiling are dropped instead of pooled.
    pub fn checkin(&self, mut shot: Projectile) {
        shot.park();

        let mut inner = self.inner.lock();
        inner.outstanding = inner.outstanding.saturating_sub(1);
        if inner.free.len() < inner.max_size {
            inner.free.push_back(shot);
        } else {
            inner.total_allocated = inner.total_allocated.saturating_sub(1);
        }
    }

    /// Front-loads `count` pooled records, raising the ceiling to twice the
    /// requested count when it would not fit.
    pub fn preallocate(&self, count: usize) {
        let mut inner = self.inner.lock();
        if count > inner.max_size {
            inner.max_size = count * 2;
            debug!(max = inner.max_size, "raised projectile pool ceiling");
        }
        while inner.free.len() < count {
            let mut shot = Projectile::new(ShotKind::Pellet, 0, Vec2::ZERO, 0.0, 0.0);
            shot.park();
            inner.free.push_back(shot);
            inner.total_allocated += 1;
        }
        debug!(available = inner.free.len(), "preallocated projectiles");
    }

    /// Drops every pooled record. Outstanding projectiles are unaffected.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let dropped = inner.free.len();
        inner.free.clear();
        inner.total_allocated -= dropped;
    }

    /// Pooled records ready for checkout.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.inner.lock().free.len()
    }

    /// Records currently checked out.
    #[must_use]
    pub fn outstanding_count(&self) -> usize {
        self.inner.lock().outstanding
    }

    /// All records this pool accounts for, pooled or outstanding.
    #[must_use]
    pub fn total_allocated(&self) -> usize {
        self.inner.lock().total_allocated
    }

    /// Current ceiling.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().max_size
    }
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROJECTILES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::PARKED_POSITION;

    fn take(pool: &ProjectilePool) -> Projectile {
        pool.checkout(ShotKind::Pellet, 0, Vec2::ZERO, 0.0, 100.0)
    }

    #[test]
    fn test_conservation_under_interleaving() {
        let pool = ProjectilePool::new(16);
        pool.preallocate(8);

        let mut held = Vec::new();
        for round in 0..5 {
            for _ in 0..=round {
                held.push(take(&pool));
            }
            if round % 2 == 0 {
                if let Some(shot) = held.pop() {
                    pool.checkin(shot);
                }
            }
            assert_eq!(
                pool.available_count() + pool.outstanding_count(),
                pool.total_allocated()
            );
        }
        for shot in held {
            pool.checkin(shot);
        }
        assert_eq!(
            pool.available_count() + pool.outstanding_count(),
            pool.total_allocated()
        );
        assert_eq!(pool.outstanding_count(), 0);
    }

    #[test]
    fn test_checkout_reuses_pooled_record() {
        let pool = ProjectilePool::new(4);
        let shot = take(&pool);
        assert_eq!(pool.total_allocated(), 1);

        pool.checkin(shot);
        let again = pool.checkout(ShotKind::Orb, 3, Vec2::new(5.0, 5.0), 90.0, 40.0);
        assert_eq!(pool.total_allocated(), 1);
        assert_eq!(again.kind, ShotKind::Orb);
        assert_eq!(again.transform.position, Vec2::new(5.0, 5.0));
        assert!(again.transform.visible);
    }

    #[test]
    fn test_exhaustion_still_returns_projectiles() {
        let pool = ProjectilePool::new(2);
        let a = take(&pool);
        let b = take(&pool);
        let c = take(&pool); // past the ceiling
        assert_eq!(pool.total_allocated(), 3);
        assert_eq!(pool.outstanding_count(), 3);

        pool.checkin(a);
        pool.checkin(b);
        pool.checkin(c); // pool full, record dropped
        assert_eq!(pool.available_count(), 2);
        assert_eq!(pool.total_allocated(), 2);
        assert_eq!(pool.outstanding_count(), 0);
    }

    #[test]
    fn test_checkin_parks_record() {
        let pool = ProjectilePool::new(4);
        let shot = take(&pool);
        pool.checkin(shot);

        let parked = pool.checkout(ShotKind::Pellet, 0, PARKED_POSITION, 0.0, 0.0);
        // Reset happened at checkout; the record is live again.
        assert!(parked.transform.visible);
        assert_eq!(parked.motion_count(), 0);
    }

    #[test]
    fn test_preallocate_expands_ceiling() {
        let pool = ProjectilePool::new(10);
        pool.preallocate(40);
        assert_eq!(pool.capacity(), 80);
        assert_eq!(pool.available_count(), 40);
        assert_eq!(pool.total_allocated(), 40);

        pool.clear();
        assert_eq!(pool.available_count(), 0);
        assert_eq!(pool.total_allocated(), 0);
    }
}
