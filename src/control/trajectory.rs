//! Reference trajectory buffer.
//!
//! An ordered sequence of shaft angles consumed by the position loop during
//! `TrackTrajectory`, one point per tick.

use heapless::Vec;

use crate::error::{Error, Result, TrajectoryError};

/// Maximum number of reference points in a trajectory.
pub const MAX_TRAJECTORY_POINTS: usize = 2000;

/// Bounded buffer of reference angles in degrees.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    points: Vec<f32, MAX_TRAJECTORY_POINTS>,
}

impl Trajectory {
    /// Create an empty trajectory.
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Replace the trajectory with the given reference angles.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::TooLong`] if the input exceeds
    /// [`MAX_TRAJECTORY_POINTS`]; the previous contents are kept.
    pub fn load<I>(&mut self, references: I) -> Result<()>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut staged: Vec<f32, MAX_TRAJECTORY_POINTS> = Vec::new();
        let mut dropped = 0usize;

        for value in references {
            if staged.push(value).is_err() {
                dropped += 1;
            }
        }

        if dropped > 0 {
            return Err(Error::Trajectory(TrajectoryError::TooLong {
                length: MAX_TRAJECTORY_POINTS + dropped,
                capacity: MAX_TRAJECTORY_POINTS,
            }));
        }

        self.points = staged;
        Ok(())
    }

    /// Number of reference points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trajectory has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reference angle at a cursor position.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.points.get(index).copied()
    }

    /// Iterate over the reference angles.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.points.iter().copied()
    }

    /// Discard all points.
    #[inline]
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_index() {
        let mut traj = Trajectory::new();
        traj.load([0.0, 45.0, 90.0]).unwrap();

        assert_eq!(traj.len(), 3);
        assert_eq!(traj.get(1), Some(45.0));
        assert_eq!(traj.get(3), None);
    }

    #[test]
    fn test_reload_replaces() {
        let mut traj = Trajectory::new();
        traj.load([1.0, 2.0]).unwrap();
        traj.load([3.0]).unwrap();

        assert_eq!(traj.len(), 1);
        assert_eq!(traj.get(0), Some(3.0));
    }

    #[test]
    fn test_too_long_keeps_previous() {
        let mut traj = Trajectory::new();
        traj.load([7.0]).unwrap();

        let result = traj.load((0..MAX_TRAJECTORY_POINTS + 5).map(|i| i as f32));
        assert!(matches!(
            result,
            Err(Error::Trajectory(TrajectoryError::TooLong { .. }))
        ));
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.get(0), Some(7.0));
    }

    #[test]
    fn test_full_capacity_accepted() {
        let mut traj = Trajectory::new();
        traj.load((0..MAX_TRAJECTORY_POINTS).map(|i| i as f32))
            .unwrap();
        assert_eq!(traj.len(), MAX_TRAJECTORY_POINTS);
    }
}
