//! Bounded history of camera poses and their projection in the external view

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use wireview_core::{ImagePoint, Pose};

/// Default number of samples kept
pub const DEFAULT_TRAJECTORY_CAPACITY: usize = 1000;

/// How the projected trajectory is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryStyle {
    /// Consecutive samples joined by segments
    #[default]
    Line,
    /// One point per sample
    Point,
}

/// Poses captured for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    /// Camera relative to the object (`cMo`)
    pub camera_pose: Pose,
    /// Object relative to the world (`fMo`)
    pub object_pose: Pose,
}

/// Projects a sample into the current external view
pub trait SampleProjector {
    fn project(&self, sample: &TrajectorySample) -> Option<ImagePoint>;
}

impl<F> SampleProjector for F
where
    F: Fn(&TrajectorySample) -> Option<ImagePoint>,
{
    fn project(&self, sample: &TrajectorySample) -> Option<ImagePoint> {
        self(sample)
    }
}

/// Capacity-bounded trajectory with its screen-space projection.
///
/// Samples and projections always have the same length, never above the
/// capacity; the oldest entries are evicted first.
#[derive(Debug, Clone)]
pub struct TrajectoryCache {
    capacity: usize,
    samples: VecDeque<TrajectorySample>,
    projections: VecDeque<Option<ImagePoint>>,
}

impl TrajectoryCache {
    /// Create an empty cache holding at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity.min(DEFAULT_TRAJECTORY_CAPACITY)),
            projections: VecDeque::with_capacity(capacity.min(DEFAULT_TRAJECTORY_CAPACITY)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, evicting the oldest samples if needed
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.projections.clear();
    }

    /// Record the poses of a new frame.
    ///
    /// When either viewpoint moved every retained sample is reprojected;
    /// otherwise only the new sample is. Returns whether the cache was
    /// rebuilt.
    pub fn observe<S: SampleProjector + ?Sized>(
        &mut self,
        camera_pose: Pose,
        object_pose: Pose,
        viewpoint_changed: bool,
        external_viewpoint_changed: bool,
        projector: &S,
    ) -> bool {
        let sample = TrajectorySample {
            camera_pose,
            object_pose,
        };
        self.samples.push_back(sample);

        let rebuild = viewpoint_changed || external_viewpoint_changed;
        if rebuild {
            self.projections.clear();
            self.projections
                .extend(self.samples.iter().map(|s| projector.project(s)));
            debug!("trajectory rebuilt with {} samples", self.samples.len());
        } else {
            self.projections.push_back(projector.project(&sample));
        }

        self.evict();
        rebuild
    }

    /// Retained samples, oldest first
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &TrajectorySample> {
        self.samples.iter()
    }

    /// Projections of the retained samples, oldest first
    pub fn projections(&self) -> impl ExactSizeIterator<Item = Option<ImagePoint>> + '_ {
        self.projections.iter().copied()
    }

    fn evict(&mut self) {
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
            self.projections.pop_front();
        }
    }
}

impl Default for TrajectoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TRAJECTORY_CAPACITY)
    }
}
