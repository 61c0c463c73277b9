//! Seam placement scoring
//!
//! A [`BestElementFinder`] runs successive passes of weighted scoring
//! criteria over a list of candidates. Each pass keeps only the candidates
//! scoring close enough to the best one, so later passes break the ties left
//! by earlier ones.

use printplan_core::{coord_to_mm, Coord, Point2};
use printplan_settings::{EZSeamCornerPrefType, EZSeamType, ZSeamConfig};

use super::candidates::StartCandidatePoint;
use printplan_core::geometry::linear_alg::angle_left;

/// Seed of the default random seam generator
pub const DEFAULT_RANDOM_SEED: u64 = 0x5EA3_5EED;

/// Scores a candidate, higher is better
///
/// Scores are expected in `[0, 1]` so that criteria can be weighted together.
pub trait ScoringCriterion {
    fn compute_score(&self, candidate_index: usize) -> f64;
}

pub struct WeighedCriterion {
    pub criterion: Box<dyn ScoringCriterion>,
    pub weight: f64,
}

impl WeighedCriterion {
    pub fn new(criterion: impl ScoringCriterion + 'static) -> Self {
        Self {
            criterion: Box::new(criterion),
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// A set of criteria evaluated together
pub struct CriteriaPass {
    pub criteria: Vec<WeighedCriterion>,
    /// Candidates whose score is further than this from the best are dropped
    pub outsider_delta_threshold: f64,
}

impl CriteriaPass {
    pub fn new(outsider_delta_threshold: f64) -> Self {
        Self {
            criteria: Vec::new(),
            outsider_delta_threshold,
        }
    }

    pub fn with_criterion(mut self, criterion: WeighedCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    fn score(&self, candidate_index: usize) -> f64 {
        self.criteria
            .iter()
            .map(|weighed| weighed.criterion.compute_score(candidate_index) * weighed.weight)
            .sum()
    }
}

/// Multi-pass candidate selection
#[derive(Default)]
pub struct BestElementFinder {
    passes: Vec<CriteriaPass>,
}

impl BestElementFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_criteria_pass(&mut self, pass: CriteriaPass) -> &mut Self {
        self.passes.push(pass);
        self
    }

    /// Indices of the best candidates among `0..candidates_count`, best first
    ///
    /// Ties keep their input order.
    pub fn find_best_elements(&self, candidates_count: usize) -> Vec<usize> {
        let mut best: Vec<(usize, f64)> = (0..candidates_count).map(|index| (index, 0.0)).collect();

        for pass in &self.passes {
            if best.len() <= 1 {
                break;
            }

            for (index, score) in best.iter_mut() {
                *score = pass.score(*index);
            }
            best.sort_by(|a, b| b.1.total_cmp(&a.1));

            let top = best[0].1;
            best.retain(|(_, score)| top - score <= pass.outsider_delta_threshold);
        }

        best.into_iter().map(|(index, _)| index).collect()
    }
}

/// SplitMix64, small and reproducible across platforms
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Uniformly random score per candidate, fixed for a given seed
pub struct RandomScoringCriterion {
    scores: Vec<f64>,
}

impl RandomScoringCriterion {
    pub fn new(candidates_count: usize) -> Self {
        Self::with_seed(candidates_count, DEFAULT_RANDOM_SEED)
    }

    pub fn with_seed(candidates_count: usize, seed: u64) -> Self {
        let mut generator = SplitMix64(seed);
        Self {
            scores: (0..candidates_count).map(|_| generator.next_f64()).collect(),
        }
    }
}

impl ScoringCriterion for RandomScoringCriterion {
    fn compute_score(&self, candidate_index: usize) -> f64 {
        self.scores.get(candidate_index).copied().unwrap_or(0.0)
    }
}

/// Which components of the offset to a target are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceType {
    Euclidean,
    XOnly,
    YOnly,
}

/// Favors candidates close to a target position
pub struct DistanceScoringCriterion {
    points: Vec<Point2>,
    target: Point2,
    distance_type: DistanceType,
    /// Distance, in mm, at which the score drops to one half
    distance_divider: f64,
}

impl DistanceScoringCriterion {
    pub fn new(points: Vec<Point2>, target: Point2, distance_type: DistanceType) -> Self {
        Self {
            points,
            target,
            distance_type,
            distance_divider: 20.0,
        }
    }
}

impl ScoringCriterion for DistanceScoringCriterion {
    fn compute_score(&self, candidate_index: usize) -> f64 {
        let Some(point) = self.points.get(candidate_index) else {
            return 0.0;
        };

        let offset = *point - self.target;
        let distance = match self.distance_type {
            DistanceType::Euclidean => coord_to_mm(1) * offset.vsize(),
            DistanceType::XOnly => coord_to_mm(offset.x.abs()),
            DistanceType::YOnly => coord_to_mm(offset.y.abs()),
        };

        self.distance_divider / (distance + self.distance_divider)
    }
}

/// Favors the corners of a closed loop that match a corner preference
pub struct CornerScoringCriterion {
    points: Vec<Point2>,
    corner_preference: EZSeamCornerPrefType,
    segment_sizes: Vec<Coord>,
    total_length: Coord,
}

impl CornerScoringCriterion {
    /// Length of path, in µm, looked at on each side of a vertex
    pub const ANGLE_QUERY_DISTANCE: Coord = 1000;

    pub fn new(points: Vec<Point2>, corner_preference: EZSeamCornerPrefType) -> Self {
        let segment_sizes: Vec<Coord> = (0..points.len())
            .map(|index| {
                let next = points[(index + 1) % points.len()];
                (next - points[index]).vsize().round() as Coord
            })
            .collect();
        let total_length = segment_sizes.iter().sum();

        Self {
            points,
            corner_preference,
            segment_sizes,
            total_length,
        }
    }

    /// Turn at a vertex, from -1 (sharp concave) through 0 (straight) to 1 (sharp convex)
    pub fn corner_angle(&self, vertex_index: usize) -> f64 {
        if self.total_length == 0 {
            return 0.0;
        }

        let bounded_distance = Self::ANGLE_QUERY_DISTANCE.min(self.total_length / 2);
        let here = self.points[vertex_index];
        let next = self.find_neighbour_point(vertex_index, bounded_distance);
        let previous = self.find_neighbour_point(vertex_index, -bounded_distance);

        (angle_left(previous, here, next) - std::f64::consts::PI) / std::f64::consts::PI
    }

    /// Point at `distance` along the loop from a vertex, backwards for negative distances
    fn find_neighbour_point(&self, vertex_index: usize, distance: Coord) -> Point2 {
        let count = self.points.len() as i64;
        let direction: i64 = if distance > 0 { 1 } else { -1 };
        let size_delta: i64 = if distance > 0 { -1 } else { 0 };
        let distance = distance.abs();
        let wrap = |delta: i64| (vertex_index as i64 + delta).rem_euclid(count) as usize;

        let mut actual_delta = 0;
        let mut travelled = 0;
        let mut segment_size = 0;
        while travelled < distance {
            actual_delta += direction;
            segment_size = self.segment_sizes[wrap(actual_delta + size_delta)];
            travelled += segment_size;
        }

        let next_pos = self.points[wrap(actual_delta)];
        if travelled == distance {
            return next_pos;
        }

        // Overshot: step back along the last segment
        let prev_pos = self.points[wrap(actual_delta - direction)];
        let unit_vector = ((next_pos - prev_pos) * 1000) / segment_size;
        prev_pos + unit_vector * (segment_size - (travelled - distance)) / 1000
    }
}

fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    (value - a) / (b - a)
}

impl ScoringCriterion for CornerScoringCriterion {
    fn compute_score(&self, candidate_index: usize) -> f64 {
        let angle = self.corner_angle(candidate_index);
        match self.corner_preference {
            EZSeamCornerPrefType::Inner => inverse_lerp(1.0, -1.0, angle),
            EZSeamCornerPrefType::Outer => inverse_lerp(-1.0, 1.0, angle),
            EZSeamCornerPrefType::Any => angle.abs(),
            EZSeamCornerPrefType::Weighted => {
                if angle < 0.0 {
                    -angle
                } else {
                    angle / 2.0
                }
            }
            EZSeamCornerPrefType::None => 0.0,
        }
    }
}

/// Keep the candidates allowed by a seam configuration
///
/// Candidates are expected in path order, which the corner criterion relies on.
pub fn pre_filter_start_candidates(
    candidates: Vec<StartCandidatePoint>,
    seam_config: &ZSeamConfig,
) -> Vec<StartCandidatePoint> {
    if candidates.len() <= 1 {
        return candidates;
    }

    let points: Vec<Point2> = candidates.iter().map(|c| c.position.to_point2()).collect();
    let mut finder = BestElementFinder::new();
    let mut main_pass = CriteriaPass::new(0.05);
    let mut unique = false;

    match seam_config.seam_type {
        EZSeamType::Shortest | EZSeamType::Plugin => {}
        EZSeamType::Random => {
            main_pass = main_pass.with_criterion(WeighedCriterion::new(RandomScoringCriterion::new(points.len())));
            unique = true;
        }
        EZSeamType::UserSpecified => {
            main_pass = main_pass.with_criterion(WeighedCriterion::new(DistanceScoringCriterion::new(
                points.clone(),
                seam_config.position,
                DistanceType::Euclidean,
            )));
            unique = true;
        }
        EZSeamType::SharpestCorner => {
            main_pass = main_pass.with_criterion(WeighedCriterion::new(CornerScoringCriterion::new(
                points.clone(),
                seam_config.corner_pref,
            )));
            unique = true;
        }
    }
    finder.append_criteria_pass(main_pass);

    if seam_config.seam_type == EZSeamType::SharpestCorner {
        let position_max = Point2::new(
            points.iter().map(|p| p.x).max().unwrap_or(0),
            points.iter().map(|p| p.y).max().unwrap_or(0),
        );

        finder.append_criteria_pass(CriteriaPass::new(0.01).with_criterion(WeighedCriterion::new(
            DistanceScoringCriterion::new(points.clone(), position_max, DistanceType::YOnly),
        )));
        finder.append_criteria_pass(CriteriaPass::new(0.0).with_criterion(WeighedCriterion::new(
            DistanceScoringCriterion::new(points, position_max, DistanceType::XOnly),
        )));
    }

    let best = finder.find_best_elements(candidates.len());
    tracing::trace!(
        "Seam {} kept {} of {} candidate(s)",
        seam_config.seam_type,
        best.len(),
        candidates.len()
    );

    if (unique && !best.is_empty()) || best.len() == 1 {
        return vec![candidates[best[0]].clone()];
    }
    best.into_iter().map(|index| candidates[index].clone()).collect()
}
