//! Closed border contours stored as an arena of points with wrapping index
//! arithmetic, plus the name -> index landmark map.

use std::collections::BTreeMap;

use crate::geom;

/// Name of the primary landmark tag set by the alignment pass.
pub const LANDMARK_REFERENCE: &str = "reference";

/// Name of the secondary landmark tag, diametrically opposite the reference.
pub const LANDMARK_OPPOSITE: &str = "opposite";

/// Errors raised when constructing or querying a contour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContourError {
    /// Fewer border points than the operation requires.
    TooFewPoints { needed: usize, got: usize },
    /// A coordinate was NaN or infinite.
    NonFinitePoint { index: usize },
    /// A named landmark was requested but never set.
    MissingLandmark { name: String },
}

impl std::fmt::Display for ContourError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContourError::TooFewPoints { needed, got } => {
                write!(f, "too few border points: needed {}, got {}", needed, got)
            }
            ContourError::NonFinitePoint { index } => {
                write!(f, "non-finite coordinate at border index {}", index)
            }
            ContourError::MissingLandmark { name } => {
                write!(f, "landmark '{}' is not set on this contour", name)
            }
        }
    }
}

impl std::error::Error for ContourError {}

/// An ordered, closed sequence of 2D border points for one shape.
///
/// Index arithmetic wraps modulo the point count, so `point(-1)` is the last
/// point and `point(len)` is the first. Landmarks are a small name -> index
/// map owned by the contour; indices are wrapped on insertion.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawBorderContour")]
pub struct BorderContour {
    points: Vec<[f64; 2]>,
    landmarks: BTreeMap<String, usize>,
}

/// Unvalidated wire form of [`BorderContour`]; deserialization goes through
/// the same checks as [`BorderContour::new`] and re-wraps landmark indices.
#[derive(serde::Deserialize)]
struct RawBorderContour {
    points: Vec<[f64; 2]>,
    #[serde(default)]
    landmarks: BTreeMap<String, usize>,
}

impl TryFrom<RawBorderContour> for BorderContour {
    type Error = ContourError;

    fn try_from(raw: RawBorderContour) -> Result<Self, ContourError> {
        let mut contour = BorderContour::new(raw.points)?;
        for (name, index) in raw.landmarks {
            contour.set_landmark(&name, index as i64);
        }
        Ok(contour)
    }
}

impl BorderContour {
    /// Build a contour from an ordered closed point sequence.
    ///
    /// The first and last points are treated as adjacent; do not repeat the
    /// first point at the end.
    pub fn new(points: Vec<[f64; 2]>) -> Result<Self, ContourError> {
        if points.len() < 3 {
            return Err(ContourError::TooFewPoints {
                needed: 3,
                got: points.len(),
            });
        }
        for (index, p) in points.iter().enumerate() {
            if !p[0].is_finite() || !p[1].is_finite() {
                return Err(ContourError::NonFinitePoint { index });
            }
        }
        Ok(Self {
            points,
            landmarks: BTreeMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Wrap an arbitrary signed index into [0, len).
    pub fn wrap(&self, index: i64) -> usize {
        index.rem_euclid(self.points.len() as i64) as usize
    }

    /// Border point at a wrapped index.
    pub fn point(&self, index: i64) -> [f64; 2] {
        self.points[self.wrap(index)]
    }

    /// Area centroid of the enclosed region.
    pub fn centroid(&self) -> [f64; 2] {
        geom::centroid(&self.points)
    }

    /// Whether `p` lies inside the enclosed region (even-odd rule).
    pub fn contains(&self, p: [f64; 2]) -> bool {
        geom::contains(&self.points, p)
    }

    /// Closed polyline length around the border.
    pub fn perimeter(&self) -> f64 {
        let mut total = 0.0;
        for (i, p) in self.points.iter().enumerate() {
            let q = self.points[(i + 1) % self.points.len()];
            total += geom::distance(*p, q);
        }
        total
    }

    /// Enclosed area (shoelace, winding-independent).
    pub fn area(&self) -> f64 {
        geom::signed_area(&self.points).abs()
    }

    /// Maximum pairwise point distance (max feret diameter).
    pub fn max_feret(&self) -> f64 {
        let mut best = 0.0f64;
        for i in 0..self.points.len() {
            for j in (i + 1)..self.points.len() {
                let d = geom::distance(self.points[i], self.points[j]);
                if d > best {
                    best = d;
                }
            }
        }
        best
    }

    /// Set (or move) a named landmark; the index is wrapped.
    pub fn set_landmark(&mut self, name: &str, index: i64) {
        let wrapped = self.wrap(index);
        self.landmarks.insert(name.to_string(), wrapped);
    }

    /// Index of a named landmark.
    pub fn landmark(&self, name: &str) -> Result<usize, ContourError> {
        self.landmarks
            .get(name)
            .copied()
            .ok_or_else(|| ContourError::MissingLandmark {
                name: name.to_string(),
            })
    }

    pub fn has_landmark(&self, name: &str) -> bool {
        self.landmarks.contains_key(name)
    }

    /// All landmarks as (name, index) pairs in name order.
    pub fn landmarks(&self) -> impl Iterator<Item = (&str, usize)> {
        self.landmarks.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Reverse the traversal direction in place.
    ///
    /// Every landmark index is remapped so it keeps pointing at the same
    /// physical border point.
    pub fn reverse(&mut self) {
        let len = self.points.len();
        self.points.reverse();
        for index in self.landmarks.values_mut() {
            *index = len - *index - 1;
        }
    }
}
