//! Semantic identification of the five reference markers.
//!
//! The dial-centre marker is painted larger than the four pointer markers.
//! The two pointers furthest apart bound the digit strip (TENTH and
//! TENTHOUSANDTH); the one nearer the centre is TENTHOUSANDTH. THOUSANDTH is
//! TENTHOUSANDTH's nearest remaining neighbour and HUNDREDTH takes whatever
//! index is left.

use crate::blob::Blob;
use crate::ReadError;

/// Number of reference markers on a meter face.
pub const MARKER_COUNT: usize = 5;

/// Semantic identity of one reference marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerRole {
    Center,
    Tenth,
    Hundredth,
    Thousandth,
    TenThousandth,
}

impl MarkerRole {
    pub const ALL: [MarkerRole; MARKER_COUNT] = [
        MarkerRole::Center,
        MarkerRole::Tenth,
        MarkerRole::Hundredth,
        MarkerRole::Thousandth,
        MarkerRole::TenThousandth,
    ];

    /// Correspondence order used by the dial rectifier. Only the first three
    /// entries drive the affine fit.
    pub const RECTIFY_ORDER: [MarkerRole; MARKER_COUNT] = [
        MarkerRole::Center,
        MarkerRole::Hundredth,
        MarkerRole::TenThousandth,
        MarkerRole::Tenth,
        MarkerRole::Thousandth,
    ];
}

/// Blob index per marker role; always a permutation of `0..5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoleAssignment {
    pub center: usize,
    pub tenth: usize,
    pub hundredth: usize,
    pub thousandth: usize,
    pub ten_thousandth: usize,
}

impl RoleAssignment {
    /// Build from raw indices, validating that they form a permutation.
    pub fn new(
        center: usize,
        tenth: usize,
        hundredth: usize,
        thousandth: usize,
        ten_thousandth: usize,
    ) -> Result<Self, ReadError> {
        let out = Self {
            center,
            tenth,
            hundredth,
            thousandth,
            ten_thousandth,
        };
        let mut seen = [false; MARKER_COUNT];
        for role in MarkerRole::ALL {
            let idx = out.index(role);
            if idx >= MARKER_COUNT {
                return Err(ReadError::InvalidRoleAssignment(format!(
                    "{:?} -> blob {} is out of range",
                    role, idx
                )));
            }
            if seen[idx] {
                return Err(ReadError::InvalidRoleAssignment(format!(
                    "blob {} assigned to more than one role",
                    idx
                )));
            }
            seen[idx] = true;
        }
        Ok(out)
    }

    /// Blob index holding `role`.
    pub fn index(&self, role: MarkerRole) -> usize {
        match role {
            MarkerRole::Center => self.center,
            MarkerRole::Tenth => self.tenth,
            MarkerRole::Hundredth => self.hundredth,
            MarkerRole::Thousandth => self.thousandth,
            MarkerRole::TenThousandth => self.ten_thousandth,
        }
    }

    /// Role held by blob `index`.
    pub fn role_of(&self, index: usize) -> Option<MarkerRole> {
        MarkerRole::ALL
            .into_iter()
            .find(|&role| self.index(role) == index)
    }
}

/// All unordered index pairs `(i, j)`, `i < j < n`, in lexicographic order.
pub(crate) fn index_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect()
}

/// Position of the unordered pair `{i, j}`, `i != j`, in [`index_pairs`]`(n)`.
pub(crate) fn pair_index(n: usize, i: usize, j: usize) -> usize {
    let (a, b) = if i < j { (i, j) } else { (j, i) };
    a * n - a * (a + 1) / 2 + (b - a - 1)
}

/// Index of the first maximum.
fn first_max(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Index of the first minimum.
fn first_min(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] {
            best = i;
        }
    }
    best
}

/// Assign the five marker roles from blob geometry.
pub fn identify_markers(blobs: &[Blob]) -> Result<RoleAssignment, ReadError> {
    if blobs.len() != MARKER_COUNT {
        return Err(ReadError::WrongBlobCount {
            expected: MARKER_COUNT,
            found: blobs.len(),
        });
    }

    let areas: Vec<f64> = blobs.iter().map(|b| b.area as f64).collect();
    let center = first_max(&areas);

    let pairs = index_pairs(MARKER_COUNT);
    let dist: Vec<f64> = pairs
        .iter()
        .map(|&(i, j)| blobs[i].squared_distance(&blobs[j]))
        .collect();
    let d = |i: usize, j: usize| {
        if i == j {
            0.0
        } else {
            dist[pair_index(MARKER_COUNT, i, j)]
        }
    };

    // Strip extremes: furthest pair not involving the centre.
    let without_center: Vec<f64> = pairs
        .iter()
        .zip(&dist)
        .map(|(&(i, j), &v)| if i == center || j == center { 0.0 } else { v })
        .collect();
    let (a, b) = pairs[first_max(&without_center)];

    let (ten_thousandth, tenth) = if d(a, center) < d(b, center) {
        (a, b)
    } else {
        (b, a)
    };

    let near_ten_thousandth: Vec<f64> = pairs
        .iter()
        .zip(&dist)
        .map(|(&(i, j), &v)| {
            let touches = |k: usize| i == k || j == k;
            if !touches(ten_thousandth) || touches(center) || touches(tenth) {
                f64::MAX
            } else {
                v
            }
        })
        .collect();
    let (i, j) = pairs[first_min(&near_ten_thousandth)];
    let thousandth = if i == ten_thousandth { j } else { i };

    let used = [center, ten_thousandth, tenth, thousandth];
    let hundredth = (0..MARKER_COUNT)
        .find(|k| !used.contains(k))
        .unwrap_or(MARKER_COUNT);

    let roles = RoleAssignment::new(center, tenth, hundredth, thousandth, ten_thousandth);
    match &roles {
        Ok(r) => tracing::debug!(
            "Marker roles: center={} tenth={} hundredth={} thousandth={} ten_thousandth={}",
            r.center,
            r.tenth,
            r.hundredth,
            r.thousandth,
            r.ten_thousandth
        ),
        Err(e) => tracing::warn!("Marker identification degenerate: {}", e),
    }
    roles
}
