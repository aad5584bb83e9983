//! Left-to-right ordering of digit blobs into wheel positions.
//!
//! A rolling wheel caught between two values shows the bottom of one digit
//! above the top of the next. Those two blobs share a column range and are
//! vertically separated; they form one split group.

use crate::blob::Blob;

/// One wheel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderGroup {
    /// A whole digit.
    Single(usize),
    /// Two stacked partial digits of one wheel.
    Split { upper: usize, lower: usize },
}

impl OrderGroup {
    /// Blob indices, upper first.
    pub fn indices(&self) -> Vec<usize> {
        match *self {
            OrderGroup::Single(i) => vec![i],
            OrderGroup::Split { upper, lower } => vec![upper, lower],
        }
    }

    pub fn entries(&self) -> usize {
        match self {
            OrderGroup::Single(_) => 1,
            OrderGroup::Split { .. } => 2,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, OrderGroup::Split { .. })
    }
}

/// Total number of blob references across `groups`.
pub fn group_entry_count(groups: &[OrderGroup]) -> usize {
    groups.iter().map(OrderGroup::entries).sum()
}

/// Group digit blobs by wheel, most significant (leftmost) first.
pub fn order_digits(blobs: &[Blob]) -> Vec<OrderGroup> {
    let n = blobs.len();
    let mut sorted: Vec<usize> = (0..n).collect();
    sorted.sort_by_key(|&i| blobs[i].bbox.x);

    let overlap: Vec<Vec<bool>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| blobs[i].bbox.overlaps_horizontally(&blobs[j].bbox))
                .collect()
        })
        .collect();

    let mut groups = Vec::with_capacity(n);
    let mut k = 0;
    while k < n {
        let i = sorted[k];
        if let Some(&j) = sorted.get(k + 1) {
            let (a, b) = (&blobs[i].bbox, &blobs[j].bbox);
            if overlap[i][j] {
                if a.is_strictly_above(b) {
                    groups.push(OrderGroup::Split { upper: i, lower: j });
                    k += 2;
                    continue;
                }
                if b.is_strictly_above(a) {
                    groups.push(OrderGroup::Split { upper: j, lower: i });
                    k += 2;
                    continue;
                }
            }
        }
        groups.push(OrderGroup::Single(i));
        k += 1;
    }

    tracing::debug!(
        "Ordered {} digit blobs into {} groups ({} split)",
        n,
        groups.len(),
        groups.iter().filter(|g| g.is_split()).count()
    );
    groups
}
