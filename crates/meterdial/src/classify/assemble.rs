//! Turning per-wheel labels into the meter reading.

use crate::blob::Blob;
use crate::digits::OrderGroup;
use crate::ReadError;

/// Combine labels into an integer, most significant group first.
///
/// `labels` is aligned with the digit images, i.e. one label per group entry.
/// For a split group the label of the taller half is kept: the upper half if
/// strictly taller, otherwise the lower one.
pub fn digits_to_reading(
    labels: &[u8],
    groups: &[OrderGroup],
    blobs: &[Blob],
) -> Result<u64, ReadError> {
    if labels.len() != blobs.len() {
        return Err(ReadError::LabelCountMismatch {
            labels: labels.len(),
            blobs: blobs.len(),
        });
    }

    let overflow = || ReadError::ReadingOverflow {
        digits: groups.len(),
    };
    let mut reading: u64 = 0;
    let mut j = 0;
    for group in groups {
        if j + group.entries() > labels.len() {
            return Err(ReadError::LabelCountMismatch {
                labels: labels.len(),
                blobs: j + group.entries(),
            });
        }
        let image = match *group {
            OrderGroup::Single(_) => j,
            OrderGroup::Split { upper, lower } => {
                if blobs[upper].bbox.height > blobs[lower].bbox.height {
                    j
                } else {
                    j + 1
                }
            }
        };
        let digit = labels[image];
        if digit > 9 {
            return Err(ReadError::InvalidDigitLabel {
                image,
                label: digit,
            });
        }
        j += group.entries();
        reading = reading
            .checked_mul(10)
            .and_then(|r| r.checked_add(digit as u64))
            .ok_or_else(overflow)?;
    }
    Ok(reading)
}
