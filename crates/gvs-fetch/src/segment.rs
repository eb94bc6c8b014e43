/// A contiguous byte range of a resource, fetched by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment index (0-based), also its position in the reassembled file.
    pub index:      usize,
    /// Starting byte offset
    pub start:      u64,
    /// Ending byte offset (exclusive)
    pub end:        u64,
    /// The last segment is requested without an upper bound.
    pub open_ended: bool,
}

impl Segment {
    pub fn len(&self) -> u64 { self.end - self.start }

    pub fn is_empty(&self) -> bool { self.end == self.start }

    /// Value for the `Range` request header.
    pub fn range_header(&self) -> String {
        if self.open_ended {
            format!("bytes={}-", self.start)
        } else {
            format!("bytes={}-{}", self.start, self.end - 1)
        }
    }
}

/// Partition `[0, length)` into `workers` contiguous segments.
///
/// Every segment is `length / workers` bytes except the last, which absorbs
/// the remainder and is open-ended. `workers` is clamped to `1..=length` so no
/// segment is empty; a zero `length` yields no segments.
pub fn partition(length: u64, workers: usize) -> Vec<Segment> {
    if length == 0 {
        return Vec::new();
    }

    let count = (workers as u64).clamp(1, length);
    let chunk = length / count;

    (0..count)
        .map(|i| {
            let last = i + 1 == count;
            Segment {
                index:      i as usize,
                start:      i * chunk,
                end:        if last { length } else { (i + 1) * chunk },
                open_ended: last,
            }
        })
        .collect()
}
