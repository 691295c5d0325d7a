use serde::{Deserialize, Serialize};

/// The hand-off of one body's run to a renderer or export step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Display name of the body. Not required to be unique.
    pub name: String,
    /// "planet" or "rocket".
    pub kind: String,
    /// Every `stride`-th recorded point, starting with the first.
    pub stride: usize,
    /// Rounded positions, in step order.
    pub points: Vec<(i64, i64)>,
}

impl TraceRecord {
    /// Builds a record keeping every `stride`-th point of `trace`.
    ///
    /// A stride of zero is treated as one.
    pub fn downsampled(name: &str, kind: &str, trace: &[(i64, i64)], stride: usize) -> Self {
        let stride = stride.max(1);
        TraceRecord {
            name: name.to_string(),
            kind: kind.to_string(),
            stride,
            points: trace.iter().step_by(stride).copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downsampling_keeps_first_point_and_every_nth() {
        let trace: Vec<(i64, i64)> = (0..10).map(|i| (i, -i)).collect();
        let record = TraceRecord::downsampled("Go!", "rocket", &trace, 4);
        assert_eq!(record.points, vec![(0, 0), (4, -4), (8, -8)]);
        assert_eq!(record.stride, 4);
    }

    #[test]
    fn zero_stride_keeps_everything() {
        let trace = vec![(1, 1), (2, 2)];
        let record = TraceRecord::downsampled("Sun", "planet", &trace, 0);
        assert_eq!(record.points, trace);
        assert_eq!(record.stride, 1);
    }
}
