use std::path::PathBuf;
use std::sync::Arc;

/// Download progress events, in the order a successful fetch emits them.
///
/// `Segment` events arrive in completion order, not index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Probed { total: u64, segments: usize },
    Segment { index: usize, bytes: u64 },
    Assembled { path: PathBuf },
}

pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;
