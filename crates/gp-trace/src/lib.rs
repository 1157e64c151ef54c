//! Line-art tracing: walks thresholded dark pixels into polylines and
//! simplifies them into straight segments.
//!
//! This is the alternative mesh strategy for pre-rendered line art, where
//! photographic edge extraction would only recover the strokes that are
//! already there. A pixel is "on" when its luminance falls below the
//! configured threshold. Traces follow 8-connected neighbors, preferring
//! the step whose direction best continues the previous one, so smooth
//! strokes come out as single chains instead of zig-zags.
//!
//! The visited bitmap is an arena local to one [`trace_line_segments`]
//! call; tracing the same image twice yields identical output.

mod rdp;
mod trace;

pub use rdp::simplify_path;
pub use trace::{collect_points, trace_line_segments, TraceConfig};
