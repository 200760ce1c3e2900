/*!
 * Subsystem Limits and Constants
 *
 * Centralized location for capacities and thresholds used by the
 * subscription subsystem.
 */

/// Default per-definition broadcast stream capacity.
///
/// OS-style signals are infrequent control-plane events; 256 slots gives a
/// slow consumer plenty of headroom before it starts lagging. Lagged
/// consumers skip ahead rather than block the dispatcher.
pub const DEFAULT_STREAM_CAPACITY: usize = 256;

/// Minimum broadcast stream capacity (tokio's broadcast rejects 0).
pub const MIN_STREAM_CAPACITY: usize = 1;

/// Thread name of the dedicated dispatch worker, visible in debuggers and
/// thread dumps.
pub const DISPATCH_THREAD_NAME: &str = "signal-dispatch";
