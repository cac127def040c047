//! Statistics printing.

use log::info;

use crate::error_handling::ProcessingStats;

/// Logs the one-line summary followed by per-type error and info counts.
pub fn print_statistics(stats: &ProcessingStats, elapsed_seconds: f64) {
    let completed = stats.completed();
    let failed = stats.total_errors();
    let total = completed + failed;
    info!(
        "Fetched {} URL{} ({} succeeded, {} failed) in {:.1}s",
        total,
        if total == 1 { "" } else { "s" },
        completed,
        failed,
        elapsed_seconds
    );

    if failed > 0 {
        info!("Error Counts ({failed} total):");
        for (error_type, count) in stats.error_breakdown() {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }

    let total_info = stats.total_info();
    if total_info > 0 {
        info!("Info Counts ({total_info} total):");
        for (info_type, count) in stats.info_breakdown() {
            info!("   {}: {}", info_type.as_str(), count);
        }
    }
}
