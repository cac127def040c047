//! Outcome categorization.
//!
//! Maps finished session chains onto `ProcessingStats` counters.

use super::stats::ProcessingStats;
use super::types::{InfoType, SessionError};
use crate::message::Response;

/// Records a failed chain under its error type.
pub fn update_error_stats(stats: &ProcessingStats, error: &SessionError) {
    let error_type = error.error_type();
    log::debug!("Recording failure as {error_type}");
    stats.increment_error(error_type);
}

/// Records a completed chain and the informational events it carried.
pub fn update_response_stats(stats: &ProcessingStats, response: &Response, started_as: &str) {
    stats.increment_completed();

    let hops = response.redirects();
    if hops > 0 {
        stats.increment_info(InfoType::HttpRedirect);
    }
    if hops > 1 {
        stats.increment_info(InfoType::MultipleRedirects);
    }
    if hops > 0 && started_as != "https" && response.url().protocol() == "https" {
        stats.increment_info(InfoType::HttpsRedirect);
    }
    if response.was_compressed() {
        stats.increment_info(InfoType::CompressedBody);
    }
}
