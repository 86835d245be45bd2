//! Shared constants for end-to-end tests
//!
//! When the seeded catalog changes, update only this file.

// ============================================================================
// Test Catalog
// ============================================================================

/// First happy song in the default catalog
pub const HAPPY_SONG_1: &str = "Walking on Sunshine";

/// Second happy song in the default catalog
pub const HAPPY_SONG_2: &str = "Good Vibrations";

/// The only sad song in the default catalog
pub const SAD_SONG: &str = "Everybody Hurts";

/// The only calm song in the default catalog
pub const CALM_SONG: &str = "Weightless";

/// Songs in the default catalog as (name, artist, album, release_date, mood)
pub const CATALOG_SONGS: &[(&str, &str, &str, &str, &str)] = &[
    (HAPPY_SONG_1, "Katrina and the Waves", "Walking on Sunshine", "1985", "happy"),
    (HAPPY_SONG_2, "The Beach Boys", "Smiley Smile", "1967", "happy"),
    (SAD_SONG, "R.E.M.", "Automatic for the People", "1992", "sad"),
    (CALM_SONG, "Marconi Union", "Weightless", "2011", "calm"),
];

// ============================================================================
// Frames
// ============================================================================

/// A 1x1 PNG frame as sent by the browser capture loop
pub const PNG_FRAME: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness checks (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// HTTP request timeout (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
