use crate::types::fix::{Fix, Tracks};

/// Splits a time-ordered fix sequence into one path per address.
///
/// Fixes keep their relative order inside each path, so a time-ascending
/// input produces time-ascending paths.
pub fn group_by_identifier(fixes: Vec<Fix>) -> Tracks {
    let mut tracks = Tracks::new();
    for fix in fixes {
        tracks.entry(fix.address.clone()).or_default().push(fix);
    }
    tracks
}
