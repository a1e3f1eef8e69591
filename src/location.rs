//! Well-known-text point parsing for the `Vehicle Location` column.

const POINT_PREFIX: &str = "POINT (";

/// Extracts `(latitude, longitude)` from a `POINT (<lon> <lat>)` string.
///
/// The WKT order is longitude first, so the pair comes back reversed.
/// Absent input, a pattern mismatch, or a token that is not a float all
/// yield `None`.
pub fn extract(location: Option<&str>) -> Option<(f64, f64)> {
    let location = location?;

    location
        .match_indices(POINT_PREFIX)
        .find_map(|(start, _)| tokens(&location[start + POINT_PREFIX.len()..]))
        .and_then(|(lon, lat)| {
            let longitude = coordinate(lon)?;
            let latitude = coordinate(lat)?;
            Some((latitude, longitude))
        })
}

/// Finite float only; `NaN` and `inf` parse but are not positions.
fn coordinate(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Splits `<lon> <lat>)` into its two tokens. Neither token may contain a space.
fn tokens(rest: &str) -> Option<(&str, &str)> {
    let (lon, tail) = rest.split_once(' ')?;
    if lon.is_empty() {
        return None;
    }

    let run = tail.split(' ').next().unwrap_or("");
    let close = run.rfind(')')?;
    if close == 0 {
        return None;
    }

    Some((lon, &run[..close]))
}
