//! ISO-8601 duration parsing
//!
//! Video details report lengths as `PT#H#M#S` (with an optional `#D` day
//! component for very long streams). Missing components count as zero.

/// Parse an ISO-8601 duration into whole seconds
///
/// Returns `None` if the string is not of the form `P[nD][T[nH][nM][nS]]`.
///
/// ```rust
/// use tunedeck_core::parse_iso8601_duration;
///
/// assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723));
/// assert_eq!(parse_iso8601_duration("PT45S"), Some(45));
/// assert_eq!(parse_iso8601_duration("PT"), Some(0));
/// assert_eq!(parse_iso8601_duration("3:45"), None);
/// ```
pub fn parse_iso8601_duration(input: &str) -> Option<u64> {
    let rest = input.trim().strip_prefix('P')?;

    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut total = 0u64;

    // Date part: only days are meaningful for video lengths
    for (value, unit) in components(date_part)? {
        match unit {
            'D' => total = total.checked_add(value.checked_mul(86_400)?)?,
            _ => return None,
        }
    }

    if let Some(time_part) = time_part {
        // Units must appear in H, M, S order, each at most once
        let mut last_rank = 0;
        for (value, unit) in components(time_part)? {
            let (rank, scale) = match unit {
                'H' => (1, 3_600),
                'M' => (2, 60),
                'S' => (3, 1),
                _ => return None,
            };
            if rank <= last_rank {
                return None;
            }
            last_rank = rank;
            total = total.checked_add(value.checked_mul(scale)?)?;
        }
    }

    Some(total)
}

/// Split `1H2M3S` into `[(1, 'H'), (2, 'M'), (3, 'S')]`
fn components(part: &str) -> Option<Vec<(u64, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c.is_ascii_alphabetic() {
            if digits.is_empty() {
                return None;
            }
            out.push((digits.parse().ok()?, c));
            digits.clear();
        } else {
            return None;
        }
    }

    // Trailing number without a unit
    if !digits.is_empty() {
        return None;
    }

    Some(out)
}
