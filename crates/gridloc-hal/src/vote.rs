//! Majority-vote filter for raw color samples.
//!
//! A single color-sensor read can land on a line edge and report the wrong
//! color.  Drivers take several raw samples and keep the most frequent one.
//!
//! Ties are broken by the lowest color code, so the filter is deterministic:
//!
//! ```rust
//! use gridloc_hal::vote::majority_vote;
//! use gridloc_types::Color;
//!
//! assert_eq!(majority_vote(&[Color::Red, Color::Red, Color::White]), Color::Red);
//! // One Blue and one White: Blue (code 1) beats White (code 5).
//! assert_eq!(majority_vote(&[Color::White, Color::Blue]), Color::Blue);
//! assert_eq!(majority_vote(&[]), Color::Unknown);
//! ```

use gridloc_types::Color;

const COLOR_CODES: usize = 7;

/// Return the most frequent color in `samples`.
///
/// Ties go to the lowest color code.  An empty slice yields
/// [`Color::Unknown`].
pub fn majority_vote(samples: &[Color]) -> Color {
    let mut counts = [0usize; COLOR_CODES];
    for sample in samples {
        counts[sample.code() as usize] += 1;
    }

    let mut best = Color::Unknown;
    let mut best_count = 0;
    // Ascending code order + strict comparison keeps the lowest code on ties.
    for (code, &count) in counts.iter().enumerate() {
        if count > best_count {
            best_count = count;
            best = Color::from_code(code as u8).unwrap_or(Color::Unknown);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_majority_wins() {
        let samples = [
            Color::Green,
            Color::Unknown,
            Color::Green,
            Color::Yellow,
            Color::Green,
        ];
        assert_eq!(majority_vote(&samples), Color::Green);
    }

    #[test]
    fn tie_resolves_to_lowest_code_regardless_of_order() {
        assert_eq!(majority_vote(&[Color::Red, Color::Black]), Color::Black);
        assert_eq!(majority_vote(&[Color::Black, Color::Red]), Color::Black);
        assert_eq!(
            majority_vote(&[Color::White, Color::Yellow, Color::White, Color::Yellow]),
            Color::Yellow
        );
    }

    #[test]
    fn unknown_only_wins_when_it_is_the_majority() {
        assert_eq!(
            majority_vote(&[Color::Unknown, Color::Unknown, Color::Blue]),
            Color::Unknown
        );
        assert_eq!(majority_vote(&[Color::Unknown, Color::Blue]), Color::Blue);
    }

    #[test]
    fn single_sample_passes_through() {
        for c in Color::PALETTE {
            assert_eq!(majority_vote(&[c]), c);
        }
    }

    #[test]
    fn empty_input_is_unknown() {
        assert_eq!(majority_vote(&[]), Color::Unknown);
    }
}
