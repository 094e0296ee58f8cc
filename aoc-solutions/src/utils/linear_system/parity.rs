//! Minimal toggle presses over GF(2).
//!
//! Pressing a button twice undoes it, so each button is pressed zero or one
//! times and the search is over subsets of buttons.

use super::SystemError;

/// Largest button count the subset search accepts
pub const MAX_TOGGLE_BUTTONS: usize = 63;

/// Fewest presses that turn all-off lights into `lights`, `None` when no
/// subset of buttons reaches it.
///
/// Subsets are walked in Gray-code order so each step flips exactly one
/// button, and a running count of mismatched lights tells when the target is
/// reached.
///
/// ```
/// use aoc_solutions::utils::linear_system::parity::min_toggle_presses;
///
/// let lights = [false, true, true, false];
/// let buttons = vec![vec![3], vec![1, 3], vec![2], vec![2, 3], vec![0, 2], vec![0, 1]];
/// assert_eq!(min_toggle_presses(&lights, &buttons), Ok(Some(2)));
/// ```
pub fn min_toggle_presses(lights: &[bool], buttons: &[Vec<usize>]) -> Result<Option<u32>, SystemError> {
    if buttons.len() > MAX_TOGGLE_BUTTONS {
        return Err(SystemError::TooManyButtons(buttons.len()));
    }
    for (button, wired) in buttons.iter().enumerate() {
        if let Some(&counter) = wired.iter().find(|&&light| light >= lights.len()) {
            return Err(SystemError::CounterOutOfRange {
                button,
                counter,
                counters: lights.len(),
            });
        }
    }

    let mut state = vec![false; lights.len()];
    let mut mismatched = lights.iter().filter(|&&on| on).count();
    let mut best = (mismatched == 0).then_some(0);

    for step in 1..1u64 << buttons.len() {
        let button = step.trailing_zeros() as usize;
        for &light in &buttons[button] {
            state[light] = !state[light];
            if state[light] == lights[light] {
                mismatched -= 1;
            } else {
                mismatched += 1;
            }
        }

        if mismatched == 0 {
            let presses = (step ^ (step >> 1)).count_ones();
            if best.is_none_or(|b| presses < b) {
                best = Some(presses);
            }
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_machines() {
        let first = min_toggle_presses(
            &[false, true, true, false],
            &[vec![3], vec![1, 3], vec![2], vec![2, 3], vec![0, 2], vec![0, 1]],
        );
        let second = min_toggle_presses(
            &[false, false, false, true, false],
            &[vec![0, 2, 3, 4], vec![2, 3], vec![0, 4], vec![0, 1, 2], vec![1, 2, 3, 4]],
        );
        let third = min_toggle_presses(
            &[false, true, true, true, false, true],
            &[vec![0, 1, 2, 3, 4], vec![0, 3, 4], vec![0, 1, 2, 4, 5], vec![1, 2]],
        );
        assert_eq!(first, Ok(Some(2)));
        assert_eq!(second, Ok(Some(3)));
        assert_eq!(third, Ok(Some(2)));
    }

    #[test]
    fn test_all_off_needs_no_presses() {
        assert_eq!(min_toggle_presses(&[false, false], &[vec![0]]), Ok(Some(0)));
    }

    #[test]
    fn test_unreachable_pattern() {
        // Both buttons flip light 0 and 1 together
        assert_eq!(
            min_toggle_presses(&[true, false], &[vec![0, 1], vec![1, 0]]),
            Ok(None)
        );
    }

    #[test]
    fn test_repeated_light_in_button_cancels_out() {
        assert_eq!(min_toggle_presses(&[true], &[vec![0, 0]]), Ok(None));
        assert_eq!(min_toggle_presses(&[true], &[vec![0, 0], vec![0]]), Ok(Some(1)));
    }

    #[test]
    fn test_rejects_out_of_range_light() {
        assert_eq!(
            min_toggle_presses(&[true], &[vec![0], vec![1]]),
            Err(SystemError::CounterOutOfRange {
                button: 1,
                counter: 1,
                counters: 1
            })
        );
    }

    #[test]
    fn test_rejects_too_many_buttons() {
        let buttons = vec![vec![0]; MAX_TOGGLE_BUTTONS + 1];
        assert_eq!(
            min_toggle_presses(&[true], &buttons),
            Err(SystemError::TooManyButtons(MAX_TOGGLE_BUTTONS + 1))
        );
    }
}
