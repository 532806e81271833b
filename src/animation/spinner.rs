/// Braille dot spinner frames shown while an operation is in flight
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Get the current spinner frame character based on the tick count
pub fn spinner_frame(tick_count: u64) -> char {
    let idx = (tick_count / 3) as usize % SPINNER_FRAMES.len();
    SPINNER_FRAMES[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_advances_every_three_ticks() {
        assert_eq!(spinner_frame(0), spinner_frame(2));
        assert_ne!(spinner_frame(2), spinner_frame(3));
        assert_eq!(spinner_frame(0), spinner_frame(3 * SPINNER_FRAMES.len() as u64));
    }
}
