//! Log output setup.

use tracing::Level;

/// Install a formatting subscriber writing to stderr at the given level.
/// Returns false if a global subscriber was already installed, in which case
/// nothing changes.
pub fn init(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Install a subscriber that writes through the test harness capture.
pub fn init_test() -> bool {
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init_test();
        assert!(!init(Level::INFO));
    }
}
