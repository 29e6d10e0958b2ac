/// Decide whether `current` pending updates deserve a notification, given
/// the count a notification was last sent for.
#[must_use]
pub const fn should_notify(current: u32, stored: Option<u32>) -> bool {
    if current == 0 {
        return false;
    }
    match stored {
        None => true,
        Some(stored) => current != stored,
    }
}
