//! Raw MIDI bytes → note-on numbers.

/// Extract the note number of a note-on message.
///
/// MIDI message format:
/// - Note On:  [0x90 | channel, note, velocity]
///
/// A note-on with velocity 0 is a note-off and yields `None`, as does
/// anything on a channel other than `channel_filter`.
pub fn note_on_from_message(msg: &[u8], channel_filter: Option<u8>) -> Option<u8> {
    let (&status_byte, data) = msg.split_first()?;
    let status = status_byte & 0xF0;
    let channel = status_byte & 0x0F;

    if let Some(filter) = channel_filter {
        if channel != filter {
            return None;
        }
    }

    match (status, data) {
        (0x90, [note, velocity, ..]) if *velocity > 0 => Some(*note),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on() {
        assert_eq!(note_on_from_message(&[0x90, 60, 100], None), Some(60));
    }

    #[test]
    fn note_on_any_channel() {
        assert_eq!(note_on_from_message(&[0x9A, 64, 1], None), Some(64));
    }

    #[test]
    fn zero_velocity_is_note_off() {
        assert_eq!(note_on_from_message(&[0x90, 60, 0], None), None);
    }

    #[test]
    fn note_off_ignored() {
        assert_eq!(note_on_from_message(&[0x80, 60, 64], None), None);
    }

    #[test]
    fn cc_ignored() {
        assert_eq!(note_on_from_message(&[0xB0, 1, 127], None), None);
    }

    #[test]
    fn channel_filter() {
        assert_eq!(note_on_from_message(&[0x91, 60, 100], Some(0)), None);
        assert_eq!(note_on_from_message(&[0x91, 60, 100], Some(1)), Some(60));
    }

    #[test]
    fn truncated_messages() {
        assert_eq!(note_on_from_message(&[], None), None);
        assert_eq!(note_on_from_message(&[0x90, 60], None), None);
    }
}
