use crate::core::constant::TIME_FORMAT;
use chrono::Local;

/// Capture timestamp for chat lines and transcript records
pub fn timestamp() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

// ========================// tests //======================== //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_layout() {
        let ts = timestamp();
        // 2006-01-02 15:04:05
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }
}
