/// Persistent identifier for a monitor: CRC-32 (IEEE) of its name.
///
/// Indices change when monitors are plugged or reordered, names do not. Two
/// monitors reporting the same name produce the same checksum.
pub fn screen_name_checksum(name: &str) -> u32 {
    crc32fast::hash(name.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_zlib_crc32() {
        assert_eq!(screen_name_checksum("123456789"), 0xCBF4_3926);
        assert_eq!(screen_name_checksum(""), 0);
    }

    #[test]
    fn screen_checksum_is_stable_per_name() {
        assert_eq!(screen_name_checksum("DP-1"), 679_109_651);
        assert_eq!(screen_name_checksum("HDMI-1"), 2_558_245_713);
        assert_ne!(screen_name_checksum("DP-1"), screen_name_checksum("DP-2"));
    }
}
