#![no_main]

use gbsrip_engine::GbsHeader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = GbsHeader::parse(data) {
        let info = header.song_info();
        assert!(info.first_track < info.track_count);
    }
});
