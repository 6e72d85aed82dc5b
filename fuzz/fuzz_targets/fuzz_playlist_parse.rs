#![no_main]

use gbsrip_m3u::{PlaylistDirectives, PlaylistParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut parser = PlaylistParser::new(data);
    let mut last_offset = 0;
    while let Some(line) = parser.parse_next() {
        assert!(parser.offset() > last_offset || parser.offset() == data.len());
        last_offset = parser.offset();

        let mut title = vec![0u8; line.title_len()];
        assert_eq!(line.copy_title(&mut title), title.len());
    }
    let _ = PlaylistDirectives::scan(data);
});
