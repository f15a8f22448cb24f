//! Mock TLE data for testing purposes.

/// Three Starlink-shell satellites, epoch 2024-08-13 12:00 UTC, in 3LE form
pub const MOCK_STARLINK_TLE: &str = r#"
STARLINK-1007
1 44713U 19074A   24226.50000000  .00001234  00000-0  10270-3 0  9994
2 44713  53.0540 123.4567 0001400  85.1234 274.9876 15.06400000270002
STARLINK-1008
1 44714U 19074B   24226.50000000  .00001234  00000-0  10270-3 0  9995
2 44714  53.0540 123.4012 0001400  90.5000 269.6000 15.06400000270009
STARLINK-1130
1 44940U 20001BA  24226.50000000  .00001234  00000-0  10270-3 0  9998
2 44940  53.0540 210.2222 0001400  75.0101 285.1111 15.06400000270004
"#;

pub const ISS_TLE: &str = r#"
ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
"#;

/// A block that parses as TLE text but that SGP4 cannot initialise (truncated line 2)
pub const BROKEN_ELEMENTS_TLE: &str = r#"
STARLINK-BROKEN
1 99999U 24001A   24226.50000000  .00001234  00000-0  10270-3 0  9996
2 99999  53.0540
"#;

/// STARLINK-1007 again, one day after the epoch in `MOCK_STARLINK_TLE`
pub const STARLINK_1007_NEXT_DAY_TLE: &str = r#"
STARLINK-1007
1 44713U 19074A   24227.50000000  .00001234  00000-0  10270-3 0  9995
2 44713  53.0540 123.4567 0001400  85.1234 274.9876 15.06400000270002
"#;

/// Line 1 of STARLINK-1007 paired with line 2 of STARLINK-1008
pub const MISMATCHED_PAIR_TLE: &str = r#"
STARLINK-MIXED
1 44713U 19074A   24226.50000000  .00001234  00000-0  10270-3 0  9994
2 44714  53.0540 123.4012 0001400  90.5000 269.6000 15.06400000270009
"#;
