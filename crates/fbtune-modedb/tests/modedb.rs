use fbtune::{ModeRecord, Polarity};
use fbtune_modedb::{parse_mode_db, DbError};

const SAMPLE: &str = r#"
# Standard VGA, 60 Hz
mode "640x480-60"
    # H: 31.469 kHz, V: 59.94 Hz
    geometry 640 480 640 480 8
    timings 39721 48 16 33 10 96 2
endmode

mode "tv"
    geometry 768 576 768 576 4
    timings 35000 85 63 35 15 60 4
    hsync HIGH
    vsync 1
    csync true
    extsync true
    bcast true
    laced true
endmode
"#;

#[test]
fn parses_records_in_file_order() {
    let records = parse_mode_db(SAMPLE).expect("sample parses");
    assert_eq!(records.len(), 2);

    assert_eq!(
        records[0],
        ModeRecord {
            name: "640x480-60".to_string(),
            xres: 640,
            yres: 480,
            vxres: 640,
            vyres: 480,
            depth: 8,
            pixclock: 39721,
            left: 48,
            right: 16,
            upper: 33,
            lower: 10,
            hslen: 96,
            vslen: 2,
            ..ModeRecord::default()
        }
    );

    let tv = &records[1];
    assert_eq!(tv.name, "tv");
    assert_eq!(tv.depth, 4);
    // All three boolean spellings land as "set".
    assert_eq!(tv.hsync, Polarity::High);
    assert_eq!(tv.vsync, Polarity::High);
    assert_eq!(tv.csync, Polarity::High);
    assert!(tv.extsync);
    assert!(tv.bcast);
    assert!(tv.laced);
    assert!(!tv.dblscan);
}

#[test]
fn empty_input_parses_to_no_records() {
    assert!(parse_mode_db("").unwrap().is_empty());
    assert!(parse_mode_db("# only comments\n\n").unwrap().is_empty());
}

#[test]
fn settings_may_be_omitted_and_reordered() {
    let records = parse_mode_db(
        "mode \"sparse\"\n    laced true\n    geometry 320 200 320 200 8\nendmode\n",
    )
    .unwrap();
    assert_eq!(records[0].xres, 320);
    assert_eq!(records[0].pixclock, 0);
    assert!(records[0].laced);
}

#[test]
fn numbers_accept_hex() {
    let records = parse_mode_db(
        "mode \"hex\"\n    geometry 0x280 0x1E0 640 480 8\n    timings 39721 48 16 33 10 96 2\nendmode\n",
    )
    .unwrap();
    assert_eq!(records[0].xres, 640);
    assert_eq!(records[0].yres, 480);
}

#[test]
fn unknown_setting_reports_its_line() {
    let err = parse_mode_db("mode \"bad\"\n    geometry 1 2 3 4 5\n    sync high\nendmode\n")
        .unwrap_err();
    match err {
        DbError::Unexpected { line, found, .. } => {
            assert_eq!(line, 3);
            assert_eq!(found, "sync");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unquoted_mode_name_is_rejected() {
    let err = parse_mode_db("mode plain\nendmode\n").unwrap_err();
    assert!(matches!(err, DbError::Unexpected { line: 1, .. }));
}

#[test]
fn truncated_block_reports_eof() {
    let err = parse_mode_db("mode \"cut\"\n    geometry 640 480 640 480").unwrap_err();
    assert!(matches!(err, DbError::UnexpectedEof { .. }));
}

#[test]
fn bad_number_and_bad_boolean_are_rejected() {
    let err = parse_mode_db("mode \"n\"\n    geometry 640 wide 640 480 8\nendmode\n").unwrap_err();
    assert!(matches!(err, DbError::InvalidNumber { line: 2, token } if token == "wide"));

    let err = parse_mode_db("mode \"b\"\n    laced maybe\nendmode\n").unwrap_err();
    assert!(matches!(err, DbError::Value { line: 2, .. }));
}

#[test]
fn unterminated_name_is_rejected() {
    let err = parse_mode_db("mode \"oops\n").unwrap_err();
    assert!(matches!(err, DbError::Unexpected { line: 1, .. }));
}
