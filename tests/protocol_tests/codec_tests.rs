//! Codec Tests
//!
//! Tests for command encoding and reply framing.

use std::io::{Cursor, Read};

use beanwire::protocol::{
    encode_command, read_body, read_line, validate_tube_name, write_command, Command,
    MAX_LINE_LENGTH, MAX_TUBE_NAME_LEN,
};
use beanwire::BeanError;

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_put() {
    let cmd = Command::Put {
        priority: 1,
        delay: 0,
        ttr: 60,
        body: b"hello",
    };
    assert_eq!(encode_command(&cmd), b"put 1 0 60 5\r\nhello\r\n");
}

#[test]
fn test_encode_put_declares_exact_body_length() {
    let bodies: [&[u8]; 4] = [b"", b"x", b"line1\r\nline2", &[0u8; 300]];

    for body in bodies {
        let cmd = Command::Put {
            priority: 0,
            delay: 0,
            ttr: 1,
            body,
        };
        let encoded = encode_command(&cmd);
        let header_end = encoded.windows(2).position(|w| w == b"\r\n").unwrap();
        let header = std::str::from_utf8(&encoded[..header_end]).unwrap();
        let declared: usize = header.rsplit(' ').next().unwrap().parse().unwrap();

        assert_eq!(declared, body.len());
        assert_eq!(&encoded[header_end + 2..encoded.len() - 2], body);
        assert!(encoded.ends_with(b"\r\n"));
    }
}

#[test]
fn test_encode_put_binary_body() {
    let body: Vec<u8> = (0..=255).collect();
    let cmd = Command::Put {
        priority: 10,
        delay: 5,
        ttr: 120,
        body: &body,
    };
    let encoded = encode_command(&cmd);

    let prefix = b"put 10 5 120 256\r\n";
    assert_eq!(&encoded[..prefix.len()], prefix);
    assert_eq!(&encoded[prefix.len()..prefix.len() + 256], body.as_slice());
    assert_eq!(encoded.len(), prefix.len() + 256 + 2);
}

#[test]
fn test_encode_simple_verbs() {
    let cases: Vec<(Command, &str)> = vec![
        (Command::Reserve, "reserve\r\n"),
        (Command::ReserveWithTimeout { seconds: 0 }, "reserve-with-timeout 0\r\n"),
        (Command::ReserveWithTimeout { seconds: 30 }, "reserve-with-timeout 30\r\n"),
        (Command::Delete { id: 7 }, "delete 7\r\n"),
        (
            Command::Release {
                id: 7,
                priority: 100,
                delay: 3,
            },
            "release 7 100 3\r\n",
        ),
        (Command::Bury { id: 42, priority: 5 }, "bury 42 5\r\n"),
        (Command::Use { tube: "emails" }, "use emails\r\n"),
        (Command::Watch { tube: "emails" }, "watch emails\r\n"),
        (Command::Stats, "stats\r\n"),
    ];

    for (cmd, expected) in cases {
        assert_eq!(encode_command(&cmd), expected.as_bytes(), "encoding {:?}", cmd);
    }
}

#[test]
fn test_encode_extended_verbs() {
    let cases: Vec<(Command, &str)> = vec![
        (Command::Touch { id: 9 }, "touch 9\r\n"),
        (Command::Ignore { tube: "default" }, "ignore default\r\n"),
        (Command::Peek { id: 11 }, "peek 11\r\n"),
        (Command::PeekReady, "peek-ready\r\n"),
        (Command::PeekDelayed, "peek-delayed\r\n"),
        (Command::PeekBuried, "peek-buried\r\n"),
        (Command::Kick { bound: 10 }, "kick 10\r\n"),
        (Command::KickJob { id: 3 }, "kick-job 3\r\n"),
        (Command::StatsJob { id: 3 }, "stats-job 3\r\n"),
        (Command::StatsTube { tube: "t1" }, "stats-tube t1\r\n"),
        (Command::ListTubes, "list-tubes\r\n"),
        (Command::ListTubeUsed, "list-tube-used\r\n"),
        (Command::ListTubesWatched, "list-tubes-watched\r\n"),
        (
            Command::PauseTube {
                tube: "t1",
                delay: 60,
            },
            "pause-tube t1 60\r\n",
        ),
        (Command::Quit, "quit\r\n"),
    ];

    for (cmd, expected) in cases {
        assert_eq!(encode_command(&cmd), expected.as_bytes(), "encoding {:?}", cmd);
    }
}

#[test]
fn test_encode_large_ids() {
    let cmd = Command::Delete { id: u64::MAX };
    assert_eq!(encode_command(&cmd), format!("delete {}\r\n", u64::MAX).as_bytes());
}

// =============================================================================
// Tube Name Validation Tests
// =============================================================================

#[test]
fn test_validate_rejects_bad_tube_names() {
    let bad = ["", "-leading", "has space", "inject\r\nstats", "tab\there", "ümlaut"];

    for tube in bad {
        let result = Command::Watch { tube }.validate();
        assert!(
            matches!(result, Err(BeanError::InvalidTubeName(_))),
            "{tube:?} should be rejected"
        );
        assert!(validate_tube_name(tube).is_err());
    }
}

#[test]
fn test_validate_accepts_valid_tube_names() {
    let good = ["default", "a", "jobs.v2", "x-y_z", "a+b/c;d$e(f)", "9lives"];

    for tube in good {
        Command::Use { tube }.validate().unwrap();
    }
}

#[test]
fn test_tube_name_length_limit() {
    let longest = "a".repeat(MAX_TUBE_NAME_LEN);
    let too_long = "a".repeat(MAX_TUBE_NAME_LEN + 1);

    Command::Use { tube: &longest }.validate().unwrap();

    let result = Command::Use { tube: &too_long }.validate();
    assert!(matches!(result, Err(BeanError::InvalidTubeName(_))));
}

#[test]
fn test_write_command_writes_encoded_bytes() {
    let mut out = Vec::new();
    write_command(&mut out, &Command::Use { tube: "jobs.v2" }).unwrap();
    assert_eq!(out, b"use jobs.v2\r\n");
}

// =============================================================================
// Line Reader Tests
// =============================================================================

#[test]
fn test_read_line_keeps_terminator() {
    let mut cursor = Cursor::new(b"INSERTED 7\r\n".to_vec());
    assert_eq!(read_line(&mut cursor).unwrap(), "INSERTED 7\r\n");
}

#[test]
fn test_read_line_stops_at_terminator() {
    let mut cursor = Cursor::new(b"RESERVED 1 3\r\nabc\r\n".to_vec());

    assert_eq!(read_line(&mut cursor).unwrap(), "RESERVED 1 3\r\n");
    assert_eq!(cursor.position(), 14);

    let mut rest = Vec::new();
    cursor.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"abc\r\n");
}

#[test]
fn test_read_line_bare_newline_is_not_a_terminator() {
    let mut cursor = Cursor::new(b"OK 3\nstill\r\n".to_vec());
    assert_eq!(read_line(&mut cursor).unwrap(), "OK 3\nstill\r\n");
}

#[test]
fn test_read_line_eof_is_transport_error() {
    let mut cursor = Cursor::new(b"INSERTED 7".to_vec());
    match read_line(&mut cursor) {
        Err(BeanError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[test]
fn test_read_line_empty_stream() {
    let mut cursor = Cursor::new(Vec::new());
    assert!(matches!(read_line(&mut cursor), Err(BeanError::Io(_))));
}

#[test]
fn test_read_line_too_long() {
    let mut cursor = Cursor::new(vec![b'A'; MAX_LINE_LENGTH + 10]);
    assert!(matches!(
        read_line(&mut cursor),
        Err(BeanError::UnexpectedResponse(_))
    ));
}

#[test]
fn test_read_line_invalid_utf8() {
    let mut cursor = Cursor::new(b"OK \xff\xfe\r\n".to_vec());
    assert!(matches!(
        read_line(&mut cursor),
        Err(BeanError::UnexpectedResponse(_))
    ));
}

// =============================================================================
// Body Reader Tests
// =============================================================================

#[test]
fn test_read_body_consumes_len_plus_two() {
    let mut cursor = Cursor::new(b"hello\r\nNEXT\r\n".to_vec());

    let body = read_body(&mut cursor, 5).unwrap();
    assert_eq!(body, b"hello");
    assert_eq!(cursor.position(), 7);
    assert_eq!(read_line(&mut cursor).unwrap(), "NEXT\r\n");
}

#[test]
fn test_read_body_with_embedded_crlf() {
    let mut cursor = Cursor::new(b"a\r\nb\r\n\r\n".to_vec());
    let body = read_body(&mut cursor, 6).unwrap();
    assert_eq!(body, b"a\r\nb\r\n");
    assert_eq!(cursor.position(), 8);
}

#[test]
fn test_read_body_binary() {
    let mut data: Vec<u8> = (0..=255).collect();
    data.extend_from_slice(b"\r\n");
    let mut cursor = Cursor::new(data);

    let body = read_body(&mut cursor, 256).unwrap();
    assert_eq!(body, (0..=255).collect::<Vec<u8>>());
}

#[test]
fn test_read_body_empty() {
    let mut cursor = Cursor::new(b"\r\n".to_vec());
    assert!(read_body(&mut cursor, 0).unwrap().is_empty());
}

#[test]
fn test_read_body_missing_terminator() {
    let mut cursor = Cursor::new(b"helloXY".to_vec());
    assert!(matches!(
        read_body(&mut cursor, 5),
        Err(BeanError::UnexpectedResponse(_))
    ));
}

#[test]
fn test_read_body_short_stream() {
    let mut cursor = Cursor::new(b"hel".to_vec());
    assert!(matches!(read_body(&mut cursor, 5), Err(BeanError::Io(_))));
}
