// src/tests/decoder_tests.rs

//! tests for `decoder.rs`

#![allow(non_snake_case)]

use crate::common::{Count, FileOffset};
use crate::data::datetime::tv_pair_type;
use crate::data::layout::linux_x86::{UTMPX_SZ, UTMPX_SZ_FO};
use crate::data::layout::LAYOUT_DEFAULT;
use crate::data::loginrecord::ExitStatus;
use crate::data::recordtype::RecordType;
use crate::readers::decoder::{decode, DecodeError, RecordDecoder};
use crate::tests::common::{
    records_to_bytes,
    ymdhmsm,
    RawRecord,
    ADDR_V4,
    FO_0,
    FO_P9,
    TV_SEC_LOGIN,
    WTMP_ALICE,
    WTMP_SAMPLE,
    WTMP_SAMPLE_WINDOWS,
    WTMP_UTMPDUMP,
    WTMP_UTMPDUMP_WINDOWS,
};

use std::net::IpAddr;
use std::str::FromStr;

#[allow(unused_imports)]
use ::more_asserts::{assert_ge, assert_le, assert_lt};
use ::test_case::test_case;

fn ip(s: &str) -> IpAddr {
    IpAddr::from_str(s).unwrap()
}

#[test]
fn test_decode_empty_buffer() {
    let collection = decode(&[]).unwrap();
    assert!(collection.is_empty());
    assert_eq!(collection.len(), 0);
}

#[test_case(1)]
#[test_case(383)]
#[test_case(385)]
#[test_case(767)]
#[test_case(UTMPX_SZ * 3 + 1)]
fn test_decode_bad_length(len: usize) {
    let buffer = vec![0u8; len];
    match decode(&buffer) {
        Err(DecodeError::Format { len: len_, record_sz }) => {
            assert_eq!(len_, len);
            assert_eq!(record_sz, UTMPX_SZ);
        }
        Err(err) => panic!("unexpected error {}", err),
        Ok(collection) => panic!("expected Format error, got {} records", collection.len()),
    }
}

/// a partial trailing record fails the whole buffer, even though the whole
/// records before it are valid
#[test]
fn test_decode_bad_length_all_or_nothing() {
    let mut buffer = WTMP_ALICE.clone();
    buffer.push(0);
    assert!(matches!(decode(&buffer), Err(DecodeError::Format { .. })));
}

#[test]
fn test_DecodeError_Format_display() {
    let err = decode(&[0u8; 400]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "buffer length 400 is not a multiple of record size 384 (16 bytes remain)"
    );
}

#[test]
fn test_DecodeError_from_io_error() {
    let err = DecodeError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
    assert!(matches!(err, DecodeError::SourceRead(_)));
    assert_eq!(err.to_string(), "gone");
}

#[test]
fn test_decode_one_empty_record_dropped() {
    let collection = decode(&[0u8; UTMPX_SZ]).unwrap();
    assert!(collection.is_empty());
}

#[test]
fn test_decode_one_empty_record_retained() {
    let decoder = RecordDecoder::default().retain_empty(true);
    let collection = decoder.decode(&[0u8; UTMPX_SZ]).unwrap();
    assert_eq!(collection.len(), 1);
    let record = &collection[0];
    assert_eq!(record.record_type, RecordType::Empty);
    assert_eq!(record.user, "");
    assert_eq!(record.addr, ip("0.0.0.0"));
    assert_eq!(record.tv_pair, tv_pair_type(0, 0));
    assert_eq!(record.dt.timestamp(), 0);
}

/// login then logout of user alice
#[test]
fn test_decode_alice() {
    let collection = decode(&WTMP_ALICE).unwrap();
    assert_eq!(collection.len(), 2);

    let login = &collection[0];
    assert_eq!(login.record_type, RecordType::UserProcess);
    assert_eq!(login.pid, 1234);
    assert_eq!(login.line, "pts/0");
    assert_eq!(login.id, "ts/0");
    assert_eq!(login.user, "alice");
    assert_eq!(login.host, "192.168.1.5");
    assert_eq!(login.session, 1234);
    assert_eq!(login.addr, ip("192.168.1.5"));
    assert_eq!(login.dt, ymdhmsm(&FO_0, 2023, 11, 14, 22, 15, 0, 250_000));
    assert_eq!(login.fileoffset, 0);

    let logout = &collection[1];
    assert_eq!(logout.record_type, RecordType::DeadProcess);
    assert_eq!(logout.user, "");
    assert_eq!(logout.exit, ExitStatus { termination: 1, exit_code: 2 });
    assert_eq!(logout.addr, ip("2001:db8::1"));
    assert_eq!(logout.fileoffset, UTMPX_SZ_FO);
    assert_lt!(login.dt, logout.dt);
}

#[test]
fn test_decode_order_preserved() {
    let raws: Vec<RawRecord> = (0..6)
        .map(|i| RawRecord {
            ut_type: 7,
            pid: 100 + i,
            user: format!("user{}", i).into_bytes(),
            // timestamps are deliberately not sorted
            tv_sec: TV_SEC_LOGIN - i * 60,
            ..Default::default()
        })
        .collect();
    let collection = decode(&records_to_bytes(&raws)).unwrap();
    assert_eq!(collection.len(), raws.len());
    for (i, record) in collection.iter().enumerate() {
        assert_eq!(record.pid, 100 + i as i32);
        assert_eq!(record.user, format!("user{}", i));
        assert_eq!(record.fileoffset, (i * UTMPX_SZ) as FileOffset);
    }
}

/// every window becomes a record when `EMPTY` records are retained
#[test]
fn test_decode_count_equals_windows() {
    let raws: Vec<RawRecord> = (0..4)
        .map(|i| RawRecord {
            ut_type: (i % 3) as i16,
            ..Default::default()
        })
        .collect();
    let buffer = records_to_bytes(&raws);
    let decoder = RecordDecoder::default().retain_empty(true);
    let collection = decoder.decode(&buffer).unwrap();
    assert_eq!(collection.len(), buffer.len() / UTMPX_SZ);
}

#[test]
fn test_decode_empty_among_others_dropped() {
    let raws = [
        RawRecord::alice_login(),
        RawRecord::default(),
        RawRecord::alice_logout(),
    ];
    let collection = decode(&records_to_bytes(&raws)).unwrap();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection[0].record_type, RecordType::UserProcess);
    assert_eq!(collection[1].record_type, RecordType::DeadProcess);
    // the fileoffset of the logout is after the dropped record
    assert_eq!(collection[1].fileoffset, 2 * UTMPX_SZ_FO);
}

/// an all-zero window followed by a login of alice on `tty1` decodes to
/// the login alone
#[test]
fn test_decode_zero_window_then_alice_tty1() {
    let raw = RawRecord {
        ut_type: 7,
        line: b"tty1".to_vec(),
        user: b"alice".to_vec(),
        addr: ADDR_V4,
        ..Default::default()
    };
    let mut buffer: Vec<u8> = vec![0; UTMPX_SZ];
    buffer.extend(raw.to_bytes());
    assert_eq!(buffer.len(), 2 * UTMPX_SZ);

    let collection = decode(&buffer).unwrap();
    assert_eq!(collection.len(), 1);
    let record = &collection[0];
    assert_eq!(record.record_type, RecordType::UserProcess);
    assert_eq!(record.user, "alice");
    assert_eq!(record.line, "tty1");
    assert!(record.addr.is_ipv4(), "{}", record.addr);
    assert_eq!(record.addr, ip("192.168.1.5"));
    assert_eq!(record.fileoffset, UTMPX_SZ_FO);
}

#[test_case(42)]
#[test_case(10)]
#[test_case(-1)]
fn test_decode_unknown_type_kept(code: i16) {
    let raw = RawRecord {
        ut_type: code,
        user: b"mallory".to_vec(),
        ..Default::default()
    };
    let collection = decode(&raw.to_bytes()).unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0].record_type, RecordType::Unknown(code));
    assert_eq!(collection[0].user, "mallory");
}

#[test]
fn test_decode_usec_out_of_range() {
    let raw = RawRecord {
        ut_type: 7,
        tv_sec: TV_SEC_LOGIN,
        tv_usec: 2_000_000,
        ..Default::default()
    };
    let collection = decode(&raw.to_bytes()).unwrap();
    let record = &collection[0];
    assert_eq!(record.dt.timestamp(), TV_SEC_LOGIN as i64);
    assert_eq!(record.dt.timestamp_subsec_micros(), 0);
    // the stored pair is unchanged
    assert_eq!(record.tv_pair, tv_pair_type(TV_SEC_LOGIN as i64, 2_000_000));
}

#[test]
fn test_decode_negative_tv_sec() {
    let raw = RawRecord {
        ut_type: 2,
        tv_sec: -86_400,
        ..Default::default()
    };
    let collection = decode(&raw.to_bytes()).unwrap();
    assert_eq!(collection[0].dt, ymdhmsm(&FO_0, 1969, 12, 31, 0, 0, 0, 0));
}

#[test]
fn test_decode_host_without_terminator() {
    let raw = RawRecord {
        ut_type: 7,
        user: vec![b'u'; 32],
        host: vec![b'h'; 256],
        addr: ADDR_V4,
        ..Default::default()
    };
    let collection = decode(&raw.to_bytes()).unwrap();
    let record = &collection[0];
    assert_eq!(record.host.len(), 256);
    assert!(record.host.bytes().all(|b| b == b'h'));
    assert_eq!(record.user.len(), 32);
    // the host does not run into the following fields
    assert_eq!(record.addr, ip("192.168.1.5"));
}

#[test]
fn test_decode_tz_offset() {
    let decoder = RecordDecoder::new(LAYOUT_DEFAULT, *FO_P9);
    let collection = decoder.decode(&WTMP_ALICE).unwrap();
    let login = &collection[0];
    assert_eq!(login.dt.offset(), &*FO_P9);
    assert_eq!(login.dt, ymdhmsm(&FO_0, 2023, 11, 14, 22, 15, 0, 250_000));
    assert_eq!(decoder.tz_offset(), &*FO_P9);
}

#[test]
fn test_decode_is_repeatable() {
    let decoder = RecordDecoder::default();
    let a = decoder.decode(&WTMP_ALICE).unwrap();
    let b = decoder.decode(&WTMP_ALICE).unwrap();
    assert_eq!(a, b);
}

#[test_case(0, Ok(0))]
#[test_case(384, Ok(1))]
#[test_case(1920, Ok(5))]
#[test_case(100, Err(()))]
fn test_count_records(len: usize, expect: Result<usize, ()>) {
    let decoder = RecordDecoder::default();
    assert_eq!(decoder.count_records(len).map_err(|_| ()), expect);
}

#[test]
fn test_decode_record() {
    let decoder = RecordDecoder::default();
    let window = RawRecord::alice_logout().to_bytes();
    let record = decoder.decode_record(&window, 768);
    assert_eq!(record.record_type, RecordType::DeadProcess);
    assert_eq!(record.fileoffset, 768);
}

// sample file

#[test]
fn test_decode_sample() {
    assert_eq!(WTMP_SAMPLE.len(), WTMP_SAMPLE_WINDOWS * UTMPX_SZ);
    let collection = decode(WTMP_SAMPLE).unwrap();
    let types: Vec<RecordType> = collection.iter().map(|r| r.record_type).collect();
    assert_eq!(
        types,
        vec![
            RecordType::BootTime,
            RecordType::LoginProcess,
            RecordType::UserProcess,
            RecordType::DeadProcess,
        ]
    );

    let boot = &collection[0];
    assert_eq!(boot.user, "reboot");
    assert_eq!(boot.line, "~");
    assert_eq!(boot.id, "~~");
    assert_eq!(boot.host, "6.1.0-13-amd64");
    assert_eq!(boot.dt, ymdhmsm(&FO_0, 2023, 11, 14, 22, 13, 20, 123_456));
    assert!(boot.addr_is_unspecified());

    let login = &collection[1];
    assert_eq!(login.user, "LOGIN");
    assert_eq!(login.line, "tty1");
    assert_eq!(login.pid, 812);
    assert_eq!(login.session, 812);
    assert_eq!(login.dt, ymdhmsm(&FO_0, 2023, 11, 14, 22, 13, 25, 500_000));
    assert_eq!(login.fileoffset, 2 * UTMPX_SZ_FO);

    let user = &collection[2];
    assert_eq!(user.user, "alice");
    assert_eq!(user.host, "192.168.1.5");
    assert_eq!(user.addr, ip("192.168.1.5"));
    assert_eq!(user.dt, ymdhmsm(&FO_0, 2023, 11, 14, 22, 15, 0, 250_000));

    let dead = &collection[3];
    assert_eq!(dead.pid, 1234);
    assert_eq!(dead.exit, ExitStatus { termination: 1, exit_code: 2 });
    assert_eq!(dead.addr, ip("2001:db8::1"));
    assert_eq!(dead.dt, ymdhmsm(&FO_0, 2023, 11, 14, 23, 15, 0, 999_999));
    assert_eq!(dead.fileoffset, 4 * UTMPX_SZ_FO);
}

/// records written by util-linux `utmpdump` against the glibc `struct utmpx`
#[test]
fn test_decode_utmpdump() {
    assert_eq!(WTMP_UTMPDUMP.len(), WTMP_UTMPDUMP_WINDOWS * UTMPX_SZ);
    let collection = decode(WTMP_UTMPDUMP).unwrap();
    let types: Vec<RecordType> = collection.iter().map(|r| r.record_type).collect();
    assert_eq!(
        types,
        vec![
            RecordType::BootTime,
            RecordType::RunLevel,
            RecordType::LoginProcess,
            RecordType::UserProcess,
            RecordType::UserProcess,
            RecordType::DeadProcess,
        ]
    );

    let boot = &collection[0];
    assert_eq!(boot.pid, 0);
    assert_eq!(boot.line, "~");
    // `utmpdump` fills all four bytes of `ut_id`, there is no null
    assert_eq!(boot.id, "~~  ");
    assert_eq!(boot.user, "reboot");
    assert_eq!(boot.host, "6.1.0-18-amd64");
    assert_eq!(boot.dt, ymdhmsm(&FO_0, 2024, 2, 3, 8, 0, 1, 42));
    assert!(boot.addr_is_unspecified());

    let runlevel = &collection[1];
    // runlevel `5` stored as its character
    assert_eq!(runlevel.pid, b'5' as i32);
    assert_eq!(runlevel.user, "runlevel");
    assert_eq!(runlevel.dt, ymdhmsm(&FO_0, 2024, 2, 3, 8, 0, 9, 517_000));

    let login = &collection[2];
    assert_eq!(login.pid, 644);
    assert_eq!(login.line, "tty1");
    assert_eq!(login.id, "tty1");
    assert_eq!(login.user, "LOGIN");
    assert_eq!(login.host, "");
    assert_eq!(login.dt, ymdhmsm(&FO_0, 2024, 2, 3, 8, 0, 10, 1));

    let admin = &collection[3];
    assert_eq!(admin.pid, 2201);
    assert_eq!(admin.line, "pts/0");
    assert_eq!(admin.id, "ts/0");
    assert_eq!(admin.user, "admin");
    assert_eq!(admin.host, "10.0.0.7");
    assert_eq!(admin.session, 0);
    assert_eq!(admin.addr, ip("10.0.0.7"));
    assert_eq!(admin.dt, ymdhmsm(&FO_0, 2024, 2, 3, 9, 30, 0, 654_321));
    assert_eq!(admin.fileoffset, 3 * UTMPX_SZ_FO);

    let bob = &collection[4];
    assert_eq!(bob.pid, 2317);
    assert_eq!(bob.user, "bob");
    assert_eq!(bob.host, "fe80::1");
    assert_eq!(bob.addr, ip("2001:db8::9"));
    assert_eq!(bob.dt, ymdhmsm(&FO_0, 2024, 2, 3, 9, 45, 30, 100_000));

    let dead = &collection[5];
    assert_eq!(dead.pid, admin.pid);
    assert_eq!(dead.line, "pts/0");
    assert_eq!(dead.user, "");
    assert_eq!(dead.exit, ExitStatus { termination: 0, exit_code: 0 });
    assert_eq!(dead.dt, ymdhmsm(&FO_0, 2024, 2, 3, 10, 0, 0, 0));
    assert_eq!(dead.fileoffset, 5 * UTMPX_SZ_FO);
}

#[test]
fn test_decode_with_summary_utmpdump() {
    let (collection, summary) = RecordDecoder::default()
        .decode_with_summary(WTMP_UTMPDUMP)
        .unwrap();
    assert_eq!(collection.len(), WTMP_UTMPDUMP_WINDOWS);
    assert_eq!(summary.RecordDecoder_windows, WTMP_UTMPDUMP_WINDOWS as Count);
    assert_eq!(summary.RecordDecoder_empty_dropped, 0);
    assert_eq!(summary.RecordDecoder_unknown, 0);
    assert_eq!(summary.RecordDecoder_types.get(&RecordType::UserProcess), Some(&2));
    assert!(summary.is_consistent());
}

#[test]
fn test_decode_with_summary_sample() {
    let (collection, summary) = RecordDecoder::default()
        .decode_with_summary(WTMP_SAMPLE)
        .unwrap();
    assert_eq!(summary.RecordDecoder_layout, "linux-glibc-utmpx");
    assert_eq!(summary.RecordDecoder_record_sz, UTMPX_SZ);
    assert_eq!(summary.RecordDecoder_bytes, WTMP_SAMPLE.len() as u64);
    assert_eq!(summary.RecordDecoder_windows, WTMP_SAMPLE_WINDOWS as Count);
    assert_eq!(summary.RecordDecoder_empty_dropped, 1);
    assert_eq!(summary.RecordDecoder_unknown, 0);
    assert_eq!(summary.RecordDecoder_records, collection.len() as Count);
    assert_eq!(summary.RecordDecoder_types.get(&RecordType::UserProcess), Some(&1));
    assert_eq!(summary.RecordDecoder_types.get(&RecordType::Empty), None);
    assert!(summary.is_consistent());
    let text = summary.to_string();
    assert!(text.contains("empty dropped : 1"), "{}", text);
    assert!(text.contains("USER_PROCESS"), "{}", text);
}

#[test]
fn test_decode_with_summary_retain_empty() {
    let (collection, summary) = RecordDecoder::default()
        .retain_empty(true)
        .decode_with_summary(WTMP_SAMPLE)
        .unwrap();
    assert_eq!(collection.len(), WTMP_SAMPLE_WINDOWS);
    assert_eq!(summary.RecordDecoder_empty_dropped, 0);
    assert_eq!(summary.RecordDecoder_types.get(&RecordType::Empty), Some(&1));
    assert!(summary.is_consistent());
}

#[test]
fn test_decode_with_summary_unknown() {
    let raws = [
        RawRecord { ut_type: 42, ..Default::default() },
        RawRecord::alice_login(),
    ];
    let (_collection, summary) = RecordDecoder::default()
        .decode_with_summary(&records_to_bytes(&raws))
        .unwrap();
    assert_eq!(summary.RecordDecoder_unknown, 1);
    assert_eq!(summary.RecordDecoder_types.get(&RecordType::Unknown(42)), Some(&1));
}
