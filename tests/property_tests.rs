//! Property-based tests for the round-trip guarantees of the codec.
//!
//! Generated strings draw heavily from reserved characters so that escapes show up
//! in nearly every case.

use proptest::prelude::*;
use serde_dsn::escape::is_representable;
use serde_dsn::{decode, encode, encode_with_options, Dsn, DsnOptions, Separator};

fn dsn_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9._-]{0,12}",
        "[ =\\\\'\"\t\r\na-z]{0,12}",
        any::<String>().prop_filter("must be representable", |s| is_representable(s)),
    ]
}

fn dsn_map() -> impl Strategy<Value = Dsn> {
    prop::collection::vec((dsn_string(), dsn_string()), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect::<Dsn>())
}

proptest! {
    #[test]
    fn prop_decode_encode_roundtrip(map in dsn_map()) {
        let text = encode(&map);
        let back = decode(&text);
        prop_assert_eq!(back, Ok(map));
    }

    #[test]
    fn prop_roundtrip_with_options(map in dsn_map(), sort in any::<bool>(), tab in any::<bool>()) {
        let separator = if tab { Separator::Tab } else { Separator::Space };
        let options = DsnOptions::new().with_separator(separator).with_sort_keys(sort);
        let text = encode_with_options(&map, &options);
        prop_assert_eq!(decode(&text), Ok(map));
    }

    #[test]
    fn prop_repeated_roundtrips_are_stable(map in dsn_map()) {
        let once = decode(&encode(&map)).unwrap();
        let twice = decode(&encode(&once)).unwrap();
        prop_assert_eq!(&once, &map);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_encoding_is_single_line(map in dsn_map()) {
        let text = encode(&map);
        prop_assert!(!text.contains('\n'));
        prop_assert!(!text.contains('\r'));
    }

    #[test]
    fn prop_canonical_output_ignores_insertion_order(map in dsn_map()) {
        let reversed: Dsn = map.clone().into_iter().rev().collect();
        let options = DsnOptions::canonical();
        prop_assert_eq!(
            encode_with_options(&map, &options),
            encode_with_options(&reversed, &options)
        );
    }

    #[test]
    fn prop_decode_never_panics(input in any::<String>()) {
        let _ = decode(&input);
    }
}
