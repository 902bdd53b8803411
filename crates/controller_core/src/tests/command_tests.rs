use super::*;

#[test]
fn canonicalization_lowers_strips_and_collapses() {
    assert_eq!(canonicalize("  YES,  please!! "), "yes please");
    assert_eq!(canonicalize("Never   mind..."), "never mind");
    assert_eq!(canonicalize("?!?"), "");
}

#[test]
fn the_yes_family_maps_to_accept() {
    for word in ["yes", "Yeah!", "  OKAY  ", "sure", "aye"] {
        assert_eq!(parse(word), Some(Command::Accept), "word: {word}");
    }
}

#[test]
fn the_no_family_maps_to_decline() {
    for word in ["no", "Nope.", "CANCEL", "never mind"] {
        assert_eq!(parse(word), Some(Command::Decline), "word: {word}");
    }
}

#[test]
fn hidden_triggers_all_map_to_reveal() {
    for word in ["xyzzy", "XYZZY!", "plugh", "plover", "Abracadabra"] {
        assert_eq!(parse(word), Some(Command::Reveal), "word: {word}");
    }
}

#[test]
fn unmatched_text_is_not_a_command() {
    assert_eq!(parse("find rockets"), None);
    assert_eq!(parse("yes and no"), None);
    assert_eq!(parse(""), None);
    assert_eq!(parse("   "), None);
}
