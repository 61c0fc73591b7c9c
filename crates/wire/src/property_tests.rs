// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for status record encoding bounds.

use kanpe_core::PresentationState;
use proptest::prelude::*;

use super::*;

fn any_state() -> impl Strategy<Value = PresentationState> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<u16>(), any::<u16>(), ".{0,400}").prop_map(
        |(has_presentation, is_showing, is_blackout, current_page, total_pages, note_text)| {
            PresentationState {
                has_presentation,
                is_showing,
                is_blackout,
                current_page,
                total_pages,
                note_text,
            }
        },
    )
}

proptest! {
    #[test]
    fn record_length_is_bounded(state in any_state()) {
        let bytes = encode(&state);
        prop_assert!(bytes.len() >= MIN_RECORD_LEN);
        prop_assert!(bytes.len() <= MAX_RECORD_LEN);
    }

    #[test]
    fn note_section_is_terminated_utf8(state in any_state()) {
        let bytes = encode(&state);
        let note = &bytes[HEADER_LEN..];
        prop_assert!(note.len() <= NOTE_MAX_BYTES + 1);
        prop_assert_eq!(note.last(), Some(&0u8));
        prop_assert!(!note[..note.len() - 1].contains(&0u8));
        prop_assert!(std::str::from_utf8(&note[..note.len() - 1]).is_ok());
    }

    #[test]
    fn note_is_a_prefix_of_the_original(note in "\\PC{300,600}") {
        let state = PresentationState {
            has_presentation: true,
            is_showing: true,
            note_text: note.clone(),
            ..PresentationState::none()
        };
        let record = StatusRecord::decode(&encode(&state)).unwrap();
        prop_assert!(note.starts_with(&record.note));
        prop_assert!(record.note.len() > NOTE_MAX_BYTES - 4);
    }

    #[test]
    fn without_presentation_everything_is_zero(mut state in any_state()) {
        state.has_presentation = false;
        prop_assert_eq!(encode(&state), vec![0u8; MIN_RECORD_LEN]);
    }

    #[test]
    fn without_show_page_and_note_are_empty(mut state in any_state()) {
        state.has_presentation = true;
        state.is_showing = false;
        let bytes = encode(&state);
        prop_assert_eq!(bytes.len(), MIN_RECORD_LEN);
        prop_assert_eq!(&bytes[3..5], &[0u8, 0u8]);
    }
}
