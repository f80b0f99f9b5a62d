use std::sync::Arc;

use super::common::*;
use crate::advisor::intents::{classify, match_selection, FollowUpIntent};
use crate::catalog::{Scheme, SchemeLevel};

#[test]
fn classification_order_is_a_contract() {
    // "tell me" is checked before "eligibility", so the combined message
    // classifies as an explanation request.
    assert_eq!(
        classify("tell me about eligibility"),
        FollowUpIntent::Explanation
    );
    assert_eq!(classify("what is the eligibility"), FollowUpIntent::Eligibility);
}

#[test]
fn each_keyword_family_maps_to_its_intent() {
    assert_eq!(classify("give me an overview"), FollowUpIntent::Explanation);
    assert_eq!(classify("which documents do I need?"), FollowUpIntent::Documents);
    assert_eq!(classify("what are the benefits"), FollowUpIntent::Benefits);
    assert_eq!(classify("what is the last date"), FollowUpIntent::Deadline);
    assert_eq!(classify("is there an age limit"), FollowUpIntent::AgeRange);
    assert_eq!(classify("how do I apply"), FollowUpIntent::Apply);
    assert_eq!(classify("where is the portal"), FollowUpIntent::Apply);
    assert_eq!(classify("why is this suitable for me"), FollowUpIntent::Reasoning);
}

#[test]
fn unmatched_messages_fall_back_to_general() {
    assert_eq!(classify("thank you"), FollowUpIntent::General);
    assert!(FollowUpIntent::General.is_generative());
    assert!(!FollowUpIntent::Documents.is_generative());
}

fn shortlist() -> Vec<Arc<Scheme>> {
    vec![
        Arc::new(merit_scholarship()),
        Arc::new(bihar_student_credit()),
        Arc::new(senior_pension()),
    ]
}

#[test]
fn ordinal_selects_by_position() {
    let selected = match_selection(" 2 ", &shortlist()).expect("ordinal matches");
    assert_eq!(selected.scheme_name, "Bihar Student Credit Card");
}

#[test]
fn scheme_name_substring_selects_case_insensitively() {
    let selected = match_selection(
        "tell me about the bihar student credit card details",
        &shortlist(),
    )
    .expect("name substring matches");
    assert_eq!(selected.scheme_name, "Bihar Student Credit Card");
}

#[test]
fn unrelated_message_selects_nothing() {
    assert!(match_selection("something else entirely", &shortlist()).is_none());
    assert!(match_selection("42", &shortlist()).is_none());
}

#[test]
fn blank_scheme_name_never_matches_by_substring() {
    let shortlist = vec![
        Arc::new(base_scheme("  ", SchemeLevel::Central)),
        Arc::new(bihar_student_credit()),
    ];

    assert!(match_selection("anything at all", &shortlist).is_none());
    let by_name =
        match_selection("the bihar student credit card", &shortlist).expect("name matches");
    assert_eq!(by_name.scheme_name, "Bihar Student Credit Card");
    let by_ordinal = match_selection("1", &shortlist).expect("ordinal still matches");
    assert_eq!(by_ordinal.scheme_name, "  ");
}
