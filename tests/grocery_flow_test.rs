// ABOUTME: Integration tests for the grocery mentor state machine
// ABOUTME: Covers a completed review, failure handling, replacement, and reset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use calorie_core::constants::messages;
use calorie_mentor::errors::ErrorCode;
use calorie_mentor::flows::{GroceryMentor, GroceryState};
use common::ScriptedReply;

#[tokio::test]
async fn test_review_completes_with_ingredients() {
    let (gateway, _provider) =
        common::scripted_gateway(vec![ScriptedReply::Content(common::grocery_json("Granola"))]);
    let mut mentor = GroceryMentor::new(gateway);
    assert!(mentor.review().is_none());

    let state = mentor.analyze(&common::test_image()).await.unwrap();
    assert!(matches!(state, GroceryState::Complete(review) if review.item_name == "Granola"));

    let review = mentor.review().unwrap();
    assert_eq!(review.ingredients.len(), 2);
    assert_eq!(review.healthy_alternatives[0], "Plain oats with fruit");
}

#[tokio::test]
async fn test_failure_moves_to_error_with_message() {
    let (gateway, _provider) = common::scripted_gateway(vec![ScriptedReply::Fail(
        ErrorCode::ExternalAuthFailed,
        "API key rejected".to_owned(),
    )]);
    let mut mentor = GroceryMentor::new(gateway);

    let error = mentor.analyze(&common::test_image()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    let GroceryState::Error { message, detail } = mentor.state() else {
        panic!("expected Error, got {:?}", mentor.state());
    };
    assert_eq!(*message, messages::GROCERY_ANALYSIS_FAILED);
    assert!(detail.contains("API key rejected"));
    assert!(mentor.review().is_none());
}

#[tokio::test]
async fn test_new_photo_replaces_previous_review() {
    let (gateway, provider) = common::scripted_gateway(vec![
        ScriptedReply::Content(common::grocery_json("Granola")),
        ScriptedReply::Content(common::grocery_json("Crackers")),
    ]);
    let mut mentor = GroceryMentor::new(gateway);

    mentor.analyze(&common::test_image()).await.unwrap();
    mentor.analyze(&common::test_image()).await.unwrap();
    assert_eq!(mentor.review().unwrap().item_name, "Crackers");
    assert_eq!(provider.remaining(), 0);
}

#[tokio::test]
async fn test_reset_returns_to_idle() {
    let (gateway, _provider) =
        common::scripted_gateway(vec![ScriptedReply::Content("{}".to_owned())]);
    let mut mentor = GroceryMentor::new(gateway);

    assert!(mentor.analyze(&common::test_image()).await.is_err());
    mentor.reset();
    assert_eq!(mentor.state(), &GroceryState::Idle);
}
