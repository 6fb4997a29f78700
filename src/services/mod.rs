// ABOUTME: Domain service layer between the client flows and external collaborators
// ABOUTME: Hosts the AI analysis gateway used by the meal and grocery flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services wrap an external collaborator behind typed operations so the
//! flows above them never see raw provider payloads.

/// AI analysis gateway: meal photos, meal refinement, grocery items
pub mod analysis;

pub use analysis::AnalysisGateway;
