// ABOUTME: Re-exports command modules for coach-plans
// ABOUTME: Read-only inspection commands and hierarchy mutations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod mutations;
pub mod plans;
