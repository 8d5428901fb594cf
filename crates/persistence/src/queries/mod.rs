// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `templates` — Recurring template lookup and the sweep list
//! - `occurrences` — Occurrence lookup, range and due queries
//! - `jobs` — Job lookup and per-pilot calendar queries
//! - `pilots` — Pilot profiles, candidates, availability, blackouts

pub mod jobs;
pub mod occurrences;
pub mod pilots;
pub mod templates;
