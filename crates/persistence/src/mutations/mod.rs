// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Multi-row writes run inside a single transaction. Uniqueness violations
//! that the engines treat as "already exists" surface as
//! `PersistenceError::UniqueViolation` and are translated by the caller.

pub mod jobs;
pub mod occurrences;
pub mod pilots;
pub mod templates;
