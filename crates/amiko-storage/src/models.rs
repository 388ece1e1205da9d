// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the persistence layer.

use amiko_core::Persona;
use serde::{Deserialize, Serialize};

/// A stored AI friend belonging to one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Friend {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub personality: Vec<String>,
    pub backstory: String,
    pub created_at: String,
}

impl Friend {
    /// The persona view used by the reply pipeline.
    pub fn persona(&self) -> Persona {
        Persona {
            name: self.name.clone(),
            personality: self.personality.clone(),
            backstory: self.backstory.clone(),
        }
    }
}
