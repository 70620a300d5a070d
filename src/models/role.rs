// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role normalization between the canonical short forms and the legacy
//! long forms still used by older call sites.
//!
//! Role strings arrive from JWT claims and profile rows in a mix of
//! spellings ("pt" vs "trainer", "atleta" vs "athlete", plus the old
//! "owner" alias for admin). Everything authorization-adjacent branches
//! on the canonical enum, so unrecognized input maps to `None` rather
//! than failing the request.

use serde::{Deserialize, Serialize};

/// Canonical role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Pt,
    Atleta,
    Nutrizionista,
    Massaggiatore,
}

/// Legacy long-form role identifier (kept as an exact mirror of [`Role`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyRole {
    Admin,
    Trainer,
    Athlete,
    Nutrizionista,
    Massaggiatore,
}

impl Role {
    /// Canonical wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Pt => "pt",
            Role::Atleta => "atleta",
            Role::Nutrizionista => "nutrizionista",
            Role::Massaggiatore => "massaggiatore",
        }
    }

    /// Convert to the legacy long form.
    pub fn to_legacy(self) -> LegacyRole {
        match self {
            Role::Admin => LegacyRole::Admin,
            Role::Pt => LegacyRole::Trainer,
            Role::Atleta => LegacyRole::Athlete,
            Role::Nutrizionista => LegacyRole::Nutrizionista,
            Role::Massaggiatore => LegacyRole::Massaggiatore,
        }
    }

    /// Staff roles may operate on other athletes' data.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Pt)
    }
}

impl LegacyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyRole::Admin => "admin",
            LegacyRole::Trainer => "trainer",
            LegacyRole::Athlete => "athlete",
            LegacyRole::Nutrizionista => "nutrizionista",
            LegacyRole::Massaggiatore => "massaggiatore",
        }
    }

    /// Convert back to the canonical short form.
    pub fn to_canonical(self) -> Role {
        match self {
            LegacyRole::Admin => Role::Admin,
            LegacyRole::Trainer => Role::Pt,
            LegacyRole::Athlete => Role::Atleta,
            LegacyRole::Nutrizionista => Role::Nutrizionista,
            LegacyRole::Massaggiatore => Role::Massaggiatore,
        }
    }
}

/// Normalize a free-form role string to the canonical enum.
///
/// Matching is whitespace-trimmed and case-insensitive. Unknown input
/// (including empty strings) normalizes to `None` with a diagnostic log,
/// never an error, so callers can treat it as a deny-by-default case.
pub fn normalize_role(role: Option<&str>) -> Option<Role> {
    let raw = role?;
    let normalized = raw.trim().to_lowercase();

    match normalized.as_str() {
        "pt" | "trainer" => Some(Role::Pt),
        "atleta" | "athlete" => Some(Role::Atleta),
        "admin" | "owner" => Some(Role::Admin),
        "nutrizionista" => Some(Role::Nutrizionista),
        "massaggiatore" => Some(Role::Massaggiatore),
        _ => {
            tracing::debug!(original = %raw, "Unrecognized role");
            None
        }
    }
}

/// Normalize directly to the legacy form in a single step.
pub fn normalize_role_to_legacy(role: Option<&str>) -> Option<LegacyRole> {
    normalize_role(role).map(Role::to_legacy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 5] = [
        Role::Admin,
        Role::Pt,
        Role::Atleta,
        Role::Nutrizionista,
        Role::Massaggiatore,
    ];

    #[test]
    fn test_normalize_known_aliases() {
        assert_eq!(normalize_role(Some("pt")), Some(Role::Pt));
        assert_eq!(normalize_role(Some("trainer")), Some(Role::Pt));
        assert_eq!(normalize_role(Some("atleta")), Some(Role::Atleta));
        assert_eq!(normalize_role(Some("athlete")), Some(Role::Atleta));
        assert_eq!(normalize_role(Some("admin")), Some(Role::Admin));
        assert_eq!(normalize_role(Some("owner")), Some(Role::Admin));
        assert_eq!(
            normalize_role(Some("nutrizionista")),
            Some(Role::Nutrizionista)
        );
        assert_eq!(
            normalize_role(Some("massaggiatore")),
            Some(Role::Massaggiatore)
        );
    }

    #[test]
    fn test_normalize_trims_and_ignores_case() {
        assert_eq!(normalize_role(Some("  Trainer ")), Some(Role::Pt));
        assert_eq!(normalize_role(Some("ADMIN")), Some(Role::Admin));
    }

    #[test]
    fn test_unknown_role_is_none() {
        assert_eq!(normalize_role(Some("superuser")), None);
        assert_eq!(normalize_role(Some("")), None);
        assert_eq!(normalize_role(None), None);
    }

    #[test]
    fn test_legacy_round_trip() {
        for role in ALL_ROLES {
            assert_eq!(role.to_legacy().to_canonical(), role);
        }
    }

    #[test]
    fn test_canonical_round_trip() {
        for legacy in [
            LegacyRole::Admin,
            LegacyRole::Trainer,
            LegacyRole::Athlete,
            LegacyRole::Nutrizionista,
            LegacyRole::Massaggiatore,
        ] {
            assert_eq!(legacy.to_canonical().to_legacy(), legacy);
        }
    }

    #[test]
    fn test_normalize_to_legacy_one_step() {
        assert_eq!(
            normalize_role_to_legacy(Some("pt")),
            Some(LegacyRole::Trainer)
        );
        assert_eq!(
            normalize_role_to_legacy(Some("athlete")),
            Some(LegacyRole::Athlete)
        );
        assert_eq!(normalize_role_to_legacy(Some("superuser")), None);
    }
}
