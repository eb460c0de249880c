// ============================================================================
// MODÉRATION
// ============================================================================
//
// En base: deux horodatages nullables (approved_at, denied_at).
//   (NULL, NULL) = en attente
//   (date, NULL) = approuvé
//   (NULL, date) = refusé
//   (date, date) = incohérent, refusé à la lecture
//
// Le reste du code ne manipule que ModerationStatus; la paire n'est qu'un
// détail de persistance.
//
// ============================================================================

use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved { at: DateTimeWithTimeZone },
    Denied { at: DateTimeWithTimeZone },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("record is both approved and denied")]
pub struct InvalidModerationState;

impl ModerationStatus {
    pub fn from_timestamps(
        approved_at: Option<DateTimeWithTimeZone>,
        denied_at: Option<DateTimeWithTimeZone>,
    ) -> Result<Self, InvalidModerationState> {
        match (approved_at, denied_at) {
            (None, None) => Ok(ModerationStatus::Pending),
            (Some(at), None) => Ok(ModerationStatus::Approved { at }),
            (None, Some(at)) => Ok(ModerationStatus::Denied { at }),
            (Some(_), Some(_)) => Err(InvalidModerationState),
        }
    }

    /// Paire (approved_at, denied_at) à écrire en base
    pub fn timestamps(&self) -> (Option<DateTimeWithTimeZone>, Option<DateTimeWithTimeZone>) {
        match *self {
            ModerationStatus::Pending => (None, None),
            ModerationStatus::Approved { at } => (Some(at), None),
            ModerationStatus::Denied { at } => (None, Some(at)),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ModerationStatus::Approved { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Deny,
    Reset,
}

impl ModerationAction {
    pub fn apply(self, now: DateTimeWithTimeZone) -> ModerationStatus {
        match self {
            ModerationAction::Approve => ModerationStatus::Approved { at: now },
            ModerationAction::Deny => ModerationStatus::Denied { at: now },
            ModerationAction::Reset => ModerationStatus::Pending,
        }
    }
}

impl FromStr for ModerationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(ModerationAction::Approve),
            "deny" => Ok(ModerationAction::Deny),
            "reset" => Ok(ModerationAction::Reset),
            other => Err(format!("Unknown moderation action '{}'", other)),
        }
    }
}

/// Filtre des listes de modération. `Conflicting` sert à retrouver les lignes
/// dont la paire est incohérente (écrites hors de l'API).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationFilter {
    Pending,
    Approved,
    Denied,
    Conflicting,
}

pub trait Moderated {
    fn approved_at(&self) -> Option<DateTimeWithTimeZone>;
    fn denied_at(&self) -> Option<DateTimeWithTimeZone>;

    fn moderation(&self) -> Result<ModerationStatus, InvalidModerationState> {
        ModerationStatus::from_timestamps(self.approved_at(), self.denied_at())
    }

    /// Approuvé avec une paire cohérente. Une paire invalide n'est jamais publiée.
    fn is_published(&self) -> bool {
        matches!(self.moderation(), Ok(status) if status.is_approved())
    }
}

/// Entité modérable: colonnes utilisées par les services génériques
pub trait ModeratedEntity: EntityTrait {
    const LABEL: &'static str;
    const ID: Self::Column;
    const APPROVED_AT: Self::Column;
    const DENIED_AT: Self::Column;
    const DELETED_AT: Self::Column;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> DateTimeWithTimeZone {
        Utc::now().fixed_offset()
    }

    #[test]
    fn test_decode_every_valid_pair() {
        let at = now();
        assert_eq!(ModerationStatus::from_timestamps(None, None), Ok(ModerationStatus::Pending));
        assert_eq!(
            ModerationStatus::from_timestamps(Some(at), None),
            Ok(ModerationStatus::Approved { at })
        );
        assert_eq!(
            ModerationStatus::from_timestamps(None, Some(at)),
            Ok(ModerationStatus::Denied { at })
        );
    }

    #[test]
    fn test_both_timestamps_is_rejected() {
        let at = now();
        assert_eq!(
            ModerationStatus::from_timestamps(Some(at), Some(at)),
            Err(InvalidModerationState)
        );
    }

    #[test]
    fn test_transitions_never_set_both_timestamps() {
        let at = now();
        for action in [ModerationAction::Approve, ModerationAction::Deny, ModerationAction::Reset] {
            let (approved, denied) = action.apply(at).timestamps();
            assert!(!(approved.is_some() && denied.is_some()), "{:?}", action);
        }
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("approve".parse(), Ok(ModerationAction::Approve));
        assert_eq!("reset".parse(), Ok(ModerationAction::Reset));
        assert!("publish".parse::<ModerationAction>().is_err());
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let json = serde_json::to_value(ModerationStatus::Pending).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "pending" }));
    }
}
