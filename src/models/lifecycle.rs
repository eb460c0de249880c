// Suppression logique: une ligne avec deleted_at renseigné n'existe plus pour
// les lectures publiques, mais reste en base (les enfants ne partent qu'avec
// une suppression physique).

use sea_orm::entity::prelude::DateTimeWithTimeZone;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Deleted { at: DateTimeWithTimeZone },
}

impl Lifecycle {
    pub fn from_deleted_at(deleted_at: Option<DateTimeWithTimeZone>) -> Self {
        match deleted_at {
            Some(at) => Lifecycle::Deleted { at },
            None => Lifecycle::Active,
        }
    }

    pub fn deleted_at(&self) -> Option<DateTimeWithTimeZone> {
        match *self {
            Lifecycle::Active => None,
            Lifecycle::Deleted { at } => Some(at),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }
}

pub trait SoftDeletable {
    fn deleted_at(&self) -> Option<DateTimeWithTimeZone>;

    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_deleted_at(self.deleted_at())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_lifecycle_round_trips_through_deleted_at() {
        let at = Utc::now().fixed_offset();
        assert_eq!(Lifecycle::from_deleted_at(None), Lifecycle::Active);
        assert_eq!(Lifecycle::from_deleted_at(Some(at)).deleted_at(), Some(at));
        assert!(!Lifecycle::Deleted { at }.is_active());
    }
}
