// Modération commune aux datasets, tags et showcases.
// Seuls les admins arrivent ici (extracteur AdminUser côté routes).

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::error::AppError;
use crate::models::moderation::{
    ModeratedEntity, Moderated, ModerationAction, ModerationFilter, ModerationStatus,
};

pub struct ModerationService;

impl ModerationService {
    /// Applique une transition et écrit la paire complète: le résultat n'a
    /// jamais les deux horodatages renseignés
    pub async fn transition<E>(
        db: &DatabaseConnection,
        id: i32,
        action: ModerationAction,
    ) -> Result<ModerationStatus, AppError>
    where
        E: ModeratedEntity,
        E::Model: Moderated,
    {
        let current = E::find()
            .filter(E::ID.eq(id))
            .filter(E::DELETED_AT.is_null())
            .one(db)
            .await?
            .ok_or(AppError::NotFound(E::LABEL))?;

        if let Err(e) = current.moderation() {
            log::warn!("{} {}: {}, overwritten by {:?}", E::LABEL, id, e, action);
        }

        let next = action.apply(Utc::now().fixed_offset());
        let (approved_at, denied_at) = next.timestamps();

        E::update_many()
            .col_expr(E::APPROVED_AT, Expr::value(approved_at))
            .col_expr(E::DENIED_AT, Expr::value(denied_at))
            .filter(E::ID.eq(id))
            .exec(db)
            .await?;

        log::info!("{} {} moderated: {:?}", E::LABEL, id, action);
        Ok(next)
    }

    /// Lignes actives dans l'état demandé, des plus anciennes aux plus récentes
    pub async fn list<E>(db: &DatabaseConnection, filter: ModerationFilter) -> Result<Vec<E::Model>, AppError>
    where
        E: ModeratedEntity,
    {
        let select = E::find().filter(E::DELETED_AT.is_null());

        let select = match filter {
            ModerationFilter::Pending => select
                .filter(E::APPROVED_AT.is_null())
                .filter(E::DENIED_AT.is_null()),
            ModerationFilter::Approved => select
                .filter(E::APPROVED_AT.is_not_null())
                .filter(E::DENIED_AT.is_null()),
            ModerationFilter::Denied => select
                .filter(E::APPROVED_AT.is_null())
                .filter(E::DENIED_AT.is_not_null()),
            ModerationFilter::Conflicting => select
                .filter(E::APPROVED_AT.is_not_null())
                .filter(E::DENIED_AT.is_not_null()),
        };

        Ok(select.order_by_asc(E::ID).all(db).await?)
    }
}
