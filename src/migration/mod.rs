use sea_orm_migration::prelude::*;

pub mod snapshot;
mod support;

mod m20230904_101500_create_users;
mod m20230911_143000_drop_user_phone;
mod m20231002_090000_create_datasets;
mod m20231020_120000_widen_user_type;
mod m20231106_160000_add_moderation;
mod m20231120_100000_tighten_dataset_constraints;
mod m20231201_080000_seed_admin;
mod m20240115_110000_create_showcases;
mod m20240205_130000_create_settings;
mod m20240312_150000_create_access_requests;
mod m20240408_093000_relax_access_request_department;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // L'ordre d'exécution est celui du préfixe horodaté
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20230904_101500_create_users::Migration),
            Box::new(m20230911_143000_drop_user_phone::Migration),
            Box::new(m20231002_090000_create_datasets::Migration),
            Box::new(m20231020_120000_widen_user_type::Migration),
            Box::new(m20231106_160000_add_moderation::Migration),
            Box::new(m20231120_100000_tighten_dataset_constraints::Migration),
            Box::new(m20231201_080000_seed_admin::Migration),
            Box::new(m20240115_110000_create_showcases::Migration),
            Box::new(m20240205_130000_create_settings::Migration),
            Box::new(m20240312_150000_create_access_requests::Migration),
            Box::new(m20240408_093000_relax_access_request_department::Migration),
        ]
    }
}
