pub mod access_request_service;
pub mod dataset_service;
pub mod moderation_service;
pub mod setting_service;
pub mod showcase_service;
pub mod tag_service;
pub mod user_service;
