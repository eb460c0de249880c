// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque entité correspond à une table créée par les migrations (SeaORM).
//
// Liste des modules:
//   - users : Utilisateurs (type = users_type_enum, mot de passe hashé)
//   - datasets : Datasets (propriétaire obligatoire, nom unique, modération)
//   - dataset_links / dataset_locations / dataset_slider_images : enfants d'un dataset
//   - dataset_tags : Taxonomie (nom unique, modération)
//   - dataset_tags_datasets : Jointure many-to-many datasets <-> tags
//   - showcases : Showcases (titre unique, dataset optionnel)
//   - showcase_locations / showcase_slider_images : enfants d'un showcase
//   - settings : Réglages clé/valeur typés
//   - access_requests : Demandes d'accès aux datasets contrôlés
//   - moderation : ModerationStatus (remplace la paire approved_at/denied_at)
//   - lifecycle : Lifecycle (remplace deleted_at)
//   - dto : Corps de requêtes et réponses API
//   - health : Health check API
//
// Points d'attention:
//   - Les enfants partent en cascade avec leur parent (suppression physique)
//   - Les entités principales ont une suppression logique (deleted_at)
//
// ============================================================================

pub mod access_requests;
pub mod dataset_links;
pub mod dataset_locations;
pub mod dataset_slider_images;
pub mod dataset_tags;
pub mod dataset_tags_datasets;
pub mod datasets;
pub mod dto;
pub mod health;
pub mod lifecycle;
pub mod moderation;
pub mod settings;
pub mod showcase_locations;
pub mod showcase_slider_images;
pub mod showcases;
pub mod users;
