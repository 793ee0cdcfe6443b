/*
 * Responsibility
 * - Domain types shared by handlers, services and repos
 * - No HTTP / sqlx dependency here
 */
pub mod lecture;
