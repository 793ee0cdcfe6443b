/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: bearer token → AuthCtx (fail-open)
 * - cors / http / security_headers: transport 共通の layer
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
