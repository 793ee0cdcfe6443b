/*
 * Responsibility
 * - user_info テーブルからの principal 読み出し (read only)
 * - roles 列 ("ROLE_USER,ROLE_ADMIN") を Role の集合に変換する
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::{error::RepoError, store::PrincipalStore};
use crate::services::auth::principal::{Principal, parse_roles};

#[derive(Debug, FromRow)]
struct UserInfoRow {
    email: String,
    roles: String,
}

impl From<UserInfoRow> for Principal {
    fn from(row: UserInfoRow) -> Self {
        Principal {
            identity: row.email,
            roles: parse_roles(&row.roles),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgPrincipalStore {
    db: PgPool,
}

impl PgPrincipalStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PrincipalStore for PgPrincipalStore {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<Principal>, RepoError> {
        let row = sqlx::query_as::<_, UserInfoRow>(
            r#"
            SELECT email, roles
            FROM user_info
            WHERE email = $1
            "#,
        )
        .bind(identity)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Principal::from))
    }
}
