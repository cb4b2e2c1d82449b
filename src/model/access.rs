use crate::{
    model::{
        ModelManager,
        error::{DatabaseError, DatabaseResult},
    },
    web::{AuthenticatedUser, UserRole},
};

#[async_trait::async_trait]
pub trait HasOwner {
    type OwnerId: PartialEq + Send + Sync;
    async fn get_owner_id(
        &self,
        mm: &ModelManager,
        ctx: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId>;
}

pub async fn check_access<T: HasOwner<OwnerId = O>, O: PartialEq + Send + Sync>(
    mm: &ModelManager,
    ctx: &AuthenticatedUser,
    resource: &T,
    expected: O,
) -> DatabaseResult<()> {
    let actual_owner = resource.get_owner_id(mm, ctx).await?;

    // admin can get all resources
    if ctx.user_role() == UserRole::Admin {
        return Ok(());
    }

    if actual_owner == expected {
        Ok(())
    } else {
        Err(DatabaseError::Forbidden)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::DbConnection;

    struct OwnedThing(uuid::Uuid);

    #[async_trait::async_trait]
    impl HasOwner for OwnedThing {
        type OwnerId = uuid::Uuid;

        async fn get_owner_id(
            &self,
            _mm: &ModelManager,
            _ctx: &AuthenticatedUser,
        ) -> DatabaseResult<Self::OwnerId> {
            Ok(self.0)
        }
    }

    fn lazy_mm() -> ModelManager {
        // lazy pool never actually connects
        let db = DbConnection::connect("postgres://localhost/unused").unwrap();
        ModelManager::new(db)
    }

    #[tokio::test]
    async fn owner_passes_everyone_else_is_forbidden() {
        let mm = lazy_mm();
        let owner_id = uuid::Uuid::new_v4();
        let resource = OwnedThing(owner_id);

        let owner = AuthenticatedUser::new(owner_id, UserRole::User);
        assert!(check_access(&mm, &owner, &resource, owner.user_id()).await.is_ok());

        let stranger = AuthenticatedUser::new(uuid::Uuid::new_v4(), UserRole::User);
        let denied = check_access(&mm, &stranger, &resource, stranger.user_id()).await;
        assert!(matches!(denied, Err(DatabaseError::Forbidden)));
    }

    #[tokio::test]
    async fn admin_overrides_ownership() {
        let mm = lazy_mm();
        let resource = OwnedThing(uuid::Uuid::new_v4());

        let admin = AuthenticatedUser::admin();
        assert!(check_access(&mm, &admin, &resource, admin.user_id()).await.is_ok());
    }
}
