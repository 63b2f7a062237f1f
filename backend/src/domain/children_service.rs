//! Child profile use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    BookRepository, ChildRepository, ChildrenCommand, ChildrenQuery, PermissionRepository,
};
use crate::domain::{
    AccessRequirement, Child, ChildAccess, ChildAccessPolicy, ChildBookCount, ChildDraft, ChildId,
    Error, Principal, ReadingPeriod, VisibleChild,
};

/// Service implementing the child driving ports.
pub struct ChildrenService<C, P, B> {
    children: Arc<C>,
    books: Arc<B>,
    access: ChildAccessPolicy<C, P>,
    clock: Arc<dyn Clock>,
}

impl<C, P, B> ChildrenService<C, P, B> {
    /// Create a new service with the given repositories.
    pub fn new(
        children: Arc<C>,
        permissions: Arc<P>,
        books: Arc<B>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            access: ChildAccessPolicy::new(Arc::clone(&children), permissions),
            children,
            books,
            clock,
        }
    }
}

/// Children visible to `requester`, ordered as stored (by name).
pub(crate) async fn visible_children<C>(
    children: &C,
    requester: &Principal,
) -> Result<Vec<VisibleChild>, Error>
where
    C: ChildRepository + ?Sized,
{
    let rows = children.list_visible(requester.id()).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(child, grant)| {
            let access = ChildAccess::resolve(child.owner_id(), requester.id(), grant);
            access.effective().map(|permission| VisibleChild {
                is_owner: access == ChildAccess::Owner,
                permission,
                child,
            })
        })
        .collect())
}

#[async_trait]
impl<C, P, B> ChildrenCommand for ChildrenService<C, P, B>
where
    C: ChildRepository,
    P: PermissionRepository,
    B: BookRepository,
{
    async fn create(&self, requester: &Principal, draft: ChildDraft) -> Result<Child, Error> {
        let child = Child::new(ChildId::random(), *requester.id(), draft, self.clock.utc());
        self.children.create(&child).await?;
        info!(child_id = %child.id(), owner_id = %requester.id(), "child created");
        Ok(child)
    }

    async fn update(
        &self,
        requester: &Principal,
        child: &ChildId,
        draft: ChildDraft,
    ) -> Result<Child, Error> {
        let visible = self
            .access
            .require(requester, child, AccessRequirement::Edit)
            .await?;
        let updated = visible.child.revised(draft, self.clock.utc());
        self.children.update(&updated).await?;
        Ok(updated)
    }

    async fn delete(&self, requester: &Principal, child: &ChildId) -> Result<(), Error> {
        self.access
            .require(requester, child, AccessRequirement::Owner)
            .await?;
        if !self.children.delete(child).await? {
            return Err(Error::not_found(crate::domain::access::CHILD_NOT_FOUND));
        }
        info!(child_id = %child, "child deleted");
        Ok(())
    }
}

#[async_trait]
impl<C, P, B> ChildrenQuery for ChildrenService<C, P, B>
where
    C: ChildRepository,
    P: PermissionRepository,
    B: BookRepository,
{
    async fn list(&self, requester: &Principal) -> Result<Vec<VisibleChild>, Error> {
        visible_children(self.children.as_ref(), requester).await
    }

    async fn get(&self, requester: &Principal, child: &ChildId) -> Result<VisibleChild, Error> {
        self.access
            .require(requester, child, AccessRequirement::View)
            .await
    }

    async fn list_with_counts(
        &self,
        requester: &Principal,
        period: Option<ReadingPeriod>,
    ) -> Result<Vec<ChildBookCount>, Error> {
        let visible = visible_children(self.children.as_ref(), requester).await?;
        let ids: Vec<ChildId> = visible.iter().map(|entry| *entry.child.id()).collect();
        let counts = if ids.is_empty() {
            Default::default()
        } else {
            self.books.count_for_children(&ids, period).await?
        };
        Ok(visible
            .into_iter()
            .map(|child| ChildBookCount {
                book_count: counts.get(child.child.id()).copied().unwrap_or(0),
                child,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::ports::{
        MockBookRepository, MockChildRepository, MockPermissionRepository,
    };
    use crate::domain::test_fixtures::{FixtureClock, child_owned_by, fixed_now, principal};
    use crate::domain::{ErrorCode, PermissionType};

    fn service(
        children: MockChildRepository,
        permissions: MockPermissionRepository,
        books: MockBookRepository,
    ) -> ChildrenService<MockChildRepository, MockPermissionRepository, MockBookRepository> {
        ChildrenService::new(
            Arc::new(children),
            Arc::new(permissions),
            Arc::new(books),
            Arc::new(FixtureClock(fixed_now())),
        )
    }

    #[tokio::test]
    async fn list_marks_ownership_and_effective_permission() {
        let me = principal(false);
        let other = principal(false);
        let mine = child_owned_by(me.id());
        let shared = child_owned_by(other.id());
        let mut children = MockChildRepository::new();
        children.expect_list_visible().return_once(move |_| {
            Ok(vec![(mine, None), (shared, Some(PermissionType::View))])
        });

        let listed = service(
            children,
            MockPermissionRepository::new(),
            MockBookRepository::new(),
        )
        .list(&me)
        .await
        .expect("list");
        assert_eq!(listed.len(), 2);
        assert!(listed[0].is_owner);
        assert_eq!(listed[0].permission, PermissionType::Edit);
        assert!(!listed[1].is_owner);
        assert_eq!(listed[1].permission, PermissionType::View);
    }

    #[tokio::test]
    async fn counts_default_to_zero() {
        let me = principal(false);
        let first = child_owned_by(me.id());
        let second = child_owned_by(me.id());
        let first_id = *first.id();
        let mut children = MockChildRepository::new();
        children
            .expect_list_visible()
            .return_once(move |_| Ok(vec![(first, None), (second, None)]));
        let mut books = MockBookRepository::new();
        books
            .expect_count_for_children()
            .withf(|ids, period| ids.len() == 2 && period.is_some())
            .return_once(move |_, _| Ok(HashMap::from([(first_id, 3)])));

        let period = ReadingPeriod::month(2025, 3).expect("period");
        let counts = service(children, MockPermissionRepository::new(), books)
            .list_with_counts(&me, Some(period))
            .await
            .expect("counts");
        assert_eq!(counts[0].book_count, 3);
        assert_eq!(counts[1].book_count, 0);
    }

    #[tokio::test]
    async fn editor_cannot_delete() {
        let owner = principal(false);
        let editor = principal(false);
        let child = child_owned_by(owner.id());
        let id = *child.id();
        let mut children = MockChildRepository::new();
        children
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(child)));
        children.expect_delete().never();
        let mut permissions = MockPermissionRepository::new();
        permissions
            .expect_find_grant()
            .return_once(|_, _| Ok(Some(PermissionType::Edit)));

        let error = service(children, permissions, MockBookRepository::new())
            .delete(&editor, &id)
            .await
            .expect_err("owner only");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn editor_can_rename() {
        let owner = principal(false);
        let editor = principal(false);
        let child = child_owned_by(owner.id());
        let id = *child.id();
        let mut children = MockChildRepository::new();
        children
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(child)));
        children
            .expect_update()
            .withf(|updated| updated.name() == "Mia Rose")
            .return_once(|_| Ok(()));
        let mut permissions = MockPermissionRepository::new();
        permissions
            .expect_find_grant()
            .return_once(|_, _| Ok(Some(PermissionType::Edit)));

        let draft = ChildDraft::try_from_parts("Mia Rose", "3rd").expect("draft");
        let updated = service(children, permissions, MockBookRepository::new())
            .update(&editor, &id, draft)
            .await
            .expect("renamed");
        assert_eq!(updated.owner_id(), owner.id());
        assert_eq!(updated.grade(), "3rd");
    }
}
