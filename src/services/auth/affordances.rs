//! Which follow-up actions a response advertises.
//!
//! Kept apart from `authorize` so a link is never shown for an action the
//! caller cannot perform: `update` needs both an allowed decision and an owner
//! match derived from the resource itself.

use std::collections::BTreeSet;

use crate::domain::lecture::{Lecture, LectureStatus};
use crate::services::auth::{authorization::AuthorizationDecision, context::AuthCtx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionName {
    Query,
    Create,
    Update,
}

impl ActionName {
    /// Link relation name on the wire.
    pub fn rel(&self) -> &'static str {
        match self {
            Self::Query => "query-lectures",
            Self::Create => "create-lecture",
            Self::Update => "update-lecture",
        }
    }
}

/// What the renderer knows about the resource and the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceState {
    /// `None` for collection responses.
    pub status: Option<LectureStatus>,
    pub owner_matches_caller: bool,
    pub caller_authenticated: bool,
}

impl ResourceState {
    pub fn of_lecture(lecture: &Lecture, ctx: &AuthCtx) -> Self {
        Self {
            status: Some(lecture.status),
            owner_matches_caller: ctx.identity().is_some_and(|id| lecture.is_owned_by(id)),
            caller_authenticated: ctx.is_authenticated(),
        }
    }

    pub fn of_collection(ctx: &AuthCtx) -> Self {
        Self {
            status: None,
            owner_matches_caller: false,
            caller_authenticated: ctx.is_authenticated(),
        }
    }
}

pub fn compute_affordances(
    decision: &AuthorizationDecision,
    state: &ResourceState,
) -> BTreeSet<ActionName> {
    let mut actions = BTreeSet::from([ActionName::Query]);

    if state.caller_authenticated {
        actions.insert(ActionName::Create);
    }
    if decision.allowed && state.owner_matches_caller {
        actions.insert(ActionName::Update);
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lecture::{NewLecture, fixtures};
    use crate::services::auth::{
        authorization::authorize,
        principal::{Principal, Role},
    };

    fn user(identity: &str) -> AuthCtx {
        AuthCtx::authenticated(Principal::new(identity, [Role::User]))
    }

    fn lecture(owner: Option<&str>) -> Lecture {
        Lecture::from_new(1, NewLecture::draft(fixtures::details("x"), owner.map(String::from)))
    }

    #[test]
    fn owner_gets_update_create_and_query() {
        let ctx = user("alice");
        let l = lecture(Some("alice"));
        let decision = authorize(&ctx, Some(Role::User), l.owner.as_deref());

        let actions = compute_affordances(&decision, &ResourceState::of_lecture(&l, &ctx));
        assert_eq!(
            actions,
            BTreeSet::from([ActionName::Query, ActionName::Create, ActionName::Update])
        );
    }

    #[test]
    fn non_owner_gets_no_update() {
        let ctx = user("bob");
        let l = lecture(Some("alice"));
        let decision = authorize(&ctx, Some(Role::User), None);

        let actions = compute_affordances(&decision, &ResourceState::of_lecture(&l, &ctx));
        assert!(!actions.contains(&ActionName::Update));
        assert!(actions.contains(&ActionName::Create));
    }

    #[test]
    fn stale_allowed_decision_does_not_leak_update() {
        // decision computed for alice's own lecture, rendered against bob's
        let ctx = user("alice");
        let decision = authorize(&ctx, Some(Role::User), Some("alice"));
        let bobs = lecture(Some("bob"));

        let actions = compute_affordances(&decision, &ResourceState::of_lecture(&bobs, &ctx));
        assert!(!actions.contains(&ActionName::Update));
    }

    #[test]
    fn ownerless_lecture_offers_no_update() {
        let ctx = user("alice");
        let l = lecture(None);
        let decision = authorize(&ctx, Some(Role::User), None);

        let actions = compute_affordances(&decision, &ResourceState::of_lecture(&l, &ctx));
        assert!(!actions.contains(&ActionName::Update));
    }

    #[test]
    fn denied_decision_offers_no_update_even_to_owner() {
        let ctx = user("alice");
        let l = lecture(Some("alice"));
        let decision = authorize(&ctx, Some(Role::Admin), None);

        let actions = compute_affordances(&decision, &ResourceState::of_lecture(&l, &ctx));
        assert!(!actions.contains(&ActionName::Update));
    }

    #[test]
    fn anonymous_caller_only_gets_query() {
        let ctx = AuthCtx::anonymous();
        let decision = authorize(&ctx, None, None);

        let actions = compute_affordances(&decision, &ResourceState::of_collection(&ctx));
        assert_eq!(actions, BTreeSet::from([ActionName::Query]));
    }
}
