use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    NewComment, TicketPersistenceError, TicketRepository, TicketScope, UserRepository,
};
use crate::domain::{
    Comment, CommentKind, SearchTerm, Ticket, TicketId, TicketOverview, TicketStatus, UserId,
};

use super::MemoryUserRepository;

struct StoredComment {
    kind: CommentKind,
    comment: NewComment,
}

#[derive(Default)]
struct State {
    tickets: Vec<Ticket>,
    comments: Vec<StoredComment>,
}

/// Tickets and both comment streams. Usernames for listings are resolved
/// through the shared user repository.
pub struct MemoryTicketRepository {
    state: RwLock<State>,
    users: Arc<MemoryUserRepository>,
}

impl MemoryTicketRepository {
    pub fn new(users: Arc<MemoryUserRepository>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            users,
        }
    }

    fn poisoned() -> TicketPersistenceError {
        TicketPersistenceError::connection("ticket store lock poisoned")
    }

    async fn username_of(&self, id: &UserId) -> Result<String, TicketPersistenceError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(|err| TicketPersistenceError::query(err.to_string()))?
            .map(|user| user.username().as_str().to_owned())
            .ok_or_else(|| TicketPersistenceError::query("ticket owner missing"))
    }

    async fn overview(&self, ticket: Ticket) -> Result<TicketOverview, TicketPersistenceError> {
        let owner_username = self.username_of(&ticket.owner_id).await?;
        Ok(TicketOverview {
            ticket,
            owner_username,
        })
    }

    /// Newest first; later inserts win ties.
    fn newest_first(tickets: impl Iterator<Item = Ticket>) -> Vec<Ticket> {
        let mut ordered: Vec<Ticket> = tickets.collect();
        ordered.sort_by_key(|ticket| ticket.created_at);
        ordered.reverse();
        ordered
    }
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketPersistenceError> {
        self.state
            .write()
            .map_err(|_| Self::poisoned())?
            .tickets
            .push(ticket.clone());
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        search: &SearchTerm,
    ) -> Result<Vec<Ticket>, TicketPersistenceError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(Self::newest_first(
            state
                .tickets
                .iter()
                .filter(|ticket| ticket.owner_id == *owner && search.matches(&ticket.title))
                .cloned(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<TicketOverview>, TicketPersistenceError> {
        let tickets = {
            let state = self.state.read().map_err(|_| Self::poisoned())?;
            Self::newest_first(state.tickets.iter().cloned())
        };
        let mut overviews = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            overviews.push(self.overview(ticket).await?);
        }
        Ok(overviews)
    }

    async fn find_visible(
        &self,
        id: &TicketId,
        scope: &TicketScope,
    ) -> Result<Option<TicketOverview>, TicketPersistenceError> {
        let found = {
            let state = self.state.read().map_err(|_| Self::poisoned())?;
            state
                .tickets
                .iter()
                .find(|ticket| ticket.id == *id && scope.admits(&ticket.owner_id))
                .cloned()
        };
        match found {
            Some(ticket) => Ok(Some(self.overview(ticket).await?)),
            None => Ok(None),
        }
    }

    async fn update_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TicketPersistenceError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        match state.tickets.iter_mut().find(|ticket| ticket.id == *id) {
            Some(ticket) => {
                ticket.status = status;
                ticket.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_comment(
        &self,
        kind: CommentKind,
        comment: &NewComment,
    ) -> Result<(), TicketPersistenceError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        if !state.tickets.iter().any(|ticket| ticket.id == comment.ticket_id) {
            return Err(TicketPersistenceError::query("comment references missing ticket"));
        }
        state.comments.push(StoredComment {
            kind,
            comment: comment.clone(),
        });
        Ok(())
    }

    async fn list_comments(
        &self,
        ticket: &TicketId,
        kind: CommentKind,
    ) -> Result<Vec<Comment>, TicketPersistenceError> {
        let mut matching: Vec<NewComment> = {
            let state = self.state.read().map_err(|_| Self::poisoned())?;
            state
                .comments
                .iter()
                .filter(|stored| stored.kind == kind && stored.comment.ticket_id == *ticket)
                .map(|stored| stored.comment.clone())
                .collect()
        };
        matching.sort_by_key(|comment| comment.created_at);

        let mut comments = Vec::with_capacity(matching.len());
        for comment in matching {
            let author_username = self.username_of(&comment.author_id).await?;
            comments.push(Comment {
                id: comment.id,
                ticket_id: comment.ticket_id,
                author_id: comment.author_id,
                author_username,
                body: comment.body,
                created_at: comment.created_at,
            });
        }
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UserCredentials;
    use crate::domain::{Role, TicketDraft, User, Username};
    use crate::test_support::fixed_now;
    use rstest::{fixture, rstest};

    struct Harness {
        repo: MemoryTicketRepository,
        alice: UserId,
        bob: UserId,
    }

    async fn register(users: &MemoryUserRepository, name: &str) -> UserId {
        let user = User::new(
            UserId::random(),
            Username::new(name).expect("valid username"),
            Role::User,
        );
        let id = user.id();
        users
            .insert(&UserCredentials {
                user,
                password_hash: "hash".to_owned(),
            })
            .await
            .expect("insert user");
        id
    }

    #[fixture]
    async fn harness() -> Harness {
        let users = Arc::new(MemoryUserRepository::new());
        let alice = register(&users, "alice").await;
        let bob = register(&users, "bob").await;
        Harness {
            repo: MemoryTicketRepository::new(users),
            alice,
            bob,
        }
    }

    async fn open(repo: &MemoryTicketRepository, owner: UserId, title: &str, minute: i64) -> Ticket {
        let draft = TicketDraft::try_from_parts(title, "details", "IT Support").expect("draft");
        let at = fixed_now() + chrono::Duration::minutes(minute);
        let ticket = Ticket::open(TicketId::random(), owner, draft, at);
        repo.insert(&ticket).await.expect("insert ticket");
        ticket
    }

    #[rstest]
    #[tokio::test]
    async fn owner_listing_is_scoped_searched_and_newest_first(#[future] harness: Harness) {
        let h = harness.await;
        open(&h.repo, h.alice, "VPN broken", 0).await;
        open(&h.repo, h.alice, "Printer jam", 1).await;
        open(&h.repo, h.alice, "vpn slow", 2).await;
        open(&h.repo, h.bob, "VPN for bob", 3).await;

        let listed = h
            .repo
            .list_for_owner(&h.alice, &SearchTerm::new("vpn"))
            .await
            .expect("listing");

        let titles: Vec<_> = listed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["vpn slow", "VPN broken"]);
    }

    #[rstest]
    #[tokio::test]
    async fn owner_scope_hides_foreign_tickets(#[future] harness: Harness) {
        let h = harness.await;
        let ticket = open(&h.repo, h.alice, "Printer", 0).await;

        let hidden = h
            .repo
            .find_visible(&ticket.id, &TicketScope::OwnedBy(h.bob))
            .await
            .expect("lookup");
        let visible = h
            .repo
            .find_visible(&ticket.id, &TicketScope::Any)
            .await
            .expect("lookup")
            .expect("admin sees ticket");

        assert!(hidden.is_none());
        assert_eq!(visible.owner_username, "alice");
    }

    #[rstest]
    #[tokio::test]
    async fn comment_streams_are_separate_and_oldest_first(#[future] harness: Harness) {
        let h = harness.await;
        let ticket = open(&h.repo, h.alice, "Printer", 0).await;
        for (kind, body, minute) in [
            (CommentKind::User, "second", 2),
            (CommentKind::Admin, "internal", 1),
            (CommentKind::User, "first", 1),
        ] {
            h.repo
                .insert_comment(
                    kind,
                    &NewComment {
                        id: uuid::Uuid::new_v4(),
                        ticket_id: ticket.id,
                        author_id: h.alice,
                        body: body.to_owned(),
                        created_at: fixed_now() + chrono::Duration::minutes(minute),
                    },
                )
                .await
                .expect("comment");
        }

        let user_bodies: Vec<_> = h
            .repo
            .list_comments(&ticket.id, CommentKind::User)
            .await
            .expect("comments")
            .into_iter()
            .map(|c| c.body)
            .collect();
        let admin = h
            .repo
            .list_comments(&ticket.id, CommentKind::Admin)
            .await
            .expect("comments");

        assert_eq!(user_bodies, ["first", "second"]);
        assert_eq!(admin.len(), 1);
        assert_eq!(admin[0].author_username, "alice");
    }

    #[rstest]
    #[tokio::test]
    async fn status_update_reports_missing_tickets(#[future] harness: Harness) {
        let h = harness.await;
        let updated = h
            .repo
            .update_status(&TicketId::random(), TicketStatus::Resolved, fixed_now())
            .await
            .expect("update");
        assert!(!updated);
    }
}
