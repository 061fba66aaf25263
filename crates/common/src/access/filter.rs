//! # Entry read filter
//!
//! Turns "who is asking, in which mode, for which kind" into an
//! [`EntryFilter`]: a disjunction of [`Scope`]s, optionally narrowed to one
//! [`EntryKind`]. The same value is evaluated in memory with
//! [`EntryFilter::matches`] and rendered to SQL by the store, so both paths
//! agree on what is visible.
//!
//! | mode      | scopes                                              |
//! |-----------|-----------------------------------------------------|
//! | `me`      | author = requester                                  |
//! | `partner` | author = partner, visibility = `for_partner`        |
//! | `couple`  | author ∈ couple, visibility = `couple`              |
//! | other     | union of the three above                            |
//!
//! No scope ever admits an entry by someone other than the requester without
//! also pinning the visibility to `for_partner` or `couple`, so a partner's
//! `only_me` entries are unreachable from every mode.

use crate::model::{Entry, EntryKind, UserId, Visibility};

use super::{AccessError, Mode};

/// One conjunctive clause: the entry's author is one of `authors` and, when
/// set, its visibility equals `visibility`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    authors: Vec<UserId>,
    visibility: Option<Visibility>,
}

impl Scope {
    /// Everything `requester` wrote.
    fn own(requester: UserId) -> Self {
        Self {
            authors: vec![requester],
            visibility: None,
        }
    }

    /// What `partner` wrote for their partner.
    fn addressed_by(partner: UserId) -> Self {
        Self {
            authors: vec![partner],
            visibility: Some(Visibility::ForPartner),
        }
    }

    /// Shared entries written by any of `members`.
    fn shared(members: Vec<UserId>) -> Self {
        Self {
            authors: members,
            visibility: Some(Visibility::Couple),
        }
    }

    pub fn authors(&self) -> &[UserId] {
        &self.authors
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.visibility
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        self.authors.contains(&entry.author_id)
            && self.visibility.map_or(true, |v| v == entry.visibility)
    }
}

/// Predicate selecting the entries a read request may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFilter {
    scopes: Vec<Scope>,
    kind: Option<EntryKind>,
}

impl EntryFilter {
    /// Build the filter for `requester` reading in `mode`.
    ///
    /// `partner` is the other member of the requester's couple, if any.
    /// `Mode::Partner` needs one; the other modes degrade to the requester's
    /// own entries when there is none.
    pub fn for_request(
        requester: UserId,
        partner: Option<UserId>,
        mode: Mode,
        kind: Option<EntryKind>,
    ) -> Result<Self, AccessError> {
        let members = std::iter::once(requester).chain(partner).collect::<Vec<_>>();

        let scopes = match mode {
            Mode::Me => vec![Scope::own(requester)],
            Mode::Partner => {
                let partner = partner.ok_or(AccessError::NoPartner)?;
                vec![Scope::addressed_by(partner)]
            }
            Mode::Couple => vec![Scope::shared(members)],
            Mode::All => {
                let mut scopes = vec![Scope::own(requester)];
                scopes.extend(partner.map(Scope::addressed_by));
                scopes.push(Scope::shared(members));
                scopes
            }
        };

        Ok(Self { scopes, kind })
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn kind(&self) -> Option<EntryKind> {
        self.kind
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        self.kind.map_or(true, |k| k == entry.kind)
            && self.scopes.iter().any(|scope| scope.matches(entry))
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    const MODES: [Mode; 4] = [Mode::Me, Mode::Partner, Mode::Couple, Mode::All];

    fn entry(author: UserId, kind: EntryKind, visibility: Visibility) -> Entry {
        let now = OffsetDateTime::now_utc();
        Entry {
            id: Uuid::new_v4(),
            kind,
            author_id: author,
            visibility,
            title: None,
            body: None,
            tags: vec![],
            photos: vec![],
            entry_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Every kind x visibility combination, written by each of the two users.
    fn corpus(a: UserId, b: UserId) -> Vec<Entry> {
        let mut entries = Vec::new();
        for author in [a, b] {
            for kind in EntryKind::ALL {
                for visibility in Visibility::ALL {
                    entries.push(entry(author, kind, visibility));
                }
            }
        }
        entries
    }

    fn visible(filter: &EntryFilter, corpus: &[Entry]) -> Vec<Entry> {
        corpus.iter().filter(|e| filter.matches(e)).cloned().collect()
    }

    #[test]
    fn test_partner_private_entries_never_visible() {
        let a = UserId::generate();
        let b = UserId::generate();
        let corpus = corpus(a, b);

        for mode in MODES {
            for kind in EntryKind::ALL.map(Some).into_iter().chain([None]) {
                let filter = EntryFilter::for_request(b, Some(a), mode, kind).unwrap();
                let leaked = visible(&filter, &corpus)
                    .into_iter()
                    .filter(|e| e.author_id == a && e.visibility == Visibility::OnlyMe)
                    .count();
                assert_eq!(leaked, 0, "mode {mode} kind {kind:?} leaked private entries");
            }
        }
    }

    #[test]
    fn test_foreign_authors_always_pin_visibility() {
        let a = UserId::generate();
        let b = UserId::generate();

        for mode in MODES {
            let filter = EntryFilter::for_request(a, Some(b), mode, None).unwrap();
            for scope in filter.scopes() {
                if scope.authors().iter().any(|author| *author != a) {
                    assert!(matches!(
                        scope.visibility(),
                        Some(Visibility::ForPartner) | Some(Visibility::Couple)
                    ));
                }
            }
        }
    }

    #[test]
    fn test_me_mode_is_exactly_own_entries() {
        let a = UserId::generate();
        let b = UserId::generate();
        let corpus = corpus(a, b);

        let filter = EntryFilter::for_request(a, Some(b), Mode::Me, None).unwrap();
        let seen = visible(&filter, &corpus);

        assert_eq!(seen.len(), EntryKind::ALL.len() * Visibility::ALL.len());
        assert!(seen.iter().all(|e| e.author_id == a));
    }

    #[test]
    fn test_partner_mode_shows_only_what_partner_addressed() {
        let a = UserId::generate();
        let b = UserId::generate();
        let corpus = corpus(a, b);

        let filter = EntryFilter::for_request(b, Some(a), Mode::Partner, None).unwrap();
        let seen = visible(&filter, &corpus);
        assert_eq!(seen.len(), EntryKind::ALL.len());
        assert!(seen
            .iter()
            .all(|e| e.author_id == a && e.visibility == Visibility::ForPartner));

        // The author does not see their own for_partner entries in partner mode.
        let filter = EntryFilter::for_request(a, Some(b), Mode::Partner, None).unwrap();
        assert!(visible(&filter, &corpus).iter().all(|e| e.author_id == b));
    }

    #[test]
    fn test_couple_mode_merges_both_members() {
        let a = UserId::generate();
        let b = UserId::generate();
        let corpus = corpus(a, b);

        for (requester, partner) in [(a, b), (b, a)] {
            let filter =
                EntryFilter::for_request(requester, Some(partner), Mode::Couple, None).unwrap();
            let seen = visible(&filter, &corpus);
            assert_eq!(seen.len(), 2 * EntryKind::ALL.len());
            assert!(seen.iter().all(|e| e.visibility == Visibility::Couple));
            assert!(seen.iter().any(|e| e.author_id == a));
            assert!(seen.iter().any(|e| e.author_id == b));
        }
    }

    #[test]
    fn test_couple_mode_excludes_other_couples() {
        let a = UserId::generate();
        let b = UserId::generate();
        let stranger = UserId::generate();
        let shared = entry(stranger, EntryKind::Moment, Visibility::Couple);

        let filter = EntryFilter::for_request(a, Some(b), Mode::Couple, None).unwrap();
        assert!(!filter.matches(&shared));
    }

    #[test]
    fn test_all_mode_is_union_of_scoped_modes() {
        let a = UserId::generate();
        let b = UserId::generate();
        let corpus = corpus(a, b);

        let all = EntryFilter::for_request(a, Some(b), Mode::All, None).unwrap();
        for e in &corpus {
            let in_some_mode = [Mode::Me, Mode::Partner, Mode::Couple].iter().any(|mode| {
                EntryFilter::for_request(a, Some(b), *mode, None)
                    .unwrap()
                    .matches(e)
            });
            assert_eq!(all.matches(e), in_some_mode);
        }
    }

    #[test]
    fn test_kind_narrows_selected_scope() {
        let a = UserId::generate();
        let b = UserId::generate();
        let corpus = corpus(a, b);

        let filter =
            EntryFilter::for_request(a, Some(b), Mode::Me, Some(EntryKind::Gallery)).unwrap();
        let seen = visible(&filter, &corpus);
        assert_eq!(seen.len(), Visibility::ALL.len());
        assert!(seen.iter().all(|e| e.kind == EntryKind::Gallery));
    }

    #[test]
    fn test_partner_mode_without_partner() {
        let a = UserId::generate();
        assert_eq!(
            EntryFilter::for_request(a, None, Mode::Partner, None),
            Err(AccessError::NoPartner)
        );

        let filter = EntryFilter::for_request(a, None, Mode::All, None).unwrap();
        assert_eq!(filter.scopes().len(), 2);
    }
}
