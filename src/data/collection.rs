// src/data/collection.rs

//! Implement [`RecordCollection`], the ordered result of one decode, and
//! its filtering operations.
//!
//! Every filter returns a new `RecordCollection` in the same relative order
//! as its input. The input is never modified. No filter can fail; an empty
//! input or an empty set of wanted values returns an empty collection.

use crate::data::datetime::{dt_pass_filters, DateTimeLOpt};
use crate::data::loginrecord::{LoginRecord, SessionId};
use crate::data::recordtype::RecordType;

use std::collections::HashSet;
use std::ops::Index;
use std::sync::Arc;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Set of [`RecordType`] for [`RecordCollection::filter_by_record_types`].
pub type RecordTypeSet = HashSet<RecordType>;

/// Set of user names for [`RecordCollection::filter_by_users`].
pub type UserSet = HashSet<String>;

/// Set of session ids for [`RecordCollection::filter_by_sessions`].
pub type SessionSet = HashSet<SessionId>;

/// Shared pointer to a [`LoginRecord`]. Filtered collections share records
/// with the collection they were filtered from.
pub type LoginRecordP = Arc<LoginRecord>;

#[inline(always)]
fn record_ref(p: &LoginRecordP) -> &LoginRecord {
    p
}

/// An ordered sequence of [`LoginRecord`]. The order is the order of the
/// records in the decoded buffer. Duplicates are kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordCollection {
    records: Vec<LoginRecordP>,
}

impl RecordCollection {
    pub fn new(records: Vec<LoginRecord>) -> RecordCollection {
        RecordCollection {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LoginRecord> {
        self.records.get(index).map(record_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoginRecord> {
        self.records.iter().map(record_ref)
    }

    /// Keep only records for which `predicate` is `true`.
    pub fn filter<P>(&self, predicate: P) -> RecordCollection
    where
        P: Fn(&LoginRecord) -> bool,
    {
        let records: Vec<LoginRecordP> = self
            .records
            .iter()
            .filter(|p| predicate(record_ref(p)))
            .cloned()
            .collect();
        defñ!("kept {} of {}", records.len(), self.records.len());

        RecordCollection { records }
    }

    /// Keep only records with a `record_type` in `types`.
    pub fn filter_by_record_types(&self, types: &RecordTypeSet) -> RecordCollection {
        self.filter(|r| types.contains(&r.record_type))
    }

    /// Keep only records with a `user` exactly equal to a member of `users`.
    pub fn filter_by_users(&self, users: &UserSet) -> RecordCollection {
        self.filter(|r| users.contains(&r.user))
    }

    /// Keep only records with a `session` in `sessions`.
    pub fn filter_by_sessions(&self, sessions: &SessionSet) -> RecordCollection {
        self.filter(|r| sessions.contains(&r.session))
    }

    /// Keep only records at or after `dt_after` and at or before `dt_before`.
    /// A `None` bound is not checked.
    pub fn filter_by_datetime(
        &self,
        dt_after: &DateTimeLOpt,
        dt_before: &DateTimeLOpt,
    ) -> RecordCollection {
        self.filter(|r| dt_pass_filters(&r.dt, dt_after, dt_before))
    }

    /// Users logged in; records of type [`RecordType::UserProcess`].
    pub fn current_users(&self) -> RecordCollection {
        let types: RecordTypeSet = RecordTypeSet::from([RecordType::UserProcess]);

        self.filter_by_record_types(&types)
    }
}

impl Index<usize> for RecordCollection {
    type Output = LoginRecord;

    fn index(&self, index: usize) -> &LoginRecord {
        record_ref(&self.records[index])
    }
}

impl From<Vec<LoginRecord>> for RecordCollection {
    fn from(records: Vec<LoginRecord>) -> RecordCollection {
        RecordCollection::new(records)
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a LoginRecord;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, LoginRecordP>, fn(&'a LoginRecordP) -> &'a LoginRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter().map(record_ref as fn(&'a LoginRecordP) -> &'a LoginRecord)
    }
}
