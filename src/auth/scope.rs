use uuid::Uuid;

/// A record that belongs to exactly one user.
#[cfg(test)]
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Restricts reads and writes to the records of a single caller.
///
/// Every store lookup goes through a scope, so a record owned by someone else
/// is indistinguishable from one that does not exist. Postgres applies it as
/// `WHERE user_id = <owner>` in each query; `permits`/`apply` are the same
/// filter over records already in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope(Uuid);

impl OwnerScope {
    pub fn new(owner: Uuid) -> Self {
        Self(owner)
    }

    pub fn owner(&self) -> Uuid {
        self.0
    }

    #[cfg(test)]
    pub fn permits<R: Owned>(&self, record: &R) -> bool {
        record.owner_id() == self.0
    }

    #[cfg(test)]
    pub fn apply<R, I>(&self, records: I) -> Vec<R>
    where
        R: Owned,
        I: IntoIterator<Item = R>,
    {
        records.into_iter().filter(|r| self.permits(r)).collect()
    }
}
