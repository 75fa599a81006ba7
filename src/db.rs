use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::Result;

const ROOT_PREFIX: &str = "Root Account:";

/// Full account paths, parents joined to children with ':'. Codes shorter than
/// five characters are padded with a trailing '0' for ordering.
const ACCOUNT_HIERARCHY: &str = "
WITH RECURSIVE account_hierarchy AS (
    SELECT
        guid,
        CASE WHEN length(code) < 5 THEN code || '0' ELSE code END AS child_code,
        name AS fullname,
        parent_guid
    FROM accounts
    WHERE parent_guid IS NULL

    UNION ALL

    SELECT
        child.guid,
        CASE WHEN length(child.code) < 5 THEN child.code || '0' ELSE child.code END AS child_code,
        parent.fullname || ':' || child.name AS fullname,
        child.parent_guid
    FROM accounts AS child
    JOIN account_hierarchy AS parent ON child.parent_guid = parent.guid
)
SELECT h.fullname
FROM account_hierarchy AS h
JOIN accounts AS a ON h.guid = a.guid
WHERE a.hidden <> 1
  AND h.parent_guid IS NOT NULL
ORDER BY CAST(h.child_code AS INTEGER) ASC
";

/// Where the list of valid category names comes from.
pub trait CategorySource {
    fn category_names(&self) -> Result<Vec<String>>;
}

/// A GnuCash book saved in SQLite format.
pub struct GnuCashBook {
    conn: Connection,
}

impl GnuCashBook {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl CategorySource for GnuCashBook {
    fn category_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(ACCOUNT_HIERARCHY)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .map(|r| r.map(|name| strip_root(&name).to_string()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        tracing::debug!("Loaded {} categories from GnuCash book", names.len());
        Ok(names)
    }
}

fn strip_root(fullname: &str) -> &str {
    fullname.strip_prefix(ROOT_PREFIX).unwrap_or(fullname)
}
