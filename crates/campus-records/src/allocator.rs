//! Sequential, human-readable identifiers of the form `PREFIX-NNN`.
//!
//! Each entity type owns a namespace named by its prefix (`EST`, `PROF`, `DEP`, `CUR`,
//! `EVAL`). The next value comes from a per-namespace counter that the store advances
//! atomically, so two concurrent allocations never observe the same value. The counter is
//! floored by the numeric maximum of identifiers already present, which keeps it ahead of
//! records created with client-supplied keys.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, error, instrument};

use crate::error::RecordsError;
use crate::model::EntityKind;
use crate::store::RecordStore;

/// Minimum number of digits in a formatted sequence value.
pub const SEQUENCE_WIDTH: usize = 3;

const STANDARD_PREFIXES: [(EntityKind, &str); 5] = [
    (EntityKind::Student, "EST"),
    (EntityKind::Teacher, "PROF"),
    (EntityKind::Department, "DEP"),
    (EntityKind::Course, "CUR"),
    (EntityKind::Evaluation, "EVAL"),
];

const LEGACY_TAGS: [(&str, EntityKind); 5] = [
    ("estudiante", EntityKind::Student),
    ("profesor", EntityKind::Teacher),
    ("departamento", EntityKind::Department),
    ("curso", EntityKind::Course),
    ("evaluacion", EntityKind::Evaluation),
];

/// An identifier namespace: the prefix, and the entity whose keys live in it if known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: String,
    entity: Option<EntityKind>,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, entity: Option<EntityKind>) -> Self {
        Self {
            prefix: prefix.into(),
            entity,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `None` for namespaces derived from tags with no backing table.
    pub fn entity(&self) -> Option<EntityKind> {
        self.entity
    }

    /// Postgres regular expression matching identifiers that belong to this namespace.
    pub fn identifier_pattern(&self) -> String {
        format!("^{}-[0-9]+$", self.prefix)
    }
}

/// Immutable tag-to-prefix mapping, built once at startup.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    entries: HashMap<String, Namespace>,
}

impl PrefixTable {
    pub fn standard() -> Self {
        let mut entries = HashMap::new();

        for (kind, prefix) in STANDARD_PREFIXES {
            entries.insert(kind.tag().to_string(), Namespace::new(prefix, Some(kind)));
        }

        for (tag, kind) in LEGACY_TAGS {
            if let Some(namespace) = entries.get(kind.tag()).cloned() {
                entries.insert(tag.to_string(), namespace);
            }
        }

        Self { entries }
    }

    /// Resolves a tag case-insensitively. Unmapped tags use their first three letters,
    /// uppercased.
    pub fn resolve(&self, tag: &str) -> Result<Namespace, RecordsError> {
        let normalized = tag.trim().to_lowercase();

        if let Some(namespace) = self.entries.get(&normalized) {
            return Ok(namespace.clone());
        }

        let prefix: String = normalized
            .chars()
            .filter(|c| c.is_alphabetic())
            .take(3)
            .collect::<String>()
            .to_uppercase();

        if prefix.is_empty() {
            return Err(RecordsError::InvalidEntityTag(tag.to_string()));
        }

        Ok(Namespace::new(prefix, None))
    }
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Produces the next identifier for an entity type.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    prefixes: Arc<PrefixTable>,
}

impl IdAllocator {
    pub fn new(prefixes: PrefixTable) -> Self {
        Self {
            prefixes: Arc::new(prefixes),
        }
    }

    /// Allocates the next identifier in the namespace of `tag`.
    ///
    /// Store failures propagate as [`RecordsError::StoreUnavailable`]; the sequence is
    /// never restarted because the store could not be read.
    #[instrument(skip(self, store))]
    pub async fn allocate<S>(&self, store: &S, tag: &str) -> Result<String, RecordsError>
    where
        S: RecordStore + ?Sized,
    {
        let namespace = self.prefixes.resolve(tag)?;

        let value = store.next_sequence(&namespace).await.map_err(|err| {
            error!(prefix = namespace.prefix(), error = %err, "Identifier allocation failed");
            RecordsError::from(err)
        })?;

        let identifier = format_identifier(namespace.prefix(), value);
        debug!(%identifier, "Allocated identifier");

        Ok(identifier)
    }

    pub async fn allocate_for<S>(&self, store: &S, kind: EntityKind) -> Result<String, RecordsError>
    where
        S: RecordStore + ?Sized,
    {
        self.allocate(store, kind.tag()).await
    }
}

/// Formats `value` zero-padded to [`SEQUENCE_WIDTH`] digits. Wider values are not truncated.
pub fn format_identifier(prefix: &str, value: u64) -> String {
    format!("{prefix}-{value:0width$}", width = SEQUENCE_WIDTH)
}

fn sequence_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-(\d+)$").expect("sequence suffix regex must compile"))
}

/// Numeric suffix of `identifier` if it belongs to the `prefix` namespace.
pub fn parse_sequence(identifier: &str, prefix: &str) -> Option<u64> {
    let rest = identifier.strip_prefix(prefix)?;
    let captures = sequence_suffix_re().captures(rest)?;
    captures[1].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn test_standard_prefixes() {
        let table = PrefixTable::standard();

        assert_eq!(table.resolve("student").unwrap().prefix(), "EST");
        assert_eq!(table.resolve("teacher").unwrap().prefix(), "PROF");
        assert_eq!(table.resolve("department").unwrap().prefix(), "DEP");
        assert_eq!(table.resolve("course").unwrap().prefix(), "CUR");
        assert_eq!(table.resolve("evaluation").unwrap().prefix(), "EVAL");
    }

    #[test]
    fn test_legacy_tags_share_the_namespace() {
        let table = PrefixTable::standard();

        assert_eq!(table.resolve("Estudiante").unwrap(), table.resolve("student").unwrap());
        assert_eq!(table.resolve("CURSO").unwrap().entity(), Some(EntityKind::Course));
    }

    #[test]
    fn test_unmapped_tag_uses_first_three_letters() {
        let table = PrefixTable::standard();

        let namespace = table.resolve("grade").unwrap();
        assert_eq!(namespace.prefix(), "GRA");
        assert_eq!(namespace.entity(), None);

        assert_eq!(table.resolve("x1-room").unwrap().prefix(), "XRO");
    }

    #[test]
    fn test_tag_without_letters_is_rejected() {
        let table = PrefixTable::standard();
        let result = table.resolve("123");

        assert!(matches!(result, Err(RecordsError::InvalidEntityTag(tag)) if tag == "123"));
    }

    #[test]
    fn test_format_identifier_pads_and_overflows() {
        assert_eq!(format_identifier("EST", 1), "EST-001");
        assert_eq!(format_identifier("EST", 42), "EST-042");
        assert_eq!(format_identifier("EST", 999), "EST-999");
        assert_eq!(format_identifier("EST", 1000), "EST-1000");
    }

    #[test]
    fn test_parse_sequence() {
        assert_eq!(parse_sequence("EST-007", "EST"), Some(7));
        assert_eq!(parse_sequence("EST-1000", "EST"), Some(1000));
        assert_eq!(parse_sequence("EST-ABC", "EST"), None);
        assert_eq!(parse_sequence("ESTX-001", "EST"), None);
        assert_eq!(parse_sequence("PROF-001", "EST"), None);
        assert_eq!(parse_sequence("EST-001-2", "EST"), None);
    }

    #[test]
    fn test_identifier_pattern() {
        let namespace = Namespace::new("EVAL", Some(EntityKind::Evaluation));
        assert_eq!(namespace.identifier_pattern(), "^EVAL-[0-9]+$");
    }

    #[tokio::test]
    async fn test_allocate_starts_at_one() {
        let store = MemoryStore::new();
        let allocator = IdAllocator::default();

        let id = allocator.allocate(&store, "student").await.unwrap();

        assert_eq!(id, "EST-001");
    }

    #[tokio::test]
    async fn test_allocate_continues_after_existing_identifier() {
        let store = MemoryStore::new();
        store.insert_student("EST-007", "Ana Torres");
        let allocator = IdAllocator::default();

        let id = allocator.allocate(&store, "student").await.unwrap();

        assert_eq!(id, "EST-008");
    }

    #[tokio::test]
    async fn test_allocate_sequential_calls() {
        let store = MemoryStore::new();
        let allocator = IdAllocator::default();

        let first = allocator.allocate(&store, "course").await.unwrap();
        let second = allocator.allocate(&store, "course").await.unwrap();

        assert_eq!(first, "CUR-001");
        assert_eq!(second, "CUR-002");
    }

    #[tokio::test]
    async fn test_allocate_orders_numerically_past_padding() {
        let store = MemoryStore::new();
        store.insert_student("EST-099", "Student 99");
        store.insert_student("EST-100", "Student 100");
        let allocator = IdAllocator::default();

        let id = allocator.allocate(&store, "student").await.unwrap();

        assert_eq!(id, "EST-101");
    }

    #[tokio::test]
    async fn test_allocate_skips_client_supplied_keys() {
        let store = MemoryStore::new();
        let allocator = IdAllocator::default();

        assert_eq!(allocator.allocate(&store, "course").await.unwrap(), "CUR-001");
        store.insert_course(crate::model::Course::new("CUR-005", "Imported"));

        assert_eq!(allocator.allocate(&store, "course").await.unwrap(), "CUR-006");
    }

    #[tokio::test]
    async fn test_namespaces_are_independent() {
        let store = MemoryStore::new();
        let allocator = IdAllocator::default();

        allocator.allocate(&store, "student").await.unwrap();
        allocator.allocate(&store, "student").await.unwrap();

        assert_eq!(allocator.allocate(&store, "teacher").await.unwrap(), "PROF-001");
        assert_eq!(allocator.allocate(&store, "estudiante").await.unwrap(), "EST-003");
    }

    #[tokio::test]
    async fn test_allocate_propagates_store_failure() {
        let store = MemoryStore::new();
        store.insert_student("EST-007", "Ana Torres");
        store.set_available(false);
        let allocator = IdAllocator::default();

        let result = allocator.allocate(&store, "student").await;

        assert!(matches!(result, Err(RecordsError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_concurrent_allocations_are_distinct() {
        let store = Arc::new(MemoryStore::new());
        let allocator = IdAllocator::default();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            let allocator = allocator.clone();
            handles.push(tokio::spawn(async move {
                allocator.allocate(store.as_ref(), "evaluation").await.unwrap()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 16);
        assert_eq!(ids.first().map(String::as_str), Some("EVAL-001"));
        assert_eq!(ids.last().map(String::as_str), Some("EVAL-016"));
    }
}
