use indexmap::IndexMap;

use crate::{CollisionError, OptionSchema, Target};

/// Which side of the merge an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Global,
    Adapter,
}

/// A schema registered in an [`OptionSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    schema: OptionSchema,
    origin: Origin,
}

impl Entry {
    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

/// Merged global and adapter schemas, keyed by every flag spelling.
///
/// Construction fails on the first spelling, canonical name or argument key
/// claimed twice, so a successfully built set never has ambiguous lookups.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    entries: Vec<Entry>,
    by_spelling: IndexMap<String, usize>,
    by_name: IndexMap<String, usize>,
    by_dest: IndexMap<String, usize>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge global schemas with an adapter's schemas.
    ///
    /// Adapter-contributed schemas are always consumed by the adapter,
    /// whatever target they declare.
    pub fn merge(global: &[OptionSchema], adapter: &[OptionSchema]) -> Result<Self, CollisionError> {
        let mut set = Self::new();
        for schema in global {
            set.insert(schema.clone(), Origin::Global)?;
        }
        for schema in adapter {
            set.insert(schema.retarget(Target::Adapter), Origin::Adapter)?;
        }
        Ok(set)
    }

    /// Register one schema.
    pub fn insert(&mut self, schema: OptionSchema, origin: Origin) -> Result<(), CollisionError> {
        let index = self.entries.len();
        let name_key = schema.name().to_lowercase();

        if let Some(&existing) = self.by_name.get(&name_key) {
            return Err(self.collision(existing, schema.long(), &schema));
        }
        if let Some(&existing) = self.by_dest.get(schema.dest_key()) {
            return Err(self.collision(existing, schema.dest_key().to_string(), &schema));
        }
        let spellings = schema.spellings();
        for (i, spelling) in spellings.iter().enumerate() {
            if let Some(&existing) = self.by_spelling.get(spelling) {
                return Err(self.collision(existing, spelling.clone(), &schema));
            }
            if spellings[..i].contains(spelling) {
                return Err(CollisionError {
                    spelling: spelling.clone(),
                    existing: schema.name().to_string(),
                    incoming: schema.name().to_string(),
                });
            }
        }

        for spelling in spellings {
            self.by_spelling.insert(spelling, index);
        }
        self.by_name.insert(name_key, index);
        self.by_dest.insert(schema.dest_key().to_string(), index);
        self.entries.push(Entry { schema, origin });
        Ok(())
    }

    fn collision(&self, existing: usize, spelling: String, incoming: &OptionSchema) -> CollisionError {
        CollisionError {
            spelling,
            existing: self.entries[existing].schema.name().to_string(),
            incoming: incoming.name().to_string(),
        }
    }

    /// Find the entry selected by a flag spelling.
    ///
    /// Spellings match exactly first; `--<name>` additionally matches the
    /// canonical name case-insensitively. Aliases never match loosely.
    pub fn lookup(&self, spelling: &str) -> Option<(usize, &Entry)> {
        let index = match self.by_spelling.get(spelling) {
            Some(&index) => index,
            None => {
                let name = spelling.strip_prefix("--")?;
                *self.by_name.get(&name.to_lowercase())?
            }
        };
        Some((index, &self.entries[index]))
    }

    /// Find an entry by canonical name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<&Entry> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.entries[index])
    }

    /// Find an entry by the argument key it stores under.
    pub fn by_dest(&self, dest: &str) -> Option<&Entry> {
        self.by_dest.get(dest).map(|&index| &self.entries[index])
    }

    pub fn entry(&self, index: usize) -> &Entry {
        &self.entries[index]
    }

    /// Entries in registration order: globals, then adapter options.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
