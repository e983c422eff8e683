use uuid::Uuid;

/// Fresh editor key for an [`ElementNode`](crate::ElementNode) envelope
pub fn new_editor_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fresh, globally unique field identifier
///
/// Used where a copied node would otherwise collide with its original's
/// storage key (duplicated ChipGroup chips).
pub fn new_field_id() -> String {
    format!("field_{}", Uuid::new_v4().simple())
}

/// Sequential ID generator scoped to one seed
///
/// Produces `{seed}-{n}` ids. Handy when ids must be stable across runs,
/// e.g. page ids of a freshly created flow.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
