use casebook_core::Catalog;

/// Shared state of the callback receiver.
pub struct CallbackState {
    catalog: Catalog,
}

impl CallbackState {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
