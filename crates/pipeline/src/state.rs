use catalog::{Field, FieldCatalog};

/// The single process-wide selection: which field is active.
///
/// One writer per event turn; the router assigns it, the scheduler and
/// render pass read it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    field: Option<Field>,
}

impl SelectionState {
    /// Called once ingestion completes: start on the first non-sentinel
    /// field, or the sentinel when no data fields exist.
    pub fn initialize(&mut self, catalog: &FieldCatalog) {
        self.field = catalog.initial_field().cloned();
    }

    pub fn set(&mut self, field: Field) {
        self.field = Some(field);
    }

    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    /// True when the active field is the "no scaling" sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.field.as_ref().is_some_and(|f| f.key.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionState;
    use catalog::FieldCatalog;

    #[test]
    fn initializes_to_the_first_data_field() {
        let catalog =
            FieldCatalog::from_headers(&["name".to_string(), "pop".to_string()], "name");
        let mut state = SelectionState::default();
        state.initialize(&catalog);
        assert_eq!(state.field().map(|f| f.id.as_str()), Some("pop"));
        assert!(!state.is_sentinel());
    }

    #[test]
    fn empty_catalog_leaves_no_selection() {
        let mut state = SelectionState::default();
        state.initialize(&FieldCatalog::empty());
        assert!(state.field().is_none());
        assert!(!state.is_sentinel());
    }
}
