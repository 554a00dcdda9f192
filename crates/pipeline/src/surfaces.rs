use catalog::Field;

/// The host rendering seam: address bar, field selector, and status line.
///
/// The browser app implements this over the DOM; tests and the CLI use
/// [`HeadlessSurfaces`]. The viewer only ever talks to these methods, so
/// the pipeline stays independent of any particular UI toolkit.
pub trait Surfaces {
    /// Current address fragment, without the leading `#`.
    fn fragment(&self) -> String;

    /// Sets the fragment the way user navigation would (records a history
    /// entry). Used by the selector-change path.
    fn set_fragment(&mut self, id: &str);

    /// Canonicalizes the fragment in place, replacing the current history
    /// entry so recomputes do not accumulate back/forward stops.
    fn replace_fragment(&mut self, id: &str);

    /// Rewrites every outbound share link to carry the canonical fragment.
    fn rewrite_share_links(&mut self, id: &str);

    /// Replaces the selector's option list (idempotent by construction).
    fn set_selector_options(&mut self, fields: &[Field]);

    fn set_selected_index(&mut self, index: usize);

    fn set_status(&mut self, text: &str);

    fn set_updating(&mut self, updating: bool);
}

/// In-memory surfaces for tests and headless renders.
#[derive(Debug, Default)]
pub struct HeadlessSurfaces {
    pub fragment: String,
    pub pushed: Vec<String>,
    pub replaced: Vec<String>,
    pub share_fragment: Option<String>,
    pub options: Vec<Field>,
    pub selected_index: Option<usize>,
    pub status: String,
    pub updating: bool,
}

impl HeadlessSurfaces {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surfaces for HeadlessSurfaces {
    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, id: &str) {
        self.fragment = id.to_string();
        self.pushed.push(id.to_string());
    }

    fn replace_fragment(&mut self, id: &str) {
        self.fragment = id.to_string();
        self.replaced.push(id.to_string());
    }

    fn rewrite_share_links(&mut self, id: &str) {
        self.share_fragment = Some(id.to_string());
    }

    fn set_selector_options(&mut self, fields: &[Field]) {
        self.options = fields.to_vec();
    }

    fn set_selected_index(&mut self, index: usize) {
        self.selected_index = Some(index);
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn set_updating(&mut self, updating: bool) {
        self.updating = updating;
    }
}
