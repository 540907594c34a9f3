/// Options used when constructing a [`Document`](crate::Document)
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Lower bound applied to the height of caret rectangles produced for
    /// atomic leaves, so that the rendered caret stays visible next to
    /// zero-height components such as horizontal rules.
    pub min_caret_height: f64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            min_caret_height: 18.0,
        }
    }
}
